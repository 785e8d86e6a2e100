//! Approximate string matching for typosquat detection.
//!
//! Similarity is the normalized Levenshtein ratio in [0, 1], monotonic in
//! closeness. Two cutoffs are used by the scorers and must not drift: 0.70
//! for sender-domain checks and 0.75 for link checks and fake-set mining.

use strsim::normalized_levenshtein;

/// Cutoff for sender-domain typosquatting checks.
pub const SENDER_TYPOSQUAT_CUTOFF: f64 = 0.70;

/// Cutoff for link typosquatting checks and fake-set derivation.
pub const LINK_TYPOSQUAT_CUTOFF: f64 = 0.75;

/// Similarity ratio between two strings in [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

/// Find the single best corpus entry at least `cutoff` similar to `candidate`.
///
/// Ties keep the earliest corpus entry, so the result is stable for a given
/// corpus ordering.
pub fn best_match<'a, S: AsRef<str>>(
    candidate: &str,
    corpus: &'a [S],
    cutoff: f64,
) -> Option<&'a str> {
    let mut best: Option<(&str, f64)> = None;
    for entry in corpus {
        let entry = entry.as_ref();
        let ratio = normalized_levenshtein(candidate, entry);
        if ratio >= cutoff && best.map_or(true, |(_, b)| ratio > b) {
            best = Some((entry, ratio));
        }
    }
    best.map(|(entry, _)| entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_is_best() {
        let corpus = vec!["gmail.com".to_string(), "outlook.com".to_string()];
        assert_eq!(best_match("gmail.com", &corpus, 0.75), Some("gmail.com"));
    }

    #[test]
    fn test_close_misspelling_matches() {
        let corpus = vec!["paypal.com".to_string()];
        assert_eq!(
            best_match("paypa1.com", &corpus, SENDER_TYPOSQUAT_CUTOFF),
            Some("paypal.com")
        );
        assert_eq!(
            best_match("paypall.com", &corpus, LINK_TYPOSQUAT_CUTOFF),
            Some("paypal.com")
        );
    }

    #[test]
    fn test_distant_candidate_rejected() {
        let corpus = vec!["paypal.com".to_string()];
        assert_eq!(best_match("flapprice.com", &corpus, 0.75), None);
        assert_eq!(
            best_match("secure-paypal-login.com", &corpus, LINK_TYPOSQUAT_CUTOFF),
            None
        );
    }

    #[test]
    fn test_ties_keep_first_corpus_entry() {
        // Both entries are equally distant from the candidate.
        let corpus = vec!["abcx.com".to_string(), "abcy.com".to_string()];
        assert_eq!(best_match("abcz.com", &corpus, 0.70), Some("abcx.com"));
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("same.com", "same.com"), 1.0);
        assert!(similarity("a", "zzzzzzzz") < 0.2);
    }
}
