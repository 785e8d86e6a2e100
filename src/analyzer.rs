//! Risk scoring over a single email message.
//!
//! The analyzer is an immutable context built once from config plus mined
//! corpus data. Each scoring call is pure: it reads the message fields and
//! the shared sets, mutates nothing, and returns a bounded score with a
//! human-readable rationale.

use crate::config::{Config, KeywordConfig};
use crate::corpus::{DomainSets, TokenCorpus};
use crate::domain_utils::DomainUtils;
use crate::extractor::LinkExtractor;
use crate::similarity::{best_match, LINK_TYPOSQUAT_CUTOFF, SENDER_TYPOSQUAT_CUTOFF};
use serde::Serialize;

/// Every per-signal score saturates here.
pub const MAX_SCORE: u32 = 5;

/// A bounded risk score with its findings joined by `"; "`. An empty reason
/// means the signal found nothing at all.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub score: u32,
    pub reason: String,
}

impl ScoreReport {
    fn new(score: u32, reasons: Vec<String>) -> Self {
        Self {
            score: score.min(MAX_SCORE),
            reason: reasons.join("; "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Combined verdict over all three signals.
#[derive(Debug, Clone, Serialize)]
pub struct TriageReport {
    pub sender: ScoreReport,
    pub text: ScoreReport,
    pub links: ScoreReport,
    pub overall_score: f64,
    pub risk_level: RiskLevel,
}

/// Immutable scoring context: static trusted-sender whitelist, keyword table,
/// and the mined domain sets and token corpus.
pub struct RiskAnalyzer {
    extractor: LinkExtractor,
    trusted_domains: Vec<String>,
    keywords: KeywordConfig,
    domain_sets: DomainSets,
    token_corpus: TokenCorpus,
}

impl RiskAnalyzer {
    pub fn new(config: &Config, domain_sets: DomainSets, token_corpus: TokenCorpus) -> Self {
        Self {
            extractor: LinkExtractor::new(),
            trusted_domains: config
                .trusted_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            keywords: config.keywords.clone(),
            domain_sets,
            token_corpus,
        }
    }

    /// Score all links found in `body` against the mined domain sets.
    ///
    /// Per link, in precedence order: trusted +0, untrusted +5, fake +3,
    /// similar-to-trusted +3, unknown +1. The total saturates at
    /// [`MAX_SCORE`].
    pub fn score_links(&self, body: &str) -> ScoreReport {
        let sets = &self.domain_sets;
        let mut score = 0u32;
        let mut reasons = Vec::new();

        for link in self.extractor.extract_links(Some(body)) {
            let domain = DomainUtils::normalize_domain(&link);
            if domain.is_empty() {
                continue;
            }

            if sets.trusted.contains(&domain) {
                reasons.push(format!("Trusted link: {}", domain));
            } else if sets.untrusted.contains(&domain) {
                reasons.push(format!("Untrustable link: {}", domain));
                score += 5;
            } else if sets.fake.contains(&domain) {
                reasons.push(format!("Fake/similar link: {}", domain));
                score += 3;
            } else if let Some(matched) =
                best_match(&domain, &sets.trusted, LINK_TYPOSQUAT_CUTOFF)
            {
                reasons.push(format!(
                    "Typosquatting: {} is similar to {}",
                    domain, matched
                ));
                score += 3;
            } else {
                reasons.push(format!("Unknown link: {}", domain));
                score += 1;
            }
        }

        ScoreReport::new(score, reasons)
    }

    /// Score the sender address domain against the trusted whitelist and the
    /// suspicious-token corpus.
    pub fn score_sender(&self, email: &str) -> ScoreReport {
        let domain = DomainUtils::sender_domain(email);

        if self.trusted_domains.contains(&domain) {
            return ScoreReport::new(0, vec!["Trusted domain".to_string()]);
        }

        let mut score = 1u32;
        let mut reasons = vec!["Not a trusted domain".to_string()];

        if let Some(matched) = best_match(&domain, &self.trusted_domains, SENDER_TYPOSQUAT_CUTOFF)
        {
            if matched != domain {
                score += 2;
                reasons.push(format!("Typosquatting: similar to {}", matched));
            }
        }

        let suspicious: Vec<&str> = DomainUtils::domain_tokens(&domain)
            .into_iter()
            .filter(|token| self.token_corpus.contains(token))
            .collect();
        if !suspicious.is_empty() {
            score += suspicious.len() as u32;
            reasons.push(format!("Suspicious tokens: {}", suspicious.join(", ")));
        }

        ScoreReport::new(score, reasons)
    }

    /// Score subject and body against the weighted suspicious-word table.
    pub fn score_text(&self, subject: &str, body: &str) -> ScoreReport {
        let keywords = &self.keywords;
        let subject_words = clean_words(subject);
        let body_words = clean_words(body);

        let mut score = 0u32;
        let mut reasons = Vec::new();

        let found_subject: Vec<&str> = keywords
            .wordlist
            .iter()
            .filter(|w| subject_words.iter().any(|s| s == *w))
            .map(|w| w.as_str())
            .collect();
        for word in &keywords.wordlist {
            let count = subject_words.iter().filter(|s| *s == word).count() as u32;
            score += keywords.subject_weight * count;
        }
        if !found_subject.is_empty() {
            reasons.push(format!(
                "Suspicious words in subject: {}",
                found_subject.join(", ")
            ));
        }

        let mut found_body: Vec<&str> = Vec::new();
        for (i, word) in body_words.iter().enumerate() {
            if let Some(hit) = keywords.wordlist.iter().find(|w| *w == word) {
                score += if i < keywords.early_window {
                    keywords.body_early_weight
                } else {
                    keywords.body_late_weight
                };
                if !found_body.contains(&hit.as_str()) {
                    found_body.push(hit.as_str());
                }
            }
        }
        if !found_body.is_empty() {
            reasons.push(format!(
                "Suspicious words in body: {}",
                found_body.join(", ")
            ));
        }

        ScoreReport::new(score, reasons)
    }

    /// Run all three scorers and combine them into a single verdict.
    ///
    /// The overall score is the plain average of the three signal scores;
    /// >= 4 is high risk, >= 2 medium, otherwise low.
    pub fn analyze(&self, sender: &str, subject: &str, body: &str) -> TriageReport {
        let sender_report = self.score_sender(sender);
        let text_report = self.score_text(subject, body);
        let link_report = self.score_links(body);

        let overall =
            (sender_report.score + text_report.score + link_report.score) as f64 / 3.0;
        let risk_level = if overall >= 4.0 {
            RiskLevel::High
        } else if overall >= 2.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        log::debug!(
            "triage: sender={} text={} links={} overall={:.2} level={}",
            sender_report.score,
            text_report.score,
            link_report.score,
            overall,
            risk_level
        );

        TriageReport {
            sender: sender_report,
            text: text_report,
            links: link_report,
            overall_score: overall,
            risk_level,
        }
    }
}

/// Lowercase, drop ASCII punctuation, and split on whitespace.
fn clean_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect()
}
