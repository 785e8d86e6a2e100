use crate::domain_utils::DomainUtils;
use regex::Regex;
use std::collections::HashSet;

/// Extracts candidate URLs and bare domains from free text.
///
/// Two passes run over the text: full URLs first (`http://`, `https://`, or
/// `www.` prefixed, up to whitespace or a closing parenthesis), then bare
/// dotted hostnames. Results keep first-seen order across the two passes and
/// are deduplicated by normalized domain, so `https://foo.com` and the
/// `foo.com` the second pass finds inside it count once.
pub struct LinkExtractor {
    url_pattern: Regex,
    bare_domain_pattern: Regex,
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor {
    pub fn new() -> Self {
        Self {
            url_pattern: Regex::new(r"(?:https?://[^\s)]+|www\.[^\s)]+)").unwrap(),
            bare_domain_pattern: Regex::new(r"\b(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}\b").unwrap(),
        }
    }

    /// Extract all links from `text`, cleaned of trailing punctuation.
    ///
    /// A missing body is not an error; it simply has no links.
    pub fn extract_links(&self, text: Option<&str>) -> Vec<String> {
        let text = match text {
            Some(t) => t,
            None => return Vec::new(),
        };

        let mut seen = HashSet::new();
        let mut results = Vec::new();

        let url_matches = self.url_pattern.find_iter(text);
        let bare_matches = self
            .bare_domain_pattern
            .find_iter(text)
            // The domain half of an email address is not a link.
            .filter(|m| m.start() == 0 || text.as_bytes()[m.start() - 1] != b'@');

        for m in url_matches.chain(bare_matches) {
            let cleaned = DomainUtils::strip_trailing_punct(m.as_str());
            if cleaned.is_empty() {
                continue;
            }
            let normalized = DomainUtils::normalize_domain(cleaned);
            let key = if normalized.is_empty() {
                cleaned.to_string()
            } else {
                normalized
            };
            if seen.insert(key) {
                results.push(cleaned.to_string());
            }
        }

        results
    }
}
