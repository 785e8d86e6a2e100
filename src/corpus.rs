//! Mining of trusted/untrusted/look-alike domain sets and suspicious sender
//! tokens from labeled historical data.
//!
//! Mining runs once at startup; everything it produces is immutable afterwards
//! and shared read-only by the scorers.

use crate::domain_utils::DomainUtils;
use crate::extractor::LinkExtractor;
use crate::similarity::{best_match, LINK_TYPOSQUAT_CUTOFF};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Maximum entries retained per mined set.
pub const TOP_DOMAINS: usize = 20;

/// Default cap on dataset rows scanned. Mining the full CEAS-style corpus is
/// slow out of proportion to how little the tail changes the top-20 sets, so
/// only a prefix is read by default. Configurable via `dataset_row_cap`.
pub const DEFAULT_ROW_CAP: usize = 4000;

/// The dataset could not be read or is structurally unusable. Distinct from a
/// well-formed dataset that happens to yield no domains, which is not an
/// error.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] csv::Error),
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Ranked domain lists mined from a labeled corpus. Each list holds at most
/// [`TOP_DOMAINS`] entries in descending frequency order.
///
/// A domain may appear in more than one list; scorers resolve membership in
/// trusted -> untrusted -> fake order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainSets {
    pub trusted: Vec<String>,
    pub untrusted: Vec<String>,
    pub fake: Vec<String>,
}

/// Top suspicious domain sub-tokens mined from known-bad sender addresses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenCorpus {
    top_tokens: Vec<String>,
}

impl TokenCorpus {
    pub fn new(top_tokens: Vec<String>) -> Self {
        Self { top_tokens }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.top_tokens.iter().any(|t| t == token)
    }

    pub fn is_empty(&self) -> bool {
        self.top_tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.top_tokens
    }
}

/// Occurrence counter that ranks by descending count with first-seen order
/// breaking ties, so mining output is stable across runs.
#[derive(Default)]
struct FrequencyTable {
    counts: HashMap<String, usize>,
    first_seen: Vec<String>,
}

impl FrequencyTable {
    fn add(&mut self, key: &str) {
        match self.counts.get_mut(key) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(key.to_string(), 1);
                self.first_seen.push(key.to_string());
            }
        }
    }

    fn top(&self, n: usize) -> Vec<String> {
        let mut ranked = self.first_seen.clone();
        // Stable sort keeps first-seen order among equal counts.
        ranked.sort_by_key(|key| std::cmp::Reverse(self.counts[key]));
        ranked.truncate(n);
        ranked
    }
}

/// Mine trusted, untrusted, and fake domain sets from a labeled CSV dataset
/// at `path`. Required columns: `label` (0 = legitimate, 1 = phishing),
/// `urls` (0/1 has-link flag), `body` (free text).
pub fn mine_domain_sets_from_path<P: AsRef<Path>>(
    path: P,
    row_cap: usize,
) -> Result<DomainSets, DatasetError> {
    let file = File::open(path.as_ref())?;
    mine_domain_sets(file, row_cap)
}

/// Mine domain sets from any CSV source. See [`mine_domain_sets_from_path`].
pub fn mine_domain_sets<R: Read>(reader: R, row_cap: usize) -> Result<DomainSets, DatasetError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let label_idx = column_index(&headers, "label")?;
    let urls_idx = column_index(&headers, "urls")?;
    let body_idx = column_index(&headers, "body")?;

    let extractor = LinkExtractor::new();
    let mut trusted_table = FrequencyTable::default();
    let mut untrusted_table = FrequencyTable::default();
    // Raw occurrence list (with multiplicity) for fake-set derivation.
    let mut untrusted_occurrences = Vec::new();

    let mut rows_scanned = 0usize;
    for record in csv_reader.records() {
        if rows_scanned >= row_cap {
            log::debug!("dataset row cap of {} reached, stopping scan", row_cap);
            break;
        }
        rows_scanned += 1;

        let record = record?;
        let label = record.get(label_idx).map(str::trim);
        let has_urls = record.get(urls_idx).map(str::trim) == Some("1");
        if !has_urls {
            continue;
        }
        let body = record.get(body_idx);

        match label {
            Some("0") => {
                for link in extractor.extract_links(body) {
                    let domain = DomainUtils::normalize_domain(&link);
                    if !domain.is_empty() {
                        trusted_table.add(&domain);
                    }
                }
            }
            Some("1") => {
                for link in extractor.extract_links(body) {
                    let domain = DomainUtils::normalize_domain(&link);
                    if !domain.is_empty() {
                        untrusted_table.add(&domain);
                        untrusted_occurrences.push(domain);
                    }
                }
            }
            _ => continue,
        }
    }

    let trusted = trusted_table.top(TOP_DOMAINS);
    let untrusted = untrusted_table.top(TOP_DOMAINS);

    // A look-alike is any untrusted occurrence close to a trusted domain;
    // counting occurrences rather than unique domains keeps the same
    // weighting as the raw frequency tables.
    let mut fake_table = FrequencyTable::default();
    for domain in &untrusted_occurrences {
        if best_match(domain, &trusted, LINK_TYPOSQUAT_CUTOFF).is_some() {
            fake_table.add(domain);
        }
    }
    let fake = fake_table.top(TOP_DOMAINS);

    log::info!(
        "mined {} trusted, {} untrusted, {} fake domains from {} rows",
        trusted.len(),
        untrusted.len(),
        fake.len(),
        rows_scanned
    );

    Ok(DomainSets {
        trusted,
        untrusted,
        fake,
    })
}

/// Mine the suspicious-token corpus from a CSV of known-bad sender addresses
/// at `path`. Addresses are read from a `sender` column if present, otherwise
/// from the first column.
pub fn mine_token_corpus_from_path<P: AsRef<Path>>(path: P) -> Result<TokenCorpus, DatasetError> {
    let file = File::open(path.as_ref())?;
    mine_token_corpus(file)
}

/// Mine the suspicious-token corpus from any CSV source.
pub fn mine_token_corpus<R: Read>(reader: R) -> Result<TokenCorpus, DatasetError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let sender_idx = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("sender"))
        .unwrap_or(0);

    let mut table = FrequencyTable::default();
    for record in csv_reader.records() {
        let record = record?;
        let Some(address) = record.get(sender_idx) else {
            continue;
        };
        if address.trim().is_empty() {
            continue;
        }
        let domain = DomainUtils::sender_domain(address.trim());
        for token in DomainUtils::domain_tokens(&domain) {
            table.add(token);
        }
    }

    let top = table.top(TOP_DOMAINS);
    log::info!("mined {} suspicious sender tokens", top.len());
    Ok(TokenCorpus::new(top))
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or(DatasetError::MissingColumn(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = "\
label,urls,body
0,1,Visit https://google.com for search
0,1,See www.github.com and https://google.com
1,1,Click http://g00gle.com/verify now
1,1,Also g00gle.com and flapprice.com
1,0,No links flagged in this row even though evil.com appears
";

    #[test]
    fn test_mine_trusted_and_untrusted_sets() {
        let sets = mine_domain_sets(DATASET.as_bytes(), DEFAULT_ROW_CAP).unwrap();
        // google.com appears in two legitimate rows, github.com in one.
        assert_eq!(sets.trusted, vec!["google.com", "github.com"]);
        // g00gle.com twice across phishing rows, flapprice.com once.
        assert_eq!(sets.untrusted, vec!["g00gle.com", "flapprice.com"]);
    }

    #[test]
    fn test_fake_set_is_untrusted_close_to_trusted() {
        let sets = mine_domain_sets(DATASET.as_bytes(), DEFAULT_ROW_CAP).unwrap();
        // g00gle.com is within 0.75 of google.com; flapprice.com is not.
        assert_eq!(sets.fake, vec!["g00gle.com"]);
    }

    #[test]
    fn test_rows_without_urls_flag_are_ignored() {
        let sets = mine_domain_sets(DATASET.as_bytes(), DEFAULT_ROW_CAP).unwrap();
        assert!(!sets.untrusted.contains(&"evil.com".to_string()));
    }

    #[test]
    fn test_row_cap_limits_scan() {
        let sets = mine_domain_sets(DATASET.as_bytes(), 2).unwrap();
        assert_eq!(sets.trusted, vec!["google.com", "github.com"]);
        assert!(sets.untrusted.is_empty());
        assert!(sets.fake.is_empty());
    }

    #[test]
    fn test_empty_dataset_yields_empty_sets() {
        let sets = mine_domain_sets("label,urls,body\n".as_bytes(), DEFAULT_ROW_CAP).unwrap();
        assert!(sets.trusted.is_empty());
        assert!(sets.untrusted.is_empty());
        assert!(sets.fake.is_empty());
    }

    #[test]
    fn test_missing_column_is_loud() {
        let result = mine_domain_sets("label,body\n0,hello\n".as_bytes(), DEFAULT_ROW_CAP);
        match result {
            Err(DatasetError::MissingColumn(col)) => assert_eq!(col, "urls"),
            other => panic!("expected MissingColumn, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = mine_domain_sets_from_path("/nonexistent/dataset.csv", DEFAULT_ROW_CAP);
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }

    #[test]
    fn test_frequency_table_tie_break_is_first_seen() {
        let mut table = FrequencyTable::default();
        table.add("b.com");
        table.add("a.com");
        table.add("a.com");
        table.add("c.com");
        assert_eq!(table.top(3), vec!["a.com", "b.com", "c.com"]);
    }

    #[test]
    fn test_mine_token_corpus() {
        let data = "\
sender
alert@secure-login.net
billing@free-money.net
promo@free-casino.biz
";
        let corpus = mine_token_corpus(data.as_bytes()).unwrap();
        assert!(corpus.contains("net"));
        assert!(corpus.contains("free"));
        assert!(corpus.contains("casino"));
        assert!(!corpus.contains("gmail"));
        // net and free both occur twice and outrank single-occurrence tokens.
        assert_eq!(&corpus.tokens()[..2], &["net", "free"]);
    }

    #[test]
    fn test_token_corpus_without_sender_header_uses_first_column() {
        let data = "Column1\nuser@spam-mail.ru\n";
        let corpus = mine_token_corpus(data.as_bytes()).unwrap();
        assert!(corpus.contains("spam"));
        assert!(corpus.contains("ru"));
    }
}
