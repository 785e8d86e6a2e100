use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime configuration, loadable from YAML. Every field has a compiled-in
/// default so the tool runs without a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Static whitelist of trusted sender domains.
    #[serde(default = "default_trusted_domains")]
    pub trusted_domains: Vec<String>,

    /// Suspicious-word table for subject/body scoring.
    #[serde(default)]
    pub keywords: KeywordConfig,

    /// Labeled link dataset (CSV with label/urls/body columns).
    #[serde(default)]
    pub dataset_path: Option<String>,

    /// Known-suspicious sender addresses (CSV with a sender column).
    #[serde(default)]
    pub sender_corpus_path: Option<String>,

    /// How many dataset rows to scan when mining domain sets. A prefix scan
    /// trades tail coverage for startup time; raise it to mine everything.
    #[serde(default = "default_row_cap")]
    pub dataset_row_cap: usize,
}

/// Weighted suspicious-word scoring table. One table replaces the hardcoded
/// per-variant word lists; weights apply per occurrence, with body hits
/// inside the first `early_window` words weighted higher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    #[serde(default = "default_subject_weight")]
    pub subject_weight: u32,
    #[serde(default = "default_body_early_weight")]
    pub body_early_weight: u32,
    #[serde(default = "default_body_late_weight")]
    pub body_late_weight: u32,
    #[serde(default = "default_early_window")]
    pub early_window: usize,
    #[serde(default = "default_wordlist")]
    pub wordlist: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trusted_domains: default_trusted_domains(),
            keywords: KeywordConfig::default(),
            dataset_path: None,
            sender_corpus_path: None,
            dataset_row_cap: default_row_cap(),
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            subject_weight: default_subject_weight(),
            body_early_weight: default_body_early_weight(),
            body_late_weight: default_body_late_weight(),
            early_window: default_early_window(),
            wordlist: default_wordlist(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn default_trusted_domains() -> Vec<String> {
    [
        "gmail.com",
        "outlook.com",
        "yahoo.com",
        "hotmail.com",
        "mail.com",
        "edu.com",
        "gov.sg",
        "edu.sg",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_wordlist() -> Vec<String> {
    [
        "urgent", "verify", "password", "account", "rolex", "money", "love", "cnn", "replica",
        "bank", "debt", "casino",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_subject_weight() -> u32 {
    3
}

fn default_body_early_weight() -> u32 {
    2
}

fn default_body_late_weight() -> u32 {
    1
}

fn default_early_window() -> usize {
    20
}

fn default_row_cap() -> usize {
    crate::corpus::DEFAULT_ROW_CAP
}
