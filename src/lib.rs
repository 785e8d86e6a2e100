pub mod analyzer;
pub mod config;
pub mod corpus;
pub mod domain_utils;
pub mod extractor;
pub mod similarity;

pub use analyzer::{RiskAnalyzer, RiskLevel, ScoreReport, TriageReport, MAX_SCORE};
pub use config::{Config, KeywordConfig};
pub use corpus::{
    mine_domain_sets, mine_domain_sets_from_path, mine_token_corpus, mine_token_corpus_from_path,
    DatasetError, DomainSets, TokenCorpus,
};
pub use domain_utils::DomainUtils;
pub use extractor::LinkExtractor;
