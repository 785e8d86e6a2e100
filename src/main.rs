use anyhow::Context;
use clap::{Arg, Command};
use log::LevelFilter;
use phish_triage::analyzer::RiskAnalyzer;
use phish_triage::config::Config;
use phish_triage::corpus::{self, DomainSets, TokenCorpus};
use std::io::Write;

fn main() -> anyhow::Result<()> {
    let matches = Command::new("phish-triage")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic phishing triage for email messages")
        .long_about(
            "Scores an email on three independent signals (sender domain \
             trustworthiness, suspicious language in subject/body, and embedded \
             link trustworthiness) and combines them into a single verdict. \
             Domain lists are mined from a labeled dataset when one is \
             configured; otherwise small built-in lists are used.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("phish-triage.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write a default configuration file and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("dataset")
                .long("dataset")
                .value_name("FILE")
                .help("Labeled link dataset CSV (overrides config)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("sender-corpus")
                .long("sender-corpus")
                .value_name("FILE")
                .help("Known-suspicious sender CSV (overrides config)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("sender")
                .long("sender")
                .value_name("ADDRESS")
                .help("Sender email address (prompted for if omitted)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("subject")
                .long("subject")
                .value_name("TEXT")
                .help("Email subject (prompted for if omitted)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("body")
                .long("body")
                .value_name("TEXT")
                .help("Email body (prompted for if omitted)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit the verdict as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        Config::default()
            .save_to_file(path)
            .map_err(|e| anyhow::anyhow!("writing configuration to {}: {}", path, e))?;
        println!("Wrote default configuration to {}", path);
        return Ok(());
    }

    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = if std::path::Path::new(config_path).exists() {
        Config::load_from_file(config_path)
            .map_err(|e| anyhow::anyhow!("loading configuration from {}: {}", config_path, e))?
    } else {
        log::debug!("no config file at {}, using defaults", config_path);
        Config::default()
    };

    if let Some(path) = matches.get_one::<String>("dataset") {
        config.dataset_path = Some(path.clone());
    }
    if let Some(path) = matches.get_one::<String>("sender-corpus") {
        config.sender_corpus_path = Some(path.clone());
    }

    let domain_sets = load_domain_sets(&config);
    let token_corpus = load_token_corpus(&config);
    let analyzer = RiskAnalyzer::new(&config, domain_sets, token_corpus);

    let sender = field_or_prompt(&matches, "sender", "Enter sender email address: ");
    let subject = field_or_prompt(&matches, "subject", "Enter email subject: ");
    let body = field_or_prompt(&matches, "body", "Enter email body: ");

    let report = analyzer.analyze(&sender, &subject, &body);

    if matches.get_flag("json") {
        let json =
            serde_json::to_string_pretty(&report).context("serializing triage report")?;
        println!("{}", json);
    } else {
        println!("Sender risk: {}/5", report.sender.score);
        if !report.sender.reason.is_empty() {
            println!("  {}", report.sender.reason);
        }
        println!("Text risk:   {}/5", report.text.score);
        if !report.text.reason.is_empty() {
            println!("  {}", report.text.reason);
        }
        println!("Link risk:   {}/5", report.links.score);
        if !report.links.reason.is_empty() {
            println!("  {}", report.links.reason);
        }
        println!(
            "Overall:     {:.2} ({})",
            report.overall_score, report.risk_level
        );
    }

    Ok(())
}

/// Mine domain sets from the configured dataset, falling back to small
/// built-in lists when no dataset is configured or mining fails. Fallback is
/// front-end policy; the miner itself always fails loudly.
fn load_domain_sets(config: &Config) -> DomainSets {
    match &config.dataset_path {
        Some(path) => match corpus::mine_domain_sets_from_path(path, config.dataset_row_cap) {
            Ok(sets) => sets,
            Err(e) => {
                log::warn!("could not mine domain sets from {}: {}; using built-in lists", path, e);
                builtin_domain_sets()
            }
        },
        None => {
            log::info!("no dataset configured, using built-in domain lists");
            builtin_domain_sets()
        }
    }
}

fn load_token_corpus(config: &Config) -> TokenCorpus {
    match &config.sender_corpus_path {
        Some(path) => match corpus::mine_token_corpus_from_path(path) {
            Ok(corpus) => corpus,
            Err(e) => {
                log::warn!("could not mine sender tokens from {}: {}", path, e);
                TokenCorpus::default()
            }
        },
        None => TokenCorpus::default(),
    }
}

fn builtin_domain_sets() -> DomainSets {
    DomainSets {
        trusted: vec![
            "google.com".to_string(),
            "youtube.com".to_string(),
            "microsoft.com".to_string(),
            "linkedin.com".to_string(),
            "paypal.com".to_string(),
        ],
        untrusted: vec![
            "flapprice.com".to_string(),
            "milddear.com".to_string(),
            "fetessteersit.com".to_string(),
        ],
        fake: vec![
            "goggle.com".to_string(),
            "micros0ft.com".to_string(),
            "secure-paypal-login.com".to_string(),
            "paypa1.com".to_string(),
        ],
    }
}

fn field_or_prompt(matches: &clap::ArgMatches, id: &str, prompt: &str) -> String {
    if let Some(value) = matches.get_one::<String>(id) {
        return value.clone();
    }
    print!("{}", prompt);
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim_end_matches(['\r', '\n']).to_string()
}
