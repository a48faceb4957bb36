//! Mines association rules from a delimited transaction file.
//!
//! ```text
//! apriori groceries.csv 0.01 0.5 --max-level 4
//! ```

use std::{path::PathBuf, time::Instant};

use anyhow::Context;
use apriori_rs::{Apriori, AssociationRule, Config, DEFAULT_MAX_LEVEL, TransactionTable};
use clap::Parser;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

const DEFAULT_MIN_SUPPORT: f64 = 0.005;
const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Parser)]
#[command(name = "apriori", version, about = "Frequent itemsets and association rules")]
struct Cli {
    /// Transaction file: header row of item names, one row per transaction,
    /// a non-empty cell marks the item as present
    csv: PathBuf,

    /// Minimum support as a fraction of all transactions
    #[arg(requires = "min_confidence")]
    min_support: Option<f64>,

    /// Minimum confidence of a printed rule
    min_confidence: Option<f64>,

    /// Largest itemset size to search
    #[arg(long, default_value_t = DEFAULT_MAX_LEVEL)]
    max_level: usize,

    /// Count supports on all cores
    #[arg(long)]
    parallel: bool
}

impl Cli {
    /// Thresholds from the command line, or the defaults when omitted. The
    /// flag is true when the defaults were used.
    fn thresholds(&self) -> (f64, f64, bool) {
        match (self.min_support, self.min_confidence) {
            (Some(s), Some(c)) => (s, c, false),
            _ => (DEFAULT_MIN_SUPPORT, DEFAULT_MIN_CONFIDENCE, true)
        }
    }
}

/// Warnings only, unless `directives` (the `RUST_LOG` value) says otherwise.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

fn main() -> anyhow::Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(&directives))
        .init();

    let cli = Cli::parse();

    let (min_support, min_confidence, defaulted) = cli.thresholds();
    if defaulted {
        eprintln!(
            "No minimum support and confidence provided; using defaults \
             {DEFAULT_MIN_SUPPORT:.3} and {DEFAULT_MIN_CONFIDENCE:.1}\n"
        );
    }

    let config = Config::builder()
        .min_support(min_support)
        .min_confidence(min_confidence)
        .max_level(cli.max_level)
        .build()
        .context("invalid thresholds")?;
    let apriori = Apriori::new(config)?;

    let started = Instant::now();
    let table = TransactionTable::open_csv(&cli.csv)
        .with_context(|| format!("reading {}", cli.csv.display()))?;

    let result = if cli.parallel {
        apriori.run_parallel(&table)?
    } else {
        apriori.run(&table)?
    };

    for (level, count) in result.level_counts().iter().enumerate() {
        println!("Size of large itemsets l({}) {count}", level + 1);
    }
    println!();
    for rule in result.rules() {
        println!("{}", format_rule(rule, table.names()));
    }

    println!("\nExecution took {:.6} sec.", started.elapsed().as_secs_f64());
    Ok(())
}

/// One aligned line per rule: `{A, B}   => {C}   Confidence: 66.7`.
fn format_rule(rule: &AssociationRule, names: &[String]) -> String {
    let left = rule.antecedent.display_names(names).to_string();
    let right = rule.consequent.display_names(names).to_string();
    format!(
        "{left:<61} => {right:<31}Confidence: {:.1}",
        rule.confidence * 100.0
    )
}
