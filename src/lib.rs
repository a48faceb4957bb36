//! # Apriori
//!
//! Level-wise frequent itemset mining and association rule generation.
//!
//! Given a boolean transaction table (rows are transactions, columns are
//! items), the miner finds every itemset whose support reaches a minimum
//! fraction of the rows, then derives rules `X => Y` whose confidence
//! `support(X ∪ Y) / support(X)` reaches a minimum threshold.
//!
//! # Features
//!
//! - `serde`: Serialization support for configs, itemsets, levels and rules
//! - `parallel`: Parallel support counting via rayon
//! - `cli`: The `apriori` command-line binary
//!
//! # Examples
//!
//! ```
//! use apriori_rs::{Apriori, Config, TransactionTable};
//!
//! let csv = "bread,milk,eggs\nx,x,\nx,x,x\nx,,x\n,x,x\nx,x,x\n";
//! let table = TransactionTable::read_csv(csv.as_bytes()).unwrap();
//!
//! let config = Config::builder()
//!     .min_support(0.4)
//!     .min_confidence(0.6)
//!     .build()
//!     .unwrap();
//!
//! let result = Apriori::new(config).unwrap().run(&table).unwrap();
//!
//! for rule in result.rules() {
//!     println!("{}", rule.display_names(table.names()));
//! }
//! ```

mod apriori;
mod config;
pub mod error;
mod itemset;
mod level;
mod miner;
mod rules;
pub mod subsets;
mod support;
mod table;
pub mod utils;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use apriori::{Apriori, MiningResult};
pub use config::{Config, ConfigBuilder, DEFAULT_MAX_LEVEL};
pub use error::{Error, Result};
pub use itemset::{Item, Itemset, NamedItems};
pub use level::LevelSet;
pub use miner::{
    FrequentItemsets, LevelStats, Miner, SequentialCounter, SupportCounter, all_subsets_frequent
};
pub use rules::{AssociationRule, NamedRule, RuleGenerator, RuleStats, confidence, generate_rules};
pub use support::{RejectionCache, SupportIndex};
pub use table::{ItemMask, TransactionTable};
