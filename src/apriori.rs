//! End-to-end driver: mine frequent itemsets, then derive rules.

use tracing::{info, warn};

use crate::{
    Config,
    error::Result,
    miner::{FrequentItemsets, LevelStats, Miner, SequentialCounter, SupportCounter},
    rules::{AssociationRule, RuleGenerator, RuleStats},
    table::TransactionTable
};

/// # Overview
///
/// Everything a mining run produces.
#[derive(Debug, Clone, Default)]
pub struct MiningResult {
    frequent:   FrequentItemsets,
    rules:      Vec<AssociationRule>,
    rule_stats: RuleStats,
    no_data:    bool
}

impl MiningResult {
    fn empty_input() -> Self {
        Self {
            no_data: true,
            ..Self::default()
        }
    }

    /// # Overview
    ///
    /// Rules in generation order: largest itemsets first, then itemset
    /// order, then largest antecedent mask first.
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    /// # Overview
    ///
    /// Consumes the result, keeping only the rules.
    #[must_use]
    pub fn into_rules(self) -> Vec<AssociationRule> {
        self.rules
    }

    #[inline]
    #[must_use]
    pub fn frequent_itemsets(&self) -> &FrequentItemsets {
        &self.frequent
    }

    /// # Overview
    ///
    /// Number of frequent itemsets per level, level 1 first.
    #[must_use]
    pub fn level_counts(&self) -> Vec<usize> {
        self.frequent.level_counts()
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> &[LevelStats] {
        self.frequent.stats()
    }

    #[inline]
    #[must_use]
    pub const fn rule_stats(&self) -> RuleStats {
        self.rule_stats
    }

    /// # Overview
    ///
    /// True if the input table had no rows or no columns.
    #[inline]
    #[must_use]
    pub const fn no_data(&self) -> bool {
        self.no_data
    }
}

/// # Overview
///
/// Validated mining configuration, ready to run on any number of tables.
/// Each run starts from fresh caches.
///
/// # Examples
///
/// ```
/// use apriori_rs::{Apriori, Config, TransactionTable};
///
/// let rows = vec![
///     vec![1, 1, 0],
///     vec![1, 1, 1],
///     vec![1, 0, 1],
///     vec![0, 1, 1],
///     vec![1, 1, 1],
/// ];
/// let names = vec!["A".into(), "B".into(), "C".into()];
/// let table = TransactionTable::new(&rows, names).unwrap();
///
/// let config = Config::builder()
///     .min_support(0.4)
///     .min_confidence(0.6)
///     .build()
///     .unwrap();
/// let result = Apriori::new(config).unwrap().run(&table).unwrap();
///
/// assert_eq!(result.level_counts(), vec![3, 3, 1]);
/// let first = &result.rules()[0];
/// assert_eq!(
///     first.display_names(table.names()).to_string(),
///     "{B, C} => {A} (confidence 66.7%)"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Apriori {
    config: Config
}

impl Apriori {
    /// # Overview
    ///
    /// Validates `config` before anything runs.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config
        })
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// # Overview
    ///
    /// Mines `table` and generates rules on the calling thread.
    ///
    /// An empty table is not an error: the result has no rules and
    /// [`MiningResult::no_data`] is set.
    pub fn run(&self, table: &TransactionTable) -> Result<MiningResult> {
        self.run_with(table, SequentialCounter)
    }

    /// # Overview
    ///
    /// Like [`Self::run`], with a custom support counting strategy.
    pub fn run_with<C: SupportCounter>(&self, table: &TransactionTable, counter: C) -> Result<MiningResult> {
        if table.is_empty() {
            warn!(
                rows = table.n_rows(),
                cols = table.n_cols(),
                "no data in transaction table"
            );
            return Ok(MiningResult::empty_input());
        }

        let frequent = Miner::with_counter(table, &self.config, counter).mine()?;
        let mut generator = RuleGenerator::new(frequent.index(), &self.config);
        let rules = generator.generate(frequent.levels());
        let rule_stats = generator.stats();
        info!(
            itemsets = frequent.len(),
            rules = rules.len(),
            "mining finished"
        );

        Ok(MiningResult {
            frequent,
            rules,
            rule_stats,
            no_data: false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn config() -> Config {
        Config::builder()
            .min_support(0.4)
            .min_confidence(0.6)
            .build()
            .unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut bad = config();
        bad.max_level = 0;
        assert_eq!(
            Apriori::new(bad).unwrap_err(),
            Error::InvalidMaxLevel {
                max_level: 0
            }
        );
    }

    #[test]
    fn empty_table_flags_no_data() {
        let apriori = Apriori::new(config()).unwrap();

        let no_rows = TransactionTable::from_rows(&[]).unwrap();
        let result = apriori.run(&no_rows).unwrap();
        assert!(result.no_data());
        assert!(result.rules().is_empty());
        assert!(result.level_counts().is_empty());

        let no_cols = TransactionTable::from_rows(&[vec![], vec![]]).unwrap();
        assert!(apriori.run(&no_cols).unwrap().no_data());
    }

    #[test]
    fn rule_stats_are_reported() {
        let rows = vec![
            vec![1, 1, 0],
            vec![1, 1, 1],
            vec![1, 0, 1],
            vec![0, 1, 1],
            vec![1, 1, 1],
        ];
        let table = TransactionTable::from_rows(&rows).unwrap();
        let result = Apriori::new(config()).unwrap().run(&table).unwrap();

        assert!(!result.no_data());
        assert_eq!(result.rule_stats().emitted, result.rules().len());
        assert_eq!(result.stats().len(), 3);
    }
}
