//! Association rule generation from frequent itemsets.
//!
//! Every frequent itemset `S` with at least two items is split into an
//! antecedent `X` and a consequent `S \ X` for each non-empty proper subset
//! mask of its positions. A rule is emitted when
//! `support(S) / support(X) >= min_confidence`.
//!
//! Masks are visited largest first, so a failing antecedent is always seen
//! before any of its subsets. With confidence pruning enabled, a failure
//! marks all smaller antecedents of the same itemset as rejected: they have
//! at least the support of `X` and therefore at most its confidence.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Config,
    itemset::{Item, Itemset},
    level::LevelSet,
    subsets::{SubsetScratch, proper_subset_masks},
    support::{RejectionCache, SupportIndex}
};

/// # Overview
///
/// An association rule `antecedent => consequent`.
///
/// The two sides are disjoint, non-empty, and their union is a frequent
/// itemset whose support count is `support`.
///
/// # Examples
///
/// ```
/// use apriori_rs::{AssociationRule, Itemset};
///
/// let rule = AssociationRule {
///     antecedent: Itemset::new([0, 1]),
///     consequent: Itemset::new([2]),
///     confidence: 2.0 / 3.0,
///     support:    2
/// };
///
/// let names = vec!["A".to_string(), "B".to_string(), "C".to_string()];
/// assert_eq!(rule.display_names(&names).to_string(), "{A, B} => {C} (confidence 66.7%)");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssociationRule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub confidence: f64,
    pub support:    u32
}

impl AssociationRule {
    /// # Overview
    ///
    /// The full itemset the rule was derived from.
    #[must_use]
    pub fn items(&self) -> Itemset {
        Itemset::new(
            self.antecedent
                .iter()
                .chain(self.consequent.iter())
                .copied()
        )
    }

    /// # Overview
    ///
    /// Formats the rule with item names.
    #[must_use]
    pub fn display_names<'a>(&'a self, names: &'a [String]) -> NamedRule<'a> {
        NamedRule {
            rule: self,
            names
        }
    }
}

impl fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} => {} (confidence {:.1}%)",
            self.antecedent,
            self.consequent,
            self.confidence * 100.0
        )
    }
}

/// Display adapter returned by [`AssociationRule::display_names`].
#[derive(Debug, Clone, Copy)]
pub struct NamedRule<'a> {
    rule:  &'a AssociationRule,
    names: &'a [String]
}

impl fmt::Display for NamedRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} => {} (confidence {:.1}%)",
            self.rule.antecedent.display_names(self.names),
            self.rule.consequent.display_names(self.names),
            self.rule.confidence * 100.0
        )
    }
}

/// # Overview
///
/// Confidence of `antecedent => full \ antecedent`:
/// `support(full) / support(antecedent)`.
///
/// # Panics
///
/// Panics if either support is missing from `index`. Both are frequent by
/// construction, so a miss is a bug in candidate generation.
#[inline]
#[must_use]
pub fn confidence(index: &SupportIndex, full: &[Item], antecedent: &[Item]) -> f64 {
    f64::from(index.support(full)) / f64::from(index.support(antecedent))
}

/// # Overview
///
/// Counters for one rule-generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleStats {
    /// Rules that met the confidence threshold.
    pub emitted:  usize,
    /// Splits evaluated and found below the threshold.
    pub rejected: usize,
    /// Splits skipped because their antecedent was already rejected.
    pub skipped:  usize
}

/// # Overview
///
/// Enumerates antecedent/consequent splits of frequent itemsets.
#[derive(Debug)]
pub struct RuleGenerator<'a> {
    index:          &'a SupportIndex,
    min_confidence: f64,
    pruning:        bool,
    rejections:     RejectionCache,
    scratch:        SubsetScratch,
    stats:          RuleStats
}

impl<'a> RuleGenerator<'a> {
    /// # Overview
    ///
    /// Creates a generator reading supports from `index`.
    #[must_use]
    pub fn new(index: &'a SupportIndex, config: &Config) -> Self {
        Self {
            index,
            min_confidence: config.min_confidence,
            pruning: config.confidence_pruning,
            rejections: RejectionCache::new(config.max_level),
            scratch: SubsetScratch::new(config.max_level),
            stats: RuleStats::default()
        }
    }

    #[inline]
    #[must_use]
    pub const fn stats(&self) -> RuleStats {
        self.stats
    }

    /// # Overview
    ///
    /// Generates rules for every itemset of size two or more, largest level
    /// first, itemsets in level order.
    pub fn generate(&mut self, levels: &[LevelSet]) -> Vec<AssociationRule> {
        let mut rules = Vec::new();
        for level in levels.iter().rev().filter(|l| l.size() >= 2) {
            for itemset in level.iter() {
                self.rules_for(itemset, &mut rules);
            }
        }
        debug!(
            emitted = self.stats.emitted,
            rejected = self.stats.rejected,
            skipped = self.stats.skipped,
            "rules generated"
        );
        rules
    }

    /// # Overview
    ///
    /// Appends the confident rules derivable from one frequent itemset.
    pub fn rules_for(&mut self, itemset: &[Item], out: &mut Vec<AssociationRule>) {
        let k = itemset.len();
        if k < 2 {
            return;
        }
        let support = self.index.support(itemset);
        self.rejections.clear();

        for mask in proper_subset_masks(k) {
            self.scratch.split(itemset, mask);
            let antecedent = &self.scratch.selected;

            if self.pruning && self.rejections.is_rejected(antecedent) {
                self.stats.skipped += 1;
                continue;
            }

            let conf = confidence(self.index, itemset, antecedent);
            if conf >= self.min_confidence {
                out.push(AssociationRule {
                    antecedent: antecedent.clone(),
                    consequent: self.scratch.rest.clone(),
                    confidence: conf,
                    support
                });
                self.stats.emitted += 1;
            } else {
                self.stats.rejected += 1;
                if self.pruning {
                    self.rejections.reject_subsets(antecedent);
                }
            }
        }
    }
}

/// # Overview
///
/// Generates all rules meeting `config.min_confidence` from mined levels.
pub fn generate_rules(levels: &[LevelSet], index: &SupportIndex, config: &Config) -> Vec<AssociationRule> {
    RuleGenerator::new(index, config).generate(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Miner, TransactionTable};

    fn abc() -> TransactionTable {
        let rows = vec![
            vec![1, 1, 0],
            vec![1, 1, 1],
            vec![1, 0, 1],
            vec![0, 1, 1],
            vec![1, 1, 1],
        ];
        TransactionTable::from_rows(&rows).unwrap()
    }

    fn config(min_confidence: f64, pruning: bool) -> Config {
        Config::builder()
            .min_support(0.4)
            .min_confidence(min_confidence)
            .confidence_pruning(pruning)
            .build()
            .unwrap()
    }

    fn find<'r>(rules: &'r [AssociationRule], ante: &[Item], cons: &[Item]) -> Option<&'r AssociationRule> {
        rules
            .iter()
            .find(|r| r.antecedent.as_slice() == ante && r.consequent.as_slice() == cons)
    }

    #[test]
    fn confidence_from_index() {
        let mut index = SupportIndex::new();
        index.put(Itemset::new([0, 1, 2]), 2);
        index.put(Itemset::new([0, 1]), 3);

        assert!((confidence(&index, &[0, 1, 2], &[0, 1]) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn emits_confident_rules_only() {
        let table = abc();
        let config = config(0.6, true);
        let frequent = Miner::new(&table, &config).mine().unwrap();
        let rules = generate_rules(frequent.levels(), frequent.index(), &config);

        let ab_c = find(&rules, &[0, 1], &[2]).unwrap();
        assert!((ab_c.confidence - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(ab_c.support, 2);

        // 2/4 = 0.5 < 0.6
        assert!(find(&rules, &[0], &[1, 2]).is_none());

        for rule in &rules {
            assert!(rule.confidence >= 0.6 && rule.confidence <= 1.0);
        }
    }

    #[test]
    fn failed_antecedent_prunes_its_subsets() {
        let table = abc();
        let config = config(0.6, true);
        let frequent = Miner::new(&table, &config).mine().unwrap();
        let mut generator = RuleGenerator::new(frequent.index(), &config);

        let mut rules = Vec::new();
        generator.rules_for(&[0, 1, 2], &mut rules);

        // 2-item antecedents pass at 2/3; every item occurs in 4 rows, so
        // {A}, {B} and {C} fail at 2/4
        assert_eq!(rules.len(), 3);
        let stats = generator.stats();
        assert_eq!(stats.emitted, 3);
        assert_eq!(stats.rejected, 3);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn pruning_skips_shrunk_antecedents() {
        // S = {0,1,2}: {0,1} occurs 4 times, S twice -> {0,1} fails at 0.6,
        // so {0} and {1} are skipped without a lookup
        let rows = vec![
            vec![1, 1, 1],
            vec![1, 1, 1],
            vec![1, 1, 0],
            vec![1, 1, 0],
            vec![0, 0, 1],
        ];
        let table = TransactionTable::from_rows(&rows).unwrap();
        let config = config(0.6, true);
        let frequent = Miner::new(&table, &config).mine().unwrap();
        let mut generator = RuleGenerator::new(frequent.index(), &config);

        let mut rules = Vec::new();
        generator.rules_for(&[0, 1, 2], &mut rules);

        assert!(generator.stats().skipped >= 2);
        assert!(find(&rules, &[0], &[1, 2]).is_none());
        assert!(find(&rules, &[1], &[0, 2]).is_none());
    }

    #[test]
    fn pruning_does_not_change_rules() {
        let table = abc();
        for min_conf in [0.3, 0.6, 0.7, 0.9, 1.0] {
            let with = config(min_conf, true);
            let without = config(min_conf, false);
            let frequent = Miner::new(&table, &with).mine().unwrap();

            let a = generate_rules(frequent.levels(), frequent.index(), &with);
            let b = generate_rules(frequent.levels(), frequent.index(), &without);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn largest_level_first() {
        let table = abc();
        let config = config(0.6, true);
        let frequent = Miner::new(&table, &config).mine().unwrap();
        let rules = generate_rules(frequent.levels(), frequent.index(), &config);

        assert_eq!(rules[0].items().len(), 3);
        assert_eq!(rules.last().unwrap().items().len(), 2);
    }

    #[test]
    fn singletons_produce_nothing() {
        let mut index = SupportIndex::new();
        index.put(Itemset::new([0]), 3);
        let config = config(0.5, true);
        let mut generator = RuleGenerator::new(&index, &config);
        let mut rules = Vec::new();

        generator.rules_for(&[0], &mut rules);
        assert!(rules.is_empty());
    }

    #[test]
    fn display_by_index() {
        let rule = AssociationRule {
            antecedent: Itemset::new([0]),
            consequent: Itemset::new([1, 2]),
            confidence: 0.5,
            support:    2
        };
        assert_eq!(rule.to_string(), "{0} => {1, 2} (confidence 50.0%)");
        assert_eq!(rule.items(), Itemset::new([0, 1, 2]));
    }
}
