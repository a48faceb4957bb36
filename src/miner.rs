//! Level-wise frequent itemset search.
//!
//! # Algorithm
//!
//! ```text
//! level 1:  every single item ──count──► admitted if support >= min_rows
//!              │
//!              ▼
//! level k:  self-join level k-1 ──► (k-1)-subset check ──► count ──► admit
//!              │                        (support pruning)
//!              ▼
//!           stop when a level admits nothing or k reaches max_level
//! ```
//!
//! Self-join pairs two itemsets `A < B` of level `k-1` that agree on their
//! first `k-2` items and appends `B`'s last item to `A`. Levels are kept in
//! lexicographic order, so the partners of `A` form a contiguous run right
//! after it and the scan for `A` stops at the first prefix mismatch. The
//! join never produces a duplicate and its output stays sorted.
//!
//! Candidates of one level are generated and subset-checked first, then
//! counted through a [`SupportCounter`], then admitted in generation order.
//! Level `k` is fully inserted into the [`SupportIndex`] before level `k+1`
//! is generated.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Config,
    error::{Error, Result},
    itemset::{Item, Itemset},
    level::LevelSet,
    subsets::drop_one,
    support::SupportIndex,
    table::TransactionTable
};

/// # Overview
///
/// Computes supports for one level's candidates.
///
/// Implementations may stop counting early for a candidate once it cannot
/// reach `min_rows`, but must return the exact count for every candidate
/// that does. The result is parallel to `candidates`.
pub trait SupportCounter {
    fn count(
        &self,
        table: &TransactionTable,
        candidates: &[Itemset],
        min_rows: u32
    ) -> Vec<Option<u32>>;
}

/// # Overview
///
/// Counts candidates one after another on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialCounter;

impl SupportCounter for SequentialCounter {
    fn count(
        &self,
        table: &TransactionTable,
        candidates: &[Itemset],
        min_rows: u32
    ) -> Vec<Option<u32>> {
        candidates
            .iter()
            .map(|c| table.count_support_bounded(c, min_rows))
            .collect()
    }
}

/// # Overview
///
/// Diagnostics for one level of the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelStats {
    /// Itemset size.
    pub level:      usize,
    /// Raw candidates produced by self-join (all items at level 1).
    pub candidates: usize,
    /// Candidates discarded because a (k-1)-subset was not frequent.
    pub pruned:     usize,
    /// Candidates admitted.
    pub frequent:   usize
}

/// # Overview
///
/// Output of the level-wise search: the frequent itemsets of every level and
/// their supports.
#[derive(Debug, Clone, Default)]
pub struct FrequentItemsets {
    levels:           Vec<LevelSet>,
    index:            SupportIndex,
    stats:            Vec<LevelStats>,
    min_support_rows: u32
}

impl FrequentItemsets {
    fn empty(min_support_rows: u32) -> Self {
        Self {
            min_support_rows,
            ..Self::default()
        }
    }

    /// # Overview
    ///
    /// Non-empty levels, level 1 first. `levels()[i]` holds itemsets of size
    /// `i + 1`.
    #[inline]
    #[must_use]
    pub fn levels(&self) -> &[LevelSet] {
        &self.levels
    }

    /// # Overview
    ///
    /// Frequent itemsets of size `k`, if any were found.
    #[must_use]
    pub fn level(&self, k: usize) -> Option<&LevelSet> {
        k.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> &SupportIndex {
        &self.index
    }

    /// # Overview
    ///
    /// Support of a canonical itemset if it is frequent.
    #[inline]
    #[must_use]
    pub fn support(&self, itemset: &[Item]) -> Option<u32> {
        self.index.get(itemset)
    }

    /// # Overview
    ///
    /// Per-level diagnostics, including the final level that admitted
    /// nothing.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> &[LevelStats] {
        &self.stats
    }

    /// # Overview
    ///
    /// Number of frequent itemsets per non-empty level.
    #[must_use]
    pub fn level_counts(&self) -> Vec<usize> {
        self.levels.iter().map(LevelSet::len).collect()
    }

    #[inline]
    #[must_use]
    pub const fn min_support_rows(&self) -> u32 {
        self.min_support_rows
    }

    /// Total number of frequent itemsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.iter().map(LevelSet::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// # Overview
    ///
    /// Iterates over `(itemset, support)` level by level.
    pub fn iter(&self) -> impl Iterator<Item = (&[Item], u32)> + '_ {
        self.levels
            .iter()
            .flat_map(LevelSet::iter)
            .map(|set| (set, self.index.support(set)))
    }
}

/// # Overview
///
/// Level-wise search over a transaction table.
///
/// # Examples
///
/// ```
/// use apriori_rs::{Config, Miner, TransactionTable};
///
/// let rows = vec![
///     vec![1, 1, 0],
///     vec![1, 1, 1],
///     vec![1, 0, 1],
///     vec![0, 1, 1],
///     vec![1, 1, 1],
/// ];
/// let table = TransactionTable::from_rows(&rows).unwrap();
/// let config = Config::builder()
///     .min_support(0.6)
///     .min_confidence(0.5)
///     .build()
///     .unwrap();
///
/// // 3 of 5 rows: every item and pair, but not the triple (2 rows)
/// let frequent = Miner::new(&table, &config).mine().unwrap();
///
/// assert_eq!(frequent.level_counts(), vec![3, 3]);
/// assert_eq!(frequent.support(&[0, 1]), Some(3));
/// ```
#[derive(Debug)]
pub struct Miner<'a, C = SequentialCounter> {
    table:   &'a TransactionTable,
    config:  &'a Config,
    counter: C
}

impl<'a> Miner<'a, SequentialCounter> {
    /// # Overview
    ///
    /// Creates a miner that counts supports sequentially.
    #[must_use]
    pub fn new(table: &'a TransactionTable, config: &'a Config) -> Self {
        Self::with_counter(table, config, SequentialCounter)
    }
}

impl<'a, C: SupportCounter> Miner<'a, C> {
    /// # Overview
    ///
    /// Creates a miner with a custom support counting strategy.
    #[must_use]
    pub fn with_counter(table: &'a TransactionTable, config: &'a Config, counter: C) -> Self {
        Self {
            table,
            config,
            counter
        }
    }

    /// # Overview
    ///
    /// Runs the search up to `config.max_level`.
    ///
    /// An empty table yields an empty result. Fails with
    /// [`Error::ResourceExhausted`] if a level generates more candidates than
    /// `config.max_candidates` or the candidate buffer cannot grow.
    pub fn mine(&self) -> Result<FrequentItemsets> {
        let min_rows = self.config.min_support_rows(self.table.n_rows());
        let mut result = FrequentItemsets::empty(min_rows);
        if self.table.is_empty() {
            return Ok(result);
        }

        let (first, stats) = self.first_level(&mut result.index, min_rows)?;
        result.stats.push(stats);
        if first.is_empty() {
            return Ok(result);
        }
        result.levels.push(first);

        loop {
            let Some(prev) = result.levels.last() else {
                break;
            };
            if prev.size() >= self.config.max_level || prev.len() < 2 {
                break;
            }
            let (next, stats) = self.next_level(prev, &mut result.index, min_rows)?;
            result.stats.push(stats);
            if next.is_empty() {
                break;
            }
            result.levels.push(next);
        }

        Ok(result)
    }

    fn first_level(&self, index: &mut SupportIndex, min_rows: u32) -> Result<(LevelSet, LevelStats)> {
        let n_cols = self.table.n_cols();
        if self.config.max_candidates.is_some_and(|limit| n_cols > limit) {
            return Err(Error::ResourceExhausted {
                level:      1,
                candidates: n_cols
            });
        }
        let mut candidates = Vec::new();
        reserve(&mut candidates, n_cols, 1)?;
        candidates.extend((0..n_cols).map(|item| Itemset::from_sorted(&[item])));

        Ok(self.admit(1, candidates, 0, index, min_rows))
    }

    fn next_level(
        &self,
        prev: &LevelSet,
        index: &mut SupportIndex,
        min_rows: u32
    ) -> Result<(LevelSet, LevelStats)> {
        let k = prev.size() + 1;
        let (candidates, pruned) = self.join(prev, index)?;
        Ok(self.admit(k, candidates, pruned, index, min_rows))
    }

    /// Self-join of `prev` with the support anti-monotonicity check. Returns
    /// the surviving candidates and how many were pruned.
    fn join(&self, prev: &LevelSet, index: &SupportIndex) -> Result<(Vec<Itemset>, usize)> {
        let k = prev.size() + 1;
        let n = prev.len();
        let mut candidates = Vec::new();
        let mut candidate = Itemset::with_capacity(k);
        let mut subset = Itemset::with_capacity(k);
        let mut raw = 0usize;
        let mut pruned = 0usize;

        for a in 0..n {
            let left = prev.get(a);
            for b in (a + 1)..n {
                if !prev.shares_prefix(a, b) {
                    break;
                }
                let last = prev.get(b)[k - 2];
                debug_assert!(left[k - 2] < last);

                raw += 1;
                if self.config.max_candidates.is_some_and(|limit| raw > limit) {
                    return Err(Error::ResourceExhausted {
                        level:      k,
                        candidates: raw
                    });
                }

                candidate.clear();
                for &item in left {
                    candidate.push_sorted(item);
                }
                candidate.push_sorted(last);

                if self.config.support_pruning
                    && !all_subsets_frequent(&candidate, index, &mut subset)
                {
                    pruned += 1;
                    continue;
                }

                reserve(&mut candidates, 1, k)?;
                candidates.push(candidate.clone());
            }
        }

        Ok((candidates, pruned))
    }

    fn admit(
        &self,
        k: usize,
        candidates: Vec<Itemset>,
        pruned: usize,
        index: &mut SupportIndex,
        min_rows: u32
    ) -> (LevelSet, LevelStats) {
        let counts = self.counter.count(self.table, &candidates, min_rows);
        debug_assert_eq!(counts.len(), candidates.len());

        let mut level = LevelSet::new(k);
        let counted = candidates.len();
        for (candidate, count) in candidates.into_iter().zip(counts) {
            if let Some(count) = count {
                level.push(&candidate);
                index.put(candidate, count);
            }
        }

        let stats = LevelStats {
            level: k,
            candidates: counted + pruned,
            pruned,
            frequent: level.len()
        };
        debug!(level = k, candidates = stats.candidates, pruned, counted, "level searched");
        info!(level = k, frequent = stats.frequent, "frequent itemsets");

        (level, stats)
    }
}

/// # Overview
///
/// True if every subset of `candidate` with one item removed is in `index`.
///
/// By the Apriori property, a candidate with an infrequent (k-1)-subset
/// cannot be frequent.
#[must_use]
pub fn all_subsets_frequent(candidate: &[Item], index: &SupportIndex, subset: &mut Itemset) -> bool {
    (0..candidate.len()).all(|pos| {
        drop_one(candidate, pos, subset);
        index.contains(subset)
    })
}

fn reserve(candidates: &mut Vec<Itemset>, additional: usize, level: usize) -> Result<()> {
    candidates
        .try_reserve(additional)
        .map_err(|_| Error::ResourceExhausted {
            level,
            candidates: candidates.len() + additional
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min_support: f64) -> Config {
        Config::builder()
            .min_support(min_support)
            .min_confidence(0.6)
            .build()
            .unwrap()
    }

    fn abc() -> TransactionTable {
        let rows = vec![
            vec![1, 1, 0],
            vec![1, 1, 1],
            vec![1, 0, 1],
            vec![0, 1, 1],
            vec![1, 1, 1],
        ];
        let names = vec!["A".into(), "B".into(), "C".into()];
        TransactionTable::new(&rows, names).unwrap()
    }

    #[test]
    fn mines_every_level() {
        let table = abc();
        let config = config(0.4);
        let frequent = Miner::new(&table, &config).mine().unwrap();

        assert_eq!(frequent.min_support_rows(), 2);
        assert_eq!(frequent.level_counts(), vec![3, 3, 1]);
        assert_eq!(frequent.support(&[0]), Some(4));
        assert_eq!(frequent.support(&[1]), Some(4));
        assert_eq!(frequent.support(&[2]), Some(4));
        assert_eq!(frequent.support(&[0, 1]), Some(3));
        assert_eq!(frequent.support(&[0, 2]), Some(3));
        assert_eq!(frequent.support(&[1, 2]), Some(3));
        assert_eq!(frequent.support(&[0, 1, 2]), Some(2));
        assert_eq!(frequent.len(), 7);
    }

    #[test]
    fn join_keeps_lexicographic_order() {
        let table = abc();
        let config = config(0.4);
        let frequent = Miner::new(&table, &config).mine().unwrap();
        let pairs = frequent.level(2).unwrap();

        assert_eq!(pairs.get(0), &[0, 1]);
        assert_eq!(pairs.get(1), &[0, 2]);
        assert_eq!(pairs.get(2), &[1, 2]);
    }

    #[test]
    fn stops_at_max_level() {
        let table = abc();
        let config = Config::builder()
            .min_support(0.4)
            .min_confidence(0.6)
            .max_level(2)
            .build()
            .unwrap();
        let frequent = Miner::new(&table, &config).mine().unwrap();

        assert_eq!(frequent.level_counts(), vec![3, 3]);
        assert!(frequent.level(3).is_none());
    }

    #[test]
    fn stops_when_level_is_empty() {
        let table = abc();
        let config = config(0.6);
        let frequent = Miner::new(&table, &config).mine().unwrap();

        // min_rows = 3: {A,B},{A,C},{B,C} have 3, {A,B,C} has 2
        assert_eq!(frequent.level_counts(), vec![3, 3]);
        let last = frequent.stats().last().unwrap();
        assert_eq!(last.level, 3);
        assert_eq!(last.frequent, 0);
    }

    #[test]
    fn support_pruning_skips_counting() {
        // {0,1}, {0,2} frequent but {1,2} is not: {0,1,2} is pruned unseen
        let rows = vec![
            vec![1, 1, 0],
            vec![1, 1, 0],
            vec![1, 0, 1],
            vec![1, 0, 1],
            vec![0, 1, 1],
        ];
        let table = TransactionTable::from_rows(&rows).unwrap();
        let config = config(0.4);
        let frequent = Miner::new(&table, &config).mine().unwrap();

        assert_eq!(frequent.level_counts(), vec![3, 2]);
        let third = frequent.stats()[2];
        assert_eq!(third.candidates, 1);
        assert_eq!(third.pruned, 1);
        assert_eq!(third.frequent, 0);
    }

    #[test]
    fn candidate_limit_is_a_resource_error() {
        let rows = vec![vec![1u8; 6]; 4];
        let table = TransactionTable::from_rows(&rows).unwrap();
        let config = Config::builder()
            .min_support(0.5)
            .min_confidence(0.5)
            .max_candidates(10)
            .build()
            .unwrap();

        // 6 items -> 15 pairs at level 2
        let err = Miner::new(&table, &config).mine().unwrap_err();
        assert_eq!(
            err,
            Error::ResourceExhausted {
                level:      2,
                candidates: 11
            }
        );
    }

    #[test]
    fn empty_table_yields_nothing() {
        let table = TransactionTable::from_rows(&[]).unwrap();
        let config = config(0.5);
        let frequent = Miner::new(&table, &config).mine().unwrap();

        assert!(frequent.is_empty());
        assert!(frequent.stats().is_empty());
    }

    #[test]
    fn no_frequent_items() {
        let rows = vec![vec![1, 0], vec![0, 1], vec![0, 0]];
        let table = TransactionTable::from_rows(&rows).unwrap();
        let config = config(0.9);
        let frequent = Miner::new(&table, &config).mine().unwrap();

        assert!(frequent.is_empty());
        assert_eq!(frequent.stats().len(), 1);
    }

    #[test]
    fn subset_check() {
        let mut index = SupportIndex::new();
        index.put(Itemset::new([0, 1]), 2);
        index.put(Itemset::new([0, 2]), 2);
        let mut scratch = Itemset::with_capacity(3);

        assert!(!all_subsets_frequent(&[0, 1, 2], &index, &mut scratch));
        index.put(Itemset::new([1, 2]), 2);
        assert!(all_subsets_frequent(&[0, 1, 2], &index, &mut scratch));
    }

    #[test]
    fn iter_reports_supports() {
        let table = abc();
        let config = config(0.4);
        let frequent = Miner::new(&table, &config).mine().unwrap();
        let all: Vec<(Vec<Item>, u32)> = frequent.iter().map(|(s, n)| (s.to_vec(), n)).collect();

        assert_eq!(all.len(), 7);
        assert_eq!(all[0], (vec![0], 4));
        assert_eq!(all[6], (vec![0, 1, 2], 2));
    }
}
