//! Support cache and rule-rejection cache.
//!
//! The two caches share a key type but never a map. Support entries are facts
//! about the table ("this itemset occurs in n rows"). Rejection entries are
//! facts about one rule-generation pass ("this antecedent cannot produce a
//! confident rule for the itemset being expanded"). Keeping them apart means
//! a rejected antecedent can never hide a genuine support count.

use std::collections::{HashMap, HashSet};

use crate::{
    itemset::{Item, Itemset},
    subsets::{SubsetScratch, proper_subset_masks}
};

/// # Overview
///
/// Maps each frequent itemset to its exact support count.
///
/// Populated level by level during mining, read during rule generation.
///
/// # Examples
///
/// ```
/// use apriori_rs::{Itemset, SupportIndex};
///
/// let mut index = SupportIndex::new();
/// index.put(Itemset::new([0, 2]), 3);
///
/// assert_eq!(index.get(&[0, 2]), Some(3));
/// assert_eq!(index.get(&[0, 1]), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SupportIndex {
    counts: HashMap<Itemset, u32>
}

impl SupportIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Overview
    ///
    /// Creates an index expecting about `capacity` frequent itemsets.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: HashMap::with_capacity(capacity)
        }
    }

    /// # Overview
    ///
    /// Inserts or overwrites the support of `itemset`.
    #[inline]
    pub fn put(&mut self, itemset: Itemset, count: u32) {
        self.counts.insert(itemset, count);
    }

    /// # Overview
    ///
    /// Support of a canonical itemset, if it is known to be frequent.
    #[inline]
    #[must_use]
    pub fn get(&self, itemset: &[Item]) -> Option<u32> {
        self.counts.get(itemset).copied()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, itemset: &[Item]) -> bool {
        self.counts.contains_key(itemset)
    }

    /// # Overview
    ///
    /// Support of an itemset that must already be known.
    ///
    /// # Panics
    ///
    /// Panics if the itemset was never admitted. Every antecedent examined
    /// by rule generation is a subset of a frequent itemset and so was
    /// admitted at a lower level; a miss means candidate generation is
    /// broken, and substituting zero would corrupt confidences.
    #[inline]
    #[must_use]
    pub fn support(&self, itemset: &[Item]) -> u32 {
        match self.get(itemset) {
            Some(count) => count,
            None => panic!("support of {itemset:?} was never computed")
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// # Overview
    ///
    /// Iterates over all `(itemset, support)` entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Itemset, u32)> + '_ {
        self.counts.iter().map(|(k, &v)| (k, v))
    }
}

/// # Overview
///
/// Antecedents already known to fail the confidence threshold for the
/// itemset currently being expanded into rules.
///
/// If `X => S \ X` is below threshold then so is `X' => S \ X'` for every
/// non-empty `X' ⊂ X`, because `support(X') >= support(X)`. Marking all such
/// `X'` lets rule generation skip them without a lookup.
#[derive(Debug, Clone)]
pub struct RejectionCache {
    rejected: HashSet<Itemset>,
    scratch:  SubsetScratch
}

impl RejectionCache {
    #[must_use]
    pub fn new(max_level: usize) -> Self {
        Self {
            rejected: HashSet::new(),
            scratch:  SubsetScratch::new(max_level)
        }
    }

    /// # Overview
    ///
    /// Forgets all rejections. Call before expanding the next itemset.
    #[inline]
    pub fn clear(&mut self) {
        self.rejected.clear();
    }

    #[inline]
    #[must_use]
    pub fn is_rejected(&self, antecedent: &[Item]) -> bool {
        self.rejected.contains(antecedent)
    }

    /// # Overview
    ///
    /// Marks every non-empty proper subset of `antecedent` as rejected.
    /// Returns how many new entries were added.
    pub fn reject_subsets(&mut self, antecedent: &[Item]) -> usize {
        let mut added = 0;

        for mask in proper_subset_masks(antecedent.len()) {
            self.scratch.split(antecedent, mask);
            if self.rejected.contains(self.scratch.selected.as_slice()) {
                continue;
            }
            self.rejected.insert(self.scratch.selected.clone());
            added += 1;
        }
        added
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rejected.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rejected.is_empty()
    }
}
