//! Contiguous storage for the frequent itemsets of one level.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::itemset::{Item, Itemset};

/// # Overview
///
/// All frequent itemsets of a fixed size `k`, stored back to back in one
/// buffer with stride `k`.
///
/// Itemsets produced by self-join arrive in lexicographic order, so itemsets
/// sharing their first `k - 1` items sit next to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelSet {
    size:  usize,
    items: Vec<Item>
}

impl LevelSet {
    /// # Overview
    ///
    /// Creates an empty level of itemsets of size `size`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0);
        Self {
            size,
            items: Vec::new()
        }
    }

    /// # Overview
    ///
    /// Creates an empty level with room for `capacity` itemsets.
    #[must_use]
    pub fn with_capacity(size: usize, capacity: usize) -> Self {
        debug_assert!(size > 0);
        Self {
            size,
            items: Vec::with_capacity(size * capacity)
        }
    }

    /// Itemset size `k` of this level.
    #[inline(always)]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of itemsets.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len() / self.size
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// # Overview
    ///
    /// Items of the `index`-th itemset.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> &[Item] {
        &self.items[index * self.size..(index + 1) * self.size]
    }

    /// # Overview
    ///
    /// Appends a canonical itemset of this level's size.
    #[inline]
    pub fn push(&mut self, itemset: &[Item]) {
        debug_assert_eq!(itemset.len(), self.size);
        debug_assert!(crate::itemset::is_canonical(itemset));
        self.items.extend_from_slice(itemset);
    }

    /// # Overview
    ///
    /// Iterates over the itemsets as slices.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[Item]> + '_ {
        self.items.chunks_exact(self.size)
    }

    /// # Overview
    ///
    /// Copies the itemsets out as owned keys.
    #[must_use]
    pub fn to_itemsets(&self) -> Vec<Itemset> {
        self.iter().map(Itemset::from_sorted).collect()
    }

    /// # Overview
    ///
    /// Binary search; relies on lexicographic order.
    #[must_use]
    pub fn contains(&self, itemset: &[Item]) -> bool {
        if itemset.len() != self.size {
            return false;
        }
        let n = self.len();
        let (mut lo, mut hi) = (0, n);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.get(mid).cmp(itemset) {
                core::cmp::Ordering::Less => lo = mid + 1,
                core::cmp::Ordering::Greater => hi = mid,
                core::cmp::Ordering::Equal => return true
            }
        }
        false
    }

    /// # Overview
    ///
    /// True if the first `size - 1` items of itemsets `a` and `b` match.
    #[inline]
    #[must_use]
    pub fn shares_prefix(&self, a: usize, b: usize) -> bool {
        let prefix = self.size - 1;
        self.get(a)[..prefix] == self.get(b)[..prefix]
    }
}
