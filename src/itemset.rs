//! Canonical itemset keys.

use core::{borrow::Borrow, fmt, ops::Deref};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Column index of an item in the transaction table.
pub type Item = usize;

/// Inline capacity. Itemsets are bounded by the configured maximum level
/// (default 5), so they practically never spill to the heap.
const INLINE_CAPACITY: usize = 8;

/// # Overview
///
/// A set of items in canonical form: strictly increasing column indices.
///
/// Two itemsets with the same members compare and hash identically no matter
/// how they were built. `Itemset` borrows as `[Item]`, so hash maps keyed by
/// itemsets can be queried with a plain slice.
///
/// # Examples
///
/// ```
/// use apriori_rs::Itemset;
///
/// let a = Itemset::new([3, 1, 2, 1]);
/// let b = Itemset::new([1, 2, 3]);
///
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "{1, 2, 3}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Itemset(SmallVec<[Item; INLINE_CAPACITY]>);

impl Itemset {
    /// # Overview
    ///
    /// Builds the canonical form of `items` (sorted, duplicates removed).
    pub fn new<I: IntoIterator<Item = Item>>(items: I) -> Self {
        let mut inner: SmallVec<[Item; INLINE_CAPACITY]> = items.into_iter().collect();
        inner.sort_unstable();
        inner.dedup();
        Self(inner)
    }

    /// # Overview
    ///
    /// Wraps an already strictly increasing slice without re-sorting.
    #[inline]
    #[must_use]
    pub fn from_sorted(items: &[Item]) -> Self {
        debug_assert!(is_canonical(items), "itemset not canonical: {items:?}");
        Self(SmallVec::from_slice(items))
    }

    /// # Overview
    ///
    /// Empty itemset with room for `capacity` items.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(SmallVec::with_capacity(capacity))
    }

    #[inline(always)]
    #[must_use]
    pub fn as_slice(&self) -> &[Item] {
        &self.0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// # Overview
    ///
    /// Appends an item greater than every current member.
    #[inline]
    pub fn push_sorted(&mut self, item: Item) {
        debug_assert!(self.0.last().is_none_or(|&last| last < item));
        self.0.push(item);
    }

    /// # Overview
    ///
    /// Returns true if every member of `self` is in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &[Item]) -> bool {
        self.0.iter().all(|item| other.binary_search(item).is_ok())
    }

    /// # Overview
    ///
    /// Formats the itemset with item names instead of indices.
    #[must_use]
    pub fn display_names<'a>(&'a self, names: &'a [String]) -> NamedItems<'a> {
        NamedItems {
            items: &self.0,
            names
        }
    }
}

/// # Overview
///
/// Returns true if `items` is strictly increasing.
#[inline]
#[must_use]
pub fn is_canonical(items: &[Item]) -> bool {
    items.windows(2).all(|w| w[0] < w[1])
}

impl Deref for Itemset {
    type Target = [Item];

    #[inline(always)]
    fn deref(&self) -> &[Item] {
        &self.0
    }
}

impl Borrow<[Item]> for Itemset {
    #[inline(always)]
    fn borrow(&self) -> &[Item] {
        &self.0
    }
}

impl From<&[Item]> for Itemset {
    fn from(items: &[Item]) -> Self {
        Self::new(items.iter().copied())
    }
}

impl FromIterator<Item> for Itemset {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "}}")
    }
}

/// Display adapter returned by [`Itemset::display_names`].
#[derive(Debug, Clone, Copy)]
pub struct NamedItems<'a> {
    items: &'a [Item],
    names: &'a [String]
}

impl fmt::Display for NamedItems<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, &item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.names.get(item) {
                Some(name) => write!(f, "{name}")?,
                None => write!(f, "#{item}")?
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn canonical_regardless_of_order() {
        assert_eq!(Itemset::new([2, 0, 1]), Itemset::new([0, 1, 2]));
        assert_eq!(Itemset::new([4, 4, 1]).as_slice(), &[1, 4]);
    }

    #[test]
    fn slice_lookup_in_map() {
        let mut map = HashMap::new();
        map.insert(Itemset::new([1, 3]), 7u32);

        assert_eq!(map.get(&[1usize, 3][..]), Some(&7));
        assert_eq!(map.get(&[3usize, 1][..]), None);
    }

    #[test]
    fn subset_check() {
        let small = Itemset::new([1, 5]);
        assert!(small.is_subset_of(&[0, 1, 5, 9]));
        assert!(!small.is_subset_of(&[0, 1, 9]));
        assert!(Itemset::default().is_subset_of(&[]));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Itemset::new([0, 1]) < Itemset::new([0, 2]));
        assert!(Itemset::new([0, 9]) < Itemset::new([1, 2]));
    }

    #[test]
    fn display_with_names() {
        let names = vec!["bread".to_string(), "milk".to_string()];
        let set = Itemset::new([1, 0]);

        assert_eq!(set.display_names(&names).to_string(), "{bread, milk}");
        assert_eq!(Itemset::new([5]).display_names(&names).to_string(), "{#5}");
    }

    #[test]
    fn canonical_check() {
        assert!(is_canonical(&[]));
        assert!(is_canonical(&[1, 2, 8]));
        assert!(!is_canonical(&[1, 1]));
        assert!(!is_canonical(&[3, 2]));
    }
}
