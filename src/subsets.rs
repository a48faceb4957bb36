//! Bitmask subset enumeration over the positions of an itemset.
//!
//! A subset of a `k`-element itemset is a `k`-bit mask: bit `i` set means
//! position `i` is selected. Masks `0` (empty) and `full_mask(k)` (the whole
//! set) are never produced, which leaves `2^k - 2` proper subsets.
//!
//! [`proper_subset_masks`] yields masks in descending numeric order. If `a`
//! is a sub-mask of `b` then `a < b`, so every mask is visited before all of
//! its sub-masks. Rule generation relies on this to reject a whole family of
//! shrunk antecedents before reaching any of them.

use crate::itemset::{Item, Itemset};

/// Largest supported itemset size. Bounded by `u32` masks and kept small so
/// subset enumeration (`2^k`) stays cheap.
pub const MAX_LEVEL_LIMIT: usize = 16;

/// # Overview
///
/// Mask with the lowest `k` bits set.
#[inline]
#[must_use]
pub const fn full_mask(k: usize) -> u32 {
    debug_assert!(k <= MAX_LEVEL_LIMIT);
    (1u32 << k) - 1
}

/// # Overview
///
/// Iterator over all non-empty proper subset masks of a `k`-element set,
/// largest mask first.
///
/// # Examples
///
/// ```
/// use apriori_rs::subsets::proper_subset_masks;
///
/// let masks: Vec<u32> = proper_subset_masks(3).collect();
/// assert_eq!(masks, vec![0b110, 0b101, 0b100, 0b011, 0b010, 0b001]);
/// ```
#[derive(Debug, Clone)]
pub struct ProperSubsetMasks {
    next: u32
}

impl Iterator for ProperSubsetMasks {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.next == 0 {
            return None;
        }
        let mask = self.next;
        self.next -= 1;
        Some(mask)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.next as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ProperSubsetMasks {}

/// # Overview
///
/// Enumerates the `2^k - 2` non-empty proper subsets of `k` positions.
#[inline]
#[must_use]
pub fn proper_subset_masks(k: usize) -> ProperSubsetMasks {
    ProperSubsetMasks {
        next: full_mask(k).saturating_sub(1)
    }
}

/// # Overview
///
/// Splits `items` by `mask`: selected positions go to `selected`, the rest to
/// `rest`. Both buffers are cleared first; relative order is kept, so sorted
/// input gives sorted (canonical) output.
#[inline]
pub fn split_by_mask(items: &[Item], mask: u32, selected: &mut Itemset, rest: &mut Itemset) {
    selected.clear();
    rest.clear();
    for (pos, &item) in items.iter().enumerate() {
        if mask & (1 << pos) != 0 {
            selected.push_sorted(item);
        } else {
            rest.push_sorted(item);
        }
    }
}

/// # Overview
///
/// Writes `items` without the element at `pos` into `out`.
#[inline]
pub fn drop_one(items: &[Item], pos: usize, out: &mut Itemset) {
    out.clear();
    for (i, &item) in items.iter().enumerate() {
        if i != pos {
            out.push_sorted(item);
        }
    }
}

/// # Overview
///
/// Reusable buffers for subset enumeration, sized for the configured maximum
/// level. One scratch per caller; never shared.
#[derive(Debug, Clone)]
pub struct SubsetScratch {
    pub selected: Itemset,
    pub rest:     Itemset
}

impl SubsetScratch {
    #[must_use]
    pub fn new(max_level: usize) -> Self {
        Self {
            selected: Itemset::with_capacity(max_level),
            rest:     Itemset::with_capacity(max_level)
        }
    }

    /// # Overview
    ///
    /// Splits `items` by `mask` into `selected`/`rest`.
    #[inline]
    pub fn split(&mut self, items: &[Item], mask: u32) {
        split_by_mask(items, mask, &mut self.selected, &mut self.rest);
    }
}
