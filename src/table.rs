//! Bit-packed transaction table.
//!
//! Each transaction row is packed into `u64` words, 64 items per word, in one
//! contiguous row-major buffer. Testing whether a row contains an itemset is
//! a handful of AND operations over the words the itemset touches.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path
};

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    error::{Error, Result},
    itemset::Item
};

/// # Overview
///
/// The packed words an itemset touches: `(word index, required bits)`.
///
/// Itemsets are small, so the mask lives inline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemMask {
    words: SmallVec<[(usize, u64); 8]>
}

impl ItemMask {
    /// # Overview
    ///
    /// Builds the mask for `items`. Order does not matter.
    #[must_use]
    pub fn new(items: &[Item]) -> Self {
        let mut words: SmallVec<[(usize, u64); 8]> = SmallVec::new();
        for &item in items {
            let word_idx = item / 64;
            let bit = 1u64 << (item % 64);
            match words.iter_mut().find(|(w, _)| *w == word_idx) {
                Some((_, bits)) => *bits |= bit,
                None => words.push((word_idx, bit))
            }
        }
        Self {
            words
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// # Overview
///
/// Immutable boolean matrix: rows are transactions, columns are items.
///
/// # Examples
///
/// ```
/// use apriori_rs::TransactionTable;
///
/// let rows = vec![vec![1, 1, 0], vec![0, 1, 1]];
/// let table = TransactionTable::from_rows(&rows).unwrap();
///
/// assert_eq!(table.n_rows(), 2);
/// assert_eq!(table.count_support(&[1]), 2);
/// assert_eq!(table.count_support(&[0, 1]), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTable {
    bits:   Vec<u64>,
    names:  Vec<String>,
    n_rows: usize,
    n_cols: usize,
    stride: usize
}

impl TransactionTable {
    /// # Overview
    ///
    /// Packs `rows` into a table with the given item names. Any non-zero
    /// cell means the item is present.
    ///
    /// Every row must have `names.len()` cells.
    pub fn new(rows: &[Vec<u8>], names: Vec<String>) -> Result<Self> {
        let n_cols = names.len();
        let stride = n_cols.div_ceil(64);
        let mut bits = vec![0u64; rows.len() * stride];

        for (r, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(Error::DimensionMismatch {
                    expected: n_cols,
                    got:      row.len()
                });
            }
            let packed = &mut bits[r * stride..(r + 1) * stride];
            for (c, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    packed[c / 64] |= 1u64 << (c % 64);
                }
            }
        }

        Ok(Self {
            bits,
            names,
            n_rows: rows.len(),
            n_cols,
            stride
        })
    }

    /// # Overview
    ///
    /// Packs `rows` and names the items `I0`, `I1`, ...
    ///
    /// The column count is taken from the first row; an empty `rows` gives
    /// an empty table.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        let names = (0..n_cols).map(|i| format!("I{i}")).collect();
        Self::new(rows, names)
    }

    /// # Overview
    ///
    /// Reads a delimited table with a header row.
    ///
    /// The header gives item names. A data cell marks the item present when
    /// it is non-empty after trimming. Blank lines are skipped.
    pub fn read_csv<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => return Err(Error::MissingHeader)
            }
        };
        let names: Vec<String> = split_cells(&header).map(|s| s.trim().to_string()).collect();

        let mut rows = Vec::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let row: Vec<u8> = split_cells(&line)
                .map(|cell| u8::from(!cell.trim().is_empty()))
                .collect();
            rows.push(row);
        }

        debug!(rows = rows.len(), cols = names.len(), "read transaction table");
        Self::new(&rows, names)
    }

    /// # Overview
    ///
    /// Opens and reads a delimited table file. See [`Self::read_csv`].
    pub fn open_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_csv(BufReader::new(file))
    }

    #[inline(always)]
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline(always)]
    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// # Overview
    ///
    /// True if the table has no transactions or no items.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.n_cols == 0
    }

    #[inline]
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    #[must_use]
    pub fn item_name(&self, item: Item) -> Option<&str> {
        self.names.get(item).map(String::as_str)
    }

    /// # Overview
    ///
    /// Packed words of one transaction.
    #[inline(always)]
    #[must_use]
    pub fn row(&self, row: usize) -> &[u64] {
        &self.bits[row * self.stride..(row + 1) * self.stride]
    }

    /// # Overview
    ///
    /// True if transaction `row` contains item `col`.
    #[inline]
    #[must_use]
    pub fn contains(&self, row: usize, col: Item) -> bool {
        debug_assert!(col < self.n_cols);
        self.row(row)[col / 64] & (1u64 << (col % 64)) != 0
    }

    /// # Overview
    ///
    /// True if transaction `row` contains every item of `mask`.
    ///
    /// # Panics
    ///
    /// Panics if `mask` was built from items beyond this table's words.
    #[inline]
    #[must_use]
    pub fn supports(&self, row: usize, mask: &ItemMask) -> bool {
        let packed = self.row(row);
        mask.words
            .iter()
            .all(|&(word, bits)| packed[word] & bits == bits)
    }

    /// # Overview
    ///
    /// Number of transactions containing every item of `items`.
    ///
    /// # Panics
    ///
    /// Panics if any item is not a column of this table.
    #[must_use]
    pub fn count_support(&self, items: &[Item]) -> u32 {
        let mask = self.mask(items);
        (0..self.n_rows).filter(|&r| self.supports(r, &mask)).count() as u32
    }

    /// # Overview
    ///
    /// Counts support, giving up as soon as the rows left cannot lift the
    /// count to `min_rows`. Returns the exact count when it reaches
    /// `min_rows`, `None` otherwise.
    ///
    /// # Panics
    ///
    /// Panics if any item is not a column of this table.
    #[must_use]
    pub fn count_support_bounded(&self, items: &[Item], min_rows: u32) -> Option<u32> {
        let mask = self.mask(items);
        let mut count = 0u32;

        for r in 0..self.n_rows {
            let remaining = (self.n_rows - r) as u32;
            if count + remaining < min_rows {
                return None;
            }
            if self.supports(r, &mask) {
                count += 1;
            }
        }

        (count >= min_rows).then_some(count)
    }

    fn mask(&self, items: &[Item]) -> ItemMask {
        if let Some(item) = items.iter().find(|&&item| item >= self.n_cols) {
            panic!("item {item} out of range for a table of {} items", self.n_cols);
        }
        ItemMask::new(items)
    }
}

fn split_cells(line: &str) -> impl Iterator<Item = &str> {
    line.trim_end_matches(['\r', '\n']).split(',')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransactionTable {
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
    fn packs_cells() {
        let table = sample();
        assert!(table.contains(0, 0));
        assert!(!table.contains(0, 2));
        assert!(table.contains(3, 2));
        assert_eq!(table.row(0), &[0b011]);
    }

    #[test]
    fn support_counts() {
        let table = sample();
        assert_eq!(table.count_support(&[0]), 4);
        assert_eq!(table.count_support(&[2]), 4);
        assert_eq!(table.count_support(&[0, 1]), 3);
        assert_eq!(table.count_support(&[0, 1, 2]), 2);
        assert_eq!(table.count_support(&[]), 5);
    }

    #[test]
    fn bounded_count_matches_exact_when_frequent() {
        let table = sample();
        assert_eq!(table.count_support_bounded(&[0, 1, 2], 2), Some(2));
        assert_eq!(table.count_support_bounded(&[0, 1, 2], 3), None);
        assert_eq!(table.count_support_bounded(&[0], 4), Some(4));
    }

    #[test]
    fn wide_rows_span_words() {
        let mut row = vec![0u8; 130];
        row[0] = 1;
        row[64] = 1;
        row[129] = 1;
        let table = TransactionTable::from_rows(&[row.clone(), row]).unwrap();

        assert_eq!(table.row(0).len(), 3);
        assert_eq!(table.count_support(&[0, 64, 129]), 2);
        assert_eq!(table.count_support(&[0, 65]), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn count_support_rejects_unknown_item() {
        // item 5 still lands in word 0 of a 3-column table
        let _ = sample().count_support(&[0, 5]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn bounded_count_rejects_unknown_item() {
        let _ = sample().count_support_bounded(&[70], 1);
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows = vec![vec![1, 0], vec![1]];
        assert_eq!(
            TransactionTable::from_rows(&rows),
            Err(Error::DimensionMismatch {
                expected: 2,
                got:      1
            })
        );
    }

    #[test]
    fn empty_tables() {
        assert!(TransactionTable::from_rows(&[]).unwrap().is_empty());
        let no_cols = TransactionTable::from_rows(&[vec![], vec![]]).unwrap();
        assert!(no_cols.is_empty());
        assert_eq!(no_cols.n_rows(), 2);
    }

    #[test]
    fn read_csv_marks_non_empty_cells() {
        let data = "bread,milk,eggs\nx,,x\n,x,\n\nx,x,x\n";
        let table = TransactionTable::read_csv(data.as_bytes()).unwrap();

        assert_eq!(table.names(), &["bread", "milk", "eggs"]);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.item_name(2), Some("eggs"));
        assert_eq!(table.count_support(&[0]), 2);
        assert_eq!(table.count_support(&[0, 2]), 2);
    }

    #[test]
    fn read_csv_handles_crlf() {
        let data = "a,b\r\n1,\r\n1,1\r\n";
        let table = TransactionTable::read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.names(), &["a", "b"]);
        assert_eq!(table.count_support(&[1]), 1);
    }

    #[test]
    fn read_csv_errors() {
        assert_eq!(
            TransactionTable::read_csv("".as_bytes()),
            Err(Error::MissingHeader)
        );
        assert!(matches!(
            TransactionTable::read_csv("a,b\nx\n".as_bytes()),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn item_mask_merges_words() {
        let mask = ItemMask::new(&[1, 3, 70]);
        assert_eq!(mask.words.as_slice(), &[(0, 0b1010), (1, 1 << 6)]);
        assert!(ItemMask::new(&[]).is_empty());
    }
}
