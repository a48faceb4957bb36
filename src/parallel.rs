//! Parallel support counting using rayon.
//!
//! Candidate generation and the subset check stay sequential: they read the
//! support index, which must hold every itemset of the previous level. Only
//! the row scans, which dominate the run time, are spread across threads.
//! Counts come back in candidate order and are admitted after all of them
//! finish, which keeps levels deterministic and separated.

use rayon::prelude::*;

use crate::{
    Apriori, MiningResult,
    error::Result,
    itemset::Itemset,
    miner::SupportCounter,
    table::TransactionTable
};

/// # Overview
///
/// Counts the candidates of one level in parallel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelCounter;

impl SupportCounter for ParallelCounter {
    fn count(
        &self,
        table: &TransactionTable,
        candidates: &[Itemset],
        min_rows: u32
    ) -> Vec<Option<u32>> {
        candidates
            .par_iter()
            .map(|c| table.count_support_bounded(c, min_rows))
            .collect()
    }
}

impl Apriori {
    /// # Overview
    ///
    /// Same as [`Apriori::run`], counting supports on the rayon pool. The
    /// result is identical to the sequential run.
    pub fn run_parallel(&self, table: &TransactionTable) -> Result<MiningResult> {
        self.run_with(table, ParallelCounter)
    }
}
