//! Seeded random number generation and synthetic transaction tables.

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::table::TransactionTable;

/// Fast RNG for generating synthetic data.
pub type FastRng = Xoshiro256PlusPlus;

/// # Overview
///
/// Creates a fast RNG seeded from a u64 value.
///
/// # Examples
///
/// ```
/// use apriori_rs::utils::rng_from_seed;
///
/// let mut rng = rng_from_seed(42);
/// ```
#[inline]
pub fn rng_from_seed(seed: u64) -> FastRng {
    use rand::SeedableRng;
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// # Overview
///
/// Performs a Bernoulli trial with given probability.
#[inline]
pub fn bernoulli<R: Rng>(rng: &mut R, probability: f64) -> bool {
    rng.random::<f64>() < probability
}

/// # Overview
///
/// Random 0/1 rows where each cell is 1 with probability `density`.
#[must_use]
pub fn random_rows(n_rows: usize, n_cols: usize, density: f64, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = rng_from_seed(seed);
    (0..n_rows)
        .map(|_| {
            (0..n_cols)
                .map(|_| u8::from(bernoulli(&mut rng, density)))
                .collect()
        })
        .collect()
}

/// # Overview
///
/// Random transaction table; same seed, same table.
///
/// # Examples
///
/// ```
/// use apriori_rs::utils::random_table;
///
/// let table = random_table(100, 8, 0.3, 42);
/// assert_eq!(table.n_rows(), 100);
/// assert_eq!(table, random_table(100, 8, 0.3, 42));
/// ```
#[must_use]
pub fn random_table(n_rows: usize, n_cols: usize, density: f64, seed: u64) -> TransactionTable {
    let rows = random_rows(n_rows, n_cols, density, seed);
    let names = (0..n_cols).map(|i| format!("I{i}")).collect();
    match TransactionTable::new(&rows, names) {
        Ok(table) => table,
        Err(err) => unreachable!("generated rows are rectangular: {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_deterministic() {
        let mut rng1 = rng_from_seed(42);
        let mut rng2 = rng_from_seed(42);

        for _ in 0..100 {
            assert_eq!(rng1.random::<u64>(), rng2.random::<u64>());
        }
    }

    #[test]
    fn bernoulli_probability() {
        let mut rng = rng_from_seed(42);
        let trials = 10000;
        let count = (0..trials).filter(|_| bernoulli(&mut rng, 0.3)).count();

        let ratio = count as f64 / trials as f64;
        assert!((ratio - 0.3).abs() < 0.05);
    }

    #[test]
    fn random_rows_shape_and_density() {
        let rows = random_rows(50, 7, 0.0, 1);
        assert_eq!(rows.len(), 50);
        assert!(rows.iter().all(|r| r.len() == 7 && r.iter().all(|&c| c == 0)));

        let full = random_table(20, 5, 1.0, 1);
        assert_eq!(full.count_support(&[0, 1, 2, 3, 4]), 20);
    }
}
