//! Configuration and builder for a mining run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    subsets::MAX_LEVEL_LIMIT
};

/// Default maximum itemset size.
pub const DEFAULT_MAX_LEVEL: usize = 5;

/// Absorbs representation error in `n_rows * min_support` (e.g. `0.7 * 10`).
const ROWS_EPSILON: f64 = 1e-9;

/// # Overview
///
/// Thresholds and search limits for a mining run.
///
/// # Examples
///
/// ```
/// use apriori_rs::Config;
///
/// let config = Config::builder()
///     .min_support(0.3)
///     .min_confidence(0.6)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_level, 5);
/// assert_eq!(config.min_support_rows(10), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[must_use]
pub struct Config {
    pub min_support:        f64,
    pub min_confidence:     f64,
    pub max_level:          usize,
    pub support_pruning:    bool,
    pub confidence_pruning: bool,
    pub max_candidates:     Option<usize>
}

impl Config {
    /// # Overview
    ///
    /// Creates a new ConfigBuilder.
    #[inline]
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// # Overview
    ///
    /// Validates configuration parameters. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        if !is_fraction(self.min_support) {
            return Err(Error::InvalidSupport);
        }
        if !is_fraction(self.min_confidence) {
            return Err(Error::InvalidConfidence);
        }
        if self.max_level == 0 || self.max_level > MAX_LEVEL_LIMIT {
            return Err(Error::InvalidMaxLevel {
                max_level: self.max_level
            });
        }
        Ok(())
    }

    /// # Overview
    ///
    /// Minimum number of supporting rows: `floor(n_rows * min_support)`,
    /// never below one.
    #[inline]
    #[must_use]
    pub fn min_support_rows(&self, n_rows: usize) -> u32 {
        let rows = (n_rows as f64 * self.min_support + ROWS_EPSILON).floor();
        (rows as u32).max(1)
    }
}

#[inline]
fn is_fraction(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= 1.0
}

/// # Overview
///
/// Builder for Config with validation.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    min_support:        Option<f64>,
    min_confidence:     Option<f64>,
    max_level:          Option<usize>,
    support_pruning:    Option<bool>,
    confidence_pruning: Option<bool>,
    max_candidates:     Option<usize>
}

impl ConfigBuilder {
    /// # Overview
    ///
    /// Sets the minimum support as a fraction of all transactions.
    pub fn min_support(mut self, fraction: f64) -> Self {
        self.min_support = Some(fraction);
        self
    }

    /// # Overview
    ///
    /// Sets the minimum confidence a rule needs to be emitted.
    pub fn min_confidence(mut self, fraction: f64) -> Self {
        self.min_confidence = Some(fraction);
        self
    }

    /// # Overview
    ///
    /// Sets the largest itemset size searched (default: 5).
    pub fn max_level(mut self, level: usize) -> Self {
        self.max_level = Some(level);
        self
    }

    /// # Overview
    ///
    /// Enables or disables the (k-1)-subset check before support counting.
    pub fn support_pruning(mut self, enabled: bool) -> Self {
        self.support_pruning = Some(enabled);
        self
    }

    /// # Overview
    ///
    /// Enables or disables rejection of shrunk antecedents after a failed
    /// rule.
    pub fn confidence_pruning(mut self, enabled: bool) -> Self {
        self.confidence_pruning = Some(enabled);
        self
    }

    /// # Overview
    ///
    /// Caps the raw candidates generated at any single level.
    pub fn max_candidates(mut self, limit: usize) -> Self {
        self.max_candidates = Some(limit);
        self
    }

    /// # Overview
    ///
    /// Builds and validates the Config.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            min_support:        self.min_support.ok_or(Error::MissingSupport)?,
            min_confidence:     self.min_confidence.ok_or(Error::MissingConfidence)?,
            max_level:          self.max_level.unwrap_or(DEFAULT_MAX_LEVEL),
            support_pruning:    self.support_pruning.unwrap_or(true),
            confidence_pruning: self.confidence_pruning.unwrap_or(true),
            max_candidates:     self.max_candidates
        };
        config.validate()?;
        Ok(config)
    }
}
