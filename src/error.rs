//! Error types for itemset mining and rule generation.

use core::fmt;

/// # Overview
///
/// Errors that can occur when configuring a mining run, loading a
/// transaction table or running out of room for candidates.
///
/// An empty table is not an error: it produces an empty
/// [`MiningResult`](crate::MiningResult) with `no_data` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    MissingSupport,
    MissingConfidence,
    InvalidSupport,
    InvalidConfidence,
    InvalidMaxLevel { max_level: usize },
    DimensionMismatch { expected: usize, got: usize },
    MissingHeader,
    Io(String),
    ResourceExhausted { level: usize, candidates: usize }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSupport => write!(f, "min_support is required"),
            Self::MissingConfidence => write!(f, "min_confidence is required"),
            Self::InvalidSupport => write!(f, "min_support must be in (0, 1]"),
            Self::InvalidConfidence => write!(f, "min_confidence must be in (0, 1]"),
            Self::InvalidMaxLevel {
                max_level
            } => write!(
                f,
                "max_level must be in 1..={}, got {max_level}",
                crate::subsets::MAX_LEVEL_LIMIT
            ),
            Self::DimensionMismatch {
                expected,
                got
            } => {
                write!(f, "dimension mismatch: expected {expected}, got {got}")
            }
            Self::MissingHeader => write!(f, "transaction file has no header row"),
            Self::Io(msg) => write!(f, "i/o error: {msg}"),
            Self::ResourceExhausted {
                level,
                candidates
            } => write!(
                f,
                "too many candidates at level {level}: {candidates}; \
                 lower max_level or raise min_support"
            )
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// # Overview
///
/// Result type for mining operations.
pub type Result<T> = core::result::Result<T, Error>;
