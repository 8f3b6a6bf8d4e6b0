//! Errors raised by the mining core

use crate::rules::Metric;

/// Input-validation and runtime errors of the itemset miner and rule generator.
///
/// Every validation variant is reported before any computation starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MiningError {
    #[error("min_support must be in (0, 1], got {0}")]
    InvalidSupport(f64),

    #[error("min_threshold {threshold} is out of range for metric {metric}")]
    InvalidThreshold { metric: Metric, threshold: f64 },

    #[error("max_len must be at least 1")]
    InvalidMaxLen,

    #[error("transaction matrix is empty ({rows} rows, {cols} columns)")]
    EmptyMatrix { rows: usize, cols: usize },

    #[error("matrix has {columns} columns but {names} item names")]
    ItemCountMismatch { columns: usize, names: usize },

    #[error("duplicate item name: {0}")]
    DuplicateItem(String),

    #[error("frequent itemset table has no support for subset {0:?}")]
    IncompleteTable(Vec<usize>),

    #[error("mining cancelled")]
    Cancelled,
}

/// Result alias for the mining core.
pub type MiningResult<T> = std::result::Result<T, MiningError>;
