//! AssocForge: association rule mining over categorical transaction data
//!
//! The core mines frequent itemsets from a boolean transaction matrix with
//! the level-wise Apriori algorithm and derives association rules scored by
//! support, confidence, lift, leverage and conviction. A thin CLI loads a CSV
//! file, one-hot encodes its categorical columns and prints the top rules.

pub mod cancellation;
pub mod cli;
pub mod data;
pub mod error;
pub mod itemset;
pub mod logging;
pub mod matrix;
pub mod miner;
pub mod report;
pub mod rules;

// Re-export public items for easier access
pub use cancellation::CancellationToken;
pub use cli::Args;
pub use data::{load_categories, CategoricalData};
pub use error::{MiningError, MiningResult};
pub use itemset::{ItemId, Itemset};
pub use matrix::TransactionMatrix;
pub use miner::{mine, mine_with, FrequentItemsetTable, MinerOptions};
pub use rules::{generate, Metric, Rule};

/// Common result type used by the application layer
pub type Result<T> = anyhow::Result<T>;
