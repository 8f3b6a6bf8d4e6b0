//! Command-line interface definitions and argument parsing

use clap::Parser;

use crate::miner::MinerOptions;
use crate::rules::Metric;

/// Association rule mining over categorical columns of a CSV file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "911.csv")]
    pub input: String,

    /// Categorical column to one-hot encode; repeat for several columns.
    /// `reason` is derived from `title` when the file has no such column
    #[arg(short, long = "column", default_value = "reason")]
    pub columns: Vec<String>,

    /// Minimum support of a frequent itemset, in (0, 1]
    #[arg(short = 's', long, default_value = "0.01")]
    pub min_support: f64,

    /// Metric used to filter and rank rules
    /// (support, confidence, lift, leverage, conviction)
    #[arg(short, long, default_value = "confidence")]
    pub metric: Metric,

    /// Minimum value of the selected metric
    #[arg(short = 't', long, default_value = "0.5")]
    pub min_threshold: f64,

    /// Largest itemset size to mine
    #[arg(long)]
    pub max_len: Option<usize>,

    /// Number of top rules to print
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Also print the frequent itemsets
    #[arg(long)]
    pub show_itemsets: bool,

    /// Worker threads for support counting and rule generation (default: all cores)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Miner options from the support and length flags
    pub fn miner_options(&self) -> MinerOptions {
        MinerOptions {
            min_support: self.min_support,
            max_len: self.max_len,
        }
    }

    /// Configure the global rayon pool when `--threads` is given
    pub fn configure_threads(&self) -> crate::Result<()> {
        if let Some(threads) = self.threads {
            if threads == 0 {
                anyhow::bail!("--threads must be at least 1");
            }
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .map_err(|e| anyhow::anyhow!("Failed to configure thread pool: {}", e))?;
        }
        Ok(())
    }
}
