//! Level-wise (Apriori) frequent itemset mining

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info, info_span};

use crate::cancellation::CancellationToken;
use crate::error::{MiningError, MiningResult};
use crate::itemset::{join_level, ItemId, Itemset};
use crate::matrix::TransactionMatrix;

/// Parameters of a mining run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinerOptions {
    /// Minimum fraction of transactions an itemset must appear in, in (0, 1]
    pub min_support: f64,
    /// Largest itemset size to generate; unlimited when `None`
    pub max_len: Option<usize>,
}

impl MinerOptions {
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            max_len: None,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn validate(&self) -> MiningResult<()> {
        // NaN fails both comparisons
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(MiningError::InvalidSupport(self.min_support));
        }
        if self.max_len == Some(0) {
            return Err(MiningError::InvalidMaxLen);
        }
        Ok(())
    }
}

/// Frequent itemsets of one size, in canonical order.
#[derive(Debug, Clone, Default)]
struct Level {
    itemsets: Vec<Itemset>,
    supports: HashMap<Itemset, f64>,
}

impl Level {
    fn new(mut entries: Vec<(Itemset, f64)>) -> Self {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let supports = entries.iter().cloned().collect();
        let itemsets = entries.into_iter().map(|(itemset, _)| itemset).collect();
        Self { itemsets, supports }
    }

    fn len(&self) -> usize {
        self.itemsets.len()
    }

    fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }
}

/// Every frequent itemset of a matrix with its support, grouped by size.
///
/// Built once by [`mine`] and immutable afterwards. Downward closure holds:
/// each non-empty subset of a stored itemset is stored too, with a support
/// at least as high.
#[derive(Debug, Clone)]
pub struct FrequentItemsetTable {
    levels: Vec<Level>,
    item_names: Vec<String>,
    n_transactions: usize,
    min_support: f64,
}

impl FrequentItemsetTable {
    /// Support of `itemset`, or `None` if it is not frequent.
    pub fn support(&self, itemset: &Itemset) -> Option<f64> {
        self.levels
            .get(itemset.len().checked_sub(1)?)?
            .supports
            .get(itemset)
            .copied()
    }

    pub fn contains(&self, itemset: &Itemset) -> bool {
        self.support(itemset).is_some()
    }

    /// Frequent itemsets of size `k`, in canonical order.
    pub fn level(&self, k: usize) -> impl Iterator<Item = (&Itemset, f64)> + '_ {
        k.checked_sub(1)
            .and_then(|idx| self.levels.get(idx))
            .into_iter()
            .flat_map(|level| {
                level
                    .itemsets
                    .iter()
                    .map(move |itemset| (itemset, level.supports[itemset]))
            })
    }

    /// All frequent itemsets, by ascending size then canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&Itemset, f64)> + '_ {
        (1..=self.levels.len()).flat_map(move |k| self.level(k))
    }

    /// Number of frequent itemsets across all sizes.
    pub fn len(&self) -> usize {
        self.levels.iter().map(Level::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the largest frequent itemset, 0 for an empty table.
    pub fn max_len(&self) -> usize {
        self.levels.len()
    }

    /// Names of the matrix columns the table was mined from.
    pub fn item_names(&self) -> &[String] {
        &self.item_names
    }

    pub fn item_name(&self, item: ItemId) -> Option<&str> {
        self.item_names.get(item).map(String::as_str)
    }

    pub fn n_transactions(&self) -> usize {
        self.n_transactions
    }

    pub fn min_support(&self) -> f64 {
        self.min_support
    }
}

/// Mine every itemset whose support is at least `min_support`.
///
/// # Arguments
/// * `matrix` - Boolean transaction matrix
/// * `min_support` - Support threshold in (0, 1]
///
/// # Returns
/// * The frequent itemset table; empty (not an error) when no single item
///   reaches `min_support`
pub fn mine(matrix: &TransactionMatrix, min_support: f64) -> MiningResult<FrequentItemsetTable> {
    mine_with(matrix, &MinerOptions::new(min_support), &CancellationToken::new())
}

/// Mine with explicit options, checking `cancel` between levels.
pub fn mine_with(
    matrix: &TransactionMatrix,
    options: &MinerOptions,
    cancel: &CancellationToken,
) -> MiningResult<FrequentItemsetTable> {
    options.validate()?;

    let (rows, cols) = matrix.data().dim();
    if rows == 0 || cols == 0 {
        return Err(MiningError::EmptyMatrix { rows, cols });
    }

    let span = info_span!(
        "mine",
        transactions = rows,
        items = cols,
        min_support = options.min_support
    );
    let _enter = span.enter();

    let max_len = options.max_len.unwrap_or(cols).min(cols);
    let min_support = options.min_support;

    // Level 1: column means
    let singles: Vec<(Itemset, f64)> = (0..cols)
        .into_par_iter()
        .filter_map(|item| {
            let support = fraction(count_true(matrix.column(item).iter().copied()), rows);
            (support >= min_support).then(|| (Itemset::singleton(item), support))
        })
        .collect();

    let mut current = Level::new(singles);
    debug!(level = 1, candidates = cols, frequent = current.len(), "level mined");

    let mut levels = Vec::new();
    while !current.is_empty() {
        let k = levels.len() + 2;
        if k > max_len {
            levels.push(current);
            break;
        }
        if cancel.is_cancelled() {
            info!(completed_levels = levels.len() + 1, "mining cancelled");
            return Err(MiningError::Cancelled);
        }

        let (candidates, pruned) =
            join_level(&current.itemsets, |subset| current.supports.contains_key(subset));
        let n_candidates = candidates.len();

        let frequent: Vec<(Itemset, f64)> = candidates
            .into_par_iter()
            .filter_map(|candidate| {
                let support = fraction(count_support(matrix, &candidate), rows);
                (support >= min_support).then_some((candidate, support))
            })
            .collect();

        levels.push(current);
        current = Level::new(frequent);
        debug!(
            level = k,
            candidates = n_candidates,
            pruned,
            frequent = current.len(),
            "level mined"
        );
    }

    let table = FrequentItemsetTable {
        levels,
        item_names: matrix.items().to_vec(),
        n_transactions: rows,
        min_support,
    };
    info!(
        itemsets = table.len(),
        max_len = table.max_len(),
        "frequent itemsets mined"
    );

    Ok(table)
}

/// Number of transactions containing every item of `itemset`.
///
/// ANDs the item columns together rather than walking each transaction.
pub fn count_support(matrix: &TransactionMatrix, itemset: &Itemset) -> usize {
    let items = itemset.items();
    let mut present = matrix.column(items[0]).to_owned();
    for &item in &items[1..] {
        present.zip_mut_with(&matrix.column(item), |acc, &flag| *acc = *acc && flag);
    }
    count_true(present.iter().copied())
}

fn count_true(flags: impl Iterator<Item = bool>) -> usize {
    flags.filter(|&flag| flag).count()
}

fn fraction(count: usize, total: usize) -> f64 {
    count as f64 / total as f64
}
