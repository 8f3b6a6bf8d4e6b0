//! Boolean transaction matrix consumed by the miner

use std::collections::{BTreeSet, HashSet};

use ndarray::{Array2, ArrayView1};

use crate::error::{MiningError, MiningResult};
use crate::itemset::ItemId;

/// Rows are transactions, columns are items.
#[derive(Debug, Clone)]
pub struct TransactionMatrix {
    data: Array2<bool>,
    items: Vec<String>,
}

impl TransactionMatrix {
    /// Wrap a boolean matrix with one name per column.
    ///
    /// # Errors
    /// * `EmptyMatrix` if there are no transactions or no items
    /// * `ItemCountMismatch` if `items` does not name every column
    /// * `DuplicateItem` if two columns share a name
    pub fn new(data: Array2<bool>, items: Vec<String>) -> MiningResult<Self> {
        let (rows, cols) = data.dim();
        if rows == 0 || cols == 0 {
            return Err(MiningError::EmptyMatrix { rows, cols });
        }
        if items.len() != cols {
            return Err(MiningError::ItemCountMismatch {
                columns: cols,
                names: items.len(),
            });
        }

        let mut seen = HashSet::with_capacity(items.len());
        for name in &items {
            if !seen.insert(name.as_str()) {
                return Err(MiningError::DuplicateItem(name.clone()));
            }
        }

        Ok(Self { data, items })
    }

    /// Build a matrix from per-transaction item lists.
    ///
    /// Columns are laid out in sorted item-name order.
    pub fn from_transactions<T, S>(transactions: &[T]) -> MiningResult<Self>
    where
        T: AsRef<[S]>,
        S: AsRef<str>,
    {
        let names: BTreeSet<&str> = transactions
            .iter()
            .flat_map(|row| row.as_ref().iter().map(|item| item.as_ref()))
            .collect();
        let items: Vec<String> = names.into_iter().map(str::to_owned).collect();

        let mut data = Array2::from_elem((transactions.len(), items.len()), false);
        for (row, transaction) in transactions.iter().enumerate() {
            for item in transaction.as_ref() {
                if let Ok(col) = items.binary_search_by(|name| name.as_str().cmp(item.as_ref())) {
                    data[[row, col]] = true;
                }
            }
        }

        Self::new(data, items)
    }

    pub fn n_transactions(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_items(&self) -> usize {
        self.data.ncols()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn item_name(&self, item: ItemId) -> Option<&str> {
        self.items.get(item).map(String::as_str)
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.items.iter().position(|item| item == name)
    }

    /// Presence flags of one item across all transactions.
    pub fn column(&self, item: ItemId) -> ArrayView1<'_, bool> {
        self.data.column(item)
    }

    pub fn data(&self) -> &Array2<bool> {
        &self.data
    }
}
