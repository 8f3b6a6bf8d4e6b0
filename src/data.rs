//! CSV loading and one-hot encoding of categorical columns using Polars

use std::collections::BTreeSet;

use polars::prelude::*;

use crate::matrix::TransactionMatrix;

/// Column derived from `title` when the file does not carry it
pub const REASON_COLUMN: &str = "reason";

/// Categorical values read from a CSV file, one row per transaction
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalData {
    /// Names of the categorical columns, in request order
    pub columns: Vec<String>,
    /// One value per column for each kept row
    pub rows: Vec<Vec<String>>,
}

impl CategoricalData {
    /// Sorted distinct values of `column`
    pub fn categories(&self, column: &str) -> Vec<String> {
        let Some(idx) = self.columns.iter().position(|c| c == column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .map(|row| row[idx].clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// One-hot encode every categorical column into a boolean matrix.
    ///
    /// Each distinct value becomes an item. With more than one column, item
    /// names are prefixed as `column=value` so values cannot collide.
    pub fn one_hot(&self) -> crate::Result<TransactionMatrix> {
        let prefixed = self.columns.len() > 1;
        let transactions: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.columns)
                    .map(|(value, column)| {
                        if prefixed {
                            format!("{}={}", column, value)
                        } else {
                            value.clone()
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(TransactionMatrix::from_transactions(&transactions)?)
    }
}

/// Load categorical columns from a CSV file
///
/// # Arguments
/// * `file_path` - Path to the CSV file
/// * `columns` - Categorical columns to read; `reason` is derived from
///   `title` (text before the first `:`) when the file has no such column
///
/// # Returns
/// * `CategoricalData` with rows missing any requested value dropped
pub fn load_categories(file_path: &str, columns: &[String]) -> crate::Result<CategoricalData> {
    if columns.is_empty() {
        anyhow::bail!("At least one categorical column is required");
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(file_path.into()))?
        .finish()?;

    if df.height() == 0 {
        anyhow::bail!("No rows found in {}", file_path);
    }

    let values = columns
        .iter()
        .map(|name| column_values(&df, name))
        .collect::<crate::Result<Vec<_>>>()?;

    // Drop rows with a missing value in any requested column
    let rows: Vec<Vec<String>> = (0..df.height())
        .filter_map(|row| values.iter().map(|column| column[row].clone()).collect())
        .collect();

    if rows.is_empty() {
        anyhow::bail!("No rows with values for columns {:?}", columns);
    }

    Ok(CategoricalData {
        columns: columns.to_vec(),
        rows,
    })
}

/// Read a column as trimmed strings, deriving `reason` from `title` if needed
fn column_values(df: &DataFrame, name: &str) -> crate::Result<Vec<Option<String>>> {
    if let Ok(series) = df.column(name) {
        return string_values(series);
    }

    if name == REASON_COLUMN {
        if let Ok(series) = df.column("Reason") {
            return string_values(series);
        }
        if let Ok(title) = df.column("title") {
            let reasons = string_values(title)?
                .into_iter()
                .map(|title| title.and_then(|t| non_empty(reason_from_title(&t))))
                .collect();
            return Ok(reasons);
        }
        anyhow::bail!("Column 'reason' not found and no 'title' column to derive it from");
    }

    anyhow::bail!("Column '{}' not found", name)
}

fn string_values(series: &Series) -> crate::Result<Vec<Option<String>>> {
    let strings = series.cast(&DataType::String)?;
    let values = strings
        .str()?
        .into_iter()
        .map(|value| value.and_then(non_empty))
        .collect();
    Ok(values)
}

/// Category prefix of an incident title, e.g. `EMS: BACK PAINS/INJURY` -> `EMS`
pub fn reason_from_title(title: &str) -> &str {
    title.split(':').next().unwrap_or(title).trim()
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
