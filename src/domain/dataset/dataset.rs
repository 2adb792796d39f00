// ============================================================
// DATASET TYPES
// ============================================================
// Rectangular, string-typed table produced by the CSV loader

use serde::{Deserialize, Serialize};

/// Ordered, unique column names plus string-typed rows.
///
/// Every row holds exactly one value per column; absent cells are `""`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<DatasetRow>,
}

/// A single data row, values aligned with [`Dataset::columns`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    /// Row index (0-based, header excluded)
    pub index: usize,

    values: Vec<String>,
}

impl Dataset {
    /// Build a dataset, making headers unique and padding or truncating every
    /// row to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let columns = unique_headers(headers);
        let width = columns.len();

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, mut values)| {
                values.resize(width, String::new());
                DatasetRow { index, values }
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow row `index` together with the column names.
    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|row| Record {
            columns: &self.columns,
            row,
        })
    }

    /// Iterate rows in dataset order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |row| Record {
            columns: &self.columns,
            row,
        })
    }
}

/// Read-only view of one row keyed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    row: &'a DatasetRow,
}

impl<'a> Record<'a> {
    pub fn index(&self) -> usize {
        self.row.index
    }

    /// Raw cell value, `None` when the column does not exist.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.row.values[idx].as_str())
    }

    /// Trimmed cell value, `""` when the column does not exist.
    pub fn value(&self, column: &str) -> &'a str {
        self.get(column).map(str::trim).unwrap_or("")
    }

    /// `(column, value)` pairs in column order.
    pub fn fields(&self) -> impl DoubleEndedIterator<Item = (&'a str, &'a str)> + 'a {
        self.columns
            .iter()
            .zip(self.row.values.iter())
            .map(|(c, v)| (c.as_str(), v.as_str()))
    }

    /// True when every cell of the row is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.row.values.iter().all(|v| v.trim().is_empty())
    }
}

/// Blank headers become `Unnamed: {i}`; repeats get `.1`, `.2`, ... suffixes.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());

    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header
        };

        let mut candidate = base.clone();
        let mut counter = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, counter);
            counter += 1;
        }
        seen.push(candidate);
    }

    seen
}
