use std::path::PathBuf;

use serde::Serialize;

/// Outcome of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Rows in the dataset, skipped ones included
    pub total_rows: usize,

    /// Written documents, in dataset order
    pub generated: Vec<PathBuf>,

    /// 0-based dataset indices of rows that produced no document
    pub skipped_rows: Vec<usize>,

    pub archive: Option<PathBuf>,
}

impl GenerationReport {
    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_rows.len()
    }
}

/// Observer called as `(rows_done, total_rows, message)`.
pub type ProgressCallback<'p> = &'p mut dyn FnMut(usize, usize, &str);
