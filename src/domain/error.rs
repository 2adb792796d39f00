use std::fmt;

use thiserror::Error;

/// Number of unresolved mappings spelled out in a diagnostic message.
const MAX_LISTED_MAPPINGS: usize = 5;
/// Number of available column names spelled out in a diagnostic message.
const MAX_LISTED_COLUMNS: usize = 10;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Dataset load error: {0}")]
    DatasetLoad(String),
    #[error("Template error: {0}")]
    Template(String),
    #[error("Unresolved mapping: {0}")]
    UnresolvedMapping(MappingDiagnostic),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Archive error: {0}")]
    Archive(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Archive(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Every placeholder column spec that names no dataset column, plus the
/// columns that do exist.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingDiagnostic {
    /// `(placeholder, spec)` pairs, in mapping order
    pub unresolved: Vec<(String, String)>,

    /// Dataset column names, sorted
    pub available: Vec<String>,
}

impl MappingDiagnostic {
    pub fn new(unresolved: Vec<(String, String)>, mut available: Vec<String>) -> Self {
        available.sort();
        Self {
            unresolved,
            available,
        }
    }
}

impl fmt::Display for MappingDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: Vec<&str> = self
            .available
            .iter()
            .take(MAX_LISTED_COLUMNS)
            .map(String::as_str)
            .collect();

        writeln!(
            f,
            "{} mapped column(s) not found in dataset.",
            self.unresolved.len()
        )?;
        writeln!(
            f,
            "Available columns: {}{}",
            shown.join(", "),
            if self.available.len() > MAX_LISTED_COLUMNS {
                "..."
            } else {
                ""
            }
        )?;
        write!(f, "Missing mappings:")?;
        for (placeholder, spec) in self.unresolved.iter().take(MAX_LISTED_MAPPINGS) {
            write!(f, "\n  - {} -> '{}'", placeholder, spec)?;
        }
        if self.unresolved.len() > MAX_LISTED_MAPPINGS {
            write!(
                f,
                "\n  ... and {} more",
                self.unresolved.len() - MAX_LISTED_MAPPINGS
            )?;
        }
        Ok(())
    }
}
