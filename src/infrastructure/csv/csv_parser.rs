// ============================================================
// CSV PARSER
// ============================================================
// Load delimited text files with encoding and delimiter detection

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use encoding_rs::{Encoding, ISO_8859_15, UTF_8, WINDOWS_1252};
use tracing::{debug, info};

use crate::domain::dataset::Dataset;
use crate::domain::error::{AppError, Result};

/// Text encodings tried, in order, when loading a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// UTF-8, byte order mark removed
    Utf8Sig,
    Utf8,
    Windows1252,
    Latin9,
}

impl SourceEncoding {
    pub const ATTEMPT_ORDER: [SourceEncoding; 4] = [
        SourceEncoding::Utf8Sig,
        SourceEncoding::Utf8,
        SourceEncoding::Windows1252,
        SourceEncoding::Latin9,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8Sig => "utf-8-sig",
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Windows1252 => "windows-1252",
            SourceEncoding::Latin9 => "iso-8859-15",
        }
    }

    /// Strict decode; `None` when the bytes are not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            SourceEncoding::Utf8Sig => {
                let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
                (!had_errors).then(|| text.into_owned())
            }
            SourceEncoding::Utf8 => decode_strict(UTF_8, bytes),
            SourceEncoding::Windows1252 => decode_strict(WINDOWS_1252, bytes),
            SourceEncoding::Latin9 => decode_strict(ISO_8859_15, bytes),
        }
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// CSV parser with encoding detection
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::DatasetLoad(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(AppError::DatasetLoad(
                "CSV header row is missing".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::DatasetLoad(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Dataset::new(headers, rows))
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }

    /// Parse raw bytes, trying each encoding in turn with delimiter
    /// auto-detection. The first encoding that decodes and parses wins.
    pub fn parse_bytes_auto_detect(bytes: &[u8]) -> Result<Dataset> {
        let mut last_error = String::from("no encoding attempted");

        for encoding in SourceEncoding::ATTEMPT_ORDER {
            let Some(content) = encoding.decode(bytes) else {
                debug!(encoding = encoding.label(), "Dataset is not valid in encoding");
                last_error = format!("content is not valid {}", encoding.label());
                continue;
            };

            let delimiter = Self::detect_delimiter(&content);
            match Self::new().with_delimiter(delimiter).parse_content(&content) {
                Ok(dataset) => {
                    info!(
                        encoding = encoding.label(),
                        delimiter = %(delimiter as char).escape_default(),
                        columns = dataset.columns().len(),
                        rows = dataset.len(),
                        "Loaded dataset"
                    );
                    return Ok(dataset);
                }
                Err(err) => {
                    debug!(
                        encoding = encoding.label(),
                        error = %err,
                        "Dataset parse attempt failed"
                    );
                    last_error = err.to_string();
                }
            }
        }

        Err(AppError::DatasetLoad(format!(
            "Unable to read dataset. Last error: {}",
            last_error
        )))
    }

    /// Parse CSV file with automatic encoding and delimiter detection
    pub fn parse_file_auto_detect(path: &Path) -> Result<Dataset> {
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "Dataset not found: {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| AppError::IoError(format!("Failed to read file: {}", e)))?;

        Self::parse_bytes_auto_detect(&bytes).map_err(|err| match err {
            AppError::DatasetLoad(msg) => {
                AppError::DatasetLoad(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }
}
