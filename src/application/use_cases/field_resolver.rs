// ============================================================
// FIELD-MAPPING RESOLVER
// ============================================================
// Validates a FieldMapping against the dataset, then per row
// produces the placeholder values and the output file stem

use tracing::{debug, warn};

use crate::domain::dataset::{Dataset, Record};
use crate::domain::error::{AppError, MappingDiagnostic, Result};
use crate::domain::mapping::{FieldMapping, FilenamePart, FilenameSource, ValueMapping};
use crate::shared::slugify;

/// Fail unless every column spec (primary and fallback) names an existing
/// column. Reports all offending specs at once.
pub fn validate_mapping(mapping: &FieldMapping, dataset: &Dataset) -> Result<()> {
    let unresolved: Vec<(String, String)> = mapping
        .iter()
        .filter_map(|entry| entry.source.as_ref().map(|spec| (entry, spec)))
        .flat_map(|(entry, spec)| {
            spec.unresolved(dataset)
                .into_iter()
                .map(|label| (entry.placeholder.clone(), label))
        })
        .collect();

    if unresolved.is_empty() {
        return Ok(());
    }

    warn!(count = unresolved.len(), "Field mapping references unknown columns");
    Err(AppError::UnresolvedMapping(MappingDiagnostic::new(
        unresolved,
        dataset.columns().to_vec(),
    )))
}

/// Fallback stem for rows that yield no usable name.
pub fn positional_stem(record: &Record<'_>) -> String {
    format!("document_{}", record.index())
}

pub struct FieldResolver {
    mapping: FieldMapping,
    /// Template placeholders the mapping does not cover; they render blank.
    unmapped: Vec<String>,
    filename: FilenameSource,
}

impl FieldResolver {
    /// Checks the mapping against `dataset` before anything is resolved.
    pub fn new(
        mapping: FieldMapping,
        dataset: &Dataset,
        template_placeholders: &[String],
        filename: FilenameSource,
    ) -> Result<Self> {
        validate_mapping(&mapping, dataset)?;

        let unmapped: Vec<String> = template_placeholders
            .iter()
            .filter(|token| mapping.get(token).is_none())
            .cloned()
            .collect();
        if !unmapped.is_empty() {
            debug!(placeholders = ?unmapped, "Template placeholders without mapping render blank");
        }

        Ok(Self {
            mapping,
            unmapped,
            filename,
        })
    }

    /// Values for one row: mapped placeholders in mapping order, then the
    /// template's unmapped placeholders as empty strings.
    pub fn resolve(&self, record: &Record<'_>) -> ValueMapping {
        let mut values: ValueMapping = self
            .mapping
            .iter()
            .map(|entry| (entry.placeholder.clone(), entry.resolve(record)))
            .collect();
        for token in &self.unmapped {
            values.insert(token.clone(), "");
        }
        values
    }

    /// Slugified output file stem for a row, never empty.
    pub fn file_stem(&self, record: &Record<'_>, values: &ValueMapping) -> String {
        let raw = match &self.filename {
            FilenameSource::Auto => first_value(values),
            FilenameSource::Column(column) if record.get(column).is_some() => {
                record.value(column).to_string()
            }
            FilenameSource::Column(_) => first_value(values),
            FilenameSource::Placeholder(token) => {
                values.get(token).unwrap_or_default().trim().to_string()
            }
            FilenameSource::Combination(parts) => parts
                .iter()
                .map(|part| match part {
                    FilenamePart::Column(column) => record.value(column),
                    FilenamePart::Placeholder(token) => {
                        values.get(token).unwrap_or_default().trim()
                    }
                })
                .filter(|value| !value.is_empty())
                .collect::<Vec<_>>()
                .join("_"),
        };

        let stem = slugify(&raw);
        if stem.is_empty() {
            positional_stem(record)
        } else {
            stem
        }
    }
}

fn first_value(values: &ValueMapping) -> String {
    values.first_non_empty().unwrap_or_default().to_string()
}
