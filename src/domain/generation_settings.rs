// ============================================================
// GENERATION SETTINGS
// ============================================================
// Everything one generation run needs besides the data itself

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::dataset::{ColumnRoles, Dataset};
use super::error::{AppError, Result};
use super::mapping::{FieldMapping, FilenameSource, PlaceholderMapping, MAX_COLUMN_SPECS};

/// Which engine drives placeholder values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Explicit placeholder → column mapping
    #[default]
    Mapping,

    /// Donation receipts: guessed column roles fill `{NOM}`, `{MONTANT}`, `{DATE}`
    Attestation,
}

/// Salutation vocabulary used by the display-name builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalutationLocale {
    #[default]
    French,
    English,
}

/// Front-end mapping format: priority-ordered columns plus combine flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MappingEntry {
    #[validate(length(max = 5))]
    pub columns: Vec<String>,
    pub combine: bool,
}

/// Where and how generated files are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputOptions {
    #[validate(custom(function = "non_empty_path"))]
    pub output_dir: PathBuf,
    pub filename_prefix: String,
    pub filename_suffix: String,

    /// Archive file name inside `output_dir`; `None` disables zipping.
    /// Derived from `make_zip`/`archive_name` on [`GenerationSettings`].
    #[serde(skip)]
    pub archive_name: Option<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            filename_prefix: String::new(),
            filename_suffix: String::new(),
            archive_name: None,
        }
    }
}

/// Options specific to [`GenerationMode::Attestation`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttestationSettings {
    /// Text for `{DATE}`; today's date when absent
    pub date_text: Option<String>,

    /// Explicit role columns; guessed roles fill the gaps
    pub roles: ColumnRoles,

    pub locale: SalutationLocale,
}

/// Full configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "check_archive_and_mappings"))]
pub struct GenerationSettings {
    #[validate(custom(function = "non_empty_path"))]
    pub dataset_path: PathBuf,
    #[validate(custom(function = "non_empty_path"))]
    pub template_path: PathBuf,
    pub mode: GenerationMode,

    /// Column, `__TEMPLATE__{TOKEN}`, or a space-joined combination
    pub filename_field: Option<String>,
    #[validate(nested)]
    pub output: OutputOptions,
    pub make_zip: bool,
    pub archive_name: String,

    /// Placeholder → mapping entry, as saved by the front-end
    pub mappings: BTreeMap<String, MappingEntry>,
    pub attestation: AttestationSettings,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data.csv"),
            template_path: PathBuf::from("template.docx"),
            mode: GenerationMode::default(),
            filename_field: None,
            output: OutputOptions::default(),
            make_zip: false,
            archive_name: "generated_documents.zip".to_string(),
            mappings: BTreeMap::new(),
            attestation: AttestationSettings::default(),
        }
    }
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

fn non_empty_path(path: &Path) -> std::result::Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(invalid("empty_path", "path must not be empty".to_string()));
    }
    Ok(())
}

fn check_archive_and_mappings(
    settings: &GenerationSettings,
) -> std::result::Result<(), ValidationError> {
    if settings.make_zip && !settings.archive_name.ends_with(".zip") {
        return Err(invalid("archive_name", "archive_name must end with .zip".to_string()));
    }
    for (placeholder, entry) in &settings.mappings {
        if entry.validate().is_err() {
            return Err(invalid(
                "mapping_columns",
                format!(
                    "mapping for {} lists {} columns, at most {} are allowed",
                    placeholder,
                    entry.columns.len(),
                    MAX_COLUMN_SPECS
                ),
            ));
        }
    }
    if settings.mode == GenerationMode::Mapping && settings.mappings.is_empty() {
        return Err(invalid(
            "missing_mappings",
            "mapping mode needs at least one field mapping".to_string(),
        ));
    }
    Ok(())
}

impl GenerationSettings {
    /// Convert the saved mapping entries into a [`FieldMapping`], reading
    /// legacy space-joined column names against `dataset`.
    pub fn field_mapping(&self, dataset: &Dataset) -> Result<FieldMapping> {
        self.mappings
            .iter()
            .map(|(placeholder, entry)| {
                PlaceholderMapping::from_columns(placeholder, &entry.columns, entry.combine)
                    .map(|mapping| mapping.interpreted(dataset))
            })
            .collect::<Result<Vec<_>>>()
            .map(|entries| entries.into_iter().collect())
    }

    pub fn filename_source(&self, dataset: &Dataset) -> FilenameSource {
        FilenameSource::interpret(self.filename_field.as_deref(), dataset)
    }

    /// Output options with the archive switched on or off by `make_zip`.
    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            archive_name: self.make_zip.then(|| self.archive_name.clone()),
            ..self.output.clone()
        }
    }

    pub fn validated(self) -> Result<Self> {
        self.validate().map_err(|e| {
            AppError::ValidationError(format!("Invalid generation settings: {}", e))
        })?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mapping::ColumnSpec;

    fn settings_with(mappings: &[(&str, &[&str], bool)]) -> GenerationSettings {
        GenerationSettings {
            mappings: mappings
                .iter()
                .map(|(placeholder, columns, combine)| {
                    (
                        placeholder.to_string(),
                        MappingEntry {
                            columns: columns.iter().map(|c| c.to_string()).collect(),
                            combine: *combine,
                        },
                    )
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_settings_need_a_mapping() {
        assert!(GenerationSettings::default().validate().is_err());

        let attestation = GenerationSettings {
            mode: GenerationMode::Attestation,
            ..Default::default()
        };
        assert!(attestation.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_long_priority_lists() {
        let settings = settings_with(&[("{NOM}", &["a", "b", "c", "d", "e", "f"], false)]);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("{NOM}"));

        let entry = &settings.mappings["{NOM}"];
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let mut settings = settings_with(&[("{NOM}", &["Nom"], false)]);
        assert!(settings.validate().is_ok());

        settings.output.output_dir = PathBuf::new();
        let err = settings.validate().unwrap_err();
        assert!(err.errors().contains_key("output"));

        settings.output.output_dir = PathBuf::from("out");
        settings.template_path = PathBuf::new();
        let err = settings.validate().unwrap_err();
        assert!(err.errors().contains_key("template_path"));
    }

    #[test]
    fn test_validate_rejects_non_zip_archive_name() {
        let settings = GenerationSettings {
            make_zip: true,
            archive_name: "documents.tar".to_string(),
            ..settings_with(&[("{NOM}", &["Nom"], false)])
        };
        let err = settings.validated().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref msg) if msg.contains(".zip")));
    }

    #[test]
    fn test_field_mapping_conversion() {
        let settings = settings_with(&[
            ("{NOM}", &["Prénom", "Nom"], true),
            ("DATE", &["Date"], false),
        ]);
        let data = Dataset::new(
            vec!["Prénom".into(), "Nom".into(), "Date".into()],
            Vec::new(),
        );
        let mapping = settings.field_mapping(&data).unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.get("{DATE}").unwrap().source,
            Some(ColumnSpec::Column("Date".into()))
        );
    }

    #[test]
    fn test_output_options_follow_zip_flag() {
        let mut settings = GenerationSettings::default();
        assert_eq!(settings.output_options().archive_name, None);

        settings.make_zip = true;
        assert_eq!(
            settings.output_options().archive_name.as_deref(),
            Some("generated_documents.zip")
        );
    }
}
