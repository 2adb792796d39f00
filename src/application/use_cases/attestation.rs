// ============================================================
// ATTESTATION GENERATOR
// ============================================================
// Donation receipts: column roles are guessed from the headers,
// each row fills {NOM}, {MONTANT} and {DATE}. Rows without a
// positive amount produce no receipt.

use std::path::Path;

use chrono::Local;
use tracing::info;

use crate::application::use_cases::amount_parser::{find_amount_in_row, format_amount};
use crate::application::use_cases::column_classifier::classify_columns;
use crate::application::use_cases::display_name::{DisplayNameBuilder, Salutations};
use crate::application::use_cases::document_generator::{load_inputs, OutputBatch};
use crate::application::use_cases::substitution::render;
use crate::domain::dataset::{ColumnRoles, Dataset, Record};
use crate::domain::error::Result;
use crate::domain::generation_settings::{AttestationSettings, GenerationSettings, OutputOptions};
use crate::domain::mapping::ValueMapping;
use crate::domain::report::{GenerationReport, ProgressCallback};
use crate::infrastructure::docx::Template;
use crate::shared::slugify;

pub const NAME_PLACEHOLDER: &str = "{NOM}";
pub const AMOUNT_PLACEHOLDER: &str = "{MONTANT}";
pub const DATE_PLACEHOLDER: &str = "{DATE}";

pub const ATTESTATION_FILE_PREFIX: &str = "Attestation_";
pub const ATTESTATION_ARCHIVE_NAME: &str = "attestations.zip";

/// `dd.mm.yyyy` in local time.
pub fn today_text() -> String {
    Local::now().format("%d.%m.%Y").to_string()
}

/// Output options for receipts: `Attestation_` goes in front of the
/// configured prefix and the archive is `attestations.zip`.
pub fn attestation_output_options(settings: &GenerationSettings) -> OutputOptions {
    OutputOptions {
        filename_prefix: format!("{}{}", settings.output.filename_prefix, ATTESTATION_FILE_PREFIX),
        archive_name: settings.make_zip.then(|| ATTESTATION_ARCHIVE_NAME.to_string()),
        ..settings.output.clone()
    }
}

pub struct AttestationGenerator {
    overrides: ColumnRoles,
    salutations: &'static Salutations,
    date_text: String,
}

impl AttestationGenerator {
    pub fn new(settings: &AttestationSettings) -> Self {
        Self {
            overrides: settings.roles.clone(),
            salutations: Salutations::for_locale(settings.locale),
            date_text: settings.date_text.clone().unwrap_or_else(today_text),
        }
    }

    /// Guessed roles, with configured columns taking precedence.
    pub fn roles_for(&self, dataset: &Dataset) -> ColumnRoles {
        classify_columns(dataset).with_overrides(&self.overrides)
    }

    /// Placeholder values for one row, `None` when the amount is not positive.
    pub fn values_for(&self, record: &Record<'_>, roles: &ColumnRoles) -> Option<ValueMapping> {
        let amount = find_amount_in_row(record, roles.amount.as_deref());
        if amount <= 0.0 {
            return None;
        }

        let name = DisplayNameBuilder::new(roles, self.salutations).build(record);
        Some(
            [
                (NAME_PLACEHOLDER, name),
                (AMOUNT_PLACEHOLDER, format_amount(amount)),
                (DATE_PLACEHOLDER, self.date_text.clone()),
            ]
            .into_iter()
            .collect(),
        )
    }

    pub fn generate_with(
        &self,
        dataset: &Dataset,
        template: &Template,
        output: &OutputOptions,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<GenerationReport> {
        let roles = self.roles_for(dataset);

        let mut batch = OutputBatch::start(output, dataset.len(), progress)?;
        for record in dataset.records() {
            match self.values_for(&record, &roles) {
                Some(values) => {
                    let name = values.get(NAME_PLACEHOLDER).unwrap_or_default();
                    let stem = match slugify(name) {
                        slug if slug.is_empty() => format!("document_{}", record.index()),
                        slug => slug,
                    };
                    let docx = render(template, &values)?;
                    batch.save(&stem, docx)?;
                }
                None => batch.skip(record.index()),
            }
            batch.row_done(record.index());
        }

        let report = batch.finish()?;
        info!(
            receipts = report.generated_count(),
            without_amount = report.skipped_count(),
            "Attestations ready"
        );
        Ok(report)
    }

    pub fn generate(
        &self,
        dataset_path: &Path,
        template_path: &Path,
        output: &OutputOptions,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<GenerationReport> {
        let (dataset, template) = load_inputs(dataset_path, template_path)?;
        self.generate_with(&dataset, &template, output, progress)
    }
}

/// Attestation-mode run driven entirely by settings.
pub fn generate_attestations(
    settings: &GenerationSettings,
    progress: Option<ProgressCallback<'_>>,
) -> Result<GenerationReport> {
    AttestationGenerator::new(&settings.attestation).generate(
        &settings.dataset_path,
        &settings.template_path,
        &attestation_output_options(settings),
        progress,
    )
}
