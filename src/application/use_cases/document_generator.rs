// ============================================================
// DOCUMENT GENERATOR
// ============================================================
// One document per dataset row from an explicit field mapping.
// Rows run strictly in order: clone template, substitute, save.

use std::path::{Path, PathBuf};

use docx_rs::Docx;
use tracing::{debug, info};

use crate::application::use_cases::field_resolver::FieldResolver;
use crate::application::use_cases::substitution::render;
use crate::application::use_cases::template_scanner::scan_placeholders;
use crate::domain::dataset::Dataset;
use crate::domain::error::{AppError, Result};
use crate::domain::generation_settings::{GenerationSettings, OutputOptions};
use crate::domain::mapping::{FieldMapping, FilenameSource};
use crate::domain::report::{GenerationReport, ProgressCallback};
use crate::infrastructure::archive::bundle_files;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::docx::{save_docx, Template};
use crate::infrastructure::storage::OutputDirectory;

/// Skipped row indices spelled out in the summary log.
const MAX_LOGGED_SKIPS: usize = 10;

/// Fail fast when an input file is missing, before anything is written.
fn ensure_input(path: &Path, kind: &str) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "{} not found: {}",
            kind,
            path.display()
        )))
    }
}

/// Bookkeeping shared by every generation mode: collision-free paths,
/// skipped rows, progress and the optional archive.
pub(crate) struct OutputBatch<'p> {
    directory: OutputDirectory,
    archive_name: Option<String>,
    report: GenerationReport,
    progress: Option<ProgressCallback<'p>>,
}

impl<'p> OutputBatch<'p> {
    /// Creates the output directory.
    pub(crate) fn start(
        output: &OutputOptions,
        total_rows: usize,
        progress: Option<ProgressCallback<'p>>,
    ) -> Result<Self> {
        let directory = OutputDirectory::create(
            &output.output_dir,
            &output.filename_prefix,
            &output.filename_suffix,
        )?;
        info!(
            output_dir = %output.output_dir.display(),
            rows = total_rows,
            "Starting document generation"
        );

        Ok(Self {
            directory,
            archive_name: output.archive_name.clone(),
            report: GenerationReport {
                total_rows,
                ..Default::default()
            },
            progress,
        })
    }

    pub(crate) fn save(&mut self, stem: &str, docx: Docx) -> Result<PathBuf> {
        let path = self.directory.claim(stem);
        save_docx(docx, &path)?;
        debug!(path = %path.display(), "Saved document");
        self.report.generated.push(path.clone());
        Ok(path)
    }

    pub(crate) fn skip(&mut self, index: usize) {
        debug!(row = index, "Skipping row");
        self.report.skipped_rows.push(index);
    }

    pub(crate) fn row_done(&mut self, index: usize) {
        let total = self.report.total_rows;
        if let Some(progress) = self.progress.as_mut() {
            progress(
                index + 1,
                total,
                &format!("Processing row {}/{}", index + 1, total),
            );
        }
    }

    pub(crate) fn finish(mut self) -> Result<GenerationReport> {
        if let Some(name) = &self.archive_name {
            let archive_path = self.directory.root().join(name);
            self.report.archive = bundle_files(&self.report.generated, &archive_path)?;
        }

        let report = self.report;
        info!(
            total_rows = report.total_rows,
            generated = report.generated_count(),
            skipped = report.skipped_count(),
            archive = ?report.archive,
            "Document generation finished"
        );
        if !report.skipped_rows.is_empty() {
            let shown: Vec<usize> = report
                .skipped_rows
                .iter()
                .take(MAX_LOGGED_SKIPS)
                .copied()
                .collect();
            debug!(rows = ?shown, "Skipped rows");
        }

        if let Some(progress) = self.progress {
            progress(
                report.total_rows,
                report.total_rows,
                &format!("Complete! Generated {} files", report.generated_count()),
            );
        }
        Ok(report)
    }
}

/// Generate from already loaded inputs. The mapping is validated before the
/// output directory is touched; blank rows are skipped and recorded.
pub fn generate_with(
    dataset: &Dataset,
    template: &Template,
    mapping: FieldMapping,
    filename: FilenameSource,
    output: &OutputOptions,
    progress: Option<ProgressCallback<'_>>,
) -> Result<GenerationReport> {
    let placeholders = scan_placeholders(template.document());
    debug!(
        template = ?template.source(),
        placeholders = ?placeholders,
        "Scanned template placeholders"
    );
    let resolver = FieldResolver::new(mapping, dataset, &placeholders, filename)?;

    let mut batch = OutputBatch::start(output, dataset.len(), progress)?;
    for record in dataset.records() {
        if record.is_blank() {
            batch.skip(record.index());
        } else {
            let values = resolver.resolve(&record);
            let docx = render(template, &values)?;
            batch.save(&resolver.file_stem(&record, &values), docx)?;
        }
        batch.row_done(record.index());
    }
    batch.finish()
}

/// Load the dataset and template from disk, then [`generate_with`].
pub fn generate_documents(
    dataset_path: &Path,
    template_path: &Path,
    mapping: FieldMapping,
    filename: FilenameSource,
    output: &OutputOptions,
    progress: Option<ProgressCallback<'_>>,
) -> Result<GenerationReport> {
    let (dataset, template) = load_inputs(dataset_path, template_path)?;
    generate_with(&dataset, &template, mapping, filename, output, progress)
}

/// Check both inputs exist, then parse them.
pub(crate) fn load_inputs(
    dataset_path: &Path,
    template_path: &Path,
) -> Result<(Dataset, Template)> {
    ensure_input(dataset_path, "Dataset")?;
    ensure_input(template_path, "Template")?;

    let dataset = CsvParser::parse_file_auto_detect(dataset_path)?;
    let template = Template::load(template_path)?;
    Ok((dataset, template))
}

/// Mapping-mode run driven entirely by settings.
pub fn generate_from_settings(
    settings: &GenerationSettings,
    progress: Option<ProgressCallback<'_>>,
) -> Result<GenerationReport> {
    let (dataset, template) = load_inputs(&settings.dataset_path, &settings.template_path)?;
    generate_with(
        &dataset,
        &template,
        settings.field_mapping(&dataset)?,
        settings.filename_source(&dataset),
        &settings.output_options(),
        progress,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation_settings::MappingEntry;
    use crate::domain::mapping::PlaceholderMapping;
    use crate::infrastructure::docx::{for_each_paragraph, paragraph_text};
    use docx_rs::{Paragraph, Run};
    use std::fs::File;

    fn template() -> Template {
        let docx = Docx::new()
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Cher {NO").bold())
                    .add_run(Run::new().add_text("M},")),
            )
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("{VILLE}{REMARQUE}")));
        Template::from_docx(docx).unwrap()
    }

    fn dataset(rows: &[[&str; 3]]) -> Dataset {
        Dataset::new(
            vec!["Prénom".into(), "Nom".into(), "Ville".into()],
            rows.iter()
                .map(|row| row.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
    }

    fn mapping() -> FieldMapping {
        let columns = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        let name = columns(&["Prénom", "Nom"]);
        let city = columns(&["Ville"]);
        FieldMapping::new()
            .with(PlaceholderMapping::from_columns("{NOM}", &name, true).unwrap())
            .with(PlaceholderMapping::from_columns("{VILLE}", &city, false).unwrap())
    }

    fn output(dir: &Path) -> OutputOptions {
        OutputOptions {
            output_dir: dir.join("out"),
            filename_prefix: "Lettre_".into(),
            ..Default::default()
        }
    }

    fn document_text(path: &Path) -> Vec<String> {
        let template = Template::load(path).unwrap();
        let mut texts = Vec::new();
        for_each_paragraph(template.document(), &mut |p| texts.push(paragraph_text(p)));
        texts
    }

    #[test]
    fn test_blank_row_is_skipped_and_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let data = dataset(&[
            ["Jean", "Dupont", "Lausanne"],
            ["", " ", ""],
            ["Marie", "Curie", "Paris"],
        ]);

        let mut calls = Vec::new();
        let mut record_progress =
            |current: usize, total: usize, _: &str| calls.push((current, total));
        let report = generate_with(
            &data,
            &template(),
            mapping(),
            FilenameSource::Auto,
            &output(dir.path()),
            Some(&mut record_progress),
        )
        .unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.generated_count(), 2);
        assert_eq!(report.skipped_rows, vec![1]);
        assert_eq!(report.archive, None);
        assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3), (3, 3)]);

        let first = dir.path().join("out").join("Lettre_Jean_Dupont.docx");
        assert_eq!(report.generated[0], first);
        assert_eq!(document_text(&first), vec!["Cher Jean Dupont,", "Lausanne"]);
    }

    #[test]
    fn test_invalid_mapping_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let data = dataset(&[["Jean", "Dupont", "Lausanne"]]);
        let bad = mapping().with(
            PlaceholderMapping::from_columns("{TEL}", &["Téléphone".to_string()], false).unwrap(),
        );

        let err = generate_with(
            &data,
            &template(),
            bad,
            FilenameSource::Auto,
            &output(dir.path()),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, AppError::UnresolvedMapping(_)));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_name_collisions_get_numeric_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let out = output(dir.path());
        std::fs::create_dir_all(&out.output_dir).unwrap();
        std::fs::write(out.output_dir.join("Lettre_Lausanne.docx"), b"existing").unwrap();

        let data = dataset(&[
            ["Jean", "Dupont", "Lausanne"],
            ["Marie", "Curie", "Lausanne"],
        ]);
        let report = generate_with(
            &data,
            &template(),
            mapping(),
            FilenameSource::Column("Ville".into()),
            &out,
            None,
        )
        .unwrap();

        let names: Vec<String> = report
            .generated
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Lettre_Lausanne_1.docx", "Lettre_Lausanne_2.docx"]);
    }

    #[test]
    fn test_archive_holds_every_document() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputOptions {
            archive_name: Some("lettres.zip".into()),
            ..output(dir.path())
        };
        let data = dataset(&[["Jean", "Dupont", "Lausanne"], ["Marie", "Curie", "Paris"]]);

        let report =
            generate_with(&data, &template(), mapping(), FilenameSource::Auto, &out, None).unwrap();

        let archive_path = out.output_dir.join("lettres.zip");
        assert_eq!(report.archive.as_deref(), Some(archive_path.as_path()));
        let archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let mut entries: Vec<&str> = archive.file_names().collect();
        entries.sort();
        assert_eq!(entries, vec!["Lettre_Jean_Dupont.docx", "Lettre_Marie_Curie.docx"]);
    }

    #[test]
    fn test_generate_documents_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("donateurs.csv");
        std::fs::write(&csv_path, "Prénom;Nom;Ville\nJean;Dupont;Lausanne\n").unwrap();
        let template_path = dir.path().join("lettre.docx");
        save_docx(
            Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("{NOM}"))),
            &template_path,
        )
        .unwrap();

        let report = generate_documents(
            &csv_path,
            &template_path,
            mapping(),
            FilenameSource::Placeholder("{NOM}".into()),
            &output(dir.path()),
            None,
        )
        .unwrap();

        assert_eq!(report.generated_count(), 1);
        assert_eq!(document_text(&report.generated[0]), vec!["Jean Dupont"]);
    }

    #[test]
    fn test_settings_filename_field_may_name_a_spaced_column() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("organisations.csv");
        std::fs::write(&csv_path, "Nom complet;Ville\nFondation Vaudoise;Lausanne\n").unwrap();
        let template_path = dir.path().join("lettre.docx");
        save_docx(
            Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("{NOM}"))),
            &template_path,
        )
        .unwrap();

        let settings = GenerationSettings {
            dataset_path: csv_path,
            template_path,
            filename_field: Some("Nom complet".into()),
            mappings: [(
                "{NOM}".to_string(),
                MappingEntry {
                    columns: vec!["Nom complet".into()],
                    combine: false,
                },
            )]
            .into_iter()
            .collect(),
            output: OutputOptions {
                output_dir: dir.path().join("out"),
                ..Default::default()
            },
            ..Default::default()
        };

        let report = generate_from_settings(&settings, None).unwrap();
        assert_eq!(
            report.generated,
            vec![dir.path().join("out").join("Fondation_Vaudoise.docx")]
        );
        assert_eq!(document_text(&report.generated[0]), vec!["Fondation Vaudoise"]);
    }

    #[test]
    fn test_missing_inputs_are_reported_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_documents(
            &dir.path().join("absent.csv"),
            &dir.path().join("absent.docx"),
            mapping(),
            FilenameSource::Auto,
            &output(dir.path()),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!dir.path().join("out").exists());
    }
}
