use std::env;
use std::path::PathBuf;

use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::application::{generate_attestations, generate_from_settings};
use crate::domain::error::Result;
use crate::domain::generation_settings::{GenerationMode, GenerationSettings};
use crate::domain::report::GenerationReport;
use crate::infrastructure::config::ConfigService;

/// Points at the settings file; defaults to [`DEFAULT_CONFIG_FILE`].
pub const CONFIG_ENV: &str = "DOCMERGE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "docmerge.toml";

pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Run the generation mode the settings ask for.
pub fn execute(settings: &GenerationSettings) -> Result<GenerationReport> {
    let mut progress = |current: usize, total: usize, message: &str| {
        debug!(current, total, "{}", message);
    };

    match settings.mode {
        GenerationMode::Mapping => generate_from_settings(settings, Some(&mut progress)),
        GenerationMode::Attestation => generate_attestations(settings, Some(&mut progress)),
    }
}

pub fn run() -> Result<GenerationReport> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let settings = ConfigService::new(&config_path()).load()?;
    execute(&settings).map_err(|e| {
        error!(error = %e, "Generation failed");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation_settings::{MappingEntry, OutputOptions};
    use crate::infrastructure::docx::save_docx;
    use docx_rs::{Docx, Paragraph, Run};

    fn write_inputs(dir: &std::path::Path) -> (PathBuf, PathBuf) {
        let csv_path = dir.join("dons.csv");
        std::fs::write(&csv_path, "Prénom,Nom,Montant\nMarie,Dupont,120\nJean,Favre,\n").unwrap();

        let template_path = dir.join("modele.docx");
        save_docx(
            Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("{NOM}"))),
            &template_path,
        )
        .unwrap();
        (csv_path, template_path)
    }

    #[test]
    fn test_execute_dispatches_on_mode() {
        let dir = tempfile::tempdir().unwrap();
        let (dataset_path, template_path) = write_inputs(dir.path());
        let base = GenerationSettings {
            dataset_path,
            template_path,
            output: OutputOptions {
                output_dir: dir.path().join("out"),
                ..Default::default()
            },
            ..Default::default()
        };

        let attestation = GenerationSettings {
            mode: GenerationMode::Attestation,
            ..base.clone()
        };
        let report = execute(&attestation).unwrap();
        assert_eq!(report.generated_count(), 1);
        assert_eq!(report.skipped_rows, vec![1]);

        let mapping = GenerationSettings {
            mappings: [(
                "{NOM}".to_string(),
                MappingEntry {
                    columns: vec!["Nom".into()],
                    combine: false,
                },
            )]
            .into_iter()
            .collect(),
            ..base
        };
        let report = execute(&mapping).unwrap();
        assert_eq!(report.generated_count(), 2);
        assert!(report.skipped_rows.is_empty());
    }
}
