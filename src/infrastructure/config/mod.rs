use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use tracing::{debug, info};

use crate::domain::error::Result;
use crate::domain::generation_settings::GenerationSettings;

/// Environment variable prefix for settings overrides (`DOCMERGE_MAKE_ZIP=true`).
pub const ENV_PREFIX: &str = "DOCMERGE_";

pub struct ConfigService {
    figment: Figment,
}

impl ConfigService {
    /// Defaults, then the TOML file at `path` (when it exists), then
    /// `DOCMERGE_*` environment variables. `__` separates nested keys.
    pub fn new(path: &Path) -> Self {
        let mut figment =
            Figment::from(Serialized::defaults(GenerationSettings::default()));

        if path.exists() {
            debug!(path = %path.display(), "Merging settings file");
            figment = figment.merge(Toml::file(path));
        }

        Self {
            figment: figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]).split("__")),
        }
    }

    pub fn load(&self) -> Result<GenerationSettings> {
        let settings: GenerationSettings = self.figment.extract()?;
        let settings = settings.validated()?;
        info!(
            dataset = %settings.dataset_path.display(),
            template = %settings.template_path.display(),
            mode = ?settings.mode,
            "Loaded generation settings"
        );
        Ok(settings)
    }
}
