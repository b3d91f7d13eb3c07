use std::{fs, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use ebike_twin::{core::pack::BatteryPack, statistics::ExtractedParameters};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Extraction results carried over from `etl` to `simulate`.
#[derive(Serialize, Deserialize)]
pub struct Cache {
    pub extracted_at: DateTime<Local>,

    /// Pack the resistance has been scaled to.
    #[serde(default)]
    pub pack: BatteryPack,

    pub parameters: ExtractedParameters,
}

impl Cache {
    pub fn new(pack: BatteryPack, parameters: ExtractedParameters) -> Self {
        Self { extracted_at: Local::now(), pack, parameters }
    }

    #[instrument(skip_all, fields(path = ?path))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`, run `etl` first", path.display()))?;
        let cache: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!(extracted_at = %cache.extracted_at, parameters = ?cache.parameters, "loaded");
        Ok(cache)
    }

    #[instrument(skip_all, fields(path = ?path))]
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, toml::to_string(self)?)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        info!("saved the parameters");
        Ok(())
    }
}
