//! Parameter extraction from the raw usage and battery datasets.

mod aggregate;
pub mod battery;
pub mod spreadsheet;
pub mod usage;

use std::io::Read;

use csv::StringRecord;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub use self::{battery::BatteryCharacteristics, usage::UsageProfile};
use crate::{core::pack::BatteryPack, prelude::*, quantity::distance::Kilometers};

/// Scalars the simulation is driven by.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExtractedParameters {
    pub mean_daily_distance: Kilometers,
    pub std_daily_distance: Kilometers,

    /// Base power-law fade constant `k`.
    pub degradation_constant: f64,

    /// Internal resistance scaled to the target pack, ohms.
    pub resistance: f64,
}

/// Which records are representative, and how the measured packs relate to the simulated ones.
#[must_use]
#[derive(Clone, Debug)]
pub struct ExtractionSettings {
    pub reference_users: Vec<u64>,
    pub reference_batteries: Vec<String>,
    pub source_pack: BatteryPack,
    pub target_pack: BatteryPack,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            reference_users: vec![579_236, 629_227, 629_740],
            reference_batteries: vec!["B5".into(), "B6".into(), "B7".into()],
            source_pack: BatteryPack::SOURCE,
            target_pack: BatteryPack::TARGET,
        }
    }
}

/// Extract the usage profile and battery constants, and scale the resistance to the target pack.
#[instrument(skip_all)]
pub fn perform_etl_and_scaling<U: Read, B: Read>(
    usage: U,
    battery: B,
    settings: &ExtractionSettings,
) -> Result<ExtractedParameters> {
    let usage = UsageProfile::try_extract(usage, &settings.reference_users)?;
    let battery = BatteryCharacteristics::try_extract(battery, &settings.reference_batteries)?;
    let resistance =
        settings.target_pack.scale_resistance_from(settings.source_pack, battery.resistance);
    let parameters = ExtractedParameters {
        mean_daily_distance: usage.mean_daily_distance,
        std_daily_distance: usage.std_daily_distance,
        degradation_constant: battery.degradation_constant,
        resistance,
    };
    info!(
        mean_daily_distance = ?parameters.mean_daily_distance,
        std_daily_distance = ?parameters.std_daily_distance,
        degradation_constant = parameters.degradation_constant,
        source_resistance = battery.resistance,
        resistance = parameters.resistance,
        "extracted",
    );
    Ok(parameters)
}

fn ensure_columns(headers: &StringRecord, required: &[&str]) -> Result {
    let missing = required.iter().filter(|column| !headers.iter().contains(*column)).join(", ");
    ensure!(missing.is_empty(), Error::data(format!("missing columns: {missing}")));
    Ok(())
}
