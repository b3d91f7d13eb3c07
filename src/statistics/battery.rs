use std::io::Read;

use average::Mean;
use serde::Deserialize;

use super::{aggregate::Aggregate, ensure_columns};
use crate::prelude::*;

#[derive(Deserialize)]
struct TelemetryRecord {
    battery_id: String,
    cycle: Option<f64>,

    #[serde(rename = "SOH")]
    state_of_health: Option<f64>,

    #[serde(rename = "chV")]
    charge_voltage: Option<f64>,

    #[serde(rename = "disV")]
    discharge_voltage: Option<f64>,

    #[serde(rename = "chI")]
    charge_current: Option<f64>,

    #[serde(rename = "disI")]
    discharge_current: Option<f64>,
}

impl TelemetryRecord {
    /// Power-law fade constant implied by this record, with the square-root cycle exponent.
    fn degradation_constant(&self) -> Option<f64> {
        let cycle = self.cycle?;
        let state_of_health = self.state_of_health? / 100.0;
        Some((1.0 - state_of_health) / cycle.sqrt())
    }

    /// Voltage sag over the total current, ohms.
    fn resistance(&self) -> Option<f64> {
        let sag = (self.charge_voltage? - self.discharge_voltage?).abs();
        let resistance = sag / (self.charge_current? + self.discharge_current?);
        resistance.is_finite().then_some(resistance)
    }
}

/// Degradation and resistance constants measured on the source pack.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BatteryCharacteristics {
    pub degradation_constant: f64,

    /// Median internal resistance, ohms.
    pub resistance: f64,

    pub n_samples: usize,
}

impl BatteryCharacteristics {
    #[instrument(skip_all)]
    pub fn try_extract<R: Read>(reader: R, reference_batteries: &[String]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        ensure_columns(
            reader.headers()?,
            &["battery_id", "cycle", "SOH", "chV", "disV", "chI", "disI"],
        )?;

        let mut records = Vec::new();
        for record in reader.deserialize() {
            let record: TelemetryRecord = record?;
            if reference_batteries.contains(&record.battery_id)
                && record.cycle.is_some_and(|cycle| cycle > 0.0)
            {
                records.push(record);
            }
        }
        ensure!(!records.is_empty(), Error::data("no cycling records for the reference batteries"));

        let degradation_constant: Mean =
            records.iter().filter_map(TelemetryRecord::degradation_constant).collect();
        ensure!(
            !degradation_constant.is_empty(),
            Error::data("no state-of-health samples for the reference batteries"),
        );
        let resistance = records
            .iter()
            .filter_map(TelemetryRecord::resistance)
            .median()
            .ok_or_else(|| Error::data("no finite resistance samples"))?;

        let characteristics = Self {
            degradation_constant: degradation_constant.mean(),
            resistance,
            n_samples: records.len(),
        };
        debug!(?characteristics, "extracted the battery characteristics");
        Ok(characteristics)
    }
}
