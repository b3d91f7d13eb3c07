use std::{collections::BTreeMap, io::Read};

use average::Variance;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::ensure_columns;
use crate::{prelude::*, quantity::distance::Kilometers};

#[derive(Deserialize)]
struct UsageRecord {
    /// Kept as text: exports with missing cells render the ids as floats.
    user_id: Option<String>,
    start_date: String,
    distance_km: Option<f64>,
}

/// Daily distance statistics over the representative users.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UsageProfile {
    pub mean_daily_distance: Kilometers,

    /// Sample standard deviation, zero for a single user-day.
    pub std_daily_distance: Kilometers,

    pub n_user_days: usize,
}

impl UsageProfile {
    #[instrument(skip_all)]
    pub fn try_extract<R: Read>(reader: R, reference_users: &[u64]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        ensure_columns(reader.headers()?, &["user_id", "start_date", "distance_km"])?;

        let mut daily_distances = BTreeMap::<(u64, NaiveDate), f64>::new();
        for record in reader.deserialize() {
            let record: UsageRecord = record?;
            let Some(user_id) = record.user_id.as_deref().and_then(parse_user_id) else {
                continue;
            };
            if !reference_users.contains(&user_id) {
                continue;
            }
            let date = parse_date(&record.start_date)?;
            *daily_distances.entry((user_id, date)).or_default() +=
                record.distance_km.unwrap_or_default();
        }
        ensure!(
            !daily_distances.is_empty(),
            Error::data("no usage records for the reference users"),
        );

        let variance: Variance = daily_distances.values().copied().collect();
        let std_daily_distance =
            if variance.len() < 2 { 0.0 } else { variance.sample_variance().sqrt() };
        let profile = Self {
            mean_daily_distance: Kilometers::from(variance.mean()),
            std_daily_distance: Kilometers::from(std_daily_distance),
            n_user_days: daily_distances.len(),
        };
        debug!(?profile, "extracted the usage profile");
        Ok(profile)
    }
}

/// Numeric user identifier, also accepting the integral float form such as `579236.0`.
fn parse_user_id(text: &str) -> Option<u64> {
    if let Ok(user_id) = text.parse() {
        return Some(user_id);
    }
    let user_id: f64 = text.parse().ok()?;
    let is_integral = user_id.is_finite()
        && user_id >= 0.0
        && user_id.fract() == 0.0
        && user_id < 2.0_f64.powi(53);
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let user_id = user_id as u64;
    is_integral.then_some(user_id)
}

/// Calendar date of a trip start timestamp.
fn parse_date(text: &str) -> Result<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(timestamp.date());
        }
    }
    ["%Y-%m-%d", "%Y/%m/%d"]
        .into_iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .ok_or_else(|| Error::data(format!("unrecognized start date: `{text}`")))
}
