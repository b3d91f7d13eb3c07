use std::{
    fs::{self, File},
    io::{BufReader, Cursor, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use ebike_twin::{
    core::pack::BatteryPack,
    perform_etl_and_scaling,
    statistics::{
        ExtractionSettings,
        spreadsheet::{DatasetFormat, workbook_to_csv},
    },
};
use tracing::instrument;

use crate::{cache::Cache, tables::build_parameters_table};

#[derive(Parser)]
pub struct EtlArgs {
    /// Trip log, CSV or workbook, with `user_id`, `start_date` and `distance_km` columns.
    #[clap(long, env = "USAGE_PATH")]
    pub usage: PathBuf,

    /// Battery cycling telemetry, CSV or workbook.
    #[clap(long, env = "BATTERY_PATH")]
    pub battery: PathBuf,

    #[clap(long, short, env = "PARAMETERS_PATH", default_value = "parameters.toml")]
    pub output: PathBuf,

    /// Users whose daily distance is representative for the fleet.
    #[clap(
        long = "reference-users",
        env = "REFERENCE_USERS",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "579236,629227,629740",
    )]
    pub reference_users: Vec<u64>,

    /// Batteries whose cycling telemetry is representative for the fleet.
    #[clap(
        long = "reference-batteries",
        env = "REFERENCE_BATTERIES",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "B5,B6,B7",
    )]
    pub reference_batteries: Vec<String>,

    #[clap(flatten)]
    pub packs: PackArgs,
}

/// Pack the telemetry has been recorded on, and the pack fitted to the simulated bikes.
#[derive(Copy, Clone, Parser)]
pub struct PackArgs {
    #[clap(long = "source-pack-voltage", default_value = "72", env = "SOURCE_PACK_VOLTAGE")]
    pub source_voltage: f64,

    #[clap(long = "source-pack-capacity-ah", default_value = "40", env = "SOURCE_PACK_CAPACITY_AH")]
    pub source_capacity_ah: f64,

    #[clap(long = "target-pack-voltage", default_value = "48", env = "TARGET_PACK_VOLTAGE")]
    pub target_voltage: f64,

    #[clap(long = "target-pack-capacity-ah", default_value = "30", env = "TARGET_PACK_CAPACITY_AH")]
    pub target_capacity_ah: f64,
}

impl PackArgs {
    pub const fn source(self) -> BatteryPack {
        BatteryPack { voltage: self.source_voltage, capacity_ah: self.source_capacity_ah }
    }

    pub const fn target(self) -> BatteryPack {
        BatteryPack { voltage: self.target_voltage, capacity_ah: self.target_capacity_ah }
    }
}

#[instrument(skip_all)]
pub fn etl(args: &EtlArgs) -> Result<()> {
    let usage = open_dataset(&args.usage)?;
    let battery = open_dataset(&args.battery)?;
    let settings = ExtractionSettings {
        reference_users: args.reference_users.clone(),
        reference_batteries: args.reference_batteries.clone(),
        source_pack: args.packs.source(),
        target_pack: args.packs.target(),
    };
    let parameters = perform_etl_and_scaling(usage, battery, &settings)
        .context("failed to extract the parameters")?;
    println!("{}", build_parameters_table(&parameters, settings.target_pack));
    Cache::new(settings.target_pack, parameters).write_to(&args.output)
}

fn open_dataset(path: &Path) -> Result<Box<dyn Read>> {
    match DatasetFormat::from_path(path) {
        DatasetFormat::Csv => {
            let file =
                File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        DatasetFormat::Workbook => {
            let workbook =
                fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
            let csv = workbook_to_csv(Cursor::new(workbook))
                .with_context(|| format!("failed to convert the workbook `{}`", path.display()))?;
            Ok(Box::new(Cursor::new(csv)))
        }
    }
}
