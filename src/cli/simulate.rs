use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use ebike_twin::{
    core::{fleet::Fleet, simulation::FLEET_SIZE},
    parse_route,
    quantity::{cost::Cost, proportions::Percent, rate::KilowattHourRate},
    run_fleet_simulation,
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    cache::Cache,
    tables::{build_fleets_table, build_ranking_table, build_telemetry_table},
};

#[derive(Parser)]
pub struct SimulateArgs {
    /// Parameters extracted by the `etl` command.
    #[clap(long, env = "PARAMETERS_PATH", default_value = "parameters.toml")]
    pub parameters: PathBuf,

    /// GPX track of the delivery route.
    #[clap(long, env = "ROUTE_PATH")]
    pub route: PathBuf,

    /// Depot charging tariff, KSh per kilowatt-hour.
    #[clap(long = "grid-tariff", default_value = "16", env = "GRID_TARIFF")]
    pub grid_tariff: KilowattHourRate,

    /// Battery swap fee, KSh.
    #[clap(long = "swap-fee", default_value = "206", env = "SWAP_FEE")]
    pub swap_fee: Cost,

    /// Bike, rider and cargo mass in kilograms.
    #[clap(long = "payload-kg", default_value = "200", env = "PAYLOAD_KG")]
    pub payload: f64,

    /// Lowest state-of-charge at which riders go for a swap.
    #[clap(long = "anxiety-min-percent", default_value = "20", env = "ANXIETY_MIN_PERCENT")]
    pub anxiety_min: Percent,

    /// Highest state-of-charge at which riders go for a swap.
    #[clap(long = "anxiety-max-percent", default_value = "35", env = "ANXIETY_MAX_PERCENT")]
    pub anxiety_max: Percent,

    /// Ambient temperature in °C.
    #[clap(long = "ambient-temperature", default_value = "25", env = "AMBIENT_TEMPERATURE")]
    pub ambient_temperature: f64,

    #[clap(long = "days", default_value = "40", env = "SIMULATION_DAYS")]
    pub n_days: u32,

    #[clap(long = "fleet-size", default_value_t = FLEET_SIZE, env = "FLEET_SIZE")]
    pub fleet_size: usize,

    /// Random seed for reproducible runs.
    #[clap(long, env = "SEED")]
    pub seed: Option<u64>,

    /// Export the daily telemetry of the representative bikes.
    #[clap(long = "telemetry-csv", env = "TELEMETRY_CSV_PATH")]
    pub telemetry_csv: Option<PathBuf>,
}

#[instrument(skip_all)]
pub fn simulate(args: &SimulateArgs) -> Result<()> {
    let cache = Cache::read_from(&args.parameters)?;
    let route = {
        let file = File::open(&args.route)
            .with_context(|| format!("failed to open `{}`", args.route.display()))?;
        parse_route(file)?
    };
    let mut rng = args.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let start_time = Instant::now();
    let outcome = run_fleet_simulation()
        .parameters(&cache.parameters)
        .route(&route)
        .grid_tariff(args.grid_tariff)
        .swap_fee(args.swap_fee)
        .payload(args.payload)
        .anxiety_min(args.anxiety_min)
        .anxiety_max(args.anxiety_max)
        .ambient_temperature(args.ambient_temperature)
        .n_days(args.n_days)
        .rng(&mut rng)
        .on_progress(|progress| debug!(progress = ?Percent::from_proportion(progress), "simulated"))
        .fleet_size(args.fleet_size)
        .pack(cache.pack)
        .call()
        .context("the simulation has failed")?;
    info!(elapsed = ?start_time.elapsed(), "simulated");

    println!("{}", build_ranking_table(&outcome.summaries, outcome.best_model));
    println!("{}", build_fleets_table(&outcome.summaries));
    println!("{}", build_telemetry_table(&outcome.fleets));
    match outcome.best_model {
        Some(model) => info!(%model, "verdict"),
        None => warn!("nothing has been ridden, no verdict"),
    }

    if let Some(path) = &args.telemetry_csv {
        export_telemetry(path, &outcome.fleets)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct TelemetryRow<'a> {
    fleet: &'a str,
    day: u32,
    soh_percent: f64,
    wh_per_km: f64,
    capacity_ah: f64,
    cumulative_cost: f64,
}

/// Write the daily records of every representative bike, fleet after fleet.
#[instrument(skip_all, fields(path = ?path))]
fn export_telemetry(path: &Path, fleets: &[Fleet]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create `{}`", path.display()))?;
    let mut n_rows = 0_usize;
    for fleet in fleets {
        let name = fleet.name();
        for record in fleet.representative().map(|bike| bike.telemetry()).unwrap_or_default() {
            writer.serialize(TelemetryRow {
                fleet: &name,
                day: record.day,
                soh_percent: record.state_of_health.0,
                wh_per_km: record.energy_intensity.to_watt_hours_per_kilometer(),
                capacity_ah: record.capacity_ah,
                cumulative_cost: record.cumulative_cost.0,
            })?;
            n_rows += 1;
        }
    }
    writer.flush()?;
    info!(n_rows, "exported the telemetry");
    Ok(())
}
