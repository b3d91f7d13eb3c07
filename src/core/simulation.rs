//! Day-by-day Monte-Carlo run of the four fleets.

use std::sync::Arc;

use bon::builder;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    core::{
        bike::{AnxietyBand, BikeProfile},
        business_model::{BusinessModel, OwnershipMode},
        chemistry::Chemistry,
        energy::EnergyCoefficients,
        fleet::{Fleet, FleetSummary},
        pack::BatteryPack,
        thermal::PowerLawFade,
    },
    prelude::*,
    quantity::{
        cost::Cost,
        proportions::Percent,
        rate::{KilometerCost, KilowattHourRate},
    },
    route::Route,
    statistics::ExtractedParameters,
};

pub const FLEET_SIZE: usize = 100;

/// Bounds of the daily trip count of a single bike.
const MIN_DAILY_TRIPS: f64 = 1.0;
const MAX_DAILY_TRIPS: f64 = 20.0;

/// Final state of every fleet together with the ranking.
#[must_use]
#[derive(Clone, Debug)]
pub struct SimulationOutcome {
    /// In the [`BusinessModel::all`] order.
    pub fleets: Vec<Fleet>,

    pub summaries: Vec<FleetSummary>,

    /// Cheapest model per kilometer, `None` if nothing has been ridden.
    pub best_model: Option<BusinessModel>,
}

impl SimulationOutcome {
    /// Cost per kilometer keyed by the model name.
    pub fn results_by_name(&self) -> impl Iterator<Item = (String, Option<KilometerCost>)> + '_ {
        self.summaries.iter().map(|summary| (summary.model.to_string(), summary.cost_per_km))
    }

    #[must_use]
    pub fn best_model_name(&self) -> Option<String> {
        self.best_model.map(|model| model.to_string())
    }
}

/// Simulate the fleets over `n_days` days.
///
/// The `on_progress` observer receives the completed fraction after every simulated day.
#[builder]
pub fn run_fleet_simulation<R: Rng, F: FnMut(f64)>(
    parameters: &ExtractedParameters,
    route: &Route,
    grid_tariff: KilowattHourRate,
    swap_fee: Cost,
    payload: f64,
    anxiety_min: Percent,
    anxiety_max: Percent,
    ambient_temperature: f64,
    n_days: u32,
    rng: &mut R,
    mut on_progress: F,
    #[builder(default = FLEET_SIZE)] fleet_size: usize,
    #[builder(default)] pack: BatteryPack,
) -> Result<SimulationOutcome> {
    let route_length = route.length();
    ensure!(route_length.0 > 0.0, Error::invalid_parameters("the route has zero length"));
    ensure!(fleet_size != 0, Error::invalid_parameters("the fleet is empty"));
    ensure!(
        grid_tariff.is_finite()
            && grid_tariff.0 >= 0.0
            && swap_fee.is_finite()
            && swap_fee.0 >= 0.0,
        Error::invalid_parameters(format!("invalid prices: {grid_tariff}, {swap_fee}")),
    );
    ensure!(
        payload.is_finite() && payload >= 0.0,
        Error::invalid_parameters(format!("invalid payload: {payload} kg")),
    );
    ensure!(
        ambient_temperature.is_finite(),
        Error::invalid_parameters("ambient temperature is not finite"),
    );
    ensure!(
        parameters.mean_daily_distance.is_finite()
            && parameters.mean_daily_distance.0 >= 0.0
            && parameters.std_daily_distance.is_finite()
            && parameters.std_daily_distance.0 >= 0.0,
        Error::invalid_parameters(format!("invalid daily distance: {parameters:?}")),
    );
    ensure!(
        parameters.degradation_constant.is_finite()
            && parameters.degradation_constant >= 0.0
            && parameters.resistance.is_finite()
            && parameters.resistance >= 0.0,
        Error::invalid_parameters(format!("invalid battery constants: {parameters:?}")),
    );
    let anxiety = AnxietyBand::try_new(anxiety_min, anxiety_max)?;
    info!(?route_length, n_days, fleet_size, ambient_temperature, "simulating…");
    let daily_trips = Normal::new(
        parameters.mean_daily_distance / route_length,
        parameters.std_daily_distance / route_length,
    )
    .map_err(|error| Error::invalid_parameters(format!("invalid daily distance: {error}")))?;

    let precompute = |chemistry: Chemistry| {
        Arc::new(
            EnergyCoefficients::precompute()
                .route(route)
                .baseline_efficiency(chemistry.baseline_efficiency())
                .payload(payload)
                .pack(pack)
                .call(),
        )
    };
    let (sib_coefficients, lfp_coefficients) =
        (precompute(Chemistry::Sib), precompute(Chemistry::Lfp));

    let mut fleets = BusinessModel::all()
        .map(|model| {
            let fade = PowerLawFade {
                k: parameters.degradation_constant * model.chemistry.degradation_factor(),
                exponent: model.chemistry.fade_exponent(),
            }
            .with_thermal_stress(ambient_temperature);
            let (initial_capex, swap_fee) = match model.mode {
                OwnershipMode::Depot => (model.chemistry.capex(), Cost::ZERO),
                OwnershipMode::BaaS => (Cost::ZERO, swap_fee),
            };
            let coefficients = match model.chemistry {
                Chemistry::Sib => Arc::clone(&sib_coefficients),
                Chemistry::Lfp => Arc::clone(&lfp_coefficients),
            };
            let profile = Arc::new(
                BikeProfile::builder()
                    .model(model)
                    .base_resistance(parameters.resistance * model.chemistry.resistance_factor())
                    .fade(fade)
                    .initial_capex(initial_capex)
                    .grid_tariff(grid_tariff)
                    .swap_fee(swap_fee)
                    .payload(payload)
                    .anxiety(anxiety)
                    .coefficients(coefficients)
                    .pack(pack)
                    .build(),
            );
            debug!(%model, fade = ?profile.fade, base_resistance = profile.base_resistance, "fleet");
            Fleet::new(&profile, fleet_size, rng)
        })
        .collect_vec();

    for day in 0..n_days {
        // Every fleet sees the same demand:
        let trips = (0..fleet_size).map(|_| clip_trips(daily_trips.sample(rng))).collect_vec();
        for fleet in &mut fleets {
            for (index, (bike, n_trips)) in fleet.bikes.iter_mut().zip(&trips).enumerate() {
                for _ in 0..*n_trips {
                    let _ = bike.process_trip(route_length, rng);
                }
                if index == 0 {
                    bike.log_daily_stats(day, route_length);
                }
            }
        }
        on_progress(f64::from(day + 1) / f64::from(n_days));
    }

    let summaries = fleets.iter().map(Fleet::summary).collect_vec();
    let best_model = summaries
        .iter()
        .filter_map(|summary| Some((summary.model, summary.cost_per_km?)))
        .min_by_key(|(_, cost_per_km)| OrderedFloat(cost_per_km.0))
        .map(|(model, _)| model);
    info!(?best_model, "completed");
    Ok(SimulationOutcome { fleets, summaries, best_model })
}

/// Clip the drawn trip count and truncate it to an integer.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clip_trips(n_trips: f64) -> u32 {
    n_trips.clamp(MIN_DAILY_TRIPS, MAX_DAILY_TRIPS) as u32
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        quantity::{Quantity, distance::Kilometers},
        route::tests::northbound,
    };

    const PARAMETERS: ExtractedParameters = ExtractedParameters {
        mean_daily_distance: Quantity(40.0),
        std_daily_distance: Quantity(10.0),
        degradation_constant: 0.0001,
        resistance: 0.05,
    };

    /// Ten points 5 km in total with a gentle climb and a descent.
    fn route() -> Route {
        let elevations = [0.0, 10.0, 25.0, 40.0, 50.0, 45.0, 30.0, 20.0, 10.0, 5.0];
        northbound(&elevations.map(Some), 5_000.0 / 9.0)
    }

    fn simulate(route: &Route, n_days: u32, seed: u64) -> Result<SimulationOutcome> {
        run_fleet_simulation()
            .parameters(&PARAMETERS)
            .route(route)
            .grid_tariff(Quantity(16.0))
            .swap_fee(Quantity(206.0))
            .payload(200.0)
            .anxiety_min(Percent(20.0))
            .anxiety_max(Percent(35.0))
            .ambient_temperature(25.0)
            .n_days(n_days)
            .rng(&mut StdRng::seed_from_u64(seed))
            .on_progress(|_| {})
            .fleet_size(10)
            .call()
    }

    #[test]
    fn end_to_end_ok() {
        let route = route();
        assert_relative_eq!(route.length().0, 5.0, max_relative = 1e-3);
        let outcome = simulate(&route, 5, 42).unwrap();

        let names = outcome.results_by_name().map(|(name, _)| name).collect_vec();
        assert_eq!(names, ["SIB Owned", "LFP Owned", "SIB BaaS", "LFP BaaS"]);
        for summary in &outcome.summaries {
            let cost_per_km = summary.cost_per_km.unwrap();
            assert!(cost_per_km.0.is_finite() && cost_per_km.0 > 0.0, "{summary:?}");
        }

        let best = outcome
            .summaries
            .iter()
            .min_by_key(|summary| OrderedFloat(summary.cost_per_km.unwrap().0))
            .unwrap();
        assert_eq!(outcome.best_model, Some(best.model));
        assert_eq!(outcome.best_model_name().unwrap(), best.model.to_string());

        for fleet in &outcome.fleets {
            assert_eq!(fleet.bikes.len(), 10);
            assert_eq!(fleet.representative().unwrap().telemetry().len(), 5);
            assert!(fleet.bikes[1].telemetry().is_empty());
        }
    }

    #[test]
    fn fleets_share_the_demand() {
        let outcome = simulate(&route(), 5, 42).unwrap();
        let distances = outcome
            .fleets
            .iter()
            .map(|fleet| fleet.bikes.iter().map(|bike| bike.total_distance()).collect_vec())
            .collect_vec();
        assert!(distances.iter().all_equal());
    }

    #[test]
    fn daily_trips_are_bounded() {
        let outcome = simulate(&route(), 3, 7).unwrap();
        let route_length = route().length();
        for bike in &outcome.fleets[0].bikes {
            let n_trips = bike.total_distance() / route_length;
            assert!((3.0 - 1e-9..=60.0 + 1e-9).contains(&n_trips), "{n_trips}");
        }
    }

    #[test]
    fn same_seed_same_outcome() {
        let route = route();
        let first = simulate(&route, 10, 42).unwrap();
        let second = simulate(&route, 10, 42).unwrap();
        assert_eq!(first.summaries, second.summaries);
        assert_eq!(first.best_model, second.best_model);
    }

    #[test]
    fn baas_fleets_have_no_capex() {
        let outcome = simulate(&route(), 5, 42).unwrap();
        for summary in &outcome.summaries {
            match summary.model.mode {
                OwnershipMode::Depot => assert!(summary.mean_capex > Cost::ZERO),
                OwnershipMode::BaaS => {
                    assert_eq!(summary.mean_capex, Cost::ZERO);
                    assert!(summary.n_swaps > 0);
                }
            }
        }
    }

    #[test]
    fn zero_days() {
        let outcome = simulate(&route(), 0, 42).unwrap();
        assert!(outcome.best_model.is_none());
        for fleet in &outcome.fleets {
            for bike in &fleet.bikes {
                assert_eq!(bike.state_of_health(), 1.0);
                assert_eq!(bike.total_distance(), Kilometers::ZERO);
                assert_eq!(bike.opex(), Cost::ZERO);
                assert!(bike.telemetry().is_empty());
            }
        }
        assert!(outcome.results_by_name().all(|(_, cost_per_km)| cost_per_km.is_none()));
    }

    #[test]
    fn progress_is_reported_daily() {
        let route = route();
        let mut reports = Vec::new();
        let outcome = run_fleet_simulation()
            .parameters(&PARAMETERS)
            .route(&route)
            .grid_tariff(Quantity(16.0))
            .swap_fee(Quantity(206.0))
            .payload(200.0)
            .anxiety_min(Percent(20.0))
            .anxiety_max(Percent(35.0))
            .ambient_temperature(30.0)
            .n_days(4)
            .rng(&mut StdRng::seed_from_u64(42))
            .on_progress(|progress| reports.push(progress))
            .fleet_size(2)
            .call()
            .unwrap();
        assert_eq!(reports, [0.25, 0.5, 0.75, 1.0]);
        assert_eq!(outcome.fleets[0].representative().unwrap().telemetry().len(), 4);
    }

    #[test]
    fn inverted_anxiety_is_rejected() {
        let route = route();
        let error = run_fleet_simulation()
            .parameters(&PARAMETERS)
            .route(&route)
            .grid_tariff(Quantity(16.0))
            .swap_fee(Quantity(206.0))
            .payload(200.0)
            .anxiety_min(Percent(50.0))
            .anxiety_max(Percent(35.0))
            .ambient_temperature(25.0)
            .n_days(1)
            .rng(&mut StdRng::seed_from_u64(42))
            .on_progress(|_| {})
            .call()
            .unwrap_err();
        assert!(matches!(error, Error::InvalidParameters(_)));
    }

    #[test]
    fn single_point_route_is_rejected() {
        let route = northbound(&[Some(0.0)], 0.0);
        let error = simulate(&route, 1, 42).unwrap_err();
        assert!(matches!(error, Error::InvalidParameters(_)));
    }

    #[test]
    fn clip_trips_ok() {
        assert_eq!(clip_trips(-3.0), 1);
        assert_eq!(clip_trips(0.4), 1);
        assert_eq!(clip_trips(7.9), 7);
        assert_eq!(clip_trips(42.0), 20);
    }
}
