use std::sync::Arc;

use average::Mean;
use rand::Rng;

use crate::{
    core::{
        bike::{BikeProfile, FleetBike},
        business_model::BusinessModel,
    },
    quantity::{Quantity, cost::Cost, distance::Kilometers, rate::KilometerCost},
};

/// Bikes run under the same business model.
#[derive(Clone, Debug)]
pub struct Fleet {
    pub model: BusinessModel,
    pub bikes: Vec<FleetBike>,
}

impl Fleet {
    /// Build the fleet, drawing an anxiety threshold for every bike.
    pub fn new<R: Rng + ?Sized>(profile: &Arc<BikeProfile>, size: usize, rng: &mut R) -> Self {
        let model = profile.model;
        let bikes = (0..size)
            .map(|index| FleetBike::new(format!("{model} #{index}"), Arc::clone(profile), rng))
            .collect();
        Self { model, bikes }
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.model.to_string()
    }

    /// The bike whose telemetry is logged every day.
    #[must_use]
    pub fn representative(&self) -> Option<&FleetBike> {
        self.bikes.first()
    }

    pub fn summary(&self) -> FleetSummary {
        let mean_opex: Mean = self.bikes.iter().map(|bike| bike.opex().0).collect();
        let mean_capex: Mean = self.bikes.iter().map(|bike| bike.capex_amortized().0).collect();
        let mean_distance: Mean = self.bikes.iter().map(|bike| bike.total_distance().0).collect();
        let mean_state_of_health: Mean =
            self.bikes.iter().map(FleetBike::state_of_health).collect();

        let mean_opex = Quantity(mean_opex.mean());
        let mean_capex = Quantity(mean_capex.mean());
        let mean_distance = Quantity(mean_distance.mean());
        let cost_per_km = (mean_distance > Kilometers::ZERO)
            .then(|| (mean_opex + mean_capex) / mean_distance);
        FleetSummary {
            model: self.model,
            mean_opex,
            mean_capex,
            mean_distance,
            cost_per_km,
            mean_state_of_health: mean_state_of_health.mean(),
            n_swaps: self.bikes.iter().map(|bike| u64::from(bike.n_swaps())).sum(),
        }
    }
}

/// Per-bike averages of a fleet.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FleetSummary {
    pub model: BusinessModel,
    pub mean_opex: Cost,
    pub mean_capex: Cost,
    pub mean_distance: Kilometers,

    /// Total cost of ownership per kilometer, undefined until the fleet has ridden.
    pub cost_per_km: Option<KilometerCost>,

    pub mean_state_of_health: f64,

    /// Over the whole fleet.
    pub n_swaps: u64,
}
