use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use crate::{
    core::{
        business_model::{BusinessModel, OwnershipMode},
        energy::EnergyCoefficients,
        pack::BatteryPack,
        thermal::PowerLawFade,
    },
    prelude::*,
    quantity::{
        cost::Cost,
        distance::Kilometers,
        energy::KilowattHours,
        proportions::Percent,
        rate::{EnergyIntensity, KilowattHourRate},
    },
};

/// Capacity fade at which an owned pack is fully written off.
pub const END_OF_LIFE_FADE: f64 = 0.20;

/// Relative resistance growth per unit of capacity fade.
pub const RESISTANCE_GROWTH: f64 = 2.5;

/// Charge a rider wants left on arrival before heading out without a swap.
pub const SWAP_SAFETY_MARGIN: f64 = 0.05;

/// Range of the state-of-charge at which a rider goes for a swap.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnxietyBand {
    min: f64,
    max: f64,
}

impl AnxietyBand {
    pub fn try_new(min: Percent, max: Percent) -> Result<Self> {
        ensure!(
            (0.0..=100.0).contains(&min.0) && (0.0..=100.0).contains(&max.0),
            Error::invalid_parameters(format!("anxiety thresholds out of range: {min}..{max}")),
        );
        ensure!(
            min <= max,
            Error::invalid_parameters(format!("minimal anxiety {min} exceeds maximal {max}")),
        );
        Ok(Self { min: min.to_proportion(), max: max.to_proportion() })
    }

    /// Draw a threshold uniformly from the band.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Everything the bikes of one fleet share.
#[must_use]
#[derive(Clone, Debug, bon::Builder)]
pub struct BikeProfile {
    pub model: BusinessModel,

    /// Internal resistance of a fresh pack, ohms.
    pub base_resistance: f64,

    /// Thermally adjusted fade law.
    pub fade: PowerLawFade,

    /// Pack price, zero when the packs are leased.
    pub initial_capex: Cost,

    pub grid_tariff: KilowattHourRate,
    pub swap_fee: Cost,

    /// Bike, rider and cargo, kilograms.
    pub payload: f64,

    pub anxiety: AnxietyBand,
    pub coefficients: Arc<EnergyCoefficients>,

    #[builder(default)]
    pub pack: BatteryPack,
}

/// Outcome of a single trip.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Trip {
    pub energy: KilowattHours,
    pub equivalent_full_cycles: f64,

    /// Whether the pack has been swapped before the trip.
    pub swapped: bool,
}

/// Daily snapshot of a bike.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub day: u32,
    pub state_of_health: Percent,

    /// Consumption over the route at the current resistance.
    pub energy_intensity: EnergyIntensity,

    /// Remaining pack capacity, ampere-hours.
    pub capacity_ah: f64,

    /// Operating expenses plus the amortized pack price so far.
    pub cumulative_cost: Cost,
}

/// Digital twin of a single bike and its pack.
#[derive(Clone, Debug)]
pub struct FleetBike {
    name: String,
    profile: Arc<BikeProfile>,
    state_of_health: f64,

    /// Tracked for swapped packs only.
    state_of_charge: f64,

    cumulative_efc: f64,
    total_distance: Kilometers,
    opex: Cost,
    capex_amortized: Cost,
    n_swaps: u32,
    anxiety_threshold: f64,
    telemetry: Vec<TelemetryRecord>,
}

impl FleetBike {
    pub fn new<R: Rng + ?Sized>(name: String, profile: Arc<BikeProfile>, rng: &mut R) -> Self {
        let anxiety_threshold = profile.anxiety.sample(rng);
        Self {
            name,
            profile,
            state_of_health: 1.0,
            state_of_charge: 1.0,
            cumulative_efc: 0.0,
            total_distance: Kilometers::ZERO,
            opex: Cost::ZERO,
            capex_amortized: Cost::ZERO,
            n_swaps: 0,
            anxiety_threshold,
            telemetry: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn profile(&self) -> &BikeProfile {
        &self.profile
    }

    #[must_use]
    pub const fn state_of_health(&self) -> f64 {
        self.state_of_health
    }

    #[must_use]
    pub const fn state_of_charge(&self) -> f64 {
        self.state_of_charge
    }

    #[must_use]
    pub const fn cumulative_efc(&self) -> f64 {
        self.cumulative_efc
    }

    pub const fn total_distance(&self) -> Kilometers {
        self.total_distance
    }

    pub const fn opex(&self) -> Cost {
        self.opex
    }

    pub const fn capex_amortized(&self) -> Cost {
        self.capex_amortized
    }

    #[must_use]
    pub const fn n_swaps(&self) -> u32 {
        self.n_swaps
    }

    #[must_use]
    pub const fn anxiety_threshold(&self) -> f64 {
        self.anxiety_threshold
    }

    #[must_use]
    pub fn telemetry(&self) -> &[TelemetryRecord] {
        &self.telemetry
    }

    /// Internal resistance grows as the pack fades.
    #[must_use]
    pub fn dynamic_resistance(&self) -> f64 {
        self.profile.base_resistance * (1.0 + (1.0 - self.state_of_health) * RESISTANCE_GROWTH)
    }

    /// Energy drawn from the pack over one pass of the route at the current resistance.
    ///
    /// A net-regenerating route does not charge the pack.
    pub fn trip_energy(&self) -> KilowattHours {
        self.profile
            .coefficients
            .fast_trip_energy(self.dynamic_resistance())
            .max(KilowattHours::ZERO)
    }

    /// Ride the route once.
    pub fn process_trip<R: Rng + ?Sized>(&mut self, route_length: Kilometers, rng: &mut R) -> Trip {
        let energy = self.trip_energy();
        let equivalent_full_cycles = energy / self.profile.pack.capacity();
        self.total_distance += route_length;

        let swapped = match self.profile.model.mode {
            OwnershipMode::Depot => {
                self.opex += energy * self.profile.grid_tariff;
                false
            }
            OwnershipMode::BaaS => {
                let swapped = self.state_of_charge < equivalent_full_cycles + SWAP_SAFETY_MARGIN
                    || self.state_of_charge < self.anxiety_threshold;
                if swapped {
                    self.state_of_charge = 1.0;
                    self.opex += self.profile.swap_fee;
                    self.n_swaps += 1;
                    self.anxiety_threshold = self.profile.anxiety.sample(rng);
                }
                self.state_of_charge -= equivalent_full_cycles;
                swapped
            }
        };

        // The swapping operator still sees the same throughput wear on its packs:
        let cumulative_efc = self.cumulative_efc + equivalent_full_cycles;
        self.state_of_health = (self.state_of_health
            - self.profile.fade.loss_between(self.cumulative_efc, cumulative_efc))
        .max(0.0);
        self.cumulative_efc = cumulative_efc;

        if self.profile.model.mode == OwnershipMode::Depot {
            self.capex_amortized =
                self.profile.initial_capex * ((1.0 - self.state_of_health) / END_OF_LIFE_FADE);
        }

        trace!(name = self.name.as_str(), ?energy, equivalent_full_cycles, swapped, "trip");
        Trip { energy, equivalent_full_cycles, swapped }
    }

    /// Append the end-of-day snapshot.
    pub fn log_daily_stats(&mut self, day: u32, route_length: Kilometers) {
        let record = TelemetryRecord {
            day,
            state_of_health: Percent::from_proportion(self.state_of_health),
            energy_intensity: self.trip_energy() / route_length,
            capacity_ah: self.profile.pack.capacity_ah * self.state_of_health,
            cumulative_cost: self.opex + self.capex_amortized,
        };
        debug!(name = self.name.as_str(), ?record, "logged");
        self.telemetry.push(record);
    }
}
