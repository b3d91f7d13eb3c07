//! Algebraic decomposition of the route energy.
//!
//! Walking the route is the expensive part of a trip, yet only the internal resistance changes
//! between trips. The ohmic loss of a segment is `I²·R·dt` with `I ≈ P / V`, so the whole trip
//! collapses into `E(R) = A + B·R + C` with the sums precomputed once per chemistry.

use bon::bon;

use crate::{
    core::pack::BatteryPack,
    prelude::*,
    quantity::{energy::KilowattHours, rate::EnergyIntensity},
    route::Route,
};

/// Standard gravity, m/s².
pub const GRAVITY: f64 = 9.81;

/// Share of the braking energy returned to the pack.
pub const REGENERATION_EFFICIENCY: f64 = 0.3;

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EnergyCoefficients {
    /// Mechanical and rolling energy over the consuming segments, joules.
    pub a: f64,

    /// Time integral of the squared current proxy `(P / V)²`, joules per ohm.
    pub b: f64,

    /// Regenerated energy over the braking segments, joules, non-positive.
    pub c: f64,
}

#[bon]
impl EnergyCoefficients {
    /// Walk the route once and sum up the coefficients.
    ///
    /// The `baseline_efficiency` is the chemistry-specific consumption on flat ground, and the
    /// `payload` is the mass of the bike, rider and cargo in kilograms.
    #[builder]
    pub fn precompute(
        route: &Route,
        baseline_efficiency: EnergyIntensity,
        payload: f64,
        #[builder(default)] pack: BatteryPack,
    ) -> Self {
        let mut coefficients = Self { a: 0.0, b: 0.0, c: 0.0 };
        for segment in route.segments() {
            let duration = segment.duration();
            let power = payload * GRAVITY * segment.grade.sin() * segment.speed
                + baseline_efficiency.to_watts_at(segment.speed);
            if power > 0.0 {
                coefficients.a += power * duration;
                coefficients.b += (power / pack.voltage).powi(2) * duration;
            } else {
                coefficients.c += power * REGENERATION_EFFICIENCY * duration;
            }
        }
        debug!(?coefficients, ?baseline_efficiency, payload, "precomputed");
        coefficients
    }
}

impl EnergyCoefficients {
    /// Trip energy at the given internal resistance in ohms, in O(1).
    pub fn fast_trip_energy(&self, resistance: f64) -> KilowattHours {
        KilowattHours::from_joules(self.a + self.b * resistance + self.c)
    }
}
