use serde::{Deserialize, Serialize};

use crate::quantity::energy::KilowattHours;

/// Nominal battery pack configuration.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BatteryPack {
    /// Volts.
    pub voltage: f64,

    /// Ampere-hours.
    pub capacity_ah: f64,
}

impl BatteryPack {
    /// Pack the telemetry datasets were recorded on.
    pub const SOURCE: Self = Self { voltage: 72.0, capacity_ah: 40.0 };

    /// Pack fitted to the simulated bikes.
    pub const TARGET: Self = Self { voltage: 48.0, capacity_ah: 30.0 };

    pub const fn capacity(self) -> KilowattHours {
        KilowattHours::from_watt_hours(self.voltage * self.capacity_ah)
    }

    /// Rescale an internal resistance measured on the `source` pack to this pack.
    ///
    /// Resistance grows with the series cell count (voltage) and shrinks with the parallel
    /// count (capacity).
    pub fn scale_resistance_from(self, source: Self, resistance: f64) -> f64 {
        resistance * ((self.voltage / source.voltage) / (self.capacity_ah / source.capacity_ah))
    }
}

impl Default for BatteryPack {
    fn default() -> Self {
        Self::TARGET
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn target_capacity_ok() {
        assert_abs_diff_eq!(BatteryPack::TARGET.capacity().0, 1.44, epsilon = 1e-12);
    }

    #[test]
    fn scale_resistance_ok() {
        // (48 / 72) / (30 / 40) = 8 / 9:
        assert_abs_diff_eq!(
            BatteryPack::TARGET.scale_resistance_from(BatteryPack::SOURCE, 0.09),
            0.08,
            epsilon = 1e-12,
        );
    }

    #[test]
    fn identity_scaling() {
        assert_abs_diff_eq!(BatteryPack::TARGET.scale_resistance_from(BatteryPack::TARGET, 0.05), 0.05);
    }
}
