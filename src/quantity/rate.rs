use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, distance::Kilometers, energy::KilowattHours};

/// Shillings per kilowatt-hour.
pub type KilowattHourRate = Quantity<-1, -1, 1, 0>;

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} KSh/kWh", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}KSh/kWh", self.0)
    }
}

/// Shillings per kilometer, the total-cost-of-ownership figure of merit.
pub type KilometerCost = Quantity<0, 0, 1, -1>;

impl Display for KilometerCost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} KSh/km", self.0)
    }
}

impl Debug for KilometerCost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}KSh/km", self.0)
    }
}

/// Energy spent per distance, stored in kilowatt-hours per kilometer.
pub type EnergyIntensity = Quantity<1, 1, 0, -1>;

impl EnergyIntensity {
    pub const fn from_watt_hours_per_kilometer(watt_hours_per_kilometer: f64) -> Self {
        Self(watt_hours_per_kilometer * 0.001)
    }

    pub const fn to_watt_hours_per_kilometer(self) -> f64 {
        self.0 * 1000.0
    }

    /// Equivalent tractive power in watts at the given speed.
    ///
    /// `Wh/km × 3.6` is J/m, hence multiplying by m/s yields watts.
    pub const fn to_watts_at(self, speed_meters_per_second: f64) -> f64 {
        self.to_watt_hours_per_kilometer() * 3.6 * speed_meters_per_second
    }
}

impl Display for EnergyIntensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} Wh/km", self.to_watt_hours_per_kilometer())
    }
}

impl Debug for EnergyIntensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}Wh/km", self.to_watt_hours_per_kilometer())
    }
}

impl Mul<Kilometers> for EnergyIntensity {
    type Output = KilowattHours;

    fn mul(self, rhs: Kilometers) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn tractive_power_ok() {
        let intensity = EnergyIntensity::from_watt_hours_per_kilometer(20.0);
        assert_abs_diff_eq!(intensity.to_watts_at(10.0), 720.0, epsilon = 1e-9);
    }

    #[test]
    fn intensity_times_distance_ok() {
        let energy = EnergyIntensity::from_watt_hours_per_kilometer(20.0) * Kilometers::from(5.0);
        assert_abs_diff_eq!(energy.to_watt_hours(), 100.0, epsilon = 1e-9);
    }
}
