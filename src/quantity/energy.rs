use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Div, Mul},
};

use crate::quantity::{
    Quantity,
    cost::Cost,
    distance::Kilometers,
    rate::{EnergyIntensity, KilowattHourRate},
};

pub type KilowattHours = Quantity<1, 1, 0, 0>;

impl KilowattHours {
    pub const fn from_joules(joules: f64) -> Self {
        Self(joules / 3_600_000.0)
    }

    pub const fn from_watt_hours(watt_hours: f64) -> Self {
        Self(watt_hours * 0.001)
    }

    pub const fn to_watt_hours(self) -> f64 {
        self.0 * 1000.0
    }
}

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} Wh", self.to_watt_hours())
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}Wh", self.to_watt_hours())
    }
}

impl Mul<KilowattHourRate> for KilowattHours {
    type Output = Cost;

    fn mul(self, rhs: KilowattHourRate) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}

impl Div<Kilometers> for KilowattHours {
    type Output = EnergyIntensity;

    fn div(self, rhs: Kilometers) -> Self::Output {
        Quantity(self.0 / rhs.0)
    }
}
