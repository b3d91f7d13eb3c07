pub mod cost;
pub mod distance;
pub mod energy;
pub mod proportions;
pub mod rate;

use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};

/// Dimensioned scalar.
///
/// The const parameters are exponents of the base dimensions, so that, for example,
/// kilowatt-hours are `Quantity<1, 1, 0, 0>` and a tariff is `Quantity<-1, -1, 1, 0>`.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[serde(transparent)]
#[must_use]
pub struct Quantity<const POWER: isize, const TIME: isize, const COST: isize, const DISTANCE: isize>(
    pub f64,
);

impl<const POWER: isize, const TIME: isize, const COST: isize, const DISTANCE: isize>
    Quantity<POWER, TIME, COST, DISTANCE>
{
    pub const ZERO: Self = Self(0.0);

    pub const fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub const fn min(self, rhs: Self) -> Self {
        if rhs.0 < self.0 { rhs } else { self }
    }

    pub const fn max(self, rhs: Self) -> Self {
        if rhs.0 > self.0 { rhs } else { self }
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize, const DISTANCE: isize> Mul<f64>
    for Quantity<POWER, TIME, COST, DISTANCE>
{
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize, const DISTANCE: isize> Div<f64>
    for Quantity<POWER, TIME, COST, DISTANCE>
{
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize, const DISTANCE: isize> Div<Self>
    for Quantity<POWER, TIME, COST, DISTANCE>
{
    type Output = f64;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}
