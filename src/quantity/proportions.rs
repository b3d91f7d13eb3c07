use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Percentage as entered by a human, `0..=100`.
#[must_use]
#[derive(Copy, Clone, PartialEq, PartialOrd, Deserialize, Serialize, derive_more::FromStr)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    pub const fn to_proportion(self) -> f64 {
        0.01 * self.0
    }

    pub const fn from_proportion(proportion: f64) -> Self {
        Self(proportion * 100.0)
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl Debug for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
