use std::fmt::{Display, Formatter};

use comfy_table::Color;

use crate::quantity::{Quantity, cost::Cost, rate::EnergyIntensity};

/// Cell chemistry of the pack.
///
/// The LFP figures are the measured baseline, the SIB ones are expressed relative to LFP.
#[derive(Debug, Hash, enumset::EnumSetType)]
pub enum Chemistry {
    /// Sodium-ion.
    Sib,

    /// Lithium iron phosphate.
    Lfp,
}

impl Display for Chemistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sib => write!(f, "SIB"),
            Self::Lfp => write!(f, "LFP"),
        }
    }
}

impl Chemistry {
    /// Consumption on flat ground.
    pub const fn baseline_efficiency(self) -> EnergyIntensity {
        match self {
            Self::Sib => EnergyIntensity::from_watt_hours_per_kilometer(21.0),
            Self::Lfp => EnergyIntensity::from_watt_hours_per_kilometer(18.5),
        }
    }

    /// Internal resistance relative to the measured LFP resistance.
    pub const fn resistance_factor(self) -> f64 {
        match self {
            Self::Sib => 1.5,
            Self::Lfp => 1.0,
        }
    }

    /// Degradation constant relative to the measured LFP constant.
    pub const fn degradation_factor(self) -> f64 {
        match self {
            Self::Sib => 1.8,
            Self::Lfp => 1.0,
        }
    }

    /// Power-law fade exponent.
    pub const fn fade_exponent(self) -> f64 {
        match self {
            Self::Sib => 0.55,
            Self::Lfp => 0.50,
        }
    }

    /// Purchase price of a pack.
    pub const fn capex(self) -> Cost {
        match self {
            Self::Sib => Quantity(20_785.0),
            Self::Lfp => Quantity(31_178.0),
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::Sib => Color::Cyan,
            Self::Lfp => Color::Magenta,
        }
    }
}
