use std::fmt::{Display, Formatter};

use enumset::EnumSet;

use crate::core::chemistry::Chemistry;

/// Who owns and charges the pack.
#[derive(Debug, Hash, enumset::EnumSetType)]
pub enum OwnershipMode {
    /// The operator owns the packs and charges them at the depot from the grid.
    Depot,

    /// Battery-as-a-Service: packs are swapped at stations for a fee.
    BaaS,
}

impl Display for OwnershipMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Depot => write!(f, "Owned"),
            Self::BaaS => write!(f, "BaaS"),
        }
    }
}

/// Chemistry × ownership mode.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct BusinessModel {
    pub chemistry: Chemistry,
    pub mode: OwnershipMode,
}

impl Display for BusinessModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.chemistry, self.mode)
    }
}

impl BusinessModel {
    /// All the models: owned fleets first, then the swapping ones.
    pub fn all() -> impl Iterator<Item = Self> {
        EnumSet::<OwnershipMode>::all().iter().flat_map(|mode| {
            EnumSet::<Chemistry>::all().iter().map(move |chemistry| Self { chemistry, mode })
        })
    }
}
