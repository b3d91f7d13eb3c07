use std::{
    fmt::{Debug, Display, Formatter},
    ops::Div,
};

use crate::quantity::{Quantity, distance::Kilometers, rate::KilometerCost};

/// Money in Kenyan shillings.
pub type Cost = Quantity<0, 0, 1, 0>;

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} KSh", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}KSh", self.0)
    }
}

impl Div<Kilometers> for Cost {
    type Output = KilometerCost;

    fn div(self, rhs: Kilometers) -> Self::Output {
        Quantity(self.0 / rhs.0)
    }
}
