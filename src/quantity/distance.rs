use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

pub type Kilometers = Quantity<0, 0, 0, 1>;

impl Kilometers {
    pub const fn from_meters(meters: f64) -> Self {
        Self(meters / 1000.0)
    }

    pub const fn to_meters(self) -> f64 {
        self.0 * 1000.0
    }
}

impl Display for Kilometers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} km", self.0)
    }
}

impl Debug for Kilometers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}km", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn from_meters_ok() {
        assert_eq!(Kilometers::from_meters(5_000.0), Kilometers::from(5.0));
        assert_eq!(Kilometers::from_meters(250.0), Kilometers::from(0.25));
    }

    #[test]
    fn meters_roundtrip() {
        for meters in [250.0, 1000.000_000_000_000_2, 4_999.999_999_999_1, 123_456.789] {
            let roundtrip = Kilometers::from_meters(meters).to_meters();
            assert_relative_eq!(roundtrip, meters, max_relative = 1e-15);
        }
    }
}
