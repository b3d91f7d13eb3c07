//! Arrhenius-style thermal stress: the fade rate doubles for every 10 °C above the baseline.

/// Temperature the degradation constant has been measured at, °C.
pub const BASELINE_TEMPERATURE: f64 = 25.0;

/// Temperature rise that doubles the fade rate, °C.
const DOUBLING_INTERVAL: f64 = 10.0;

/// Rescale the degradation constant to the ambient temperature in °C.
#[must_use]
pub fn apply_arrhenius_thermal_stress(k_base: f64, ambient_temperature: f64) -> f64 {
    k_base * 2.0_f64.powf((ambient_temperature - BASELINE_TEMPERATURE) / DOUBLING_INTERVAL)
}

/// Power-law capacity fade: `loss = k · EFC^p`.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PowerLawFade {
    pub k: f64,
    pub exponent: f64,
}

impl PowerLawFade {
    pub fn with_thermal_stress(self, ambient_temperature: f64) -> Self {
        Self { k: apply_arrhenius_thermal_stress(self.k, ambient_temperature), ..self }
    }

    /// Cumulative capacity loss after the given number of equivalent full cycles.
    pub fn loss(&self, equivalent_full_cycles: f64) -> f64 {
        self.k * equivalent_full_cycles.powf(self.exponent)
    }

    /// Capacity lost while cycling from `before` to `after` equivalent full cycles.
    pub fn loss_between(&self, before: f64, after: f64) -> f64 {
        self.loss(after) - self.loss(before)
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    #[test]
    fn baseline_is_identity() {
        assert_abs_diff_eq!(apply_arrhenius_thermal_stress(0.002, BASELINE_TEMPERATURE), 0.002);
    }

    #[test]
    fn doubles_per_ten_degrees() {
        for temperature in [-5.0, 15.0, 25.0, 27.0, 31.5] {
            assert_relative_eq!(
                apply_arrhenius_thermal_stress(0.002, temperature + 10.0),
                2.0 * apply_arrhenius_thermal_stress(0.002, temperature),
                max_relative = 1e-12,
            );
        }
    }

    #[test]
    fn cooler_is_slower() {
        assert_relative_eq!(apply_arrhenius_thermal_stress(0.002, 15.0), 0.001, max_relative = 1e-12);
    }

    #[test]
    fn loss_between_telescopes() {
        let fade = PowerLawFade { k: 0.001, exponent: 0.5 };
        let stepwise = fade.loss_between(0.0, 1.0) + fade.loss_between(1.0, 4.0);
        assert_relative_eq!(stepwise, fade.loss(4.0), max_relative = 1e-12);
        assert_relative_eq!(fade.loss(4.0), 0.002, max_relative = 1e-12);
    }
}
