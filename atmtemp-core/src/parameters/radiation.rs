//! Radiation parameters
//!
//! Planetary energy-balance constants used by the equilibrium solver.

use crate::constants::{PLANETARY_ALBEDO, SOLAR_CONSTANT, STEFAN_BOLTZMANN};
use crate::errors::{AtmError, AtmResult};
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters for the radiative-equilibrium solve
///
/// The short-wave source at the top of the atmosphere is the globally averaged absorbed
/// solar irradiance:
///
/// $$TSI = \frac{(1 - \alpha) S_0}{4}$$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiationParameters {
    /// Planetary albedo $\alpha$.
    ///
    /// Default: 0.3
    pub albedo: FloatValue,

    /// Solar constant $S_0$ (W/m²).
    ///
    /// Default: 1370.0 W/m²
    pub solar_constant: FloatValue,

    /// Stefan-Boltzmann constant $\sigma$ (W m⁻² K⁻⁴).
    ///
    /// Default: 5.6704e-8
    pub stefan_boltzmann: FloatValue,
}

impl Default for RadiationParameters {
    fn default() -> Self {
        Self {
            albedo: PLANETARY_ALBEDO,
            solar_constant: SOLAR_CONSTANT,
            stefan_boltzmann: STEFAN_BOLTZMANN,
        }
    }
}

impl RadiationParameters {
    /// Absorbed solar irradiance at the top of the atmosphere (W/m²).
    pub fn total_solar_irradiance(&self) -> FloatValue {
        (1.0 - self.albedo) * self.solar_constant / 4.0
    }

    pub fn validate(&self) -> AtmResult<()> {
        if !(0.0..=1.0).contains(&self.albedo) {
            return Err(AtmError::invalid(
                "albedo",
                format!("must lie in [0, 1], got {}", self.albedo),
            ));
        }
        if !(self.solar_constant > 0.0) {
            return Err(AtmError::invalid(
                "solar_constant",
                format!("must be > 0, got {}", self.solar_constant),
            ));
        }
        if !(self.stefan_boltzmann > 0.0) {
            return Err(AtmError::invalid(
                "stefan_boltzmann",
                format!("must be > 0, got {}", self.stefan_boltzmann),
            ));
        }
        Ok(())
    }
}
