//! End-to-end model run
//!
//! Chains the optical-depth assembly and the equilibrium solve for a single parameter set.

use crate::equilibrium::RadiativeEquilibrium;
use crate::errors::AtmResult;
use crate::optical_depth::{optical_depth, OpticalDepthProfile};
use crate::parameters::{AtmosphereParameters, RadiationParameters};
use crate::FloatValue;
use log::info;
use ndarray::Array1;

/// Result of a model run
///
/// All arrays share the level ordering of the grid: index 0 is the top of the atmosphere and
/// the last index is the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumProfile {
    /// Level heights (m)
    pub z: Array1<FloatValue>,
    /// Long-wave optical depth within each layer
    pub ch_ir: Array1<FloatValue>,
    /// Short-wave optical depth within each layer
    pub ch_sw: Array1<FloatValue>,
    /// Equilibrium temperature (K)
    pub temperature: Array1<FloatValue>,
}

impl EquilibriumProfile {
    pub fn nlayer(&self) -> usize {
        self.z.len()
    }

    /// Temperature of the ground (K), or `None` for an empty profile.
    pub fn surface_temperature(&self) -> Option<FloatValue> {
        self.temperature.last().copied()
    }

    /// Long-wave flux leaving the top of the atmosphere (W/m²).
    pub fn outgoing_longwave(&self, radiation: &RadiationParameters) -> AtmResult<FloatValue> {
        RadiativeEquilibrium::from_parameters(radiation.clone())
            .outgoing_longwave(self.ch_ir.view(), self.temperature.view())
    }

    /// Height/temperature pairs from the top of the atmosphere down.
    pub fn rows(&self) -> impl Iterator<Item = (FloatValue, FloatValue)> + '_ {
        self.z.iter().copied().zip(self.temperature.iter().copied())
    }
}

/// Build the optical depths for `atmosphere` and solve for the equilibrium temperature.
pub fn solve_atmosphere(
    atmosphere: &AtmosphereParameters,
    radiation: &RadiationParameters,
) -> AtmResult<EquilibriumProfile> {
    let OpticalDepthProfile { ch_ir, ch_sw, z } = optical_depth(atmosphere)?;
    let temperature = RadiativeEquilibrium::from_parameters(radiation.clone())
        .solve(ch_ir.view(), ch_sw.view())?;

    let profile = EquilibriumProfile {
        z,
        ch_ir,
        ch_sw,
        temperature,
    };
    if let Some(surface) = profile.surface_temperature() {
        info!(
            "Radiative equilibrium reached on {} levels: surface temperature {:.2} K",
            profile.nlayer(),
            surface
        );
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AtmError;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_atmosphere() {
        let radiation = RadiationParameters::default();
        let profile = solve_atmosphere(&AtmosphereParameters::default(), &radiation).unwrap();

        assert_eq!(profile.nlayer(), 51);
        assert_eq!(profile.temperature.len(), 51);
        assert_relative_eq!(profile.surface_temperature().unwrap(), 274.01, epsilon = 0.01);
        assert_relative_eq!(profile.temperature[0], 214.43, epsilon = 0.01);
        assert_relative_eq!(
            profile.outgoing_longwave(&radiation).unwrap(),
            radiation.total_solar_irradiance(),
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_rows_follow_grid_order() {
        let atmosphere = AtmosphereParameters {
            nlayer: 3,
            z_top: 10.0,
            ..Default::default()
        };
        let profile = solve_atmosphere(&atmosphere, &RadiationParameters::default()).unwrap();
        let rows: Vec<_> = profile.rows().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].0, 10_000.0);
        assert_eq!(rows[2].0, 0.0);
        assert_eq!(Some(rows[2].1), profile.surface_temperature());
    }

    #[test]
    fn test_empty_profile_has_no_surface() {
        let profile = EquilibriumProfile {
            z: Array1::zeros(0),
            ch_ir: Array1::zeros(0),
            ch_sw: Array1::zeros(0),
            temperature: Array1::zeros(0),
        };

        assert_eq!(profile.nlayer(), 0);
        assert_eq!(profile.surface_temperature(), None);
        assert_eq!(profile.rows().count(), 0);
    }

    #[test]
    fn test_invalid_input_is_reported_before_solving() {
        let atmosphere = AtmosphereParameters {
            k_1: -0.4,
            ..Default::default()
        };
        let err = solve_atmosphere(&atmosphere, &RadiationParameters::default()).unwrap_err();
        assert_eq!(err.parameter(), Some("k_1"));
    }

    #[test]
    fn test_transparent_atmosphere_fails() {
        let atmosphere = AtmosphereParameters {
            k_1: 0.0,
            ..Default::default()
        };
        let err = solve_atmosphere(&atmosphere, &RadiationParameters::default()).unwrap_err();
        assert!(matches!(err, AtmError::NumericFailure(_)));
    }
}
