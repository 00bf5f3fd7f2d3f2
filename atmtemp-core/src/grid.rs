//! Vertical grid and barometric air density.
//!
//! Levels are indexed from the top of the atmosphere (index 0) down to the surface
//! (index `nlayer - 1`). The surface is a boundary rather than a slab, so its thickness is
//! always zero.

use crate::constants::{DENSITY_SCALE_HEIGHT, GROUND_AIR_DENSITY, METRES_PER_KILOMETRE};
use crate::errors::{AtmError, AtmResult};
use crate::FloatValue;
use log::debug;
use ndarray::Array1;

/// Equally spaced vertical levels from the top of the atmosphere to the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalGrid {
    /// Height of the top of the atmosphere (m)
    z_top: FloatValue,
    /// Level heights (m), strictly decreasing, `z[nlayer - 1] == 0`
    z: Array1<FloatValue>,
    /// Layer thicknesses (m), `dz[nlayer - 1] == 0`
    dz: Array1<FloatValue>,
}

impl VerticalGrid {
    /// Build a grid of `nlayer` levels with the top of the atmosphere at `z_top` metres.
    ///
    /// A single level degenerates to the surface point `z = [0]`, `dz = [0]`.
    pub fn new(nlayer: usize, z_top: FloatValue) -> AtmResult<Self> {
        if nlayer < 1 {
            return Err(AtmError::invalid(
                "nlayer",
                "the number of layers must be at least 1",
            ));
        }
        if !(z_top > 0.0) || !z_top.is_finite() {
            return Err(AtmError::invalid(
                "z_top",
                format!("the top of the atmosphere must be > 0, got {}", z_top),
            ));
        }

        if nlayer == 1 {
            return Ok(Self {
                z_top,
                z: Array1::zeros(1),
                dz: Array1::zeros(1),
            });
        }

        let surface = nlayer - 1;
        let layer_thickness = z_top / surface as FloatValue;
        let z = Array1::from_shape_fn(nlayer, |i| {
            if i == surface {
                0.0
            } else {
                z_top - layer_thickness * i as FloatValue
            }
        });
        let dz = Array1::from_shape_fn(nlayer, |i| {
            if i == surface {
                0.0
            } else {
                layer_thickness
            }
        });

        debug!(
            "Built vertical grid: {} levels, top {} m, dz {} m",
            nlayer, z_top, layer_thickness
        );
        Ok(Self { z_top, z, dz })
    }

    /// Build a grid with the top of the atmosphere given in kilometres.
    pub fn from_kilometres(nlayer: usize, z_top_km: FloatValue) -> AtmResult<Self> {
        if !(z_top_km > 0.0) {
            return Err(AtmError::invalid(
                "z_top",
                format!("the top of the atmosphere must be > 0 km, got {}", z_top_km),
            ));
        }
        Self::new(nlayer, z_top_km * METRES_PER_KILOMETRE)
    }

    pub fn nlayer(&self) -> usize {
        self.z.len()
    }

    /// Height of the top of the atmosphere (m).
    pub fn z_top(&self) -> FloatValue {
        self.z_top
    }

    /// Level heights (m).
    pub fn z(&self) -> &Array1<FloatValue> {
        &self.z
    }

    /// Layer thicknesses (m).
    pub fn dz(&self) -> &Array1<FloatValue> {
        &self.dz
    }

    /// Uniform thickness of the atmospheric layers (m); zero for a surface-only grid.
    pub fn layer_thickness(&self) -> FloatValue {
        self.dz[0]
    }

    /// Barometric air density at each level (kg/m³).
    ///
    /// $$\rho(z) = \rho_0 e^{-z/H}$$
    pub fn air_density(&self) -> Array1<FloatValue> {
        self.z
            .mapv(|z| GROUND_AIR_DENSITY * (-z / DENSITY_SCALE_HEIGHT).exp())
    }

    /// Integrate a per-level quantity over the column with the trapezoidal rule.
    ///
    /// The surface level closes the last slab but contributes no thickness of its own.
    pub fn integrate(&self, values: &Array1<FloatValue>) -> FloatValue {
        (0..self.nlayer().saturating_sub(1))
            .map(|i| self.dz[i] * 0.5 * (values[i] + values[i + 1]))
            .sum()
    }
}

/// Build the vertical grid and its air-density profile.
///
/// `z_top_km` is in kilometres; all returned heights are in metres.
pub fn build_grid(
    nlayer: usize,
    z_top_km: FloatValue,
) -> AtmResult<(VerticalGrid, Array1<FloatValue>)> {
    let grid = VerticalGrid::from_kilometres(nlayer, z_top_km)?;
    let density = grid.air_density();
    Ok((grid, density))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_geometry() {
        let grid = VerticalGrid::new(51, 50_000.0).unwrap();

        assert_eq!(grid.nlayer(), 51);
        assert_eq!(grid.z().len(), 51);
        assert_eq!(grid.dz().len(), 51);
        assert_eq!(grid.z()[0], 50_000.0);
        assert_eq!(grid.z()[50], 0.0);
        assert_eq!(grid.dz()[50], 0.0);
        assert_relative_eq!(grid.layer_thickness(), 1000.0);
        assert_relative_eq!(grid.z()[10], 40_000.0);
    }

    #[test]
    fn test_heights_strictly_decreasing() {
        let grid = VerticalGrid::new(7, 13_000.0).unwrap();
        for i in 1..grid.nlayer() {
            assert!(
                grid.z()[i] < grid.z()[i - 1],
                "z not decreasing at {}: {} >= {}",
                i,
                grid.z()[i],
                grid.z()[i - 1]
            );
        }
    }

    #[test]
    fn test_single_level_is_surface() {
        let grid = VerticalGrid::new(1, 50_000.0).unwrap();

        assert_eq!(grid.z().to_vec(), vec![0.0]);
        assert_eq!(grid.dz().to_vec(), vec![0.0]);
        assert_eq!(grid.layer_thickness(), 0.0);
        assert_eq!(grid.z_top(), 50_000.0);
    }

    #[test]
    fn test_two_levels() {
        let grid = VerticalGrid::new(2, 10_000.0).unwrap();

        assert_eq!(grid.z().to_vec(), vec![10_000.0, 0.0]);
        assert_eq!(grid.dz().to_vec(), vec![10_000.0, 0.0]);
    }

    #[test]
    fn test_kilometre_conversion() {
        let (grid, _) = build_grid(11, 50.0).unwrap();
        assert_eq!(grid.z()[0], 50_000.0);
        assert_eq!(grid.z_top(), 50_000.0);
    }

    #[test]
    fn test_density_profile() {
        let (grid, density) = build_grid(26, 50.0).unwrap();

        assert_eq!(density.len(), grid.nlayer());
        assert_relative_eq!(density[25], GROUND_AIR_DENSITY);
        assert_relative_eq!(
            density[0],
            GROUND_AIR_DENSITY * (-50_000.0 / DENSITY_SCALE_HEIGHT).exp()
        );
        // Positive everywhere and densest at the ground
        for i in 1..density.len() {
            assert!(density[i - 1] > 0.0);
            assert!(density[i - 1] <= density[i]);
        }
    }

    #[test]
    fn test_integrate_constant() {
        let grid = VerticalGrid::new(11, 10_000.0).unwrap();
        let ones = Array1::ones(11);
        assert_relative_eq!(grid.integrate(&ones), 10_000.0, epsilon = 1e-9);

        let surface = VerticalGrid::new(1, 10_000.0).unwrap();
        assert_eq!(surface.integrate(&Array1::ones(1)), 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            VerticalGrid::new(0, 1000.0).unwrap_err().parameter(),
            Some("nlayer")
        );
        assert_eq!(
            VerticalGrid::new(5, 0.0).unwrap_err().parameter(),
            Some("z_top")
        );
        assert!(VerticalGrid::new(5, -1.0).is_err());
        assert!(VerticalGrid::new(5, FloatValue::NAN).is_err());
        assert!(build_grid(5, -50.0).is_err());
    }
}
