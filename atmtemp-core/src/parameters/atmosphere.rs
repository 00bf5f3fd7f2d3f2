//! Atmosphere parameters
//!
//! Inputs of the optical-depth assembly: geometry, absorber profiles, absorption
//! coefficients and an optional cloud layer. Heights are given in kilometres, as they are in
//! configuration files, and converted to metres when profiles are built.

use super::Switch;
use crate::constants::METRES_PER_KILOMETRE;
use crate::errors::{AtmError, AtmResult};
use crate::profile::ProfileKind;
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters describing the absorbing atmosphere
///
/// # Absorbers
///
/// - Gas 1 absorbs in the long-wave (infrared) band only.
/// - Gas 2 and ozone absorb in the short-wave (solar) band only.
///
/// Each absorber column is normalised to a unit vertical integral, so the absorption
/// coefficients directly set the total optical depth of each absorber:
///
/// $$\tau_{total} = \frac{k}{\bar\mu}$$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereParameters {
    /// Number of levels, including the surface.
    ///
    /// Default: 51
    pub nlayer: usize,

    /// Height of the top of the atmosphere (km).
    ///
    /// Default: 50.0 km
    pub z_top: FloatValue,

    /// Scale height of the gas 1 profile (km). Only shapes exponential profiles.
    ///
    /// Default: 5.0 km
    pub scale_height_1: FloatValue,

    /// Scale height of the gas 2 profile (km). Only shapes exponential profiles.
    ///
    /// Default: 5.0 km
    pub scale_height_2: FloatValue,

    /// Mixing-ratio shape of gas 1.
    ///
    /// Default: constant
    pub profile_1: ProfileKind,

    /// Mixing-ratio shape of gas 2.
    ///
    /// Default: constant
    pub profile_2: ProfileKind,

    /// Whether stratospheric ozone is present.
    ///
    /// Default: off
    pub ozone: Switch,

    /// Absorption coefficient of gas 1 in the long-wave band.
    ///
    /// Default: 0.4
    pub k_1: FloatValue,

    /// Absorption coefficient of gas 2 in the short-wave band.
    ///
    /// Default: 0.0
    pub k_2: FloatValue,

    /// Absorption coefficient of ozone in the short-wave band.
    ///
    /// Default: 0.0
    pub k_ozone: FloatValue,

    /// Cloud layer.
    pub clouds: CloudParameters,
}

impl Default for AtmosphereParameters {
    fn default() -> Self {
        Self {
            nlayer: 51,
            z_top: 50.0,
            scale_height_1: 5.0,
            scale_height_2: 5.0,
            profile_1: ProfileKind::Constant,
            profile_2: ProfileKind::Constant,
            ozone: Switch::Off,
            k_1: 0.4,
            k_2: 0.0,
            k_ozone: 0.0,
            clouds: CloudParameters::default(),
        }
    }
}

impl AtmosphereParameters {
    /// Check every input constraint before anything is computed.
    ///
    /// Cloud bounds are checked even when clouds are switched off.
    pub fn validate(&self) -> AtmResult<()> {
        if self.nlayer < 1 {
            return Err(AtmError::invalid(
                "nlayer",
                "the number of layers must be at least 1",
            ));
        }
        ensure_positive("z_top", self.z_top)?;
        ensure_positive("scale_height_1", self.scale_height_1)?;
        ensure_positive("scale_height_2", self.scale_height_2)?;
        ensure_non_negative("k_1", self.k_1)?;
        ensure_non_negative("k_2", self.k_2)?;
        ensure_non_negative("k_ozone", self.k_ozone)?;
        self.clouds.validate(self.z_top)
    }

    /// Height of the top of the atmosphere (m).
    pub fn z_top_metres(&self) -> FloatValue {
        self.z_top * METRES_PER_KILOMETRE
    }
}

/// A grey cloud slab between two heights
///
/// The cloud adds $k \, \Delta z / \bar\mu$ of optical depth to every atmospheric layer it
/// covers, separately in each band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParameters {
    /// Whether the cloud layer is present.
    ///
    /// Default: off
    pub enabled: Switch,

    /// Height of the cloud base (km).
    ///
    /// Default: 8.0 km
    pub bottom: FloatValue,

    /// Height of the cloud top (km).
    ///
    /// Default: 10.0 km
    pub top: FloatValue,

    /// Long-wave absorption coefficient of the cloud (per m).
    ///
    /// Default: 0.0
    pub k_lw: FloatValue,

    /// Short-wave absorption coefficient of the cloud (per m).
    ///
    /// Default: 0.0
    pub k_sw: FloatValue,
}

impl Default for CloudParameters {
    fn default() -> Self {
        Self {
            enabled: Switch::Off,
            bottom: 8.0,
            top: 10.0,
            k_lw: 0.0,
            k_sw: 0.0,
        }
    }
}

impl CloudParameters {
    /// Check the cloud against an atmosphere whose top is `z_top` km.
    pub fn validate(&self, z_top: FloatValue) -> AtmResult<()> {
        ensure_non_negative("k_cloud_lw", self.k_lw)?;
        ensure_non_negative("k_cloud_sw", self.k_sw)?;
        ensure_non_negative("cloud_bottom", self.bottom)?;
        ensure_non_negative("cloud_top", self.top)?;
        if self.bottom >= self.top {
            return Err(AtmError::invalid(
                "cloud_bottom",
                format!(
                    "the cloud bottom ({} km) must be below the cloud top ({} km)",
                    self.bottom, self.top
                ),
            ));
        }
        if self.top > z_top {
            return Err(AtmError::invalid(
                "cloud_top",
                format!(
                    "the cloud top ({} km) is higher than the top of the atmosphere ({} km)",
                    self.top, z_top
                ),
            ));
        }
        Ok(())
    }

    /// Height of the cloud base (m).
    pub fn bottom_metres(&self) -> FloatValue {
        self.bottom * METRES_PER_KILOMETRE
    }

    /// Height of the cloud top (m).
    pub fn top_metres(&self) -> FloatValue {
        self.top * METRES_PER_KILOMETRE
    }
}

fn ensure_positive(parameter: &str, value: FloatValue) -> AtmResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(AtmError::invalid(
            parameter,
            format!("must be > 0, got {}", value),
        ))
    }
}

fn ensure_non_negative(parameter: &str, value: FloatValue) -> AtmResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(AtmError::invalid(
            parameter,
            format!("must be >= 0, got {}", value),
        ))
    }
}
