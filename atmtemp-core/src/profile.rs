//! Mixing-ratio profiles
//!
//! The mixing ratio is the fraction of an absorbing species relative to the total air mass at
//! a given height. Only the shape matters: columns are normalised to a fixed total amount when
//! optical depths are assembled.

use crate::constants::{OZONE_LAYER_BOTTOM, OZONE_LAYER_TOP};
use crate::errors::{AtmError, AtmResult};
use crate::parameters::Switch;
use crate::FloatValue;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of a well-mixed or decaying absorber profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Uniform mixing ratio (e.g. CO2)
    #[default]
    #[serde(alias = "costant")]
    Constant,
    /// $w(z) = e^{-z/H}$ (e.g. H2O)
    Exponential,
}

impl FromStr for ProfileKind {
    type Err = AtmError;

    fn from_str(s: &str) -> AtmResult<Self> {
        match s {
            // "costant" is the tag older configuration files carry
            "constant" | "costant" => Ok(ProfileKind::Constant),
            "exponential" => Ok(ProfileKind::Exponential),
            other => Err(AtmError::invalid(
                "profile",
                format!(
                    "unrecognized profile kind '{}', expected 'constant' or 'exponential'",
                    other
                ),
            )),
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileKind::Constant => write!(f, "constant"),
            ProfileKind::Exponential => write!(f, "exponential"),
        }
    }
}

/// Mixing-ratio shape of an absorber on the heights `z` (m).
///
/// `scale_height` (m) is only used by [`ProfileKind::Exponential`] but must be positive for
/// either kind.
pub fn mixing_ratio(
    kind: ProfileKind,
    z: ArrayView1<'_, FloatValue>,
    scale_height: FloatValue,
) -> AtmResult<Array1<FloatValue>> {
    if !(scale_height > 0.0) {
        return Err(AtmError::invalid(
            "scale_height",
            format!("must be > 0, got {}", scale_height),
        ));
    }

    Ok(match kind {
        ProfileKind::Constant => Array1::ones(z.len()),
        ProfileKind::Exponential => z.mapv(|z| (-z / scale_height).exp()),
    })
}

/// Gaussian mixing ratio of stratospheric ozone on the heights `z` (m).
///
/// The Gaussian is centred in the middle of the ozone band with a standard deviation of one
/// sixth of its width. Levels on or outside the band edges are exactly zero.
pub fn ozone_mixing_ratio(ozone: Switch, z: ArrayView1<'_, FloatValue>) -> Array1<FloatValue> {
    if !ozone.is_on() {
        return Array1::zeros(z.len());
    }

    let centre = 0.5 * (OZONE_LAYER_BOTTOM + OZONE_LAYER_TOP);
    let sigma = (OZONE_LAYER_TOP - OZONE_LAYER_BOTTOM) / 6.0;

    z.mapv(|z| {
        if z > OZONE_LAYER_BOTTOM && z < OZONE_LAYER_TOP {
            (-(z - centre).powi(2) / (2.0 * sigma * sigma)).exp()
        } else {
            0.0
        }
    })
}
