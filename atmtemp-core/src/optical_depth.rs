//! Optical depth assembly
//!
//! Converts absorber distributions into the optical depth accumulated within each layer, in
//! the long-wave (IR) and short-wave (SW) bands.
//!
//! # Method
//!
//! 1. Each absorber column is air density times mixing ratio, normalised to a unit vertical
//!    integral (trapezoidal rule).
//! 2. The optical depth of layer $i$ uses the mean of its two bounding levels (Lambert-Beer):
//!
//! $$\tau_i = \frac{\Delta z_i}{\bar\mu} \cdot \frac{k_i c_i + k_{i+1} c_{i+1}}{2}$$
//!
//! 3. The surface level has no overlying slab, so $\tau_{n-1} = 0$.
//! 4. An optional grey cloud adds $k_{cloud} \Delta z_i / \bar\mu$ to every layer it covers.

use crate::constants::{DIFFUSIVITY_FACTOR, METRES_PER_KILOMETRE};
use crate::errors::{AtmError, AtmResult};
use crate::grid::VerticalGrid;
use crate::parameters::{AtmosphereParameters, CloudParameters};
use crate::profile::{mixing_ratio, ozone_mixing_ratio};
use crate::FloatValue;
use log::{debug, warn};
use ndarray::{Array1, ArrayView1};
use std::ops::RangeInclusive;

/// Per-layer optical depths in both bands together with the level heights.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalDepthProfile {
    /// Long-wave optical depth within each layer
    pub ch_ir: Array1<FloatValue>,
    /// Short-wave optical depth within each layer
    pub ch_sw: Array1<FloatValue>,
    /// Level heights (m)
    pub z: Array1<FloatValue>,
}

impl OpticalDepthProfile {
    pub fn nlayer(&self) -> usize {
        self.z.len()
    }

    /// Optical depth of the whole column in each band, `(ir, sw)`.
    pub fn column_optical_depth(&self) -> (FloatValue, FloatValue) {
        (self.ch_ir.sum(), self.ch_sw.sum())
    }
}

/// Absorber column normalised to a unit vertical integral.
///
/// A surface-only grid has no meaningful integral and yields a zero column, as does an
/// absorber that is absent from every level.
pub fn normalised_column(
    grid: &VerticalGrid,
    density: ArrayView1<'_, FloatValue>,
    mixing_ratio: ArrayView1<'_, FloatValue>,
) -> AtmResult<Array1<FloatValue>> {
    let nlayer = grid.nlayer();
    if density.len() != nlayer || mixing_ratio.len() != nlayer {
        return Err(AtmError::invalid(
            "mixing_ratio",
            format!(
                "expected {} levels, got density of length {} and mixing ratio of length {}",
                nlayer,
                density.len(),
                mixing_ratio.len()
            ),
        ));
    }

    if nlayer == 1 {
        return Ok(Array1::zeros(1));
    }

    let column = &density * &mixing_ratio;
    let total = grid.integrate(&column);
    if total == 0.0 {
        debug!("Absorber column integrates to zero, using an empty column");
        return Ok(Array1::zeros(nlayer));
    }
    Ok(column / total)
}

/// Layer optical depth from per-level absorption coefficients and absorber amounts.
///
/// `dz`, `k` and `density_abs` must have the same length. The last entry is always zero.
pub fn gasses_optical_depth(
    dz: ArrayView1<'_, FloatValue>,
    k: ArrayView1<'_, FloatValue>,
    density_abs: ArrayView1<'_, FloatValue>,
) -> AtmResult<Array1<FloatValue>> {
    let nlayer = k.len();
    if dz.len() != nlayer || density_abs.len() != nlayer {
        return Err(AtmError::invalid(
            "density_abs",
            format!(
                "dz, k and density_abs must have equal lengths, got {}, {} and {}",
                dz.len(),
                nlayer,
                density_abs.len()
            ),
        ));
    }

    let mut ch = Array1::zeros(nlayer);
    for i in 0..nlayer.saturating_sub(1) {
        ch[i] = dz[i] * 0.5 * (k[i] * density_abs[i] + k[i + 1] * density_abs[i + 1])
            / DIFFUSIVITY_FACTOR;
    }
    Ok(ch)
}

/// Layer optical depth of an absorber with a height-independent coefficient `k`.
fn absorber_optical_depth(
    grid: &VerticalGrid,
    k: FloatValue,
    column: &Array1<FloatValue>,
) -> AtmResult<Array1<FloatValue>> {
    let k = Array1::from_elem(grid.nlayer(), k);
    gasses_optical_depth(grid.dz().view(), k.view(), column.view())
}

/// Map a height (m) to a level index counted from the top of the atmosphere.
///
/// $$i = n - \mathrm{round}\left(\frac{h}{z_{top}} n\right)$$
///
/// Rounding is to the nearest integer with halves away from zero.
pub fn height_to_index(height: FloatValue, z_top: FloatValue, nlayer: usize) -> usize {
    let levels_below = (height / z_top * nlayer as FloatValue).round();
    // height lies in [0, z_top], so levels_below lies in [0, nlayer]
    nlayer - (levels_below.max(0.0) as usize).min(nlayer)
}

/// Inclusive range of layers covered by a cloud, `top_index..=bottom_index`.
///
/// The surface level is never included; the range is empty when the cloud covers no
/// atmospheric layer.
pub fn cloud_layer_indices(grid: &VerticalGrid, cloud: &CloudParameters) -> RangeInclusive<usize> {
    let nlayer = grid.nlayer();
    let bottom_index = height_to_index(cloud.bottom_metres(), grid.z_top(), nlayer);
    let top_index = height_to_index(cloud.top_metres(), grid.z_top(), nlayer);

    match nlayer.checked_sub(2) {
        Some(last_atmospheric) => top_index..=bottom_index.min(last_atmospheric),
        // 1..=0 is empty
        None => 1..=0,
    }
}

/// Add the optical depth of a cloud layer to existing long-wave and short-wave profiles.
///
/// The cloud is applied regardless of its `enabled` flag; deciding whether to call this is up
/// to the caller.
pub fn clouds_optical_depth(
    mut ch_ir: Array1<FloatValue>,
    mut ch_sw: Array1<FloatValue>,
    grid: &VerticalGrid,
    cloud: &CloudParameters,
) -> AtmResult<(Array1<FloatValue>, Array1<FloatValue>)> {
    if ch_ir.len() != grid.nlayer() || ch_sw.len() != grid.nlayer() {
        return Err(AtmError::invalid(
            "ch_ir",
            format!(
                "expected {} layers, got ch_ir of length {} and ch_sw of length {}",
                grid.nlayer(),
                ch_ir.len(),
                ch_sw.len()
            ),
        ));
    }
    cloud.validate(grid.z_top() / METRES_PER_KILOMETRE)?;

    let layers = cloud_layer_indices(grid, cloud);
    if layers.is_empty() {
        warn!(
            "Cloud between {} km and {} km covers no atmospheric layer",
            cloud.bottom, cloud.top
        );
        return Ok((ch_ir, ch_sw));
    }

    debug!("Cloud covers layers {:?}", layers);
    for i in layers {
        let dz = grid.dz()[i];
        ch_ir[i] += cloud.k_lw * dz / DIFFUSIVITY_FACTOR;
        ch_sw[i] += cloud.k_sw * dz / DIFFUSIVITY_FACTOR;
    }
    Ok((ch_ir, ch_sw))
}

/// Long-wave and short-wave optical depth profiles of the described atmosphere.
///
/// Gas 1 absorbs in the long-wave band; gas 2 and ozone absorb in the short-wave band. Clouds
/// are added when switched on.
pub fn optical_depth(params: &AtmosphereParameters) -> AtmResult<OpticalDepthProfile> {
    params.validate()?;

    let grid = VerticalGrid::from_kilometres(params.nlayer, params.z_top)?;
    let density = grid.air_density();
    let z = grid.z().view();

    let w_1 = mixing_ratio(params.profile_1, z, params.scale_height_1 * METRES_PER_KILOMETRE)?;
    let w_2 = mixing_ratio(params.profile_2, z, params.scale_height_2 * METRES_PER_KILOMETRE)?;
    let w_ozone = ozone_mixing_ratio(params.ozone, z);

    let column_1 = normalised_column(&grid, density.view(), w_1.view())?;
    let column_2 = normalised_column(&grid, density.view(), w_2.view())?;
    let column_ozone = normalised_column(&grid, density.view(), w_ozone.view())?;

    let ch_ir = absorber_optical_depth(&grid, params.k_1, &column_1)?;
    let ch_sw = absorber_optical_depth(&grid, params.k_2, &column_2)?
        + absorber_optical_depth(&grid, params.k_ozone, &column_ozone)?;

    let (ch_ir, ch_sw) = if params.clouds.enabled.is_on() {
        clouds_optical_depth(ch_ir, ch_sw, &grid, &params.clouds)?
    } else {
        (ch_ir, ch_sw)
    };

    let profile = OpticalDepthProfile {
        ch_ir,
        ch_sw,
        z: grid.z().clone(),
    };
    let (tau_ir, tau_sw) = profile.column_optical_depth();
    debug!(
        "Assembled optical depths for {} levels: column IR {:.4}, column SW {:.4}",
        profile.nlayer(),
        tau_ir,
        tau_sw
    );
    Ok(profile)
}
