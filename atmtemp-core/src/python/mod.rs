//! Python bindings for the model pipeline
//!
//! Each stage is exposed as a plain function over numpy arrays. Flags are accepted as
//! integers (`0`/`1`) and profile kinds as strings so existing scripts keep working.

use crate::equilibrium::RadiativeEquilibrium;
use crate::errors::AtmError;
use crate::grid;
use crate::optical_depth;
use crate::parameters::{AtmosphereParameters, CloudParameters, Switch};
use crate::profile::{self, ProfileKind};
use crate::FloatValue;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{PyArithmeticError, PyValueError};
use pyo3::prelude::*;

type PyFloatArray<'py> = Bound<'py, PyArray1<FloatValue>>;

impl From<AtmError> for PyErr {
    fn from(err: AtmError) -> Self {
        match err {
            AtmError::InvalidParameter { .. } => PyValueError::new_err(err.to_string()),
            AtmError::NumericFailure(_) => PyArithmeticError::new_err(err.to_string()),
        }
    }
}

fn layer_count(nlayer: i64) -> PyResult<usize> {
    usize::try_from(nlayer)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| {
            AtmError::invalid(
                "nlayer",
                format!("the number of layers must be at least 1, got {}", nlayer),
            )
            .into()
        })
}

/// Level heights (m), layer thicknesses (m) and air density (kg/m³).
#[pyfunction]
#[pyo3(name = "build_grid", signature = (nlayer, z_top))]
fn py_build_grid<'py>(
    py: Python<'py>,
    nlayer: i64,
    z_top: FloatValue,
) -> PyResult<(PyFloatArray<'py>, PyFloatArray<'py>, PyFloatArray<'py>)> {
    let (grid, density) = grid::build_grid(layer_count(nlayer)?, z_top)?;
    Ok((
        grid.z().clone().into_pyarray_bound(py),
        grid.dz().clone().into_pyarray_bound(py),
        density.into_pyarray_bound(py),
    ))
}

/// Mixing-ratio shape ("constant" or "exponential") on the heights `z` (m).
#[pyfunction]
#[pyo3(name = "mixing_ratio", signature = (kind, z, scale_height))]
fn py_mixing_ratio<'py>(
    py: Python<'py>,
    kind: &str,
    z: PyReadonlyArray1<'py, FloatValue>,
    scale_height: FloatValue,
) -> PyResult<PyFloatArray<'py>> {
    let kind: ProfileKind = kind.parse()?;
    let w = profile::mixing_ratio(kind, z.as_array(), scale_height)?;
    Ok(w.into_pyarray_bound(py))
}

#[pyfunction]
#[pyo3(name = "ozone_mixing_ratio", signature = (ozone, z))]
fn py_ozone_mixing_ratio<'py>(
    py: Python<'py>,
    ozone: i64,
    z: PyReadonlyArray1<'py, FloatValue>,
) -> PyResult<PyFloatArray<'py>> {
    let ozone = Switch::from_flag("ozone", ozone)?;
    Ok(profile::ozone_mixing_ratio(ozone, z.as_array()).into_pyarray_bound(py))
}

/// Lambert-Beer optical depth of each layer from the level-wise absorption coefficient and
/// absorber density.
#[pyfunction]
#[pyo3(name = "gasses_optical_depth", signature = (dz, k, density_abs))]
fn py_gasses_optical_depth<'py>(
    py: Python<'py>,
    dz: PyReadonlyArray1<'py, FloatValue>,
    k: PyReadonlyArray1<'py, FloatValue>,
    density_abs: PyReadonlyArray1<'py, FloatValue>,
) -> PyResult<PyFloatArray<'py>> {
    let ch = optical_depth::gasses_optical_depth(
        dz.as_array(),
        k.as_array(),
        density_abs.as_array(),
    )?;
    Ok(ch.into_pyarray_bound(py))
}

/// Long-wave and short-wave optical depths of every layer, plus the level heights.
///
/// Returns `(ch_ir, ch_sw, z)`.
#[pyfunction]
#[pyo3(name = "optical_depth", signature = (
    nlayer=51,
    z_top=50.0,
    scale_height_1=5.0,
    scale_height_2=5.0,
    profile_1="constant",
    profile_2="constant",
    ozone=0,
    k_1=0.4,
    k_2=0.0,
    k_ozone=0.0,
    clouds=0,
    cloud_bounds=(8.0, 10.0),
    k_cloud_lw=0.0,
    k_cloud_sw=0.0,
))]
#[allow(clippy::too_many_arguments)]
fn py_optical_depth<'py>(
    py: Python<'py>,
    nlayer: i64,
    z_top: FloatValue,
    scale_height_1: FloatValue,
    scale_height_2: FloatValue,
    profile_1: &str,
    profile_2: &str,
    ozone: i64,
    k_1: FloatValue,
    k_2: FloatValue,
    k_ozone: FloatValue,
    clouds: i64,
    cloud_bounds: (FloatValue, FloatValue),
    k_cloud_lw: FloatValue,
    k_cloud_sw: FloatValue,
) -> PyResult<(PyFloatArray<'py>, PyFloatArray<'py>, PyFloatArray<'py>)> {
    let params = AtmosphereParameters {
        nlayer: layer_count(nlayer)?,
        z_top,
        scale_height_1,
        scale_height_2,
        profile_1: profile_1.parse()?,
        profile_2: profile_2.parse()?,
        ozone: Switch::from_flag("ozone", ozone)?,
        k_1,
        k_2,
        k_ozone,
        clouds: CloudParameters {
            enabled: Switch::from_flag("clouds", clouds)?,
            bottom: cloud_bounds.0,
            top: cloud_bounds.1,
            k_lw: k_cloud_lw,
            k_sw: k_cloud_sw,
        },
    };
    let profile = optical_depth::optical_depth(&params)?;
    Ok((
        profile.ch_ir.into_pyarray_bound(py),
        profile.ch_sw.into_pyarray_bound(py),
        profile.z.into_pyarray_bound(py),
    ))
}

/// Equilibrium temperature (K) of every layer, the last entry being the surface.
#[pyfunction]
#[pyo3(name = "temperature_profile", signature = (ch_ir, ch_sw))]
fn py_temperature_profile<'py>(
    py: Python<'py>,
    ch_ir: PyReadonlyArray1<'py, FloatValue>,
    ch_sw: PyReadonlyArray1<'py, FloatValue>,
) -> PyResult<PyFloatArray<'py>> {
    let temperature = RadiativeEquilibrium::new().solve(ch_ir.as_array(), ch_sw.as_array())?;
    Ok(temperature.into_pyarray_bound(py))
}

#[pymodule]
#[pyo3(name = "core")]
pub fn core_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_build_grid, m)?)?;
    m.add_function(wrap_pyfunction!(py_mixing_ratio, m)?)?;
    m.add_function(wrap_pyfunction!(py_ozone_mixing_ratio, m)?)?;
    m.add_function(wrap_pyfunction!(py_gasses_optical_depth, m)?)?;
    m.add_function(wrap_pyfunction!(py_optical_depth, m)?)?;
    m.add_function(wrap_pyfunction!(py_temperature_profile, m)?)?;
    Ok(())
}
