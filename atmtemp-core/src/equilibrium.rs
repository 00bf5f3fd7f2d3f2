//! Radiative-equilibrium solver
//!
//! Finds the temperature of every layer such that each one emits exactly as much long-wave
//! radiation as it absorbs (long-wave from every other layer plus its share of the solar
//! beam).
//!
//! # Physics Overview
//!
//! Layer $i$ has long-wave transmittance $t_i = e^{-\tau_i}$ and, by Kirchhoff's law,
//! emissivity equal to its absorbance $\epsilon_i = 1 - t_i$. The ground is a black body, so
//! its transmittance is zero in both bands.
//!
//! The path transmittance between two layers is the product of the transmittances of every
//! layer in between:
//!
//! $$P_{ij} = \prod_{k=i+1}^{j-1} t_k$$
//!
//! Writing $x_j = \sigma T_j^4$, the energy balance of each layer is
//!
//! $$\sum_{j \ne i} P_{ij} \epsilon_j \epsilon_i x_j - 2 \epsilon_i x_i = -S_i$$
//!
//! where interior layers emit through both faces and the surface through one only
//! ($-\epsilon_{n-1} x_{n-1}$ on the last diagonal). The short-wave source is the direct beam
//! absorbed in each layer:
//!
//! $$S_i = TSI \cdot e^{-\sum_{k<i} \tau^{sw}_k} \cdot (1 - t^{sw}_i)$$
//!
//! The dense system $M x = -S$ is solved by LU decomposition.

use crate::errors::{AtmError, AtmResult};
use crate::parameters::RadiationParameters;
use crate::FloatValue;
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1};

/// Pivot ratio below which the interaction matrix is treated as singular.
const SINGULAR_PIVOT_RATIO: FloatValue = FloatValue::EPSILON;

/// Pivot ratio below which a solve succeeds but is reported as poorly conditioned.
const POOR_PIVOT_RATIO: FloatValue = 1e-8;

/// Grey two-stream radiative-equilibrium solver.
#[derive(Debug, Clone, Default)]
pub struct RadiativeEquilibrium {
    parameters: RadiationParameters,
}

impl RadiativeEquilibrium {
    /// Create a solver with the default radiation parameters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parameters(parameters: RadiationParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &RadiationParameters {
        &self.parameters
    }

    /// Equilibrium temperature (K) of every layer, the last entry being the surface.
    ///
    /// # Errors
    ///
    /// - [`AtmError::InvalidParameter`] if the optical depths differ in length, are empty, or
    ///   contain negative or non-finite elements
    /// - [`AtmError::NumericFailure`] if the interaction matrix is singular or the solution
    ///   is not a physical emission
    pub fn solve(
        &self,
        ch_ir: ArrayView1<'_, FloatValue>,
        ch_sw: ArrayView1<'_, FloatValue>,
    ) -> AtmResult<Array1<FloatValue>> {
        validate_optical_depths(ch_ir, ch_sw)?;
        self.parameters.validate()?;

        let n = ch_ir.len();
        let trans_ir = layer_transmittance(ch_ir);
        let emis_ir = trans_ir.mapv(|t| 1.0 - t);

        let transmissivity = transmissivity_matrix(trans_ir.view());
        let interaction = interaction_matrix(&transmissivity, emis_ir.view());
        let irr_abs = absorbed_shortwave(ch_sw, self.parameters.total_solar_irradiance());

        let emission = solve_dense(interaction, &irr_abs)?;

        let sigma = self.parameters.stefan_boltzmann;
        let temperature = emission.mapv(|x| (x / sigma).powf(0.25));
        debug!(
            "Solved radiative equilibrium for {} layers: surface {:.2} K, top {:.2} K",
            n,
            temperature[n - 1],
            temperature[0]
        );
        Ok(temperature)
    }

    /// Long-wave flux leaving the top of the atmosphere (W/m²) for a temperature profile.
    ///
    /// $$OLR = \sum_j \epsilon_j \sigma T_j^4 \prod_{k<j} t_k$$
    ///
    /// At equilibrium this balances the absorbed solar irradiance.
    pub fn outgoing_longwave(
        &self,
        ch_ir: ArrayView1<'_, FloatValue>,
        temperature: ArrayView1<'_, FloatValue>,
    ) -> AtmResult<FloatValue> {
        if ch_ir.len() != temperature.len() {
            return Err(AtmError::invalid(
                "temperature",
                format!(
                    "expected {} layers, got {}",
                    ch_ir.len(),
                    temperature.len()
                ),
            ));
        }
        check_non_negative("ch_ir", ch_ir)?;
        check_non_negative("temperature", temperature)?;

        let sigma = self.parameters.stefan_boltzmann;
        let trans_ir = layer_transmittance(ch_ir);
        let mut path = 1.0;
        let mut olr = 0.0;
        for (t, &temp) in trans_ir.iter().zip(temperature.iter()) {
            olr += (1.0 - t) * sigma * temp.powi(4) * path;
            path *= t;
        }
        Ok(olr)
    }
}

/// Equilibrium temperature profile with the default radiation parameters.
///
/// See [`RadiativeEquilibrium::solve`].
pub fn temperature_profile(
    ch_ir: ArrayView1<'_, FloatValue>,
    ch_sw: ArrayView1<'_, FloatValue>,
) -> AtmResult<Array1<FloatValue>> {
    RadiativeEquilibrium::new().solve(ch_ir, ch_sw)
}

fn validate_optical_depths(
    ch_ir: ArrayView1<'_, FloatValue>,
    ch_sw: ArrayView1<'_, FloatValue>,
) -> AtmResult<()> {
    if ch_ir.len() != ch_sw.len() {
        return Err(AtmError::invalid(
            "ch_sw",
            format!(
                "ch_ir and ch_sw must have equal lengths, got {} and {}",
                ch_ir.len(),
                ch_sw.len()
            ),
        ));
    }
    if ch_ir.is_empty() {
        return Err(AtmError::invalid("ch_ir", "at least one layer is required"));
    }
    check_non_negative("ch_ir", ch_ir)?;
    check_non_negative("ch_sw", ch_sw)
}

/// Reject negative or non-finite elements, naming the offending layer.
fn check_non_negative(name: &'static str, values: ArrayView1<'_, FloatValue>) -> AtmResult<()> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !(**v >= 0.0 && v.is_finite()))
    {
        Some((i, v)) => Err(AtmError::invalid(
            name,
            format!("contains a negative or non-finite element {} at layer {}", v, i),
        )),
        None => Ok(()),
    }
}

/// Optical depth accumulated from the top of the atmosphere down to (excluding) each layer.
pub fn cumulative_optical_depth(ch: ArrayView1<'_, FloatValue>) -> Array1<FloatValue> {
    let mut total = 0.0;
    ch.iter()
        .map(|&tau| {
            let above = total;
            total += tau;
            above
        })
        .collect()
}

/// Transmittance of each layer, with the opaque surface forced to zero.
pub fn layer_transmittance(ch: ArrayView1<'_, FloatValue>) -> Array1<FloatValue> {
    let mut trans = ch.mapv(|tau| (-tau).exp());
    if let Some(surface) = trans.last_mut() {
        *surface = 0.0;
    }
    trans
}

/// Symmetric path-transmittance matrix between every pair of layers.
///
/// Adjacent layers see each other directly (`P[i][i+1] = 1`); further apart, the
/// transmittances of the layers in between multiply up.
pub fn transmissivity_matrix(trans_ir: ArrayView1<'_, FloatValue>) -> DMatrix<FloatValue> {
    let n = trans_ir.len();
    let mut p = DMatrix::from_element(n, n, 1.0);
    for i in 0..n.saturating_sub(2) {
        for j in (i + 2)..n {
            let value = p[(i, j - 1)] * trans_ir[j - 1];
            p[(i, j)] = value;
            p[(j, i)] = value;
        }
    }
    p
}

/// Interaction matrix relating the emission of each layer to the net exchange of every other.
///
/// Off-diagonal terms are `P[i][j] * emis[j] * emis[i]` (absorbance equals emissivity). The
/// diagonal holds the emission loss: `-2 emis[i]` for atmospheric layers and `-emis[n-1]` for
/// the surface, which radiates upwards only.
pub fn interaction_matrix(
    transmissivity: &DMatrix<FloatValue>,
    emis_ir: ArrayView1<'_, FloatValue>,
) -> DMatrix<FloatValue> {
    let n = emis_ir.len();
    let mut m = DMatrix::from_fn(n, n, |i, j| {
        transmissivity[(i, j)] * emis_ir[j] * emis_ir[i]
    });
    for i in 0..n.saturating_sub(1) {
        m[(i, i)] = -2.0 * emis_ir[i];
    }
    if n > 0 {
        m[(n - 1, n - 1)] = -emis_ir[n - 1];
    }
    m
}

/// Solar irradiance absorbed in each layer (W/m²), negated to form the right-hand side.
pub fn absorbed_shortwave(
    ch_sw: ArrayView1<'_, FloatValue>,
    total_solar_irradiance: FloatValue,
) -> Array1<FloatValue> {
    let above = cumulative_optical_depth(ch_sw);
    let abs_sw = layer_transmittance(ch_sw).mapv(|t| 1.0 - t);
    Array1::from_shape_fn(ch_sw.len(), |i| {
        -total_solar_irradiance * (-above[i]).exp() * abs_sw[i]
    })
}

/// Solve `M x = rhs` for the emitted flux of each layer.
fn solve_dense(
    interaction: DMatrix<FloatValue>,
    rhs: &Array1<FloatValue>,
) -> AtmResult<Array1<FloatValue>> {
    let n = rhs.len();
    let lu = interaction.lu();

    let pivots = lu.u().diagonal().map(|v| v.abs());
    let largest = pivots.max();
    let smallest = pivots.min();
    let ratio = if largest > 0.0 { smallest / largest } else { 0.0 };
    if !(ratio > SINGULAR_PIVOT_RATIO) {
        return Err(AtmError::NumericFailure(format!(
            "interaction matrix is singular or ill-conditioned (pivot ratio {:e}); \
             every atmospheric layer needs a non-zero long-wave optical depth",
            ratio
        )));
    }
    if ratio < POOR_PIVOT_RATIO {
        warn!(
            "Interaction matrix is poorly conditioned (pivot ratio {:e})",
            ratio
        );
    }

    let b = DVector::from_iterator(n, rhs.iter().copied());
    let x = lu.solve(&b).ok_or_else(|| {
        AtmError::NumericFailure("LU solve of the interaction matrix failed".to_string())
    })?;

    if let Some((i, v)) = x.iter().enumerate().find(|(_, v)| !(**v > 0.0 && v.is_finite())) {
        return Err(AtmError::NumericFailure(format!(
            "non-physical emission {} at layer {}",
            v, i
        )));
    }
    Ok(x.iter().copied().collect())
}
