//! Fixed physical constants of the model atmosphere.
//!
//! Values that a user may reasonably want to vary (albedo, solar constant) live in
//! [`RadiationParameters`](crate::parameters::RadiationParameters) instead.

use crate::FloatValue;

/// Air density at the ground (kg/m³).
pub const GROUND_AIR_DENSITY: FloatValue = 1.225;

/// Surface pressure (Pa).
pub const SURFACE_PRESSURE: FloatValue = 101_325.0;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: FloatValue = 9.8;

/// Barometric scale height of the density profile (m).
///
/// $$H = \frac{p_0}{g \rho_0}$$
pub const DENSITY_SCALE_HEIGHT: FloatValue = SURFACE_PRESSURE / (GRAVITY * GROUND_AIR_DENSITY);

/// Diffuse transmittance factor $\bar\mu$ used to turn vertical optical depth into slant
/// optical depth for isotropic radiation.
pub const DIFFUSIVITY_FACTOR: FloatValue = 3.0 / 5.0;

/// Lower edge of the stratospheric ozone band (m).
pub const OZONE_LAYER_BOTTOM: FloatValue = 20_000.0;

/// Upper edge of the stratospheric ozone band (m).
pub const OZONE_LAYER_TOP: FloatValue = 50_000.0;

/// Stefan-Boltzmann constant (W m⁻² K⁻⁴).
pub const STEFAN_BOLTZMANN: FloatValue = 5.6704e-8;

/// Planetary albedo.
pub const PLANETARY_ALBEDO: FloatValue = 0.3;

/// Solar constant at the top of the atmosphere (W/m²).
pub const SOLAR_CONSTANT: FloatValue = 1370.0;

/// Metres per kilometre.
pub const METRES_PER_KILOMETRE: FloatValue = 1000.0;
