//! Model parameters
//!
//! Immutable parameter structures threaded through the pipeline. Each struct provides
//! defaults matching the reference configuration of the model and validates itself before
//! any profile is computed.

mod atmosphere;
mod radiation;
mod switch;

pub use atmosphere::{AtmosphereParameters, CloudParameters};
pub use radiation::RadiationParameters;
pub use switch::Switch;
