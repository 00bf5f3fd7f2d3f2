use thiserror::Error;

/// Error type for invalid inputs and failed solves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtmError {
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },
    #[error("Numeric failure: {0}")]
    NumericFailure(String),
}

impl AtmError {
    /// Shorthand for [`AtmError::InvalidParameter`].
    pub fn invalid(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending parameter, if this is an input error.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { parameter, .. } => Some(parameter),
            Self::NumericFailure(_) => None,
        }
    }
}

/// Convenience type for `Result<T, AtmError>`.
pub type AtmResult<T> = Result<T, AtmError>;
