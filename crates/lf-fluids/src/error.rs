//! Fluid property errors.

use lf_core::CoreError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during incompressible property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Fraction vector has the wrong length, negative entries, or a non-unit sum.
    #[error("Invalid composition: {what}")]
    Composition { what: String },

    /// Composition-dependent operation attempted before fractions were set.
    #[error("Composition not set: {what}")]
    NotSet { what: &'static str },

    /// Value outside the correlation's validated domain.
    #[error("Value out of range for {what}: {value} not in [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Flash iteration budget exhausted or target unreachable within the bracket.
    #[error("Flash failed for {input}: {what}")]
    FlashConvergence { input: &'static str, what: String },

    /// Property query attempted before any successful update.
    #[error("State not resolved: {what}")]
    NotResolved { what: &'static str },

    /// Non-physical values (negative density, viscosity, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Operation not supported (e.g., input pairs without pressure).
    #[error("Not supported: {what}")]
    NotSupported { what: String },

    /// Fluid name not present in the catalog.
    #[error("Unknown incompressible fluid '{name}'")]
    UnknownFluid { name: String },

    /// Malformed fluid definition.
    #[error("Invalid fluid definition: {message}")]
    Definition { message: String },
}

impl FluidError {
    pub(crate) fn out_of_range(what: &'static str, value: f64, min: f64, max: f64) -> Self {
        FluidError::OutOfRange {
            what,
            value,
            min,
            max,
        }
    }
}

impl From<CoreError> for FluidError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NonFinite { what, value } => FluidError::OutOfRange {
                what,
                value,
                min: f64::NEG_INFINITY,
                max: f64::INFINITY,
            },
        }
    }
}

impl From<serde_json::Error> for FluidError {
    fn from(err: serde_json::Error) -> Self {
        FluidError::Definition {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical { what: "density" };
        assert!(err.to_string().contains("density"));

        let err = FluidError::FlashConvergence {
            input: "DmassP",
            what: "target unreachable".into(),
        };
        assert!(err.to_string().contains("DmassP"));

        let err = FluidError::out_of_range("temperature", 500.0, 273.15, 373.15);
        let msg = err.to_string();
        assert!(msg.contains("temperature"));
        assert!(msg.contains("500"));
    }

    #[test]
    fn non_finite_core_error_is_out_of_range() {
        let core_err = CoreError::NonFinite {
            what: "pressure",
            value: f64::NAN,
        };
        let fluid_err: FluidError = core_err.into();
        assert!(matches!(
            fluid_err,
            FluidError::OutOfRange {
                what: "pressure",
                ..
            }
        ));
    }
}
