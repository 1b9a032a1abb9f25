//! Correlation model trait and validation helpers.

use crate::error::{FluidError, FluidResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated (T, P) operating range of a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Minimum temperature [K]
    pub t_min: f64,
    /// Maximum temperature [K]
    pub t_max: f64,
    /// Minimum pressure [Pa]
    pub p_min: f64,
    /// Maximum pressure [Pa]
    pub p_max: f64,
}

impl Envelope {
    pub fn new(t_min: f64, t_max: f64, p_min: f64, p_max: f64) -> Self {
        Self {
            t_min,
            t_max,
            p_min,
            p_max,
        }
    }

    /// Ensure the bounds are finite, positive, and ordered.
    pub fn validate(&self) -> FluidResult<()> {
        let bounds = [self.t_min, self.t_max, self.p_min, self.p_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(FluidError::NonPhysical {
                what: "envelope bounds must be finite",
            });
        }
        if self.t_min <= 0.0 || self.t_min >= self.t_max {
            return Err(FluidError::NonPhysical {
                what: "envelope requires 0 < t_min < t_max",
            });
        }
        if self.p_min < 0.0 || self.p_min >= self.p_max {
            return Err(FluidError::NonPhysical {
                what: "envelope requires 0 <= p_min < p_max",
            });
        }
        Ok(())
    }

    pub fn check_temperature(&self, t: f64) -> FluidResult<()> {
        if t >= self.t_min && t <= self.t_max {
            Ok(())
        } else {
            Err(FluidError::out_of_range(
                "temperature",
                t,
                self.t_min,
                self.t_max,
            ))
        }
    }

    pub fn check_pressure(&self, p: f64) -> FluidResult<()> {
        if p >= self.p_min && p <= self.p_max {
            Ok(())
        } else {
            Err(FluidError::out_of_range(
                "pressure",
                p,
                self.p_min,
                self.p_max,
            ))
        }
    }

    pub fn check(&self, t: f64, p: f64) -> FluidResult<()> {
        self.check_temperature(t)?;
        self.check_pressure(p)
    }

    pub fn contains(&self, t: f64, p: f64) -> bool {
        self.check(t, p).is_ok()
    }

    /// Overlap of two envelopes, or `None` if they are disjoint.
    pub fn intersect(&self, other: &Envelope) -> Option<Envelope> {
        let out = Envelope {
            t_min: self.t_min.max(other.t_min),
            t_max: self.t_max.min(other.t_max),
            p_min: self.p_min.max(other.p_min),
            p_max: self.p_max.min(other.p_max),
        };
        (out.t_min < out.t_max && out.p_min < out.p_max).then_some(out)
    }
}

/// Forward property correlations for an incompressible fluid.
///
/// Each evaluator takes temperature [K], pressure [Pa], and the mass fractions
/// in effect, and fails with [`FluidError::OutOfRange`] outside
/// [`Correlation::envelope`]. Implementations are immutable after construction
/// and must be shareable across threads.
pub trait Correlation: Send + Sync + fmt::Debug {
    /// Display name (for debugging/logging).
    fn name(&self) -> &str;

    /// Component names in composition order.
    fn component_names(&self) -> Vec<String>;

    /// Component molar masses [kg/mol], used for mole/mass conversion.
    fn molar_masses(&self) -> Vec<f64>;

    /// Valid (T, P) range for the given mass fractions.
    fn envelope(&self, x: &[f64]) -> Envelope;

    /// Density [kg/m³].
    fn density(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64>;

    /// Specific heat capacity [J/(kg·K)]. `cp = cv` for an incompressible liquid.
    fn specific_heat(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64>;

    /// Specific internal energy [J/kg].
    fn internal_energy(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64>;

    /// Specific enthalpy [J/kg].
    fn enthalpy(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64>;

    /// Specific entropy [J/(kg·K)].
    fn entropy(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64>;

    /// Dynamic viscosity [Pa·s].
    fn viscosity(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64>;

    /// Thermal conductivity [W/(m·K)].
    fn conductivity(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64>;
}

/// Validation helpers for correlation outputs.
pub(crate) mod validation {
    use super::*;

    pub fn validate_positive(v: f64, what: &'static str) -> FluidResult<f64> {
        if !v.is_finite() || v <= 0.0 {
            return Err(FluidError::NonPhysical { what });
        }
        Ok(v)
    }

    pub fn validate_finite(v: f64, what: &'static str) -> FluidResult<f64> {
        if !v.is_finite() {
            return Err(FluidError::NonPhysical { what });
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    fn water_like() -> Envelope {
        Envelope::new(273.15, 373.15, 1.0e3, 1.0e7)
    }

    #[test]
    fn envelope_checks() {
        let env = water_like();
        assert!(env.validate().is_ok());
        assert!(env.contains(300.0, 1.0e5));
        assert!(env.contains(273.15, 1.0e7));
        assert!(!env.contains(250.0, 1.0e5));
        assert!(!env.contains(300.0, 2.0e7));
        assert!(!env.contains(f64::NAN, 1.0e5));

        let err = env.check_temperature(400.0).unwrap_err();
        assert!(matches!(
            err,
            FluidError::OutOfRange {
                what: "temperature",
                ..
            }
        ));
        let err = env.check_pressure(-1.0).unwrap_err();
        assert!(matches!(err, FluidError::OutOfRange { what: "pressure", .. }));
    }

    #[test]
    fn envelope_validation() {
        assert!(Envelope::new(300.0, 280.0, 0.0, 1.0e6).validate().is_err());
        assert!(Envelope::new(-1.0, 280.0, 0.0, 1.0e6).validate().is_err());
        assert!(Envelope::new(250.0, 280.0, 1.0e6, 1.0e6).validate().is_err());
        assert!(Envelope::new(250.0, f64::INFINITY, 0.0, 1.0e6).validate().is_err());
    }

    #[test]
    fn envelope_intersection() {
        let a = water_like();
        let b = Envelope::new(260.0, 420.0, 1.0e4, 5.0e6);
        let both = a.intersect(&b).unwrap();
        assert_eq!(both, Envelope::new(273.15, 373.15, 1.0e4, 5.0e6));

        let disjoint = Envelope::new(400.0, 500.0, 1.0e3, 1.0e7);
        assert!(a.intersect(&disjoint).is_none());
    }

    #[test]
    fn validate_positive_values() {
        assert!(validate_positive(998.0, "density").is_ok());
        assert!(validate_positive(0.0, "density").is_err());
        assert!(validate_positive(f64::NAN, "density").is_err());
        assert!(validate_finite(-1.0e5, "enthalpy").is_ok());
        assert!(validate_finite(f64::INFINITY, "enthalpy").is_err());
    }
}
