//! Liquid composition (pure fluids and ideal mixtures).

use crate::error::{FluidError, FluidResult};
use lf_core::numeric::{Tolerances, nearly_equal};

/// Allowed deviation of a fraction vector's sum from one.
pub const FRACTION_SUM_TOL: f64 = 1e-6;

/// Composition of an incompressible fluid defined by mass fractions.
///
/// Mass fractions are the native representation. Mole fractions are derived on
/// demand from component molar masses. A single-component composition is
/// implicitly set (fraction = 1); a mixture stays unset until a fraction vector
/// has been accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    names: Vec<String>,
    mass_fractions: Option<Vec<f64>>,
}

impl Composition {
    /// Create a pure-fluid composition.
    pub fn pure(name: impl Into<String>) -> Self {
        Self {
            names: vec![name.into()],
            mass_fractions: Some(vec![1.0]),
        }
    }

    /// Create a composition over the given components.
    ///
    /// One component yields a pure composition; more leave the fractions unset.
    pub fn new<S: AsRef<str>>(names: &[S]) -> FluidResult<Self> {
        if names.is_empty() {
            return Err(FluidError::InvalidArg {
                what: "composition needs at least one component",
            });
        }

        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let mass_fractions = (names.len() == 1).then(|| vec![1.0]);
        Ok(Self {
            names,
            mass_fractions,
        })
    }

    /// Number of declared components.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; a composition has at least one component.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Component names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True once fractions are known (always true for pure fluids).
    pub fn is_set(&self) -> bool {
        self.mass_fractions.is_some()
    }

    /// Returns `Some(name)` for a pure-fluid composition.
    pub fn is_pure(&self) -> Option<&str> {
        if self.names.len() == 1 {
            return Some(&self.names[0]);
        }
        None
    }

    /// Fail with [`FluidError::NotSet`] if a mixture has no fractions yet.
    pub fn check_status(&self) -> FluidResult<()> {
        if self.is_set() {
            Ok(())
        } else {
            Err(FluidError::NotSet {
                what: "mass fractions must be set before using a mixture",
            })
        }
    }

    /// Set mass fractions.
    ///
    /// The vector must have one entry per component, contain only finite,
    /// non-negative values, and sum to one within [`FRACTION_SUM_TOL`]. The
    /// stored vector is renormalized so that it sums to one exactly. On error
    /// the previous fractions are kept.
    pub fn set_mass_fractions(&mut self, fractions: &[f64]) -> FluidResult<()> {
        let normalized = self.validate(fractions, "mass")?;
        self.mass_fractions = Some(normalized);
        Ok(())
    }

    /// Set mole fractions, converting to mass fractions with `w_i = x_i M_i / Σ x_j M_j`.
    pub fn set_mole_fractions(&mut self, fractions: &[f64], molar_masses: &[f64]) -> FluidResult<()> {
        let mole = self.validate(fractions, "mole")?;
        self.check_molar_masses(molar_masses)?;

        let total: f64 = mole.iter().zip(molar_masses).map(|(x, m)| x * m).sum();
        let mass = mole
            .iter()
            .zip(molar_masses)
            .map(|(x, m)| x * m / total)
            .collect();
        self.mass_fractions = Some(mass);
        Ok(())
    }

    /// Mass fractions, or [`FluidError::NotSet`] for an unset mixture.
    pub fn mass_fractions(&self) -> FluidResult<&[f64]> {
        self.mass_fractions
            .as_deref()
            .ok_or(FluidError::NotSet {
                what: "mass fractions have not been set",
            })
    }

    /// Mass fraction of a named component (0.0 if absent or unset).
    pub fn mass_fraction(&self, name: &str) -> f64 {
        let Some(fractions) = self.mass_fractions.as_deref() else {
            return 0.0;
        };
        self.names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|i| fractions[i])
            .unwrap_or(0.0)
    }

    /// Mole fractions derived from mass fractions: `x_i = (w_i/M_i) / Σ (w_j/M_j)`.
    pub fn mole_fractions(&self, molar_masses: &[f64]) -> FluidResult<Vec<f64>> {
        let mass = self.mass_fractions()?;
        self.check_molar_masses(molar_masses)?;
        Ok(mass_to_mole(mass, molar_masses))
    }

    /// Mixture molar mass [kg/mol]: `M = 1 / Σ (w_i/M_i)`.
    pub fn molar_mass(&self, molar_masses: &[f64]) -> FluidResult<f64> {
        let mass = self.mass_fractions()?;
        self.check_molar_masses(molar_masses)?;
        let moles_per_kg: f64 = mass.iter().zip(molar_masses).map(|(w, m)| w / m).sum();
        Ok(1.0 / moles_per_kg)
    }

    fn validate(&self, fractions: &[f64], kind: &str) -> FluidResult<Vec<f64>> {
        if fractions.len() != self.names.len() {
            return Err(FluidError::Composition {
                what: format!(
                    "expected {} {kind} fractions, got {}",
                    self.names.len(),
                    fractions.len()
                ),
            });
        }

        let mut sum = 0.0;
        for (name, &frac) in self.names.iter().zip(fractions) {
            if !frac.is_finite() {
                return Err(FluidError::Composition {
                    what: format!("non-finite {kind} fraction for {name}"),
                });
            }
            if frac < 0.0 {
                return Err(FluidError::Composition {
                    what: format!("negative {kind} fraction {frac} for {name}"),
                });
            }
            sum += frac;
        }

        let tol = Tolerances {
            abs: FRACTION_SUM_TOL,
            rel: FRACTION_SUM_TOL,
        };
        if !nearly_equal(sum, 1.0, tol) {
            return Err(FluidError::Composition {
                what: format!("{kind} fractions sum to {sum}, expected 1"),
            });
        }

        Ok(fractions.iter().map(|f| f / sum).collect())
    }

    fn check_molar_masses(&self, molar_masses: &[f64]) -> FluidResult<()> {
        if molar_masses.len() != self.names.len() {
            return Err(FluidError::InvalidArg {
                what: "one molar mass per component is required",
            });
        }
        if molar_masses.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            return Err(FluidError::NonPhysical {
                what: "molar mass must be positive and finite",
            });
        }
        Ok(())
    }
}

/// Convert mass fractions to mole fractions.
pub(crate) fn mass_to_mole(mass: &[f64], molar_masses: &[f64]) -> Vec<f64> {
    let moles: Vec<f64> = mass.iter().zip(molar_masses).map(|(w, m)| w / m).collect();
    let total: f64 = moles.iter().sum();
    moles.into_iter().map(|n| n / total).collect()
}
