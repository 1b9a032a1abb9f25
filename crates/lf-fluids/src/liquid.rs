//! Pure incompressible liquid described by temperature polynomials.
//!
//! All fits are in `τ = T − T_base`:
//!
//! - density `ρ(τ)` [kg/m³]
//! - specific heat `c(τ)` [J/(kg·K)], with `cp = cv = c`
//! - viscosity `ln μ(τ)` [ln(Pa·s)]
//! - conductivity `k(τ)` [W/(m·K)]
//!
//! Caloric properties are measured from the reference state `(T_ref, P_ref)`:
//!
//! - `u(T) = ∫ c dT` from `T_ref`
//! - `h(T, P) = u(T) + (P − P_ref)/ρ(T)`
//! - `s(T) = ∫ c/T dT` from `T_ref`
//!
//! Density does not depend on pressure.

use crate::correlation::{Correlation, Envelope, validation};
use crate::error::{FluidError, FluidResult};
use crate::polynomial::Polynomial;
use lf_core::numeric::linspace;
use lf_core::units::constants::{P_ATM_PA, T_REF_K};
use serde::{Deserialize, Serialize};

/// Number of temperatures sampled when checking fits for positivity.
const VALIDATION_SAMPLES: usize = 64;

fn default_t_ref() -> f64 {
    T_REF_K
}

fn default_p_ref() -> f64 {
    P_ATM_PA
}

/// Coefficient set for one pure incompressible liquid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncompressibleFluid {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Molar mass [kg/mol]
    pub molar_mass: f64,
    pub envelope: Envelope,
    /// Temperature the fits are centered on [K]
    pub t_base: f64,
    /// Reference temperature where `u = s = 0` [K]
    #[serde(default = "default_t_ref")]
    pub t_ref: f64,
    /// Reference pressure where `h = u` [Pa]
    #[serde(default = "default_p_ref")]
    pub p_ref: f64,
    pub density: Polynomial,
    pub specific_heat: Polynomial,
    /// Fit of `ln(μ [Pa·s])`
    pub viscosity: Polynomial,
    pub conductivity: Polynomial,
}

impl IncompressibleFluid {
    /// Parse and validate a fluid definition from JSON.
    pub fn from_json(json: &str) -> FluidResult<Self> {
        let fluid: IncompressibleFluid = serde_json::from_str(json)?;
        fluid.validate()?;
        Ok(fluid)
    }

    /// Check the definition for physical plausibility.
    ///
    /// Density, specific heat, viscosity, and conductivity must be positive and
    /// finite at every sampled temperature of the envelope.
    pub fn validate(&self) -> FluidResult<()> {
        if self.name.trim().is_empty() {
            return Err(FluidError::InvalidArg {
                what: "fluid name must not be empty",
            });
        }
        validation::validate_positive(self.molar_mass, "molar mass must be positive")?;
        self.envelope.validate()?;
        validation::validate_positive(self.t_base, "base temperature must be positive")?;
        validation::validate_positive(self.t_ref, "reference temperature must be positive")?;
        validation::validate_finite(self.p_ref, "reference pressure must be finite")?;

        for (poly, what) in [
            (&self.density, "density fit"),
            (&self.specific_heat, "specific heat fit"),
            (&self.viscosity, "viscosity fit"),
            (&self.conductivity, "conductivity fit"),
        ] {
            if poly.is_empty() || !poly.is_finite() {
                return Err(FluidError::Definition {
                    message: format!("{what} of {} needs finite coefficients", self.name),
                });
            }
        }

        for t in linspace(self.envelope.t_min, self.envelope.t_max, VALIDATION_SAMPLES) {
            let tau = t - self.t_base;
            validation::validate_positive(self.density.eval(tau), "density must be positive")?;
            validation::validate_positive(
                self.specific_heat.eval(tau),
                "specific heat must be positive",
            )?;
            validation::validate_positive(
                self.viscosity.eval(tau).exp(),
                "viscosity must be positive",
            )?;
            validation::validate_positive(
                self.conductivity.eval(tau),
                "conductivity must be positive",
            )?;
        }
        Ok(())
    }

    fn tau(&self, t: f64) -> f64 {
        t - self.t_base
    }

    fn rho_at(&self, t: f64) -> FluidResult<f64> {
        validation::validate_positive(self.density.eval(self.tau(t)), "density")
    }

    fn u_at(&self, t: f64) -> f64 {
        let c_int = self.specific_heat.integral();
        c_int.eval(self.tau(t)) - c_int.eval(self.tau(self.t_ref))
    }

    fn s_at(&self, t: f64) -> f64 {
        self.specific_heat
            .rebase(self.t_base)
            .integral_over_x(self.t_ref, t)
    }
}

impl Correlation for IncompressibleFluid {
    fn name(&self) -> &str {
        &self.name
    }

    fn component_names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn molar_masses(&self) -> Vec<f64> {
        vec![self.molar_mass]
    }

    fn envelope(&self, _x: &[f64]) -> Envelope {
        self.envelope
    }

    fn density(&self, t: f64, p: f64, _x: &[f64]) -> FluidResult<f64> {
        self.envelope.check(t, p)?;
        self.rho_at(t)
    }

    fn specific_heat(&self, t: f64, p: f64, _x: &[f64]) -> FluidResult<f64> {
        self.envelope.check(t, p)?;
        validation::validate_positive(self.specific_heat.eval(self.tau(t)), "specific heat")
    }

    fn internal_energy(&self, t: f64, p: f64, _x: &[f64]) -> FluidResult<f64> {
        self.envelope.check(t, p)?;
        validation::validate_finite(self.u_at(t), "internal energy")
    }

    fn enthalpy(&self, t: f64, p: f64, _x: &[f64]) -> FluidResult<f64> {
        self.envelope.check(t, p)?;
        let rho = self.rho_at(t)?;
        validation::validate_finite(self.u_at(t) + (p - self.p_ref) / rho, "enthalpy")
    }

    fn entropy(&self, t: f64, p: f64, _x: &[f64]) -> FluidResult<f64> {
        self.envelope.check(t, p)?;
        validation::validate_finite(self.s_at(t), "entropy")
    }

    fn viscosity(&self, t: f64, p: f64, _x: &[f64]) -> FluidResult<f64> {
        self.envelope.check(t, p)?;
        validation::validate_positive(self.viscosity.eval(self.tau(t)).exp(), "viscosity")
    }

    fn conductivity(&self, t: f64, p: f64, _x: &[f64]) -> FluidResult<f64> {
        self.envelope.check(t, p)?;
        validation::validate_positive(self.conductivity.eval(self.tau(t)), "conductivity")
    }
}
