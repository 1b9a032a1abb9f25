//! Ideal mixtures of pure incompressible liquids.
//!
//! Mixing rules, with mass fractions `wᵢ` and mole fractions `xᵢ`:
//!
//! - volume additivity: `1/ρ = Σ wᵢ/ρᵢ`
//! - `c`, `u`, `h`, `s` are mass-weighted sums (no excess terms)
//! - viscosity: `ln μ = Σ xᵢ ln μᵢ`
//! - conductivity: `k = Σ wᵢ kᵢ`
//!
//! The valid envelope is the overlap of all component envelopes.

use crate::composition::mass_to_mole;
use crate::correlation::{Correlation, Envelope, validation};
use crate::error::{FluidError, FluidResult};
use crate::liquid::IncompressibleFluid;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LiquidMixture {
    name: String,
    components: Vec<Arc<IncompressibleFluid>>,
    envelope: Envelope,
}

impl LiquidMixture {
    /// Combine pure liquids into an ideal mixture.
    ///
    /// Fails if no components are given or their envelopes do not overlap.
    pub fn new(components: Vec<Arc<IncompressibleFluid>>) -> FluidResult<Self> {
        let Some(first) = components.first() else {
            return Err(FluidError::InvalidArg {
                what: "mixture needs at least one component",
            });
        };

        let mut envelope = first.envelope;
        for fluid in &components[1..] {
            envelope = envelope
                .intersect(&fluid.envelope)
                .ok_or_else(|| FluidError::NotSupported {
                    what: format!(
                        "no common (T, P) range for {} and {}",
                        first.name, fluid.name
                    ),
                })?;
        }

        let name = components
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join("&");

        Ok(Self {
            name,
            components,
            envelope,
        })
    }

    pub fn components(&self) -> &[Arc<IncompressibleFluid>] {
        &self.components
    }

    fn check(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<()> {
        if x.len() != self.components.len() {
            return Err(FluidError::InvalidArg {
                what: "mass fraction count must match mixture components",
            });
        }
        self.envelope.check(t, p)
    }

    /// Mass-weighted sum of a per-component property.
    fn weighted<F>(&self, x: &[f64], mut f: F) -> FluidResult<f64>
    where
        F: FnMut(&IncompressibleFluid) -> FluidResult<f64>,
    {
        let mut sum = 0.0;
        for (fluid, w) in self.components.iter().zip(x) {
            if *w > 0.0 {
                sum += w * f(fluid)?;
            }
        }
        Ok(sum)
    }
}

impl Correlation for LiquidMixture {
    fn name(&self) -> &str {
        &self.name
    }

    fn component_names(&self) -> Vec<String> {
        self.components.iter().map(|c| c.name.clone()).collect()
    }

    fn molar_masses(&self) -> Vec<f64> {
        self.components.iter().map(|c| c.molar_mass).collect()
    }

    fn envelope(&self, _x: &[f64]) -> Envelope {
        self.envelope
    }

    fn density(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64> {
        self.check(t, p, x)?;
        let specific_volume = self.weighted(x, |c| Ok(1.0 / c.density(t, p, &[1.0])?))?;
        validation::validate_positive(1.0 / specific_volume, "mixture density")
    }

    fn specific_heat(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64> {
        self.check(t, p, x)?;
        let cp = self.weighted(x, |c| c.specific_heat(t, p, &[1.0]))?;
        validation::validate_positive(cp, "mixture specific heat")
    }

    fn internal_energy(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64> {
        self.check(t, p, x)?;
        self.weighted(x, |c| c.internal_energy(t, p, &[1.0]))
    }

    fn enthalpy(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64> {
        self.check(t, p, x)?;
        self.weighted(x, |c| c.enthalpy(t, p, &[1.0]))
    }

    fn entropy(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64> {
        self.check(t, p, x)?;
        self.weighted(x, |c| c.entropy(t, p, &[1.0]))
    }

    fn viscosity(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64> {
        self.check(t, p, x)?;
        let mole = mass_to_mole(x, &self.molar_masses());
        let mut ln_mu = 0.0;
        for (fluid, xi) in self.components.iter().zip(&mole) {
            if *xi > 0.0 {
                ln_mu += xi * fluid.viscosity(t, p, &[1.0])?.ln();
            }
        }
        validation::validate_positive(ln_mu.exp(), "mixture viscosity")
    }

    fn conductivity(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64> {
        self.check(t, p, x)?;
        let k = self.weighted(x, |c| c.conductivity(t, p, &[1.0]))?;
        validation::validate_positive(k, "mixture conductivity")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::Polynomial;
    use lf_core::numeric::{Tolerances, nearly_equal};

    const P: f64 = 101_325.0;
    const TOL: Tolerances = Tolerances {
        abs: 1e-9,
        rel: 1e-10,
    };

    fn liquid(name: &str, rho: f64, cp: f64, ln_mu: f64, k: f64, m: f64) -> Arc<IncompressibleFluid> {
        Arc::new(IncompressibleFluid {
            name: name.into(),
            description: String::new(),
            molar_mass: m,
            envelope: Envelope::new(260.0, 380.0, 1.0e3, 1.0e7),
            t_base: 300.0,
            t_ref: 300.0,
            p_ref: P,
            density: Polynomial::new([rho]),
            specific_heat: Polynomial::new([cp]),
            viscosity: Polynomial::new([ln_mu]),
            conductivity: Polynomial::new([k]),
        })
    }

    fn binary() -> LiquidMixture {
        LiquidMixture::new(vec![
            liquid("A", 1000.0, 4000.0, -7.0, 0.6, 0.02),
            liquid("B", 800.0, 2000.0, -5.0, 0.2, 0.06),
        ])
        .unwrap()
    }

    #[test]
    fn name_joins_components() {
        let mix = binary();
        assert_eq!(mix.name(), "A&B");
        assert_eq!(mix.component_names(), vec!["A".to_string(), "B".to_string()]);
        assert_eq!(mix.molar_masses(), vec![0.02, 0.06]);
    }

    #[test]
    fn volume_additive_density() {
        let mix = binary();
        let rho = mix.density(300.0, P, &[0.5, 0.5]).unwrap();
        let expected = 1.0 / (0.5 / 1000.0 + 0.5 / 800.0);
        assert!(nearly_equal(rho, expected, TOL));
    }

    #[test]
    fn mass_weighted_caloric_properties() {
        let mix = binary();
        let x = [0.25, 0.75];
        let cp = mix.specific_heat(300.0, P, &x).unwrap();
        assert!(nearly_equal(cp, 0.25 * 4000.0 + 0.75 * 2000.0, TOL));

        let u = mix.internal_energy(320.0, P, &x).unwrap();
        assert!(nearly_equal(u, cp * 20.0, TOL));
    }

    #[test]
    fn mole_weighted_log_viscosity() {
        let mix = binary();
        // Equal masses: moles in ratio 1/0.02 : 1/0.06 = 3 : 1
        let mu = mix.viscosity(300.0, P, &[0.5, 0.5]).unwrap();
        let expected = (0.75 * -7.0 + 0.25 * -5.0_f64).exp();
        assert!(nearly_equal(mu, expected, TOL));
    }

    #[test]
    fn pure_limit_matches_component() {
        let mix = binary();
        let a = &mix.components()[0];
        let x = [1.0, 0.0];
        assert!(nearly_equal(
            mix.density(310.0, P, &x).unwrap(),
            a.density(310.0, P, &[1.0]).unwrap(),
            TOL
        ));
        assert!(nearly_equal(
            mix.viscosity(310.0, P, &x).unwrap(),
            a.viscosity(310.0, P, &[1.0]).unwrap(),
            TOL
        ));
    }

    #[test]
    fn fraction_count_must_match() {
        let mix = binary();
        assert!(matches!(
            mix.density(300.0, P, &[1.0]),
            Err(FluidError::InvalidArg { .. })
        ));
    }

    #[test]
    fn envelope_is_overlap() {
        let mut hot = (*liquid("Hot", 900.0, 2000.0, -6.0, 0.1, 0.1)).clone();
        hot.envelope = Envelope::new(300.0, 500.0, 1.0e3, 1.0e7);
        let mix = LiquidMixture::new(vec![liquid("A", 1000.0, 4000.0, -7.0, 0.6, 0.02), Arc::new(hot)])
            .unwrap();
        let env = mix.envelope(&[0.5, 0.5]);
        assert_eq!(env.t_min, 300.0);
        assert_eq!(env.t_max, 380.0);
    }

    #[test]
    fn disjoint_envelopes_rejected() {
        let mut hot = (*liquid("Hot", 900.0, 2000.0, -6.0, 0.1, 0.1)).clone();
        hot.envelope = Envelope::new(400.0, 500.0, 1.0e3, 1.0e7);
        let result = LiquidMixture::new(vec![liquid("A", 1000.0, 4000.0, -7.0, 0.6, 0.02), Arc::new(hot)]);
        assert!(matches!(result, Err(FluidError::NotSupported { .. })));
    }

    #[test]
    fn empty_mixture_rejected() {
        assert!(LiquidMixture::new(Vec::new()).is_err());
    }
}
