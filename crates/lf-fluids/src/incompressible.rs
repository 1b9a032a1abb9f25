//! Incompressible liquid backend.
//!
//! Resolves `(T, P)` from any supported input pair, then serves derived
//! properties from the correlation at that state, caching each one until the
//! next successful update or composition change.

use crate::backend::{BackendStatus, PropertyBackend};
use crate::cache::{CacheStatus, DerivedProperty, StateCache};
use crate::catalog;
use crate::composition::Composition;
use crate::correlation::Correlation;
use crate::error::{FluidError, FluidResult};
use crate::flash::{FlashConfig, FlashSolver};
use crate::mixture::LiquidMixture;
use crate::state::{InputPair, SpecEnthalpy, SpecEntropy, SpecHeatCapacity, SpecInternalEnergy, ThermoState};
use lf_core::numeric::ensure_finite;
use lf_core::units::{Density, DynVisc, Pressure, Temperature, ThermCond, k, kg_m3, pa, pa_s, w_mk};
use std::sync::Arc;
use tracing::debug;

type Evaluator = fn(&dyn Correlation, f64, f64, &[f64]) -> FluidResult<f64>;

/// Property backend for incompressible liquids and their ideal mixtures.
///
/// The correlation is shared and immutable; composition, resolved state and
/// cache belong to this instance alone. Cloning yields an independent backend
/// over the same correlation.
#[derive(Debug, Clone)]
pub struct IncompressibleBackend {
    correlation: Arc<dyn Correlation>,
    molar_masses: Vec<f64>,
    composition: Composition,
    cache: StateCache,
    flash_config: FlashConfig,
}

impl IncompressibleBackend {
    /// Backend for one catalog liquid, looked up by name or alias.
    pub fn new(name: &str) -> FluidResult<Self> {
        let fluid: Arc<dyn Correlation> = catalog::lookup(name)?;
        Self::from_correlation(fluid)
    }

    /// Backend for one or more catalog liquids.
    ///
    /// Several names build an ideal mixture whose fractions must be set before
    /// the first update.
    pub fn with_components(names: &[&str]) -> FluidResult<Self> {
        let mut fluids = names
            .iter()
            .map(|name| catalog::lookup(name))
            .collect::<FluidResult<Vec<_>>>()?;

        let correlation: Arc<dyn Correlation> = if fluids.len() > 1 {
            Arc::new(LiquidMixture::new(fluids)?)
        } else {
            fluids.pop().ok_or(FluidError::InvalidArg {
                what: "at least one component name is required",
            })?
        };
        Self::from_correlation(correlation)
    }

    /// Backend over any correlation, e.g. a user-supplied fluid definition.
    pub fn from_correlation(correlation: Arc<dyn Correlation>) -> FluidResult<Self> {
        let names = correlation.component_names();
        let molar_masses = correlation.molar_masses();
        if molar_masses.len() != names.len() {
            return Err(FluidError::InvalidArg {
                what: "correlation must report one molar mass per component",
            });
        }
        let equal = vec![1.0 / names.len().max(1) as f64; names.len()];
        correlation.envelope(&equal).validate()?;

        let composition = match names.as_slice() {
            [name] => Composition::pure(name.clone()),
            _ => Composition::new(names.as_slice())?,
        };

        Ok(Self {
            correlation,
            molar_masses,
            composition,
            cache: StateCache::new(),
            flash_config: FlashConfig::default(),
        })
    }

    /// Replace the flash tolerances used by subsequent updates.
    pub fn with_flash_config(mut self, config: FlashConfig) -> FluidResult<Self> {
        config.validate()?;
        self.flash_config = config;
        Ok(self)
    }

    pub fn flash_config(&self) -> FlashConfig {
        self.flash_config
    }

    pub fn correlation(&self) -> &Arc<dyn Correlation> {
        &self.correlation
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Mole fractions derived from the stored mass fractions.
    pub fn mole_fractions(&self) -> FluidResult<Vec<f64>> {
        self.composition.mole_fractions(&self.molar_masses)
    }

    /// Build the candidate state without touching `self`.
    fn resolve(&self, pair: InputPair, value1: f64, value2: f64) -> FluidResult<ThermoState> {
        let (p, other) = pair.split(value1, value2)?;
        self.check_status()?;
        let x = self.composition.mass_fractions()?;

        let t = match pair.flash_quantity() {
            Some(quantity) => {
                FlashSolver::new(&*self.correlation, x, self.flash_config)
                    .solve(quantity, other, p)?
                    .temperature
            }
            None => {
                let p = ensure_finite(p, "pressure")?;
                let t = ensure_finite(other, "temperature")?;
                self.correlation.envelope(x).check(t, p)?;
                t
            }
        };

        ThermoState::from_pt(pa(p), k(t), self.composition.clone())
    }

    fn derived(&self, property: DerivedProperty, eval: Evaluator) -> FluidResult<f64> {
        let correlation = &*self.correlation;
        self.cache.get_or_compute(property, |state| {
            let x = state.composition().mass_fractions()?;
            eval(
                correlation,
                state.temperature().value,
                state.pressure().value,
                x,
            )
        })
    }
}

impl PropertyBackend for IncompressibleBackend {
    fn backend_name(&self) -> &str {
        "INCOMP"
    }

    fn fluid_names(&self) -> &[String] {
        self.composition.names()
    }

    fn using_mole_fractions(&self) -> bool {
        false
    }

    fn set_mass_fractions(&mut self, fractions: &[f64]) -> FluidResult<()> {
        self.composition.set_mass_fractions(fractions)?;
        self.cache.invalidate();
        debug!(fluid = self.correlation.name(), ?fractions, "mass fractions set");
        Ok(())
    }

    fn set_mole_fractions(&mut self, fractions: &[f64]) -> FluidResult<()> {
        self.composition
            .set_mole_fractions(fractions, &self.molar_masses)?;
        self.cache.invalidate();
        debug!(fluid = self.correlation.name(), ?fractions, "mole fractions set");
        Ok(())
    }

    fn check_status(&self) -> FluidResult<()> {
        self.composition.check_status()
    }

    fn status(&self) -> BackendStatus {
        match self.cache.status() {
            CacheStatus::Resolved => BackendStatus::Resolved,
            CacheStatus::Unresolved if self.composition.is_set() => BackendStatus::CompositionSet,
            CacheStatus::Unresolved => BackendStatus::Uninitialized,
        }
    }

    fn update(&mut self, pair: InputPair, value1: f64, value2: f64) -> FluidResult<()> {
        match self.resolve(pair, value1, value2) {
            Ok(state) => {
                debug!(
                    fluid = self.correlation.name(),
                    %pair,
                    temperature = state.temperature().value,
                    pressure = state.pressure().value,
                    "state resolved"
                );
                self.cache.commit(state);
                Ok(())
            }
            Err(err) => {
                debug!(
                    fluid = self.correlation.name(),
                    %pair,
                    value1,
                    value2,
                    error = %err,
                    "update rejected, previous state kept"
                );
                Err(err)
            }
        }
    }

    fn temperature(&self) -> FluidResult<Temperature> {
        Ok(self.cache.state()?.temperature())
    }

    fn pressure(&self) -> FluidResult<Pressure> {
        Ok(self.cache.state()?.pressure())
    }

    fn rhomass(&self) -> FluidResult<Density> {
        self.derived(DerivedProperty::Density, |c, t, p, x| c.density(t, p, x))
            .map(kg_m3)
    }

    fn hmass(&self) -> FluidResult<SpecEnthalpy> {
        self.derived(DerivedProperty::Enthalpy, |c, t, p, x| c.enthalpy(t, p, x))
    }

    fn smass(&self) -> FluidResult<SpecEntropy> {
        self.derived(DerivedProperty::Entropy, |c, t, p, x| c.entropy(t, p, x))
    }

    fn umass(&self) -> FluidResult<SpecInternalEnergy> {
        self.derived(DerivedProperty::InternalEnergy, |c, t, p, x| {
            c.internal_energy(t, p, x)
        })
    }

    fn cpmass(&self) -> FluidResult<SpecHeatCapacity> {
        self.derived(DerivedProperty::SpecificHeat, |c, t, p, x| {
            c.specific_heat(t, p, x)
        })
    }

    fn cvmass(&self) -> FluidResult<SpecHeatCapacity> {
        self.cpmass()
    }

    fn calc_viscosity(&self) -> FluidResult<DynVisc> {
        self.derived(DerivedProperty::Viscosity, |c, t, p, x| c.viscosity(t, p, x))
            .map(pa_s)
    }

    fn calc_conductivity(&self) -> FluidResult<ThermCond> {
        self.derived(DerivedProperty::Conductivity, |c, t, p, x| {
            c.conductivity(t, p, x)
        })
        .map(w_mk)
    }
}
