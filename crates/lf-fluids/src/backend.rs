//! Property backend contract shared by fluid families.

use crate::error::FluidResult;
use crate::state::{InputPair, SpecEnthalpy, SpecEntropy, SpecHeatCapacity, SpecInternalEnergy};
use lf_core::units::{Density, DynVisc, Pressure, Temperature, ThermCond};
use serde::Serialize;

/// Lifecycle of a backend instance.
///
/// `Uninitialized → CompositionSet → Resolved`. A failed update never moves
/// the backend backwards; a composition change drops it to `CompositionSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Uninitialized,
    CompositionSet,
    Resolved,
}

/// Every derived property of one resolved state.
///
/// Used to batch property queries into a single call, e.g. for sweeps and tables.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyPack {
    /// Pressure [Pa]
    pub p: Pressure,

    /// Temperature [K]
    pub t: Temperature,

    /// Density [kg/m³]
    pub rho: Density,

    /// Specific enthalpy [J/kg]
    pub h: SpecEnthalpy,

    /// Specific entropy [J/(kg·K)]
    pub s: SpecEntropy,

    /// Specific internal energy [J/kg]
    pub u: SpecInternalEnergy,

    /// Specific heat capacity [J/(kg·K)]
    pub cp: SpecHeatCapacity,

    /// Dynamic viscosity [Pa·s]
    pub mu: DynVisc,

    /// Thermal conductivity [W/(m·K)]
    pub k: ThermCond,
}

impl PropertyPack {
    /// Return a summary string of all contained properties (for debugging).
    pub fn summary(&self) -> String {
        format!(
            "Pack(P={:.0}Pa,T={:.2}K,ρ={:.2}kg/m³,h={:.1}J/kg,s={:.2}J/kg·K,u={:.1}J/kg,cp={:.1}J/kg·K,μ={:.3e}Pa·s,k={:.4}W/m·K)",
            self.p.value,
            self.t.value,
            self.rho.value,
            self.h,
            self.s,
            self.u,
            self.cp,
            self.mu.value,
            self.k.value
        )
    }
}

/// Capability contract for a property backend.
///
/// Implementations own their resolved state exclusively. Queries fail with
/// [`crate::FluidError::NotResolved`] until an [`PropertyBackend::update`]
/// succeeds, and a failed update leaves the previous state untouched.
pub trait PropertyBackend {
    /// Backend name (for debugging/logging).
    fn backend_name(&self) -> &str;

    /// Component names in composition order.
    fn fluid_names(&self) -> &[String];

    /// Whether mole fractions are the native composition input.
    fn using_mole_fractions(&self) -> bool;

    fn set_mass_fractions(&mut self, fractions: &[f64]) -> FluidResult<()>;

    fn set_mole_fractions(&mut self, fractions: &[f64]) -> FluidResult<()>;

    /// Fail if the composition needed for property evaluation is not set.
    fn check_status(&self) -> FluidResult<()>;

    fn status(&self) -> BackendStatus;

    /// Resolve a new state from two inputs; see [`InputPair`] for value order.
    fn update(&mut self, pair: InputPair, value1: f64, value2: f64) -> FluidResult<()>;

    fn temperature(&self) -> FluidResult<Temperature>;

    fn pressure(&self) -> FluidResult<Pressure>;

    fn rhomass(&self) -> FluidResult<Density>;

    fn hmass(&self) -> FluidResult<SpecEnthalpy>;

    fn smass(&self) -> FluidResult<SpecEntropy>;

    fn umass(&self) -> FluidResult<SpecInternalEnergy>;

    fn cpmass(&self) -> FluidResult<SpecHeatCapacity>;

    fn cvmass(&self) -> FluidResult<SpecHeatCapacity>;

    /// Dynamic viscosity at the resolved state.
    fn calc_viscosity(&self) -> FluidResult<DynVisc>;

    /// Thermal conductivity at the resolved state.
    fn calc_conductivity(&self) -> FluidResult<ThermCond>;

    /// Compute every derived property in one call.
    fn property_pack(&self) -> FluidResult<PropertyPack> {
        Ok(PropertyPack {
            p: self.pressure()?,
            t: self.temperature()?,
            rho: self.rhomass()?,
            h: self.hmass()?,
            s: self.smass()?,
            u: self.umass()?,
            cp: self.cpmass()?,
            mu: self.calc_viscosity()?,
            k: self.calc_conductivity()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_core::units::{k, kg_m3, pa, pa_s, w_mk};

    #[test]
    fn summary_lists_every_property() {
        let pack = PropertyPack {
            p: pa(101_325.0),
            t: k(300.0),
            rho: kg_m3(996.5),
            h: 8_360.0,
            s: 29.0,
            u: 8_360.0,
            cp: 4_180.0,
            mu: pa_s(8.5e-4),
            k: w_mk(0.61),
        };
        let summary = pack.summary();
        for needle in ["P=101325Pa", "T=300.00K", "ρ=996.50", "cp=4180.0", "μ=8.500e-4"] {
            assert!(summary.contains(needle), "{summary} missing {needle}");
        }
    }

    #[test]
    fn pack_serializes_to_json() {
        let pack = PropertyPack {
            p: pa(1.0e5),
            t: k(300.0),
            rho: kg_m3(996.5),
            h: 1.0,
            s: 2.0,
            u: 3.0,
            cp: 4.0,
            mu: pa_s(1.0e-3),
            k: w_mk(0.6),
        };
        let json = serde_json::to_value(&pack).unwrap();
        assert_eq!(json["h"], 1.0);
        assert_eq!(json["cp"], 4.0);
    }
}
