// lf-core/src/units.rs

use uom::si::f64::{
    DynamicViscosity as UomDynamicViscosity, MassDensity as UomMassDensity,
    Pressure as UomPressure, ThermalConductivity as UomThermalConductivity,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type DynVisc = UomDynamicViscosity;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type ThermCond = UomThermalConductivity;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kg_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn pa_s(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn w_mk(v: f64) -> ThermCond {
    use uom::si::thermal_conductivity::watt_per_meter_kelvin;
    ThermCond::new::<watt_per_meter_kelvin>(v)
}

pub mod constants {
    /// Standard atmosphere [Pa]
    pub const P_ATM_PA: f64 = 101_325.0;

    /// Ice point [K]
    pub const T_ICE_K: f64 = 273.15;

    /// Common reference temperature for enthalpy/entropy offsets [K]
    pub const T_REF_K: f64 = 298.15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _rho = kg_m3(998.0);
        let _mu = pa_s(1.0e-3);
        let _k = w_mk(0.6);
    }

    #[test]
    fn constructors_store_si_values() {
        assert_eq!(pa(constants::P_ATM_PA).value, 101_325.0);
        assert_eq!(k(constants::T_REF_K).value, 298.15);
        assert_eq!(kg_m3(998.0).value, 998.0);
        assert_eq!(pa_s(1.0e-3).value, 1.0e-3);
        assert_eq!(w_mk(0.6).value, 0.6);
    }
}
