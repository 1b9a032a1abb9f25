//! Input pairs and thermodynamic state definitions.

use crate::composition::Composition;
use crate::error::{FluidError, FluidResult};
use crate::flash::FlashQuantity;
use lf_core::units::{Pressure, Temperature};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)].
pub type SpecEntropy = f64;

/// Specific internal energy [J/kg].
pub type SpecInternalEnergy = f64;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Which two quantities an update supplies, in value order.
///
/// Pairs follow the `value1, value2` order of the classic property-library
/// input enumeration: `DmassP(ρ, P)`, `HmassP(h, P)`, `PSmass(P, s)`,
/// `PUmass(P, u)`, `PT(P, T)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputPair {
    DmassP,
    HmassP,
    PSmass,
    PUmass,
    PT,
    DmassT,
    HmassT,
    SmassT,
}

impl InputPair {
    pub const ALL: [InputPair; 8] = [
        InputPair::DmassP,
        InputPair::HmassP,
        InputPair::PSmass,
        InputPair::PUmass,
        InputPair::PT,
        InputPair::DmassT,
        InputPair::HmassT,
        InputPair::SmassT,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::DmassP => "rho-P",
            Self::HmassP => "h-P",
            Self::PSmass => "P-s",
            Self::PUmass => "P-u",
            Self::PT => "P-T",
            Self::DmassT => "rho-T",
            Self::HmassT => "h-T",
            Self::SmassT => "s-T",
        }
    }

    pub fn first_label(self) -> &'static str {
        match self {
            Self::DmassP | Self::DmassT => "Density [kg/m^3]",
            Self::HmassP | Self::HmassT => "Enthalpy [J/kg]",
            Self::PSmass | Self::PUmass | Self::PT => "Pressure [Pa]",
            Self::SmassT => "Entropy [J/(kg K)]",
        }
    }

    pub fn second_label(self) -> &'static str {
        match self {
            Self::DmassP | Self::HmassP => "Pressure [Pa]",
            Self::PSmass => "Entropy [J/(kg K)]",
            Self::PUmass => "Internal energy [J/kg]",
            Self::PT | Self::DmassT | Self::HmassT | Self::SmassT => "Temperature [K]",
        }
    }

    /// Name in the `*_INPUTS` convention, e.g. `"DmassP_INPUTS"`.
    pub fn input_name(self) -> &'static str {
        match self {
            Self::DmassP => "DmassP_INPUTS",
            Self::HmassP => "HmassP_INPUTS",
            Self::PSmass => "PSmass_INPUTS",
            Self::PUmass => "PUmass_INPUTS",
            Self::PT => "PT_INPUTS",
            Self::DmassT => "DmassT_INPUTS",
            Self::HmassT => "HmassT_INPUTS",
            Self::SmassT => "SmassT_INPUTS",
        }
    }

    /// True if pressure is one of the two inputs.
    pub fn has_pressure(self) -> bool {
        matches!(
            self,
            Self::DmassP | Self::HmassP | Self::PSmass | Self::PUmass | Self::PT
        )
    }

    /// Property that must be inverted for temperature, if any.
    pub fn flash_quantity(self) -> Option<FlashQuantity> {
        match self {
            Self::DmassP => Some(FlashQuantity::Density),
            Self::HmassP => Some(FlashQuantity::Enthalpy),
            Self::PSmass => Some(FlashQuantity::Entropy),
            Self::PUmass => Some(FlashQuantity::InternalEnergy),
            _ => None,
        }
    }

    /// Split `(value1, value2)` into `(pressure, other)`.
    pub fn split(self, value1: f64, value2: f64) -> FluidResult<(f64, f64)> {
        match self {
            Self::DmassP | Self::HmassP => Ok((value2, value1)),
            Self::PSmass | Self::PUmass | Self::PT => Ok((value1, value2)),
            _ => Err(self.unsupported()),
        }
    }

    /// Inverse of [`InputPair::split`]: order `(pressure, other)` as `(value1, value2)`.
    pub fn join(self, pressure: f64, other: f64) -> FluidResult<(f64, f64)> {
        match self {
            Self::DmassP | Self::HmassP => Ok((other, pressure)),
            Self::PSmass | Self::PUmass | Self::PT => Ok((pressure, other)),
            _ => Err(self.unsupported()),
        }
    }

    pub(crate) fn unsupported(self) -> FluidError {
        FluidError::NotSupported {
            what: format!(
                "{} cannot recover pressure for an incompressible fluid",
                self.input_name()
            ),
        }
    }
}

impl fmt::Display for InputPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_name())
    }
}

impl FromStr for InputPair {
    type Err = FluidError;

    /// Accepts `"HmassP_INPUTS"`, `"HmassP"`, or the short label `"h-P"`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        InputPair::ALL
            .into_iter()
            .find(|pair| {
                let name = pair.input_name();
                let short = name.trim_end_matches("_INPUTS");
                s.eq_ignore_ascii_case(name)
                    || s.eq_ignore_ascii_case(short)
                    || s.eq_ignore_ascii_case(pair.label())
            })
            .ok_or_else(|| FluidError::NotSupported {
                what: format!("unknown input pair '{s}'"),
            })
    }
}

/// Thermodynamic state: pressure, temperature, and composition.
///
/// Derived properties (density, enthalpy, etc.) are computed on demand
/// from the correlation and cached by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoState {
    p: Pressure,
    t: Temperature,
    comp: Composition,
}

impl ThermoState {
    /// Create a state from pressure, temperature, and composition.
    ///
    /// Validates that pressure is non-negative, temperature positive, both finite,
    /// and that the composition is set.
    pub fn from_pt(p: Pressure, t: Temperature, comp: Composition) -> FluidResult<Self> {
        let p_val = p.value;
        if !p_val.is_finite() || p_val < 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be non-negative and finite",
            });
        }

        let t_val = t.value;
        if !t_val.is_finite() || t_val <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }

        comp.check_status()?;
        Ok(Self { p, t, comp })
    }

    /// Get pressure.
    pub fn pressure(&self) -> Pressure {
        self.p
    }

    /// Get temperature.
    pub fn temperature(&self) -> Temperature {
        self.t
    }

    /// Get composition.
    pub fn composition(&self) -> &Composition {
        &self.comp
    }
}
