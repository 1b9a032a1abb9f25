//! Built-in incompressible liquids.
//!
//! Coefficient sets are built once, on first lookup, and shared by `Arc` for the
//! rest of the process. The registry is never mutated after initialization.

use crate::correlation::Envelope;
use crate::error::{FluidError, FluidResult};
use crate::liquid::IncompressibleFluid;
use crate::polynomial::Polynomial;
use lf_core::units::constants::{P_ATM_PA, T_ICE_K, T_REF_K};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

const P_MIN_PA: f64 = 1.0e3;
const P_MAX_PA: f64 = 1.0e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub canonical_id: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
}

impl CatalogEntry {
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.canonical_id.to_ascii_lowercase().contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }

    /// Exact, case-insensitive match on id or alias.
    pub fn is_named(&self, name: &str) -> bool {
        let name = name.trim();
        self.canonical_id.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

const CATALOG: [CatalogEntry; 4] = [
    CatalogEntry {
        canonical_id: "Water",
        display_name: "Liquid water",
        aliases: &["h2o"],
    },
    CatalogEntry {
        canonical_id: "EthyleneGlycol",
        display_name: "Ethylene glycol",
        aliases: &["meg", "monoethylene glycol"],
    },
    CatalogEntry {
        canonical_id: "PropyleneGlycol",
        display_name: "Propylene glycol",
        aliases: &["mpg", "1,2-propanediol"],
    },
    CatalogEntry {
        canonical_id: "Ethanol",
        display_name: "Ethanol",
        aliases: &["etoh", "ethyl alcohol"],
    },
];

pub fn catalog() -> &'static [CatalogEntry] {
    &CATALOG
}

pub fn filter_catalog(query: &str) -> Vec<CatalogEntry> {
    CATALOG
        .iter()
        .copied()
        .filter(|entry| entry.matches_query(query))
        .collect()
}

/// Resolve a name or alias to its catalog entry.
pub fn find_entry(name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.is_named(name))
}

/// Look up a built-in liquid by name or alias.
pub fn lookup(name: &str) -> FluidResult<Arc<IncompressibleFluid>> {
    let entry = find_entry(name).ok_or_else(|| FluidError::UnknownFluid {
        name: name.to_string(),
    })?;
    registry()
        .get(entry.canonical_id)
        .cloned()
        .ok_or_else(|| FluidError::UnknownFluid {
            name: name.to_string(),
        })
}

fn registry() -> &'static HashMap<&'static str, Arc<IncompressibleFluid>> {
    static REGISTRY: OnceLock<HashMap<&'static str, Arc<IncompressibleFluid>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        [water(), ethylene_glycol(), propylene_glycol(), ethanol()]
            .into_iter()
            .filter_map(|fluid| {
                let entry = find_entry(&fluid.name)?;
                Some((entry.canonical_id, Arc::new(fluid)))
            })
            .collect()
    })
}

fn liquid(
    name: &str,
    description: &str,
    molar_mass: f64,
    t_range: (f64, f64),
    t_base: f64,
    fits: [&[f64]; 4],
) -> IncompressibleFluid {
    let [density, specific_heat, viscosity, conductivity] = fits;
    IncompressibleFluid {
        name: name.to_string(),
        description: description.to_string(),
        molar_mass,
        envelope: Envelope::new(t_range.0, t_range.1, P_MIN_PA, P_MAX_PA),
        t_base,
        t_ref: T_REF_K,
        p_ref: P_ATM_PA,
        density: Polynomial::new(density),
        specific_heat: Polynomial::new(specific_heat),
        viscosity: Polynomial::new(viscosity),
        conductivity: Polynomial::new(conductivity),
    }
}

fn water() -> IncompressibleFluid {
    liquid(
        "Water",
        "Liquid water between the ice and normal boiling points",
        0.018_015,
        (T_ICE_K, 373.15),
        323.15,
        [
            &[988.0, -0.46, -0.0028],
            &[4181.0, 0.0, 0.0143],
            &[-7.511, -0.018_49, 1.046e-4],
            &[0.644, 0.001_18, -9.6e-6],
        ],
    )
}

fn ethylene_glycol() -> IncompressibleFluid {
    liquid(
        "EthyleneGlycol",
        "Pure monoethylene glycol",
        0.062_07,
        (260.0, 420.0),
        300.0,
        [
            &[1110.6, -0.75, -0.0005],
            &[2400.0, 4.2],
            &[-4.154, -0.0268, 5.0e-5],
            &[0.252, 1.0e-4],
        ],
    )
}

fn propylene_glycol() -> IncompressibleFluid {
    liquid(
        "PropyleneGlycol",
        "Pure monopropylene glycol",
        0.076_09,
        (250.0, 420.0),
        300.0,
        [
            &[1033.0, -0.78, -0.0006],
            &[2500.0, 4.0],
            &[-3.80, -0.033, 8.0e-5],
            &[0.200, -5.0e-5],
        ],
    )
}

fn ethanol() -> IncompressibleFluid {
    liquid(
        "Ethanol",
        "Liquid ethanol below its normal boiling point",
        0.046_07,
        (200.0, 340.0),
        293.15,
        [
            &[789.3, -0.84, -0.0008],
            &[2440.0, 7.0],
            &[-6.725, -0.0125, 5.0e-5],
            &[0.167, -2.0e-4],
        ],
    )
}
