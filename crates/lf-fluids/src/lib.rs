//! lf-fluids: incompressible liquid properties for liquiflash.
//!
//! Provides:
//! - Composition handling (pure liquids and mass-fraction mixtures)
//! - Polynomial liquid correlations and ideal mixing rules
//! - A read-only catalog of common heat-transfer liquids
//! - Flash solvers recovering temperature from (ρ, P), (h, P), (P, s), (P, u)
//! - `PropertyBackend` contract with the `IncompressibleBackend` implementation
//! - Fixed-pressure property sweeps (sequential and rayon-parallel)
//!
//! # Architecture
//!
//! A backend instance owns its composition, resolved state and derived-property
//! cache. The correlation behind it is immutable and shared by `Arc`, so
//! independent backends may evaluate the same fluid from different threads.
//! Updates are atomic: a failed update leaves the previous state in place.
//!
//! # Example
//!
//! ```no_run
//! use lf_fluids::{IncompressibleBackend, InputPair, PropertyBackend};
//!
//! let mut backend = IncompressibleBackend::with_components(&["Water", "EthyleneGlycol"]).unwrap();
//! backend.set_mass_fractions(&[0.7, 0.3]).unwrap();
//! backend.update(InputPair::PT, 101_325.0, 300.0).unwrap();
//! let h = backend.hmass().unwrap();
//!
//! backend.update(InputPair::HmassP, h + 5_000.0, 101_325.0).unwrap();
//! println!("T = {} K", backend.temperature().unwrap().value);
//! println!("mu = {} Pa·s", backend.calc_viscosity().unwrap().value);
//! ```

pub mod backend;
pub mod cache;
pub mod catalog;
pub mod composition;
pub mod correlation;
pub mod error;
pub mod flash;
pub mod incompressible;
pub mod liquid;
pub mod mixture;
pub mod polynomial;
pub mod state;
pub mod sweep;

// Re-exports for ergonomics
pub use backend::{BackendStatus, PropertyBackend, PropertyPack};
pub use cache::{CacheStatus, DerivedProperty, StateCache};
pub use catalog::{CatalogEntry, catalog, filter_catalog, lookup};
pub use composition::Composition;
pub use correlation::{Correlation, Envelope};
pub use error::{FluidError, FluidResult};
pub use flash::{FlashConfig, FlashQuantity, FlashSolution, FlashSolver};
pub use incompressible::IncompressibleBackend;
pub use liquid::IncompressibleFluid;
pub use mixture::LiquidMixture;
pub use polynomial::Polynomial;
pub use state::{
    InputPair, SpecEnthalpy, SpecEntropy, SpecHeatCapacity, SpecInternalEnergy, ThermoState,
};
pub use sweep::{
    SweepDefinition, SweepError, SweepResult, SweepType, execute_sweep, par_execute_sweep,
};
