//! Resolved state plus lazily computed derived properties.

use crate::error::{FluidError, FluidResult};
use crate::state::ThermoState;
use std::cell::Cell;
use tracing::trace;

/// Whether the cache holds a valid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Unresolved,
    Resolved,
}

/// Derived properties memoized per resolved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedProperty {
    Density,
    Enthalpy,
    Entropy,
    InternalEnergy,
    SpecificHeat,
    Viscosity,
    Conductivity,
}

impl DerivedProperty {
    const COUNT: usize = 7;

    pub fn label(self) -> &'static str {
        match self {
            Self::Density => "density",
            Self::Enthalpy => "enthalpy",
            Self::Entropy => "entropy",
            Self::InternalEnergy => "internal energy",
            Self::SpecificHeat => "specific heat",
            Self::Viscosity => "viscosity",
            Self::Conductivity => "conductivity",
        }
    }
}

/// Current resolved state of a backend instance.
///
/// The state is replaced wholesale by [`StateCache::commit`]; derived values are
/// computed on first access and dropped whenever the state changes. Interior
/// mutability keeps queries on `&self`, which also makes the cache `!Sync`:
/// one instance belongs to one thread at a time.
#[derive(Debug, Clone, Default)]
pub struct StateCache {
    state: Option<ThermoState>,
    derived: [Cell<Option<f64>>; DerivedProperty::COUNT],
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> CacheStatus {
        if self.state.is_some() {
            CacheStatus::Resolved
        } else {
            CacheStatus::Unresolved
        }
    }

    /// The resolved state, or [`FluidError::NotResolved`].
    pub fn state(&self) -> FluidResult<&ThermoState> {
        self.state.as_ref().ok_or(FluidError::NotResolved {
            what: "no successful update has been made",
        })
    }

    /// Replace the state and drop every cached derived value.
    pub fn commit(&mut self, state: ThermoState) {
        self.state = Some(state);
        self.clear_derived();
    }

    /// Return to the unresolved status.
    pub fn invalidate(&mut self) {
        self.state = None;
        self.clear_derived();
    }

    /// Cached value if present.
    pub fn cached(&self, property: DerivedProperty) -> Option<f64> {
        self.derived[property as usize].get()
    }

    /// Return the cached value, computing and storing it on first access.
    ///
    /// Fails with [`FluidError::NotResolved`] before any commit. A failed
    /// computation is not cached.
    pub fn get_or_compute<F>(&self, property: DerivedProperty, compute: F) -> FluidResult<f64>
    where
        F: FnOnce(&ThermoState) -> FluidResult<f64>,
    {
        let state = self.state()?;
        let slot = &self.derived[property as usize];
        if let Some(value) = slot.get() {
            return Ok(value);
        }
        let value = compute(state)?;
        trace!(property = property.label(), value, "derived property computed");
        slot.set(Some(value));
        Ok(value)
    }

    fn clear_derived(&mut self) {
        for slot in &self.derived {
            slot.set(None);
        }
    }
}
