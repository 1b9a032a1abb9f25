//! Property sweeps at fixed pressure.
//!
//! A sweep varies the non-pressure input of a pair across a range and records
//! the full property pack at every point. Each point runs on its own backend
//! clone, so a failing point never disturbs the others and the parallel
//! executor needs no synchronization beyond the shared correlation.

use crate::backend::{PropertyBackend, PropertyPack};
use crate::error::{FluidError, FluidResult};
use crate::state::InputPair;
use lf_core::numeric::linspace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepType {
    /// Uniformly spaced points
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

impl fmt::Display for SweepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Logarithmic => write!(f, "Logarithmic"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("All {failed} sweep points failed; first error: {first}")]
    AllPointsFailed { failed: usize, first: FluidError },
}

/// Range of one sweep variable in SI units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    pub sweep_type: SweepType,
}

impl SweepDefinition {
    pub fn new(
        start: f64,
        end: f64,
        num_points: usize,
        sweep_type: SweepType,
    ) -> Result<Self, SweepError> {
        let sweep = Self {
            start,
            end,
            num_points,
            sweep_type,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(SweepError::InvalidConfiguration(
                "sweep bounds must be finite".to_string(),
            ));
        }
        if self.num_points < 2 {
            return Err(SweepError::InvalidConfiguration(
                "sweep must have at least 2 points".to_string(),
            ));
        }
        if (self.start - self.end).abs() < 1e-12 {
            return Err(SweepError::InvalidConfiguration(
                "start and end values must be different".to_string(),
            ));
        }
        if self.sweep_type == SweepType::Logarithmic && (self.start <= 0.0 || self.end <= 0.0) {
            return Err(SweepError::InvalidConfiguration(format!(
                "logarithmic sweep needs positive bounds, got {} to {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Generate all points in the sweep. Both endpoints are exact.
    pub fn generate_points(&self) -> Vec<f64> {
        match self.sweep_type {
            SweepType::Linear => linspace(self.start, self.end, self.num_points),
            SweepType::Logarithmic => {
                let mut points: Vec<f64> = linspace(self.start.ln(), self.end.ln(), self.num_points)
                    .into_iter()
                    .map(f64::exp)
                    .collect();
                if let Some(first) = points.first_mut() {
                    *first = self.start;
                }
                if let Some(last) = points.last_mut() {
                    *last = self.end;
                }
                points
            }
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep from {} to {} ({} points, {})",
            self.start, self.end, self.num_points, self.sweep_type
        )
    }
}

/// Result of a property sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    /// Input pair used for every point
    pub input_pair: InputPair,
    /// Pressure held fixed [Pa]
    pub pressure: f64,
    /// Swept values of the non-pressure input
    pub independent_values: Vec<f64>,
    /// Property pack per point (`None` where the update failed)
    pub rows: Vec<Option<PropertyPack>>,
    pub num_successful: usize,
    pub num_failed: usize,
}

impl SweepResult {
    /// Axis label of the swept (non-pressure) input.
    pub fn independent_label(&self) -> &'static str {
        match self.input_pair {
            InputPair::DmassP | InputPair::HmassP => self.input_pair.first_label(),
            _ => self.input_pair.second_label(),
        }
    }

    fn column(&self, f: impl Fn(&PropertyPack) -> f64) -> Vec<f64> {
        self.rows.iter().flatten().map(f).collect()
    }

    /// Get temperature array (excluding failed points)
    pub fn temperature_k(&self) -> Vec<f64> {
        self.column(|row| row.t.value)
    }

    /// Get density array (excluding failed points)
    pub fn density_kg_m3(&self) -> Vec<f64> {
        self.column(|row| row.rho.value)
    }

    pub fn enthalpy_j_per_kg(&self) -> Vec<f64> {
        self.column(|row| row.h)
    }

    pub fn entropy_j_per_kg_k(&self) -> Vec<f64> {
        self.column(|row| row.s)
    }

    pub fn viscosity_pa_s(&self) -> Vec<f64> {
        self.column(|row| row.mu.value)
    }

    pub fn conductivity_w_mk(&self) -> Vec<f64> {
        self.column(|row| row.k.value)
    }

    /// Get independent values corresponding to successful rows
    pub fn successful_independent_values(&self) -> Vec<f64> {
        self.independent_values
            .iter()
            .zip(&self.rows)
            .filter_map(|(value, row)| row.as_ref().map(|_| *value))
            .collect()
    }
}

/// Sweep the non-pressure input of `pair` at fixed `pressure`, one point at a time.
///
/// `template` supplies the correlation, composition and flash settings; it is
/// cloned, never updated.
pub fn execute_sweep<B>(
    template: &B,
    pair: InputPair,
    pressure: f64,
    sweep: &SweepDefinition,
) -> Result<SweepResult, SweepError>
where
    B: PropertyBackend + Clone,
{
    check_inputs(pair, sweep)?;
    let points = sweep.generate_points();
    let outcomes = points
        .iter()
        .map(|&value| evaluate_point(template.clone(), pair, pressure, value))
        .collect();
    collect_result(pair, pressure, points, outcomes)
}

/// Parallel [`execute_sweep`] on the rayon global pool.
///
/// Backends are cloned up front on the calling thread, then each clone moves
/// to a worker, so `B` only needs to be `Send`.
pub fn par_execute_sweep<B>(
    template: &B,
    pair: InputPair,
    pressure: f64,
    sweep: &SweepDefinition,
) -> Result<SweepResult, SweepError>
where
    B: PropertyBackend + Clone + Send,
{
    check_inputs(pair, sweep)?;
    let points = sweep.generate_points();
    let jobs: Vec<(f64, B)> = points
        .iter()
        .map(|&value| (value, template.clone()))
        .collect();
    let outcomes = jobs
        .into_par_iter()
        .map(|(value, backend)| evaluate_point(backend, pair, pressure, value))
        .collect();
    collect_result(pair, pressure, points, outcomes)
}

fn check_inputs(pair: InputPair, sweep: &SweepDefinition) -> Result<(), SweepError> {
    sweep.validate()?;
    if !pair.has_pressure() {
        return Err(SweepError::InvalidConfiguration(format!(
            "{pair} does not include pressure"
        )));
    }
    Ok(())
}

fn evaluate_point<B: PropertyBackend>(
    mut backend: B,
    pair: InputPair,
    pressure: f64,
    value: f64,
) -> FluidResult<PropertyPack> {
    let (value1, value2) = pair.join(pressure, value)?;
    backend.update(pair, value1, value2)?;
    backend.property_pack()
}

fn collect_result(
    input_pair: InputPair,
    pressure: f64,
    independent_values: Vec<f64>,
    outcomes: Vec<FluidResult<PropertyPack>>,
) -> Result<SweepResult, SweepError> {
    let mut rows = Vec::with_capacity(outcomes.len());
    let mut first_error = None;
    for outcome in outcomes {
        match outcome {
            Ok(pack) => rows.push(Some(pack)),
            Err(err) => {
                first_error.get_or_insert(err);
                rows.push(None);
            }
        }
    }

    let num_successful = rows.iter().filter(|row| row.is_some()).count();
    let num_failed = rows.len() - num_successful;
    debug!(%input_pair, pressure, num_successful, num_failed, "sweep finished");

    if num_successful == 0
        && let Some(first) = first_error
    {
        return Err(SweepError::AllPointsFailed {
            failed: num_failed,
            first,
        });
    }

    Ok(SweepResult {
        input_pair,
        pressure,
        independent_values,
        rows,
        num_successful,
        num_failed,
    })
}
