//! Temperature recovery from pressure plus one caloric or volumetric property.
//!
//! All four flashes share one core:
//!
//! 1. Reject non-finite inputs and pressures outside the envelope.
//! 2. Scan the residual `Q(T, P) − target` on a coarse grid spanning the valid
//!    temperature range.
//! 3. Count roots on the grid: sign changes between nonzero neighbours plus
//!    runs of exact zeros. Fail if there are none (target unreachable) or more
//!    than one (non-monotonic correlation). A lone exact zero is returned as is.
//! 4. Refine the single bracket with Brent's method until the residual or the
//!    bracket width meets the configured tolerance.
//!
//! A single root per bracket is assumed. Two roots that fall inside one grid
//! interval are not detected.

use crate::correlation::Correlation;
use crate::error::{FluidError, FluidResult};
use lf_core::numeric::{ensure_finite, linspace};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Flash solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashConfig {
    /// Absolute tolerance on the residual, in units of the target property
    pub abs_tol: f64,
    /// Relative tolerance on temperature
    pub rel_tol: f64,
    /// Maximum root-finder iterations
    pub max_iterations: usize,
    /// Number of intervals in the coarse bracketing scan
    pub scan_intervals: usize,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            abs_tol: 1e-9,
            rel_tol: 1e-12,
            max_iterations: 100,
            scan_intervals: 16,
        }
    }
}

impl FlashConfig {
    /// Validates that tolerances are finite and non-negative and counts are non-zero.
    pub fn validate(&self) -> FluidResult<()> {
        if !self.abs_tol.is_finite() || self.abs_tol < 0.0 {
            return Err(FluidError::InvalidArg {
                what: "abs_tol must be finite and non-negative",
            });
        }
        if !self.rel_tol.is_finite() || self.rel_tol < 0.0 {
            return Err(FluidError::InvalidArg {
                what: "rel_tol must be finite and non-negative",
            });
        }
        if self.max_iterations == 0 {
            return Err(FluidError::InvalidArg {
                what: "max_iterations must be at least 1",
            });
        }
        if self.scan_intervals == 0 {
            return Err(FluidError::InvalidArg {
                what: "scan_intervals must be at least 1",
            });
        }
        Ok(())
    }

    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> FluidResult<Self> {
        let config: FlashConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Property a flash inverts for temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlashQuantity {
    Density,
    Enthalpy,
    Entropy,
    InternalEnergy,
}

impl FlashQuantity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Density => "density",
            Self::Enthalpy => "enthalpy",
            Self::Entropy => "entropy",
            Self::InternalEnergy => "internal energy",
        }
    }

    /// Name of the input pair that routes to this flash.
    pub fn input_label(self) -> &'static str {
        match self {
            Self::Density => "DmassP",
            Self::Enthalpy => "HmassP",
            Self::Entropy => "PSmass",
            Self::InternalEnergy => "PUmass",
        }
    }

    /// Evaluate the forward correlation for this property.
    pub fn evaluate(
        self,
        correlation: &dyn Correlation,
        t: f64,
        p: f64,
        x: &[f64],
    ) -> FluidResult<f64> {
        match self {
            Self::Density => correlation.density(t, p, x),
            Self::Enthalpy => correlation.enthalpy(t, p, x),
            Self::Entropy => correlation.entropy(t, p, x),
            Self::InternalEnergy => correlation.internal_energy(t, p, x),
        }
    }
}

/// Converged flash result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashSolution {
    /// Temperature [K]
    pub temperature: f64,
    /// Root-finder iterations (0 if a scan point hit the target exactly)
    pub iterations: usize,
    /// Final residual, in units of the target property
    pub residual: f64,
}

/// Inverts a correlation for temperature at fixed pressure and composition.
#[derive(Debug, Clone, Copy)]
pub struct FlashSolver<'a> {
    correlation: &'a dyn Correlation,
    x: &'a [f64],
    config: FlashConfig,
}

impl<'a> FlashSolver<'a> {
    pub fn new(correlation: &'a dyn Correlation, x: &'a [f64], config: FlashConfig) -> Self {
        Self {
            correlation,
            x,
            config,
        }
    }

    /// Temperature [K] from mass density [kg/m³] and pressure [Pa].
    pub fn dmass_p(&self, rhomass: f64, p: f64) -> FluidResult<f64> {
        Ok(self.solve(FlashQuantity::Density, rhomass, p)?.temperature)
    }

    /// Temperature [K] from mass enthalpy [J/kg] and pressure [Pa].
    pub fn hmass_p(&self, hmass: f64, p: f64) -> FluidResult<f64> {
        Ok(self.solve(FlashQuantity::Enthalpy, hmass, p)?.temperature)
    }

    /// Temperature [K] from pressure [Pa] and mass entropy [J/(kg·K)].
    pub fn p_smass(&self, p: f64, smass: f64) -> FluidResult<f64> {
        Ok(self.solve(FlashQuantity::Entropy, smass, p)?.temperature)
    }

    /// Temperature [K] from pressure [Pa] and mass internal energy [J/kg].
    pub fn p_umass(&self, p: f64, umass: f64) -> FluidResult<f64> {
        Ok(self.solve(FlashQuantity::InternalEnergy, umass, p)?.temperature)
    }

    /// Shared flash core.
    pub fn solve(&self, quantity: FlashQuantity, target: f64, p: f64) -> FluidResult<FlashSolution> {
        self.config.validate()?;
        let p = ensure_finite(p, "pressure")?;
        let target = ensure_finite(target, quantity.label())?;

        let envelope = self.correlation.envelope(self.x);
        envelope.check_pressure(p)?;

        debug!(
            input = quantity.input_label(),
            target,
            pressure = p,
            fluid = self.correlation.name(),
            "starting flash"
        );

        let residual = |t: f64| -> FluidResult<f64> {
            Ok(quantity.evaluate(self.correlation, t, p, self.x)? - target)
        };

        // Coarse scan for the bracketing interval
        let grid = linspace(envelope.t_min, envelope.t_max, self.config.scan_intervals + 1);
        let residuals = grid
            .iter()
            .map(|&t| residual(t))
            .collect::<FluidResult<Vec<f64>>>()?;

        let i = match scan_roots(&residuals).as_slice() {
            [ScanRoot::Exact(j)] => {
                debug!(temperature = grid[*j], "flash target hit on scan grid");
                return Ok(FlashSolution {
                    temperature: grid[*j],
                    iterations: 0,
                    residual: 0.0,
                });
            }
            [ScanRoot::Bracket(i)] => *i,
            [] => {
                let (lo, hi) = residuals.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                    (lo.min(r + target), hi.max(r + target))
                });
                return Err(FluidError::FlashConvergence {
                    input: quantity.input_label(),
                    what: format!(
                        "target {} {target} outside achievable range [{lo}, {hi}] at P = {p} Pa",
                        quantity.label()
                    ),
                });
            }
            many => {
                return Err(FluidError::FlashConvergence {
                    input: quantity.input_label(),
                    what: format!(
                        "{} is not monotonic in temperature ({} roots found)",
                        quantity.label(),
                        many.len()
                    ),
                });
            }
        };

        let solution = brent(
            residual,
            (grid[i], grid[i + 1]),
            (residuals[i], residuals[i + 1]),
            &self.config,
        )
        .map_err(|err| match err {
            BrentError::Iterations(last) => FluidError::FlashConvergence {
                input: quantity.input_label(),
                what: format!(
                    "no convergence after {} iterations (last T = {last} K)",
                    self.config.max_iterations
                ),
            },
            BrentError::Eval(err) => err,
        })?;

        debug!(
            temperature = solution.temperature,
            iterations = solution.iterations,
            residual = solution.residual,
            "flash converged"
        );
        Ok(solution)
    }
}

/// Root located by the coarse scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanRoot {
    /// Residual is exactly zero at this grid index.
    Exact(usize),
    /// Residual changes sign between this grid index and the next.
    Bracket(usize),
}

/// Roots visible on the scan grid. A run of exact zeros counts once.
fn scan_roots(residuals: &[f64]) -> Vec<ScanRoot> {
    let mut roots = Vec::new();
    for (i, &r) in residuals.iter().enumerate() {
        if r == 0.0 {
            if i == 0 || residuals[i - 1] != 0.0 {
                roots.push(ScanRoot::Exact(i));
            }
        } else if let Some(&next) = residuals.get(i + 1)
            && next != 0.0
            && (r > 0.0) != (next > 0.0)
        {
            roots.push(ScanRoot::Bracket(i));
        }
    }
    roots
}

enum BrentError {
    Iterations(f64),
    Eval(FluidError),
}

/// Brent's method on a bracket whose endpoint residuals differ in sign.
fn brent<F>(
    mut f: F,
    (mut a, mut b): (f64, f64),
    (mut fa, mut fb): (f64, f64),
    config: &FlashConfig,
) -> Result<FlashSolution, BrentError>
where
    F: FnMut(f64) -> FluidResult<f64>,
{
    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=config.max_iterations {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.rel_tol * b.abs();
        let m = 0.5 * (c - b);
        if fb == 0.0 || fb.abs() <= config.abs_tol || m.abs() <= tol {
            return Ok(FlashSolution {
                temperature: b,
                iterations: iteration,
                residual: fb,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant step
                (2.0 * m * s, 1.0 - s)
            } else {
                // Inverse quadratic interpolation
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b).map_err(BrentError::Eval)?;
        trace!(iteration, temperature = b, residual = fb, "brent step");
        if fb == 0.0 || fb.abs() <= config.abs_tol {
            return Ok(FlashSolution {
                temperature: b,
                iterations: iteration,
                residual: fb,
            });
        }
    }

    Err(BrentError::Iterations(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lookup;
    use crate::correlation::Envelope;
    use lf_core::numeric::{Tolerances, nearly_equal};

    const P: f64 = 101_325.0;
    const T_TOL: Tolerances = Tolerances {
        abs: 1e-9,
        rel: 1e-9,
    };

    /// Density with a maximum at 300 K inside a 250-350 K envelope.
    #[derive(Debug)]
    struct HumpedLiquid;

    impl Correlation for HumpedLiquid {
        fn name(&self) -> &str {
            "Humped"
        }
        fn component_names(&self) -> Vec<String> {
            vec!["Humped".into()]
        }
        fn molar_masses(&self) -> Vec<f64> {
            vec![0.1]
        }
        fn envelope(&self, _x: &[f64]) -> Envelope {
            Envelope::new(250.0, 350.0, 1.0e3, 1.0e7)
        }
        fn density(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64> {
            self.envelope(x).check(t, p)?;
            Ok(1000.0 - 0.01 * (t - 300.0).powi(2))
        }
        fn specific_heat(&self, _t: f64, _p: f64, _x: &[f64]) -> FluidResult<f64> {
            Ok(4000.0)
        }
        fn internal_energy(&self, t: f64, _p: f64, _x: &[f64]) -> FluidResult<f64> {
            Ok(4000.0 * (t - 300.0))
        }
        fn enthalpy(&self, t: f64, p: f64, x: &[f64]) -> FluidResult<f64> {
            self.internal_energy(t, p, x)
        }
        fn entropy(&self, t: f64, _p: f64, _x: &[f64]) -> FluidResult<f64> {
            Ok(4000.0 * (t / 300.0).ln())
        }
        fn viscosity(&self, _t: f64, _p: f64, _x: &[f64]) -> FluidResult<f64> {
            Ok(1.0e-3)
        }
        fn conductivity(&self, _t: f64, _p: f64, _x: &[f64]) -> FluidResult<f64> {
            Ok(0.6)
        }
    }

    #[test]
    fn water_round_trips_for_all_quantities() {
        let water = lookup("Water").unwrap();
        let x = [1.0];
        let solver = FlashSolver::new(&*water, &x, FlashConfig::default());

        for t in [280.0, 310.5, 365.0] {
            for p in [5.0e4, 1.0e6] {
                let rho = water.density(t, p, &x).unwrap();
                let h = water.enthalpy(t, p, &x).unwrap();
                let s = water.entropy(t, p, &x).unwrap();
                let u = water.internal_energy(t, p, &x).unwrap();

                assert!(nearly_equal(solver.dmass_p(rho, p).unwrap(), t, T_TOL));
                assert!(nearly_equal(solver.hmass_p(h, p).unwrap(), t, T_TOL));
                assert!(nearly_equal(solver.p_smass(p, s).unwrap(), t, T_TOL));
                assert!(nearly_equal(solver.p_umass(p, u).unwrap(), t, T_TOL));
            }
        }
    }

    #[test]
    fn envelope_edges_are_reachable() {
        let water = lookup("Water").unwrap();
        let x = [1.0];
        let solver = FlashSolver::new(&*water, &x, FlashConfig::default());
        let env = water.envelope;

        let h_min = water.enthalpy(env.t_min, P, &x).unwrap();
        let h_max = water.enthalpy(env.t_max, P, &x).unwrap();
        assert_eq!(solver.hmass_p(h_min, P).unwrap(), env.t_min);
        assert_eq!(solver.hmass_p(h_max, P).unwrap(), env.t_max);
    }

    #[test]
    fn unreachable_density_fails() {
        let water = lookup("Water").unwrap();
        let x = [1.0];
        let solver = FlashSolver::new(&*water, &x, FlashConfig::default());

        let err = solver.dmass_p(500.0, P).unwrap_err();
        match err {
            FluidError::FlashConvergence { input, what } => {
                assert_eq!(input, "DmassP");
                assert!(what.contains("outside achievable range"), "{what}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_finite_inputs_are_out_of_range() {
        let water = lookup("Water").unwrap();
        let x = [1.0];
        let solver = FlashSolver::new(&*water, &x, FlashConfig::default());

        assert!(matches!(
            solver.hmass_p(f64::NAN, P),
            Err(FluidError::OutOfRange { .. })
        ));
        assert!(matches!(
            solver.hmass_p(1.0e5, f64::INFINITY),
            Err(FluidError::OutOfRange { .. })
        ));
    }

    #[test]
    fn pressure_outside_envelope_rejected_before_iterating() {
        let water = lookup("Water").unwrap();
        let x = [1.0];
        let solver = FlashSolver::new(&*water, &x, FlashConfig::default());

        let err = solver.dmass_p(990.0, 5.0e8).unwrap_err();
        assert!(matches!(err, FluidError::OutOfRange { what: "pressure", .. }));
    }

    #[test]
    fn non_monotonic_correlation_reports_failure() {
        let x = [1.0];
        let solver = FlashSolver::new(&HumpedLiquid, &x, FlashConfig::default());

        // ρ = 990 at T = 300 ± 31.6 K: two roots, no silent pick
        let err = solver.dmass_p(990.0, P).unwrap_err();
        match err {
            FluidError::FlashConvergence { what, .. } => {
                assert!(what.contains("not monotonic"), "{what}");
            }
            other => panic!("unexpected error {other:?}"),
        }

        // ρ = 975 exactly on both envelope edges: two grid hits are still two roots
        let err = solver.dmass_p(975.0, P).unwrap_err();
        match err {
            FluidError::FlashConvergence { what, .. } => {
                assert!(what.contains("not monotonic"), "{what}");
            }
            other => panic!("unexpected error {other:?}"),
        }

        // Monotonic properties of the same correlation still solve
        let t = solver.hmass_p(4000.0 * 12.5, P).unwrap();
        assert!(nearly_equal(t, 312.5, T_TOL));
    }

    #[test]
    fn iteration_cap_is_enforced() {
        let water = lookup("Water").unwrap();
        let x = [1.0];
        let config = FlashConfig {
            abs_tol: 0.0,
            rel_tol: 0.0,
            max_iterations: 2,
            scan_intervals: 1,
        };
        let solver = FlashSolver::new(&*water, &x, config);
        let h = water.enthalpy(331.234, P, &x).unwrap();

        let err = solver.hmass_p(h, P).unwrap_err();
        match err {
            FluidError::FlashConvergence { what, .. } => {
                assert!(what.contains("no convergence after 2 iterations"), "{what}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn final_step_is_checked_for_convergence() {
        // Linear internal energy: one secant step lands on the root
        let x = [1.0];
        let config = FlashConfig {
            abs_tol: 1e-6,
            max_iterations: 1,
            scan_intervals: 1,
            ..FlashConfig::default()
        };
        let solver = FlashSolver::new(&HumpedLiquid, &x, config);

        let solution = solver
            .solve(FlashQuantity::InternalEnergy, 4000.0 * 31.7, P)
            .unwrap();
        assert_eq!(solution.iterations, 1);
        assert!(nearly_equal(solution.temperature, 331.7, T_TOL));
    }

    #[test]
    fn scan_roots_merge_zero_runs() {
        use ScanRoot::{Bracket, Exact};

        assert_eq!(scan_roots(&[-1.0, 2.0, 3.0]), [Bracket(0)]);
        assert_eq!(scan_roots(&[-1.0, 0.0, 1.0]), [Exact(1)]);
        assert_eq!(scan_roots(&[1.0, 0.0, 0.0, 1.0]), [Exact(1)]);
        assert_eq!(scan_roots(&[0.0, 1.0, 0.0]), [Exact(0), Exact(2)]);
        assert_eq!(scan_roots(&[0.0, -1.0, 1.0]), [Exact(0), Bracket(1)]);
        assert!(scan_roots(&[1.0, 2.0, 0.5]).is_empty());
    }

    #[test]
    fn solution_reports_iterations() {
        let water = lookup("Water").unwrap();
        let x = [1.0];
        let solver = FlashSolver::new(&*water, &x, FlashConfig::default());
        let s = water.entropy(333.3, P, &x).unwrap();

        let solution = solver.solve(FlashQuantity::Entropy, s, P).unwrap();
        assert!(solution.iterations >= 1);
        assert!(solution.iterations <= FlashConfig::default().max_iterations);
        assert!(nearly_equal(solution.temperature, 333.3, T_TOL));
    }

    #[test]
    fn invalid_config_rejected() {
        let water = lookup("Water").unwrap();
        let x = [1.0];
        let config = FlashConfig {
            scan_intervals: 0,
            ..FlashConfig::default()
        };
        let solver = FlashSolver::new(&*water, &x, config);
        assert!(matches!(
            solver.hmass_p(1.0e5, P),
            Err(FluidError::InvalidArg { .. })
        ));
    }

    #[test]
    fn config_from_json_fills_defaults() {
        let config = FlashConfig::from_json(r#"{ "max_iterations": 40 }"#).unwrap();
        assert_eq!(config.max_iterations, 40);
        assert_eq!(config.abs_tol, FlashConfig::default().abs_tol);

        assert!(FlashConfig::from_json(r#"{ "rel_tol": -1.0 }"#).is_err());
    }
}
