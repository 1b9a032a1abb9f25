//! Polynomial fits used by the liquid correlations.

use serde::{Deserialize, Serialize};

/// Polynomial `Σ cᵢ xⁱ` stored lowest order first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(coeffs: impl Into<Vec<f64>>) -> Self {
        Self {
            coeffs: coeffs.into(),
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite())
    }

    /// Evaluate with Horner's rule.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    /// Antiderivative with zero integration constant.
    pub fn integral(&self) -> Polynomial {
        let mut coeffs = Vec::with_capacity(self.coeffs.len() + 1);
        coeffs.push(0.0);
        coeffs.extend(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| c / (i + 1) as f64),
        );
        Polynomial { coeffs }
    }

    pub fn derivative(&self) -> Polynomial {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * i as f64)
            .collect();
        Polynomial { coeffs }
    }

    /// Re-express `p(x − shift)` as a polynomial in `x`.
    ///
    /// Correlations are fitted in `τ = T − T_base`; rebasing by `T_base` gives
    /// coefficients in absolute temperature.
    pub fn rebase(&self, shift: f64) -> Polynomial {
        let mut out: Vec<f64> = Vec::with_capacity(self.coeffs.len());
        for &c in self.coeffs.iter().rev() {
            // out <- out * (x - shift) + c
            out.push(0.0);
            for j in (1..out.len()).rev() {
                out[j] = out[j - 1] - shift * out[j];
            }
            out[0] = c - shift * out[0];
        }
        Polynomial { coeffs: out }
    }

    /// Closed-form `∫ p(x)/x dx` from `x0` to `x1` (both positive).
    pub fn integral_over_x(&self, x0: f64, x1: f64) -> f64 {
        self.coeffs
            .iter()
            .enumerate()
            .map(|(j, c)| {
                if j == 0 {
                    c * (x1 / x0).ln()
                } else {
                    let n = j as i32;
                    c * (x1.powi(n) - x0.powi(n)) / j as f64
                }
            })
            .sum()
    }
}

impl From<Vec<f64>> for Polynomial {
    fn from(coeffs: Vec<f64>) -> Self {
        Polynomial { coeffs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_core::numeric::{Tolerances, nearly_equal};

    const TOL: Tolerances = Tolerances {
        abs: 1e-9,
        rel: 1e-12,
    };

    #[test]
    fn horner_matches_direct_sum() {
        let p = Polynomial::new([1.0, -2.0, 0.5]);
        let x: f64 = 3.0;
        assert!(nearly_equal(p.eval(x), 1.0 - 2.0 * x + 0.5 * x * x, TOL));
        assert_eq!(Polynomial::new(Vec::new()).eval(5.0), 0.0);
    }

    #[test]
    fn integral_and_derivative() {
        let p = Polynomial::new([2.0, 6.0, 3.0]);
        let ip = p.integral();
        assert_eq!(ip.coefficients(), &[0.0, 2.0, 3.0, 1.0]);
        assert_eq!(ip.derivative(), p);
    }

    #[test]
    fn rebase_matches_shifted_evaluation() {
        let p = Polynomial::new([4181.0, 0.3, 0.0143, -2.0e-5]);
        let shift = 323.15;
        let q = p.rebase(shift);
        assert_eq!(q.coefficients().len(), p.coefficients().len());
        for t in [273.15, 300.0, 323.15, 373.15] {
            assert!(nearly_equal(q.eval(t), p.eval(t - shift), TOL));
        }
    }

    #[test]
    fn rebase_constant_is_identity() {
        let p = Polynomial::new([7.5]);
        assert_eq!(p.rebase(100.0), p);
    }

    #[test]
    fn integral_over_x_constant() {
        // ∫ c/x dx = c ln(x1/x0)
        let p = Polynomial::new([4000.0]);
        let got = p.integral_over_x(300.0, 350.0);
        assert!(nearly_equal(got, 4000.0 * (350.0_f64 / 300.0).ln(), TOL));
        assert_eq!(p.integral_over_x(300.0, 300.0), 0.0);
    }

    #[test]
    fn integral_over_x_linear() {
        // ∫ (a + b x)/x dx = a ln(x1/x0) + b (x1 - x0)
        let p = Polynomial::new([2000.0, 4.0]);
        let got = p.integral_over_x(280.0, 360.0);
        let expected = 2000.0 * (360.0_f64 / 280.0).ln() + 4.0 * 80.0;
        assert!(nearly_equal(got, expected, TOL));
    }

    #[test]
    fn deserializes_from_array() {
        let p: Polynomial = serde_json::from_str("[1.0, 2.0]").unwrap();
        assert_eq!(p.coefficients(), &[1.0, 2.0]);
    }
}
