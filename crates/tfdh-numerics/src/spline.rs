//! Natural cubic spline interpolation.

use crate::error::{NumericError, NumericResult};
use crate::quadrature::{QuadratureConfig, integrate};

/// Natural cubic spline through strictly increasing knots.
///
/// Owns its knots and second derivatives; nothing is borrowed from the
/// caller, so the spline can outlive the sample buffers it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    m: Vec<f64>,
}

impl CubicSpline {
    pub fn new(x: &[f64], y: &[f64]) -> NumericResult<Self> {
        if x.len() != y.len() {
            return Err(NumericError::InvalidArg {
                what: "spline abscissae and ordinates differ in length",
            });
        }
        if x.len() < 2 {
            return Err(NumericError::InvalidArg {
                what: "spline needs at least two points",
            });
        }
        if let Some(bad) = x.iter().chain(y).find(|v| !v.is_finite()) {
            return Err(NumericError::NonFinite {
                what: "spline sample",
                value: *bad,
            });
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(NumericError::InvalidArg {
                what: "spline abscissae must be strictly increasing",
            });
        }

        let n = x.len();
        let mut m = vec![0.0; n];
        if n > 2 {
            // Thomas algorithm on the interior second derivatives
            let inner = n - 2;
            let mut diag = vec![0.0; inner];
            let mut rhs = vec![0.0; inner];
            let mut upper = vec![0.0; inner];
            for i in 0..inner {
                let h0 = x[i + 1] - x[i];
                let h1 = x[i + 2] - x[i + 1];
                diag[i] = 2.0 * (h0 + h1);
                upper[i] = h1;
                rhs[i] = 6.0 * ((y[i + 2] - y[i + 1]) / h1 - (y[i + 1] - y[i]) / h0);
            }
            for i in 1..inner {
                let lower = x[i + 1] - x[i];
                let w = lower / diag[i - 1];
                diag[i] -= w * upper[i - 1];
                rhs[i] -= w * rhs[i - 1];
            }
            m[inner] = rhs[inner - 1] / diag[inner - 1];
            for i in (0..inner - 1).rev() {
                m[i + 1] = (rhs[i] - upper[i] * m[i + 2]) / diag[i];
            }
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// First and last knot.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn knots(&self) -> &[f64] {
        &self.x
    }

    /// Interpolated value; arguments outside the domain are clamped to it.
    pub fn eval(&self, t: f64) -> f64 {
        let (lo, hi) = self.domain();
        let t = t.clamp(lo, hi);
        let i = self
            .x
            .partition_point(|&xi| xi <= t)
            .saturating_sub(1)
            .min(self.x.len() - 2);

        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - t) / h;
        let b = (t - self.x[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }

    /// Integral of the interpolant between consecutive knots, each piece
    /// evaluated by adaptive quadrature.
    pub fn segment_integrals(&self, config: &QuadratureConfig) -> NumericResult<Vec<f64>> {
        self.x
            .windows(2)
            .map(|w| integrate(|t| self.eval(t), w[0], w[1], config).map(|q| q.value))
            .collect()
    }

    /// Integral of the interpolant over its whole domain.
    pub fn integral(&self, config: &QuadratureConfig) -> NumericResult<f64> {
        Ok(self.segment_integrals(config)?.iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_knots_exactly() {
        let x = [0.0, 0.5, 1.5, 2.0, 3.5];
        let y = [1.0, -2.0, 0.3, 4.0, 2.0];
        let s = CubicSpline::new(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(y) {
            assert!((s.eval(*xi) - yi).abs() < 1e-12);
        }
    }

    #[test]
    fn reproduces_straight_line() {
        let x: Vec<f64> = (0..10).map(|i| (i as f64).powf(1.3)).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v - 1.0).collect();
        let s = CubicSpline::new(&x, &y).unwrap();
        for t in [0.1, 1.7, 5.2, 13.9] {
            assert!((s.eval(t) - (2.0 * t - 1.0)).abs() < 1e-10);
        }
    }

    #[test]
    fn two_points_is_linear() {
        let s = CubicSpline::new(&[1.0, 3.0], &[2.0, 6.0]).unwrap();
        assert!((s.eval(2.0) - 4.0).abs() < 1e-14);
    }

    #[test]
    fn clamps_outside_domain() {
        let s = CubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(s.eval(-5.0), 0.0);
        assert_eq!(s.eval(10.0), 0.0);
    }

    #[test]
    fn smooth_function_is_accurate() {
        let x: Vec<f64> = (0..=100).map(|i| i as f64 * 0.0314159).collect();
        let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
        let s = CubicSpline::new(&x, &y).unwrap();
        assert!((s.eval(1.0) - 1f64.sin()).abs() < 1e-6);
        let total = s.integral(&QuadratureConfig::default()).unwrap();
        assert!((total - (1.0 - x[100].cos())).abs() < 1e-5);
    }

    #[test]
    fn rejects_non_increasing_knots() {
        let err = CubicSpline::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, NumericError::InvalidArg { .. }));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert!(CubicSpline::new(&[0.0, 1.0], &[0.0]).is_err());
        assert!(CubicSpline::new(&[0.0], &[0.0]).is_err());
    }

    #[test]
    fn rejects_nan_samples() {
        let err = CubicSpline::new(&[0.0, 1.0], &[0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, NumericError::NonFinite { .. }));
    }
}
