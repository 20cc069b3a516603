//! Adaptive Gauss-Kronrod (7/15) quadrature.

use crate::error::{NumericError, NumericResult};
use tracing::warn;

/// Kronrod abscissae on [0, 1]; odd indices are the Gauss nodes.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_22,
    0.063_092_092_629_978_55,
    0.104_790_010_322_250_2,
    0.140_653_259_715_525_9,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_8,
];

/// Gauss weights for XGK[1], XGK[3], XGK[5] and the centre.
const WG: [f64; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_7,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

/// Accuracy controls for [`integrate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadratureConfig {
    pub abs: f64,
    pub rel: f64,
    /// Maximum number of subintervals kept by the adaptive bisection.
    pub max_subintervals: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            abs: 1e-6,
            rel: 1e-6,
            max_subintervals: 1000,
        }
    }
}

impl QuadratureConfig {
    fn accepts(&self, error: f64, value: f64) -> bool {
        error <= self.abs.max(self.rel * value.abs())
    }
}

/// Integral estimate and its error bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrature {
    pub value: f64,
    pub error: f64,
    pub subintervals: usize,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

fn kronrod15<F: FnMut(f64) -> f64>(f: &mut F, a: f64, b: f64) -> Segment {
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    let abs_half = half.abs();

    let fc = f(center);
    let mut res_g = fc * WG[3];
    let mut res_k = fc * WGK[7];
    let mut res_abs = res_k.abs();
    let mut fv1 = [0.0; 7];
    let mut fv2 = [0.0; 7];

    for j in 0..7 {
        let abscissa = half * XGK[j];
        let f1 = f(center - abscissa);
        let f2 = f(center + abscissa);
        fv1[j] = f1;
        fv2[j] = f2;
        if j % 2 == 1 {
            res_g += WG[j / 2] * (f1 + f2);
        }
        res_k += WGK[j] * (f1 + f2);
        res_abs += WGK[j] * (f1.abs() + f2.abs());
    }

    let mean = 0.5 * res_k;
    let mut res_asc = WGK[7] * (fc - mean).abs();
    for j in 0..7 {
        res_asc += WGK[j] * ((fv1[j] - mean).abs() + (fv2[j] - mean).abs());
    }

    let value = res_k * half;
    res_abs *= abs_half;
    res_asc *= abs_half;
    let mut error = ((res_k - res_g) * half).abs();
    if res_asc != 0.0 && error != 0.0 {
        error = res_asc * (200.0 * error / res_asc).powf(1.5).min(1.0);
    }
    if res_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(50.0 * f64::EPSILON * res_abs);
    }

    Segment { a, b, value, error }
}

/// Integrate `f` over `[a, b]` by adaptive bisection of the subinterval
/// with the largest error estimate.
///
/// When the subinterval budget runs out before the tolerance is met, the
/// best estimate is returned with its (too large) error and a warning is
/// logged. A non-finite estimate is an error.
pub fn integrate<F>(mut f: F, a: f64, b: f64, config: &QuadratureConfig) -> NumericResult<Quadrature>
where
    F: FnMut(f64) -> f64,
{
    if !(a.is_finite() && b.is_finite()) {
        return Err(NumericError::InvalidArg {
            what: "quadrature limits must be finite",
        });
    }
    if a == b {
        return Ok(Quadrature {
            value: 0.0,
            error: 0.0,
            subintervals: 0,
        });
    }

    let mut segments = vec![kronrod15(&mut f, a, b)];
    let mut value = segments[0].value;
    let mut error = segments[0].error;

    while !config.accepts(error, value) {
        if segments.len() >= config.max_subintervals.max(1) {
            warn!(
                a,
                b,
                value,
                error,
                subintervals = segments.len(),
                "quadrature subdivision budget exhausted"
            );
            break;
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let parent = segments.swap_remove(worst);
        let mid = 0.5 * (parent.a + parent.b);
        if mid == parent.a || mid == parent.b {
            warn!(a = parent.a, b = parent.b, "quadrature interval cannot be bisected further");
            segments.push(parent);
            break;
        }
        let left = kronrod15(&mut f, parent.a, mid);
        let right = kronrod15(&mut f, mid, parent.b);
        segments.push(left);
        segments.push(right);

        value = segments.iter().map(|s| s.value).sum();
        error = segments.iter().map(|s| s.error).sum();
    }

    if !value.is_finite() {
        return Err(NumericError::NonFinite {
            what: "quadrature estimate",
            value,
        });
    }

    Ok(Quadrature {
        value,
        error,
        subintervals: segments.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn polynomial_is_exact() {
        let q = integrate(|x| 3.0 * x * x - 2.0 * x + 1.0, 0.0, 2.0, &QuadratureConfig::default()).unwrap();
        assert!((q.value - 6.0).abs() < 1e-13);
        assert_eq!(q.subintervals, 1);
    }

    #[test]
    fn smooth_transcendental() {
        let q = integrate(f64::sin, 0.0, PI, &QuadratureConfig::default()).unwrap();
        assert!((q.value - 2.0).abs() < 1e-10);
    }

    #[test]
    fn sharp_fermi_edge_subdivides() {
        // Fermi-Dirac occupation with a steep edge just below the upper limit
        let cfg = QuadratureConfig {
            abs: 1e-10,
            rel: 1e-10,
            max_subintervals: 500,
        };
        let q = integrate(|x| 1.0 / (1.0 + (50.0 * (x - 39.7)).exp()), 0.0, 40.0, &cfg).unwrap();
        let exact = 40.0 - (1.0 + (50.0_f64 * 0.3).exp()).ln() / 50.0;
        assert!((q.value - exact).abs() < 1e-8, "value = {} vs {exact}", q.value);
        assert!(q.subintervals > 1);
    }

    #[test]
    fn reversed_limits_flip_sign() {
        let cfg = QuadratureConfig::default();
        let fwd = integrate(|x| x.exp(), 0.0, 1.0, &cfg).unwrap();
        let back = integrate(|x| x.exp(), 1.0, 0.0, &cfg).unwrap();
        assert!((fwd.value + back.value).abs() < 1e-12);
    }

    #[test]
    fn exhausted_budget_returns_best_estimate() {
        let cfg = QuadratureConfig {
            abs: 0.0,
            rel: 0.0,
            max_subintervals: 4,
        };
        let q = integrate(|x| x.sqrt(), 0.0, 1.0, &cfg).unwrap();
        assert_eq!(q.subintervals, 4);
        assert!((q.value - 2.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn empty_interval_is_zero() {
        let q = integrate(|x| x, 1.0, 1.0, &QuadratureConfig::default()).unwrap();
        assert_eq!(q.value, 0.0);
    }

    #[test]
    fn infinite_limit_is_rejected() {
        let err = integrate(|x| x, 0.0, f64::INFINITY, &QuadratureConfig::default()).unwrap_err();
        assert!(matches!(err, NumericError::InvalidArg { .. }));
    }
}
