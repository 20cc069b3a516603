use crate::TfdhError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair.
///
/// Convergence tests in this workspace follow the "either" convention: a
/// quantity is accepted when its error is below `abs` or below `rel` times
/// the magnitude of the quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Tolerances {
    pub const fn new(abs: Real, rel: Real) -> Self {
        Self { abs, rel }
    }

    /// Both tolerances at machine epsilon.
    pub const fn machine() -> Self {
        Self {
            abs: Real::EPSILON,
            rel: Real::EPSILON,
        }
    }

    /// Largest error accepted for a quantity of magnitude `scale`.
    pub fn bound(&self, scale: Real) -> Real {
        self.abs.max(self.rel * scale.abs())
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TfdhError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TfdhError::NonFinite { what, value: v })
    }
}

/// Accept only finite, strictly positive values.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, TfdhError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(TfdhError::NonPositive { what, value: v })
    }
}

/// Cubic smoothstep `3z² − 2z³`, clamped to `[0, 1]`.
///
/// Satisfies f(0)=0, f'(0)=0, f(1)=1, f'(1)=0.
pub fn smoothstep(z: Real) -> Real {
    let z = z.clamp(0.0, 1.0);
    z * z * (3.0 - 2.0 * z)
}

/// Blend `left` into `right` as `x` moves across `[xl, xr]`.
pub fn blend(left: Real, right: Real, x: Real, xl: Real, xr: Real) -> Real {
    let fz = smoothstep((x - xl) / (xr - xl));
    left + fz * (right - left)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn smoothstep_is_monotone(a in 0.0_f64..1.0, b in 0.0_f64..1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(smoothstep(lo) <= smoothstep(hi));
        }
    }
}
