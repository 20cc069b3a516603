//! Bracketed scalar root refinement.

use crate::error::{NumericError, NumericResult};
use tfdh_core::Tolerances;

/// Brent's method on `[lo, hi]`.
///
/// The endpoints must bracket a sign change; otherwise
/// [`NumericError::NoSignChange`] is returned. Converges when the bracket
/// shrinks below `tol.abs + tol.rel·|x|` (the "either" rule of
/// [`Tolerances`]).
pub fn brent<F>(mut f: F, lo: f64, hi: f64, tol: Tolerances, max_iter: usize) -> NumericResult<f64>
where
    F: FnMut(f64) -> f64,
{
    if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
        return Err(NumericError::InvalidArg {
            what: "brent interval must be finite with lo < hi",
        });
    }

    let (mut a, mut b) = (lo, hi);
    let (mut fa, mut fb) = (f(a), f(b));
    if !(fa.is_finite() && fb.is_finite()) {
        return Err(NumericError::NonFinite {
            what: "brent endpoint value",
            value: if fa.is_finite() { fb } else { fa },
        });
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        return Err(NumericError::NoSignChange {
            lo,
            hi,
            f_lo: fa,
            f_hi: fb,
        });
    }

    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iter {
        if fb.signum() == fc.signum() {
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

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol.bound(b);
        let m = 0.5 * (c - b);
        if m.abs() <= tol1 || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // inverse quadratic interpolation, or secant when a == c
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
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
            let min1 = 3.0 * m * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = d;
            }
        } else {
            d = m;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol1 { d } else { tol1.copysign(m) };
        fb = f(b);
        if !fb.is_finite() {
            return Err(NumericError::NonFinite {
                what: "brent iterate value",
                value: fb,
            });
        }
    }

    Err(NumericError::BisectionExhausted {
        iterations: max_iter,
        below: b.min(c),
        above: b.max(c),
    })
}
