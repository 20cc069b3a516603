//! Generalized Fermi-Dirac integrals.
//!
//! F_k(χ, τ) = ∫₀^∞ x^k √(1 + τx/2) / (1 + exp(x − χ)) dx for k = 1/2, 3/2, 5/2,
//! approximated analytically in three regimes of χ. The regimes are blended
//! with a cubic smoothstep across 0.59..0.61 and 13.9..14.1 so the result and
//! its first derivative are continuous in χ.

use crate::error::{PlasmaError, PlasmaResult};
use std::f64::consts::PI;
use tfdh_core::numeric::blend;

/// Largest τ for which the approximation is validated.
pub const MAX_TAU: f64 = 100.0;

/// The closed-form relativistic leading term divides by τ up to twice and
/// cancels below this χτ, where the series is used instead.
const SERIES_MAX_CHI_TAU: f64 = 0.1;
const SERIES_MAX_TERMS: usize = 40;

const SMALL_MAX: f64 = 0.59;
const SMALL_TO_MID: f64 = 0.61;
const MID_MAX: f64 = 13.9;
const MID_TO_LARGE: f64 = 14.1;

const X: [f64; 5] = [7.265351e-2, 0.2694608, 0.533122, 0.7868801, 0.9569313];
const XI: [f64; 5] = [0.26356032, 1.4134031, 3.5964258, 7.0858100, 12.640801];
const H: [f64; 5] = [3.818735e-2, 0.1256732, 0.1986308, 0.1976334, 0.1065420];
const V: [f64; 5] = [
    0.29505869,
    0.32064856,
    7.3915570e-2,
    3.6087389e-3,
    2.3369894e-5,
];
const C: [[f64; 5]; 3] = [
    [0.37045057, 0.41258437, 9.777982e-2, 5.3734153e-3, 3.8746281e-5],
    [0.39603109, 0.69468795, 0.22322760, 1.5262934e-2, 1.3081939e-4],
    [0.76934619, 1.7891437, 0.70754974, 5.6755672e-2, 5.5571480e-4],
];
const KHI: [[f64; 5]; 3] = [
    [0.43139881, 1.7597537, 4.1044654, 7.7467038, 13.457678],
    [0.81763176, 2.4723339, 5.1160061, 9.0441465, 15.049882],
    [1.2558461, 3.2070406, 6.1239082, 10.316126, 16.597079],
];

/// Order k of the integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GfdiOrder {
    /// k = 1/2
    Half,
    /// k = 3/2
    ThreeHalves,
    /// k = 5/2
    FiveHalves,
}

impl GfdiOrder {
    /// Integer part of k, used to index the coefficient tables.
    fn index(self) -> usize {
        match self {
            GfdiOrder::Half => 0,
            GfdiOrder::ThreeHalves => 1,
            GfdiOrder::FiveHalves => 2,
        }
    }
}

/// Evaluate F_k(χ, τ).
///
/// Fails with [`PlasmaError::ApproximationDomain`] for τ > 100.
pub fn gfdi(order: GfdiOrder, chi: f64, tau: f64) -> PlasmaResult<f64> {
    if tau > MAX_TAU {
        return Err(PlasmaError::ApproximationDomain { tau });
    }
    if !tau.is_finite() || tau < 0.0 {
        return Err(PlasmaError::NonPhysical {
            what: "relativity parameter tau",
            value: tau,
        });
    }
    if chi.is_nan() {
        return Err(PlasmaError::NonPhysical {
            what: "degeneracy parameter chi",
            value: chi,
        });
    }

    let k = order.index();
    let value = if chi <= SMALL_MAX {
        small(k, chi, tau)
    } else if chi < SMALL_TO_MID {
        blend(small(k, chi, tau), mid(k, chi, tau), chi, SMALL_MAX, SMALL_TO_MID)
    } else if chi <= MID_MAX {
        mid(k, chi, tau)
    } else if chi < MID_TO_LARGE {
        blend(mid(k, chi, tau), large(k, chi, tau), chi, MID_MAX, MID_TO_LARGE)
    } else {
        large(k, chi, tau)
    };
    Ok(value)
}

fn small(k: usize, chi: f64, tau: f64) -> f64 {
    let e_chi = (-chi).exp();
    (0..5)
        .map(|i| C[k][i] * (1.0 + KHI[k][i] * tau / 2.0).sqrt() / ((-KHI[k][i]).exp() + e_chi))
        .sum()
}

fn mid(k: usize, chi: f64, tau: f64) -> f64 {
    let kf = k as f64;
    (0..5)
        .map(|i| {
            let inner = H[i] * X[i].powi(k as i32) * chi.powf(kf + 1.5)
                * (1.0 + chi * X[i] * tau / 2.0).sqrt()
                / (1.0 + (chi * (X[i] - 1.0)).exp());
            let shifted = XI[i] + chi;
            inner + V[i] * shifted.powf(kf + 0.5) * (1.0 + shifted * tau / 2.0).sqrt()
        })
        .sum()
}

fn large(k: usize, chi: f64, tau: f64) -> f64 {
    let kf = k as f64;
    let r = (chi * (1.0 + chi * tau / 2.0)).sqrt();
    sommerfeld_leading(k, chi, tau, r)
        + PI * PI / 6.0 * chi.powi(k as i32) * (kf + 0.5 + (kf + 1.0) * chi * tau / 2.0) / r
}

/// Leading Sommerfeld term ∫₀^χ x^{k+1/2} √(1 + τx/2) dx; higher orders
/// follow by recursion on k.
fn sommerfeld_leading(k: usize, chi: f64, tau: f64, r: f64) -> f64 {
    if chi * tau < SERIES_MAX_CHI_TAU {
        return sommerfeld_series(k, chi, tau);
    }
    match k {
        0 => {
            (chi + 1.0 / tau) * r / 2.0
                - (2.0 * tau).powf(-1.5) * (1.0 + tau * chi + (2.0 * tau).sqrt() * r).ln()
        }
        1 => (2.0 / 3.0 * r.powi(3) - sommerfeld_leading(0, chi, tau, r)) / tau,
        _ => (2.0 * chi * r.powi(3) - 5.0 * sommerfeld_leading(1, chi, tau, r)) / (4.0 * tau),
    }
}

/// Binomial series of the leading term in u = χτ/2, for u < 1/20.
fn sommerfeld_series(k: usize, chi: f64, tau: f64) -> f64 {
    let p = k as f64 + 1.5;
    let u = chi * tau / 2.0;
    // binomial(1/2, n) u^n
    let mut coeff = 1.0;
    let mut sum = 0.0;
    for n in 0..SERIES_MAX_TERMS {
        let nf = n as f64;
        let term = coeff / (p + nf);
        sum += term;
        if term.abs() <= f64::EPSILON * sum.abs() {
            break;
        }
        coeff *= (0.5 - nf) / (nf + 1.0) * u;
    }
    chi.powf(p) * sum
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: [GfdiOrder; 3] = [GfdiOrder::Half, GfdiOrder::ThreeHalves, GfdiOrder::FiveHalves];

    fn rel_diff(a: f64, b: f64) -> f64 {
        (a - b).abs() / a.abs().max(b.abs())
    }

    #[test]
    fn complete_integrals_at_zero() {
        // (1 - 2^{-k}) Γ(k+1) ζ(k+1)
        let exact = [0.678_094, 1.152_804, 3.082_586];
        for (order, want) in ORDERS.iter().zip(exact) {
            let got = gfdi(*order, 0.0, 0.0).unwrap();
            assert!(rel_diff(got, want) < 1e-3, "{order:?}: {got} vs {want}");
        }
    }

    #[test]
    fn non_degenerate_limit() {
        // F_{1/2} -> Γ(3/2) e^χ
        let chi = -20.0;
        let got = gfdi(GfdiOrder::Half, chi, 0.0).unwrap();
        assert!(rel_diff(got, 0.886_226_9 * f64::exp(chi)) < 1e-4);
    }

    #[test]
    fn degenerate_limit() {
        let chi: f64 = 50.0;
        let got = gfdi(GfdiOrder::Half, chi, 0.0).unwrap();
        let sommerfeld = chi.powf(1.5) / 1.5 + PI * PI / 12.0 / chi.sqrt();
        assert!(rel_diff(got, sommerfeld) < 1e-9);
    }

    #[test]
    fn continuous_across_regime_windows() {
        for order in ORDERS {
            for tau in [0.0, 1e-3, 0.5, 10.0] {
                for edge in [SMALL_MAX, SMALL_TO_MID, MID_MAX, MID_TO_LARGE] {
                    let below = gfdi(order, edge - 1e-12, tau).unwrap();
                    let above = gfdi(order, edge + 1e-12, tau).unwrap();
                    assert!(
                        rel_diff(below, above) < 1e-10,
                        "{order:?} tau={tau} edge={edge}: {below} vs {above}"
                    );
                }
            }
        }
    }

    #[test]
    fn leading_term_series_matches_closed_form() {
        // χτ = 0.12: closed form still well conditioned, series still converging
        let (chi, tau): (f64, f64) = (20.0, 0.006);
        let r = (chi * (1.0 + chi * tau / 2.0)).sqrt();
        for order in ORDERS {
            let k = order.index();
            let closed = sommerfeld_leading(k, chi, tau, r);
            let series = sommerfeld_series(k, chi, tau);
            assert!(rel_diff(closed, series) < 1e-12, "{order:?}: {closed} vs {series}");
        }
    }

    #[test]
    fn weakly_relativistic_large_chi_is_smooth() {
        for order in ORDERS {
            for tau in [1e-5, 1e-3, 5e-3] {
                let a = gfdi(order, 14.1, tau).unwrap();
                let b = gfdi(order, 14.1 + 1e-9, tau).unwrap();
                assert!(b >= a && rel_diff(a, b) < 1e-9, "{order:?} tau={tau}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn no_jump_inside_windows() {
        for order in ORDERS {
            for tau in [0.0, 0.5] {
                for (lo, centre, hi) in [(0.589, 0.60, 0.611), (13.89, 14.0, 14.11)] {
                    let g_lo = gfdi(order, lo, tau).unwrap();
                    let g_c = gfdi(order, centre, tau).unwrap();
                    let g_hi = gfdi(order, hi, tau).unwrap();
                    assert!(g_lo < g_c && g_c < g_hi);
                    assert!(rel_diff(g_c, 0.5 * (g_lo + g_hi)) < 1e-2);
                }
            }
        }
    }

    #[test]
    fn relativistic_correction_increases_integral() {
        for chi in [-3.0, 0.3, 5.0, 30.0] {
            let classical = gfdi(GfdiOrder::Half, chi, 0.0).unwrap();
            let relativistic = gfdi(GfdiOrder::Half, chi, 0.1).unwrap();
            assert!(relativistic > classical);
        }
    }

    #[test]
    fn tau_above_domain_fails() {
        let err = gfdi(GfdiOrder::Half, 1.0, 100.5).unwrap_err();
        assert_eq!(err, PlasmaError::ApproximationDomain { tau: 100.5 });
        assert!(gfdi(GfdiOrder::Half, 1.0, 100.0).is_ok());
    }

    #[test]
    fn negative_tau_fails() {
        assert!(matches!(
            gfdi(GfdiOrder::Half, 1.0, -1.0),
            Err(PlasmaError::NonPhysical { .. })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn order() -> impl Strategy<Value = GfdiOrder> {
        prop_oneof![
            Just(GfdiOrder::Half),
            Just(GfdiOrder::ThreeHalves),
            Just(GfdiOrder::FiveHalves),
        ]
    }

    proptest! {
        #[test]
        fn increasing_in_chi(
            order in order(),
            chi in -30.0_f64..60.0,
            step in 1e-3_f64..5.0,
            tau in prop_oneof![Just(0.0_f64), 1e-3_f64..10.0],
        ) {
            let g1 = gfdi(order, chi, tau).unwrap();
            let g2 = gfdi(order, chi + step, tau).unwrap();
            prop_assert!(g1 < g2, "F({chi}) = {g1} >= F({}) = {g2}", chi + step);
        }

        #[test]
        fn positive_and_finite(order in order(), chi in -30.0_f64..1.0e4, tau in 0.0_f64..100.0) {
            let g = gfdi(order, chi, tau).unwrap();
            prop_assert!(g.is_finite() && g > 0.0);
        }
    }
}
