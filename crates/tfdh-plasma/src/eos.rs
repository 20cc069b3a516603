//! Equation-of-state closure: densities and energy densities as functions of
//! the local potential energy φ (erg) of an electron.
//!
//! Attractive potentials (φ > 0) raise the local electron degeneracy by
//! ξ = φ/kT and suppress positive ions by exp(−ξ Z). Repulsive potentials are
//! clamped to ξ = 0.

use crate::composition::Composition;
use crate::element::Element;
use crate::error::{PlasmaError, PlasmaResult};
use crate::gfdi::{GfdiOrder, gfdi};
use crate::state::PlasmaState;
use std::f64::consts::PI;
use tfdh_core::constants::{ELECTRON_CHARGE, PROTON_MASS, ne_prefactor};
use tfdh_numerics::{QuadratureConfig, integrate};

/// Quadrature controls for the (dimensionless) bound-electron integral.
const BOUND_QUADRATURE: QuadratureConfig = QuadratureConfig {
    abs: 1e-6,
    rel: 1e-6,
    max_subintervals: 200,
};

/// Half-width (in kT) of the pieces on either side of the Fermi edge.
const FERMI_EDGE_WINDOW: f64 = 50.0;

/// Beyond ξ > NE_BOUND_SATURATION·(1 + max(0, χ + cutoff)) essentially all
/// electrons are bound and the finite integral is replaced by `ne`.
const NE_BOUND_SATURATION: f64 = 1e6;

/// Mass density that yields electron density `ne` in a fully ionized plasma.
pub fn rho_from_ne(ne: f64, composition: &Composition) -> f64 {
    ne * PROTON_MASS * composition.mu_e()
}

/// Free electron density for degeneracy χ, thermal energy kT and relativity τ.
pub fn ne_from_chi(chi: f64, kt: f64, tau: f64) -> PlasmaResult<f64> {
    let i12 = gfdi(GfdiOrder::Half, chi, tau)?;
    let i32 = gfdi(GfdiOrder::ThreeHalves, chi, tau)?;
    Ok(ne_prefactor() * kt.powf(1.5) * (i12 + tau * i32))
}

fn xi(phi: f64, state: &PlasmaState) -> f64 {
    (phi / state.kt()).max(0.0)
}

/// Electron density at local potential energy `phi`.
pub fn ne(phi: f64, state: &PlasmaState) -> PlasmaResult<f64> {
    ne_from_chi(state.chi() + xi(phi, state), state.kt(), state.tau())
}

/// Density of electrons bound by more than `cutoff`·kT at potential `phi`.
///
/// Zero unless φ/kT exceeds both 0 and `cutoff`. The Fermi-Dirac integrand
/// is integrated over kinetic energies `[0, φ/kT − cutoff]`.
pub fn ne_bound(phi: f64, state: &PlasmaState, cutoff: f64) -> PlasmaResult<f64> {
    if !cutoff.is_finite() || cutoff < 0.0 {
        return Err(PlasmaError::NonPhysical {
            what: "bound-electron cutoff",
            value: cutoff,
        });
    }

    let xi = phi / state.kt();
    if !(xi > 0.0 && xi > cutoff) {
        return Ok(0.0);
    }

    let (chi, tau) = (state.chi(), state.tau());
    if xi > NE_BOUND_SATURATION * (1.0 + (chi + cutoff).max(0.0)) {
        return ne(phi, state);
    }

    let occupation = |x: f64| {
        (1.0 + tau * x) * (x + tau * x * x / 2.0).sqrt() / (1.0 + (x - chi - xi).exp())
    };

    // The Fermi edge at x = χ + ξ is a few units wide on a range of length ξ,
    // so it is integrated as separate pieces.
    let upper = xi - cutoff;
    let edge = chi + xi;
    let mut breaks = vec![0.0];
    breaks.extend(
        [edge - FERMI_EDGE_WINDOW, edge, edge + FERMI_EDGE_WINDOW]
            .into_iter()
            .filter(|&x| x > 0.0 && x < upper),
    );
    breaks.push(upper);

    let mut integral = 0.0;
    for piece in breaks.windows(2) {
        integral += integrate(&occupation, piece[0], piece[1], &BOUND_QUADRATURE)?.value;
    }
    let bound = ne_prefactor() * state.kt().powf(1.5) * integral;
    Ok(bound.min(ne(phi, state)?))
}

/// Per-species ion densities at potential `phi`, in composition order.
pub fn ni(phi: f64, state: &PlasmaState) -> Vec<f64> {
    let xi = xi(phi, state);
    state
        .composition()
        .iter()
        .zip(state.ni())
        .map(|(a, n0)| n0 * (-xi * a.element().charge()).exp())
        .collect()
}

/// Σ Z_i n_i at potential `phi` (in units of the elementary charge).
pub fn total_ion_charge_density(phi: f64, state: &PlasmaState) -> f64 {
    let xi = xi(phi, state);
    state
        .composition()
        .iter()
        .zip(state.ni())
        .map(|(a, n0)| {
            let z = a.element().charge();
            z * n0 * (-xi * z).exp()
        })
        .sum()
}

/// Electron kinetic energy density (erg/cm³) at potential `phi`.
pub fn electron_kinetic_energy_density(phi: f64, state: &PlasmaState) -> PlasmaResult<f64> {
    let chi = state.chi() + xi(phi, state);
    let tau = state.tau();
    let i32 = gfdi(GfdiOrder::ThreeHalves, chi, tau)?;
    let i52 = gfdi(GfdiOrder::FiveHalves, chi, tau)?;
    Ok(ne_prefactor() * state.kt().powf(2.5) * (i32 + tau * i52))
}

/// Radius of the sphere holding Z electrons at the bulk electron density.
pub fn radius_wigner_seitz(element: &Element, state: &PlasmaState) -> f64 {
    (3.0 * element.charge() / (4.0 * PI * state.ne())).cbrt()
}

/// Electrostatic self-energy estimate 0.9 (Z q_e)² / r_ws.
pub fn energy_wigner_seitz(element: &Element, state: &PlasmaState) -> f64 {
    let q = ELECTRON_CHARGE * element.charge();
    0.9 * q * q / radius_wigner_seitz(element, state)
}
