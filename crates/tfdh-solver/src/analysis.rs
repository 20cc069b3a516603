//! Global quantities derived from a converged potential.

use crate::error::SolverResult;
use crate::radial::integrate_over_radius;
use crate::solution::RadialSolution;
use serde::{Deserialize, Serialize};
use tfdh_core::Tolerances;
use tfdh_core::constants::QE_SQUARED;
use tfdh_numerics::brent;
use tfdh_plasma::{Element, PlasmaState, eos};
use tracing::debug;

const EXCLUSION_MAX_ITER: usize = 200;

/// Bound-electron density at every solution sample.
pub fn bound_electron_density(
    solution: &RadialSolution,
    state: &PlasmaState,
    cutoff: f64,
) -> SolverResult<Vec<f64>> {
    solution.map_potential(|_, phi| Ok(eos::ne_bound(phi, state, cutoff)?))
}

/// Number of electrons bound by more than `cutoff`·kT around the ion,
/// limited to `[0, Z]`.
pub fn bound_electrons(
    solution: &RadialSolution,
    state: &PlasmaState,
    element: &Element,
    cutoff: f64,
) -> SolverResult<f64> {
    let density = bound_electron_density(solution, state, cutoff)?;
    let count = integrate_over_radius(solution.radii(), &density)?;
    Ok(count.clamp(0.0, element.charge()))
}

/// Radius where Z_i·φ(r) = kT for each ion species, in composition order.
pub fn exclusion_radii(
    solution: &RadialSolution,
    element: &Element,
    state: &PlasmaState,
) -> SolverResult<Vec<f64>> {
    let (lo, hi) = solution.domain();
    let rws = eos::radius_wigner_seitz(element, state);
    let tol = Tolerances::new(1e-6 * rws, 1e-6);
    state
        .composition()
        .iter()
        .map(|a| {
            let z = a.element().charge();
            let r = brent(
                |r| z * solution.potential_at(r) - state.kt(),
                lo,
                hi,
                tol,
                EXCLUSION_MAX_ITER,
            )?;
            debug!(species = a.element().name(), r, "exclusion radius");
            Ok(r)
        })
        .collect()
}

/// Embedding energy of the ion, split by origin (erg).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergyDeltas {
    /// ∫ φ Σ Z_i n_i dV
    pub ion_field: f64,
    /// −∫ φ n_e dV
    pub electron_field: f64,
    /// Field energy counted twice by the two terms above.
    pub double_counting: f64,
    pub ion_kinetic: f64,
    pub electron_kinetic: f64,
    /// Kinetic energy carried by ions leaving the cell.
    pub ion_exchange: f64,
    /// Kinetic energy carried by electrons entering the cell.
    pub electron_exchange: f64,
    /// Field, double-counting and kinetic terms.
    pub total: f64,
}

impl EnergyDeltas {
    pub fn total_with_exchange(&self) -> f64 {
        self.total - self.ion_exchange - self.electron_exchange
    }

    /// Every term divided by `kt`.
    pub fn in_units_of(&self, kt: f64) -> Self {
        Self {
            ion_field: self.ion_field / kt,
            electron_field: self.electron_field / kt,
            double_counting: self.double_counting / kt,
            ion_kinetic: self.ion_kinetic / kt,
            electron_kinetic: self.electron_kinetic / kt,
            ion_exchange: self.ion_exchange / kt,
            electron_exchange: self.electron_exchange / kt,
            total: self.total / kt,
        }
    }
}

/// Energy change from embedding `element` in `state`.
///
/// Energy densities are integrated in units of kT and scaled back to erg.
pub fn embedding_energy(
    solution: &RadialSolution,
    state: &PlasmaState,
    element: &Element,
) -> SolverResult<EnergyDeltas> {
    let kt = state.kt();
    let radii = solution.radii();
    let in_kt = |values: Vec<f64>| -> SolverResult<f64> {
        Ok(kt * integrate_over_radius(radii, &values)?)
    };

    let ion_field = in_kt(solution.map_potential(|_, phi| {
        Ok(phi / kt * eos::total_ion_charge_density(phi, state))
    })?)?;

    let electron_field =
        in_kt(solution.map_potential(|_, phi| Ok(-phi / kt * eos::ne(phi, state)?))?)?;

    let z = element.charge();
    let double_counting = in_kt(solution.map_potential(|r, phi| {
        let external = z * QE_SQUARED / r;
        let net = eos::total_ion_charge_density(phi, state) - eos::ne(phi, state)?;
        Ok(0.5 * net * (external - phi) / kt)
    })?)?;

    let mut ion_number = 0.0;
    for (species, n0) in state.ni().iter().enumerate() {
        let delta = solution.map_potential(|_, phi| Ok(eos::ni(phi, state)[species] - n0))?;
        ion_number += integrate_over_radius(radii, &delta)?;
    }
    let ion_kinetic = 1.5 * kt * ion_number;

    let ekin0 = eos::electron_kinetic_energy_density(0.0, state)?;
    let electron_kinetic = in_kt(solution.map_potential(|_, phi| {
        Ok((eos::electron_kinetic_energy_density(phi, state)? - ekin0) / kt)
    })?)?;

    let ne0 = state.ne();
    let electron_delta = solution.map_potential(|_, phi| Ok(eos::ne(phi, state)? - ne0))?;
    let electron_number = integrate_over_radius(radii, &electron_delta)?;

    let deltas = EnergyDeltas {
        ion_field,
        electron_field,
        double_counting,
        ion_kinetic,
        electron_kinetic,
        ion_exchange: ion_kinetic,
        electron_exchange: ekin0 / ne0 * electron_number,
        total: ion_field + electron_field + double_counting + ion_kinetic + electron_kinetic,
    };
    debug!(total_kt = deltas.total / kt, "embedding energy");
    Ok(deltas)
}
