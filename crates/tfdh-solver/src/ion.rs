//! One impurity ion solved and analysed in a plasma.

use crate::analysis::{EnergyDeltas, bound_electrons, embedding_energy, exclusion_radii};
use crate::error::SolverResult;
use crate::shooting::{ShootingConfig, solve};
use crate::solution::RadialSolution;
use tfdh_plasma::{Element, PlasmaState, eos};
use tracing::info;

/// Converged potential of one ion together with the quantities derived from
/// it.
#[derive(Debug, Clone)]
pub struct TfdhIon {
    element: Element,
    state: PlasmaState,
    cutoff: f64,
    solution: RadialSolution,
    dv0: f64,
    bound_electrons: f64,
    exclusion_radii: Vec<f64>,
    energies: EnergyDeltas,
}

impl TfdhIon {
    /// Solve with default solver settings and no bound-electron cutoff.
    pub fn new(element: Element, state: PlasmaState) -> SolverResult<Self> {
        Self::with_config(element, state, 0.0, &ShootingConfig::default())
    }

    pub fn with_config(
        element: Element,
        state: PlasmaState,
        cutoff: f64,
        config: &ShootingConfig,
    ) -> SolverResult<Self> {
        let shot = solve(&element, &state, config)?;
        let solution = shot.solution;
        let bound = bound_electrons(&solution, &state, &element, cutoff)?;
        let exclusion = exclusion_radii(&solution, &element, &state)?;
        let energies = embedding_energy(&solution, &state, &element)?;

        info!(
            element = %element,
            bound,
            z_net = element.charge() - bound,
            embedding_kt = energies.total / state.kt(),
            "ion solved"
        );

        Ok(Self {
            element,
            state,
            cutoff,
            solution,
            dv0: shot.dv0,
            bound_electrons: bound,
            exclusion_radii: exclusion,
            energies,
        })
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn state(&self) -> &PlasmaState {
        &self.state
    }

    /// Bound-electron cutoff in units of kT.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn solution(&self) -> &RadialSolution {
        &self.solution
    }

    /// Converged initial slope of the shooting solve.
    pub fn dv0(&self) -> f64 {
        self.dv0
    }

    pub fn bound_electrons(&self) -> f64 {
        self.bound_electrons
    }

    /// Z minus the bound-electron count.
    pub fn z_net(&self) -> f64 {
        self.element.charge() - self.bound_electrons
    }

    /// Exclusion radius per plasma species, in composition order (cm).
    pub fn exclusion_radii(&self) -> &[f64] {
        &self.exclusion_radii
    }

    pub fn energies(&self) -> &EnergyDeltas {
        &self.energies
    }

    pub fn radius_wigner_seitz(&self) -> f64 {
        eos::radius_wigner_seitz(&self.element, &self.state)
    }
}
