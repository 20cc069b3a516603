//! TFDH ion-in-plasma solver.
//!
//! The self-consistent potential around one impurity nucleus is found by a
//! shooting method: the Poisson equation with a Thomas-Fermi-Dirac charge
//! density is integrated outward for trial values of the unknown initial
//! slope, each trial is classified by whether the potential diverges or
//! collapses, and the boundary between the two outcomes is bisected.
//!
//! The converged radial potential is then post-processed into bound-electron
//! counts, exclusion radii and an embedding-energy decomposition.

pub mod analysis;
pub mod batch;
pub mod error;
pub mod ion;
pub mod profile;
pub mod radial;
pub mod report;
pub mod shooting;
pub mod solution;

pub use analysis::{
    EnergyDeltas, bound_electron_density, bound_electrons, embedding_energy, exclusion_radii,
};
pub use batch::{BatchCase, solve_batch};
pub use error::{SolverError, SolverResult};
pub use ion::TfdhIon;
pub use profile::{ProfileRow, RadialProfile};
pub use radial::{accumulate_over_radius, integrate_over_radius};
pub use report::{ExclusionRadius, IonSummary, write_profile, write_summary, write_summary_json};
pub use shooting::{
    PotentialState, RadialBounds, ShootingConfig, Shot, Trajectory, integrate_trial, solve,
};
pub use solution::RadialSolution;
