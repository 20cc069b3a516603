//! Independent ion solves run in parallel.

use crate::error::SolverResult;
use crate::ion::TfdhIon;
use crate::shooting::ShootingConfig;
use rayon::prelude::*;
use tfdh_plasma::{Element, PlasmaState};
use tracing::{info, warn};

/// Inputs of one ion solve.
#[derive(Debug, Clone)]
pub struct BatchCase {
    pub id: String,
    pub element: Element,
    pub state: PlasmaState,
    /// Bound-electron cutoff in units of kT.
    pub cutoff: f64,
    pub config: ShootingConfig,
}

impl BatchCase {
    pub fn new(id: impl Into<String>, element: Element, state: PlasmaState) -> Self {
        Self {
            id: id.into(),
            element,
            state,
            cutoff: 0.0,
            config: ShootingConfig::default(),
        }
    }

    pub fn solve(&self) -> SolverResult<TfdhIon> {
        TfdhIon::with_config(
            self.element.clone(),
            self.state.clone(),
            self.cutoff,
            &self.config,
        )
    }
}

/// Solve every case on the rayon pool; results keep the input order.
pub fn solve_batch(cases: &[BatchCase]) -> Vec<SolverResult<TfdhIon>> {
    info!(
        cases = cases.len(),
        threads = rayon::current_num_threads(),
        "solving batch"
    );
    cases
        .par_iter()
        .map(|case| {
            let result = case.solve();
            if let Err(err) = &result {
                warn!(id = %case.id, %err, "case failed");
            }
            result
        })
        .collect()
}
