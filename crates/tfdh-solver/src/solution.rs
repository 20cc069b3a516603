//! Converged radial potential.

use crate::error::{SolverError, SolverResult};
use tfdh_numerics::CubicSpline;

/// Samples (r_i, φ_i) of the electron potential energy, strictly increasing
/// in radius, with a natural cubic spline for evaluation between samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialSolution {
    radius: Vec<f64>,
    potential: Vec<f64>,
    spline: CubicSpline,
}

impl RadialSolution {
    pub fn new(radius: Vec<f64>, potential: Vec<f64>) -> SolverResult<Self> {
        if radius.len() != potential.len() {
            return Err(SolverError::InvalidSolution {
                what: "radius and potential differ in length",
            });
        }
        if radius.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SolverError::InvalidSolution {
                what: "radius must be strictly increasing",
            });
        }
        let spline = CubicSpline::new(&radius, &potential)?;
        Ok(Self {
            radius,
            potential,
            spline,
        })
    }

    pub fn radii(&self) -> &[f64] {
        &self.radius
    }

    pub fn potentials(&self) -> &[f64] {
        &self.potential
    }

    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }

    /// Innermost and outermost sample radius.
    pub fn domain(&self) -> (f64, f64) {
        self.spline.domain()
    }

    /// Spline-interpolated potential; clamped to the sampled domain.
    pub fn potential_at(&self, r: f64) -> f64 {
        self.spline.eval(r)
    }

    /// Apply `f` to every sampled potential.
    pub(crate) fn map_potential<F>(&self, mut f: F) -> SolverResult<Vec<f64>>
    where
        F: FnMut(f64, f64) -> SolverResult<f64>,
    {
        self.radius
            .iter()
            .zip(&self.potential)
            .map(|(&r, &phi)| f(r, phi))
            .collect()
    }
}
