//! Error types for the shooting solver and post-processing.

use tfdh_numerics::NumericError;
use tfdh_plasma::PlasmaError;
use thiserror::Error;

/// Errors that can occur while solving for or analysing an ion in plasma.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// No trial slope produced the opposite outcome.
    #[error("Shooting bracket exhausted after {attempts} trials (last slope {last_dv0})")]
    ShootingBracketExhausted { attempts: usize, last_dv0: f64 },

    #[error("Shooting bisection exhausted after {iterations} iterations (slope in [{below}, {above}])")]
    ShootingBisectionExhausted {
        iterations: usize,
        below: f64,
        above: f64,
    },

    /// The trial potential neither diverged nor collapsed inside the domain.
    #[error("Integration reached the outer radius {r_final} cm without terminating (slope {dv0})")]
    OuterRadiusReached { r_final: f64, dv0: f64 },

    #[error("Invalid solution: {what}")]
    InvalidSolution { what: &'static str },

    #[error("Plasma error: {0}")]
    Plasma(#[from] PlasmaError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] NumericError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Re-label exhausted bracket/bisection budgets as shooting failures.
    pub(crate) fn from_shooting(err: SolverError) -> SolverError {
        match err {
            SolverError::Numeric(NumericError::BracketExhausted { attempts, last }) => {
                SolverError::ShootingBracketExhausted {
                    attempts,
                    last_dv0: last,
                }
            }
            SolverError::Numeric(NumericError::BisectionExhausted {
                iterations,
                below,
                above,
            }) => SolverError::ShootingBisectionExhausted {
                iterations,
                below,
                above,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shooting_budgets_are_relabelled() {
        let err = SolverError::from_shooting(
            NumericError::BracketExhausted {
                attempts: 100,
                last: -1.0e4,
            }
            .into(),
        );
        assert!(matches!(
            err,
            SolverError::ShootingBracketExhausted { attempts: 100, .. }
        ));

        let err = SolverError::from_shooting(
            NumericError::BisectionExhausted {
                iterations: 100,
                below: -1.0,
                above: 0.0,
            }
            .into(),
        );
        assert!(matches!(err, SolverError::ShootingBisectionExhausted { .. }));
    }

    #[test]
    fn other_errors_pass_through() {
        let err = SolverError::from_shooting(SolverError::OuterRadiusReached {
            r_final: 1.0,
            dv0: 0.0,
        });
        assert!(err.to_string().contains("outer radius"));
    }
}
