//! Error types for numerical routines.

use tfdh_core::TfdhError;
use thiserror::Error;

/// Failures of the numerical toolkit.
///
/// Every iterative routine has a fixed budget; running out of it is reported
/// here instead of returning a best guess.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite value in {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Bracket expansion exhausted after {attempts} attempts (last trial {last})")]
    BracketExhausted { attempts: usize, last: f64 },

    #[error("Bisection exhausted after {iterations} iterations (bracket [{below}, {above}])")]
    BisectionExhausted {
        iterations: usize,
        below: f64,
        above: f64,
    },

    #[error("No sign change on [{lo}, {hi}]: f(lo)={f_lo}, f(hi)={f_hi}")]
    NoSignChange {
        lo: f64,
        hi: f64,
        f_lo: f64,
        f_hi: f64,
    },

    #[error("Step size underflow at x={at} (h={step})")]
    StepSizeUnderflow { at: f64, step: f64 },

    #[error("Step limit of {steps} exceeded at x={at}")]
    StepLimitExceeded { at: f64, steps: usize },

    #[error(transparent)]
    Core(#[from] TfdhError),
}

pub type NumericResult<T> = Result<T, NumericError>;
