//! Plasma description errors.

use tfdh_core::TfdhError;
use tfdh_numerics::NumericError;
use thiserror::Error;

/// Result type for plasma operations.
pub type PlasmaResult<T> = Result<T, PlasmaError>;

/// Errors raised while describing a plasma or evaluating its equation of state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlasmaError {
    /// Element record outside the periodic table or with A < Z.
    #[error("Invalid element {name} (A={a}, Z={z}): {what}")]
    InvalidElement {
        what: &'static str,
        name: String,
        a: u32,
        z: u32,
    },

    #[error("Mass fraction {value} outside (0, 1]")]
    InvalidMassFraction { value: f64 },

    #[error("Mass fractions sum to {sum}, expected 1")]
    MassFractionSum { sum: f64 },

    #[error("Invalid composition: {what}")]
    InvalidComposition { what: &'static str },

    /// Non-physical values (negative density, temperature, etc.).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    #[error("Unknown element: {key}")]
    UnknownElement { key: String },

    /// The Fermi-Dirac approximation has no validated accuracy here.
    #[error("Fermi-Dirac approximation used outside its domain: tau = {tau} > 100")]
    ApproximationDomain { tau: f64 },

    #[error("Numeric error: {0}")]
    Numeric(#[from] NumericError),

    #[error(transparent)]
    Core(#[from] TfdhError),
}
