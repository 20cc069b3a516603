//! Numerical toolkit for the TFDH solver.
//!
//! Root bracketing and refinement, adaptive quadrature, cubic-spline
//! interpolation and an adaptive embedded Runge-Kutta stepper. Everything
//! operates on plain `f64` and closures; nothing here knows about plasmas.

pub mod bracket;
pub mod error;
pub mod ode;
pub mod quadrature;
pub mod roots;
pub mod spline;

pub use bracket::{
    Bracket, BracketLimits, Bracketing, Expansion, Side, bisect, expand_bracket, find_boundary,
    side_of_residual,
};
pub use error::{NumericError, NumericResult};
pub use ode::{AdaptiveStepper, OdeSystem, StepControl};
pub use quadrature::{Quadrature, QuadratureConfig, integrate};
pub use roots::brent;
pub use spline::CubicSpline;
