//! tfdh-core: stable foundation for the TFDH ion-in-plasma workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - constants (CGS physical constants)
//! - units (uom quantities + CGS conversions at the API edge)
//! - error (shared error types)

pub mod constants;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{TfdhError, TfdhResult};
pub use numeric::*;
