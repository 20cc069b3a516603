//! tfdh-plasma: plasma description and equation of state.
//!
//! Provides:
//! - Element catalog and validated element records
//! - Abundances and compositions with the cached mean molecular weight per electron
//! - Generalized Fermi-Dirac integrals (analytic approximation)
//! - Electron/ion densities and energy densities as functions of local potential
//! - `PlasmaState`, including the inversion for the degeneracy parameter
//!
//! # Example
//!
//! ```no_run
//! use tfdh_plasma::{Composition, Element, PlasmaState, eos};
//! use tfdh_core::constants::K_BOLTZMANN;
//!
//! let comp = Composition::from_mass_fractions(vec![
//!     (Element::HYDROGEN, 0.5),
//!     (Element::HELIUM, 0.5),
//! ])
//! .unwrap();
//! let state = PlasmaState::new(1.0, 1.0e6 * K_BOLTZMANN, comp, false).unwrap();
//! let rws = eos::radius_wigner_seitz(&Element::CARBON, &state);
//! println!("chi = {}, r_ws = {rws} cm", state.chi());
//! ```

pub mod composition;
pub mod element;
pub mod eos;
pub mod error;
pub mod gfdi;
pub mod state;

pub use composition::{Abundance, Composition};
pub use element::Element;
pub use error::{PlasmaError, PlasmaResult};
pub use gfdi::{GfdiOrder, gfdi};
pub use state::PlasmaState;
