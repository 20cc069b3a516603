//! Physical constants in CGS units.

use std::f64::consts::PI;

// nuclear physics constants
pub const PROTON_MASS: f64 = 1.672621e-24; // g
pub const ELECTRON_MASS: f64 = 9.1093826e-28; // g
pub const ELECTRON_CHARGE: f64 = 4.80320441e-10; // esu

// other constants
pub const H_PLANCK: f64 = 6.6260693e-27; // erg s
pub const HBAR: f64 = 1.05457168e-27; // erg s
pub const K_BOLTZMANN: f64 = 1.3806505e-16; // erg / K
pub const SPEED_OF_LIGHT: f64 = 2.99792458e10; // cm / s

// useful combinations
pub const ME_CC: f64 = ELECTRON_MASS * SPEED_OF_LIGHT * SPEED_OF_LIGHT;
pub const MP_CC: f64 = PROTON_MASS * SPEED_OF_LIGHT * SPEED_OF_LIGHT;
pub const QE_SQUARED: f64 = ELECTRON_CHARGE * ELECTRON_CHARGE;

// useful physical scales
pub const BOHR_RADIUS: f64 = 5.2917721e-9; // cm

/// Prefactor `(2 m_e)^{3/2} / (2 π² ħ³)` of the free-electron number density.
///
/// Multiplied by `kT^{3/2}` and a Fermi-Dirac integral it gives n_e in cm⁻³.
#[inline]
pub fn ne_prefactor() -> f64 {
    (2.0 * ELECTRON_MASS).powf(1.5) / (2.0 * PI * PI * HBAR * HBAR * HBAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_mass_energy_is_511_kev() {
        let kev = 1.602176634e-9; // erg
        assert!((ME_CC / kev - 511.0).abs() < 0.1);
    }

    #[test]
    fn ne_prefactor_magnitude() {
        // (2 m_e)^{3/2} / (2 pi^2 hbar^3) ~ 3.36e39 erg^{-3/2} cm^{-3}
        let pf = ne_prefactor();
        assert!(pf > 3.3e39 && pf < 3.4e39, "prefactor = {pf}");
    }
}
