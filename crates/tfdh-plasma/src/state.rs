//! Bulk plasma state.

use crate::composition::Composition;
use crate::eos::{ne_from_chi, rho_from_ne};
use crate::error::{PlasmaError, PlasmaResult};
use tfdh_core::{Tolerances, ensure_positive};
use tfdh_core::constants::{ME_CC, PROTON_MASS};
use tfdh_core::units::{Density, Temperature, density_cgs, energy_cgs, thermal_energy};
use tfdh_numerics::{BracketLimits, Expansion, find_boundary, side_of_residual};
use tracing::info;

/// Bracketing budget for the χ inversion. Doubling from ±1 covers any
/// physical degeneracy long before 64 expansions.
const CHI_LIMITS: BracketLimits = BracketLimits {
    max_expansions: 64,
    max_bisections: 200,
    tolerances: Tolerances::machine(),
};

/// One physical plasma condition.
///
/// Primary inputs are the mass density ρ (g/cm³), the thermal energy kT (erg),
/// the composition and whether relativistic corrections are included. The
/// electron and ion densities, τ = kT/(m_e c²) and the degeneracy parameter χ
/// are derived at construction and never change.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaState {
    rho: f64,
    kt: f64,
    composition: Composition,
    relativistic: bool,
    ne: f64,
    ni: Vec<f64>,
    tau: f64,
    chi: f64,
}

impl PlasmaState {
    /// Build a state from mass density (g/cm³) and thermal energy (erg).
    ///
    /// Solves ne(χ, kT, τ) = ρ/(m_p μ_e) for χ by doubling away from χ = 0
    /// until the residual changes sign, then bisecting to machine precision.
    pub fn new(
        rho: f64,
        kt: f64,
        composition: Composition,
        relativistic: bool,
    ) -> PlasmaResult<Self> {
        let rho = ensure_positive(rho, "mass density")?;
        let kt = ensure_positive(kt, "thermal energy")?;

        let ne = rho / (PROTON_MASS * composition.mu_e());
        let ni = composition
            .iter()
            .map(|a| rho * a.mass_fraction() / (PROTON_MASS * a.element().mass_number()))
            .collect();
        let tau = if relativistic { kt / ME_CC } else { 0.0 };
        let chi = invert_for_chi(ne, kt, tau)?;

        info!(rho, kt, ne, tau, chi, "plasma state");

        Ok(Self {
            rho,
            kt,
            composition,
            relativistic,
            ne,
            ni,
            tau,
            chi,
        })
    }

    /// Build a state whose bulk electron density is `ne` (cm⁻³).
    pub fn from_electron_density(
        ne: f64,
        kt: f64,
        composition: Composition,
        relativistic: bool,
    ) -> PlasmaResult<Self> {
        let rho = rho_from_ne(ne, &composition);
        Self::new(rho, kt, composition, relativistic)
    }

    /// Build a state from typed density and temperature; kT = k_B·T.
    pub fn from_quantities(
        density: Density,
        temperature: Temperature,
        composition: Composition,
        relativistic: bool,
    ) -> PlasmaResult<Self> {
        let rho = density_cgs(density);
        let kt = energy_cgs(thermal_energy(temperature));
        Self::new(rho, kt, composition, relativistic)
    }

    /// Mass density (g/cm³).
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Thermal energy kT (erg).
    pub fn kt(&self) -> f64 {
        self.kt
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn is_relativistic(&self) -> bool {
        self.relativistic
    }

    /// Bulk electron density (cm⁻³).
    pub fn ne(&self) -> f64 {
        self.ne
    }

    /// Bulk ion densities (cm⁻³), in composition order.
    pub fn ni(&self) -> &[f64] {
        &self.ni
    }

    /// Relativity parameter kT/(m_e c²); zero when non-relativistic.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Electron degeneracy parameter (chemical potential over kT).
    pub fn chi(&self) -> f64 {
        self.chi
    }
}

fn invert_for_chi(ne_target: f64, kt: f64, tau: f64) -> PlasmaResult<f64> {
    // ne is increasing in chi, so the residual sign says which way to go
    find_boundary(0.0, Expansion::Doubling { seed: 1.0 }, CHI_LIMITS, |chi| {
        let residual = ne_from_chi(chi, kt, tau)? - ne_target;
        Ok::<_, PlasmaError>(side_of_residual(residual))
    })
}
