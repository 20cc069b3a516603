//! Shooting-method solution of the TFDH potential equation.
//!
//! With f0 = r·φ/q_e and f1 = df0/dr the Poisson equation reads
//!
//! ```text
//! df0/dr = f1
//! df1/dr = −4π q_e r (Σ Z_i n_i(φ) − n_e(φ)),   φ = q_e f0 / r
//! ```
//!
//! Starting from the bare nucleus, f0(r_init) = q_e Z + r_init·dv0 with the
//! unknown slope dv0. A trial is integrated outward until the potential
//! either collapses (f0 ≤ 0) or turns back up ((f1 − f0)/r > 0). Trials
//! ending with φ ≥ 0 had dv0 too high; trials ending with φ < 0 too low. The
//! boundary between the two sets is the physical solution.

use crate::error::{SolverError, SolverResult};
use crate::solution::RadialSolution;
use nalgebra::Vector2;
use std::f64::consts::PI;
use tfdh_core::Tolerances;
use tfdh_core::constants::ELECTRON_CHARGE;
use tfdh_numerics::{
    AdaptiveStepper, BracketLimits, Expansion, NumericError, OdeSystem, Side, StepControl,
    find_boundary,
};
use tfdh_plasma::{Element, PlasmaState, eos};
use tracing::{debug, info, warn};

/// Controls for the shooting search and each trial integration.
#[derive(Clone, Debug, PartialEq)]
pub struct ShootingConfig {
    /// Inner radius as a fraction of the Wigner-Seitz radius.
    pub r_init_fraction: f64,
    /// Outer radius as a multiple of the Wigner-Seitz radius.
    pub r_final_multiple: f64,
    /// Per-step error tolerances of the embedded Runge-Kutta pair.
    pub ode_tolerances: Tolerances,
    /// Each step is capped at this fraction of the current radius.
    pub max_step_ratio: f64,
    /// Decrement of dv0 while bracketing.
    pub dv0_step: f64,
    pub max_bracket_attempts: usize,
    pub max_bisections: usize,
    /// Attempted steps per trial integration.
    pub max_ode_steps: usize,
}

impl Default for ShootingConfig {
    fn default() -> Self {
        Self {
            r_init_fraction: 1e-4,
            r_final_multiple: 1e3,
            ode_tolerances: Tolerances::new(1e-6, 0.0),
            max_step_ratio: 0.2,
            dv0_step: 100.0,
            max_bracket_attempts: 100,
            max_bisections: 100,
            max_ode_steps: 100_000,
        }
    }
}

impl ShootingConfig {
    pub fn validate(&self) -> SolverResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.r_init_fraction) || !positive(self.r_final_multiple) {
            return Err(SolverError::InvalidArg {
                what: "radial bounds must be positive",
            });
        }
        if self.r_init_fraction >= self.r_final_multiple {
            return Err(SolverError::InvalidArg {
                what: "inner radius must lie inside outer radius",
            });
        }
        if !positive(self.max_step_ratio) || !positive(self.dv0_step) {
            return Err(SolverError::InvalidArg {
                what: "step ratio and dv0 step must be positive",
            });
        }
        if self.ode_tolerances.abs < 0.0
            || self.ode_tolerances.rel < 0.0
            || self.ode_tolerances.abs + self.ode_tolerances.rel <= 0.0
        {
            return Err(SolverError::InvalidArg {
                what: "ODE tolerances must be non-negative and not both zero",
            });
        }
        if self.max_ode_steps == 0 {
            return Err(SolverError::InvalidArg {
                what: "max_ode_steps must be positive",
            });
        }
        Ok(())
    }

    fn step_control(&self) -> StepControl {
        StepControl {
            tolerances: self.ode_tolerances,
            max_steps: self.max_ode_steps,
            ..StepControl::default()
        }
    }

    fn limits(&self) -> BracketLimits {
        BracketLimits {
            max_expansions: self.max_bracket_attempts,
            max_bisections: self.max_bisections,
            tolerances: Tolerances::new(0.0, 0.0),
        }
    }
}

/// ODE state: f0 = r·φ/q_e and its radial derivative f1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PotentialState {
    pub r_phi: f64,
    pub slope: f64,
}

impl PotentialState {
    /// Bare nucleus of charge Z perturbed by the linear term dv0.
    pub fn initial(element: &Element, r_init: f64, dv0: f64) -> Self {
        Self {
            r_phi: ELECTRON_CHARGE * element.charge() + r_init * dv0,
            slope: dv0,
        }
    }

    /// Potential energy φ (erg) of an electron at radius `r`.
    pub fn potential(&self, r: f64) -> f64 {
        ELECTRON_CHARGE * self.r_phi / r
    }

    /// Collapsed (f0 ≤ 0) or diverging ((f1 − f0)/r > 0).
    pub fn is_terminal(&self, r: f64) -> bool {
        self.r_phi <= 0.0 || (self.slope - self.r_phi) / r > 0.0
    }

    fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.r_phi, self.slope)
    }

    fn from_vector(v: &Vector2<f64>) -> Self {
        Self {
            r_phi: v[0],
            slope: v[1],
        }
    }
}

/// The TFDH Poisson equation for a given plasma.
struct TfdhSystem<'a> {
    state: &'a PlasmaState,
}

impl OdeSystem<2> for TfdhSystem<'_> {
    type Error = SolverError;

    fn rhs(&mut self, r: f64, y: &Vector2<f64>) -> SolverResult<Vector2<f64>> {
        let f = PotentialState::from_vector(y);
        let phi = f.potential(r);
        if !phi.is_finite() {
            return Err(NumericError::NonFinite {
                what: "trial potential",
                value: phi,
            }
            .into());
        }
        let ne = eos::ne(phi, self.state)?;
        let ion = eos::total_ion_charge_density(phi, self.state);
        Ok(Vector2::new(
            f.slope,
            -4.0 * PI * ELECTRON_CHARGE * r * (ion - ne),
        ))
    }
}

/// Radial domain of a solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialBounds {
    pub r_init: f64,
    pub r_final: f64,
}

impl RadialBounds {
    pub fn for_ion(element: &Element, state: &PlasmaState, config: &ShootingConfig) -> Self {
        let rws = eos::radius_wigner_seitz(element, state);
        Self {
            r_init: config.r_init_fraction * rws,
            r_final: config.r_final_multiple * rws,
        }
    }
}

/// One trial integration, recorded after every accepted step.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub radius: Vec<f64>,
    pub potential: Vec<f64>,
}

impl Trajectory {
    /// A trial ending at φ ≥ 0 diverged: its slope was too high.
    pub fn side(&self) -> Side {
        match self.potential.last() {
            Some(&phi) if phi >= 0.0 => Side::Above,
            _ => Side::Below,
        }
    }
}

/// Integrate one trial slope until the potential turns unphysical.
pub fn integrate_trial(
    element: &Element,
    state: &PlasmaState,
    bounds: RadialBounds,
    dv0: f64,
    config: &ShootingConfig,
) -> SolverResult<Trajectory> {
    let RadialBounds { r_init, r_final } = bounds;
    let mut system = TfdhSystem { state };
    let mut stepper = AdaptiveStepper::new(config.step_control(), r_init);

    let start = PotentialState::initial(element, r_init, dv0);
    let mut y = start.to_vector();
    let mut r = r_init;
    let mut radius = vec![r_init];
    let mut potential = vec![start.potential(r_init)];

    while r < r_final {
        stepper.cap_step(config.max_step_ratio * r);
        stepper.apply(&mut system, &mut r, r_final, &mut y)?;
        let f = PotentialState::from_vector(&y);
        radius.push(r);
        potential.push(f.potential(r));
        if f.is_terminal(r) {
            return Ok(Trajectory { radius, potential });
        }
    }

    Err(SolverError::OuterRadiusReached { r_final, dv0 })
}

/// Converged shooting result.
#[derive(Clone, Debug, PartialEq)]
pub struct Shot {
    pub solution: RadialSolution,
    /// Critical initial slope dv0 (esu/cm).
    pub dv0: f64,
    pub bounds: RadialBounds,
    /// Number of trial integrations performed, including the final one.
    pub integrations: usize,
}

/// Search downward from dv0 = 0 for the boundary between diverging and
/// collapsing trials.
///
/// A zero slope that already collapses is taken as the answer (a degenerate
/// `[0, 0]` bracket); the search never steps up.
fn critical_slope<F>(config: &ShootingConfig, mut classify: F) -> SolverResult<f64>
where
    F: FnMut(f64) -> SolverResult<Side>,
{
    let origin = classify(0.0)?;
    if origin != Side::Above {
        if origin == Side::Below {
            warn!("unperturbed trial already collapses, keeping dv0 = 0");
        }
        return Ok(0.0);
    }

    let mut known = Some(origin);
    find_boundary(
        0.0,
        Expansion::Linear {
            step: config.dv0_step,
        },
        config.limits(),
        |dv0| match known.take() {
            Some(side) if dv0 == 0.0 => Ok(side),
            _ => classify(dv0),
        },
    )
    .map_err(SolverError::from_shooting)
}

/// Solve for the screened potential around `element` in `state`.
pub fn solve(element: &Element, state: &PlasmaState, config: &ShootingConfig) -> SolverResult<Shot> {
    config.validate()?;
    let bounds = RadialBounds::for_ion(element, state, config);
    let mut integrations = 0usize;

    let dv0 = critical_slope(config, |dv0| {
        integrations += 1;
        let trial = integrate_trial(element, state, bounds, dv0, config)?;
        let side = trial.side();
        debug!(
            dv0,
            ?side,
            steps = trial.radius.len() - 1,
            r_end = trial.radius.last().copied().unwrap_or(bounds.r_init),
            "shooting trial"
        );
        Ok(side)
    })?;

    let trial = integrate_trial(element, state, bounds, dv0, config)?;
    integrations += 1;
    info!(
        element = %element,
        dv0,
        integrations,
        points = trial.radius.len(),
        "shooting converged"
    );

    let solution = RadialSolution::new(trial.radius, trial.potential)?;
    Ok(Shot {
        solution,
        dv0,
        bounds,
        integrations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfdh_core::constants::K_BOLTZMANN;
    use tfdh_plasma::Composition;

    fn plasma() -> PlasmaState {
        let comp = Composition::from_mass_fractions(vec![
            (Element::HYDROGEN, 0.5),
            (Element::HELIUM, 0.5),
        ])
        .unwrap();
        PlasmaState::new(1.0, 1.0e6 * K_BOLTZMANN, comp, false).unwrap()
    }

    #[test]
    fn config_defaults() {
        let c = ShootingConfig::default();
        assert_eq!(c.r_init_fraction, 1e-4);
        assert_eq!(c.r_final_multiple, 1e3);
        assert_eq!(c.max_step_ratio, 0.2);
        assert_eq!(c.dv0_step, 100.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let c = ShootingConfig {
            r_init_fraction: 10.0,
            r_final_multiple: 1.0,
            ..ShootingConfig::default()
        };
        assert!(matches!(c.validate(), Err(SolverError::InvalidArg { .. })));
    }

    #[test]
    fn terminal_conditions() {
        let collapsed = PotentialState {
            r_phi: -1e-12,
            slope: -1.0,
        };
        assert!(collapsed.is_terminal(1e-8));
        let turning = PotentialState {
            r_phi: 1e-15,
            slope: 1e-3,
        };
        assert!(turning.is_terminal(1e-8));
        let screening = PotentialState {
            r_phi: 1e-9,
            slope: -0.1,
        };
        assert!(!screening.is_terminal(1e-8));
    }

    #[test]
    fn initial_state_is_bare_nucleus() {
        let s = PotentialState::initial(&Element::CARBON, 1e-12, 0.0);
        let phi = s.potential(1e-12);
        let coulomb = 6.0 * ELECTRON_CHARGE * ELECTRON_CHARGE / 1e-12;
        assert!((phi / coulomb - 1.0).abs() < 1e-14);
    }

    #[test]
    fn collapsing_zero_slope_is_kept() {
        let config = ShootingConfig::default();
        let mut trials = Vec::new();
        let dv0 = critical_slope(&config, |dv0| {
            trials.push(dv0);
            Ok(Side::Below)
        })
        .unwrap();
        assert_eq!(dv0, 0.0);
        assert_eq!(trials, vec![0.0]);
    }

    #[test]
    fn slope_search_only_steps_down() {
        let config = ShootingConfig::default();
        let mut trials = Vec::new();
        let dv0 = critical_slope(&config, |dv0| {
            trials.push(dv0);
            Ok(if dv0 > -250.0 { Side::Above } else { Side::Below })
        })
        .unwrap();
        assert!((dv0 + 250.0).abs() < 1e-6, "dv0 = {dv0}");
        assert!(trials.iter().all(|&t| t <= 0.0));
        assert_eq!(trials.iter().filter(|&&t| t == 0.0).count(), 1);
    }

    #[test]
    fn unscreened_slope_diverges_and_steep_slope_collapses() {
        let state = plasma();
        let config = ShootingConfig::default();
        let bounds = RadialBounds::for_ion(&Element::CARBON, &state, &config);
        let high = integrate_trial(&Element::CARBON, &state, bounds, 0.0, &config).unwrap();
        assert_eq!(high.side(), Side::Above);
        let low = integrate_trial(&Element::CARBON, &state, bounds, -100.0, &config).unwrap();
        assert_eq!(low.side(), Side::Below);
        assert!(high.radius.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn outer_radius_too_small_is_fatal() {
        let state = plasma();
        // outer radius well inside the screening length
        let config = ShootingConfig {
            r_final_multiple: 1e-2,
            ..ShootingConfig::default()
        };
        let err = solve(&Element::CARBON, &state, &config).unwrap_err();
        assert!(matches!(err, SolverError::OuterRadiusReached { .. }), "{err}");
    }

    #[test]
    fn tiny_bracket_budget_is_fatal() {
        let state = plasma();
        let config = ShootingConfig {
            dv0_step: 1e-6,
            max_bracket_attempts: 3,
            ..ShootingConfig::default()
        };
        let err = solve(&Element::CARBON, &state, &config).unwrap_err();
        assert!(
            matches!(err, SolverError::ShootingBracketExhausted { attempts: 3, .. }),
            "{err}"
        );
    }
}
