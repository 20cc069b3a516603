//! Compile validated case definitions into solver inputs.

use crate::ProjectResult;
use crate::schema::{CaseDef, CaseFile, OutputsDef, SolverOverridesDef, TemperatureDef};
use crate::validate::resolve_element;
use tfdh_core::Tolerances;
use tfdh_core::units::{Energy, density_cgs, energy_cgs, g_per_cc, kelvin, kev, thermal_energy};
use tfdh_plasma::{Abundance, Composition, PlasmaState};
use tfdh_solver::{BatchCase, ShootingConfig};

/// A case ready to solve, with the outputs it asks for.
#[derive(Debug, Clone)]
pub struct CompiledCase {
    pub case: BatchCase,
    pub outputs: OutputsDef,
}

impl TemperatureDef {
    pub fn thermal_energy(&self) -> Energy {
        match *self {
            TemperatureDef::Kelvin { value } => thermal_energy(kelvin(value)),
            TemperatureDef::KeV { value } => kev(value),
        }
    }
}

impl SolverOverridesDef {
    pub fn apply(&self, base: ShootingConfig) -> ShootingConfig {
        let ode_tolerances = Tolerances::new(
            self.ode_abs_tol.unwrap_or(base.ode_tolerances.abs),
            self.ode_rel_tol.unwrap_or(base.ode_tolerances.rel),
        );
        ShootingConfig {
            r_init_fraction: self.r_init_fraction.unwrap_or(base.r_init_fraction),
            r_final_multiple: self.r_final_multiple.unwrap_or(base.r_final_multiple),
            ode_tolerances,
            max_step_ratio: self.max_step_ratio.unwrap_or(base.max_step_ratio),
            dv0_step: self.dv0_step.unwrap_or(base.dv0_step),
            max_bracket_attempts: self.max_bracket_attempts.unwrap_or(base.max_bracket_attempts),
            max_bisections: self.max_bisections.unwrap_or(base.max_bisections),
            max_ode_steps: self.max_ode_steps.unwrap_or(base.max_ode_steps),
        }
    }
}

pub fn compile_case(def: &CaseDef) -> ProjectResult<CompiledCase> {
    let element = resolve_element(&def.element, &format!("case '{}' element", def.id))?;

    let abundances = def
        .plasma
        .composition
        .iter()
        .enumerate()
        .map(|(i, a)| -> ProjectResult<Abundance> {
            let e = resolve_element(&a.element, &format!("case '{}' composition[{i}]", def.id))?;
            Ok(Abundance::new(a.mass_fraction, e)?)
        })
        .collect::<ProjectResult<Vec<_>>>()?;
    let composition = Composition::new(abundances)?;

    let rho = density_cgs(g_per_cc(def.plasma.density_g_cc));
    let kt = energy_cgs(def.plasma.temperature.thermal_energy());
    let state = PlasmaState::new(rho, kt, composition, def.plasma.relativistic)?;

    let mut case = BatchCase::new(def.id.clone(), element, state);
    case.cutoff = def.cutoff;
    case.config = def.solver.apply(ShootingConfig::default());

    Ok(CompiledCase {
        case,
        outputs: def.outputs.clone(),
    })
}

/// Compile every case, or only those whose id is in `only` when non-empty.
pub fn compile_cases(file: &CaseFile, only: &[String]) -> ProjectResult<Vec<CompiledCase>> {
    file.cases
        .iter()
        .filter(|c| only.is_empty() || only.contains(&c.id))
        .map(compile_case)
        .collect()
}
