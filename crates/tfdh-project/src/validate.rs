//! Case file validation logic.

use crate::schema::{CaseDef, CaseFile, ElementDef, PlasmaDef, SolverOverridesDef};
use std::collections::HashSet;
use tfdh_plasma::Element;

pub const LATEST_VERSION: u32 = 1;

/// Tolerance on the mass fraction sum, matching `Composition::new`.
const MASS_FRACTION_SUM_TOL: f64 = 1e-12;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown element '{key}' in {context}")]
    UnknownElement { key: String, context: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_case_file(file: &CaseFile) -> Result<(), ValidationError> {
    if file.version == 0 || file.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    let mut ids = HashSet::new();
    for case in &file.cases {
        if !ids.insert(&case.id) {
            return Err(ValidationError::DuplicateId {
                id: case.id.clone(),
                context: "cases".to_string(),
            });
        }
        validate_case(case)?;
    }
    Ok(())
}

fn invalid(case: &CaseDef, field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: format!("{}.{}", case.id, field),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn validate_case(case: &CaseDef) -> Result<(), ValidationError> {
    if case.id.trim().is_empty() {
        return Err(invalid(case, "id", "''", "must not be empty"));
    }
    resolve_element(&case.element, &format!("case '{}' element", case.id))?;
    validate_plasma(case, &case.plasma)?;
    if !case.cutoff.is_finite() || case.cutoff < 0.0 {
        return Err(invalid(case, "cutoff", case.cutoff, "must be non-negative"));
    }
    validate_solver(case, &case.solver)
}

fn validate_plasma(case: &CaseDef, plasma: &PlasmaDef) -> Result<(), ValidationError> {
    if !positive(plasma.density_g_cc) {
        return Err(invalid(
            case,
            "plasma.density_g_cc",
            plasma.density_g_cc,
            "must be positive",
        ));
    }
    let t = plasma.temperature.value();
    if !positive(t) {
        return Err(invalid(case, "plasma.temperature", t, "must be positive"));
    }
    if plasma.composition.is_empty() {
        return Err(invalid(case, "plasma.composition", "[]", "must not be empty"));
    }

    let mut sum = 0.0;
    for (i, abundance) in plasma.composition.iter().enumerate() {
        resolve_element(
            &abundance.element,
            &format!("case '{}' composition[{i}]", case.id),
        )?;
        let x = abundance.mass_fraction;
        if !(x.is_finite() && x > 0.0 && x <= 1.0) {
            return Err(invalid(
                case,
                &format!("plasma.composition[{i}].mass_fraction"),
                x,
                "must lie in (0, 1]",
            ));
        }
        sum += x;
    }
    if (sum - 1.0).abs() > MASS_FRACTION_SUM_TOL {
        return Err(invalid(
            case,
            "plasma.composition",
            sum,
            "mass fractions must sum to 1",
        ));
    }
    Ok(())
}

fn validate_solver(case: &CaseDef, solver: &SolverOverridesDef) -> Result<(), ValidationError> {
    let reals = [
        ("solver.r_init_fraction", solver.r_init_fraction),
        ("solver.r_final_multiple", solver.r_final_multiple),
        ("solver.max_step_ratio", solver.max_step_ratio),
        ("solver.dv0_step", solver.dv0_step),
    ];
    for (field, value) in reals {
        if let Some(v) = value {
            if !positive(v) {
                return Err(invalid(case, field, v, "must be positive"));
            }
        }
    }
    for (field, value) in [
        ("solver.ode_abs_tol", solver.ode_abs_tol),
        ("solver.ode_rel_tol", solver.ode_rel_tol),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(case, field, v, "must be non-negative"));
            }
        }
    }
    let counts = [
        ("solver.max_bracket_attempts", solver.max_bracket_attempts),
        ("solver.max_bisections", solver.max_bisections),
        ("solver.max_ode_steps", solver.max_ode_steps),
    ];
    for (field, value) in counts {
        if value == Some(0) {
            return Err(invalid(case, field, 0, "must be at least 1"));
        }
    }
    Ok(())
}

/// Look up a catalog key or build an explicit element.
pub fn resolve_element(def: &ElementDef, context: &str) -> Result<Element, ValidationError> {
    match def {
        ElementDef::Symbol(key) => key.parse().map_err(|_| ValidationError::UnknownElement {
            key: key.clone(),
            context: context.to_string(),
        }),
        ElementDef::Explicit { a, z, name } => {
            Element::new(*a, *z, name.clone()).map_err(|e| ValidationError::InvalidValue {
                field: context.to_string(),
                value: format!("A={a}, Z={z}"),
                reason: e.to_string(),
            })
        }
    }
}
