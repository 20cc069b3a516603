//! Case file schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseFile {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub cases: Vec<CaseDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Impurity ion placed at the origin.
    pub element: ElementDef,
    pub plasma: PlasmaDef,
    /// Bound-electron cutoff in units of kT.
    #[serde(default)]
    pub cutoff: f64,
    #[serde(default, skip_serializing_if = "SolverOverridesDef::is_empty")]
    pub solver: SolverOverridesDef,
    #[serde(default, skip_serializing_if = "OutputsDef::is_empty")]
    pub outputs: OutputsDef,
}

/// A catalog key such as `"Fe56"`, or an explicit nucleus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ElementDef {
    Symbol(String),
    Explicit { a: u32, z: u32, name: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlasmaDef {
    pub density_g_cc: f64,
    pub temperature: TemperatureDef,
    #[serde(default)]
    pub relativistic: bool,
    pub composition: Vec<AbundanceDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "unit")]
pub enum TemperatureDef {
    Kelvin { value: f64 },
    KeV { value: f64 },
}

impl TemperatureDef {
    pub fn value(&self) -> f64 {
        match self {
            TemperatureDef::Kelvin { value } | TemperatureDef::KeV { value } => *value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbundanceDef {
    pub element: ElementDef,
    pub mass_fraction: f64,
}

/// Optional replacements for the default shooting settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverOverridesDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_init_fraction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_final_multiple: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ode_abs_tol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ode_rel_tol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_step_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dv0_step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bracket_attempts: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bisections: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ode_steps: Option<usize>,
}

impl SolverOverridesDef {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Paths written after a successful solve; relative paths resolve against
/// the case file's directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutputsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
}

impl OutputsDef {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
