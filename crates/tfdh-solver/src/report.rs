//! Plain-text and JSON summaries of a solved ion.

use crate::analysis::EnergyDeltas;
use crate::error::SolverResult;
use crate::ion::TfdhIon;
use crate::profile::RadialProfile;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tfdh_core::constants::{BOHR_RADIUS, K_BOLTZMANN};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionRadius {
    pub species: String,
    pub z: u32,
    pub radius_cm: f64,
    /// Radius in units of a₀/Z of the central ion.
    pub radius_scaled: f64,
}

/// Scalar results of one ion solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IonSummary {
    pub timestamp: String,
    pub element: String,
    pub a: u32,
    pub z: u32,
    pub composition: String,
    pub rho_g_cc: f64,
    pub temperature_k: f64,
    pub kt_erg: f64,
    pub ne_cc: f64,
    pub ni_cc: Vec<f64>,
    pub tau: f64,
    pub chi: f64,
    pub r_ws_cm: f64,
    pub exclusion_radii: Vec<ExclusionRadius>,
    pub dv0: f64,
    pub bound_electrons: f64,
    pub z_net: f64,
    /// Embedding energy breakdown in units of kT.
    pub embedding_kt: EnergyDeltas,
}

impl IonSummary {
    /// Summarise `ion`, stamped with the current UTC time.
    pub fn from_ion(ion: &TfdhIon) -> Self {
        Self::with_timestamp(ion, chrono::Utc::now().to_rfc3339())
    }

    pub fn with_timestamp(ion: &TfdhIon, timestamp: String) -> Self {
        let element = ion.element();
        let state = ion.state();
        let scale = BOHR_RADIUS / element.charge();
        let exclusion_radii = state
            .composition()
            .iter()
            .zip(ion.exclusion_radii())
            .map(|(a, &r)| ExclusionRadius {
                species: a.element().name().to_string(),
                z: a.element().z(),
                radius_cm: r,
                radius_scaled: r / scale,
            })
            .collect();

        Self {
            timestamp,
            element: element.name().to_string(),
            a: element.a(),
            z: element.z(),
            composition: state.composition().to_string(),
            rho_g_cc: state.rho(),
            temperature_k: state.kt() / K_BOLTZMANN,
            kt_erg: state.kt(),
            ne_cc: state.ne(),
            ni_cc: state.ni().to_vec(),
            tau: state.tau(),
            chi: state.chi(),
            r_ws_cm: ion.radius_wigner_seitz(),
            exclusion_radii,
            dv0: ion.dv0(),
            bound_electrons: ion.bound_electrons(),
            z_net: ion.z_net(),
            embedding_kt: ion.energies().in_units_of(state.kt()),
        }
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> SolverResult<()> {
        writeln!(out, "summary of TFDH ion-in-plasma calculation")?;
        writeln!(out, "run at {}", self.timestamp)?;
        writeln!(out)?;
        writeln!(out, "central ion = {} (A={}, Z={})", self.element, self.a, self.z)?;
        writeln!(out)?;

        writeln!(out, "plasma parameters")?;
        writeln!(out, "composition = {}", self.composition)?;
        writeln!(out, "rho = {:e}", self.rho_g_cc)?;
        writeln!(out, "t = {:e}", self.temperature_k)?;
        writeln!(out, "ne = {:e}", self.ne_cc)?;
        let ni: Vec<String> = self.ni_cc.iter().map(|n| format!("{n:e}")).collect();
        writeln!(out, "ni = [{}]", ni.join(", "))?;
        writeln!(out, "tau = {:e}", self.tau)?;
        writeln!(out, "chi = {}", self.chi)?;
        writeln!(out)?;

        writeln!(out, "Wigner-Seitz and exclusion radii")?;
        let scale = BOHR_RADIUS / f64::from(self.z);
        writeln!(
            out,
            "rws = {:e}, rws/(a0/Z) = {}",
            self.r_ws_cm,
            self.r_ws_cm / scale
        )?;
        for rex in &self.exclusion_radii {
            writeln!(
                out,
                "rex({}) = {:e}, rex/(a0/Z) = {}",
                rex.species, rex.radius_cm, rex.radius_scaled
            )?;
        }
        writeln!(out)?;

        let e = &self.embedding_kt;
        writeln!(out, "TFDH global quantities")?;
        writeln!(out, "number of bound electrons = {}", self.bound_electrons)?;
        writeln!(out, "Z_net = {}", self.z_net)?;
        writeln!(out, "embedding energy [kT] = {}", e.total)?;
        writeln!(out)?;

        writeln!(out, "embedding energy breakdown [kT]")?;
        writeln!(out, "ion field energy:             {}", e.ion_field)?;
        writeln!(out, "e- field energy:              {}", e.electron_field)?;
        writeln!(out, "overcounting of field energy: {}", e.double_counting)?;
        writeln!(out, "change in ion kinetic energy: {}", e.ion_kinetic)?;
        writeln!(out, "change in e- kinetic energy:  {}", e.electron_kinetic)?;
        writeln!(out, "energy from exchanging ions:  {}", e.ion_exchange)?;
        writeln!(out, "energy from exchanging e-'s:  {}", e.electron_exchange)?;
        writeln!(out, "total including exchange:     {}", e.total_with_exchange())?;
        Ok(())
    }

    pub fn to_json(&self) -> SolverResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> SolverResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

fn create(path: &Path) -> SolverResult<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

pub fn write_summary(summary: &IonSummary, path: &Path) -> SolverResult<()> {
    let mut out = create(path)?;
    summary.write_text(&mut out)?;
    out.flush()?;
    Ok(())
}

pub fn write_summary_json(summary: &IonSummary, path: &Path) -> SolverResult<()> {
    let mut out = create(path)?;
    out.write_all(summary.to_json()?.as_bytes())?;
    out.flush()?;
    Ok(())
}

pub fn write_profile(profile: &RadialProfile, timestamp: &str, path: &Path) -> SolverResult<()> {
    let mut out = create(path)?;
    profile.write_text(&mut out, timestamp)?;
    out.flush()?;
    Ok(())
}
