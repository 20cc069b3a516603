//! Tabulated radial profile of a solved ion.

use crate::error::SolverResult;
use crate::ion::TfdhIon;
use crate::radial::accumulate_over_radius;
use std::io::Write;
use tfdh_plasma::eos;

/// One row per solution sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileRow {
    pub radius: f64,
    /// Electron potential energy φ (erg).
    pub potential: f64,
    pub electron_density: f64,
    pub bound_density: f64,
    /// Total minus bound electron density.
    pub free_density: f64,
    pub ion_charge_density: f64,
    /// Z + ∫(Σ Z_i n_i − n_e) dV from the innermost sample, in units of q_e.
    pub enclosed_charge: f64,
    pub enclosed_bound: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadialProfile {
    rows: Vec<ProfileRow>,
}

const COLUMNS: [&str; 8] = [
    "radius [cm]",
    "potential [erg]",
    "electron density [cm^-3]",
    "bound portion of electron density",
    "free portion of electron density (total - bound)",
    "total ion charge density (sum Z_i n_i)",
    "enclosed net charge in units of q_e",
    "enclosed bound electrons",
];

impl RadialProfile {
    pub fn from_ion(ion: &TfdhIon) -> SolverResult<Self> {
        let state = ion.state();
        let solution = ion.solution();
        let radii = solution.radii();

        let ne = solution.map_potential(|_, phi| Ok(eos::ne(phi, state)?))?;
        let bound = solution.map_potential(|_, phi| Ok(eos::ne_bound(phi, state, ion.cutoff())?))?;
        let ion_charge: Vec<f64> = solution
            .potentials()
            .iter()
            .map(|&phi| eos::total_ion_charge_density(phi, state))
            .collect();
        let net: Vec<f64> = ion_charge.iter().zip(&ne).map(|(i, e)| i - e).collect();

        let enclosed_charge = accumulate_over_radius(radii, &net)?;
        let enclosed_bound = accumulate_over_radius(radii, &bound)?;
        let z = ion.element().charge();

        let rows = (0..radii.len())
            .map(|i| ProfileRow {
                radius: radii[i],
                potential: solution.potentials()[i],
                electron_density: ne[i],
                bound_density: bound[i],
                free_density: ne[i] - bound[i],
                ion_charge_density: ion_charge[i],
                enclosed_charge: z + enclosed_charge[i],
                enclosed_bound: enclosed_bound[i],
            })
            .collect();
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ProfileRow] {
        &self.rows
    }

    /// Whitespace-separated columns under a `#` header.
    pub fn write_text<W: Write>(&self, out: &mut W, timestamp: &str) -> SolverResult<()> {
        writeln!(out, "# radial profile of TFDH ion-in-plasma calculation")?;
        writeln!(out, "# run at {timestamp}")?;
        writeln!(out, "#")?;
        for (i, name) in COLUMNS.iter().enumerate() {
            writeln!(out, "# col {i} = {name}")?;
        }
        for row in &self.rows {
            writeln!(
                out,
                "{:.10e}    {:.10e}    {:.10e}    {:.10e}    {:.10e}    {:.10e}    {:.10e}    {:.10e}",
                row.radius,
                row.potential,
                row.electron_density,
                row.bound_density,
                row.free_density,
                row.ion_charge_density,
                row.enclosed_charge,
                row.enclosed_bound,
            )?;
        }
        Ok(())
    }
}
