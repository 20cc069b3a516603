use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tfdh_core::units::{energy_cgs, kelvin, kev, thermal_energy};
use tfdh_plasma::{Composition, Element, PlasmaState};
use tfdh_project::CompiledCase;
use tfdh_solver::{
    BatchCase, IonSummary, RadialProfile, ShootingConfig, TfdhIon, solve_batch, write_profile,
    write_summary, write_summary_json,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Plasma(#[from] tfdh_plasma::PlasmaError),

    #[error(transparent)]
    Solver(#[from] tfdh_solver::SolverError),

    #[error(transparent)]
    Project(#[from] tfdh_project::ProjectError),

    #[error("{failed} of {total} cases failed")]
    CasesFailed { failed: usize, total: usize },
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "tfdh")]
#[command(about = "TFDH ion-in-plasma solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PlasmaArgs {
    /// Mass density in g/cm^3
    #[arg(long)]
    rho: f64,
    /// Temperature in Kelvin
    #[arg(long, conflicts_with = "kev", required_unless_present = "kev")]
    temperature: Option<f64>,
    /// Temperature as kT in keV
    #[arg(long)]
    kev: Option<f64>,
    /// Composition as element:mass_fraction pairs, e.g. "He:0.5,H:0.5"
    #[arg(long, default_value = "H:0.7,He:0.3")]
    composition: String,
    /// Include relativistic corrections
    #[arg(long)]
    relativistic: bool,
}

impl PlasmaArgs {
    fn kt(&self) -> f64 {
        match (self.temperature, self.kev) {
            (Some(t), _) => energy_cgs(thermal_energy(kelvin(t))),
            (None, Some(e)) => energy_cgs(kev(e)),
            (None, None) => f64::NAN,
        }
    }

    fn build(&self) -> CliResult<PlasmaState> {
        let composition: Composition = self.composition.parse()?;
        Ok(PlasmaState::new(
            self.rho,
            self.kt(),
            composition,
            self.relativistic,
        )?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a plasma state and print its parameters
    State {
        #[command(flatten)]
        plasma: PlasmaArgs,
    },
    /// Solve one impurity ion
    Solve {
        /// Impurity element (symbol or name, e.g. C, Fe56)
        element: String,
        #[command(flatten)]
        plasma: PlasmaArgs,
        /// Bound-electron cutoff in units of kT
        #[arg(long, default_value_t = 0.0)]
        cutoff: f64,
        /// Write the text summary here instead of stdout
        #[arg(long)]
        summary: Option<PathBuf>,
        /// Write the radial profile here
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Write the JSON summary here
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Validate a case file
    Validate {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
    },
    /// Run the cases of a case file in parallel
    Run {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
        /// Only run the case with this ID (repeatable)
        #[arg(long = "case")]
        cases: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::State { plasma } => cmd_state(&plasma),
        Commands::Solve {
            element,
            plasma,
            cutoff,
            summary,
            profile,
            json,
        } => cmd_solve(
            &element,
            &plasma,
            cutoff,
            summary.as_deref(),
            profile.as_deref(),
            json.as_deref(),
        ),
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Run { case_path, cases } => cmd_run(&case_path, &cases),
    };

    if let Err(err) = result {
        error!("{err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn cmd_state(plasma: &PlasmaArgs) -> CliResult<()> {
    let state = plasma.build()?;
    println!("composition = {}", state.composition());
    println!("mu_e        = {}", state.composition().mu_e());
    println!("rho         = {:e} g/cm^3", state.rho());
    println!("kT          = {:e} erg", state.kt());
    println!("ne          = {:e} cm^-3", state.ne());
    for (a, n) in state.composition().iter().zip(state.ni()) {
        println!("ni({:<8}) = {n:e} cm^-3", a.element().name());
    }
    println!("tau         = {:e}", state.tau());
    println!("chi         = {}", state.chi());
    Ok(())
}

fn cmd_solve(
    element: &str,
    plasma: &PlasmaArgs,
    cutoff: f64,
    summary_path: Option<&Path>,
    profile_path: Option<&Path>,
    json_path: Option<&Path>,
) -> CliResult<()> {
    let element: Element = element.parse()?;
    let state = plasma.build()?;

    let start = Instant::now();
    let ion = TfdhIon::with_config(element, state, cutoff, &ShootingConfig::default())?;
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "solve finished");

    let summary = IonSummary::from_ion(&ion);
    match summary_path {
        Some(path) => {
            write_summary(&summary, path)?;
            println!("✓ Summary written to {}", path.display());
        }
        None => summary.write_text(&mut io::stdout().lock())?,
    }
    if let Some(path) = profile_path {
        let profile = RadialProfile::from_ion(&ion)?;
        write_profile(&profile, &summary.timestamp, path)?;
        println!("✓ Profile written to {}", path.display());
    }
    if let Some(path) = json_path {
        write_summary_json(&summary, path)?;
        println!("✓ JSON summary written to {}", path.display());
    }
    Ok(())
}

fn cmd_validate(case_path: &Path) -> CliResult<()> {
    println!("Validating case file: {}", case_path.display());
    let file = tfdh_project::load(case_path)?;
    tfdh_project::compile_cases(&file, &[])?;
    println!("✓ {} ({} cases) is valid", file.name, file.cases.len());
    Ok(())
}

fn cmd_run(case_path: &Path, only: &[String]) -> CliResult<()> {
    let file = tfdh_project::load(case_path)?;
    let compiled = tfdh_project::compile_cases(&file, only)?;
    if compiled.is_empty() {
        println!("No cases selected");
        return Ok(());
    }
    println!("Running {} case(s) from {}", compiled.len(), file.name);

    let base_dir = case_path.parent().unwrap_or(Path::new("."));
    let batch: Vec<BatchCase> = compiled.iter().map(|c| c.case.clone()).collect();
    let start = Instant::now();
    let results = solve_batch(&batch);
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "batch finished");

    let total = results.len();
    let mut failed = 0;
    for (case, result) in compiled.iter().zip(results) {
        match result.map_err(CliError::from).and_then(|ion| write_outputs(case, &ion, base_dir)) {
            Ok(z_net) => println!("✓ {}: Z_net = {z_net:.4}", case.case.id),
            Err(err) => {
                failed += 1;
                println!("✗ {}: {err}", case.case.id);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::CasesFailed { failed, total });
    }
    Ok(())
}

fn write_outputs(case: &CompiledCase, ion: &TfdhIon, base_dir: &Path) -> CliResult<f64> {
    let summary = IonSummary::from_ion(ion);
    let outputs = &case.outputs;
    if let Some(path) = &outputs.summary {
        write_summary(&summary, &base_dir.join(path))?;
    }
    if let Some(path) = &outputs.profile {
        let profile = RadialProfile::from_ion(ion)?;
        write_profile(&profile, &summary.timestamp, &base_dir.join(path))?;
    }
    if let Some(path) = &outputs.json {
        write_summary_json(&summary, &base_dir.join(path))?;
    }
    Ok(ion.z_net())
}
