use clap::{Args, Parser, Subcommand};
use ef_core::units::constants::AMBIENT_K;
use ef_project::{ProjectError, Scenario};
use ef_sim::{ReservoirPairSimulator, SimError, StepRecord, SystemType};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    Arg(String),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ef-cli")]
#[command(about = "EntropyFlow CLI - irreversible heat transfer between two reservoirs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the stepped simulation to completion and compare with the closed form
    Run {
        #[command(flatten)]
        params: ParamArgs,
        /// Show a progress bar while stepping
        #[arg(long)]
        progress: bool,
        /// Print the final record as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the closed-form equilibrium analysis
    Equilibrium {
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Entropy generated versus initial temperature difference, as CSV
    Sweep {
        #[command(flatten)]
        params: ParamArgs,
        /// Fixed cold reservoir temperature (K)
        #[arg(long)]
        sweep_t_cold: Option<f64>,
        /// First hot reservoir temperature (K)
        #[arg(long)]
        start: Option<f64>,
        /// Last hot reservoir temperature (K)
        #[arg(long)]
        end: Option<f64>,
        /// Number of points
        #[arg(long)]
        points: Option<usize>,
        /// Also run the stepped simulation at every point
        #[arg(long)]
        simulate: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the full time series as CSV
    Export {
        #[command(flatten)]
        params: ParamArgs,
        /// Keep every N-th record (the final record is always kept)
        #[arg(long, default_value_t = 1)]
        every: usize,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
}

/// Scenario file plus per-field overrides.
#[derive(Args, Clone, Default)]
struct ParamArgs {
    /// Scenario YAML or JSON file to start from
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Initial hot reservoir temperature (K)
    #[arg(long)]
    t_hot: Option<f64>,
    /// Initial cold reservoir temperature (K)
    #[arg(long)]
    t_cold: Option<f64>,
    /// Hot reservoir mass (kg)
    #[arg(long)]
    mass_hot: Option<f64>,
    /// Cold reservoir mass (kg)
    #[arg(long)]
    mass_cold: Option<f64>,
    /// Hot mass relative to a 1 kg cold reservoir
    #[arg(long, conflicts_with_all = ["mass_hot", "mass_cold"])]
    mass_ratio: Option<f64>,
    /// Specific heat (J/(kg K))
    #[arg(long)]
    cp: Option<f64>,
    /// Heat transfer coefficient (W/K)
    #[arg(long)]
    h: Option<f64>,
    /// closed, open or isolated
    #[arg(long)]
    system: Option<SystemType>,
    /// Time step (s)
    #[arg(long)]
    dt: Option<f64>,
    /// Horizon (s)
    #[arg(long)]
    t_max: Option<f64>,
    /// Ambient temperature for exergy figures (K)
    #[arg(long)]
    ambient: Option<f64>,
}

impl ParamArgs {
    fn resolve(&self) -> CliResult<Scenario> {
        let mut scenario = match &self.scenario {
            Some(path) => ef_project::load(path)?,
            None => Scenario::default(),
        };

        let p = &mut scenario.parameters;
        override_with(&mut p.t_hot_initial_k, self.t_hot);
        override_with(&mut p.t_cold_initial_k, self.t_cold);
        override_with(&mut p.mass_hot_kg, self.mass_hot);
        override_with(&mut p.mass_cold_kg, self.mass_cold);
        if let Some(ratio) = self.mass_ratio {
            *p = p.clone().with_mass_ratio(ratio);
        }
        override_with(&mut p.specific_heat_j_per_kg_k, self.cp);
        override_with(&mut p.heat_transfer_coefficient_w_per_k, self.h);
        override_with(&mut p.system_type, self.system);
        override_with(&mut p.time_step_s, self.dt);
        override_with(&mut p.max_time_s, self.t_max);
        override_with(&mut scenario.ambient_temperature_k, self.ambient);

        ef_project::validate_scenario(&scenario).map_err(ProjectError::from)?;
        Ok(scenario)
    }
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn main() -> CliResult<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            params,
            progress,
            json,
        } => cmd_run(&params, progress, json),
        Commands::Equilibrium { params } => cmd_equilibrium(&params),
        Commands::Sweep {
            params,
            sweep_t_cold,
            start,
            end,
            points,
            simulate,
            output,
        } => cmd_sweep(
            &params,
            SweepOverrides {
                t_cold: sweep_t_cold,
                start,
                end,
                points,
            },
            simulate,
            output.as_deref(),
        ),
        Commands::Export {
            params,
            every,
            output,
        } => cmd_export(&params, every, output.as_deref()),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
    }
}

fn cmd_run(args: &ParamArgs, progress: bool, json: bool) -> CliResult<()> {
    let scenario = args.resolve()?;
    tracing::info!(scenario = %scenario.name, "running simulation");
    let mut sim = ReservoirPairSimulator::new(scenario.parameters.clone())?;

    if progress {
        let chunk = (sim.n_steps() / 100).max(1);
        sim.reset();
        while sim.step_n(chunk)? > 0 {
            render_progress(&sim);
        }
        clear_progress_line();
    } else {
        sim.run_to_completion()?;
    }

    let cmp = sim.compare_with_closed_form(scenario.ambient_temperature_k)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cmp.record)?);
        return Ok(());
    }

    let p = sim.parameters();
    println!("Scenario: {}", scenario.name);
    println!("  System: {}", p.system_type);
    println!(
        "  dt = {:.3} s, t_max = {:.3} s, steps = {}",
        p.time_step_s,
        p.max_time_s,
        sim.n_steps()
    );
    print_record("Final state", &cmp.record);
    println!("\nClosed-form comparison:");
    println!("  T_eq = {:.3} K", cmp.analysis.t_eq_k);
    println!("  |T_hot - T_eq|  = {:.3e} K", cmp.hot_deviation_k);
    println!("  |T_cold - T_eq| = {:.3e} K", cmp.cold_deviation_k);
    println!(
        "  S_gen = {:.4} J/K vs {:.4} J/K ({:+.2}%)",
        cmp.record.entropy_generated_j_per_k,
        cmp.analysis.delta_s_total_j_per_k,
        cmp.entropy_relative_error * 100.0
    );
    Ok(())
}

fn cmd_equilibrium(args: &ParamArgs) -> CliResult<()> {
    let scenario = args.resolve()?;
    let analysis =
        ef_sim::EquilibriumAnalysis::compute(&scenario.parameters, scenario.ambient_temperature_k)?;
    println!("{}", analysis);
    Ok(())
}

struct SweepOverrides {
    t_cold: Option<f64>,
    start: Option<f64>,
    end: Option<f64>,
    points: Option<usize>,
}

fn cmd_sweep(
    args: &ParamArgs,
    overrides: SweepOverrides,
    simulate: bool,
    output: Option<&Path>,
) -> CliResult<()> {
    let scenario = args.resolve()?;
    let mut sweep = scenario.sweep.clone().unwrap_or_default();
    override_with(&mut sweep.t_cold_k, overrides.t_cold);
    override_with(&mut sweep.t_hot_start_k, overrides.start);
    override_with(&mut sweep.t_hot_end_k, overrides.end);
    override_with(&mut sweep.points, overrides.points);

    tracing::info!(points = sweep.points, simulate, "evaluating entropy sweep");
    let points = sweep.evaluate(&scenario.parameters, simulate)?;

    let mut csv =
        String::from("t_hot_k,delta_t_k,closed_form_entropy_j_per_k,simulated_entropy_j_per_k\n");
    for p in &points {
        let simulated = p
            .simulated_entropy_j_per_k
            .map(|v| v.to_string())
            .unwrap_or_default();
        csv.push_str(&format!(
            "{},{},{},{}\n",
            p.t_hot_k, p.delta_t_k, p.closed_form_entropy_j_per_k, simulated
        ));
    }

    write_output(&csv, output, points.len())
}

fn cmd_export(args: &ParamArgs, every: usize, output: Option<&Path>) -> CliResult<()> {
    if every == 0 {
        return Err(CliError::Arg("--every must be at least 1".to_string()));
    }
    let scenario = args.resolve()?;
    let mut sim = ReservoirPairSimulator::new(scenario.parameters)?;
    sim.run_to_completion()?;

    let last = sim.current_step();
    let mut csv = String::from(
        "time_s,t_hot_k,t_cold_k,heat_flux_w,heat_transferred_j,entropy_generated_j_per_k\n",
    );
    let mut rows = 0;
    for r in sim.records().filter(|r| r.index % every == 0 || r.index == last) {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            r.time_s,
            r.t_hot_k,
            r.t_cold_k,
            r.heat_flux_w,
            r.heat_transferred_j,
            r.entropy_generated_j_per_k
        ));
        rows += 1;
    }

    write_output(&csv, output, rows)
}

fn cmd_validate(scenario_path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = ef_project::load(scenario_path)?;
    let n = scenario.parameters.n_steps()?;
    println!("✓ Scenario '{}' is valid ({} samples)", scenario.name, n);
    if scenario.parameters.stability_number() > 1.0 {
        println!(
            "  warning: stability number {:.3} > 1, the explicit update will overshoot",
            scenario.parameters.stability_number()
        );
    }
    if scenario.ambient_temperature_k != AMBIENT_K {
        println!("  ambient: {:.2} K", scenario.ambient_temperature_k);
    }
    Ok(())
}

fn write_output(csv: &str, output: Option<&Path>, rows: usize) -> CliResult<()> {
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} rows to {}", rows, path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn print_record(title: &str, r: &StepRecord) {
    println!("\n{} (step {}, t = {:.3} s):", title, r.index, r.time_s);
    println!("  T_hot  = {:.3} K", r.t_hot_k);
    println!("  T_cold = {:.3} K", r.t_cold_k);
    println!(
        "  Q      = {:.2} J ({:.3} kJ)",
        r.heat_transferred_j,
        r.heat_transferred_j / 1000.0
    );
    println!("  S_gen  = {:.4} J/K", r.entropy_generated_j_per_k);
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(100));
    let _ = io::stderr().flush();
}

fn render_progress(sim: &ReservoirPairSimulator) {
    let width = 28usize;
    let fraction = sim.progress();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    let r = sim.current_record();
    eprint!(
        "\r[{}] {:>6.2}%  t={:.1}s  T_hot={:.2}K  T_cold={:.2}K  S_gen={:.3}J/K",
        bar,
        fraction * 100.0,
        r.time_s,
        r.t_hot_k,
        r.t_cold_k,
        r.entropy_generated_j_per_k
    );
    let _ = io::stderr().flush();
}
