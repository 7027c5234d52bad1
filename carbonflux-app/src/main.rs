use anyhow::{Context, Result};
use carbonflux_core::experiment::Experiment;
use carbonflux_core::loader;
use carbonflux_core::organism::Strain;
use carbonflux_core::simulation::SimulationBuilder;
use carbonflux_schemas::model::CompartmentConvention;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

mod config;
mod oracle;
mod report;

#[derive(Parser)]
#[command(
    name = "carbonflux",
    about = "Carbon-use-efficiency estimation from genome-scale metabolic models"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a dynamic flux-balance simulation described by a run document
    Run {
        run_file: PathBuf,
        #[arg(long, default_value = "./results")]
        out_dir: PathBuf,
    },
    /// Compute static CUE/GGE for every model document in a directory
    Survey {
        models_dir: PathBuf,
        #[arg(long, default_value = "./results")]
        out_dir: PathBuf,
        /// Boundary-compartment convention: bigg, carveme, or a custom label
        #[arg(long)]
        compartment: String,
        #[arg(long, default_value = "EX_co2_e")]
        co2_reaction: String,
        #[arg(long, default_value_t = 0.1)]
        yield_per_carbon: f64,
        #[arg(long, default_value_t = 0.3)]
        respiration_fraction: f64,
    },
}

fn parse_convention(label: &str) -> CompartmentConvention {
    match label {
        "bigg" => CompartmentConvention::Bigg,
        "carveme" => CompartmentConvention::CarveMe,
        other => CompartmentConvention::Custom(other.to_string()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { run_file, out_dir } => run_simulation(&run_file, &out_dir),
        Commands::Survey {
            models_dir,
            out_dir,
            compartment,
            co2_reaction,
            yield_per_carbon,
            respiration_fraction,
        } => run_survey(
            &models_dir,
            &out_dir,
            &compartment,
            &co2_reaction,
            yield_per_carbon,
            respiration_fraction,
        ),
    }
}

fn run_simulation(run_file: &PathBuf, out_dir: &PathBuf) -> Result<()> {
    let loaded = config::load_run(run_file)?;
    let spec = loaded.spec;

    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let out = out_dir.join(format!("run_{stamp}"));
    fs::create_dir_all(&out)
        .with_context(|| format!("Failed to create output directory '{}'", out.display()))?;
    // Copy the run document next to its results for traceability.
    fs::copy(run_file, out.join("run.yaml"))?;

    let solver = oracle::LinearYieldOracle::new(
        spec.oracle.yield_per_carbon,
        spec.oracle.respiration_fraction,
        &spec.co2_reaction,
        spec.compartment.clone(),
    )?;

    let log_path = out.join("timeseries.csv");
    let mut builder = SimulationBuilder::new()
        .with_media(spec.media)
        .with_fixed_reactions(spec.fixed)
        .with_timepoints(spec.timepoints)
        .with_dt(spec.dt)
        .with_co2_reaction(&spec.co2_reaction)
        .with_compartment_convention(spec.compartment)
        .with_oracle(Box::new(solver))
        .with_timeseries_logging_to_file(&log_path.to_string_lossy());
    for strain in loaded.strains {
        builder = builder.with_strain(strain);
    }

    let mut engine = builder.build()?;
    println!(
        "Running {} timepoints (dt = {}) for {} organism(s)...",
        spec.timepoints,
        spec.dt,
        engine.organisms().len()
    );
    engine.run()?;

    report::write_trajectories(&engine, &out.join("trajectories.csv"))?;
    report::write_media_history(&engine, &out.join("media.csv"))?;
    report::write_summary(&engine, &out.join("summary.json"))?;

    for organism in engine.organisms() {
        match organism.infeasible_timestep() {
            Some(t) => println!(
                "{}: final biomass {:.6} (first infeasible at timestep {})",
                organism.name(),
                organism.biomass(),
                t
            ),
            None => println!(
                "{}: final biomass {:.6}",
                organism.name(),
                organism.biomass()
            ),
        }
    }
    println!("Simulation complete. Results are in '{}'", out.display());
    Ok(())
}

fn run_survey(
    models_dir: &PathBuf,
    out_dir: &PathBuf,
    compartment: &str,
    co2_reaction: &str,
    yield_per_carbon: f64,
    respiration_fraction: f64,
) -> Result<()> {
    let convention = parse_convention(compartment);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory '{}'", out_dir.display()))?;

    let mut files = loader::list_model_files(models_dir, "json")?;
    files.extend(loader::list_model_files(models_dir, "yaml")?);
    files.extend(loader::list_model_files(models_dir, "yml")?);
    files.sort();

    let mut results = Vec::new();
    for path in &files {
        let model = loader::load_model(path)?;
        let model_id = model.id.clone();
        let mut solver = oracle::LinearYieldOracle::new(
            yield_per_carbon,
            respiration_fraction,
            co2_reaction,
            convention.clone(),
        )?;
        let strain = Strain::new(&model_id, model, 1.0);
        let mut experiment = Experiment::new(strain, None, co2_reaction, &convention);
        let (cue, _) = experiment.cue(&mut solver, false)?;
        let (gge, _) = experiment.gge(&mut solver, false)?;
        match cue.value() {
            Some(v) => println!("{model_id}: CUE = {v:.4}"),
            None => println!("{model_id}: CUE undefined (no carbon uptake)"),
        }
        results.push((model_id, cue, gge));
    }

    let survey_path = out_dir.join("cue_survey.csv");
    report::write_survey(&results, &survey_path)?;
    println!(
        "Surveyed {} model(s). Results are in '{}'",
        results.len(),
        survey_path.display()
    );
    Ok(())
}
