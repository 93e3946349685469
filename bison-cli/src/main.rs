//! bison - build the bistatic sonar placement model for an ocean grid
//!
//! Runs grid loading, coverage enumeration and model construction, then
//! writes the model as a CPLEX LP file plus a YAML run summary. Solving the
//! LP is left to an external MILP solver.
//!
//! Usage:
//!   bison --config configs/bison.yaml
//!   bison --config configs/bison.yaml --input topo.asc --lp out/bison.lp

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;

use bison::config::{DetectionModel, ObjectiveRegime};
use bison::io::save_lp;
use bison::{BisonConfig, Planner, Result};

/// Build the sonar placement model
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (defaults to configs/bison.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ESRI ASCII elevation grid, overrides grid.input
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output path for the LP file
    #[arg(long, default_value = "bison.lp")]
    lp: PathBuf,

    /// Output path for the YAML run summary
    #[arg(long, default_value = "bison-summary.yaml")]
    summary: PathBuf,
}

/// What the run produced, written next to the LP file.
#[derive(Serialize)]
struct RunSummary {
    objective: ObjectiveRegime,
    detection_model: DetectionModel,
    grid_width: usize,
    grid_height: usize,
    depth_layers: usize,
    ocean_cells: usize,
    headings: usize,
    detecting_triples: usize,
    tested_triples: u64,
    enumeration_secs: f64,
    row_sum_min: f64,
    row_sum_max: f64,
    variables: usize,
    binaries: usize,
    constraints: usize,
    undetectable_rows: usize,
    lp_file: String,
}

fn load_config(path: Option<&Path>) -> Result<BisonConfig> {
    let config = match path {
        Some(path) => {
            log::info!("Using config: {}", path.display());
            BisonConfig::load(path)?
        }
        None => {
            log::info!("Using default config");
            BisonConfig::load_default()?
        }
    };
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    log::info!(
        "bison starting: {:?}, {:?} detection",
        config.equipment.objective,
        config.detection.model
    );

    let planner = Planner::new(config);
    let grid = planner.load_grid(args.input.as_deref())?;
    let prepared = planner.prepare(&grid)?;

    if let Some(parent) = args.lp.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    save_lp(&prepared.model.program, &args.lp)?;
    log::info!("LP written to {}", args.lp.display());

    let (row_sum_min, row_sum_max) = prepared.sums.extremes();
    let program = &prepared.model.program;
    let summary = RunSummary {
        objective: prepared.model.regime,
        detection_model: prepared.model.model,
        grid_width: grid.width(),
        grid_height: grid.height(),
        depth_layers: grid.layer_count(),
        ocean_cells: prepared.map.candidates().len(),
        headings: prepared.map.headings().len(),
        detecting_triples: prepared.map.len(),
        tested_triples: prepared.stats.tested,
        enumeration_secs: prepared.stats.elapsed.as_secs_f64(),
        row_sum_min,
        row_sum_max,
        variables: program.variables.len(),
        binaries: program.binary_count(),
        constraints: program.constraints.len(),
        undetectable_rows: prepared.model.undetectable.len(),
        lp_file: args.lp.display().to_string(),
    };

    match serde_yaml::to_string(&summary) {
        Ok(yaml) => {
            fs::write(&args.summary, yaml)?;
            log::info!("Summary written to {}", args.summary.display());
        }
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }

    if !prepared.model.undetectable.is_empty() {
        log::warn!(
            "{} target/heading rows cannot be detected by any pair",
            prepared.model.undetectable.len()
        );
    }
    Ok(())
}
