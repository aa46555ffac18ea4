//! Command-line front end for the fieldpath mission planner.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fieldpath::{MissionPlanner, PlannerConfig, PlannerStrategy, Point2, Polygon};
use serde::Deserialize;

#[derive(Parser)]
#[command(
    name = "fieldpath",
    about = "Agricultural aerial-coverage mission planner",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan a mission from a field definition file.
    Plan {
        /// JSON field definition (boundary vertices plus configuration).
        field: PathBuf,
        /// Write the full plan as JSON to this path.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Override the genetic search seed for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a field definition without planning.
    Check {
        /// JSON field definition to validate.
        field: PathBuf,
    },
}

/// On-disk field definition.
#[derive(Deserialize)]
struct FieldFile {
    /// Boundary vertices in order, meters in the local frame.
    boundary: Vec<[f64; 2]>,
    /// Planner configuration; defaults apply when omitted.
    #[serde(default)]
    config: PlannerConfig,
}

fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Command::Plan {
            field,
            output,
            seed,
        } => plan(&field, output.as_deref(), seed),
        Command::Check { field } => check(&field),
    }
}

fn load(path: &Path) -> Result<FieldFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading field definition {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn boundary_points(file: &FieldFile) -> Vec<Point2> {
    file.boundary
        .iter()
        .map(|[x, y]| Point2::new(*x, *y))
        .collect()
}

fn plan(field: &Path, output: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let mut spec = load(field)?;
    if let (Some(seed), PlannerStrategy::Genetic(settings)) =
        (seed, &mut spec.config.strategy)
    {
        settings.seed = Some(seed);
    }

    let boundary = boundary_points(&spec);
    let planner = MissionPlanner::new(spec.config)?;
    let plan = planner.plan(boundary)?;

    println!("heading          {:>10.1} °", plan.heading_deg);
    println!("coverage path    {:>10.0} m", plan.flight_distance);
    println!("covered area     {:>10.0} m²", plan.covered_area);
    println!("coverage error   {:>10.1} %", plan.coverage_error * 100.0);
    println!("mission cycles   {:>10}", plan.totals.cycle_count);
    println!("flight total     {:>10.0} m", plan.totals.flight_distance);
    println!("  spraying       {:>10.0} m", plan.totals.spray_distance);
    println!("  transit        {:>10.0} m", plan.totals.transit_distance);
    println!("vehicle travel   {:>10.0} m", plan.totals.vehicle_distance);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&plan).context("serializing plan")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("plan written to {}", path.display());
    }
    Ok(())
}

fn check(field: &Path) -> Result<()> {
    let spec = load(field)?;
    let boundary = Polygon::new(boundary_points(&spec))?;
    boundary.validate_simple()?;
    MissionPlanner::new(spec.config)?;
    println!(
        "ok: {} vertices, {:.0} m² field",
        boundary.len(),
        boundary.area()
    );
    Ok(())
}
