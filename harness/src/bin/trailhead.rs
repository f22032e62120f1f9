//! Trailhead CLI: plan a trip over a world graph.
//!
//! Usage:
//!   trailhead plan [--days N] [--budget B] [--world paris|layered | --graph FILE]
//!                  [--out DIR] [--json] [-v...]
//!   trailhead verify <DIR>

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use trailhead_harness::bundle_dir::{read_bundle_dir, write_bundle_dir};
use trailhead_harness::contract::GraphWorld;
use trailhead_harness::request::{
    parse_budget, parse_days, prompt_budget, prompt_days, TripRequest,
};
use trailhead_harness::runner::run_plan;
use trailhead_harness::worlds::document::GraphDocument;
use trailhead_harness::worlds::layered::{LayeredConfig, LayeredWorld};
use trailhead_harness::worlds::paris::ParisSample;
use trailhead_kernel::proof::canon::canonical_json_bytes;
use trailhead_search::policy::SearchPolicy;

#[derive(Parser)]
#[command(
    name = "trailhead",
    version,
    about = "Budget-constrained best-first activity planner"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan an itinerary; prompts for missing inputs
    Plan {
        /// Number of trip days (8 activity hours each)
        #[arg(long, value_parser = days_arg)]
        days: Option<u32>,
        /// Budget in currency units
        #[arg(long, value_parser = budget_arg)]
        budget: Option<f64>,
        /// Built-in world to plan over
        #[arg(long, value_enum, default_value_t = WorldChoice::Paris)]
        world: WorldChoice,
        /// Plan over a JSON graph document instead of a built-in world
        #[arg(long, conflicts_with = "world")]
        graph: Option<PathBuf>,
        /// Write the artifact bundle to this directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print the plan as canonical JSON instead of the itinerary
        #[arg(long)]
        json: bool,
    },
    /// Read a bundle directory and verify its integrity
    Verify {
        /// Bundle directory
        dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WorldChoice {
    /// The Paris sample attractions
    Paris,
    /// Synthetic layered graph (default shape)
    Layered,
}

fn days_arg(s: &str) -> Result<u32, String> {
    parse_days(s).map_err(|e| e.to_string())
}

fn budget_arg(s: &str) -> Result<f64, String> {
    parse_budget(s).map_err(|e| e.to_string())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_world(world: WorldChoice, graph: Option<&Path>) -> Result<Box<dyn GraphWorld>, String> {
    if let Some(path) = graph {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let world_id = path
            .file_stem()
            .map_or_else(|| "graph_document".to_string(), |s| s.to_string_lossy().into_owned());
        let document = GraphDocument::parse(world_id, &text).map_err(|e| e.to_string())?;
        return Ok(Box::new(document));
    }
    Ok(match world {
        WorldChoice::Paris => Box::new(ParisSample),
        WorldChoice::Layered => Box::new(LayeredWorld::new(LayeredConfig::default())),
    })
}

fn resolve_request(days: Option<u32>, budget: Option<f64>) -> Result<TripRequest, String> {
    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    let mut writer = std::io::stdout();
    let num_days = match days {
        Some(days) => days,
        None => prompt_days(&mut reader, &mut writer).map_err(|e| e.to_string())?,
    };
    let budget = match budget {
        Some(budget) => budget,
        None => prompt_budget(&mut reader, &mut writer).map_err(|e| e.to_string())?,
    };
    TripRequest::new(num_days, budget).map_err(|e| e.to_string())
}

fn cmd_plan(
    days: Option<u32>,
    budget: Option<f64>,
    world: WorldChoice,
    graph: Option<&Path>,
    out: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let world = load_world(world, graph)?;
    let request = resolve_request(days, budget)?;
    let run = run_plan(world.as_ref(), &request, SearchPolicy::default())
        .map_err(|e| e.to_string())?;

    let mut stdout = std::io::stdout().lock();
    if json {
        let bytes = canonical_json_bytes(&run.plan.to_json_value()).map_err(|e| e.to_string())?;
        stdout
            .write_all(&bytes)
            .and_then(|()| writeln!(stdout))
            .map_err(|e| e.to_string())?;
    } else {
        write!(stdout, "{}", run.itinerary).map_err(|e| e.to_string())?;
    }

    if let Some(dir) = out {
        write_bundle_dir(&run.bundle, dir).map_err(|e| e.to_string())?;
        eprintln!("bundle {} written to {}", run.bundle.digest, dir.display());
    }
    Ok(())
}

fn cmd_verify(dir: &Path) -> Result<(), String> {
    let bundle = read_bundle_dir(dir).map_err(|e| e.to_string())?;
    println!(
        "ok {} ({} artifacts)",
        bundle.digest,
        bundle.artifacts.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Plan {
            days,
            budget,
            world,
            graph,
            out,
            json,
        } => cmd_plan(days, budget, world, graph.as_deref(), out.as_deref(), json),
        Commands::Verify { dir } => cmd_verify(&dir),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
