#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Lifeline simulation headlessly.

mod config;
mod pattern_transfer;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use lifeline_core::{Command, Event, Topology};
use lifeline_system_patterns::{verify_catalog, PatternCatalog, PeriodCheck};
use lifeline_world::{self as world, query, GridSeed, Simulation, SimulationConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{RunOverrides, RunSettings},
    pattern_transfer::PatternSnapshot,
};

/// Command-line arguments accepted by the Lifeline binary.
#[derive(Debug, Parser)]
#[command(name = "lifeline", about = "Steps a Game of Life grid and prints the result.")]
struct CliArgs {
    /// TOML file providing run parameters; flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of visible rows.
    #[arg(long, value_name = "N")]
    rows: Option<u32>,
    /// Number of visible columns.
    #[arg(long, value_name = "N")]
    columns: Option<u32>,
    /// Edge behavior used when stepping forward.
    #[arg(long, value_enum)]
    topology: Option<TopologyArg>,
    /// Hidden margin of cells simulated around the visible window.
    #[arg(long, value_name = "N")]
    padding: Option<u32>,
    /// Name of a built-in pattern to start from.
    #[arg(long, value_name = "NAME", conflicts_with = "import")]
    pattern: Option<String>,
    /// Pattern string previously printed with `--export`.
    #[arg(long, value_name = "SNAPSHOT")]
    import: Option<String>,
    /// Seed for the random starting grid.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Generations to advance.
    #[arg(long, value_name = "N")]
    steps: Option<u64>,
    /// Generations to step back after advancing.
    #[arg(long, value_name = "N")]
    rewind: Option<u64>,
    /// Print the final visible grid as a pattern string.
    #[arg(long)]
    export: bool,
    /// List the built-in patterns and exit.
    #[arg(long)]
    list_patterns: bool,
    /// Verify the period of every built-in pattern and exit.
    #[arg(long)]
    check_patterns: bool,
    /// Log simulation activity to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl CliArgs {
    fn overrides(&self) -> RunOverrides {
        RunOverrides {
            rows: self.rows,
            columns: self.columns,
            topology: self.topology.map(Topology::from),
            padding: self.padding,
            pattern: self.pattern.clone(),
            seed: self.seed,
            steps: self.steps,
            rewind: self.rewind,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TopologyArg {
    Bounded,
    Toroidal,
}

impl From<TopologyArg> for Topology {
    fn from(value: TopologyArg) -> Self {
        match value {
            TopologyArg::Bounded => Self::Bounded,
            TopologyArg::Toroidal => Self::Toroidal,
        }
    }
}

/// Entry point for the Lifeline command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let catalog = PatternCatalog::presets().context("failed to build pattern catalog")?;

    if args.list_patterns {
        for pattern in catalog.iter() {
            let (rows, columns) = pattern.grid().dimensions();
            println!(
                "{:<14} {rows}x{columns} period {:<3} {}",
                pattern.name(),
                pattern.period(),
                pattern.description()
            );
        }
        return Ok(());
    }

    if args.check_patterns {
        return check_patterns(&catalog);
    }

    let mut settings = RunSettings::default();
    if let Some(path) = &args.config {
        settings.merge(config::load(path)?);
    }
    settings.merge(args.overrides());

    let seed = match &args.import {
        Some(snapshot) => GridSeed::Pattern(
            PatternSnapshot::decode(snapshot)
                .context("failed to import pattern string")?
                .into_grid(),
        ),
        None => grid_seed(&catalog, settings.pattern.as_deref())?,
    };

    let mut simulation = build_simulation(&settings, seed)?;
    navigate(&mut simulation, settings.steps, settings.rewind)?;

    let visible = query::visible_grid(&simulation);
    println!(
        "step {} population {}",
        query::step(&simulation),
        visible.population()
    );
    print!("{visible}");

    if args.export {
        let encoded = PatternSnapshot::from_grid(visible)
            .encode()
            .context("failed to export pattern string")?;
        println!("{encoded}");
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn check_patterns(catalog: &PatternCatalog) -> Result<()> {
    let mut failures = Vec::new();
    for (name, check) in verify_catalog(catalog, Topology::Bounded) {
        match check {
            PeriodCheck::Repeats { period } => println!("{name:<14} ok (period {period})"),
            PeriodCheck::Aperiodic => println!("{name:<14} skipped (no period)"),
            PeriodCheck::Diverged { period, population } => {
                println!("{name:<14} FAILED after {period} steps ({population} live cells)");
                failures.push(name);
            }
        }
    }

    if !failures.is_empty() {
        bail!("patterns failed their period check: {}", failures.join(", "));
    }
    Ok(())
}

fn grid_seed(catalog: &PatternCatalog, pattern: Option<&str>) -> Result<GridSeed> {
    let Some(name) = pattern else {
        return Ok(GridSeed::Random);
    };
    let pattern = catalog.get(name).with_context(|| {
        let known: Vec<&str> = catalog.names().collect();
        format!("unknown pattern `{name}`; known patterns: {}", known.join(", "))
    })?;
    Ok(GridSeed::Pattern(pattern.grid().clone()))
}

fn build_simulation(settings: &RunSettings, seed: GridSeed) -> Result<Simulation> {
    let mut config = SimulationConfig::new(settings.rows, settings.columns)
        .with_topology(settings.topology)
        .with_padding(settings.padding)
        .with_seed(seed);
    if let Some(rng_seed) = settings.seed {
        config = config.with_rng_seed(rng_seed);
    }

    let simulation = Simulation::new(config).with_context(|| {
        format!(
            "failed to create a {}x{} simulation",
            settings.rows, settings.columns
        )
    })?;
    info!(
        rows = settings.rows,
        columns = settings.columns,
        topology = ?settings.topology,
        "simulation ready"
    );
    Ok(simulation)
}

fn navigate(simulation: &mut Simulation, steps: u64, rewind: u64) -> Result<()> {
    if rewind > steps {
        bail!("cannot rewind {rewind} steps after advancing only {steps}");
    }

    let mut events: Vec<Event> = Vec::new();
    for target in [steps, steps - rewind] {
        let target = i64::try_from(target).context("step count is too large")?;
        world::apply(simulation, Command::GoToStep { target }, &mut events)
            .with_context(|| format!("failed to navigate to step {target}"))?;
    }
    debug!(
        events = events.len(),
        history = query::history_len(simulation),
        "navigation finished"
    );
    Ok(())
}
