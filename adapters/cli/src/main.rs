#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that scores a battlefield layout.
//!
//! Prints the fixed-power score and the minimal-boost score, one per line.

mod config;
mod layout;
mod render;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use skirmish_core::{Faction, UnitView};
use skirmish_system_outcome::{BoostSearch, OutcomeEvaluator};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::SkirmishConfig, layout::Layout, render::render};

#[derive(Debug, Parser)]
#[command(name = "skirmish")]
#[command(about = "Simulates elf and goblin skirmishes on a grid", version)]
struct Cli {
    /// Layout file drawn with `#`, `.`, `E` and `G`
    layout: PathBuf,

    /// Which scores to compute
    #[arg(long, value_enum, default_value_t = Mode::Both)]
    mode: Mode,

    /// Faction whose attack power the boost search raises
    #[arg(long, value_enum)]
    faction: Option<FactionArg>,

    /// TOML file overriding unit strength and the boost search
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final battlefield after each mode
    #[arg(long)]
    render: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Scores printed by the binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Only the unmodified battle.
    Fixed,
    /// Only the minimal-boost search.
    Boost,
    /// Both, fixed power first.
    Both,
}

impl Mode {
    const fn fixed(self) -> bool {
        matches!(self, Self::Fixed | Self::Both)
    }

    const fn boost(self) -> bool {
        matches!(self, Self::Boost | Self::Both)
    }
}

/// Command-line spelling of a faction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FactionArg {
    /// Elves.
    Elf,
    /// Goblins.
    Goblin,
}

impl From<FactionArg> for Faction {
    fn from(value: FactionArg) -> Self {
        match value {
            FactionArg::Elf => Faction::Elf,
            FactionArg::Goblin => Faction::Goblin,
        }
    }
}

/// Entry point for the Skirmish command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => SkirmishConfig::load(path).context("failed to load configuration")?,
        None => SkirmishConfig::default(),
    };
    debug!(?config, "configuration loaded");

    let text = fs::read_to_string(&cli.layout)
        .with_context(|| format!("failed to read layout {}", cli.layout.display()))?;
    let layout = Layout::parse(&text)
        .with_context(|| format!("failed to parse layout {}", cli.layout.display()))?;
    let battle = layout
        .battle(config.hit_points(), config.attack_power())
        .context("layout places units illegally")?;
    let (rows, columns) = layout.grid().dimensions();
    info!(rows, columns, "layout loaded");

    let mut evaluator = OutcomeEvaluator::new();

    if cli.mode.fixed() {
        let report = evaluator
            .fixed_power(&battle)
            .context("fixed-power battle failed")?;
        println!("{}", report.score);
        if cli.render {
            print!(
                "{}",
                render(layout.grid(), &UnitView::from_snapshots(report.survivors))
            );
        }
    }

    if cli.mode.boost() {
        let search = BoostSearch {
            faction: cli.faction.map_or(config.boosted_faction, Faction::from),
            ceiling: config.boost_ceiling,
        };
        let boosted = evaluator
            .minimal_boost(&battle, search)
            .context("boost search failed")?;
        println!("{}", boosted.report.score);
        if cli.render {
            print!(
                "{}",
                render(
                    layout.grid(),
                    &UnitView::from_snapshots(boosted.report.survivors)
                )
            );
        }
    }

    Ok(())
}

/// Logs to stderr at `info`, or `debug` when verbose; `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
