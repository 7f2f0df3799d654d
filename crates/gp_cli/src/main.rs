//! Grand prix analytics CLI
//!
//! Prints stint, degradation, strategy and evolution reports, outcome
//! predictions and championship projections as JSON, working from a
//! directory of session dumps.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use gp_core::{AnalyticsConfig, DumpProvider, RaceAnalytics, SessionCode, SimulationMode};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "gp_cli")]
#[command(about = "Race timing analytics over local session dumps", long_about = None)]
struct Cli {
    /// Directory holding session_*.json and schedule_*.json dumps
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Persist computed reports as JSON files under this directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Stint layout of one session
    Stints {
        #[arg(long)]
        season: u16,

        #[arg(long)]
        round: u32,

        /// Session code: FP1, FP2, FP3, Q or R
        #[arg(long, default_value = "R")]
        session: String,
    },

    /// Per-stint degradation table with linear fits
    Degradation {
        #[arg(long)]
        season: u16,

        #[arg(long)]
        round: u32,

        /// Session code: FP1, FP2, FP3, Q or R
        #[arg(long, default_value = "R")]
        session: String,
    },

    /// Full strategy report: stints, pit effects, suggested pit windows
    Strategy {
        #[arg(long)]
        season: u16,

        #[arg(long)]
        round: u32,

        /// Session code: FP1, FP2, FP3, Q or R
        #[arg(long, default_value = "R")]
        session: String,
    },

    /// Weather trace and track-evolution index
    Evolution {
        #[arg(long)]
        season: u16,

        #[arg(long)]
        round: u32,

        /// Session code: FP1, FP2, FP3, Q or R
        #[arg(long, default_value = "FP2")]
        session: String,
    },

    /// Race winner probabilities for one event
    Predict {
        #[arg(long)]
        season: u16,

        #[arg(long)]
        round: u32,

        /// Keep only the strongest candidates (never fewer than 3)
        #[arg(long)]
        topk: Option<usize>,
    },

    /// Pole position probabilities for one event
    Quali {
        #[arg(long)]
        season: u16,

        #[arg(long)]
        round: u32,

        /// Keep only the strongest candidates (never fewer than 3)
        #[arg(long)]
        topk: Option<usize>,
    },

    /// Championship projection over a season
    Championship {
        #[arg(long)]
        season: u16,

        /// "full" Monte Carlo or deterministic "fast" pass
        #[arg(long, default_value = "full")]
        mode: String,

        /// Monte Carlo trials (full mode, capped by the engine)
        #[arg(long)]
        trials: Option<u32>,

        /// Seed for the Monte Carlo
        #[arg(long)]
        seed: Option<u64>,

        /// Stop the projection after this round
        #[arg(long)]
        up_to_round: Option<u32>,
    },

    /// Championship rounds of a season
    Events {
        #[arg(long)]
        season: u16,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AnalyticsConfig::default();
    if let Commands::Championship { mode, trials, seed, up_to_round, .. } = &cli.command {
        config.simulation.mode = parse_mode(mode)?;
        if let Some(trials) = trials {
            config.simulation.trials = *trials;
        }
        if let Some(seed) = seed {
            config.simulation.seed = *seed;
        }
        config.simulation.up_to_round = *up_to_round;
    }

    let provider = DumpProvider::new(&cli.data_dir);
    let service = match &cli.cache_dir {
        Some(dir) => RaceAnalytics::with_cache_dir(provider, config, dir.clone()),
        None => RaceAnalytics::with_config(provider, config),
    };

    match cli.command {
        Commands::Stints { season, round, session } => {
            print_json(&service.tyre_stints(season, round, parse_session(&session)?)?)
        }
        Commands::Degradation { season, round, session } => {
            print_json(&service.tyre_degradation(season, round, parse_session(&session)?)?)
        }
        Commands::Strategy { season, round, session } => {
            print_json(&service.strategy_report(season, round, parse_session(&session)?)?)
        }
        Commands::Evolution { season, round, session } => {
            print_json(&service.track_evolution(season, round, parse_session(&session)?)?)
        }
        Commands::Predict { season, round, topk } => {
            print_json(&service.predict_race(season, round, topk)?)
        }
        Commands::Quali { season, round, topk } => {
            print_json(&service.predict_qualifying(season, round, topk)?)
        }
        Commands::Championship { season, .. } => {
            print_json(&service.simulate_championship(season)?)
        }
        Commands::Events { season } => print_json(&service.season_events(season)?),
    }
}

#[cfg(feature = "cli")]
fn parse_session(code: &str) -> Result<SessionCode> {
    code.parse().map_err(|e: String| anyhow::anyhow!(e))
}

#[cfg(feature = "cli")]
fn parse_mode(mode: &str) -> Result<SimulationMode> {
    match mode.trim().to_lowercase().as_str() {
        "full" => Ok(SimulationMode::Full),
        "fast" => Ok(SimulationMode::Fast),
        other => anyhow::bail!("unknown simulation mode: {} (expected full or fast)", other),
    }
}

#[cfg(feature = "cli")]
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("gp_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
