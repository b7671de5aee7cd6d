use anyhow::{Context, Result};
use clap::Parser;
use imperial_core::{
    play_out_observed, Action, EngineConfig, EventLogObserver, Game, ObserverRegistry, Outcome,
    RandomAgent,
};
use imperial_data::MapBoard;
use std::path::PathBuf;

mod loader;
mod report;

/// Replay or self-play an Imperial 2030 game.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board definition (JSON)
    #[arg(long)]
    board: PathBuf,

    /// Action log to replay (JSON array of actions)
    #[arg(long, required_unless_present = "simulate", conflicts_with = "simulate")]
    log: Option<PathBuf>,

    /// Play a random game with this many players instead of replaying
    #[arg(long)]
    simulate: Option<usize>,

    /// Seed for --simulate
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Action budget for --simulate
    #[arg(long, default_value_t = 2000)]
    max_actions: usize,

    /// Write the resulting action log here
    #[arg(long)]
    save_log: Option<PathBuf>,

    /// Write game events as JSON lines to this file, or `-` for stdout
    #[arg(long)]
    events: Option<String>,

    /// Print the legal actions after the last action, one JSON object per line
    #[arg(long)]
    show_actions: bool,

    /// Compute a state checksum every N actions (0 disables)
    #[arg(long, default_value_t = EngineConfig::default().checksum_frequency)]
    checksum_frequency: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let board = loader::load_board(&args.board)?;
    let config = EngineConfig {
        checksum_frequency: args.checksum_frequency,
    };
    let mut game = Game::with_config(board, config);

    let mut observers = ObserverRegistry::new();
    match args.events.as_deref() {
        Some("-") => observers.register(Box::new(EventLogObserver::stdout())),
        Some(path) => observers.register(Box::new(
            EventLogObserver::file(path)
                .with_context(|| format!("Failed to create event log {path}"))?,
        )),
        None => {}
    }

    let ignored = if let Some(path) = &args.log {
        replay(&mut game, &loader::load_log(path)?, &observers)?
    } else {
        let players = args.simulate.context("Either --log or --simulate is required")?;
        simulate(&mut game, players, args.seed, args.max_actions, &observers)?;
        0
    };
    // Flush the event log before the summary goes to stdout
    drop(observers);

    if let Some(path) = &args.save_log {
        loader::save_log(path, game.log())?;
    }
    if let Some(checksum) = game.last_checksum() {
        log::info!("Last checksum: {checksum:016x}");
    }

    print!("{}", report::summary(&game, ignored));
    if args.show_actions {
        for action in game.available_actions() {
            println!("{}", serde_json::to_string(action)?);
        }
    }
    Ok(())
}

/// Feed `log` through the engine. Returns how many actions were ignored.
fn replay(game: &mut Game<MapBoard>, log: &[Action], observers: &ObserverRegistry) -> Result<usize> {
    let mut ignored = 0;
    for (i, action) in log.iter().enumerate() {
        let outcome = game
            .tick_observed(action.clone(), observers)
            .with_context(|| format!("Action #{} ({action}) failed", i + 1))?;
        if outcome == Outcome::Ignored {
            log::warn!("Action #{} ({action}) is not legal here; ignored", i + 1);
            ignored += 1;
        }
    }
    log::info!("Replayed {} actions", log.len());
    Ok(ignored)
}

fn simulate(
    game: &mut Game<MapBoard>,
    players: usize,
    seed: u64,
    max_actions: usize,
    observers: &ObserverRegistry,
) -> Result<()> {
    let seats = loader::simulated_seats(players)?;
    game.tick_observed(Action::initialize(seats), observers)?;

    let mut agent = RandomAgent::new(seed);
    let applied = play_out_observed(game, &mut agent, max_actions, observers)?;
    log::info!("Simulated {applied} actions with seed {seed}");
    Ok(())
}
