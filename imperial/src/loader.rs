//! Reading boards and action logs from disk.

use anyhow::{bail, Context, Result};
use imperial_core::{Action, PlayerSeat};
use imperial_data::{MapBoard, Nation};
use std::path::Path;

pub fn load_board(path: &Path) -> Result<MapBoard> {
    let board = MapBoard::load(path)
        .with_context(|| format!("Failed to load board from {}", path.display()))?;
    log::info!("Loaded board {} ({} provinces)", path.display(), board.province_count());
    Ok(board)
}

/// An action log is a JSON array of actions in wire format.
pub fn load_log(path: &Path) -> Result<Vec<Action>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read action log {}", path.display()))?;
    let log: Vec<Action> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse action log {}", path.display()))?;
    log::info!("Loaded {} actions from {}", log.len(), path.display());
    Ok(log)
}

pub fn save_log(path: &Path, log: &[Action]) -> Result<()> {
    let json = serde_json::to_string_pretty(log)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write action log {}", path.display()))?;
    log::info!("Saved {} actions to {}", log.len(), path.display());
    Ok(())
}

/// Seats for a self-play game: `player1`.. sit at the first `players` nations.
pub fn simulated_seats(players: usize) -> Result<Vec<PlayerSeat>> {
    if !(2..=Nation::ALL.len()).contains(&players) {
        bail!("Cannot simulate {players} players: games seat 2 to 6");
    }
    Ok(Nation::ALL[..players]
        .iter()
        .enumerate()
        .map(|(i, &nation)| PlayerSeat::new(format!("player{}", i + 1), nation))
        .collect())
}
