//! Plain-text summary of a game.

use imperial_core::{Game, GameState};
use imperial_data::{Board, Nation};
use std::fmt::Write;

pub fn summary<B: Board>(game: &Game<B>, ignored: usize) -> String {
    let state = game.state();
    let mut out = String::new();

    let _ = writeln!(out, "Actions: {} applied, {ignored} ignored", game.log().len());
    let _ = writeln!(out, "Phase: {:?}", state.phase);
    if !state.is_over() {
        let _ = writeln!(
            out,
            "Acting: {} ({})",
            state.current_nation,
            state.current_player.as_deref().unwrap_or("-")
        );
    }

    let _ = writeln!(out, "\nNation  Controller  Treasury  Power  Tax  Rondel");
    for nation in Nation::ALL {
        let ns = state.nation(nation);
        let _ = writeln!(
            out,
            "{:<6}  {:<10}  {:>8}  {:>5}  {:>3}  {}",
            nation.to_string(),
            ns.controller.as_deref().unwrap_or("-"),
            ns.treasury,
            ns.power_points,
            ns.tax_chart_position,
            ns.rondel_position.map(|s| s.to_string()).unwrap_or_else(|| "-".into())
        );
    }

    let _ = writeln!(out, "\nPlayer      Cash  Bonds  Score");
    for id in &state.order {
        let player = &state.players[id];
        let _ = writeln!(
            out,
            "{:<10}  {:>4}  {:>5}  {:>5}",
            id,
            player.cash,
            player.bonds.len(),
            player.score
        );
    }

    let _ = writeln!(out, "\nLegal actions: {}", game.available_actions().len());
    if let Some(winner) = winner_line(state) {
        let _ = writeln!(out, "{winner}");
    }
    out
}

fn winner_line(state: &GameState) -> Option<String> {
    let winner = state.winner.as_ref()?;
    Some(format!("Winner: {winner} ({})", state.players[winner].score))
}
