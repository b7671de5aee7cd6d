use crate::state::{GameState, Phase, PlayerId};
use std::collections::BTreeMap;
use tracing::instrument;

/// Power points per bond multiplier step.
pub const POWER_PER_MULTIPLIER: i64 = 5;

/// Each player's bonds pay face × ⌊power / 5⌋ of their nation, plus cash.
pub fn final_scores(state: &GameState) -> BTreeMap<PlayerId, i64> {
    state
        .players
        .iter()
        .map(|(id, player)| {
            let bonds: i64 = player
                .bonds
                .iter()
                .map(|b| {
                    i64::from(b.number) * (state.nation(b.nation).power_points / POWER_PER_MULTIPLIER)
                })
                .sum();
            (id.clone(), bonds + player.cash)
        })
        .collect()
}

/// Highest score; on a tie the earliest player to join wins.
pub fn winner(order: &[PlayerId], scores: &BTreeMap<PlayerId, i64>) -> Option<PlayerId> {
    let mut best: Option<(&PlayerId, i64)> = None;
    for id in order {
        let Some(&score) = scores.get(id) else {
            continue;
        };
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((id, score));
        }
    }
    best.map(|(id, _)| id.clone())
}

/// Score the game, record the winner and stop.
#[instrument(skip_all, name = "end_game")]
pub fn end_game(state: &mut GameState) {
    let scores = final_scores(state);
    for (id, score) in &scores {
        if let Some(player) = state.players.get_mut(id) {
            player.score = *score;
        }
    }
    state.winner = winner(&state.order, &scores);
    state.units_to_move.clear();
    state.phase = Phase::GameOver;
    log::info!(
        "Game over: winner {} ({:?})",
        state.winner.as_deref().unwrap_or("-"),
        scores
    );
}
