//! Turn bookkeeping shared by every phase that can end a nation's turn.

use crate::rondel::passes_investor;
use crate::state::{GameState, Phase};
use crate::step::EngineError;
use crate::systems::investor;
use imperial_data::Nation;

/// First nation at or after `start` in the turn cycle that has a controller.
pub fn next_controlled_nation(state: &GameState, start: Nation) -> Result<Nation, EngineError> {
    let mut nation = start;
    for _ in 0..Nation::ALL.len() {
        if state.controller(nation).is_some() {
            return Ok(nation);
        }
        nation = nation.next();
    }
    Err(EngineError::NoControlledNation)
}

/// Hand the turn to the next controlled nation and await its rondel move.
pub fn advance(state: &mut GameState) -> Result<(), EngineError> {
    let next = next_controlled_nation(state, state.current_nation.next())?;
    state.current_nation = next;
    state.current_player = state.controller(next).cloned();
    state.units_to_move.clear();
    state.phase = Phase::AwaitingRondel;
    log::trace!(
        "Turn passes to {} ({})",
        next,
        state.current_player.as_deref().unwrap_or("-")
    );
    Ok(())
}

/// Close the acting nation's turn.
///
/// A nation whose last rondel move carried it past the investor slot opens
/// the investor bond window first; otherwise play passes on.
pub fn finish(state: &mut GameState) -> Result<(), EngineError> {
    let nation = state.nation(state.current_nation);
    let passed = nation
        .rondel_position
        .is_some_and(|to| passes_investor(nation.previous_rondel_position, to));

    if passed {
        investor::open_bond_window(state);
        Ok(())
    } else {
        advance(state)
    }
}
