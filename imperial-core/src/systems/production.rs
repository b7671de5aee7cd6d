use crate::state::GameState;
use imperial_data::{Board, Nation, UnitType};
use tracing::instrument;

/// Each home factory of `nation` turns out one unit of its kind.
///
/// A factory whose unit type is already at the nation's cap produces
/// nothing. Returns the number of units produced.
#[instrument(skip_all, name = "production")]
pub fn run_production<B: Board>(board: &B, state: &mut GameState, nation: Nation) -> u32 {
    let mut produced = 0;
    for province in board.home_provinces(nation) {
        let Some(factory) = state.provinces.get(&province).and_then(|p| p.factory) else {
            continue;
        };
        let unit = UnitType::produced_by(factory);
        if state.unit_total(nation, unit) >= state.unit_limit(nation, unit) {
            log::trace!("{nation} at {unit} cap, {province} idle");
            continue;
        }
        state.stack_mut(nation, &province).add(unit);
        produced += 1;
    }
    log::debug!("{nation} produced {produced} units");
    produced
}
