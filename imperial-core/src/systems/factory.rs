use crate::input::Action;
use crate::state::GameState;
use crate::step::EngineError;
use imperial_data::{Board, Nation, ProvinceName};
use std::collections::BTreeSet;
use tracing::instrument;

pub const FACTORY_COST: i64 = 5;

/// Home provinces of `nation` where a factory could go up right now.
pub fn factory_sites<B: Board>(board: &B, state: &GameState, nation: Nation) -> BTreeSet<ProvinceName> {
    board
        .home_provinces(nation)
        .into_iter()
        .filter(|p| board.factory_type(p).is_some())
        .filter(|p| state.provinces.get(p).is_none_or(|s| s.factory.is_none()))
        .filter(|p| !state.has_foreign_armies(nation, p))
        .collect()
}

/// Whether entering the factory slot leaves `nation` anything to do.
pub fn can_build<B: Board>(board: &B, state: &GameState, nation: Nation) -> bool {
    state.nation(nation).treasury >= FACTORY_COST && !factory_sites(board, state, nation).is_empty()
}

pub fn build_actions<B: Board>(board: &B, state: &GameState, nation: Nation) -> BTreeSet<Action> {
    if state.nation(nation).treasury < FACTORY_COST {
        return BTreeSet::new();
    }
    factory_sites(board, state, nation)
        .into_iter()
        .map(Action::build_factory)
        .collect()
}

#[instrument(skip_all, name = "build_factory")]
pub fn build<B: Board>(
    board: &B,
    state: &mut GameState,
    nation: Nation,
    province: &str,
) -> Result<(), EngineError> {
    let factory = board
        .factory_type(province)
        .ok_or_else(|| EngineError::NoFactorySite(province.to_string()))?;
    state.provinces.entry(province.to_string()).or_default().factory = Some(factory);
    state.nation_mut(nation).treasury -= FACTORY_COST;
    log::debug!("{nation} builds {factory:?} in {province}");
    Ok(())
}
