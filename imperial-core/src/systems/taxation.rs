use crate::state::GameState;
use imperial_data::{Board, Nation};
use tracing::instrument;

/// Taxes never exceed this.
pub const MAX_TAXES: i64 = 20;
pub const MAX_TAX_CHART: i64 = 15;
/// Taxes beyond this earn power points.
pub const POWER_THRESHOLD: i64 = 5;
/// Power points that end the game.
pub const WINNING_POWER: i64 = 25;

/// What one taxation step produced, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxReport {
    pub taxes: i64,
    /// Success bonus paid to the controller.
    pub bonus: i64,
    /// Added to the treasury after unit upkeep.
    pub treasury_gain: i64,
    pub power_gain: i64,
    pub game_over: bool,
}

/// Home factories of `nation` with no foreign armies on them.
pub fn unoccupied_factories<B: Board>(board: &B, state: &GameState, nation: Nation) -> u32 {
    board
        .home_provinces(nation)
        .iter()
        .filter(|p| state.provinces.get(*p).is_some_and(|s| s.factory.is_some()))
        .filter(|p| !state.has_foreign_armies(nation, p))
        .count() as u32
}

/// Collect taxes for `nation`.
///
/// Taxes are 2 per unoccupied home factory plus 1 per flag, capped at 20.
/// Anything above the tax chart marker goes to the controller and moves the
/// marker up; upkeep of 1 per unit comes out before the treasury is paid;
/// taxes above 5 score power points.
#[instrument(skip_all, name = "taxation")]
pub fn run_taxation<B: Board>(board: &B, state: &mut GameState, nation: Nation) -> TaxReport {
    let factories = i64::from(unoccupied_factories(board, state, nation));
    let flags = i64::from(state.flag_count(nation));
    let taxes = (2 * factories + flags).min(MAX_TAXES);
    let upkeep = i64::from(state.unit_count(nation));

    let chart = state.nation(nation).tax_chart_position;
    let bonus = (taxes - chart).max(0);
    if let Some(player) = state
        .controller(nation)
        .cloned()
        .and_then(|c| state.players.get_mut(&c))
    {
        player.cash += bonus;
    }

    let treasury_gain = (taxes - upkeep).max(0);
    let power_gain = (taxes - POWER_THRESHOLD).max(0);

    let ns = state.nation_mut(nation);
    ns.tax_chart_position = (chart + bonus).min(MAX_TAX_CHART);
    ns.treasury += treasury_gain;
    ns.power_points += power_gain;

    let game_over = ns.power_points + taxes >= WINNING_POWER;
    if game_over {
        ns.power_points = WINNING_POWER;
    }

    log::debug!(
        "{nation} taxation: {factories} factories, {flags} flags -> {taxes} (bonus {bonus}, treasury +{treasury_gain}, power +{power_gain})"
    );

    TaxReport {
        taxes,
        bonus,
        treasury_gain,
        power_gain,
        game_over,
    }
}
