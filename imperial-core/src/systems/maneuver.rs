//! Unit movement during a maneuver turn.
//!
//! At the start of the turn every unit of the acting nation is queued, fleets
//! first. Each move consumes one queue entry; once an army moves, fleets can
//! no longer move this turn. Entering a province held by another nation opens
//! a conflict; entering any other non-home province plants the mover's flag.

use crate::input::Action;
use crate::state::{Conflict, GameState, PendingUnit, Phase};
use crate::step::EngineError;
use crate::systems::conflict;
use imperial_data::{Board, Nation, ProvinceName, UnitType};
use std::collections::BTreeSet;
use tracing::instrument;

/// Queue every unit of `nation` for this maneuver turn.
pub fn begin(state: &mut GameState, nation: Nation) {
    let stacks = state.units.get(&nation).cloned().unwrap_or_default();
    let mut queue = Vec::new();
    for unit in [UnitType::Fleet, UnitType::Army] {
        for (province, stack) in &stacks {
            for _ in 0..stack.count(unit) {
                queue.push(PendingUnit {
                    province: province.clone(),
                    unit,
                });
            }
        }
    }
    log::debug!("{nation} maneuvers with {} units", queue.len());
    state.units_to_move = queue;
    state.phase = Phase::Maneuvering;
}

/// End-maneuver plus every move a queued unit can make.
pub fn maneuver_actions<B: Board>(board: &B, state: &GameState) -> BTreeSet<Action> {
    let nation = state.current_nation;
    let friendly = state.friendly_fleets(nation);
    let no_fleets = BTreeSet::new();

    let origins: BTreeSet<(&ProvinceName, UnitType)> = state
        .units_to_move
        .iter()
        .filter(|p| state.stack(nation, &p.province).count(p.unit) > 0)
        .map(|p| (&p.province, p.unit))
        .collect();

    let mut actions = BTreeSet::from([Action::EndManeuver]);
    for (origin, unit) in origins {
        let is_fleet = unit == UnitType::Fleet;
        let convoy = if is_fleet { &no_fleets } else { &friendly };
        for destination in board.neighbors(origin, nation, is_fleet, convoy) {
            actions.insert(Action::maneuver(origin.clone(), destination));
        }
    }
    actions
}

/// Move one unit of the acting nation.
///
/// The unit's type follows from the destination: fleets only ever enter
/// oceans. Returns the conflict the move opened, if any.
#[instrument(skip_all, name = "maneuver")]
pub fn move_unit<B: Board>(
    board: &B,
    state: &mut GameState,
    origin: &str,
    destination: &str,
) -> Result<Option<Conflict>, EngineError> {
    let nation = state.current_nation;
    let unit = if board.is_ocean(destination) {
        UnitType::Fleet
    } else {
        UnitType::Army
    };

    if !state.stack_mut(nation, origin).remove(unit) {
        return Err(EngineError::NoUnitToMove {
            nation,
            unit,
            province: origin.to_string(),
        });
    }
    state.stack_mut(nation, destination).add(unit);

    if unit == UnitType::Army {
        state.units_to_move.retain(|p| p.unit == UnitType::Army);
    }
    if let Some(i) = state
        .units_to_move
        .iter()
        .position(|p| p.province == origin && p.unit == unit)
    {
        state.units_to_move.remove(i);
    }
    log::trace!("{nation} {unit} {origin} -> {destination}");

    if let Some(conflict) = conflict::detect(state, nation, destination) {
        log::debug!(
            "{} contests {} held by {}",
            conflict.challenger,
            conflict.province,
            conflict.incumbent
        );
        return Ok(Some(conflict));
    }

    if board.home_nation(destination).is_none() {
        state
            .provinces
            .entry(destination.to_string())
            .or_default()
            .flag = Some(nation);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_board, GameStateBuilder};

    fn maneuvering(builder: GameStateBuilder) -> GameState {
        let mut state = builder.current(Nation::RU).build();
        begin(&mut state, Nation::RU);
        state
    }

    #[test]
    fn test_queue_orders_fleets_first() {
        let state = maneuvering(
            GameStateBuilder::new()
                .with_units(Nation::RU, "moscow", 2, 0)
                .with_units(Nation::RU, "arcticocean", 0, 1),
        );
        let units: Vec<UnitType> = state.units_to_move.iter().map(|p| p.unit).collect();
        assert_eq!(units, vec![UnitType::Fleet, UnitType::Army, UnitType::Army]);
        assert_eq!(state.phase, Phase::Maneuvering);
    }

    #[test]
    fn test_no_units_only_end_maneuver() {
        let state = maneuvering(GameStateBuilder::new());
        assert_eq!(
            maneuver_actions(&fixture_board(), &state),
            BTreeSet::from([Action::EndManeuver])
        );
    }

    #[test]
    fn test_fleet_and_army_destinations() {
        let board = fixture_board();
        let state = maneuvering(
            GameStateBuilder::new()
                .with_units(Nation::RU, "vladivostok", 0, 1)
                .with_units(Nation::RU, "kazakhstan", 1, 0),
        );

        let actions = maneuver_actions(&board, &state);
        assert!(actions.contains(&Action::maneuver("vladivostok", "northpacific")));
        assert!(!actions.contains(&Action::maneuver("vladivostok", "novosibirsk")));
        assert!(actions.contains(&Action::maneuver("kazakhstan", "centralasia")));
        assert!(actions.contains(&Action::maneuver("kazakhstan", "moscow")));
        assert!(!actions.contains(&Action::maneuver("kazakhstan", "newdelhi")));
    }

    #[test]
    fn test_convoy_through_friendly_fleet() {
        let board = fixture_board();
        let state = maneuvering(
            GameStateBuilder::new()
                .with_units(Nation::RU, "stpetersburg", 1, 0)
                .with_units(Nation::RU, "arcticocean", 0, 1),
        );

        let actions = maneuver_actions(&board, &state);
        assert!(actions.contains(&Action::maneuver("stpetersburg", "london")));
        assert!(!actions.contains(&Action::maneuver("stpetersburg", "arcticocean")));
    }

    #[test]
    fn test_move_plants_flag_abroad_only() {
        let board = fixture_board();
        let mut state = maneuvering(
            GameStateBuilder::new().with_units(Nation::RU, "moscow", 2, 0),
        );

        assert_eq!(move_unit(&board, &mut state, "moscow", "kazakhstan"), Ok(None));
        assert_eq!(state.provinces["kazakhstan"].flag, Some(Nation::RU));
        assert_eq!(state.units_to_move.len(), 1);

        assert_eq!(move_unit(&board, &mut state, "moscow", "berlin"), Ok(None));
        assert!(state.provinces.get("berlin").is_none_or(|p| p.flag.is_none()));
        assert!(state.units_to_move.is_empty());
    }

    #[test]
    fn test_army_move_freezes_fleets() {
        let board = fixture_board();
        let mut state = maneuvering(
            GameStateBuilder::new()
                .with_units(Nation::RU, "moscow", 1, 0)
                .with_units(Nation::RU, "vladivostok", 0, 2),
        );
        assert_eq!(state.units_to_move.len(), 3);

        move_unit(&board, &mut state, "moscow", "kazakhstan").unwrap();
        assert!(state.units_to_move.is_empty());
        assert_eq!(
            maneuver_actions(&board, &state),
            BTreeSet::from([Action::EndManeuver])
        );
    }

    #[test]
    fn test_moving_into_occupied_province_opens_conflict() {
        let board = fixture_board();
        let mut state = maneuvering(
            GameStateBuilder::new()
                .with_units(Nation::RU, "novosibirsk", 1, 0)
                .with_units(Nation::CN, "mongolia", 1, 0)
                .with_flag("mongolia", Nation::CN),
        );

        let conflict = move_unit(&board, &mut state, "novosibirsk", "mongolia").unwrap();
        assert_eq!(
            conflict,
            Some(Conflict {
                province: "mongolia".to_string(),
                incumbent: Nation::CN,
                challenger: Nation::RU,
            })
        );
        assert_eq!(state.provinces["mongolia"].flag, Some(Nation::CN));
    }

    #[test]
    fn test_move_without_unit_is_error() {
        let board = fixture_board();
        let mut state = maneuvering(GameStateBuilder::new());
        assert!(matches!(
            move_unit(&board, &mut state, "moscow", "kazakhstan"),
            Err(EngineError::NoUnitToMove { .. })
        ));
    }
}
