use crate::input::{Action, Placement};
use crate::state::GameState;
use imperial_data::{Board, FactoryType, Nation, UnitType};
use std::collections::BTreeSet;
use tracing::instrument;

/// Most units a single import may place.
pub const MAX_IMPORTS: usize = 3;
pub const IMPORT_COST: i64 = 1;

/// Single-unit placements open to `nation`: armies in any home province,
/// fleets only where a shipyard can stand.
fn placement_options<B: Board>(board: &B, nation: Nation) -> Vec<Placement> {
    let mut options = Vec::new();
    for province in board.home_provinces(nation) {
        if board.factory_type(&province) == Some(FactoryType::Shipyard) {
            options.push(Placement::new(province.clone(), UnitType::Fleet));
        }
        options.push(Placement::new(province, UnitType::Army));
    }
    options
}

/// Every import `nation` can afford without breaking its unit caps.
///
/// Placements are ordered lists of up to three units. The empty import is
/// always offered so the phase can be closed.
pub fn import_actions<B: Board>(board: &B, state: &GameState, nation: Nation) -> BTreeSet<Action> {
    let options = placement_options(board, nation);
    let treasury = state.nation(nation).treasury;
    let armies_left = state
        .unit_limit(nation, UnitType::Army)
        .saturating_sub(state.unit_total(nation, UnitType::Army));
    let fleets_left = state
        .unit_limit(nation, UnitType::Fleet)
        .saturating_sub(state.unit_total(nation, UnitType::Fleet));

    let fits = |placements: &[Placement]| {
        let fleets = placements
            .iter()
            .filter(|p| p.unit == UnitType::Fleet)
            .count() as u32;
        let armies = placements.len() as u32 - fleets;
        placements.len() as i64 * IMPORT_COST <= treasury
            && armies <= armies_left
            && fleets <= fleets_left
    };

    let mut actions = BTreeSet::from([Action::import(Vec::new())]);
    let mut frontier: Vec<Vec<Placement>> = vec![Vec::new()];
    for _ in 0..MAX_IMPORTS {
        let mut next = Vec::new();
        for prefix in &frontier {
            for option in &options {
                let mut placements = prefix.clone();
                placements.push(option.clone());
                if fits(&placements) {
                    actions.insert(Action::import(placements.clone()));
                    next.push(placements);
                }
            }
        }
        frontier = next;
    }
    actions
}

/// Place imported units; each costs the treasury one.
#[instrument(skip_all, name = "import")]
pub fn apply_import(state: &mut GameState, nation: Nation, placements: &[Placement]) {
    for placement in placements {
        state.stack_mut(nation, &placement.province).add(placement.unit);
    }
    state.nation_mut(nation).treasury -= placements.len() as i64 * IMPORT_COST;
    log::debug!("{nation} imported {} units", placements.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_board, GameStateBuilder};

    #[test]
    fn test_import_counts() {
        let board = fixture_board();
        let state = GameStateBuilder::new()
            .with_treasury(Nation::BR, 10)
            .build();

        // brasilia, manaus: army; riodejaneiro: army or fleet -> 4 options
        let actions = import_actions(&board, &state, Nation::BR);
        assert_eq!(actions.len(), 1 + 4 + 16 + 64);
        assert!(actions.contains(&Action::import(vec![])));
        assert!(actions.contains(&Action::import(vec![
            Placement::new("riodejaneiro", UnitType::Fleet),
            Placement::new("riodejaneiro", UnitType::Fleet),
            Placement::new("manaus", UnitType::Army),
        ])));
        assert!(!actions.contains(&Action::import(vec![Placement::new(
            "manaus",
            UnitType::Fleet
        )])));
    }

    #[test]
    fn test_import_limited_by_treasury() {
        let board = fixture_board();
        let state = GameStateBuilder::new().with_treasury(Nation::BR, 1).build();

        let actions = import_actions(&board, &state, Nation::BR);
        assert_eq!(actions.len(), 1 + 4);
    }

    #[test]
    fn test_broke_nation_may_only_pass() {
        let board = fixture_board();
        let state = GameStateBuilder::new().with_treasury(Nation::BR, -2).build();
        assert_eq!(
            import_actions(&board, &state, Nation::BR),
            BTreeSet::from([Action::import(vec![])])
        );
    }

    #[test]
    fn test_import_respects_caps() {
        let board = fixture_board();
        let state = GameStateBuilder::new()
            .with_treasury(Nation::BR, 10)
            .with_units(Nation::BR, "westafrica", 7, 0)
            .with_units(Nation::BR, "southatlantic", 0, 8)
            .build();

        // One army left, no fleets: the three single-army imports only
        let actions = import_actions(&board, &state, Nation::BR);
        assert_eq!(actions.len(), 1 + 3);
    }

    #[test]
    fn test_apply_import() {
        let mut state = GameStateBuilder::new().with_treasury(Nation::IN, 5).build();
        apply_import(
            &mut state,
            Nation::IN,
            &[
                Placement::new("mumbai", UnitType::Fleet),
                Placement::new("newdelhi", UnitType::Army),
                Placement::new("newdelhi", UnitType::Army),
            ],
        );
        assert_eq!(state.nation(Nation::IN).treasury, 2);
        assert_eq!(state.stack(Nation::IN, "newdelhi").armies, 2);
        assert_eq!(state.stack(Nation::IN, "mumbai").fleets, 1);
    }
}
