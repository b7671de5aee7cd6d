use crate::input::Action;
use crate::state::{Conflict, GameState, PendingUnit};
use imperial_data::{Nation, UnitType};
use std::collections::{BTreeMap, BTreeSet};
use tracing::instrument;

/// The first other nation (in turn-cycle order) with units in `province`.
pub fn detect(state: &GameState, challenger: Nation, province: &str) -> Option<Conflict> {
    Nation::ALL
        .into_iter()
        .filter(|&n| n != challenger)
        .find(|&n| !state.stack(n, province).is_empty())
        .map(|incumbent| Conflict {
            province: province.to_string(),
            incumbent,
            challenger,
        })
}

/// Fight each unit type the incumbent has there, or coexist.
pub fn conflict_actions(state: &GameState, conflict: &Conflict) -> BTreeSet<Action> {
    let Conflict {
        province,
        incumbent,
        challenger,
    } = conflict;
    let defenders = state.stack(*incumbent, province);

    let mut actions = BTreeSet::from([Action::coexist(province.clone(), *incumbent, *challenger)]);
    for unit in [UnitType::Army, UnitType::Fleet] {
        if defenders.count(unit) > 0 {
            actions.insert(Action::fight(province.clone(), *incumbent, *challenger, unit));
        }
    }
    actions
}

/// Trade one unit on each side.
///
/// The incumbent loses a unit of `target`; the challenger loses the same
/// type if it has one there, otherwise the other type. The challenger takes
/// the flag if it is left with more units than the incumbent.
#[instrument(skip_all, name = "fight")]
pub fn fight(
    state: &mut GameState,
    province: &str,
    incumbent: Nation,
    challenger: Nation,
    target: UnitType,
) {
    state.stack_mut(incumbent, province).remove(target);

    let attackers = state.stack_mut(challenger, province);
    if !attackers.remove(target) {
        let other = match target {
            UnitType::Army => UnitType::Fleet,
            UnitType::Fleet => UnitType::Army,
        };
        attackers.remove(other);
    }

    let remaining = state.stack(challenger, province).total();
    let defending = state.stack(incumbent, province).total();
    if remaining > defending {
        log::debug!("{challenger} takes {province} from {incumbent}");
        state.provinces.entry(province.to_string()).or_default().flag = Some(challenger);
    }

    trim_queue(state, challenger);
}

/// Drop queued units that no longer exist on the board.
pub fn trim_queue(state: &mut GameState, nation: Nation) {
    let mut seen: BTreeMap<PendingUnit, u32> = BTreeMap::new();
    let queue = std::mem::take(&mut state.units_to_move);
    state.units_to_move = queue
        .into_iter()
        .filter(|pending| {
            let count = seen.entry(pending.clone()).or_insert(0);
            *count += 1;
            *count <= state.stack(nation, &pending.province).count(pending.unit)
        })
        .collect();
}
