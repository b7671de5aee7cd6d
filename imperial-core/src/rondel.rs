//! The rondel: an 8-slot wheel each nation advances around on its turn.

use crate::input::Action;
use crate::state::GameState;
use imperial_data::Nation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RondelSlot {
    Factory,
    Production1,
    Maneuver1,
    Investor,
    Import,
    Production2,
    Maneuver2,
    Taxation,
}

impl RondelSlot {
    /// Slots in wheel order.
    pub const ALL: [RondelSlot; 8] = [
        RondelSlot::Factory,
        RondelSlot::Production1,
        RondelSlot::Maneuver1,
        RondelSlot::Investor,
        RondelSlot::Import,
        RondelSlot::Production2,
        RondelSlot::Maneuver2,
        RondelSlot::Taxation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The slot `steps` positions further along the wheel.
    pub fn advance(self, steps: usize) -> RondelSlot {
        Self::ALL[(self.index() + steps) % Self::ALL.len()]
    }

    /// Forward distance from `self` to `to` (0..8).
    pub fn distance_to(self, to: RondelSlot) -> usize {
        (to.index() + Self::ALL.len() - self.index()) % Self::ALL.len()
    }

    pub fn name(self) -> &'static str {
        match self {
            RondelSlot::Factory => "factory",
            RondelSlot::Production1 => "production1",
            RondelSlot::Maneuver1 => "maneuver1",
            RondelSlot::Investor => "investor",
            RondelSlot::Import => "import",
            RondelSlot::Production2 => "production2",
            RondelSlot::Maneuver2 => "maneuver2",
            RondelSlot::Taxation => "taxation",
        }
    }
}

impl fmt::Display for RondelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Price of moving `distance` slots. Up to 3 is free, 4..=6 cost 2/4/6.
pub fn move_cost(distance: usize) -> Option<i64> {
    match distance {
        1..=3 => Some(0),
        4 => Some(2),
        5 => Some(4),
        6 => Some(6),
        _ => None,
    }
}

/// Every (slot, cost) pair reachable from `position`, in wheel order.
///
/// A nation with no position yet may enter any slot for free.
pub fn moves_from(position: Option<RondelSlot>) -> Vec<(RondelSlot, i64)> {
    match position {
        None => RondelSlot::ALL.into_iter().map(|slot| (slot, 0)).collect(),
        Some(from) => (1..=6)
            .filter_map(|distance| move_cost(distance).map(|cost| (from.advance(distance), cost)))
            .collect(),
    }
}

/// Rondel actions for `nation` that its controller can pay for.
pub fn rondel_actions(state: &GameState, nation: Nation) -> BTreeSet<Action> {
    let cash = state
        .controller(nation)
        .map(|player| state.cash(player))
        .unwrap_or(0);

    moves_from(state.nation(nation).rondel_position)
        .into_iter()
        .filter(|&(_, cost)| cost <= cash)
        .map(|(slot, cost)| Action::rondel(nation, slot, cost))
        .collect()
}

/// Whether moving `from` -> `to` carries the nation past the investor slot.
///
/// The investor slot must lie strictly between the two; landing on it is
/// handled by the investor phase itself.
pub fn passes_investor(from: Option<RondelSlot>, to: RondelSlot) -> bool {
    let Some(from) = from else {
        return false;
    };
    let investor = from.distance_to(RondelSlot::Investor);
    investor > 0 && investor < from.distance_to(to)
}
