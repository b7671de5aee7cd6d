//! Standard 2030 starting position.

use crate::input::PlayerSeat;
use crate::state::{
    Bond, GameState, NationState, Phase, PlayerId, PlayerState, ProvinceState, UnitLimits,
};
use crate::step::EngineError;
use crate::turn;
use imperial_data::{FactoryType, Nation, ProvinceName};
use tracing::instrument;

pub const STARTING_CASH: i64 = 2;

const STARTING_ARMAMENTS: [&str; 6] = [
    "chicago", "brasilia", "paris", "moscow", "beijing", "newdelhi",
];
const STARTING_SHIPYARDS: [&str; 6] = [
    "neworleans",
    "riodejaneiro",
    "london",
    "vladivostok",
    "shanghai",
    "mumbai",
];

/// Nation whose face-1 bond comes with a seat at `nation`.
pub fn partner_nation(nation: Nation) -> Nation {
    match nation {
        Nation::US => Nation::RU,
        Nation::IN => Nation::BR,
        Nation::BR => Nation::CN,
        Nation::CN => Nation::US,
        Nation::RU => Nation::EU,
        Nation::EU => Nation::IN,
    }
}

/// Nations a seat receives bonds in, given the table size.
fn seat_nations(seat: Nation, players: usize) -> Result<Vec<Nation>, EngineError> {
    use Nation::*;
    let nations = match (players, seat) {
        (2, RU) => vec![RU, IN, US],
        (2, CN) => vec![CN, BR, EU],
        (3, RU) => vec![RU, BR],
        (3, CN) => vec![CN, EU],
        (3, IN) => vec![IN, US],
        (4..=6, nation) => vec![nation],
        _ => {
            return Err(EngineError::InvalidSeat {
                nation: seat,
                players,
            })
        }
    };
    Ok(nations)
}

/// Build the starting state for `seats` on a board with `province_names`.
///
/// Leaves the game waiting for the first controlled nation's rondel move.
/// The legal-action cache is filled in by the engine.
#[instrument(skip_all, name = "setup")]
pub fn initial_state(
    seats: &[PlayerSeat],
    province_names: &[ProvinceName],
) -> Result<GameState, EngineError> {
    if !(2..=6).contains(&seats.len()) {
        return Err(EngineError::InvalidPlayerCount(seats.len()));
    }

    let mut state = GameState {
        available_bonds: Bond::universe(),
        ..GameState::default()
    };

    for seat in seats {
        if state.players.contains_key(&seat.id) {
            return Err(EngineError::DuplicatePlayer(seat.id.clone()));
        }
        state.order.push(seat.id.clone());
        state
            .players
            .insert(seat.id.clone(), PlayerState::new(STARTING_CASH));
    }

    for seat in seats {
        for nation in seat_nations(seat.nation, seats.len())? {
            for bond in [Bond::new(nation, 4), Bond::new(partner_nation(nation), 1)] {
                if !state.available_bonds.remove(&bond) {
                    return Err(EngineError::DuplicateSeat(nation));
                }
                if let Some(player) = state.players.get_mut(&seat.id) {
                    player.bonds.insert(bond);
                }
            }
        }
    }

    for nation in Nation::ALL {
        let treasury = state
            .players
            .values()
            .flat_map(|p| p.bonds_of(nation))
            .map(Bond::cost)
            .sum();
        let controller = top_bond_holder(&state, nation);
        state.nations.insert(
            nation,
            NationState {
                controller,
                treasury,
                ..NationState::default()
            },
        );
        state
            .unit_limits
            .insert(nation, UnitLimits::for_nation(nation));
        let stacks = state.units.entry(nation).or_default();
        for province in province_names {
            stacks.insert(province.clone(), Default::default());
        }
    }

    for province in province_names {
        let factory = if STARTING_ARMAMENTS.contains(&province.as_str()) {
            Some(FactoryType::Armaments)
        } else if STARTING_SHIPYARDS.contains(&province.as_str()) {
            Some(FactoryType::Shipyard)
        } else {
            None
        };
        state.provinces.insert(
            province.clone(),
            ProvinceState {
                flag: None,
                factory,
            },
        );
    }

    state.investor_card_holder = investor_card_start(&state);

    let first = turn::next_controlled_nation(&state, Nation::RU)?;
    state.current_nation = first;
    state.current_player = state.controller(first).cloned();
    state.phase = Phase::AwaitingRondel;

    log::debug!(
        "Set up {} players, {} provinces; {} opens",
        state.order.len(),
        state.provinces.len(),
        first
    );
    Ok(state)
}

/// Holder of the most expensive bond in `nation`; ties go to the earlier seat.
fn top_bond_holder(state: &GameState, nation: Nation) -> Option<PlayerId> {
    let mut best: Option<(&PlayerId, i64)> = None;
    for id in &state.order {
        let Some(top) = state.players.get(id).and_then(|p| p.top_bond(nation)) else {
            continue;
        };
        if best.is_none_or(|(_, cost)| top.cost() > cost) {
            best = Some((id, top.cost()));
        }
    }
    best.map(|(id, _)| id.clone())
}

/// The card starts with the player seated after Russia's controller.
fn investor_card_start(state: &GameState) -> Option<PlayerId> {
    let order = &state.order;
    let index = state
        .controller(Nation::RU)
        .and_then(|ru| order.iter().position(|p| p == ru))
        .map(|i| (i + 1) % order.len())
        .unwrap_or(0);
    order.get(index).cloned()
}
