//! Bond purchases and the control rule that follows them.

use crate::input::Action;
use crate::state::{Bond, GameState, PlayerId};
use crate::step::EngineError;
use imperial_data::Nation;
use std::collections::BTreeSet;
use tracing::instrument;

/// Bonds `player` may buy in the investor window.
///
/// A bond is affordable outright from cash, or as a trade-up: cash plus the
/// player's highest bond in the same nation covers it and the new bond costs
/// more than the one handed back.
pub fn purchase_actions(state: &GameState, player: &str) -> BTreeSet<Action> {
    let Some(holder) = state.players.get(player) else {
        return BTreeSet::new();
    };

    state
        .available_bonds
        .iter()
        .filter(|bond| {
            bond.cost() <= holder.cash
                || holder.top_bond(bond.nation).is_some_and(|top| {
                    bond.cost() > top.cost() && bond.cost() <= holder.cash + top.cost()
                })
        })
        .map(|bond| Action::bond_purchase(player, bond.nation, bond.cost()))
        .collect()
}

/// Sell `player` the `nation` bond priced `cost`.
///
/// If cash falls short, the buyer's highest bond in that nation goes back to
/// the pool and only the difference changes hands. The traded-in bond must
/// cost less than the new one.
#[instrument(skip_all, name = "bond_purchase")]
pub fn purchase(
    state: &mut GameState,
    player: &str,
    nation: Nation,
    cost: i64,
) -> Result<(), EngineError> {
    let bond =
        Bond::from_cost(nation, cost).ok_or(EngineError::UnknownBondCost { nation, cost })?;
    if !state.available_bonds.contains(&bond) {
        return Err(EngineError::BondUnavailable {
            nation,
            number: bond.number,
        });
    }

    let buyer = state
        .players
        .get_mut(player)
        .ok_or_else(|| EngineError::UnknownPlayer(player.to_string()))?;

    let mut price = cost;
    let mut returned = None;
    if cost > buyer.cash {
        let trade_in = buyer
            .top_bond(nation)
            .ok_or_else(|| EngineError::NoBondToTradeIn {
                player: player.to_string(),
                nation,
            })?;
        if trade_in.cost() >= cost {
            return Err(EngineError::TradeDown {
                nation,
                held: trade_in.number,
                bought: bond.number,
            });
        }
        buyer.bonds.remove(&trade_in);
        price -= trade_in.cost();
        returned = Some(trade_in);
    }
    buyer.cash -= price;
    buyer.bonds.insert(bond);

    state.available_bonds.remove(&bond);
    if let Some(trade_in) = returned {
        log::debug!("{player} trades in {nation} #{}", trade_in.number);
        state.available_bonds.insert(trade_in);
    }
    state.nation_mut(nation).treasury += price;

    log::debug!("{player} buys {nation} #{} for {cost} (paid {price})", bond.number);
    update_control(state, nation, player);
    Ok(())
}

/// Re-evaluate who controls `nation` after `buyer` purchased.
///
/// Control only moves when someone strictly out-invests the controller;
/// the buyer wins a tie for the top spot, then join order decides.
pub fn update_control(state: &mut GameState, nation: Nation, buyer: &str) {
    let investments: Vec<(PlayerId, i64)> = state
        .order
        .iter()
        .map(|id| (id.clone(), state.total_investment(id, nation)))
        .collect();
    let Some(max) = investments.iter().map(|(_, total)| *total).max() else {
        return;
    };

    let current = state
        .controller(nation)
        .map(|c| state.total_investment(c, nation));
    if current.is_some_and(|c| c >= max) {
        return;
    }
    if max == 0 {
        return;
    }

    let next = if state.total_investment(buyer, nation) == max {
        buyer.to_string()
    } else {
        match investments.into_iter().find(|(_, total)| *total == max) {
            Some((id, _)) => id,
            None => return,
        }
    };

    log::debug!(
        "{nation} control: {} -> {next}",
        state.controller(nation).map_or("-", String::as_str)
    );
    state.nation_mut(nation).controller = Some(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::GameStateBuilder;

    #[test]
    fn test_plain_purchase() {
        let mut state = GameStateBuilder::new()
            .with_player("alice", 10)
            .with_treasury(Nation::IN, 3)
            .build();

        purchase(&mut state, "alice", Nation::IN, 9).unwrap();

        assert_eq!(state.cash("alice"), 1);
        assert_eq!(state.nation(Nation::IN).treasury, 12);
        assert!(state.players["alice"].bonds.contains(&Bond::new(Nation::IN, 4)));
        assert!(!state.available_bonds.contains(&Bond::new(Nation::IN, 4)));
        assert_eq!(state.controller(Nation::IN).map(String::as_str), Some("alice"));
    }

    #[test]
    fn test_trade_in_when_short() {
        let mut state = GameStateBuilder::new()
            .with_player("bob", 4)
            .with_bond("bob", Nation::CN, 4)
            .with_bond("bob", Nation::CN, 1)
            .with_controller(Nation::CN, "bob")
            .with_treasury(Nation::CN, 11)
            .build();

        purchase(&mut state, "bob", Nation::CN, 12).unwrap();

        // 12 - 9 = 3 changes hands; the face-4 goes back to the pool
        assert_eq!(state.cash("bob"), 1);
        assert_eq!(state.nation(Nation::CN).treasury, 14);
        assert!(state.available_bonds.contains(&Bond::new(Nation::CN, 4)));
        assert!(state.players["bob"].bonds.contains(&Bond::new(Nation::CN, 5)));
        assert_eq!(state.total_investment("bob", Nation::CN), 14);
    }

    #[test]
    fn test_short_without_bond_to_trade() {
        let mut state = GameStateBuilder::new().with_player("bob", 1).build();
        let before = state.clone();
        assert_eq!(
            purchase(&mut state, "bob", Nation::EU, 4),
            Err(EngineError::NoBondToTradeIn {
                player: "bob".to_string(),
                nation: Nation::EU
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_unavailable_and_unknown_cost() {
        let mut state = GameStateBuilder::new()
            .with_player("alice", 50)
            .with_player("bob", 50)
            .with_bond("bob", Nation::RU, 4)
            .build();

        assert_eq!(
            purchase(&mut state, "alice", Nation::RU, 9),
            Err(EngineError::BondUnavailable {
                nation: Nation::RU,
                number: 4
            })
        );
        assert_eq!(
            purchase(&mut state, "alice", Nation::RU, 5),
            Err(EngineError::UnknownBondCost {
                nation: Nation::RU,
                cost: 5
            })
        );
    }

    #[test]
    fn test_control_moves_on_strictly_greater() {
        let mut state = GameStateBuilder::new()
            .with_player("alice", 0)
            .with_player("bob", 20)
            .with_bond("alice", Nation::US, 4)
            .with_controller(Nation::US, "alice")
            .build();

        purchase(&mut state, "bob", Nation::US, 6).unwrap();
        purchase(&mut state, "bob", Nation::US, 2).unwrap();
        assert_eq!(state.controller(Nation::US).map(String::as_str), Some("alice"));
        assert_eq!(state.total_investment("bob", Nation::US), 8);

        purchase(&mut state, "bob", Nation::US, 4).unwrap();
        assert_eq!(state.controller(Nation::US).map(String::as_str), Some("bob"));
    }

    #[test]
    fn test_first_purchase_takes_control() {
        let mut state = GameStateBuilder::new().with_player("carol", 5).build();
        purchase(&mut state, "carol", Nation::BR, 4).unwrap();
        assert_eq!(state.controller(Nation::BR).map(String::as_str), Some("carol"));
    }

    #[test]
    fn test_window_affordability_counts_trade_in() {
        let state = GameStateBuilder::new()
            .with_player("bob", 4)
            .with_bond("bob", Nation::CN, 4)
            .with_bond("bob", Nation::CN, 1)
            .build();

        let actions = purchase_actions(&state, "bob");
        // Russia: nothing to trade in, only cost <= 4 (faces 1 and 2)
        assert!(actions.contains(&Action::bond_purchase("bob", Nation::RU, 4)));
        assert!(!actions.contains(&Action::bond_purchase("bob", Nation::RU, 6)));
        // China: cash 4 + face-4 (9) covers up to 13
        assert!(actions.contains(&Action::bond_purchase("bob", Nation::CN, 12)));
        assert!(!actions.contains(&Action::bond_purchase("bob", Nation::CN, 16)));
        // Bonds bob already holds are not for sale
        assert!(!actions.contains(&Action::bond_purchase("bob", Nation::CN, 9)));
        // Short of cash, a cheaper CN bond would be a trade-down
        assert!(!actions.contains(&Action::bond_purchase("bob", Nation::CN, 6)));
    }

    #[test]
    fn test_no_trade_down() {
        let mut state = GameStateBuilder::new()
            .with_player("bob", 0)
            .with_bond("bob", Nation::RU, 9)
            .with_controller(Nation::RU, "bob")
            .with_treasury(Nation::RU, 30)
            .build();

        let actions = purchase_actions(&state, "bob");
        assert!(!actions.contains(&Action::bond_purchase("bob", Nation::RU, 2)));
        assert!(actions.iter().all(|a| !matches!(a, Action::BondPurchase { nation: Nation::RU, .. })));

        let before = state.clone();
        assert_eq!(
            purchase(&mut state, "bob", Nation::RU, 2),
            Err(EngineError::TradeDown {
                nation: Nation::RU,
                held: 9,
                bought: 1
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_cash_purchase_keeps_expensive_bond() {
        let mut state = GameStateBuilder::new()
            .with_player("bob", 2)
            .with_bond("bob", Nation::RU, 9)
            .with_controller(Nation::RU, "bob")
            .build();

        assert!(purchase_actions(&state, "bob").contains(&Action::bond_purchase("bob", Nation::RU, 2)));
        purchase(&mut state, "bob", Nation::RU, 2).unwrap();

        assert_eq!(state.cash("bob"), 0);
        assert_eq!(state.total_investment("bob", Nation::RU), 32);
    }
}
