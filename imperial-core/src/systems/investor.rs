//! Investor slot payouts and the investor card.

use crate::state::{GameState, Phase};
use imperial_data::Nation;
use tracing::instrument;

/// Paid to the card holder when the investor window opens.
pub const INVESTOR_BONUS: i64 = 2;

/// Pay bond interest for `nation`.
///
/// Every other player collects their bond face numbers. The treasury pays
/// each coupon it can cover in full; the acting player covers the rest. The
/// acting controller then takes their own interest only if the treasury has
/// more than that left.
#[instrument(skip_all, name = "investor_payout")]
pub fn pay_interest(state: &mut GameState, nation: Nation) {
    let acting = state.current_player.clone();

    for id in state.order.clone() {
        if acting.as_deref() == Some(id.as_str()) {
            continue;
        }
        let coupons: Vec<i64> = state
            .players
            .get(&id)
            .map(|p| p.bonds_of(nation).map(|b| i64::from(b.number)).collect())
            .unwrap_or_default();

        for coupon in coupons {
            let treasury = &mut state.nation_mut(nation).treasury;
            if *treasury >= coupon {
                *treasury -= coupon;
            } else if let Some(payer) = acting.as_ref().and_then(|a| state.players.get_mut(a)) {
                payer.cash -= coupon;
            }
            if let Some(investor) = state.players.get_mut(&id) {
                investor.cash += coupon;
            }
        }
    }

    let Some(acting) = acting else {
        return;
    };
    if state.controller(nation) != Some(&acting) {
        return;
    }
    let owed: i64 = state
        .players
        .get(&acting)
        .map(|p| p.bonds_of(nation).map(|b| i64::from(b.number)).sum())
        .unwrap_or(0);
    let treasury = &mut state.nation_mut(nation).treasury;
    if *treasury > owed {
        *treasury -= owed;
        if let Some(player) = state.players.get_mut(&acting) {
            player.cash += owed;
        }
    }
}

/// Pay the card holder and let them buy a bond.
pub fn open_bond_window(state: &mut GameState) {
    if let Some(holder) = state
        .investor_card_holder
        .as_ref()
        .and_then(|h| state.players.get_mut(h))
    {
        holder.cash += INVESTOR_BONUS;
    }
    state.phase = Phase::InvestorBondPurchase;
    log::debug!(
        "Investor window for {}",
        state.investor_card_holder.as_deref().unwrap_or("-")
    );
}

/// Retire the card for this round and hand it to the previous player.
pub fn pass_card(state: &mut GameState) {
    state.investor_card_active = false;
    let order = &state.order;
    let next = state
        .investor_card_holder
        .as_ref()
        .and_then(|h| order.iter().position(|p| p == h))
        .map(|i| (i + order.len() - 1) % order.len())
        .and_then(|i| order.get(i).cloned());
    if next.is_some() {
        state.investor_card_holder = next;
    }
}
