use crate::config::EngineConfig;
use crate::input::Action;
use crate::observer::{ObserverRegistry, Transition};
use crate::rondel::{rondel_actions, RondelSlot};
use crate::setup;
use crate::state::{GameState, Phase, PlayerId};
use crate::systems::{self, bonds, conflict, factory, import, investor, maneuver};
use crate::turn;
use imperial_data::{Board, Nation, ProvinceName, UnitType};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// A broken invariant. The state is left as it was before the action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid player count {0}: games seat 2 to 6 players")]
    InvalidPlayerCount(usize),
    #[error("Nation {nation} cannot be seated in a {players}-player game")]
    InvalidSeat { nation: Nation, players: usize },
    #[error("Nation {0} is assigned to more than one seat")]
    DuplicateSeat(Nation),
    #[error("Player '{0}' joined twice")]
    DuplicatePlayer(PlayerId),
    #[error("Unknown player '{0}'")]
    UnknownPlayer(PlayerId),
    #[error("Bond {nation} #{number} is not available")]
    BondUnavailable { nation: Nation, number: u8 },
    #[error("No {nation} bond costs {cost}")]
    UnknownBondCost { nation: Nation, cost: i64 },
    #[error("{player} is short of cash and holds no {nation} bond to trade in")]
    NoBondToTradeIn { player: PlayerId, nation: Nation },
    #[error("Trading {nation} #{held} in for the cheaper #{bought}")]
    TradeDown { nation: Nation, held: u8, bought: u8 },
    #[error("{nation} has no {unit} in '{province}'")]
    NoUnitToMove {
        nation: Nation,
        unit: UnitType,
        province: ProvinceName,
    },
    #[error("Province '{0}' has no factory site")]
    NoFactorySite(ProvinceName),
    #[error("No nation has a controller")]
    NoControlledNation,
}

/// What `tick` did with an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Not legal in the current state; nothing changed.
    Ignored,
}

/// The legal actions in `state`, excluding the always-available
/// `initialize`/`endGame` meta actions.
pub fn legal_actions<B: Board>(board: &B, state: &GameState) -> BTreeSet<Action> {
    let nation = state.current_nation;
    match &state.phase {
        Phase::Setup | Phase::GameOver => BTreeSet::new(),
        Phase::AwaitingRondel => {
            let moves = rondel_actions(state, nation);
            if moves.is_empty() {
                BTreeSet::from([Action::Noop])
            } else {
                moves
            }
        }
        Phase::Importing => import::import_actions(board, state, nation),
        Phase::BuildingFactory => factory::build_actions(board, state, nation),
        Phase::InvestorBondPurchase => {
            let mut actions = state
                .investor_card_holder
                .as_deref()
                .map(|holder| bonds::purchase_actions(state, holder))
                .unwrap_or_default();
            actions.insert(Action::Noop);
            actions
        }
        Phase::Maneuvering => maneuver::maneuver_actions(board, state),
        Phase::HandlingConflict(c) => conflict::conflict_actions(state, c),
    }
}

/// Apply an already-validated action to `state` in place.
///
/// On error `state` may be half-updated; callers work on a copy.
pub fn apply_action<B: Board>(
    board: &B,
    state: &mut GameState,
    action: &Action,
) -> Result<(), EngineError> {
    match action {
        Action::Initialize { players } => {
            let log = std::mem::take(&mut state.log);
            *state = setup::initial_state(players, &board.province_names())?;
            state.log = log;
        }
        Action::EndGame => systems::end_game(state),
        Action::Noop => {
            if state.phase == Phase::InvestorBondPurchase {
                investor::pass_card(state);
            }
            turn::advance(state)?;
        }
        Action::BondPurchase {
            player,
            nation,
            cost,
        } => {
            bonds::purchase(state, player, *nation, *cost)?;
            investor::pass_card(state);
            turn::advance(state)?;
        }
        Action::Rondel { nation, slot, cost } => rondel(board, state, *nation, *slot, *cost)?,
        Action::Import { placements } => {
            let nation = state.current_nation;
            import::apply_import(state, nation, placements);
            turn::finish(state)?;
        }
        Action::BuildFactory { province } => {
            let nation = state.current_nation;
            factory::build(board, state, nation, province)?;
            turn::finish(state)?;
        }
        Action::Maneuver {
            origin,
            destination,
        } => match maneuver::move_unit(board, state, origin, destination)? {
            Some(conflict) => state.phase = Phase::HandlingConflict(conflict),
            None => continue_maneuver(state)?,
        },
        Action::EndManeuver => {
            state.units_to_move.clear();
            turn::finish(state)?;
        }
        Action::Fight {
            province,
            incumbent,
            challenger,
            target_type,
        } => {
            conflict::fight(state, province, *incumbent, *challenger, *target_type);
            continue_maneuver(state)?;
        }
        Action::Coexist { .. } => continue_maneuver(state)?,
    }
    Ok(())
}

/// Move `nation` to `slot` and run the slot's effect.
fn rondel<B: Board>(
    board: &B,
    state: &mut GameState,
    nation: Nation,
    slot: RondelSlot,
    cost: i64,
) -> Result<(), EngineError> {
    state.current_nation = nation;
    state.current_player = state.controller(nation).cloned();
    if let Some(player) = state
        .current_player
        .as_ref()
        .and_then(|p| state.players.get_mut(p))
    {
        player.cash -= cost;
    }
    let ns = state.nation_mut(nation);
    ns.previous_rondel_position = ns.rondel_position;
    ns.rondel_position = Some(slot);
    log::debug!(
        "{nation} ({}) -> {slot}",
        state.current_player.as_deref().unwrap_or("-")
    );

    match slot {
        RondelSlot::Investor => {
            investor::pay_interest(state, nation);
            state.investor_card_active = true;
            investor::open_bond_window(state);
        }
        RondelSlot::Import => state.phase = Phase::Importing,
        RondelSlot::Production1 | RondelSlot::Production2 => {
            systems::run_production(board, state, nation);
            turn::finish(state)?;
        }
        RondelSlot::Maneuver1 | RondelSlot::Maneuver2 => maneuver::begin(state, nation),
        RondelSlot::Taxation => {
            if systems::run_taxation(board, state, nation).game_over {
                systems::end_game(state);
            } else {
                turn::finish(state)?;
            }
        }
        RondelSlot::Factory => {
            if factory::can_build(board, state, nation) {
                state.phase = Phase::BuildingFactory;
            } else {
                log::debug!("{nation} cannot build a factory");
                turn::finish(state)?;
            }
        }
    }
    Ok(())
}

fn continue_maneuver(state: &mut GameState) -> Result<(), EngineError> {
    if state.units_to_move.is_empty() {
        turn::finish(state)
    } else {
        state.phase = Phase::Maneuvering;
        Ok(())
    }
}

/// A game in progress: the board, the state, and the action log that built it.
///
/// Every accepted action is applied to a copy of the state which replaces
/// the current one only on success, so an `Err` from [`Game::tick`] leaves
/// the game exactly as it was.
#[derive(Debug, Clone)]
pub struct Game<B: Board> {
    board: B,
    state: GameState,
    config: EngineConfig,
    last_checksum: Option<u64>,
}

impl<B: Board> Game<B> {
    pub fn new(board: B) -> Self {
        Self::with_config(board, EngineConfig::default())
    }

    pub fn with_config(board: B, config: EngineConfig) -> Self {
        Self {
            board,
            state: GameState::default(),
            config,
            last_checksum: None,
        }
    }

    /// Rebuild a game by feeding `log` through `tick`.
    pub fn from_log(board: B, log: &[Action]) -> Result<Self, EngineError> {
        Self::from_log_with_config(board, log, EngineConfig::default())
    }

    pub fn from_log_with_config(
        board: B,
        log: &[Action],
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let mut game = Self::with_config(board, config);
        for action in log {
            game.tick(action.clone())?;
        }
        Ok(game)
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn available_actions(&self) -> &BTreeSet<Action> {
        &self.state.available_actions
    }

    pub fn log(&self) -> &[Action] {
        &self.state.log
    }

    pub fn last_checksum(&self) -> Option<u64> {
        self.last_checksum
    }

    /// Whether `tick` would apply `action` right now.
    pub fn accepts(&self, action: &Action) -> bool {
        match action {
            Action::Initialize { .. } => self.state.phase == Phase::Setup,
            Action::EndGame => !matches!(self.state.phase, Phase::Setup | Phase::GameOver),
            other => self.state.available_actions.contains(other),
        }
    }

    /// Feed one action to the engine.
    #[tracing::instrument(skip_all, name = "tick")]
    pub fn tick(&mut self, action: Action) -> Result<Outcome, EngineError> {
        if !self.accepts(&action) {
            log::debug!("Ignoring {action}: not legal in {:?}", self.state.phase);
            return Ok(Outcome::Ignored);
        }

        let mut next = self.state.clone();
        next.log.push(action.clone());
        apply_action(&self.board, &mut next, &action)?;
        next.available_actions = legal_actions(&self.board, &next);

        log::debug!(
            "#{} {action} -> {:?}, {} legal",
            next.log.len(),
            next.phase,
            next.available_actions.len()
        );
        self.state = next;

        let freq = u64::from(self.config.checksum_frequency);
        if freq > 0 && (self.state.log.len() as u64) % freq == 0 {
            let checksum = self.state.checksum();
            log::trace!("Checksum after {} actions: {checksum:016x}", self.state.log.len());
            self.last_checksum = Some(checksum);
        }
        Ok(Outcome::Applied)
    }

    /// `tick`, then report the transition to `observers` if it applied.
    pub fn tick_observed(
        &mut self,
        action: Action,
        observers: &ObserverRegistry,
    ) -> Result<Outcome, EngineError> {
        if observers.is_empty() {
            return self.tick(action);
        }
        let before = Arc::new(self.state.clone());
        let outcome = self.tick(action.clone())?;
        if outcome == Outcome::Applied {
            let after = Arc::new(self.state.clone());
            observers.notify(&Transition {
                seq: self.state.log.len() as u64,
                action,
                checksum: after.checksum(),
                before,
                after,
            });
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
