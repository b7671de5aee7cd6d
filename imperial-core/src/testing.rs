//! Builders and fixtures for tests.

use crate::input::{Action, PlayerSeat};
use crate::rondel::RondelSlot;
use crate::state::{Bond, GameState, Phase, PlayerId, PlayerState, UnitStack};
use crate::step::Game;
use imperial_data::{FactoryType, MapBoard, Nation};

/// The bundled 2030 board.
pub const BOARD_2030_JSON: &str = include_str!("../../data/board-2030.json");

/// The bundled 2030 board, parsed.
pub fn fixture_board() -> MapBoard {
    MapBoard::from_json(BOARD_2030_JSON).expect("bundled board is valid")
}

/// alice at Russia, bob at China.
pub fn two_player_seats() -> Vec<PlayerSeat> {
    vec![
        PlayerSeat::new("alice", Nation::RU),
        PlayerSeat::new("bob", Nation::CN),
    ]
}

/// A game on the fixture board, initialized with `seats`.
pub fn started_game(seats: Vec<PlayerSeat>) -> Game<MapBoard> {
    let mut game = Game::new(fixture_board());
    game.tick(Action::initialize(seats))
        .expect("fixture seats are valid");
    game
}

/// Hand-assembles a [`GameState`] for subsystem tests.
///
/// Unspecified nations read as untouched, and every bond not given to a
/// player is left in the pool.
pub struct GameStateBuilder {
    state: GameState,
    current_player_set: bool,
}

impl GameStateBuilder {
    pub fn new() -> Self {
        Self {
            state: GameState::default(),
            current_player_set: false,
        }
    }

    /// Join a player with `cash`. Join order follows call order.
    pub fn with_player(mut self, id: &str, cash: i64) -> Self {
        if !self.state.players.contains_key(id) {
            self.state.order.push(id.to_string());
        }
        self.state
            .players
            .entry(id.to_string())
            .or_insert_with(|| PlayerState::new(cash))
            .cash = cash;
        self
    }

    pub fn with_bond(mut self, player: &str, nation: Nation, number: u8) -> Self {
        self.state
            .players
            .entry(player.to_string())
            .or_default()
            .bonds
            .insert(Bond::new(nation, number));
        if !self.state.order.iter().any(|p| p == player) {
            self.state.order.push(player.to_string());
        }
        self
    }

    pub fn with_controller(mut self, nation: Nation, player: &str) -> Self {
        self.state.nation_mut(nation).controller = Some(player.to_string());
        self
    }

    pub fn with_treasury(mut self, nation: Nation, treasury: i64) -> Self {
        self.state.nation_mut(nation).treasury = treasury;
        self
    }

    pub fn with_power_points(mut self, nation: Nation, power: i64) -> Self {
        self.state.nation_mut(nation).power_points = power;
        self
    }

    pub fn with_tax_chart(mut self, nation: Nation, position: i64) -> Self {
        self.state.nation_mut(nation).tax_chart_position = position;
        self
    }

    pub fn with_rondel_position(mut self, nation: Nation, slot: RondelSlot) -> Self {
        self.state.nation_mut(nation).rondel_position = Some(slot);
        self
    }

    /// Record `nation`'s last move as `from` -> `to`.
    pub fn with_rondel_history(mut self, nation: Nation, from: RondelSlot, to: RondelSlot) -> Self {
        let ns = self.state.nation_mut(nation);
        ns.previous_rondel_position = Some(from);
        ns.rondel_position = Some(to);
        self
    }

    pub fn with_units(mut self, nation: Nation, province: &str, armies: u32, fleets: u32) -> Self {
        *self.state.stack_mut(nation, province) = UnitStack::new(armies, fleets);
        self
    }

    pub fn with_flag(mut self, province: &str, nation: Nation) -> Self {
        self.state
            .provinces
            .entry(province.to_string())
            .or_default()
            .flag = Some(nation);
        self
    }

    pub fn with_factory(mut self, province: &str, factory: FactoryType) -> Self {
        self.state
            .provinces
            .entry(province.to_string())
            .or_default()
            .factory = Some(factory);
        self
    }

    pub fn with_investor_card(mut self, player: &str) -> Self {
        self.state.investor_card_holder = Some(player.to_string());
        self
    }

    /// Make `nation` the acting nation; its controller becomes the acting
    /// player unless [`Self::acting_player`] says otherwise.
    pub fn current(mut self, nation: Nation) -> Self {
        self.state.current_nation = nation;
        self
    }

    pub fn acting_player(mut self, player: Option<PlayerId>) -> Self {
        self.state.current_player = player;
        self.current_player_set = true;
        self
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.state.phase = phase;
        self
    }

    pub fn build(mut self) -> GameState {
        let held: Vec<Bond> = self
            .state
            .players
            .values()
            .flat_map(|p| p.bonds.iter().copied())
            .collect();
        self.state.available_bonds = Bond::universe();
        for bond in held {
            self.state.available_bonds.remove(&bond);
        }
        if !self.current_player_set {
            self.state.current_player = self.state.controller(self.state.current_nation).cloned();
        }
        self.state
    }
}

impl Default for GameStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
