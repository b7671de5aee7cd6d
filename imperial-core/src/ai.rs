//! Agents that pick actions from the legal set.
//!
//! The engine exposes a finite, ordered legal-action set after every action,
//! so an agent only has to choose an element of it. Agents must be
//! deterministic for a given seed so self-play logs replay exactly.

use crate::input::Action;
use crate::observer::ObserverRegistry;
use crate::state::GameState;
use crate::step::{EngineError, Game};
use imperial_data::Board;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

pub trait Agent {
    /// Choose one action from `state.available_actions`, or `None` to stop.
    fn decide(&mut self, state: &GameState) -> Option<Action>;
}

/// Picks uniformly among the legal actions.
pub struct RandomAgent {
    rng: rand::rngs::StdRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn decide(&mut self, state: &GameState) -> Option<Action> {
        state.available_actions.iter().choose(&mut self.rng).cloned()
    }
}

/// Let `agent` play `game` for up to `max_actions` actions.
///
/// Stops early when the game ends or the agent passes. Returns the number of
/// actions applied.
pub fn play_out<B: Board>(
    game: &mut Game<B>,
    agent: &mut dyn Agent,
    max_actions: usize,
) -> Result<usize, EngineError> {
    play_out_observed(game, agent, max_actions, &ObserverRegistry::new())
}

/// [`play_out`], reporting every applied action to `observers`.
pub fn play_out_observed<B: Board>(
    game: &mut Game<B>,
    agent: &mut dyn Agent,
    max_actions: usize,
    observers: &ObserverRegistry,
) -> Result<usize, EngineError> {
    let mut applied = 0;
    while applied < max_actions && !game.state().is_over() {
        let Some(action) = agent.decide(game.state()) else {
            break;
        };
        game.tick_observed(action, observers)?;
        applied += 1;
    }
    log::debug!("Played {applied} actions, game over: {}", game.state().is_over());
    Ok(applied)
}
