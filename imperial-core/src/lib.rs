//! # Imperial 2030 Rules Engine
//!
//! Deterministic rules engine for the board game Imperial 2030.
//!
//! The engine is a state machine: every player input is an [`Action`], and
//! [`Game::tick`] either applies it (if it is in the current legal set) or
//! ignores it. A game is fully described by its board and its action log, so
//! replaying the log reproduces the exact same state.
//!
//! ```text
//! ┌────────────┐     ┌──────────┐     ┌────────────┐
//! │  Agents /  │────▶│  Action  │────▶│ Game::tick │
//! │  players   │     │          │     │ (clone,    │
//! └────────────┘     └──────────┘     │  apply,    │
//!       ▲                             │  commit)   │
//!       │  available_actions          └─────┬──────┘
//!       │                                   │
//!       │            ┌──────────┐     ┌─────▼──────┐
//!       └────────────│ Observers│◀────│ GameState  │
//!                    └──────────┘     └────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`GameState`] | Players, nations, provinces, units, phase and log |
//! | [`Action`] | Player inputs (rondel, bondPurchase, maneuver, ...) |
//! | [`Game`] | Owns board + state; `tick` and replay |
//! | [`legal_actions`] | Pure legal-set derivation from (board, state) |
//! | [`GameObserver`] | Watches applied actions (event logs) |
//!
//! Rules live in [`systems`], one module per subsystem; [`rondel`] and
//! [`setup`] cover the wheel and the starting position.

pub mod ai;
pub mod config;
pub mod input;
pub mod observer;
pub mod rondel;
pub mod setup;
pub mod state;
pub mod step;
pub mod systems;
pub mod testing;
pub mod turn;

pub use ai::{play_out, play_out_observed, Agent, RandomAgent};
pub use config::EngineConfig;
pub use input::{Action, Placement, PlayerSeat};
pub use observer::{EventLogObserver, GameEvent, GameObserver, ObserverError, ObserverRegistry, Transition};
pub use rondel::RondelSlot;
pub use state::{Bond, Conflict, GameState, NationState, Phase, PlayerId, PlayerState, UnitStack};
pub use step::{apply_action, legal_actions, EngineError, Game, Outcome};
