//! Rules subsystems, each a set of functions over [`GameState`](crate::state::GameState).
//!
//! Action generators are pure; mutators assume the action was already
//! checked against the legal set and only fail on broken invariants.

pub mod bonds;
pub mod conflict;
pub mod factory;
pub mod import;
pub mod investor;
pub mod maneuver;
pub mod production;
pub mod scoring;
pub mod taxation;

pub use production::run_production;
pub use scoring::end_game;
pub use taxation::{run_taxation, TaxReport};
