//! Static data for the Imperial 2030 rules engine.
//!
//! This crate holds everything that does not change during a game: the closed
//! set of [`Nation`]s and their turn cycle, unit and factory kinds, and the map
//! topology exposed through the [`Board`] trait. [`MapBoard`] is the concrete
//! board, built in code or loaded from JSON.

pub mod board;
pub mod map;
pub mod nation;

pub use board::{Board, ProvinceName};
pub use map::{BoardError, BoardFile, MapBoard, ProvinceDef};
pub use nation::{FactoryType, Nation, UnitType};
