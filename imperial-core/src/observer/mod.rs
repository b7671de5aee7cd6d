//! Observer pattern for watching a game without touching it.
//!
//! Observers receive each applied action together with immutable `Arc`
//! snapshots of the state before and after it. They cannot reach the engine,
//! so registering one never changes how a game plays out.
//!
//! ```ignore
//! let mut registry = ObserverRegistry::new();
//! registry.register(Box::new(EventLogObserver::stdout()));
//!
//! for action in log {
//!     game.tick_observed(action, &registry)?;
//! }
//! ```

pub mod event_log;

use crate::input::Action;
use crate::state::GameState;
use std::sync::Arc;
use thiserror::Error;

pub use event_log::{EventLogObserver, GameEvent};

/// One applied action and the states on either side of it.
#[derive(Clone)]
pub struct Transition {
    /// 1-based position of `action` in the game log.
    pub seq: u64,
    pub action: Action,
    pub before: Arc<GameState>,
    pub after: Arc<GameState>,
    /// Checksum of `after`.
    pub checksum: u64,
}

#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Receives every applied action.
///
/// Errors are logged by the registry and never reach the engine.
pub trait GameObserver: Send + Sync {
    fn on_action(&self, transition: &Transition) -> Result<(), ObserverError>;

    fn name(&self) -> &str;

    /// Called once when the registry is dropped.
    fn on_shutdown(&self) {}
}

#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Box<dyn GameObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn GameObserver>) {
        log::info!("Registered observer: {}", observer.name());
        self.observers.push(observer);
    }

    pub fn notify(&self, transition: &Transition) {
        for observer in &self.observers {
            if let Err(e) = observer.on_action(transition) {
                log::warn!("Observer '{}' error: {}", observer.name(), e);
            }
        }
    }

    pub fn shutdown(&self) {
        for observer in &self.observers {
            observer.on_shutdown();
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Drop for ObserverRegistry {
    fn drop(&mut self) {
        // Flush buffered writers
        self.shutdown();
    }
}
