//! Event log observer: game events as JSON lines.
//!
//! Events come from diffing the states on either side of each action:
//!
//! - `action_applied` - every accepted action, with the resulting checksum
//! - `control_changed` - a nation's controller changed hands
//! - `flag_changed` - a province's flag moved
//! - `game_over` - final scores and winner

use super::{GameObserver, ObserverError, Transition};
use crate::input::Action;
use crate::state::{GameState, PlayerId, Phase};
use imperial_data::{Nation, ProvinceName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// ```json
/// {"type":"flag_changed","seq":14,"province":"mongolia","from":"CN","to":"RU"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ActionApplied {
        seq: u64,
        action: Action,
        /// Nation acting after the action.
        nation: Nation,
        #[serde(skip_serializing_if = "Option::is_none")]
        player: Option<PlayerId>,
        checksum: u64,
    },
    ControlChanged {
        seq: u64,
        nation: Nation,
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<PlayerId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<PlayerId>,
    },
    FlagChanged {
        seq: u64,
        province: ProvinceName,
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<Nation>,
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<Nation>,
    },
    GameOver {
        seq: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<PlayerId>,
        scores: BTreeMap<PlayerId, i64>,
    },
}

/// Every event produced by one transition, in a fixed order.
pub fn detect_events(transition: &Transition) -> Vec<GameEvent> {
    let seq = transition.seq;
    let before: &GameState = &transition.before;
    let after: &GameState = &transition.after;

    let mut events = vec![GameEvent::ActionApplied {
        seq,
        action: transition.action.clone(),
        nation: after.current_nation,
        player: after.current_player.clone(),
        checksum: transition.checksum,
    }];

    // Initialization hands out control but is not a change of hands
    if before.phase != Phase::Setup {
        for nation in Nation::ALL {
            let from = before.controller(nation);
            let to = after.controller(nation);
            if from != to {
                events.push(GameEvent::ControlChanged {
                    seq,
                    nation,
                    from: from.cloned(),
                    to: to.cloned(),
                });
            }
        }
    }

    for (province, state) in &after.provinces {
        let from = before.provinces.get(province).and_then(|p| p.flag);
        if from != state.flag {
            events.push(GameEvent::FlagChanged {
                seq,
                province: province.clone(),
                from,
                to: state.flag,
            });
        }
    }

    if after.phase == Phase::GameOver && before.phase != Phase::GameOver {
        events.push(GameEvent::GameOver {
            seq,
            winner: after.winner.clone(),
            scores: after
                .players
                .iter()
                .map(|(id, p)| (id.clone(), p.score))
                .collect(),
        });
    }

    events
}

/// Writes [`GameEvent`]s as JSONL to any `Write` destination.
///
/// ```ignore
/// let observer = EventLogObserver::file("events.jsonl")?;
/// ```
pub struct EventLogObserver {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl EventLogObserver {
    pub fn stdout() -> Self {
        Self::new(Box::new(BufWriter::new(std::io::stdout())))
    }

    pub fn file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }

    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl GameObserver for EventLogObserver {
    fn on_action(&self, transition: &Transition) -> Result<(), ObserverError> {
        let events = detect_events(transition);
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| std::io::Error::other("event log writer poisoned"))?;
        for event in &events {
            serde_json::to_writer(&mut *writer, event)?;
            writer.write_all(b"\n")?;
        }
        if matches!(events.last(), Some(GameEvent::GameOver { .. })) {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "EventLogObserver"
    }

    fn on_shutdown(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writer.flush() {
                log::warn!("Failed to flush event log: {}", e);
            }
        }
    }
}
