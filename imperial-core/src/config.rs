use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Compute and log a state checksum every N applied actions (0 = disabled).
    ///
    /// - `1`: after every action, for desync hunting
    /// - `10`: default
    pub checksum_frequency: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            checksum_frequency: 10,
        }
    }
}
