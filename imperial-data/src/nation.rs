use serde::{Deserialize, Serialize};
use std::fmt;

/// The six great powers of the 2030 map.
///
/// Declaration order is the turn cycle: RU → CN → IN → BR → US → EU → RU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nation {
    RU,
    CN,
    IN,
    BR,
    US,
    EU,
}

impl Nation {
    /// All nations in turn-cycle order.
    pub const ALL: [Nation; 6] = [
        Nation::RU,
        Nation::CN,
        Nation::IN,
        Nation::BR,
        Nation::US,
        Nation::EU,
    ];

    /// Position in the turn cycle (0..6).
    pub fn index(self) -> usize {
        match self {
            Nation::RU => 0,
            Nation::CN => 1,
            Nation::IN => 2,
            Nation::BR => 3,
            Nation::US => 4,
            Nation::EU => 5,
        }
    }

    /// The nation that acts after this one.
    pub fn next(self) -> Nation {
        Nation::ALL[(self.index() + 1) % Nation::ALL.len()]
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Nation::RU => "Russia",
            Nation::CN => "China",
            Nation::IN => "India",
            Nation::BR => "Brazil",
            Nation::US => "USA",
            Nation::EU => "Europe",
        }
    }
}

impl fmt::Display for Nation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Nation::RU => "RU",
            Nation::CN => "CN",
            Nation::IN => "IN",
            Nation::BR => "BR",
            Nation::US => "US",
            Nation::EU => "EU",
        };
        f.write_str(tag)
    }
}

/// What a factory built on a site produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactoryType {
    /// Produces armies.
    Armaments,
    /// Produces fleets.
    Shipyard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    /// The unit type a factory of this kind turns out.
    pub fn produced_by(factory: FactoryType) -> UnitType {
        match factory {
            FactoryType::Armaments => UnitType::Army,
            FactoryType::Shipyard => UnitType::Fleet,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitType::Army => f.write_str("army"),
            UnitType::Fleet => f.write_str("fleet"),
        }
    }
}
