use crate::rondel::RondelSlot;
use crate::state::PlayerId;
use imperial_data::{Nation, ProvinceName, UnitType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A player joining the game, seated at a nation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerSeat {
    pub id: PlayerId,
    pub nation: Nation,
}

impl PlayerSeat {
    pub fn new(id: impl Into<PlayerId>, nation: Nation) -> Self {
        Self {
            id: id.into(),
            nation,
        }
    }
}

/// One unit bought during an import.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub province: ProvinceName,
    #[serde(rename = "type")]
    pub unit: UnitType,
}

impl Placement {
    pub fn new(province: impl Into<ProvinceName>, unit: UnitType) -> Self {
        Self {
            province: province.into(),
            unit,
        }
    }
}

/// Everything a player can submit to the engine.
///
/// Serialized as `{"type": "...", "payload": {...}}`; payload-free actions
/// carry only the tag, and accept an empty or null payload when read back.
/// Two actions are equal iff tag and payload are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(
    remote = "Self",
    tag = "type",
    content = "payload",
    rename_all = "camelCase"
)]
pub enum Action {
    Initialize {
        players: Vec<PlayerSeat>,
    },
    EndGame,
    /// Pass: declines a bond purchase, or skips a nation with no rondel move.
    Noop,
    BondPurchase {
        player: PlayerId,
        nation: Nation,
        cost: i64,
    },
    Rondel {
        nation: Nation,
        slot: RondelSlot,
        cost: i64,
    },
    Import {
        placements: Vec<Placement>,
    },
    BuildFactory {
        province: ProvinceName,
    },
    Maneuver {
        origin: ProvinceName,
        destination: ProvinceName,
    },
    EndManeuver,
    Fight {
        province: ProvinceName,
        incumbent: Nation,
        challenger: Nation,
        #[serde(rename = "targetType")]
        target_type: UnitType,
    },
    Coexist {
        province: ProvinceName,
        incumbent: Nation,
        challenger: Nation,
    },
}

/// Wire tags of the actions without a payload.
const UNIT_TAGS: [&str; 3] = ["noop", "endGame", "endManeuver"];

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Action::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        if let Some(fields) = value.as_object_mut() {
            let unit = fields
                .get("type")
                .and_then(|t| t.as_str())
                .is_some_and(|t| UNIT_TAGS.contains(&t));
            let empty = match fields.get("payload") {
                Some(serde_json::Value::Null) => true,
                Some(serde_json::Value::Object(payload)) => payload.is_empty(),
                _ => false,
            };
            if unit && empty {
                fields.remove("payload");
            }
        }
        Action::deserialize(value).map_err(serde::de::Error::custom)
    }
}

impl Action {
    pub fn initialize(players: Vec<PlayerSeat>) -> Self {
        Action::Initialize { players }
    }

    pub fn bond_purchase(player: impl Into<PlayerId>, nation: Nation, cost: i64) -> Self {
        Action::BondPurchase {
            player: player.into(),
            nation,
            cost,
        }
    }

    pub fn rondel(nation: Nation, slot: RondelSlot, cost: i64) -> Self {
        Action::Rondel { nation, slot, cost }
    }

    pub fn import(placements: Vec<Placement>) -> Self {
        Action::Import { placements }
    }

    pub fn build_factory(province: impl Into<ProvinceName>) -> Self {
        Action::BuildFactory {
            province: province.into(),
        }
    }

    pub fn maneuver(origin: impl Into<ProvinceName>, destination: impl Into<ProvinceName>) -> Self {
        Action::Maneuver {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    pub fn fight(
        province: impl Into<ProvinceName>,
        incumbent: Nation,
        challenger: Nation,
        target_type: UnitType,
    ) -> Self {
        Action::Fight {
            province: province.into(),
            incumbent,
            challenger,
            target_type,
        }
    }

    pub fn coexist(province: impl Into<ProvinceName>, incumbent: Nation, challenger: Nation) -> Self {
        Action::Coexist {
            province: province.into(),
            incumbent,
            challenger,
        }
    }

    /// The wire tag, e.g. `"bondPurchase"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Initialize { .. } => "initialize",
            Action::EndGame => "endGame",
            Action::Noop => "noop",
            Action::BondPurchase { .. } => "bondPurchase",
            Action::Rondel { .. } => "rondel",
            Action::Import { .. } => "import",
            Action::BuildFactory { .. } => "buildFactory",
            Action::Maneuver { .. } => "maneuver",
            Action::EndManeuver => "endManeuver",
            Action::Fight { .. } => "fight",
            Action::Coexist { .. } => "coexist",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Initialize { players } => write!(f, "initialize ({} players)", players.len()),
            Action::BondPurchase {
                player,
                nation,
                cost,
            } => write!(f, "{player} buys {nation} bond for {cost}"),
            Action::Rondel { nation, slot, cost } => write!(f, "{nation} -> {slot} (cost {cost})"),
            Action::Import { placements } => write!(f, "import {} units", placements.len()),
            Action::BuildFactory { province } => write!(f, "build factory in {province}"),
            Action::Maneuver {
                origin,
                destination,
            } => write!(f, "move {origin} -> {destination}"),
            Action::Fight {
                province,
                incumbent,
                challenger,
                target_type,
            } => write!(
                f,
                "{challenger} fights {incumbent} {target_type} in {province}"
            ),
            Action::Coexist {
                province,
                incumbent,
                challenger,
            } => write!(f, "{challenger} coexists with {incumbent} in {province}"),
            other => f.write_str(other.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unit_actions_have_no_payload() {
        assert_eq!(
            serde_json::to_value(Action::Noop).unwrap(),
            json!({"type": "noop"})
        );
        assert_eq!(
            serde_json::to_value(Action::EndManeuver).unwrap(),
            json!({"type": "endManeuver"})
        );
    }

    #[test]
    fn test_unit_actions_accept_empty_payload() {
        let raw = json!([
            {"type": "noop", "payload": {}},
            {"type": "endGame", "payload": {}},
            {"type": "endManeuver", "payload": null},
            {"type": "endManeuver"}
        ]);
        let actions: Vec<Action> = serde_json::from_value(raw).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Noop,
                Action::EndGame,
                Action::EndManeuver,
                Action::EndManeuver
            ]
        );

        // Only an empty payload is dropped
        let stray = json!({"type": "noop", "payload": {"player": "alice"}});
        assert!(serde_json::from_value::<Action>(stray).is_err());
        let bare = json!({"type": "buildFactory", "payload": {}});
        assert!(serde_json::from_value::<Action>(bare).is_err());
    }

    #[test]
    fn test_fight_wire_shape() {
        let action = Action::fight("mongolia", Nation::CN, Nation::RU, UnitType::Army);
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({
                "type": "fight",
                "payload": {
                    "province": "mongolia",
                    "incumbent": "CN",
                    "challenger": "RU",
                    "targetType": "army"
                }
            })
        );
    }

    #[test]
    fn test_parse_log_entries() {
        let raw = json!([
            {"type": "initialize", "payload": {"players": [
                {"id": "alice", "nation": "RU"},
                {"id": "bob", "nation": "CN"}
            ]}},
            {"type": "rondel", "payload": {"nation": "RU", "slot": "production1", "cost": 0}},
            {"type": "import", "payload": {"placements": [
                {"province": "moscow", "type": "army"}
            ]}},
            {"type": "endGame"}
        ]);
        let log: Vec<Action> = serde_json::from_value(raw).unwrap();
        assert_eq!(
            log,
            vec![
                Action::initialize(vec![
                    PlayerSeat::new("alice", Nation::RU),
                    PlayerSeat::new("bob", Nation::CN),
                ]),
                Action::rondel(Nation::RU, RondelSlot::Production1, 0),
                Action::import(vec![Placement::new("moscow", UnitType::Army)]),
                Action::EndGame,
            ]
        );
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(
            Action::maneuver("moscow", "kazakhstan"),
            Action::maneuver("moscow".to_string(), "kazakhstan".to_string())
        );
        assert_ne!(
            Action::bond_purchase("alice", Nation::RU, 4),
            Action::bond_purchase("alice", Nation::RU, 6)
        );
    }

    #[test]
    fn test_kind_matches_wire_tag() {
        let action = Action::bond_purchase("bob", Nation::EU, 9);
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], action.kind());
    }
}
