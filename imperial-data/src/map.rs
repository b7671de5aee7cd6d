//! Concrete board built from province definitions and an adjacency list.
//!
//! Boards are usually loaded from JSON:
//!
//! ```json
//! {
//!   "provinces": {
//!     "moscow": { "home": "RU", "factory": "armaments" },
//!     "arcticocean": { "ocean": true }
//!   },
//!   "adjacencies": [["moscow", "arcticocean"]]
//! }
//! ```

use crate::board::{Board, ProvinceName};
use crate::nation::{FactoryType, Nation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Board JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Adjacency references unknown province '{0}'")]
    UnknownProvince(String),
    #[error("Province '{0}' is adjacent to itself")]
    SelfAdjacent(String),
    #[error("Ocean province '{0}' cannot be a home province or factory site")]
    OceanHome(String),
}

/// Static attributes of one province.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceDef {
    /// Nation whose home territory this is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<Nation>,
    #[serde(default)]
    pub ocean: bool,
    /// Factory site classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<FactoryType>,
}

impl ProvinceDef {
    pub fn land() -> Self {
        Self::default()
    }

    pub fn ocean() -> Self {
        Self {
            ocean: true,
            ..Self::default()
        }
    }

    pub fn home(nation: Nation, factory: Option<FactoryType>) -> Self {
        Self {
            home: Some(nation),
            ocean: false,
            factory,
        }
    }
}

/// On-disk shape of a board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardFile {
    pub provinces: BTreeMap<ProvinceName, ProvinceDef>,
    #[serde(default)]
    pub adjacencies: Vec<(ProvinceName, ProvinceName)>,
}

/// Graph of provinces with bidirectional adjacencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapBoard {
    provinces: BTreeMap<ProvinceName, ProvinceDef>,
    adjacencies: BTreeMap<ProvinceName, BTreeSet<ProvinceName>>,
}

impl MapBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a province definition.
    pub fn add_province(&mut self, name: &str, def: ProvinceDef) {
        self.provinces.insert(name.to_string(), def);
        self.adjacencies.entry(name.to_string()).or_default();
    }

    /// Add a bidirectional adjacency between two known provinces.
    pub fn add_adjacency(&mut self, p1: &str, p2: &str) -> Result<(), BoardError> {
        for p in [p1, p2] {
            if !self.provinces.contains_key(p) {
                return Err(BoardError::UnknownProvince(p.to_string()));
            }
        }
        if p1 == p2 {
            return Err(BoardError::SelfAdjacent(p1.to_string()));
        }
        self.adjacencies
            .entry(p1.to_string())
            .or_default()
            .insert(p2.to_string());
        self.adjacencies
            .entry(p2.to_string())
            .or_default()
            .insert(p1.to_string());
        Ok(())
    }

    /// Builder-style variant of [`MapBoard::add_province`].
    pub fn with_province(mut self, name: &str, def: ProvinceDef) -> Self {
        self.add_province(name, def);
        self
    }

    /// Builder-style variant of [`MapBoard::add_adjacency`].
    pub fn with_adjacency(mut self, p1: &str, p2: &str) -> Result<Self, BoardError> {
        self.add_adjacency(p1, p2)?;
        Ok(self)
    }

    pub fn province(&self, name: &str) -> Option<&ProvinceDef> {
        self.provinces.get(name)
    }

    /// Direct neighbors of a province, regardless of terrain.
    pub fn adjacent(&self, province: &str) -> impl Iterator<Item = &ProvinceName> {
        self.adjacencies.get(province).into_iter().flatten()
    }

    pub fn are_adjacent(&self, p1: &str, p2: &str) -> bool {
        self.adjacencies
            .get(p1)
            .map(|set| set.contains(p2))
            .unwrap_or(false)
    }

    pub fn province_count(&self) -> usize {
        self.provinces.len()
    }

    pub fn from_file(file: BoardFile) -> Result<Self, BoardError> {
        let mut board = MapBoard::new();
        for (name, def) in file.provinces {
            if def.ocean && (def.home.is_some() || def.factory.is_some()) {
                return Err(BoardError::OceanHome(name));
            }
            board.add_province(&name, def);
        }
        for (p1, p2) in &file.adjacencies {
            board.add_adjacency(p1, p2)?;
        }
        log::debug!(
            "Built board with {} provinces and {} adjacencies",
            board.province_count(),
            file.adjacencies.len()
        );
        Ok(board)
    }

    pub fn to_file(&self) -> BoardFile {
        let mut adjacencies = Vec::new();
        for (p1, set) in &self.adjacencies {
            for p2 in set {
                if p1 < p2 {
                    adjacencies.push((p1.clone(), p2.clone()));
                }
            }
        }
        BoardFile {
            provinces: self.provinces.clone(),
            adjacencies,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let file: BoardFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Load a board from a JSON file.
    pub fn load(path: &Path) -> Result<Self, BoardError> {
        log::info!("Loading board from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Land reachable by an army at `origin`: adjacent land, plus land that
    /// borders any ocean reachable through connected friendly-fleet oceans.
    fn army_destinations(
        &self,
        origin: &str,
        friendly_fleets: &BTreeSet<ProvinceName>,
    ) -> BTreeSet<ProvinceName> {
        let mut out = BTreeSet::new();
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut frontier: VecDeque<&str> = VecDeque::new();

        for neighbor in self.adjacent(origin) {
            if !self.is_ocean(neighbor) {
                out.insert(neighbor.clone());
            } else if friendly_fleets.contains(neighbor) && visited.insert(neighbor.as_str()) {
                frontier.push_back(neighbor.as_str());
            }
        }

        while let Some(ocean) = frontier.pop_front() {
            for neighbor in self.adjacent(ocean) {
                if !self.is_ocean(neighbor) {
                    out.insert(neighbor.clone());
                } else if friendly_fleets.contains(neighbor) && visited.insert(neighbor.as_str()) {
                    frontier.push_back(neighbor.as_str());
                }
            }
        }

        out.remove(origin);
        out
    }
}

impl Board for MapBoard {
    fn province_names(&self) -> Vec<ProvinceName> {
        self.provinces.keys().cloned().collect()
    }

    fn neighbors(
        &self,
        origin: &str,
        _nation: Nation,
        is_fleet: bool,
        friendly_fleets: &BTreeSet<ProvinceName>,
    ) -> BTreeSet<ProvinceName> {
        if is_fleet {
            self.adjacent(origin)
                .filter(|p| self.is_ocean(p))
                .cloned()
                .collect()
        } else {
            self.army_destinations(origin, friendly_fleets)
        }
    }

    fn home_provinces(&self, nation: Nation) -> BTreeSet<ProvinceName> {
        self.provinces
            .iter()
            .filter(|(_, def)| def.home == Some(nation))
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn factory_type(&self, province: &str) -> Option<FactoryType> {
        self.provinces.get(province).and_then(|def| def.factory)
    }

    fn is_ocean(&self, province: &str) -> bool {
        self.provinces
            .get(province)
            .map(|def| def.ocean)
            .unwrap_or(false)
    }

    fn home_nation(&self, province: &str) -> Option<Nation> {
        self.provinces.get(province).and_then(|def| def.home)
    }

    fn contains(&self, province: &str) -> bool {
        self.provinces.contains_key(province)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // a --- b --- sea1 --- sea2 --- c
    //              |
    //              d
    fn coastal_board() -> MapBoard {
        MapBoard::new()
            .with_province("a", ProvinceDef::home(Nation::RU, Some(FactoryType::Armaments)))
            .with_province("b", ProvinceDef::home(Nation::RU, Some(FactoryType::Shipyard)))
            .with_province("c", ProvinceDef::land())
            .with_province("d", ProvinceDef::land())
            .with_province("sea1", ProvinceDef::ocean())
            .with_province("sea2", ProvinceDef::ocean())
            .with_adjacency("a", "b")
            .and_then(|b| b.with_adjacency("b", "sea1"))
            .and_then(|b| b.with_adjacency("sea1", "sea2"))
            .and_then(|b| b.with_adjacency("sea2", "c"))
            .and_then(|b| b.with_adjacency("sea1", "d"))
            .unwrap()
    }

    fn set(names: &[&str]) -> BTreeSet<ProvinceName> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fleet_moves_to_adjacent_ocean_only() {
        let board = coastal_board();
        let out = board.neighbors("b", Nation::RU, true, &BTreeSet::new());
        assert_eq!(out, set(&["sea1"]));
        let out = board.neighbors("sea1", Nation::RU, true, &BTreeSet::new());
        assert_eq!(out, set(&["sea2"]));
    }

    #[test]
    fn test_army_without_fleets_stays_on_land() {
        let board = coastal_board();
        let out = board.neighbors("b", Nation::RU, false, &BTreeSet::new());
        assert_eq!(out, set(&["a"]));
    }

    #[test]
    fn test_army_crosses_fleet_chain() {
        let board = coastal_board();

        let one_fleet = board.neighbors("b", Nation::RU, false, &set(&["sea1"]));
        assert_eq!(one_fleet, set(&["a", "d"]));

        let chain = board.neighbors("b", Nation::RU, false, &set(&["sea1", "sea2"]));
        assert_eq!(chain, set(&["a", "c", "d"]));

        // A fleet in sea2 alone is not connected to b
        let broken = board.neighbors("b", Nation::RU, false, &set(&["sea2"]));
        assert_eq!(broken, set(&["a"]));
    }

    #[test]
    fn test_home_and_factory_queries() {
        let board = coastal_board();
        assert_eq!(board.home_provinces(Nation::RU), set(&["a", "b"]));
        assert!(board.home_provinces(Nation::CN).is_empty());
        assert_eq!(board.factory_type("b"), Some(FactoryType::Shipyard));
        assert_eq!(board.factory_type("c"), None);
        assert_eq!(board.home_nation("a"), Some(Nation::RU));
        assert_eq!(board.home_nation("d"), None);
        assert!(board.is_ocean("sea2"));
        assert!(!board.is_ocean("missing"));
    }

    #[test]
    fn test_unknown_adjacency_rejected() {
        let err = MapBoard::new()
            .with_province("a", ProvinceDef::land())
            .with_adjacency("a", "nowhere")
            .unwrap_err();
        assert!(matches!(err, BoardError::UnknownProvince(p) if p == "nowhere"));
    }

    #[test]
    fn test_ocean_home_rejected() {
        let json = r#"{ "provinces": { "x": { "ocean": true, "home": "EU" } } }"#;
        assert!(matches!(
            MapBoard::from_json(json),
            Err(BoardError::OceanHome(_))
        ));
    }

    #[test]
    fn test_file_format_preserves_board() {
        let board = coastal_board();
        let json = serde_json::to_string(&board.to_file()).unwrap();
        let reloaded = MapBoard::from_json(&json).unwrap();
        assert_eq!(board, reloaded);
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "provinces": {{
                    "moscow": {{ "home": "RU", "factory": "armaments" }},
                    "arcticocean": {{ "ocean": true }}
                }},
                "adjacencies": [["moscow", "arcticocean"]]
            }}"#
        )
        .unwrap();

        let board = MapBoard::load(file.path()).unwrap();
        assert_eq!(board.province_count(), 2);
        assert!(board.are_adjacent("arcticocean", "moscow"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = MapBoard::load(Path::new("/nonexistent/board.json")).unwrap_err();
        assert!(matches!(err, BoardError::Io(_)));
    }
}
