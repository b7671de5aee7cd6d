use crate::input::Action;
use crate::rondel::RondelSlot;
use imperial_data::{FactoryType, Nation, ProvinceName, UnitType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type PlayerId = String;

/// Cost of each bond face number, index = face - 1.
const BOND_COSTS: [i64; 9] = [2, 4, 6, 9, 12, 16, 20, 25, 30];

/// A claim on a nation's treasury. Face number sets both cost and coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub nation: Nation,
    /// Face number, 1..=9
    pub number: u8,
}

impl Bond {
    pub fn new(nation: Nation, number: u8) -> Self {
        debug_assert!((1..=9).contains(&number), "bond face {number} out of range");
        Self { nation, number }
    }

    pub fn cost(&self) -> i64 {
        BOND_COSTS[usize::from(self.number) - 1]
    }

    /// The bond of `nation` with the given cost, if the cost is on the table.
    pub fn from_cost(nation: Nation, cost: i64) -> Option<Self> {
        BOND_COSTS
            .iter()
            .position(|&c| c == cost)
            .map(|i| Self::new(nation, i as u8 + 1))
    }

    /// Every bond in the game: 9 denominations for each of the 6 nations.
    pub fn universe() -> BTreeSet<Bond> {
        Nation::ALL
            .into_iter()
            .flat_map(|nation| (1..=9).map(move |number| Bond::new(nation, number)))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerState {
    pub cash: i64,
    pub bonds: BTreeSet<Bond>,
    /// Final score, filled in when the game ends.
    pub score: i64,
}

impl PlayerState {
    pub fn new(cash: i64) -> Self {
        Self {
            cash,
            ..Self::default()
        }
    }

    pub fn bonds_of(&self, nation: Nation) -> impl Iterator<Item = &Bond> {
        self.bonds.iter().filter(move |b| b.nation == nation)
    }

    /// Highest-cost bond held in `nation` (the trade-in candidate).
    pub fn top_bond(&self, nation: Nation) -> Option<Bond> {
        self.bonds_of(nation).max_by_key(|b| b.cost()).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NationState {
    pub controller: Option<PlayerId>,
    /// Signed: investor advances and trade-ins may push it below zero.
    pub treasury: i64,
    pub rondel_position: Option<RondelSlot>,
    pub previous_rondel_position: Option<RondelSlot>,
    /// 0..=25
    pub power_points: i64,
    /// 5..=15, never decreases
    pub tax_chart_position: i64,
}

impl Default for NationState {
    fn default() -> Self {
        Self {
            controller: None,
            treasury: 0,
            rondel_position: None,
            previous_rondel_position: None,
            power_points: 0,
            tax_chart_position: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvinceState {
    /// Nation holding the territory marker.
    pub flag: Option<Nation>,
    pub factory: Option<FactoryType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStack {
    pub armies: u32,
    pub fleets: u32,
}

impl UnitStack {
    pub fn new(armies: u32, fleets: u32) -> Self {
        Self { armies, fleets }
    }

    pub fn count(&self, unit: UnitType) -> u32 {
        match unit {
            UnitType::Army => self.armies,
            UnitType::Fleet => self.fleets,
        }
    }

    pub fn total(&self) -> u32 {
        self.armies + self.fleets
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn add(&mut self, unit: UnitType) {
        match unit {
            UnitType::Army => self.armies += 1,
            UnitType::Fleet => self.fleets += 1,
        }
    }

    /// Remove one unit of the given type. Returns false if there was none.
    pub fn remove(&mut self, unit: UnitType) -> bool {
        let slot = match unit {
            UnitType::Army => &mut self.armies,
            UnitType::Fleet => &mut self.fleets,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Maximum number of armies and fleets a nation may have on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitLimits {
    pub armies: u32,
    pub fleets: u32,
}

impl UnitLimits {
    pub fn for_nation(nation: Nation) -> Self {
        match nation {
            Nation::CN => Self {
                armies: 10,
                fleets: 6,
            },
            Nation::US => Self {
                armies: 6,
                fleets: 10,
            },
            _ => Self {
                armies: 8,
                fleets: 8,
            },
        }
    }

    pub fn get(&self, unit: UnitType) -> u32 {
        match unit {
            UnitType::Army => self.armies,
            UnitType::Fleet => self.fleets,
        }
    }
}

/// One unit still allowed to move during the current maneuver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PendingUnit {
    pub province: ProvinceName,
    pub unit: UnitType,
}

/// A contested province awaiting fight or coexist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Conflict {
    pub province: ProvinceName,
    pub incumbent: Nation,
    pub challenger: Nation,
}

/// Where the turn state machine is parked, waiting for the next action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Before `initialize`.
    #[default]
    Setup,
    AwaitingRondel,
    Importing,
    BuildingFactory,
    /// Investor card holder may buy one bond.
    InvestorBondPurchase,
    Maneuvering,
    HandlingConflict(Conflict),
    GameOver,
}

/// Complete game state: the single aggregate every subsystem mutates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub players: BTreeMap<PlayerId, PlayerState>,
    /// Player join order; breaks every tie in the game.
    pub order: Vec<PlayerId>,
    pub nations: BTreeMap<Nation, NationState>,
    pub provinces: BTreeMap<ProvinceName, ProvinceState>,
    pub units: BTreeMap<Nation, BTreeMap<ProvinceName, UnitStack>>,
    pub unit_limits: BTreeMap<Nation, UnitLimits>,
    /// Unissued bonds. Partitions the bond universe with player holdings.
    pub available_bonds: BTreeSet<Bond>,
    pub current_nation: Nation,
    pub current_player: Option<PlayerId>,
    pub investor_card_holder: Option<PlayerId>,
    pub investor_card_active: bool,
    pub units_to_move: Vec<PendingUnit>,
    pub phase: Phase,
    /// Cached legal-action set for `phase`.
    pub available_actions: BTreeSet<Action>,
    pub log: Vec<Action>,
    pub winner: Option<PlayerId>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            players: BTreeMap::new(),
            order: Vec::new(),
            nations: BTreeMap::new(),
            provinces: BTreeMap::new(),
            units: BTreeMap::new(),
            unit_limits: BTreeMap::new(),
            available_bonds: BTreeSet::new(),
            current_nation: Nation::RU,
            current_player: None,
            investor_card_holder: None,
            investor_card_active: false,
            units_to_move: Vec::new(),
            phase: Phase::Setup,
            available_actions: BTreeSet::new(),
            log: Vec::new(),
            winner: None,
        }
    }
}

impl GameState {
    /// State of `nation`; a nation missing from the map reads as untouched.
    pub fn nation(&self, nation: Nation) -> &NationState {
        static UNTOUCHED: NationState = NationState {
            controller: None,
            treasury: 0,
            rondel_position: None,
            previous_rondel_position: None,
            power_points: 0,
            tax_chart_position: 5,
        };
        self.nations.get(&nation).unwrap_or(&UNTOUCHED)
    }

    pub fn nation_mut(&mut self, nation: Nation) -> &mut NationState {
        self.nations.entry(nation).or_default()
    }

    pub fn controller(&self, nation: Nation) -> Option<&PlayerId> {
        self.nation(nation).controller.as_ref()
    }

    pub fn cash(&self, player: &str) -> i64 {
        self.players.get(player).map(|p| p.cash).unwrap_or(0)
    }

    pub fn stack(&self, nation: Nation, province: &str) -> UnitStack {
        self.units
            .get(&nation)
            .and_then(|stacks| stacks.get(province))
            .copied()
            .unwrap_or_default()
    }

    pub fn stack_mut(&mut self, nation: Nation, province: &str) -> &mut UnitStack {
        self.units
            .entry(nation)
            .or_default()
            .entry(province.to_string())
            .or_default()
    }

    /// Total armies and fleets `nation` has on the board.
    pub fn unit_count(&self, nation: Nation) -> u32 {
        self.units
            .get(&nation)
            .map(|stacks| stacks.values().map(UnitStack::total).sum())
            .unwrap_or(0)
    }

    pub fn unit_total(&self, nation: Nation, unit: UnitType) -> u32 {
        self.units
            .get(&nation)
            .map(|stacks| stacks.values().map(|s| s.count(unit)).sum())
            .unwrap_or(0)
    }

    pub fn unit_limit(&self, nation: Nation, unit: UnitType) -> u32 {
        self.unit_limits
            .get(&nation)
            .copied()
            .unwrap_or_else(|| UnitLimits::for_nation(nation))
            .get(unit)
    }

    /// Provinces where `nation` has at least one fleet.
    pub fn friendly_fleets(&self, nation: Nation) -> BTreeSet<ProvinceName> {
        self.units
            .get(&nation)
            .map(|stacks| {
                stacks
                    .iter()
                    .filter(|(_, s)| s.fleets > 0)
                    .map(|(p, _)| p.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether any nation other than `nation` has armies in `province`.
    pub fn has_foreign_armies(&self, nation: Nation, province: &str) -> bool {
        Nation::ALL
            .into_iter()
            .filter(|&other| other != nation)
            .any(|other| self.stack(other, province).armies > 0)
    }

    pub fn flag_count(&self, nation: Nation) -> u32 {
        self.provinces
            .values()
            .filter(|p| p.flag == Some(nation))
            .count() as u32
    }

    /// Sum of bond costs `player` holds in `nation`.
    pub fn total_investment(&self, player: &str, nation: Nation) -> i64 {
        self.players
            .get(player)
            .map(|p| p.bonds_of(nation).map(Bond::cost).sum())
            .unwrap_or(0)
    }

    pub fn is_maneuvering(&self) -> bool {
        matches!(
            self.phase,
            Phase::Maneuvering | Phase::HandlingConflict(_)
        )
    }

    pub fn is_handling_conflict(&self) -> bool {
        matches!(self.phase, Phase::HandlingConflict(_))
    }

    pub fn is_importing(&self) -> bool {
        self.phase == Phase::Importing
    }

    pub fn is_building_factory(&self) -> bool {
        self.phase == Phase::BuildingFactory
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Deterministic checksum of the full state.
    ///
    /// All collections are ordered, so hashing the derived `Hash` directly is
    /// stable across runs and replays.
    pub fn checksum(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
