use crate::nation::{FactoryType, Nation};
use std::collections::BTreeSet;

pub type ProvinceName = String;

/// Static map topology consumed by the rules engine.
///
/// Implementations must be deterministic: the same query always yields the
/// same answer, and set-valued answers are ordered (`BTreeSet`) so that the
/// engine's legal-action sets are reproducible across replays.
pub trait Board {
    /// Every province on the board, in a stable order.
    fn province_names(&self) -> Vec<ProvinceName>;

    /// Provinces a single unit at `origin` may move to.
    ///
    /// Fleets step into an adjacent ocean. Armies step into adjacent land, or
    /// cross the sea over a chain of oceans listed in `friendly_fleets`.
    fn neighbors(
        &self,
        origin: &str,
        nation: Nation,
        is_fleet: bool,
        friendly_fleets: &BTreeSet<ProvinceName>,
    ) -> BTreeSet<ProvinceName>;

    /// The home provinces of `nation`.
    fn home_provinces(&self, nation: Nation) -> BTreeSet<ProvinceName>;

    /// The kind of factory that can stand on `province`, if any.
    fn factory_type(&self, province: &str) -> Option<FactoryType>;

    fn is_ocean(&self, province: &str) -> bool;

    /// The nation whose home territory contains `province`.
    fn home_nation(&self, province: &str) -> Option<Nation> {
        Nation::ALL
            .into_iter()
            .find(|&nation| self.home_provinces(nation).contains(province))
    }

    fn contains(&self, province: &str) -> bool {
        self.province_names().iter().any(|name| name == province)
    }
}

impl<B: Board + ?Sized> Board for &B {
    fn province_names(&self) -> Vec<ProvinceName> {
        (**self).province_names()
    }

    fn neighbors(
        &self,
        origin: &str,
        nation: Nation,
        is_fleet: bool,
        friendly_fleets: &BTreeSet<ProvinceName>,
    ) -> BTreeSet<ProvinceName> {
        (**self).neighbors(origin, nation, is_fleet, friendly_fleets)
    }

    fn home_provinces(&self, nation: Nation) -> BTreeSet<ProvinceName> {
        (**self).home_provinces(nation)
    }

    fn factory_type(&self, province: &str) -> Option<FactoryType> {
        (**self).factory_type(province)
    }

    fn is_ocean(&self, province: &str) -> bool {
        (**self).is_ocean(province)
    }

    fn home_nation(&self, province: &str) -> Option<Nation> {
        (**self).home_nation(province)
    }

    fn contains(&self, province: &str) -> bool {
        (**self).contains(province)
    }
}
