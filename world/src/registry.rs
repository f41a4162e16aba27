//! Mutable mapping from cells to the units standing on them.

use std::collections::BTreeMap;

use skirmish_core::{AttackPower, CellCoord, Faction, HitPoints, UnitSnapshot};

use crate::{Grid, InvariantViolation};

/// Per-unit record. A unit's identity is the cell it occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unit {
    faction: Faction,
    hit_points: HitPoints,
    attack_power: AttackPower,
}

impl Unit {
    /// Creates a unit record.
    #[must_use]
    pub const fn new(faction: Faction, hit_points: HitPoints, attack_power: AttackPower) -> Self {
        Self {
            faction,
            hit_points,
            attack_power,
        }
    }

    /// Faction the unit fights for.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn hit_points(&self) -> HitPoints {
        self.hit_points
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn attack_power(&self) -> AttackPower {
        self.attack_power
    }
}

/// Living units keyed by cell; iteration order is reading order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitRegistry {
    units: BTreeMap<CellCoord, Unit>,
}

impl UnitRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `unit` on `cell`.
    pub fn insert(
        &mut self,
        grid: &Grid,
        cell: CellCoord,
        unit: Unit,
    ) -> Result<(), InvariantViolation> {
        if !grid.is_passable(cell) {
            return Err(InvariantViolation::Impassable(cell));
        }
        if self.units.contains_key(&cell) {
            return Err(InvariantViolation::Occupied(cell));
        }
        if unit.hit_points.is_depleted() {
            return Err(InvariantViolation::Depleted(cell));
        }

        let _ = self.units.insert(cell, unit);
        Ok(())
    }

    /// Returns the unit standing on `cell`, if any.
    #[must_use]
    pub fn unit_at(&self, cell: CellCoord) -> Option<&Unit> {
        self.units.get(&cell)
    }

    /// Cells of all living units, sorted in reading order at the time of the call.
    #[must_use]
    pub fn units_in_reading_order(&self) -> Vec<CellCoord> {
        self.units.keys().copied().collect()
    }

    /// Relocates the unit on `from` into `to`.
    pub fn move_unit(
        &mut self,
        grid: &Grid,
        from: CellCoord,
        to: CellCoord,
    ) -> Result<(), InvariantViolation> {
        if !grid.is_passable(to) {
            return Err(InvariantViolation::Impassable(to));
        }
        if self.units.contains_key(&to) {
            return Err(InvariantViolation::Occupied(to));
        }

        let unit = self
            .units
            .remove(&from)
            .ok_or(InvariantViolation::Vacant(from))?;
        let _ = self.units.insert(to, unit);
        Ok(())
    }

    /// Deals `amount` damage to the unit on `cell`.
    ///
    /// Returns `true` when the unit died, in which case it has already been
    /// removed from the registry.
    pub fn apply_damage(
        &mut self,
        cell: CellCoord,
        amount: AttackPower,
    ) -> Result<bool, InvariantViolation> {
        let unit = self
            .units
            .get_mut(&cell)
            .ok_or(InvariantViolation::Vacant(cell))?;
        unit.hit_points = unit.hit_points.saturating_sub(amount);

        if unit.hit_points.is_depleted() {
            let _ = self.units.remove(&cell);
            return Ok(true);
        }

        Ok(false)
    }

    /// Adds `amount` to the attack power of every member of `faction`.
    pub fn boost_attack(&mut self, faction: Faction, amount: u32) {
        for unit in self.units.values_mut() {
            if unit.faction == faction {
                unit.attack_power = unit.attack_power.boosted(amount);
            }
        }
    }

    /// Number of living members of `faction`.
    #[must_use]
    pub fn count(&self, faction: Faction) -> usize {
        self.units
            .values()
            .filter(|unit| unit.faction == faction)
            .count()
    }

    /// Number of living units.
    #[must_use]
    pub fn population(&self) -> usize {
        self.units.len()
    }

    /// Factions that still have at least one living member.
    #[must_use]
    pub fn factions_alive(&self) -> Vec<Faction> {
        Faction::ALL
            .into_iter()
            .filter(|&faction| self.units.values().any(|unit| unit.faction == faction))
            .collect()
    }

    /// Sum of the hit points of every living unit.
    #[must_use]
    pub fn total_hit_points(&self) -> u64 {
        self.units
            .values()
            .map(|unit| u64::from(unit.hit_points.get()))
            .sum()
    }

    /// Snapshots of all living units in reading order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<UnitSnapshot> {
        self.units
            .iter()
            .map(|(&cell, unit)| UnitSnapshot {
                cell,
                faction: unit.faction,
                hit_points: unit.hit_points,
                attack_power: unit.attack_power,
            })
            .collect()
    }
}
