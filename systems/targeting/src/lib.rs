#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks which adjacent enemy a unit strikes.

use skirmish_core::{CellCoord, Command, HitPoints, UnitSnapshot, UnitView};

/// Targeting system that emits `Command::Attack` for units in range of an enemy.
#[derive(Debug, Default)]
pub struct Targeting;

impl Targeting {
    /// Creates a new targeting system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Selects the enemy the unit on `attacker` should strike.
    ///
    /// Only 4-adjacent enemies qualify. The weakest one wins, with ties broken
    /// by the reading order of the target's cell.
    #[must_use]
    pub fn select<'view>(
        &self,
        units: &'view UnitView,
        attacker: CellCoord,
    ) -> Option<&'view UnitSnapshot> {
        let striker = units.occupant(attacker)?;
        let mut best: Option<BestCandidate<'view>> = None;

        for cell in attacker.neighbors() {
            let Some(candidate) = units.occupant(cell) else {
                continue;
            };
            if candidate.faction == striker.faction {
                continue;
            }

            let current = BestCandidate {
                hit_points: candidate.hit_points,
                cell: candidate.cell,
                snapshot: candidate,
            };

            match &mut best {
                Some(existing) => {
                    if current.precedes(existing) {
                        *existing = current;
                    }
                }
                None => best = Some(current),
            }
        }

        best.map(|candidate| candidate.snapshot)
    }

    /// Emits the attack of the unit on `attacker`, if any enemy is in range.
    pub fn handle(
        &mut self,
        units: &UnitView,
        attacker: CellCoord,
        out: &mut Vec<Command>,
    ) -> Option<CellCoord> {
        let target = self.select(units, attacker)?.cell;
        out.push(Command::Attack { attacker, target });
        Some(target)
    }
}

#[derive(Clone, Copy, Debug)]
struct BestCandidate<'view> {
    hit_points: HitPoints,
    cell: CellCoord,
    snapshot: &'view UnitSnapshot,
}

impl BestCandidate<'_> {
    fn precedes(&self, other: &Self) -> bool {
        if self.hit_points != other.hit_points {
            return self.hit_points < other.hit_points;
        }

        self.cell < other.cell
    }
}

#[cfg(test)]
mod tests {
    use super::Targeting;
    use skirmish_core::{AttackPower, CellCoord, Command, Faction, HitPoints, UnitSnapshot, UnitView};

    fn unit(row: u32, column: u32, faction: Faction, hit_points: u32) -> UnitSnapshot {
        UnitSnapshot {
            cell: CellCoord::new(row, column),
            faction,
            hit_points: HitPoints::new(hit_points),
            attack_power: AttackPower::new(3),
        }
    }

    #[test]
    fn weakest_adjacent_enemy_is_targeted() {
        let units = UnitView::from_snapshots(vec![
            unit(2, 2, Faction::Elf, 200),
            unit(1, 2, Faction::Goblin, 9),
            unit(2, 1, Faction::Goblin, 4),
            unit(2, 3, Faction::Goblin, 2),
            unit(3, 2, Faction::Goblin, 2),
        ]);
        let mut system = Targeting::new();
        let mut out = Vec::new();

        let target = system.handle(&units, CellCoord::new(2, 2), &mut out);

        assert_eq!(target, Some(CellCoord::new(2, 3)));
        assert_eq!(
            out,
            vec![Command::Attack {
                attacker: CellCoord::new(2, 2),
                target: CellCoord::new(2, 3),
            }]
        );
    }

    #[test]
    fn hit_point_ties_prefer_reading_order() {
        let units = UnitView::from_snapshots(vec![
            unit(1, 1, Faction::Goblin, 200),
            unit(2, 1, Faction::Elf, 7),
            unit(1, 2, Faction::Elf, 7),
            unit(1, 0, Faction::Elf, 7),
        ]);
        let system = Targeting::new();

        let target = system.select(&units, CellCoord::new(1, 1));

        assert_eq!(target.map(|unit| unit.cell), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn allies_are_never_targeted() {
        let units = UnitView::from_snapshots(vec![
            unit(0, 0, Faction::Elf, 200),
            unit(0, 1, Faction::Elf, 1),
        ]);
        let mut system = Targeting::new();
        let mut out = Vec::new();

        assert_eq!(system.handle(&units, CellCoord::new(0, 0), &mut out), None);
        assert!(out.is_empty());
    }

    #[test]
    fn diagonal_enemies_are_out_of_range() {
        let units = UnitView::from_snapshots(vec![
            unit(1, 1, Faction::Elf, 200),
            unit(0, 0, Faction::Goblin, 1),
            unit(2, 2, Faction::Goblin, 1),
            unit(1, 3, Faction::Goblin, 1),
        ]);
        let system = Targeting::new();

        assert!(system.select(&units, CellCoord::new(1, 1)).is_none());
    }

    #[test]
    fn missing_attacker_selects_nothing() {
        let units = UnitView::from_snapshots(vec![unit(0, 1, Faction::Goblin, 200)]);
        let system = Targeting::new();

        assert!(system.select(&units, CellCoord::new(0, 0)).is_none());
    }
}
