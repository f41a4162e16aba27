#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that plans single steps toward the nearest enemy.

mod field;

use skirmish_core::{CellCoord, Command, UnitSnapshot, UnitView};
use skirmish_world::Grid;

use crate::field::DistanceField;

/// Outcome of a successful path search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedStep {
    /// Goal cell the unit is heading for.
    pub destination: CellCoord,
    /// Number of steps between the unit and its destination.
    pub distance: u32,
    /// Neighbouring cell the unit moves into this turn.
    pub step: CellCoord,
}

/// Breadth-first search that picks a unit's next step.
///
/// Among the reachable goal cells at the smallest step count the first in
/// reading order becomes the destination. The step taken is the first cell in
/// reading order, among the unit's open neighbours, that lies on a shortest
/// path to that destination.
#[derive(Debug, Default)]
pub struct Pathfinder {
    from_origin: DistanceField,
    from_destination: DistanceField,
}

impl Pathfinder {
    /// Creates a pathfinder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans the next step from `origin` toward the nearest of `goals`.
    ///
    /// `is_free` reports whether a passable cell is currently unoccupied; the
    /// origin is searched from regardless. Returns `None` when no goal can be
    /// reached.
    pub fn next_step<F>(
        &mut self,
        grid: &Grid,
        origin: CellCoord,
        goals: &[CellCoord],
        is_free: F,
    ) -> Option<PlannedStep>
    where
        F: Fn(CellCoord) -> bool,
    {
        if goals.is_empty() {
            return None;
        }

        self.from_origin.rebuild_with(grid, origin, &is_free);

        let (distance, destination) = goals
            .iter()
            .filter_map(|&goal| self.from_origin.distance(goal).map(|distance| (distance, goal)))
            .min()?;

        if distance == 0 {
            return None;
        }

        self.from_destination
            .rebuild_with(grid, destination, &is_free);

        let step = grid
            .passable_neighbors(origin)
            .filter(|&neighbor| is_free(neighbor))
            .find(|&neighbor| self.from_destination.distance(neighbor) == Some(distance - 1))?;

        Some(PlannedStep {
            destination,
            distance,
            step,
        })
    }
}

/// Pure system that emits a `Command::MoveUnit` for a unit not yet in range.
#[derive(Debug, Default)]
pub struct Movement {
    pathfinder: Pathfinder,
    goals: Vec<CellCoord>,
}

impl Movement {
    /// Creates a movement system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans the turn of the unit on `mover` and emits its step, if any.
    ///
    /// Units already adjacent to an enemy stay put, as do units with no
    /// reachable goal cell.
    pub fn handle(
        &mut self,
        grid: &Grid,
        units: &UnitView,
        mover: CellCoord,
        out: &mut Vec<Command>,
    ) -> Option<PlannedStep> {
        let unit = *units.occupant(mover)?;

        if engaged(units, &unit) {
            return None;
        }

        self.collect_goals(grid, units, &unit);

        let planned = self
            .pathfinder
            .next_step(grid, mover, &self.goals, |cell| units.is_free(cell))?;

        out.push(Command::MoveUnit {
            from: mover,
            to: planned.step,
        });
        Some(planned)
    }

    /// Open cells adjacent to any living enemy of `unit`, in reading order.
    fn collect_goals(&mut self, grid: &Grid, units: &UnitView, unit: &UnitSnapshot) {
        self.goals.clear();
        for enemy in units.members(unit.faction.enemy()) {
            self.goals.extend(
                grid.passable_neighbors(enemy.cell)
                    .filter(|&cell| units.is_free(cell)),
            );
        }
        self.goals.sort_unstable();
        self.goals.dedup();
    }
}

/// Reports whether `unit` stands next to at least one living enemy.
#[must_use]
pub fn engaged(units: &UnitView, unit: &UnitSnapshot) -> bool {
    unit.cell.neighbors().any(|cell| {
        units
            .occupant(cell)
            .is_some_and(|other| other.faction != unit.faction)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{AttackPower, Faction, HitPoints};

    fn room(rows: u32, columns: u32) -> Grid {
        Grid::from_passable_cells(
            (0..rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(row, column))),
        )
        .expect("grid fits")
    }

    fn unit(row: u32, column: u32, faction: Faction) -> UnitSnapshot {
        UnitSnapshot {
            cell: CellCoord::new(row, column),
            faction,
            hit_points: HitPoints::new(200),
            attack_power: AttackPower::new(3),
        }
    }

    #[test]
    fn nearest_goal_wins_over_reading_order() {
        let grid = room(5, 5);
        let mut pathfinder = Pathfinder::new();
        let goals = [CellCoord::new(0, 4), CellCoord::new(3, 2)];

        let planned = pathfinder
            .next_step(&grid, CellCoord::new(2, 2), &goals, |_| true)
            .expect("reachable");

        assert_eq!(planned.destination, CellCoord::new(3, 2));
        assert_eq!(planned.distance, 1);
        assert_eq!(planned.step, CellCoord::new(3, 2));
    }

    #[test]
    fn equidistant_goals_break_ties_in_reading_order() {
        let grid = room(5, 5);
        let mut pathfinder = Pathfinder::new();
        let goals = [CellCoord::new(4, 2), CellCoord::new(2, 0), CellCoord::new(2, 4)];

        let planned = pathfinder
            .next_step(&grid, CellCoord::new(2, 2), &goals, |_| true)
            .expect("reachable");

        assert_eq!(planned.destination, CellCoord::new(2, 0));
        assert_eq!(planned.step, CellCoord::new(2, 1));
    }

    #[test]
    fn first_step_prefers_reading_order_among_shortest_paths() {
        let grid = room(5, 5);
        let mut pathfinder = Pathfinder::new();
        let goals = [CellCoord::new(3, 3)];

        let planned = pathfinder
            .next_step(&grid, CellCoord::new(1, 1), &goals, |_| true)
            .expect("reachable");

        assert_eq!(planned.distance, 4);
        assert_eq!(planned.step, CellCoord::new(1, 2));
    }

    #[test]
    fn occupied_cells_are_routed_around() {
        let grid = room(3, 3);
        let mut pathfinder = Pathfinder::new();
        let blocker = CellCoord::new(0, 1);
        let goals = [CellCoord::new(0, 2)];

        let planned = pathfinder
            .next_step(&grid, CellCoord::new(0, 0), &goals, |cell| cell != blocker)
            .expect("reachable");

        assert_eq!(planned.distance, 4);
        assert_eq!(planned.step, CellCoord::new(1, 0));
    }

    #[test]
    fn unreachable_goals_produce_no_step() {
        let grid = room(3, 3);
        let mut pathfinder = Pathfinder::new();
        let wall = |cell: CellCoord| cell.column() != 1;

        let planned = pathfinder.next_step(&grid, CellCoord::new(0, 0), &[CellCoord::new(2, 2)], wall);

        assert!(planned.is_none());
        assert!(pathfinder
            .next_step(&grid, CellCoord::new(0, 0), &[], |_| true)
            .is_none());
    }

    #[test]
    fn engaged_units_do_not_move() {
        let grid = room(3, 3);
        let units = UnitView::from_snapshots(vec![
            unit(1, 1, Faction::Elf),
            unit(1, 2, Faction::Goblin),
            unit(2, 0, Faction::Goblin),
        ]);
        let mut movement = Movement::new();
        let mut out = Vec::new();

        assert!(movement
            .handle(&grid, &units, CellCoord::new(1, 1), &mut out)
            .is_none());
        assert!(out.is_empty());
    }

    #[test]
    fn allies_are_not_goals() {
        let grid = room(1, 5);
        let units = UnitView::from_snapshots(vec![
            unit(0, 0, Faction::Elf),
            unit(0, 2, Faction::Elf),
            unit(0, 4, Faction::Goblin),
        ]);
        let mut movement = Movement::new();
        let mut out = Vec::new();

        let planned = movement.handle(&grid, &units, CellCoord::new(0, 2), &mut out);

        assert_eq!(planned.map(|planned| planned.destination), Some(CellCoord::new(0, 3)));
        assert_eq!(
            out,
            vec![Command::MoveUnit {
                from: CellCoord::new(0, 2),
                to: CellCoord::new(0, 3),
            }]
        );

        out.clear();
        assert!(movement
            .handle(&grid, &units, CellCoord::new(0, 0), &mut out)
            .is_none());
        assert!(out.is_empty());
    }

    #[test]
    fn missing_unit_is_ignored() {
        let grid = room(2, 2);
        let units = UnitView::from_snapshots(vec![unit(0, 0, Faction::Elf)]);
        let mut movement = Movement::new();
        let mut out = Vec::new();

        assert!(movement
            .handle(&grid, &units, CellCoord::new(1, 1), &mut out)
            .is_none());
        assert!(out.is_empty());
    }
}
