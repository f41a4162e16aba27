#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state management for Skirmish.

mod grid;
mod registry;

use std::sync::Arc;

use skirmish_core::{
    AttackPower, BattleState, CellCoord, Command, Event, Faction, HitPoints, DEFAULT_ATTACK_POWER,
    DEFAULT_HIT_POINTS,
};
use thiserror::Error;

pub use grid::{Grid, GridError};
pub use registry::{Unit, UnitRegistry};

/// Broken contract between a system and the battle state.
///
/// These never describe bad input; they mean a system asked for a mutation it
/// should not have produced, so callers treat them as fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A unit was placed on or moved into a wall.
    #[error("cell {0} is not passable")]
    Impassable(CellCoord),
    /// A unit was placed on or moved into a cell holding another unit.
    #[error("cell {0} is already occupied")]
    Occupied(CellCoord),
    /// A command referenced a cell without a unit.
    #[error("no unit stands on cell {0}")]
    Vacant(CellCoord),
    /// A unit was registered without any hit points.
    #[error("unit on cell {0} has no hit points")]
    Depleted(CellCoord),
    /// A move or attack spanned more than one step.
    #[error("cells {from} and {to} are not adjacent")]
    NotAdjacent {
        /// Cell the command originated from.
        from: CellCoord,
        /// Cell the command targeted.
        to: CellCoord,
    },
    /// An attack targeted a member of the attacker's own faction.
    #[error("unit on {attacker} attacked its ally on {target}")]
    NotHostile {
        /// Cell of the attacking unit.
        attacker: CellCoord,
        /// Cell of the allied unit.
        target: CellCoord,
    },
}

/// Initial placement of a unit handed over by the layout parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSeed {
    /// Cell the unit starts on.
    pub cell: CellCoord,
    /// Faction the unit fights for.
    pub faction: Faction,
    /// Starting hit points.
    pub hit_points: HitPoints,
    /// Starting attack power.
    pub attack_power: AttackPower,
}

impl UnitSeed {
    /// Seed with the default hit points and attack power.
    #[must_use]
    pub const fn new(cell: CellCoord, faction: Faction) -> Self {
        Self {
            cell,
            faction,
            hit_points: DEFAULT_HIT_POINTS,
            attack_power: DEFAULT_ATTACK_POWER,
        }
    }
}

/// Represents one battle: a shared grid plus the units fighting on it.
///
/// Cloning a battle shares the immutable [`Grid`] and deep-copies the unit
/// registry, so a clone taken before the first round is an independent trial.
#[derive(Clone, Debug)]
pub struct Battle {
    grid: Arc<Grid>,
    units: UnitRegistry,
    completed_rounds: u32,
    state: BattleState,
}

impl Battle {
    /// Creates a battle from a grid and the initial unit placement.
    pub fn new<I>(grid: Arc<Grid>, seeds: I) -> Result<Self, InvariantViolation>
    where
        I: IntoIterator<Item = UnitSeed>,
    {
        let mut units = UnitRegistry::new();
        for seed in seeds {
            units.insert(
                &grid,
                seed.cell,
                Unit::new(seed.faction, seed.hit_points, seed.attack_power),
            )?;
        }

        Ok(Self {
            grid,
            units,
            completed_rounds: 0,
            state: BattleState::Ongoing,
        })
    }
}

/// Applies the provided command to the battle, mutating state deterministically.
///
/// Every accepted command appends the events describing its effect to
/// `out_events`. A rejected command leaves the battle untouched.
pub fn apply(
    battle: &mut Battle,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), InvariantViolation> {
    match command {
        Command::MoveUnit { from, to } => {
            if !from.is_adjacent(to) {
                return Err(InvariantViolation::NotAdjacent { from, to });
            }
            let faction = battle
                .units
                .unit_at(from)
                .map(Unit::faction)
                .ok_or(InvariantViolation::Vacant(from))?;
            battle.units.move_unit(&battle.grid, from, to)?;
            out_events.push(Event::UnitMoved { faction, from, to });
        }
        Command::Attack { attacker, target } => {
            if !attacker.is_adjacent(target) {
                return Err(InvariantViolation::NotAdjacent {
                    from: attacker,
                    to: target,
                });
            }
            let striker = *battle
                .units
                .unit_at(attacker)
                .ok_or(InvariantViolation::Vacant(attacker))?;
            let victim = *battle
                .units
                .unit_at(target)
                .ok_or(InvariantViolation::Vacant(target))?;
            if striker.faction() == victim.faction() {
                return Err(InvariantViolation::NotHostile { attacker, target });
            }

            if battle.units.apply_damage(target, striker.attack_power())? {
                out_events.push(Event::UnitDied {
                    faction: victim.faction(),
                    cell: target,
                });
            } else {
                let remaining = battle
                    .units
                    .unit_at(target)
                    .map(Unit::hit_points)
                    .ok_or(InvariantViolation::Vacant(target))?;
                out_events.push(Event::UnitAttacked {
                    attacker,
                    target,
                    remaining,
                });
            }
        }
        Command::BoostAttack { faction, amount } => {
            battle.units.boost_attack(faction, amount);
            out_events.push(Event::AttackBoosted { faction, amount });
        }
        Command::CompleteRound => {
            battle.completed_rounds = battle.completed_rounds.saturating_add(1);
            out_events.push(Event::RoundCompleted {
                completed_rounds: battle.completed_rounds,
            });
        }
        Command::Conclude => {
            battle.state = BattleState::Decisive;
            let alive = battle.units.factions_alive();
            let victor = match alive.as_slice() {
                [faction] => Some(*faction),
                _ => None,
            };
            out_events.push(Event::CombatEnded {
                completed_rounds: battle.completed_rounds,
                victor,
            });
        }
    }

    Ok(())
}

/// Query functions that provide read-only access to the battle state.
pub mod query {
    use skirmish_core::{BattleState, CellCoord, Faction, UnitSnapshot, UnitView};

    use super::{Battle, Grid, Unit};

    /// Provides read-only access to the battle's grid.
    #[must_use]
    pub fn grid(battle: &Battle) -> &Grid {
        &battle.grid
    }

    /// Captures a read-only view of the living units in reading order.
    #[must_use]
    pub fn unit_view(battle: &Battle) -> UnitView {
        UnitView::from_snapshots(battle.units.snapshots())
    }

    /// Cells of the living units in reading order, computed now.
    #[must_use]
    pub fn units_in_reading_order(battle: &Battle) -> Vec<CellCoord> {
        battle.units.units_in_reading_order()
    }

    /// Snapshot of the unit standing on `cell`, if any.
    #[must_use]
    pub fn unit_at(battle: &Battle, cell: CellCoord) -> Option<UnitSnapshot> {
        battle.units.unit_at(cell).map(|unit: &Unit| UnitSnapshot {
            cell,
            faction: unit.faction(),
            hit_points: unit.hit_points(),
            attack_power: unit.attack_power(),
        })
    }

    /// Reports whether a unit could step into `cell` right now.
    #[must_use]
    pub fn is_open(battle: &Battle, cell: CellCoord) -> bool {
        battle.grid.is_passable(cell) && battle.units.unit_at(cell).is_none()
    }

    /// Number of rounds that ran to completion.
    #[must_use]
    pub fn completed_rounds(battle: &Battle) -> u32 {
        battle.completed_rounds
    }

    /// Current lifecycle state of the battle.
    #[must_use]
    pub fn state(battle: &Battle) -> BattleState {
        battle.state
    }

    /// Factions that still have living members.
    #[must_use]
    pub fn factions_alive(battle: &Battle) -> Vec<Faction> {
        battle.units.factions_alive()
    }

    /// Number of living units across both factions.
    #[must_use]
    pub fn population(battle: &Battle) -> usize {
        battle.units.population()
    }

    /// Number of living members of `faction`.
    #[must_use]
    pub fn count(battle: &Battle, faction: Faction) -> usize {
        battle.units.count(faction)
    }

    /// Sum of the hit points of all living units.
    #[must_use]
    pub fn total_hit_points(battle: &Battle) -> u64 {
        battle.units.total_hit_points()
    }
}
