#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Skirmish engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative battle state, and pure systems. Systems inspect immutable
//! [`UnitView`] snapshots and respond with [`Command`] values describing the
//! desired mutation. The world executes those commands via its `apply` entry
//! point and broadcasts [`Event`] values describing what actually happened.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hit points every unit starts with unless configured otherwise.
pub const DEFAULT_HIT_POINTS: HitPoints = HitPoints::new(200);

/// Attack power every unit starts with unless configured otherwise.
pub const DEFAULT_ATTACK_POWER: AttackPower = AttackPower::new(3);

/// One of the two mutually hostile groups a unit belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    /// Units drawn with the `E` glyph.
    Elf,
    /// Units drawn with the `G` glyph.
    Goblin,
}

impl Faction {
    /// Both factions in a stable order.
    pub const ALL: [Faction; 2] = [Faction::Elf, Faction::Goblin];

    /// Returns the faction hostile to `self`.
    #[must_use]
    pub const fn enemy(self) -> Self {
        match self {
            Self::Elf => Self::Goblin,
            Self::Goblin => Self::Elf,
        }
    }

    /// Glyph used by layouts and renderers for units of this faction.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Elf => 'E',
            Self::Goblin => 'G',
        }
    }

    /// Resolves a layout glyph into a faction.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'E' => Some(Self::Elf),
            'G' => Some(Self::Goblin),
            _ => None,
        }
    }
}

/// Cardinal directions, declared in reading order of the neighbour they lead to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
}

impl Direction {
    /// All directions ordered so their neighbours appear in reading order.
    pub const READING_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::East,
        Direction::South,
    ];
}

/// Location of a single grid cell expressed as row and column coordinates.
///
/// The derived ordering compares rows first and columns second, which is the
/// reading order used for every tie-break in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether `other` shares an edge with `self`.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Returns the neighbouring cell in `direction`, if it has non-negative coordinates.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(row, self.column)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(self.row, column)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(self.row, column)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(row, self.column)),
        }
    }

    /// Iterates the 4-neighbours of the cell in reading order.
    pub fn neighbors(self) -> impl Iterator<Item = CellCoord> {
        Direction::READING_ORDER
            .into_iter()
            .filter_map(move |direction| self.step(direction))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Remaining health of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitPoints(u32);

impl HitPoints {
    /// Creates a hit point total.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric hit point total.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the total has been exhausted.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts `damage`, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, damage: AttackPower) -> Self {
        Self(self.0.saturating_sub(damage.get()))
    }
}

/// Damage dealt by a single attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttackPower(u32);

impl AttackPower {
    /// Creates an attack power value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric attack power.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds a permanent boost.
    #[must_use]
    pub const fn boosted(self, boost: u32) -> Self {
        Self(self.0.saturating_add(boost))
    }
}

/// Lifecycle of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BattleState {
    /// Both factions still have living units.
    Ongoing,
    /// A unit found no enemies at the start of its turn; the battle is over.
    Decisive,
}

/// Commands that express all permissible battle mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves the unit at `from` into the adjacent, free cell `to`.
    MoveUnit {
        /// Cell currently occupied by the moving unit.
        from: CellCoord,
        /// Adjacent cell the unit steps into.
        to: CellCoord,
    },
    /// The unit at `attacker` strikes the adjacent enemy at `target`.
    Attack {
        /// Cell occupied by the attacking unit.
        attacker: CellCoord,
        /// Cell occupied by the unit receiving the damage.
        target: CellCoord,
    },
    /// Permanently raises the attack power of every member of `faction`.
    BoostAttack {
        /// Faction receiving the boost.
        faction: Faction,
        /// Amount added to each member's attack power.
        amount: u32,
    },
    /// Records that every unit alive at the start of the round took its turn.
    CompleteRound,
    /// Moves the battle into its decisive state.
    Conclude,
}

/// Events broadcast after commands are processed or rounds advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a faction's attack power was raised.
    AttackBoosted {
        /// Faction that received the boost.
        faction: Faction,
        /// Amount added to each member's attack power.
        amount: u32,
    },
    /// Confirms that a unit moved between two cells.
    UnitMoved {
        /// Faction of the unit that moved.
        faction: Faction,
        /// Cell the unit occupied before moving.
        from: CellCoord,
        /// Cell the unit occupies after moving.
        to: CellCoord,
    },
    /// Confirms that a unit received damage and survived.
    UnitAttacked {
        /// Cell of the attacking unit.
        attacker: CellCoord,
        /// Cell of the damaged unit.
        target: CellCoord,
        /// Hit points left on the target.
        remaining: HitPoints,
    },
    /// Announces that a unit was killed and removed from the battle.
    UnitDied {
        /// Faction of the fallen unit.
        faction: Faction,
        /// Cell the unit occupied when it died.
        cell: CellCoord,
    },
    /// Announces that every unit alive at the start of the round took its turn.
    RoundCompleted {
        /// Number of rounds completed so far.
        completed_rounds: u32,
    },
    /// Announces that the battle reached its decisive state.
    CombatEnded {
        /// Number of fully completed rounds.
        completed_rounds: u32,
        /// Faction left standing, if any unit survived.
        victor: Option<Faction>,
    },
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Grid cell currently occupied by the unit.
    pub cell: CellCoord,
    /// Faction the unit fights for.
    pub faction: Faction,
    /// Remaining hit points.
    pub hit_points: HitPoints,
    /// Damage dealt per attack.
    pub attack_power: AttackPower,
}

/// Read-only snapshot describing all living units, kept in reading order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.cell);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in reading order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Returns the unit standing on `cell`, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&cell, |snapshot| snapshot.cell)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Reports whether no unit stands on `cell`.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.occupant(cell).is_none()
    }

    /// Iterator over the living members of `faction` in reading order.
    pub fn members(&self, faction: Faction) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.faction == faction)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}
