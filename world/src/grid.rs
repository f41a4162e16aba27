//! Immutable passability map shared by every battle cloned from one layout.

use std::mem::size_of;

use skirmish_core::CellCoord;
use thiserror::Error;

/// Errors raised while building a [`Grid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The requested dimensions cannot be stored in memory.
    #[error("a {rows}x{columns} grid is too large to store")]
    TooLarge {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
}

/// Set of passable cells fixed at construction.
///
/// Cells outside the bounding box, and every cell not listed as passable, are
/// treated as walls. The passable neighbours of each cell are computed once so
/// path searches never repeat the bounds and wall checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: u32,
    columns: u32,
    passable: Vec<bool>,
    neighbors: Vec<[Option<CellCoord>; 4]>,
}

impl Grid {
    /// Builds a grid whose passable cells are exactly `cells`.
    ///
    /// The grid dimensions are the smallest bounding box containing every cell.
    pub fn from_passable_cells<I>(cells: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let cells: Vec<CellCoord> = cells.into_iter().collect();
        let rows = cells
            .iter()
            .map(|cell| cell.row().saturating_add(1))
            .max()
            .unwrap_or(0);
        let columns = cells
            .iter()
            .map(|cell| cell.column().saturating_add(1))
            .max()
            .unwrap_or(0);

        Self::new(rows, columns, cells)
    }

    /// Builds a `rows` x `columns` grid whose passable cells are `cells`.
    ///
    /// Cells outside the requested dimensions are ignored.
    pub fn new<I>(rows: u32, columns: u32, cells: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let capacity = u64::from(rows)
            .checked_mul(u64::from(columns))
            .and_then(|count| usize::try_from(count).ok())
            .filter(|&count| {
                count
                    .checked_mul(size_of::<[Option<CellCoord>; 4]>())
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or(GridError::TooLarge { rows, columns })?;
        let mut grid = Self {
            rows,
            columns,
            passable: vec![false; capacity],
            neighbors: vec![[None; 4]; capacity],
        };

        for cell in cells {
            if let Some(index) = grid.index(cell) {
                grid.passable[index] = true;
            }
        }

        let cells =
            (0..rows).flat_map(|row| (0..columns).map(move |column| CellCoord::new(row, column)));
        for (index, cell) in cells.enumerate() {
            if !grid.passable[index] {
                continue;
            }
            let mut slots = [None; 4];
            for (slot, neighbor) in slots
                .iter_mut()
                .zip(cell.neighbors().filter(|&neighbor| grid.is_passable(neighbor)))
            {
                *slot = Some(neighbor);
            }
            grid.neighbors[index] = slots;
        }

        Ok(grid)
    }

    /// Reports whether units may stand on `cell`.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.passable.get(index).copied())
            .unwrap_or(false)
    }

    /// Passable 4-neighbours of `cell` in reading order.
    ///
    /// Yields nothing for impassable cells.
    pub fn passable_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        self.index(cell)
            .and_then(|index| self.neighbors.get(index))
            .into_iter()
            .flat_map(|slots| slots.iter().copied().flatten())
    }

    /// Grid dimensions as `(rows, columns)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Number of cells inside the grid, walls included.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.passable.len()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() < self.rows && cell.column() < self.columns {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
