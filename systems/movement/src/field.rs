//! Breadth-first distance field rooted at a single cell.

use std::collections::VecDeque;

use skirmish_core::CellCoord;
use skirmish_world::Grid;

/// Dense step-count grid produced by an unweighted breadth-first search.
///
/// Distances default to `u32::MAX` for unreachable cells. Buffers are reused
/// across rebuilds so repeated searches on one grid do not reallocate.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    columns: u32,
    rows: u32,
    distances: Vec<u32>,
    frontier: VecDeque<CellCoord>,
}

impl DistanceField {
    /// Rebuilds the field from `source` across passable cells accepted by `is_free`.
    ///
    /// The source itself is always expanded, whether or not `is_free` accepts it,
    /// so a unit standing on its own cell can search outward from it.
    pub(crate) fn rebuild_with<F>(&mut self, grid: &Grid, source: CellCoord, is_free: F)
    where
        F: Fn(CellCoord) -> bool,
    {
        let (rows, columns) = grid.dimensions();
        let cell_count = grid.cell_count();

        if self.distances.len() != cell_count {
            self.distances = vec![u32::MAX; cell_count];
        } else {
            self.distances.fill(u32::MAX);
        }
        self.rows = rows;
        self.columns = columns;
        self.frontier.clear();

        let Some(source_index) = self.index(source) else {
            return;
        };
        self.distances[source_index] = 0;
        self.frontier.push_back(source);

        while let Some(cell) = self.frontier.pop_front() {
            let Some(current_index) = self.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in grid.passable_neighbors(cell) {
                if !is_free(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                self.frontier.push_back(neighbor);
            }
        }
    }

    /// Step count from the source to `cell`, if reachable.
    #[must_use]
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell)
            .and_then(|index| self.distances.get(index).copied())
            .filter(|&distance| distance != u32::MAX)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() >= self.rows || cell.column() >= self.columns {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
