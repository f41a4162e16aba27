//! Plain-text battlefield rendering.

use std::fmt::Write as _;

use skirmish_core::{CellCoord, UnitView};
use skirmish_world::Grid;

/// Draws the grid with its units, listing each row's hit points on the right.
///
/// Rows with units end in `   G(200), E(131)` style annotations, in reading
/// order.
#[must_use]
pub(crate) fn render(grid: &Grid, units: &UnitView) -> String {
    let (rows, columns) = grid.dimensions();
    let mut output = String::new();

    for row in 0..rows {
        let mut annotations = Vec::new();
        for column in 0..columns {
            let cell = CellCoord::new(row, column);
            let glyph = match units.occupant(cell) {
                Some(unit) => {
                    annotations.push(format!(
                        "{}({})",
                        unit.faction.glyph(),
                        unit.hit_points.get()
                    ));
                    unit.faction.glyph()
                }
                None if grid.is_passable(cell) => '.',
                None => '#',
            };
            output.push(glyph);
        }

        if !annotations.is_empty() {
            let _ = write!(output, "   {}", annotations.join(", "));
        }
        output.push('\n');
    }

    output
}
