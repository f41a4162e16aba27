//! Text layout parser turning a battlefield drawing into a grid and unit seeds.

use std::sync::Arc;

use skirmish_core::{AttackPower, CellCoord, Faction, HitPoints};
use skirmish_world::{Battle, Grid, InvariantViolation, UnitSeed};
use thiserror::Error;

const WALL: char = '#';
const FLOOR: char = '.';

/// Errors that can occur while parsing a layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum LayoutError {
    /// The layout contained no floor or unit cell.
    #[error("layout contains no open cells")]
    Empty,
    /// A character other than `#`, `.`, `E` or `G` was found.
    #[error("unknown glyph {glyph:?} at line {line}, column {column}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
    },
    /// The layout is too large to address.
    #[error("layout has more rows or columns than a grid can address")]
    TooLarge,
}

/// Parsed battlefield: the walls and where each unit starts.
#[derive(Clone, Debug)]
pub(crate) struct Layout {
    grid: Arc<Grid>,
    units: Vec<(CellCoord, Faction)>,
}

impl Layout {
    /// Parses a layout drawn with `#` walls, `.` floor, `E` elves and `G` goblins.
    ///
    /// Lines may differ in length; missing cells are walls. Trailing whitespace
    /// is ignored.
    pub(crate) fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut open = Vec::new();
        let mut units = Vec::new();
        let mut rows = 0_u32;
        let mut columns = 0_u32;

        for (line_index, line) in text.lines().enumerate() {
            let row = u32::try_from(line_index).map_err(|_| LayoutError::TooLarge)?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            for (column_index, glyph) in line.chars().enumerate() {
                let column = u32::try_from(column_index).map_err(|_| LayoutError::TooLarge)?;
                let cell = CellCoord::new(row, column);
                match glyph {
                    WALL => {}
                    FLOOR => open.push(cell),
                    _ => {
                        let faction = Faction::from_glyph(glyph).ok_or(LayoutError::UnknownGlyph {
                            glyph,
                            line: line_index + 1,
                            column: column_index + 1,
                        })?;
                        open.push(cell);
                        units.push((cell, faction));
                    }
                }
                columns = columns.max(column.saturating_add(1));
            }
            rows = row.saturating_add(1);
        }

        if open.is_empty() {
            return Err(LayoutError::Empty);
        }

        let grid = Grid::new(rows, columns, open).map_err(|_| LayoutError::TooLarge)?;
        Ok(Self {
            grid: Arc::new(grid),
            units,
        })
    }

    /// Grid shared by every battle built from this layout.
    #[must_use]
    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Builds the initial battle with every unit at the given strength.
    pub(crate) fn battle(
        &self,
        hit_points: HitPoints,
        attack_power: AttackPower,
    ) -> Result<Battle, InvariantViolation> {
        let seeds = self.units.iter().map(|&(cell, faction)| UnitSeed {
            cell,
            faction,
            hit_points,
            attack_power,
        });
        Battle::new(Arc::clone(&self.grid), seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_world::query;

    #[test]
    fn parses_walls_floor_and_units() {
        let layout = Layout::parse("#####\n#E.G#\n#####\n").expect("layout parses");

        assert_eq!(layout.grid().dimensions(), (3, 5));
        assert!((1..4).all(|column| layout.grid().is_passable(CellCoord::new(1, column))));
        assert!(!layout.grid().is_passable(CellCoord::new(0, 2)));

        let battle = layout
            .battle(HitPoints::new(200), AttackPower::new(3))
            .expect("valid battle");
        let units: Vec<_> = query::unit_view(&battle)
            .iter()
            .map(|unit| (unit.cell, unit.faction))
            .collect();
        assert_eq!(
            units,
            vec![
                (CellCoord::new(1, 1), Faction::Elf),
                (CellCoord::new(1, 3), Faction::Goblin),
            ]
        );
    }

    #[test]
    fn ragged_lines_pad_with_walls() {
        let layout = Layout::parse("#####\n#E.G\n###\n").expect("layout parses");

        assert_eq!(layout.grid().dimensions(), (3, 5));
        assert!(!layout.grid().is_passable(CellCoord::new(1, 4)));
        assert!(layout.grid().is_passable(CellCoord::new(1, 3)));
    }

    #[test]
    fn windows_line_endings_are_accepted() {
        let layout = Layout::parse("####\r\n#EG#\r\n####\r\n").expect("layout parses");

        assert_eq!(layout.grid().dimensions(), (3, 4));
        assert!(layout.grid().is_passable(CellCoord::new(1, 1)));
        assert!(layout.grid().is_passable(CellCoord::new(1, 2)));
    }

    #[test]
    fn unknown_glyphs_report_their_position() {
        let error = Layout::parse("####\n#E?#\n####").expect_err("unknown glyph");

        assert_eq!(
            error,
            LayoutError::UnknownGlyph {
                glyph: '?',
                line: 2,
                column: 3,
            }
        );
        assert_eq!(error.to_string(), "unknown glyph '?' at line 2, column 3");
    }

    #[test]
    fn layouts_without_open_cells_are_rejected() {
        assert_eq!(Layout::parse("").expect_err("empty"), LayoutError::Empty);
        assert_eq!(Layout::parse("###\n###").expect_err("walls"), LayoutError::Empty);
    }

    #[test]
    fn configured_strength_applies_to_every_unit() {
        let layout = Layout::parse("#EG#").expect("layout parses");

        let battle = layout
            .battle(HitPoints::new(10), AttackPower::new(7))
            .expect("valid battle");

        assert!(query::unit_view(&battle).iter().all(|unit| {
            unit.hit_points == HitPoints::new(10) && unit.attack_power == AttackPower::new(7)
        }));
    }
}
