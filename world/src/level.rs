//! Level text parsing.
//!
//! A level is a rectangular block of ASCII symbols, one per grid cell. Rows
//! are separated by newlines; a trailing carriage return on each row and
//! trailing blank lines are ignored.

use glam::{IVec2, Vec2};
use thiserror::Error;
use tilebreaker_core::{TileCollision, TileIndex};

use crate::{
    content::ContentError,
    grid::{Grid, TileCell},
};

/// Errors that abort level construction.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The description contained no cells.
    #[error("level description is empty")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("line {line} has {found} cells but the first line has {expected}")]
    RaggedRow {
        /// One-based line number of the offending row.
        line: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A cell used a symbol outside the level alphabet.
    #[error("unsupported symbol `{symbol}` at column {column}, row {row}")]
    UnsupportedSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based column of the cell.
        column: usize,
        /// Zero-based row of the cell.
        row: usize,
    },
    /// No `1` cell marks the start.
    #[error("level has no start tile")]
    MissingStart,
    /// More than one `1` cell is present.
    #[error("second start tile at column {column}, row {row}")]
    DuplicateStart {
        /// Zero-based column of the second start.
        column: usize,
        /// Zero-based row of the second start.
        row: usize,
    },
    /// No `X` cell marks the exit.
    #[error("level has no exit tile")]
    MissingExit,
    /// More than one `X` cell is present.
    #[error("second exit tile at column {column}, row {row}")]
    DuplicateExit {
        /// Zero-based column of the second exit.
        column: usize,
        /// Zero-based row of the second exit.
        row: usize,
    },
    /// Sprite binding failed.
    #[error("failed to bind level content")]
    Content(#[from] ContentError),
}

/// Entity variants a level symbol can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlacementKind {
    BreakableTile,
    Obstacle,
    Enemy,
}

/// Entity declared by a level symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) kind: PlacementKind,
    pub(crate) tile: TileIndex,
}

/// Parsed level ready to be populated with entities.
#[derive(Clone, Debug)]
pub(crate) struct LevelLayout {
    pub(crate) grid: Grid,
    pub(crate) start: Vec2,
    pub(crate) exit: IVec2,
    pub(crate) placements: Vec<Placement>,
}

pub(crate) fn parse(source: &str) -> Result<LevelLayout, LevelError> {
    let mut lines: Vec<&str> = source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        let _ = lines.pop();
    }

    let expected = lines.first().map_or(0, |line| line.chars().count());
    if expected == 0 {
        return Err(LevelError::Empty);
    }

    let mut grid = Grid::new(expected as u32, lines.len() as u32);
    let mut start = None;
    let mut exit = None;
    let mut placements = Vec::new();

    for (row, line) in lines.iter().enumerate() {
        let found = line.chars().count();
        if found != expected {
            return Err(LevelError::RaggedRow {
                line: row + 1,
                expected,
                found,
            });
        }

        for (column, symbol) in line.chars().enumerate() {
            let tile = TileIndex::new(column as i32, row as i32);
            match symbol {
                '.' => {}
                '-' => grid.set(tile, TileCell::new(TileCollision::Impassable, None)),
                '~' => grid.set(tile, TileCell::new(TileCollision::Platform, None)),
                '#' => {
                    grid.set(tile, TileCell::new(TileCollision::Impassable, None));
                    placements.push(Placement {
                        kind: PlacementKind::BreakableTile,
                        tile,
                    });
                }
                'Y' => placements.push(Placement {
                    kind: PlacementKind::Obstacle,
                    tile,
                }),
                'E' => placements.push(Placement {
                    kind: PlacementKind::Enemy,
                    tile,
                }),
                '1' => {
                    if start.is_some() {
                        return Err(LevelError::DuplicateStart { column, row });
                    }
                    start = Some(tile.bounds().bottom_center());
                }
                'X' => {
                    if exit.is_some() {
                        return Err(LevelError::DuplicateExit { column, row });
                    }
                    exit = Some(tile.bounds().center());
                }
                symbol => {
                    return Err(LevelError::UnsupportedSymbol {
                        symbol,
                        column,
                        row,
                    })
                }
            }
        }
    }

    let start = start.ok_or(LevelError::MissingStart)?;
    let exit = exit.ok_or(LevelError::MissingExit)?;

    Ok(LevelLayout {
        grid,
        start,
        exit,
        placements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_by_five_level_resolves_start_and_exit() {
        let layout = parse("1...X\n.....\n-----\n").expect("level parses");
        assert_eq!(layout.grid.columns(), 5);
        assert_eq!(layout.grid.rows(), 3);
        assert_eq!(layout.start, Vec2::new(20.0, 32.0));
        assert_eq!(layout.exit, IVec2::new(180, 16));
        assert_eq!(
            layout.grid.collision(TileIndex::new(3, 2)),
            TileCollision::Impassable
        );
        assert_eq!(
            layout.grid.collision(TileIndex::new(4, 0)),
            TileCollision::Passable
        );
        assert!(layout.placements.is_empty());
    }

    #[test]
    fn carriage_returns_and_trailing_blank_lines_are_ignored() {
        let layout = parse("1.X\r\n~#-\r\n\r\n").expect("level parses");
        assert_eq!(layout.grid.rows(), 2);
        assert_eq!(
            layout.grid.collision(TileIndex::new(0, 1)),
            TileCollision::Platform
        );
        assert_eq!(
            layout.placements,
            vec![Placement {
                kind: PlacementKind::BreakableTile,
                tile: TileIndex::new(1, 1),
            }]
        );
    }

    #[test]
    fn missing_and_duplicate_markers_are_fatal() {
        assert_eq!(parse("....X\n-----").unwrap_err(), LevelError::MissingStart);
        assert_eq!(parse("1....\n-----").unwrap_err(), LevelError::MissingExit);
        assert_eq!(
            parse("1.X.X\n-----").unwrap_err(),
            LevelError::DuplicateExit { column: 4, row: 0 }
        );
        assert_eq!(
            parse("1.1.X\n-----").unwrap_err(),
            LevelError::DuplicateStart { column: 2, row: 0 }
        );
    }

    #[test]
    fn ragged_rows_are_fatal() {
        assert_eq!(
            parse("1..X\n---").unwrap_err(),
            LevelError::RaggedRow {
                line: 2,
                expected: 4,
                found: 3,
            }
        );
    }

    #[test]
    fn unknown_symbols_are_fatal() {
        assert_eq!(
            parse("1.?X").unwrap_err(),
            LevelError::UnsupportedSymbol {
                symbol: '?',
                column: 2,
                row: 0,
            }
        );
        assert_eq!(parse("\n\n").unwrap_err(), LevelError::Empty);
    }

    #[test]
    fn props_and_enemies_become_placements() {
        let layout = parse("1YE.X\n-----").expect("level parses");
        let kinds: Vec<PlacementKind> = layout.placements.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PlacementKind::Obstacle, PlacementKind::Enemy]);
        assert_eq!(
            layout.grid.collision(TileIndex::new(1, 0)),
            TileCollision::Passable
        );
    }
}
