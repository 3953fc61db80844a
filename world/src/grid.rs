//! Fixed-size tile grid populated once at level load.

use tilebreaker_core::{EntityId, Rect, TileCollision, TileIndex, TILE_HEIGHT, TILE_WIDTH};
use tilebreaker_system_collision::{TileMap, TileProbe};

/// Single cell of the level grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileCell {
    collision: TileCollision,
    occupant: Option<EntityId>,
}

impl TileCell {
    /// Cell that never interacts with moving entities.
    pub const EMPTY: TileCell = TileCell::new(TileCollision::Passable, None);

    pub(crate) const fn new(collision: TileCollision, occupant: Option<EntityId>) -> Self {
        Self {
            collision,
            occupant,
        }
    }

    /// Collision behaviour of the cell.
    #[must_use]
    pub const fn collision(&self) -> TileCollision {
        self.collision
    }

    /// Destructible entity that owns the cell, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<EntityId> {
        self.occupant
    }
}

/// Dense row-major grid of level cells.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<TileCell>,
}

impl Grid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![TileCell::EMPTY; capacity],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of the level in world units.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.columns as i32 * TILE_WIDTH
    }

    /// World-space y coordinate of the level's lower boundary.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.rows as i32 * TILE_HEIGHT
    }

    /// World-space rectangle of a cell.
    #[must_use]
    pub const fn bounds(tile: TileIndex) -> Rect {
        tile.bounds()
    }

    /// Collision behaviour at `tile`.
    ///
    /// Columns outside the grid are impassable so nothing leaves the level
    /// sideways. Rows above or below the grid are passable.
    #[must_use]
    pub fn collision(&self, tile: TileIndex) -> TileCollision {
        self.probe(tile).collision
    }

    /// Cell stored at `tile`, if the coordinate lies inside the grid.
    #[must_use]
    pub fn cell(&self, tile: TileIndex) -> Option<TileCell> {
        self.index(tile)
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    /// Iterates every non-passable cell in row-major order.
    pub fn solid_cells(&self) -> impl Iterator<Item = (TileIndex, TileCell)> + '_ {
        let columns = self.columns.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.collision.is_passable())
            .map(move |(index, cell)| {
                let tile = TileIndex::new((index % columns) as i32, (index / columns) as i32);
                (tile, *cell)
            })
    }

    pub(crate) fn set(&mut self, tile: TileIndex, cell: TileCell) {
        if let Some(slot) = self.index(tile).and_then(|index| self.cells.get_mut(index)) {
            *slot = cell;
        }
    }

    /// Records `occupant` as the owner of an unowned cell.
    pub(crate) fn claim(&mut self, tile: TileIndex, occupant: EntityId) -> bool {
        match self.index(tile).and_then(|index| self.cells.get_mut(index)) {
            Some(slot) if slot.occupant.is_none() => {
                slot.occupant = Some(occupant);
                true
            }
            _ => false,
        }
    }

    /// Clears the cell, returning its previous contents.
    pub(crate) fn remove_tile_at(&mut self, tile: TileIndex) -> Option<TileCell> {
        let slot = self
            .index(tile)
            .and_then(|index| self.cells.get_mut(index))?;
        if *slot == TileCell::EMPTY {
            return None;
        }
        Some(std::mem::replace(slot, TileCell::EMPTY))
    }

    fn index(&self, tile: TileIndex) -> Option<usize> {
        let column = u32::try_from(tile.column()).ok()?;
        let row = u32::try_from(tile.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
    }
}

impl TileMap for Grid {
    fn probe(&self, tile: TileIndex) -> TileProbe {
        if tile.column() < 0 || tile.column() >= self.columns as i32 {
            return TileProbe {
                collision: TileCollision::Impassable,
                occupant: None,
            };
        }

        let cell = self.cell(tile).unwrap_or(TileCell::EMPTY);
        TileProbe {
            collision: cell.collision,
            occupant: cell.occupant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_cells_follow_edge_policy() {
        let grid = Grid::new(5, 3);
        assert_eq!(grid.collision(TileIndex::new(-1, 1)), TileCollision::Impassable);
        assert_eq!(grid.collision(TileIndex::new(5, 1)), TileCollision::Impassable);
        assert_eq!(grid.collision(TileIndex::new(2, -1)), TileCollision::Passable);
        assert_eq!(grid.collision(TileIndex::new(2, 3)), TileCollision::Passable);
        assert_eq!(grid.collision(TileIndex::new(2, 1)), TileCollision::Passable);
    }

    #[test]
    fn bounds_map_cells_to_world_rectangles() {
        assert_eq!(Grid::bounds(TileIndex::new(0, 0)), Rect::new(0, 0, 40, 32));
        assert_eq!(Grid::bounds(TileIndex::new(4, 2)), Rect::new(160, 64, 40, 32));
    }

    #[test]
    fn claim_refuses_second_occupant() {
        let mut grid = Grid::new(2, 2);
        let tile = TileIndex::new(1, 1);
        grid.set(tile, TileCell::new(TileCollision::Impassable, None));
        assert!(grid.claim(tile, EntityId::new(1)));
        assert!(!grid.claim(tile, EntityId::new(2)));
        assert_eq!(
            grid.probe(tile),
            TileProbe {
                collision: TileCollision::Impassable,
                occupant: Some(EntityId::new(1)),
            }
        );
    }

    #[test]
    fn remove_tile_at_clears_cell_once() {
        let mut grid = Grid::new(2, 2);
        let tile = TileIndex::new(0, 1);
        grid.set(tile, TileCell::new(TileCollision::Impassable, None));
        assert!(grid.remove_tile_at(tile).is_some());
        assert_eq!(grid.collision(tile), TileCollision::Passable);
        assert!(grid.remove_tile_at(tile).is_none());
        assert!(grid.remove_tile_at(TileIndex::new(9, 9)).is_none());
        assert_eq!(grid.solid_cells().count(), 0);
    }
}
