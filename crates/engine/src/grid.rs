use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Static spatial schema for a scene. Immutable once constructed; every
/// tile-indexed entity lives in the coordinate space this defines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub tile_size: f32,
    pub cols: u32,
    pub rows: u32,
}

impl Grid {
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn in_bounds(&self, tile: TileCoord) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.cols && (tile.y as u32) < self.rows
    }

    /// Flat row-major index of a tile, `None` when out of bounds.
    pub fn index_of(&self, tile: TileCoord) -> Option<usize> {
        if !self.in_bounds(tile) {
            return None;
        }
        Some(tile.y as usize * self.cols as usize + tile.x as usize)
    }

    pub fn tile_at_index(&self, index: usize) -> TileCoord {
        TileCoord {
            x: (index % self.cols as usize) as i32,
            y: (index / self.cols as usize) as i32,
        }
    }
}

/// Tile-index coordinate. Signed so that clamping and line rasterization can
/// pass through intermediate out-of-bounds values without wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Floor,
    Wall,
    Water,
    Grass,
}

/// One grid cell. Static for the lifetime of a scene; `cost >= 1` is a
/// multiplier on the pathfinder's base step cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    pub tx: i32,
    pub ty: i32,
    pub kind: TileKind,
    pub walkable: bool,
    pub cost: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GridError {
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("tile id {id} at ({tx}, {ty}) is out of grid bounds")]
    TileOutOfBounds { id: u32, tx: i32, ty: i32 },
    #[error("tile id {id} at ({tx}, {ty}) does not match its flat index {index}")]
    TileIndexMismatch { id: u32, tx: i32, ty: i32, index: usize },
    #[error("tile id {id} has cost {cost}, minimum is 1")]
    TileCostBelowOne { id: u32, cost: f32 },
}

/// Checks the scene-setup invariants once, so the per-frame paths can index
/// `tiles[grid.index_of(..)]` without re-validating: one tile per cell, each
/// at the flat index its `(tx, ty)` implies, every cost at least 1.
pub fn validate_tiles(grid: &Grid, tiles: &[Tile]) -> Result<(), GridError> {
    let expected = grid.cell_count();
    if tiles.len() != expected {
        return Err(GridError::TileCountMismatch {
            expected,
            actual: tiles.len(),
        });
    }

    for (index, tile) in tiles.iter().enumerate() {
        let coord = TileCoord {
            x: tile.tx,
            y: tile.ty,
        };
        let Some(flat) = grid.index_of(coord) else {
            return Err(GridError::TileOutOfBounds {
                id: tile.id,
                tx: tile.tx,
                ty: tile.ty,
            });
        };
        if flat != index {
            return Err(GridError::TileIndexMismatch {
                id: tile.id,
                tx: tile.tx,
                ty: tile.ty,
                index,
            });
        }
        if tile.cost < 1.0 {
            return Err(GridError::TileCostBelowOne {
                id: tile.id,
                cost: tile.cost,
            });
        }
    }

    Ok(())
}

/// True when `tile` is in bounds and its cell is walkable.
pub fn is_walkable(grid: &Grid, tiles: &[Tile], tile: TileCoord) -> bool {
    grid.index_of(tile)
        .and_then(|index| tiles.get(index))
        .is_some_and(|tile| tile.walkable)
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;

    pub(crate) fn open_grid(cols: u32, rows: u32) -> (Grid, Vec<Tile>) {
        let grid = Grid {
            tile_size: 24.0,
            cols,
            rows,
        };
        let mut tiles = Vec::with_capacity(grid.cell_count());
        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                tiles.push(Tile {
                    id: (y * cols as i32 + x) as u32,
                    tx: x,
                    ty: y,
                    kind: TileKind::Floor,
                    walkable: true,
                    cost: 1.0,
                });
            }
        }
        (grid, tiles)
    }

    pub(crate) fn block(grid: &Grid, tiles: &mut [Tile], tile: TileCoord) {
        let index = grid.index_of(tile).expect("blocked tile in bounds");
        tiles[index].kind = TileKind::Wall;
        tiles[index].walkable = false;
    }
}
