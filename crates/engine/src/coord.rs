//! Stateless conversions between tile-index and world-pixel coordinates.
//! Steering and rendering are anchored on tile pixel centres, so the forward
//! mapping returns the centre of a cell, not its corner.

use crate::grid::{Grid, TileCoord};
use crate::math::Vec2;

/// World position of the pixel centre of `tile`.
pub fn tile_center_world(grid: &Grid, tile: TileCoord) -> Vec2 {
    Vec2 {
        x: (tile.x as f32 + 0.5) * grid.tile_size,
        y: (tile.y as f32 + 0.5) * grid.tile_size,
    }
}

/// Tile containing a world position. The result may be out of grid bounds;
/// callers either bounds-check via [`Grid::index_of`] or clamp.
pub fn world_to_tile(grid: &Grid, world: Vec2) -> TileCoord {
    TileCoord {
        x: (world.x / grid.tile_size).floor() as i32,
        y: (world.y / grid.tile_size).floor() as i32,
    }
}

/// Clamps a tile coordinate into grid bounds.
pub fn clamp_tile(grid: &Grid, tile: TileCoord) -> TileCoord {
    TileCoord {
        x: tile.x.clamp(0, grid.cols as i32 - 1),
        y: tile.y.clamp(0, grid.rows as i32 - 1),
    }
}
