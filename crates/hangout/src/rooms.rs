//! Built-in room layouts. Every room is an 85x85 grid of 24 px tiles whose
//! playable area sits in the top-left corner; everything outside it is wall.

use engine::{ActorDescriptor, Direction, Grid, SceneSetup, Tile, TileCoord, TileKind, Vec2};

pub const ROOM_COLS: u32 = 85;
pub const ROOM_ROWS: u32 = 85;
pub const ROOM_TILE_SIZE: f32 = 24.0;

pub const LOCAL_PLAYER_ID: u64 = 1;
const LOCAL_PLAYER_SPEED: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    Park,
    Cafe,
    Arcade,
}

/// Complete scene setup for a room, local player included.
pub fn room_setup(kind: RoomKind) -> SceneSetup {
    let grid = Grid {
        tile_size: ROOM_TILE_SIZE,
        cols: ROOM_COLS,
        rows: ROOM_ROWS,
    };
    let mut tiles = Vec::with_capacity(grid.cell_count());
    for y in 0..grid.rows as i32 {
        for x in 0..grid.cols as i32 {
            let (tile_kind, walkable, cost) = classify(kind, x, y);
            tiles.push(Tile {
                id: (y * grid.cols as i32 + x) as u32,
                tx: x,
                ty: y,
                kind: tile_kind,
                walkable,
                cost,
            });
        }
    }

    SceneSetup {
        grid,
        tiles,
        viewport: Vec2::new(320.0, 240.0),
        camera: Vec2::ZERO,
        zoom: 1.0,
        actors: default_actors(),
        local_player_id: Some(LOCAL_PLAYER_ID),
    }
}

pub fn default_actors() -> Vec<ActorDescriptor> {
    // (4, 4) is walkable in every room layout.
    vec![ActorDescriptor {
        id: LOCAL_PLAYER_ID,
        sprite_id: "hero_64".to_owned(),
        tile: TileCoord::new(4, 4),
        dir: Direction::S,
        speed_tiles_per_sec: LOCAL_PLAYER_SPEED,
    }]
}

const WALL: (TileKind, bool, f32) = (TileKind::Wall, false, 1.0);
const FLOOR: (TileKind, bool, f32) = (TileKind::Floor, true, 1.0);

fn classify(kind: RoomKind, x: i32, y: i32) -> (TileKind, bool, f32) {
    match kind {
        // Checkered grass over a 3..=26 by 3..=21 lawn.
        RoomKind::Park => {
            if x < 3 || x > 26 || y < 3 || y > 21 {
                WALL
            } else if (x + y) % 4 == 0 {
                (TileKind::Grass, true, 2.0)
            } else {
                FLOOR
            }
        }
        // Two table blocks and a counter inside 2..=27 by 2..=22.
        RoomKind::Cafe => {
            let table = (8..=12).contains(&y)
                && ((8..=12).contains(&x) || (18..=22).contains(&x));
            let counter = (14..=16).contains(&x) && (2..=4).contains(&y);
            if x < 2 || x > 27 || y < 2 || y > 22 || table || counter {
                WALL
            } else {
                FLOOR
            }
        }
        // A lattice of machines inside 2..=27 by 2..=22.
        RoomKind::Arcade => {
            let machine =
                x % 4 == 0 && y % 3 == 0 && x > 2 && x < 27 && y > 2 && y < 22;
            if x < 2 || x > 27 || y < 2 || y > 22 || machine {
                WALL
            } else {
                FLOOR
            }
        }
    }
}
