//! Scene state store: the single owner of everything drawable. All mutation
//! funnels through [`SceneState::apply`] or through the crate's simulation
//! controllers, which are the only writers of the per-actor motion fields.

pub mod culling;
pub mod scheduler;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::coord::tile_center_world;
use crate::grid::{Grid, Tile, TileCoord, TileKind};
use crate::math::{Direction, Vec2};
use crate::sprite::AnimState;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ActorId(pub u64);

/// Host-supplied description of one actor at scene init. Positions are given
/// in tile coordinates; the store derives the world position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDescriptor {
    pub id: u64,
    pub sprite_id: String,
    pub tile: TileCoord,
    #[serde(default)]
    pub dir: Direction,
    pub speed_tiles_per_sec: f32,
}

/// Everything needed to (re)build a scene in one shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSetup {
    pub grid: Grid,
    pub tiles: Vec<Tile>,
    pub viewport: Vec2,
    #[serde(default)]
    pub camera: Vec2,
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    #[serde(default)]
    pub actors: Vec<ActorDescriptor>,
    #[serde(default)]
    pub local_player_id: Option<u64>,
}

fn default_zoom() -> f32 {
    1.0
}

/// A live actor. The motion fields are crate-private-writable: the movement
/// controller owns `pos`/`vel`/`tile`/`dir`/`state`, everyone else reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    id: ActorId,
    sprite_id: String,
    speed_tiles_per_sec: f32,
    pub(crate) tile: TileCoord,
    pub(crate) pos: Vec2,
    pub(crate) vel: Vec2,
    pub(crate) dir: Direction,
    pub(crate) state: AnimState,
}

impl Actor {
    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn sprite_id(&self) -> &str {
        &self.sprite_id
    }

    pub fn speed_tiles_per_sec(&self) -> f32 {
        self.speed_tiles_per_sec
    }

    /// Settled tile: updated only when a waypoint is reached, so an actor
    /// mid-glide still reports the last tile it snapped to.
    pub fn tile(&self) -> TileCoord {
        self.tile
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }

    pub fn state(&self) -> AnimState {
        self.state
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneAction {
    /// Replace the whole scene.
    Init(SceneSetup),
    /// Absolute camera position in world pixels.
    PanCamera(Vec2),
    /// Absolute zoom factor. Non-finite or non-positive values are dropped.
    SetZoom(f32),
    /// Advance the low-frequency ambient effect counter.
    EffectTick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    grid: Grid,
    tiles: Vec<Tile>,
    camera: Vec2,
    zoom: f32,
    viewport: Vec2,
    actors: BTreeMap<ActorId, Actor>,
    local_player_id: Option<ActorId>,
    effect_tick: u64,
}

impl Default for SceneState {
    /// Placeholder scene before the host dispatches `Init`: a single floor
    /// tile and a 320x240 viewport at zoom 1.
    fn default() -> Self {
        Self {
            grid: Grid {
                tile_size: 24.0,
                cols: 1,
                rows: 1,
            },
            tiles: vec![Tile {
                id: 0,
                tx: 0,
                ty: 0,
                kind: TileKind::Floor,
                walkable: true,
                cost: 1.0,
            }],
            camera: Vec2::ZERO,
            zoom: 1.0,
            viewport: Vec2::new(320.0, 240.0),
            actors: BTreeMap::new(),
            local_player_id: None,
            effect_tick: 0,
        }
    }
}

impl SceneState {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Actors in id order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub(crate) fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn local_player_id(&self) -> Option<ActorId> {
        self.local_player_id
    }

    pub fn effect_tick(&self) -> u64 {
        self.effect_tick
    }

    /// Reducer. Infallible: actions that cannot be honored degrade to no-ops
    /// so a bad input mid-frame never poisons the store. Setup validation
    /// happens before `Init` is ever dispatched (the session does it).
    pub fn apply(&mut self, action: SceneAction) {
        match action {
            SceneAction::Init(setup) => self.init(setup),
            SceneAction::PanCamera(camera) => self.camera = camera,
            SceneAction::SetZoom(zoom) => {
                if zoom.is_finite() && zoom > 0.0 {
                    self.zoom = zoom;
                } else {
                    warn!(zoom, "zoom_rejected");
                }
            }
            SceneAction::EffectTick => self.effect_tick += 1,
        }
    }

    fn init(&mut self, setup: SceneSetup) {
        self.grid = setup.grid;
        self.tiles = setup.tiles;
        self.camera = setup.camera;
        self.zoom = setup.zoom;
        self.viewport = setup.viewport;
        self.effect_tick = 0;

        self.actors.clear();
        for descriptor in setup.actors {
            let id = ActorId(descriptor.id);
            let pos = tile_center_world(&self.grid, descriptor.tile);
            self.actors.insert(
                id,
                Actor {
                    id,
                    sprite_id: descriptor.sprite_id,
                    speed_tiles_per_sec: descriptor.speed_tiles_per_sec,
                    tile: descriptor.tile,
                    pos,
                    vel: Vec2::ZERO,
                    dir: descriptor.dir,
                    state: AnimState::Idle,
                },
            );
        }
        self.local_player_id = setup.local_player_id.map(ActorId);

        info!(
            cols = self.grid.cols,
            rows = self.grid.rows,
            actors = self.actors.len(),
            "scene_initialized"
        );
    }

    /// Removes an actor, surrendering ownership to the caller. The caller is
    /// responsible for cancelling any in-flight path and animation cursor;
    /// the session wraps this so hosts cannot forget.
    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        let removed = self.actors.remove(&id);
        if removed.is_some() && self.local_player_id == Some(id) {
            self.local_player_id = None;
        }
        removed
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;
    use crate::grid::test_fixtures::open_grid;

    /// Scene over an open floor grid with one actor per entry in `actors`,
    /// each `(id, tile, tiles_per_sec)`.
    pub(crate) fn scene_with_actors(
        cols: u32,
        rows: u32,
        actors: &[(u64, TileCoord, f32)],
    ) -> SceneState {
        let (grid, tiles) = open_grid(cols, rows);
        let mut state = SceneState::default();
        state.apply(SceneAction::Init(SceneSetup {
            grid,
            tiles,
            viewport: Vec2::new(320.0, 240.0),
            camera: Vec2::ZERO,
            zoom: 1.0,
            actors: actors
                .iter()
                .map(|(id, tile, speed)| ActorDescriptor {
                    id: *id,
                    sprite_id: "hero".to_owned(),
                    tile: *tile,
                    dir: Direction::S,
                    speed_tiles_per_sec: *speed,
                })
                .collect(),
            local_player_id: actors.first().map(|(id, _, _)| *id),
        }));
        state
    }
}
