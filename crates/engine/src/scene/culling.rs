//! Viewport culling. Tile culling is memoized on a bit-exact key of the
//! camera transform and grid shape, since the visible rectangle only changes
//! when one of those does; actor culling is a cheap per-frame filter.

use crate::scene::{ActorId, SceneState};

/// Tiles beyond the viewport edge kept visible on each side, so sprites
/// overhanging their tile never pop at the border.
pub const TILE_CULL_PADDING: i32 = 2;

/// World-pixel margin around the viewport inside which actors still draw.
pub const ACTOR_CULL_PADDING_PX: f32 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CullKey {
    camera: (u32, u32),
    zoom: u32,
    viewport: (u32, u32),
    tile_size: u32,
    cols: u32,
    rows: u32,
}

impl CullKey {
    fn of(state: &SceneState) -> Self {
        let grid = state.grid();
        Self {
            camera: (state.camera().x.to_bits(), state.camera().y.to_bits()),
            zoom: state.zoom().to_bits(),
            viewport: (state.viewport().x.to_bits(), state.viewport().y.to_bits()),
            tile_size: grid.tile_size.to_bits(),
            cols: grid.cols,
            rows: grid.rows,
        }
    }
}

#[derive(Debug, Default)]
pub struct TileCuller {
    key: Option<CullKey>,
    visible: Vec<usize>,
    recomputes: u64,
}

impl TileCuller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flat indices of the tiles intersecting the padded viewport, row-major.
    /// Cached until the camera, zoom, viewport, or grid changes.
    pub fn visible_tiles(&mut self, state: &SceneState) -> &[usize] {
        let key = CullKey::of(state);
        if self.key != Some(key) {
            self.recompute(state);
            self.key = Some(key);
            self.recomputes += 1;
        }
        &self.visible
    }

    /// Number of cache misses so far.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    fn recompute(&mut self, state: &SceneState) {
        self.visible.clear();

        let grid = state.grid();
        let ts = grid.tile_size;
        let camera = state.camera();
        let world_w = state.viewport().x / state.zoom();
        let world_h = state.viewport().y / state.zoom();

        let first_tx = (camera.x / ts).floor() as i32 - TILE_CULL_PADDING;
        let last_tx = ((camera.x + world_w) / ts).floor() as i32 + TILE_CULL_PADDING;
        let first_ty = (camera.y / ts).floor() as i32 - TILE_CULL_PADDING;
        let last_ty = ((camera.y + world_h) / ts).floor() as i32 + TILE_CULL_PADDING;

        let tx0 = first_tx.max(0);
        let tx1 = last_tx.min(grid.cols as i32 - 1);
        let ty0 = first_ty.max(0);
        let ty1 = last_ty.min(grid.rows as i32 - 1);
        if tx0 > tx1 || ty0 > ty1 {
            return;
        }

        for ty in ty0..=ty1 {
            for tx in tx0..=tx1 {
                self.visible
                    .push(ty as usize * grid.cols as usize + tx as usize);
            }
        }
    }
}

/// Actors whose world position lies within the viewport padded by
/// [`ACTOR_CULL_PADDING_PX`], in id order. Empty results are normal.
pub fn visible_actors(state: &SceneState) -> Vec<ActorId> {
    let camera = state.camera();
    let min_x = camera.x - ACTOR_CULL_PADDING_PX;
    let min_y = camera.y - ACTOR_CULL_PADDING_PX;
    let max_x = camera.x + state.viewport().x / state.zoom() + ACTOR_CULL_PADDING_PX;
    let max_y = camera.y + state.viewport().y / state.zoom() + ACTOR_CULL_PADDING_PX;

    state
        .actors()
        .filter(|actor| {
            let pos = actor.pos();
            pos.x >= min_x && pos.x <= max_x && pos.y >= min_y && pos.y <= max_y
        })
        .map(|actor| actor.id())
        .collect()
}
