//! The session wires the engine pieces into one host-facing surface: scene
//! state, movement, animation, culling, and the effect timer, driven by a
//! monotonic clock the host supplies.

use std::collections::HashMap;
use std::time::Duration;

use engine::coord::clamp_tile;
use engine::sprite::SpritePlacement;
use engine::{
    resolve_placement, validate_tiles, ActorId, AnimationStateMachine, GridError, IntervalTimer,
    MovementController, Rect, SceneAction, SceneSetup, SceneState, SpriteConfig, TileCoord,
    TileCuller, TileKind, Vec2, EFFECT_TICK_INTERVAL,
};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDraw {
    pub index: usize,
    pub kind: TileKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorDraw {
    pub actor: ActorId,
    pub placement: SpritePlacement,
}

/// Draw list for one frame, covering only the culled tile and actor sets.
/// Rectangles are zoom-scaled world space; the host applies the camera
/// translation when blitting.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub tiles: Vec<TileDraw>,
    pub actors: Vec<ActorDraw>,
}

pub struct HangoutSession {
    state: SceneState,
    movement: MovementController,
    anim: AnimationStateMachine,
    tile_culler: TileCuller,
    effect_timer: IntervalTimer,
    sprites: HashMap<String, SpriteConfig>,
}

impl HangoutSession {
    /// Validates the setup's tile array once, then initializes the scene.
    /// After this, per-frame paths index tiles without re-checking.
    pub fn new(
        setup: SceneSetup,
        sprites: HashMap<String, SpriteConfig>,
    ) -> Result<Self, GridError> {
        validate_tiles(&setup.grid, &setup.tiles)?;

        let mut state = SceneState::default();
        state.apply(SceneAction::Init(setup));
        info!(
            actors = state.actors().count(),
            sprites = sprites.len(),
            "session_started"
        );

        Ok(Self {
            state,
            movement: MovementController::new(),
            anim: AnimationStateMachine::new(),
            tile_culler: TileCuller::new(),
            effect_timer: IntervalTimer::new(EFFECT_TICK_INTERVAL),
            sprites,
        })
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn is_actor_moving(&self, actor: ActorId) -> bool {
        self.movement.is_moving(actor)
    }

    /// Default tap policy: walk the local player to the tapped tile, clamped
    /// into the grid. A scene without a local player ignores taps.
    pub fn tap_tile(&mut self, tile: TileCoord) {
        let Some(player) = self.state.local_player_id() else {
            warn!(tx = tile.x, ty = tile.y, "tap_without_local_player");
            return;
        };
        self.move_actor(player, tile);
    }

    pub fn move_actor(&mut self, actor: ActorId, tile: TileCoord) {
        let target = clamp_tile(self.state.grid(), tile);
        self.movement.issue(&mut self.state, actor, target);
    }

    /// Absolute camera position.
    pub fn pan_camera(&mut self, camera: Vec2) {
        self.state.apply(SceneAction::PanCamera(camera));
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.state.apply(SceneAction::SetZoom(zoom));
    }

    /// Removes an actor along with its path and animation cursor, so a
    /// departure can never leave orphaned simulation state behind.
    pub fn remove_actor(&mut self, actor: ActorId) -> bool {
        self.movement.cancel(actor);
        self.anim.clear(actor);
        let removed = self.state.remove_actor(actor).is_some();
        if removed {
            info!(actor = actor.0, "actor_removed");
        }
        removed
    }

    /// One simulation step: movement first, then the ambient effect tick when
    /// its cadence comes due.
    pub fn advance(&mut self, now: Duration, dt: f32) {
        self.movement.update(&mut self.state, dt);
        if self.effect_timer.fire_due(now) {
            self.state.apply(SceneAction::EffectTick);
        }
    }

    /// Builds the frame's draw list. Actors whose sprite id has no config are
    /// skipped with a warning rather than failing the frame.
    pub fn render_frame(&mut self, now: Duration) -> RenderFrame {
        let zoom = self.state.zoom();
        let grid = *self.state.grid();

        let tiles: Vec<TileDraw> = self
            .tile_culler
            .visible_tiles(&self.state)
            .iter()
            .map(|&index| {
                let tile = &self.state.tiles()[index];
                TileDraw {
                    index,
                    kind: tile.kind,
                    rect: Rect {
                        x: tile.tx as f32 * grid.tile_size * zoom,
                        y: tile.ty as f32 * grid.tile_size * zoom,
                        w: grid.tile_size * zoom,
                        h: grid.tile_size * zoom,
                    },
                }
            })
            .collect();

        let mut actors = Vec::new();
        for id in engine::visible_actors(&self.state) {
            let Some(actor) = self.state.actor(id) else {
                continue;
            };
            let Some(cfg) = self.sprites.get(actor.sprite_id()) else {
                warn!(actor = id.0, sprite = actor.sprite_id(), "sprite_missing");
                continue;
            };
            let frame = self.anim.step(now, actor, cfg);
            actors.push(ActorDraw {
                actor: id,
                placement: resolve_placement(actor.pos(), actor.dir(), frame, cfg, zoom),
            });
        }

        RenderFrame { tiles, actors }
    }
}
