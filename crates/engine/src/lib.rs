//! Simulation engine for 2D tile-based hangout scenes. Owns the grid model,
//! pathfinding and steering, the animation state machine, the scene state
//! store, culling, and sprite frame resolution. Rendering, input, and asset
//! loading belong to the host: this crate consumes commands and a monotonic
//! clock and emits draw data.

pub mod coord;
pub mod grid;
pub mod math;
pub mod scene;
pub mod sim;
pub mod sprite;

pub use grid::{is_walkable, validate_tiles, Grid, GridError, Tile, TileCoord, TileKind};
pub use math::{Direction, Rect, Vec2};
pub use scene::culling::{visible_actors, TileCuller};
pub use scene::scheduler::{
    CallbackId, FrameScheduler, FrameTick, IntervalTimer, EFFECT_TICK_INTERVAL,
};
pub use scene::{Actor, ActorDescriptor, ActorId, SceneAction, SceneSetup, SceneState};
pub use sim::anim::AnimationStateMachine;
pub use sim::movement::MovementController;
pub use sprite::{resolve_placement, AnimState, SpriteConfig, SpritePlacement};
