//! Animation state machine. Classifies locomotion from actual speed,
//! independently of the movement controller's flag, and owns per-actor frame
//! cursors keyed on a monotonic clock supplied by the host.

use std::collections::HashMap;
use std::time::Duration;

use crate::math::Direction;
use crate::scene::{Actor, ActorId};
use crate::sprite::{AnimState, SpriteConfig};

/// Speed below which an actor animates as Idle, px/s.
pub const IDLE_MAX_SPEED: f32 = 10.0;

/// Running kicks in at `frame_w * RUN_SPEED_FRAME_WIDTHS` px/s.
pub const RUN_SPEED_FRAME_WIDTHS: f32 = 4.0;

const IDLE_FPS_FACTOR: f32 = 0.5;
const WALK_FPS_FACTOR: f32 = 1.0;
const RUN_FPS_FACTOR: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct AnimCursor {
    slot: usize,
    last_advance: Duration,
    state: AnimState,
    dir: Direction,
}

#[derive(Debug, Default)]
pub struct AnimationStateMachine {
    cursors: HashMap<ActorId, AnimCursor>,
}

impl AnimationStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the actor's cursor to `now` and returns the sheet frame index
    /// to draw. The cursor resets to the first frame whenever the classified
    /// state or the facing changes, so a turn never starts mid-cycle.
    pub fn step(&mut self, now: Duration, actor: &Actor, cfg: &SpriteConfig) -> usize {
        let state = classify(actor.vel().length(), cfg.frame_w);
        let dir = actor.dir();

        let cursor = self
            .cursors
            .entry(actor.id())
            .or_insert(AnimCursor {
                slot: 0,
                last_advance: now,
                state,
                dir,
            });
        if cursor.state != state || cursor.dir != dir {
            cursor.slot = 0;
            cursor.last_advance = now;
            cursor.state = state;
            cursor.dir = dir;
        }

        let frames = cfg.frames_for(state, dir);
        if frames.is_empty() {
            return 0;
        }

        let fps = cfg.base_fps * fps_factor(state);
        if fps > 0.0 {
            let elapsed = now.saturating_sub(cursor.last_advance).as_secs_f32();
            if elapsed >= 1.0 / fps {
                if cfg.looped(state) {
                    cursor.slot = (cursor.slot + 1) % frames.len();
                } else {
                    cursor.slot = (cursor.slot + 1).min(frames.len() - 1);
                }
                cursor.last_advance = now;
            }
        }

        frames[cursor.slot.min(frames.len() - 1)] as usize
    }

    /// Drops an actor's cursor; safe to call for unknown actors.
    pub fn clear(&mut self, actor_id: ActorId) {
        self.cursors.remove(&actor_id);
    }

    pub fn clear_all(&mut self) {
        self.cursors.clear();
    }
}

fn classify(speed: f32, frame_w: f32) -> AnimState {
    if speed < IDLE_MAX_SPEED {
        AnimState::Idle
    } else if speed < frame_w * RUN_SPEED_FRAME_WIDTHS {
        AnimState::Walking
    } else {
        AnimState::Running
    }
}

fn fps_factor(state: AnimState) -> f32 {
    match state {
        AnimState::Idle => IDLE_FPS_FACTOR,
        AnimState::Walking => WALK_FPS_FACTOR,
        AnimState::Running => RUN_FPS_FACTOR,
    }
}
