//! Movement controller: owns per-actor paths and is the single writer of the
//! per-actor motion fields on the scene state. Pathfinding happens once per
//! command; per-frame work is steering plus integration.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::coord::tile_center_world;
use crate::grid::TileCoord;
use crate::math::{facing_with_hysteresis, Vec2, DEFAULT_FACING_HYSTERESIS_DEG};
use crate::scene::{ActorId, SceneState};
use crate::sim::path::{find_path, smooth_path};
use crate::sim::steering::{steer_towards, SteeringParams};
use crate::sprite::AnimState;

/// Per-frame delta cap. A stalled frame resumes with one bounded step instead
/// of tunneling actors through walls.
pub const MAX_FRAME_DT: f32 = 0.05;

/// Above this speed (px/s) an actor reports Walking; at or below, Idle. This
/// layer never reports Running, only the animation machine does.
pub const WALKING_MIN_SPEED: f32 = 5.0;

const MAX_ACCEL_TILES_PER_SEC2: f32 = 12.0;
const ARRIVE_RADIUS_TILES: f32 = 1.25;
const STOP_RADIUS_PX: f32 = 2.0;
const FRICTION_PER_SEC: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
struct MovementPath {
    waypoints: Vec<TileCoord>,
    current_index: usize,
}

#[derive(Debug, Default)]
pub struct MovementController {
    paths: BTreeMap<ActorId, MovementPath>,
}

impl MovementController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans a 4-directional path from the actor's settled tile to `target`
    /// and stores the smoothed waypoints, replacing any path in flight. When
    /// the target is unreachable or the actor is unknown, the command is
    /// dropped with a warning; an actor that was mid-path is brought to a
    /// stop, since nothing steers it once its entry is gone.
    pub fn issue(&mut self, state: &mut SceneState, actor_id: ActorId, target: TileCoord) {
        let Some(actor) = state.actor(actor_id) else {
            warn!(actor = actor_id.0, "move_for_unknown_actor");
            return;
        };
        let start = actor.tile();

        let raw = find_path(state.grid(), state.tiles(), start, target, false);
        if raw.is_empty() {
            warn!(
                actor = actor_id.0,
                tx = target.x,
                ty = target.y,
                "no_path_to_target"
            );
            self.halt(state, actor_id);
            return;
        }

        let mut waypoints = smooth_path(state.grid(), state.tiles(), &raw);
        // The first waypoint is the actor's own tile.
        if waypoints.first() == Some(&start) {
            waypoints.remove(0);
        }
        if waypoints.is_empty() {
            self.halt(state, actor_id);
            return;
        }

        debug!(
            actor = actor_id.0,
            waypoints = waypoints.len(),
            "path_issued"
        );
        self.paths.insert(
            actor_id,
            MovementPath {
                waypoints,
                current_index: 0,
            },
        );
    }

    /// Drops the actor's path without touching its velocity.
    pub fn cancel(&mut self, actor_id: ActorId) -> bool {
        self.paths.remove(&actor_id).is_some()
    }

    /// Drops a path in flight and settles its actor: zero velocity, Idle.
    fn halt(&mut self, state: &mut SceneState, actor_id: ActorId) {
        if self.paths.remove(&actor_id).is_some() {
            if let Some(actor) = state.actor_mut(actor_id) {
                actor.vel = Vec2::ZERO;
                actor.state = AnimState::Idle;
            }
        }
    }

    pub fn is_moving(&self, actor_id: ActorId) -> bool {
        self.paths.contains_key(&actor_id)
    }

    /// Remaining waypoints, current target first.
    pub fn path_of(&self, actor_id: ActorId) -> Option<&[TileCoord]> {
        self.paths
            .get(&actor_id)
            .map(|path| &path.waypoints[path.current_index..])
    }

    /// Advances every pathing actor by one frame: steer toward the current
    /// waypoint's pixel centre, integrate, classify facing and locomotion.
    /// Arrival at a waypoint snaps position and tile exactly to its centre;
    /// arrival at the last one clears the path and forces Idle.
    pub fn update(&mut self, state: &mut SceneState, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        if dt <= 0.0 {
            return;
        }

        let grid = *state.grid();
        let actor_ids: Vec<ActorId> = self.paths.keys().copied().collect();
        for actor_id in actor_ids {
            let Some(actor) = state.actor_mut(actor_id) else {
                // Actor left the scene mid-path.
                self.paths.remove(&actor_id);
                continue;
            };
            let Some(path) = self.paths.get_mut(&actor_id) else {
                continue;
            };

            let waypoint = path.waypoints[path.current_index];
            let target = tile_center_world(&grid, waypoint);
            let params = SteeringParams {
                max_speed: grid.tile_size * actor.speed_tiles_per_sec(),
                max_accel: grid.tile_size * MAX_ACCEL_TILES_PER_SEC2,
                arrive_radius: grid.tile_size * ARRIVE_RADIUS_TILES,
                stop_radius: STOP_RADIUS_PX,
                friction: FRICTION_PER_SEC,
            };

            let result = steer_towards(actor.pos, actor.vel, target, dt, &params);
            if result.arrived {
                actor.pos = target;
                actor.tile = waypoint;
                actor.vel = Vec2::ZERO;
                path.current_index += 1;
                if path.current_index >= path.waypoints.len() {
                    self.paths.remove(&actor_id);
                    actor.state = AnimState::Idle;
                    debug!(actor = actor_id.0, "path_completed");
                    continue;
                }
            } else {
                actor.vel = result.vel;
                actor.pos += actor.vel * dt;
            }

            actor.dir =
                facing_with_hysteresis(actor.vel, actor.dir, DEFAULT_FACING_HYSTERESIS_DEG);
            actor.state = if actor.vel.length() > WALKING_MIN_SPEED {
                AnimState::Walking
            } else {
                AnimState::Idle
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::test_fixtures::{block, open_grid};
    use crate::math::Direction;
    use crate::scene::{ActorDescriptor, SceneAction, SceneSetup};

    fn scene(
        cols: u32,
        rows: u32,
        blocked: &[TileCoord],
        actors: &[(u64, TileCoord, f32)],
    ) -> SceneState {
        let (grid, mut tiles) = open_grid(cols, rows);
        for tile in blocked {
            block(&grid, &mut tiles, *tile);
        }
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
            local_player_id: None,
        }));
        state
    }

    fn run_until_settled(
        controller: &mut MovementController,
        state: &mut SceneState,
        actor: ActorId,
        max_frames: usize,
    ) {
        let dt = 1.0 / 60.0;
        for _ in 0..max_frames {
            controller.update(state, dt);
            if !controller.is_moving(actor) {
                return;
            }
        }
        panic!("actor {} still moving after {max_frames} frames", actor.0);
    }

    #[test]
    fn actor_lands_exactly_on_the_target_pixel_centre() {
        let mut state = scene(8, 8, &[], &[(1, TileCoord::new(1, 1), 8.0)]);
        let mut controller = MovementController::new();
        let goal = TileCoord::new(6, 5);

        controller.issue(&mut state, ActorId(1), goal);
        assert!(controller.is_moving(ActorId(1)));
        run_until_settled(&mut controller, &mut state, ActorId(1), 3000);

        let actor = state.actor(ActorId(1)).expect("actor");
        assert_eq!(actor.pos(), tile_center_world(state.grid(), goal));
        assert_eq!(actor.tile(), goal);
        assert_eq!(actor.vel(), Vec2::ZERO);
        assert_eq!(actor.state(), AnimState::Idle);
    }

    #[test]
    fn waypoints_route_around_blocked_tiles() {
        let blocked = [
            TileCoord::new(2, 0),
            TileCoord::new(2, 1),
            TileCoord::new(2, 2),
        ];
        let mut state = scene(5, 4, &blocked, &[(1, TileCoord::new(0, 1), 8.0)]);
        let mut controller = MovementController::new();

        controller.issue(&mut state, ActorId(1), TileCoord::new(4, 1));
        let path = controller.path_of(ActorId(1)).expect("path exists");
        for waypoint in path {
            assert!(!blocked.contains(waypoint));
        }
        assert_eq!(path.last(), Some(&TileCoord::new(4, 1)));
    }

    #[test]
    fn unknown_actor_and_unreachable_target_leave_no_path() {
        let mut state = scene(
            5,
            5,
            &[
                TileCoord::new(2, 3),
                TileCoord::new(3, 2),
                TileCoord::new(4, 3),
                TileCoord::new(3, 4),
            ],
            &[(1, TileCoord::new(0, 0), 8.0)],
        );
        let mut controller = MovementController::new();

        controller.issue(&mut state, ActorId(99), TileCoord::new(1, 1));
        assert!(!controller.is_moving(ActorId(99)));

        controller.issue(&mut state, ActorId(1), TileCoord::new(3, 3));
        assert!(!controller.is_moving(ActorId(1)));
    }

    #[test]
    fn failed_command_discards_the_path_in_flight() {
        let mut state = scene(6, 6, &[], &[(1, TileCoord::new(0, 0), 8.0)]);
        let mut controller = MovementController::new();

        controller.issue(&mut state, ActorId(1), TileCoord::new(5, 5));
        controller.update(&mut state, 1.0 / 60.0);
        assert!(controller.is_moving(ActorId(1)));

        controller.issue(&mut state, ActorId(1), TileCoord::new(9, 9));
        assert!(!controller.is_moving(ActorId(1)));
    }

    #[test]
    fn failed_command_mid_path_stops_the_actor() {
        // Seal off (3,3); a walking actor redirected there must come to rest
        // instead of keeping its last velocity with nothing steering it.
        let sealed = [
            TileCoord::new(2, 3),
            TileCoord::new(3, 2),
            TileCoord::new(4, 3),
            TileCoord::new(3, 4),
        ];
        let mut state = scene(8, 8, &sealed, &[(1, TileCoord::new(0, 0), 8.0)]);
        let mut controller = MovementController::new();

        controller.issue(&mut state, ActorId(1), TileCoord::new(7, 0));
        for _ in 0..20 {
            controller.update(&mut state, 1.0 / 60.0);
        }
        let actor = state.actor(ActorId(1)).expect("actor");
        assert!(actor.vel().length() > WALKING_MIN_SPEED);
        assert_eq!(actor.state(), AnimState::Walking);

        controller.issue(&mut state, ActorId(1), TileCoord::new(3, 3));
        assert!(!controller.is_moving(ActorId(1)));
        for _ in 0..100 {
            controller.update(&mut state, 1.0 / 60.0);
        }
        let actor = state.actor(ActorId(1)).expect("actor");
        assert_eq!(actor.vel(), Vec2::ZERO);
        assert_eq!(actor.state(), AnimState::Idle);
    }

    #[test]
    fn oversized_frame_delta_is_clamped() {
        let mut state = scene(30, 3, &[], &[(1, TileCoord::new(0, 1), 8.0)]);
        let mut controller = MovementController::new();
        controller.issue(&mut state, ActorId(1), TileCoord::new(29, 1));

        let before = state.actor(ActorId(1)).expect("actor").pos();
        controller.update(&mut state, 10.0);
        let after = state.actor(ActorId(1)).expect("actor").pos();

        let max_speed = state.grid().tile_size * 8.0;
        assert!((after - before).length() <= max_speed * MAX_FRAME_DT + 0.001);
    }

    #[test]
    fn vanished_actor_has_its_path_discarded() {
        let mut state = scene(6, 6, &[], &[(1, TileCoord::new(0, 0), 8.0)]);
        let mut controller = MovementController::new();
        controller.issue(&mut state, ActorId(1), TileCoord::new(5, 5));

        state.remove_actor(ActorId(1));
        controller.update(&mut state, 1.0 / 60.0);
        assert!(!controller.is_moving(ActorId(1)));
    }

    #[test]
    fn cancel_drops_the_path_but_keeps_velocity() {
        let mut state = scene(10, 3, &[], &[(1, TileCoord::new(0, 1), 8.0)]);
        let mut controller = MovementController::new();
        controller.issue(&mut state, ActorId(1), TileCoord::new(9, 1));

        for _ in 0..20 {
            controller.update(&mut state, 1.0 / 60.0);
        }
        let vel = state.actor(ActorId(1)).expect("actor").vel();
        assert!(vel.length() > 0.0);

        assert!(controller.cancel(ActorId(1)));
        assert!(!controller.cancel(ActorId(1)));
        assert!(!controller.is_moving(ActorId(1)));
        assert_eq!(state.actor(ActorId(1)).expect("actor").vel(), vel);
    }

    #[test]
    fn movement_layer_never_reports_running() {
        // Even at a sprint-worthy 20 tiles/s this layer only distinguishes
        // Idle from Walking; Running is the animation machine's call.
        let mut state = scene(40, 3, &[], &[(1, TileCoord::new(0, 1), 20.0)]);
        let mut controller = MovementController::new();
        controller.issue(&mut state, ActorId(1), TileCoord::new(39, 1));

        for _ in 0..200 {
            controller.update(&mut state, 1.0 / 60.0);
            let actor = state.actor(ActorId(1)).expect("actor");
            assert_ne!(actor.state(), AnimState::Running);
        }
    }

    #[test]
    fn two_actors_advance_independently() {
        let mut state = scene(
            12,
            12,
            &[],
            &[(1, TileCoord::new(0, 0), 8.0), (2, TileCoord::new(11, 11), 8.0)],
        );
        let mut controller = MovementController::new();
        controller.issue(&mut state, ActorId(1), TileCoord::new(5, 0));
        controller.issue(&mut state, ActorId(2), TileCoord::new(11, 6));

        run_until_settled(&mut controller, &mut state, ActorId(1), 4000);
        run_until_settled(&mut controller, &mut state, ActorId(2), 4000);

        let grid = *state.grid();
        assert_eq!(
            state.actor(ActorId(1)).expect("actor 1").pos(),
            tile_center_world(&grid, TileCoord::new(5, 0))
        );
        assert_eq!(
            state.actor(ActorId(2)).expect("actor 2").pos(),
            tile_center_world(&grid, TileCoord::new(11, 6))
        );
    }
}
