use crate::math::Vec2;

/// Tuning for the kinematic integrator. The movement controller derives
/// these from the grid scale and the actor's speed stat each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    /// Hard cap on speed, px/s.
    pub max_speed: f32,
    /// Hard cap on per-frame velocity change, px/s^2.
    pub max_accel: f32,
    /// Inside this distance the desired speed tapers linearly to zero.
    pub arrive_radius: f32,
    /// Inside this distance the actor stops dead and reports arrival.
    pub stop_radius: f32,
    /// Multiplicative decay per second applied after acceleration.
    pub friction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringResult {
    pub vel: Vec2,
    pub arrived: bool,
}

/// One step of seek-with-arrival. Returns the new velocity; integrating it
/// into a position is the caller's job. Inside `stop_radius` the velocity is
/// zeroed outright, which is what lets arrival snap to an exact pixel rather
/// than orbit the target forever.
pub fn steer_towards(
    pos: Vec2,
    vel: Vec2,
    target: Vec2,
    dt: f32,
    params: &SteeringParams,
) -> SteeringResult {
    let to_target = target - pos;
    let distance = to_target.length();

    if distance <= params.stop_radius {
        return SteeringResult {
            vel: Vec2::ZERO,
            arrived: true,
        };
    }

    let desired_speed = if distance < params.arrive_radius {
        params.max_speed * (distance / params.arrive_radius)
    } else {
        params.max_speed
    };
    let desired_vel = to_target.normalized() * desired_speed;

    let mut accel = desired_vel - vel;
    let accel_len = accel.length();
    let accel_cap = params.max_accel * dt;
    if accel_len > accel_cap && accel_len > 0.0 {
        accel = accel * (accel_cap / accel_len);
    }

    let mut next = vel + accel;
    next = next * (1.0 - params.friction * dt).max(0.0);

    let speed = next.length();
    if speed > params.max_speed {
        next = next * (params.max_speed / speed);
    }

    SteeringResult {
        vel: next,
        arrived: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SteeringParams {
        SteeringParams {
            max_speed: 192.0,
            max_accel: 288.0,
            arrive_radius: 30.0,
            stop_radius: 2.0,
            friction: 2.0,
        }
    }

    #[test]
    fn repeated_steps_converge_on_the_target() {
        let p = params();
        let target = Vec2::new(240.0, 120.0);
        let mut pos = Vec2::new(12.0, 12.0);
        let mut vel = Vec2::ZERO;
        let dt = 1.0 / 60.0;

        let mut arrived = false;
        for _ in 0..2000 {
            let result = steer_towards(pos, vel, target, dt, &p);
            if result.arrived {
                arrived = true;
                break;
            }
            vel = result.vel;
            pos += vel * dt;
        }

        assert!(arrived, "never reached stop radius, ended at {pos:?}");
        assert!((target - pos).length() <= p.stop_radius + p.max_speed * dt);
    }

    #[test]
    fn speed_never_exceeds_max_speed() {
        let p = params();
        let target = Vec2::new(1000.0, 0.0);
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::ZERO;
        let dt = 1.0 / 60.0;

        for _ in 0..300 {
            let result = steer_towards(pos, vel, target, dt, &p);
            if result.arrived {
                break;
            }
            vel = result.vel;
            pos += vel * dt;
            assert!(vel.length() <= p.max_speed + 0.001);
        }
    }

    #[test]
    fn inside_stop_radius_halts_immediately() {
        let p = params();
        let result = steer_towards(
            Vec2::new(100.0, 100.0),
            Vec2::new(50.0, -30.0),
            Vec2::new(101.0, 100.0),
            1.0 / 60.0,
            &p,
        );
        assert!(result.arrived);
        assert_eq!(result.vel, Vec2::ZERO);
    }

    #[test]
    fn desired_speed_tapers_inside_the_arrive_radius() {
        // Frictionless, one-second step: the accel cap is slack, so the
        // velocities land exactly on the desired speeds.
        let mut p = params();
        p.friction = 0.0;
        let far = steer_towards(Vec2::ZERO, Vec2::ZERO, Vec2::new(300.0, 0.0), 1.0, &p);
        let near = steer_towards(Vec2::ZERO, Vec2::ZERO, Vec2::new(15.0, 0.0), 1.0, &p);
        assert_eq!(far.vel.length(), p.max_speed);
        assert!((near.vel.length() - p.max_speed * 0.5).abs() < 0.001);
    }

    #[test]
    fn acceleration_is_clamped_per_frame() {
        let p = params();
        let dt = 1.0 / 60.0;
        let result = steer_towards(Vec2::ZERO, Vec2::ZERO, Vec2::new(500.0, 0.0), dt, &p);
        assert!(result.vel.length() <= p.max_accel * dt + 0.001);
    }

    #[test]
    fn friction_bleeds_off_sideways_velocity() {
        let p = params();
        let dt = 0.1;
        // Moving perpendicular to the target: the frame's decay must shrink
        // the off-axis component even as seek accelerates toward the target.
        let vel = Vec2::new(0.0, 100.0);
        let result = steer_towards(Vec2::ZERO, vel, Vec2::new(1000.0, 0.0), dt, &p);
        assert!(result.vel.y < vel.y * (1.0 - p.friction * dt) + 0.001);
    }

    #[test]
    fn huge_friction_never_reverses_velocity() {
        let mut p = params();
        p.friction = 100.0;
        let result = steer_towards(
            Vec2::ZERO,
            Vec2::new(50.0, 0.0),
            Vec2::new(1000.0, 0.0),
            1.0,
            &p,
        );
        // Decay factor floors at zero instead of going negative.
        assert!(result.vel.x >= 0.0);
    }
}
