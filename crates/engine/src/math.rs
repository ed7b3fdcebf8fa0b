use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// World-space position or velocity in continuous pixels. Tile-index
/// coordinates use [`crate::grid::TileCoord`]; the two spaces only convert
/// through the coordinate mapper in [`crate::coord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Zero-length vectors normalize to zero rather than NaN.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 {
            Vec2 {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Vec2::ZERO
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Axis-aligned screen rectangle emitted to the host's drawing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Four-way sprite facing. The discriminant order is the fixed sprite-sheet
/// row order: N=0, E=1, S=2, W=3.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    N,
    E,
    #[default]
    S,
    W,
}

impl Direction {
    pub fn sheet_row(self) -> u32 {
        match self {
            Self::N => 0,
            Self::E => 1,
            Self::S => 2,
            Self::W => 3,
        }
    }

    /// Centre angle of this facing's sector in degrees, y-down screen
    /// convention: E=0, S=90, W=180, N=-90.
    fn center_degrees(self) -> f32 {
        match self {
            Self::E => 0.0,
            Self::S => 90.0,
            Self::W => 180.0,
            Self::N => -90.0,
        }
    }
}

/// Below this speed the facing never changes, so a stopping actor does not
/// jitter through directions as its velocity collapses.
const FACING_MIN_SPEED: f32 = 0.1;
const SECTOR_HALF_WIDTH_DEG: f32 = 45.0;
pub const DEFAULT_FACING_HYSTERESIS_DEG: f32 = 15.0;

/// Maps a velocity to a 4-way facing with hysteresis: the previous facing is
/// kept while the velocity angle stays inside the previous sector widened by
/// `hysteresis_deg` on both edges. Only a sustained angle outside that zone
/// switches the facing, so near-diagonal motion does not flicker.
pub fn facing_with_hysteresis(vel: Vec2, prev: Direction, hysteresis_deg: f32) -> Direction {
    if vel.length() < FACING_MIN_SPEED {
        return prev;
    }

    let deg = vel.y.atan2(vel.x).to_degrees();
    let delta = wrap_degrees(deg - prev.center_degrees());
    if delta.abs() <= SECTOR_HALF_WIDTH_DEG + hysteresis_deg {
        return prev;
    }

    classify_sector(deg)
}

fn classify_sector(deg: f32) -> Direction {
    if (-45.0..45.0).contains(&deg) {
        Direction::E
    } else if (45.0..135.0).contains(&deg) {
        Direction::S
    } else if (-135.0..-45.0).contains(&deg) {
        Direction::N
    } else {
        Direction::W
    }
}

/// Wraps an angle difference into (-180, 180].
fn wrap_degrees(deg: f32) -> f32 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vel_at_degrees(deg: f32, speed: f32) -> Vec2 {
        let rad = deg.to_radians();
        Vec2 {
            x: rad.cos() * speed,
            y: rad.sin() * speed,
        }
    }

    #[test]
    fn zero_vector_normalizes_to_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vec2 { x: 3.0, y: -4.0 }.normalized();
        assert!((v.length() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn near_stationary_velocity_keeps_previous_facing() {
        let facing = facing_with_hysteresis(
            Vec2 { x: 0.01, y: -0.01 },
            Direction::W,
            DEFAULT_FACING_HYSTERESIS_DEG,
        );
        assert_eq!(facing, Direction::W);
    }

    #[test]
    fn cardinal_velocities_map_to_expected_facings() {
        let h = DEFAULT_FACING_HYSTERESIS_DEG;
        assert_eq!(
            facing_with_hysteresis(Vec2 { x: 10.0, y: 0.0 }, Direction::N, h),
            Direction::E
        );
        assert_eq!(
            facing_with_hysteresis(Vec2 { x: 0.0, y: 10.0 }, Direction::E, h),
            Direction::S
        );
        assert_eq!(
            facing_with_hysteresis(Vec2 { x: -10.0, y: 0.0 }, Direction::S, h),
            Direction::W
        );
        assert_eq!(
            facing_with_hysteresis(Vec2 { x: 0.0, y: -10.0 }, Direction::E, h),
            Direction::N
        );
    }

    #[test]
    fn sub_margin_oscillation_around_sector_boundary_never_flips_facing() {
        // The E/S boundary sits at 45 degrees; oscillating +/-10 degrees
        // around it stays inside the 15-degree hysteresis band.
        let mut facing = Direction::E;
        for step in 0..40 {
            let deg = if step % 2 == 0 { 35.0 } else { 55.0 };
            facing = facing_with_hysteresis(
                vel_at_degrees(deg, 50.0),
                facing,
                DEFAULT_FACING_HYSTERESIS_DEG,
            );
            assert_eq!(facing, Direction::E);
        }
    }

    #[test]
    fn sustained_angle_outside_widened_sector_changes_facing() {
        let facing = facing_with_hysteresis(
            vel_at_degrees(80.0, 50.0),
            Direction::E,
            DEFAULT_FACING_HYSTERESIS_DEG,
        );
        assert_eq!(facing, Direction::S);
    }

    #[test]
    fn west_sector_hysteresis_spans_the_angle_wraparound() {
        let facing = facing_with_hysteresis(
            vel_at_degrees(-170.0, 50.0),
            Direction::W,
            DEFAULT_FACING_HYSTERESIS_DEG,
        );
        assert_eq!(facing, Direction::W);
    }

    #[test]
    fn sheet_row_order_is_nesw() {
        assert_eq!(Direction::N.sheet_row(), 0);
        assert_eq!(Direction::E.sheet_row(), 1);
        assert_eq!(Direction::S.sheet_row(), 2);
        assert_eq!(Direction::W.sheet_row(), 3);
    }
}
