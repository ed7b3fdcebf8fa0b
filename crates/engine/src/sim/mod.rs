//! Per-frame simulation: pathfinding, steering, movement, animation.

pub mod anim;
pub mod movement;
pub mod path;
pub mod steering;
