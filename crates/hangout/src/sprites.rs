//! Built-in sprite sheet definitions. Sheets are 4x4: one row per facing in
//! N/E/S/W order, one column per animation frame.

use std::collections::{BTreeMap, HashMap};

use engine::sprite::AnimationDef;
use engine::{AnimState, Direction, SpriteConfig};

pub fn sprite_library() -> HashMap<String, SpriteConfig> {
    let mut library = HashMap::new();
    library.insert("hero_64".to_owned(), hero_64());
    library.insert("hero_32x48".to_owned(), hero_32x48());
    library
}

fn all_dirs(frames: &[u32]) -> BTreeMap<Direction, Vec<u32>> {
    [Direction::N, Direction::E, Direction::S, Direction::W]
        .into_iter()
        .map(|dir| (dir, frames.to_vec()))
        .collect()
}

pub fn hero_64() -> SpriteConfig {
    let mut animations = BTreeMap::new();
    animations.insert(
        AnimState::Idle,
        AnimationDef {
            looped: true,
            frames: all_dirs(&[0]),
        },
    );
    animations.insert(
        AnimState::Walking,
        AnimationDef {
            looped: true,
            frames: all_dirs(&[0, 1, 2, 3]),
        },
    );
    animations.insert(
        AnimState::Running,
        AnimationDef {
            looped: true,
            frames: all_dirs(&[0, 1, 2, 3]),
        },
    );
    SpriteConfig {
        id: "hero_64".to_owned(),
        frame_w: 64.0,
        frame_h: 64.0,
        scale: 1.0,
        base_fps: 10.0,
        anchor: None,
        sheet_cols: 4,
        sheet_rows: 4,
        animations,
    }
}

/// Smaller sheet with no dedicated running cycle; fast movement falls back to
/// the resolver's frame 0.
pub fn hero_32x48() -> SpriteConfig {
    let mut animations = BTreeMap::new();
    animations.insert(
        AnimState::Idle,
        AnimationDef {
            looped: true,
            frames: all_dirs(&[0, 1]),
        },
    );
    animations.insert(
        AnimState::Walking,
        AnimationDef {
            looped: true,
            frames: all_dirs(&[0, 1, 2, 3]),
        },
    );
    SpriteConfig {
        id: "hero_32x48".to_owned(),
        frame_w: 32.0,
        frame_h: 48.0,
        scale: 1.0,
        base_fps: 10.0,
        anchor: None,
        sheet_cols: 4,
        sheet_rows: 4,
        animations,
    }
}
