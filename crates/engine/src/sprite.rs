//! Sprite sheet configuration and the pure frame-placement resolver. No
//! texture data lives here; configs describe sheet geometry and frame lists,
//! and the resolver emits crop/destination rectangles for the host to draw.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::{Direction, Rect, Vec2};

/// Locomotion state driving animation selection.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AnimState {
    #[default]
    Idle,
    Walking,
    Running,
}

/// One animation: loop flag plus a frame list per facing. A facing with no
/// list falls back to the South list; an empty list resolves to frame 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationDef {
    #[serde(rename = "loop", default = "default_true")]
    pub looped: bool,
    #[serde(default)]
    pub frames: BTreeMap<Direction, Vec<u32>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteConfig {
    pub id: String,
    pub frame_w: f32,
    pub frame_h: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_base_fps")]
    pub base_fps: f32,
    /// Anchor in frame pixels, defaulting to the feet: bottom-centre.
    #[serde(default)]
    pub anchor: Option<Vec2>,
    #[serde(default = "default_sheet_dim")]
    pub sheet_cols: u32,
    #[serde(default = "default_sheet_dim")]
    pub sheet_rows: u32,
    #[serde(default)]
    pub animations: BTreeMap<AnimState, AnimationDef>,
}

fn default_scale() -> f32 {
    1.0
}

fn default_base_fps() -> f32 {
    10.0
}

fn default_sheet_dim() -> u32 {
    4
}

impl SpriteConfig {
    pub fn anchor(&self) -> Vec2 {
        self.anchor
            .unwrap_or(Vec2::new(self.frame_w / 2.0, self.frame_h))
    }

    /// Frame list for a (state, facing) pair, with South fallback for a
    /// missing facing. May be empty.
    pub fn frames_for(&self, state: AnimState, dir: Direction) -> &[u32] {
        let Some(def) = self.animations.get(&state) else {
            return &[];
        };
        def.frames
            .get(&dir)
            .or_else(|| def.frames.get(&Direction::S))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn looped(&self, state: AnimState) -> bool {
        self.animations.get(&state).map_or(true, |def| def.looped)
    }
}

/// Where to crop the sheet and where to draw the result, both in the
/// camera-independent world-scaled space; the host applies its own camera
/// translation on top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpritePlacement {
    pub dest: Rect,
    /// Negative crop offset in destination pixels: translate the sheet image
    /// by this inside the `dest`-sized clip window so the chosen frame shows.
    pub sheet_offset: Vec2,
    /// Full sheet draw size in destination pixels.
    pub sheet_size: Vec2,
}

/// Pure placement math for one frame: the facing picks the sheet row, the
/// frame index the column (wrapping past the sheet edge), the anchor pins the
/// destination so actors stand on their feet.
pub fn resolve_placement(
    pos: Vec2,
    dir: Direction,
    frame_index: usize,
    cfg: &SpriteConfig,
    zoom: f32,
) -> SpritePlacement {
    let col = (frame_index as u32) % cfg.sheet_cols.max(1);
    let row = dir.sheet_row() % cfg.sheet_rows.max(1);

    let anchor = cfg.anchor();
    // Crop offset and sheet dimensions scale with the destination, so the
    // frame stays aligned inside the clip window at any zoom.
    let factor = cfg.scale * zoom;

    SpritePlacement {
        dest: Rect {
            x: (pos.x - anchor.x * cfg.scale) * zoom,
            y: (pos.y - anchor.y * cfg.scale) * zoom,
            w: cfg.frame_w * factor,
            h: cfg.frame_h * factor,
        },
        sheet_offset: Vec2 {
            x: -(col as f32 * cfg.frame_w) * factor,
            y: -(row as f32 * cfg.frame_h) * factor,
        },
        sheet_size: Vec2 {
            x: cfg.frame_w * cfg.sheet_cols as f32 * factor,
            y: cfg.frame_h * cfg.sheet_rows as f32 * factor,
        },
    }
}
