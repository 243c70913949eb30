//! Level layouts
//!
//! Ten hand-tuned levels (the tenth is the boss) plus a generic fallback.
//! Each level picks, per grid cell, whether there is a brick and which kind,
//! then paints it from a small glyph/color palette that cycles along the
//! diagonals. Some patterns are random; the random source is injected so
//! tests can pin layouts down.

use glam::Vec2;
use rand::{Rng, RngCore};

use super::state::{Brick, BrickKind};
use crate::consts::*;

/// Glyph and color used for every unbreakable brick
pub const WALL_GLYPH: &str = "🧱";
pub const WALL_COLOR: u32 = 0x374151;

/// Per-cell brick rule: row, column, random source
type Pattern = fn(u32, u32, &mut dyn RngCore) -> Option<BrickKind>;

/// Static description of one level
pub struct LevelDesign {
    pub rows: u32,
    pub glyphs: &'static [&'static str],
    pub colors: &'static [u32],
    pattern: Pattern,
}

fn all_normal(_r: u32, _c: u32, _rng: &mut dyn RngCore) -> Option<BrickKind> {
    Some(BrickKind::Normal)
}

fn checkerboard(r: u32, c: u32, _rng: &mut dyn RngCore) -> Option<BrickKind> {
    ((r + c) % 2 == 0).then_some(BrickKind::Normal)
}

fn sewers(_r: u32, _c: u32, rng: &mut dyn RngCore) -> Option<BrickKind> {
    (rng.random::<f32>() > 0.3).then_some(BrickKind::Normal)
}

fn robo_columns(r: u32, c: u32, _rng: &mut dyn RngCore) -> Option<BrickKind> {
    if c % 2 == 0 && r % 2 != 0 {
        Some(BrickKind::Hard)
    } else {
        Some(BrickKind::Normal)
    }
}

fn even_rows(r: u32, _c: u32, _rng: &mut dyn RngCore) -> Option<BrickKind> {
    (r % 2 == 0).then_some(BrickKind::Normal)
}

fn swarm(_r: u32, _c: u32, rng: &mut dyn RngCore) -> Option<BrickKind> {
    (rng.random::<f32>() > 0.2).then_some(BrickKind::Normal)
}

fn hardened(_r: u32, _c: u32, rng: &mut dyn RngCore) -> Option<BrickKind> {
    if rng.random::<f32>() > 0.6 {
        Some(BrickKind::Hard)
    } else {
        Some(BrickKind::Normal)
    }
}

fn fortress(_r: u32, c: u32, _rng: &mut dyn RngCore) -> Option<BrickKind> {
    if c == 3 || c == 5 {
        Some(BrickKind::Unbreakable)
    } else {
        Some(BrickKind::Normal)
    }
}

fn chaos(_r: u32, _c: u32, rng: &mut dyn RngCore) -> Option<BrickKind> {
    if rng.random::<f32>() > 0.8 {
        Some(BrickKind::Hard)
    } else {
        Some(BrickKind::Normal)
    }
}

fn alpha_wolf(r: u32, _c: u32, _rng: &mut dyn RngCore) -> Option<BrickKind> {
    if r == 0 {
        Some(BrickKind::Hard)
    } else {
        Some(BrickKind::Normal)
    }
}

/// Look up the design for a level; anything past the tuned set gets the fallback
pub fn design(level: u32) -> LevelDesign {
    match level {
        // Invasion
        1 => LevelDesign { rows: 4, glyphs: &["🐺"], colors: &[0x94a3b8], pattern: all_normal },
        // Wolf clones
        2 => LevelDesign {
            rows: 5,
            glyphs: &["🐺", "🐕"],
            colors: &[0xcbd5e1, 0x64748b],
            pattern: checkerboard,
        },
        3 => LevelDesign {
            rows: 5,
            glyphs: &["🐺", "🐀"],
            colors: &[0x475569, 0x1e293b],
            pattern: sewers,
        },
        4 => LevelDesign { rows: 6, glyphs: &["🤖"], colors: &[0x9ca3af], pattern: robo_columns },
        // Flying wolves
        5 => LevelDesign { rows: 6, glyphs: &["🦅"], colors: &[0x60a5fa], pattern: even_rows },
        6 => LevelDesign { rows: 8, glyphs: &["🐺"], colors: &[0xef4444], pattern: swarm },
        7 => LevelDesign {
            rows: 6,
            glyphs: &["🐺", "🤖"],
            colors: &[0xfbbf24, 0xf472b6],
            pattern: hardened,
        },
        8 => LevelDesign {
            rows: 7,
            glyphs: &["🧱", "🐺"],
            colors: &[0x4b5563, 0xa78bfa],
            pattern: fortress,
        },
        9 => LevelDesign {
            rows: 8,
            glyphs: &["🐺", "🤖", "🐀", "🦅"],
            colors: &[0xfbbf24, 0xf472b6, 0x34d399, 0x9ca3af],
            pattern: chaos,
        },
        // Boss
        10 => LevelDesign {
            rows: 9,
            glyphs: &["👑", "🐺"],
            colors: &[0xf59e0b, 0xfbbf24],
            pattern: alpha_wolf,
        },
        _ => LevelDesign { rows: 3, glyphs: &["🐺"], colors: &[0xf87171], pattern: all_normal },
    }
}

/// Brick width that fills the playfield with the fixed column count
pub fn brick_width() -> f32 {
    (PLAYFIELD_WIDTH - (BRICK_COLUMNS as f32 + 1.0) * BRICK_PADDING) / BRICK_COLUMNS as f32
}

/// Top-left corner of the brick at (row, col)
pub fn cell_origin(row: u32, col: u32) -> Vec2 {
    Vec2::new(
        BRICK_PADDING + col as f32 * (brick_width() + BRICK_PADDING),
        BRICK_PADDING + BRICK_TOP_OFFSET + row as f32 * (BRICK_HEIGHT + BRICK_PADDING),
    )
}

/// Build the brick field for a level.
///
/// Brick IDs are the cell index (`row * columns + col`), unique within a layout.
pub fn generate<R: RngCore>(level: u32, rng: &mut R) -> Vec<Brick> {
    let design = design(level);
    let size = Vec2::new(brick_width(), BRICK_HEIGHT);
    let mut bricks = Vec::new();

    for r in 0..design.rows {
        for c in 0..BRICK_COLUMNS {
            let Some(mut kind) = (design.pattern)(r, c, &mut *rng) else {
                continue;
            };
            // An indestructible bottom row could wall the ball off for good
            if kind == BrickKind::Unbreakable && r == design.rows - 1 {
                kind = BrickKind::Hard;
            }

            let idx = ((r + c) as usize) % design.glyphs.len();
            let mut brick = Brick::new(r * BRICK_COLUMNS + c, cell_origin(r, c), size, kind);
            if kind == BrickKind::Unbreakable {
                brick.glyph = WALL_GLYPH;
                brick.color = WALL_COLOR;
            } else {
                brick.glyph = design.glyphs[idx];
                brick.color = design.colors[idx % design.colors.len()];
            }
            bricks.push(brick);
        }
    }

    bricks
}
