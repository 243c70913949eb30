//! Simulation module
//!
//! All gameplay logic lives here. It stays free of rendering and platform code:
//! - Fixed per-tick units, no wall-clock time
//! - Randomness only through a caller-supplied RNG
//! - Stable iteration order (vector order, first match wins)

pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{Aabb, ReflectAxis, contact_offset, paddle_bounce, reflect, reflect_axis};
pub use level::{LevelDesign, design, generate};
pub use state::{
    BALL_COLOR, Ball, Brick, BrickKind, GameEvent, GamePhase, GameState, HitKind,
    MULTIBALL_COLORS, Paddle, Particle, PowerUp, PowerUpKind,
};
pub use tick::{TickInput, TickOutcome, TickReport, apply_power_up, launch, spawn_multiball, tick};
