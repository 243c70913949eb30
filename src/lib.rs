//! Super Pig vs Evil Wolves - a single-screen brick breaker
//!
//! Core modules:
//! - `sim`: Simulation core (level layouts, physics, collisions, entity state)
//! - `session`: Menu/level/life state machine driving the simulation
//! - `audio`: Audio notifier contract, level music and Web Audio backend
//! - `narrative`: Level intro text with static fallback
//! - `renderer`: Canvas 2D presentation (browser only)
//! - `settings`: User preferences

pub mod audio;
pub mod error;
pub mod narrative;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{NarrativeError, SettingsError};
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
///
/// Distances are playfield units, speeds are units per tick.
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_START_WIDTH: f32 = 120.0;
    pub const PADDLE_MIN_WIDTH: f32 = 60.0;
    pub const PADDLE_MAX_WIDTH: f32 = 300.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Distance from the bottom edge to the paddle's top surface
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
    pub const DEFAULT_PADDLE_SPEED: f32 = 9.0;
    pub const PADDLE_MAX_SPEED: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const TRAIL_LENGTH: usize = 15;
    /// Below this |dy| the ball is snapped to a vertical speed of 1
    pub const MIN_VERTICAL_SPEED: f32 = 0.2;
    /// Paddle bounce speed-up (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.02;
    /// Max paddle deflection (60 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Brick grid
    pub const BRICK_COLUMNS: u32 = 9;
    pub const BRICK_PADDING: f32 = 8.0;
    pub const BRICK_HEIGHT: f32 = 30.0;
    pub const BRICK_TOP_OFFSET: f32 = 80.0;
    pub const BOSS_LEVEL: u32 = 10;

    /// Power-ups
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_FALL_SPEED: f32 = 3.0;
    pub const POWER_UP_DROP_CHANCE: f32 = 0.15;
    pub const EXPAND_AMOUNT: f32 = 40.0;
    pub const SHRINK_AMOUNT: f32 = 30.0;
    pub const SPEED_UP_AMOUNT: f32 = 4.0;
    pub const MULTIBALL_SPREAD: f32 = 2.0;

    /// Particles
    pub const PARTICLE_BURST: usize = 12;
    pub const PARTICLE_DECAY: f32 = 0.05;
    pub const PARTICLE_SPREAD: f32 = 8.0;
    pub const MAX_PARTICLES: usize = 4096;

    /// Session
    pub const STARTING_LIVES: u32 = 3;
    /// Seconds spent in the dying sequence before game over
    pub const DYING_DURATION: f32 = 2.5;
}

/// Launch speed for a level (units per tick)
#[inline]
pub fn launch_speed(level: u32) -> f32 {
    if level <= 4 { 5.0 } else { 8.0 }
}

/// Speed cap applied on paddle bounces for a level
#[inline]
pub fn max_ball_speed(level: u32) -> f32 {
    if level <= 4 { 10.0 } else { 15.0 }
}
