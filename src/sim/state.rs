//! Game state and core simulation types
//!
//! Everything the simulation mutates and the presentation layer reads lives here.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// Coarse session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Title screen
    #[default]
    Menu,
    /// Level intro is being prepared; simulation frozen
    LoadingLevel,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Last life lost, death particles still animating
    Dying,
    /// Run ended
    GameOver,
    /// Boss level cleared
    Victory,
}

impl GamePhase {
    /// Phases in which the simulation tick does any work
    pub fn is_simulated(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Dying)
    }
}

/// What a ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Wall,
    Paddle,
    Brick,
}

/// Discrete events emitted by the simulation and the session, in order.
///
/// Consumed afterwards by the audio notifier; nothing in the simulation
/// depends on them being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Hit(HitKind),
    PowerUpCollected(PowerUpKind),
    BallLaunched,
    LifeLost,
    GameOverTriggered,
    /// Background music should start looping
    MusicStart,
    /// Background music should stop
    MusicStop,
    /// Background music should match this level's intensity
    MusicIntensity(u32),
}

/// Colors of the main ball and the two multiball spawns
pub const BALL_COLOR: u32 = 0xf472b6;
pub const MULTIBALL_COLORS: [u32; 2] = [0xfca5a5, 0x93c5fd];

/// A ball entity
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Inactive balls have fallen out of play; they are kept but ignored
    pub active: bool,
    pub color: u32,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            active: true,
            color: BALL_COLOR,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    /// A docked ball has zero velocity and rides on the paddle
    #[inline]
    pub fn is_docked(&self) -> bool {
        self.vel == Vec2::ZERO
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Record current position to trail, evicting the oldest point
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    /// Stop the ball and sit it on top of the paddle
    pub fn dock(&mut self, paddle: &Paddle) {
        self.vel = Vec2::ZERO;
        self.trail.clear();
        self.follow(paddle);
    }

    /// Keep a docked ball centered above the paddle
    pub fn follow(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.pos.y - self.radius - 2.0);
    }
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal units moved per tick while a direction is held
    pub speed: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                PLAYFIELD_WIDTH / 2.0 - PADDLE_START_WIDTH / 2.0,
                PLAYFIELD_HEIGHT - PADDLE_BOTTOM_OFFSET,
            ),
            width: PADDLE_START_WIDTH,
            height: PADDLE_HEIGHT,
            speed: DEFAULT_PADDLE_SPEED,
        }
    }
}

impl Paddle {
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Shift horizontally, staying inside the playfield
    pub fn shift(&mut self, dx: f32) {
        self.pos.x = (self.pos.x + dx).clamp(0.0, (PLAYFIELD_WIDTH - self.width).max(0.0));
    }

    /// Resize, keeping the paddle inside the playfield
    pub fn set_width(&mut self, width: f32) {
        self.width = width.clamp(PADDLE_MIN_WIDTH, PADDLE_MAX_WIDTH);
        self.shift(0.0);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(DEFAULT_PADDLE_SPEED, PADDLE_MAX_SPEED);
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrickKind {
    #[default]
    Normal,
    Hard,
    /// Never destroyed, doesn't count for level clear
    Unbreakable,
}

impl BrickKind {
    pub fn initial_health(&self) -> u16 {
        match self {
            BrickKind::Normal => 1,
            BrickKind::Hard => 2,
            BrickKind::Unbreakable => 999,
        }
    }

    /// Points awarded when the brick is cleared
    pub fn value(&self) -> u64 {
        match self {
            BrickKind::Hard => 200,
            _ => 100,
        }
    }
}

/// A brick entity
#[derive(Debug, Clone)]
pub struct Brick {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BrickKind,
    pub health: u16,
    pub color: u32,
    pub glyph: &'static str,
    pub value: u64,
}

impl Brick {
    pub fn new(id: u32, pos: Vec2, size: Vec2, kind: BrickKind) -> Self {
        Self {
            id,
            pos,
            size,
            kind,
            health: kind.initial_health(),
            color: 0x94a3b8,
            glyph: "🐺",
            value: kind.value(),
        }
    }

    /// Still on the board (collidable and drawn)
    #[inline]
    pub fn is_live(&self) -> bool {
        self.health > 0 || self.kind == BrickKind::Unbreakable
    }

    /// Returns true if this brick must still be destroyed to clear the level
    #[inline]
    pub fn counts_for_clear(&self) -> bool {
        self.kind != BrickKind::Unbreakable && self.health > 0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Take one point of damage. Returns true if this cleared the brick.
    pub fn damage(&mut self) -> bool {
        if self.kind == BrickKind::Unbreakable || self.health == 0 {
            return false;
        }
        self.health -= 1;
        self.health == 0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Expand,
    Shrink,
    MultiBall,
    ExtraLife,
    SpeedUp,
}

impl PowerUpKind {
    /// Pick a type from a uniform roll in [0, 1)
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.20 {
            PowerUpKind::Expand
        } else if roll < 0.40 {
            PowerUpKind::Shrink
        } else if roll < 0.55 {
            PowerUpKind::ExtraLife
        } else if roll < 0.70 {
            PowerUpKind::SpeedUp
        } else {
            PowerUpKind::MultiBall
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PowerUpKind::Expand => "🧃",
            PowerUpKind::Shrink => "⚡",
            PowerUpKind::ExtraLife => "🌭",
            PowerUpKind::SpeedUp => "🚀",
            PowerUpKind::MultiBall => "🐷",
        }
    }
}

/// A falling power-up
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed per tick
    pub fall_speed: f32,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size: Vec2::splat(POWER_UP_SIZE),
            fall_speed: POWER_UP_FALL_SPEED,
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 1 -> 0
    pub color: u32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Current level (1-based)
    pub level: u32,
    pub lives: u32,
    pub score: u64,
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh state sitting at the menu
    pub fn new() -> Self {
        Self {
            level: 1,
            lives: STARTING_LIVES,
            score: 0,
            phase: GamePhase::Menu,
            paddle: Paddle::default(),
            balls: Vec::new(),
            bricks: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace all balls with a single ball docked to the paddle
    pub fn reset_ball(&mut self) {
        let id = self.next_entity_id();
        let mut ball = Ball::new(id);
        ball.dock(&self.paddle);
        self.balls.clear();
        self.balls.push(ball);
    }

    pub fn active_ball_count(&self) -> usize {
        self.balls.iter().filter(|b| b.active).count()
    }

    /// Breakable bricks with health left
    pub fn remaining_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.counts_for_clear()).count()
    }

    /// Emit a burst of particles flying out from a point
    pub fn spawn_particles<R: Rng + ?Sized>(&mut self, at: Vec2, color: u32, rng: &mut R) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..PARTICLE_BURST.min(room) {
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
                (rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
            );
            self.particles.push(Particle {
                pos: at,
                vel,
                life: 1.0,
                color,
            });
        }
    }
}
