//! Collision detection and response for axis-aligned boxes
//!
//! Every collider in the playfield (paddle, bricks, power-ups, and the ball's
//! bounding box) is an axis-aligned rectangle, so all tests are AABB overlaps.
//! The interesting parts are picking which axis to reflect on after a brick
//! hit, and turning a paddle contact point into an outgoing angle.

use glam::Vec2;

use crate::consts::MAX_BOUNCE_ANGLE;

/// Axis-aligned rectangle given by its min (top-left) and max corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Bounding box of a circle
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    /// Strict overlap test (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Which velocity component a brick hit should flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectAxis {
    /// Side hit: flip dx
    Horizontal,
    /// Top/bottom hit: flip dy
    Vertical,
}

/// Pick the reflection axis from the shallowest of the four penetrations.
///
/// Each depth measures how far the ball box reaches past one face of the
/// brick. Ties between a horizontal and a vertical face resolve horizontally.
pub fn reflect_axis(ball: &Aabb, brick: &Aabb) -> ReflectAxis {
    let from_left = ball.max.x - brick.min.x;
    let from_right = brick.max.x - ball.min.x;
    let from_top = ball.max.y - brick.min.y;
    let from_bottom = brick.max.y - ball.min.y;

    let min_overlap = from_left.min(from_right).min(from_top).min(from_bottom);
    if min_overlap == from_left || min_overlap == from_right {
        ReflectAxis::Horizontal
    } else {
        ReflectAxis::Vertical
    }
}

/// Apply a reflection to a velocity
#[inline]
pub fn reflect(vel: Vec2, axis: ReflectAxis) -> Vec2 {
    match axis {
        ReflectAxis::Horizontal => Vec2::new(-vel.x, vel.y),
        ReflectAxis::Vertical => Vec2::new(vel.x, -vel.y),
    }
}

/// Contact point relative to paddle center, normalized to [-1, 1]
pub fn contact_offset(contact_x: f32, paddle_center_x: f32, paddle_width: f32) -> f32 {
    let half = paddle_width / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    ((contact_x - paddle_center_x) / half).clamp(-1.0, 1.0)
}

/// Outgoing velocity after a paddle hit.
///
/// The normalized offset maps linearly onto ±60° from vertical. Speed grows
/// by the paddle boost, capped at `max_speed`; the result always points up.
pub fn paddle_bounce(vel: Vec2, offset: f32, boost: f32, max_speed: f32) -> Vec2 {
    let angle = offset.clamp(-1.0, 1.0) * MAX_BOUNCE_ANGLE;
    let speed = (vel.length() * boost).min(max_speed);
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}
