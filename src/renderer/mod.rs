//! Canvas 2D rendering
//!
//! Reads the game state and paints one frame. Nothing here feeds back into
//! the simulation. If the page has no usable canvas the renderer is simply
//! never created and frames are skipped.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::settings::Settings;
use crate::sim::{Ball, Brick, BrickKind, GamePhase, GameState, Paddle, PowerUp};

const BACKGROUND: &str = "#f0f9ff";
const GRID_DOT: &str = "#e0f2fe";
const OUTLINE: &str = "#000";
const PIG_PINK: &str = "#ec4899";
const PIG_LIGHT: &str = "#fbcfe8";
const PIG_SNOUT: &str = "#f472b6";
const PARTICLE_RADIUS: f64 = 4.0;

/// `0xRRGGBB` to a CSS color string
pub fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0xff_ffff)
}

/// Canvas painter
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Attach to the canvas with the given element id
    pub fn new(canvas_id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.get_element_by_id(canvas_id)?.dyn_into().ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;

        canvas.set_width(PLAYFIELD_WIDTH as u32);
        canvas.set_height(PLAYFIELD_HEIGHT as u32);

        Some(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Paint the playfield
    pub fn render(&self, state: &GameState, settings: &Settings) {
        let ctx = &self.ctx;
        ctx.set_global_alpha(1.0);
        ctx.clear_rect(0.0, 0.0, PLAYFIELD_WIDTH as f64, PLAYFIELD_HEIGHT as f64);
        self.draw_background();

        ctx.set_font("24px Arial");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for brick in state.bricks.iter().filter(|b| b.is_live()) {
            self.draw_brick(brick);
        }

        if settings.effective_particles() {
            for p in &state.particles {
                ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
                ctx.set_fill_style_str(&css_color(p.color));
                self.fill_circle(p.pos.x as f64, p.pos.y as f64, PARTICLE_RADIUS);
            }
            ctx.set_global_alpha(1.0);
        }

        // The paddle has exploded
        if state.phase != GamePhase::Dying {
            self.draw_paddle(&state.paddle);
        }

        for ball in state.balls.iter().filter(|b| b.active) {
            if settings.effective_trails() {
                self.draw_trail(ball);
            }
            self.draw_ball(ball);
        }

        for power_up in &state.power_ups {
            self.draw_power_up(power_up);
        }
    }

    fn draw_background(&self) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, PLAYFIELD_WIDTH as f64, PLAYFIELD_HEIGHT as f64);

        ctx.set_fill_style_str(GRID_DOT);
        for i in (0..PLAYFIELD_WIDTH as u32).step_by(20) {
            for j in (0..PLAYFIELD_HEIGHT as u32).step_by(20) {
                if (i + j) % 40 == 0 {
                    ctx.fill_rect(i as f64, j as f64, 2.0, 2.0);
                }
            }
        }
    }

    fn fill_circle(&self, x: f64, y: f64, r: f64) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, r, 0.0, TAU);
        self.ctx.fill();
    }

    fn draw_brick(&self, brick: &Brick) {
        let ctx = &self.ctx;
        let (x, y) = (brick.pos.x as f64, brick.pos.y as f64);
        let (w, h) = (brick.size.x as f64, brick.size.y as f64);

        // Drop shadow
        ctx.set_fill_style_str("rgba(0,0,0,0.2)");
        ctx.fill_rect(x + 4.0, y + 4.0, w, h);

        ctx.set_fill_style_str(&css_color(brick.color));
        ctx.set_stroke_style_str(OUTLINE);
        ctx.set_line_width(2.0);
        ctx.fill_rect(x, y, w, h);
        ctx.stroke_rect(x, y, w, h);

        ctx.set_fill_style_str(OUTLINE);
        let _ = ctx.fill_text(brick.glyph, x + w / 2.0, y + h / 2.0 + 2.0);

        // Cracked hard brick
        if brick.kind == BrickKind::Hard && brick.health == 1 {
            ctx.set_stroke_style_str("#fff");
            ctx.begin_path();
            ctx.move_to(x + 5.0, y + 5.0);
            ctx.line_to(x + w - 5.0, y + h - 5.0);
            ctx.move_to(x + w - 5.0, y + 5.0);
            ctx.line_to(x + 5.0, y + h - 5.0);
            ctx.stroke();
        }
    }

    fn draw_paddle(&self, paddle: &Paddle) {
        let ctx = &self.ctx;
        let (x, y) = (paddle.pos.x as f64, paddle.pos.y as f64);
        let (w, h) = (paddle.width as f64, paddle.height as f64);

        ctx.set_fill_style_str(PIG_PINK);
        ctx.fill_rect(x, y, w, h);
        ctx.set_line_width(3.0);
        ctx.set_stroke_style_str(OUTLINE);
        ctx.stroke_rect(x, y, w, h);

        // Ears
        ctx.set_fill_style_str(PIG_LIGHT);
        self.fill_circle(x + 15.0, y + 5.0, 5.0);
        self.fill_circle(x + w - 15.0, y + 5.0, 5.0);

        // Snout
        ctx.set_fill_style_str(PIG_SNOUT);
        ctx.begin_path();
        let _ = ctx.ellipse(x + w / 2.0, y + h / 2.0, 10.0, 6.0, 0.0, 0.0, TAU);
        ctx.fill();
    }

    /// Fades in toward the head and shrinks toward the tail
    fn draw_trail(&self, ball: &Ball) {
        let ctx = &self.ctx;
        let len = ball.trail.len() as f64;
        ctx.set_fill_style_str(&css_color(ball.color));
        for (i, pos) in ball.trail.iter().enumerate() {
            let alpha = (i as f64 + 1.0) / len;
            ctx.set_global_alpha(alpha * 0.4);
            self.fill_circle(pos.x as f64, pos.y as f64, ball.radius as f64 * alpha * 0.8);
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_ball(&self, ball: &Ball) {
        let ctx = &self.ctx;
        let (x, y) = (ball.pos.x as f64, ball.pos.y as f64);

        ctx.set_fill_style_str(&css_color(ball.color));
        self.fill_circle(x, y, ball.radius as f64);
        ctx.set_stroke_style_str(OUTLINE);
        ctx.set_line_width(2.0);
        ctx.stroke();

        // Shine
        ctx.set_fill_style_str("#fff");
        self.fill_circle(x - 3.0, y - 3.0, 3.0);
    }

    fn draw_power_up(&self, power_up: &PowerUp) {
        let ctx = &self.ctx;
        let c = power_up.pos + power_up.size / 2.0;
        let (cx, cy) = (c.x as f64, c.y as f64);

        ctx.set_fill_style_str("#fff");
        self.fill_circle(cx, cy, power_up.size.x as f64 * 0.6);
        ctx.stroke();

        ctx.set_fill_style_str(OUTLINE);
        let _ = ctx.fill_text(power_up.kind.icon(), cx, cy);
    }
}
