//! Paddle-and-ball bouncer
//!
//! The smaller of the two games: a pointer-driven pad returns a ball that
//! bounces around a 200x200 field. Missing the ball just serves a new one.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const BOUNCER_W: i32 = 200;
pub const BOUNCER_H: i32 = 200;
pub const BALL_SPEED: f32 = 1.2;

/// The player's pad, positioned by its centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pad {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Default for Pad {
    fn default() -> Self {
        Self {
            x: BOUNCER_W / 2,
            y: BOUNCER_H - 5,
            w: 40,
            h: 5,
        }
    }
}

impl Pad {
    /// Centre on the pointer without leaving the field
    pub fn follow(&mut self, pointer_x: i32) {
        self.x = pointer_x.clamp(self.w / 2, BOUNCER_W - self.w / 2);
    }

    /// Ball centre inside the pad (edges inclusive)
    pub fn catches(&self, ball: &BouncerBall) -> bool {
        let (half_w, half_h) = ((self.w / 2) as f32, (self.h / 2) as f32);
        let (x, y) = (self.x as f32, self.y as f32);
        let in_y = y - half_h <= ball.pos.y && ball.pos.y <= y + half_h;
        let in_x = x - half_w <= ball.pos.x && ball.pos.x <= x + half_w;
        in_x && in_y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BouncerBall {
    pub pos: Vec2,
    /// Unit direction
    pub vel: Vec2,
    pub speed: f32,
}

impl BouncerBall {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            speed: BALL_SPEED,
        };
        ball.serve(rng);
        ball
    }

    /// Respawn near the top, heading downward at 30..=150 degrees
    pub fn serve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pos = Vec2::new(rng.random_range(10..=BOUNCER_W - 10) as f32, 20.0);
        let angle = (rng.random_range(30..=150) as f32).to_radians();
        self.vel = Vec2::new(angle.cos(), angle.sin());
    }

    /// Move and reflect off the walls. Returns true if the ball fell out and
    /// was served again.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.pos += self.vel * self.speed;

        if self.pos.x < 0.0 || self.pos.x > (BOUNCER_W - 1) as f32 {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0.0 {
            self.vel.y = -self.vel.y;
        }
        if self.pos.y > BOUNCER_H as f32 {
            self.serve(rng);
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BouncerState {
    pub pad: Pad,
    pub ball: BouncerBall,
    /// Balls returned by the pad
    pub returns: u32,
    /// Balls that fell out
    pub misses: u32,
}

impl BouncerState {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            pad: Pad::default(),
            ball: BouncerBall::new(rng),
            returns: 0,
            misses: 0,
        }
    }

    /// Advance one tick. `pointer_x` of `None` leaves the pad where it is.
    pub fn tick<R: Rng + ?Sized>(&mut self, pointer_x: Option<i32>, rng: &mut R) {
        if let Some(x) = pointer_x {
            self.pad.follow(x);
        }

        if self.ball.update(rng) {
            self.misses += 1;
            log::debug!("Ball lost ({} misses)", self.misses);
        }

        if self.ball.vel.y > 0.0 && self.pad.catches(&self.ball) {
            self.ball.vel.y = -self.ball.vel.y;
            self.returns += 1;
        }
    }
}
