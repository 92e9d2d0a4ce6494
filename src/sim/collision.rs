//! Axis-aligned collision helpers
//!
//! Positions are kept as `f32`. Overlap uses strict comparisons on both axes
//! (half-open intervals), so rectangles that only share an edge do not touch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// True if the two rectangles share an area of nonzero measure
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Reflect horizontally off the field's side walls.
///
/// An object leaving the field is clamped exactly onto the boundary and its
/// horizontal velocity is inverted (no energy loss). Returns true on a bounce.
pub fn bounce_off_walls(pos: &mut Vec2, vel: &mut Vec2, width: f32, field_w: f32) -> bool {
    let max_x = field_w - width;
    let mut bounced = false;
    if pos.x < 0.0 {
        pos.x = 0.0;
        vel.x = -vel.x;
        bounced = true;
    }
    if pos.x > max_x {
        pos.x = max_x;
        vel.x = -vel.x;
        bounced = true;
    }
    bounced
}
