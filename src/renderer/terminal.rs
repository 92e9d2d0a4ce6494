//! Terminal canvas
//!
//! Rasterises primitives into a coarse dot grid and prints it with
//! crossterm. One terminal cell covers `CELL_W` x `CELL_H` field pixels and
//! shows two dots stacked vertically with an upper-half-block glyph. Text
//! takes whole cells (the retro font is exactly one cell wide); anything
//! painted over a text cell afterwards replaces the text.

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Print},
};

use super::{Canvas, Color};

/// Field pixels per terminal column
pub const CELL_W: i32 = 4;
/// Field pixels per terminal row
pub const CELL_H: i32 = 8;
/// Field pixels per dot vertically (two dots per cell)
const DOT_H: i32 = CELL_H / 2;

const UPPER_HALF: char = '▀';

fn to_term_color(col: Color) -> style::Color {
    let (r, g, b) = col.rgb();
    style::Color::Rgb { r, g, b }
}

#[derive(Debug, Clone)]
pub struct TermCanvas {
    field_w: i32,
    field_h: i32,
    cols: usize,
    rows: usize,
    /// Dot colours, `cols` x `rows * 2`, row-major
    dots: Vec<Color>,
    /// Text glyphs per cell
    text: Vec<Option<(char, Color)>>,
}

impl TermCanvas {
    pub fn new(field_w: i32, field_h: i32) -> Self {
        let cols = (field_w / CELL_W).max(1) as usize;
        let rows = (field_h / CELL_H).max(1) as usize;
        Self {
            field_w,
            field_h,
            cols,
            rows,
            dots: vec![Color::Black; cols * rows * 2],
            text: vec![None; cols * rows],
        }
    }

    /// Size in terminal cells
    pub fn size(&self) -> (u16, u16) {
        (self.cols as u16, self.rows as u16)
    }

    /// Field pixel under the centre of a terminal cell
    pub fn cell_to_field(&self, col: u16, row: u16) -> (i32, i32) {
        (
            (i32::from(col) * CELL_W + CELL_W / 2).min(self.field_w - 1),
            (i32::from(row) * CELL_H + CELL_H / 2).min(self.field_h - 1),
        )
    }

    /// Colour of the dot covering a field pixel
    pub fn dot_at(&self, x: i32, y: i32) -> Option<Color> {
        self.dot_index(x, y).map(|i| self.dots[i])
    }

    /// Glyph in a terminal cell, if text is showing there
    pub fn text_at(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.text[row * self.cols + col].map(|(ch, _)| ch)
    }

    fn dot_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.field_w || y >= self.field_h {
            return None;
        }
        let (dx, dy) = ((x / CELL_W) as usize, (y / DOT_H) as usize);
        if dx >= self.cols || dy >= self.rows * 2 {
            return None;
        }
        Some(dy * self.cols + dx)
    }

    /// Paint the dot under a field pixel, replacing any text in its cell
    fn plot(&mut self, x: i32, y: i32, col: Color) {
        if let Some(i) = self.dot_index(x, y) {
            self.dots[i] = col;
            let (dx, dy) = (i % self.cols, i / self.cols);
            self.text[(dy / 2) * self.cols + dx] = None;
        }
    }

    /// Print the whole grid starting at the terminal's top-left corner
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut fg = None;
        let mut bg = None;

        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row as u16))?;
            for col in 0..self.cols {
                let top = self.dots[(row * 2) * self.cols + col];
                let bottom = self.dots[(row * 2 + 1) * self.cols + col];
                let (glyph, want_fg, want_bg) = match self.text[row * self.cols + col] {
                    Some((ch, text_col)) => (ch, text_col, top),
                    None => (UPPER_HALF, top, bottom),
                };

                if fg != Some(want_fg) {
                    out.queue(style::SetForegroundColor(to_term_color(want_fg)))?;
                    fg = Some(want_fg);
                }
                if bg != Some(want_bg) {
                    out.queue(style::SetBackgroundColor(to_term_color(want_bg)))?;
                    bg = Some(want_bg);
                }
                out.queue(Print(glyph))?;
            }
        }

        out.queue(style::ResetColor)?;
        out.flush()
    }
}

impl Canvas for TermCanvas {
    fn cls(&mut self, col: Color) {
        self.dots.fill(col);
        self.text.fill(None);
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, col: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w - 1).min(self.field_w - 1);
        let y1 = (y + h - 1).min(self.field_h - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }
        // One plot per dot touched
        let mut py = y0;
        while py <= y1 {
            let mut px = x0;
            while px <= x1 {
                self.plot(px, py, col);
                px = (px / CELL_W + 1) * CELL_W;
            }
            py = (py / DOT_H + 1) * DOT_H;
        }
    }

    fn circ(&mut self, x: i32, y: i32, r: i32, col: Color) {
        let r2 = r * r;
        for py in (y - r)..=(y + r) {
            for px in (x - r)..=(x + r) {
                let (dx, dy) = (px - x, py - y);
                if dx * dx + dy * dy <= r2 {
                    self.plot(px, py, col);
                }
            }
        }
    }

    fn tri(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32, col: Color) {
        let edge = |ax: i32, ay: i32, bx: i32, by: i32, px: i32, py: i32| {
            (bx - ax) * (py - ay) - (by - ay) * (px - ax)
        };
        let min_x = x1.min(x2).min(x3).max(0);
        let max_x = x1.max(x2).max(x3).min(self.field_w - 1);
        let min_y = y1.min(y2).min(y3).max(0);
        let max_y = y1.max(y2).max(y3).min(self.field_h - 1);

        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let e1 = edge(x1, y1, x2, y2, px, py);
                let e2 = edge(x2, y2, x3, y3, px, py);
                let e3 = edge(x3, y3, x1, y1, px, py);
                let inside = (e1 >= 0 && e2 >= 0 && e3 >= 0) || (e1 <= 0 && e2 <= 0 && e3 <= 0);
                if inside {
                    self.plot(px, py, col);
                }
            }
        }
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, col: Color) {
        // Bresenham
        let (dx, dy) = ((x2 - x1).abs(), -(y2 - y1).abs());
        let (sx, sy) = (if x1 < x2 { 1 } else { -1 }, if y1 < y2 { 1 } else { -1 });
        let (mut x, mut y) = (x1, y1);
        let mut err = dx + dy;
        loop {
            self.plot(x, y, col);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn pset(&mut self, x: i32, y: i32, col: Color) {
        self.plot(x, y, col);
    }

    fn text(&mut self, x: i32, y: i32, s: &str, col: Color) {
        if y < 0 || y >= self.field_h {
            return;
        }
        let row = (y / CELL_H) as usize;
        for (i, ch) in s.chars().enumerate() {
            let cx = x + i as i32 * CELL_W;
            if cx < 0 || cx >= self.field_w {
                continue;
            }
            let col_idx = (cx / CELL_W) as usize;
            if col_idx < self.cols && row < self.rows {
                self.text[row * self.cols + col_idx] = Some((ch, col));
            }
        }
    }
}
