//! Recording canvas
//!
//! Keeps every primitive in call order. Used for headless frame dumps and to
//! check what the scene painters emit.

use serde::Serialize;

use super::{Canvas, Color};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCmd {
    Cls { col: Color },
    Rect { x: i32, y: i32, w: i32, h: i32, col: Color },
    Circ { x: i32, y: i32, r: i32, col: Color },
    Tri { pts: [(i32, i32); 3], col: Color },
    Line { from: (i32, i32), to: (i32, i32), col: Color },
    Pset { x: i32, y: i32, col: Color },
    Text { x: i32, y: i32, text: String, col: Color },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DrawList {
    pub cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    /// All text drawn, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

impl Canvas for DrawList {
    fn cls(&mut self, col: Color) {
        self.cmds.push(DrawCmd::Cls { col });
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, col: Color) {
        self.cmds.push(DrawCmd::Rect { x, y, w, h, col });
    }

    fn circ(&mut self, x: i32, y: i32, r: i32, col: Color) {
        self.cmds.push(DrawCmd::Circ { x, y, r, col });
    }

    fn tri(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32, col: Color) {
        self.cmds.push(DrawCmd::Tri {
            pts: [(x1, y1), (x2, y2), (x3, y3)],
            col,
        });
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, col: Color) {
        self.cmds.push(DrawCmd::Line {
            from: (x1, y1),
            to: (x2, y2),
            col,
        });
    }

    fn pset(&mut self, x: i32, y: i32, col: Color) {
        self.cmds.push(DrawCmd::Pset { x, y, col });
    }

    fn text(&mut self, x: i32, y: i32, s: &str, col: Color) {
        self.cmds.push(DrawCmd::Text {
            x,
            y,
            text: s.to_string(),
            col,
        });
    }
}
