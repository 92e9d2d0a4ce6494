//! Rendering module
//!
//! Scene painters talk to a `Canvas` of retro primitives in field
//! coordinates. `DrawList` records them; `TermCanvas` rasterises them for a
//! terminal.

pub mod draw_list;
pub mod scene;
pub mod terminal;

pub use draw_list::{DrawCmd, DrawList};
pub use scene::{draw_bouncer, draw_catcher, fruit_color};
pub use terminal::TermCanvas;

use serde::{Deserialize, Serialize};

/// 16-colour palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Color {
    #[default]
    Black,
    Navy,
    Purple,
    Green,
    Brown,
    DarkBlue,
    LightBlue,
    White,
    Red,
    Orange,
    Yellow,
    Lime,
    Cyan,
    Gray,
    Pink,
    Peach,
}

impl Color {
    pub fn rgb(self) -> (u8, u8, u8) {
        let hex: u32 = match self {
            Color::Black => 0x000000,
            Color::Navy => 0x2b335f,
            Color::Purple => 0x7e2072,
            Color::Green => 0x19959c,
            Color::Brown => 0x8b4852,
            Color::DarkBlue => 0x395c98,
            Color::LightBlue => 0xa9c1ff,
            Color::White => 0xeeeeee,
            Color::Red => 0xd4186c,
            Color::Orange => 0xd38441,
            Color::Yellow => 0xe9c35b,
            Color::Lime => 0x70c6a9,
            Color::Cyan => 0x7696de,
            Color::Gray => 0xa3a3a3,
            Color::Pink => 0xff9798,
            Color::Peach => 0xedc7b0,
        };
        ((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

/// Drawing primitives in integer field coordinates
pub trait Canvas {
    /// Fill the whole canvas
    fn cls(&mut self, col: Color);
    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, col: Color);
    /// Filled circle
    fn circ(&mut self, x: i32, y: i32, r: i32, col: Color);
    /// Filled triangle
    #[allow(clippy::too_many_arguments)]
    fn tri(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32, col: Color);
    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, col: Color);
    fn pset(&mut self, x: i32, y: i32, col: Color);
    fn text(&mut self, x: i32, y: i32, s: &str, col: Color);
}
