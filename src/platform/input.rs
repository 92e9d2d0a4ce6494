//! Keyboard and pointer state
//!
//! Terminals differ in what they report. Kitty-protocol terminals send proper
//! press / repeat / release events; classic ones only send presses (OS key
//! repeat shows up as more presses). A key therefore counts as held while it
//! was last seen within `hold_window` ticks, and is dropped immediately when a
//! release does arrive.

use std::collections::{HashMap, HashSet};

use crossterm::event::KeyCode;

use crate::sim::TickInput;

/// Keys the games care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    A,
    D,
    Enter,
    Space,
    R,
}

impl Key {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Char(' ') => Some(Key::Space),
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'a' => Some(Key::A),
                'd' => Some(Key::D),
                'r' => Some(Key::R),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Per-tick input snapshot source
#[derive(Debug, Clone)]
pub struct InputState {
    tick: u64,
    hold_window: u64,
    /// Key -> tick it was last pressed or repeated
    held: HashMap<Key, u64>,
    /// Keys that went down this tick
    pressed: HashSet<Key>,
    pointer: Option<(i32, i32)>,
}

impl InputState {
    pub fn new(hold_window: u64) -> Self {
        Self {
            tick: 0,
            hold_window,
            held: HashMap::new(),
            pressed: HashSet::new(),
            pointer: None,
        }
    }

    /// A press event. Only counts as a new press if the key was not already held.
    pub fn press(&mut self, key: Key) {
        if !self.btn(key) {
            self.pressed.insert(key);
        }
        self.held.insert(key, self.tick);
    }

    /// A repeat event keeps the key held without re-triggering `btnp`
    pub fn repeat(&mut self, key: Key) {
        self.held.insert(key, self.tick);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Key is down
    pub fn btn(&self, key: Key) -> bool {
        self.held
            .get(&key)
            .map(|&last| self.tick.saturating_sub(last) <= self.hold_window)
            .unwrap_or(false)
    }

    /// Key went down this tick
    pub fn btnp(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Pointer position in field coordinates
    pub fn set_pointer(&mut self, x: i32, y: i32) {
        self.pointer = Some((x, y));
    }

    pub fn pointer(&self) -> Option<(i32, i32)> {
        self.pointer
    }

    /// Clear this tick's edges and expire stale holds
    pub fn end_tick(&mut self) {
        self.pressed.clear();
        self.tick += 1;
        let (tick, window) = (self.tick, self.hold_window);
        self.held.retain(|_, last| tick.saturating_sub(*last) <= window);
    }

    /// Map to the catcher's tick input
    pub fn tick_input(&self, idle_mode: bool) -> TickInput {
        TickInput {
            left: self.btn(Key::Left) || self.btn(Key::A),
            right: self.btn(Key::Right) || self.btn(Key::D),
            confirm: self.btnp(Key::Enter) || self.btnp(Key::Space),
            reset: self.btnp(Key::R),
            idle_mode,
        }
    }
}
