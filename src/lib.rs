//! Fruit Catcher - a retro arcade catching game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, game state)
//! - `renderer`: Drawing primitives, scene painters and the terminal canvas
//! - `platform`: Input state and fixed timestep for the host loop
//! - `settings`: JSON configuration

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 30;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Field dimensions (pixels)
    pub const FIELD_W: i32 = 256;
    pub const FIELD_H: i32 = 256;
    /// Fruits below this line are lost
    pub const GROUND_Y: i32 = FIELD_H - 28;

    /// Catch area (the avatar's arms)
    pub const CATCH_W: i32 = 44;
    pub const CATCH_H: i32 = 14;
    /// Catch area offset below the avatar's top edge
    pub const CATCH_OFFSET_Y: i32 = 18;
    /// Avatar top edge
    pub const PLAYER_Y: i32 = GROUND_Y - 42;
    /// Horizontal step per tick while a direction is held
    pub const PLAYER_SPEED: i32 = 4;

    /// Session rules
    pub const START_LIVES: u8 = 3;
    pub const SESSION_SECONDS: u32 = 60;
    pub const SESSION_TICKS: u32 = SESSION_SECONDS * TICKS_PER_SECOND;
    pub const LEVEL_STEP_SECONDS: u32 = 15;

    /// Combo window after a catch (~0.8 s)
    pub const COMBO_WINDOW_TICKS: u32 = 24;
    /// Combo count at which the score multiplier stops growing
    pub const COMBO_CAP: u32 = 10;

    /// Ordinary fruit
    pub const FRUIT_SIZE: i32 = 10;
    pub const FRUIT_BASE_FALL: f32 = 1.2;
    /// Gold fruit
    pub const GOLD_REWARD: u32 = 40;
    pub const GOLD_SIZE: i32 = 14;
    pub const GOLD_BASE_FALL: f32 = 1.1;

    /// Decorative clouds
    pub const CLOUD_COUNT: usize = 6;
}
