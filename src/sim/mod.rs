//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` per frame)
//! - Injected RNG only
//! - No rendering or platform dependencies

pub mod bouncer;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bouncer::{BouncerBall, BouncerState, Pad};
pub use collision::{Rect, bounce_off_walls};
pub use spawn::{gold_probability, spawn_fruit, spawn_interval};
pub use state::{Cloud, Combo, Fruit, FruitKind, GameEvent, GamePhase, GameState, Player};
pub use tick::{
    TickInput, catch_score, combo_multiplier, level_for_remaining_seconds, level_for_ticks, tick,
};
