//! Fruit spawner
//!
//! Cadence, rarity and speed all scale with the level. All randomness comes
//! through the injected RNG so a seeded run replays exactly.

use glam::Vec2;
use rand::Rng;

use super::state::{Fruit, FruitKind};
use crate::consts::FIELD_W;

/// Fastest allowed cadence (ticks between spawns)
pub const MIN_SPAWN_INTERVAL: u64 = 8;
/// Highest chance a spawn is gold
pub const MAX_GOLD_PROBABILITY: f64 = 0.12;

/// Ticks between spawns at `level`
pub fn spawn_interval(level: u32) -> u64 {
    (28 - 3 * i64::from(level)).max(MIN_SPAWN_INTERVAL as i64) as u64
}

/// Chance that a spawn is the rare gold kind
pub fn gold_probability(level: u32) -> f64 {
    (0.03 + f64::from(level) * 0.01).min(MAX_GOLD_PROBABILITY)
}

/// Roll a new fruit above the visible field.
///
/// Draw order: rarity, ordinary kind, x, y, fall speed, drift.
pub fn spawn_fruit<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Fruit {
    let kind = if rng.random_bool(gold_probability(level)) {
        FruitKind::Gold
    } else {
        FruitKind::ORDINARY[rng.random_range(0..FruitKind::ORDINARY.len())]
    };

    let size = kind.size();
    let x = rng.random_range(0..=FIELD_W - size) as f32;
    // Above the top edge so it is already moving when it appears
    let y = rng.random_range(-90..=-16) as f32;

    let level = level as f32;
    let base = kind.base_fall_speed();
    let vy = rng.random_range(base..=base + 0.4) + level * 0.08;
    let vx = rng.random_range(-0.25f32..=0.25) * (1.0 + level * 0.15);

    Fruit::new(kind, Vec2::new(x, y), Vec2::new(vx, vy))
}
