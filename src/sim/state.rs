//! Game state and core simulation types
//!
//! Everything a session needs lives here; the driver owns one `GameState` and
//! the RNG, and hands both to `tick` once per frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, bounce_off_walls};
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the confirm input
    Title,
    /// Active gameplay
    Play,
    /// Timer expired or lives exhausted; waiting for reset
    GameOver,
}

/// Fruit types. The three ordinary kinds are equally likely; `Gold` is the
/// rare high-value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitKind {
    Red,
    Yellow,
    Green,
    Gold,
}

impl FruitKind {
    /// Ordinary spawn table
    pub const ORDINARY: [FruitKind; 3] = [FruitKind::Red, FruitKind::Yellow, FruitKind::Green];

    /// Base points for catching this kind
    pub fn reward(self) -> u32 {
        match self {
            FruitKind::Red => 10,
            FruitKind::Yellow => 12,
            FruitKind::Green => 15,
            FruitKind::Gold => GOLD_REWARD,
        }
    }

    /// Side length of the (square) bounding box
    pub fn size(self) -> i32 {
        match self {
            FruitKind::Gold => GOLD_SIZE,
            _ => FRUIT_SIZE,
        }
    }

    /// Lower bound of the fall speed roll before the level bonus
    pub fn base_fall_speed(self) -> f32 {
        match self {
            FruitKind::Gold => GOLD_BASE_FALL,
            _ => FRUIT_BASE_FALL,
        }
    }

    pub fn is_special(self) -> bool {
        self == FruitKind::Gold
    }
}

/// A falling fruit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub kind: FruitKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub w: i32,
    pub h: i32,
    pub reward: u32,
}

impl Fruit {
    pub fn new(kind: FruitKind, pos: Vec2, vel: Vec2) -> Self {
        let size = kind.size();
        Self {
            kind,
            pos,
            vel,
            w: size,
            h: size,
            reward: kind.reward(),
        }
    }

    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.w as f32, self.h as f32)
    }

    /// Advance one tick and reflect off the side walls
    pub fn update(&mut self) {
        self.pos += self.vel;
        bounce_off_walls(&mut self.pos, &mut self.vel, self.w as f32, FIELD_W as f32);
    }

    /// True once the fruit has fallen past the ground line
    pub fn is_grounded(&self) -> bool {
        self.pos.y > GROUND_Y as f32
    }
}

/// The player's avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Left edge of the catch area, kept within [0, FIELD_W - CATCH_W]
    pub x: i32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: (FIELD_W - CATCH_W) / 2,
        }
    }
}

impl Player {
    /// Avatar top edge (fixed)
    pub const Y: i32 = PLAYER_Y;

    pub const fn max_x() -> i32 {
        FIELD_W - CATCH_W
    }

    /// Move horizontally, clamped to the field
    pub fn move_by(&mut self, dx: i32) {
        self.x = (self.x + dx).clamp(0, Self::max_x());
    }

    /// The collision area (distinct from the drawn avatar)
    pub fn catch_rect(&self) -> Rect {
        Rect::new(
            self.x as f32,
            (Self::Y + CATCH_OFFSET_Y) as f32,
            CATCH_W as f32,
            CATCH_H as f32,
        )
    }
}

/// Consecutive-catch tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    pub count: u32,
    /// Ticks left before the chain breaks
    pub timer: u32,
    /// Longest chain this session
    pub best: u32,
}

impl Combo {
    /// Per-tick countdown; the chain resets on the tick after the timer hits zero
    pub fn decay(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
        } else {
            self.count = 0;
        }
    }

    /// Extend the chain and refresh the window. Returns the new count.
    pub fn register_catch(&mut self) -> u32 {
        self.count += 1;
        self.best = self.best.max(self.count);
        self.timer = COMBO_WINDOW_TICKS;
        self.count
    }

    /// Lost a life
    pub fn break_chain(&mut self) {
        self.count = 0;
        self.timer = 0;
    }

    /// Whether the HUD should show the combo banner
    pub fn is_showing(&self) -> bool {
        self.count >= 2 && self.timer > 0
    }
}

/// Background cloud (cosmetic only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub speed: f32,
}

impl Cloud {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            pos: Vec2::new(rng.random_range(0..=FIELD_W) as f32, Self::random_y(rng)),
            speed: Self::random_speed(rng),
        }
    }

    /// Drift right, wrapping back to the left edge with a fresh height and speed
    pub fn drift<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pos.x += self.speed;
        if self.pos.x > (FIELD_W + 20) as f32 {
            self.pos.x = -20.0;
            self.pos.y = Self::random_y(rng);
            self.speed = Self::random_speed(rng);
        }
    }

    fn random_y<R: Rng + ?Sized>(rng: &mut R) -> f32 {
        rng.random_range(18..=90) as f32
    }

    fn random_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
        rng.random_range(0.2..=0.6)
    }
}

/// Things that happened during a tick, drained by the driver for logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Restarted,
    Caught { kind: FruitKind, gained: u32, combo: u32 },
    Missed { lives_left: u8 },
    LevelUp { level: u32 },
    GameOver { score: u32, best_combo: u32 },
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u8,
    /// Countdown in ticks, never below zero
    pub time_left: u32,
    /// Derived from `time_left` every tick
    pub level: u32,
    /// Play ticks since the session started (drives spawn cadence)
    pub frame: u64,
    pub player: Player,
    /// Live fruits; order carries no meaning
    pub fruits: Vec<Fruit>,
    pub combo: Combo,
    pub clouds: Vec<Cloud>,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh session on the title screen
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let clouds = (0..CLOUD_COUNT).map(|_| Cloud::random(&mut *rng)).collect();
        Self {
            phase: GamePhase::Title,
            score: 0,
            lives: START_LIVES,
            time_left: SESSION_TICKS,
            level: 1,
            frame: 0,
            player: Player::default(),
            fruits: Vec::new(),
            combo: Combo::default(),
            clouds,
            events: Vec::new(),
        }
    }

    /// Throw away the session and start playing again.
    ///
    /// Produces the same session fields whatever phase it is called from.
    /// Clouds are left where they are.
    pub fn restart(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.time_left = SESSION_TICKS;
        self.level = 1;
        self.frame = 0;
        self.player = Player::default();
        self.fruits.clear();
        self.combo = Combo::default();
        self.phase = GamePhase::Play;
        self.events.push(GameEvent::Restarted);
    }

    /// Whole seconds left on the countdown
    pub fn remaining_seconds(&self) -> u32 {
        self.time_left / TICKS_PER_SECOND
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
