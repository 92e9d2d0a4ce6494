//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session by one frame.

use rand::Rng;

use super::spawn::{spawn_fruit, spawn_interval};
use super::state::{GameEvent, GamePhase, GameState, Player};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Start from the title screen (pressed this tick)
    pub confirm: bool,
    /// Restart the session (pressed this tick)
    pub reset: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Difficulty tier from whole seconds remaining. Steps up every
/// `LEVEL_STEP_SECONDS` of elapsed time, starting at 1.
pub fn level_for_remaining_seconds(remaining: u32) -> u32 {
    1 + SESSION_SECONDS.saturating_sub(remaining) / LEVEL_STEP_SECONDS
}

/// Difficulty tier from the countdown in ticks
pub fn level_for_ticks(time_left: u32) -> u32 {
    level_for_remaining_seconds(time_left / TICKS_PER_SECOND)
}

/// Score multiplier for a chain of `combo` catches (capped at 2.0)
pub fn combo_multiplier(combo: u32) -> f64 {
    1.0 + f64::from(combo.min(COMBO_CAP)) * 0.1
}

/// Points for a catch: `reward * combo_multiplier(combo)`, truncated.
///
/// Computed in tenths so the truncation never depends on float rounding.
pub fn catch_score(reward: u32, combo: u32) -> u32 {
    reward * (10 + combo.min(COMBO_CAP)) / 10
}

/// Advance the game state by one tick
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, input: &TickInput, rng: &mut R) {
    match state.phase {
        GamePhase::Title => {
            if input.confirm || input.idle_mode {
                state.phase = GamePhase::Play;
                state.events.push(GameEvent::Started);
            }
            return;
        }
        GamePhase::GameOver => {
            if input.reset {
                state.restart();
            }
            return;
        }
        GamePhase::Play => {}
    }

    if input.reset {
        state.restart();
        return;
    }

    // Countdown; expiry ends the tick
    state.time_left = state.time_left.saturating_sub(1);
    if state.time_left == 0 {
        end_session(state);
        return;
    }

    let level = level_for_ticks(state.time_left);
    if level != state.level {
        state.level = level;
        state.events.push(GameEvent::LevelUp { level });
    }

    // Player movement
    let (left, right) = if input.idle_mode {
        autopilot(state)
    } else {
        (input.left, input.right)
    };
    let mut dx = 0;
    if left {
        dx -= PLAYER_SPEED;
    }
    if right {
        dx += PLAYER_SPEED;
    }
    state.player.move_by(dx);

    // Combo window runs before collisions so a catch on the expiring tick still chains
    state.combo.decay();

    state.frame += 1;
    if state.frame % spawn_interval(state.level) == 0 {
        let fruit = spawn_fruit(state.level, rng);
        state.fruits.push(fruit);
    }

    resolve_fruits(state);

    for cloud in &mut state.clouds {
        cloud.drift(rng);
    }
}

/// Move every fruit, then resolve it exactly once: caught, lost, or still falling
fn resolve_fruits(state: &mut GameState) {
    let catch = state.player.catch_rect();
    let mut fruits = std::mem::take(&mut state.fruits);

    fruits.retain_mut(|fruit| {
        fruit.update();

        if catch.overlaps(&fruit.bounds()) {
            let combo = state.combo.register_catch();
            let gained = catch_score(fruit.reward, combo);
            state.score += gained;
            state.events.push(GameEvent::Caught {
                kind: fruit.kind,
                gained,
                combo,
            });
            return false;
        }

        if fruit.is_grounded() {
            lose_life(state);
            return false;
        }

        true
    });

    state.fruits = fruits;
}

fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.combo.break_chain();
    state.events.push(GameEvent::Missed {
        lives_left: state.lives,
    });
    if state.lives == 0 && state.phase == GamePhase::Play {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.score,
            best_combo: state.combo.best,
        });
    }
}

fn end_session(state: &mut GameState) {
    state.time_left = 0;
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver {
        score: state.score,
        best_combo: state.combo.best,
    });
}

/// Demo controller: chase the lowest fruit that can still be caught.
/// Returns (left, right).
fn autopilot(state: &GameState) -> (bool, bool) {
    let catch = state.player.catch_rect();

    let target = state
        .fruits
        .iter()
        .filter(|f| f.pos.y < catch.bottom())
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(fruit) = target else {
        return (false, false);
    };

    let fruit_center = fruit.pos.x + fruit.w as f32 / 2.0;
    let catch_center = catch.x + catch.w / 2.0;
    let dead_zone = PLAYER_SPEED as f32 / 2.0;
    let diff = fruit_center - catch_center;

    let at_left_wall = state.player.x <= 0;
    let at_right_wall = state.player.x >= Player::max_x();
    (diff < -dead_zone && !at_left_wall, diff > dead_zone && !at_right_wall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Combo, Fruit, FruitKind};
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state(rng: &mut Pcg32) -> GameState {
        let mut state = GameState::new(rng);
        state.phase = GamePhase::Play;
        state
    }

    /// A motionless fruit sitting in the middle of the catch area
    fn fruit_in_catch_area(state: &GameState, kind: FruitKind) -> Fruit {
        let catch = state.player.catch_rect();
        Fruit::new(kind, Vec2::new(catch.x + 10.0, catch.y + 2.0), Vec2::ZERO)
    }

    #[test]
    fn test_tick_title_to_play() {
        let mut rng = Pcg32::seed_from_u64(12345);
        let mut state = GameState::new(&mut rng);
        assert_eq!(state.phase, GamePhase::Title);

        // No confirm - stays on the title, nothing simulated
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.time_left, SESSION_TICKS);

        let input = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut rng);
        assert_eq!(state.phase, GamePhase::Play);
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_reset_during_play_short_circuits() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = playing_state(&mut rng);
        state.score = 120;
        state.time_left = 100;
        state.player.x = 0;

        let input = TickInput {
            reset: true,
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut rng);
        assert_eq!(state.phase, GamePhase::Play);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, SESSION_TICKS);
        assert_eq!(state.frame, 0);
        assert_eq!(state.player, Player::default());
    }

    #[test]
    fn test_game_over_waits_for_reset() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = playing_state(&mut rng);
        state.phase = GamePhase::GameOver;
        state.lives = 0;
        state.score = 55;

        let idle = TickInput {
            confirm: true,
            left: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &idle, &mut rng);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 55);

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, &mut rng);
        assert_eq!(state.phase, GamePhase::Play);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_timer_expiry_clamps_at_zero() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = playing_state(&mut rng);
        state.time_left = 1;

        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.time_left, 0);
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.time_left, 0);
    }

    #[test]
    fn test_level_steps() {
        assert_eq!(level_for_remaining_seconds(60), 1);
        assert_eq!(level_for_remaining_seconds(46), 1);
        assert_eq!(level_for_remaining_seconds(45), 2);
        assert_eq!(level_for_remaining_seconds(44), 2);
        assert_eq!(level_for_remaining_seconds(30), 3);
        assert_eq!(level_for_remaining_seconds(0), 5);
        assert_eq!(level_for_ticks(SESSION_TICKS - 1), 1);
    }

    #[test]
    fn test_level_follows_timer() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = playing_state(&mut rng);
        state.time_left = 45 * TICKS_PER_SECOND + 1;

        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.level, 2);
        assert!(state.drain_events().contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_combo_multiplier_cap() {
        for n in 1..=10 {
            assert!((combo_multiplier(n) - (1.0 + n as f64 * 0.1)).abs() < 1e-9);
        }
        assert_eq!(combo_multiplier(11), 2.0);
        assert_eq!(combo_multiplier(500), 2.0);
    }

    #[test]
    fn test_catch_score() {
        assert_eq!(catch_score(10, 3), 13);
        assert_eq!(catch_score(12, 1), 13);
        assert_eq!(catch_score(15, 10), 30);
        assert_eq!(catch_score(40, 25), 80);
    }

    #[test]
    fn test_catch_at_combo_three() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut state = playing_state(&mut rng);
        state.combo = Combo {
            count: 2,
            timer: 10,
            best: 2,
        };
        let fruit = fruit_in_catch_area(&state, FruitKind::Red);
        state.fruits.push(fruit);

        tick(&mut state, &TickInput::default(), &mut rng);

        assert_eq!(state.score, 13);
        assert_eq!(state.combo.count, 3);
        assert_eq!(state.combo.best, 3);
        assert_eq!(state.combo.timer, COMBO_WINDOW_TICKS);
        assert!(state.fruits.is_empty());
    }

    #[test]
    fn test_catch_on_expiring_tick_still_chains() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut state = playing_state(&mut rng);
        state.combo = Combo {
            count: 3,
            timer: 1,
            best: 3,
        };
        let fruit = fruit_in_catch_area(&state, FruitKind::Green);
        state.fruits.push(fruit);

        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.combo.count, 4);
        assert_eq!(state.score, catch_score(15, 4));
    }

    #[test]
    fn test_missed_fruit_costs_life_and_combo() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = playing_state(&mut rng);
        state.player.x = 0;
        state.combo = Combo {
            count: 5,
            timer: 20,
            best: 5,
        };
        state.fruits.push(Fruit::new(
            FruitKind::Yellow,
            Vec2::new(200.0, GROUND_Y as f32 - 0.5),
            Vec2::new(0.0, 1.0),
        ));

        tick(&mut state, &TickInput::default(), &mut rng);

        assert_eq!(state.lives, START_LIVES - 1);
        assert_eq!(state.combo.count, 0);
        assert_eq!(state.combo.timer, 0);
        assert_eq!(state.combo.best, 5);
        assert!(state.fruits.is_empty());
        assert_eq!(state.phase, GamePhase::Play);
    }

    #[test]
    fn test_last_life_ends_session() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = playing_state(&mut rng);
        state.player.x = 0;
        state.lives = 1;
        for x in [120.0, 160.0] {
            state.fruits.push(Fruit::new(
                FruitKind::Red,
                Vec2::new(x, GROUND_Y as f32 + 1.0),
                Vec2::ZERO,
            ));
        }

        tick(&mut state, &TickInput::default(), &mut rng);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        let game_overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_spawn_cadence_level_one() {
        let mut rng = Pcg32::seed_from_u64(77);
        let mut state = playing_state(&mut rng);

        for _ in 0..24 {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert!(state.fruits.is_empty());

        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.frame, 25);
        assert_eq!(state.fruits.len(), 1);
    }

    #[test]
    fn test_movement_and_clamp() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = playing_state(&mut rng);
        let start = state.player.x;

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left, &mut rng);
        assert_eq!(state.player.x, start - PLAYER_SPEED);

        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &both, &mut rng);
        assert_eq!(state.player.x, start - PLAYER_SPEED);

        for _ in 0..100 {
            tick(&mut state, &left, &mut rng);
        }
        assert_eq!(state.player.x, 0);
    }

    #[test]
    fn test_autopilot_tracks_lowest_fruit() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = playing_state(&mut rng);
        state.player.x = 100;
        state.fruits.push(Fruit::new(FruitKind::Red, Vec2::new(10.0, 20.0), Vec2::ZERO));
        state.fruits.push(Fruit::new(FruitKind::Red, Vec2::new(230.0, 150.0), Vec2::ZERO));
        assert_eq!(autopilot(&state), (false, true));

        state.player.x = Player::max_x();
        assert_eq!(autopilot(&state), (false, false));
    }

    #[test]
    fn test_determinism() {
        // Two runs with the same seed and inputs produce identical sessions
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        let mut state1 = GameState::new(&mut rng1);
        let mut state2 = GameState::new(&mut rng2);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state1, &input, &mut rng1);
            tick(&mut state2, &input, &mut rng2);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
        assert_eq!(state1.fruits, state2.fruits);
        assert_eq!(state1.player, state2.player);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), prop::bool::weighted(0.01)).prop_map(
            |(left, right, confirm, reset)| TickInput {
                left,
                right,
                confirm,
                reset,
                idle_mode: false,
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn session_invariants(seed in any::<u64>(), inputs in prop::collection::vec(arb_input(), 1..400)) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = GameState::new(&mut rng);

            for input in &inputs {
                let before = state.clone();
                tick(&mut state, input, &mut rng);

                prop_assert!(state.player.x >= 0 && state.player.x <= FIELD_W - CATCH_W);
                prop_assert!(state.level >= 1);

                if input.reset && before.phase != GamePhase::Title {
                    continue;
                }
                prop_assert!(state.score >= before.score);
                prop_assert!(state.lives <= before.lives);
                prop_assert!(state.level >= before.level);
                prop_assert!(state.combo.best >= before.combo.best);
                if before.phase == GamePhase::GameOver {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                }
                if state.lives == 0 {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                }
            }
        }
    }
}
