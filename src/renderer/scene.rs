//! Scene painters
//!
//! Read-only views of the simulation state, drawn back to front.

use super::{Canvas, Color};
use crate::consts::*;
use crate::sim::{BouncerState, Fruit, FruitKind, GamePhase, GameState, Player};

const W: i32 = FIELD_W;
const H: i32 = FIELD_H;

pub fn fruit_color(kind: FruitKind) -> Color {
    match kind {
        FruitKind::Red => Color::Red,
        FruitKind::Yellow => Color::Yellow,
        FruitKind::Green => Color::Green,
        FruitKind::Gold => Color::Orange,
    }
}

/// Full frame of the catching game
pub fn draw_catcher<C: Canvas + ?Sized>(state: &GameState, canvas: &mut C) {
    draw_background(state, canvas);

    if state.phase == GamePhase::Title {
        canvas.rect(0, 0, W, H, Color::Black);
        canvas.text(W / 2 - 40, H / 2 - 25, "FRUIT CATCHER", Color::White);
        canvas.text(W / 2 - 58, H / 2 - 5, "ENTER or SPACE to START", Color::White);
        canvas.text(W / 2 - 54, H / 2 + 15, "A/D or <- -> to MOVE", Color::White);
        return;
    }

    draw_hud(state, canvas);

    for fruit in &state.fruits {
        draw_fruit(fruit, canvas);
    }

    draw_player(&state.player, canvas);

    if state.phase == GamePhase::GameOver {
        canvas.rect(0, 0, W, H, Color::Black);
        canvas.text(W / 2 - 40, H / 2 - 18, "GAME OVER", Color::White);
        canvas.text(W / 2 - 52, H / 2, &format!("SCORE: {}", state.score), Color::White);
        canvas.text(
            W / 2 - 52,
            H / 2 + 12,
            &format!("BEST COMBO: {}", state.combo.best),
            Color::White,
        );
        canvas.text(W / 2 - 60, H / 2 + 26, "PRESS R TO RESTART", Color::White);
    }
}

fn draw_background<C: Canvas + ?Sized>(state: &GameState, canvas: &mut C) {
    // Sky
    canvas.cls(Color::Cyan);
    canvas.rect(0, 0, W, 90, Color::LightBlue);

    // Mountains
    canvas.tri(20, 110, 60, 70, 100, 110, Color::DarkBlue);
    canvas.tri(90, 120, 140, 80, 190, 120, Color::DarkBlue);
    canvas.tri(160, 115, 200, 75, 240, 115, Color::DarkBlue);

    for cloud in &state.clouds {
        let (x, y) = (cloud.pos.x as i32, cloud.pos.y as i32);
        canvas.circ(x, y, 8, Color::White);
        canvas.circ(x + 10, y + 2, 10, Color::White);
        canvas.circ(x + 20, y, 8, Color::White);
    }

    // Ground
    canvas.rect(0, GROUND_Y, W, H - GROUND_Y, Color::Lime);
    canvas.line(0, GROUND_Y, W, GROUND_Y, Color::Green);

    // Grass dots scroll with the frame counter
    let offset = (state.frame % 12) as i32;
    for i in (0..W).step_by(12) {
        canvas.pset(i + offset, GROUND_Y + 6, Color::Green);
    }
}

fn draw_hud<C: Canvas + ?Sized>(state: &GameState, canvas: &mut C) {
    canvas.text(5, 5, &format!("SCORE: {}", state.score), Color::Black);
    canvas.text(5, 15, &format!("LIFE : {}", state.lives), Color::Black);
    canvas.text(5, 25, &format!("TIME : {}", state.remaining_seconds()), Color::Black);
    canvas.text(160, 5, &format!("LV:{}", state.level), Color::Black);

    if state.combo.is_showing() {
        canvas.text(160, 15, &format!("COMBO x{}", state.combo.count), Color::Purple);
    }

    canvas.text(160, 25, "R: RESET", Color::Black);
}

fn draw_fruit<C: Canvas + ?Sized>(fruit: &Fruit, canvas: &mut C) {
    let x = fruit.pos.x as i32;
    let y = fruit.pos.y as i32;
    let col = fruit_color(fruit.kind);

    if fruit.is_special() {
        let cx = x + fruit.w / 2;
        let cy = y + fruit.h / 2;
        canvas.circ(cx, cy, fruit.w / 2, col);
        canvas.pset(cx, y + 1, Color::White);
    } else {
        canvas.rect(x, y, fruit.w, fruit.h, col);
    }
}

/// Pixel person whose arms are the catch area
fn draw_player<C: Canvas + ?Sized>(player: &Player, canvas: &mut C) {
    let px = player.x;
    let py = Player::Y;
    let head_x = px + CATCH_W / 2;

    // Head
    canvas.circ(head_x, py + 10, 6, Color::Peach);
    canvas.pset(head_x - 2, py + 9, Color::Black);
    canvas.pset(head_x + 2, py + 9, Color::Black);

    // Body
    canvas.rect(px + 16, py + 18, 12, 16, Color::Red);

    // Arms
    let arm_y = py + CATCH_OFFSET_Y;
    canvas.rect(px, arm_y, CATCH_W, CATCH_H, Color::Red);
    canvas.line(px, arm_y, px + CATCH_W, arm_y, Color::Black);

    // Hands
    canvas.rect(px - 2, arm_y + 2, 2, 6, Color::Peach);
    canvas.rect(px + CATCH_W, arm_y + 2, 2, 6, Color::Peach);

    // Legs
    canvas.rect(px + 18, py + 34, 4, 10, Color::Black);
    canvas.rect(px + 24, py + 34, 4, 10, Color::Black);
}

/// Full frame of the bouncer
pub fn draw_bouncer<C: Canvas + ?Sized>(state: &BouncerState, canvas: &mut C) {
    canvas.cls(Color::Black);

    let pad = &state.pad;
    canvas.rect(pad.x - pad.w / 2, pad.y - pad.h / 2, pad.w, pad.h, Color::Pink);

    let ball = &state.ball;
    canvas.circ(ball.pos.x as i32, ball.pos.y as i32, 2, Color::Yellow);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCmd, DrawList};
    use crate::sim::Combo;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state(phase: GamePhase) -> GameState {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut state = GameState::new(&mut rng);
        state.phase = phase;
        state
    }

    #[test]
    fn test_title_screen() {
        let mut list = DrawList::new();
        draw_catcher(&state(GamePhase::Title), &mut list);
        assert!(list.has_text("FRUIT CATCHER"));
        assert!(list.has_text("ENTER or SPACE to START"));
        assert!(!list.has_text("SCORE"));
        assert_eq!(list.cmds.first(), Some(&DrawCmd::Cls { col: Color::Cyan }));
    }

    #[test]
    fn test_hud_during_play() {
        let mut s = state(GamePhase::Play);
        s.score = 42;
        s.time_left = 44 * TICKS_PER_SECOND + 5;
        let mut list = DrawList::new();
        draw_catcher(&s, &mut list);
        assert!(list.has_text("SCORE: 42"));
        assert!(list.has_text("LIFE : 3"));
        assert!(list.has_text("TIME : 44"));
        assert!(list.has_text("LV:1"));
        assert!(!list.has_text("COMBO"));
        assert!(!list.has_text("GAME OVER"));
    }

    #[test]
    fn test_combo_banner_needs_two_and_live_timer() {
        let mut s = state(GamePhase::Play);
        s.combo = Combo { count: 2, timer: 5, best: 2 };
        let mut list = DrawList::new();
        draw_catcher(&s, &mut list);
        assert!(list.has_text("COMBO x2"));

        s.combo.timer = 0;
        list.clear();
        draw_catcher(&s, &mut list);
        assert!(!list.has_text("COMBO"));
    }

    #[test]
    fn test_gold_fruit_is_round() {
        let mut s = state(GamePhase::Play);
        s.fruits.push(Fruit::new(FruitKind::Gold, Vec2::new(50.0, 60.0), Vec2::ZERO));
        s.fruits.push(Fruit::new(FruitKind::Green, Vec2::new(100.0, 60.0), Vec2::ZERO));
        let mut list = DrawList::new();
        draw_catcher(&s, &mut list);
        assert!(list.cmds.contains(&DrawCmd::Circ { x: 57, y: 67, r: 7, col: Color::Orange }));
        assert!(list.cmds.contains(&DrawCmd::Pset { x: 57, y: 61, col: Color::White }));
        assert!(list.cmds.contains(&DrawCmd::Rect {
            x: 100,
            y: 60,
            w: 10,
            h: 10,
            col: Color::Green
        }));
    }

    #[test]
    fn test_game_over_overlay() {
        let mut s = state(GamePhase::GameOver);
        s.score = 310;
        s.combo.best = 7;
        let mut list = DrawList::new();
        draw_catcher(&s, &mut list);
        assert!(list.has_text("GAME OVER"));
        assert!(list.has_text("SCORE: 310"));
        assert!(list.has_text("BEST COMBO: 7"));
        assert!(list.has_text("PRESS R TO RESTART"));
    }

    #[test]
    fn test_bouncer_frame() {
        let mut rng = Pcg32::seed_from_u64(4);
        let s = BouncerState::new(&mut rng);
        let mut list = DrawList::new();
        draw_bouncer(&s, &mut list);
        assert_eq!(list.cmds[0], DrawCmd::Cls { col: Color::Black });
        assert!(list.cmds.contains(&DrawCmd::Rect {
            x: 80,
            y: 193,
            w: 40,
            h: 5,
            col: Color::Pink
        }));
        assert!(list.cmds.iter().any(|c| matches!(c, DrawCmd::Circ { r: 2, col: Color::Yellow, .. })));
    }
}
