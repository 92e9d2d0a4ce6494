//! Fruit Catcher entry point
//!
//! Parses the command line, sets up logging and runs either the terminal
//! front-end or a headless autopilot session.

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use fruit_catcher::Settings;
use fruit_catcher::consts::{FIELD_H, FIELD_W, PLAYER_SPEED};
use fruit_catcher::platform::{FixedStep, InputState, Key};
use fruit_catcher::renderer::{Canvas, Color, DrawList, TermCanvas, draw_bouncer, draw_catcher};
use fruit_catcher::sim::bouncer::{BOUNCER_H, BOUNCER_W};
use fruit_catcher::sim::{BouncerState, GameEvent, GamePhase, GameState, tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GameKind {
    /// Catch falling fruit
    Catcher,
    /// Keep the ball in play with the pad
    Bouncer,
}

#[derive(Parser, Debug)]
#[command(version, about = "Retro arcade games for the terminal")]
struct Args {
    /// Which game to run
    #[arg(long, value_enum, default_value_t = GameKind::Catcher)]
    game: GameKind,
    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,
    /// Settings JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Let the autopilot play
    #[arg(long)]
    autopilot: bool,
    /// Run this many ticks without a terminal and print a JSON summary
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
    /// With --headless, include the final frame's draw commands
    #[arg(long, requires = "headless")]
    dump_frame: bool,
    /// Save the effective settings to this file and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    // The terminal front-end owns the screen, so stay quiet there unless
    // logs go to a file or RUST_LOG asks for them
    let default_filter = if interactive && log_file.is_none() {
        "off"
    } else {
        "info"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Whichever game is running
enum Session {
    Catcher(GameState),
    Bouncer(BouncerState),
}

impl Session {
    fn new(kind: GameKind, rng: &mut Pcg32) -> Self {
        match kind {
            GameKind::Catcher => Session::Catcher(GameState::new(rng)),
            GameKind::Bouncer => Session::Bouncer(BouncerState::new(rng)),
        }
    }

    fn field_size(&self) -> (i32, i32) {
        match self {
            Session::Catcher(_) => (FIELD_W, FIELD_H),
            Session::Bouncer(_) => (BOUNCER_W, BOUNCER_H),
        }
    }

    /// Run one fixed tick and consume this tick's input edges
    fn step(&mut self, input: &mut InputState, autopilot: bool, rng: &mut Pcg32) {
        match self {
            Session::Catcher(state) => {
                let tick_input = input.tick_input(autopilot);
                tick(state, &tick_input, rng);
                log_events(state.drain_events());
            }
            Session::Bouncer(state) => {
                let pointer_x = if autopilot {
                    Some(state.ball.pos.x as i32)
                } else {
                    keyboard_pointer(state, input)
                };
                state.tick(pointer_x, rng);
            }
        }
        input.end_tick();
    }

    fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        match self {
            Session::Catcher(state) => draw_catcher(state, canvas),
            Session::Bouncer(state) => draw_bouncer(state, canvas),
        }
    }

    fn is_over(&self) -> bool {
        matches!(self, Session::Catcher(state) if state.phase == GamePhase::GameOver)
    }
}

/// Held direction keys nudge the pointer so the bouncer works without a mouse
fn keyboard_pointer(state: &BouncerState, input: &mut InputState) -> Option<i32> {
    let mut dx = 0;
    if input.btn(Key::Left) || input.btn(Key::A) {
        dx -= PLAYER_SPEED;
    }
    if input.btn(Key::Right) || input.btn(Key::D) {
        dx += PLAYER_SPEED;
    }
    if dx != 0 {
        input.set_pointer(state.pad.x + dx, state.pad.y);
    }
    input.pointer().map(|(x, _)| x)
}

fn log_events(events: Vec<GameEvent>) {
    for event in events {
        match event {
            GameEvent::Started => log::info!("Session started"),
            GameEvent::Restarted => log::info!("Session restarted"),
            GameEvent::Caught { kind, gained, combo } => {
                log::debug!("Caught {kind:?} for {gained} (combo {combo})")
            }
            GameEvent::Missed { lives_left } => log::debug!("Missed a fruit, {lives_left} lives left"),
            GameEvent::LevelUp { level } => log::info!("Level {level}"),
            GameEvent::GameOver { score, best_combo } => {
                log::info!("Game over: score {score}, best combo {best_combo}")
            }
        }
    }
}

// ── Headless ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(tag = "game", rename_all = "snake_case")]
enum Summary {
    Catcher {
        seed: u64,
        ticks: u64,
        phase: GamePhase,
        score: u32,
        lives: u8,
        level: u32,
        best_combo: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        frame: Option<DrawList>,
    },
    Bouncer {
        seed: u64,
        ticks: u64,
        returns: u32,
        misses: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        frame: Option<DrawList>,
    },
}

fn run_headless(kind: GameKind, seed: u64, max_ticks: u64, dump_frame: bool) -> Result<()> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut session = Session::new(kind, &mut rng);
    let mut input = InputState::new(0);

    let mut ticks = 0;
    while ticks < max_ticks && !session.is_over() {
        session.step(&mut input, true, &mut rng);
        ticks += 1;
    }

    let frame = dump_frame.then(|| {
        let mut list = DrawList::new();
        session.draw(&mut list);
        list
    });

    let summary = match session {
        Session::Catcher(state) => Summary::Catcher {
            seed,
            ticks,
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            level: state.level,
            best_combo: state.combo.best,
            frame,
        },
        Session::Bouncer(state) => Summary::Bouncer {
            seed,
            ticks,
            returns: state.returns,
            misses: state.misses,
            frame,
        },
    };

    let mut out = stdout().lock();
    serde_json::to_writer_pretty(&mut out, &summary).context("writing summary")?;
    writeln!(out)?;
    Ok(())
}

// ── Terminal front-end ────────────────────────────────────────────────────────

/// Frames drawn over the last second
struct FpsCounter {
    frames: u32,
    since: Instant,
    fps: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            since: Instant::now(),
            fps: 0,
        }
    }

    fn frame(&mut self) -> u32 {
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed >= Duration::from_secs(1) {
            self.fps = (self.frames as f32 / elapsed.as_secs_f32()).round() as u32;
            self.frames = 0;
            self.since = Instant::now();
        }
        self.fps
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    mut session: Session,
    settings: &Settings,
    rng: &mut Pcg32,
) -> Result<()> {
    let (field_w, field_h) = session.field_size();
    let mut canvas = TermCanvas::new(field_w, field_h);
    let mut input = InputState::new(settings.hold_window_ticks);
    let mut step = FixedStep::default();
    let mut fps_counter = FpsCounter::new();
    let mut last = Instant::now();

    loop {
        // Drain all pending input events (non-blocking)
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => {
                    if kind == KeyEventKind::Press && is_quit(code, modifiers) {
                        return Ok(());
                    }
                    if let Some(key) = Key::from_key_code(code) {
                        match kind {
                            KeyEventKind::Press => input.press(key),
                            KeyEventKind::Repeat => input.repeat(key),
                            KeyEventKind::Release => input.release(key),
                        }
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_),
                    column,
                    row,
                    ..
                }) => {
                    let (x, y) = canvas.cell_to_field(column, row);
                    input.set_pointer(x, y);
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let ticks = step.advance(now.duration_since(last).as_secs_f32());
        last = now;
        for _ in 0..ticks {
            session.step(&mut input, settings.autopilot, rng);
        }

        session.draw(&mut canvas);
        let fps = fps_counter.frame();
        if settings.show_fps {
            canvas.text(field_w - 28, field_h - 8, &format!("{fps:>3}FPS"), Color::White);
        }
        canvas.flush(out).context("drawing frame")?;

        thread::sleep(Duration::from_secs_f32(step.until_next().max(0.001)));
    }
}

fn run_terminal(kind: GameKind, settings: &Settings, seed: u64) -> Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events where the terminal supports them
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so the loop never waits on I/O
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let mut rng = Pcg32::seed_from_u64(seed);
    let session = Session::new(kind, &mut rng);
    let result = game_loop(&mut out, &rx, session, settings, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn main() -> Result<()> {
    let args = Args::parse();
    let interactive = args.headless.is_none() && args.write_config.is_none();
    init_logging(args.log_file.as_deref(), interactive)?;

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::default(),
    };
    if args.autopilot {
        settings.autopilot = true;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    if let Some(path) = &args.write_config {
        return settings
            .save_to(path)
            .with_context(|| format!("writing settings to {}", path.display()));
    }

    let seed = settings.seed.unwrap_or_else(rand::random::<u64>);
    log::info!("Starting {:?} with seed {seed}", args.game);

    match args.headless {
        Some(ticks) => run_headless(args.game, seed, ticks, args.dump_frame),
        None => run_terminal(args.game, &settings, seed),
    }
}
