//! Terminal front-end for the survival arena.
//!
//! Controls:
//! - Mouse: steer toward the pointer
//! - WASD / arrows: steer with the keyboard
//! - P: pause / resume
//! - 1-3: pick an upgrade on level-up
//! - R: play again after the match ends
//! - Q / Esc: quit

mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use survival_arena::compute::{choose_upgrade, init_state, snapshot, tick, toggle_pause};
use survival_arena::config::GameConfig;
use survival_arena::entities::{EnemyKind, GameEvent, GameState, GameStatus};
use survival_arena::player::FrameInput;

use display::Viewport;

#[derive(Parser)]
#[command(name = "survival_arena")]
#[command(author, version, about = "Survive five minutes against escalating waves")]
struct Args {
    /// TOML file overriding the built-in balance tables
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Seed for the match RNG (random if omitted)
    #[arg(long, short = 's')]
    seed: Option<u64>,

    /// Write tracing output to this file (the terminal is busy drawing)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Distance of the synthetic steering target used for keyboard movement.
const KEY_STEER_DISTANCE: f32 = 1000.0;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

/// Sum of the held direction keys, not normalised.
fn held_direction(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if is_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame) {
        dir.x -= 1.0;
    }
    if is_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame) {
        dir.x += 1.0;
    }
    if is_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame) {
        dir.y -= 1.0;
    }
    if is_held(key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame) {
        dir.y += 1.0;
    }
    dir
}

/// Terminal stand-in for the audio layer: ring the bell on the big moments.
fn play_cues<W: Write>(out: &mut W, events: &[GameEvent]) -> std::io::Result<()> {
    let ring = events.iter().any(|e| {
        matches!(
            e,
            GameEvent::LevelUp { .. }
                | GameEvent::BossSpawned
                | GameEvent::Victory
                | GameEvent::Defeat
        )
    });
    if ring {
        out.queue(Print('\u{7}'))?;
    }
    Ok(())
}

fn now_ms(epoch: Instant) -> f64 {
    epoch.elapsed().as_secs_f64() * 1000.0
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;
    let left = cx.saturating_sub(16);

    let title = "☠  SURVIVAL  ARENA  ☠";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(9),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let goal = format!(
        "Survive {} minutes. The boss arrives near the end.",
        (config.match_duration() / 60.0).round()
    );
    out.queue(cursor::MoveTo(
        cx.saturating_sub(goal.chars().count() as u16 / 2),
        cy.saturating_sub(8),
    ))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&goal))?;

    // Enemy legend
    out.queue(cursor::MoveTo(left, cy.saturating_sub(6)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Enemies:"))?;

    let enemies: &[(&str, EnemyKind, &str)] = &[
        ("o", EnemyKind::Chaser, " Chaser  - walks straight at you"),
        ("◆", EnemyKind::Dasher, " Dasher  - charges in bursts"),
        ("■", EnemyKind::Tank, " Tank    - slow, soaks damage"),
        ("▲", EnemyKind::Shooter, " Shooter - keeps range and fires"),
        ("☠", EnemyKind::Boss, " Boss    - fan volleys and charges"),
    ];
    for (i, (sym, kind, desc)) in enemies.iter().enumerate() {
        let row = cy.saturating_sub(5) + i as u16;
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(display::rgb(config.enemies.get(*kind).color)))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    // Item legend
    out.queue(cursor::MoveTo(left, cy + 1))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Items (walk over them):"))?;

    let items: &[(&str, Color, &str)] = &[
        ("♥", Color::Red, " Heart  - restore health"),
        ("★", Color::Yellow, " Star   - brief invulnerability"),
        ("✸", Color::DarkYellow, " Bomb   - clear the field"),
        ("U", Color::Cyan, " Magnet - pull in every orb"),
    ];
    for (i, (sym, color, desc)) in items.iter().enumerate() {
        let row = cy + 2 + i as u16;
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    out.queue(cursor::MoveTo(left, cy + 7))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("[ENTER] Start    [Q] Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) => match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(_) => {}
            // Input thread gone: nothing can start a match any more
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum Outcome {
    Quit,
    Restart,
}

/// Runs one match until the player quits or asks for a rematch.
///
/// Keyboard input uses a `key_frame` map recording the frame of the last
/// press/repeat event for every key; every frame the still-fresh direction
/// keys are summed into a steering target.  Pointer motion steers toward the
/// world point under the cursor until a direction key is pressed again.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    epoch: Instant,
    rng: &mut StdRng,
) -> std::io::Result<Outcome> {
    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut pointer: Option<Vec2> = None;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let now = now_ms(epoch);
        let (width, height) = terminal::size()?;
        let view = Viewport::new(state.player.pos, state.world_size(), width, height);

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    // Press: record key + handle one-shot actions
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(Outcome::Quit);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(Outcome::Quit);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') if state.status.is_over() => {
                                return Ok(Outcome::Restart);
                            }
                            KeyCode::Char('p') | KeyCode::Char('P') => {
                                *state = toggle_pause(state, now);
                            }
                            KeyCode::Char(c @ '1'..='9') if state.status == GameStatus::LevelUp => {
                                let index = (c as usize) - ('1' as usize);
                                let offered = state.upgrade_choices.get(index);
                                if let Some(id) = offered.map(|u| u.id.clone()) {
                                    *state = choose_upgrade(state, &id, now, rng);
                                    play_cues(out, &state.events)?;
                                }
                            }
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Moved | MouseEventKind::Drag(_),
                    column,
                    row,
                    ..
                }) => {
                    pointer = Some(view.to_world(column, row));
                }
                _ => {}
            }
        }

        // ── Steering input ────────────────────────────────────────────────────
        let keys = held_direction(&key_frame, frame);
        let input = if keys != Vec2::ZERO {
            pointer = None;
            FrameInput::toward(state.player.pos + keys.normalize() * KEY_STEER_DISTANCE)
        } else if let Some(target) = pointer {
            FrameInput::toward(target)
        } else {
            FrameInput::idle()
        };

        *state = tick(state, &input, now, rng);
        play_cues(out, &state.events)?;

        display::render(out, &snapshot(state), width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    // Without a log file the terminal belongs to the renderer; stay silent.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.validate().context("invalid game configuration")?;
    let config = Arc::new(config);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(seed = ?args.seed, "starting survival arena");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, config, &mut rng);

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

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: Arc<GameConfig>,
    rng: &mut StdRng,
) -> Result<()> {
    let epoch = Instant::now();

    loop {
        match show_menu(out, rx, &config)? {
            MenuResult::Quit => break,
            MenuResult::Start => loop {
                let mut state = init_state(Arc::clone(&config), now_ms(epoch))?;
                let outcome = game_loop(out, &mut state, rx, epoch, rng)?;
                info!(
                    status = ?state.status,
                    level = state.player.level,
                    kills = state.kills,
                    survived = state.game_time,
                    "match finished"
                );
                match outcome {
                    Outcome::Quit => return Ok(()),
                    Outcome::Restart => continue,
                }
            },
        }
    }
    Ok(())
}
