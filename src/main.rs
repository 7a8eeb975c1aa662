mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use alien_invasion::config::{DriverConfig, GameConfig, Level};
use alien_invasion::{GameState, GameStatus, InputSnapshot};

// ── Held-key model ────────────────────────────────────────────────────────────

/// Frames a press/repeat event keeps a key held.  Terminals without release
/// events re-send repeats at ≥ 15 Hz, so 4 frames (≈133 ms) never lapse
/// while the key is really down.
const HOLD_WINDOW: u64 = 4;

/// Frame number at which each key was last seen going down.
#[derive(Default)]
struct HeldKeys {
    last_seen: HashMap<KeyCode, u64>,
}

impl HeldKeys {
    fn press(&mut self, code: KeyCode, frame: u64) {
        self.last_seen.insert(normalise(code), frame);
    }

    fn release(&mut self, code: KeyCode) {
        self.last_seen.remove(&normalise(code));
    }

    fn held(&self, frame: u64, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| {
            self.last_seen
                .get(key)
                .is_some_and(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        })
    }

    /// Logical actions held at `frame`.
    fn snapshot(&self, frame: u64) -> InputSnapshot {
        InputSnapshot {
            move_left: self.held(frame, &[KeyCode::Left, KeyCode::Char('a')]),
            move_right: self.held(frame, &[KeyCode::Right, KeyCode::Char('d')]),
            fire: self.held(frame, &[KeyCode::Char(' ')]),
            pause: self.held(frame, &[KeyCode::Char('p')]),
            start: self.held(frame, &[KeyCode::Enter]),
            restart: self.held(frame, &[KeyCode::Char('r')]),
        }
    }
}

/// Letters are tracked lowercase so Caps Lock doesn't matter.
fn normalise(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to the file named by `INVADERS_LOG`; the terminal itself is taken by
/// the game, so logging is off when it is unset.
fn init_logging() -> anyhow::Result<()> {
    let Ok(path) = std::env::var("INVADERS_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(&path)
        .with_context(|| format!("cannot create log file {path}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Level),
    Quit,
}

/// Score table shown under the title, drawn with the in-game sprites.
const SCORE_TABLE: &[(&str, Color, &str)] = &[
    ("<=O=>", Color::Red, "= 100 pts  (saucer)"),
    ("{@}", Color::Magenta, "=  30 pts"),
    ("/M\\", Color::Cyan, "=  20 pts"),
    ("<W>", Color::Green, "=  10 pts"),
];

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    best_score: u32,
) -> std::io::Result<MenuResult> {
    let (width, height) = terminal::size()?;
    let left = (width / 2).saturating_sub(14);
    let mut row = (height / 2).saturating_sub(8);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(left, row))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print("A L I E N   I N V A S I O N"))?;
    row += 2;

    for (sprite, color, worth) in SCORE_TABLE {
        out.queue(cursor::MoveTo(left + 4, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:>5}", sprite)))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(format!("  {}", worth)))?;
        row += 1;
    }
    row += 1;

    out.queue(cursor::MoveTo(left, row))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Each kill speeds the march up."))?;
    out.queue(cursor::MoveTo(left, row + 1))?;
    out.queue(Print("Clear a wave: +1 life, next wave lands lower."))?;
    row += 3;

    if best_score > 0 {
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(format!("HI-SCORE {:06}", best_score)))?;
        row += 2;
    }

    out.queue(cursor::MoveTo(left, row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("1 easy   2 medium   3 hard   q quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = event else {
            continue;
        };
        let level = match normalise(code) {
            KeyCode::Char('1') => Level::Easy,
            KeyCode::Char('2') => Level::Medium,
            KeyCode::Char('3') => Level::Hard,
            KeyCode::Char('q') | KeyCode::Esc => return Ok(MenuResult::Quit),
            _ => continue,
        };
        return Ok(MenuResult::Start(level));
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Every frame, whatever [`HeldKeys`] still considers down becomes one
/// `InputSnapshot`, so Space + A/D work together.  Keyboard-enhanced
/// terminals send `Release` and drop a key at once; elsewhere it expires
/// after `HOLD_WINDOW` frames.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    level: Level,
    driver: &DriverConfig,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut keys = HeldKeys::default();
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    keys.press(code, frame);
                    match normalise(code) {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('m')
                            if matches!(state.status(), GameStatus::Paused | GameStatus::Lost) =>
                        {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => keys.press(code, frame),
                KeyEventKind::Release => keys.release(code),
            }
        }

        let input = keys.snapshot(frame);
        let time_step = driver.clamp_time_step(last_tick.elapsed());
        last_tick = Instant::now();

        state.handle_controls(&input);
        state.update(time_step, &input);

        let (width, height) = terminal::size()?;
        display::render(out, &state.view(), level, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < driver.frame {
            std::thread::sleep(driver.frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();
    init_logging()?;

    let driver = DriverConfig::load_or_default();
    driver.validate().context("invalid driver configuration")?;
    info!(
        "Alien Invasion v{} ({:?} frames, max step {}s)",
        env!("CARGO_PKG_VERSION"),
        driver.frame,
        driver.max_time_step
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("cannot enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
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

    let result = run(&mut out, &driver, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    driver: &DriverConfig,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    // Best score lives only as long as the process.
    let mut best_score = 0;

    loop {
        match show_menu(out, rx, best_score)? {
            MenuResult::Quit => break,
            MenuResult::Start(level) => {
                let config = GameConfig::for_level(level);
                let seed = driver.seed.unwrap_or_else(rand::random);
                info!(?level, seed, "starting game");

                let mut state = GameState::new(config, seed)?.with_best_score(best_score);
                let quit = game_loop(out, &mut state, level, driver, rx)
                    .context("terminal I/O failed")?;
                best_score = state.best_score();

                if quit {
                    break;
                }
            }
        }
    }
    Ok(())
}
