mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::Print,
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use alien_invaders::audio::SoundQueue;
use alien_invaders::config::Config;
use alien_invaders::session::{new_session, update, InputFrame};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Build one frame's input sample from the held-key map.  The core sees a
/// polled `is_key_down` view of the keyboard: a held key reads true every
/// frame until it expires or a release event removes it.
fn sample_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputFrame {
    InputFrame {
        left: is_held(key_frame, &KeyCode::Left, frame)
            || is_held(key_frame, &KeyCode::Char('a'), frame),
        right: is_held(key_frame, &KeyCode::Right, frame)
            || is_held(key_frame, &KeyCode::Char('d'), frame),
        fire: is_held(key_frame, &KeyCode::Char(' '), frame),
        pause: is_held(key_frame, &KeyCode::Char('p'), frame),
        start: is_held(key_frame, &KeyCode::Char('s'), frame),
        sound_toggle: is_held(key_frame, &KeyCode::Char('x'), frame),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: instead of acting on each key event individually, we
/// maintain a `key_frame` map that records the frame number of the last
/// press/repeat event for every key.  Each frame we sample which keys are
/// still "fresh" (within `HOLD_WINDOW` frames) into an `InputFrame` and
/// hand that to the session update.  This allows Space + A/D to be held at
/// the same time with no interference, and works both on
/// keyboard-enhancement terminals (proper release events) and on classic
/// terminals (keys expire after `HOLD_WINDOW` frames of repeat silence).
fn game_loop<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut session = new_session(Config::from_args(std::env::args().skip(1)));
    let mut sfx = SoundQueue::new(false);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
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
            }
        }

        // ── Advance the simulation by one frame ───────────────────────────────
        let input = sample_input(&key_frame, frame);
        let dt = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();

        session = update(&session, &input, dt, &mut rng, &mut sfx);

        // Fire-and-forget audio: the terminal bell is the whole backend.
        if !sfx.drain().is_empty() {
            out.queue(Print("\x07"))?;
        }

        let (width, height) = terminal::size()?;
        display::render(out, &session, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
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
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
