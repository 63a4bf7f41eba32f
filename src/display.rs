/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session.  No game logic is performed; this module only scales the
/// 800×700 play field onto the terminal grid and translates state into
/// terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use alien_invaders::config::{GAME_HEIGHT, GAME_WIDTH};
use alien_invaders::entities::{Bolt, BoltOwner};
use alien_invaders::session::{GameSession, State};
use alien_invaders::wave::Wave;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_SHIP: Color = Color::White;
const C_ALIEN_TIERS: [Color; 3] = [Color::Green, Color::Cyan, Color::Magenta];
const C_BOLT_PLAYER: Color = Color::Cyan;
const C_BOLT_ALIEN: Color = Color::Red;
const C_DLINE: Color = Color::DarkGrey;
const C_TEXT: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

const ALIEN_SPRITES: [&str; 3] = ["@", "#", "*"];

// ── Coordinate mapping ────────────────────────────────────────────────────────

/// Game x (0..GAME_WIDTH, left to right) → terminal column inside the border.
fn cell_x(x: f32, width: u16) -> u16 {
    let usable = width.saturating_sub(2) as f32;
    (1.0 + x / GAME_WIDTH * usable).round() as u16
}

/// Game y (0..GAME_HEIGHT, bottom to top) → terminal row inside the border.
fn cell_y(y: f32, height: u16) -> u16 {
    let top = 2.0;
    let bottom = height.saturating_sub(3) as f32;
    (bottom - y / GAME_HEIGHT * (bottom - top)).round() as u16
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    session: &GameSession,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;

    match session.state {
        State::Inactive => draw_start_prompt(out, width, height)?,
        State::NewWave | State::Active | State::Continue => {
            if let Some(wave) = &session.wave {
                draw_wave(out, wave, width, height)?;
            }
            draw_hud(out, session, width)?;
        }
        State::PlayerPaused => {
            if let Some(wave) = &session.wave {
                draw_wave(out, wave, width, height)?;
            }
            draw_message(
                out,
                width,
                height,
                &["You paused the game", "", "Press S to continue"],
            )?;
        }
        State::Paused => {
            if let Some(wave) = &session.wave {
                draw_wave(out, wave, width, height)?;
            }
            draw_message(
                out,
                width,
                height,
                &["Aliens hit your ship", "", "One life lost", "", "Press S to continue"],
            )?;
        }
        State::Complete => draw_complete(out, session, width, height)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &GameSession, width: u16) -> std::io::Result<()> {
    let lives = session.wave.as_ref().map_or(0, Wave::lives);
    let sound = if session.sound_enabled { "ON" } else { "OFF" };

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("Score: {:>6}", session.score)))?;

    let mid = format!("Level: {}   Lives: {}", session.level, lives);
    let mx = (width / 2).saturating_sub(mid.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(mx, 0))?;
    out.queue(Print(&mid))?;

    let right = format!("Sound: {}", sound);
    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(Print(&right))?;

    Ok(())
}

// ── Wave scene ────────────────────────────────────────────────────────────────

fn draw_wave<W: Write>(out: &mut W, wave: &Wave, width: u16, height: u16) -> std::io::Result<()> {
    // Defense line
    let dy = cell_y(wave.dline.y, height);
    out.queue(cursor::MoveTo(1, dy))?;
    out.queue(style::SetForegroundColor(C_DLINE))?;
    out.queue(Print("╌".repeat(width.saturating_sub(2) as usize)))?;

    // Alien grid
    for alien in wave.grid.iter().flatten().flatten() {
        let tier = alien.tier % ALIEN_SPRITES.len();
        out.queue(cursor::MoveTo(
            cell_x(alien.body.x, width),
            cell_y(alien.body.y, height),
        ))?;
        out.queue(style::SetForegroundColor(C_ALIEN_TIERS[tier]))?;
        out.queue(Print(ALIEN_SPRITES[tier]))?;
    }

    // Bolts
    for bolt in &wave.bolts {
        draw_bolt(out, bolt, width, height)?;
    }

    // Ship
    if let Some(ship) = &wave.ship {
        out.queue(cursor::MoveTo(
            cell_x(ship.body.x, width),
            cell_y(ship.body.y, height),
        ))?;
        out.queue(style::SetForegroundColor(C_SHIP))?;
        out.queue(Print("▲"))?;
    }

    Ok(())
}

fn draw_bolt<W: Write>(out: &mut W, bolt: &Bolt, width: u16, height: u16) -> std::io::Result<()> {
    let (color, glyph) = match bolt.owner {
        BoltOwner::Player => (C_BOLT_PLAYER, "|"),
        BoltOwner::Alien => (C_BOLT_ALIEN, "!"),
    };
    out.queue(cursor::MoveTo(
        cell_x(bolt.body.x, width),
        cell_y(bolt.body.y, height),
    ))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Full-screen messages ──────────────────────────────────────────────────────

fn draw_message<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    lines: &[&str],
) -> std::io::Result<()> {
    let cx = width / 2;
    let top = (height / 2).saturating_sub(lines.len() as u16 / 2);

    out.queue(style::SetForegroundColor(C_TEXT))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(line.chars().count() as u16 / 2),
            top + i as u16,
        ))?;
        out.queue(Print(*line))?;
    }
    Ok(())
}

fn draw_start_prompt<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    draw_message(out, width, height, &["★  ALIEN  INVADERS  ★", "", "Press S to start"])?;

    out.queue(cursor::MoveTo(
        (width / 2).saturating_sub(24),
        height / 2 + 3,
    ))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → : Move   SPACE : Fire   P : Pause   X : Sound"))?;
    Ok(())
}

fn draw_complete<W: Write>(
    out: &mut W,
    session: &GameSession,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cleared = session.wave.as_ref().is_some_and(Wave::all_cleared);
    if cleared {
        let headline = format!("Level {} completed", session.level);
        draw_message(
            out,
            width,
            height,
            &[&headline, "", "Press S to advance to the next level"],
        )
    } else {
        let total = format!("Total score: {}", session.score);
        draw_message(out, width, height, &["You lost the game", "", &total])
    }
}
