/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and a read-only `GameView`.  No
/// game logic is performed; this module only maps percentage space onto
/// terminal cells and queues drawing commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use alien_invasion::alien::{AlienSet, Cell};
use alien_invasion::boss::{Boss, BossStatus};
use alien_invasion::bullet::Bullet;
use alien_invasion::config::Level;
use alien_invasion::gun::Owner;
use alien_invasion::layout::AlienKind;
use alien_invasion::player::PlayerStatus;
use alien_invasion::vector::Vector;
use alien_invasion::wall::Wall;
use alien_invasion::{GameStatus, GameView};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_SQUID: Color = Color::Magenta;
const C_CRAB: Color = Color::Cyan;
const C_OCTOPUS: Color = Color::Green;
const C_EXPLOSION: Color = Color::Yellow;
const C_BOSS: Color = Color::Red;
const C_WALL: Color = Color::DarkGreen;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ALIEN: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

// ── Screen mapping ────────────────────────────────────────────────────────────

/// Terminal rectangle inside the border that percentage space is mapped onto.
#[derive(Clone, Copy)]
struct PlayArea {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
}

impl PlayArea {
    fn new(width: u16, height: u16) -> Self {
        Self {
            left: 1,
            top: 2,
            width: width.saturating_sub(2),
            height: height.saturating_sub(4),
        }
    }

    /// Terminal cell for a percentage-space point, or `None` when off-screen.
    fn cell(&self, at: Vector) -> Option<(u16, u16)> {
        if !(0.0..100.0).contains(&at.x) || !(0.0..100.0).contains(&at.y) {
            return None;
        }
        let col = self.left + (at.x / 100.0 * self.width as f32) as u16;
        let row = self.top + (at.y / 100.0 * self.height as f32) as u16;
        Some((col, row))
    }

    /// Terminal cell for the horizontal centre of a box, starting `half` cells
    /// to the left so a sprite of width `2 * half + 1` is centred on it.
    fn centred(&self, at: Vector, box_w: f32, half: u16) -> Option<(u16, u16)> {
        let (col, row) = self.cell(Vector::new(at.x + box_w / 2.0, at.y))?;
        Some((col.saturating_sub(half).max(self.left), row))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    view: &GameView<'_>,
    level: Level,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let area = PlayArea::new(width, height);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, view, level, width)?;

    for wall in view.walls {
        draw_wall(out, &area, wall)?;
    }
    draw_aliens(out, &area, view.alien_set)?;
    if let Some(boss) = view.boss {
        draw_boss(out, &area, boss)?;
    }
    for bullet in view.bullets {
        draw_bullet(out, &area, bullet)?;
    }
    draw_player(out, &area, view)?;
    draw_controls_hint(out, height)?;

    match view.status {
        GameStatus::Start => draw_banner(out, width, height, &[("PRESS ENTER TO START", Color::White)])?,
        GameStatus::Paused => draw_banner(
            out,
            width,
            height,
            &[("PAUSED", Color::Yellow), ("P - Resume  R - Restart  M - Menu", Color::White)],
        )?,
        GameStatus::Lost => draw_game_over(out, view, width, height)?,
        GameStatus::Running => {}
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

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    view: &GameView<'_>,
    level: Level,
    width: u16,
) -> std::io::Result<()> {
    // Score and best — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>6}  Hi:{:>6}",
        view.player.score(),
        view.best_score
    )))?;

    // Level and wave — centre
    let level_str = match level {
        Level::Easy => "EASY",
        Level::Medium => "MEDIUM",
        Level::Hard => "HARD",
    };
    let level_color = match level {
        Level::Easy => Color::Green,
        Level::Medium => Color::Yellow,
        Level::Hard => Color::Red,
    };
    let centre = format!("[ {} · WAVE {} ]", level_str, view.wave + 1);
    let lx = (width / 2).saturating_sub(centre.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(level_color))?;
    out.queue(Print(&centre))?;

    // Lives — right
    let hearts: String = "♥".repeat(view.player.lives() as usize);
    let lives_text = format!("Lives: {}", hearts);
    let rx = width.saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, area: &PlayArea, view: &GameView<'_>) -> std::io::Result<()> {
    let player = view.player;
    let sprite = match player.status() {
        PlayerStatus::Alive => "/▲\\",
        PlayerStatus::Exploding => "*X*",
        // Blink while invulnerable.
        PlayerStatus::Reviving if (player.status_timer() * 8.0) as u32 % 2 == 1 => return Ok(()),
        PlayerStatus::Reviving => "/▲\\",
    };
    let Some((col, row)) = area.centred(player.position(), player.size().w, 1) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(sprite))?;
    Ok(())
}

fn draw_aliens<W: Write>(out: &mut W, area: &PlayArea, set: &AlienSet) -> std::io::Result<()> {
    let size = set.alien_size();
    for (row, column, cell) in set.cells() {
        let (sprite, color) = match cell {
            Cell::Alien(alien) => match alien.kind() {
                AlienKind::Squid => ("{@}", C_SQUID),
                AlienKind::Crab => ("/M\\", C_CRAB),
                AlienKind::Octopus => ("<W>", C_OCTOPUS),
            },
            Cell::Exploding => ("*#*", C_EXPLOSION),
            Cell::Empty => continue,
        };
        let Some((col, line)) = area.centred(set.alien_position(row, column), size.w, 1) else {
            continue;
        };
        out.queue(cursor::MoveTo(col, line))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(sprite))?;
    }
    Ok(())
}

fn draw_boss<W: Write>(out: &mut W, area: &PlayArea, boss: &Boss) -> std::io::Result<()> {
    let (sprite, color) = match boss.status() {
        BossStatus::Alive => ("<=O=>", C_BOSS),
        BossStatus::Exploding => ("\\*!*/", C_EXPLOSION),
        BossStatus::Dead => return Ok(()),
    };
    if let Some((col, row)) = area.centred(boss.position(), boss.size().w, 2) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(sprite))?;
    }
    Ok(())
}

fn draw_wall<W: Write>(out: &mut W, area: &PlayArea, wall: &Wall) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_WALL))?;
    for (row, column, solid) in wall.pieces() {
        if !*solid {
            continue;
        }
        if let Some((col, line)) = area.cell(wall.piece_position(row, column)) {
            out.queue(cursor::MoveTo(col, line))?;
            out.queue(Print("█"))?;
        }
    }
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, area: &PlayArea, bullet: &Bullet) -> std::io::Result<()> {
    let Some((col, row)) = area.cell(bullet.position()) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    match bullet.owner() {
        Owner::Player => {
            out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
            out.queue(Print("║"))?;
        }
        Owner::Alien => {
            out.queue(style::SetForegroundColor(C_BULLET_ALIEN))?;
            out.queue(Print("↓"))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    view: &GameView<'_>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", view.player.score());
    let tally_line = format!(
        "Aliens: {}   Bosses: {}",
        view.aliens_killed, view.bosses_killed
    );
    draw_banner(
        out,
        width,
        height,
        &[
            ("╔══════════════════╗", Color::Red),
            ("║    GAME  OVER    ║", Color::Red),
            ("╚══════════════════╝", Color::Red),
            (score_line.as_str(), Color::Yellow),
            (tally_line.as_str(), Color::Yellow),
            ("R - Play Again  M - Menu  Q - Quit", Color::White),
        ],
    )
}
