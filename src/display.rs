//! Rendering layer. All terminal I/O lives here.
//!
//! Each function receives a mutable writer and a read-only [`Snapshot`].
//! No game logic is performed; this module only translates the snapshot into
//! terminal commands.  The camera follows the player and maps world units to
//! character cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;
use survival_arena::compute::Snapshot;
use survival_arena::entities::{EnemyKind, GameStatus, ItemKind, Rgb};
use survival_arena::math::format_time;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HP: Color = Color::Red;
const C_HUD_EXP: Color = Color::Cyan;
const C_HUD_TEXT: Color = Color::White;
const C_HUD_PHASE: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_PLAYER_STAR: Color = Color::Yellow;
const C_BULLET_PLAYER: Color = Color::Yellow;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_DASHING: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// World units covered by one terminal column / row.  Cells are roughly
/// twice as tall as they are wide.
pub const CELL_W: f32 = 12.0;
pub const CELL_H: f32 = 24.0;

/// Rows above the play field (HUD + top border).
const TOP: u16 = 2;

pub fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Camera ────────────────────────────────────────────────────────────────────

/// Mapping between world coordinates and play-field cells for one frame.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    /// World position of the top-left play cell.
    origin: Vec2,
    cols: u16,
    rows: u16,
}

impl Viewport {
    /// Camera centred on `focus`, kept inside the world where it fits.
    pub fn new(focus: Vec2, world: Vec2, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2).max(1);
        let rows = height.saturating_sub(TOP + 2).max(1);
        let span = Vec2::new(cols as f32 * CELL_W, rows as f32 * CELL_H);
        let max = (world - span).max(Vec2::ZERO);
        Self {
            origin: (focus - span / 2.0).clamp(Vec2::ZERO, max),
            cols,
            rows,
        }
    }

    /// Terminal cell for a world point, if it is on screen.
    pub fn to_screen(&self, pos: Vec2) -> Option<(u16, u16)> {
        let rel = pos - self.origin;
        let col = (rel.x / CELL_W).floor();
        let row = (rel.y / CELL_H).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.rows as f32 {
            return None;
        }
        Some((col as u16 + 1, row as u16 + TOP))
    }

    /// World point at the centre of a terminal cell.
    pub fn to_world(&self, col: u16, row: u16) -> Vec2 {
        let col = col.saturating_sub(1) as f32 + 0.5;
        let row = row.saturating_sub(TOP) as f32 + 0.5;
        self.origin + Vec2::new(col * CELL_W, row * CELL_H)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    snap: &Snapshot<'_>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let view = Viewport::new(snap.player.pos, snap.world, width, height);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, snap, width)?;

    for p in snap.particles {
        let glyph = if p.life > p.max_life / 2.0 { "*" } else { "·" };
        put(out, &view, p.pos, rgb(p.color), glyph)?;
    }
    for orb in snap.orbs {
        put(out, &view, orb.pos, rgb(orb.color), "•")?;
    }
    for item in snap.items {
        let glyph = match item.kind {
            ItemKind::Heart => "♥",
            ItemKind::Star => "★",
            ItemKind::Bomb => "✸",
            ItemKind::Magnet => "U",
        };
        put(out, &view, item.pos, rgb(item.color), glyph)?;
    }
    for enemy in snap.enemies {
        let color = if enemy.dash.dashing { C_DASHING } else { rgb(enemy.color) };
        match enemy.kind {
            EnemyKind::Chaser => put(out, &view, enemy.pos, color, "o")?,
            EnemyKind::Dasher => put(out, &view, enemy.pos, color, "◆")?,
            EnemyKind::Tank => put(out, &view, enemy.pos, color, "■")?,
            EnemyKind::Shooter => put(out, &view, enemy.pos, color, "▲")?,
            EnemyKind::Boss => draw_boss(out, &view, enemy.pos, color)?,
        }
    }
    for b in snap.bullets {
        put(out, &view, b.pos, C_BULLET_PLAYER, "∙")?;
    }
    for b in snap.enemy_bullets {
        put(out, &view, b.pos, C_BULLET_ENEMY, "•")?;
    }

    draw_player(out, &view, snap)?;
    draw_controls_hint(out, height)?;

    match snap.status {
        GameStatus::LevelUp => draw_level_up(out, snap, width, height)?,
        GameStatus::Paused => draw_banner(
            out,
            width,
            height,
            &[("PAUSED", Color::Yellow), ("P - Resume", Color::White)],
        )?,
        GameStatus::Victory | GameStatus::Defeat => draw_game_over(out, snap, width, height)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn put<W: Write>(
    out: &mut W,
    view: &Viewport,
    pos: Vec2,
    color: Color,
    glyph: &str,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.to_screen(pos) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in TOP..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn bar(fraction: f32, cells: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * cells as f32).round() as usize).min(cells);
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
}

fn draw_hud<W: Write>(out: &mut W, snap: &Snapshot<'_>, width: u16) -> std::io::Result<()> {
    let p = snap.player;

    // Health and experience on the left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(format!(
        "HP {} {:>3.0}/{:<3.0}",
        bar(snap.health_fraction, 10),
        p.health.max(0.0),
        p.max_health
    )))?;
    out.queue(style::SetForegroundColor(C_HUD_TEXT))?;
    out.queue(Print(format!("  Lv.{:<2} ", snap.level)))?;
    out.queue(style::SetForegroundColor(C_HUD_EXP))?;
    out.queue(Print(bar(snap.exp_fraction, 10)))?;

    // Boss health, while the boss is alive
    if let Some(boss) = snap.enemies.iter().find(|e| e.kind == EnemyKind::Boss) {
        out.queue(style::SetForegroundColor(rgb(boss.color)))?;
        out.queue(Print(format!("  BOSS {}", bar(boss.health / boss.max_health, 12))))?;
    }

    // Phase, timer and kills on the right
    let right = format!(
        "{}  {}  Kills:{}",
        snap.phase_name,
        format_time(snap.remaining_time),
        snap.kills
    );
    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_PHASE))?;
    out.queue(Print(&right))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &Viewport, snap: &Snapshot<'_>) -> std::io::Result<()> {
    let p = snap.player;
    // Blink through the hit-invulnerability window
    if p.hit_invulnerable && (p.hit_invulnerable_timer * 10.0) as u32 % 2 == 1 {
        return Ok(());
    }
    let color = if p.item_invulnerable { C_PLAYER_STAR } else { C_PLAYER };
    let glyph = if p.moving { "@" } else { "☺" };
    put(out, view, p.pos, color, glyph)
}

fn draw_boss<W: Write>(
    out: &mut W,
    view: &Viewport,
    pos: Vec2,
    color: Color,
) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ╔☠╗
    //   ╚═╝
    if let Some((col, row)) = view.to_screen(pos) {
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
        out.queue(Print("╔☠╗"))?;
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row + 1))?;
        out.queue(Print("╚═╝"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Mouse / WASD : Move   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Centre a stack of coloured lines on the screen.
fn draw_banner<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_level_up<W: Write>(
    out: &mut W,
    snap: &Snapshot<'_>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let title = format!("★ LEVEL {} ★", snap.level);
    let choices: Vec<String> = snap
        .upgrade_choices
        .iter()
        .enumerate()
        .map(|(i, u)| format!("[{}] {:<18} {}", i + 1, u.name, u.description))
        .collect();

    let mut lines: Vec<(&str, Color)> = vec![(title.as_str(), Color::Yellow), ("", Color::White)];
    lines.extend(choices.iter().map(|c| (c.as_str(), Color::White)));
    lines.push(("", Color::White));
    lines.push(("Press a number to choose", Color::DarkGrey));
    draw_banner(out, width, height, &lines)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    snap: &Snapshot<'_>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let (title, title_color) = match snap.status {
        GameStatus::Victory => ("║      VICTORY!      ║", Color::Green),
        _ => ("║      DEFEAT...     ║", Color::Red),
    };
    let time_line = format!("Survived: {}", format_time(snap.game_time));
    let level_line = format!("Level:    {}", snap.level);
    let kills_line = format!("Kills:    {}", snap.kills);

    draw_banner(
        out,
        width,
        height,
        &[
            ("╔════════════════════╗", title_color),
            (title, title_color),
            ("╚════════════════════╝", title_color),
            (time_line.as_str(), Color::Yellow),
            (level_line.as_str(), Color::Yellow),
            (kills_line.as_str(), Color::Yellow),
            ("R - Play Again  Q - Quit", Color::White),
        ],
    )
}
