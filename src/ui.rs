//! Layout and drawing: columns, growing blocks, holding stack, stats, pause and game over.

use crate::app::{Screen, StatusKind, View};
use crate::game::GameState;
use crate::stack::{Column, STACK_COUNT, STACK_SIZE};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal cells per block, horizontally.
const BLOCK_W: u16 = 4;
/// Gap on each side of a column.
const COLUMN_PAD: u16 = 1;
/// Rows under the stacks: growing block, then key labels.
const FOOTER_ROWS: u16 = 2;
const SIDEBAR_WIDTH: u16 = 26;
/// Duration of the game-over fade (TachyonFX) in ms.
const GAME_OVER_FADE_MS: u32 = 600;

/// Eighth-block glyphs for the growing block, from barely started to almost in.
const GROWTH_GLYPHS: [&str; 8] = ["▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Key labels under each column: pickup / place.
const COLUMN_KEYS: [&str; STACK_COUNT] = ["s/j", "d/k", "f/l"];

fn column_stride() -> u16 {
    BLOCK_W + 2 * COLUMN_PAD
}

/// Playfield size in terminal cells, including its border.
fn playfield_size() -> (u16, u16) {
    (
        column_stride() * STACK_COUNT as u16 + 2,
        STACK_SIZE as u16 + FOOTER_ROWS + 2,
    )
}

/// Glyph for a growth fraction in `[0, 1)`.
fn growth_glyph(growth: f32) -> &'static str {
    let i = (growth.clamp(0.0, 0.999) * GROWTH_GLYPHS.len() as f32) as usize;
    GROWTH_GLYPHS[i]
}

/// Draw the whole screen. On game over the board fades out (unless animations are off).
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    view: &View<'_>,
    game_over_effect: &mut Option<Effect>,
    game_over_effect_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    let (pw, ph) = playfield_size();
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(pw + SIDEBAR_WIDTH),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    let (playfield_area, sidebar_area) = (inner[0], inner[1]);

    let faded = view.screen == Screen::GameOver
        && (view.no_animation || game_over_effect.as_ref().is_some_and(Effect::done));
    let board = draw_playfield(frame, state, theme, view, playfield_area, faded);
    draw_sidebar(frame, state, theme, view, sidebar_area);

    match view.screen {
        Screen::Playing => {
            if view.paused {
                draw_pause_overlay(frame, theme, playfield_area);
            }
        }
        Screen::GameOver => {
            if !view.no_animation && !faded {
                apply_game_over_effect(
                    frame,
                    theme,
                    board,
                    game_over_effect,
                    game_over_effect_time,
                    now,
                );
            }
            draw_game_over(frame, state, theme, view, playfield_area);
        }
    }
}

/// Create or advance the game-over fade over the board.
fn apply_game_over_effect(
    frame: &mut Frame,
    theme: &Theme,
    board: Rect,
    game_over_effect: &mut Option<Effect>,
    game_over_effect_time: &mut Option<Instant>,
    now: Instant,
) {
    let delta = game_over_effect_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *game_over_effect_time = Some(now);

    if game_over_effect.is_none() {
        let effect = fx::fade_to(
            theme.inactive_fg,
            theme.bg,
            (GAME_OVER_FADE_MS, Interpolation::Linear),
        )
        .with_area(board);
        *game_over_effect = Some(effect);
    }

    if let Some(effect) = game_over_effect {
        frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
    }
}

/// Draws the columns and returns the board rect (inside the border).
fn draw_playfield(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    view: &View<'_>,
    area: Rect,
    faded: bool,
) -> Rect {
    let title = format!(" Stackpop  | Level {} ", state.level());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, theme.title));
    let board = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    for y in board.top()..board.bottom() {
        for x in board.left()..board.right() {
            buf[(x, y)].set_symbol(" ").set_style(Style::default().bg(theme.bg));
        }
    }

    for (i, column) in state.columns().iter().enumerate() {
        let x0 = board.x + COLUMN_PAD + i as u16 * column_stride();
        if x0 + BLOCK_W > board.right() {
            break;
        }
        draw_column(frame, theme, column, board, x0, faded);

        let label_y = board.y + STACK_SIZE as u16 + 1;
        if label_y < board.bottom() {
            let style = if i == view.cursor && view.screen == Screen::Playing {
                Style::default()
                    .fg(theme.bg)
                    .bg(theme.title)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.inactive_fg).bg(theme.bg)
            };
            let label = format!("{:^width$}", COLUMN_KEYS[i], width = BLOCK_W as usize);
            frame.buffer_mut().set_string(x0, label_y, label, style);
        }
    }
    board
}

fn draw_column(frame: &mut Frame, theme: &Theme, column: &Column, board: Rect, x0: u16, faded: bool) {
    let buf = frame.buffer_mut();
    let cell_color = |c| if faded { theme.dimmed(c) } else { theme.block(c) };

    for j in 0..STACK_SIZE {
        let y = board.y + (STACK_SIZE - 1 - j) as u16;
        if y >= board.bottom() {
            continue;
        }
        let (symbol, style) = match column.stack.get(j) {
            Some(c) => ("█", Style::default().fg(cell_color(c)).bg(theme.bg)),
            None => ("·", Style::default().fg(theme.div_line).bg(theme.bg)),
        };
        for dx in 0..BLOCK_W {
            let sym = if column.stack.get(j).is_none() && dx != BLOCK_W / 2 {
                " "
            } else {
                symbol
            };
            buf[(x0 + dx, y)].set_symbol(sym).set_style(style);
        }
    }

    // Growing block sits just under the ground line.
    let grow_y = board.y + STACK_SIZE as u16;
    if grow_y < board.bottom() {
        let style = Style::default().fg(theme.dimmed(column.next)).bg(theme.bg);
        let glyph = growth_glyph(column.growth);
        for dx in 0..BLOCK_W {
            buf[(x0 + dx, grow_y)].set_symbol(glyph).set_style(style);
        }
    }
}

fn sidebar_block(theme: &Theme, title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(format!(" {title} "), Style::default().fg(theme.title)))
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, view: &View<'_>, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Stats
            Constraint::Length(3), // Goal gauge
            Constraint::Length(4), // Holding
            Constraint::Length(4), // Status + last pop
            Constraint::Fill(1),   // Keys
        ])
        .split(area);

    // --- Stats ---
    let stats = sidebar_block(theme, "Stats");
    let stats_inner = stats.inner(chunks[0]);
    stats.render(chunks[0], frame.buffer_mut());
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<7}"), title_style),
            Span::styled(value, fg_style),
        ])
    };
    let lines = vec![
        row("Score", state.score().to_string()),
        row("Best", view.best_score.to_string()),
        row("Level", state.level().to_string()),
        row("Goal", state.goal().to_string()),
        row("Speed", format!("{:.2}/s", state.speed())),
    ];
    Paragraph::new(ratatui::text::Text::from(lines)).render(stats_inner, frame.buffer_mut());

    // --- Goal gauge ---
    let goal = sidebar_block(theme, "Next level");
    let goal_inner = goal.inner(chunks[1]);
    goal.render(chunks[1], frame.buffer_mut());
    Gauge::default()
        .ratio(state.progression().goal_ratio())
        .gauge_style(Style::default().fg(theme.title).bg(theme.div_line))
        .render(goal_inner, frame.buffer_mut());

    // --- Holding (ground on the left, top on the right) ---
    let holding = state.holding();
    let hold = sidebar_block(
        theme,
        &format!("Holding {}/{}", holding.height(), holding.capacity()),
    );
    let hold_inner = hold.inner(chunks[2]);
    hold.render(chunks[2], frame.buffer_mut());
    let mut spans: Vec<Span> = holding
        .blocks()
        .map(|c| Span::styled("█", Style::default().fg(theme.block(c))))
        .collect();
    match holding.top() {
        Some(top) => spans.push(Span::styled(
            format!(" ◂ {}", top.name()),
            Style::default().fg(theme.inactive_fg),
        )),
        None => spans.push(Span::styled("empty", Style::default().fg(theme.inactive_fg))),
    }
    Paragraph::new(Line::from(spans)).render(hold_inner, frame.buffer_mut());

    // --- Status ---
    let status = sidebar_block(theme, "Status");
    let status_inner = status.inner(chunks[3]);
    status.render(chunks[3], frame.buffer_mut());
    let mut status_lines = Vec::new();
    status_lines.push(match view.status {
        Some(s) => {
            let color = match s.kind {
                StatusKind::Good => Color::Green,
                StatusKind::Bad => Color::Red,
                StatusKind::LevelUp => Color::Yellow,
            };
            Line::from(Span::styled(
                s.text.as_str(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(""),
    });
    if let Some(report) = state.last_pop() {
        status_lines.push(Line::from(Span::styled(
            format!(
                "last: {} run{}, {} blocks",
                report.runs.len(),
                if report.runs.len() == 1 { "" } else { "s" },
                report.blocks
            ),
            Style::default().fg(theme.inactive_fg),
        )));
    }
    Paragraph::new(status_lines).render(status_inner, frame.buffer_mut());

    // --- Keys ---
    let hint = Style::default().fg(theme.inactive_fg);
    let keys = vec![
        Line::from(Span::styled(" sdf pick  jkl place", hint)),
        Line::from(Span::styled(" Space pop  P pause", hint)),
    ];
    Paragraph::new(keys).render(chunks[4], frame.buffer_mut());
}

fn centered(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 22, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P Resume  Q Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .style(Style::default().bg(theme.bg))
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, view: &View<'_>, area: Rect) {
    let popup = centered(area, 22, 9);
    let fg = Style::default().fg(theme.main_fg);
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", state.score()), fg)),
        Line::from(Span::styled(format!(" Level: {} ", state.level()), fg)),
    ];
    if state.score() > 0 && state.score() >= view.best_score {
        lines.push(Line::from(Span::styled(
            " Best this run! ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(Span::styled(" R Restart  Q Quit ", fg)));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .style(Style::default().bg(theme.bg))
        .render(popup, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_glyph_bounds() {
        assert_eq!(growth_glyph(0.0), "▁");
        assert_eq!(growth_glyph(0.5), "▅");
        assert_eq!(growth_glyph(0.9999), "█");
        assert_eq!(growth_glyph(1.5), "█");
    }

    #[test]
    fn test_playfield_fits_stacks() {
        let (w, h) = playfield_size();
        assert_eq!(w, STACK_COUNT as u16 * (BLOCK_W + 2 * COLUMN_PAD) + 2);
        assert_eq!(h, STACK_SIZE as u16 + FOOTER_ROWS + 2);
    }
}
