//! TUI rendering: orchestrates all panes.

pub mod form;
pub mod gallery;
pub mod map;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};
use storywall_core::state::{Theme, View};

use crate::app::App;

// ─── Palette ──────────────────────────────────────────────────────────────────

/// Colours for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
  pub bg:        Color,
  pub fg:        Color,
  pub muted:     Color,
  pub accent:    Color,
  pub highlight: Color,
  pub bar:       Color,
}

impl Palette {
  pub fn for_theme(theme: Theme) -> Self {
    match theme {
      Theme::Light => Self {
        bg:        Color::White,
        fg:        Color::Black,
        muted:     Color::Gray,
        accent:    Color::Red,
        highlight: Color::LightBlue,
        bar:       Color::Gray,
      },
      Theme::Dark => Self {
        bg:        Color::Black,
        fg:        Color::White,
        muted:     Color::DarkGray,
        accent:    Color::Yellow,
        highlight: Color::Blue,
        bar:       Color::DarkGray,
      },
    }
  }

  pub fn text(&self) -> Style { Style::default().fg(self.fg).bg(self.bg) }

  pub fn dim(&self) -> Style { Style::default().fg(self.muted) }

  pub fn border(&self) -> Style { Style::default().fg(self.muted) }

  pub fn selected(&self) -> Style {
    Style::default()
      .bg(self.highlight)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD)
  }
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let palette = Palette::for_theme(app.state.theme);
  let area = f.area();
  f.render_widget(Block::default().style(palette.text()), area);

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app, &palette);
  match app.state.view {
    View::Map => map::draw(f, rows[1], app, &palette),
    View::Gallery => gallery::draw(f, rows[1], app, &palette),
    View::Form => form::draw(f, rows[1], app, &palette),
  }
  draw_status(f, rows[2], app, &palette);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let mut spans = vec![Span::styled(
    " storywall ",
    Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
  )];
  for (key, view) in [("F1", View::Map), ("F2", View::Gallery), ("F3", View::Form)] {
    let style = if app.state.view == view {
      palette.selected()
    } else {
      Style::default().fg(palette.fg)
    };
    spans.push(Span::styled(format!(" {key} {view} "), style));
  }

  let left_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
  let right = Span::styled(
    format!("{} theme  {date} ", app.state.theme),
    Style::default().fg(palette.fg),
  );
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right.content.chars().count());
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(right);

  f.render_widget(
    Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bar)),
    area,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let (mode_label, hints) = match app.state.view {
    View::Gallery if app.filter_active => ("SEARCH", "Type to filter  Esc cancel  Enter keep"),
    View::Map => ("MAP", "1/2/3 views  t theme  q quit"),
    View::Gallery => ("GALLERY", "↑↓/jk move  / search  1/2/3 views  t theme  q quit"),
    View::Form => (
      "FORM",
      "Tab next  ↑↓ suggestions  Enter choose  Ctrl-S submit  Esc back",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), palette.dim()),
  ]);
  f.render_widget(Paragraph::new(line).style(Style::default().bg(palette.bg)), area);
}
