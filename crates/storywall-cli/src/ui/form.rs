//! Submission form: field rows, the place suggestion list and photo state.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use storywall_core::entry::{Coords, MESSAGE_MAX_CHARS};

use super::Palette;
use crate::app::{App, Focus};

/// Render the form into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(area);

  draw_fields(f, cols[0], app, palette);
  draw_side(f, cols[1], app, palette);
}

/// Current text and a right-hand note for a field.
fn field_value(app: &App, focus: Focus) -> (String, String) {
  let draft = &app.state.draft;
  let resolved = |coords: Option<Coords>| {
    coords.map_or_else(String::new, |c| format!("{:.2}, {:.2}", c.lat, c.lng))
  };
  match focus {
    Focus::Name => (draft.name.clone(), String::new()),
    Focus::BirthName => (draft.birth_name.clone(), "optional".into()),
    Focus::From => (draft.from.clone(), resolved(draft.from_coords)),
    Focus::Now => (draft.now.clone(), resolved(draft.now_coords)),
    Focus::Message => (
      draft.message.clone(),
      format!("{}/{MESSAGE_MAX_CHARS}", draft.message.chars().count()),
    ),
    Focus::Photo => {
      let note = if draft.photo.is_some() {
        "attached"
      } else if app.state.photo_preview.is_some() {
        "preview"
      } else {
        "required"
      };
      (app.photo_path.clone(), note.into())
    }
  }
}

// ─── Fields ───────────────────────────────────────────────────────────────────

fn draw_fields(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let block = Block::default()
    .title(" Share your story ")
    .borders(Borders::ALL)
    .border_style(palette.border());
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = Vec::new();
  for focus in Focus::ALL {
    let (value, note) = field_value(app, focus);
    let focused = app.focus == focus;
    let label_style = if focused {
      palette.selected()
    } else {
      Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
    };
    let cursor = if focused { "_" } else { "" };

    lines.push(Line::from(vec![
      Span::styled(format!(" {:<11}", focus.label()), label_style),
      Span::raw(" "),
      Span::styled(format!("{value}{cursor}"), Style::default().fg(palette.fg)),
      Span::styled(
        if note.is_empty() { String::new() } else { format!("  ({note})") },
        palette.dim(),
      ),
    ]));
    lines.push(Line::from(""));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ─── Suggestions / help ───────────────────────────────────────────────────────

fn draw_side(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let suggestions = app.focused_suggestions();
  if let Some(field) = app.focus.place_field()
    && !suggestions.is_empty()
  {
    let block = Block::default()
      .title(format!(" Places for \"{field}\" "))
      .borders(Borders::ALL)
      .border_style(palette.border());
    let items: Vec<ListItem> = suggestions
      .iter()
      .map(|c| ListItem::new(c.display_name.clone()))
      .collect();
    let mut state = ListState::default();
    state.select(Some(app.suggestion_cursor));
    f.render_stateful_widget(
      List::new(items)
        .block(block)
        .highlight_style(palette.selected()),
      area,
      &mut state,
    );
    return;
  }

  let block = Block::default()
    .title(" How it works ")
    .borders(Borders::ALL)
    .border_style(palette.border());
  let help = vec![
    Line::from("Type a place in From or Now and pick"),
    Line::from("a match with ↑↓ and Enter."),
    Line::from(""),
    Line::from("Type a JPEG or PNG path in Photo file,"),
    Line::from("press Enter to preview and Enter again"),
    Line::from("to attach it."),
    Line::from(""),
    Line::from("Ctrl-S sends your story for review."),
  ];
  f.render_widget(
    Paragraph::new(help).block(block).style(palette.dim()),
    area,
  );
}
