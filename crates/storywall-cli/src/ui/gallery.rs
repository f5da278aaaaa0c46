//! Gallery view: every story, pinned or not, as a list with a detail pane.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use storywall_core::entry::Entry;

use super::Palette;
use crate::app::App;

/// Render the gallery into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(area);

  draw_list(f, cols[0], app, palette);
  draw_detail(f, cols[1], app.cursor_entry(), palette);
}

// ─── List ─────────────────────────────────────────────────────────────────────

fn draw_list(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let filtered = app.filtered_entries();
  let total = app.state.entries.len();

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Stories ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Stories ({total}) ")
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(palette.border());

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|entry| {
      let pin = if entry.map_position().is_some() { "● " } else { "○ " };
      ListItem::new(Line::from(vec![
        Span::styled(pin, Style::default().fg(palette.accent)),
        Span::raw(entry.name.clone()),
        Span::styled(format!("  {}", entry.journey()), palette.dim()),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Filter bar on the last line of the pane.
  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(palette.accent)),
      filter_area,
    );
  }

  if items.is_empty() {
    let hint = if app.is_loading() {
      "Loading stories…"
    } else {
      "No stories to show."
    };
    f.render_widget(Paragraph::new(hint).style(palette.dim()), inner_area);
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.gallery_cursor));
  f.render_stateful_widget(
    List::new(items).highlight_style(palette.selected()),
    inner_area,
    &mut state,
  );
}

// ─── Detail ───────────────────────────────────────────────────────────────────

fn draw_detail(f: &mut Frame, area: Rect, entry: Option<&Entry>, palette: &Palette) {
  let title = entry.map_or(" Story ".to_string(), |e| format!(" {} ", e.name));
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(palette.border());
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(entry) = entry else {
    f.render_widget(
      Paragraph::new("Select a story to read it.").style(palette.dim()),
      inner,
    );
    return;
  };

  let label = |text: &'static str| {
    Span::styled(
      format!("{text:<12}"),
      Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
    )
  };

  let mut lines = Vec::new();
  if let Some(birth_name) = &entry.birth_name {
    lines.push(Line::from(vec![label("born as"), Span::raw(birth_name.clone())]));
  }
  lines.push(Line::from(vec![label("from"), Span::raw(entry.from.clone())]));
  lines.push(Line::from(vec![label("now"), Span::raw(entry.now.clone())]));
  lines.push(Line::from(vec![
    label("on the map"),
    match entry.map_position() {
      Some(c) => Span::raw(format!("{:.3}, {:.3}", c.lat, c.lng)),
      None => Span::styled("not pinned", palette.dim()),
    },
  ]));
  lines.push(Line::from(vec![
    label("photo"),
    match &entry.photo {
      Some(photo) if photo.starts_with("data:") => Span::raw("attached"),
      Some(photo) => Span::raw(photo.clone()),
      None => Span::styled("none", palette.dim()),
    },
  ]));
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    entry.message.clone(),
    Style::default().fg(palette.fg),
  )));

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
