//! Map view: a braille world map with one point per pinned entry.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::Style,
  symbols,
  text::Span,
  widgets::{
    Block, Borders, Paragraph,
    canvas::{Canvas, Map, MapResolution, Points},
  },
};
use storywall_core::render::{MapRenderer, Marker};

use super::Palette;
use crate::app::App;

/// Longitude offset between a point and its label, in canvas units.
const LABEL_OFFSET: f64 = 2.0;

/// Marker layer for the terminal canvas. x is longitude, y is latitude.
#[derive(Debug, Default)]
pub struct CanvasMap {
  points: Vec<(f64, f64)>,
  labels: Vec<(f64, f64, String)>,
}

impl MapRenderer for CanvasMap {
  fn render_markers(&mut self, markers: &[Marker<'_>]) {
    self.points = markers
      .iter()
      .map(|m| (m.position.lng, m.position.lat))
      .collect();
    self.labels = markers
      .iter()
      .map(|m| {
        (
          m.position.lng + LABEL_OFFSET,
          m.position.lat,
          m.entry.name.clone(),
        )
      })
      .collect();
  }
}

/// Render the map view into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(1)])
    .split(area);

  let mut layer = CanvasMap::default();
  layer.render_markers(&app.state.entries.map_markers());

  let block = Block::default()
    .title(format!(" Map ({}) ", layer.points.len()))
    .borders(Borders::ALL)
    .border_style(palette.border());
  let canvas = Canvas::default()
    .block(block)
    .marker(symbols::Marker::Braille)
    .background_color(palette.bg)
    .x_bounds([-180.0, 180.0])
    .y_bounds([-90.0, 90.0])
    .paint(|ctx| {
      ctx.draw(&Map {
        color:      palette.muted,
        resolution: MapResolution::High,
      });
      ctx.layer();
      ctx.draw(&Points {
        coords: &layer.points,
        color:  palette.accent,
      });
      for (x, y, label) in &layer.labels {
        ctx.print(*x, *y, Span::styled(label.clone(), Style::default().fg(palette.fg)));
      }
    });
  f.render_widget(canvas, rows[0]);

  let footer = if app.is_loading() {
    "Loading stories…".to_string()
  } else {
    match app.state.entries.unpinned() {
      0 => String::new(),
      1 => "1 story has no location yet; see the gallery.".into(),
      n => format!("{n} stories have no location yet; see the gallery."),
    }
  };
  f.render_widget(Paragraph::new(footer).style(palette.dim()), rows[1]);
}

#[cfg(test)]
mod tests {
  use storywall_core::entry::Entry;

  use super::*;

  #[test]
  fn markers_become_points_and_labels() {
    let entries = [
      Entry {
        name: "Mina".into(),
        lat: Some(43.65),
        lng: Some(-79.38),
        ..Entry::default()
      },
      Entry {
        name: "Tariq".into(),
        lat: Some(51.5),
        lng: Some(-0.12),
        ..Entry::default()
      },
    ];
    let markers: Vec<_> = entries
      .iter()
      .filter_map(|entry| entry.map_position().map(|position| Marker { entry, position }))
      .collect();

    let mut layer = CanvasMap::default();
    layer.render_markers(&markers);

    assert_eq!(layer.points, [(-79.38, 43.65), (-0.12, 51.5)]);
    assert_eq!(layer.labels[1].2, "Tariq");
    assert_eq!(layer.labels[0].0, -79.38 + LABEL_OFFSET);

    layer.render_markers(&[]);
    assert!(layer.points.is_empty());
    assert!(layer.labels.is_empty());
  }
}
