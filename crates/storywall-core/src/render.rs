//! Map rendering capability.
//!
//! The data model never talks to a drawing backend directly; anything that
//! can place labelled points implements [`MapRenderer`].

use crate::entry::{Coords, Entry};

/// An entry together with the position it is pinned at.
#[derive(Debug, Clone, Copy)]
pub struct Marker<'a> {
  pub entry:    &'a Entry,
  pub position: Coords,
}

/// A backend that draws entry markers on a map.
pub trait MapRenderer {
  /// Replace whatever was drawn before with `markers`.
  fn render_markers(&mut self, markers: &[Marker<'_>]);
}
