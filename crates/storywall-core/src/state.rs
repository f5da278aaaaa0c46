//! Application state and its update functions.
//!
//! Everything the interface shows is read from [`AppState`]; everything the
//! user does goes through one of its methods. Rendering code never mutates it
//! directly, so the whole workflow can be exercised without a terminal.

use strum::{Display, EnumIter};

use crate::{
  draft::{DraftSubmission, Submission},
  error::SubmitError,
  photo::PhotoPayload,
  place::{PlaceCandidate, PlaceField},
  sink::SubmissionSink,
  store::EntryStore,
};

// ─── View & theme ────────────────────────────────────────────────────────────

/// Which presentation is visible. Any view can be reached from any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter)]
pub enum View {
  #[default]
  Map,
  Gallery,
  Form,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

impl Theme {
  pub fn toggled(self) -> Self {
    match self {
      Self::Light => Self::Dark,
      Self::Dark => Self::Light,
    }
  }
}

// ─── Suggestions ─────────────────────────────────────────────────────────────

/// Identifies one issued place query. A response is only applied if its
/// ticket is still the latest for the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket {
  pub field:      PlaceField,
  pub generation: u64,
}

/// Candidate list for one place field.
#[derive(Debug, Clone, Default)]
pub struct FieldSuggestions {
  generation: u64,
  candidates: Vec<PlaceCandidate>,
}

impl FieldSuggestions {
  pub fn candidates(&self) -> &[PlaceCandidate] { &self.candidates }

  pub fn generation(&self) -> u64 { self.generation }

  /// Invalidate every outstanding query and drop the current list.
  fn bump(&mut self) -> u64 {
    self.generation += 1;
    self.candidates.clear();
    self.generation
  }
}

#[derive(Debug, Clone, Default)]
pub struct Suggestions {
  pub from: FieldSuggestions,
  pub now:  FieldSuggestions,
}

impl Suggestions {
  pub fn field(&self, field: PlaceField) -> &FieldSuggestions {
    match field {
      PlaceField::From => &self.from,
      PlaceField::Now => &self.now,
    }
  }

  fn field_mut(&mut self, field: PlaceField) -> &mut FieldSuggestions {
    match field {
      PlaceField::From => &mut self.from,
      PlaceField::Now => &mut self.now,
    }
  }
}

// ─── AppState ────────────────────────────────────────────────────────────────

/// The single source of truth for the interface.
#[derive(Debug, Clone, Default)]
pub struct AppState {
  pub entries:       EntryStore,
  pub draft:         DraftSubmission,
  pub view:          View,
  pub theme:         Theme,
  pub suggestions:   Suggestions,
  /// The uploaded photo before it is confirmed into the draft.
  pub photo_preview: Option<PhotoPayload>,
}

impl AppState {
  pub fn new(entries: EntryStore) -> Self {
    Self {
      entries,
      ..Self::default()
    }
  }

  pub fn set_entries(&mut self, entries: EntryStore) { self.entries = entries; }

  pub fn set_view(&mut self, view: View) { self.view = view; }

  pub fn toggle_theme(&mut self) { self.theme = self.theme.toggled(); }

  // ── Place fields ──────────────────────────────────────────────────────

  /// Record typed text for a place field and start a new query for it.
  ///
  /// The returned ticket must accompany the lookup's result into
  /// [`apply_suggestions`](Self::apply_suggestions).
  pub fn set_place_text(&mut self, field: PlaceField, text: impl Into<String>) -> QueryTicket {
    self.draft.set_place_text(field, text);
    let generation = self.suggestions.field_mut(field).bump();
    QueryTicket { field, generation }
  }

  /// Apply a finished lookup. Returns `false` and changes nothing if a newer
  /// query (or a selection) has happened since `ticket` was issued.
  pub fn apply_suggestions(
    &mut self,
    ticket: QueryTicket,
    candidates: Vec<PlaceCandidate>,
  ) -> bool {
    let slot = self.suggestions.field_mut(ticket.field);
    if slot.generation != ticket.generation {
      tracing::debug!(
        field = %ticket.field,
        stale = ticket.generation,
        latest = slot.generation,
        "discarding stale place suggestions"
      );
      return false;
    }
    slot.candidates = candidates;
    true
  }

  /// Take `candidate` for `field` and close that field's suggestion list.
  pub fn select_place(&mut self, field: PlaceField, candidate: &PlaceCandidate) {
    self.draft.select_place(field, candidate);
    self.suggestions.field_mut(field).bump();
  }

  /// Close a field's suggestion list without choosing anything. Lookups
  /// still in flight for it are ignored when they land.
  pub fn dismiss_suggestions(&mut self, field: PlaceField) {
    self.suggestions.field_mut(field).bump();
  }

  // ── Photo ─────────────────────────────────────────────────────────────

  /// Show `photo` as the preview. Any previously attached photo is dropped
  /// until this one is confirmed.
  pub fn load_photo(&mut self, photo: PhotoPayload) {
    self.draft.photo = None;
    self.photo_preview = Some(photo);
  }

  /// Move the previewed photo into the draft. Returns `false` if there is no
  /// preview to confirm.
  pub fn confirm_photo(&mut self) -> bool {
    match &self.photo_preview {
      Some(photo) => {
        self.draft.photo = Some(photo.clone());
        true
      }
      None => false,
    }
  }

  // ── Submission ────────────────────────────────────────────────────────

  /// Validate the draft, hand it to `sink`, then start over with an empty
  /// draft. On any error the draft is left exactly as it was.
  pub async fn submit<S: SubmissionSink>(&mut self, sink: &S) -> Result<Submission, SubmitError> {
    let entry = self.draft.validate()?;
    let submission = Submission::new(entry);
    sink
      .accept(submission.clone())
      .await
      .map_err(|e| SubmitError::Sink(Box::new(e)))?;
    self.reset_draft();
    Ok(submission)
  }

  /// Back to an empty form, including any photo preview and suggestions.
  pub fn reset_draft(&mut self) {
    self.draft = DraftSubmission::default();
    self.photo_preview = None;
    self.suggestions.from.bump();
    self.suggestions.now.bump();
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn every_view_is_reachable_from_every_other() {
    let mut state = AppState::default();
    assert_eq!(state.view, View::Map);
    for from in View::iter() {
      for to in View::iter() {
        state.set_view(from);
        state.set_view(to);
        assert_eq!(state.view, to);
      }
    }
  }

  #[test]
  fn theme_toggles_back_and_forth() {
    let mut state = AppState::default();
    state.toggle_theme();
    assert_eq!(state.theme, Theme::Dark);
    state.toggle_theme();
    assert_eq!(state.theme, Theme::Light);
  }

  #[test]
  fn tickets_advance_per_field() {
    let mut state = AppState::default();
    let a = state.set_place_text(PlaceField::From, "Se");
    let b = state.set_place_text(PlaceField::From, "Seo");
    let c = state.set_place_text(PlaceField::Now, "Pa");
    assert!(b.generation > a.generation);
    assert_eq!(c.field, PlaceField::Now);
    assert_eq!(state.draft.from, "Seo");
  }

  #[test]
  fn confirm_without_preview_does_nothing() {
    let mut state = AppState::default();
    assert!(!state.confirm_photo());
    assert!(state.draft.photo.is_none());
  }
}
