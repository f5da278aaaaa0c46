//! The in-progress submission and what it turns into.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  entry::{Coords, Entry, MESSAGE_MAX_CHARS},
  error::ValidationError,
  photo::PhotoPayload,
  place::{PlaceCandidate, PlaceField},
};

// ─── Draft ───────────────────────────────────────────────────────────────────

/// Form state before confirmation. `Default` is the empty initial shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftSubmission {
  pub name:        String,
  pub birth_name:  String,
  pub from:        String,
  pub from_coords: Option<Coords>,
  pub now:         String,
  pub now_coords:  Option<Coords>,
  pub message:     String,
  pub photo:       Option<PhotoPayload>,
}

impl DraftSubmission {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn set_name(&mut self, name: impl Into<String>) { self.name = name.into(); }

  pub fn set_birth_name(&mut self, birth_name: impl Into<String>) {
    self.birth_name = birth_name.into();
  }

  /// Set the message, dropping anything past [`MESSAGE_MAX_CHARS`].
  pub fn set_message(&mut self, message: &str) {
    self.message = message.chars().take(MESSAGE_MAX_CHARS).collect();
  }

  pub fn place(&self, field: PlaceField) -> (&str, Option<Coords>) {
    match field {
      PlaceField::From => (&self.from, self.from_coords),
      PlaceField::Now => (&self.now, self.now_coords),
    }
  }

  /// Replace a place label with free text. The label is no longer a resolved
  /// place, so its coordinates are cleared.
  pub fn set_place_text(&mut self, field: PlaceField, text: impl Into<String>) {
    let (label, coords) = self.place_mut(field);
    *label = text.into();
    *coords = None;
  }

  /// Take a candidate's label and coordinates for `field` in one step.
  pub fn select_place(&mut self, field: PlaceField, candidate: &PlaceCandidate) {
    let (label, coords) = self.place_mut(field);
    *label = candidate.display_name.clone();
    *coords = candidate.coords();
  }

  fn place_mut(&mut self, field: PlaceField) -> (&mut String, &mut Option<Coords>) {
    match field {
      PlaceField::From => (&mut self.from, &mut self.from_coords),
      PlaceField::Now => (&mut self.now, &mut self.now_coords),
    }
  }

  /// Check the draft and build the entry it describes, without changing it.
  pub fn validate(&self) -> Result<Entry, ValidationError> {
    let photo = self.photo.as_ref().ok_or(ValidationError::MissingPhoto)?;

    for (field, value) in [
      ("name", &self.name),
      ("from", &self.from),
      ("now", &self.now),
      ("message", &self.message),
    ] {
      if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
      }
    }

    let len = self.message.chars().count();
    if len > MESSAGE_MAX_CHARS {
      return Err(ValidationError::MessageTooLong {
        len,
        max: MESSAGE_MAX_CHARS,
      });
    }

    let birth_name = self.birth_name.trim();
    Ok(Entry {
      name:        self.name.trim().to_owned(),
      birth_name:  (!birth_name.is_empty()).then(|| birth_name.to_owned()),
      from:        self.from.clone(),
      from_coords: self.from_coords,
      now:         self.now.clone(),
      now_coords:  self.now_coords,
      message:     self.message.clone(),
      photo:       Some(photo.as_data_url().to_owned()),
      lat:         self.now_coords.map(|c| c.lat),
      lng:         self.now_coords.map(|c| c.lng),
    })
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// A confirmed draft, handed to a [`crate::sink::SubmissionSink`].
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
  pub submission_id: Uuid,
  /// Set when the draft is confirmed; never changes afterwards.
  pub submitted_at:  DateTime<Utc>,
  pub entry:         Entry,
}

impl Submission {
  pub fn new(entry: Entry) -> Self {
    Self {
      submission_id: Uuid::new_v4(),
      submitted_at: Utc::now(),
      entry,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn jpeg() -> PhotoPayload {
    PhotoPayload::from_bytes(&[0xFF, 0xD8, 0xFF, 0xDB]).unwrap()
  }

  fn filled() -> DraftSubmission {
    DraftSubmission {
      name: "Ada".into(),
      from: "Lagos".into(),
      now: "Berlin".into(),
      now_coords: Some(Coords::new(52.52, 13.40)),
      message: "Still learning the trams.".into(),
      photo: Some(jpeg()),
      ..DraftSubmission::default()
    }
  }

  #[test]
  fn message_is_capped() {
    let mut draft = DraftSubmission::default();
    draft.set_message(&"é".repeat(MESSAGE_MAX_CHARS + 20));
    assert_eq!(draft.message.chars().count(), MESSAGE_MAX_CHARS);
  }

  #[test]
  fn editing_place_text_clears_coords() {
    let mut draft = filled();
    draft.set_place_text(PlaceField::Now, "Berl");
    assert_eq!(draft.place(PlaceField::Now), ("Berl", None));
  }

  #[test]
  fn select_place_is_field_local() {
    let mut draft = filled();
    let candidate = PlaceCandidate::new("Lagos, Nigeria", "6.45", "3.39");
    draft.select_place(PlaceField::From, &candidate);

    assert_eq!(draft.from, "Lagos, Nigeria");
    assert_eq!(draft.from_coords, Some(Coords::new(6.45, 3.39)));
    assert_eq!(draft.now, "Berlin");
    assert_eq!(draft.now_coords, Some(Coords::new(52.52, 13.40)));
  }

  #[test]
  fn photo_is_checked_first() {
    let draft = DraftSubmission::default();
    assert_eq!(draft.validate(), Err(ValidationError::MissingPhoto));
  }

  #[test]
  fn blank_mandatory_field_is_reported() {
    let mut draft = filled();
    draft.message = "   ".into();
    assert_eq!(draft.validate(), Err(ValidationError::MissingField("message")));
  }

  #[test]
  fn oversized_message_is_rejected() {
    let mut draft = filled();
    draft.message = "x".repeat(MESSAGE_MAX_CHARS + 1);
    assert_eq!(
      draft.validate(),
      Err(ValidationError::MessageTooLong {
        len: MESSAGE_MAX_CHARS + 1,
        max: MESSAGE_MAX_CHARS,
      })
    );
  }

  #[test]
  fn entry_is_pinned_at_destination() {
    let entry = filled().validate().unwrap();
    assert_eq!(entry.lat, Some(52.52));
    assert_eq!(entry.lng, Some(13.40));
    assert_eq!(entry.birth_name, None);
    assert!(entry.photo.unwrap().starts_with("data:image/jpeg;base64,"));
  }

  #[test]
  fn unresolved_destination_has_no_pin() {
    let mut draft = filled();
    draft.now_coords = None;
    let entry = draft.validate().unwrap();
    assert_eq!(entry.map_position(), None);
  }
}
