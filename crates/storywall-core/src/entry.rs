//! Entries: the approved stories shown on the wall.
//!
//! An entry is immutable once loaded. The seed format uses camelCase keys and
//! stores coordinate pairs as `[lat, lng]` arrays.

use serde::{Deserialize, Serialize};

/// Maximum length of an entry message, counted in characters.
pub const MESSAGE_MAX_CHARS: usize = 300;

// ─── Coordinates ─────────────────────────────────────────────────────────────

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
  pub lat: f64,
  pub lng: f64,
}

impl Coords {
  pub fn new(lat: f64, lng: f64) -> Self { Self { lat, lng } }

  /// Both components are finite and inside the WGS84 range.
  pub fn is_valid(&self) -> bool {
    self.lat.is_finite()
      && self.lng.is_finite()
      && (-90.0..=90.0).contains(&self.lat)
      && (-180.0..=180.0).contains(&self.lng)
  }
}

impl From<[f64; 2]> for Coords {
  fn from([lat, lng]: [f64; 2]) -> Self { Self { lat, lng } }
}

impl From<Coords> for [f64; 2] {
  fn from(c: Coords) -> Self { [c.lat, c.lng] }
}

// ─── Entry ───────────────────────────────────────────────────────────────────

/// One story on the wall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
  pub name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birth_name:  Option<String>,
  /// Where the person came from.
  #[serde(default)]
  pub from:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub from_coords: Option<Coords>,
  /// Where the person is now.
  #[serde(default)]
  pub now:         String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub now_coords:  Option<Coords>,
  #[serde(default)]
  pub message:     String,
  /// Image reference: a URL or a self-contained `data:` URL.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub photo:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lat:         Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lng:         Option<f64>,
}

impl Entry {
  /// Where this entry is pinned on the map.
  ///
  /// `None` unless both `lat` and `lng` are present and form a valid
  /// coordinate; such entries are left off the map but stay in the gallery.
  pub fn map_position(&self) -> Option<Coords> {
    let coords = Coords::new(self.lat?, self.lng?);
    coords.is_valid().then_some(coords)
  }

  /// A short "from → now" journey label for list rows and map labels.
  pub fn journey(&self) -> String {
    match (self.from.is_empty(), self.now.is_empty()) {
      (false, false) => format!("{} → {}", self.from, self.now),
      (false, true) => self.from.clone(),
      (true, false) => self.now.clone(),
      (true, true) => String::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seed_record_with_camel_case_keys() {
    let json = r#"{
      "name": "Mina",
      "birthName": "Min-ah",
      "from": "Busan",
      "fromCoords": [35.18, 129.07],
      "now": "Toronto",
      "nowCoords": [43.65, -79.38],
      "message": "Hello",
      "lat": 43.65,
      "lng": -79.38,
      "approved": true
    }"#;
    let entry: Entry = serde_json::from_str(json).unwrap();
    assert_eq!(entry.birth_name.as_deref(), Some("Min-ah"));
    assert_eq!(entry.from_coords, Some(Coords::new(35.18, 129.07)));
    assert_eq!(entry.map_position(), Some(Coords::new(43.65, -79.38)));
    assert!(entry.photo.is_none());
  }

  #[test]
  fn coords_serialise_as_arrays() {
    let entry = Entry {
      name: "A".into(),
      now_coords: Some(Coords::new(1.5, -2.5)),
      ..Entry::default()
    };
    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["nowCoords"], serde_json::json!([1.5, -2.5]));
    assert!(value.get("lat").is_none());
  }

  #[test]
  fn map_position_requires_both_components() {
    let mut entry = Entry { name: "A".into(), lat: Some(10.0), ..Entry::default() };
    assert_eq!(entry.map_position(), None);

    entry.lng = Some(f64::NAN);
    assert_eq!(entry.map_position(), None);

    entry.lng = Some(200.0);
    assert_eq!(entry.map_position(), None);

    entry.lng = Some(20.0);
    assert_eq!(entry.map_position(), Some(Coords::new(10.0, 20.0)));
  }

  #[test]
  fn journey_label() {
    let entry = Entry {
      from: "Lagos".into(),
      now: "Berlin".into(),
      ..Entry::default()
    };
    assert_eq!(entry.journey(), "Lagos → Berlin");
    assert_eq!(Entry::default().journey(), "");
  }
}
