//! HTTP collaborators: the Nominatim geocoder and remote entry seeds.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use storywall_core::{
  LoadError,
  entry::Entry,
  place::{Geocoder, MAX_CANDIDATES, PlaceCandidate},
  store::{EntrySource, JsonFileSource, decode_entries},
};
use thiserror::Error;

// ─── Geocoding ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GeocodeError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("geocoder returned {0}")]
  Status(StatusCode),

  #[error("unexpected response: {0}")]
  Malformed(#[from] serde_json::Error),
}

/// Client for a Nominatim-compatible `/search` endpoint.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct NominatimClient {
  client:   Client,
  base_url: String,
}

impl NominatimClient {
  /// `client` should carry a `User-Agent` that identifies the deployment;
  /// public Nominatim instances reject anonymous traffic.
  pub fn new(client: Client, base_url: impl Into<String>) -> Self {
    Self {
      client,
      base_url: base_url.into(),
    }
  }

  fn url(&self) -> String { format!("{}/search", self.base_url.trim_end_matches('/')) }
}

impl Geocoder for NominatimClient {
  type Error = GeocodeError;

  /// `GET {base}/search?format=json&limit=5&q=<query>`
  async fn lookup(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
    let limit = MAX_CANDIDATES.to_string();
    let resp = self
      .client
      .get(self.url())
      .query(&[("format", "json"), ("limit", limit.as_str()), ("q", query)])
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(GeocodeError::Status(resp.status()));
    }
    let body = resp.text().await?;
    decode_places(&body)
  }
}

/// One element of a Nominatim search response. Everything but the three
/// fields we use is ignored.
#[derive(Deserialize)]
struct NominatimPlace {
  display_name: String,
  #[serde(deserialize_with = "decimal_string")]
  lat:          String,
  #[serde(deserialize_with = "decimal_string")]
  lon:          String,
}

/// Nominatim sends coordinates as strings; some compatible services send
/// numbers. Accept both.
fn decimal_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
  match serde_json::Value::deserialize(de)? {
    serde_json::Value::String(s) => Ok(s),
    serde_json::Value::Number(n) => Ok(n.to_string()),
    other => Err(serde::de::Error::custom(format!("expected a decimal, got {other}"))),
  }
}

/// Decode a search response body.
///
/// The body must be a JSON array. Elements missing a name or coordinates are
/// skipped one by one so a single odd record does not hide the rest.
pub fn decode_places(body: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
  let items: Vec<serde_json::Value> = serde_json::from_str(body)?;
  Ok(
    items
      .into_iter()
      .filter_map(|item| serde_json::from_value::<NominatimPlace>(item).ok())
      .map(|p| PlaceCandidate::new(p.display_name, p.lat, p.lon))
      .collect(),
  )
}

// ─── Entry seeds ──────────────────────────────────────────────────────────────

/// Entries published as a JSON array at a URL.
#[derive(Clone)]
pub struct HttpEntrySource {
  client: Client,
  url:    String,
}

impl HttpEntrySource {
  pub fn new(client: Client, url: impl Into<String>) -> Self {
    Self {
      client,
      url: url.into(),
    }
  }
}

fn remote(e: reqwest::Error) -> LoadError { LoadError::Remote(Box::new(e)) }

impl EntrySource for HttpEntrySource {
  type Error = LoadError;

  async fn fetch_entries(&self) -> Result<Vec<Entry>, LoadError> {
    let bytes = self
      .client
      .get(&self.url)
      .send()
      .await
      .and_then(reqwest::Response::error_for_status)
      .map_err(remote)?
      .bytes()
      .await
      .map_err(remote)?;
    decode_entries(&bytes)
  }
}

/// The configured seed: a local file or an `http(s)://` URL.
pub enum SeedSource {
  File(JsonFileSource),
  Http(HttpEntrySource),
}

impl SeedSource {
  pub fn from_location(location: &str, client: Client) -> Self {
    if location.starts_with("http://") || location.starts_with("https://") {
      Self::Http(HttpEntrySource::new(client, location))
    } else {
      Self::File(JsonFileSource::new(location))
    }
  }
}

impl EntrySource for SeedSource {
  type Error = LoadError;

  async fn fetch_entries(&self) -> Result<Vec<Entry>, LoadError> {
    match self {
      Self::File(source) => source.fetch_entries().await,
      Self::Http(source) => source.fetch_entries().await,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_nominatim_search_results_in_order() {
    let body = r#"[
      {"place_id": 1, "lat": "37.5666791", "lon": "126.9782914",
       "display_name": "Seoul, South Korea", "type": "city"},
      {"place_id": 2, "lat": "37.5559", "lon": "126.9723",
       "display_name": "Seoul Station, Yongsan-gu, Seoul, South Korea"}
    ]"#;
    let places = decode_places(body).unwrap();
    assert_eq!(places.len(), 2);
    assert_eq!(places[0].display_name, "Seoul, South Korea");
    assert_eq!(places[0].lat, "37.5666791");
    assert!(places[1].display_name.starts_with("Seoul Station"));
  }

  #[test]
  fn skips_incomplete_elements() {
    let body = r#"[
      {"display_name": "No coordinates"},
      {"display_name": "Numeric", "lat": 48.85, "lon": 2.35},
      {"lat": "1", "lon": "2"},
      {"display_name": "Bad lat", "lat": null, "lon": "2"}
    ]"#;
    let places = decode_places(body).unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].display_name, "Numeric");
    assert_eq!(places[0].lat, "48.85");
  }

  #[test]
  fn empty_array_is_no_places() {
    assert!(decode_places("[]").unwrap().is_empty());
  }

  #[test]
  fn rejects_non_array_bodies() {
    assert!(matches!(
      decode_places(r#"{"error": "rate limited"}"#),
      Err(GeocodeError::Malformed(_))
    ));
    assert!(matches!(decode_places("<html>"), Err(GeocodeError::Malformed(_))));
  }

  #[test]
  fn seed_location_picks_the_source() {
    let client = Client::new();
    assert!(matches!(
      SeedSource::from_location("https://example.org/entries.json", client.clone()),
      SeedSource::Http(_)
    ));
    assert!(matches!(
      SeedSource::from_location("data/entries.json", client),
      SeedSource::File(_)
    ));
  }
}
