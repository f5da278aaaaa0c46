//! Place resolution: free text in, a short list of coordinates out.
//!
//! [`Geocoder`] is implemented by HTTP backends (the CLI ships a Nominatim
//! client). [`PlaceResolver`] wraps any geocoder with the empty-query
//! shortcut, the candidate limit, a timeout and fail-soft error handling.

use std::{future::Future, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::{entry::Coords, error::ResolutionError};

/// At most this many candidates are offered for a query.
pub const MAX_CANDIDATES: usize = 5;

/// Lookups that take longer than this resolve to nothing.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(4);

// ─── Types ───────────────────────────────────────────────────────────────────

/// The two place fields of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum PlaceField {
  /// Where the person came from.
  From,
  /// Where the person is now.
  Now,
}

/// One geocoding hit offered to the user. Coordinates are kept as the decimal
/// strings the service returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCandidate {
  pub display_name: String,
  pub lat:          String,
  pub lon:          String,
}

impl PlaceCandidate {
  pub fn new(
    display_name: impl Into<String>,
    lat: impl Into<String>,
    lon: impl Into<String>,
  ) -> Self {
    Self {
      display_name: display_name.into(),
      lat:          lat.into(),
      lon:          lon.into(),
    }
  }

  /// Parsed coordinates, or `None` if either string is not a valid number.
  pub fn coords(&self) -> Option<Coords> {
    let lat = self.lat.trim().parse::<f64>().ok()?;
    let lon = self.lon.trim().parse::<f64>().ok()?;
    let coords = Coords::new(lat, lon);
    coords.is_valid().then_some(coords)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A geocoding backend.
///
/// Implementations issue exactly one request per call and return the
/// service's hits in relevance order. They do not need to trim or limit the
/// result; [`PlaceResolver`] does that.
pub trait Geocoder: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn lookup<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<PlaceCandidate>, Self::Error>> + Send + 'a;
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Turns place queries into at most [`MAX_CANDIDATES`] usable candidates.
///
/// Cheap to clone; the geocoder is shared.
pub struct PlaceResolver<G> {
  geocoder: Arc<G>,
  timeout:  Duration,
}

impl<G> Clone for PlaceResolver<G> {
  fn clone(&self) -> Self {
    Self {
      geocoder: Arc::clone(&self.geocoder),
      timeout:  self.timeout,
    }
  }
}

impl<G: Geocoder> PlaceResolver<G> {
  pub fn new(geocoder: G) -> Self {
    Self {
      geocoder: Arc::new(geocoder),
      timeout:  DEFAULT_LOOKUP_TIMEOUT,
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn geocoder(&self) -> &G { &self.geocoder }

  /// Resolve `query`, absorbing every failure into an empty list.
  pub async fn resolve(&self, query: &str) -> Vec<PlaceCandidate> {
    match self.try_resolve(query).await {
      Ok(candidates) => candidates,
      Err(e) => {
        tracing::warn!(query, error = %e, "place lookup failed");
        Vec::new()
      }
    }
  }

  /// Resolve `query`, reporting failures.
  ///
  /// A blank query returns `Ok(vec![])` without touching the geocoder.
  pub async fn try_resolve(
    &self,
    query: &str,
  ) -> Result<Vec<PlaceCandidate>, ResolutionError> {
    let query = query.trim();
    if query.is_empty() {
      return Ok(Vec::new());
    }

    let hits = tokio::time::timeout(self.timeout, self.geocoder.lookup(query))
      .await
      .map_err(|_| ResolutionError::Timeout(self.timeout))?
      .map_err(|e| ResolutionError::Lookup(Box::new(e)))?;

    Ok(
      hits
        .into_iter()
        .filter(|c| c.coords().is_some())
        .take(MAX_CANDIDATES)
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn candidate_coords_parse_decimal_strings() {
    let c = PlaceCandidate::new("Seoul, South Korea", "37.5666791", "126.9782914");
    let coords = c.coords().unwrap();
    assert!((coords.lat - 37.5666791).abs() < 1e-9);
    assert!((coords.lng - 126.9782914).abs() < 1e-9);
  }

  #[test]
  fn candidate_coords_reject_garbage() {
    assert!(PlaceCandidate::new("x", "north", "1").coords().is_none());
    assert!(PlaceCandidate::new("x", "1", "").coords().is_none());
    assert!(PlaceCandidate::new("x", "NaN", "1").coords().is_none());
    assert!(PlaceCandidate::new("x", "91", "1").coords().is_none());
  }

  #[test]
  fn place_field_names() {
    assert_eq!(PlaceField::From.to_string(), "from");
    assert_eq!(PlaceField::Now.as_ref(), "now");
  }
}
