//! The read-only entry store and the sources it loads from.
//!
//! Sources are implemented here for local JSON files and in `storywall-cli`
//! for HTTP. The store itself is loaded exactly once; a failing source leaves
//! it empty instead of failing the caller.

use std::{future::Future, path::PathBuf};

use crate::{entry::Entry, error::LoadError, render::Marker};

// ─── Sources ─────────────────────────────────────────────────────────────────

/// A static collection of approved entries.
pub trait EntrySource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch every entry, in display order.
  fn fetch_entries(&self) -> impl Future<Output = Result<Vec<Entry>, Self::Error>> + Send + '_;
}

/// Entries stored as a JSON array in a local file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
  path: PathBuf,
}

impl JsonFileSource {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl EntrySource for JsonFileSource {
  type Error = LoadError;

  async fn fetch_entries(&self) -> Result<Vec<Entry>, LoadError> {
    let raw = tokio::fs::read(&self.path).await?;
    decode_entries(&raw)
  }
}

/// Decode a JSON array of entries one record at a time.
///
/// The payload must be an array; records that do not decode, or that have a
/// blank `name`, are skipped with a warning instead of failing the whole load.
pub fn decode_entries(raw: &[u8]) -> Result<Vec<Entry>, LoadError> {
  let records: Vec<serde_json::Value> = serde_json::from_slice(raw)?;
  Ok(
    records
      .into_iter()
      .enumerate()
      .filter_map(|(index, record)| match serde_json::from_value::<Entry>(record) {
        Ok(entry) if !entry.name.trim().is_empty() => Some(entry),
        Ok(_) => {
          tracing::warn!(index, "skipping entry with a blank name");
          None
        }
        Err(e) => {
          tracing::warn!(index, error = %e, "skipping malformed entry");
          None
        }
      })
      .collect(),
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Approved entries for the session. Never mutated after loading.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
  entries: Vec<Entry>,
}

impl EntryStore {
  pub fn new(entries: Vec<Entry>) -> Self { Self { entries } }

  /// Load from `source`. Any failure yields an empty store.
  pub async fn load<S: EntrySource>(source: &S) -> Self {
    match source.fetch_entries().await {
      Ok(entries) => {
        tracing::info!(count = entries.len(), "loaded entries");
        Self::new(entries)
      }
      Err(e) => {
        tracing::warn!(error = %e, "could not load entries; showing none");
        Self::default()
      }
    }
  }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  /// Every entry; the gallery has no coordinate requirement.
  pub fn gallery(&self) -> &[Entry] { &self.entries }

  /// Entries that can be pinned, with their positions.
  pub fn map_markers(&self) -> Vec<Marker<'_>> {
    self
      .entries
      .iter()
      .filter_map(|entry| {
        entry
          .map_position()
          .map(|position| Marker { entry, position })
      })
      .collect()
  }

  /// Number of entries left off the map for lack of coordinates.
  pub fn unpinned(&self) -> usize {
    self
      .entries
      .iter()
      .filter(|e| e.map_position().is_none())
      .count()
  }
}
