//! Error types for `storywall-core`.
//!
//! Only [`ValidationError`], [`PhotoError`] and [`SubmitError`] ever reach
//! the user. [`ResolutionError`] and [`LoadError`] are absorbed by the place
//! resolver and the entry store, which degrade to empty results.

use std::time::Duration;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A draft that cannot be submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("a photo is required")]
  MissingPhoto,

  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("message is {len} characters long; the limit is {max}")]
  MessageTooLong { len: usize, max: usize },
}

/// A place lookup that produced no usable candidates.
#[derive(Debug, Error)]
pub enum ResolutionError {
  #[error("place lookup timed out after {0:?}")]
  Timeout(Duration),

  #[error("place lookup failed: {0}")]
  Lookup(#[source] BoxError),
}

/// The entry source could not be read.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("reading entries: {0}")]
  Io(#[from] std::io::Error),

  #[error("decoding entries: {0}")]
  Json(#[from] serde_json::Error),

  #[error("fetching entries: {0}")]
  Remote(#[source] BoxError),
}

/// An uploaded photo that cannot become a payload.
#[derive(Debug, Error)]
pub enum PhotoError {
  #[error("reading photo: {0}")]
  Io(#[from] std::io::Error),

  #[error("photo is empty")]
  Empty,

  #[error("photo is {size} bytes; the limit is {max}")]
  TooLarge { size: usize, max: usize },

  #[error("unsupported image format (expected JPEG or PNG)")]
  UnsupportedFormat,
}

/// Why a submission did not go through.
#[derive(Debug, Error)]
pub enum SubmitError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("submission was not accepted: {0}")]
  Sink(#[source] BoxError),
}
