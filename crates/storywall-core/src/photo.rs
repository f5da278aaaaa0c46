//! Photo payloads.
//!
//! The cropping step happens outside this crate; what arrives here is the
//! final image bytes. They are checked by signature and packed into a
//! self-contained `data:` URL so an entry carries its own picture.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

use crate::error::PhotoError;

/// Largest accepted upload.
pub const MAX_PHOTO_BYTES: usize = 8 * 1024 * 1024;

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// An encoded image ready to be stored on an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPayload {
  media_type: &'static str,
  data_url:   String,
  size:       usize,
}

impl PhotoPayload {
  /// Build a payload from raw image bytes.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, PhotoError> {
    if bytes.is_empty() {
      return Err(PhotoError::Empty);
    }
    if bytes.len() > MAX_PHOTO_BYTES {
      return Err(PhotoError::TooLarge {
        size: bytes.len(),
        max:  MAX_PHOTO_BYTES,
      });
    }
    let media_type = sniff_media_type(bytes).ok_or(PhotoError::UnsupportedFormat)?;
    let data_url = format!("data:{media_type};base64,{}", B64.encode(bytes));
    Ok(Self {
      media_type,
      data_url,
      size: bytes.len(),
    })
  }

  /// Read and encode the image at `path`.
  pub async fn read(path: impl AsRef<Path>) -> Result<Self, PhotoError> {
    let bytes = tokio::fs::read(path).await?;
    Self::from_bytes(&bytes)
  }

  pub fn media_type(&self) -> &'static str { self.media_type }

  /// Size of the original image in bytes.
  pub fn size(&self) -> usize { self.size }

  pub fn as_data_url(&self) -> &str { &self.data_url }

  pub fn into_data_url(self) -> String { self.data_url }
}

fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
  if bytes.starts_with(JPEG_MAGIC) {
    Some("image/jpeg")
  } else if bytes.starts_with(PNG_MAGIC) {
    Some("image/png")
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn jpeg_becomes_data_url() {
    let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    let photo = PhotoPayload::from_bytes(&bytes).unwrap();
    assert_eq!(photo.media_type(), "image/jpeg");
    assert_eq!(photo.size(), 6);
    assert_eq!(photo.as_data_url(), "data:image/jpeg;base64,/9j/4AAQ");
  }

  #[test]
  fn png_is_accepted() {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.extend_from_slice(b"IHDR");
    let photo = PhotoPayload::from_bytes(&bytes).unwrap();
    assert_eq!(photo.media_type(), "image/png");
    assert!(photo.as_data_url().starts_with("data:image/png;base64,"));
  }

  #[test]
  fn rejects_unknown_and_empty() {
    assert!(matches!(
      PhotoPayload::from_bytes(b"GIF89a"),
      Err(PhotoError::UnsupportedFormat)
    ));
    assert!(matches!(PhotoPayload::from_bytes(&[]), Err(PhotoError::Empty)));
  }

  #[test]
  fn rejects_oversized() {
    let mut bytes = vec![0u8; MAX_PHOTO_BYTES + 1];
    bytes[..3].copy_from_slice(JPEG_MAGIC);
    assert!(matches!(
      PhotoPayload::from_bytes(&bytes),
      Err(PhotoError::TooLarge { .. })
    ));
  }

  #[tokio::test]
  async fn read_missing_file_is_io_error() {
    let result = PhotoPayload::read("/definitely/not/here.jpg").await;
    assert!(matches!(result, Err(PhotoError::Io(_))));
  }
}
