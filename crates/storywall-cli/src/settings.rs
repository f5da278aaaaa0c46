//! Runtime settings, layered from an optional TOML file and `STORYWALL_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;

/// Runtime configuration. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Seed entries: a file path or an `http(s)://` URL.
  pub entries:           String,
  /// Base URL of a Nominatim-compatible geocoder.
  pub geocoder_url:      String,
  /// Sent with every HTTP request.
  pub user_agent:        String,
  pub lookup_timeout_ms: u64,
  /// Quiet period after a keystroke before a place lookup is sent.
  pub debounce_ms:       u64,
  pub log_file:          PathBuf,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      entries:           "data/entries.json".into(),
      geocoder_url:      "https://nominatim.openstreetmap.org".into(),
      user_agent:        concat!("storywall/", env!("CARGO_PKG_VERSION")).into(),
      lookup_timeout_ms: 4_000,
      debounce_ms:       250,
      log_file:          "storywall.log".into(),
    }
  }
}

impl Settings {
  /// Read `path` (if it exists), then apply `STORYWALL_*` overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::build(
      Self::file_layer(path).add_source(config::Environment::with_prefix("STORYWALL")),
      path,
    )
  }

  fn file_layer(path: &Path) -> ConfigBuilder<DefaultState> {
    config::Config::builder().add_source(config::File::from(path).required(false))
  }

  fn build(builder: ConfigBuilder<DefaultState>, path: &Path) -> anyhow::Result<Self> {
    builder
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn lookup_timeout(&self) -> Duration { Duration::from_millis(self.lookup_timeout_ms) }

  pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// File layer only, so `STORYWALL_*` variables in the caller's shell
  /// cannot leak in.
  fn load_file(path: &Path) -> Settings {
    Settings::build(Settings::file_layer(path), path).unwrap()
  }

  #[test]
  fn missing_file_gives_defaults() {
    let settings = load_file(Path::new("/nonexistent/storywall.toml"));
    assert_eq!(settings.lookup_timeout(), Duration::from_secs(4));
    assert_eq!(settings.debounce(), Duration::from_millis(250));
    assert_eq!(settings.entries, "data/entries.json");
    assert!(settings.user_agent.starts_with("storywall/"));
  }

  #[test]
  fn load_tolerates_a_missing_file() {
    assert!(Settings::load(Path::new("/nonexistent/storywall.toml")).is_ok());
  }

  #[test]
  fn file_values_override_defaults() {
    let path = std::env::temp_dir().join(format!("storywall-{}.toml", std::process::id()));
    std::fs::write(
      &path,
      "entries = \"https://example.org/wall.json\"\ndebounce_ms = 400\n",
    )
    .unwrap();

    let settings = load_file(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(settings.entries, "https://example.org/wall.json");
    assert_eq!(settings.debounce(), Duration::from_millis(400));
    assert_eq!(settings.log_file, PathBuf::from("storywall.log"));
  }
}
