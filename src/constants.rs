//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, parsed once on first access.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  pub default_backend_url: String,

  // Notification banners
  pub error_dismiss_secs: u64,

  // Summarize upload progress
  pub upload_chunk_bytes: usize,

  // YouTube URL templates
  pub thumbnail_url_template: String,
  pub embed_url_template: String,
  pub watch_url_template: String,

  // Logging
  pub log_file_name: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
