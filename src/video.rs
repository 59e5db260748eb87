use anyhow::{Context, Result, anyhow};
use image::DynamicImage;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::constants::constants;

pub const UNTITLED_VIDEO: &str = "Untitled Video";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VideoUrlError {
  #[error("Please enter a YouTube video URL")]
  Missing,
  #[error("Invalid YouTube URL format")]
  Invalid,
}

/// The video currently shown in the thumbnail and player panes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedVideo {
  pub url: String,
  pub video_id: String,
  pub title: String,
  /// Thumbnail image URL; search results supply their own.
  pub thumbnail: String,
}

impl LoadedVideo {
  /// Build from a watch URL. A missing or blank title becomes "Untitled Video".
  pub fn from_url(url: &str, title: Option<&str>) -> Result<Self, VideoUrlError> {
    let url = url.trim();
    if url.is_empty() {
      return Err(VideoUrlError::Missing);
    }
    let video_id = extract_video_id(url)?;
    let title = title.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(UNTITLED_VIDEO).to_string();
    let thumbnail = thumbnail_url(&video_id);
    Ok(Self { url: url.to_string(), video_id, title, thumbnail })
  }

  /// Use the thumbnail URL reported by the backend instead of the template.
  pub fn with_thumbnail(mut self, url: &str) -> Self {
    let url = url.trim();
    if !url.is_empty() {
      self.thumbnail = url.to_string();
    }
    self
  }

  pub fn embed_url(&self) -> String {
    embed_url(&self.video_id)
  }
}

/// Extract the video identifier from the `v` query parameter of a watch URL.
///
/// Input without a scheme (`youtube.com/watch?v=...`) is accepted. Anything
/// that does not parse as a URL, or has no non-empty `v` parameter, is invalid.
/// Other query parameters (`&t=42`) are not part of the identifier.
pub fn extract_video_id(input: &str) -> Result<String, VideoUrlError> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(VideoUrlError::Missing);
  }
  let parsed = Url::parse(trimmed)
    .or_else(|_| Url::parse(&format!("https://{trimmed}")))
    .map_err(|_| VideoUrlError::Invalid)?;
  parsed
    .query_pairs()
    .find(|(key, _)| key == "v")
    .map(|(_, value)| value.trim().to_string())
    .filter(|id| !id.is_empty())
    .ok_or(VideoUrlError::Invalid)
}

fn fill_template(template: &str, video_id: &str) -> String {
  template.replace("{id}", video_id)
}

pub fn thumbnail_url(video_id: &str) -> String {
  fill_template(&constants().thumbnail_url_template, video_id)
}

pub fn embed_url(video_id: &str) -> String {
  fill_template(&constants().embed_url_template, video_id)
}

pub fn watch_url(video_id: &str) -> String {
  fill_template(&constants().watch_url_template, video_id)
}

/// Download and decode a thumbnail image.
pub async fn fetch_thumbnail(client: &Client, url: &str) -> Result<DynamicImage> {
  let response = client.get(url).send().await.with_context(|| format!("Failed to request thumbnail {}", url))?;
  if !response.status().is_success() {
    return Err(anyhow!("Thumbnail request for {} returned {}", url, response.status()));
  }
  let image_bytes = response.bytes().await.with_context(|| format!("Failed to read image bytes from {}", url))?;
  image::load_from_memory(&image_bytes).with_context(|| format!("Failed to decode image from memory (URL: {})", url))
}
