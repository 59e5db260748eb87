//! Persistent preferences: the favorites list and the dark-mode flag.
//!
//! Values live in a flat string key/value store, the same shape a browser's
//! local storage has. `favorites` holds a JSON array of `{url, title}` objects,
//! `darkMode` holds the literal string `"true"` or `"false"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

pub const FAVORITES_KEY: &str = "favorites";
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Error)]
pub enum PrefsError {
  #[error("Invalid video information")]
  InvalidVideoInfo,
  #[error("Invalid video URL")]
  InvalidVideoUrl,
  #[error("failed to write preferences: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to serialize preferences: {0}")]
  Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteVideo {
  pub url: String,
  pub title: String,
}

/// String key/value storage.
pub trait Storage: Send {
  fn get(&self, key: &str) -> Option<String>;
  fn set(&mut self, key: &str, value: String) -> Result<(), PrefsError>;
}

/// Storage backed by a single JSON object on disk, rewritten on every `set`.
pub struct FileStorage {
  path: PathBuf,
  entries: BTreeMap<String, String>,
}

impl FileStorage {
  /// Open the storage file. A missing or unreadable file starts empty.
  pub fn open(path: PathBuf) -> Self {
    let entries = match std::fs::read_to_string(&path) {
      Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), err = %e, "prefs: storage file unparsable, starting empty");
        BTreeMap::new()
      }),
      Err(_) => BTreeMap::new(),
    };
    Self { path, entries }
  }
}

impl Storage for FileStorage {
  fn get(&self, key: &str) -> Option<String> {
    self.entries.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: String) -> Result<(), PrefsError> {
    self.entries.insert(key.to_string(), value);
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&self.path, serde_json::to_vec_pretty(&self.entries)?)?;
    Ok(())
  }
}

/// In-memory storage; nothing survives the process.
#[derive(Default, Clone)]
pub struct MemoryStorage {
  entries: BTreeMap<String, String>,
}

impl Storage for MemoryStorage {
  fn get(&self, key: &str) -> Option<String> {
    self.entries.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: String) -> Result<(), PrefsError> {
    self.entries.insert(key.to_string(), value);
    Ok(())
  }
}

/// Owner of the favorites list. All mutations go through here and are
/// persisted as a whole after each change.
pub struct PreferenceStore {
  storage: Box<dyn Storage>,
  favorites: Vec<FavoriteVideo>,
}

impl PreferenceStore {
  pub fn new(storage: Box<dyn Storage>) -> Self {
    let mut store = Self { storage, favorites: Vec::new() };
    store.favorites = store.load_favorites();
    store
  }

  pub fn favorites(&self) -> &[FavoriteVideo] {
    &self.favorites
  }

  /// Read favorites from storage. Absent or unparsable data yields an empty list.
  pub fn load_favorites(&self) -> Vec<FavoriteVideo> {
    let Some(raw) = self.storage.get(FAVORITES_KEY) else {
      return Vec::new();
    };
    match serde_json::from_str::<Option<Vec<FavoriteVideo>>>(&raw) {
      Ok(list) => list.unwrap_or_default(),
      Err(e) => {
        warn!(err = %e, "prefs: favorites unparsable, treating as empty");
        Vec::new()
      }
    }
  }

  /// Overwrite the persisted favorites with the in-memory list.
  pub fn save_favorites(&mut self) -> Result<(), PrefsError> {
    let json = serde_json::to_string(&self.favorites)?;
    self.storage.set(FAVORITES_KEY, json)
  }

  /// Append a favorite unless one with the same url exists.
  /// Returns whether the list changed.
  pub fn add_favorite(&mut self, url: &str, title: &str) -> Result<bool, PrefsError> {
    if url.is_empty() || title.is_empty() {
      return Err(PrefsError::InvalidVideoInfo);
    }
    if self.favorites.iter().any(|f| f.url == url) {
      debug!(url, "prefs: favorite already present");
      return Ok(false);
    }
    self.favorites.push(FavoriteVideo { url: url.to_string(), title: title.to_string() });
    self.save_favorites()?;
    Ok(true)
  }

  /// Remove every favorite with this url. Returns whether the list changed.
  pub fn remove_favorite(&mut self, url: &str) -> Result<bool, PrefsError> {
    if url.is_empty() {
      return Err(PrefsError::InvalidVideoUrl);
    }
    let before = self.favorites.len();
    self.favorites.retain(|f| f.url != url);
    self.save_favorites()?;
    Ok(self.favorites.len() != before)
  }

  pub fn load_dark_mode(&self) -> bool {
    self.storage.get(DARK_MODE_KEY).as_deref() == Some("true")
  }

  pub fn save_dark_mode(&mut self, enabled: bool) -> Result<(), PrefsError> {
    self.storage.set(DARK_MODE_KEY, if enabled { "true" } else { "false" }.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store() -> PreferenceStore {
    PreferenceStore::new(Box::new(MemoryStorage::default()))
  }

  #[test]
  fn add_favorite_is_idempotent_by_url() {
    let mut prefs = store();
    assert!(prefs.add_favorite("https://www.youtube.com/watch?v=a", "A").unwrap());
    assert!(!prefs.add_favorite("https://www.youtube.com/watch?v=a", "A again").unwrap());
    assert_eq!(prefs.favorites().len(), 1);
    assert_eq!(prefs.favorites()[0].title, "A");
  }

  #[test]
  fn add_favorite_rejects_empty_fields() {
    let mut prefs = store();
    assert!(matches!(prefs.add_favorite("", "title"), Err(PrefsError::InvalidVideoInfo)));
    assert!(matches!(prefs.add_favorite("https://x", ""), Err(PrefsError::InvalidVideoInfo)));
    assert!(prefs.favorites().is_empty());
  }

  #[test]
  fn remove_missing_favorite_leaves_list_unchanged() {
    let mut prefs = store();
    prefs.add_favorite("u1", "one").unwrap();
    prefs.add_favorite("u2", "two").unwrap();
    assert!(!prefs.remove_favorite("u3").unwrap());
    let urls: Vec<_> = prefs.favorites().iter().map(|f| f.url.as_str()).collect();
    assert_eq!(urls, ["u1", "u2"]);
  }

  #[test]
  fn remove_favorite_rejects_empty_url() {
    let mut prefs = store();
    assert!(matches!(prefs.remove_favorite(""), Err(PrefsError::InvalidVideoUrl)));
  }

  #[test]
  fn remove_favorite_drops_entry() {
    let mut prefs = store();
    prefs.add_favorite("u1", "one").unwrap();
    prefs.add_favorite("u2", "two").unwrap();
    assert!(prefs.remove_favorite("u1").unwrap());
    assert_eq!(prefs.favorites(), &[FavoriteVideo { url: "u2".into(), title: "two".into() }]);
    assert_eq!(prefs.load_favorites(), prefs.favorites());
  }

  #[test]
  fn favorites_survive_reload_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    {
      let mut prefs = PreferenceStore::new(Box::new(FileStorage::open(path.clone())));
      prefs.add_favorite("u2", "second").unwrap();
      prefs.add_favorite("u1", "first").unwrap();
      prefs.add_favorite("u3", "third").unwrap();
    }
    let prefs = PreferenceStore::new(Box::new(FileStorage::open(path)));
    let urls: Vec<_> = prefs.favorites().iter().map(|f| f.url.as_str()).collect();
    assert_eq!(urls, ["u2", "u1", "u3"]);
  }

  #[test]
  fn dark_mode_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    {
      let mut prefs = PreferenceStore::new(Box::new(FileStorage::open(path.clone())));
      assert!(!prefs.load_dark_mode());
      prefs.save_dark_mode(true).unwrap();
    }
    let mut prefs = PreferenceStore::new(Box::new(FileStorage::open(path.clone())));
    assert!(prefs.load_dark_mode());
    prefs.save_dark_mode(false).unwrap();
    assert!(!PreferenceStore::new(Box::new(FileStorage::open(path))).load_dark_mode());
  }

  #[test]
  fn dark_mode_is_stored_as_string_literal() {
    let mut storage = MemoryStorage::default();
    storage.set(DARK_MODE_KEY, "true".to_string()).unwrap();
    let mut prefs = PreferenceStore::new(Box::new(storage));
    assert!(prefs.load_dark_mode());
    prefs.save_dark_mode(false).unwrap();
    assert_eq!(prefs.storage.get(DARK_MODE_KEY).as_deref(), Some("false"));
  }

  #[test]
  fn unparsable_favorites_load_as_empty() {
    let mut storage = MemoryStorage::default();
    storage.set(FAVORITES_KEY, "{not json".to_string()).unwrap();
    assert!(PreferenceStore::new(Box::new(storage)).favorites().is_empty());
  }

  #[test]
  fn null_favorites_load_as_empty() {
    let mut storage = MemoryStorage::default();
    storage.set(FAVORITES_KEY, "null".to_string()).unwrap();
    assert!(PreferenceStore::new(Box::new(storage)).favorites().is_empty());
  }

  #[test]
  fn corrupt_storage_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "garbage").unwrap();
    let storage = FileStorage::open(path);
    assert_eq!(storage.get(FAVORITES_KEY), None);
  }
}
