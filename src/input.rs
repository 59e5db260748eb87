use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Focus, Panel};
use crate::notify::Control;
use crate::share::SystemShare;

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// Single-line editable text with a char-indexed cursor.
#[derive(Debug, Default, Clone)]
pub struct TextField {
  value: String,
  cursor: usize,
  /// Horizontal scroll offset in display columns, maintained by the renderer.
  pub scroll: usize,
}

impl TextField {
  pub fn value(&self) -> &str {
    &self.value
  }

  pub fn trimmed(&self) -> String {
    self.value.trim().to_string()
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn is_empty(&self) -> bool {
    self.value.is_empty()
  }

  /// Replace the contents and move the cursor to the end.
  pub fn set(&mut self, value: &str) {
    self.value = value.to_string();
    self.cursor = self.value.chars().count();
    self.scroll = 0;
  }

  pub fn clear(&mut self) {
    self.value.clear();
    self.cursor = 0;
    self.scroll = 0;
  }

  pub fn insert(&mut self, c: char) {
    let byte_idx = char_to_byte_index(&self.value, self.cursor);
    self.value.insert(byte_idx, c);
    self.cursor += 1;
  }

  pub fn backspace(&mut self) {
    if self.cursor > 0 {
      self.cursor -= 1;
      let byte_idx = char_to_byte_index(&self.value, self.cursor);
      self.value.remove(byte_idx);
    }
  }

  pub fn delete(&mut self) {
    if self.cursor < self.value.chars().count() {
      let byte_idx = char_to_byte_index(&self.value, self.cursor);
      self.value.remove(byte_idx);
    }
  }

  /// Apply an editing key. Returns false for keys that are not edits.
  pub fn handle_key(&mut self, code: KeyCode) -> bool {
    match code {
      KeyCode::Char(c) => self.insert(c),
      KeyCode::Backspace => self.backspace(),
      KeyCode::Delete => self.delete(),
      KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
      KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.chars().count()),
      KeyCode::Home => self.cursor = 0,
      KeyCode::End => self.cursor = self.value.chars().count(),
      _ => return false,
    }
    true
  }
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
  // The acknowledgement dialog swallows the next key.
  if app.notifications.acknowledgement().is_some() {
    app.notifications.dismiss_acknowledgement();
    return;
  }

  // Ctrl+Alt is AltGr on some layouts and types a character.
  if key.modifiers == KeyModifiers::CONTROL {
    handle_control_key(app, key.code);
    return;
  }

  match key.code {
    KeyCode::Tab => {
      app.focus = app.focus.next(app.panel);
      return;
    }
    KeyCode::BackTab => {
      app.focus = app.focus.prev(app.panel);
      return;
    }
    KeyCode::Esc => {
      handle_escape(app);
      return;
    }
    _ => {}
  }

  match app.focus {
    Focus::Url => {
      if key.code == KeyCode::Enter {
        app.load_video(None, None);
      } else {
        app.url_field.handle_key(key.code);
      }
    }
    Focus::Search => {
      if key.code == KeyCode::Enter {
        if !app.notifications.is_loading(Control::Search) {
          app.trigger_search();
        }
      } else {
        app.search_field.handle_key(key.code);
      }
    }
    Focus::Question => {
      if key.code == KeyCode::Enter {
        if !app.notifications.is_loading(Control::Ask) {
          app.trigger_ask();
        }
      } else {
        app.question_field.handle_key(key.code);
      }
    }
    Focus::Results => handle_results_key(app, key.code),
    Focus::Favorites => handle_favorites_key(app, key.code),
  }
}

fn handle_control_key(app: &mut App, code: KeyCode) {
  match code {
    KeyCode::Char('c') => app.should_quit = true,
    KeyCode::Char('d') => app.toggle_dark_mode(),
    KeyCode::Char('l') => app.toggle_language(),
    KeyCode::Char('p') => {
      let panel = match app.panel {
        Panel::Summary => Panel::Chat,
        Panel::Chat => Panel::Summary,
      };
      app.switch_mode(panel);
    }
    KeyCode::Char('r') => {
      if !app.notifications.is_loading(Control::Summarize) {
        app.trigger_summarize();
      }
    }
    KeyCode::Char('k') => app.start_video_chat(),
    KeyCode::Char('f') => app.add_current_to_favorites(),
    KeyCode::Char('e') => app.share_summary(&mut SystemShare),
    KeyCode::Char('o') => {
      if let Some(url) = app.video.as_ref().map(|v| v.url.clone()) {
        app.open_in_browser(&url);
      }
    }
    _ => {}
  }
}

fn handle_escape(app: &mut App) {
  if app.notifications.dismiss_latest() {
    return;
  }
  let field = match app.focus {
    Focus::Url => Some(&mut app.url_field),
    Focus::Search => Some(&mut app.search_field),
    Focus::Question => Some(&mut app.question_field),
    Focus::Results | Focus::Favorites => None,
  };
  match field {
    Some(field) if !field.is_empty() => field.clear(),
    _ => app.should_quit = true,
  }
}

/// Move a list selection with wrap-around.
fn step_selection(selected: Option<usize>, count: usize, forward: bool) -> Option<usize> {
  if count == 0 {
    return None;
  }
  Some(match (selected, forward) {
    (None, _) => 0,
    (Some(i), true) => (i + 1) % count,
    (Some(0), false) => count - 1,
    (Some(i), false) => i - 1,
  })
}

fn handle_results_key(app: &mut App, code: KeyCode) {
  let count = app.search.as_ref().map_or(0, |s| s.results().len());
  match code {
    KeyCode::Down | KeyCode::Char('j') => {
      app.results_state.select(step_selection(app.results_state.selected(), count, true));
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.results_state.select(step_selection(app.results_state.selected(), count, false));
    }
    KeyCode::Enter => app.load_selected_result(),
    KeyCode::Char('o') => {
      if let Some(url) = app.selected_result_url() {
        app.open_in_browser(&url);
      }
    }
    _ => {}
  }
}

fn handle_favorites_key(app: &mut App, code: KeyCode) {
  let count = app.prefs.favorites().len();
  let selected = app.favorites_state.selected().and_then(|i| app.prefs.favorites().get(i)).cloned();
  match code {
    KeyCode::Down | KeyCode::Char('j') => {
      app.favorites_state.select(step_selection(app.favorites_state.selected(), count, true));
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.favorites_state.select(step_selection(app.favorites_state.selected(), count, false));
    }
    KeyCode::Enter => {
      if let Some(fav) = selected {
        app.open_in_browser(&fav.url);
      }
    }
    KeyCode::Char('l') => {
      if let Some(fav) = selected {
        app.load_video(Some(&fav.url), Some(&fav.title));
      }
    }
    KeyCode::Char('d') | KeyCode::Delete => {
      if let Some(fav) = selected {
        app.remove_favorite(&fav.url);
      }
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::HttpBackend;
  use crate::display::DisplayMode;
  use crate::prefs::{MemoryStorage, PreferenceStore};
  use std::sync::Arc;

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "aé日"; // a=1 byte, é=2 bytes, 日=3 bytes
    assert_eq!(char_to_byte_index(s, 1), 1);
    assert_eq!(char_to_byte_index(s, 2), 3);
    assert_eq!(char_to_byte_index(s, 3), 6);
  }

  // --- TextField ---

  #[test]
  fn text_field_edits_at_cursor() {
    let mut field = TextField::default();
    for c in "kätze".chars() {
      field.handle_key(KeyCode::Char(c));
    }
    field.handle_key(KeyCode::Home);
    field.handle_key(KeyCode::Delete);
    field.handle_key(KeyCode::Char('K'));
    field.handle_key(KeyCode::End);
    field.handle_key(KeyCode::Backspace);
    assert_eq!(field.value(), "Kätz");
    assert_eq!(field.cursor(), 4);
  }

  #[test]
  fn text_field_cursor_stays_in_bounds() {
    let mut field = TextField::default();
    field.set("ab");
    field.handle_key(KeyCode::Right);
    assert_eq!(field.cursor(), 2);
    field.handle_key(KeyCode::Left);
    field.handle_key(KeyCode::Left);
    field.handle_key(KeyCode::Left);
    assert_eq!(field.cursor(), 0);
    field.handle_key(KeyCode::Backspace);
    assert_eq!(field.value(), "ab");
  }

  #[test]
  fn text_field_ignores_non_edit_keys() {
    let mut field = TextField::default();
    assert!(!field.handle_key(KeyCode::Enter));
    assert!(!field.handle_key(KeyCode::Tab));
  }

  // --- step_selection ---

  #[test]
  fn selection_wraps_both_ways() {
    assert_eq!(step_selection(None, 3, true), Some(0));
    assert_eq!(step_selection(Some(2), 3, true), Some(0));
    assert_eq!(step_selection(Some(0), 3, false), Some(2));
    assert_eq!(step_selection(Some(1), 3, false), Some(0));
    assert_eq!(step_selection(Some(1), 0, true), None);
  }

  // --- handle_key_event ---

  fn app() -> App {
    let prefs = PreferenceStore::new(Box::new(MemoryStorage::default()));
    App::new(Arc::new(HttpBackend::new("http://127.0.0.1:1")), prefs, DisplayMode::Off)
  }

  #[test]
  fn altgr_characters_are_typed_not_shortcuts() {
    let mut app = app();
    let dark_mode = app.dark_mode;
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('@'), KeyModifiers::CONTROL | KeyModifiers::ALT));
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL | KeyModifiers::ALT));
    assert_eq!(app.url_field.value(), "@d");
    assert_eq!(app.dark_mode, dark_mode);
  }

  #[test]
  fn plain_ctrl_runs_shortcuts() {
    let mut app = app();
    let dark_mode = app.dark_mode;
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
    assert!(app.url_field.is_empty());
    assert_eq!(app.dark_mode, !dark_mode);
  }
}
