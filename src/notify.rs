use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::constants::constants;

/// Interactive controls that can show a busy state while a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
  Search,
  Summarize,
  Ask,
}

impl Control {
  pub fn busy_label(self) -> &'static str {
    match self {
      Control::Search => "Searching…",
      Control::Summarize => "Summarizing…",
      Control::Ask => "Asking…",
    }
  }
}

/// One error banner. Each banner carries its own removal deadline.
#[derive(Debug, Clone)]
pub struct Banner {
  pub message: String,
  pub expires_at: Instant,
}

/// Error banners, busy controls, and the blocking acknowledgement dialog.
#[derive(Debug, Default)]
pub struct Notifications {
  banners: Vec<Banner>,
  busy: HashSet<Control>,
  acknowledgement: Option<String>,
  pub info: Option<String>,
}

impl Notifications {
  pub fn show_loading(&mut self, control: Control) {
    self.busy.insert(control);
  }

  pub fn hide_loading(&mut self, control: Control) {
    self.busy.remove(&control);
  }

  pub fn is_loading(&self, control: Control) -> bool {
    self.busy.contains(&control)
  }

  /// Busy controls in a stable order for the status line.
  pub fn loading(&self) -> Vec<Control> {
    [Control::Search, Control::Summarize, Control::Ask].into_iter().filter(|c| self.busy.contains(c)).collect()
  }

  /// Push an error banner that removes itself after the dismiss delay.
  pub fn show_error(&mut self, message: impl Into<String>) {
    self.show_error_at(message, Instant::now());
  }

  pub fn show_error_at(&mut self, message: impl Into<String>, now: Instant) {
    let message = message.into();
    tracing::warn!(message = %message, "notify: error banner");
    let expires_at = now + Duration::from_secs(constants().error_dismiss_secs);
    self.banners.push(Banner { message, expires_at });
  }

  /// Drop every banner whose deadline has passed.
  pub fn expire(&mut self, now: Instant) {
    self.banners.retain(|b| b.expires_at > now);
  }

  /// Remove the newest banner before its deadline.
  pub fn dismiss_latest(&mut self) -> bool {
    self.banners.pop().is_some()
  }

  pub fn banners(&self) -> &[Banner] {
    &self.banners
  }

  /// Show a message that blocks input until the user acknowledges it.
  pub fn acknowledge(&mut self, message: impl Into<String>) {
    self.acknowledgement = Some(message.into());
  }

  pub fn acknowledgement(&self) -> Option<&str> {
    self.acknowledgement.as_deref()
  }

  pub fn dismiss_acknowledgement(&mut self) {
    self.acknowledgement = None;
  }
}
