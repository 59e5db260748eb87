//! Exporting the rendered summary.
//!
//! A native share command (`termux-share`) is used when it is on `PATH`;
//! otherwise the text goes to the system clipboard through an OSC 52
//! escape sequence, which the terminal forwards to the clipboard.

use anyhow::{Context, Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{info, warn};

pub const SHARE_TITLE: &str = "Video Summary";
const NATIVE_SHARE_COMMAND: &str = "termux-share";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
  pub title: &'static str,
  pub text: String,
  pub url: String,
}

impl SharePayload {
  pub fn new(text: String, url: String) -> Self {
    Self { title: SHARE_TITLE, text, url }
  }

  /// Text placed on the clipboard when native sharing is unavailable.
  pub fn clipboard_text(&self) -> String {
    format!("Video Summary for {}:\n\n{}", self.url, self.text)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
  Shared,
  Copied,
}

pub trait ShareTarget {
  fn native_available(&self) -> bool;
  fn native_share(&mut self, payload: &SharePayload) -> Result<()>;
  fn copy_to_clipboard(&mut self, text: &str) -> Result<()>;
}

/// Share through the native command if available, else copy to the clipboard.
pub fn share(payload: &SharePayload, target: &mut dyn ShareTarget) -> Result<ShareOutcome> {
  if target.native_available() {
    target.native_share(payload).context("native share failed")?;
    info!("share: summary shared natively");
    Ok(ShareOutcome::Shared)
  } else {
    target.copy_to_clipboard(&payload.clipboard_text()).context("clipboard copy failed")?;
    info!("share: summary copied to clipboard");
    Ok(ShareOutcome::Copied)
  }
}

/// OSC 52 "set clipboard" escape sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
  format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}

/// Start `command`, feed it `input` and return without waiting for it to exit.
/// The share sheet stays open as long as the user likes; the frame loop keeps running.
fn spawn_with_input(mut command: Command, input: &str) -> Result<()> {
  let program = command.get_program().to_string_lossy().into_owned();
  let mut child = command
    .stdin(Stdio::piped())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()
    .with_context(|| format!("Failed to spawn {}", program))?;
  let written = match child.stdin.take() {
    Some(mut stdin) => stdin.write_all(input.as_bytes()).context("Failed to write share text"),
    None => Err(anyhow!("Failed to open share stdin")),
  };
  // Reap the child in a background thread to avoid zombie processes.
  std::thread::spawn(move || match child.wait() {
    Ok(status) if !status.success() => warn!(program = %program, %status, "share: command exited with failure"),
    Ok(_) => {}
    Err(e) => warn!(program = %program, err = %e, "share: failed to wait for command"),
  });
  written
}

/// Share target backed by the host system.
pub struct SystemShare;

impl ShareTarget for SystemShare {
  fn native_available(&self) -> bool {
    std::env::var_os("PATH")
      .is_some_and(|paths| std::env::split_paths(&paths).any(|dir| dir.join(NATIVE_SHARE_COMMAND).is_file()))
  }

  fn native_share(&mut self, payload: &SharePayload) -> Result<()> {
    let mut command = Command::new(NATIVE_SHARE_COMMAND);
    command.args(["-a", "send", "-c", "text/plain", "-t", payload.title]);
    spawn_with_input(command, &format!("{}\n\n{}", payload.text, payload.url))
  }

  fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(osc52_sequence(text).as_bytes()).context("Failed to write clipboard sequence")?;
    stdout.flush().context("Failed to flush clipboard sequence")?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Default)]
  struct RecordingTarget {
    native: bool,
    fail: bool,
    shared: Vec<SharePayload>,
    copied: Vec<String>,
  }

  impl ShareTarget for RecordingTarget {
    fn native_available(&self) -> bool {
      self.native
    }

    fn native_share(&mut self, payload: &SharePayload) -> Result<()> {
      if self.fail {
        return Err(anyhow!("cancelled"));
      }
      self.shared.push(payload.clone());
      Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
      if self.fail {
        return Err(anyhow!("no clipboard"));
      }
      self.copied.push(text.to_string());
      Ok(())
    }
  }

  fn payload() -> SharePayload {
    SharePayload::new("Summary text".into(), "https://www.youtube.com/watch?v=abc123".into())
  }

  #[test]
  fn native_share_preferred() {
    let mut target = RecordingTarget { native: true, ..Default::default() };
    assert_eq!(share(&payload(), &mut target).unwrap(), ShareOutcome::Shared);
    assert_eq!(target.shared[0].title, "Video Summary");
    assert!(target.copied.is_empty());
  }

  #[test]
  fn clipboard_fallback_formats_text() {
    let mut target = RecordingTarget::default();
    assert_eq!(share(&payload(), &mut target).unwrap(), ShareOutcome::Copied);
    assert_eq!(target.copied, vec!["Video Summary for https://www.youtube.com/watch?v=abc123:\n\nSummary text"]);
  }

  #[test]
  fn failures_propagate() {
    let mut native = RecordingTarget { native: true, fail: true, ..Default::default() };
    assert!(share(&payload(), &mut native).is_err());
    let mut clipboard = RecordingTarget { fail: true, ..Default::default() };
    assert!(share(&payload(), &mut clipboard).is_err());
  }

  #[test]
  fn osc52_encodes_base64() {
    assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
  }

  #[test]
  fn share_command_does_not_block() {
    let mut command = Command::new("sleep");
    command.arg("5");
    let started = std::time::Instant::now();
    spawn_with_input(command, "Summary text").unwrap();
    assert!(started.elapsed() < std::time::Duration::from_secs(1));
  }

  #[test]
  fn missing_share_command_is_an_error() {
    let command = Command::new("voyager-no-such-share-command");
    let err = spawn_with_input(command, "Summary text").unwrap_err();
    assert!(err.to_string().contains("voyager-no-such-share-command"));
  }
}
