use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliDisplayMode {
  Auto,
  Direct,
  Ascii,
  Off,
}

impl CliDisplayMode {
  /// Parse the `display_mode` config value; unknown values mean auto-detect.
  pub fn from_config(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "direct" => CliDisplayMode::Direct,
      "ascii" => CliDisplayMode::Ascii,
      "off" => CliDisplayMode::Off,
      _ => CliDisplayMode::Auto,
    }
  }
}

/// How the thumbnail pane draws images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
  Ascii,
  Direct,
  /// Thumbnails are neither fetched nor drawn.
  Off,
}

impl DisplayMode {
  pub fn label(self) -> &'static str {
    match self {
      DisplayMode::Ascii => "ASCII",
      DisplayMode::Direct => "Half-block",
      DisplayMode::Off => "Off",
    }
  }

  pub fn shows_thumbnails(self) -> bool {
    self != DisplayMode::Off
  }
}

/// True-color terminals get half-block rendering, everything else ASCII.
pub fn detect_display_mode() -> DisplayMode {
  let colorterm = std::env::var("COLORTERM").unwrap_or_default().to_lowercase();
  if colorterm == "truecolor" || colorterm == "24bit" {
    return DisplayMode::Direct;
  }
  DisplayMode::Ascii
}

pub fn resolve_display_mode(cli: CliDisplayMode) -> DisplayMode {
  match cli {
    CliDisplayMode::Auto => detect_display_mode(),
    CliDisplayMode::Direct => DisplayMode::Direct,
    CliDisplayMode::Ascii => DisplayMode::Ascii,
    CliDisplayMode::Off => DisplayMode::Off,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_values_parse_case_insensitively() {
    assert_eq!(CliDisplayMode::from_config("ASCII"), CliDisplayMode::Ascii);
    assert_eq!(CliDisplayMode::from_config("direct"), CliDisplayMode::Direct);
    assert_eq!(CliDisplayMode::from_config("Off"), CliDisplayMode::Off);
    assert_eq!(CliDisplayMode::from_config("kitty"), CliDisplayMode::Auto);
  }

  #[test]
  fn explicit_modes_skip_detection() {
    assert_eq!(resolve_display_mode(CliDisplayMode::Ascii), DisplayMode::Ascii);
    assert_eq!(resolve_display_mode(CliDisplayMode::Off), DisplayMode::Off);
    assert!(!DisplayMode::Off.shows_thumbnails());
  }
}
