use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub status: Color,
  pub error: Color,
  pub error_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
  pub progress: Color,
}

pub const LIGHT: Theme = Theme {
  name: "light",
  bg: Color::Rgb(250, 248, 245),
  fg: Color::Rgb(40, 40, 46),
  accent: Color::Rgb(200, 60, 60),
  muted: Color::Rgb(130, 128, 124),
  border: Color::Rgb(205, 200, 192),
  highlight_fg: Color::Rgb(255, 255, 255),
  highlight_bg: Color::Rgb(200, 60, 60),
  stripe_bg: Color::Rgb(242, 239, 234),
  status: Color::Rgb(40, 110, 170),
  error: Color::Rgb(150, 20, 20),
  error_bg: Color::Rgb(250, 220, 220),
  key_fg: Color::Rgb(255, 255, 255),
  key_bg: Color::Rgb(90, 90, 100),
  progress: Color::Rgb(60, 150, 90),
};

pub const DARK: Theme = Theme {
  name: "dark",
  bg: Color::Rgb(24, 24, 28),
  fg: Color::Rgb(225, 225, 230),
  accent: Color::Rgb(255, 95, 95),
  muted: Color::Rgb(120, 120, 132),
  border: Color::Rgb(60, 60, 70),
  highlight_fg: Color::Rgb(24, 24, 28),
  highlight_bg: Color::Rgb(255, 95, 95),
  stripe_bg: Color::Rgb(32, 32, 38),
  status: Color::Rgb(120, 180, 255),
  error: Color::Rgb(255, 140, 140),
  error_bg: Color::Rgb(80, 24, 28),
  key_fg: Color::Rgb(24, 24, 28),
  key_bg: Color::Rgb(170, 170, 185),
  progress: Color::Rgb(110, 200, 140),
};

pub fn theme_for(dark_mode: bool) -> &'static Theme {
  if dark_mode { &DARK } else { &LIGHT }
}
