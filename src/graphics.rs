use image::{DynamicImage, imageops::FilterType};
use ratatui::{
  buffer::Buffer,
  layout::Rect,
  style::{Color, Style},
  widgets::Widget,
};

use crate::display::DisplayMode;

const ASCII_RAMP: [&str; 10] = [" ", ".", ":", "-", "=", "+", "*", "#", "%", "@"];

/// Scale a thumbnail to cover `area`. Half-block mode packs two pixel rows per cell.
pub fn fit_thumbnail(image: &DynamicImage, area: Rect, mode: DisplayMode) -> DynamicImage {
  let w = u32::from(area.width).max(1);
  let rows_per_cell = if mode == DisplayMode::Direct { 2 } else { 1 };
  let h = (u32::from(area.height) * rows_per_cell).max(1);
  image.resize_to_fill(w, h, FilterType::Triangle)
}

/// Draws an image already scaled with [`fit_thumbnail`].
pub struct ThumbnailWidget<'a> {
  pub image: &'a DynamicImage,
  pub display_mode: DisplayMode,
}

impl Widget for ThumbnailWidget<'_> {
  fn render(self, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
      return;
    }
    match self.display_mode {
      DisplayMode::Direct => render_half_blocks(self.image, area, buf),
      DisplayMode::Ascii => render_ascii(self.image, area, buf),
      DisplayMode::Off => {}
    }
  }
}

fn render_half_blocks(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let rgb = image.to_rgb8();
  let cols = rgb.width().min(u32::from(area.width));
  let cells = rgb.height().div_ceil(2).min(u32::from(area.height));

  for cy in 0..cells {
    for x in 0..cols {
      let top = rgb.get_pixel(x, cy * 2);
      let bottom_y = cy * 2 + 1;
      let bg = if bottom_y < rgb.height() {
        let p = rgb.get_pixel(x, bottom_y);
        Color::Rgb(p[0], p[1], p[2])
      } else {
        Color::Reset
      };
      let style = Style::default().fg(Color::Rgb(top[0], top[1], top[2])).bg(bg);
      buf.set_string(area.x + x as u16, area.y + cy as u16, "▀", style);
    }
  }
}

fn render_ascii(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let luma = image.to_luma8();
  let cols = luma.width().min(u32::from(area.width));
  let rows = luma.height().min(u32::from(area.height));
  let last = ASCII_RAMP.len() - 1;

  for y in 0..rows {
    for x in 0..cols {
      let level = luma.get_pixel(x, y)[0] as usize * last / 255;
      buf.set_string(area.x + x as u16, area.y + y as u16, ASCII_RAMP[level.min(last)], Style::default());
    }
  }
}
