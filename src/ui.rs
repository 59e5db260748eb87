use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus, Panel, SummaryState};
use crate::chat::{ANSWER_FAILED, ChatReply, PROCESSING};
use crate::graphics::{ThumbnailWidget, fit_thumbnail};
use crate::input::TextField;
use crate::theme::Theme;
use crate::view::{ChatAnswerView, SearchView};

const MAX_BANNERS: usize = 3;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

/// Rows a line occupies once word-wrapped to `width` columns.
fn wrapped_rows(text: &str, width: usize) -> usize {
  if width == 0 {
    return 0;
  }
  let mut rows = 1;
  let mut col = 0;
  for word in text.split(' ') {
    let w = word.width();
    let needed = if col == 0 { w } else { col + 1 + w };
    if needed <= width {
      col = needed;
    } else if w <= width {
      rows += 1;
      col = w;
    } else {
      // Words longer than the line are broken across rows.
      let start = if col == 0 { 0 } else { 1 };
      rows += start + (w - 1) / width;
      col = w % width;
      if col == 0 {
        col = width;
      }
    }
  }
  rows
}

/// Total wrapped height of `lines`, used to keep the newest chat exchange in view.
fn wrapped_height(lines: &[Line], width: usize) -> usize {
  lines
    .iter()
    .map(|line| {
      let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
      wrapped_rows(&text, width)
    })
    .sum()
}

fn bordered<'a>(theme: &Theme, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
  let color = if focused { theme.accent } else { theme.border };
  Block::bordered()
    .title(title)
    .title_style(Style::default().fg(if focused { theme.accent } else { theme.fg }).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(color))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)), frame.area());

  let banner_rows = app.notifications.banners().len().min(MAX_BANNERS) as u16;
  let [header_area, banner_area, url_area, body_area, status_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(banner_rows),
    Constraint::Length(3),
    Constraint::Min(8),
    Constraint::Length(1),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, app, header_area);
  render_banners(frame, app, banner_area);
  let focused = app.focus == Focus::Url;
  render_text_field(frame, theme, &mut app.url_field, " YouTube URL ", focused, url_area);

  let [left_area, right_area] =
    Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(body_area);
  render_left_column(frame, app, left_area);
  render_right_column(frame, app, right_area);

  render_status(frame, app, status_area);
  render_footer(frame, app, footer_area);

  if let Some(message) = app.notifications.acknowledgement() {
    render_acknowledgement(frame, theme, message);
  }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let brand = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
  let left = Line::from(Span::styled(" ▶ VideoVoyager ", brand));
  frame.render_widget(left, area);

  let info = format!("{} · {} · v{} ", app.language.label(), theme.name, env!("CARGO_PKG_VERSION"));
  let width = info.width() as u16;
  let right = Line::from(Span::styled(info, Style::default().fg(theme.muted)));
  let right_area = Rect { x: area.x + area.width.saturating_sub(width), width: width.min(area.width), ..area };
  frame.render_widget(right, right_area);
}

fn render_banners(frame: &mut Frame, app: &App, area: Rect) {
  if area.height == 0 {
    return;
  }
  let theme = app.theme();
  let style = Style::default().fg(theme.error).bg(theme.error_bg);
  let inner_w = area.width.saturating_sub(4) as usize;
  // Newest banners are the ones that stay visible.
  let banners = app.notifications.banners();
  let lines: Vec<Line> = banners
    .iter()
    .skip(banners.len().saturating_sub(MAX_BANNERS))
    .map(|b| Line::from(Span::styled(format!(" ⚠  {}", truncate_str(&b.message, inner_w)), style)))
    .collect();
  frame.render_widget(Paragraph::new(lines).style(style), area);
}

fn render_text_field(frame: &mut Frame, theme: &Theme, field: &mut TextField, title: &str, focused: bool, area: Rect) {
  let block = bordered(theme, title.to_string(), focused).padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  if inner_w == 0 {
    frame.render_widget(block, area);
    return;
  }
  let cursor_col = display_width(field.value(), field.cursor());

  if cursor_col < field.scroll {
    field.scroll = cursor_col;
  } else if cursor_col >= field.scroll + inner_w {
    field.scroll = cursor_col.saturating_sub(inner_w) + 1;
  }
  let scroll = field.scroll;

  let visible: String = field
    .value()
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= scroll)
    .take_while(|(start, _, _)| *start < scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(block);
  frame.render_widget(paragraph, area);

  if focused && area.height >= 3 {
    let cursor_x = area.x + 2 + cursor_col.saturating_sub(scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

// --- Left column: search and favorites ---

fn render_left_column(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let favorites_h = (app.prefs.favorites().len() as u16 + 2).clamp(3, 10);
  let [search_area, results_area, favorites_area] =
    Layout::vertical([Constraint::Length(3), Constraint::Min(3), Constraint::Length(favorites_h)]).areas(area);

  let focused = app.focus == Focus::Search;
  render_text_field(frame, theme, &mut app.search_field, " Search YouTube ", focused, search_area);
  render_results(frame, app, results_area);
  render_favorites(frame, app, favorites_area);
}

fn striped_item<'a>(theme: &Theme, i: usize, selected: bool, line: Line<'a>) -> ListItem<'a> {
  let bg = if selected {
    theme.highlight_bg
  } else if i % 2 == 1 {
    theme.stripe_bg
  } else {
    theme.bg
  };
  ListItem::new(line).bg(bg)
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let block = bordered(theme, " Results ", app.focus == Focus::Results);

  let results = match &app.search {
    None => {
      let hint = Paragraph::new(Line::from(Span::styled("Search for a video above.", Style::default().fg(theme.muted))))
        .block(block.padding(Padding::horizontal(1)));
      frame.render_widget(hint, area);
      return;
    }
    Some(SearchView::NoResults) => {
      let empty = Paragraph::new(Line::from(Span::styled(SearchView::NO_RESULTS, Style::default().fg(theme.muted))))
        .alignment(Alignment::Center)
        .block(block);
      frame.render_widget(empty, area);
      return;
    }
    Some(SearchView::Results(results)) => results,
  };

  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;
  let selected = app.results_state.selected();
  let items: Vec<ListItem> = results
    .iter()
    .enumerate()
    .map(|(i, result)| {
      let is_selected = Some(i) == selected;
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let mut spans = vec![Span::styled(truncate_str(&result.title, inner_w), Style::default().fg(fg))];
      let title_w = spans[0].content.width();
      if !result.description.is_empty() && title_w + 3 < inner_w {
        let desc = truncate_str(&result.description, inner_w - title_w - 2);
        spans.push(Span::raw("  "));
        spans.push(Span::styled(desc, Style::default().fg(if is_selected { fg } else { theme.muted })));
      }
      striped_item(theme, i, is_selected, Line::from(spans))
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));
  frame.render_stateful_widget(list, area, &mut app.results_state);
}

fn render_favorites(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let title = format!(" Favorites ({}) ", app.prefs.favorites().len());
  let block = bordered(theme, title, app.focus == Focus::Favorites);

  if app.prefs.favorites().is_empty() {
    let text = Span::styled("No favorites yet. ^f adds the loaded video.", Style::default().fg(theme.muted));
    let hint = Paragraph::new(Line::from(text)).block(block.padding(Padding::horizontal(1)));
    frame.render_widget(hint, area);
    return;
  }

  let inner_w = area.width.saturating_sub(4) as usize;
  let selected = app.favorites_state.selected();
  let items: Vec<ListItem> = app
    .prefs
    .favorites()
    .iter()
    .enumerate()
    .map(|(i, fav)| {
      let is_selected = Some(i) == selected;
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let line = Line::from(Span::styled(truncate_str(&fav.title, inner_w), Style::default().fg(fg)));
      striped_item(theme, i, is_selected, line)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_symbol("★ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));
  frame.render_stateful_widget(list, area, &mut app.favorites_state);
}

// --- Right column: video, summary and chat ---

fn render_right_column(frame: &mut Frame, app: &mut App, area: Rect) {
  let [video_area, panel_area] =
    Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(area);
  render_video(frame, app, video_area);
  match app.panel {
    Panel::Summary => render_summary(frame, app, panel_area),
    Panel::Chat => render_chat(frame, app, panel_area),
  }
}

fn render_video(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let title = Line::from(vec![
    Span::styled(" Video ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled(format!("[{}] ", app.display_mode.label().to_lowercase()), Style::default().fg(theme.muted)),
  ]);
  let block = bordered(theme, title, false);
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let Some(video) = &app.video else {
    let hint = Paragraph::new(vec![
      Line::from(""),
      Line::from(Span::styled("Enter a YouTube URL and press Enter to load it.", Style::default().fg(theme.muted))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(hint, inner);
    return;
  };

  let show_thumb = app.display_mode.shows_thumbnails() && inner.width >= 40;
  let [thumb_area, info_area] = if show_thumb {
    Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(inner)
  } else {
    [Rect::default(), inner]
  };

  let inner_w = info_area.width.saturating_sub(2) as usize;
  let value_w = inner_w.saturating_sub(10);
  let field = |name: &'static str, value: String| {
    Line::from(vec![
      Span::styled(name, Style::default().fg(theme.muted)),
      Span::styled(truncate_str(&value, value_w), Style::default().fg(theme.fg)),
    ])
  };
  let lines = vec![
    Line::from(Span::styled(
      truncate_str(&video.title, inner_w),
      Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    )),
    Line::from(""),
    field("Video ID  ", video.video_id.clone()),
    field("Player    ", video.embed_url()),
    field("Thumbnail ", video.thumbnail.clone()),
    Line::from(""),
    Line::from(Span::styled(
      truncate_str(&video.url, inner_w),
      Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
    )),
  ];
  frame.render_widget(Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1))), info_area);

  if !show_thumb || thumb_area.is_empty() {
    return;
  }
  let display_mode = app.display_mode;
  if let Some(thumb) = app.thumbnail.as_mut().filter(|t| t.video_id == video.video_id) {
    let stale = thumb.fitted.as_ref().is_none_or(|(fitted_area, _)| *fitted_area != thumb_area);
    if stale {
      thumb.fitted = Some((thumb_area, fit_thumbnail(&thumb.image, thumb_area, display_mode)));
    }
    if let Some((_, ref image)) = thumb.fitted {
      frame.render_widget(ThumbnailWidget { image, display_mode }, thumb_area);
    }
  }
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let title = Line::from(vec![
    Span::styled(" Summary ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled(format!("[{}] ", app.language.label()), Style::default().fg(theme.muted)),
  ]);
  let block = bordered(theme, title, false).padding(Padding::horizontal(1));
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let show_gauge = app.summary == SummaryState::Summarizing || app.progress > 0;
  let [gauge_area, text_area] =
    Layout::vertical([Constraint::Length(if show_gauge { 2 } else { 0 }), Constraint::Min(1)]).areas(inner);

  if show_gauge {
    let gauge = Gauge::default()
      .gauge_style(Style::default().fg(theme.progress).bg(theme.stripe_bg))
      .percent(app.progress.min(100))
      .label(format!("Upload {}%", app.progress.min(100)));
    frame.render_widget(gauge, Rect { height: 1, ..gauge_area });
  }

  let lines = match &app.summary {
    SummaryState::Empty => vec![Line::from(Span::styled(
      "Load a video and press ^r to summarize it.",
      Style::default().fg(theme.muted),
    ))],
    SummaryState::Summarizing => {
      vec![Line::from(Span::styled(SummaryState::PLACEHOLDER, Style::default().fg(theme.status)))]
    }
    SummaryState::Ready(view) => {
      let heading = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
      let mut lines = vec![
        Line::from(Span::styled(format!("{}:", view.language.summary_heading()), heading)),
        Line::from(view.summary.clone()),
      ];
      if !view.key_points.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("{}:", view.language.key_points_heading()), heading)));
        lines.extend(view.key_points.iter().map(|p| Line::from(format!("• {}", p))));
      }
      lines
    }
  };
  frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), text_area);
}

fn transcript_lines<'a>(app: &'a App, theme: &Theme) -> Vec<Line<'a>> {
  let heading = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
  let mut lines = Vec::new();
  for exchange in app.transcript.exchanges() {
    lines.push(Line::from(vec![
      Span::styled("You ", heading),
      Span::styled(exchange.asked_at.format("%H:%M").to_string(), Style::default().fg(theme.muted)),
    ]));
    lines.push(Line::from(exchange.question.as_str()));
    match &exchange.reply {
      ChatReply::Pending => lines.push(Line::from(Span::styled(PROCESSING, Style::default().fg(theme.status)))),
      ChatReply::Failed => lines.push(Line::from(Span::styled(ANSWER_FAILED, Style::default().fg(theme.error)))),
      ChatReply::Answered(answer) => lines.extend(answer_lines(answer, theme)),
    }
    lines.push(Line::from(""));
  }
  lines
}

fn answer_lines<'a>(answer: &'a ChatAnswerView, theme: &Theme) -> Vec<Line<'a>> {
  let heading = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
  let mut lines = Vec::new();
  match answer {
    ChatAnswerView::Raw { notice, text } => {
      lines.push(Line::from(Span::styled(*notice, Style::default().fg(theme.muted))));
      lines.extend(text.lines().map(Line::from));
    }
    ChatAnswerView::Structured { language, summary, facts, timestamps } => {
      if let Some(summary) = summary {
        lines.push(Line::from(Span::styled(format!("{}:", language.chat_summary_heading()), heading)));
        lines.push(Line::from(summary.as_str()));
      }
      if !facts.is_empty() {
        lines.push(Line::from(Span::styled(format!("{}:", language.key_points_heading()), heading)));
        lines.extend(facts.iter().map(|f| Line::from(format!("• {}", f))));
      }
      if !timestamps.is_empty() {
        lines.push(Line::from(Span::styled(format!("{}:", language.timestamps_heading()), heading)));
        lines.extend(timestamps.iter().map(|t| Line::from(format!("• {}", t))));
      }
    }
  }
  lines
}

fn render_chat(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let [transcript_area, question_area] = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

  let title = Line::from(vec![
    Span::styled(" Chat ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled(format!("[{}] ", app.language.label()), Style::default().fg(theme.muted)),
  ]);
  let block = bordered(theme, title, false).padding(Padding::horizontal(1));
  let inner = block.inner(transcript_area);

  let lines = if app.transcript.is_empty() {
    vec![Line::from(Span::styled("Ask anything about the loaded video.", Style::default().fg(theme.muted)))]
  } else {
    transcript_lines(app, theme)
  };
  let height = wrapped_height(&lines, inner.width as usize);
  let scroll = height.saturating_sub(inner.height as usize) as u16;
  let transcript = Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((scroll, 0)).block(block);
  frame.render_widget(transcript, transcript_area);

  let focused = app.focus == Focus::Question;
  render_text_field(frame, theme, &mut app.question_field, " Question ", focused, question_area);
}

// --- Status, footer, dialogs ---

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let busy = app.notifications.loading();
  let (text, style) = if !busy.is_empty() {
    let labels: Vec<&str> = busy.iter().map(|c| c.busy_label()).collect();
    (format!(" ⏳ {}", labels.join("  ")), Style::default().fg(theme.status))
  } else if let Some(info) = &app.notifications.info {
    (format!(" ✓ {}", info), Style::default().fg(theme.status))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn footer_keys(app: &App) -> Vec<(&'static str, &'static str)> {
  let mut keys = match app.focus {
    Focus::Url => vec![("Enter", "Load")],
    Focus::Search => vec![("Enter", "Search")],
    Focus::Results => vec![("Enter", "Load"), ("o", "Open"), ("j/k", "Navigate")],
    Focus::Favorites => vec![("Enter", "Open"), ("l", "Load"), ("d", "Remove")],
    Focus::Question => vec![("Enter", "Ask")],
  };
  keys.push(("Tab", "Focus"));
  keys.push(("^r", "Summarize"));
  keys.push(("^k", "Chat"));
  keys.push(("^p", if app.panel == Panel::Summary { "Chat mode" } else { "Summary mode" }));
  keys.push(("^f", "Favorite"));
  keys.push(("^e", "Share"));
  keys.push(("^l", "Language"));
  keys.push(("^d", "Dark mode"));
  keys.push(("Esc", "Quit"));
  keys
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys = footer_keys(app);
  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw(" "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);
}

fn render_acknowledgement(frame: &mut Frame, theme: &Theme, message: &str) {
  let width = (message.width() as u16 + 8).max(30);
  let area = centered(frame.area(), width, 5);
  frame.render_widget(Clear, area);
  let text = vec![
    Line::from(Span::styled(message.to_string(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(Span::styled("Press any key", Style::default().fg(theme.muted))),
  ];
  let dialog = Paragraph::new(text)
    .alignment(Alignment::Center)
    .style(Style::default().bg(theme.bg))
    .block(bordered(theme, " Share ", true).padding(Padding::vertical(1)));
  frame.render_widget(dialog, area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::{ChatAnswer, HttpBackend};
  use crate::display::DisplayMode;
  use crate::prefs::{MemoryStorage, PreferenceStore};
  use crate::theme::theme_for;
  use crate::view::Language;
  use ratatui::{Terminal, backend::TestBackend};
  use std::sync::Arc;

  fn text_of(lines: &[Line]) -> Vec<String> {
    lines.iter().map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect()).collect()
  }

  #[test]
  fn truncate_appends_ellipsis() {
    assert_eq!(truncate_str("hello", 5), "hello");
    assert_eq!(truncate_str("hello world", 6), "hello…");
  }

  #[test]
  fn display_width_counts_wide_chars() {
    assert_eq!(display_width("ab日本", 4), 6);
    assert_eq!(display_width("ab日本", 2), 2);
  }

  #[test]
  fn wrapped_rows_breaks_on_words() {
    assert_eq!(wrapped_rows("", 10), 1);
    assert_eq!(wrapped_rows("short", 10), 1);
    assert_eq!(wrapped_rows("hello there world", 11), 2);
    assert_eq!(wrapped_rows("abcdefghijklmnopqrstuvwxy", 10), 3);
  }

  #[test]
  fn wrapped_height_sums_lines() {
    let lines = vec![Line::from("one two three"), Line::from(""), Line::from("four")];
    assert_eq!(wrapped_height(&lines, 8), 4);
  }

  #[test]
  fn centered_clamps_to_area() {
    let area = Rect::new(0, 0, 20, 10);
    assert_eq!(centered(area, 10, 4), Rect::new(5, 3, 10, 4));
    assert_eq!(centered(area, 40, 40), area);
  }

  #[test]
  fn chat_facts_get_a_heading() {
    let answer = ChatAnswer { facts: vec!["fact one".into()], ..Default::default() };
    let view = ChatAnswerView::from_answer(answer, Language::English);
    assert_eq!(text_of(&answer_lines(&view, theme_for(false))), ["Key Points:", "• fact one"]);

    let answer = ChatAnswer {
      summary: "Kurz.".into(),
      facts: vec!["Fakt".into()],
      timestamps: vec!["00:42".into()],
    };
    let view = ChatAnswerView::from_answer(answer, Language::German);
    assert_eq!(
      text_of(&answer_lines(&view, theme_for(false))),
      ["Zusammenfassung:", "Kurz.", "Hauptpunkte:", "• Fakt", "Relevante Zeitstempel:", "• 00:42"]
    );
  }

  #[test]
  fn narrow_terminal_with_focused_field_draws() {
    let prefs = PreferenceStore::new(Box::new(MemoryStorage::default()));
    let mut app = App::new(Arc::new(HttpBackend::new("http://127.0.0.1:1")), prefs, DisplayMode::Off);
    app.focus = Focus::Search;
    app.search_field.set("cats");
    for width in [1, 4, 8] {
      let mut terminal = Terminal::new(TestBackend::new(width, 40)).unwrap();
      terminal.draw(|f| ui(f, &mut app)).unwrap();
    }
    app.focus = Focus::Url;
    app.url_field.set("https://www.youtube.com/watch?v=abc123");
    let mut terminal = Terminal::new(TestBackend::new(5, 40)).unwrap();
    terminal.draw(|f| ui(f, &mut app)).unwrap();
  }
}
