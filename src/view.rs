//! Pure transformations from backend responses to what the panes display.
//! Nothing here touches the terminal, so it is tested directly.

use crate::api::{ChatAnswer, SearchResult, SummaryResult};

/// Output language selected by the translate flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
  #[default]
  English,
  German,
}

impl Language {
  pub fn translate(self) -> bool {
    self == Language::German
  }

  pub fn toggle(self) -> Self {
    match self {
      Language::English => Language::German,
      Language::German => Language::English,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Language::English => "EN",
      Language::German => "DE",
    }
  }

  pub fn summary_heading(self) -> &'static str {
    match self {
      Language::English => "Flowing Text Summary",
      Language::German => "Fließende Textzusammenfassung",
    }
  }

  pub fn key_points_heading(self) -> &'static str {
    match self {
      Language::English => "Key Points",
      Language::German => "Hauptpunkte",
    }
  }

  pub fn chat_summary_heading(self) -> &'static str {
    match self {
      Language::English => "Summary",
      Language::German => "Zusammenfassung",
    }
  }

  pub fn timestamps_heading(self) -> &'static str {
    match self {
      Language::English => "Relevant Timestamps",
      Language::German => "Relevante Zeitstempel",
    }
  }

  pub fn no_structure_notice(self) -> &'static str {
    match self {
      Language::English => "No structured information found. Here's the raw response:",
      Language::German => "Keine strukturierten Informationen gefunden. Hier ist die Rohausgabe:",
    }
  }
}

/// Header lines the backend may leave inside `key_points`.
const KEY_POINT_HEADERS: [&str; 3] = ["key points:", "kernpunkte:", "hauptpunkte:"];

/// Split newline-delimited key points into bullets.
/// Blank lines and header lines are dropped; one leading `-` or `•` is stripped.
pub fn parse_key_points(text: &str) -> Vec<String> {
  text
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(|line| line.strip_prefix(['-', '•']).map(str::trim_start).unwrap_or(line))
    .filter(|line| !KEY_POINT_HEADERS.contains(&line.to_lowercase().as_str()))
    .map(str::to_string)
    .collect()
}

// --- Search ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchView {
  Results(Vec<SearchResult>),
  NoResults,
}

impl SearchView {
  pub const NO_RESULTS: &'static str = "No videos found";

  pub fn from_results(results: Vec<SearchResult>) -> Self {
    if results.is_empty() { SearchView::NoResults } else { SearchView::Results(results) }
  }

  pub fn results(&self) -> &[SearchResult] {
    match self {
      SearchView::Results(results) => results,
      SearchView::NoResults => &[],
    }
  }
}

// --- Summary ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
  pub language: Language,
  pub summary: String,
  pub key_points: Vec<String>,
}

impl SummaryView {
  pub fn from_result(result: SummaryResult, language: Language) -> Self {
    Self { language, key_points: parse_key_points(&result.key_points), summary: result.summary }
  }

  /// Text as rendered on screen, used when sharing.
  pub fn plain_text(&self) -> String {
    let mut out = format!("{}:\n{}", self.language.summary_heading(), self.summary);
    if !self.key_points.is_empty() {
      out.push_str(&format!("\n\n{}:", self.language.key_points_heading()));
      for point in &self.key_points {
        out.push_str(&format!("\n• {}", point));
      }
    }
    out
  }
}

// --- Chat ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAnswerView {
  Structured { language: Language, summary: Option<String>, facts: Vec<String>, timestamps: Vec<String> },
  /// Nothing structured came back; show the notice and whatever text there is.
  Raw { notice: &'static str, text: String },
}

impl ChatAnswerView {
  pub fn from_answer(answer: ChatAnswer, language: Language) -> Self {
    let summary = Some(answer.summary.trim().to_string()).filter(|s| !s.is_empty());
    if summary.is_none() && answer.facts.is_empty() && answer.timestamps.is_empty() {
      return ChatAnswerView::Raw { notice: language.no_structure_notice(), text: answer.summary };
    }
    ChatAnswerView::Structured { language, summary, facts: answer.facts, timestamps: answer.timestamps }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn key_points_strip_bullets_and_sentinel() {
    assert_eq!(parse_key_points("- point one\n- point two\nKernpunkte:\n"), vec!["point one", "point two"]);
  }

  #[test]
  fn key_points_handle_round_bullets_and_blank_lines() {
    let text = "Key Points:\n\n•  first\n  - second  \nthird\n\n";
    assert_eq!(parse_key_points(text), vec!["first", "second", "third"]);
  }

  #[test]
  fn key_points_sentinel_is_case_insensitive() {
    assert_eq!(parse_key_points("KERNPUNKTE:\nhauptpunkte:\n- kept"), vec!["kept"]);
  }

  #[test]
  fn key_points_strip_only_one_bullet() {
    assert_eq!(parse_key_points("- - nested"), vec!["- nested"]);
  }

  #[test]
  fn key_points_empty_input() {
    assert!(parse_key_points("").is_empty());
    assert!(parse_key_points("  \n\n").is_empty());
  }

  #[test]
  fn empty_search_is_no_results() {
    assert_eq!(SearchView::from_results(vec![]), SearchView::NoResults);
    assert!(SearchView::NoResults.results().is_empty());
  }

  #[test]
  fn summary_view_uses_language_headings() {
    let result = SummaryResult { summary: "Eine Zusammenfassung.".into(), key_points: "- eins\n- zwei".into() };
    let view = SummaryView::from_result(result, Language::German);
    assert_eq!(
      view.plain_text(),
      "Fließende Textzusammenfassung:\nEine Zusammenfassung.\n\nHauptpunkte:\n• eins\n• zwei"
    );
  }

  #[test]
  fn summary_plain_text_without_key_points() {
    let result = SummaryResult { summary: "Short.".into(), key_points: "   ".into() };
    let view = SummaryView::from_result(result, Language::English);
    assert_eq!(view.plain_text(), "Flowing Text Summary:\nShort.");
  }

  #[test]
  fn chat_answer_all_empty_is_raw_fallback() {
    let view = ChatAnswerView::from_answer(ChatAnswer::default(), Language::English);
    assert_eq!(
      view,
      ChatAnswerView::Raw { notice: "No structured information found. Here's the raw response:", text: String::new() }
    );
  }

  #[test]
  fn chat_answer_with_facts_is_structured() {
    let answer = ChatAnswer { facts: vec!["a fact".into()], summary: String::new(), timestamps: vec![] };
    match ChatAnswerView::from_answer(answer, Language::German) {
      ChatAnswerView::Structured { language, summary, facts, timestamps } => {
        assert_eq!(language, Language::German);
        assert_eq!(summary, None);
        assert_eq!(facts, vec!["a fact"]);
        assert!(timestamps.is_empty());
      }
      other => panic!("expected structured answer, got {other:?}"),
    }
  }

  #[test]
  fn german_output_sets_translate_flag() {
    assert!(Language::English.toggle().translate());
    assert!(!Language::German.toggle().translate());
  }
}
