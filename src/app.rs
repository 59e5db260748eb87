use image::DynamicImage;
use ratatui::{layout::Rect, widgets::ListState};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::api::{
  ApiError, Backend, ChatAnswer, ChatRequest, SearchResult, SummarizeRequest, SummaryResult, UploadProgress,
};
use crate::chat::{ChatReply, ExchangeSlot, Transcript};
use crate::display::DisplayMode;
use crate::input::TextField;
use crate::notify::{Control, Notifications};
use crate::prefs::{PreferenceStore, PrefsError};
use crate::share::{self, SharePayload, ShareOutcome, ShareTarget};
use crate::theme::{Theme, theme_for};
use crate::video::{self, LoadedVideo, watch_url};
use crate::view::{ChatAnswerView, Language, SearchView, SummaryView};

// --- Types ---

type Reply<T> = oneshot::Receiver<Result<T, ApiError>>;

/// Which pane receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Url,
  Search,
  Results,
  Favorites,
  Question,
}

impl Focus {
  /// Tab order. The question field is only reachable in chat mode.
  fn order(panel: Panel) -> &'static [Focus] {
    match panel {
      Panel::Summary => &[Focus::Url, Focus::Search, Focus::Results, Focus::Favorites],
      Panel::Chat => &[Focus::Url, Focus::Search, Focus::Results, Focus::Favorites, Focus::Question],
    }
  }

  pub fn next(self, panel: Panel) -> Self {
    let order = Self::order(panel);
    let idx = order.iter().position(|f| *f == self).unwrap_or(0);
    order[(idx + 1) % order.len()]
  }

  pub fn prev(self, panel: Panel) -> Self {
    let order = Self::order(panel);
    let idx = order.iter().position(|f| *f == self).unwrap_or(0);
    order[(idx + order.len() - 1) % order.len()]
  }
}

/// The two mutually exclusive lower panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
  #[default]
  Summary,
  Chat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryState {
  #[default]
  Empty,
  Summarizing,
  Ready(SummaryView),
}

impl SummaryState {
  pub const PLACEHOLDER: &'static str = "Summarizing video...";
}

/// Thumbnail image plus its copy scaled to the last drawn area.
pub struct Thumbnail {
  pub video_id: String,
  pub image: DynamicImage,
  pub fitted: Option<(Rect, DynamicImage)>,
}

struct PendingSummary {
  language: Language,
  reply: Reply<SummaryResult>,
  progress: mpsc::UnboundedReceiver<UploadProgress>,
}

struct PendingChat {
  slot: ExchangeSlot,
  language: Language,
  reply: Reply<ChatAnswer>,
}

/// In-flight request receivers. Search and summarize keep only the newest
/// request; every chat exchange waits on its own receiver.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  search: Option<Reply<Vec<SearchResult>>>,
  summary: Option<PendingSummary>,
  chats: Vec<PendingChat>,
  thumbnail: Option<(String, oneshot::Receiver<anyhow::Result<DynamicImage>>)>,
}

pub struct App {
  pub url_field: TextField,
  pub search_field: TextField,
  pub question_field: TextField,
  pub focus: Focus,
  pub panel: Panel,
  pub language: Language,
  pub dark_mode: bool,
  /// `None` until a search completes, and again after a failed one.
  pub search: Option<SearchView>,
  pub results_state: ListState,
  pub favorites_state: ListState,
  pub summary: SummaryState,
  /// Summarize upload progress, 0–100.
  pub progress: u16,
  pub transcript: Transcript,
  pub video: Option<LoadedVideo>,
  pub thumbnail: Option<Thumbnail>,
  pub notifications: Notifications,
  pub prefs: PreferenceStore,
  pub display_mode: DisplayMode,
  pub should_quit: bool,
  backend: Arc<dyn Backend>,
  http_client: Client,
  tasks: AsyncTasks,
}

impl App {
  pub fn new(backend: Arc<dyn Backend>, prefs: PreferenceStore, display_mode: DisplayMode) -> Self {
    let dark_mode = prefs.load_dark_mode();
    info!(favorites = prefs.favorites().len(), dark_mode, "app: preferences loaded");
    Self {
      url_field: TextField::default(),
      search_field: TextField::default(),
      question_field: TextField::default(),
      focus: Focus::Url,
      panel: Panel::Summary,
      language: Language::English,
      dark_mode,
      search: None,
      results_state: ListState::default(),
      favorites_state: ListState::default(),
      summary: SummaryState::Empty,
      progress: 0,
      transcript: Transcript::default(),
      video: None,
      thumbnail: None,
      notifications: Notifications::default(),
      prefs,
      display_mode,
      should_quit: false,
      backend,
      http_client: Client::new(),
      tasks: AsyncTasks::default(),
    }
  }

  pub fn theme(&self) -> &'static Theme {
    theme_for(self.dark_mode)
  }

  pub fn set_error(&mut self, msg: impl Into<String>) {
    self.notifications.show_error(msg);
  }

  /// Whether any backend request is still awaiting its reply.
  pub fn has_pending(&self) -> bool {
    self.tasks.search.is_some() || self.tasks.summary.is_some() || !self.tasks.chats.is_empty()
  }

  // --- Preferences ---

  pub fn toggle_dark_mode(&mut self) {
    self.dark_mode = !self.dark_mode;
    if let Err(e) = self.prefs.save_dark_mode(self.dark_mode) {
      error!(err = %e, "prefs: failed to save dark mode");
      self.set_error("Failed to save dark mode preference");
    }
  }

  pub fn toggle_language(&mut self) {
    self.language = self.language.toggle();
    debug!(language = self.language.label(), "app: output language switched");
  }

  pub fn switch_mode(&mut self, panel: Panel) {
    self.panel = panel;
    if panel == Panel::Summary && self.focus == Focus::Question {
      self.focus = Focus::Url;
    }
  }

  fn report_prefs_error(&mut self, e: PrefsError) {
    match e {
      PrefsError::InvalidVideoInfo | PrefsError::InvalidVideoUrl => self.set_error(e.to_string()),
      other => {
        error!(err = %other, "prefs: failed to persist favorites");
        self.set_error("Failed to save favorites");
      }
    }
  }

  pub fn add_favorite(&mut self, url: &str, title: &str) {
    match self.prefs.add_favorite(url, title) {
      Ok(true) => self.notifications.info = Some(format!("Added \"{}\" to favorites", title)),
      Ok(false) => {}
      Err(e) => self.report_prefs_error(e),
    }
  }

  /// The "add to favorites" action attached to the loaded video.
  pub fn add_current_to_favorites(&mut self) {
    let (url, title) = self.video.as_ref().map(|v| (v.url.clone(), v.title.clone())).unwrap_or_default();
    self.add_favorite(&url, &title);
  }

  pub fn remove_favorite(&mut self, url: &str) {
    if let Err(e) = self.prefs.remove_favorite(url) {
      self.report_prefs_error(e);
      return;
    }
    let count = self.prefs.favorites().len();
    match self.favorites_state.selected() {
      Some(_) if count == 0 => self.favorites_state.select(None),
      Some(i) if i >= count => self.favorites_state.select(Some(count - 1)),
      _ => {}
    }
  }

  // --- Video session ---

  /// Load a video into the thumbnail and player panes. Without `url` the URL
  /// field is used. Returns whether a video was loaded.
  pub fn load_video(&mut self, url: Option<&str>, title: Option<&str>) -> bool {
    let url = url.map(str::to_string).unwrap_or_else(|| self.url_field.trimmed());
    match LoadedVideo::from_url(&url, title) {
      Ok(video) => {
        self.show_video(video);
        true
      }
      Err(e) => {
        self.set_error(e.to_string());
        false
      }
    }
  }

  fn show_video(&mut self, video: LoadedVideo) {
    info!(video_id = %video.video_id, thumbnail = %video.thumbnail, "video: loaded");
    self.url_field.set(&video.url);
    self.trigger_thumbnail(&video);
    self.video = Some(video);
  }

  fn trigger_thumbnail(&mut self, video: &LoadedVideo) {
    if self.thumbnail.as_ref().is_some_and(|t| t.video_id == video.video_id) {
      return;
    }
    self.thumbnail = None;
    self.tasks.thumbnail = None;
    if !self.display_mode.shows_thumbnails() {
      return;
    }
    let client = self.http_client.clone();
    let url = video.thumbnail.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(video::fetch_thumbnail(&client, &url).await);
    });
    self.tasks.thumbnail = Some((video.video_id.clone(), rx));
  }

  pub fn open_in_browser(&mut self, url: &str) {
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(not(target_os = "macos"))]
    let cmd = "xdg-open";
    match std::process::Command::new(cmd)
      .arg(url)
      .stdin(std::process::Stdio::null())
      .stdout(std::process::Stdio::null())
      .stderr(std::process::Stdio::null())
      .spawn()
    {
      Ok(mut child) => {
        // Reap the child in a background thread to avoid zombie processes.
        std::thread::spawn(move || {
          let _ = child.wait();
        });
      }
      Err(e) => {
        warn!(err = %e, url, "app: failed to open browser");
        self.set_error(format!("Failed to open browser: {}", e));
      }
    }
  }

  // --- Search ---

  pub fn trigger_search(&mut self) {
    let query = self.search_field.trimmed();
    if query.is_empty() {
      self.set_error("Please enter a search query");
      return;
    }
    info!(query = %query, "search triggered");
    self.search_field.clear();
    self.notifications.show_loading(Control::Search);

    let backend = Arc::clone(&self.backend);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(backend.search(&query).await);
    });
    self.tasks.search = Some(rx);
  }

  fn finish_search(&mut self, result: Result<Vec<SearchResult>, ApiError>) {
    match result {
      Ok(results) => {
        debug!(count = results.len(), "search: results received");
        let view = SearchView::from_results(results);
        self.results_state.select(if view.results().is_empty() { None } else { Some(0) });
        self.search = Some(view);
      }
      Err(e) => {
        error!(err = %e, "search: request failed");
        self.set_error(e.user_message("Failed to search videos"));
        self.search = None;
        self.results_state.select(None);
      }
    }
  }

  pub fn selected_result(&self) -> Option<&SearchResult> {
    let idx = self.results_state.selected()?;
    self.search.as_ref()?.results().get(idx)
  }

  pub fn selected_result_url(&self) -> Option<String> {
    self.selected_result().map(|r| watch_url(&r.video_id))
  }

  /// Load the highlighted search result, keeping its title and thumbnail.
  pub fn load_selected_result(&mut self) {
    let Some(loaded) = self
      .selected_result()
      .map(|r| LoadedVideo::from_url(&watch_url(&r.video_id), Some(&r.title)).map(|v| v.with_thumbnail(&r.thumbnail)))
    else {
      return;
    };
    match loaded {
      Ok(video) => self.show_video(video),
      Err(e) => self.set_error(e.to_string()),
    }
  }

  // --- Summarize ---

  pub fn trigger_summarize(&mut self) {
    let video_url = self.url_field.trimmed();
    if video_url.is_empty() {
      self.set_error("Please enter a YouTube video URL first");
      return;
    }
    let language = self.language;
    info!(video_url = %video_url, translate = language.translate(), "summarize triggered");
    self.summary = SummaryState::Summarizing;
    self.progress = 0;
    self.notifications.show_loading(Control::Summarize);

    let request = SummarizeRequest { video_url, translate: language.translate() };
    let backend = Arc::clone(&self.backend);
    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(backend.summarize(&request, progress_tx).await);
    });
    self.tasks.summary = Some(PendingSummary { language, reply: rx, progress: progress_rx });
  }

  fn finish_summarize(&mut self, language: Language, result: Result<SummaryResult, ApiError>) {
    match result {
      Ok(result) => {
        let view = SummaryView::from_result(result, language);
        debug!(key_points = view.key_points.len(), "summarize: summary received");
        self.summary = SummaryState::Ready(view);
        self.progress = 100;
      }
      Err(e) => {
        error!(err = %e, "summarize: request failed");
        self.set_error(e.user_message("Failed to summarize video"));
        self.summary = SummaryState::Empty;
        self.progress = 0;
      }
    }
  }

  // --- Chat ---

  pub fn trigger_ask(&mut self) {
    let question = self.question_field.trimmed();
    if question.is_empty() {
      self.set_error("Please enter a question");
      return;
    }
    let language = self.language;
    let request =
      ChatRequest { video_url: self.url_field.trimmed(), question: question.clone(), translate: language.translate() };
    info!(video_url = %request.video_url, "ask triggered");
    let slot = self.transcript.push_question(question);
    self.notifications.show_loading(Control::Ask);

    let backend = Arc::clone(&self.backend);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(backend.chat(&request).await);
    });
    self.tasks.chats.push(PendingChat { slot, language, reply: rx });
  }

  fn finish_ask(&mut self, slot: ExchangeSlot, language: Language, result: Result<ChatAnswer, ApiError>) {
    let reply = match result {
      Ok(answer) => ChatReply::Answered(ChatAnswerView::from_answer(answer, language)),
      Err(e) => {
        error!(err = %e, "chat: request failed");
        self.set_error(e.user_message("Failed to get an answer"));
        ChatReply::Failed
      }
    };
    // A reply for a cleared conversation must not wipe the next question.
    if self.transcript.resolve(slot, reply) {
      self.question_field.clear();
    } else {
      debug!("chat: reply for a cleared conversation dropped");
    }
  }

  /// Switch to chat mode with a fresh transcript for the video in the URL field.
  pub fn start_video_chat(&mut self) {
    let url = self.url_field.trimmed();
    if url.is_empty() {
      self.set_error("Please enter a YouTube video URL first");
      return;
    }
    self.switch_mode(Panel::Chat);
    self.transcript.clear();
    self.focus = Focus::Question;
    self.load_video(Some(&url), None);
  }

  // --- Share ---

  pub fn share_summary(&mut self, target: &mut dyn ShareTarget) {
    let SummaryState::Ready(ref view) = self.summary else {
      self.set_error("No summary available to share");
      return;
    };
    let payload = SharePayload::new(view.plain_text(), self.url_field.value().to_string());
    match share::share(&payload, target) {
      Ok(ShareOutcome::Shared) => self.notifications.info = Some("Summary shared".to_string()),
      Ok(ShareOutcome::Copied) => self.notifications.acknowledge("Summary copied to clipboard!"),
      Err(e) => {
        error!(err = %format!("{:#}", e), "share: failed");
        self.set_error("Failed to share summary");
      }
    }
  }

  // --- Polling ---

  /// Apply every reply that has arrived since the last frame.
  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.search.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.notifications.hide_loading(Control::Search);
          self.finish_search(result);
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.search = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.notifications.hide_loading(Control::Search);
          self.search = None;
          self.set_error("Failed to search videos");
        }
      }
    }

    if let Some(mut pending) = self.tasks.summary.take() {
      while let Ok(event) = pending.progress.try_recv() {
        self.progress = event.percent();
      }
      match pending.reply.try_recv() {
        Ok(result) => {
          self.notifications.hide_loading(Control::Summarize);
          self.finish_summarize(pending.language, result);
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.summary = Some(pending);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.notifications.hide_loading(Control::Summarize);
          self.summary = SummaryState::Empty;
          self.progress = 0;
          self.set_error("Failed to summarize video");
        }
      }
    }

    if !self.tasks.chats.is_empty() {
      let mut waiting = Vec::new();
      for mut pending in std::mem::take(&mut self.tasks.chats) {
        match pending.reply.try_recv() {
          Ok(result) => self.finish_ask(pending.slot, pending.language, result),
          Err(oneshot::error::TryRecvError::Empty) => waiting.push(pending),
          Err(oneshot::error::TryRecvError::Closed) => {
            self.set_error("Failed to get an answer");
            if self.transcript.resolve(pending.slot, ChatReply::Failed) {
              self.question_field.clear();
            }
          }
        }
      }
      if waiting.is_empty() {
        self.notifications.hide_loading(Control::Ask);
      }
      self.tasks.chats = waiting;
    }

    if let Some((video_id, mut rx)) = self.tasks.thumbnail.take() {
      match rx.try_recv() {
        Ok(Ok(image)) => {
          self.thumbnail = Some(Thumbnail { video_id, image, fitted: None });
        }
        Ok(Err(e)) => {
          // The player pane still shows the thumbnail URL.
          warn!(video_id = %video_id, err = %format!("{:#}", e), "video: thumbnail unavailable");
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.thumbnail = Some((video_id, rx));
        }
        Err(oneshot::error::TryRecvError::Closed) => {}
      }
    }
  }

  /// Per-frame housekeeping.
  pub fn tick(&mut self, now: Instant) {
    self.check_pending();
    self.notifications.expire(now);
  }
}
