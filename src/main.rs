mod api;
mod app;
mod chat;
mod config;
mod constants;
mod display;
mod graphics;
mod input;
mod notify;
mod prefs;
mod share;
mod theme;
mod ui;
mod video;
mod view;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use api::HttpBackend;
use app::App;
use config::Config;
use constants::constants;
use display::{CliDisplayMode, DisplayMode};
use prefs::{FileStorage, MemoryStorage, PreferenceStore, Storage};

const STORAGE_FILE: &str = "storage.json";

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Backend base URL (default: config file, then http://127.0.0.1:5000)
  #[arg(short, long)]
  backend: Option<String>,

  /// Thumbnail display mode: 'auto', 'direct', 'ascii', or 'off' (default: config file, then auto-detect)
  #[arg(short, long)]
  display_mode: Option<CliDisplayMode>,

  /// Print shell completions and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

// --- Setup ---

/// Log to a file in the data directory; the terminal belongs to the UI.
/// The returned guard flushes buffered lines on drop.
fn init_logging() -> Option<WorkerGuard> {
  let dir = config::data_dir()?;
  std::fs::create_dir_all(&dir).ok()?;
  let file_appender = tracing_appender::rolling::never(&dir, &constants().log_file_name);
  let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(non_blocking)
    .with_ansi(false)
    .try_init()
    .ok()?;
  Some(guard)
}

fn open_storage() -> Box<dyn Storage> {
  match config::data_dir() {
    Some(dir) => Box::new(FileStorage::open(dir.join(STORAGE_FILE))),
    None => {
      tracing::warn!("prefs: no data directory, preferences will not persist");
      Box::new(MemoryStorage::default())
    }
  }
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), env!("CARGO_PKG_NAME"), &mut std::io::stdout());
    return Ok(());
  }

  let _log_guard = init_logging();

  let config = Config::load();
  let backend_url = config.resolve_backend_url(args.backend.as_deref());
  let cli_mode = args
    .display_mode
    .or_else(|| config.display_mode.as_deref().map(CliDisplayMode::from_config))
    .unwrap_or(CliDisplayMode::Auto);
  let display_mode = display::resolve_display_mode(cli_mode);
  info!(backend = %backend_url, display_mode = display_mode.label(), "voyager starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, backend_url, display_mode).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, backend_url: String, display_mode: DisplayMode) -> Result<()> {
  let backend = Arc::new(HttpBackend::new(backend_url));
  let prefs = PreferenceStore::new(open_storage());
  let mut app = App::new(backend, prefs, display_mode);

  loop {
    app.tick(Instant::now());

    terminal.draw(|frame| ui::ui(frame, &mut app)).context("Failed to draw frame")?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  info!("voyager exiting");
  Ok(())
}
