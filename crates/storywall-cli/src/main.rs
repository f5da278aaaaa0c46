//! `storywall`: terminal UI for the community storytelling wall.
//!
//! # Usage
//!
//! ```
//! storywall --entries data/entries.json
//! storywall --config ~/.config/storywall/storywall.toml
//! STORYWALL_GEOCODER_URL=http://localhost:8080 storywall
//! ```

mod app;
mod client;
mod settings;
mod ui;

use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{NominatimClient, SeedSource};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use storywall_core::place::PlaceResolver;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "storywall", version, about = "Terminal UI for the community storytelling wall")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "storywall.toml")]
  config: PathBuf,

  /// Seed entries: a JSON file path or an http(s) URL.
  #[arg(long, value_name = "PATH_OR_URL")]
  entries: Option<String>,

  /// Base URL of a Nominatim-compatible geocoder.
  #[arg(long, value_name = "URL")]
  geocoder_url: Option<String>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // CLI flags override the config file and environment.
  let mut settings = Settings::load(&args.config)?;
  if let Some(entries) = args.entries {
    settings.entries = entries;
  }
  if let Some(url) = args.geocoder_url {
    settings.geocoder_url = url;
  }

  // The terminal belongs to the UI, so logs go to a file.
  let log_file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(&settings.log_file)
    .with_context(|| format!("opening log file {}", settings.log_file.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(log_file))
    .with_ansi(false)
    .init();

  let http = reqwest::Client::builder()
    .user_agent(settings.user_agent.clone())
    .timeout(Duration::from_secs(30))
    .build()
    .context("failed to build HTTP client")?;

  let resolver = PlaceResolver::new(NominatimClient::new(http.clone(), &settings.geocoder_url))
    .with_timeout(settings.lookup_timeout());
  let mut app = App::new(resolver, settings.debounce());

  tracing::info!(entries = %settings.entries, geocoder = %settings.geocoder_url, "starting");
  app.spawn_entry_load(SeedSource::from_location(&settings.entries, http));

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.poll_background();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
