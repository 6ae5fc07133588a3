//! `portal`: terminal UI for the suggestion portal.
//!
//! # Usage
//!
//! ```
//! portal --url http://localhost:5000 --token <id-token>
//! portal --config ~/.config/portal/config.toml --log-file /tmp/portal.log
//! ```

mod app;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result, bail};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use portal_engine::{ApiConfig, Board, HttpApi};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "portal", about = "Terminal UI for the suggestion portal")]
struct Args {
  /// Path to a TOML config file (base_url, token, request_timeout_secs,
  /// status, category).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the portal backend (default: http://localhost:5000).
  #[arg(long, env = "PORTAL_URL")]
  url: Option<String>,

  /// Identity-provider token to exchange for a session.
  #[arg(long, env = "PORTAL_TOKEN", hide_env_values = true)]
  token: Option<String>,

  /// Start with the list narrowed to one status, e.g. `in-progress`.
  #[arg(long, value_name = "STATUS")]
  status: Option<String>,

  /// Start with the list narrowed to one category, e.g. `student-life`.
  #[arg(long, value_name = "CATEGORY")]
  category: Option<String>,

  /// Append logs to this file. The terminal belongs to the UI, so nothing
  /// is logged without it.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config ───────────────────────────────────────────────────────────────────

/// Settings after merging defaults, the config file, `PORTAL_*` environment
/// variables and CLI flags, in increasing order of precedence.
#[derive(Deserialize, Debug)]
struct CliConfig {
  base_url:             String,
  #[serde(default)]
  token:                Option<String>,
  request_timeout_secs: u64,
  #[serde(default)]
  status:               Option<String>,
  #[serde(default)]
  category:             Option<String>,
}

fn load_config(args: &Args) -> Result<CliConfig> {
  let mut builder = config::Config::builder()
    .set_default("base_url", "http://localhost:5000")?
    .set_default("request_timeout_secs", 30)?;

  if let Some(path) = &args.config {
    builder = builder.add_source(config::File::from(path.as_path()).required(true));
  }

  let settings = builder
    .add_source(config::Environment::with_prefix("PORTAL"))
    .set_override_option("base_url", args.url.clone())?
    .set_override_option("token", args.token.clone())?
    .set_override_option("status", args.status.clone())?
    .set_override_option("category", args.category.clone())?
    .build()
    .context("failed to read configuration")?;

  settings
    .try_deserialize()
    .context("failed to deserialise configuration")
}

fn init_logging(path: &Path) -> Result<()> {
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(path) = &args.log_file {
    init_logging(path)?;
  }

  let cfg = load_config(&args)?;
  let controls = app::initial_controls(cfg.status.as_deref(), cfg.category.as_deref())
    .context("invalid startup filter")?;
  let Some(token) = cfg.token.filter(|t| !t.is_empty()) else {
    bail!("no identity token: pass --token, set PORTAL_TOKEN, or add `token` to the config file");
  };

  let api = HttpApi::new(ApiConfig {
    base_url: cfg.base_url.clone(),
    timeout:  Duration::from_secs(cfg.request_timeout_secs),
  })
  .context("creating API client")?;
  tracing::info!(base_url = %cfg.base_url, "starting");

  let mut board = Board::new(api);
  *board.controls_mut() = controls;
  let mut app = App::new(board, token);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Sign in and load; a failure leaves the UI signed out.
  app.sign_in().await;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<HttpApi>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Queued work runs after the frame that shows it is pending.
    if app.deferred.is_some() {
      app.run_deferred().await;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting. The short
    // timeout also lets expired notifications disappear without input.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
