//! A terminal client for a self-hosted photo gallery.
//!
//! Run the binary to browse the server's folders, filter the image listing,
//! create folders, upload files and view images in a lightbox.
//! Run with `--write-config` to save the effective configuration and exit.

use std::fs::OpenOptions;
use std::io::{self, stderr, Stderr};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gallery_tui::api::ApiClient;
use gallery_tui::app::{
    api_runtime::{self, ApiUpdate},
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{AppState, Effect},
};
use gallery_tui::config::AppConfig;
use gallery_tui::core::{
    filter::{CriteriaPatch, SizeClass},
    gallery::GalleryController,
};
use gallery_tui::ui::{screen, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version, about = "Terminal client for a self-hosted photo gallery")]
struct Cli {
    /// Gallery server base URL (overrides the config file).
    #[arg(long, env = "GALLERY_URL")]
    server: Option<String>,

    /// Folder to open on start (defaults to the root).
    #[arg(long)]
    folder: Option<String>,

    /// Initial name filter.
    #[arg(long)]
    name: Option<String>,

    /// Initial size filter: any, small, medium or large.
    #[arg(long)]
    size: Option<SizeClass>,

    /// Initial age filter in days.
    #[arg(long = "max-age-days")]
    max_age_days: Option<u32>,

    /// Write logs to this file instead of stderr.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Save the effective configuration to the config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

type Tui = Terminal<CrosstermBackend<Stderr>>;

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            // Only emits when RUST_LOG is set; stderr also carries the UI.
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn initial_criteria(cli: &Cli) -> CriteriaPatch {
    CriteriaPatch {
        name_pattern: cli.name.clone(),
        size_class: cli.size,
        max_age_days: cli.max_age_days.map(Some),
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let mut config = AppConfig::load();
    if let Some(url) = &cli.server {
        config.server_url = url.clone();
    }
    if cli.write_config {
        let path = config.save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    Theme::set_mode(config.theme);

    let client = ApiClient::new(&config.server_url, config.request_timeout())
        .with_context(|| format!("invalid server URL '{}'", config.server_url))?;
    info!(server = %client.base_url(), "starting");

    let mut gallery = GalleryController::new();
    gallery.set_criteria(initial_criteria(&cli));
    let mut state = AppState::new(config, gallery);
    state.effects.push(Effect::FetchFolders);
    state.effects.push(Effect::ProbePassword);
    let start = cli.folder.as_deref().unwrap_or_default().trim_matches('/').to_string();
    handler::open_folder(&mut state, start);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stderr(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr()))?;

    let result = run(&mut terminal, &mut state, &client).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run(terminal: &mut Tui, state: &mut AppState, client: &ApiClient) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (api_tx, mut api_rx) = mpsc::unbounded_channel::<ApiUpdate>();

    loop {
        // Draw before starting any request so input never waits on the
        // network.
        terminal.draw(|frame| screen::draw(frame, state))?;

        for effect in std::mem::take(&mut state.effects) {
            api_runtime::dispatch(client, &api_tx, effect);
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
                }
            }

            Some(update) = api_rx.recv() => {
                handler::apply_update(state, update);
                // Drain everything already queued before redrawing.
                while let Ok(update) = api_rx.try_recv() {
                    handler::apply_update(state, update);
                }
            }
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}
