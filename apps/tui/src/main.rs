//! Flowdesk TUI - administrative console for workflows, agents, steps,
//! executions and content reviews.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use flowdesk_core::{ApiClient, ConsoleConfig};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowdesk_tui::app::App;
use flowdesk_tui::config::TuiConfig;
use flowdesk_tui::navigation::Route;
use flowdesk_tui::terminal;
use flowdesk_tui::theme::{FlowdeskTheme, update_theme};
use flowdesk_tui::views;

/// Environment variable enabling the log file; its value is the filter directive.
const ENV_LOG: &str = "FLOWDESK_LOG";

#[derive(Parser, Debug)]
#[command(name = "flowdesk", version, about = "Terminal console for the workflow-automation backend")]
struct Args {
    /// Base URL of the REST API (overrides FLOWDESK_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token (overrides FLOWDESK_API_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Config file (default: ~/.flowdesk/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file used when FLOWDESK_LOG is set (default: ~/.flowdesk/flowdesk.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Page to open first, e.g. /executions
    #[arg(long, default_value = "/")]
    page: String,
}

fn init_logging(log_file: Option<PathBuf>) -> Result<()> {
    let Ok(directive) = std::env::var(ENV_LOG) else {
        return Ok(());
    };

    let path = match log_file {
        Some(path) => path,
        None => dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(".flowdesk")
            .join("flowdesk.log"),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&directive).unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.clone())?;

    let start = Route::from_path(&args.page).with_context(|| format!("Unknown page: {}", args.page))?;

    let config = ConsoleConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(args.base_url.clone(), args.token.clone());
    let base_url = config.api.base_url().context("No backend configured")?;
    let client = ApiClient::new(&config.api).context("Failed to create API client")?;

    let tui_config_path = match &args.config {
        Some(path) => path.clone(),
        None => TuiConfig::config_path()?,
    };
    let tui_config = TuiConfig::load_from(&tui_config_path)?;
    update_theme(FlowdeskTheme::from_config(&tui_config.theme));

    info!(base_url = %base_url, "Starting console");
    let mut app = App::new(client, &config.ui, base_url);

    terminal::guarded(
        terminal::setup,
        |mut tui| async move { run(&mut tui, &mut app, start).await },
        terminal::restore,
    )
    .await
}

async fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, start: Route) -> Result<()> {
    app.navigate(start).await;

    loop {
        app.overlays.toast_manager.update();
        app.poll_loads();

        terminal.draw(|frame| views::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key.code, key.modifiers).await?;
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
