use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use tokio::sync::oneshot;

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::{App, ServiceStatus};
use askdoc_core::{AskClient, AskService, Config, QuestionSubmissionController};
use tui::{EventHandler, TICK_RATE};

#[derive(Parser)]
#[command(name = "askdoc")]
#[command(about = "Ask questions about a document and keep the conversation going")]
struct Cli {
    /// Base URL of the Q&A service (the client posts to <base-url>/ask)
    #[arg(short, long)]
    base_url: Option<String>,
    /// Give up on a request after this many seconds (default: wait forever)
    #[arg(short, long)]
    timeout: Option<u64>,
    /// Write the effective base URL and timeout to the config file
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?.apply_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if cli.timeout.is_some() {
        config.request_timeout_secs = cli.timeout;
    }
    if cli.save_config {
        config.save()?;
    }

    let log_path = logging::init()?;
    tracing::info!(
        base_url = %config.base_url,
        timeout_secs = ?config.request_timeout_secs,
        log = %log_path.display(),
        "starting askdoc"
    );

    let client = AskClient::new(&config.base_url, config.request_timeout())?;
    let endpoint = client.ask_url();

    let health_client = client.clone();
    let controller = QuestionSubmissionController::new(Arc::new(client) as Arc<dyn AskService>);
    let mut app = App::new(controller, endpoint);

    // Runs alongside the UI; the header shows "checking" until it reports
    let (health_tx, health_rx) = oneshot::channel();
    app.watch_health(health_rx);
    tokio::spawn(async move {
        let status = match health_client.health().await {
            Ok(true) => ServiceStatus::Reachable,
            Ok(false) => ServiceStatus::Unreachable,
            Err(e) => {
                tracing::warn!(error = %e, "health check failed");
                ServiceStatus::Unreachable
            }
        };
        let _ = health_tx.send(status);
    });

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }

    Ok(())
}
