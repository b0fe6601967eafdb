//! simdash - a terminal front end for the portfolio simulation service.
//!
//! Pick tickers and simulations, then run them against the backend and
//! read the per-account results.

use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use simdash::api::SimClient;
use simdash::app::{App, PendingRequest};
use simdash::config::Config;
use simdash::events::EventHandler;
use simdash::logging;
use simdash::tasks::{create_task_channel, ApiMessage, TaskSpawner};
use simdash::ui::{init_theme, Theme};

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Parser)]
#[command(name = "simdash", version, about)]
struct Cli {
    /// Backend base URL, overriding the config file.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Read configuration from this file instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore lookup results that arrive after a newer lookup was issued.
    #[arg(long)]
    discard_stale: bool,

    /// Write logs to this directory.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_dir = logging::init(cli.log_dir.as_deref())?;
    debug!(log_dir = %log_dir.display(), ?cli, "Parsed arguments");

    let config = load_config(&cli)?;
    init_theme(Theme::default());

    let client = SimClient::new(&config.backend.base_url, config.backend.timeout_secs)
        .context("invalid backend URL")?;
    info!(base_url = %client.base_url(), "Using backend");

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, App::new(config), client).await;
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!(error = %e, "Application error");
    }
    logging::shutdown();
    result
}

/// Load, override and validate the configuration.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if cli.discard_stale {
        config.search.discard_stale_results = true;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn setup_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// The main loop: draw, read one event, start queued calls, apply results.
async fn run(terminal: &mut Tui, mut app: App, client: SimClient) -> anyhow::Result<()> {
    let (mut rx, spawner) = create_task_channel();
    let events = EventHandler::with_tick_rate(app.config().ui.tick_rate_ms);

    loop {
        terminal.draw(|frame| app.view(frame))?;

        // Polling blocks for up to one tick; keep the runtime's workers free
        let event = tokio::task::block_in_place(|| events.next())?;
        app.update(event);

        dispatch(&spawner, &client, app.take_pending());
        drain(&mut rx, &mut app);

        if app.should_quit() {
            info!("Quitting");
            return Ok(());
        }
    }
}

fn dispatch(spawner: &TaskSpawner, client: &SimClient, pending: Vec<PendingRequest>) {
    for request in pending {
        match request {
            PendingRequest::Lookup(lookup) => {
                spawner.spawn_search_tickers(client, lookup.token, lookup.query)
            }
            PendingRequest::FetchSimulations => spawner.spawn_fetch_simulations(client),
            PendingRequest::Simulate(request) => spawner.spawn_simulate(client, request),
            PendingRequest::ClearCache => spawner.spawn_clear_cache(client),
            PendingRequest::DeleteDataCache => spawner.spawn_delete_data_cache(client),
        }
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ApiMessage>, app: &mut App) {
    while let Ok(message) = rx.try_recv() {
        app.handle_api_message(message);
    }
}
