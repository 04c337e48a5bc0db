// meshlog - Live packet log viewer for mesh radio networks
// Polls a mesh gateway's packet log and renders it as an interactive table

mod app;
mod format;
mod net;
mod theme;
mod ui;

use anyhow::Result;
use app::{
    config::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_POLL_SECS, UI_TICK_MS},
    event::{handle_key_event, handle_mouse_event},
    AppState, HostCallbacks, ViewerConfig,
};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use format::{DateFormat, DisplaySettings, TimeFormat};
use net::{HttpSource, PacketSource};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{prelude::*, EnvFilter};

/// meshlog: live packet log viewer for mesh radio gateways
#[derive(Parser, Debug)]
#[command(name = "meshlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the gateway API
    #[arg(short, long, env = "MESHLOG_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token for authenticated sessions
    #[arg(long, env = "MESHLOG_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Own node id (!xxxxxxxx); looked up from the gateway when omitted
    #[arg(long, env = "MESHLOG_OWN_NODE")]
    own_node: Option<String>,

    /// Start with packets from the own node hidden
    #[arg(long)]
    hide_own: bool,

    /// Do not jump to the newest packet after each refresh
    #[arg(long)]
    no_auto_scroll: bool,

    /// Seconds between refreshes
    #[arg(short, long, default_value_t = DEFAULT_POLL_SECS)]
    interval: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    timeout: u64,

    /// Clock style
    #[arg(long, value_enum, default_value_t = TimeFormat::Hour24)]
    time_format: TimeFormat,

    /// Date order in the detail view
    #[arg(long, value_enum, default_value_t = DateFormat::MonthFirst)]
    date_format: DateFormat,

    /// Pick a node: g/G print the chosen node id and exit
    #[arg(long)]
    pick_node: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Log file path (default: /tmp/meshlog.log)
    #[arg(long, default_value = "/tmp/meshlog.log")]
    log_file: String,
}

fn init_logging(cli: &Cli) -> Result<()> {
    // Log to a file; stdout belongs to the TUI
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let log_file = File::create(&cli.log_file)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false),
        )
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();
    Ok(())
}

/// Own node id from the command line, else from the gateway
fn resolve_own_node(cli_value: Option<String>, source: &dyn PacketSource) -> Option<String> {
    if cli_value.is_some() {
        return cli_value;
    }
    match source.fetch_own_node_id() {
        Ok(Some(id)) => {
            tracing::info!(own_node_id = %id, "Resolved own node from gateway config");
            Some(id)
        }
        Ok(None) => {
            tracing::warn!(
                "Gateway config has no local node id; hiding own packets is unavailable"
            );
            None
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to load gateway config; hiding own packets is unavailable"
            );
            None
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    tracing::info!(url = %cli.url, "Starting meshlog");

    let source = HttpSource::new(
        &cli.url,
        cli.token.clone(),
        Duration::from_secs(cli.timeout.max(1)),
    )?;
    let own_node_id = resolve_own_node(cli.own_node.clone(), &source);

    let config = ViewerConfig {
        own_node_id,
        display: DisplaySettings {
            time_format: cli.time_format,
            date_format: cli.date_format,
        },
        auto_scroll: !cli.no_auto_scroll,
        hide_own: cli.hide_own,
        ..ViewerConfig::with_poll_secs(cli.interval)
    };

    let picked: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
    let mut callbacks = HostCallbacks::new(|| tracing::info!("Packet monitor closed"));
    if cli.pick_node {
        let picked = Rc::clone(&picked);
        callbacks = callbacks.with_navigation(move |node_id| {
            *picked.borrow_mut() = Some(node_id.to_string());
        });
    }

    let mut app = AppState::new(Box::new(source), config, callbacks);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, &mut app, &picked);
    drop(app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "Viewer exited with an error");
        println!("Error: {:?}", err);
    } else if let Some(node_id) = picked.borrow().as_deref() {
        println!("{}", node_id);
    }

    tracing::info!("Goodbye!");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    picked: &RefCell<Option<String>>,
) -> Result<()> {
    // Loading frame before the first (blocking) fetch
    terminal.draw(|f| ui::draw(f, app))?;
    app.activate();

    let tick = Duration::from_millis(UI_TICK_MS);
    loop {
        app.on_tick();
        terminal.draw(|f| ui::draw(f, app))?;

        if picked.borrow().is_some() {
            app.close();
        }
        if !app.running {
            return Ok(());
        }

        if event::poll(tick)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(app, key.code);
                }
                Event::Mouse(mouse) => handle_mouse_event(app, mouse),
                _ => {}
            }
        }
    }
}
