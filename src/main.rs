//! roster-manager binary entry point.
//!
//! Parses the CLI, sets up optional file logging, initializes the terminal
//! in raw mode, runs the TUI event loop, and restores the terminal state
//! on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::error::Result;

mod api;
mod app;
mod cache;
mod error;
mod ui;
mod validate;

/// TUI to create, edit and delete user records against a remote CRUD API.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Base URL of the user API (the client appends /users).
    #[arg(long, env = "ROSTER_API_URL", default_value = api::DEFAULT_BASE_URL)]
    base_url: String,

    /// Theme configuration file.
    #[arg(long, default_value = "theme.conf")]
    theme: String,

    /// Keybindings configuration file.
    #[arg(long, default_value = "keybinds.conf")]
    keybinds: String,

    /// Append logs to this file. The terminal itself is owned by the TUI,
    /// so nothing is ever logged to stdout/stderr while running.
    #[arg(long, env = "ROSTER_LOG")]
    log_file: Option<String>,
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn init_tracing(path: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_tracing(path).map_err(|e| format!("init logging: {}", e))?;
    }

    let config = app::AppConfig {
        base_url: cli.base_url,
        theme_path: cli.theme,
        keybinds_path: cli.keybinds,
    };

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &config);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
