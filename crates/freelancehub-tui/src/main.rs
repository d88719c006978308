//! FreelanceHub TUI - a terminal client for the FreelanceHub marketplace.
//!
//! Browse projects, place and accept bids, and manage your profile from a
//! keyboard-driven interface.

mod app;
mod ui;

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use freelancehub_core::auth::AuthState;
use freelancehub_core::config::Config;

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix inside the data directory
const LOG_FILE_PREFIX: &str = "freelancehub.log";

/// Initialize the tracing subscriber for logging.
///
/// The TUI owns the terminal, so logs go to a daily file in `log_dir`.
/// Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    let log_dir = config.data_dir()?;
    std::fs::create_dir_all(&log_dir).context("Failed to create data directory")?;
    let _log_guard = init_tracing(&log_dir);
    if let Err(e) = loaded {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--login") => return login_cli(config).await,
        Some("--logout") => return logout_cli(&config),
        Some("--whoami") => return whoami_cli(&config).await,
        Some("--help") | Some("-h") => {
            print_usage();
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown argument: {}", other);
            print_usage();
            return Ok(());
        }
        None => {}
    }

    info!("FreelanceHub TUI starting");

    let mut app = App::new(config)?;
    app.start_bootstrap();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("FreelanceHub TUI shutting down");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: freelancehub [--login | --logout | --whoami]");
    eprintln!();
    eprintln!("  (no args)   Start the terminal UI");
    eprintln!("  --login     Log in from the command line and store the credential");
    eprintln!("  --logout    Forget the stored credential");
    eprintln!("  --whoami    Validate the stored credential and print who it belongs to");
}

/// Interactive login without the TUI
async fn login_cli(mut config: Config) -> Result<()> {
    let mut session = config.build_session()?;

    let default_email = config.default_email();
    let email = if default_email.is_empty() {
        prompt("Email: ")?
    } else {
        let input = prompt(&format!("Email [{}]: ", default_email))?;
        if input.is_empty() {
            default_email
        } else {
            input
        }
    };
    let password = rpassword::prompt_password("Password: ")?;

    eprintln!("\nAuthenticating...");
    if !session.login(&email, &password).await {
        anyhow::bail!("Invalid email or password");
    }

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    if let Some(user) = session.identity() {
        eprintln!("Logged in as {} ({})", user.username, user.role_display());
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn logout_cli(config: &Config) -> Result<()> {
    let mut session = config.build_session()?;
    session.logout();
    eprintln!("Logged out.");
    Ok(())
}

async fn whoami_cli(config: &Config) -> Result<()> {
    let mut session = config.build_session()?;
    if session.credential().is_none() {
        eprintln!("Not logged in.");
        return Ok(());
    }

    session.bootstrap().await;
    match session.identity() {
        Some(user) if session.is_authenticated() => {
            println!("{} <{}>", user.username, user.email.as_deref().unwrap_or("no email"));
            println!("Role:   {}", user.role_display());
            println!("Rating: {}", user.rating_display());
            println!("Skills: {}", user.skill_list().join(", "));
        }
        _ => eprintln!("Stored credential was rejected; you have been logged out."),
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks().await;

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
