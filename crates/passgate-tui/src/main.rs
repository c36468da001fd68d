//! Passgate TUI - Terminal passcode screen
//!
//! Creates, checks and changes a numeric passcode stored as an argon2id hash.
//! Biometric prompts are simulated; see `--biometrics`.
//!
//! Logs go to stderr, so redirect them (`2>passgate.log`) to keep the screen clean.

use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use passgate_core::{FilePasscodeStorage, PasscodeConfig};
use passgate_tui::app::{BiometricsMode, TuiConfig};
use passgate_tui::biometrics::SimulatedBiometrics;
use passgate_tui::ui::Theme;
use passgate_tui::App;
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Passgate - Terminal passcode screen
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Passcode configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the passcode hash is stored
    #[arg(short, long)]
    storage: Option<PathBuf>,

    /// Simulated biometric sensor behaviour
    #[arg(short, long, value_enum)]
    biometrics: Option<BiometricsMode>,

    /// Use the high-contrast palette
    #[arg(long)]
    high_contrast: bool,

    /// Write the effective TUI preferences back to disk
    #[arg(long)]
    save_preferences: bool,
}

/// Application entry point with panic handling for terminal restoration
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Initialize logging to stderr; stdout belongs to the terminal UI
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive("passgate_tui=info".parse()?)
                .add_directive("passgate_core=info".parse()?),
        )
        .init();

    let config = match &args.config {
        Some(path) => PasscodeConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PasscodeConfig::load(),
    };

    let mut preferences = TuiConfig::load();
    if let Some(path) = args.storage {
        preferences.storage_path = Some(path);
    }
    if let Some(mode) = args.biometrics {
        preferences.biometrics = mode;
    }
    if args.high_contrast {
        preferences.high_contrast = true;
    }
    if args.save_preferences {
        preferences.save()?;
    }

    let result = run_app(&config, &preferences);

    if let Err(e) = &result {
        tracing::error!("Application error: {:#}", e);
    }

    result
}

/// Main application runner
fn run_app(config: &PasscodeConfig, preferences: &TuiConfig) -> Result<()> {
    let storage_path = preferences.storage_path();
    tracing::info!("Using passcode file {:?}", storage_path);

    let storage = Arc::new(FilePasscodeStorage::at(storage_path).with_params(config.hash));
    let biometrics = Arc::new(SimulatedBiometrics::new(
        preferences.biometrics,
        Duration::from_millis(preferences.biometrics_delay_ms),
    ));
    let theme = if preferences.high_contrast {
        Theme::high_contrast()
    } else {
        Theme::default()
    };

    // Build the app before touching the terminal so config errors print normally
    let mut app = App::new(config, storage, biometrics, theme)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
