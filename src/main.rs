//! backpack-tui binary entry point.
//!
//! Parses the command line, sets up file logging, runs the TUI event loop in
//! raw mode and restores the terminal on exit.
//!
use std::path::PathBuf;

use backpack_tui::app::{self, AppState, ThemeName};
use backpack_tui::error::{Context, Result};
use backpack_tui::logging;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding theme.conf and keybinds.conf
    #[arg(long, env = "BACKPACK_CONFIG_DIR", default_value = ".")]
    config_dir: PathBuf,

    /// Use a built-in theme instead of theme.conf
    #[arg(long, env = "BACKPACK_THEME", value_enum)]
    theme: Option<ThemeName>,

    /// Append logs to this file (no logging without it)
    #[arg(long, env = "BACKPACK_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = logging::DEFAULT_FILTER)]
    log_level: String,
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().with_ctx(|| "enable raw mode".to_string())?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).with_ctx(|| "enter alternate screen".to_string())?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout)).with_ctx(|| "create terminal".to_string())?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref(), &args.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), config_dir = %args.config_dir.display(), "starting");

    let state = AppState::from_config_dir(&args.config_dir, args.theme);
    let mut terminal = init_terminal()?;

    let res = app::run(&mut terminal, state);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
