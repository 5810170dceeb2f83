//! MSME loan dashboard — six-panel terminal interface over a loan CSV.
//!
//! Panels:
//! 1. Overview — key metrics, risk gauge, quick summary
//! 2. Segments — segment and risk zone shares, EMIs paid vs loan amount
//! 3. Collections — profession breakdown, payment mix, coverage by segment
//! 4. DPD — days-past-due histogram and irregular payment reasons
//! 5. Data — raw in-scope rows
//! 6. Help — keyboard shortcuts and upload format

mod app;
mod input;
mod persistence;
mod theme;
mod ui;

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use msme_core::AnalyzerConfig;

use crate::app::{AppState, ErrorCategory};

#[derive(Parser)]
#[command(name = "msme-dashboard", about = "Interactive MSME loan portfolio dashboard")]
struct Args {
    /// Loan portfolio CSV to open on start
    csv: Option<PathBuf>,

    /// Analyzer configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let app_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("msme-dashboard");
    let state_path = app_dir.join("state.json");
    init_tracing(&app_dir.join("dashboard.log"));

    let export_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let (config, config_error) = match AnalyzerConfig::load_or_default(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (AnalyzerConfig::default(), Some(err)),
    };

    let mut app = AppState::new(config, export_dir);
    if let Some(err) = config_error {
        let context = args
            .config
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        app.push_error(
            ErrorCategory::Config,
            format!("Config ignored, using defaults: {err}"),
            context,
        );
    }

    // Apply persisted state; a file on the command line wins over the last upload.
    let persisted = persistence::load(&state_path);
    persistence::apply(&mut app, persisted, args.csv.is_none());
    if let Some(path) = &args.csv {
        app.load_file(path);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(err) = persistence::save(&state_path, &persisted) {
        tracing::warn!(error = %err, "could not save dashboard state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Log to a file; the terminal belongs to the dashboard.
fn init_tracing(log_path: &Path) {
    let file = log_path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| File::create(log_path));
    let Ok(file) = file else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init();
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
