//! stockdash TUI: single-screen price dashboard.
//!
//! Layout:
//! 1. Input form: ticker, start date, end date
//! 2. Closing-price chart
//! 3. Metric cards: total return, average daily return, volatility, max drawdown
//! 4. Daily returns table
//! 5. Status bar

mod app;
mod input;
mod logging;
mod persistence;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use stockdash_core::config::DashboardConfig;
use stockdash_core::pipeline::Dashboard;

use crate::app::AppState;

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let base_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockdash");
    let config_path = base_dir.join("config.toml");
    let state_path = base_dir.join("state.json");

    logging::init(&base_dir.join("stockdash.log"))?;

    // Invalid config falls back to defaults so the screen still opens.
    let (config, config_warning) = match DashboardConfig::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => {
            tracing::warn!(error = %e, "using default configuration");
            (DashboardConfig::default(), Some(e.to_string()))
        }
    };

    let provider = config.build_provider().context("building price provider")?;
    let dashboard = Dashboard::new(provider, config.memo_ttl(), config.chart_height);
    tracing::info!(provider = dashboard.provider().name(), "stockdash-tui starting");

    let today = chrono::Local::now().date_naive();
    let mut app = AppState::new(&config, dashboard, today, state_path.clone());
    persistence::apply(&mut app, persistence::load(&state_path));
    if let Some(warning) = config_warning {
        app.set_warning(format!("Config ignored: {warning}"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    if let Err(e) = persistence::save(&app.state_path, &persistence::extract(&app)) {
        tracing::warn!(error = %e, "failed to save UI state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Run a load queued by the previous key press
        if app.load_pending {
            app.run_pending(chrono::Local::now().date_naive());
            continue;
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
