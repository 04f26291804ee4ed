//! storeview - Browse a product catalog in the terminal
//!
//! A terminal UI application that lists the products of a REST catalog as
//! cards, with a category filter and a sort order.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use storeview::app::App;
use storeview::cli::{Cli, StartupConfig};
use storeview::data::CatalogClient;
use storeview::fetch::{self, Fetcher};
use storeview::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Runs the event loop until the user quits
async fn run(config: StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = CatalogClient::new(config.base_url).with_categories_path(&config.categories_path);
    let (fetcher, mut results) = Fetcher::new(Arc::new(client), config.stale_time);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.initial_filters, fetcher);
    app.mount();

    // Main event loop
    loop {
        while let Some(message) = fetch::try_recv(&mut results) {
            app.apply(message);
        }
        app.sync_filters();

        let mut width = 0;
        terminal.draw(|f| {
            width = f.area().width;
            ui::render(f, &app);
        })?;
        app.columns = ui::grid_columns(width);

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Validate before touching the terminal so errors stay readable
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = &config.log_file {
        if let Err(e) = logging::init(path) {
            eprintln!("Warning: logging disabled: {}", e);
        }
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            tracing::error!(error = %e, "storeview exited with an error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
