//! clientdash - client orders dashboard
//!
//! Terminal UI over the client-orders spreadsheet, with a chat assistant
//! overlay backed by a webhook.

mod app;
mod ui;
mod worker;

use std::io;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clientdash_core::chat::WebhookClient;
use clientdash_core::{Config, SheetIngestor, SheetSource};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{App, TaskEvent};
use crate::worker::Worker;

fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        clientdash_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("clientdash TUI starting up");

    let source = SheetSource::from_config(&config.sheet).context("invalid [sheet] configuration")?;
    tracing::info!(source = %source.describe(), "Using sheet export");
    let chat = WebhookClient::new(&config.chat).context("invalid [chat] configuration")?;

    let (events_tx, events_rx) = mpsc::channel();
    let mut worker = Worker::new(SheetIngestor::new(source), chat, events_tx)?;

    // Kick off the first fetch before the first frame is drawn
    let mut app = App::new(&config.display);
    app.request_refresh();

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &mut worker, &events_rx);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    worker.shutdown();
    tracing::info!("clientdash TUI shutting down");

    result
}

/// Run the main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &mut Worker,
    events: &Receiver<TaskEvent>,
) -> Result<()> {
    loop {
        for command in app.take_commands() {
            worker.dispatch(command);
        }

        while let Ok(event) = events.try_recv() {
            app.apply(event);
        }

        app.tick(Instant::now());

        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
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

    Ok(())
}
