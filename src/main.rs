mod action;
mod api;
mod app;
mod config;
mod error;
mod event;
mod pagination;
mod source;
mod tui;
mod types;
mod ui;
mod visibility;

use std::panic;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::api::RickAndMorty;
use crate::app::App;
use crate::config::{Cli, Config};
use crate::event::Event;
use crate::source::PageSource;
use crate::tui::EventHandler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).merge_cli(&cli);

    // Initialize logging; the terminal belongs to the TUI, so logs go to a file or nowhere
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(log_writer(config.log_file.as_deref())?),
        )
        .init();

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let source = RickAndMorty::new(&config.base_url, config.timeout())?;
    tracing::info!(?source, cards_per_page = config.cards_per_page, "starting");

    // Run the application
    let result = run(Arc::new(source), config.cards_per_page).await;

    // Restore terminal
    tui::restore()?;

    result
}

fn log_writer(path: Option<&Path>) -> Result<BoxMakeWriter, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            Ok(BoxMakeWriter::new(std::sync::Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(std::io::sink)),
    }
}

async fn run(
    source: Arc<dyn PageSource>,
    cards_per_page: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state
    let mut app = App::new(source, cards_per_page, action_tx.clone());
    for event in [Event::Resize(tui::height(&terminal)?), Event::Init] {
        let action = app.handle_event(event);
        app.update(action);
    }

    // Create event handler
    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
