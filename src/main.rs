use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

mod app;
mod config;
mod conversation;
mod handler;
mod missile;
mod sequencer;
mod settings;
mod tui;
mod ui;

use app::App;
use config::UiConfig;
use sequencer::SequencerEvent;
use settings::Settings;

#[derive(Parser)]
#[command(name = "trademaestro")]
#[command(about = "Chat-style demo TUI for the AI TradeMaestro trading assistant")]
struct Cli {
    /// Path to a UI config file (quick actions, theme, delay overrides)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let settings = Settings::load();
    let ui_config = UiConfig::load(cli.config.as_deref());
    let (mut app, mut sequencer_events) = App::new(settings, ui_config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    info!("starting UI loop");
    let result = run(&mut terminal, &mut app, &mut events, &mut sequencer_events).await;

    // Cancel pending timers so nothing fires into a torn-down view
    app.shutdown();
    tui::restore()?;
    result
}

async fn run(
    terminal: &mut tui::Tui,
    app: &mut App,
    events: &mut tui::EventHandler,
    sequencer_events: &mut UnboundedReceiver<SequencerEvent>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        tokio::select! {
            Some(event) = events.next() => handler::handle_event(app, event)?,
            Some(step) = sequencer_events.recv() => app.apply(step),
            else => break,
        }
    }
    Ok(())
}

/// File-based logging; the terminal itself belongs to the TUI. Any trouble
/// here just means no log file.
fn init_logging() {
    let Some(dir) = dirs::config_dir() else {
        return;
    };
    let dir = dir.join("trademaestro");
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("trademaestro.log")) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .init();
}
