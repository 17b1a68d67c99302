pub mod animation;
pub mod app;
pub mod event;
pub mod game_ui;
pub mod tui;
pub mod update;

use app::App;
use clap::Parser;
use color_eyre::Result;
use event::{Event, EventHandler};
use fuse_rs::FuseTacToe;
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::File, path::PathBuf, sync::Arc, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui::Tui;
use update::update;

/// The rate (in milliseconds) at which the explosion playback advances.
const TICK_RATE: u64 = 50;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seeds the coin deciding whether explosive placements explode, for a reproducible game.
    #[arg(short, long)]
    seed: Option<u64>,
    /// The delay in milliseconds between two consecutive levels of an explosion.
    #[arg(short, long, default_value_t = 100)]
    level_delay: u64,
    /// Where to write the logs to.
    #[arg(long, default_value = "fuse_rs.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // log into a file, the terminal is busy
    let log_file = File::create(&args.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!(?args, "starting");

    let game = match args.seed {
        Some(seed) => FuseTacToe::with_rng(StdRng::seed_from_u64(seed)),
        None => FuseTacToe::new(),
    };

    // Create the terminal application.
    let mut app = App::new(game, Duration::from_millis(args.level_delay));

    // Initialize the terminal user interface.
    let backend = CrosstermBackend::new(std::io::stderr());
    let terminal = Terminal::new(backend)?;
    let events = EventHandler::new(TICK_RATE);
    let mut tui = Tui::new(terminal, events);
    tui.enter()?;

    // Run the main loop, restoring the terminal whatever comes out of it.
    let result = run(&mut tui, &mut app);

    // Exit the user interface.
    tui.exit()?;
    info!("bye");
    result
}

fn run(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Render the user interface.
        tui.draw(app)?;
        // Handle events.
        match tui.events.next()? {
            Event::Tick => app.tick(),
            Event::Key(key_event) => update(app, key_event)?,
            Event::Mouse(_) => {}
            Event::Resize(_, _) => {}
        };
    }

    Ok(())
}
