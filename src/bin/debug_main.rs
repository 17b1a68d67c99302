use clap::Parser;
use color_eyre::Result;
use fuse_rs::{ActionKind, ActionOutcome, FuseTacToe, GameAction, GameError, GameEvent};
use rand::{rngs::StdRng, SeedableRng};
use std::io::BufRead;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plays the game line by line on the standard input", long_about = None)]
struct Args {
    /// Seeds the coin deciding whether explosive placements explode.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Print the events as JSON lines.
    #[arg(long)]
    json: bool,
}

/// What a single line of the input asks for.
enum Command {
    Game(GameAction),
    Quit,
}

fn parse_command(input: &str) -> Option<Command> {
    let mut parts = input.split_whitespace();

    let command = match (parts.next()?, parts.next()) {
        ("m", None) => Command::Game(GameAction::Select(ActionKind::PlaceMarker)),
        ("b", None) => Command::Game(GameAction::Select(ActionKind::PlaceBomb)),
        ("f", None) => Command::Game(GameAction::Select(ActionKind::PlaceFuse)),
        ("r", None) => Command::Game(GameAction::Reset),
        ("q", None) => Command::Quit,
        ("c", Some(cell_position)) => {
            let cell_position = cell_position
                .split(',')
                .map(|s| s.parse().ok())
                .collect::<Option<Vec<u8>>>()?;

            match cell_position[..] {
                [row, column] => Command::Game(GameAction::Cell((row, column))),
                _ => return None,
            }
        }
        _ => return None,
    };

    // trailing garbage makes the whole line invalid
    parts.next().is_none().then_some(command)
}

fn print_game(game: &FuseTacToe) {
    let snapshot = game.snapshot();
    println!("{}\n{:?}, {}", game.board(), game.action(), snapshot.status_line());
}

fn print_events(events: &[GameEvent], json: bool) -> Result<()> {
    for event in events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{event:?}");
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut game = match args.seed {
        Some(seed) => FuseTacToe::with_rng(StdRng::seed_from_u64(seed)),
        None => FuseTacToe::new(),
    };

    println!("Commands: `m`, `b`, `f` to select an action, `c 2,3` to select the 4th cell on the 3rd line, `r` to reset, `q` to quit.");
    print_game(&game);

    for line in std::io::stdin().lock().lines() {
        let line = line?;

        let action = match parse_command(&line) {
            Some(Command::Game(action)) => action,
            Some(Command::Quit) => break,
            None => {
                println!("Incorrect input! Please, try again.");
                continue;
            }
        };

        match game.take_action(action) {
            Ok(ActionOutcome::Applied(events)) => print_events(&events, args.json)?,
            Ok(ActionOutcome::Rejected(reason)) => println!("Rejected: {reason}"),
            Err(err @ (GameError::OutOfBounds(_) | GameError::AlreadyEnded)) => println!("{err}"),
            Err(err) => return Err(err.into()),
        }

        print_game(&game);
    }

    Ok(())
}
