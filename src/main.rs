use std::error::Error;

use minesweeper_board::{
    Command, Game, Pos, SharedGame,
    clock::start_clock_task,
    config::Settings,
    results::FileSink,
};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn Error + Send + Sync>;

enum Input {
    Command(Command),
    Quit,
}

fn parse_pos<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<Pos, String> {
    let mut coord = |axis: &str| -> Result<usize, String> {
        parts
            .next()
            .ok_or_else(|| format!("missing {axis}"))?
            .parse::<usize>()
            .map_err(|e| format!("bad {axis}: {e}"))
    };
    let x = coord("x")?;
    let y = coord("y")?;
    Ok(Pos { x, y })
}

fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };

    let input = match verb {
        "r" | "reveal" => Input::Command(Command::Reveal { pos: parse_pos(&mut parts)? }),
        "f" | "flag" => Input::Command(Command::Flag { pos: parse_pos(&mut parts)? }),
        "c" | "chord" => Input::Command(Command::Chord { pos: parse_pos(&mut parts)? }),
        "n" | "new" | "reset" => Input::Command(Command::Reset),
        "q" | "quit" => Input::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(input))
}

async fn print_board(game: &SharedGame) {
    let game = game.lock().await;
    let board = game.board();
    println!("{board}");
    println!(
        "mines: {}/{}  time: {}s  status: {:?}",
        board.mines_remaining(),
        board.mine_count(),
        board.elapsed_seconds(),
        board.status()
    );
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env();
    info!(
        "Starting minesweeper: {}x{} with {} mines",
        settings.params.width, settings.params.height, settings.params.mines
    );

    let mut game = Game::new(settings.params)?;
    if let Some(path) = &settings.results_file {
        let sink = FileSink::new(path, settings.results_format);
        info!("Recording wins to {}", sink.path().display());
        game = game.with_sink(sink);
    }
    let game = game.shared();

    let clock = tokio::spawn(start_clock_task(game.clone(), settings.framerate));

    print_board(&game).await;
    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(Some(Input::Command(command))) => command,
            Ok(Some(Input::Quit)) => break,
            Ok(None) => continue,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        if let Err(e) = game.lock().await.apply(command) {
            warn!("{}", e);
            continue;
        }
        print_board(&game).await;
    }

    clock.abort();
    info!("Goodbye");
    Ok(())
}
