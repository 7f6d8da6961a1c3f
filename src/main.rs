//! `hexmind`: a command-line driver for the Hex engine.
//!
//! - `hexmind demo` — scripted self-play, printing the board and search
//!   telemetry after every move (smoke test / usage example).
//! - `hexmind play` — the line-oriented text protocol from the engine's
//!   external interface: reads `first` | `<move>` | `change` | `finish`
//!   lines and emits a move or `change` per turn.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand, ValueEnum};

use hexmind::engine::{Difficulty as EngineDifficulty, EngineError, Game, LogSink};
use hexmind::notation;

#[derive(Parser)]
#[command(name = "hexmind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Board size (N x N).
    #[arg(long, global = true, default_value_t = 11)]
    size: usize,

    /// Search difficulty.
    #[arg(long, global = true, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted self-play game and print the board after each move.
    Demo {
        /// Number of moves to play before stopping, if nobody has won.
        #[arg(long, default_value_t = 40)]
        max_moves: usize,
    },
    /// Run the line-oriented text protocol on stdin/stdout.
    Play,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl From<Difficulty> for EngineDifficulty {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => EngineDifficulty::Easy,
            Difficulty::Medium => EngineDifficulty::Medium,
            Difficulty::Hard => EngineDifficulty::Hard,
        }
    }
}

/// Writes advisory log lines to stderr. The library never does this
/// itself — only an adapter like this one is allowed to.
struct StderrSink;

impl LogSink for StderrSink {
    fn log(&self, message: &str) {
        eprintln!("[hexmind] {message}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Play) | None => run_play(cli.size, cli.difficulty.into()),
        Some(Commands::Demo { max_moves }) => run_demo(cli.size, cli.difficulty.into(), max_moves),
    }
}

fn run_demo(size: usize, difficulty: EngineDifficulty, max_moves: usize) -> anyhow::Result<()> {
    println!("hexmind: {size}x{size} board, difficulty {difficulty:?}\n");
    let mut game = Game::new_game(size, true, difficulty, Some(Box::new(StderrSink)));

    for ply in 0..max_moves {
        let result = game.engine_move()?;
        let state = game.state();
        println!(
            "move {ply}: {} plays {}",
            if ply % 2 == 0 { "A" } else { "B" },
            notation::format_cell(result.cell)
        );
        print_grid(state.size, &state.grid);
        if let Some(winner) = result.winner {
            println!("{winner} wins after {} plies", ply + 1);
            return Ok(());
        }
    }
    println!("no winner after {max_moves} moves");
    Ok(())
}

fn print_grid(size: usize, grid: &[Option<hexmind::board::Color>]) {
    for r in 0..size {
        print!("{}", " ".repeat(r));
        for c in 0..size {
            let ch = match grid[r * size + c] {
                None => '.',
                Some(hexmind::board::Color::A) => 'a',
                Some(hexmind::board::Color::B) => 'b',
            };
            print!("{ch} ");
        }
        println!();
    }
}

fn run_play(size: usize, difficulty: EngineDifficulty) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let stdout = io::stdout();

    let mut game = Game::new_game(size, true, difficulty, Some(Box::new(StderrSink)));

    let Some(first) = lines.next() else {
        return Ok(());
    };
    let first = first?;
    if first.trim() == "first" {
        let result = game.engine_move()?;
        emit(&stdout, &notation::format_cell(result.cell))?;
    } else {
        game.human_move(first.trim())
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        if should_swap(size, first.trim()) {
            game.apply_swap().map_err(|e| anyhow::anyhow!("{e}"))?;
            emit(&stdout, "change")?;
        } else {
            let result = game.engine_move()?;
            emit(&stdout, &notation::format_cell(result.cell))?;
        }
    }

    for line in lines {
        let line = line?;
        let line = line.trim();
        if line == "finish" {
            break;
        }
        if line == "change" {
            game.apply_swap().map_err(|e| anyhow::anyhow!("{e}"))?;
        } else {
            match game.human_move(line) {
                Ok(()) => {}
                Err(EngineError::GameOver) => continue,
                Err(e) => return Err(anyhow::anyhow!("{e}")),
            }
        }
        match game.engine_move() {
            Ok(result) => emit(&stdout, &notation::format_cell(result.cell))?,
            Err(EngineError::GameOver) => {}
            Err(e) => return Err(anyhow::anyhow!("{e}")),
        }
    }
    Ok(())
}

/// Whether to swap, given the opponent's opening move: swaps on moves
/// landing in the board's central region, mirroring the reference
/// adapter's heuristic. This is session policy, not an engine guarantee.
fn should_swap(size: usize, opponent_first_move: &str) -> bool {
    let Ok((row, col)) = notation::parse_cell(opponent_first_move) else {
        return false;
    };
    let lo = size / 4;
    let hi = size - 1 - size / 4;
    (lo..=hi).contains(&row) && (lo..=hi).contains(&col)
}

fn emit(stdout: &io::Stdout, line: &str) -> anyhow::Result<()> {
    let mut handle = stdout.lock();
    writeln!(handle, "{line}")?;
    handle.flush()?;
    Ok(())
}
