use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sapper_core::{Difficulty, GameConfig};
use sapper_records::ScoreFile;

mod play;
mod report;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Best-times file, defaults to ~/.minesweeper_highscores.json
    #[arg(long, global = true)]
    scores_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample boards and print their aggregate statistics
    Stats {
        #[command(flatten)]
        board: BoardArgs,

        /// How many boards to sample
        #[arg(short, long, default_value_t = 20)]
        boards: usize,

        /// Sampling seed, random when omitted
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the best times for a board configuration
    Scores {
        #[command(flatten)]
        board: BoardArgs,
    },
    /// Record a finished time
    Submit {
        #[command(flatten)]
        board: BoardArgs,

        #[arg(short, long)]
        name: String,

        /// Completion time in seconds
        #[arg(short, long)]
        time: f64,
    },
    /// Play a scripted session: `r,c` clicks a cell, `f:r,c` toggles a flag
    Play {
        #[command(flatten)]
        board: BoardArgs,

        /// Layout seed, random when omitted
        #[arg(short, long)]
        seed: Option<u64>,

        /// Let the first click hit a mine
        #[arg(long)]
        unsafe_start: bool,

        /// Submit the time under this name when the session is won
        #[arg(short, long)]
        name: Option<String>,

        #[arg(required = true)]
        moves: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct BoardArgs {
    /// Preset: easy, intermediate or expert
    #[arg(short, long, default_value = "easy", conflicts_with_all = ["rows", "cols", "mines"])]
    difficulty: Difficulty,

    #[arg(long, requires_all = ["cols", "mines"])]
    rows: Option<u8>,

    #[arg(long, requires_all = ["rows", "mines"])]
    cols: Option<u8>,

    #[arg(long, requires_all = ["rows", "cols"])]
    mines: Option<u16>,
}

impl BoardArgs {
    fn config(&self) -> Result<GameConfig> {
        match (self.rows, self.cols, self.mines) {
            (Some(rows), Some(cols), Some(mines)) => GameConfig::new((rows, cols), mines)
                .with_context(|| format!("invalid board {rows}x{cols} with {mines} mines")),
            _ => Ok(self.difficulty.config()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    let scores = ScoreFile::new(cli.scores_file.unwrap_or_else(ScoreFile::default_path));
    log::debug!("scores file: {}", scores.path().display());

    match cli.command {
        Command::Stats {
            board,
            boards,
            seed,
            json,
        } => {
            let seed = seed.unwrap_or_else(clock_seed);
            report::stats(board.config()?, boards, seed, json)
        }
        Command::Scores { board } => {
            report::scores(&scores, board.config()?);
            Ok(())
        }
        Command::Submit { board, name, time } => {
            let config = board.config()?;
            let entries = scores
                .submit_score(config.rows(), config.cols(), config.mines, &name, time)
                .context("could not record score")?;
            report::print_entries(config, &entries);
            Ok(())
        }
        Command::Play {
            board,
            seed,
            unsafe_start,
            name,
            moves,
        } => {
            let seed = seed.unwrap_or_else(clock_seed);
            let session = play::Session {
                config: board.config()?,
                seed,
                unsafe_start,
            };
            play::run(&session, &moves, name.as_deref(), &scores)
        }
    }
}

/// Seed derived from the current time, for runs that do not ask for reproducibility.
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
