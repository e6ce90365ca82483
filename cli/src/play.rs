use anyhow::{Context, Result, bail};
use sapper_core::{ClickOutcome, Coord2, FirstClick, Game, GameConfig};
use sapper_records::ScoreFile;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Move {
    Click(Coord2),
    Flag(Coord2),
}

impl Move {
    /// `r,c` for a click, `f:r,c` for a flag.
    pub fn parse(text: &str) -> Result<Self> {
        match text.strip_prefix("f:") {
            Some(coords) => Ok(Self::Flag(parse_coords(coords)?)),
            None => Ok(Self::Click(parse_coords(text)?)),
        }
    }
}

fn parse_coords(text: &str) -> Result<Coord2> {
    let Some((row, col)) = text.split_once(',') else {
        bail!("expected `row,col`, got `{text}`");
    };
    let row = row.trim().parse().with_context(|| format!("bad row in `{text}`"))?;
    let col = col.trim().parse().with_context(|| format!("bad column in `{text}`"))?;
    Ok((row, col))
}

#[derive(Copy, Clone, Debug)]
pub struct Session {
    pub config: GameConfig,
    pub seed: u64,
    pub unsafe_start: bool,
}

impl Session {
    fn first_click(&self) -> FirstClick {
        if self.unsafe_start {
            FirstClick::Random
        } else {
            FirstClick::Safe
        }
    }
}

pub fn run(session: &Session, moves: &[String], name: Option<&str>, scores: &ScoreFile) -> Result<()> {
    let moves = moves
        .iter()
        .map(|text| Move::parse(text))
        .collect::<Result<Vec<_>>>()?;
    let mut game = Game::with_seed(session.config, session.first_click(), session.seed)?;
    log::info!("playing {} with seed {}", session.config, session.seed);

    for next in moves {
        if game.is_finished() {
            log::warn!("game over, ignoring remaining moves");
            break;
        }
        match next {
            Move::Click(coords) => {
                if game.click(coords)? == ClickOutcome::Mine {
                    println!("boom at {coords:?}");
                }
            }
            Move::Flag(coords) => {
                game.flag(coords)?;
            }
        }
    }

    let board = game.board();
    println!(
        "revealed {}/{} safe cells, {} mines left unflagged",
        board.count_revealed(),
        board.count_non_mines(),
        board.mines_left()
    );
    let elapsed = game.elapsed().as_secs_f64();
    if game.won() {
        println!("won in {elapsed:.2}s");
        if let Some(name) = name {
            let config = game.config();
            let entries = scores
                .submit_score(config.rows(), config.cols(), config.mines, name, elapsed)
                .context("could not record score")?;
            crate::report::print_entries(config, &entries);
        }
    } else if game.lost() {
        println!("lost after {elapsed:.2}s");
    } else {
        println!("in progress, {elapsed:.2}s elapsed");
    }
    Ok(())
}
