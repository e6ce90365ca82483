use core::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::SystemTime;

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_started(self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    Mine,
    Safe,
}

/// Wall-clock source for session timing.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// One play session over a single board, from first click to win or loss.
#[derive(Clone, Debug)]
pub struct Game<G = RandomMinefieldGenerator, C = SystemClock> {
    board: Board<G>,
    state: GameState,
    started_at: Option<SystemTime>,
    ended_at: Option<SystemTime>,
    clock: C,
}

impl Game {
    /// Fresh session on a board seeded from OS entropy.
    pub fn new(config: GameConfig, first_click: FirstClick) -> Result<Self> {
        Ok(Self::from_board(Board::new(config, first_click)?))
    }

    pub fn with_seed(config: GameConfig, first_click: FirstClick, seed: u64) -> Result<Self> {
        Ok(Self::from_board(Board::with_seed(config, first_click, seed)?))
    }
}

impl<G: MinefieldGenerator> Game<G> {
    pub fn from_board(board: Board<G>) -> Self {
        Self::with_clock(board, SystemClock)
    }
}

impl<G: MinefieldGenerator, C: Clock> Game<G, C> {
    pub fn with_clock(board: Board<G>, clock: C) -> Self {
        Self {
            board,
            state: GameState::NotStarted,
            started_at: None,
            ended_at: None,
            clock,
        }
    }

    pub fn board(&self) -> &Board<G> {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn started(&self) -> bool {
        self.state.is_started()
    }

    pub fn won(&self) -> bool {
        matches!(self.state, GameState::Won)
    }

    pub fn lost(&self) -> bool {
        matches!(self.state, GameState::Lost)
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Time since the first click, frozen once the game ends and zero before it starts.
    pub fn elapsed(&self) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let until = self.ended_at.unwrap_or_else(|| self.clock.now());
        // clock skew clamps to zero
        until.duration_since(started_at).unwrap_or(Duration::ZERO)
    }

    /// Reveals a cell; the first click of the session also lays out the mines.
    pub fn click(&mut self, coords: Coord2) -> Result<ClickOutcome> {
        let coords = self.board.validate_coords(coords)?;
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }

        if !self.state.is_started() {
            self.board.first_click_place(coords)?;
            let now = self.clock.now();
            log::debug!("Game started at {:?}", now);
            self.started_at = Some(now);
            self.state = GameState::InProgress;
        }

        if self.board.reveal(coords)? == RevealOutcome::Mine {
            self.end_game(GameState::Lost);
            return Ok(ClickOutcome::Mine);
        }

        if self.board.count_revealed() == self.board.count_non_mines() {
            self.end_game(GameState::Won);
        }
        Ok(ClickOutcome::Safe)
    }

    /// Toggles a flag; never affects win or loss.
    pub fn flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.board.toggle_flag(coords)
    }

    fn end_game(&mut self, state: GameState) {
        let now = self.clock.now();
        log::debug!("Game ended {:?} at {:?}", state, now);
        self.ended_at = Some(now);
        self.state = state;
    }
}
