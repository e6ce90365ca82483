use serde::{Deserialize, Serialize};

/// Sentinel stored in [`Cell::adjacent_mine_count`] for mined cells.
pub const MINE: i8 = -1;

/// One grid position, with its hidden layout and its player-visible marks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    /// Mined Moore neighbors, or [`MINE`] when the cell itself is a mine.
    pub adjacent_mine_count: i8,
    pub is_revealed: bool,
    pub is_flagged: bool,
}

impl Cell {
    /// Whether revealing this cell continues a flood fill.
    pub const fn is_empty(self) -> bool {
        !self.is_mine && self.adjacent_mine_count == 0
    }

    /// Layout value as seen by the sampling tools: [`MINE`] or 0-8.
    pub const fn value(self) -> i8 {
        if self.is_mine {
            MINE
        } else {
            self.adjacent_mine_count
        }
    }
}
