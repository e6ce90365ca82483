use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::{from_linear_index, linear_index};
use crate::*;

/// Whether the mine layout has been generated yet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutState {
    #[default]
    Unplaced,
    Placed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// The cell was already revealed or is flagged.
    AlreadySettled,
    Mine,
    Cleared,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::AlreadySettled => false,
            Self::Mine => true,
            Self::Cleared => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Grid of cells with lazy mine placement, flood-fill reveal and flags.
#[derive(Clone, Debug)]
pub struct Board<G = RandomMinefieldGenerator> {
    config: GameConfig,
    first_click: FirstClick,
    cells: Array2<Cell>,
    layout: LayoutState,
    revealed_count: CellCount,
    flagged_count: CellCount,
    generator: G,
}

impl Board {
    /// Board seeded from OS entropy.
    pub fn new(config: GameConfig, first_click: FirstClick) -> Result<Self> {
        Self::with_generator(config, first_click, RandomMinefieldGenerator::from_entropy())
    }

    /// Board whose layout is fully determined by `seed`.
    pub fn with_seed(config: GameConfig, first_click: FirstClick, seed: u64) -> Result<Self> {
        Self::with_generator(config, first_click, RandomMinefieldGenerator::new(seed))
    }
}

impl<G: MinefieldGenerator> Board<G> {
    /// With [`FirstClick::Random`] the layout is generated right away, otherwise it waits for
    /// [`Board::first_click_place`].
    pub fn with_generator(config: GameConfig, first_click: FirstClick, generator: G) -> Result<Self> {
        let config = config.validate()?;
        let mut board = Self {
            config,
            first_click,
            cells: Array2::default(config.size.to_nd_index()),
            layout: LayoutState::Unplaced,
            revealed_count: 0,
            flagged_count: 0,
            generator,
        };
        if !first_click.is_safe() {
            board.place_mines(&[])?;
        }
        Ok(board)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn rows(&self) -> Coord {
        self.config.rows()
    }

    pub fn cols(&self) -> Coord {
        self.config.cols()
    }

    pub fn mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn first_click(&self) -> FirstClick {
        self.first_click
    }

    pub fn layout_state(&self) -> LayoutState {
        self.layout
    }

    pub fn mines_placed(&self) -> bool {
        matches!(self.layout, LayoutState::Placed)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// Read access to the whole grid, indexed `[row, col]`.
    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// Layout as plain integers: [`MINE`] for mines, 0-8 otherwise.
    pub fn value_grid(&self) -> Array2<i8> {
        self.cells.map(|cell| cell.value())
    }

    /// The in-bounds Moore neighbors of `coords`.
    pub fn neighbors(&self, coords: Coord2) -> Result<NeighborIter> {
        let coords = self.validate_coords(coords)?;
        Ok(self.iter_neighbors(coords))
    }

    /// Places the configured number of mines outside `exclude` and computes adjacency counts.
    ///
    /// Placing twice is a no-op.
    pub fn place_mines(&mut self, exclude: &[Coord2]) -> Result<()> {
        if self.mines_placed() {
            log::debug!("Mines already placed, ignoring placement request");
            return Ok(());
        }

        let mine_mask = self.generator.generate(self.config, exclude)?;
        if mine_mask.dim() != self.cells.dim() {
            return Err(GameError::InvalidBoardShape);
        }
        for (cell, &is_mine) in self.cells.iter_mut().zip(mine_mask.iter()) {
            cell.is_mine = is_mine;
        }

        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                let count = if self.cells[coords.to_nd_index()].is_mine {
                    MINE
                } else {
                    self.iter_neighbors(coords)
                        .filter(|&pos| self.cells[pos.to_nd_index()].is_mine)
                        .count() as i8
                };
                self.cells[coords.to_nd_index()].adjacent_mine_count = count;
            }
        }

        self.layout = LayoutState::Placed;
        log::debug!(
            "Placed {} mines on {}x{} board, excluded {:?}",
            self.config.mines,
            rows,
            cols,
            exclude
        );
        self.log_layout();
        Ok(())
    }

    /// Generates the layout for a session's first click according to the [`FirstClick`] policy.
    pub fn first_click_place(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        if self.mines_placed() {
            return Ok(());
        }

        match self.first_click {
            FirstClick::Random => self.place_mines(&[]),
            FirstClick::Safe => self.place_mines(&[coords]),
        }
    }

    /// Reveals a cell, flooding through connected zero cells and their numbered border.
    ///
    /// Flagged cells are never revealed, neither directly nor by the flood.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        if !self.mines_placed() {
            log::debug!("Reveal before placement, placing mines for {:?}", coords);
            self.first_click_place(coords)?;
        }

        let cell = self.cells[coords.to_nd_index()];
        if cell.is_revealed || cell.is_flagged {
            return Ok(RevealOutcome::AlreadySettled);
        }

        self.mark_revealed(coords);
        if cell.is_mine {
            log::debug!("Mine revealed at {:?}", coords);
            return Ok(RevealOutcome::Mine);
        }

        if cell.is_empty() {
            self.flood_from(coords);
        }
        Ok(RevealOutcome::Cleared)
    }

    /// Flags or unflags an unrevealed cell.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        if cell.is_revealed {
            return Ok(MarkOutcome::NoChange);
        }

        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        Ok(MarkOutcome::Changed)
    }

    pub fn count_revealed(&self) -> CellCount {
        self.revealed_count
    }

    pub fn count_non_mines(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn count_flagged(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines not accounted for by flags, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count as isize)
    }

    fn flood_from(&mut self, start: Coord2) {
        let cols = self.cols();
        let mut visited = vec![false; usize::from(self.config.total_cells())];
        let mut stack = vec![linear_index(start, cols)];
        visited[linear_index(start, cols)] = true;

        while let Some(index) = stack.pop() {
            let current = from_linear_index(index, cols);
            for pos in self.iter_neighbors(current) {
                let neighbor_index = linear_index(pos, cols);
                let neighbor = self.cells[pos.to_nd_index()];
                if visited[neighbor_index] || neighbor.is_flagged || neighbor.is_revealed {
                    continue;
                }

                self.mark_revealed(pos);
                log::trace!("Flood revealed {:?} ({})", pos, neighbor.adjacent_mine_count);
                if neighbor.is_empty() {
                    visited[neighbor_index] = true;
                    stack.push(neighbor_index);
                }
            }
        }
    }

    fn mark_revealed(&mut self, coords: Coord2) {
        self.cells[coords.to_nd_index()].is_revealed = true;
        self.revealed_count += 1;
    }

    fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    fn log_layout(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        for row in self.cells.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| {
                    if cell.is_mine {
                        "M".to_string()
                    } else {
                        cell.adjacent_mine_count.to_string()
                    }
                })
                .collect();
            log::debug!("{}", line.join(" "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::SmallRng;

    fn preset(size: Coord2, mines: &[Coord2]) -> Board<FixedMinefieldGenerator> {
        let config = GameConfig::new(size, mines.len() as CellCount).unwrap();
        Board::with_generator(config, FirstClick::Random, FixedMinefieldGenerator::new(mines))
            .unwrap()
    }

    fn count_mines(board: &Board<impl MinefieldGenerator>) -> usize {
        board.cells().iter().filter(|cell| cell.is_mine).count()
    }

    #[test]
    fn safe_board_starts_without_mines() {
        let config = GameConfig::new((9, 9), 10).unwrap();
        let board = Board::with_seed(config, FirstClick::Safe, 1).unwrap();

        assert_eq!(board.layout_state(), LayoutState::Unplaced);
        assert_eq!(count_mines(&board), 0);
    }

    #[test]
    fn random_board_places_at_construction() {
        let config = GameConfig::new((9, 9), 10).unwrap();
        let board = Board::with_seed(config, FirstClick::Random, 1).unwrap();

        assert!(board.mines_placed());
        assert_eq!(count_mines(&board), 10);
    }

    #[test]
    fn construction_rejects_bad_config() {
        let config = GameConfig::new_unchecked((3, 3), 9);

        assert_eq!(
            Board::with_seed(config, FirstClick::Safe, 0).err(),
            Some(GameError::InvalidMineCount)
        );
    }

    #[test]
    fn adjacency_counts_match_mines() {
        let config = GameConfig::new((16, 30), 99).unwrap();
        let mut board = Board::with_seed(config, FirstClick::Safe, 99).unwrap();
        board.first_click_place((8, 15)).unwrap();

        assert_eq!(count_mines(&board), 99);
        for ((row, col), cell) in board.cells().indexed_iter() {
            let coords = (row as Coord, col as Coord);
            if cell.is_mine {
                assert_eq!(cell.adjacent_mine_count, MINE);
            } else {
                let expected = board
                    .neighbors(coords)
                    .unwrap()
                    .filter(|&pos| board.cell(pos).unwrap().is_mine)
                    .count() as i8;
                assert_eq!(cell.adjacent_mine_count, expected, "{coords:?}");
            }
        }
    }

    #[test]
    fn first_click_is_safe_at_maximum_density() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..50 {
            let rows = rng.random_range(1..=6);
            let cols = rng.random_range(2..=6);
            let total = mult(rows, cols);
            let mines = rng.random_range(1..total);
            let start = (rng.random_range(0..rows), rng.random_range(0..cols));
            let config = GameConfig::new((rows, cols), mines).unwrap();
            let mut board = Board::with_seed(config, FirstClick::Safe, rng.random()).unwrap();

            board.first_click_place(start).unwrap();

            assert_eq!(board.reveal(start).unwrap(), RevealOutcome::Cleared);
            assert!(!board.cell(start).unwrap().is_mine);
            assert_eq!(count_mines(&board), usize::from(mines));
        }
    }

    #[test]
    fn easy_board_seeded_center_click() {
        let config = GameConfig::new((9, 9), 10).unwrap();
        let mut board = Board::with_seed(config, FirstClick::Safe, 2024).unwrap();

        board.first_click_place((4, 4)).unwrap();

        assert!(!board.cell((4, 4)).unwrap().is_mine);
        assert_eq!(count_mines(&board), 10);
    }

    #[test]
    fn placement_is_idempotent() {
        let config = GameConfig::new((5, 5), 5).unwrap();
        let mut board = Board::with_seed(config, FirstClick::Safe, 8).unwrap();
        board.first_click_place((0, 0)).unwrap();
        let layout = board.value_grid();

        board.place_mines(&[]).unwrap();
        board.first_click_place((4, 4)).unwrap();

        assert_eq!(board.value_grid(), layout);
    }

    #[test]
    fn flood_cascades_to_numbered_border() {
        // mines in the corners of a 5x5 board leave a zero-count cross in the middle
        let mut board = preset((5, 5), &[(0, 0), (0, 4), (4, 0), (4, 4)]);

        assert_eq!(board.reveal((2, 2)).unwrap(), RevealOutcome::Cleared);

        for ((row, col), cell) in board.cells().indexed_iter() {
            assert_eq!(cell.is_revealed, !cell.is_mine, "({row}, {col})");
        }
        assert_eq!(board.count_revealed(), board.count_non_mines());
        assert_eq!(board.cell((1, 1)).unwrap().adjacent_mine_count, 1);
    }

    #[test]
    fn flood_stops_at_numbers() {
        let mut board = preset((3, 5), &[(0, 4), (1, 4), (2, 4)]);

        board.reveal((1, 0)).unwrap();

        for row in 0..3 {
            assert!(board.cell((row, 2)).unwrap().is_revealed);
            assert!(board.cell((row, 3)).unwrap().is_revealed);
            assert!(!board.cell((row, 4)).unwrap().is_revealed);
        }
        assert_eq!(board.count_revealed(), 12);
    }

    #[test]
    fn revealing_inside_open_region_is_settled() {
        let mut board = preset((4, 4), &[(3, 3)]);
        board.reveal((0, 0)).unwrap();
        let revealed = board.count_revealed();

        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::AlreadySettled);
        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::AlreadySettled);
        assert_eq!(board.count_revealed(), revealed);
    }

    #[test]
    fn flagged_cell_blocks_reveal() {
        let mut board = preset((3, 3), &[(2, 2)]);

        assert_eq!(board.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::AlreadySettled);
        assert!(!board.cell((0, 0)).unwrap().is_revealed);
    }

    #[test]
    fn flood_skips_flagged_cells() {
        let mut board = preset((4, 4), &[(3, 3)]);
        board.toggle_flag((0, 3)).unwrap();

        board.reveal((0, 0)).unwrap();

        let flagged = board.cell((0, 3)).unwrap();
        assert!(flagged.is_flagged);
        assert!(!flagged.is_revealed);
        assert!(!board.cell((3, 3)).unwrap().is_revealed);
        assert_eq!(board.count_revealed(), 14);
    }

    #[test]
    fn revealing_mine_reports_it() {
        let mut board = preset((2, 2), &[(0, 0)]);

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::Mine);
        assert!(board.cell((0, 0)).unwrap().is_revealed);
    }

    #[test]
    fn toggle_flag_round_trips_and_ignores_revealed() {
        let mut board = preset((2, 2), &[(0, 0)]);

        board.toggle_flag((0, 0)).unwrap();
        assert_eq!(board.count_flagged(), 1);
        assert_eq!(board.mines_left(), 0);
        board.toggle_flag((0, 0)).unwrap();
        assert!(!board.cell((0, 0)).unwrap().is_flagged);
        assert_eq!(board.count_flagged(), 0);

        board.reveal((1, 1)).unwrap();
        assert_eq!(board.toggle_flag((1, 1)).unwrap(), MarkOutcome::NoChange);
        assert!(!board.cell((1, 1)).unwrap().is_flagged);
    }

    #[test]
    fn out_of_bounds_coordinates_fail_fast() {
        let mut board = preset((2, 3), &[(0, 0)]);

        assert_eq!(board.reveal((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_flag((0, 3)), Err(GameError::InvalidCoords));
        assert!(board.neighbors((5, 5)).is_err());
        assert!(board.cell((2, 3)).is_err());
    }

    #[test]
    fn single_reveal_populates_full_layout() {
        let config = GameConfig::new((16, 16), 40).unwrap();
        let mut board = Board::with_seed(config, FirstClick::Safe, 77).unwrap();

        board.first_click_place((3, 7)).unwrap();
        board.reveal((3, 7)).unwrap();

        let grid = board.value_grid();
        assert_eq!(grid.iter().filter(|&&value| value == MINE).count(), 40);
        assert!(grid.iter().all(|&value| (MINE..=8).contains(&value)));
    }

    #[test]
    fn reveal_without_explicit_placement_still_safe() {
        let config = GameConfig::new((3, 3), 8).unwrap();
        let mut board = Board::with_seed(config, FirstClick::Safe, 4).unwrap();

        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::Cleared);
        assert_eq!(board.cell((1, 1)).unwrap().adjacent_mine_count, 8);
    }
}
