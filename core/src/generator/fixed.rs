use super::*;

/// Replays a known layout, used for puzzles and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMinefieldGenerator {
    mines: Vec<Coord2>,
}

impl FixedMinefieldGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MinefieldGenerator for FixedMinefieldGenerator {
    fn generate(&mut self, config: GameConfig, exclude: &[Coord2]) -> Result<Array2<bool>> {
        let excluded = exclusion_mask(config, exclude)?;
        let (rows, cols) = config.size;
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());

        for &coords in &self.mines {
            if coords.0 >= rows || coords.1 >= cols {
                return Err(GameError::InvalidCoords);
            }
            if excluded[coords.to_nd_index()] {
                return Err(GameError::ExcludedMine);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let placed = mine_mask.iter().filter(|&&mine| mine).count();
        if placed != usize::from(config.mines) {
            log::warn!(
                "Preset layout has {} mines, configuration expects {}",
                placed,
                config.mines
            );
            return Err(GameError::InvalidMineCount);
        }
        Ok(mine_mask)
    }
}
