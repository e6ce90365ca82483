use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;
use crate::types::from_linear_index;

/// Uniform placement over every cell not excluded, driven by an owned seedable RNG.
#[derive(Clone, Debug)]
pub struct RandomMinefieldGenerator {
    rng: SmallRng,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(&mut self, config: GameConfig, exclude: &[Coord2]) -> Result<Array2<bool>> {
        let excluded = exclusion_mask(config, exclude)?;
        let mut candidates: Vec<usize> = excluded
            .iter()
            .enumerate()
            .filter(|&(_, &is_excluded)| !is_excluded)
            .map(|(index, _)| index)
            .collect();

        let mines = usize::from(config.mines);
        if mines > candidates.len() {
            log::warn!(
                "Cannot place {} mines, only {} cells are free",
                mines,
                candidates.len()
            );
            return Err(GameError::TooManyMines);
        }

        let (chosen, _) = candidates.partial_shuffle(&mut self.rng, mines);
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        for &index in chosen.iter() {
            mine_mask[from_linear_index(index, config.cols()).to_nd_index()] = true;
        }
        Ok(mine_mask)
    }
}
