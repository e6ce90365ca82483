use ndarray::Array2;

use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Source of mine layouts for a [`Board`].
///
/// `exclude` lists cells that must stay free of mines. The returned mask has shape
/// `(rows, cols)` and holds exactly `config.mines` mines.
pub trait MinefieldGenerator {
    fn generate(&mut self, config: GameConfig, exclude: &[Coord2]) -> Result<Array2<bool>>;
}

/// Builds an exclusion mask, rejecting out-of-bounds coordinates.
fn exclusion_mask(config: GameConfig, exclude: &[Coord2]) -> Result<Array2<bool>> {
    let (rows, cols) = config.size;
    let mut mask: Array2<bool> = Array2::default(config.size.to_nd_index());
    for &coords in exclude {
        if coords.0 >= rows || coords.1 >= cols {
            return Err(GameError::InvalidCoords);
        }
        mask[coords.to_nd_index()] = true;
    }
    Ok(mask)
}
