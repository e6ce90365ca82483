use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::*;

/// Generates `count` finished layouts the way a player would get them: a safe-first-click
/// board revealed once at a uniformly random cell.
///
/// Each grid holds [`MINE`] or the 0-8 adjacency count of every cell.
pub fn generate_boards(config: GameConfig, count: usize, seed: u64) -> Result<Vec<Array2<i8>>> {
    let config = config.validate()?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut grids = Vec::with_capacity(count);

    for _ in 0..count {
        let start = (
            rng.random_range(0..config.rows()),
            rng.random_range(0..config.cols()),
        );
        let mut board = Board::with_seed(config, FirstClick::Safe, rng.random())?;
        board.first_click_place(start)?;
        board.reveal(start)?;
        grids.push(board.value_grid());
    }

    log::debug!("Sampled {} boards for {}", grids.len(), config);
    Ok(grids)
}

/// Number of zero-valued cells.
pub fn white_cells(grid: &Array2<i8>) -> usize {
    grid.iter().filter(|&&value| value == 0).count()
}

/// Cell value frequencies across `grids`; index 0 counts mines, index `n + 1` counts value `n`.
pub fn value_histogram<'a>(grids: impl IntoIterator<Item = &'a Array2<i8>>) -> [usize; 10] {
    let mut histogram = [0; 10];
    for grid in grids {
        for &value in grid {
            if let Ok(slot) = usize::try_from(i16::from(value) + 1) {
                if let Some(bucket) = histogram.get_mut(slot) {
                    *bucket += 1;
                }
            }
        }
    }
    histogram
}

/// Number of groups of mines connected horizontally, vertically or diagonally.
pub fn mine_clusters(grid: &Array2<i8>) -> usize {
    let (rows, cols) = grid.dim();
    let mut visited = vec![false; rows * cols];
    let mut clusters = 0;

    for start in 0..rows * cols {
        if visited[start] || grid[[start / cols, start % cols]] != MINE {
            continue;
        }

        clusters += 1;
        visited[start] = true;
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            let (row, col) = (index / cols, index % cols);
            for next_row in row.saturating_sub(1)..=(row + 1).min(rows - 1) {
                for next_col in col.saturating_sub(1)..=(col + 1).min(cols - 1) {
                    let next = next_row * cols + next_col;
                    if !visited[next] && grid[[next_row, next_col]] == MINE {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }
        }
    }

    clusters
}

/// Mean number of mines in the 3x3 window centered on each cell (the cell itself included).
///
/// Returns `None` when `grids` is empty or the grids disagree on shape.
pub fn neighborhood_heatmap(grids: &[Array2<i8>]) -> Option<Array2<f64>> {
    let dim = grids.first()?.dim();
    if grids.iter().any(|grid| grid.dim() != dim) {
        return None;
    }

    let (rows, cols) = dim;
    let mut heat = Array2::<f64>::zeros(dim);
    for grid in grids {
        for ((row, col), &value) in grid.indexed_iter() {
            if value != MINE {
                continue;
            }
            // each mine contributes to every window it falls into
            for heat_row in row.saturating_sub(1)..=(row + 1).min(rows - 1) {
                for heat_col in col.saturating_sub(1)..=(col + 1).min(cols - 1) {
                    heat[[heat_row, heat_col]] += 1.0;
                }
            }
        }
    }

    heat /= grids.len() as f64;
    Some(heat)
}
