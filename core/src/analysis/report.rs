use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::*;
use crate::*;

/// Aggregate properties of a batch of sampled layouts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleReport {
    pub config: GameConfig,
    pub boards: usize,
    /// Zero-valued cells per board, in sampling order.
    pub white_cells: Vec<usize>,
    /// Index 0 counts mines, index `n + 1` counts cells with value `n`.
    pub value_histogram: [usize; 10],
    /// Mine clusters per board, in sampling order.
    pub mine_clusters: Vec<usize>,
    pub heatmap: Array2<f64>,
}

impl SampleReport {
    pub fn from_grids(config: GameConfig, grids: &[Array2<i8>]) -> Result<Self> {
        let expected = (usize::from(config.rows()), usize::from(config.cols()));
        if grids.iter().any(|grid| grid.dim() != expected) {
            return Err(GameError::InvalidBoardShape);
        }

        Ok(Self {
            config,
            boards: grids.len(),
            white_cells: grids.iter().map(white_cells).collect(),
            value_histogram: value_histogram(grids),
            mine_clusters: grids.iter().map(mine_clusters).collect(),
            heatmap: neighborhood_heatmap(grids).unwrap_or_else(|| Array2::zeros(expected)),
        })
    }

    /// Samples `count` boards and summarizes them.
    pub fn sample(config: GameConfig, count: usize, seed: u64) -> Result<Self> {
        let grids = generate_boards(config, count, seed)?;
        Self::from_grids(config, &grids)
    }

    pub fn mean_white_cells(&self) -> f64 {
        mean(&self.white_cells)
    }

    pub fn mean_mine_clusters(&self) -> f64 {
        mean(&self.mine_clusters)
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<usize>() as f64 / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn summarizes_grids() {
        let config = GameConfig::new((2, 2), 1).unwrap();
        let grids = [array![[MINE, 1], [1, 1]], array![[1, 1], [1, MINE]]];

        let report = SampleReport::from_grids(config, &grids).unwrap();

        assert_eq!(report.boards, 2);
        assert_eq!(report.white_cells, vec![0, 0]);
        assert_eq!(report.mine_clusters, vec![1, 1]);
        assert_eq!(report.value_histogram[0], 2);
        assert_eq!(report.value_histogram[2], 6);
        assert_eq!(report.heatmap, Array2::from_elem((2, 2), 1.0));
        assert_eq!(report.mean_mine_clusters(), 1.0);
    }

    #[test]
    fn rejects_grids_of_other_sizes() {
        let config = GameConfig::new((3, 3), 1).unwrap();

        assert_eq!(
            SampleReport::from_grids(config, &[Array2::zeros((2, 2))]),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn empty_sample_has_zero_heat() {
        let config = GameConfig::new((2, 3), 1).unwrap();

        let report = SampleReport::from_grids(config, &[]).unwrap();

        assert_eq!(report.heatmap, Array2::<f64>::zeros((2, 3)));
        assert_eq!(report.mean_white_cells(), 0.0);
    }

    #[test]
    fn serializes_to_json() {
        let report = SampleReport::sample(Difficulty::Easy.config(), 2, 9).unwrap();

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["boards"], 2);
        assert_eq!(json["config"]["mines"], 10);
    }
}
