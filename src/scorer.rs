use serde::Serialize;

use crate::game_interface::Key;
use crate::grid::MultiLevelGrid;

/// Distance per key, in key order. A key's distance is the number of distinct
/// (level, row, col) cells marked on its path.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Distances(Vec<(Key, usize)>);

impl Distances {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.iter().find(|(k, _)| k == key).map(|&(_, d)| d)
    }

    pub fn iter(&self) -> impl Iterator<Item=(&str, usize)> + '_ {
        self.0.iter().map(|(k, d)| (k.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total score: the sum of every key's distance.
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, d)| d).sum()
    }
}

pub struct PathScorer;

impl PathScorer {
    /// Pure read of the grid's path tensors.
    pub fn calculate_total_distance(grid: &MultiLevelGrid) -> Distances {
        Distances(grid.paths()
            .map(|(key, path)| (key.clone(), path.count()))
            .collect())
    }
}
