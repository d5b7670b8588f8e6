use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::game_interface::{Key, Number, Pair, Position};
use crate::tensor::LevelTensor;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("Unknown key {0:?}")]
    UnknownKey(Key),
    #[error("Cell (level={level}, row={row}, col={col}) is outside the grid")]
    OutOfRange { level: Number, row: Number, col: Number },
}

/// Goal endpoints for every key on a shared level-0 tensor, plus one path
/// tensor per key. All mutation goes through this type and invalid input is a
/// silent no-op.
#[derive(Debug, Clone)]
pub struct MultiLevelGrid {
    rows: usize,
    cols: usize,
    levels: usize,
    // keys[i], pairs[i] and paths[i] describe the same key, in construction
    // order.
    keys: Vec<Key>,
    pairs: Vec<Pair>,
    paths: Vec<LevelTensor>,
    key_index: FxHashMap<Key, usize>,
    goals: LevelTensor,
}

impl MultiLevelGrid {
    /// Builds the grid and marks every key's goals. Pairs are not validated:
    /// out-of-range pairs simply get no goal marks. A repeated key replaces
    /// the earlier pair.
    pub fn new<K, I>(rows: usize, cols: usize, levels: usize, pairs: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item=(K, Pair)>,
    {
        let mut grid = MultiLevelGrid {
            rows,
            cols,
            levels,
            keys: Vec::new(),
            pairs: Vec::new(),
            paths: Vec::new(),
            key_index: FxHashMap::default(),
            goals: LevelTensor::new(levels, rows, cols),
        };
        for (key, pair) in pairs {
            let key = key.into();
            match grid.key_index.get(&key) {
                Some(&idx) => grid.pairs[idx] = pair,
                None => {
                    grid.key_index.insert(key.clone(), grid.keys.len());
                    grid.keys.push(key);
                    grid.pairs.push(pair);
                    grid.paths.push(LevelTensor::new(levels, rows, cols));
                }
            }
        }
        for idx in 0..grid.keys.len() {
            grid.mark_goal(idx);
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.key_index.contains_key(key)
    }

    pub fn pair(&self, key: &str) -> Option<&Pair> {
        self.key_index.get(key).map(|&idx| &self.pairs[idx])
    }

    pub fn pairs(&self) -> impl Iterator<Item=(&Key, &Pair)> + '_ {
        self.keys.iter().zip(self.pairs.iter())
    }

    pub fn goals(&self) -> &LevelTensor {
        &self.goals
    }

    pub fn path(&self, key: &str) -> Option<&LevelTensor> {
        self.key_index.get(key).map(|&idx| &self.paths[idx])
    }

    pub fn paths(&self) -> impl Iterator<Item=(&Key, &LevelTensor)> + '_ {
        self.keys.iter().zip(self.paths.iter())
    }

    /// Clears the goals and every path, keeping dimensions and pairs. Returns
    /// the now-empty goals tensor.
    pub fn reset(&mut self) -> &LevelTensor {
        self.goals.clear();
        for path in self.paths.iter_mut() {
            path.clear();
        }
        &self.goals
    }

    /// Marks both endpoints of `key`'s pair at level 0. Unknown keys and
    /// pairs with any endpoint outside the grid are ignored.
    pub fn set_goal(&mut self, key: &str) {
        if let Some(&idx) = self.key_index.get(key) {
            self.mark_goal(idx);
        }
    }

    fn mark_goal(&mut self, idx: usize) {
        let endpoints = self.pairs[idx].endpoints();
        // Both endpoints or neither.
        if endpoints.iter().all(|p| self.goals.contains(0, p.row, p.column)) {
            for p in endpoints {
                self.goals.set(0, p.row, p.column);
            }
        }
    }

    /// Marks (level, position) as part of `key`'s path. Unknown keys and
    /// out-of-range cells leave the grid untouched.
    pub fn add_path_segment(&mut self, key: &str, level: Number, position: Position) {
        let _ = self.try_add_path_segment(key, level, position);
    }

    /// Same as `add_path_segment`, but reports what happened: `Ok(true)` if
    /// the cell was newly marked, `Ok(false)` if it already was.
    pub fn try_add_path_segment(
        &mut self, key: &str, level: Number, position: Position
        ) -> Result<bool, GridError> {
        let idx = *self.key_index.get(key)
            .ok_or_else(|| GridError::UnknownKey(key.to_string()))?;
        self.paths[idx].set(level, position.row, position.column)
            .ok_or(GridError::OutOfRange {
                level, row: position.row, col: position.column
            })
    }
}
