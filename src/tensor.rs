use itertools::iproduct;

use crate::game_interface::Number;

/// Dense boolean occupancy over [level][row][col].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTensor {
    levels: usize,
    rows: usize,
    cols: usize,
    // cells[(level * rows + row) * cols + col]
    cells: Vec<bool>,
}

impl LevelTensor {
    /// Number of cells for the given shape, `None` if it overflows `usize`.
    pub fn cell_count(levels: usize, rows: usize, cols: usize) -> Option<usize> {
        levels.checked_mul(rows)?.checked_mul(cols)
    }

    /// Panics if the cell count overflows `usize`. `GameConfig::validate`
    /// rejects such shapes before a grid is built.
    pub fn new(levels: usize, rows: usize, cols: usize) -> Self {
        let len = Self::cell_count(levels, rows, cols).unwrap_or_else(
            || panic!("Tensor too large: {levels}x{rows}x{cols} cells"));
        LevelTensor {
            levels,
            rows,
            cols,
            cells: vec![false; len],
        }
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.levels, self.rows, self.cols)
    }

    #[inline]
    fn in_range(value: Number, size: usize) -> bool {
        value >= 0 && (value as usize) < size
    }

    /// Whether (level, row, col) lies inside the tensor.
    #[inline]
    pub fn contains(&self, level: Number, row: Number, col: Number) -> bool {
        Self::in_range(level, self.levels)
            && Self::in_range(row, self.rows)
            && Self::in_range(col, self.cols)
    }

    fn index(&self, level: Number, row: Number, col: Number) -> Option<usize> {
        if self.contains(level, row, col) {
            let (level, row, col) = (level as usize, row as usize, col as usize);
            Some((level * self.rows + row) * self.cols + col)
        } else {
            None
        }
    }

    /// Out-of-range cells read as unset.
    pub fn get(&self, level: Number, row: Number, col: Number) -> bool {
        self.index(level, row, col).map_or(false, |idx| self.cells[idx])
    }

    /// Marks a cell. Returns `None` when out of range, otherwise whether the
    /// cell was newly marked.
    pub fn set(&mut self, level: Number, row: Number, col: Number) -> Option<bool> {
        let idx = self.index(level, row, col)?;
        let newly_marked = !self.cells[idx];
        self.cells[idx] = true;
        Some(newly_marked)
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&cell| cell)
    }

    /// Marked cells as (level, row, col), in level then row-major order.
    pub fn marked_cells(&self) -> impl Iterator<Item=(usize, usize, usize)> + '_ {
        iproduct!(0..self.levels, 0..self.rows, 0..self.cols)
            .filter(move |&(l, r, c)| self.cells[(l * self.rows + r) * self.cols + c])
    }

    /// Nested [level][row][col] 0/1 values, used for JSON dumps.
    pub fn to_nested(&self) -> Vec<Vec<Vec<u8>>> {
        (0..self.levels).map(|l| {
            (0..self.rows).map(|r| {
                let start = (l * self.rows + r) * self.cols;
                self.cells[start..start + self.cols].iter()
                    .map(|&cell| cell as u8)
                    .collect()
            }).collect()
        }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_idempotent() {
        let mut tensor = LevelTensor::new(2, 3, 4);
        assert_eq!(tensor.set(1, 2, 3), Some(true));
        assert_eq!(tensor.set(1, 2, 3), Some(false));
        assert_eq!(tensor.count(), 1);
        assert!(tensor.get(1, 2, 3));
        assert!(!tensor.get(0, 2, 3));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut tensor = LevelTensor::new(2, 3, 4);
        assert_eq!(tensor.set(2, 0, 0), None);
        assert_eq!(tensor.set(0, -1, 0), None);
        assert_eq!(tensor.set(0, 0, 4), None);
        assert!(!tensor.get(-1, 0, 0));
        assert!(tensor.is_empty());
    }

    #[test]
    fn test_marked_cells_order() {
        let mut tensor = LevelTensor::new(2, 2, 2);
        tensor.set(1, 0, 1);
        tensor.set(0, 1, 0);
        let cells: Vec<_> = tensor.marked_cells().collect();
        assert_eq!(cells, vec![(0, 1, 0), (1, 0, 1)]);
        tensor.clear();
        assert_eq!(tensor.marked_cells().count(), 0);
    }

    #[test]
    fn test_cell_count_overflow() {
        assert_eq!(LevelTensor::cell_count(3, 10, 10), Some(300));
        assert_eq!(LevelTensor::cell_count(4, 1 << 33, 1 << 33), None);
        assert_eq!(LevelTensor::cell_count(0, usize::MAX, usize::MAX), Some(0));
    }

    #[test]
    #[should_panic(expected = "Tensor too large")]
    fn test_new_refuses_overflowing_shape() {
        LevelTensor::new(4, 1 << 33, 1 << 33);
    }

    #[test]
    fn test_to_nested() {
        let mut tensor = LevelTensor::new(1, 2, 3);
        tensor.set(0, 1, 2);
        assert_eq!(tensor.to_nested(), vec![vec![vec![0, 0, 0], vec![0, 0, 1]]]);
    }
}
