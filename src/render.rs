// Toolkit-independent rendering: composited per-cell colors, goal labels and
// a plain-text view. Nothing here mutates the grid.
use itertools::iproduct;
use serde::Serialize;

use crate::game_interface::{Key, Number, Position};
use crate::grid::MultiLevelGrid;
use crate::scorer::{Distances, PathScorer};

/// RGBA, each channel in [0, 1].
pub type Rgba = [f32; 4];

/// Color used for each level, wrapping around past the last one.
pub const LEVEL_COLORS: [Rgba; 5] = [
    [1.0, 0.0, 0.0, 0.3],  // red
    [0.0, 1.0, 0.0, 0.3],  // green
    [0.0, 0.0, 1.0, 0.3],  // blue
    [1.0, 1.0, 0.0, 0.3],  // yellow
    [1.0, 0.0, 1.0, 0.3],  // magenta
];

pub fn level_color(level: usize) -> Rgba {
    LEVEL_COLORS[level % LEVEL_COLORS.len()]
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Image {
    pub rows: usize,
    pub cols: usize,
    // pixels[row * cols + col]
    pub pixels: Vec<Rgba>,
}

impl Image {
    fn white(rows: usize, cols: usize) -> Self {
        Image { rows, cols, pixels: vec![[1.0; 4]; rows * cols] }
    }

    pub fn pixel(&self, row: usize, col: usize) -> Rgba {
        self.pixels[row * self.cols + col]
    }
}

/// Blends every key's path onto a white image, key by key, level by level:
/// each marked cell becomes `c * (1 - a) + color * a` on its RGB channels.
pub fn composite(grid: &MultiLevelGrid) -> Image {
    let mut image = Image::white(grid.rows(), grid.cols());
    for (_, path) in grid.paths() {
        for level in 0..grid.levels() {
            let color = level_color(level);
            let alpha = color[3];
            for (row, col) in iproduct!(0..grid.rows(), 0..grid.cols()) {
                if !path.get(level as Number, row as Number, col as Number) {
                    continue;
                }
                let pixel = &mut image.pixels[row * grid.cols() + col];
                for c in 0..3 {
                    pixel[c] = pixel[c] * (1.0 - alpha) + color[c] * alpha;
                }
            }
        }
    }
    image
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GoalLabel {
    pub key: Key,
    /// 0 for the start, 1 for the end.
    pub endpoint: u8,
    pub position: Position,
    pub text: String,
}

/// Labels for every key's endpoints, out-of-range ones included; clipping is
/// left to whoever draws them.
pub fn goal_labels(grid: &MultiLevelGrid) -> Vec<GoalLabel> {
    grid.pairs().flat_map(|(key, pair)| {
        pair.endpoints().into_iter().enumerate().map(move |(i, position)| {
            GoalLabel {
                key: key.clone(),
                endpoint: i as u8,
                position,
                text: format!("{key}{i}"),
            }
        })
    }).collect()
}

/// Plain-text view: goal labels first, then the key marking the cell on any
/// level (`*` if several do), `.` otherwise. Every cell is right-aligned in a
/// slot one character wider than the longest label, so cells never touch.
pub fn text_view(grid: &MultiLevelGrid) -> String {
    let labels = goal_labels(grid);
    let width = labels.iter()
        .map(|label| label.text.chars().count())
        .max()
        .unwrap_or(1) + 1;
    let mut out = String::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let here = Position { row: row as Number, column: col as Number };
            let label = labels.iter().find(|label| label.position == here);
            let markers: Vec<&Key> = grid.paths()
                .filter(|(_, path)| (0..grid.levels()).any(
                    |level| path.get(level as Number, here.row, here.column)))
                .map(|(key, _)| key)
                .collect();
            let cell = match (label, markers.as_slice()) {
                (Some(label), _) => label.text.clone(),
                (None, [key]) => key.to_string(),
                (None, []) => ".".to_string(),
                (None, _) => "*".to_string(),
            };
            out.push_str(&format!("{cell:>width$}"));
        }
        out.push('\n');
    }
    out
}

/// Everything an external renderer needs, in one serializable value.
#[derive(Serialize, Debug, Clone)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    pub levels: usize,
    pub goals: Vec<Vec<Vec<u8>>>,
    pub paths: Vec<(Key, Vec<Vec<Vec<u8>>>)>,
    pub image: Image,
    pub labels: Vec<GoalLabel>,
    pub distances: Distances,
}

impl Snapshot {
    pub fn new(grid: &MultiLevelGrid) -> Self {
        Snapshot {
            rows: grid.rows(),
            cols: grid.cols(),
            levels: grid.levels(),
            goals: grid.goals().to_nested(),
            paths: grid.paths()
                .map(|(key, path)| (key.clone(), path.to_nested()))
                .collect(),
            image: composite(grid),
            labels: goal_labels(grid),
            distances: PathScorer::calculate_total_distance(grid),
        }
    }
}
