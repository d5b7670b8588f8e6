use serde::{Deserialize, Serialize};

/// Coordinates and levels are signed so that negative values coming from a
/// config file or a click handler are rejected by the grid's bounds checks
/// instead of failing to parse.
pub type Number = i32;

/// Largest rows/cols/levels count accepted, so that indices fit in a `Number`.
pub const MAX_DIMENSION: usize = Number::MAX as usize;

/// Names one start/end pair and the path drawn for it.
pub type Key = String;

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Position {
    pub row: Number,
    pub column: Number,
}

impl From<(Number, Number)> for Position {
    fn from((row, column): (Number, Number)) -> Self {
        Position { row, column }
    }
}

/// Endpoint index 0 is `start`, 1 is `end`.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Pair {
    pub start: Position,
    pub end: Position,
}

impl Pair {
    pub fn endpoints(&self) -> [Position; 2] {
        [self.start, self.end]
    }
}

impl From<((Number, Number), (Number, Number))> for Pair {
    fn from((start, end): ((Number, Number), (Number, Number))) -> Self {
        Pair { start: start.into(), end: end.into() }
    }
}
