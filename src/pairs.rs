// Start/end pair generation. Randomness is always supplied by the caller so
// that a given seed reproduces the same board.
use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;

use crate::game_interface::{Key, Number, Pair, Position, MAX_DIMENSION};

pub const DEFAULT_KEYS: [&str; 2] = ["A", "B"];

fn random_position<R: Rng>(rng: &mut R, rows: usize, cols: usize) -> Position {
    Position {
        row: rng.gen_range(0..rows) as Number,
        column: rng.gen_range(0..cols) as Number,
    }
}

/// One random pair per key, with every endpoint inside [0, rows) x [0, cols).
/// Start and end may land on the same cell. A grid without cells has no room
/// for pairs, so it gets none. Endpoints are drawn from the first
/// `MAX_DIMENSION` rows/cols so that they fit in a `Number`.
pub fn random_pairs<R, K>(rng: &mut R, keys: &[K], rows: usize, cols: usize
                          ) -> Vec<(Key, Pair)>
where
    R: Rng,
    K: AsRef<str>,
{
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let (rows, cols) = (rows.min(MAX_DIMENSION), cols.min(MAX_DIMENSION));
    keys.iter().map(|key| {
        let start = random_position(rng, rows, cols);
        let end = random_position(rng, rows, cols);
        (key.as_ref().to_string(), Pair { start, end })
    }).collect()
}

pub fn seeded_pairs<K: AsRef<str>>(seed: u64, keys: &[K], rows: usize, cols: usize
                                   ) -> Vec<(Key, Pair)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    random_pairs(&mut rng, keys, rows, cols)
}
