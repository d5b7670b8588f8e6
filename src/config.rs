use log::{info, warn};
use rand::Rng;
use serde::Deserialize;
use serde_json::Error as JSONError;
use thiserror::Error;

use crate::game_interface::{Key, Number, Pair, MAX_DIMENSION};
use crate::pairs::{seeded_pairs, DEFAULT_KEYS};
use crate::session::DEFAULT_CELL_SIZE;
use crate::tensor::LevelTensor;

/// Name of the environment variable (or `.env` entry) holding a seed.
pub const SEED_VAR: &str = "GRID_WORLD_SEED";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed reading the config file ({0})")]
    ReadError(#[from] std::io::Error),
    #[error("Failed parsing the config file ({0})")]
    ParseError(#[from] JSONError),
    #[error("Grid dimensions must be positive, got {rows}x{cols} with {levels} levels")]
    EmptyGrid { rows: usize, cols: usize, levels: usize },
    #[error("Grid of {rows}x{cols} with {levels} levels is too large")]
    GridTooLarge { rows: usize, cols: usize, levels: usize },
    #[error("Cell size must be positive, got {0}")]
    BadCellSize(Number),
    #[error("At least one key is required")]
    NoKeys,
}

/// Game setup, loadable from a JSON file where every field is optional.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub levels: usize,
    /// Pixel size of one cell, used to translate clicks.
    pub cell_size: Number,
    /// Keys to generate random pairs for, in turn order.
    pub keys: Vec<Key>,
    /// Seed for pair generation.
    pub seed: Option<u64>,
    /// Explicit pairs. When set, `keys` and `seed` are ignored.
    pub pairs: Option<Vec<(Key, Pair)>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: 10,
            cols: 10,
            levels: 3,
            cell_size: DEFAULT_CELL_SIZE,
            keys: DEFAULT_KEYS.iter().map(|k| k.to_string()).collect(),
            seed: None,
            pairs: None,
        }
    }
}

impl GameConfig {
    pub fn from_file(filename: &str) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(filename)?;
        info!("Loading config from {filename}");
        Ok(serde_json::from_str(&data)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 || self.levels == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows, cols: self.cols, levels: self.levels
            });
        }
        let dimensions = [self.rows, self.cols, self.levels];
        if dimensions.iter().any(|&d| d > MAX_DIMENSION)
            || LevelTensor::cell_count(self.levels, self.rows, self.cols).is_none() {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows, cols: self.cols, levels: self.levels
            });
        }
        if self.cell_size <= 0 {
            return Err(ConfigError::BadCellSize(self.cell_size));
        }
        let has_keys = match &self.pairs {
            Some(pairs) => !pairs.is_empty(),
            None => !self.keys.is_empty(),
        };
        if !has_keys {
            return Err(ConfigError::NoKeys);
        }
        Ok(())
    }

    /// Seed for pair generation, by precedence: `cli_seed`, then `env_seed`
    /// (the raw `SEED_VAR` value, skipped if it does not parse), then the
    /// config's own seed, then a fresh one drawn from `rng`.
    pub fn resolve_seed<R: Rng>(&self, cli_seed: Option<u64>, env_seed: Option<&str>,
                                rng: &mut R) -> u64 {
        let env_seed = env_seed.and_then(|value| match value.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!("Ignoring invalid {SEED_VAR} {value:?}");
                None
            },
        });
        match cli_seed.or(env_seed).or(self.seed) {
            Some(seed) => seed,
            None => {
                let seed = rng.gen();
                info!("Using random seed {seed}");
                seed
            },
        }
    }

    /// Explicit pairs if configured, otherwise pairs generated from the seed
    /// `seed` yields. `seed` is only called in the latter case.
    pub fn resolve_pairs<F>(&self, seed: F) -> Vec<(Key, Pair)>
    where
        F: FnOnce() -> u64,
    {
        match &self.pairs {
            Some(pairs) => pairs.clone(),
            None => seeded_pairs(seed(), self.keys.as_slice(), self.rows, self.cols),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn seeded_config(seed: Option<u64>) -> GameConfig {
        GameConfig { seed, ..GameConfig::default() }
    }

    #[test]
    fn test_defaults_match_classic_game() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!((config.rows, config.cols, config.levels), (10, 10, 3));
        assert_eq!(config.cell_size, 40);
        assert_eq!(config.keys, vec!["A", "B"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_pairs_win() {
        let config: GameConfig = serde_json::from_str(r#"{
            "rows": 5,
            "seed": 3,
            "pairs": [["X", {"start": {"row": 0, "column": 0},
                             "end": {"row": 4, "column": 4}}]]
        }"#).unwrap();
        assert_eq!(config.rows, 5);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.resolve_pairs(|| panic!("seed not needed")),
                   vec![("X".to_string(), Pair::from(((0, 0), (4, 4))))]);
    }

    #[test]
    fn test_generated_pairs_follow_keys() {
        let config = GameConfig {
            keys: vec!["P".to_string(), "Q".to_string(), "R".to_string()],
            ..GameConfig::default()
        };
        let pairs = config.resolve_pairs(|| 9);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs, config.resolve_pairs(|| 9));
    }

    #[test]
    fn test_validation_errors() {
        let empty = GameConfig { levels: 0, ..GameConfig::default() };
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyGrid { levels: 0, .. })));
        let cell = GameConfig { cell_size: 0, ..GameConfig::default() };
        assert!(matches!(cell.validate(), Err(ConfigError::BadCellSize(0))));
        let keys = GameConfig { keys: Vec::new(), ..GameConfig::default() };
        assert!(matches!(keys.validate(), Err(ConfigError::NoKeys)));
    }

    #[test]
    fn test_too_large_grids_are_rejected() {
        let tall = GameConfig { rows: MAX_DIMENSION + 1, ..GameConfig::default() };
        assert!(matches!(tall.validate(), Err(ConfigError::GridTooLarge { .. })));
        let overflowing = GameConfig {
            rows: 1 << 30, cols: 1 << 30, levels: 1 << 30, ..GameConfig::default()
        };
        assert!(matches!(overflowing.validate(), Err(ConfigError::GridTooLarge { .. })));
        let edge = GameConfig { rows: MAX_DIMENSION, cols: 1, levels: 1, ..GameConfig::default() };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_cli_seed_wins() {
        let mut rng = SmallRng::seed_from_u64(0);
        let seed = seeded_config(Some(3)).resolve_seed(Some(1), Some("2"), &mut rng);
        assert_eq!(seed, 1);
    }

    #[test]
    fn test_env_seed_beats_config() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(seeded_config(Some(3)).resolve_seed(None, Some("2"), &mut rng), 2);
        assert_eq!(seeded_config(Some(3)).resolve_seed(None, Some(" 7\n"), &mut rng), 7);
    }

    #[test]
    fn test_config_seed_used_last() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(seeded_config(Some(3)).resolve_seed(None, None, &mut rng), 3);
    }

    #[test]
    fn test_invalid_env_seed_is_skipped() {
        let mut rng = SmallRng::seed_from_u64(0);
        let config = seeded_config(Some(3));
        assert_eq!(config.resolve_seed(None, Some("abc"), &mut rng), 3);
        assert_eq!(config.resolve_seed(None, Some("-1"), &mut rng), 3);
        assert_eq!(config.resolve_seed(Some(9), Some("abc"), &mut rng), 9);
    }

    #[test]
    fn test_random_seed_comes_from_rng() {
        let config = seeded_config(None);
        let expected: u64 = SmallRng::seed_from_u64(5).gen();
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(config.resolve_seed(None, None, &mut rng), expected);
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(config.resolve_seed(None, Some("nope"), &mut rng), expected);
    }

    #[test]
    fn test_load_classic_config() {
        let config = GameConfig::from_file("./configs/classic.json")
            .expect("Couldn't load config file");
        assert!(config.validate().is_ok());
        let pairs = config.resolve_pairs(|| panic!("seed not needed"));
        assert_eq!(pairs[1], ("B".to_string(), Pair::from(((2, 7), (4, 0)))));
    }

    #[test]
    fn test_missing_config_file() {
        let err = GameConfig::from_file("./configs/does_not_exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let parsed = serde_json::from_str::<GameConfig>(r#"{"colums": 4}"#);
        assert!(parsed.is_err());
    }
}
