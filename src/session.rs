// Turn-taking session: one key at a time draws its path, then everyone is
// scored. Driven by discrete commands so any front-end (terminal, GUI event
// loop, tests) can feed it.
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::game_interface::{Key, Number, Position};
use crate::grid::MultiLevelGrid;
use crate::render::text_view;
use crate::scorer::{Distances, PathScorer};

pub const DEFAULT_CELL_SIZE: Number = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pointer click in pixels, x to the right and y downwards.
    Click { x: Number, y: Number },
    Mark { level: Number, row: Number, col: Number },
    Level(Number),
    Done,
    Reset,
    Show,
    Score,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unrecognized command {0:?}")]
    Unrecognized(String),
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref CLICK: Regex = Regex::new(r"^click\s+(-?\d+)\s+(-?\d+)$").unwrap();
            static ref MARK: Regex = Regex::new(
                r"^mark\s+(-?\d+)\s+(-?\d+)\s+(-?\d+)$").unwrap();
            static ref LEVEL: Regex = Regex::new(r"^level\s+(-?\d+)$").unwrap();
        }
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandParseError::Empty);
        }
        let unrecognized = || CommandParseError::Unrecognized(line.to_string());
        // Out-of-i32 numbers are not commands we can act on.
        let number = |s: &str| s.parse::<Number>().map_err(|_| unrecognized());

        if let Some(caps) = CLICK.captures(line) {
            return Ok(Command::Click { x: number(&caps[1])?, y: number(&caps[2])? });
        }
        if let Some(caps) = MARK.captures(line) {
            return Ok(Command::Mark {
                level: number(&caps[1])?,
                row: number(&caps[2])?,
                col: number(&caps[3])?,
            });
        }
        if let Some(caps) = LEVEL.captures(line) {
            return Ok(Command::Level(number(&caps[1])?));
        }
        match line {
            "y" | "done" => Ok(Command::Done),
            "reset" => Ok(Command::Reset),
            "show" => Ok(Command::Show),
            "score" => Ok(Command::Score),
            "q" | "quit" => Ok(Command::Quit),
            _ => Err(unrecognized()),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub distances: Distances,
    pub total: usize,
}

impl Report {
    pub fn new(grid: &MultiLevelGrid) -> Self {
        let distances = PathScorer::calculate_total_distance(grid);
        let total = distances.total();
        Report { distances, total }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Path distances:")?;
        for (key, distance) in self.distances.iter() {
            writeln!(f, "{key}: {distance}")?;
        }
        write!(f, "Final Score: {}", self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Marked { key: Key, level: Number, position: Position, newly_marked: bool },
    Ignored,
    LevelSelected(Number),
    KeyFinished { next: Key },
    Finished(Report),
    Reset,
    Show(String),
    Score(Report),
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("All paths are already drawn, reset to play again")]
    GameOver,
    #[error("Level {level} does not exist (grid has {levels} levels)")]
    LevelOutOfRange { level: Number, levels: usize },
    #[error("Cell size must be positive, got {0}")]
    BadCellSize(Number),
}

pub struct Session {
    grid: MultiLevelGrid,
    cell_size: Number,
    // Index of the key whose path is being drawn; keys().len() once over.
    turn: usize,
    level: Number,
}

impl Session {
    /// `cell_size` is the pixel size of one cell and must be positive.
    pub fn new(grid: MultiLevelGrid, cell_size: Number) -> Result<Self, SessionError> {
        if cell_size <= 0 {
            return Err(SessionError::BadCellSize(cell_size));
        }
        let session = Session { grid, cell_size, turn: 0, level: 0 };
        if let Some(key) = session.active_key() {
            info!("Drawing path for {key}");
        }
        Ok(session)
    }

    pub fn grid(&self) -> &MultiLevelGrid {
        &self.grid
    }

    pub fn active_key(&self) -> Option<&str> {
        self.grid.keys().get(self.turn).map(|key| key.as_str())
    }

    pub fn active_level(&self) -> Number {
        self.level
    }

    pub fn is_over(&self) -> bool {
        self.turn >= self.grid.keys().len()
    }

    pub fn prompt(&self) -> Option<String> {
        self.active_key()
            .map(|key| format!("Draw the path for {key}. Enter 'y' when done."))
    }

    /// Pixel to (row, col), flooring so that negative pixels stay out of the
    /// grid.
    pub fn cell_at(&self, x: Number, y: Number) -> Position {
        Position {
            row: y.div_euclid(self.cell_size),
            column: x.div_euclid(self.cell_size),
        }
    }

    pub fn handle(&mut self, command: Command) -> Result<Outcome, SessionError> {
        debug!("Handling {command:?} (turn {}, level {})", self.turn, self.level);
        match command {
            Command::Show => Ok(Outcome::Show(text_view(&self.grid))),
            Command::Score => Ok(Outcome::Score(Report::new(&self.grid))),
            Command::Reset => Ok(self.reset()),
            Command::Quit => Ok(Outcome::Quit),
            Command::Click { x, y } => {
                let key = self.drawing_key()?;
                let (level, position) = (self.level, self.cell_at(x, y));
                Ok(self.mark(key, level, position))
            },
            Command::Mark { level, row, col } => {
                let key = self.drawing_key()?;
                Ok(self.mark(key, level, Position { row, column: col }))
            },
            Command::Level(level) => {
                self.drawing_key()?;
                let levels = self.grid.levels();
                if level < 0 || level as usize >= levels {
                    return Err(SessionError::LevelOutOfRange { level, levels });
                }
                self.level = level;
                info!("Now drawing on level {level}");
                Ok(Outcome::LevelSelected(level))
            },
            Command::Done => {
                self.drawing_key()?;
                Ok(self.finish_turn())
            },
        }
    }

    fn drawing_key(&self) -> Result<Key, SessionError> {
        self.active_key()
            .map(|key| key.to_string())
            .ok_or(SessionError::GameOver)
    }

    fn mark(&mut self, key: Key, level: Number, position: Position) -> Outcome {
        match self.grid.try_add_path_segment(&key, level, position) {
            Ok(newly_marked) => Outcome::Marked { key, level, position, newly_marked },
            Err(err) => {
                warn!("Ignoring segment for {key}: {err}");
                Outcome::Ignored
            },
        }
    }

    fn finish_turn(&mut self) -> Outcome {
        self.turn += 1;
        self.level = 0;
        match self.active_key() {
            Some(next) => {
                info!("Drawing path for {next}");
                Outcome::KeyFinished { next: next.to_string() }
            },
            None => {
                let report = Report::new(&self.grid);
                info!("All paths drawn, final score {}", report.total);
                Outcome::Finished(report)
            },
        }
    }

    fn reset(&mut self) -> Outcome {
        self.grid.reset();
        let keys = self.grid.keys().to_vec();
        for key in &keys {
            self.grid.set_goal(key);
        }
        self.turn = 0;
        self.level = 0;
        info!("Session reset");
        Outcome::Reset
    }
}
