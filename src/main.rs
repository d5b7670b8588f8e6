use std::io::{self, BufRead};

use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use serde_json::Error as JSONError;
use thiserror::Error;

use grid_world::config::{ConfigError, GameConfig, SEED_VAR};
use grid_world::game_interface::Number;
use grid_world::grid::MultiLevelGrid;
use grid_world::render::Snapshot;
use grid_world::session::{Command, Outcome, Report, Session, SessionError};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file. Flags below override its values.
    #[arg(short, long)]
    config: Option<String>,

    #[arg(long)]
    rows: Option<usize>,

    #[arg(long)]
    cols: Option<usize>,

    #[arg(long)]
    levels: Option<usize>,

    /// Seed for the start/end pairs. Falls back to GRID_WORLD_SEED, then the
    /// config file, then a random seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cell size in pixels, used to translate `click X Y` commands.
    #[arg(long)]
    cell_size: Option<Number>,

    /// Where to write a JSON snapshot of the final grid.
    #[arg(long)]
    dump: Option<String>,
}

#[derive(Error, Debug)]
enum AppError {
    #[error("Invalid configuration ({0})")]
    ConfigError(#[from] ConfigError),
    #[error("Unable to start the session ({0})")]
    SessionError(#[from] SessionError),
    #[error("I/O failure ({0})")]
    IoError(#[from] io::Error),
    #[error("Unable to serialize the snapshot ({0})")]
    JSONError(#[from] JSONError),
}

fn load_config(cli: &Cli) -> Result<GameConfig, AppError> {
    let mut config = match &cli.config {
        Some(filename) => GameConfig::from_file(filename)?,
        None => {
            info!("Using default config.");
            GameConfig::default()
        },
    };
    config.rows = cli.rows.unwrap_or(config.rows);
    config.cols = cli.cols.unwrap_or(config.cols);
    config.levels = cli.levels.unwrap_or(config.levels);
    config.cell_size = cli.cell_size.unwrap_or(config.cell_size);
    config.validate()?;
    Ok(config)
}

fn play(session: &mut Session) -> Result<(), AppError> {
    if let Some(prompt) = session.prompt() {
        println!("{prompt}");
    }
    for line in io::stdin().lock().lines() {
        let line = line?;
        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(err) => {
                warn!("{err}");
                continue;
            },
        };
        match session.handle(command) {
            Ok(Outcome::Finished(report)) => {
                println!("{report}");
                return Ok(());
            },
            Ok(Outcome::KeyFinished { .. }) | Ok(Outcome::Reset) => {
                if let Some(prompt) = session.prompt() {
                    println!("{prompt}");
                }
            },
            Ok(Outcome::Show(view)) => print!("{view}"),
            Ok(Outcome::Score(report)) => println!("{report}"),
            Ok(Outcome::Quit) => break,
            Ok(_) => {},
            Err(err) => warn!("{err}"),
        }
    }
    // Quit or end of input before every key was done.
    println!("{}", Report::new(session.grid()));
    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(&cli)?;
    let env_seed = dotenvy::var(SEED_VAR).ok();
    let pairs = config.resolve_pairs(|| {
        config.resolve_seed(cli.seed, env_seed.as_deref(), &mut rand::thread_rng())
    });
    let grid = MultiLevelGrid::new(config.rows, config.cols, config.levels, pairs);
    info!("Grid {}x{} with {} levels, keys: {:?}",
          grid.rows(), grid.cols(), grid.levels(), grid.keys());

    let mut session = Session::new(grid, config.cell_size)?;
    play(&mut session)?;

    if let Some(filename) = &cli.dump {
        let file = std::fs::File::create(filename)?;
        serde_json::to_writer_pretty(file, &Snapshot::new(session.grid()))?;
        info!("Wrote snapshot to {filename}");
    }
    Ok(())
}

fn main() {
    // Load .env file
    dotenvy::dotenv().ok();
    // Init logger with default value of info
    // This can be overriden with RUST_LOG env var
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("Error while running the game with underlying error:");
        error!("  {}", err);
        std::process::exit(1);
    }
}
