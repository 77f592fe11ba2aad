#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a slide puzzle over stdin and stdout.

mod catalog;
mod driver;
mod level_select;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use catalog::Catalog;
use clap::Parser;
use driver::Driver;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slide_puzzle_core::AnimationConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Slide the tiles back into place.
///
/// Reads one instruction per line: `Tile <row> <column>`, `click <x> <y>`,
/// `show` or `quit`.
#[derive(Debug, Parser)]
#[command(name = "slide-puzzle", version)]
struct Args {
    /// One-based catalog number of the puzzle to play.
    #[arg(long, conflicts_with = "select")]
    puzzle: Option<usize>,

    /// Level-selection entry name such as "Puzzle 2".
    #[arg(long)]
    select: Option<String>,

    /// TOML puzzle catalog replacing the built-in one.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Seed for a reproducible shuffle.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated frame length in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Fraction of the remaining distance covered per second of animation.
    #[arg(long, default_value_t = AnimationConfig::DEFAULT_SPEED)]
    speed: f32,

    /// Side length of a tile in presentation units.
    #[arg(long, default_value_t = 64.0)]
    tile_length: f32,
}

/// Entry point for the slide puzzle command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };
    let number = match &args.select {
        Some(name) => level_select::puzzle_number(name)
            .with_context(|| format!("`{name}` does not name a puzzle"))?,
        None => args.puzzle.unwrap_or(1),
    };
    let entry = catalog.get(number).with_context(|| {
        format!(
            "puzzle {number} is not in the catalog ({} puzzles listed)",
            catalog.len()
        )
    })?;

    let config = AnimationConfig::new(args.speed, AnimationConfig::DEFAULT_ARRIVAL_EPSILON);
    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };
    info!(
        number,
        image_set = entry.image_set(),
        seed = ?args.seed,
        "loading puzzle"
    );

    let mut driver = Driver::begin(
        entry,
        config,
        args.tile_length,
        Duration::from_millis(args.frame_ms),
        rng.as_mut(),
    )?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    driver.run(stdin.lock(), &mut out)?;

    let session = driver.session();
    info!(
        moves = session.move_count(),
        state = ?session.state(),
        "puzzle finished"
    );
    Ok(())
}
