#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Win detection for the slide puzzle.

use slide_puzzle_grid::{Grid, Tile};

/// Pure system that reports whether every tile is back home.
#[derive(Clone, Copy, Debug, Default)]
pub struct VictoryEvaluator;

impl VictoryEvaluator {
    /// Creates a new evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns `true` when each tile rests in its original slot.
    ///
    /// The empty slot may sit anywhere; only tiles are checked.
    #[must_use]
    pub fn is_solved<H>(&self, grid: &Grid<H>) -> bool {
        grid.tiles().all(Tile::is_home)
    }
}
