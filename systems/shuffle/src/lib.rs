#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scrambles a freshly initialized grid by swapping every occupied slot with
//! a randomly drawn slot.
//!
//! The pass visits coordinates in row-major order and swaps each slot that is
//! occupied at the time of the visit with an independently drawn target. It
//! makes no promise that the result is reachable from the solved layout
//! through legal slides, nor that layouts are drawn uniformly; the empty slot
//! may end anywhere and the scrambled grid may already be solved.

use rand::Rng;
use slide_puzzle_core::GridCoord;
use slide_puzzle_grid::{Grid, Slot};
use tracing::{debug, warn};

/// Source of uniformly distributed integers in a half-open range.
pub trait CellSampler {
    /// Draws a value in `0..bound`; `bound` is never zero for a valid grid.
    fn next_below(&mut self, bound: u32) -> u32;
}

impl<R: Rng + ?Sized> CellSampler for R {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.gen_range(0..bound)
    }
}

/// Pure system that scrambles a grid using an injected sampler.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shuffler;

impl Shuffler {
    /// Creates a new shuffler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Swaps every occupied slot, in row-major order, with a random slot.
    ///
    /// Each swap draws the target row first and the target column second.
    pub fn shuffle<H, S>(&self, grid: &mut Grid<H>, sampler: &mut S)
    where
        S: CellSampler + ?Sized,
    {
        let dimensions = grid.dimensions();
        let mut swaps = 0_u32;
        for current in dimensions.coords() {
            if !matches!(grid.slot(current), Ok(Slot::Occupied(_))) {
                continue;
            }

            let row = sampler.next_below(dimensions.rows());
            let column = sampler.next_below(dimensions.columns());
            let target = GridCoord::new(row, column);
            match grid.swap_cells(current, target) {
                Ok(()) => swaps += 1,
                Err(error) => warn!(%error, "sampler drew a slot outside the grid; swap skipped"),
            }
        }

        let empty = grid.empty_slot();
        debug!(
            swaps,
            empty_row = empty.row(),
            empty_column = empty.column(),
            "shuffled puzzle grid"
        );
    }
}
