#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resolves tile selections into legal slides toward the empty slot.

use slide_puzzle_core::{Direction, GridCoord, PlannedMove};
use slide_puzzle_grid::Grid;
use tracing::trace;

/// Pure system that decides whether a selected tile may slide.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveResolver;

impl MoveResolver {
    /// Creates a new resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolves the tile whose original position is `tile` into a slide.
    ///
    /// Neighbours are probed up, left, down, then right; the first empty one
    /// becomes the target. Unknown tiles and tiles without an empty
    /// neighbour yield `None`.
    #[must_use]
    pub fn resolve<H>(&self, grid: &Grid<H>, tile: GridCoord) -> Option<PlannedMove> {
        let Some(from) = grid.locate(tile) else {
            trace!(row = tile.row(), column = tile.column(), "selection matched no tile");
            return None;
        };

        let dimensions = grid.dimensions();
        let planned = Direction::SEARCH_ORDER.into_iter().find_map(|direction| {
            let to = dimensions.neighbor(from, direction)?;
            let vacant = grid.slot(to).is_ok_and(|slot| slot.is_empty());
            vacant.then_some(PlannedMove {
                tile,
                from,
                to,
                direction,
            })
        });

        if planned.is_none() {
            trace!(
                row = from.row(),
                column = from.column(),
                "selected tile has no empty neighbour"
            );
        }
        planned
    }
}
