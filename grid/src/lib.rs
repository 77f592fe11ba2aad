#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for the slide puzzle.
//!
//! The grid owns every slot and the tiles resting in them. Exactly one slot
//! is empty once [`Grid::initialize`] succeeds, and [`Grid::swap_cells`] is
//! the only way the layout ever changes.

use slide_puzzle_core::{ConfigurationError, GridCoord, GridDimensions, OutOfBounds};
use tracing::{debug, trace};

/// Movable puzzle piece carrying an opaque presentation handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile<H> {
    original: GridCoord,
    current: GridCoord,
    visual: H,
}

impl<H> Tile<H> {
    fn new(home: GridCoord, visual: H) -> Self {
        Self {
            original: home,
            current: home,
            visual,
        }
    }

    /// Slot the tile started in; its home for the win check.
    #[must_use]
    pub const fn original(&self) -> GridCoord {
        self.original
    }

    /// Slot the tile currently occupies.
    #[must_use]
    pub const fn current(&self) -> GridCoord {
        self.current
    }

    /// Handle the driver uses to draw the tile.
    #[must_use]
    pub const fn visual(&self) -> &H {
        &self.visual
    }

    /// Reports whether the tile rests in its original slot.
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.current == self.original
    }
}

/// Content of a single grid slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot<H> {
    /// No tile rests in the slot.
    Empty,
    /// The slot holds a tile.
    Occupied(Tile<H>),
}

impl<H> Slot<H> {
    /// Reports whether the slot holds no tile.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Tile resting in the slot, if any.
    #[must_use]
    pub const fn tile(&self) -> Option<&Tile<H>> {
        match self {
            Self::Empty => None,
            Self::Occupied(tile) => Some(tile),
        }
    }
}

/// Row-major matrix of slots with a cached empty position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<H> {
    dimensions: GridDimensions,
    slots: Vec<Slot<H>>,
    empty: GridCoord,
}

impl<H> Grid<H> {
    /// Fills every slot except `empty_index` with the supplied tiles in
    /// row-major order. Each tile's original position is the slot it lands in.
    pub fn initialize(
        dimensions: GridDimensions,
        tiles: Vec<H>,
        empty_index: usize,
    ) -> Result<Self, ConfigurationError> {
        if dimensions.is_empty() {
            return Err(ConfigurationError::NonPositiveDimensions {
                rows: dimensions.rows(),
                columns: dimensions.columns(),
            });
        }

        let slot_count = dimensions.slot_count();
        let expected = slot_count - 1;
        let supplied = tiles.len();
        let mismatch = ConfigurationError::TileCountMismatch {
            expected,
            actual: supplied,
        };
        if supplied != expected {
            return Err(mismatch);
        }

        let out_of_range = ConfigurationError::EmptyIndexOutOfRange {
            index: empty_index,
            slot_count,
        };
        let empty = dimensions.coord_of(empty_index).ok_or(out_of_range)?;

        let mut handles = tiles.into_iter();
        let mut slots = Vec::with_capacity(slot_count);
        for coord in dimensions.coords() {
            if coord == empty {
                slots.push(Slot::Empty);
                continue;
            }
            let Some(visual) = handles.next() else {
                return Err(mismatch);
            };
            slots.push(Slot::Occupied(Tile::new(coord, visual)));
        }

        debug!(
            rows = dimensions.rows(),
            columns = dimensions.columns(),
            empty_row = empty.row(),
            empty_column = empty.column(),
            "initialized puzzle grid"
        );

        Ok(Self {
            dimensions,
            slots,
            empty,
        })
    }

    /// Extents of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Coordinate of the single empty slot.
    #[must_use]
    pub const fn empty_slot(&self) -> GridCoord {
        self.empty
    }

    /// Content of the slot at `coord`.
    pub fn slot(&self, coord: GridCoord) -> Result<&Slot<H>, OutOfBounds> {
        let index = self.index(coord)?;
        Ok(&self.slots[index])
    }

    /// Tile resting at `coord`, or `None` when the slot is empty.
    pub fn tile_at(&self, coord: GridCoord) -> Result<Option<&Tile<H>>, OutOfBounds> {
        self.slot(coord).map(Slot::tile)
    }

    /// Exchanges the occupants of two slots and re-stamps every tile that moved.
    ///
    /// Adjacency is not checked; either slot may be empty.
    pub fn swap_cells(&mut self, first: GridCoord, second: GridCoord) -> Result<(), OutOfBounds> {
        let first_index = self.index(first)?;
        let second_index = self.index(second)?;
        if first_index == second_index {
            return Ok(());
        }

        self.slots.swap(first_index, second_index);
        for (index, coord) in [(first_index, first), (second_index, second)] {
            if let Slot::Occupied(tile) = &mut self.slots[index] {
                tile.current = coord;
            }
        }

        if self.empty == first {
            self.empty = second;
        } else if self.empty == second {
            self.empty = first;
        }

        trace!(
            first_row = first.row(),
            first_column = first.column(),
            second_row = second.row(),
            second_column = second.column(),
            "swapped grid cells"
        );
        Ok(())
    }

    /// Iterates every slot in row-major order alongside its coordinate.
    pub fn slots(&self) -> impl Iterator<Item = (GridCoord, &Slot<H>)> + '_ {
        self.dimensions.coords().zip(self.slots.iter())
    }

    /// Iterates every tile in row-major order of the slots holding them.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile<H>> + '_ {
        self.slots.iter().filter_map(Slot::tile)
    }

    /// Number of tiles resting in the grid.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Current slot of the tile whose original position is `original`.
    #[must_use]
    pub fn locate(&self, original: GridCoord) -> Option<GridCoord> {
        self.tiles()
            .find(|tile| tile.original() == original)
            .map(Tile::current)
    }

    fn index(&self, coord: GridCoord) -> Result<usize, OutOfBounds> {
        self.dimensions.index_of(coord).ok_or(OutOfBounds {
            coord,
            dimensions: self.dimensions,
        })
    }
}

/// Read-only snapshots used by drivers and tests.
pub mod query {
    use slide_puzzle_core::GridCoord;

    use super::Grid;

    /// Number of empty slots; always one for a well-formed grid.
    #[must_use]
    pub fn empty_count<H>(grid: &Grid<H>) -> usize {
        grid.slots().filter(|(_, slot)| slot.is_empty()).count()
    }

    /// Row-major layout of original positions, `None` marking the empty slot.
    #[must_use]
    pub fn layout<H>(grid: &Grid<H>) -> Vec<Option<GridCoord>> {
        grid.slots()
            .map(|(_, slot)| slot.tile().map(super::Tile::original))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(count: usize) -> Vec<char> {
        ('A'..='Z').take(count).collect()
    }

    #[test]
    fn initialize_assigns_original_positions_in_row_major_order() {
        let grid = Grid::initialize(GridDimensions::new(2, 2), labelled(3), 3).expect("grid");

        let a = grid.tile_at(GridCoord::new(0, 0)).expect("bounds").expect("tile");
        assert_eq!(*a.visual(), 'A');
        assert_eq!(a.original(), GridCoord::new(0, 0));
        let c = grid.tile_at(GridCoord::new(1, 0)).expect("bounds").expect("tile");
        assert_eq!(*c.visual(), 'C');
        assert_eq!(grid.empty_slot(), GridCoord::new(1, 1));
        assert!(grid.tile_at(GridCoord::new(1, 1)).expect("bounds").is_none());
    }

    #[test]
    fn initialize_skips_empty_index_in_the_middle() {
        let grid = Grid::initialize(GridDimensions::new(2, 3), labelled(5), 1).expect("grid");

        assert_eq!(grid.empty_slot(), GridCoord::new(0, 1));
        let b = grid.tile_at(GridCoord::new(0, 2)).expect("bounds").expect("tile");
        assert_eq!(*b.visual(), 'B');
        assert_eq!(b.original(), GridCoord::new(0, 2));
        assert_eq!(query::empty_count(&grid), 1);
    }

    #[test]
    fn initialize_rejects_wrong_tile_count() {
        let error = Grid::initialize(GridDimensions::new(3, 3), labelled(9), 8)
            .expect_err("too many tiles");
        assert_eq!(
            error,
            ConfigurationError::TileCountMismatch {
                expected: 8,
                actual: 9,
            }
        );
    }

    #[test]
    fn initialize_rejects_zero_dimensions() {
        let error = Grid::<char>::initialize(GridDimensions::new(0, 3), Vec::new(), 0)
            .expect_err("zero rows");
        assert!(matches!(
            error,
            ConfigurationError::NonPositiveDimensions { rows: 0, columns: 3 }
        ));
    }

    #[test]
    fn initialize_rejects_empty_index_outside_grid() {
        let error = Grid::initialize(GridDimensions::new(2, 2), labelled(3), 4)
            .expect_err("index past the end");
        assert_eq!(
            error,
            ConfigurationError::EmptyIndexOutOfRange {
                index: 4,
                slot_count: 4,
            }
        );
    }

    #[test]
    fn single_slot_grid_holds_only_the_empty_slot() {
        let grid = Grid::<char>::initialize(GridDimensions::new(1, 1), Vec::new(), 0)
            .expect("grid");
        assert_eq!(grid.tile_count(), 0);
        assert_eq!(grid.empty_slot(), GridCoord::new(0, 0));
    }

    #[test]
    fn tile_at_reports_out_of_bounds() {
        let grid = Grid::initialize(GridDimensions::new(2, 2), labelled(3), 3).expect("grid");
        let error = grid.tile_at(GridCoord::new(2, 0)).expect_err("outside");
        assert_eq!(error.coord, GridCoord::new(2, 0));
        assert_eq!(error.dimensions, GridDimensions::new(2, 2));
    }

    #[test]
    fn swap_with_empty_moves_the_empty_cache() {
        let mut grid = Grid::initialize(GridDimensions::new(2, 2), labelled(3), 3).expect("grid");

        grid.swap_cells(GridCoord::new(0, 0), GridCoord::new(1, 1))
            .expect("in bounds");

        assert_eq!(grid.empty_slot(), GridCoord::new(0, 0));
        let a = grid.tile_at(GridCoord::new(1, 1)).expect("bounds").expect("tile");
        assert_eq!(*a.visual(), 'A');
        assert_eq!(a.current(), GridCoord::new(1, 1));
        assert_eq!(a.original(), GridCoord::new(0, 0));
        assert!(!a.is_home());
    }

    #[test]
    fn swap_between_tiles_restamps_both() {
        let mut grid = Grid::initialize(GridDimensions::new(2, 2), labelled(3), 3).expect("grid");

        grid.swap_cells(GridCoord::new(0, 0), GridCoord::new(1, 0))
            .expect("in bounds");

        assert_eq!(grid.locate(GridCoord::new(0, 0)), Some(GridCoord::new(1, 0)));
        assert_eq!(grid.locate(GridCoord::new(1, 0)), Some(GridCoord::new(0, 0)));
        assert_eq!(grid.empty_slot(), GridCoord::new(1, 1));
    }

    #[test]
    fn swap_with_itself_changes_nothing() {
        let mut grid = Grid::initialize(GridDimensions::new(2, 2), labelled(3), 3).expect("grid");
        let before = grid.clone();

        grid.swap_cells(GridCoord::new(1, 1), GridCoord::new(1, 1))
            .expect("in bounds");

        assert_eq!(grid, before);
    }

    #[test]
    fn swap_rejects_out_of_bounds_without_mutating() {
        let mut grid = Grid::initialize(GridDimensions::new(2, 2), labelled(3), 3).expect("grid");
        let before = grid.clone();

        let error = grid
            .swap_cells(GridCoord::new(0, 0), GridCoord::new(0, 5))
            .expect_err("outside");

        assert_eq!(error.coord, GridCoord::new(0, 5));
        assert_eq!(grid, before);
    }

    #[test]
    fn layout_marks_the_empty_slot() {
        let grid = Grid::initialize(GridDimensions::new(1, 3), labelled(2), 0).expect("grid");
        assert_eq!(
            query::layout(&grid),
            vec![None, Some(GridCoord::new(0, 1)), Some(GridCoord::new(0, 2))]
        );
    }
}
