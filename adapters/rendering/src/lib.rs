#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for slide puzzle adapters.
//!
//! [`BoardLayout`] maps grid coordinates to presentation-space slot centres
//! and back. [`SpriteBoard`] keeps one sprite per tile and implements the
//! engine's [`Presentation`] seam so the session can move sprites while a
//! slide is in flight.

use std::{error::Error, fmt};

use glam::Vec2;
use slide_puzzle_core::{GridCoord, GridDimensions, Presentation};
use tracing::warn;

/// Prefix shared by every tile identifier.
pub const TILE_IDENTIFIER_PREFIX: &str = "Tile";

/// Builds the identifier of the tile whose home slot is `coord`.
#[must_use]
pub fn tile_identifier(coord: GridCoord) -> String {
    format!(
        "{TILE_IDENTIFIER_PREFIX} {} {}",
        coord.row(),
        coord.column()
    )
}

/// Recovers the home slot encoded in a `"Tile <row> <column>"` identifier.
///
/// Returns `None` for anything that does not follow the scheme exactly.
#[must_use]
pub fn parse_tile_identifier(identifier: &str) -> Option<GridCoord> {
    let mut words = identifier.split_whitespace();
    if words.next()? != TILE_IDENTIFIER_PREFIX {
        return None;
    }
    let row = words.next()?.parse().ok()?;
    let column = words.next()?.parse().ok()?;
    if words.next().is_some() {
        return None;
    }
    Some(GridCoord::new(row, column))
}

/// Geometry of the board in presentation space.
///
/// Row zero is drawn at the top; slot positions are the centres of square
/// cells of side `tile_length` laid out from `origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    dimensions: GridDimensions,
    origin: Vec2,
    tile_length: f32,
}

impl BoardLayout {
    /// Creates a layout, rejecting boards without area.
    pub fn new(
        dimensions: GridDimensions,
        origin: Vec2,
        tile_length: f32,
    ) -> Result<Self, RenderingError> {
        if !(tile_length.is_finite() && tile_length > 0.0) {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }
        if dimensions.is_empty() {
            return Err(RenderingError::EmptyBoard {
                rows: dimensions.rows(),
                columns: dimensions.columns(),
            });
        }

        Ok(Self {
            dimensions,
            origin,
            tile_length,
        })
    }

    /// Grid extents covered by the layout.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Side length of a single slot.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the board.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.dimensions.columns() as f32 * self.tile_length
    }

    /// Total height of the board.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.dimensions.rows() as f32 * self.tile_length
    }

    /// Centre of the slot at `coord`.
    #[must_use]
    pub fn slot_position(&self, coord: GridCoord) -> Vec2 {
        self.origin
            + Vec2::new(
                (coord.column() as f32 + 0.5) * self.tile_length,
                (coord.row() as f32 + 0.5) * self.tile_length,
            )
    }

    /// Slot containing `point`, or `None` when the point lies off the board.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<GridCoord> {
        let local = (point - self.origin) / self.tile_length;
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let coord = GridCoord::new(local.y.floor() as u32, local.x.floor() as u32);
        self.dimensions.contains(coord).then_some(coord)
    }
}

/// Handle identifying a sprite owned by a [`SpriteBoard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u32);

impl SpriteId {
    /// Creates a new sprite identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Underlying numeric representation.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Tile sprite drawn on the board.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    identifier: String,
    home: GridCoord,
    position: Vec2,
}

impl Sprite {
    /// Identifier following the `"Tile <row> <column>"` scheme.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Slot the sprite belongs to in the solved picture.
    #[must_use]
    pub const fn home(&self) -> GridCoord {
        self.home
    }

    /// Current centre of the sprite.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }
}

/// In-memory scene holding one sprite per tile.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteBoard {
    layout: BoardLayout,
    sprites: Vec<Sprite>,
}

impl SpriteBoard {
    /// Creates an empty board drawn with `layout`.
    #[must_use]
    pub const fn new(layout: BoardLayout) -> Self {
        Self {
            layout,
            sprites: Vec::new(),
        }
    }

    /// Replaces the scene with one sprite per slot except `empty`.
    ///
    /// Sprites are created in row-major order at their home slots; the
    /// returned handles follow the same order.
    pub fn spawn_tiles(&mut self, empty: GridCoord) -> Vec<SpriteId> {
        self.sprites = self
            .layout
            .dimensions()
            .coords()
            .filter(|coord| *coord != empty)
            .map(|home| Sprite {
                identifier: tile_identifier(home),
                home,
                position: self.layout.slot_position(home),
            })
            .collect();

        (0..self.sprites.len())
            .map(|index| SpriteId::new(index as u32))
            .collect()
    }

    /// Snaps each listed sprite onto the centre of its slot.
    pub fn place<I>(&mut self, placements: I)
    where
        I: IntoIterator<Item = (SpriteId, GridCoord)>,
    {
        for (sprite, coord) in placements {
            let position = self.layout.slot_position(coord);
            self.set_tile_position(&sprite, position);
        }
    }

    /// Sprite addressed by `id`.
    #[must_use]
    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id.get() as usize)
    }

    /// Every sprite alongside its handle.
    pub fn sprites(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> + '_ {
        self.sprites
            .iter()
            .enumerate()
            .map(|(index, sprite)| (SpriteId::new(index as u32), sprite))
    }

    /// Topmost sprite whose square covers `point`.
    ///
    /// Sprites spawned later are drawn above earlier ones, so the search runs
    /// back to front.
    #[must_use]
    pub fn sprite_at(&self, point: Vec2) -> Option<SpriteId> {
        let half = self.layout.tile_length() * 0.5;
        self.sprites
            .iter()
            .enumerate()
            .rev()
            .find(|(_, sprite)| {
                let offset = (point - sprite.position).abs();
                offset.x <= half && offset.y <= half
            })
            .map(|(index, _)| SpriteId::new(index as u32))
    }
}

impl Presentation<SpriteId> for SpriteBoard {
    fn slot_position(&self, coord: GridCoord) -> Vec2 {
        self.layout.slot_position(coord)
    }

    fn tile_position(&self, handle: &SpriteId) -> Vec2 {
        self.sprite(*handle).map_or(Vec2::ZERO, Sprite::position)
    }

    fn set_tile_position(&mut self, handle: &SpriteId, position: Vec2) {
        match self.sprites.get_mut(handle.get() as usize) {
            Some(sprite) => sprite.position = position,
            None => warn!(sprite = handle.get(), "position update for unknown sprite"),
        }
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderingError {
    /// Tile length must be a positive, finite distance.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
    /// Boards need at least one row and one column.
    EmptyBoard {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
            Self::EmptyBoard { rows, columns } => {
                write!(f, "board of {rows}x{columns} slots has no area")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(rows: u32, columns: u32) -> BoardLayout {
        BoardLayout::new(GridDimensions::new(rows, columns), Vec2::ZERO, 10.0)
            .expect("valid layout")
    }

    #[test]
    fn tile_identifiers_round_trip_through_the_parser() {
        let coord = GridCoord::new(2, 4);

        assert_eq!(tile_identifier(coord), "Tile 2 4");
        assert_eq!(parse_tile_identifier("Tile 2 4"), Some(coord));
        assert_eq!(parse_tile_identifier("  Tile   2\t4 "), Some(coord));
    }

    #[test]
    fn malformed_tile_identifiers_are_rejected() {
        for identifier in [
            "",
            "Tile",
            "Tile 1",
            "Tile 1 x",
            "Tile -1 0",
            "tile 1 1",
            "Tile 1 1 1",
            "Puzzle 1 1",
        ] {
            assert_eq!(parse_tile_identifier(identifier), None, "{identifier:?}");
        }
    }

    #[test]
    fn layout_rejects_non_positive_tile_length() {
        let error = BoardLayout::new(GridDimensions::new(3, 3), Vec2::ZERO, 0.0)
            .expect_err("zero tile length must be rejected");
        assert_eq!(error, RenderingError::InvalidTileLength { tile_length: 0.0 });

        assert!(BoardLayout::new(GridDimensions::new(3, 3), Vec2::ZERO, f32::NAN).is_err());
    }

    #[test]
    fn layout_rejects_boards_without_area() {
        let error = BoardLayout::new(GridDimensions::new(0, 3), Vec2::ZERO, 8.0)
            .expect_err("empty board must be rejected");

        assert_eq!(error, RenderingError::EmptyBoard { rows: 0, columns: 3 });
    }

    #[test]
    fn slot_positions_are_cell_centres_offset_by_origin() {
        let layout = BoardLayout::new(GridDimensions::new(2, 3), Vec2::new(5.0, 7.0), 10.0)
            .expect("valid layout");

        assert_eq!(layout.slot_position(GridCoord::new(0, 0)), Vec2::new(10.0, 12.0));
        assert_eq!(layout.slot_position(GridCoord::new(1, 2)), Vec2::new(30.0, 22.0));
        assert_eq!(layout.width(), 30.0);
        assert_eq!(layout.height(), 20.0);
    }

    #[test]
    fn cell_at_inverts_slot_position() {
        let layout = layout(3, 4);
        for coord in layout.dimensions().coords() {
            assert_eq!(layout.cell_at(layout.slot_position(coord)), Some(coord));
        }
    }

    #[test]
    fn cell_at_rejects_points_off_the_board() {
        let layout = layout(2, 2);

        assert_eq!(layout.cell_at(Vec2::new(-0.1, 5.0)), None);
        assert_eq!(layout.cell_at(Vec2::new(5.0, 20.0)), None);
        assert_eq!(layout.cell_at(Vec2::new(25.0, 5.0)), None);
        assert_eq!(layout.cell_at(Vec2::new(19.9, 19.9)), Some(GridCoord::new(1, 1)));
    }

    #[test]
    fn spawned_sprites_skip_the_empty_slot_in_row_major_order() {
        let mut board = SpriteBoard::new(layout(2, 2));
        let handles = board.spawn_tiles(GridCoord::new(0, 1));

        assert_eq!(handles.len(), 3);
        let homes: Vec<GridCoord> = handles
            .iter()
            .map(|id| board.sprite(*id).expect("spawned").home())
            .collect();
        assert_eq!(
            homes,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(1, 0),
                GridCoord::new(1, 1)
            ]
        );
        let sprite = board.sprite(handles[1]).expect("spawned");
        assert_eq!(sprite.identifier(), "Tile 1 0");
        assert_eq!(sprite.position(), Vec2::new(5.0, 15.0));
    }

    #[test]
    fn presentation_moves_sprites_and_ignores_unknown_handles() {
        let mut board = SpriteBoard::new(layout(2, 2));
        let handles = board.spawn_tiles(GridCoord::new(1, 1));
        let moved = Vec2::new(12.0, 3.0);

        board.set_tile_position(&handles[0], moved);
        board.set_tile_position(&SpriteId::new(99), moved);

        assert_eq!(board.tile_position(&handles[0]), moved);
        assert_eq!(board.tile_position(&SpriteId::new(99)), Vec2::ZERO);
        assert_eq!(board.sprites().count(), 3);
    }

    #[test]
    fn place_snaps_sprites_to_slot_centres() {
        let mut board = SpriteBoard::new(layout(2, 2));
        let handles = board.spawn_tiles(GridCoord::new(1, 1));

        board.place([(handles[0], GridCoord::new(1, 1))]);

        assert_eq!(board.tile_position(&handles[0]), Vec2::new(15.0, 15.0));
    }

    #[test]
    fn sprite_at_hit_tests_current_positions() {
        let mut board = SpriteBoard::new(layout(2, 2));
        let handles = board.spawn_tiles(GridCoord::new(1, 1));
        board.place([(handles[2], GridCoord::new(1, 1))]);

        assert_eq!(board.sprite_at(Vec2::new(2.0, 2.0)), Some(handles[0]));
        assert_eq!(board.sprite_at(Vec2::new(16.0, 18.0)), Some(handles[2]));
        assert_eq!(board.sprite_at(Vec2::new(4.0, 16.0)), None);
        assert_eq!(board.sprite_at(Vec2::new(40.0, 40.0)), None);
    }
}
