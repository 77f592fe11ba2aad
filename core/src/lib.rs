#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the slide puzzle engine.
//!
//! This crate defines the vocabulary that connects the driver, the
//! authoritative grid, and the pure systems. Drivers submit [`Command`]
//! values describing what the player did, the session executes them against
//! its grid, and then appends [`Event`] values describing what changed.
//! Presentation stays behind the [`Presentation`] trait so the engine never
//! learns how tiles are drawn.

use std::time::Duration;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

/// Largest number of rows a catalogued puzzle may declare.
pub const MAX_ROWS: u32 = 5;

/// Largest number of columns a catalogued puzzle may declare.
pub const MAX_COLUMNS: u32 = 5;

/// Location of a single grid slot expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    row: u32,
    column: u32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the slot.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the slot.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Coordinate one step away in `direction`, ignoring grid extents.
    ///
    /// Returns `None` only when the step would underflow the zero row or
    /// column; callers bound the upper side through [`GridDimensions`].
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<GridCoord> {
        match direction {
            Direction::Up => self
                .row
                .checked_sub(1)
                .map(|row| Self::new(row, self.column)),
            Direction::Left => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(self.row, column)),
            Direction::Down => self
                .row
                .checked_add(1)
                .map(|row| Self::new(row, self.column)),
            Direction::Right => self
                .column
                .checked_add(1)
                .map(|column| Self::new(self.row, column)),
        }
    }
}

/// Extents of a puzzle grid measured in whole slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    rows: u32,
    columns: u32,
}

impl GridDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of slots, saturating on overflow.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        let count = u64::from(self.rows) * u64::from(self.columns);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether either extent is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Reports whether the coordinate lies within the grid extents.
    #[must_use]
    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.row() < self.rows && coord.column() < self.columns
    }

    /// Row-major linear index of an in-bounds coordinate.
    #[must_use]
    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Coordinate addressed by a row-major linear index.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Option<GridCoord> {
        if self.is_empty() || index >= self.slot_count() {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = u32::try_from(index / width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        Some(GridCoord::new(row, column))
    }

    /// Orthogonal neighbour of `coord` in `direction`, if it lies inside the grid.
    #[must_use]
    pub fn neighbor(&self, coord: GridCoord, direction: Direction) -> Option<GridCoord> {
        coord
            .step(direction)
            .filter(|candidate| self.contains(*candidate))
    }

    /// Iterates every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| GridCoord::new(row, column)))
    }
}

/// Orthogonal directions a tile may slide in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward decreasing column indices.
    Left,
    /// Toward increasing row indices.
    Down,
    /// Toward increasing column indices.
    Right,
}

impl Direction {
    /// Order in which neighbours are probed for the empty slot.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];
}

/// Lifecycle state of a puzzle session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Idle and accepting tile selections.
    Playing,
    /// A single tile is sliding toward the empty slot.
    Animating,
    /// Terminal; the puzzle was solved or the driver tore the session down.
    End,
}

/// Why a session reached [`SessionState::End`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// Every tile returned to its original position.
    Solved,
    /// The driver unloaded the puzzle.
    TornDown,
}

/// A legal slide resolved from a tile selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlannedMove {
    /// Original position identifying the tile that slides.
    pub tile: GridCoord,
    /// Slot the tile currently occupies.
    pub from: GridCoord,
    /// Empty slot the tile slides into.
    pub to: GridCoord,
    /// Direction of travel from `from` to `to`.
    pub direction: Direction,
}

/// Driver inputs accepted by a puzzle session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// The player picked the tile whose original position is `tile`.
    Select {
        /// Original position identifying the selected tile.
        tile: GridCoord,
    },
    /// Advances the in-flight animation by the provided frame delta.
    Tick {
        /// Duration of the frame that elapsed since the previous tick.
        dt: Duration,
    },
    /// The driver is unloading the puzzle.
    Teardown,
}

/// Notifications appended by a session after processing driver input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A selection resolved to a legal slide and the animation began.
    MoveStarted {
        /// Original position identifying the sliding tile.
        tile: GridCoord,
        /// Slot the tile left.
        from: GridCoord,
        /// Slot the tile is heading to.
        to: GridCoord,
    },
    /// The animation arrived and the swap was applied to the grid.
    MoveCommitted {
        /// Original position identifying the tile that moved.
        tile: GridCoord,
        /// Slot the tile left.
        from: GridCoord,
        /// Slot the tile now occupies.
        to: GridCoord,
    },
    /// Every tile sits at its original position.
    PuzzleSolved {
        /// Number of moves committed during the attempt.
        moves: u32,
    },
    /// The session entered its terminal state.
    SessionEnded {
        /// Cause of the transition.
        reason: EndReason,
    },
}

/// Tuning for the slide animation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Interpolation rate per second; each tick moves `speed * dt` of the
    /// remaining distance, clamped to the full distance.
    pub speed: f32,
    /// Distance below which the sliding tile counts as arrived.
    pub arrival_epsilon: f32,
}

impl AnimationConfig {
    /// Default interpolation rate per second.
    pub const DEFAULT_SPEED: f32 = 10.0;

    /// Default arrival threshold in presentation units.
    pub const DEFAULT_ARRIVAL_EPSILON: f32 = 0.1;

    /// Creates a configuration with explicit values.
    #[must_use]
    pub const fn new(speed: f32, arrival_epsilon: f32) -> Self {
        Self {
            speed,
            arrival_epsilon,
        }
    }

    /// Rejects non-finite or non-positive tuning values.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if valid(self.speed) && valid(self.arrival_epsilon) {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidAnimation {
                speed: self.speed,
                arrival_epsilon: self.arrival_epsilon,
            })
        }
    }

    /// Interpolation factor applied for a frame of length `dt`.
    #[must_use]
    pub fn step_fraction(&self, dt: Duration) -> f32 {
        (self.speed * dt.as_secs_f32()).clamp(0.0, 1.0)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED, Self::DEFAULT_ARRIVAL_EPSILON)
    }
}

/// Fatal problems detected while setting up a puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigurationError {
    /// One of the grid extents was zero.
    #[error("grid dimensions must be positive (received {rows}x{columns})")]
    NonPositiveDimensions {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// The tile set does not fill every slot but one.
    #[error("expected {expected} tiles for the grid but received {actual}")]
    TileCountMismatch {
        /// Number of tiles the grid requires.
        expected: usize,
        /// Number of tiles supplied.
        actual: usize,
    },
    /// The empty slot index lies outside the grid.
    #[error("empty slot index {index} exceeds the {slot_count} available slots")]
    EmptyIndexOutOfRange {
        /// Requested row-major index.
        index: usize,
        /// Number of slots in the grid.
        slot_count: usize,
    },
    /// The animation tuning cannot make progress.
    #[error("animation speed {speed} and arrival epsilon {arrival_epsilon} must be positive")]
    InvalidAnimation {
        /// Configured interpolation rate.
        speed: f32,
        /// Configured arrival threshold.
        arrival_epsilon: f32,
    },
}

/// A coordinate query fell outside the grid extents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error(
    "coordinate ({}, {}) lies outside the {}x{} grid",
    .coord.row(),
    .coord.column(),
    .dimensions.rows(),
    .dimensions.columns()
)]
pub struct OutOfBounds {
    /// Offending coordinate.
    pub coord: GridCoord,
    /// Extents of the grid that was queried.
    pub dimensions: GridDimensions,
}

/// Driver-side access to on-screen tile positions.
///
/// The engine hands tile handles back to the driver untouched; the driver
/// decides what a position means and where each slot is drawn.
pub trait Presentation<H> {
    /// Presentation-space position at which a tile resting in `cell` is drawn.
    fn slot_position(&self, cell: GridCoord) -> Vec2;

    /// Current presentation-space position of the tile behind `handle`.
    fn tile_position(&self, handle: &H) -> Vec2;

    /// Moves the tile behind `handle` to `position`.
    fn set_tile_position(&mut self, handle: &H, position: Vec2);
}
