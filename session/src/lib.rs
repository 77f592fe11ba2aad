#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Puzzle session orchestrating the grid and the pure systems.
//!
//! A session lives for exactly one puzzle attempt. The driver creates it with
//! [`PuzzleSession::begin`], forwards tile selections and frame deltas, and
//! calls [`PuzzleSession::teardown`] when the puzzle is unloaded. Every entry
//! point appends the resulting [`Event`] values to a caller-owned buffer.
//! Invalid interactions are silent no-ops.

use std::time::Duration;

use slide_puzzle_core::{
    AnimationConfig, Command, ConfigurationError, EndReason, Event, GridCoord, GridDimensions,
    Presentation, SessionState,
};
use slide_puzzle_grid::Grid;
use slide_puzzle_system_animation::{AnimationScheduler, MoveAnimation, Progress};
use slide_puzzle_system_move_resolver::MoveResolver;
use slide_puzzle_system_shuffle::Shuffler;
use slide_puzzle_system_victory::VictoryEvaluator;
use tracing::{debug, info, trace};

pub use slide_puzzle_system_shuffle::CellSampler;

/// State machine for a single puzzle attempt.
#[derive(Clone, Debug)]
pub struct PuzzleSession<H> {
    state: SessionState,
    grid: Option<Grid<H>>,
    resolver: MoveResolver,
    scheduler: AnimationScheduler,
    victory: VictoryEvaluator,
    moves: u32,
}

impl<H> PuzzleSession<H> {
    /// Builds the grid, scrambles it with `sampler`, and starts playing.
    ///
    /// `tiles` fill the grid in row-major order around the slot addressed by
    /// the row-major `empty_index`.
    pub fn begin<S>(
        dimensions: GridDimensions,
        tiles: Vec<H>,
        empty_index: usize,
        sampler: &mut S,
        config: AnimationConfig,
    ) -> Result<Self, ConfigurationError>
    where
        S: CellSampler + ?Sized,
    {
        config.validate()?;
        let mut grid = Grid::initialize(dimensions, tiles, empty_index)?;
        Shuffler::new().shuffle(&mut grid, sampler);

        info!(
            rows = dimensions.rows(),
            columns = dimensions.columns(),
            "puzzle session started"
        );

        Ok(Self {
            state: SessionState::Playing,
            grid: Some(grid),
            resolver: MoveResolver::new(),
            scheduler: AnimationScheduler::new(config),
            victory: VictoryEvaluator::new(),
            moves: 0,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Grid backing the attempt; `None` once the session was torn down.
    #[must_use]
    pub const fn grid(&self) -> Option<&Grid<H>> {
        self.grid.as_ref()
    }

    /// Slide currently in flight, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&MoveAnimation> {
        self.scheduler.in_flight()
    }

    /// Number of slides committed during the attempt.
    #[must_use]
    pub const fn move_count(&self) -> u32 {
        self.moves
    }

    /// Reports whether every tile rests at home. Always `false` after teardown.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.grid
            .as_ref()
            .is_some_and(|grid| self.victory.is_solved(grid))
    }

    /// Applies a driver command, dispatching to the matching entry point.
    pub fn apply<P>(&mut self, command: Command, presentation: &mut P, out: &mut Vec<Event>)
    where
        P: Presentation<H> + ?Sized,
    {
        match command {
            Command::Select { tile } => self.handle_selection(tile, out),
            Command::Tick { dt } => self.tick(dt, presentation, out),
            Command::Teardown => self.teardown(out),
        }
    }

    /// Starts sliding the tile whose original position is `tile`, if it may move.
    pub fn handle_selection(&mut self, tile: GridCoord, out: &mut Vec<Event>) {
        if self.state != SessionState::Playing {
            trace!(state = ?self.state, "selection ignored outside of play");
            return;
        }
        let Some(grid) = self.grid.as_ref() else {
            return;
        };
        let Some(planned) = self.resolver.resolve(grid, tile) else {
            return;
        };
        if !self.scheduler.start(planned) {
            return;
        }

        self.state = SessionState::Animating;
        debug!(
            row = tile.row(),
            column = tile.column(),
            direction = ?planned.direction,
            "slide started"
        );
        out.push(Event::MoveStarted {
            tile: planned.tile,
            from: planned.from,
            to: planned.to,
        });
    }

    /// Advances the in-flight slide by `dt`, committing it on arrival.
    pub fn tick<P>(&mut self, dt: Duration, presentation: &mut P, out: &mut Vec<Event>)
    where
        P: Presentation<H> + ?Sized,
    {
        if self.state != SessionState::Animating {
            return;
        }
        let Some(grid) = self.grid.as_mut() else {
            return;
        };

        match self.scheduler.advance(grid, dt, presentation) {
            Progress::InFlight { .. } => {}
            Progress::Idle => self.state = SessionState::Playing,
            Progress::Committed(planned) => {
                self.moves = self.moves.saturating_add(1);
                self.state = SessionState::Playing;
                out.push(Event::MoveCommitted {
                    tile: planned.tile,
                    from: planned.from,
                    to: planned.to,
                });

                if self.victory.is_solved(grid) {
                    self.state = SessionState::End;
                    info!(moves = self.moves, "puzzle solved");
                    out.push(Event::PuzzleSolved { moves: self.moves });
                    out.push(Event::SessionEnded {
                        reason: EndReason::Solved,
                    });
                }
            }
        }
    }

    /// Ends the attempt and releases the grid. Safe to call repeatedly.
    ///
    /// A slide in flight is abandoned wherever it is; reconciling the tile's
    /// presentation is left to the driver.
    pub fn teardown(&mut self, out: &mut Vec<Event>) {
        let _ = self.scheduler.cancel();
        let released = self.grid.take().is_some();
        if self.state == SessionState::End {
            return;
        }

        self.state = SessionState::End;
        debug!(released, "puzzle session torn down");
        out.push(Event::SessionEnded {
            reason: EndReason::TornDown,
        });
    }
}
