#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick-driven slide animation that commits moves to the grid on arrival.
//!
//! Each tick moves the in-flight tile a fixed fraction (`speed * dt`,
//! clamped to one) of its remaining distance toward the target slot. Arrival
//! is declared once the remaining distance drops below the configured
//! epsilon, or once a tick stops closing the gap, which tolerates frames of
//! any length and coordinates of any magnitude.

use std::time::Duration;

use glam::Vec2;
use slide_puzzle_core::{AnimationConfig, PlannedMove, Presentation};
use slide_puzzle_grid::Grid;
use tracing::{debug, error, trace};

/// A slide currently travelling toward its target slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveAnimation {
    planned: PlannedMove,
    elapsed: Duration,
}

impl MoveAnimation {
    /// Move being animated.
    #[must_use]
    pub const fn planned(&self) -> PlannedMove {
        self.planned
    }

    /// Simulated time spent in flight so far.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Outcome of a single [`AnimationScheduler::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Progress {
    /// Nothing was in flight.
    Idle,
    /// The tile moved but has not arrived yet.
    InFlight {
        /// Presentation position written for the tile this tick.
        position: Vec2,
        /// Distance left to the target slot.
        remaining: f32,
    },
    /// The tile arrived and the swap was applied to the grid.
    Committed(PlannedMove),
}

/// Owns the single in-flight slide and advances it frame by frame.
#[derive(Clone, Debug)]
pub struct AnimationScheduler {
    config: AnimationConfig,
    in_flight: Option<MoveAnimation>,
}

impl AnimationScheduler {
    /// Creates an idle scheduler with the provided tuning.
    #[must_use]
    pub const fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            in_flight: None,
        }
    }

    /// Slide currently in flight, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&MoveAnimation> {
        self.in_flight.as_ref()
    }

    /// Begins animating `planned` with zero elapsed time.
    ///
    /// Returns `false` without touching the current slide when one is already
    /// in flight.
    #[must_use]
    pub fn start(&mut self, planned: PlannedMove) -> bool {
        if self.in_flight.is_some() {
            trace!("slide already in flight; start ignored");
            return false;
        }
        self.in_flight = Some(MoveAnimation {
            planned,
            elapsed: Duration::ZERO,
        });
        true
    }

    /// Drops the in-flight slide without committing it.
    ///
    /// The tile's presentation position is left wherever the last tick put it.
    pub fn cancel(&mut self) -> Option<MoveAnimation> {
        self.in_flight.take()
    }

    /// Advances the in-flight slide by `dt`, committing it on arrival.
    pub fn advance<H, P>(
        &mut self,
        grid: &mut Grid<H>,
        dt: Duration,
        presentation: &mut P,
    ) -> Progress
    where
        P: Presentation<H> + ?Sized,
    {
        let Some(animation) = self.in_flight.as_mut() else {
            return Progress::Idle;
        };
        animation.elapsed = animation.elapsed.saturating_add(dt);
        let planned = animation.planned;

        let tile = match grid.tile_at(planned.from) {
            Ok(Some(tile)) if tile.original() == planned.tile => tile,
            Ok(_) => {
                error!(
                    row = planned.from.row(),
                    column = planned.from.column(),
                    "sliding tile no longer rests in its origin slot; slide discarded"
                );
                self.in_flight = None;
                return Progress::Idle;
            }
            Err(error) => {
                error!(%error, "slide origin outside the grid; slide discarded");
                self.in_flight = None;
                return Progress::Idle;
            }
        };

        let handle = tile.visual();
        let target = presentation.slot_position(planned.to);
        let current = presentation.tile_position(handle);
        let fraction = self.config.step_fraction(dt);
        let next = current.lerp(target, fraction);
        let remaining = next.distance(target);
        // f32 rounding can freeze far-away coordinates short of the epsilon.
        let stalled = fraction > 0.0 && remaining >= current.distance(target);
        if remaining >= self.config.arrival_epsilon && !stalled {
            presentation.set_tile_position(handle, next);
            return Progress::InFlight {
                position: next,
                remaining,
            };
        }
        presentation.set_tile_position(handle, target);

        self.in_flight = None;
        if let Err(error) = grid.swap_cells(planned.from, planned.to) {
            error!(%error, "slide target outside the grid; slide discarded");
            return Progress::Idle;
        }

        debug!(
            from_row = planned.from.row(),
            from_column = planned.from.column(),
            to_row = planned.to.row(),
            to_column = planned.to.column(),
            "slide committed"
        );
        Progress::Committed(planned)
    }
}
