//! Terminal driver feeding stdin instructions into a puzzle session.

use std::{
    fmt::Write as _,
    io::{BufRead, Write},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use slide_puzzle_core::{AnimationConfig, Event, GridCoord, SessionState};
use slide_puzzle_rendering::{
    parse_tile_identifier, BoardLayout, Sprite, SpriteBoard, SpriteId,
};
use slide_puzzle_session::{CellSampler, PuzzleSession};
use tracing::{debug, warn};

use crate::catalog::PuzzleEntry;

/// Upper bound on frames spent settling a single slide.
const MAX_SETTLE_TICKS: u32 = 100_000;

/// Single line of player input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Instruction {
    /// Select the tile named by a `"Tile <row> <column>"` identifier.
    Select(GridCoord),
    /// Select whichever tile is drawn under a presentation-space point.
    Click(Vec2),
    /// Print the board.
    Show,
    /// Tear the session down and exit.
    Quit,
}

/// Parses one input line; blank lines yield `Ok(None)`.
pub(crate) fn parse_instruction(line: &str) -> Result<Option<Instruction>> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };

    let instruction = match keyword {
        "Tile" => parse_tile_identifier(line)
            .map(Instruction::Select)
            .with_context(|| format!("malformed tile identifier `{line}`"))?,
        "click" => {
            let (Some(x), Some(y), None) = (words.next(), words.next(), words.next()) else {
                bail!("expected `click <x> <y>`, got `{line}`");
            };
            let x: f32 = x.parse().with_context(|| format!("invalid x coordinate `{x}`"))?;
            let y: f32 = y.parse().with_context(|| format!("invalid y coordinate `{y}`"))?;
            Instruction::Click(Vec2::new(x, y))
        }
        "show" if words.next().is_none() => Instruction::Show,
        "quit" if words.next().is_none() => Instruction::Quit,
        _ => bail!("unknown instruction `{line}`"),
    };
    Ok(Some(instruction))
}

/// Whether the driver should keep reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Wait for the next instruction.
    Continue,
    /// The session ended; stop reading.
    Finished,
}

/// Owns the session and its sprite board for one puzzle attempt.
#[derive(Debug)]
pub(crate) struct Driver {
    name: String,
    session: PuzzleSession<SpriteId>,
    board: SpriteBoard,
    frame: Duration,
    events: Vec<Event>,
}

impl Driver {
    /// Lays out the board, spawns one sprite per tile and begins the session.
    pub(crate) fn begin<S>(
        entry: &PuzzleEntry,
        config: AnimationConfig,
        tile_length: f32,
        frame: Duration,
        sampler: &mut S,
    ) -> Result<Self>
    where
        S: CellSampler + ?Sized,
    {
        if frame.is_zero() {
            bail!("frame length must be positive");
        }

        let dimensions = entry.dimensions();
        let layout = BoardLayout::new(dimensions, Vec2::ZERO, tile_length)
            .context("failed to lay out the puzzle board")?;
        let empty = dimensions
            .coord_of(entry.empty_index())
            .with_context(|| format!("empty slot {} lies off the board", entry.empty_index()))?;

        let mut board = SpriteBoard::new(layout);
        let sprites = board.spawn_tiles(empty);
        let session =
            PuzzleSession::begin(dimensions, sprites, entry.empty_index(), sampler, config)
                .with_context(|| format!("failed to start puzzle `{}`", entry.name()))?;
        if let Some(grid) = session.grid() {
            board.place(grid.tiles().map(|tile| (*tile.visual(), tile.current())));
        }

        Ok(Self {
            name: entry.name().to_owned(),
            session,
            board,
            frame,
            events: Vec::new(),
        })
    }

    /// Session driven by this adapter.
    pub(crate) const fn session(&self) -> &PuzzleSession<SpriteId> {
        &self.session
    }

    /// Processes instructions until the puzzle is solved, abandoned or input ends.
    pub(crate) fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "{}", self.name)?;
        if self.session.is_solved() {
            writeln!(out, "the shuffle left the puzzle solved")?;
        }
        self.show(out)?;

        for line in input.lines() {
            let line = line.context("failed to read instruction")?;
            let instruction = match parse_instruction(&line) {
                Ok(Some(instruction)) => instruction,
                Ok(None) => continue,
                Err(error) => {
                    writeln!(out, "{error:#}")?;
                    continue;
                }
            };
            if self.handle(instruction, out)? == Flow::Finished {
                return Ok(());
            }
        }

        self.session.teardown(&mut self.events);
        self.drain_events();
        Ok(())
    }

    /// Applies a single instruction.
    pub(crate) fn handle<W>(&mut self, instruction: Instruction, out: &mut W) -> Result<Flow>
    where
        W: Write,
    {
        match instruction {
            Instruction::Select(tile) => self.select(tile, out),
            Instruction::Click(point) => {
                let home = self
                    .board
                    .sprite_at(point)
                    .and_then(|id| self.board.sprite(id))
                    .map(Sprite::home);
                match home {
                    Some(tile) => self.select(tile, out),
                    None => {
                        writeln!(out, "no tile at ({}, {})", point.x, point.y)?;
                        Ok(Flow::Continue)
                    }
                }
            }
            Instruction::Show => {
                self.show(out)?;
                Ok(Flow::Continue)
            }
            Instruction::Quit => {
                self.session.teardown(&mut self.events);
                self.drain_events();
                writeln!(out, "puzzle abandoned")?;
                Ok(Flow::Finished)
            }
        }
    }

    fn select<W>(&mut self, tile: GridCoord, out: &mut W) -> Result<Flow>
    where
        W: Write,
    {
        self.events.clear();
        self.session.handle_selection(tile, &mut self.events);
        if self.events.is_empty() {
            writeln!(out, "tile {} {} cannot move", tile.row(), tile.column())?;
            return Ok(Flow::Continue);
        }

        let mut ticks = 0_u32;
        while self.session.state() == SessionState::Animating {
            if ticks == MAX_SETTLE_TICKS {
                self.session.teardown(&mut self.events);
                self.drain_events();
                bail!("slide did not settle after {MAX_SETTLE_TICKS} frames");
            }
            self.session
                .tick(self.frame, &mut self.board, &mut self.events);
            ticks += 1;
        }
        debug!(ticks, "slide settled");

        let solved = self.events.iter().find_map(|event| match event {
            Event::PuzzleSolved { moves } => Some(*moves),
            _ => None,
        });
        self.drain_events();
        self.show(out)?;
        if let Some(moves) = solved {
            let noun = if moves == 1 { "move" } else { "moves" };
            writeln!(out, "solved in {moves} {noun}")?;
            return Ok(Flow::Finished);
        }
        Ok(Flow::Continue)
    }

    /// Logs and discards buffered events.
    fn drain_events(&mut self) {
        for event in self.events.drain(..) {
            debug!(?event, "session event");
        }
    }

    fn show<W>(&self, out: &mut W) -> Result<()>
    where
        W: Write,
    {
        match render_board(&self.session) {
            Some(frame) => write!(out, "{frame}")?,
            None => writeln!(out, "no puzzle loaded")?,
        }
        Ok(())
    }
}

/// Draws the board as text, labelling each tile by its one-based solved position.
pub(crate) fn render_board(session: &PuzzleSession<SpriteId>) -> Option<String> {
    let grid = session.grid()?;
    let dimensions = grid.dimensions();
    let mut frame = String::new();
    for row in 0..dimensions.rows() {
        for column in 0..dimensions.columns() {
            let label = match grid.tile_at(GridCoord::new(row, column)) {
                Ok(Some(tile)) => dimensions
                    .index_of(tile.original())
                    .map_or_else(|| "??".to_owned(), |index| format!("{:>2}", index + 1)),
                Ok(None) => "  ".to_owned(),
                Err(error) => {
                    warn!(%error, "board cell outside the grid");
                    "!!".to_owned()
                }
            };
            let _ = write!(frame, "[{label}]");
        }
        frame.push('\n');
    }
    Some(frame)
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, io::Cursor};

    use super::*;
    use crate::catalog::Catalog;

    struct Scripted(VecDeque<u32>);

    impl CellSampler for Scripted {
        fn next_below(&mut self, _bound: u32) -> u32 {
            self.0.pop_front().expect("scripted draws exhausted")
        }
    }

    fn two_by_two() -> PuzzleEntry {
        Catalog::parse(
            r#"
            version = 1

            [[puzzles]]
            name = "Tiny"
            rows = 2
            columns = 2
            image_set = "tiny"
            "#,
        )
        .expect("valid catalog")
        .get(1)
        .expect("single puzzle")
        .clone()
    }

    /// Leaves tile "Tile 0 1" displaced to (1,1) with the empty slot at (0,1).
    fn one_move_from_solved() -> Driver {
        let mut sampler = Scripted([0, 0, 1, 1, 1, 0, 1, 1].into_iter().collect());
        Driver::begin(
            &two_by_two(),
            AnimationConfig::default(),
            10.0,
            Duration::from_millis(16),
            &mut sampler,
        )
        .expect("driver starts")
    }

    fn run(driver: &mut Driver, input: &str) -> String {
        let mut out = Vec::new();
        driver
            .run(Cursor::new(input.as_bytes()), &mut out)
            .expect("driver runs");
        String::from_utf8(out).expect("utf8 output")
    }

    #[test]
    fn parse_instruction_recognises_every_keyword() {
        assert_eq!(
            parse_instruction("Tile 1 2").expect("valid"),
            Some(Instruction::Select(GridCoord::new(1, 2)))
        );
        assert_eq!(
            parse_instruction("click 4.5 -3").expect("valid"),
            Some(Instruction::Click(Vec2::new(4.5, -3.0)))
        );
        assert_eq!(parse_instruction(" show ").expect("valid"), Some(Instruction::Show));
        assert_eq!(parse_instruction("quit").expect("valid"), Some(Instruction::Quit));
        assert_eq!(parse_instruction("   ").expect("valid"), None);
    }

    #[test]
    fn parse_instruction_rejects_malformed_lines() {
        for line in ["Tile 1", "Tile a b", "click 1", "click 1 2 3", "show me", "jump"] {
            assert!(parse_instruction(line).is_err(), "{line:?}");
        }
    }

    #[test]
    fn begin_places_sprites_on_their_shuffled_slots() {
        let driver = one_move_from_solved();
        let board = &driver.board;

        let displaced = board
            .sprites()
            .find(|(_, sprite)| sprite.home() == GridCoord::new(0, 1))
            .map(|(_, sprite)| sprite.position())
            .expect("sprite for tile 0 1");
        assert_eq!(displaced, Vec2::new(15.0, 15.0));
        assert_eq!(
            render_board(driver.session()).expect("live session"),
            "[ 1][  ]\n[ 3][ 2]\n"
        );
    }

    #[test]
    fn selecting_the_displaced_tile_wins() {
        let mut driver = one_move_from_solved();

        let output = run(&mut driver, "Tile 1 0\nTile 0 1\nshow\n");

        assert!(output.contains("tile 1 0 cannot move"), "{output}");
        assert!(output.ends_with("[ 1][ 2]\n[ 3][  ]\nsolved in 1 move\n"), "{output}");
        assert_eq!(driver.session().state(), SessionState::End);
        assert_eq!(driver.session().move_count(), 1);
    }

    #[test]
    fn clicking_the_drawn_sprite_selects_its_tile() {
        let mut driver = one_move_from_solved();

        let output = run(&mut driver, "click 15 5\nclick 15 15\n");

        assert!(output.contains("no tile at (15, 5)"), "{output}");
        assert!(output.ends_with("solved in 1 move\n"), "{output}");
        let sprite = driver
            .board
            .sprites()
            .find(|(_, sprite)| sprite.home() == GridCoord::new(0, 1))
            .map(|(_, sprite)| sprite.position())
            .expect("sprite for tile 0 1");
        assert_eq!(sprite, Vec2::new(15.0, 5.0));
    }

    #[test]
    fn malformed_input_is_reported_and_ignored() {
        let mut driver = one_move_from_solved();

        let output = run(&mut driver, "Tile x y\nbogus\nTile 0 1\n");

        assert!(output.contains("malformed tile identifier `Tile x y`"), "{output}");
        assert!(output.contains("unknown instruction `bogus`"), "{output}");
        assert!(output.ends_with("solved in 1 move\n"), "{output}");
    }

    #[test]
    fn quit_tears_the_session_down() {
        let mut driver = one_move_from_solved();

        let output = run(&mut driver, "quit\nTile 0 1\n");

        assert!(output.ends_with("puzzle abandoned\n"), "{output}");
        assert_eq!(driver.session().state(), SessionState::End);
        assert!(driver.session().grid().is_none());
        assert_eq!(driver.session().move_count(), 0);
    }

    #[test]
    fn end_of_input_tears_the_session_down() {
        let mut driver = one_move_from_solved();

        let output = run(&mut driver, "show\n");

        assert!(output.ends_with("[ 1][  ]\n[ 3][ 2]\n"), "{output}");
        assert_eq!(driver.session().state(), SessionState::End);
        assert!(driver.session().grid().is_none());
    }

    #[test]
    fn slides_that_cannot_settle_end_the_session() {
        let mut sampler = Scripted([0, 0, 1, 1, 1, 0, 1, 1].into_iter().collect());
        let mut driver = Driver::begin(
            &two_by_two(),
            AnimationConfig::new(0.001, AnimationConfig::DEFAULT_ARRIVAL_EPSILON),
            10.0,
            Duration::from_millis(16),
            &mut sampler,
        )
        .expect("driver starts");
        let mut out = Vec::new();

        let error = driver
            .run(Cursor::new("Tile 0 1\n".as_bytes()), &mut out)
            .expect_err("slide cannot settle within the frame budget");

        assert!(error.to_string().contains("did not settle"), "{error:#}");
        assert_eq!(driver.session().state(), SessionState::End);
        assert!(driver.session().in_flight().is_none());
        assert!(driver.session().grid().is_none());
        assert!(driver.events.is_empty());
    }

    #[test]
    fn zero_length_frames_are_rejected() {
        let mut sampler = Scripted(VecDeque::new());
        let error = Driver::begin(
            &two_by_two(),
            AnimationConfig::default(),
            10.0,
            Duration::ZERO,
            &mut sampler,
        )
        .expect_err("zero frame must be rejected");

        assert!(error.to_string().contains("frame length"));
    }
}
