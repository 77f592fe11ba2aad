//! Puzzle catalog loaded from a TOML manifest.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use slide_puzzle_core::{GridDimensions, MAX_COLUMNS, MAX_ROWS};

const SUPPORTED_CATALOG_VERSION: u32 = 1;

/// Single playable puzzle described by the catalog.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PuzzleEntry {
    name: String,
    rows: u32,
    columns: u32,
    #[serde(default)]
    empty_index: Option<usize>,
    image_set: String,
}

impl PuzzleEntry {
    fn new(name: &str, rows: u32, columns: u32, image_set: &str) -> Self {
        Self {
            name: name.to_owned(),
            rows,
            columns,
            empty_index: None,
            image_set: image_set.to_owned(),
        }
    }

    /// Display name of the puzzle.
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Board extents.
    pub(crate) const fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.rows, self.columns)
    }

    /// Row-major index of the missing slot; the last slot unless overridden.
    pub(crate) fn empty_index(&self) -> usize {
        self.empty_index
            .unwrap_or_else(|| self.dimensions().slot_count().saturating_sub(1))
    }

    /// Label of the artwork the tiles are cut from.
    pub(crate) fn image_set(&self) -> &str {
        &self.image_set
    }

    fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            bail!(
                "puzzle `{}` has no area ({}x{})",
                self.name,
                self.rows,
                self.columns
            );
        }
        if self.rows > MAX_ROWS || self.columns > MAX_COLUMNS {
            bail!(
                "puzzle `{}` is {}x{}; boards are capped at {MAX_ROWS}x{MAX_COLUMNS}",
                self.name,
                self.rows,
                self.columns
            );
        }
        let slot_count = self.dimensions().slot_count();
        if self.empty_index() >= slot_count {
            bail!(
                "puzzle `{}` places the empty slot at {} but only has {slot_count} slots",
                self.name,
                self.empty_index()
            );
        }
        Ok(())
    }
}

/// Ordered list of puzzles, numbered from one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Catalog {
    puzzles: Vec<PuzzleEntry>,
}

impl Catalog {
    /// Catalog used when no manifest is supplied.
    pub(crate) fn builtin() -> Self {
        Self {
            puzzles: vec![
                PuzzleEntry::new("Puzzle 1", 3, 3, "harbour"),
                PuzzleEntry::new("Puzzle 2", 4, 4, "meadow"),
                PuzzleEntry::new("Puzzle 3", 5, 5, "skyline"),
            ],
        }
    }

    /// Reads and validates the manifest at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read puzzle catalog at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid puzzle catalog at {}", path.display()))
    }

    /// Parses and validates manifest contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse puzzle catalog toml contents")?;
        if manifest.version != SUPPORTED_CATALOG_VERSION {
            bail!(
                "unsupported puzzle catalog version {}; expected {}",
                manifest.version,
                SUPPORTED_CATALOG_VERSION
            );
        }
        if manifest.puzzles.is_empty() {
            bail!("puzzle catalog lists no puzzles");
        }
        for puzzle in &manifest.puzzles {
            puzzle.validate()?;
        }

        Ok(Self {
            puzzles: manifest.puzzles,
        })
    }

    /// Puzzle with the one-based `number`.
    pub(crate) fn get(&self, number: usize) -> Option<&PuzzleEntry> {
        self.puzzles.get(number.checked_sub(1)?)
    }

    /// Number of puzzles listed.
    pub(crate) fn len(&self) -> usize {
        self.puzzles.len()
    }
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    puzzles: Vec<PuzzleEntry>,
}
