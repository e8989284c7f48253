#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lifeline simulator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative simulation, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values so renderers can
//! redraw incrementally. Grid buffers and the row-string pattern format live
//! here as well because every other crate exchanges them.

pub mod grid;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use grid::{rows_to_grid, Grid};

/// Binary state of a single cell.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CellState {
    /// The cell is dead (`0` in the row-string format).
    #[default]
    Dead,
    /// The cell is alive (`1` in the row-string format).
    Alive,
}

impl CellState {
    /// Returns the opposite state.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Dead => Self::Alive,
            Self::Alive => Self::Dead,
        }
    }

    /// Reports whether the cell is alive.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    /// Numeric representation used by the row-string format.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Dead => 0,
            Self::Alive => 1,
        }
    }

    /// Character used by the row-string format.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Dead => '0',
            Self::Alive => '1',
        }
    }

    /// Parses a single row-string character.
    #[must_use]
    pub const fn from_char(value: char) -> Option<Self> {
        match value {
            '0' => Some(Self::Dead),
            '1' => Some(Self::Alive),
            _ => None,
        }
    }
}

impl From<bool> for CellState {
    fn from(alive: bool) -> Self {
        if alive {
            Self::Alive
        } else {
            Self::Dead
        }
    }
}

/// Location of a single grid cell expressed as zero-based row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Shifts the coordinate down and right by `margin` cells on both axes.
    #[must_use]
    pub const fn offset_by(self, margin: u32) -> Self {
        Self {
            row: self.row.saturating_add(margin),
            column: self.column.saturating_add(margin),
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Neighbor-adjacency rule applied at grid edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Finite plane; neighbors beyond the edge do not exist.
    #[default]
    Bounded,
    /// Surface of a torus; both axes wrap around.
    Toroidal,
}

/// Commands that express all permissible simulation mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Archives the current generation and advances one step.
    NextStep,
    /// Restores the most recently archived generation. Ignored at step zero.
    PreviousStep,
    /// Navigates forward or backward until the step counter equals `target`.
    GoToStep {
        /// Step the simulation should land on. Negative targets are rejected.
        target: i64,
    },
    /// Overwrites a single cell of the current generation.
    SetCellState {
        /// Visible cell to modify.
        cell: CellCoord,
        /// State the cell should take.
        state: CellState,
    },
    /// Inverts a single cell of the current generation.
    FlipCell {
        /// Visible cell to modify.
        cell: CellCoord,
    },
    /// Replaces the current generation with an all-dead grid.
    Clear,
    /// Replaces the current generation with a copy of the start baseline.
    Reset,
    /// Captures the current generation as the new start baseline.
    SetAsStart,
    /// Replaces the current generation with a centered copy of a pattern.
    ChangePattern {
        /// Pattern to embed in the simulation's buffer.
        grid: Grid,
    },
    /// Replaces the current generation with a freshly randomized grid.
    Randomize,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The simulation moved forward to `step`.
    StepAdvanced {
        /// Step counter after the transition.
        step: u64,
    },
    /// The simulation moved backward to `step`.
    ///
    /// The generation that was current before rewinding remains available
    /// through the world's next-cell query until the grid changes again.
    StepRewound {
        /// Step counter after rewinding.
        step: u64,
    },
    /// A direct edit changed the state of a visible cell.
    CellChanged {
        /// Visible cell that changed.
        cell: CellCoord,
        /// State stored after the edit.
        state: CellState,
    },
    /// The whole grid was replaced and history discarded.
    GridReplaced {
        /// Operation that replaced the grid.
        reason: ReplaceReason,
    },
    /// The current generation became the start baseline and history was discarded.
    StartCaptured,
}

/// Operations that replace the current generation wholesale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReplaceReason {
    /// All cells were set dead.
    Cleared,
    /// Cells were restored from the start baseline.
    Reset,
    /// A pattern was centered into the buffer.
    PatternChanged,
    /// Cells were randomized.
    Randomized,
}

/// Errors raised synchronously by grid utilities and the simulation.
///
/// Every failing operation leaves the simulation untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LifeError {
    /// Grid dimensions were inconsistent or too small for the requested operation.
    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(#[from] DimensionError),
    /// A pattern row-string could not be parsed.
    #[error("invalid pattern format: {0}")]
    InvalidPatternFormat(#[from] PatternFormatError),
    /// A step navigation target was negative.
    #[error("cannot navigate to negative step {target}")]
    InvalidStep {
        /// Rejected target.
        target: i64,
    },
    /// A coordinate fell outside the visible window.
    #[error("cell {cell} lies outside the {rows}x{columns} window")]
    OutOfRange {
        /// Offending coordinate.
        cell: CellCoord,
        /// Visible row count.
        rows: u32,
        /// Visible column count.
        columns: u32,
    },
}

/// Specific reasons a grid dimension check failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DimensionError {
    /// The requested size is smaller than the grid being embedded.
    #[error("target {target_rows}x{target_columns} is smaller than grid {rows}x{columns}")]
    TargetTooSmall {
        /// Rows in the grid being resized.
        rows: u32,
        /// Columns in the grid being resized.
        columns: u32,
        /// Requested row count.
        target_rows: u32,
        /// Requested column count.
        target_columns: u32,
    },
    /// Rows of a nested buffer had different lengths.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        /// Index of the first mismatching row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the mismatching row.
        found: usize,
    },
    /// A simulation was requested with zero rows or columns.
    #[error("a simulation needs at least one row and one column")]
    Empty,
    /// A serialized buffer held a different number of cells than its dimensions imply.
    #[error("{rows}x{columns} grid carries {found} cells")]
    CellCountMismatch {
        /// Declared row count.
        rows: u32,
        /// Declared column count.
        columns: u32,
        /// Number of cells actually present.
        found: usize,
    },
    /// A buffer would exceed the addressable cell count.
    #[error("{rows}x{columns} exceeds the addressable cell count")]
    TooLarge {
        /// Requested row count.
        rows: u64,
        /// Requested column count.
        columns: u64,
    },
}

/// Specific reasons a pattern row-string was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatternFormatError {
    /// A character other than `'0'` or `'1'` was found.
    #[error("unexpected character {found:?} at row {row}, column {column}")]
    UnexpectedCharacter {
        /// Zero-based row of the offending character.
        row: usize,
        /// Zero-based column of the offending character.
        column: usize,
        /// Character that was found.
        found: char,
    },
    /// A row's length differs from the first row.
    #[error("row {row} has {found} characters, expected {expected}")]
    InconsistentLength {
        /// Zero-based index of the mismatching row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the mismatching row.
        found: usize,
    },
}
