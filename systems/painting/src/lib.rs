#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure painting system that turns pointer gestures into cell edit commands.

use std::collections::HashMap;

use lifeline_core::{CellCoord, CellState, Command};

/// Cells already painted during the current gesture, with the state applied to each.
#[derive(Clone, Debug, Default)]
pub struct VisitedCells {
    cells: HashMap<CellCoord, CellState>,
}

impl VisitedCells {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the state applied to `cell`, replacing any earlier record.
    pub fn record(&mut self, cell: CellCoord, state: CellState) {
        let _ = self.cells.insert(cell, state);
    }

    /// Reports whether `cell` was visited during the current gesture.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    /// State recorded for `cell`, if it was visited.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellState> {
        self.cells.get(&cell).copied()
    }

    /// Forgets every visited cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of visited cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no cell was visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Pointer button that started a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaintButton {
    /// Flips the pressed cell, then paints cells alive while dragging.
    Primary,
    /// Kills the pressed cell, then paints cells dead while dragging.
    Secondary,
}

impl PaintButton {
    /// State painted onto cells while dragging with this button held.
    #[must_use]
    pub const fn brush(self) -> CellState {
        match self {
            Self::Primary => CellState::Alive,
            Self::Secondary => CellState::Dead,
        }
    }
}

/// Pointer input distilled from adapter-provided frame data.
///
/// `cell` is `None` whenever the pointer lies outside the visible grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintInput {
    /// A button went down.
    Press {
        /// Button that was pressed.
        button: PaintButton,
        /// Cell under the pointer.
        cell: Option<CellCoord>,
    },
    /// The pointer moved or the hold timer fired while a button is down.
    Drag {
        /// Cell under the pointer.
        cell: Option<CellCoord>,
    },
    /// The button was released.
    Release,
    /// The pointer left the canvas.
    Leave,
}

/// Gesture-driven painting system.
#[derive(Clone, Debug, Default)]
pub struct Painter {
    gesture: Option<PaintButton>,
    visited: VisitedCells,
}

impl Painter {
    /// Creates a painter with no active gesture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether a gesture is in progress.
    #[must_use]
    pub fn is_painting(&self) -> bool {
        self.gesture.is_some()
    }

    /// Cells visited during the current gesture.
    #[must_use]
    pub fn visited(&self) -> &VisitedCells {
        &self.visited
    }

    /// Consumes pointer input and emits the cell commands it implies.
    ///
    /// The `cell_state` closure should mirror the world's `query::cell_state`
    /// so the painter can skip cells that already hold the brush state. Cells
    /// for which it returns `None` are ignored.
    pub fn handle<F>(&mut self, input: PaintInput, mut cell_state: F, out: &mut Vec<Command>)
    where
        F: FnMut(CellCoord) -> Option<CellState>,
    {
        match input {
            PaintInput::Press { button, cell } => {
                let Some(cell) = cell else {
                    return;
                };
                let Some(current) = cell_state(cell) else {
                    return;
                };
                self.visited.clear();
                self.gesture = Some(button);

                let applied = match button {
                    PaintButton::Primary => {
                        out.push(Command::FlipCell { cell });
                        current.flipped()
                    }
                    PaintButton::Secondary => {
                        out.push(Command::SetCellState {
                            cell,
                            state: CellState::Dead,
                        });
                        CellState::Dead
                    }
                };
                self.visited.record(cell, applied);
            }
            PaintInput::Drag { cell } => {
                let (Some(button), Some(cell)) = (self.gesture, cell) else {
                    return;
                };
                if self.visited.contains(cell) {
                    return;
                }
                // Cells the world cannot resolve lie outside the grid.
                let Some(current) = cell_state(cell) else {
                    return;
                };

                let brush = button.brush();
                if current != brush {
                    out.push(Command::SetCellState { cell, state: brush });
                }
                self.visited.record(cell, brush);
            }
            PaintInput::Release | PaintInput::Leave => {
                self.gesture = None;
                self.visited.clear();
            }
        }
    }
}
