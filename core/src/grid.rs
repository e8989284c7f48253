//! Dense grid buffers and the pure utilities that reshape them.
//!
//! Nothing here knows about simulation rules. Every reshaping operation
//! returns a new [`Grid`] and leaves its input untouched.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{CellCoord, CellState, DimensionError, LifeError, PatternFormatError};

/// Rectangular, row-major buffer of cell states.
///
/// Rows always share the same length; the constructors reject ragged input so
/// the invariant holds for every value of this type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridParts")]
pub struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates an all-dead grid.
    #[must_use]
    pub fn zeros(rows: u32, columns: u32) -> Self {
        Self {
            rows,
            columns,
            cells: vec![CellState::Dead; cell_count(rows, columns)],
        }
    }

    /// Creates a grid where each cell is alive with probability one half.
    pub fn random<R: Rng>(rows: u32, columns: u32, rng: &mut R) -> Self {
        let cells = (0..cell_count(rows, columns))
            .map(|_| CellState::from(rng.gen_bool(0.5)))
            .collect();
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Builds a grid from nested rows, rejecting rows of differing length.
    pub fn from_rows(rows: Vec<Vec<CellState>>) -> Result<Self, LifeError> {
        let expected = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(DimensionError::RaggedRows {
                row,
                expected,
                found,
            }
            .into());
        }

        let row_count = u32::try_from(rows.len());
        let column_count = u32::try_from(expected);
        let (Ok(row_count), Ok(column_count)) = (row_count, column_count) else {
            return Err(DimensionError::TooLarge {
                rows: rows.len() as u64,
                columns: expected as u64,
            }
            .into());
        };

        Ok(Self {
            rows: row_count,
            columns: column_count,
            cells: rows.into_iter().flatten().collect(),
        })
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

    /// Provides the `(rows, columns)` dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Reports whether the grid holds no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat row-major view of every cell.
    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Returns the state of the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Overwrites the provided cell, returning its previous state.
    ///
    /// Returns `None` and leaves the grid unchanged when the cell lies outside.
    pub fn set(&mut self, cell: CellCoord, state: CellState) -> Option<CellState> {
        let index = self.index(cell)?;
        let slot = self.cells.get_mut(index)?;
        Some(std::mem::replace(slot, state))
    }

    /// Iterates over the rows of the grid from top to bottom.
    pub fn iter_rows(
        &self,
    ) -> impl DoubleEndedIterator<Item = &[CellState]> + ExactSizeIterator + '_ {
        let width = self.columns as usize;
        (0..self.rows as usize).map(move |row| &self.cells[row * width..(row + 1) * width])
    }

    /// Counts live cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Embeds the grid centered inside a larger all-dead grid.
    ///
    /// When the padding on an axis is odd the extra row or column goes to the
    /// end (bottom or right).
    pub fn center(&self, rows: u32, columns: u32) -> Result<Self, LifeError> {
        self.ensure_fits(rows, columns)?;
        let row_offset = (rows - self.rows) / 2;
        let column_offset = (columns - self.columns) / 2;
        Ok(self.embed(rows, columns, row_offset, column_offset))
    }

    /// Grows the grid by appending dead rows at the bottom and dead columns on the right.
    pub fn resize_from_end(&self, rows: u32, columns: u32) -> Result<Self, LifeError> {
        self.ensure_fits(rows, columns)?;
        Ok(self.embed(rows, columns, 0, 0))
    }

    /// Grows the grid by prepending dead rows at the top and dead columns on the left.
    pub fn resize_from_start(&self, rows: u32, columns: u32) -> Result<Self, LifeError> {
        self.ensure_fits(rows, columns)?;
        Ok(self.embed(rows, columns, rows - self.rows, columns - self.columns))
    }

    /// Copies the `rows x columns` window anchored at `origin`.
    ///
    /// Returns `None` when the window does not fit inside the grid.
    #[must_use]
    pub fn window(&self, origin: CellCoord, rows: u32, columns: u32) -> Option<Self> {
        let row_end = origin.row().checked_add(rows)?;
        let column_end = origin.column().checked_add(columns)?;
        if row_end > self.rows || column_end > self.columns {
            return None;
        }

        let start = origin.column() as usize;
        let end = column_end as usize;
        let cells = self
            .iter_rows()
            .skip(origin.row() as usize)
            .take(rows as usize)
            .flat_map(|row| row[start..end].iter().copied())
            .collect();
        Some(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Standard matrix transpose.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut transposed = Self::zeros(self.columns, self.rows);
        let height = self.rows as usize;
        for (row_index, row) in self.iter_rows().enumerate() {
            for (column_index, state) in row.iter().enumerate() {
                transposed.cells[column_index * height + row_index] = *state;
            }
        }
        transposed
    }

    /// Removes all-dead rows from the top and bottom.
    ///
    /// Empty rows between live rows are kept. A grid without live cells
    /// truncates to zero rows.
    #[must_use]
    pub fn truncate_empty_rows(&self) -> Self {
        let has_life = |row: &[CellState]| row.iter().any(|state| state.is_alive());
        let Some(first) = self.iter_rows().position(has_life) else {
            return Self::zeros(0, self.columns);
        };
        let last = self.iter_rows().rposition(has_life).unwrap_or(first);

        let width = self.columns as usize;
        let kept = last - first + 1;
        Self {
            rows: kept as u32,
            columns: self.columns,
            cells: self.cells[first * width..(last + 1) * width].to_vec(),
        }
    }

    /// Removes all-dead columns from the left and right.
    #[must_use]
    pub fn truncate_empty_columns(&self) -> Self {
        self.transpose().truncate_empty_rows().transpose()
    }

    fn ensure_fits(&self, rows: u32, columns: u32) -> Result<(), LifeError> {
        if rows < self.rows || columns < self.columns {
            return Err(DimensionError::TargetTooSmall {
                rows: self.rows,
                columns: self.columns,
                target_rows: rows,
                target_columns: columns,
            }
            .into());
        }
        Ok(())
    }

    fn embed(&self, rows: u32, columns: u32, row_offset: u32, column_offset: u32) -> Self {
        let mut canvas = Self::zeros(rows, columns);
        let width = columns as usize;
        for (row_index, row) in self.iter_rows().enumerate() {
            let start = (row_offset as usize + row_index) * width + column_offset as usize;
            canvas.cells[start..start + row.len()].copy_from_slice(row);
        }
        canvas
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() < self.rows && cell.column() < self.columns {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for state in row {
                write!(f, "{}", state.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the row-string pattern format: one string per row, one `'0'` or
/// `'1'` character per column.
pub fn rows_to_grid<S: AsRef<str>>(rows: &[S]) -> Result<Grid, LifeError> {
    let mut expected: Option<usize> = None;
    let mut parsed = Vec::with_capacity(rows.len());

    for (row_index, row) in rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(row.as_ref().len());
        for (column, found) in row.as_ref().chars().enumerate() {
            let state =
                CellState::from_char(found).ok_or(PatternFormatError::UnexpectedCharacter {
                    row: row_index,
                    column,
                    found,
                })?;
            cells.push(state);
        }

        match expected {
            None => expected = Some(cells.len()),
            Some(expected) if expected != cells.len() => {
                return Err(PatternFormatError::InconsistentLength {
                    row: row_index,
                    expected,
                    found: cells.len(),
                }
                .into());
            }
            Some(_) => {}
        }
        parsed.push(cells);
    }

    Grid::from_rows(parsed)
}

#[derive(Deserialize)]
struct GridParts {
    rows: u32,
    columns: u32,
    cells: Vec<CellState>,
}

impl TryFrom<GridParts> for Grid {
    type Error = DimensionError;

    fn try_from(parts: GridParts) -> Result<Self, Self::Error> {
        let GridParts {
            rows,
            columns,
            cells,
        } = parts;
        if cells.len() != cell_count(rows, columns) {
            return Err(DimensionError::CellCountMismatch {
                rows,
                columns,
                found: cells.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }
}

fn cell_count(rows: u32, columns: u32) -> usize {
    rows as usize * columns as usize
}
