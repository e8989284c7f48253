#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure transition engine applying Conway's Game of Life rules.
//!
//! The engine never mutates its input: callers may keep the previous
//! generation around (the world archives it in history) while the next one is
//! computed into a fresh buffer.

use lifeline_core::{CellCoord, CellState, Grid, Topology};

/// Relative offsets of the eight cells surrounding a cell.
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Computes the generation that follows `grid` under the provided topology.
#[must_use]
pub fn next_generation(grid: &Grid, topology: Topology) -> Grid {
    let (rows, columns) = grid.dimensions();
    let mut next = Grid::zeros(rows, columns);
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(row, column);
            let current = grid.get(cell).unwrap_or_default();
            let state = transition_rule(current, live_neighbors(grid, cell, topology));
            if state.is_alive() {
                let _ = next.set(cell, state);
            }
        }
    }
    next
}

/// Applies [`next_generation`] `steps` times.
#[must_use]
pub fn run(grid: &Grid, topology: Topology, steps: u64) -> Grid {
    let mut current = grid.clone();
    for _ in 0..steps {
        current = next_generation(&current, topology);
    }
    current
}

/// Counts live cells among the eight neighbors of `cell`.
///
/// Under [`Topology::Bounded`] neighbors beyond the edge are skipped, so edge
/// and corner cells have fewer candidates. Under [`Topology::Toroidal`] both
/// axes wrap; on grids narrower than three cells the same neighbor may be
/// counted more than once.
#[must_use]
pub fn live_neighbors(grid: &Grid, cell: CellCoord, topology: Topology) -> u8 {
    let (rows, columns) = grid.dimensions();
    let count = NEIGHBOR_OFFSETS
        .iter()
        .filter_map(|&offset| neighbor(cell, offset, rows, columns, topology))
        .filter(|neighbor| grid.get(*neighbor) == Some(CellState::Alive))
        .count();
    count as u8
}

/// Conway's rule: survival on two or three neighbors, birth on exactly three.
#[must_use]
pub const fn transition_rule(state: CellState, live_neighbors: u8) -> CellState {
    match (state, live_neighbors) {
        (CellState::Alive, 2 | 3) => CellState::Alive,
        (CellState::Dead, 3) => CellState::Alive,
        _ => CellState::Dead,
    }
}

/// Mathematical modulus mapping `value` into `0..modulus`.
///
/// Unlike `%`, negative inputs wrap to the far end: `wrap(-1, 5) == 4`.
/// A zero modulus yields zero.
#[must_use]
pub fn wrap(value: i64, modulus: u32) -> u32 {
    if modulus == 0 {
        return 0;
    }
    value.rem_euclid(i64::from(modulus)) as u32
}

fn neighbor(
    cell: CellCoord,
    (row_offset, column_offset): (i64, i64),
    rows: u32,
    columns: u32,
    topology: Topology,
) -> Option<CellCoord> {
    let row = i64::from(cell.row()) + row_offset;
    let column = i64::from(cell.column()) + column_offset;
    match topology {
        Topology::Bounded => {
            let row = u32::try_from(row).ok().filter(|row| *row < rows)?;
            let column = u32::try_from(column).ok().filter(|column| *column < columns)?;
            Some(CellCoord::new(row, column))
        }
        Topology::Toroidal => Some(CellCoord::new(wrap(row, rows), wrap(column, columns))),
    }
}
