#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state management for Lifeline.
//!
//! A [`Simulation`] owns the current generation, the start baseline and the
//! history stack. Adapters mutate it exclusively through [`apply`] and read it
//! through the [`query`] module.

use std::mem;

use lifeline_core::{
    CellCoord, CellState, Command, DimensionError, Event, Grid, LifeError, ReplaceReason, Topology,
};
use lifeline_system_transition::next_generation;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

const DEFAULT_RNG_SEED: u64 = 0x5eed_11fe_c0ff_ee00;

/// Describes how the first generation of a simulation is filled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GridSeed {
    /// Every cell is alive with probability one half.
    #[default]
    Random,
    /// Every cell starts dead.
    Zeros,
    /// The provided pattern is centered in the buffer.
    Pattern(Grid),
}

/// Parameters required to construct a [`Simulation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    rows: u32,
    columns: u32,
    topology: Topology,
    padding: u32,
    seed: GridSeed,
    rng_seed: u64,
}

impl SimulationConfig {
    /// Creates a bounded, unpadded, randomly seeded configuration.
    #[must_use]
    pub fn new(rows: u32, columns: u32) -> Self {
        Self {
            rows,
            columns,
            topology: Topology::Bounded,
            padding: 0,
            seed: GridSeed::Random,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }

    /// Overrides the topology used when stepping forward.
    #[must_use]
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Adds a hidden margin of `padding` cells around the visible window.
    ///
    /// The margin takes part in transitions but cannot be addressed, which
    /// approximates an unbounded plane without wrapping.
    #[must_use]
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Overrides how the first generation is filled.
    #[must_use]
    pub fn with_seed(mut self, seed: GridSeed) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the seed of the random number generator used for random fills.
    #[must_use]
    pub fn with_rng_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }
}

/// Represents the authoritative Lifeline simulation state.
#[derive(Debug)]
pub struct Simulation {
    row_count: u32,
    col_count: u32,
    padding: u32,
    topology: Topology,
    cells: Grid,
    start_cells: Grid,
    next_cells: Option<Grid>,
    history: Vec<Grid>,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Creates a simulation at step zero with an empty history.
    pub fn new(config: SimulationConfig) -> Result<Self, LifeError> {
        let SimulationConfig {
            rows,
            columns,
            topology,
            padding,
            seed,
            rng_seed,
        } = config;

        if rows == 0 || columns == 0 {
            return Err(DimensionError::Empty.into());
        }
        let (buffer_rows, buffer_columns) = padded_dimensions(rows, columns, padding)?;

        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
        let cells = match seed {
            GridSeed::Random => Grid::random(buffer_rows, buffer_columns, &mut rng),
            GridSeed::Zeros => Grid::zeros(buffer_rows, buffer_columns),
            GridSeed::Pattern(pattern) => pattern.center(buffer_rows, buffer_columns)?,
        };

        debug!(
            rows,
            columns,
            padding,
            ?topology,
            population = cells.population(),
            "simulation created"
        );

        Ok(Self {
            row_count: rows,
            col_count: columns,
            padding,
            topology,
            start_cells: cells.clone(),
            cells,
            next_cells: None,
            history: Vec::new(),
            rng,
        })
    }

    fn step(&self) -> u64 {
        self.history.len() as u64
    }

    fn buffer_dimensions(&self) -> (u32, u32) {
        self.cells.dimensions()
    }

    fn locate(&self, cell: CellCoord) -> Result<CellCoord, LifeError> {
        if cell.row() < self.row_count && cell.column() < self.col_count {
            Ok(cell.offset_by(self.padding))
        } else {
            Err(LifeError::OutOfRange {
                cell,
                rows: self.row_count,
                columns: self.col_count,
            })
        }
    }

    fn next_step(&mut self, out_events: &mut Vec<Event>) {
        let next = next_generation(&self.cells, self.topology);
        let archived = mem::replace(&mut self.cells, next);
        self.history.push(archived);
        self.next_cells = None;

        let step = self.step();
        trace!(step, "advanced");
        out_events.push(Event::StepAdvanced { step });
    }

    fn previous_step(&mut self, out_events: &mut Vec<Event>) {
        let Some(previous) = self.history.pop() else {
            return;
        };
        self.next_cells = Some(mem::replace(&mut self.cells, previous));

        let step = self.step();
        trace!(step, "rewound");
        out_events.push(Event::StepRewound { step });
    }

    fn go_to_step(&mut self, target: i64, out_events: &mut Vec<Event>) -> Result<(), LifeError> {
        let Ok(target) = u64::try_from(target) else {
            return Err(LifeError::InvalidStep { target });
        };

        let step = self.step();
        debug!(from = step, to = target, "navigating");
        if target > step {
            for _ in step..target {
                self.next_step(out_events);
            }
        } else {
            for _ in target..step {
                self.previous_step(out_events);
            }
        }
        Ok(())
    }

    fn set_cell_state(
        &mut self,
        cell: CellCoord,
        state: CellState,
        out_events: &mut Vec<Event>,
    ) -> Result<(), LifeError> {
        let inner = self.locate(cell)?;
        if self.cells.set(inner, state) != Some(state) {
            out_events.push(Event::CellChanged { cell, state });
        }
        Ok(())
    }

    fn flip_cell(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> Result<(), LifeError> {
        let inner = self.locate(cell)?;
        let state = self.cells.get(inner).unwrap_or_default().flipped();
        let _ = self.cells.set(inner, state);
        out_events.push(Event::CellChanged { cell, state });
        Ok(())
    }

    fn replace_cells(&mut self, cells: Grid, reason: ReplaceReason, out_events: &mut Vec<Event>) {
        self.cells = cells;
        self.discard_history();
        debug!(
            ?reason,
            population = self.cells.population(),
            "grid replaced"
        );
        out_events.push(Event::GridReplaced { reason });
    }

    fn set_as_start(&mut self, out_events: &mut Vec<Event>) {
        self.start_cells = self.cells.clone();
        // Past generations are not meaningful relative to a new baseline.
        self.discard_history();
        debug!(population = self.start_cells.population(), "start captured");
        out_events.push(Event::StartCaptured);
    }

    fn discard_history(&mut self) {
        self.history.clear();
        self.next_cells = None;
    }
}

/// Applies the provided command to the simulation.
///
/// Failing commands return an error before any state is touched, so the
/// simulation and `out_events` are left exactly as they were.
pub fn apply(
    simulation: &mut Simulation,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), LifeError> {
    match command {
        Command::NextStep => simulation.next_step(out_events),
        Command::PreviousStep => simulation.previous_step(out_events),
        Command::GoToStep { target } => simulation.go_to_step(target, out_events)?,
        Command::SetCellState { cell, state } => {
            simulation.set_cell_state(cell, state, out_events)?;
        }
        Command::FlipCell { cell } => simulation.flip_cell(cell, out_events)?,
        Command::Clear => {
            let (rows, columns) = simulation.buffer_dimensions();
            simulation.replace_cells(
                Grid::zeros(rows, columns),
                ReplaceReason::Cleared,
                out_events,
            );
        }
        Command::Reset => {
            let cells = simulation.start_cells.clone();
            simulation.replace_cells(cells, ReplaceReason::Reset, out_events);
        }
        Command::SetAsStart => simulation.set_as_start(out_events),
        Command::ChangePattern { grid } => {
            let (rows, columns) = simulation.buffer_dimensions();
            let centered = grid.center(rows, columns)?;
            simulation.replace_cells(centered, ReplaceReason::PatternChanged, out_events);
        }
        Command::Randomize => {
            let (rows, columns) = simulation.buffer_dimensions();
            let cells = Grid::random(rows, columns, &mut simulation.rng);
            simulation.replace_cells(cells, ReplaceReason::Randomized, out_events);
        }
    }
    Ok(())
}

/// Query functions that provide read-only access to the simulation state.
pub mod query {
    use lifeline_core::{CellCoord, CellState, Grid, LifeError, Topology};

    use super::Simulation;

    /// Number of visible rows.
    #[must_use]
    pub fn row_count(simulation: &Simulation) -> u32 {
        simulation.row_count
    }

    /// Number of visible columns.
    #[must_use]
    pub fn col_count(simulation: &Simulation) -> u32 {
        simulation.col_count
    }

    /// Hidden margin surrounding the visible window.
    #[must_use]
    pub fn padding(simulation: &Simulation) -> u32 {
        simulation.padding
    }

    /// Topology applied when stepping forward.
    #[must_use]
    pub fn topology(simulation: &Simulation) -> Topology {
        simulation.topology
    }

    /// Current step counter. Always equal to [`history_len`].
    #[must_use]
    pub fn step(simulation: &Simulation) -> u64 {
        simulation.step()
    }

    /// Number of archived generations.
    #[must_use]
    pub fn history_len(simulation: &Simulation) -> usize {
        simulation.history.len()
    }

    /// Archived generations, oldest first. Entry `n` holds the cells at step `n`.
    #[must_use]
    pub fn history(simulation: &Simulation) -> &[Grid] {
        &simulation.history
    }

    /// Current generation including any hidden margin.
    #[must_use]
    pub fn cells(simulation: &Simulation) -> &Grid {
        &simulation.cells
    }

    /// Start baseline restored by `Command::Reset`.
    #[must_use]
    pub fn start_cells(simulation: &Simulation) -> &Grid {
        &simulation.start_cells
    }

    /// Copy of the visible window of the current generation.
    #[must_use]
    pub fn visible_grid(simulation: &Simulation) -> Grid {
        simulation
            .cells
            .window(
                CellCoord::new(simulation.padding, simulation.padding),
                simulation.row_count,
                simulation.col_count,
            )
            .unwrap_or_else(|| Grid::zeros(simulation.row_count, simulation.col_count))
    }

    /// State of a visible cell in the current generation.
    pub fn cell_state(simulation: &Simulation, cell: CellCoord) -> Result<CellState, LifeError> {
        let inner = simulation.locate(cell)?;
        Ok(simulation.cells.get(inner).unwrap_or_default())
    }

    /// State of a visible cell one step earlier, or `None` at step zero.
    pub fn previous_cell_state(
        simulation: &Simulation,
        cell: CellCoord,
    ) -> Result<Option<CellState>, LifeError> {
        let inner = simulation.locate(cell)?;
        Ok(simulation
            .history
            .last()
            .and_then(|previous| previous.get(inner)))
    }

    /// State of a visible cell in the generation left by the latest backward
    /// step, or `None` when no backward step preceded the current state.
    pub fn next_cell_state(
        simulation: &Simulation,
        cell: CellCoord,
    ) -> Result<Option<CellState>, LifeError> {
        let inner = simulation.locate(cell)?;
        Ok(simulation
            .next_cells
            .as_ref()
            .and_then(|next| next.get(inner)))
    }

    /// Visible cells whose state differs from the previous generation.
    ///
    /// Every visible cell is reported at step zero, since there is nothing to
    /// diff against and a renderer must draw the whole window.
    #[must_use]
    pub fn cells_changed_from_previous(simulation: &Simulation) -> Vec<CellCoord> {
        changed_cells(simulation, simulation.history.last())
    }

    /// Visible cells whose state differs from the generation left by the
    /// latest backward step. Every visible cell is reported when there is none.
    #[must_use]
    pub fn cells_changed_from_next(simulation: &Simulation) -> Vec<CellCoord> {
        changed_cells(simulation, simulation.next_cells.as_ref())
    }

    fn changed_cells(simulation: &Simulation, baseline: Option<&Grid>) -> Vec<CellCoord> {
        let mut changed = Vec::new();
        for row in 0..simulation.row_count {
            for column in 0..simulation.col_count {
                let cell = CellCoord::new(row, column);
                let inner = cell.offset_by(simulation.padding);
                let current = simulation.cells.get(inner);
                if baseline.and_then(|grid| grid.get(inner)) != current {
                    changed.push(cell);
                }
            }
        }
        changed
    }
}

fn padded_dimensions(rows: u32, columns: u32, padding: u32) -> Result<(u32, u32), LifeError> {
    let margin = padding.checked_mul(2);
    let padded_rows = margin.and_then(|margin| rows.checked_add(margin));
    let padded_columns = margin.and_then(|margin| columns.checked_add(margin));
    match (padded_rows, padded_columns) {
        (Some(rows), Some(columns)) => Ok((rows, columns)),
        _ => Err(DimensionError::TooLarge {
            rows: u64::from(rows) + 2 * u64::from(padding),
            columns: u64::from(columns) + 2 * u64::from(padding),
        }
        .into()),
    }
}
