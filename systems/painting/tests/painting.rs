use lifeline_core::{rows_to_grid, CellCoord, CellState, Command, Event};
use lifeline_system_painting::{PaintButton, PaintInput, Painter};
use lifeline_world::{self as world, query, GridSeed, Simulation, SimulationConfig};

fn simulation(rows: &[&str]) -> Simulation {
    let grid = rows_to_grid(rows).expect("valid pattern");
    let (row_count, col_count) = grid.dimensions();
    Simulation::new(
        SimulationConfig::new(row_count, col_count).with_seed(GridSeed::Pattern(grid)),
    )
    .expect("valid configuration")
}

fn feed(painter: &mut Painter, simulation: &mut Simulation, input: PaintInput) -> Vec<Command> {
    let mut commands = Vec::new();
    painter.handle(
        input,
        |cell| query::cell_state(simulation, cell).ok(),
        &mut commands,
    );

    let mut events = Vec::new();
    for command in commands.iter().cloned() {
        world::apply(simulation, command, &mut events).expect("painting command applies");
    }
    commands
}

fn press(button: PaintButton, row: u32, column: u32) -> PaintInput {
    PaintInput::Press {
        button,
        cell: Some(CellCoord::new(row, column)),
    }
}

fn drag(row: u32, column: u32) -> PaintInput {
    PaintInput::Drag {
        cell: Some(CellCoord::new(row, column)),
    }
}

#[test]
fn primary_press_flips_the_cell_under_the_pointer() {
    let mut simulation = simulation(&["000", "010", "000"]);
    let mut painter = Painter::new();

    let commands = feed(
        &mut painter,
        &mut simulation,
        press(PaintButton::Primary, 1, 1),
    );

    assert_eq!(
        commands,
        vec![Command::FlipCell {
            cell: CellCoord::new(1, 1)
        }]
    );
    assert_eq!(
        query::cell_state(&simulation, CellCoord::new(1, 1)),
        Ok(CellState::Dead)
    );
    assert_eq!(
        painter.visited().get(CellCoord::new(1, 1)),
        Some(CellState::Dead)
    );
}

#[test]
fn primary_drag_paints_live_cells_once_per_gesture() {
    let mut simulation = simulation(&["000", "000", "000"]);
    let mut painter = Painter::new();

    let _ = feed(
        &mut painter,
        &mut simulation,
        press(PaintButton::Primary, 0, 0),
    );
    let first = feed(&mut painter, &mut simulation, drag(0, 1));
    let revisit = feed(&mut painter, &mut simulation, drag(0, 1));
    let back_to_start = feed(&mut painter, &mut simulation, drag(0, 0));

    assert_eq!(first.len(), 1);
    assert!(revisit.is_empty(), "visited cells are not repainted");
    assert!(back_to_start.is_empty(), "the pressed cell counts as visited");
    assert_eq!(
        query::visible_grid(&simulation),
        rows_to_grid(&["110", "000", "000"]).expect("valid pattern")
    );
}

#[test]
fn drag_skips_cells_already_in_the_brush_state() {
    let mut simulation = simulation(&["000", "011", "000"]);
    let mut painter = Painter::new();

    let _ = feed(
        &mut painter,
        &mut simulation,
        press(PaintButton::Primary, 1, 0),
    );
    let commands = feed(&mut painter, &mut simulation, drag(1, 1));

    assert!(commands.is_empty());
    assert!(painter.visited().contains(CellCoord::new(1, 1)));
}

#[test]
fn secondary_gesture_erases_cells() {
    let mut simulation = simulation(&["111", "111", "111"]);
    let mut painter = Painter::new();

    let _ = feed(
        &mut painter,
        &mut simulation,
        press(PaintButton::Secondary, 0, 0),
    );
    for column in 1..3 {
        let _ = feed(&mut painter, &mut simulation, drag(0, column));
    }

    assert_eq!(
        query::visible_grid(&simulation),
        rows_to_grid(&["000", "111", "111"]).expect("valid pattern")
    );
}

#[test]
fn secondary_press_on_a_dead_cell_changes_nothing() {
    let mut simulation = simulation(&["000", "000", "000"]);
    let mut painter = Painter::new();
    let mut events = Vec::new();
    let mut commands = Vec::new();

    painter.handle(
        press(PaintButton::Secondary, 2, 2),
        |cell| query::cell_state(&simulation, cell).ok(),
        &mut commands,
    );
    for command in commands {
        world::apply(&mut simulation, command, &mut events).expect("command applies");
    }

    assert!(events.is_empty(), "setting a cell to its own state is silent");
    assert_eq!(query::visible_grid(&simulation).population(), 0);
}

#[test]
fn release_and_leave_end_the_gesture() {
    let mut simulation = simulation(&["000", "000", "000"]);
    let mut painter = Painter::new();

    let _ = feed(
        &mut painter,
        &mut simulation,
        press(PaintButton::Primary, 0, 0),
    );
    let _ = feed(&mut painter, &mut simulation, PaintInput::Release);
    assert!(!painter.is_painting());
    assert!(painter.visited().is_empty());
    assert!(feed(&mut painter, &mut simulation, drag(2, 2)).is_empty());

    let _ = feed(
        &mut painter,
        &mut simulation,
        press(PaintButton::Primary, 0, 0),
    );
    let _ = feed(&mut painter, &mut simulation, PaintInput::Leave);
    assert!(!painter.is_painting());
    assert!(feed(&mut painter, &mut simulation, drag(2, 2)).is_empty());
}

#[test]
fn a_new_press_restarts_the_visited_set() {
    let mut simulation = simulation(&["000", "000", "000"]);
    let mut painter = Painter::new();

    let _ = feed(
        &mut painter,
        &mut simulation,
        press(PaintButton::Primary, 0, 0),
    );
    let _ = feed(&mut painter, &mut simulation, drag(1, 1));
    let _ = feed(&mut painter, &mut simulation, PaintInput::Release);
    let _ = feed(
        &mut painter,
        &mut simulation,
        press(PaintButton::Secondary, 2, 2),
    );
    let commands = feed(&mut painter, &mut simulation, drag(1, 1));

    assert_eq!(
        commands,
        vec![Command::SetCellState {
            cell: CellCoord::new(1, 1),
            state: CellState::Dead,
        }]
    );
    assert_eq!(painter.visited().len(), 2);
}

#[test]
fn dragging_outside_the_grid_is_ignored() {
    let mut simulation = simulation(&["000", "000", "000"]);
    let mut painter = Painter::new();

    let _ = feed(
        &mut painter,
        &mut simulation,
        press(PaintButton::Primary, 0, 0),
    );
    let commands = feed(&mut painter, &mut simulation, PaintInput::Drag { cell: None });

    assert!(commands.is_empty());
    assert!(painter.is_painting());
    assert!(world::apply(
        &mut simulation,
        Command::FlipCell {
            cell: CellCoord::new(3, 0)
        },
        &mut Vec::<Event>::new()
    )
    .is_err());
}

#[test]
fn dragging_onto_cells_the_world_rejects_emits_nothing() {
    let mut simulation = simulation(&["000", "000", "000"]);
    let mut painter = Painter::new();

    let _ = feed(
        &mut painter,
        &mut simulation,
        press(PaintButton::Primary, 2, 2),
    );
    let commands = feed(&mut painter, &mut simulation, drag(3, 2));

    assert!(commands.is_empty());
    assert!(!painter.visited().contains(CellCoord::new(3, 2)));
    assert_eq!(query::visible_grid(&simulation).population(), 1);
}
