use log::debug;

use crate::event::{CellState, StepEvent};
use crate::generators::{pick, EventQueue, Generator, GeneratorKind};
use crate::grids::wall_grid::WallGrid;
use crate::grids::{Coord, Direction, DirectionMask};
use crate::random::{RandomSource, SeededRandom};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Carving the row with no Up neighbours as one corridor.
    BaseRow { x: usize },
    RowStart { y: usize },
    Run { x: usize, y: usize },
    Finished,
}

/// Row-by-row generator that only ever carves Right or Up.
///
/// The row without Up neighbours (`y = height - 1`) is carved first as a
/// single corridor and is never asked to carve up. Every other row, from
/// `height - 2` down to `0`, is split into runs; each run closes by opening
/// the Up wall of one of its cells into the already-carved row above.
pub struct SidewinderGenerator<R = SeededRandom> {
    grid: WallGrid,
    rng: R,
    run: Vec<Coord>,
    phase: Phase,
    events: EventQueue,
}

impl<R: RandomSource> SidewinderGenerator<R> {
    pub fn new(mut grid: WallGrid, rng: R) -> Self {
        grid.reset();
        Self {
            run: Vec::with_capacity(grid.width()),
            grid,
            rng,
            phase: Phase::BaseRow { x: 0 },
            events: EventQueue::new(),
        }
    }

    /// Cells of the current row still waiting for an upward connection.
    pub fn run(&self) -> &[Coord] {
        &self.run
    }

    fn base_row(&mut self, x: usize) {
        let y = self.grid.height() - 1;
        let cell = Coord::new(x, y);
        self.grid.set_visited(cell, true);
        self.events.push(StepEvent::CellVisited { cell });

        if x + 1 < self.grid.width() {
            let removed = self.grid.remove_wall(cell, Direction::Right);
            self.events.push_some(removed);
            self.phase = Phase::BaseRow { x: x + 1 };
        } else {
            self.end_row(y);
        }
    }

    fn start_run(&mut self, cell: Coord) {
        self.run.push(cell);
        self.events.push(StepEvent::CellStateChanged {
            cell,
            state: CellState::Visiting,
        });
        self.phase = Phase::Run {
            x: cell.x,
            y: cell.y,
        };
    }

    fn advance_run(&mut self, x: usize, y: usize) {
        let cell = Coord::new(x, y);
        // Up first, then Right when not in the last column
        let options: Vec<(Coord, Direction)> =
            self.grid.neighbors(cell, DirectionMask::UP_RIGHT).collect();

        let carve_right = if options.is_empty() {
            false
        } else {
            options[pick(&mut self.rng, options.len())].1 == Direction::Right
        };

        if carve_right {
            let removed = self.grid.remove_wall(cell, Direction::Right);
            self.events.push_some(removed);
            self.start_run(Coord::new(x + 1, y));
        } else {
            self.close_run();
            if x + 1 < self.grid.width() {
                self.start_run(Coord::new(x + 1, y));
            } else {
                self.end_row(y);
            }
        }
    }

    /// Opens one random cell of the run upwards and commits the whole run.
    fn close_run(&mut self) {
        let member = self.run[pick(&mut self.rng, self.run.len())];
        // guarded: a run on the base row has no Up neighbour and carves nothing
        let removed = self.grid.remove_wall(member, Direction::Up);
        self.events.push_some(removed);

        for cell in self.run.drain(..) {
            self.grid.set_visited(cell, true);
            self.events.push(StepEvent::CellVisited { cell });
        }
    }

    fn end_row(&mut self, y: usize) {
        self.events.push(StepEvent::RowCompleted { row: y });
        self.phase = if y == 0 {
            Phase::Finished
        } else {
            Phase::RowStart { y: y - 1 }
        };
    }
}

impl<R: RandomSource> Generator for SidewinderGenerator<R> {
    fn step_generation(&mut self) {
        match self.phase {
            Phase::BaseRow { x } => self.base_row(x),
            Phase::RowStart { y } => self.start_run(Coord::new(0, y)),
            Phase::Run { x, y } => self.advance_run(x, y),
            Phase::Finished => {
                debug!("sidewinder finished after {} events", self.events.emitted());
                self.events.complete();
            }
        }
    }

    fn events(&self) -> &EventQueue {
        &self.events
    }

    fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Sidewinder
    }

    fn grid(&self) -> &WallGrid {
        &self.grid
    }

    fn into_grid(self: Box<Self>) -> WallGrid {
        self.grid
    }
}
