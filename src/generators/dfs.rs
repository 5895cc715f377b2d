use log::debug;

use crate::event::{CellState, StepEvent};
use crate::generators::{pick, EventQueue, Generator, GeneratorKind};
use crate::grids::wall_grid::WallGrid;
use crate::grids::{Coord, Direction, DirectionMask};
use crate::random::{RandomSource, SeededRandom};

/// Recursive backtracker driven by an explicit stack.
pub struct DfsGenerator<R = SeededRandom> {
    grid: WallGrid,
    rng: R,
    stack: Vec<Coord>,
    current: Option<Coord>,
    visited: usize,
    events: EventQueue,
}

impl<R: RandomSource> DfsGenerator<R> {
    pub fn new(mut grid: WallGrid, rng: R) -> Self {
        grid.reset();
        Self {
            stack: Vec::with_capacity(grid.dims.cell_count()),
            grid,
            rng,
            current: None,
            visited: 0,
            events: EventQueue::new(),
        }
    }

    pub fn stack(&self) -> &[Coord] {
        &self.stack
    }

    pub fn current(&self) -> Option<Coord> {
        self.current
    }

    fn visit(&mut self, coord: Coord) {
        self.grid.set_visited(coord, true);
        self.visited += 1;
        self.stack.push(coord);
        self.current = Some(coord);
        self.events.push(StepEvent::CellVisited { cell: coord });
        self.events.push(StepEvent::CellStateChanged {
            cell: coord,
            state: CellState::Visiting,
        });
    }

    fn unvisited_neighbors(&self, coord: Coord) -> Vec<(Coord, Direction)> {
        self.grid
            .neighbors(coord, DirectionMask::ALL)
            .filter(|(neighbor, _)| !self.grid.is_visited(*neighbor))
            .collect()
    }
}

impl<R: RandomSource> Generator for DfsGenerator<R> {
    fn step_generation(&mut self) {
        let current = match self.current {
            Some(current) => current,
            None => {
                let index = pick(&mut self.rng, self.grid.dims.cell_count());
                let start = self.grid.coord_of(index);
                debug!("dfs starting at {}", start);
                self.visit(start);
                return;
            }
        };

        let total = self.grid.dims.cell_count();
        if self.visited >= total && self.stack.is_empty() {
            debug!("dfs finished after {} events", self.events.emitted());
            self.events.complete();
            return;
        }

        let candidates = self.unvisited_neighbors(current);
        if !candidates.is_empty() {
            let (next, dir) = candidates[pick(&mut self.rng, candidates.len())];
            let removed = self.grid.remove_wall(current, dir);
            self.events.push_some(removed);
            self.visit(next);
        } else {
            match self.stack.pop() {
                Some(previous) => {
                    self.current = Some(previous);
                    self.events.push(StepEvent::CellStateChanged {
                        cell: previous,
                        state: CellState::Backtracking,
                    });
                }
                None => self.events.complete(),
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
        GeneratorKind::Dfs
    }

    fn grid(&self) -> &WallGrid {
        &self.grid
    }

    fn into_grid(self: Box<Self>) -> WallGrid {
        self.grid
    }
}
