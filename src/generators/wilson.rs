//! Wilson's algorithm: loop-erased random walks grafted onto a growing tree.
//!
//! One random cell seeds the maze. Every later walk starts at a random cell
//! outside the maze and wanders until it touches the maze; whenever the walk
//! crosses itself the loop is erased, so only a self-avoiding path is ever
//! carved. With [`WalkPolicy::Uniform`] the finished maze is a uniformly
//! sampled spanning tree.

use std::collections::HashMap;

use log::debug;

use crate::event::{CellState, StepEvent};
use crate::generators::{pick, EventQueue, Generator, GeneratorKind};
use crate::grids::wall_grid::WallGrid;
use crate::grids::{Coord, Direction, DirectionMask};
use crate::random::{RandomSource, SeededRandom};

/// How the next cell of a walk is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkPolicy {
    /// Any in-bounds neighbour, uniformly.
    Uniform,
    /// Neighbours not already on the walk, falling back to any neighbour when
    /// every one of them is on the walk. Biased: the resulting trees are no
    /// longer uniformly distributed.
    AvoidPath,
}

impl Default for WalkPolicy {
    fn default() -> Self {
        WalkPolicy::Uniform
    }
}

/// A self-avoiding path kept self-avoiding by erasing loops.
#[derive(Debug, Clone, Default)]
pub struct Walk {
    cells: Vec<Coord>,
    positions: HashMap<Coord, usize>,
}

impl Walk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, cell: Coord) {
        self.clear();
        self.push(cell);
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.positions.clear();
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn head(&self) -> Option<Coord> {
        self.cells.last().copied()
    }

    pub fn contains(&self, cell: Coord) -> bool {
        self.positions.contains_key(&cell)
    }

    pub fn position(&self, cell: Coord) -> Option<usize> {
        self.positions.get(&cell).copied()
    }

    /// Moves the head to `next`. When `next` is already on the walk the loop
    /// it closes is erased and the erased cells are returned, oldest first.
    pub fn advance(&mut self, next: Coord) -> Vec<Coord> {
        if self.contains(next) {
            self.erase_loop_to(next)
        } else {
            self.push(next);
            Vec::new()
        }
    }

    /// Truncates the walk so that `cell` becomes its head.
    pub fn erase_loop_to(&mut self, cell: Coord) -> Vec<Coord> {
        let index = match self.position(cell) {
            Some(index) => index,
            None => return Vec::new(),
        };
        let erased = self.cells.split_off(index + 1);
        for gone in erased.iter() {
            self.positions.remove(gone);
        }
        erased
    }

    fn push(&mut self, cell: Coord) {
        debug_assert!(!self.contains(cell));
        self.positions.insert(cell, self.cells.len());
        self.cells.push(cell);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Seed,
    StartWalk,
    Walking,
    Carving { index: usize },
    Finished,
}

pub struct WilsonGenerator<R = SeededRandom> {
    grid: WallGrid,
    rng: R,
    policy: WalkPolicy,
    unvisited: Vec<Coord>,
    walk: Walk,
    phase: Phase,
    walks: usize,
    events: EventQueue,
}

impl<R: RandomSource> WilsonGenerator<R> {
    pub fn new(grid: WallGrid, rng: R) -> Self {
        Self::with_policy(grid, rng, WalkPolicy::default())
    }

    pub fn with_policy(mut grid: WallGrid, rng: R, policy: WalkPolicy) -> Self {
        grid.reset();
        Self {
            unvisited: grid.coords().collect(),
            grid,
            rng,
            policy,
            walk: Walk::new(),
            phase: Phase::Seed,
            walks: 0,
            events: EventQueue::new(),
        }
    }

    pub fn policy(&self) -> WalkPolicy {
        self.policy
    }

    pub fn walk(&self) -> &Walk {
        &self.walk
    }

    pub fn unvisited(&self) -> &[Coord] {
        &self.unvisited
    }

    fn take_unvisited(&mut self, cell: Coord) {
        if let Some(index) = self.unvisited.iter().position(|c| *c == cell) {
            self.unvisited.swap_remove(index);
        }
    }

    fn candidates(&self, head: Coord) -> Vec<(Coord, Direction)> {
        let all: Vec<(Coord, Direction)> = self.grid.neighbors(head, DirectionMask::ALL).collect();
        match self.policy {
            WalkPolicy::Uniform => all,
            WalkPolicy::AvoidPath => {
                let off_walk: Vec<(Coord, Direction)> = all
                    .iter()
                    .copied()
                    .filter(|(cell, _)| !self.walk.contains(*cell))
                    .collect();
                if off_walk.is_empty() {
                    all
                } else {
                    off_walk
                }
            }
        }
    }

    fn seed(&mut self) {
        let index = pick(&mut self.rng, self.unvisited.len());
        let cell = self.unvisited.swap_remove(index);
        debug!("wilson seeded the maze at {}", cell);
        self.grid.set_visited(cell, true);
        self.events.push(StepEvent::CellVisited { cell });
        self.phase = Phase::StartWalk;
    }

    fn start_walk(&mut self) {
        if self.unvisited.is_empty() {
            self.phase = Phase::Finished;
            self.finish();
            return;
        }
        let cell = self.unvisited[pick(&mut self.rng, self.unvisited.len())];
        self.walks += 1;
        self.walk.start(cell);
        self.grid.cell_mut(cell).in_walk = true;
        self.events.push(StepEvent::CellStateChanged {
            cell,
            state: CellState::PathCurrent,
        });
        self.phase = Phase::Walking;
    }

    fn walk_once(&mut self) {
        let head = match self.walk.head() {
            Some(head) => head,
            None => unreachable!("walking without a walk"),
        };

        let candidates = self.candidates(head);
        let (next, dir) = candidates[pick(&mut self.rng, candidates.len())];
        self.grid.cell_mut(head).walk_direction = Some(dir);

        if self.grid.is_visited(next) {
            // struck the maze, graft the walk onto it
            self.events.push(StepEvent::CellStateChanged {
                cell: head,
                state: CellState::PathForming,
            });
            self.phase = Phase::Carving { index: 0 };
            return;
        }

        let erased = self.walk.advance(next);
        if erased.is_empty() {
            self.grid.cell_mut(next).in_walk = true;
            self.events.push(StepEvent::CellStateChanged {
                cell: head,
                state: CellState::PathForming,
            });
        } else {
            for cell in erased {
                let flags = self.grid.cell_mut(cell);
                flags.in_walk = false;
                flags.walk_direction = None;
                self.events.push(StepEvent::CellStateChanged {
                    cell,
                    state: CellState::Erased,
                });
            }
        }
        self.events.push(StepEvent::CellStateChanged {
            cell: next,
            state: CellState::PathCurrent,
        });
    }

    fn carve(&mut self, index: usize) {
        let cell = self.walk.cells()[index];
        let dir = match self.grid.cell(cell).walk_direction {
            Some(dir) => dir,
            None => unreachable!("walk cell {} has no exit", cell),
        };

        let removed = self.grid.remove_wall(cell, dir);
        self.events.push_some(removed);

        let flags = self.grid.cell_mut(cell);
        flags.visited = true;
        flags.in_walk = false;
        flags.walk_direction = None;
        self.take_unvisited(cell);
        self.events.push(StepEvent::CellVisited { cell });

        if index + 1 < self.walk.len() {
            self.phase = Phase::Carving { index: index + 1 };
        } else {
            self.walk.clear();
            self.phase = Phase::StartWalk;
        }
    }

    fn finish(&mut self) {
        debug!(
            "wilson finished after {} walks and {} events",
            self.walks,
            self.events.emitted()
        );
        self.events.complete();
    }
}

impl<R: RandomSource> Generator for WilsonGenerator<R> {
    fn step_generation(&mut self) {
        match self.phase {
            Phase::Seed => self.seed(),
            Phase::StartWalk => self.start_walk(),
            Phase::Walking => self.walk_once(),
            Phase::Carving { index } => self.carve(index),
            Phase::Finished => self.finish(),
        }
    }

    fn events(&self) -> &EventQueue {
        &self.events
    }

    fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Wilson
    }

    fn grid(&self) -> &WallGrid {
        &self.grid
    }

    fn into_grid(self: Box<Self>) -> WallGrid {
        self.grid
    }
}
