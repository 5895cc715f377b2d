pub mod dfs;
pub mod division;
pub mod sidewinder;
pub mod wilson;

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};

use crate::error::MazeError;
use crate::event::StepEvent;
use crate::grids::wall_grid::WallGrid;
use crate::random::{RandomSource, SeededRandom};

use dfs::DfsGenerator;
use division::RecursiveDivisionGenerator;
use sidewinder::SidewinderGenerator;
use wilson::WilsonGenerator;

/// Resumable maze generation.
///
/// A generator owns its grid and random source and is advanced one logical
/// step at a time. Every step yields at least one [`StepEvent`]; the last
/// event of a run is always [`StepEvent::GenerationComplete`], after which
/// [`Generator::next_step`] keeps returning `None`.
pub trait Generator {
    /// Advances the state machine by one logical step, queueing its events.
    fn step_generation(&mut self);

    fn events(&self) -> &EventQueue;
    /// Only the crate can push to or close the returned queue.
    #[doc(hidden)]
    fn events_mut(&mut self) -> &mut EventQueue;

    fn kind(&self) -> GeneratorKind;
    fn grid(&self) -> &WallGrid;
    fn into_grid(self: Box<Self>) -> WallGrid;

    fn next_step(&mut self) -> Option<StepEvent> {
        loop {
            if let Some(event) = self.events_mut().pop() {
                trace!("{:?}: {:?}", self.kind(), event);
                return Some(event);
            }
            if self.events().is_closed() {
                return None;
            }
            self.step_generation();
        }
    }

    fn generate_maze(&mut self) -> &WallGrid {
        while self.next_step().is_some() {}
        self.grid()
    }

    fn run_to_completion(mut self: Box<Self>) -> WallGrid {
        self.generate_maze();
        self.into_grid()
    }

    fn is_done(&self) -> bool {
        self.events().is_closed() && self.events().is_empty()
    }
}

/// Events produced by a step and not yet handed out.
///
/// Callers outside the crate can only read it.
#[derive(Debug)]
pub struct EventQueue {
    pending: VecDeque<StepEvent>,
    emitted: usize,
    closed: bool,
}

impl EventQueue {
    pub(crate) fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            emitted: 0,
            closed: false,
        }
    }

    pub(crate) fn push(&mut self, event: StepEvent) {
        debug_assert!(!self.closed, "event pushed after completion");
        self.pending.push_back(event);
    }

    pub(crate) fn push_some(&mut self, event: Option<StepEvent>) {
        if let Some(event) = event {
            self.push(event);
        }
    }

    pub(crate) fn pop(&mut self) -> Option<StepEvent> {
        let event = self.pending.pop_front()?;
        self.emitted += 1;
        Some(event)
    }

    /// Queues the final event. Later calls are ignored.
    pub(crate) fn complete(&mut self) {
        if !self.closed {
            self.pending.push_back(StepEvent::GenerationComplete);
            self.closed = true;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Events handed out so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

/// Pull-based iterator over the remaining events of a generator.
pub struct Steps<'a, G: ?Sized> {
    generator: &'a mut G,
}

pub fn steps<G: Generator + ?Sized>(generator: &mut G) -> Steps<'_, G> {
    Steps { generator }
}

impl<'a, G: Generator + ?Sized> Iterator for Steps<'a, G> {
    type Item = StepEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.generator.next_step()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum GeneratorKind {
    Dfs,
    Wilson,
    Sidewinder,
    Division,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 4] = [
        GeneratorKind::Dfs,
        GeneratorKind::Wilson,
        GeneratorKind::Sidewinder,
        GeneratorKind::Division,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GeneratorKind::Dfs => "dfs",
            GeneratorKind::Wilson => "wilson",
            GeneratorKind::Sidewinder => "sidewinder",
            GeneratorKind::Division => "division",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorKind {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        GeneratorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| MazeError::UnknownGenerator(s.to_string()))
    }
}

pub fn new_generator(kind: GeneratorKind, grid: WallGrid, seed: u64) -> Box<dyn Generator> {
    debug!(
        "new {} generator on a {}x{} grid, seed {}",
        kind,
        grid.width(),
        grid.height(),
        seed
    );
    let rng = SeededRandom::from_seed(seed);
    match kind {
        GeneratorKind::Dfs => Box::new(DfsGenerator::new(grid, rng)),
        GeneratorKind::Wilson => Box::new(WilsonGenerator::new(grid, rng)),
        GeneratorKind::Sidewinder => Box::new(SidewinderGenerator::new(grid, rng)),
        GeneratorKind::Division => Box::new(RecursiveDivisionGenerator::new(grid, rng)),
    }
}

/// Abandons `generator` wherever it is, resets its grid and starts over.
pub fn regenerate(
    generator: Box<dyn Generator>,
    kind: GeneratorKind,
    seed: u64,
) -> Box<dyn Generator> {
    let mut grid = generator.into_grid();
    grid.reset();
    new_generator(kind, grid, seed)
}

/// Uniform pick in `[0, n)`. Callers prove `n > 0`, an empty range here means
/// a generator broke its own invariants.
pub(crate) fn pick<R: RandomSource + ?Sized>(rng: &mut R, n: usize) -> usize {
    match rng.uniform(n) {
        Ok(index) => index,
        Err(err) => panic!("generator invariant violated: {}", err),
    }
}
