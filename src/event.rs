use crate::generators::division::{Chamber, Orientation};
use crate::grids::{Coord, Direction};

/// Logical tag a driver can use to highlight a cell mid-generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Head of the carving cursor, or a member of an open Sidewinder run.
    Visiting,
    /// Popped off the DFS stack.
    Backtracking,
    /// Body of a Wilson walk.
    PathForming,
    /// Head of a Wilson walk.
    PathCurrent,
    /// Dropped from a Wilson walk by loop erasure.
    Erased,
}

/// One logical change made by a generator. Carries no rendering data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    CellVisited {
        cell: Coord,
    },
    WallRemoved {
        from: Coord,
        to: Coord,
        direction: Direction,
    },
    WallAdded {
        from: Coord,
        to: Coord,
        direction: Direction,
    },
    CellStateChanged {
        cell: Coord,
        state: CellState,
    },
    ChamberSplit {
        chamber: Chamber,
        orientation: Orientation,
        passage: Coord,
    },
    RowCompleted {
        row: usize,
    },
    GenerationComplete,
}

impl StepEvent {
    pub fn is_complete(&self) -> bool {
        matches!(self, StepEvent::GenerationComplete)
    }
}
