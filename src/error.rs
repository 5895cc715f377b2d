use crate::grids::Coord;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("invalid grid dimensions {width}x{height}, both must be within {min}..={max}")]
    InvalidDimension {
        width: usize,
        height: usize,
        min: usize,
        max: usize,
    },

    /// Asked the random source to choose among zero candidates.
    #[error("cannot choose uniformly from an empty range")]
    EmptyRange,

    #[error("cells {from} and {to} are not adjacent")]
    NotAdjacent { from: Coord, to: Coord },

    #[error("cell {cell} is outside the grid")]
    OutOfBounds { cell: Coord },

    #[error("unknown generator '{0}', expected one of: dfs, wilson, sidewinder, division")]
    UnknownGenerator(String),
}
