//! Perfect maze generation with four classic algorithms, each exposed as a
//! resumable sequence of [`StepEvent`]s so a driver can animate the carving
//! or run it to completion.

pub mod error;
pub mod event;
pub mod generators;
pub mod grids;
pub mod random;

pub use error::MazeError;
pub use event::{CellState, StepEvent};
pub use generators::dfs::DfsGenerator;
pub use generators::division::{Chamber, Orientation, RecursiveDivisionGenerator};
pub use generators::sidewinder::SidewinderGenerator;
pub use generators::wilson::{WalkPolicy, WilsonGenerator};
pub use generators::{new_generator, regenerate, steps, Generator, GeneratorKind};
pub use grids::wall_grid::WallGrid;
pub use grids::{Coord, Direction, DirectionMask, MAX_DIMENSION, MIN_DIMENSION};
pub use random::{RandomSource, SeededRandom};
