pub mod wall_grid;

use std::fmt;

pub const MIN_DIMENSION: usize = 2;
pub const MAX_DIMENSION: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Number of wall slots between two cells, boundary excluded.
    pub fn internal_wall_count(&self) -> usize {
        2 * self.width * self.height - self.width - self.height
    }

    #[inline]
    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}

/// Position of a cell, `x` grows to the right and `y` grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Direction leading from `self` to `other` when they are 4-adjacent.
    pub fn direction_to(&self, other: Coord) -> Option<Direction> {
        let dx = other.x as isize - self.x as isize;
        let dy = other.y as isize - self.y as isize;
        Direction::ALL.iter().copied().find(|dir| dir.delta() == (dx, dy))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// Neighbour enumeration order used everywhere in the crate.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        -self
    }

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[inline]
    pub(crate) fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl std::ops::Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Self::Output {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl From<usize> for Direction {
    fn from(dir: usize) -> Self {
        match dir {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            3 => Direction::Right,
            _ => unreachable!(),
        }
    }
}

/// Subset of directions a neighbour lookup is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionMask(u8);

impl DirectionMask {
    pub const ALL: DirectionMask = DirectionMask(0b1111);
    pub const UP_RIGHT: DirectionMask = DirectionMask(0b1001);

    pub fn only(directions: &[Direction]) -> Self {
        DirectionMask(directions.iter().fold(0, |acc, dir| acc | dir.bit()))
    }

    pub fn allows(&self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }
}

/// In-bounds neighbours of one cell, iterated Up, Down, Left, Right.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood {
    pub up: Option<Coord>,
    pub down: Option<Coord>,
    pub left: Option<Coord>,
    pub right: Option<Coord>,

    counter: usize,
}

impl Neighborhood {
    pub fn new() -> Self {
        Self {
            up: None,
            down: None,
            left: None,
            right: None,
            counter: 0,
        }
    }

    pub fn get(&self, dir: Direction) -> Option<Coord> {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub(crate) fn set(&mut self, dir: Direction, coord: Option<Coord>) {
        match dir {
            Direction::Up => self.up = coord,
            Direction::Down => self.down = coord,
            Direction::Left => self.left = coord,
            Direction::Right => self.right = coord,
        }
    }
}

impl Default for Neighborhood {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Neighborhood {
    type Item = (Coord, Direction);

    fn next(&mut self) -> Option<Self::Item> {
        while self.counter < Direction::ALL.len() {
            let dir = Direction::from(self.counter);
            self.counter += 1;
            if let Some(coord) = self.get(dir) {
                return Some((coord, dir));
            }
        }
        None
    }
}
