use std::collections::VecDeque;
use std::fmt;

use crate::error::MazeError;
use crate::event::StepEvent;
use crate::grids::{
    Coord, Dimensions, Direction, DirectionMask, Neighborhood, MAX_DIMENSION, MIN_DIMENSION,
};

/// Boundary flags of one cell, one bit per [`Direction`]. A set bit is a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls(u8);

impl Walls {
    pub const ALL: Walls = Walls(0b1111);

    #[inline]
    pub fn has(&self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    #[inline]
    pub fn remove(&mut self, dir: Direction) {
        self.0 &= !dir.bit();
    }
}

impl Default for Walls {
    fn default() -> Self {
        Walls::ALL
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub walls: Walls,
    /// Permanently part of the maze.
    pub visited: bool,
    pub in_walk: bool,
    /// Exit taken the last time a walk left this cell.
    pub walk_direction: Option<Direction>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            walls: Walls::ALL,
            visited: false,
            in_walk: false,
            walk_direction: None,
        }
    }
}

pub struct WallGrid {
    pub dims: Dimensions,

    cells: Vec<Cell>,
}

impl WallGrid {
    pub fn new(width: usize, height: usize) -> Result<Self, MazeError> {
        let range = MIN_DIMENSION..=MAX_DIMENSION;
        if !range.contains(&width) || !range.contains(&height) {
            return Err(MazeError::InvalidDimension {
                width,
                height,
                min: MIN_DIMENSION,
                max: MAX_DIMENSION,
            });
        }

        Ok(Self {
            cells: vec![Cell::default(); width * height],
            dims: Dimensions { width, height },
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dims.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dims.height
    }

    #[inline]
    fn index_of(&self, coord: Coord) -> usize {
        assert!(self.contains(coord), "cell {} is outside the grid", coord);
        (self.dims.width * coord.y) + coord.x
    }

    /// Inverse of the row-major layout, `index % width` is the column.
    #[inline]
    pub fn coord_of(&self, index: usize) -> Coord {
        Coord::new(index % self.dims.width, index / self.dims.width)
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.dims.width && coord.y < self.dims.height
    }

    /// # Panics
    ///
    /// When `coord` lies outside the grid.
    #[inline]
    pub fn cell(&self, coord: Coord) -> &Cell {
        &self.cells[self.index_of(coord)]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        let index = self.index_of(coord);
        &mut self.cells[index]
    }

    /// Every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.dims.width;
        (0..self.dims.cell_count()).map(move |index| Coord::new(index % width, index / width))
    }

    pub fn neighbor(&self, coord: Coord, dir: Direction) -> Option<Coord> {
        let (dx, dy) = dir.delta();
        let x = coord.x as isize + dx;
        let y = coord.y as isize + dy;
        if self.contains(coord) && self.dims.contains(x, y) {
            Some(Coord::new(x as usize, y as usize))
        } else {
            None
        }
    }

    pub fn get_neighborhood_of(&self, coord: Coord) -> Neighborhood {
        let mut neighbors = Neighborhood::new();
        for dir in Direction::ALL.iter().copied() {
            neighbors.set(dir, self.neighbor(coord, dir));
        }
        neighbors
    }

    /// In-bounds neighbours reachable through a direction in `mask`.
    pub fn neighbors(
        &self,
        coord: Coord,
        mask: DirectionMask,
    ) -> impl Iterator<Item = (Coord, Direction)> {
        self.get_neighborhood_of(coord).filter(move |(_, dir)| mask.allows(*dir))
    }

    #[inline]
    pub fn has_wall(&self, coord: Coord, dir: Direction) -> bool {
        self.cell(coord).walls.has(dir)
    }

    #[inline]
    pub fn is_visited(&self, coord: Coord) -> bool {
        self.cell(coord).visited
    }

    pub fn set_visited(&mut self, coord: Coord, visited: bool) {
        self.cell_mut(coord).visited = visited;
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.visited).count()
    }

    /// Opens the wall on the `dir` side of `coord` and the matching wall of the
    /// neighbour. Returns `None` when there is no neighbour on that side, in
    /// which case the boundary wall is left alone.
    pub fn remove_wall(&mut self, coord: Coord, dir: Direction) -> Option<StepEvent> {
        let other = self.neighbor(coord, dir)?;

        self.cell_mut(coord).walls.remove(dir);
        self.cell_mut(other).walls.remove(-dir);

        Some(StepEvent::WallRemoved {
            from: coord,
            to: other,
            direction: dir,
        })
    }

    pub fn remove_wall_between(&mut self, one: Coord, two: Coord) -> Result<StepEvent, MazeError> {
        let dir = self.direction_between(one, two)?;
        self.remove_wall(one, dir).ok_or(MazeError::OutOfBounds { cell: two })
    }

    /// Puts back the wall pair on the `dir` side of `coord`.
    pub fn add_wall(&mut self, coord: Coord, dir: Direction) -> Option<StepEvent> {
        let other = self.neighbor(coord, dir)?;

        self.cell_mut(coord).walls.insert(dir);
        self.cell_mut(other).walls.insert(-dir);

        Some(StepEvent::WallAdded {
            from: coord,
            to: other,
            direction: dir,
        })
    }

    pub fn add_wall_between(&mut self, one: Coord, two: Coord) -> Result<StepEvent, MazeError> {
        let dir = self.direction_between(one, two)?;
        self.add_wall(one, dir).ok_or(MazeError::OutOfBounds { cell: two })
    }

    fn direction_between(&self, one: Coord, two: Coord) -> Result<Direction, MazeError> {
        for cell in [one, two].iter().copied() {
            if !self.contains(cell) {
                return Err(MazeError::OutOfBounds { cell });
            }
        }
        one.direction_to(two)
            .ok_or(MazeError::NotAdjacent { from: one, to: two })
    }

    /// Removes every internal wall, keeping the outer boundary.
    pub fn open_interior(&mut self) {
        let coords: Vec<Coord> = self.coords().collect();
        for coord in coords {
            self.remove_wall(coord, Direction::Up);
            self.remove_wall(coord, Direction::Right);
        }
    }

    /// Restores every wall and clears all per-run flags, in place.
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = Cell::default();
        }
    }

    /// Number of open wall pairs between cells.
    pub fn passage_count(&self) -> usize {
        self.coords()
            .map(|coord| {
                [Direction::Up, Direction::Right]
                    .iter()
                    .filter(|dir| {
                        self.neighbor(coord, **dir).is_some() && !self.has_wall(coord, **dir)
                    })
                    .count()
            })
            .sum()
    }

    /// Open passages leading out of `coord`.
    pub fn passages_of(&self, coord: Coord) -> impl Iterator<Item = (Coord, Direction)> + '_ {
        self.get_neighborhood_of(coord)
            .filter(move |(_, dir)| !self.has_wall(coord, *dir))
    }

    /// Every adjacent pair agrees on the wall between them, and the outer
    /// boundary is closed.
    pub fn walls_are_symmetric(&self) -> bool {
        self.coords().all(|coord| {
            Direction::ALL.iter().copied().all(|dir| {
                match self.neighbor(coord, dir) {
                    Some(other) => self.has_wall(coord, dir) == self.has_wall(other, -dir),
                    None => self.has_wall(coord, dir),
                }
            })
        })
    }

    /// Connected over open passages with exactly `cells - 1` of them, so the
    /// carved graph is a spanning tree.
    pub fn is_perfect_maze(&self) -> bool {
        if !self.walls_are_symmetric() {
            return false;
        }
        if self.passage_count() != self.dims.cell_count() - 1 {
            return false;
        }

        let mut seen = vec![false; self.dims.cell_count()];
        let mut queue = VecDeque::new();
        seen[0] = true;
        queue.push_back(Coord::new(0, 0));
        let mut reached = 1;

        while let Some(coord) = queue.pop_front() {
            for (next, _) in self.passages_of(coord) {
                let index = self.index_of(next);
                if !seen[index] {
                    seen[index] = true;
                    reached += 1;
                    queue.push_back(next);
                }
            }
        }

        reached == self.dims.cell_count()
    }
}

impl fmt::Display for WallGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // top row first since y grows upwards
        for y in (0..self.dims.height).rev() {
            for x in 0..self.dims.width {
                let top = if self.has_wall(Coord::new(x, y), Direction::Up) {
                    "---"
                } else {
                    "   "
                };
                write!(f, "+{}", top)?;
            }
            writeln!(f, "+")?;

            let left = if self.has_wall(Coord::new(0, y), Direction::Left) {
                "|"
            } else {
                " "
            };
            write!(f, "{}", left)?;
            for x in 0..self.dims.width {
                let right = if self.has_wall(Coord::new(x, y), Direction::Right) {
                    "|"
                } else {
                    " "
                };
                write!(f, "   {}", right)?;
            }
            writeln!(f)?;
        }

        for x in 0..self.dims.width {
            let bottom = if self.has_wall(Coord::new(x, 0), Direction::Down) {
                "---"
            } else {
                "   "
            };
            write!(f, "+{}", bottom)?;
        }
        writeln!(f, "+")
    }
}

#[cfg(test)]
mod test_wall_grid {
    use super::*;

    #[test]
    fn rejects_out_of_range_dimensions() {
        for (w, h) in [(1, 5), (5, 1), (0, 0), (51, 10), (10, 51)].iter().copied() {
            match WallGrid::new(w, h) {
                Err(MazeError::InvalidDimension { width, height, .. }) => {
                    assert_eq!((width, height), (w, h));
                }
                _ => panic!("{}x{} should be rejected", w, h),
            }
        }
        assert!(WallGrid::new(2, 2).is_ok());
        assert!(WallGrid::new(50, 50).is_ok());
    }

    #[test]
    #[should_panic(expected = "outside the grid")]
    fn column_past_the_edge_does_not_wrap_into_the_next_row() {
        let mut grid = WallGrid::new(5, 5).unwrap();
        grid.set_visited(Coord::new(5, 0), true);
    }

    #[test]
    fn out_of_bounds_queries_panic_instead_of_aliasing() {
        let mut grid = WallGrid::new(5, 5).unwrap();
        let outside = Coord::new(5, 0);
        assert!(!grid.contains(outside));

        let read = std::panic::catch_unwind(|| {
            let grid = WallGrid::new(5, 5).unwrap();
            grid.has_wall(outside, Direction::Up)
        });
        assert!(read.is_err());
        assert!(grid.neighbor(outside, Direction::Left).is_none());
        assert_eq!(grid.remove_wall(outside, Direction::Left), None);
        assert!(!grid.is_visited(Coord::new(0, 1)));
        assert_eq!(grid.visited_count(), 0);
        grid.set_visited(Coord::new(4, 0), true);
        assert!(!grid.is_visited(Coord::new(0, 1)));
    }

    #[test]
    fn starts_fully_walled() {
        let grid = WallGrid::new(4, 3).unwrap();
        assert_eq!(grid.passage_count(), 0);
        assert_eq!(grid.visited_count(), 0);
        assert!(grid.coords().all(|c| grid.cell(c).walls == Walls::ALL));
        assert!(grid.walls_are_symmetric());
    }

    #[test]
    fn corner_neighbors() {
        let grid = WallGrid::new(3, 3).unwrap();
        let found: Vec<_> = grid.neighbors(Coord::new(0, 0), DirectionMask::ALL).collect();
        assert_eq!(
            found,
            vec![
                (Coord::new(0, 1), Direction::Up),
                (Coord::new(1, 0), Direction::Right)
            ]
        );

        let center = grid.neighbors(Coord::new(1, 1), DirectionMask::ALL).count();
        assert_eq!(center, 4);

        let top_right: Vec<_> = grid
            .neighbors(Coord::new(2, 2), DirectionMask::UP_RIGHT)
            .collect();
        assert!(top_right.is_empty());
    }

    #[test]
    fn remove_wall_is_symmetric() {
        let mut grid = WallGrid::new(3, 3).unwrap();
        let event = grid.remove_wall_between(Coord::new(1, 1), Coord::new(2, 1)).unwrap();
        assert_eq!(
            event,
            StepEvent::WallRemoved {
                from: Coord::new(1, 1),
                to: Coord::new(2, 1),
                direction: Direction::Right,
            }
        );
        assert!(!grid.has_wall(Coord::new(1, 1), Direction::Right));
        assert!(!grid.has_wall(Coord::new(2, 1), Direction::Left));
        assert!(grid.walls_are_symmetric());
        assert_eq!(grid.passage_count(), 1);
    }

    #[test]
    fn remove_wall_rejects_non_adjacent_cells() {
        let mut grid = WallGrid::new(3, 3).unwrap();
        assert_eq!(
            grid.remove_wall_between(Coord::new(0, 0), Coord::new(1, 1)),
            Err(MazeError::NotAdjacent {
                from: Coord::new(0, 0),
                to: Coord::new(1, 1)
            })
        );
        assert_eq!(
            grid.remove_wall_between(Coord::new(2, 2), Coord::new(3, 2)),
            Err(MazeError::OutOfBounds {
                cell: Coord::new(3, 2)
            })
        );
        assert_eq!(grid.passage_count(), 0);
    }

    #[test]
    fn boundary_walls_are_never_removed() {
        let mut grid = WallGrid::new(2, 2).unwrap();
        assert_eq!(grid.remove_wall(Coord::new(1, 1), Direction::Up), None);
        assert_eq!(grid.remove_wall(Coord::new(0, 0), Direction::Left), None);
        assert!(grid.has_wall(Coord::new(1, 1), Direction::Up));
        assert!(grid.has_wall(Coord::new(0, 0), Direction::Left));
    }

    #[test]
    fn open_interior_keeps_boundary() {
        let mut grid = WallGrid::new(5, 3).unwrap();
        grid.open_interior();
        assert_eq!(grid.passage_count(), grid.dims.internal_wall_count());
        assert!(grid.walls_are_symmetric());

        grid.add_wall(Coord::new(2, 1), Direction::Up).unwrap();
        assert!(grid.has_wall(Coord::new(2, 2), Direction::Down));
        assert_eq!(grid.passage_count(), grid.dims.internal_wall_count() - 1);

        let event = grid
            .add_wall_between(Coord::new(4, 0), Coord::new(3, 0))
            .unwrap();
        assert_eq!(
            event,
            StepEvent::WallAdded {
                from: Coord::new(4, 0),
                to: Coord::new(3, 0),
                direction: Direction::Left,
            }
        );
        assert!(grid.has_wall(Coord::new(3, 0), Direction::Right));
        assert!(grid.walls_are_symmetric());
    }

    #[test]
    fn reset_restores_everything() {
        let mut grid = WallGrid::new(3, 2).unwrap();
        grid.open_interior();
        grid.set_visited(Coord::new(1, 1), true);
        grid.cell_mut(Coord::new(0, 0)).in_walk = true;
        grid.cell_mut(Coord::new(0, 0)).walk_direction = Some(Direction::Up);

        grid.reset();

        assert_eq!(grid.passage_count(), 0);
        assert_eq!(grid.visited_count(), 0);
        assert!(grid.coords().all(|c| *grid.cell(c) == Cell::default()));
    }

    #[test]
    fn detects_perfect_and_imperfect_mazes() {
        let mut grid = WallGrid::new(2, 2).unwrap();
        grid.remove_wall(Coord::new(0, 0), Direction::Up);
        grid.remove_wall(Coord::new(0, 1), Direction::Right);
        assert!(!grid.is_perfect_maze());

        grid.remove_wall(Coord::new(1, 1), Direction::Down);
        assert!(grid.is_perfect_maze());

        grid.remove_wall(Coord::new(1, 0), Direction::Left);
        assert!(!grid.is_perfect_maze());
    }

    #[test]
    fn renders_ascii() {
        let mut grid = WallGrid::new(2, 2).unwrap();
        grid.remove_wall(Coord::new(0, 1), Direction::Right);
        grid.remove_wall(Coord::new(0, 0), Direction::Up);
        grid.remove_wall(Coord::new(1, 0), Direction::Up);
        let expected = "\
+---+---+
|       |
+   +   +
|   |   |
+---+---+
";
        assert_eq!(grid.to_string(), expected);
    }
}
