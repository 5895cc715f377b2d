use std::collections::VecDeque;
use std::fmt;

use log::{debug, trace};

use crate::event::StepEvent;
use crate::generators::{pick, EventQueue, Generator, GeneratorKind};
use crate::grids::wall_grid::WallGrid;
use crate::grids::{Coord, Direction};
use crate::random::{RandomSource, SeededRandom};

/// Rectangular block of cells not yet subdivided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chamber {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Chamber {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One cell wide or tall chambers are already corridors.
    pub fn is_divisible(&self) -> bool {
        self.width >= 2 && self.height >= 2
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}x{} at ({}, {})]",
            self.width, self.height, self.x, self.y
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Wall runs along a column boundary, splitting left from right.
    Vertical,
    /// Wall runs along a row boundary, splitting bottom from top.
    Horizontal,
}

/// One split of a chamber: where the wall goes and what is left on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    pub chamber: Chamber,
    pub orientation: Orientation,
    /// Cell on the low side of the wall whose segment stays open.
    pub passage: Coord,
    /// Wall segments to build, as (cell on the low side, direction across).
    pub segments: Vec<(Coord, Direction)>,
    pub halves: [Chamber; 2],
}

/// Subtractive generator: starts from one open chamber and adds walls.
pub struct RecursiveDivisionGenerator<R = SeededRandom> {
    grid: WallGrid,
    rng: R,
    chambers: Vec<Chamber>,
    segments: VecDeque<(Coord, Direction)>,
    divisions: usize,
    events: EventQueue,
}

impl<R: RandomSource> RecursiveDivisionGenerator<R> {
    pub fn new(mut grid: WallGrid, rng: R) -> Self {
        grid.reset();
        grid.open_interior();
        let whole = Chamber::new(0, 0, grid.width(), grid.height());
        Self {
            grid,
            rng,
            chambers: vec![whole],
            segments: VecDeque::new(),
            divisions: 0,
            events: EventQueue::new(),
        }
    }

    /// Chambers still waiting to be divided, the last one is next.
    pub fn pending(&self) -> &[Chamber] {
        &self.chambers
    }

    /// Picks the wall that splits `chamber`, or `None` for the base case.
    /// Touches neither the grid nor the pending stack.
    pub fn divide(&mut self, chamber: Chamber) -> Option<Division> {
        if !chamber.is_divisible() {
            return None;
        }

        let orientation = if self.rng.coin_flip() {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };

        let Chamber {
            x,
            y,
            width,
            height,
        } = chamber;

        let division = match orientation {
            Orientation::Vertical => {
                let wall_x = x + 1 + pick(&mut self.rng, width - 1);
                let passage = Coord::new(wall_x - 1, y + pick(&mut self.rng, height));
                let segments = (y..y + height)
                    .map(|row| (Coord::new(wall_x - 1, row), Direction::Right))
                    .filter(|(cell, _)| *cell != passage)
                    .collect();
                Division {
                    chamber,
                    orientation,
                    passage,
                    segments,
                    halves: [
                        Chamber::new(x, y, wall_x - x, height),
                        Chamber::new(wall_x, y, x + width - wall_x, height),
                    ],
                }
            }
            Orientation::Horizontal => {
                let wall_y = y + 1 + pick(&mut self.rng, height - 1);
                let passage = Coord::new(x + pick(&mut self.rng, width), wall_y - 1);
                let segments = (x..x + width)
                    .map(|column| (Coord::new(column, wall_y - 1), Direction::Up))
                    .filter(|(cell, _)| *cell != passage)
                    .collect();
                Division {
                    chamber,
                    orientation,
                    passage,
                    segments,
                    halves: [
                        Chamber::new(x, y, width, wall_y - y),
                        Chamber::new(x, wall_y, width, y + height - wall_y),
                    ],
                }
            }
        };

        Some(division)
    }

    fn split_next_chamber(&mut self) {
        while let Some(chamber) = self.chambers.pop() {
            let division = match self.divide(chamber) {
                Some(division) => division,
                None => continue,
            };

            self.divisions += 1;
            trace!(
                "splitting {} {:?}, passage at {}",
                chamber,
                division.orientation,
                division.passage
            );
            self.events.push(StepEvent::ChamberSplit {
                chamber,
                orientation: division.orientation,
                passage: division.passage,
            });
            self.segments.extend(division.segments);

            let [first, second] = division.halves;
            self.chambers.push(second);
            self.chambers.push(first);
            return;
        }

        debug!(
            "division finished after {} splits and {} events",
            self.divisions,
            self.events.emitted()
        );
        self.events.complete();
    }
}

impl<R: RandomSource> Generator for RecursiveDivisionGenerator<R> {
    fn step_generation(&mut self) {
        match self.segments.pop_front() {
            Some((cell, dir)) => {
                let added = self.grid.add_wall(cell, dir);
                self.events.push_some(added);
            }
            None => self.split_next_chamber(),
        }
    }

    fn events(&self) -> &EventQueue {
        &self.events
    }

    fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Division
    }

    fn grid(&self) -> &WallGrid {
        &self.grid
    }

    fn into_grid(self: Box<Self>) -> WallGrid {
        self.grid
    }
}
