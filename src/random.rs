//! Seedable randomness shared by every generator.
//!
//! All of a run's nondeterminism goes through [`RandomSource`], so a fixed
//! seed always reproduces the same maze.

use crate::error::MazeError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Returns a value in `[0, n)`.
    ///
    /// Fails with [`MazeError::EmptyRange`] when `n == 0`.
    fn uniform(&mut self, n: usize) -> Result<usize, MazeError>;

    /// Fair coin, `true` half of the time.
    fn coin_flip(&mut self) -> bool {
        matches!(self.uniform(2), Ok(0))
    }
}

/// ChaCha8 stream; identical on every platform for the same seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, n: usize) -> Result<usize, MazeError> {
        if n == 0 {
            return Err(MazeError::EmptyRange);
        }
        Ok(self.rng.gen_range(0, n))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Always picks the first candidate.
    pub struct FirstChoice;

    impl RandomSource for FirstChoice {
        fn uniform(&mut self, n: usize) -> Result<usize, MazeError> {
            if n == 0 {
                return Err(MazeError::EmptyRange);
            }
            Ok(0)
        }
    }

    /// Replays a fixed list of picks, each reduced modulo the range, then
    /// falls back to zero.
    pub struct Scripted(pub VecDeque<usize>);

    impl Scripted {
        pub fn new(picks: &[usize]) -> Self {
            Scripted(picks.iter().copied().collect())
        }
    }

    impl RandomSource for Scripted {
        fn uniform(&mut self, n: usize) -> Result<usize, MazeError> {
            if n == 0 {
                return Err(MazeError::EmptyRange);
            }
            Ok(self.0.pop_front().unwrap_or(0) % n)
        }
    }
}
