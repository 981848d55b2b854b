//! Randomness seam for row automation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of allocation draws.
///
/// The policy asks for one draw per eligible row. Injecting the source keeps
/// every branch reachable from tests.
pub trait AllocationDraw {
    /// Uniform draw in `0..bound`.
    fn draw(&mut self, bound: u32) -> u32;
}

/// Thread-local RNG backed source used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDraw;

impl AllocationDraw for RandomDraw {
    fn draw(&mut self, bound: u32) -> u32 {
        rand::rng().random_range(0..bound)
    }
}

/// Seeded source for reproducible runs.
#[derive(Debug, Clone)]
pub struct SeededDraw(StdRng);

impl SeededDraw {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl AllocationDraw for SeededDraw {
    fn draw(&mut self, bound: u32) -> u32 {
        self.0.random_range(0..bound)
    }
}

/// Replays a fixed script of draws, cycling when exhausted. Test helper.
#[derive(Debug, Clone)]
pub struct FixedDraw {
    script: Vec<u32>,
    next: usize,
}

impl FixedDraw {
    /// Panics if `script` is empty.
    pub fn new(script: impl Into<Vec<u32>>) -> Self {
        let script = script.into();
        assert!(!script.is_empty(), "draw script must not be empty");
        Self { script, next: 0 }
    }
}

impl AllocationDraw for FixedDraw {
    fn draw(&mut self, _bound: u32) -> u32 {
        let value = self.script[self.next % self.script.len()];
        self.next += 1;
        value
    }
}
