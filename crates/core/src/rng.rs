//! Pluggable randomness for piece selection
//!
//! The engine only ever asks for uniform values in `[0, 1)`. Any
//! `rand` generator works directly; tests can script exact values with
//! [`Sequence`] or wrap a closure with [`FnSource`].

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Default generator for games.
pub type GameRng = StdRng;

/// A source of uniform random numbers in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Seeded default generator.
pub fn seeded(seed: u64) -> GameRng {
    StdRng::seed_from_u64(seed)
}

/// Adapts a closure returning values in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct FnSource<F>(pub F);

impl<F: FnMut() -> f64> RandomSource for FnSource<F> {
    fn next_unit(&mut self) -> f64 {
        (self.0)()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    values: Vec<f64>,
    pos: usize,
}

impl Sequence {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }

    /// Number of values handed out so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl RandomSource for Sequence {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}
