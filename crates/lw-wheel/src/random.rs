//! Uniform random sources
//!
//! The selector consumes plain draws in `[0, 1)`. Anything that can produce
//! those plugs in here: a seeded ChaCha stream, any `rand` RNG, or a fixed
//! script for tests.

use std::collections::VecDeque;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Adapter for any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

/// Seedable ChaCha stream, the default source
pub type ChaChaSource = RngSource<ChaCha8Rng>;

impl RngSource<ChaCha8Rng> {
    /// Reproducible stream
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seeded from the OS
    pub fn from_os() -> Self {
        Self::new(ChaCha8Rng::from_os_rng())
    }

    /// Optional seed (None = OS entropy)
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_os(),
        }
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of draws, then repeats the last one
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
    last: f64,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            last: 0.5,
        }
    }

    /// Always returns `value`
    pub fn constant(value: f64) -> Self {
        Self {
            draws: VecDeque::new(),
            last: value,
        }
    }

    /// Draws left before the last value repeats
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if let Some(v) = self.draws.pop_front() {
            self.last = v;
        }
        self.last
    }
}

/// Map a unit draw to a symmetric offset in `[-magnitude, magnitude)`
#[inline]
pub fn symmetric(draw: f64, magnitude: f64) -> f64 {
    (draw * 2.0 - 1.0) * magnitude
}
