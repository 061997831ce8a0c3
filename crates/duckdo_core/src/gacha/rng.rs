//! Injectable randomness for draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random capability consumed by the draw engine.
pub trait RandomSource {
    /// Uniform real value in `[0, 100)`.
    fn next_percent(&mut self) -> f64;
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_percent(&mut self) -> f64 {
        (**self).next_percent()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

/// `StdRng`-backed source; seedable for reproducible runs.
#[derive(Debug, Clone)]
pub struct StdRandomSource {
    seed: Option<u64>,
    rng: StdRng,
}

impl StdRandomSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            seed: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RandomSource for StdRandomSource {
    fn next_percent(&mut self) -> f64 {
        self.rng.gen_range(0.0..100.0)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
