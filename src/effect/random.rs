//! Randomness for the print effect.
//!
//! The effect never reaches for a global generator. Callers pass a
//! [`RandomSource`], so tests can pin the noise to a fixed value or a
//! seed and get identical output every run.

use rand::Rng;
use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng};

/// Source of uniformly distributed floats.
pub trait RandomSource {
    /// Returns a value in `[low, high)`, or `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

/// Adapts any [`RngCore`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    inner: R,
}

impl<R: RngCore> RngSource<R> {
    /// Wraps an existing generator.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl RngSource<ChaCha20Rng> {
    /// ChaCha20 stream seeded from a `u64`; same seed, same noise.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha20Rng::seed_from_u64(seed))
    }

    /// ChaCha20 stream seeded from the OS entropy source.
    pub fn from_os_entropy() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::new(ChaCha20Rng::from_seed(seed))
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low < high {
            self.inner.gen_range(low..high)
        } else {
            low
        }
    }
}

/// Always yields the same value, clamped into the requested range.
///
/// `FixedSource(0.0)` gives zero luma noise and zero band jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSource(pub f64);

impl RandomSource for FixedSource {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low < high {
            self.0.clamp(low, high)
        } else {
            low
        }
    }
}
