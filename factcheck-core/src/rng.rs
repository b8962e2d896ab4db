//! The shared pseudo-random stream.
//!
//! All generators on a thread draw from one [`SplitMix64`] stream. A run of
//! [`Forall`](crate::Forall) reseeds it before sampling, which makes a run
//! with a fixed seed reproduce the same combinations. The stream lives in a
//! thread local, so it can never be touched from two threads at once.

use rand::{Rng, RngCore, SeedableRng};
use std::cell::RefCell;

/// SplitMix64 generator.
///
/// Small, fast and statistically good enough for test data; not suitable for
/// anything that needs cryptographic randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
    gamma: u64,
}

impl SplitMix64 {
    /// Create a generator from a single seed value.
    pub fn new(seed: u64) -> Self {
        let state = mix64(seed);
        SplitMix64 {
            state,
            gamma: mix_gamma(state),
        }
    }

    /// Split off an independent generator, advancing this one.
    pub fn split(&mut self) -> SplitMix64 {
        self.state = self.state.wrapping_add(self.gamma);
        let output = mix64(self.state);
        SplitMix64 {
            state: output,
            gamma: mix_gamma(output),
        }
    }
}

impl RngCore for SplitMix64 {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(self.gamma);
        mix64(self.state)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SplitMix64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        SplitMix64::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        SplitMix64::new(state)
    }
}

thread_local! {
    static RNG: RefCell<SplitMix64> = RefCell::new(SplitMix64::new(entropy_seed()));
}

/// Run `f` with this thread's random stream.
///
/// Calls must not nest; generators only ever hold the stream for a single
/// draw.
pub fn with_rng<R>(f: impl FnOnce(&mut SplitMix64) -> R) -> R {
    RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// Restart this thread's random stream from `seed`.
pub fn reseed(seed: u64) {
    RNG.with(|rng| *rng.borrow_mut() = SplitMix64::new(seed));
}

/// A fresh seed from the operating system's entropy.
pub fn entropy_seed() -> u64 {
    rand::thread_rng().gen()
}

/// SplitMix64 mixing function.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Gamma for a split stream; always odd for maximal period.
fn mix_gamma(z: u64) -> u64 {
    (mix64(z) | 1).wrapping_mul(0x9e3779b97f4a7c15)
}
