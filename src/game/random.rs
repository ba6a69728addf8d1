//! Deterministic per-entity random stream.
//!
//! xorshift32 over a signed 32-bit state: the right shift is arithmetic and the
//! output is `|x| / (2^31 - 1)`. Every generated entity owns exactly one of
//! these, seeded from its parent's seed plus its index, so regeneration from a
//! seed reproduces the same tree regardless of what any sibling draws.

use rand::{RngCore, SeedableRng};

const SCALE: f64 = 2_147_483_647.0;
const MAX_UNIT: f64 = 1.0 - f64::EPSILON / 2.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: i32,
}

impl SeededRandom {
    /// A zero seed would produce an all-zero stream, so it is replaced by 1.
    pub fn new(seed: u32) -> Self {
        let state = seed as i32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn step(&mut self) -> i32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        // The arithmetic shift makes the map non-injective, so zero is reachable.
        if x == 0 {
            x = 1;
        }
        self.state = x;
        x
    }

    /// Next float in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        let x = self.step();
        (x.unsigned_abs() as f64 / SCALE).min(MAX_UNIT)
    }

    /// Uniform float in `[min, max)`.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// Uniform integer in `[min, max]`.
    pub fn next_int_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        min + (self.next() * span).floor() as u32
    }

    pub fn next_bool(&mut self, probability: f64) -> bool {
        self.next() < probability
    }

    /// Picks an element with a single draw; `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        if options.is_empty() {
            return None;
        }
        let idx = ((self.next() * options.len() as f64).floor() as usize).min(options.len() - 1);
        options.get(idx)
    }

    pub fn state(&self) -> i32 {
        self.state
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.step() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRandom {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
