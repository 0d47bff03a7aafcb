//! A 55-entry subtract-with-borrow lagged Fibonacci generator modulo
//! the prime `1_000_000_007`.
//!
//! The prime modulus means congruence-mod-`x` collisions between stream
//! positions require `x | M`, and since `M` is prime that only happens
//! for `x` in `{1, M}` — i.e. the generator has full period for any
//! practical stride. Seeded by a single `u32`; deterministic: same
//! seed, same call sequence, same output stream, always.

use rand::rand_core::impls::{fill_bytes_via_next, next_u64_via_u32};
use rand::RngCore;

const LAG_LONG: usize = 55;
const LAG_SHORT: usize = 24;
const MODULUS: i64 = 1_000_000_007;
const WARMUP_STEPS: usize = 165; // 3 full cycles through the 55-entry table

/// Owned exclusively by the outer iterator (C7); never global.
#[derive(Debug, Clone)]
pub struct LaggedFibRng {
    table: [i64; LAG_LONG],
    cursor: usize,
}

impl LaggedFibRng {
    pub fn new(seed: u32) -> Self {
        let mut table = [0i64; LAG_LONG];
        // Warm the table with a short LCG keyed on the seed; the LCG
        // itself is never used as an output, only to decorrelate the
        // initial lagged-Fibonacci state.
        let mut x = (seed as i64) ^ 0x5DEECE66D;
        for slot in table.iter_mut() {
            x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            *slot = ((x >> 16) & 0x7FFF_FFFF) % MODULUS;
        }
        let mut rng = Self { table, cursor: 0 };
        for _ in 0..WARMUP_STEPS {
            rng.step();
        }
        rng
    }

    /// Advances the table by one slot and returns the new value.
    #[inline]
    fn step(&mut self) -> i64 {
        let i = self.cursor;
        let j = (i + LAG_SHORT) % LAG_LONG;
        let mut v = self.table[j] - self.table[i];
        if v < 0 {
            v += MODULUS;
        }
        self.table[i] = v;
        self.cursor = (i + 1) % LAG_LONG;
        v
    }

    /// Uniform integer in `[0, bound)`. `bound` must be nonzero.
    pub fn below(&mut self, bound: u32) -> u32 {
        assert!(bound > 0, "below() requires a positive bound");
        (self.next_u32() as u64 * bound as u64 / (u32::MAX as u64 + 1)) as u32
    }

    /// Uniform integer in `[lo, hi)`. Requires `lo < hi`.
    pub fn range(&mut self, lo: usize, hi: usize) -> usize {
        assert!(lo < hi, "range() requires lo < hi");
        lo + self.below((hi - lo) as u32) as usize
    }
}

impl RngCore for LaggedFibRng {
    fn next_u32(&mut self) -> u32 {
        // MODULUS < 2^31, so the raw value already fits comfortably; we
        // spread it across the full u32 range for callers that expect a
        // well-mixed 32-bit stream (e.g. `rand::Rng::gen_range`).
        let v = self.step();
        (v as u64 * (u32::MAX as u64) / (MODULUS as u64 - 1)) as u32
    }

    fn next_u64(&mut self) -> u64 {
        next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = LaggedFibRng::new(42);
        let mut b = LaggedFibRng::new(42);
        let seq_a: Vec<u32> = (0..200).map(|_| a.next_u32()).collect();
        let seq_b: Vec<u32> = (0..200).map(|_| b.next_u32()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = LaggedFibRng::new(1);
        let mut b = LaggedFibRng::new(2);
        let seq_a: Vec<u32> = (0..50).map(|_| a.next_u32()).collect();
        let seq_b: Vec<u32> = (0..50).map(|_| b.next_u32()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn below_stays_in_bound() {
        let mut rng = LaggedFibRng::new(7);
        for _ in 0..1000 {
            let v = rng.below(13);
            assert!(v < 13);
        }
    }

    #[test]
    fn range_stays_in_bound() {
        let mut rng = LaggedFibRng::new(99);
        for _ in 0..1000 {
            let v = rng.range(5, 9);
            assert!((5..9).contains(&v));
        }
    }

    #[test]
    fn composes_with_rand_extension_methods() {
        let mut rng = LaggedFibRng::new(3);
        let v: u32 = rng.gen_range(0..100);
        assert!(v < 100);
    }
}
