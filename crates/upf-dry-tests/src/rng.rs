// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic PRNG for scenes.

use core::ops::Range;

/// Tiny deterministic RNG (xorshift64*) so tests don't need `rand`.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a new PRNG with the given seed.
    ///
    /// A zero seed is replaced with 1; xorshift would otherwise emit zeros forever.
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// Returns the next pseudo-random `u64` in the xorshift64* sequence.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Returns a value in `[0, 1)` with 24 bits of precision.
    pub fn next_unit_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Returns a value in `range`; an empty range yields its start.
    pub fn gen_range_f32(&mut self, range: Range<f32>) -> f32 {
        if range.end <= range.start {
            return range.start;
        }
        let value = range.start + (range.end - range.start) * self.next_unit_f32();
        // Rounding can land exactly on `end`.
        if value < range.end {
            value
        } else {
            range.start
        }
    }
}
