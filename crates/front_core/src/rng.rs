//! Seeded pseudo-random number generation.
//!
//! Every probabilistic outcome in the simulation (conquest tie-breaking,
//! interception rolls, trade spawn rolls) draws from a [`PseudoRandom`]
//! instance owned by the execution that needs it. Because executions run in a
//! deterministic order, the draw order is deterministic too, which is what
//! makes replays bit-reproducible.
//!
//! The generator is a linear congruential generator with modulus 2^31. All
//! derived values are computed with integer or fixed-point arithmetic so
//! results are identical on every platform.

use crate::math::Fixed;

const MODULUS: u64 = 0x8000_0000; // 2^31
const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;

/// Deterministic linear-congruential random number generator.
#[derive(Debug, Clone)]
pub struct PseudoRandom {
    state: u64,
}

impl PseudoRandom {
    /// Create a generator from a seed.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            state: u64::from(seed) % MODULUS,
        }
    }

    fn next_state(&mut self) -> u64 {
        self.state = (MULTIPLIER * self.state + INCREMENT) % MODULUS;
        self.state
    }

    /// Next value in `[0, 1)`.
    pub fn next_fixed(&mut self) -> Fixed {
        // state / 2^31, expressed directly in the I32F32 bit layout.
        Fixed::from_bits((self.next_state() as i64) << 1)
    }

    /// Next integer in `[min, max)`.
    ///
    /// Returns `min` when the range is empty.
    pub fn next_int(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let range = u64::from(max - min);
        min + ((self.next_state() * range) >> 31) as u32
    }

    /// Next 8-character identifier: the state scaled into `36^8` possible
    /// values, rendered base36 (`0-9a-z`) and zero-padded on the left.
    pub fn next_id(&mut self) -> String {
        const ID_SPACE: u64 = 36u64.pow(8);
        const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        // state < 2^31 and 36^8 < 2^42, so the product needs 128 bits.
        let mut value =
            ((u128::from(self.next_state()) * u128::from(ID_SPACE)) >> 31) as u64;
        let mut id = [0u8; 8];
        for slot in id.iter_mut().rev() {
            *slot = DIGITS[(value % 36) as usize];
            value /= 36;
        }
        String::from_utf8_lossy(&id).into_owned()
    }

    /// One-in-`odds` roll. `chance(2)` is a coin flip.
    pub fn chance(&mut self, odds: u32) -> bool {
        self.next_int(0, odds) == 0
    }

    /// Pick a random element, or `None` if the slice is empty.
    pub fn rand_element<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.next_int(0, items.len() as u32) as usize;
        Some(&items[index])
    }

    /// Shuffle a slice in place (Fisher-Yates, high index first).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (0..items.len()).rev() {
            let j = self.next_int(0, i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}
