//! Uniform draw helpers over the explicit generation context.
//!
//! Every randomized pass receives `&mut ChaCha8Rng` from the caller; there is
//! no process-wide generator, so independently seeded runs never interfere.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

pub(super) fn range_inclusive(rng: &mut ChaCha8Rng, min: i32, max: i32) -> i32 {
    debug_assert!(min <= max);
    let span = (max - min + 1) as u32;
    min + (rng.next_u32() % span) as i32
}

pub(super) fn pick_index(rng: &mut ChaCha8Rng, len: usize) -> usize {
    debug_assert!(len > 0);
    (rng.next_u64() % len as u64) as usize
}

/// True with probability 1/chance. A denominator below one is a caller bug.
pub(super) fn one_in(rng: &mut ChaCha8Rng, chance: u32) -> bool {
    assert!(chance >= 1, "chance denominator must be strictly positive");
    rng.next_u32() % chance == 0
}
