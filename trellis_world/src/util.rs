// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Returns the square root of the number, rounded up.
#[inline]
pub(crate) const fn isqrt_ceil(num: u64) -> u64 {
    let s = num.isqrt();

    // `s * s <= num` because `s` is the rounded-down square root, so this cannot overflow.
    if s * s < num { s + 1 } else { s }
}

/// Small xorshift64* generator for cell sampling.
///
/// Deterministic for a given seed; not suitable for anything security related.
#[derive(Clone, Debug)]
pub(crate) struct SampleRng {
    state: u64,
}

impl SampleRng {
    pub(crate) const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    pub(crate) const fn new(seed: u64) -> Self {
        // The all-zero state is a fixed point of xorshift.
        let state = if seed == 0 { Self::DEFAULT_SEED } else { seed };
        Self { state }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform-ish value in `lo..hi`. `hi` must be greater than `lo`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The result is reduced modulo a span that fits in i32 arithmetic."
    )]
    pub(crate) fn range(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(hi > lo, "empty sampling range");
        let span = (i64::from(hi) - i64::from(lo)) as u64;
        let offset = self.next_u64() % span;
        (i64::from(lo) + offset as i64) as i32
    }
}
