//! Bit-sliced threshold-counting network.
//!
//! Computes, for every bit position, whether more than `t` of the input
//! hypervectors have that bit set. The counting is SWAR ("SIMD within a
//! register"): many independent counters are packed into the lanes of
//! ordinary 64-bit words and all advanced with a single add.
//!
//! # Structure
//!
//! - **Level 0**: adjacent input bits are deinterleaved into even/odd 2-bit
//!   lanes through the fixed `0x5555…` scatter mask and accumulated by plain
//!   addition. A 2-bit lane absorbs 3 inputs before it can overflow.
//! - **Carry-save widening**: when a level reaches capacity (3, 15, 255,
//!   65535 inputs), its lanes are folded into the next-wider plane by the
//!   same even/odd split at twice the lane width. One generic cascade covers
//!   lane widths 2 through 32, replacing per-width duplicate routines.
//! - **Unscrambling + finalization**: each lane is compared strictly against
//!   a broadcast threshold using the sign-bit bias trick, and the resulting
//!   per-lane flags are packed back to one bit per original position by the
//!   exact inverse of the interleave cascade (O(log) pairwise merges).
//!
//! The lane width is the smallest C with N <= 2^(C-1): the count itself can
//! never overflow, and the spare bit lets the biased compare run without any
//! per-lane borrow handling. Batches above 2^31 fall back to the scalar
//! reference path, which is also kept permanently as the correctness oracle
//! for differential testing.
//!
//! The whole module is pure computation: no I/O, no hidden state, and the
//! counter planes live on the stack for exactly one call.

use crate::hypervector::{Hypervector, Word, BITS_PER_WORD};

/// Counter value type for the scalar reference path.
pub type Count = u32;

/// Largest batch the SWAR network accepts; larger batches use the scalar path.
pub const MAX_SWAR_BATCH: usize = 1 << 31;

/// Number of widening levels: lane widths 2, 4, 8, 16, 32.
const LEVELS: usize = 5;

/// Split masks: `SPLIT_MASKS[k]` keeps the low 2^k bits of every 2^(k+1)-bit
/// group. Index 0 is the level-0 scatter mask; index k+1 is the fold mask
/// from level k to level k+1.
const SPLIT_MASKS: [Word; LEVELS] = [
    0x5555_5555_5555_5555,
    0x3333_3333_3333_3333,
    0x0F0F_0F0F_0F0F_0F0F,
    0x00FF_00FF_00FF_00FF,
    0x0000_FFFF_0000_FFFF,
];

/// Inputs a level absorbs before its lanes must widen. The values chain
/// exactly: 15 = 3 * 5 folds, 255 = 15 * 17, 65535 = 255 * 257.
const CAPACITY: [Count; LEVELS] = [3, 15, 255, 65535, Count::MAX];

/// Lane width in bits at level `k`.
#[inline(always)]
const fn lane_width(k: usize) -> usize {
    2 << k
}

/// A word whose every `c`-bit lane holds 1 (broadcast multiplier).
#[inline(always)]
const fn lane_lsb(c: usize) -> Word {
    Word::MAX / ((1u64 << c) - 1)
}

/// Smallest widening level whose lane width C satisfies `n <= 2^(C-1)`,
/// or `None` when the batch exceeds [`MAX_SWAR_BATCH`].
pub(crate) fn lane_level(n: usize) -> Option<usize> {
    match n {
        0..=2 => Some(0),
        3..=8 => Some(1),
        9..=128 => Some(2),
        129..=32768 => Some(3),
        n if n <= MAX_SWAR_BATCH => Some(4),
        _ => None,
    }
}

/// Per-output-word cascade of counter lanes.
///
/// `planes[k]` holds `2^(k+1)` words of `2^(k+1)`-bit lanes; together they
/// cover the 64 bit positions of one output word. `pending[k]` is the number
/// of inputs currently summed at level `k`.
struct CounterPlanes {
    planes: [[Word; 32]; LEVELS],
    pending: [Count; LEVELS],
}

impl CounterPlanes {
    fn new() -> Self {
        CounterPlanes {
            planes: [[0; 32]; LEVELS],
            pending: [0; LEVELS],
        }
    }

    /// Zero the planes used up to and including `top`.
    fn reset(&mut self, top: usize) {
        for k in 0..=top {
            let m = lane_width(k);
            self.planes[k][..m].fill(0);
            self.pending[k] = 0;
        }
    }

    /// Deinterleave one input word into the level-0 lanes, then cascade any
    /// full level into the next-wider plane.
    #[inline]
    fn add(&mut self, x: Word, top: usize) {
        self.planes[0][0] += x & SPLIT_MASKS[0];
        self.planes[0][1] += (x >> 1) & SPLIT_MASKS[0];
        self.pending[0] += 1;

        let mut k = 0;
        while k < top && self.pending[k] == CAPACITY[k] {
            self.fold(k);
            self.pending[k + 1] += self.pending[k];
            self.pending[k] = 0;
            k += 1;
        }
    }

    /// Carry-save widening: fold the lanes of level `k` into level `k + 1`.
    ///
    /// Source lane `j` of width c splits into destination words `2j` (even
    /// sub-lanes) and `2j + 1` (odd sub-lanes) of width 2c; the finalization
    /// merge is the exact inverse, so bit order is restored at the end.
    fn fold(&mut self, k: usize) {
        let c = lane_width(k);
        let mask = SPLIT_MASKS[k + 1];
        let (src_planes, dst_planes) = self.planes.split_at_mut(k + 1);
        let src = &mut src_planes[k];
        let dst = &mut dst_planes[0];
        for j in 0..c {
            let v = src[j];
            dst[2 * j] += v & mask;
            dst[2 * j + 1] += (v >> c) & mask;
            src[j] = 0;
        }
    }

    /// Push every partially filled level up to `top`.
    fn flush(&mut self, top: usize) {
        for k in 0..top {
            if self.pending[k] > 0 {
                self.fold(k);
                self.pending[k + 1] += self.pending[k];
                self.pending[k] = 0;
            }
        }
    }

    /// Strict greater-than against the broadcast threshold, then unscramble
    /// the per-lane flags back to one bit per original position.
    fn finalize_gt(&self, top: usize, t: Count) -> Word {
        let c = lane_width(top);
        let lsb = lane_lsb(c);
        let sign = lsb << (c - 1);
        // lane > t  <=>  lane + (2^(c-1) - 1 - t) has the lane sign bit set;
        // lane <= n <= 2^(c-1) keeps the sum inside the lane.
        let bias = lsb * ((1u64 << (c - 1)) - 1 - t as u64);

        let mut bits = [0 as Word; 32];
        for j in 0..c {
            bits[j] = ((self.planes[top][j] + bias) & sign) >> (c - 1);
        }

        // Inverse interleave: merge sibling pairs, halving the lane width
        // each step, until the flags sit at their original bit positions.
        let mut width = c;
        let mut count = c;
        while count > 1 {
            width >>= 1;
            count >>= 1;
            for j in 0..count {
                bits[j] = bits[2 * j] | (bits[2 * j + 1] << width);
            }
        }
        bits[0]
    }
}

/// SWAR threshold: bit i of `dst` = (count of set bit i across `xs`) > `t`.
///
/// Picks the narrowest sufficient lane width for the batch size. Callers
/// must keep `xs.len() <= MAX_SWAR_BATCH`; the dispatcher routes larger
/// batches to [`threshold_into_reference`].
pub fn threshold_into_swar(xs: &[&Hypervector], t: usize, dst: &mut Hypervector) {
    let n = xs.len();
    debug_assert!(n >= 1 && n <= MAX_SWAR_BATCH);
    debug_assert!(t < n);
    let level = lane_level(n).unwrap_or(LEVELS - 1);
    threshold_into_swar_at(xs, t, dst, level);
}

/// SWAR threshold at an explicit widening level (level must admit the batch:
/// `lane_level(xs.len()) <= level`). Split out so tests can force every width.
pub(crate) fn threshold_into_swar_at(
    xs: &[&Hypervector],
    t: usize,
    dst: &mut Hypervector,
    level: usize,
) {
    debug_assert!(level < LEVELS);
    debug_assert!(lane_level(xs.len()).map_or(false, |min| min <= level));
    let num_words = dst.num_words();
    let mut planes = CounterPlanes::new();

    for w in 0..num_words {
        planes.reset(level);
        for x in xs {
            planes.add(x.words()[w], level);
        }
        planes.flush(level);
        dst.words_mut()[w] = planes.finalize_gt(level, t as Count);
    }
}

/// Per-bit counts of set inputs, as a plain `u32` array.
///
/// First pass of the scalar reference path; also handy on its own for
/// debugging and differential tests.
pub fn counts(xs: &[&Hypervector]) -> Vec<Count> {
    debug_assert!(!xs.is_empty());
    debug_assert!(xs.len() <= Count::MAX as usize);
    let dim = xs[0].dimension();
    let mut totals = vec![0 as Count; dim];

    for x in xs {
        debug_assert_eq!(x.dimension(), dim);
        for (word_id, &word) in x.words().iter().enumerate() {
            let offset = word_id * BITS_PER_WORD;
            for bit_id in 0..BITS_PER_WORD {
                totals[offset + bit_id] += ((word >> bit_id) & 1) as Count;
            }
        }
    }
    totals
}

/// Portable two-pass scalar threshold: accumulate a counter array, then
/// compare. Retained permanently as the correctness oracle for every
/// optimized variant, and as the fallback for batches past the SWAR limit.
pub fn threshold_into_reference(xs: &[&Hypervector], t: usize, dst: &mut Hypervector) {
    debug_assert!(!xs.is_empty());
    debug_assert!(t < xs.len());
    let totals = counts(xs);
    let t = t as Count;

    for word_id in 0..dst.num_words() {
        let offset = word_id * BITS_PER_WORD;
        let mut word: Word = 0;
        for bit_id in 0..BITS_PER_WORD {
            if totals[offset + bit_id] > t {
                word |= 1 << bit_id;
            }
        }
        dst.words_mut()[word_id] = word;
    }
}
