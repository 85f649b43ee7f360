//! Bundling entry points: threshold counting and majority voting.
//!
//! Every function here is a pure function of (input references, threshold)
//! writing a freshly computed output, plus a caller-supplied random generator
//! on the documented tie-break paths only. Inputs are read-only for
//! the duration of the call; the borrow checker rules out aliasing between
//! the output buffer and any input.
//!
//! Precondition violations (empty batch, threshold out of range, even batch
//! to `true_majority`, dimension mismatch) are programmer errors: checked
//! with `debug_assert!`, unchecked in release builds.
//!
//! # Examples
//!
//! ```
//! use hypervec::{threshold, true_majority, Hypervector};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let batch: Vec<Hypervector> =
//!     (0..5).map(|_| Hypervector::rand(256, &mut rng)).collect();
//! let xs: Vec<&Hypervector> = batch.iter().collect();
//!
//! let maj = true_majority(&xs);
//! assert_eq!(maj, threshold(&xs, 2));
//! ```

use rand::Rng;

use crate::counting;
use crate::decision;
use crate::dispatch::{self, Strategy};
use crate::elementwise::select_word;
use crate::hypervector::Hypervector;

#[inline]
fn debug_check_batch(xs: &[&Hypervector], dst: &Hypervector) {
    debug_assert!(xs.iter().all(|x| x.dimension() == dst.dimension()));
}

// =============================================================================
// Threshold
// =============================================================================

/// Write into `dst` the vector whose bit i is set iff more than `t` of the
/// inputs have bit i set (strict compare; ties are impossible).
///
/// Requires `1 <= xs.len()`, `t < xs.len()`, and all dimensions equal.
pub fn threshold_into(xs: &[&Hypervector], t: usize, dst: &mut Hypervector) {
    debug_assert!(!xs.is_empty(), "threshold requires at least one input");
    debug_assert!(t < xs.len(), "threshold {} out of range for {} inputs", t, xs.len());
    debug_check_batch(xs, dst);

    match dispatch::select_strategy(xs.len(), t) {
        Strategy::Decision => decision::decision_threshold_into(xs, t, dst),
        Strategy::CountingByte | Strategy::CountingShort | Strategy::CountingWord => {
            counting::threshold_into_swar(xs, t, dst)
        }
        Strategy::Scalar => counting::threshold_into_reference(xs, t, dst),
    }
}

/// Allocating form of [`threshold_into`].
pub fn threshold(xs: &[&Hypervector], t: usize) -> Hypervector {
    debug_assert!(!xs.is_empty());
    let mut dst = Hypervector::new(xs[0].dimension());
    threshold_into(xs, t, &mut dst);
    dst
}

/// Scalar-only threshold, bit-identical to [`threshold_into`] by contract.
///
/// Ground truth for differential testing and benchmarking baselines.
pub fn threshold_into_reference(xs: &[&Hypervector], t: usize, dst: &mut Hypervector) {
    debug_assert!(!xs.is_empty());
    debug_assert!(t < xs.len());
    debug_check_batch(xs, dst);
    counting::threshold_into_reference(xs, t, dst);
}

/// Allocating form of [`threshold_into_reference`].
pub fn threshold_reference(xs: &[&Hypervector], t: usize) -> Hypervector {
    debug_assert!(!xs.is_empty());
    let mut dst = Hypervector::new(xs[0].dimension());
    threshold_into_reference(xs, t, &mut dst);
    dst
}

// =============================================================================
// True majority (odd batch)
// =============================================================================

/// Strict majority vote of an odd batch: bit i is set iff more than half of
/// the inputs have it set. Equivalent to `threshold(xs, xs.len() / 2)`.
///
/// Requires an odd, non-empty batch; even batches belong to [`majority_into`],
/// which defines the tie-break.
pub fn true_majority_into(xs: &[&Hypervector], dst: &mut Hypervector) {
    let n = xs.len();
    debug_assert!(n % 2 == 1, "true_majority requires an odd batch, got {}", n);
    debug_check_batch(xs, dst);

    match n {
        1 => dst.copy_from(xs[0]),
        3 => decision::majority3_into(xs[0], xs[1], xs[2], dst),
        _ => {
            if n <= dispatch::backend().decision_break_even {
                decision::decision_majority_into(xs, dst);
            } else {
                threshold_into(xs, n / 2, dst);
            }
        }
    }
}

/// Allocating form of [`true_majority_into`].
pub fn true_majority(xs: &[&Hypervector]) -> Hypervector {
    debug_assert!(!xs.is_empty());
    let mut dst = Hypervector::new(xs[0].dimension());
    true_majority_into(xs, &mut dst);
    dst
}

/// Scalar-only true majority.
pub fn true_majority_into_reference(xs: &[&Hypervector], dst: &mut Hypervector) {
    let n = xs.len();
    debug_assert!(n % 2 == 1);
    debug_check_batch(xs, dst);
    if n == 1 {
        dst.copy_from(xs[0]);
    } else {
        counting::threshold_into_reference(xs, n / 2, dst);
    }
}

/// Allocating form of [`true_majority_into_reference`].
pub fn true_majority_reference(xs: &[&Hypervector]) -> Hypervector {
    debug_assert!(!xs.is_empty());
    let mut dst = Hypervector::new(xs[0].dimension());
    true_majority_into_reference(xs, &mut dst);
    dst
}

// =============================================================================
// General majority (any batch size, randomized tie-break)
// =============================================================================

/// Majority vote for any batch size.
///
/// Odd batches are exact strict majority. Even batches append one fresh
/// fair-random vector as tie-breaker and vote over the odd result, so N = 2
/// degenerates to an unbiased per-bit coin flip between the two inputs, and
/// N = 0 yields a fresh uniformly random vector. Tie-breaks draw from the
/// caller's generator, keeping them reproducible under test.
pub fn majority_into<R: Rng>(xs: &[&Hypervector], rng: &mut R, dst: &mut Hypervector) {
    debug_check_batch(xs, dst);
    let n = xs.len();

    if n == 0 {
        for word in dst.words_mut() {
            *word = rng.gen();
        }
        return;
    }
    if n % 2 == 1 {
        true_majority_into(xs, dst);
        return;
    }

    let tie = Hypervector::rand(xs[0].dimension(), rng);
    let mut padded: Vec<&Hypervector> = Vec::with_capacity(n + 1);
    padded.extend_from_slice(xs);
    padded.push(&tie);
    true_majority_into(&padded, dst);
}

/// Allocating form of [`majority_into`]; requires a non-empty batch (the
/// empty case needs a dimension, so it is only reachable through the `_into`
/// form).
pub fn majority<R: Rng>(xs: &[&Hypervector], rng: &mut R) -> Hypervector {
    debug_assert!(!xs.is_empty());
    let mut dst = Hypervector::new(xs[0].dimension());
    majority_into(xs, rng, &mut dst);
    dst
}

// =============================================================================
// Window (count band)
// =============================================================================

/// Write into `dst` the vector whose bit i is set iff the count of set
/// inputs lies in the band `lo <= count_i <= hi`.
///
/// Requires `1 <= lo <= hi <= xs.len()`.
pub fn window_into(xs: &[&Hypervector], lo: usize, hi: usize, dst: &mut Hypervector) {
    let n = xs.len();
    debug_assert!(n >= 1);
    debug_assert!(lo >= 1 && lo <= hi && hi <= n, "bad band [{}, {}] for {} inputs", lo, hi, n);
    debug_check_batch(xs, dst);

    // count >= lo  <=>  count > lo - 1
    threshold_into(xs, lo - 1, dst);

    if hi < n {
        let mut above = Hypervector::new(dst.dimension());
        threshold_into(xs, hi, &mut above);
        for (d, a) in dst.words_mut().iter_mut().zip(above.words()) {
            *d &= !a;
        }
    }
}

/// Allocating form of [`window_into`].
pub fn window(xs: &[&Hypervector], lo: usize, hi: usize) -> Hypervector {
    debug_assert!(!xs.is_empty());
    let mut dst = Hypervector::new(xs[0].dimension());
    window_into(xs, lo, hi, &mut dst);
    dst
}

// =============================================================================
// Representative sampling
// =============================================================================

/// For each bit position, copy the bit of one input chosen uniformly at
/// random. N = 0 yields a fresh random vector, N = 1 a copy, N = 2 a
/// per-bit coin-flip select.
pub fn representative_into<R: Rng>(xs: &[&Hypervector], rng: &mut R, dst: &mut Hypervector) {
    debug_check_batch(xs, dst);
    let n = xs.len();

    match n {
        0 => {
            for word in dst.words_mut() {
                *word = rng.gen();
            }
        }
        1 => dst.copy_from(xs[0]),
        2 => {
            let a = xs[0].words();
            let b = xs[1].words();
            for (w, d) in dst.words_mut().iter_mut().enumerate() {
                *d = select_word(rng.gen(), a[w], b[w]);
            }
        }
        _ => {
            for (w, d) in dst.words_mut().iter_mut().enumerate() {
                let mut word = 0;
                for bit_id in 0..crate::hypervector::BITS_PER_WORD {
                    let pick = rng.gen_range(0..n);
                    word |= ((xs[pick].words()[w] >> bit_id) & 1) << bit_id;
                }
                *d = word;
            }
        }
    }
}

/// Allocating form of [`representative_into`]; requires a non-empty batch.
pub fn representative<R: Rng>(xs: &[&Hypervector], rng: &mut R) -> Hypervector {
    debug_assert!(!xs.is_empty());
    let mut dst = Hypervector::new(xs[0].dimension());
    representative_into(xs, rng, &mut dst);
    dst
}
