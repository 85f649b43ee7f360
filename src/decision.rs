//! Closed-form small-N decision network.
//!
//! Exact majority/threshold for small batches without any counting: a
//! triangular grid of AND/OR/SELECT gates, the Boolean-circuit analogue of a
//! median network. Cell (i, j) holds, for all 64 bit positions at once,
//! "the count among a contiguous sub-list exceeds half that sub-list's
//! size"; the corner cell is the answer. O(N) word operations per output
//! word, which beats the counting network for small N.

use crate::elementwise::select_word;
use crate::hypervector::{Hypervector, Word};

/// Direct three-input majority: (x & y) | (x & z) | (y & z).
pub fn majority3_into(
    x: &Hypervector,
    y: &Hypervector,
    z: &Hypervector,
    dst: &mut Hypervector,
) {
    debug_assert_eq!(x.dimension(), dst.dimension());
    debug_assert_eq!(y.dimension(), dst.dimension());
    debug_assert_eq!(z.dimension(), dst.dimension());
    let xw = x.words();
    let yw = y.words();
    let zw = z.words();
    for (i, d) in dst.words_mut().iter_mut().enumerate() {
        *d = (xw[i] & yw[i]) | (xw[i] & zw[i]) | (yw[i] & zw[i]);
    }
}

/// Strict majority of an odd batch through the AND/OR/SELECT grid.
///
/// The grid is seeded at one corner with the last input; one edge is a
/// running AND over suffixes, the other a running OR, and interior cells
/// select between the cell below and the cell to the right on the current
/// input. N = 1 degenerates to identity.
pub fn decision_majority_into(xs: &[&Hypervector], dst: &mut Hypervector) {
    let n = xs.len();
    debug_assert!(n % 2 == 1, "decision grid requires an odd batch, got {}", n);
    debug_assert!(xs.iter().all(|x| x.dimension() == dst.dimension()));

    let half = n / 2;
    let stride = half + 1;
    let mut grid = vec![0 as Word; stride * stride];

    for w in 0..dst.num_words() {
        grid[half * stride + half] = xs[n - 1].words()[w];

        for i in 0..half {
            let chunk = xs[n - i - 2].words()[w];
            grid[(half - i - 1) * stride + half] = grid[(half - i) * stride + half] & chunk;
            grid[half * stride + (half - i - 1)] = grid[half * stride + (half - i)] | chunk;
        }

        for i in (0..half).rev() {
            for j in (0..half).rev() {
                let chunk = xs[i + j].words()[w];
                let below = grid[(i + 1) * stride + j];
                let right = grid[i * stride + j + 1];
                grid[i * stride + j] = select_word(chunk, below, right);
            }
        }

        dst.words_mut()[w] = grid[0];
    }
}

/// Arbitrary strict threshold through the majority grid.
///
/// count > t over N inputs equals strict majority over the batch padded with
/// constant vectors: 2t+1-N all-zero vectors when t is high, N-2t-1 all-one
/// vectors when t is low. The padded size is always odd.
pub fn decision_threshold_into(xs: &[&Hypervector], t: usize, dst: &mut Hypervector) {
    let n = xs.len();
    debug_assert!(n >= 1 && t < n);

    if 2 * t + 1 == n {
        decision_majority_into(xs, dst);
        return;
    }

    let dim = dst.dimension();
    let (pad, extra) = if 2 * t + 1 > n {
        (Hypervector::new(dim), 2 * t + 1 - n)
    } else {
        (Hypervector::ones(dim), n - 2 * t - 1)
    };

    let mut padded: Vec<&Hypervector> = Vec::with_capacity(n + extra);
    padded.extend_from_slice(xs);
    padded.extend(std::iter::repeat(&pad).take(extra));
    decision_majority_into(&padded, dst);
}
