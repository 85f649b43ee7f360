//! Strategy selection for the threshold engine.
//!
//! A stateless, idempotent map from (batch size, threshold) to the routine
//! that computes it fastest: the closed-form decision grid for small
//! batches, the SWAR counting network at byte/short/word lane widths for
//! the rest, and the scalar reference path beyond the SWAR limit.
//!
//! The decision/counting break-even is a tuned constant, not derived at
//! runtime; it is re-validated when a backend is added or changed. Backend
//! capabilities are probed once per process (`OnceLock`) instead of being
//! compiled in, so a single binary stays portable.

use std::sync::OnceLock;

use crate::counting::lane_level;

/// Tuned break-even for the portable backend: the original's dynamic grid
/// table tops out at 33 inputs before counting wins.
const DECISION_BREAK_EVEN_PORTABLE: usize = 33;

/// Tuned break-even with 256-bit vector units available: the wide grid stays
/// ahead of counting noticeably longer.
const DECISION_BREAK_EVEN_WIDE: usize = 49;

/// The routine the dispatcher selected for a (N, T) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Closed-form AND/OR/SELECT grid (small N)
    Decision,
    /// SWAR counting network, 8-bit lanes (N <= 128)
    CountingByte,
    /// SWAR counting network, 16-bit lanes (N <= 32768)
    CountingShort,
    /// SWAR counting network, 32-bit lanes (N <= 2^31)
    CountingWord,
    /// Scalar two-pass reference path (N beyond the SWAR limit)
    Scalar,
}

/// Hardware class detected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Plain 64-bit SWAR
    Portable,
    /// 64-bit SWAR with 256-bit vector units available to the compiler
    Wide256,
}

/// Capability descriptor consumed by the dispatcher.
///
/// Established once before any concurrent use and never mutated; safe to
/// share read-only across threads.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Detected hardware class
    pub kind: BackendKind,
    /// Largest padded batch the decision grid handles before the counting
    /// network takes over
    pub decision_break_even: usize,
}

impl Backend {
    /// Probe the running machine.
    pub fn detect() -> Backend {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") {
                return Backend {
                    kind: BackendKind::Wide256,
                    decision_break_even: DECISION_BREAK_EVEN_WIDE,
                };
            }
        }
        Backend {
            kind: BackendKind::Portable,
            decision_break_even: DECISION_BREAK_EVEN_PORTABLE,
        }
    }

    /// A backend with an explicit break-even, for tests and tuning runs.
    pub fn with_break_even(decision_break_even: usize) -> Backend {
        Backend {
            kind: BackendKind::Portable,
            decision_break_even,
        }
    }
}

/// The process-wide backend, detected on first use.
pub fn backend() -> &'static Backend {
    static BACKEND: OnceLock<Backend> = OnceLock::new();
    BACKEND.get_or_init(Backend::detect)
}

/// Select the strategy for a batch of `n` inputs and strict threshold `t`,
/// using the process-wide backend.
#[inline]
pub fn select_strategy(n: usize, t: usize) -> Strategy {
    select_strategy_with(backend(), n, t)
}

/// Strategy selection against an explicit backend.
pub fn select_strategy_with(backend: &Backend, n: usize, t: usize) -> Strategy {
    debug_assert!(n >= 1 && t < n);

    // The grid pads the batch to odd size 2t+1 or 2(n-t)-1; it only wins
    // when the padded size is still under the break-even.
    if n <= backend.decision_break_even {
        let padded = n + (2 * t + 1).abs_diff(n);
        if padded <= backend.decision_break_even {
            return Strategy::Decision;
        }
    }

    match lane_level(n) {
        Some(0) | Some(1) | Some(2) => Strategy::CountingByte,
        Some(3) => Strategy::CountingShort,
        Some(4) => Strategy::CountingWord,
        _ => Strategy::Scalar,
    }
}
