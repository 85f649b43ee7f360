//! Hypervec - binary hypervector algebra with a bit-sliced counting core.
//!
//! Hypervec is a Rust library for hyperdimensional computing primitives:
//! fixed-dimension binary vectors ("hypervectors") of thousands to millions
//! of bits, packed into 64-bit words, with bitwise algebra plus the heavily
//! engineered part: per-bit threshold counting and majority voting across
//! arbitrarily large batches of vectors.
//!
//! # Key Characteristics
//!
//! - Word-packed storage, no partial words (dimension is a multiple of 64)
//! - SWAR bit-sliced counting: thousands of per-position counters advanced
//!   per arithmetic add, with carry-save widening as batches grow
//! - Closed-form AND/OR/SELECT decision network for small batches
//! - A strategy dispatcher picking the fastest routine per (N, T), backed by
//!   one-time runtime capability detection
//! - A permanently retained scalar reference path as correctness oracle
//!
//! # Architecture
//!
//! - **Hypervector**: word-aligned fixed-size bit vector storage
//! - **elementwise**: AND/OR/XOR/NOT/SELECT word-slice passes
//! - **decision**: closed-form small-N majority/threshold network
//! - **counting**: the bit-sliced threshold-counting network and its oracle
//! - **dispatch**: strategy selection and backend capability probe
//! - **bundle**: public threshold/majority/window/representative entry points
//!
//! # Examples
//!
//! ```
//! use hypervec::{threshold, true_majority, Hypervector};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let batch: Vec<Hypervector> =
//!     (0..9).map(|_| Hypervector::rand(8192, &mut rng)).collect();
//! let xs: Vec<&Hypervector> = batch.iter().collect();
//!
//! // Strict majority vote across the batch
//! let bundled = true_majority(&xs);
//!
//! // Same thing through the general threshold entry point
//! assert_eq!(bundled, threshold(&xs, 4));
//!
//! // Boundary thresholds degenerate to OR and AND
//! let union = threshold(&xs, 0);
//! let intersection = threshold(&xs, 8);
//! assert!(union.num_set() >= intersection.num_set());
//! ```
//!
//! # Concurrency
//!
//! Every operation is a synchronous, CPU-bound pure function of its inputs
//! (plus a caller-supplied RNG on the documented tie-break paths). The only
//! shared state is the read-only backend descriptor, initialized once.
//! Calls are freely parallelizable as long as each output buffer has one
//! writer at a time.
//!
//! # Safety
//!
//! Hot paths check preconditions with `debug_assert!`:
//!
//! - Zero-cost checking in release builds
//! - Full validation during development and testing
//! - Memory safety guaranteed by Rust's type system

// Module declarations
pub mod bundle;
pub mod counting;
pub mod decision;
pub mod dispatch;
pub mod elementwise;
pub mod error;
pub mod hypervector;

// Re-exports for convenient access
pub use bundle::{
    majority, majority_into, representative, representative_into, threshold, threshold_into,
    threshold_into_reference, threshold_reference, true_majority, true_majority_into,
    true_majority_into_reference, true_majority_reference, window, window_into,
};
pub use counting::{counts, Count, MAX_SWAR_BATCH};
pub use decision::majority3_into;
pub use dispatch::{backend, select_strategy, Backend, BackendKind, Strategy};
pub use error::{HypervecError, Result};
pub use hypervector::{Hypervector, Word, BITS_PER_WORD, WORD_MAX};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "Hypervec";

/// Get version string
pub fn version() -> String {
    format!("{} v{}", NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(ver.contains("Hypervec"));
        assert!(ver.contains("0.1.0"));
    }

    #[test]
    fn test_re_exports() {
        let _hv = Hypervector::new(64);
        let _result: Result<()> = Ok(());
        assert_eq!(BITS_PER_WORD, 64);
    }
}
