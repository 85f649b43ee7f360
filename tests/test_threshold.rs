//! Differential and property tests for the threshold engine.
//!
//! Every optimized strategy must be bit-identical to the scalar reference
//! across the full batch-size spectrum, and the engine must satisfy the
//! algebraic properties of strict counting: monotonicity in the threshold,
//! permutation symmetry, idempotence over duplicated inputs, and the AND/OR
//! degeneration at the boundary thresholds.

use hypervec::{
    threshold, threshold_into, threshold_into_reference, threshold_reference, Hypervector,
};
use itertools::iproduct;
use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn random_batch(n: usize, dim: usize, seed: u64) -> Vec<Hypervector> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n).map(|_| Hypervector::rand(dim, &mut rng)).collect()
}

fn refs(batch: &[Hypervector]) -> Vec<&Hypervector> {
    batch.iter().collect()
}

fn threshold_grid(n: usize) -> Vec<usize> {
    let mut ts = vec![0, n / 4, n / 2, n - 1];
    ts.dedup();
    ts
}

// =============================================================================
// Oracle Equivalence
// =============================================================================

#[test]
fn test_oracle_equivalence_small_and_mid_batches() {
    for (&n, dim) in iproduct!(&[1usize, 2, 3, 7, 200, 255, 256], &[128usize, 512]) {
        let batch = random_batch(n, *dim, n as u64);
        let xs = refs(&batch);
        for t in threshold_grid(n) {
            let mut expected = Hypervector::new(*dim);
            threshold_into_reference(&xs, t, &mut expected);

            let mut got = Hypervector::new(*dim);
            threshold_into(&xs, t, &mut got);
            assert_eq!(got, expected, "n={} t={} dim={}", n, t, dim);
        }
    }
}

#[test]
fn test_oracle_equivalence_short_to_word_boundary() {
    for &n in &[65535usize, 65536] {
        // Duplicate references: the batch is a view, not an allocation per slot.
        let distinct = random_batch(509, 128, n as u64);
        let xs: Vec<&Hypervector> = (0..n).map(|i| &distinct[i % 509]).collect();

        for t in [0, n / 2, n - 1] {
            let mut expected = Hypervector::new(128);
            threshold_into_reference(&xs, t, &mut expected);

            let mut got = Hypervector::new(128);
            threshold_into(&xs, t, &mut got);
            assert_eq!(got, expected, "n={} t={}", n, t);
        }
    }
}

#[test]
fn test_oracle_equivalence_million_inputs() {
    let n = 1_000_000usize;
    let distinct = random_batch(997, 128, 0xBEEF);
    let xs: Vec<&Hypervector> = (0..n).map(|i| &distinct[i % 997]).collect();

    for t in [n / 2, n - 1] {
        let mut expected = Hypervector::new(128);
        threshold_into_reference(&xs, t, &mut expected);

        let mut got = Hypervector::new(128);
        threshold_into(&xs, t, &mut got);
        assert_eq!(got, expected, "t={}", t);
    }
}

// =============================================================================
// Algebraic Properties
// =============================================================================

#[test]
fn test_monotonicity_in_threshold() {
    let batch = random_batch(41, 1024, 7);
    let xs = refs(&batch);

    let mut prev = threshold(&xs, 0).num_set();
    for t in 1..41 {
        let set = threshold(&xs, t).num_set();
        assert!(set <= prev, "t={} grew {} -> {}", t, prev, set);
        prev = set;
    }
}

#[test]
fn test_idempotence_single_and_duplicated_input() {
    let batch = random_batch(1, 512, 8);
    let x = &batch[0];
    assert_eq!(threshold(&[x], 0), *x);

    // N copies of the same vector: any valid threshold returns it unchanged.
    for n in [2usize, 5, 40, 300] {
        let xs: Vec<&Hypervector> = std::iter::repeat(x).take(n).collect();
        for t in [0, n / 2, n - 1] {
            assert_eq!(threshold(&xs, t), *x, "n={} t={}", n, t);
        }
    }
}

#[test]
fn test_symmetry_under_permutation() {
    let batch = random_batch(27, 512, 9);
    let mut rng = rand::rngs::StdRng::seed_from_u64(10);

    for t in [0usize, 6, 13, 26] {
        let xs = refs(&batch);
        let expected = threshold(&xs, t);

        let mut shuffled = xs;
        for _ in 0..3 {
            shuffled.shuffle(&mut rng);
            assert_eq!(threshold(&shuffled, t), expected, "t={}", t);
        }
    }
}

#[test]
fn test_boundary_thresholds_are_and_or() {
    for &n in &[2usize, 7, 64, 200] {
        let batch = random_batch(n, 512, 0xA0 + n as u64);
        let xs = refs(&batch);

        let expected_or = batch.iter().fold(Hypervector::new(512), |acc, x| &acc | x);
        let expected_and = batch.iter().fold(Hypervector::ones(512), |acc, x| &acc & x);

        assert_eq!(threshold(&xs, 0), expected_or, "n={}", n);
        assert_eq!(threshold(&xs, n - 1), expected_and, "n={}", n);
    }
}

#[test]
fn test_reference_entry_points_agree() {
    let batch = random_batch(19, 256, 12);
    let xs = refs(&batch);
    for t in [0usize, 4, 9, 18] {
        assert_eq!(threshold_reference(&xs, t), threshold(&xs, t));
    }
}

// =============================================================================
// Property-Based Differential Testing
// =============================================================================

proptest! {
    #[test]
    fn prop_threshold_matches_reference(
        n in 1usize..60,
        t_frac in 0.0f64..1.0,
        dim_words in 1usize..8,
        seed in any::<u64>(),
    ) {
        let dim = dim_words * 64;
        let t = ((n as f64 - 1.0) * t_frac) as usize;
        let batch = random_batch(n, dim, seed);
        let xs = refs(&batch);

        let mut expected = Hypervector::new(dim);
        threshold_into_reference(&xs, t, &mut expected);

        let mut got = Hypervector::new(dim);
        threshold_into(&xs, t, &mut got);
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_output_never_outside_or_and_band(
        n in 2usize..40,
        t_frac in 0.0f64..1.0,
        seed in any::<u64>(),
    ) {
        let t = ((n as f64 - 1.0) * t_frac) as usize;
        let batch = random_batch(n, 128, seed);
        let xs = refs(&batch);

        let out = threshold(&xs, t);
        let ored = batch.iter().fold(Hypervector::new(128), |acc, x| &acc | x);
        let anded = batch.iter().fold(Hypervector::ones(128), |acc, x| &acc & x);

        // AND <= out <= OR, bitwise
        prop_assert_eq!(&out | &ored, ored.clone());
        prop_assert_eq!(&out & &anded, anded);
    }
}
