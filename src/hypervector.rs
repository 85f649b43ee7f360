//! Hypervector - fixed-dimension binary vector packed into 64-bit words.
//!
//! This module provides the storage type shared by every operation in the
//! crate: D bits in a word-aligned `Vec<u64>`, where D is fixed at
//! construction and must be a positive multiple of 64.
//!
//! # Design
//!
//! - Uses `Vec<u64>` for storage (64-bit words)
//! - Bit indexing: word_idx = bit_idx / 64, bit_offset = bit_idx % 64
//! - No partial last word: dimension is always a multiple of 64, so bulk
//!   operations never need a tail mask
//! - Each hypervector is an independent heap allocation; operations either
//!   return a fresh vector or write into a caller-owned `&mut Hypervector`
//!
//! # Examples
//!
//! ```
//! use hypervec::Hypervector;
//!
//! let mut hv = Hypervector::new(1024);
//! hv.set_bit(5);
//! hv.set_bit(10);
//! assert_eq!(hv.num_set(), 2);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr, BitXor, Not};
use std::path::Path;

use crate::elementwise;
use crate::error::{HypervecError, Result};

/// Word type for bit storage (64-bit unsigned integer)
pub type Word = u64;

/// Number of bits per word
pub const BITS_PER_WORD: usize = 64;

/// Maximum word value
pub const WORD_MAX: Word = Word::MAX;

/// Get word index from bit position
#[inline(always)]
const fn get_word_idx(bit_pos: usize) -> usize {
    bit_pos >> 6 // bit_pos / 64
}

/// Get bit index within word from bit position
#[inline(always)]
const fn get_bit_idx(bit_pos: usize) -> usize {
    bit_pos & 63 // bit_pos % 64
}

/// Fixed-dimension binary vector stored packed into 64-bit words.
///
/// All bit indices are 0-based. Every operation that combines two
/// hypervectors requires them to share the same dimension.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hypervector {
    /// Storage words (64-bit)
    words: Vec<Word>,
    /// Total number of bits (positive multiple of 64)
    dimension: usize,
}

impl Hypervector {
    /// Create a new all-zero hypervector of `dimension` bits.
    ///
    /// # Panics
    ///
    /// Panics if `dimension` is zero or not a multiple of 64.
    ///
    /// # Examples
    ///
    /// ```
    /// use hypervec::Hypervector;
    ///
    /// let hv = Hypervector::new(8192);
    /// assert_eq!(hv.dimension(), 8192);
    /// assert_eq!(hv.num_set(), 0);
    /// ```
    pub fn new(dimension: usize) -> Self {
        assert!(
            dimension > 0 && dimension % BITS_PER_WORD == 0,
            "dimension {} must be a positive multiple of {}",
            dimension,
            BITS_PER_WORD
        );
        Self {
            words: vec![0; dimension / BITS_PER_WORD],
            dimension,
        }
    }

    /// Create a hypervector with every bit set.
    pub fn ones(dimension: usize) -> Self {
        let mut hv = Self::new(dimension);
        hv.words.fill(WORD_MAX);
        hv
    }

    /// Build a hypervector from raw words.
    ///
    /// Returns an error if `words` is empty (zero dimension).
    pub fn from_words(words: Vec<Word>) -> Result<Self> {
        if words.is_empty() {
            return Err(HypervecError::InvalidDimension(0));
        }
        let dimension = words.len() * BITS_PER_WORD;
        Ok(Self { words, dimension })
    }

    /// Create a hypervector of independent fair coin flips.
    ///
    /// # Examples
    ///
    /// ```
    /// use hypervec::Hypervector;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    /// let hv = Hypervector::rand(8192, &mut rng);
    /// // Roughly half the bits are set
    /// assert!(hv.num_set() > 3500 && hv.num_set() < 4700);
    /// ```
    pub fn rand<R: Rng>(dimension: usize, rng: &mut R) -> Self {
        let mut hv = Self::new(dimension);
        for word in &mut hv.words {
            *word = rng.gen::<Word>();
        }
        hv
    }

    /// Create a hypervector where each bit is set independently with
    /// probability `p`.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `p` is outside [0.0, 1.0].
    pub fn random<R: Rng>(dimension: usize, p: f64, rng: &mut R) -> Self {
        debug_assert!((0.0..=1.0).contains(&p));
        let mut hv = Self::new(dimension);
        for word in &mut hv.words {
            let mut w: Word = 0;
            for bit_id in 0..BITS_PER_WORD {
                if rng.gen_bool(p) {
                    w |= 1 << bit_id;
                }
            }
            *word = w;
        }
        hv
    }

    // =========================================================================
    // Single Bit Operations
    // =========================================================================

    /// Set bit at position `b` to 1.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `b >= dimension`.
    #[inline]
    pub fn set_bit(&mut self, b: usize) {
        debug_assert!(
            b < self.dimension,
            "bit index {} out of bounds (dimension: {})",
            b,
            self.dimension
        );
        self.words[get_word_idx(b)] |= 1 << get_bit_idx(b);
    }

    /// Get bit at position `b` (returns 0 or 1 as u8).
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `b >= dimension`.
    #[inline]
    pub fn get_bit(&self, b: usize) -> u8 {
        debug_assert!(
            b < self.dimension,
            "bit index {} out of bounds (dimension: {})",
            b,
            self.dimension
        );
        ((self.words[get_word_idx(b)] >> get_bit_idx(b)) & 1) as u8
    }

    /// Clear bit at position `b` (set to 0).
    #[inline]
    pub fn clear_bit(&mut self, b: usize) {
        debug_assert!(b < self.dimension);
        self.words[get_word_idx(b)] &= !(1 << get_bit_idx(b));
    }

    /// Toggle bit at position `b` (0 -> 1, 1 -> 0).
    #[inline]
    pub fn toggle_bit(&mut self, b: usize) {
        debug_assert!(b < self.dimension);
        self.words[get_word_idx(b)] ^= 1 << get_bit_idx(b);
    }

    // =========================================================================
    // Bulk Operations
    // =========================================================================

    /// Set all bits to 1.
    pub fn set_all(&mut self) {
        self.words.fill(WORD_MAX);
    }

    /// Clear all bits to 0.
    pub fn clear_all(&mut self) {
        self.words.fill(0);
    }

    /// Overwrite this hypervector with the contents of `other`.
    ///
    /// Word-level copy, compiles to memcpy.
    ///
    /// # Panics
    ///
    /// Panics in debug mode on dimension mismatch.
    #[inline]
    pub fn copy_from(&mut self, other: &Hypervector) {
        debug_assert_eq!(self.dimension, other.dimension);
        self.words.copy_from_slice(&other.words);
    }

    // =========================================================================
    // Counting Operations
    // =========================================================================

    /// Count number of set bits (population count).
    ///
    /// Uses hardware popcount instruction for performance.
    #[inline]
    pub fn num_set(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Count number of cleared bits.
    #[inline]
    pub fn num_cleared(&self) -> usize {
        self.dimension - self.num_set()
    }

    /// Hamming distance: number of bit positions where `self` and `other`
    /// differ (XOR + popcount).
    ///
    /// # Panics
    ///
    /// Panics in debug mode on dimension mismatch.
    pub fn hamming(&self, other: &Hypervector) -> usize {
        debug_assert_eq!(self.dimension, other.dimension);
        self.words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| (a ^ b).count_ones() as usize)
            .sum()
    }

    // =========================================================================
    // Ternary Select
    // =========================================================================

    /// Per-bit SELECT: where `cond` has a 1 take the bit from `when1`,
    /// otherwise from `when0`.
    pub fn select(cond: &Hypervector, when1: &Hypervector, when0: &Hypervector) -> Hypervector {
        debug_assert_eq!(cond.dimension, when1.dimension);
        debug_assert_eq!(cond.dimension, when0.dimension);
        let mut out = Hypervector::new(cond.dimension);
        elementwise::select_into(&cond.words, &when1.words, &when0.words, &mut out.words);
        out
    }

    // =========================================================================
    // Information and Access
    // =========================================================================

    /// Get the dimension (number of bits).
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get number of words in storage.
    #[inline]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Get direct read-only access to word storage.
    #[inline]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Get direct mutable access to word storage.
    #[inline]
    pub fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }

    /// Estimate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.words.capacity() * std::mem::size_of::<Word>()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Save this hypervector to a file using bincode.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Load a hypervector from a file written by [`Hypervector::save`].
    ///
    /// The stored dimension is re-validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let hv: Hypervector = bincode::deserialize_from(reader)?;
        if hv.dimension == 0 || hv.dimension % BITS_PER_WORD != 0 {
            return Err(HypervecError::InvalidDimension(hv.dimension));
        }
        if hv.words.len() * BITS_PER_WORD != hv.dimension {
            return Err(HypervecError::DimensionMismatch {
                expected: hv.words.len() * BITS_PER_WORD,
                actual: hv.dimension,
            });
        }
        Ok(hv)
    }
}

// =============================================================================
// Bitwise Operators
// =============================================================================

impl BitAnd for &Hypervector {
    type Output = Hypervector;

    fn bitand(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.dimension, rhs.dimension);
        let mut out = Hypervector::new(self.dimension);
        elementwise::and_into(&self.words, &rhs.words, &mut out.words);
        out
    }
}

impl BitAnd for Hypervector {
    type Output = Hypervector;

    fn bitand(self, rhs: Self) -> Self::Output {
        &self & &rhs
    }
}

impl BitOr for &Hypervector {
    type Output = Hypervector;

    fn bitor(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.dimension, rhs.dimension);
        let mut out = Hypervector::new(self.dimension);
        elementwise::or_into(&self.words, &rhs.words, &mut out.words);
        out
    }
}

impl BitOr for Hypervector {
    type Output = Hypervector;

    fn bitor(self, rhs: Self) -> Self::Output {
        &self | &rhs
    }
}

impl BitXor for &Hypervector {
    type Output = Hypervector;

    fn bitxor(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.dimension, rhs.dimension);
        let mut out = Hypervector::new(self.dimension);
        elementwise::xor_into(&self.words, &rhs.words, &mut out.words);
        out
    }
}

impl BitXor for Hypervector {
    type Output = Hypervector;

    fn bitxor(self, rhs: Self) -> Self::Output {
        &self ^ &rhs
    }
}

impl Not for &Hypervector {
    type Output = Hypervector;

    fn not(self) -> Self::Output {
        let mut out = Hypervector::new(self.dimension);
        elementwise::not_into(&self.words, &mut out.words);
        out
    }
}

impl Not for Hypervector {
    type Output = Hypervector;

    fn not(self) -> Self::Output {
        !&self
    }
}

// =============================================================================
// Comparison Operators
// =============================================================================

impl PartialEq for Hypervector {
    /// Word-level comparison, compiles to memcmp.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension && self.words == other.words
    }
}

impl Eq for Hypervector {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_new() {
        let hv = Hypervector::new(1024);
        assert_eq!(hv.dimension(), 1024);
        assert_eq!(hv.num_words(), 16);
        assert_eq!(hv.num_set(), 0);
        assert_eq!(hv.num_cleared(), 1024);
    }

    #[test]
    #[should_panic]
    fn test_new_rejects_unaligned_dimension() {
        let _ = Hypervector::new(100);
    }

    #[test]
    fn test_from_words() {
        let hv = Hypervector::from_words(vec![0b1011, 0]).unwrap();
        assert_eq!(hv.dimension(), 128);
        assert_eq!(hv.num_set(), 3);

        assert!(Hypervector::from_words(vec![]).is_err());
    }

    #[test]
    fn test_set_get_bit() {
        let mut hv = Hypervector::new(1024);
        hv.set_bit(5);
        hv.set_bit(100);
        hv.set_bit(1023);

        assert_eq!(hv.get_bit(5), 1);
        assert_eq!(hv.get_bit(100), 1);
        assert_eq!(hv.get_bit(1023), 1);
        assert_eq!(hv.get_bit(10), 0);
        assert_eq!(hv.num_set(), 3);
    }

    #[test]
    fn test_clear_toggle_bit() {
        let mut hv = Hypervector::new(128);
        hv.set_bit(7);
        hv.clear_bit(7);
        assert_eq!(hv.get_bit(7), 0);

        hv.toggle_bit(7);
        assert_eq!(hv.get_bit(7), 1);
        hv.toggle_bit(7);
        assert_eq!(hv.get_bit(7), 0);
    }

    #[test]
    fn test_set_all_clear_all() {
        let mut hv = Hypervector::new(256);
        hv.set_all();
        assert_eq!(hv.num_set(), 256);
        hv.clear_all();
        assert_eq!(hv.num_set(), 0);
    }

    #[test]
    fn test_ones() {
        let hv = Hypervector::ones(256);
        assert_eq!(hv.num_set(), 256);
    }

    #[test]
    fn test_hamming() {
        let mut a = Hypervector::new(128);
        let mut b = Hypervector::new(128);
        a.set_bit(1);
        a.set_bit(2);
        b.set_bit(2);
        b.set_bit(3);
        assert_eq!(a.hamming(&b), 2);
        assert_eq!(a.hamming(&a), 0);
    }

    #[test]
    fn test_bitwise_operators() {
        let mut a = Hypervector::new(64);
        let mut b = Hypervector::new(64);
        a.set_bit(2);
        a.set_bit(3);
        b.set_bit(1);
        b.set_bit(3);

        assert_eq!((&a & &b).num_set(), 1);
        assert_eq!((&a | &b).num_set(), 3);
        assert_eq!((&a ^ &b).num_set(), 2);
        assert_eq!((!&a).num_set(), 62);
    }

    #[test]
    fn test_select() {
        let mut cond = Hypervector::new(64);
        let when1 = Hypervector::ones(64);
        let when0 = Hypervector::new(64);
        cond.set_bit(0);
        cond.set_bit(5);

        let out = Hypervector::select(&cond, &when1, &when0);
        assert_eq!(out.get_bit(0), 1);
        assert_eq!(out.get_bit(5), 1);
        assert_eq!(out.num_set(), 2);
    }

    #[test]
    fn test_rand_reproducible() {
        let mut rng1 = rand::rngs::StdRng::seed_from_u64(7);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(7);
        let a = Hypervector::rand(2048, &mut rng1);
        let b = Hypervector::rand(2048, &mut rng2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_density() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let hv = Hypervector::random(8192, 0.1, &mut rng);
        let set = hv.num_set();
        assert!(set > 600 && set < 1050, "density off: {}", set);
    }

    #[test]
    fn test_equality() {
        let mut a = Hypervector::new(128);
        let mut b = Hypervector::new(128);
        a.set_bit(5);
        b.set_bit(5);
        assert_eq!(a, b);

        b.set_bit(10);
        assert_ne!(a, b);
    }

    #[test]
    fn test_copy_from() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let src = Hypervector::rand(512, &mut rng);
        let mut dst = Hypervector::new(512);
        dst.copy_from(&src);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_memory_usage() {
        let hv = Hypervector::new(1024);
        assert!(hv.memory_usage() >= 128); // at least 16 words * 8 bytes
    }
}
