//! Elementwise word-slice primitives: AND, OR, XOR, NOT, SELECT.
//!
//! These are the pure, stateless O(W) building blocks reused by the decision
//! network and the bundling entry points. They operate on raw word slices so
//! the networks can run over scratch buffers as well as [`Hypervector`]
//! storage.
//!
//! [`Hypervector`]: crate::Hypervector

use crate::hypervector::Word;

/// Per-word SELECT: where `cond` has a 1 take the bit from `a`, else from `b`.
///
/// Computed branch-free as `b ^ (cond & (a ^ b))`.
#[inline(always)]
pub fn select_word(cond: Word, a: Word, b: Word) -> Word {
    b ^ (cond & (a ^ b))
}

/// dst = x & y
#[inline]
pub fn and_into(x: &[Word], y: &[Word], dst: &mut [Word]) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(x.len(), dst.len());
    for i in 0..dst.len() {
        dst[i] = x[i] & y[i];
    }
}

/// dst = x | y
#[inline]
pub fn or_into(x: &[Word], y: &[Word], dst: &mut [Word]) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(x.len(), dst.len());
    for i in 0..dst.len() {
        dst[i] = x[i] | y[i];
    }
}

/// dst = x ^ y
#[inline]
pub fn xor_into(x: &[Word], y: &[Word], dst: &mut [Word]) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(x.len(), dst.len());
    for i in 0..dst.len() {
        dst[i] = x[i] ^ y[i];
    }
}

/// dst = !x
#[inline]
pub fn not_into(x: &[Word], dst: &mut [Word]) {
    debug_assert_eq!(x.len(), dst.len());
    for i in 0..dst.len() {
        dst[i] = !x[i];
    }
}

/// Per-bit SELECT over slices: dst = cond ? when1 : when0.
#[inline]
pub fn select_into(cond: &[Word], when1: &[Word], when0: &[Word], dst: &mut [Word]) {
    debug_assert_eq!(cond.len(), when1.len());
    debug_assert_eq!(cond.len(), when0.len());
    debug_assert_eq!(cond.len(), dst.len());
    for i in 0..dst.len() {
        dst[i] = select_word(cond[i], when1[i], when0[i]);
    }
}
