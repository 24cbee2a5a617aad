//! # Alphabet and Substitution Tables
//!
//! The 26 uppercase Latin letters and the permutations defined over them.

use crate::error::{CipherWebError, Result};

/// The fixed cipher alphabet, in order.
pub const ALPHABET: [u8; 26] = *b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of [`ALPHABET`]; every modulus in the crate.
pub const ALPHABET_LEN: i64 = ALPHABET.len() as i64;

/// Position of an uppercase ASCII letter in the alphabet, `None` otherwise.
#[inline]
#[must_use]
pub fn position(c: char) -> Option<usize> {
    c.is_ascii_uppercase().then(|| (c as u8 - b'A') as usize)
}

/// Letter at `index` in the alphabet. `index` must be below 26.
#[inline]
#[must_use]
pub fn letter(index: usize) -> char {
    char::from(ALPHABET[index])
}

/// A bijective mapping of the alphabet onto itself.
///
/// Both directions are precomputed so encoding and decoding are single
/// lookups per letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionTable {
    forward: [u8; 26],
    inverse: [u8; 26],
}

impl SubstitutionTable {
    /// The reversed alphabet, `i ↦ 25 - i`. Self-inverse.
    #[must_use]
    pub const fn reversed() -> Self {
        let mut forward = [0_u8; 26];
        let mut i = 0;
        while i < forward.len() {
            forward[i] = (forward.len() - 1 - i) as u8;
            i += 1;
        }

        Self {
            forward,
            inverse: forward,
        }
    }

    /// Build a table mapping position `i` to position `mapping(i) mod 26`.
    ///
    /// ## Errors
    /// - `CipherWebError::InvalidArgument`: if two positions map to the same
    ///   target, i.e. the mapping is not a permutation
    pub fn from_fn<F>(mapping: F) -> Result<Self>
    where
        F: Fn(usize) -> usize,
    {
        const UNSET: u8 = u8::MAX;

        let mut forward = [0_u8; 26];
        let mut inverse = [UNSET; 26];

        for (source, slot) in forward.iter_mut().enumerate() {
            let target = mapping(source) % ALPHABET.len();
            if inverse[target] != UNSET {
                return Err(CipherWebError::invalid_argument(format!(
                    "substitution is not a permutation: '{}' and '{}' both map to '{}'",
                    letter(inverse[target] as usize),
                    letter(source),
                    letter(target)
                )));
            }
            *slot = target as u8;
            inverse[target] = source as u8;
        }

        Ok(Self { forward, inverse })
    }

    /// Map a single character through the table; non-letters are returned as is.
    #[inline]
    #[must_use]
    pub fn encode_char(&self, c: char) -> char {
        position(c).map_or(c, |i| letter(self.forward[i] as usize))
    }

    /// Map a single character back through the inverse table.
    #[inline]
    #[must_use]
    pub fn decode_char(&self, c: char) -> char {
        position(c).map_or(c, |i| letter(self.inverse[i] as usize))
    }

    /// Substitute every uppercase letter of `text` in the forward direction.
    #[must_use]
    pub fn substitute(&self, text: &str) -> String {
        text.chars().map(|c| self.encode_char(c)).collect()
    }

    /// Substitute every uppercase letter of `text` in the inverse direction.
    #[must_use]
    pub fn invert(&self, text: &str) -> String {
        text.chars().map(|c| self.decode_char(c)).collect()
    }
}
