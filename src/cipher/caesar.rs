//! # Caesar Cipher
//!
//! Shifts every letter forward by a fixed key, wrapping from `Z` to `A`.
//! The Affine transform with keys `(1, key)`.

use super::table::{letter, position, ALPHABET_LEN};
use super::Cipher;

/// The Caesar shift cipher.
///
/// The key is stored as given, any `i64` including negatives and values of
/// 26 or more. It is reduced modulo 26 only when text is transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaesarCipher {
    key: i64,
}

impl CaesarCipher {
    /// Create a Caesar cipher with the given shift.
    #[must_use]
    pub fn new(key: i64) -> Self {
        Self { key }
    }

    /// The key exactly as supplied.
    #[must_use]
    pub fn key(&self) -> i64 {
        self.key
    }

    fn shift(text: &str, shift: i64) -> String {
        let upper = text.to_uppercase();
        if shift == 0 {
            return upper;
        }

        upper
            .chars()
            .map(|c| match position(c) {
                Some(i) => letter(((i as i64 + shift) % ALPHABET_LEN) as usize),
                None => c,
            })
            .collect()
    }
}

impl Cipher for CaesarCipher {
    fn encode(&self, plaintext: &str) -> String {
        Self::shift(plaintext, self.key.rem_euclid(ALPHABET_LEN))
    }

    // Shifting by -key; computed as a positive shift so i64::MIN cannot overflow.
    fn decode(&self, ciphertext: &str) -> String {
        let forward = self.key.rem_euclid(ALPHABET_LEN);
        Self::shift(ciphertext, (ALPHABET_LEN - forward) % ALPHABET_LEN)
    }
}
