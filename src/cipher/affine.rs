//! # Affine Cipher
//!
//! `E(x) = (a·x + b) mod 26`. Decoding needs the inverse of `a` modulo 26,
//! so `a` must be coprime with 26; that is checked once at construction and
//! the resulting permutation is precomputed in both directions.

use super::modular::gcd;
use super::table::{SubstitutionTable, ALPHABET_LEN};
use super::Cipher;
use crate::error::{CipherWebError, Result};

/// The Affine cipher with multiplicative key `a` and additive key `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffineCipher {
    key_a: i64,
    key_b: i64,
    table: SubstitutionTable,
}

impl AffineCipher {
    /// Create an Affine cipher.
    ///
    /// ## Errors
    /// - `CipherWebError::InvalidArgument`: if `key_a` is not positive
    /// - `CipherWebError::IncompatibleKey`: if `gcd(key_a, 26) != 1`
    pub fn new(key_a: i64, key_b: i64) -> Result<Self> {
        if gcd(key_a, ALPHABET_LEN)? != 1 {
            return Err(CipherWebError::incompatible_key(key_a));
        }

        // Both keys are reduced first so the products stay tiny.
        let a = key_a.rem_euclid(ALPHABET_LEN) as usize;
        let b = key_b.rem_euclid(ALPHABET_LEN) as usize;
        let table = SubstitutionTable::from_fn(|i| i * a + b)?;

        Ok(Self {
            key_a,
            key_b,
            table,
        })
    }

    /// Create an Affine cipher from a key list, which must hold exactly
    /// `[key_a, key_b]`.
    ///
    /// ## Errors
    /// - `CipherWebError::InvalidKeys`: if the list does not have two entries
    /// - any error from [`AffineCipher::new`]
    pub fn from_keys(keys: &[i64]) -> Result<Self> {
        match *keys {
            [key_a, key_b] => Self::new(key_a, key_b),
            _ => Err(CipherWebError::invalid_keys(format!(
                "expected exactly 2 keys, got {}",
                keys.len()
            ))),
        }
    }

    /// The `(a, b)` keys exactly as supplied.
    #[must_use]
    pub fn keys(&self) -> (i64, i64) {
        (self.key_a, self.key_b)
    }
}

impl Cipher for AffineCipher {
    fn encode(&self, plaintext: &str) -> String {
        self.table.substitute(&plaintext.to_uppercase())
    }

    fn decode(&self, ciphertext: &str) -> String {
        self.table.invert(&ciphertext.to_uppercase())
    }
}
