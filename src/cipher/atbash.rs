//! # Atbash Cipher
//!
//! Reverses the alphabet: `A ↔ Z`, `B ↔ Y`, and so on. The mapping
//! `x ↦ 25 - x` is its own inverse and equals the Affine transform with
//! keys `(25, 25)`, since `25x + 25 ≡ -(x + 1) (mod 26)`.

use super::table::SubstitutionTable;
use super::Cipher;

/// The Atbash cipher. Takes no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtbashCipher {
    table: SubstitutionTable,
}

impl AtbashCipher {
    /// Build the reversed-alphabet cipher.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: SubstitutionTable::reversed(),
        }
    }
}

impl Default for AtbashCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl Cipher for AtbashCipher {
    fn encode(&self, plaintext: &str) -> String {
        self.table.substitute(&plaintext.to_uppercase())
    }

    // The reversal is self-inverse, so the forward table decodes too.
    fn decode(&self, ciphertext: &str) -> String {
        self.table.substitute(&ciphertext.to_uppercase())
    }
}
