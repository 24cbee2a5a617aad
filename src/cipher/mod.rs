//! # Substitution Cipher Module
//!
//! Mono-alphabetic substitution ciphers over the 26 uppercase Latin letters.
//!
//! All three variants share one contract, the [`Cipher`] trait:
//!
//! - the whole input is uppercased before substitution;
//! - only the letters `A`-`Z` are substituted, everything else (digits,
//!   punctuation, whitespace, non-Latin letters) stays where it was;
//! - `decode(encode(x)) == x.to_uppercase()` for every `x`.
//!
//! Ciphers are small immutable values. A request builds one, uses it once and
//! drops it, so nothing here is shared between requests.
//!
//! ## Variants
//!
//! - [`AtbashCipher`] - reversed alphabet, no key
//! - [`CaesarCipher`] - shift by one integer key
//! - [`AffineCipher`] - `x ↦ a·x + b`, the general case of the other two

pub mod affine;
pub mod atbash;
pub mod caesar;
pub mod modular;
pub mod table;

pub use affine::AffineCipher;
pub use atbash::AtbashCipher;
pub use caesar::CaesarCipher;
pub use modular::{gcd, mod_inverse};
pub use table::{SubstitutionTable, ALPHABET, ALPHABET_LEN};

use std::fmt;

/// Capability shared by every cipher variant
pub trait Cipher {
    /// Encode plaintext. Never fails on well-formed input.
    fn encode(&self, plaintext: &str) -> String;

    /// Decode ciphertext. Never fails on well-formed input.
    fn decode(&self, ciphertext: &str) -> String;

    /// Encode when `encrypt` is true, decode otherwise.
    fn apply(&self, text: &str, encrypt: bool) -> String {
        if encrypt {
            self.encode(text)
        } else {
            self.decode(text)
        }
    }
}

/// The cipher families the service exposes, one per endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherKind {
    /// Reversed alphabet
    Atbash,
    /// Shift by `key`
    Caesar,
    /// Linear map by `keys = [a, b]`
    Affine,
}

impl CipherKind {
    /// Every kind, in routing order.
    pub const ALL: [CipherKind; 3] = [Self::Atbash, Self::Caesar, Self::Affine];

    /// Lowercase name used in routes and logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Atbash => "atbash",
            Self::Caesar => "caesar",
            Self::Affine => "affine",
        }
    }

    /// The endpoint path serving this kind.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Atbash => "/cipher/atbash/",
            Self::Caesar => "/cipher/caesar/",
            Self::Affine => "/cipher/affine/",
        }
    }

    /// Resolve an endpoint path. The trailing slash is required.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A constructed cipher of any kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherVariant {
    /// See [`AtbashCipher`]
    Atbash(AtbashCipher),
    /// See [`CaesarCipher`]
    Caesar(CaesarCipher),
    /// See [`AffineCipher`]
    Affine(AffineCipher),
}

impl CipherVariant {
    /// Which family this cipher belongs to.
    #[must_use]
    pub fn kind(&self) -> CipherKind {
        match self {
            Self::Atbash(_) => CipherKind::Atbash,
            Self::Caesar(_) => CipherKind::Caesar,
            Self::Affine(_) => CipherKind::Affine,
        }
    }
}

impl Cipher for CipherVariant {
    fn encode(&self, plaintext: &str) -> String {
        match self {
            Self::Atbash(cipher) => cipher.encode(plaintext),
            Self::Caesar(cipher) => cipher.encode(plaintext),
            Self::Affine(cipher) => cipher.encode(plaintext),
        }
    }

    fn decode(&self, ciphertext: &str) -> String {
        match self {
            Self::Atbash(cipher) => cipher.decode(ciphertext),
            Self::Caesar(cipher) => cipher.decode(ciphertext),
            Self::Affine(cipher) => cipher.decode(ciphertext),
        }
    }
}

impl From<AtbashCipher> for CipherVariant {
    fn from(cipher: AtbashCipher) -> Self {
        Self::Atbash(cipher)
    }
}

impl From<CaesarCipher> for CipherVariant {
    fn from(cipher: CaesarCipher) -> Self {
        Self::Caesar(cipher)
    }
}

impl From<AffineCipher> for CipherVariant {
    fn from(cipher: AffineCipher) -> Self {
        Self::Affine(cipher)
    }
}
