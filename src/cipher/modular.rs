//! # Modular Arithmetic
//!
//! Integer helpers the substitution ciphers are built on.

use crate::error::{CipherWebError, Result};

/// Greatest common divisor of two positive integers.
///
/// Iterative Euclid: `(a, b)` becomes `(b mod a, a)` until `a` reaches zero.
///
/// ## Errors
/// - `CipherWebError::InvalidArgument`: if either operand is below 1
pub fn gcd(a: i64, b: i64) -> Result<i64> {
    if a < 1 || b < 1 {
        return Err(CipherWebError::invalid_argument(format!(
            "Input arguments (a={a}, b={b}) must be positive integers"
        )));
    }

    let (mut a, mut b) = (a, b);
    while a != 0 {
        (a, b) = (b % a, a);
    }
    Ok(b)
}

/// Modular multiplicative inverse of `a` modulo `m`.
///
/// Returns the unique `c` in `[1, m)` with `a * c ≡ 1 (mod m)`. `a` may be
/// negative or larger than `m`; it is reduced first.
///
/// ## Errors
/// - `CipherWebError::InvalidArgument`: if `m < 2`
/// - `CipherWebError::IncompatibleKey`: if `a` and `m` are not coprime
pub fn mod_inverse(a: i64, m: i64) -> Result<i64> {
    if m < 2 {
        return Err(CipherWebError::invalid_argument(format!(
            "Modulus {m} must be at least 2"
        )));
    }

    let reduced = a.rem_euclid(m);
    if reduced == 0 || gcd(reduced, m)? != 1 {
        return Err(CipherWebError::incompatible_key(a));
    }

    // Extended Euclid on (reduced, m); the coefficients stay below m in magnitude.
    let (mut old_r, mut r) = (reduced, m);
    let (mut old_s, mut s) = (1_i64, 0_i64);
    while r != 0 {
        let quotient = old_r / r;
        (old_r, r) = (r, old_r - quotient * r);
        (old_s, s) = (s, old_s - quotient * s);
    }

    Ok(old_s.rem_euclid(m))
}
