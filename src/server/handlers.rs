//! # Request Handlers Module
//!
//! Turns a raw request body into cipher output:
//!
//! ```text
//! bytes ─► JSON object ─► schema validation ─► cipher construction ─► encode/decode
//! ```
//!
//! Each step fails with its own [`CipherWebError`] variant; the server decides
//! how much of that reaches the client.

use crate::cipher::{
    AffineCipher, AtbashCipher, CaesarCipher, Cipher, CipherKind, CipherVariant, ALPHABET_LEN,
};
use crate::error::{CipherWebError, Result};
use crate::server::metrics::ServerMetrics;
use crate::validation::ValidationSchema;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Handler for the `POST /cipher/<kind>/` endpoints
#[derive(Debug, Clone)]
pub struct CipherHandler {
    /// Shared request counters
    metrics: Arc<ServerMetrics>,
    /// Bodies larger than this are rejected unread
    max_payload_size: usize,
}

impl CipherHandler {
    /// Create a new cipher handler
    #[must_use]
    pub fn new(metrics: Arc<ServerMetrics>, max_payload_size: usize) -> Self {
        Self {
            metrics,
            max_payload_size,
        }
    }

    /// Process a raw request body for `kind` and return the output text
    ///
    /// ## Errors
    /// - `CipherWebError::RequestError`: oversized body, invalid JSON, or a
    ///   JSON value that is not an object
    /// - anything [`dispatch`] returns
    #[instrument(level = "debug", name = "cipher_handler", skip(self, body), fields(bytes = body.len()))]
    pub fn handle_body(&self, kind: CipherKind, body: &[u8]) -> Result<String> {
        if body.len() > self.max_payload_size {
            return Err(CipherWebError::request_error(format!(
                "Payload too large: {} bytes (max: {})",
                body.len(),
                self.max_payload_size
            )));
        }

        let parsed: Value = serde_json::from_slice(body)?;
        let Value::Object(fields) = parsed else {
            return Err(CipherWebError::request_error(
                "Request body must be a JSON object",
            ));
        };

        let text = dispatch(kind, &fields)?;
        self.metrics
            .record_operation(fields.get("encrypt").and_then(Value::as_bool).unwrap_or(false));
        Ok(text)
    }

    /// Largest accepted body in bytes
    #[must_use]
    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }
}

/// Validate `body` for `kind`, build the cipher, and run it
///
/// ## Errors
/// - `CipherWebError::MissingArgument` / `InvalidArgumentType`: schema failures
/// - `CipherWebError::InvalidKeys`: non-integer `keys` elements, or a `keys`
///   list whose length is not 2
/// - `CipherWebError::IncompatibleKey` / `InvalidArgument`: Affine multiplier
///   not coprime with 26, or not positive
pub fn dispatch(kind: CipherKind, body: &Map<String, Value>) -> Result<String> {
    ValidationSchema::for_cipher(kind).validate(body)?;

    let request = CipherRequest::from_validated(body)?;
    let cipher = build_cipher(kind, body)?;
    debug!(cipher = %kind, encrypt = request.encrypt, "applying cipher");

    Ok(cipher.apply(request.text, request.encrypt))
}

/// Fields common to every cipher request, borrowed from a validated body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CipherRequest<'a> {
    text: &'a str,
    encrypt: bool,
}

impl<'a> CipherRequest<'a> {
    fn from_validated(body: &'a Map<String, Value>) -> Result<Self> {
        let text = body.get("text").and_then(Value::as_str);
        let encrypt = body.get("encrypt").and_then(Value::as_bool);
        match (text, encrypt) {
            (Some(text), Some(encrypt)) => Ok(Self { text, encrypt }),
            _ => Err(CipherWebError::internal_error(
                "validated body lost its text or encrypt field",
                None,
            )),
        }
    }
}

fn build_cipher(kind: CipherKind, body: &Map<String, Value>) -> Result<CipherVariant> {
    Ok(match kind {
        CipherKind::Atbash => AtbashCipher::new().into(),
        CipherKind::Caesar => {
            let key = body
                .get("key")
                .ok_or(CipherWebError::MissingArgument)
                .and_then(integer_key)?;
            CaesarCipher::new(key).into()
        }
        CipherKind::Affine => {
            let keys = body
                .get("keys")
                .and_then(Value::as_array)
                .ok_or_else(|| CipherWebError::invalid_argument_type("keys"))?
                .iter()
                .map(integer_key)
                .collect::<Result<Vec<i64>>>()?;
            AffineCipher::from_keys(&keys)?.into()
        }
    })
}

/// Read a JSON integer key as an `i64`
///
/// Integers above `i64::MAX` are reduced modulo 26 into `26..52`. Both
/// ciphers only use keys modulo 26, and gcd with 26 is unchanged.
fn integer_key(value: &Value) -> Result<i64> {
    if let Some(key) = value.as_i64() {
        return Ok(key);
    }

    value
        .as_u64()
        .and_then(|key| i64::try_from(key % ALPHABET_LEN.unsigned_abs()).ok())
        .map(|residue| residue + ALPHABET_LEN)
        .ok_or_else(|| CipherWebError::invalid_keys(format!("key {value} is not an integer")))
}
