//! # Cipher Web Library
//!
//! Classical substitution ciphers (Atbash, Caesar and Affine) over the
//! 26-letter English alphabet, served as a small JSON-over-HTTP API.
//!
//! ## Architecture
//!
//! - [`cipher`] - modular arithmetic, substitution tables and the three ciphers
//! - [`validation`] - required-argument schemas for request bodies
//! - [`error`] - error types and their client-facing messages
//! - [`server`] - Hyper-based HTTP server, configuration and metrics
//!
//! Every cipher uppercases its input, substitutes letters `A`..=`Z` and
//! leaves every other character exactly where it was.
//!
//! ## Example Usage
//!
//! ```rust
//! use cipher_web::{AffineCipher, CaesarCipher, Cipher};
//!
//! let caesar = CaesarCipher::new(3);
//! assert_eq!(caesar.encode("Hello, World!"), "KHOOR, ZRUOG!");
//!
//! let affine = AffineCipher::new(5, 8).unwrap();
//! assert_eq!(affine.decode(&affine.encode("attack at dawn")), "ATTACK AT DAWN");
//! ```
//!
//! Running the server:
//!
//! ```rust,no_run
//! use cipher_web::{start_server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     start_server(ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Thread Safety
//!
//! Ciphers are immutable once built and are `Send + Sync`. The server shares
//! only atomic counters between connections.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cipher;
pub mod error;
pub mod server;
pub mod validation;

// Re-export commonly used types for convenience
pub use cipher::{AffineCipher, AtbashCipher, CaesarCipher, Cipher, CipherKind, CipherVariant};
pub use error::{CipherWebError, Result};
pub use server::{start_server, CipherWebServer, ServerConfig};
pub use validation::{ArgType, ValidationSchema};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default server port
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address for the server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Maximum request body size in bytes (1MB)
///
/// Cipher requests are short texts; anything larger is rejected before
/// JSON parsing.
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Timeout for individual request processing in milliseconds
pub const REQUEST_TIMEOUT_MS: u64 = 5_000;
