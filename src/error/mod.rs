//! # Error Handling Module
//!
//! A single error type covers the whole service: request validation, cipher
//! construction, and the HTTP plumbing around them. Every variant knows the
//! status code and the sanitized message the HTTP boundary sends back, while
//! the detailed internal message stays in the server logs.
//!
//! ## Status Mapping
//!
//! - **Validation errors** (`MissingArgument`, `InvalidArgumentType`) map to
//!   400 with a message that tells the caller what to fix.
//! - **Everything else** (malformed bodies, cipher errors such as
//!   `IncompatibleKey`, and every server-side failure) collapses to 500
//!   `Unexpected error`. The
//!   variants stay distinct internally so callers and tests can match on them.

use std::borrow::Cow;
use thiserror::Error;

/// Result type alias for the cipher web library
pub type Result<T> = std::result::Result<T, CipherWebError>;

/// Client message for every failure that is not a validation error.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error";

/// Client message when a required body argument is absent.
pub const MISSING_ARGUMENT_MESSAGE: &str = "Missing body argument";

/// Error types for the cipher web service
///
/// ## Error Categories
///
/// - **Validation Errors**: body arguments missing or of the wrong type
/// - **Cipher Errors**: keys that cannot build a valid substitution
/// - **Request Errors**: bodies that are not a JSON object at all
/// - **Server Errors**: HTTP, configuration and internal failures
#[derive(Error, Debug)]
pub enum CipherWebError {
    /// A field required by the endpoint's schema is absent from the body.
    ///
    /// The argument name is deliberately not carried: the client only learns
    /// that something is missing.
    #[error("Missing body argument")]
    MissingArgument,

    /// A body field is present but its JSON type does not match the schema.
    #[error("Invalid type for body argument '{argument}'")]
    InvalidArgumentType {
        /// Name of the first mismatched argument in schema order
        argument: String,
    },

    /// The Affine multiplicative key is not invertible modulo 26.
    #[error("Key {key} is not coprime with the alphabet length")]
    IncompatibleKey {
        /// The rejected multiplicative key
        key: i64,
    },

    /// An arithmetic precondition was violated (e.g. `gcd` of a non-positive
    /// operand, or a substitution mapping that is not a permutation).
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Internal error message for logging
        message: String,
    },

    /// Cipher keys were supplied in an unusable shape: wrong arity,
    /// non-integer list elements, or integers outside the `i64` range.
    #[error("Invalid cipher keys: {message}")]
    InvalidKeys {
        /// Internal error message for logging
        message: String,
    },

    /// The request body could not be interpreted as a JSON object.
    ///
    /// **Security**: Provides generic "Unexpected error" response
    #[error("Invalid request: {message}")]
    RequestError {
        /// Internal error message for logging
        message: String,
    },

    /// HTTP server operation failed
    ///
    /// Covers listener binding, connection handling and response building.
    #[error("Server error: {message}")]
    ServerError {
        /// Internal error message for logging
        message: String,
        /// Optional source error for error chain analysis
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Server configuration is invalid
    ///
    /// **Performance**: These should only occur at startup
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Internal error message for logging
        message: String,
        /// Optional source error for error chain analysis
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Unexpected internal system error
    #[error("Internal error: {message}")]
    InternalError {
        /// Internal error message for logging
        message: String,
        /// Optional source error for error chain analysis
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CipherWebError {
    /// Create an invalid-type error naming the offending argument
    #[inline]
    pub fn invalid_argument_type<T>(argument: T) -> Self
    where
        T: Into<String>,
    {
        Self::InvalidArgumentType {
            argument: argument.into(),
        }
    }

    /// Create an incompatible-key error for a non-invertible multiplier
    #[inline]
    #[must_use]
    pub fn incompatible_key(key: i64) -> Self {
        Self::IncompatibleKey { key }
    }

    /// Create an invalid-argument error with message
    #[inline]
    pub fn invalid_argument<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an invalid-keys error with message
    #[inline]
    pub fn invalid_keys<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self::InvalidKeys {
            message: message.into(),
        }
    }

    /// Create a new request error with message
    #[inline]
    pub fn request_error<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self::RequestError {
            message: message.into(),
        }
    }

    /// Create a new server error with message and optional source
    ///
    /// ## Parameters
    /// - `message`: Internal error message for logging
    /// - `source`: Optional source error for error chain analysis
    #[inline]
    pub fn server_error<T>(
        message: T,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self::ServerError {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error with message and optional source
    #[inline]
    pub fn config_error<T>(
        message: T,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self::ConfigError {
            message: message.into(),
            source,
        }
    }

    /// Create a new internal error with message and optional source
    #[inline]
    pub fn internal_error<T>(
        message: T,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self::InternalError {
            message: message.into(),
            source,
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// Only validation errors are 400. Everything else, malformed bodies and
    /// cipher construction failures included, is a 500.
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingArgument | Self::InvalidArgumentType { .. } => 400,
            Self::RequestError { .. }
            | Self::IncompatibleKey { .. }
            | Self::InvalidArgument { .. }
            | Self::InvalidKeys { .. }
            | Self::ServerError { .. }
            | Self::ConfigError { .. }
            | Self::InternalError { .. } => 500,
        }
    }

    /// Get the sanitized error message for client responses
    ///
    /// Only the invalid-type message is built at runtime, since it has to
    /// name the argument. Cipher and server failures never leak detail.
    #[must_use]
    pub fn client_message(&self) -> Cow<'static, str> {
        match self {
            Self::MissingArgument => Cow::Borrowed(MISSING_ARGUMENT_MESSAGE),
            Self::InvalidArgumentType { argument } => {
                Cow::Owned(format!("Invalid type for body argument '{argument}'"))
            }
            Self::RequestError { .. }
            | Self::IncompatibleKey { .. }
            | Self::InvalidArgument { .. }
            | Self::InvalidKeys { .. }
            | Self::ServerError { .. }
            | Self::ConfigError { .. }
            | Self::InternalError { .. } => Cow::Borrowed(UNEXPECTED_ERROR_MESSAGE),
        }
    }

    /// Get the internal error message for logging
    ///
    /// This should never be sent to clients.
    #[must_use]
    pub fn internal_message(&self) -> String {
        match self {
            Self::MissingArgument => MISSING_ARGUMENT_MESSAGE.to_string(),
            Self::InvalidArgumentType { argument } => {
                format!("argument '{argument}' has the wrong type")
            }
            Self::IncompatibleKey { key } => {
                format!("multiplicative key {key} is not invertible modulo 26")
            }
            Self::InvalidArgument { message }
            | Self::InvalidKeys { message }
            | Self::RequestError { message }
            | Self::ServerError { message, .. }
            | Self::ConfigError { message, .. }
            | Self::InternalError { message, .. } => message.clone(),
        }
    }

    /// Check if this error should be logged at ERROR level
    ///
    /// Anything a client can trigger with a bad body is expected and logs at
    /// WARN. An `InvalidArgument` means an arithmetic invariant was broken.
    #[inline]
    #[must_use]
    pub fn is_critical(&self) -> bool {
        match self {
            Self::MissingArgument
            | Self::InvalidArgumentType { .. }
            | Self::RequestError { .. }
            | Self::IncompatibleKey { .. }
            | Self::InvalidKeys { .. } => false,
            Self::InvalidArgument { .. }
            | Self::ServerError { .. }
            | Self::ConfigError { .. }
            | Self::InternalError { .. } => true,
        }
    }

    /// Whether the error came out of request validation
    #[inline]
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument | Self::InvalidArgumentType { .. }
        )
    }
}

impl From<std::io::Error> for CipherWebError {
    #[inline]
    fn from(err: std::io::Error) -> Self {
        Self::server_error(format!("I/O error: {err}"), Some(Box::new(err)))
    }
}

impl From<serde_json::Error> for CipherWebError {
    #[inline]
    fn from(err: serde_json::Error) -> Self {
        Self::request_error(format!("JSON parsing error: {err}"))
    }
}

impl From<hyper::Error> for CipherWebError {
    #[inline]
    fn from(err: hyper::Error) -> Self {
        Self::server_error(format!("Hyper error: {err}"), Some(Box::new(err)))
    }
}

impl From<hyper::http::Error> for CipherWebError {
    #[inline]
    fn from(err: hyper::http::Error) -> Self {
        Self::server_error(format!("HTTP error: {err}"), Some(Box::new(err)))
    }
}
