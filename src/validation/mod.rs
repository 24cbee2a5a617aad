//! # Request Validation Module
//!
//! Schema-driven checks on parsed request bodies, run before any cipher work.
//!
//! A [`ValidationSchema`] is an ordered list of argument names and the JSON
//! type each must have. Validation happens in two passes:
//!
//! 1. every schema argument must be present, otherwise
//!    `CipherWebError::MissingArgument` (the name is not reported);
//! 2. each argument's type is checked in schema order, and the first
//!    mismatch fails with `CipherWebError::InvalidArgumentType` naming it.
//!
//! List contents are not inspected here; building the cipher does that.

use crate::cipher::CipherKind;
use crate::error::{CipherWebError, Result};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Primitive JSON types a body argument can be declared as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// JSON string
    String,
    /// JSON `true` / `false`
    Boolean,
    /// JSON number without a fractional part or exponent
    Integer,
    /// JSON array
    List,
}

impl ArgType {
    /// Whether `value` has this type.
    ///
    /// Booleans are never integers, and `3.0` is a float, not an integer.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::List => value.is_array(),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::List => "list",
        })
    }
}

/// Ordered mapping from argument name to expected type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSchema {
    fields: Vec<(&'static str, ArgType)>,
}

impl ValidationSchema {
    /// Empty schema; every body passes.
    #[must_use]
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    /// Arguments every cipher endpoint takes: `text` and `encrypt`.
    #[must_use]
    pub fn base() -> Self {
        Self::empty()
            .with("text", ArgType::String)
            .with("encrypt", ArgType::Boolean)
    }

    /// Schema for the endpoint serving `kind`.
    #[must_use]
    pub fn for_cipher(kind: CipherKind) -> Self {
        match kind {
            CipherKind::Atbash => Self::base(),
            CipherKind::Caesar => Self::base().with("key", ArgType::Integer),
            CipherKind::Affine => Self::base().with("keys", ArgType::List),
        }
    }

    /// Add an argument. Redeclaring a name changes its type but keeps its
    /// original position.
    #[must_use]
    pub fn with(mut self, name: &'static str, arg_type: ArgType) -> Self {
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(existing) => existing.1 = arg_type,
            None => self.fields.push((name, arg_type)),
        }
        self
    }

    /// Declared arguments in check order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, ArgType)> + '_ {
        self.fields.iter().copied()
    }

    /// Check `body` against the schema.
    ///
    /// ## Errors
    /// - `CipherWebError::MissingArgument`: if any declared argument is absent
    /// - `CipherWebError::InvalidArgumentType`: for the first argument, in
    ///   schema order, whose value has the wrong type
    pub fn validate(&self, body: &Map<String, Value>) -> Result<()> {
        if let Some((name, _)) = self.fields.iter().find(|(name, _)| !body.contains_key(*name)) {
            debug!(argument = name, "missing body argument");
            return Err(CipherWebError::MissingArgument);
        }

        for (name, arg_type) in &self.fields {
            if !body.get(*name).is_some_and(|value| arg_type.matches(value)) {
                debug!(argument = name, expected = %arg_type, "invalid body argument type");
                return Err(CipherWebError::invalid_argument_type(*name));
            }
        }

        Ok(())
    }
}

impl Default for ValidationSchema {
    fn default() -> Self {
        Self::base()
    }
}
