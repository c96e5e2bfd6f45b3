//! Error types for parsing, serializing and patching attr trees.
//!
//! Lookups, wrong-kind access and numeric narrowing never fail; only
//! malformed input, broken writer invariants and failed patches surface here.

use thiserror::Error;

/// Errors that can occur while reading, writing or patching attr trees.
#[derive(Error, Debug)]
pub enum AttrError {
    /// The native tokenizer could not lex the input.
    /// `offset` is the byte position where the problem was detected.
    #[error("JSON lex error at byte {offset}: {message}")]
    Lex { offset: usize, message: String },

    /// The serde_json-backed tokenizer rejected the input.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The tree builder failed while consuming a token stream.
    #[error("failed to parse attr tree: {0}")]
    Parse(#[source] Box<AttrError>),

    /// The token stream was well-lexed but not a well-formed element.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    /// Nesting exceeded the configured depth limit.
    #[error("nesting depth limit of {limit} exceeded")]
    DepthLimit { limit: usize },

    /// Extra content followed the root element and trailing content is rejected.
    #[error("trailing content after the root element")]
    TrailingContent,

    /// A writer was driven with a token sequence that breaks its invariants.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A generic value extraction could not convert the payload.
    #[error("cannot convert {from} to {to}")]
    Conversion { from: String, to: String },

    /// A JSON Pointer did not resolve.
    #[error("pointer error: {0}")]
    Pointer(String),

    /// A JSON Patch operation failed. `index` is the position of the operation.
    #[error("patch operation {index} failed: {message}")]
    Patch { index: usize, message: String },
}

impl AttrError {
    /// Create a lex error at the given byte offset.
    pub fn lex<S: Into<String>>(offset: usize, message: S) -> Self {
        Self::Lex {
            offset,
            message: message.into(),
        }
    }

    /// Create an unexpected-token error.
    pub fn unexpected<E: Into<String>, F: Into<String>>(expected: E, found: F) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid-operation error.
    pub fn invalid_operation<S: Into<String>>(message: S) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Create a conversion error.
    pub fn conversion<F: Into<String>, T: Into<String>>(from: F, to: T) -> Self {
        Self::Conversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a patch error for the operation at `index`.
    pub fn patch<S: Into<String>>(index: usize, message: S) -> Self {
        Self::Patch {
            index,
            message: message.into(),
        }
    }

    /// Wrap this error as a tree-builder failure, unless it already is one.
    pub(crate) fn into_parse(self) -> Self {
        match self {
            AttrError::Parse(_) => self,
            other => AttrError::Parse(Box::new(other)),
        }
    }
}

/// Convenience alias used throughout attr-core.
pub type Result<T> = std::result::Result<T, AttrError>;
