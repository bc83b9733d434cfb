//! Error types for tokenizing, parsing, encoding and decoding.

use thiserror::Error;

/// Errors that can occur anywhere in the text ↔ value round trip.
///
/// Every variant is terminal for the call that raised it; nothing is retried
/// or recovered internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input text could not be split into tokens (unterminated string).
    #[error("tokenize error at byte {position}: {message}")]
    Tokenize { position: usize, message: String },

    /// The token sequence does not form a JSON value.
    /// `token` is the index of the offending token.
    #[error("parsing error at token {token}: {message}")]
    Parse { token: usize, message: String },

    /// A composite value refers back to itself while being encoded.
    #[error("circular reference found while encoding {type_name}")]
    CircularReference { type_name: &'static str },

    /// The decode target lacks the constructor or add capability it needs.
    #[error("{type_name} has no `{capability}` capability")]
    UnsupportedCollection {
        type_name: &'static str,
        capability: &'static str,
    },

    /// A JSON object key has no writable counterpart on the target record.
    #[error("couldn't find member by the name of '{member}' on {type_name}")]
    UnknownMember {
        type_name: &'static str,
        member: String,
    },

    /// The JSON value kind cannot be converted into the target kind.
    #[error("cannot convert {found} into {expected}")]
    IncompatibleType {
        expected: &'static str,
        found: String,
    },

    /// The target's from-text capability rejected the input.
    #[error("invalid {type_name} text {text:?}: {reason}")]
    InvalidText {
        type_name: &'static str,
        text: String,
        reason: String,
    },

    /// A type name is not present in the type registry.
    #[error("unresolved type name {name:?}")]
    UnresolvedTypeName { name: String },

    /// A `RefCell` on the encode path is mutably borrowed elsewhere.
    #[error("{type_name} is already mutably borrowed")]
    AlreadyBorrowed { type_name: &'static str },
}

impl Error {
    pub(crate) fn incompatible(expected: &'static str, found: impl Into<String>) -> Self {
        Error::IncompatibleType {
            expected,
            found: found.into(),
        }
    }
}

/// Convenience alias used throughout jsser-core.
pub type Result<T> = std::result::Result<T, Error>;
