//! Error types for preparing and reading common-substring queries.

use thiserror::Error;

/// Error variants surfaced before a tree is built.
///
/// Construction and selection themselves never fail; everything here is a
/// precondition on the input strings or on the text the input was read from.
#[derive(Debug, Error)]
pub enum Error {
    /// More strings were supplied than the terminator pool can distinguish.
    #[error("too many strings: {count} supplied, terminator pool holds {capacity}")]
    TooManyStrings { count: usize, capacity: usize },

    /// An input string contains a symbol reserved as a terminator.
    #[error("string {string} contains reserved terminator symbol {symbol} at position {position}")]
    ReservedSymbol {
        string: usize,
        position: usize,
        symbol: u64,
    },

    /// The input did not start with a string count.
    #[error("missing string count")]
    MissingCount,

    /// The string count could not be parsed.
    #[error("invalid string count: {0:?}")]
    InvalidCount(String),

    /// Fewer strings were supplied than the count announced.
    #[error("expected {expected} strings, found {found}")]
    MissingString { expected: usize, found: usize },

    /// An I/O error occurred while reading input.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for common-substring operations.
pub type Result<T> = std::result::Result<T, Error>;
