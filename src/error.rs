//! Error types for building code trees and converting text.

use thiserror::Error;

use crate::heap::EmptyQueue;

/// Error variants for table validation, encoding and decoding.
#[derive(Debug, Error)]
pub enum Error {
    /// A frequency table line did not have three fields.
    #[error("INVALID RECORD: line {line} must be `<character> <separator> <frequency>`")]
    MalformedRecord { line: usize },

    /// The frequency field is not an integer.
    #[error("INVALID FREQUENCY: '{0}' is not an integer")]
    NonIntegerFrequency(String),

    /// The frequency is zero or negative.
    #[error("INVALID FREQUENCY: must be > 0")]
    InvalidFrequency(i64),

    #[error("INVALID CHAR: key must be a single character")]
    NotSingleCharacter(String),

    #[error("INVALID CHAR: key must be alphabetical")]
    NotAlphabetic(char),

    #[error("INVALID CHAR: {0} has already been added")]
    DuplicateCharacter(char),

    /// The table produced no leaves to build from.
    #[error("INVALID TABLE: the frequency table has no entries")]
    EmptyTable,

    #[error(
        "INVALID CHAR: the character '{0}' is not a leaf node in the frequency table, \
         a permitted punctuation symbol, or a whitespace."
    )]
    UnknownCharacter(char),

    #[error("INVALID CHAR: {0} is not a binary bit")]
    NotABit(char),

    #[error("INVALID BINARY: Leftover bits in the encoded string. Cannot be converted.")]
    LeftoverBits,

    /// A rendering width of zero was requested.
    #[error("There must be at least 1 node per line")]
    InvalidWidth,

    /// Bad command-line arguments.
    #[error("{0}")]
    Usage(String),

    /// Internal invariant violation: the builder popped an empty queue.
    #[error("internal error: {0}")]
    Queue(#[from] EmptyQueue),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error stems from caller input rather than a broken invariant.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Error::Queue(_))
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
