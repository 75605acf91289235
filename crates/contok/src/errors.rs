//! # Error Types

/// Errors from contok operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContokError {
    /// No unused id remains when one is required.
    #[error("capacity exhausted: {0}")]
    CapacityExhausted(String),

    /// Encoding could not make progress on the remaining input.
    #[error("could not match any tokens: {0}")]
    NoMatch(String),

    /// Decoding referenced an id with no registered codeword.
    #[error("unknown token id: {0}")]
    UnknownId(String),

    /// A context has no coder and learning is disabled.
    #[error("unknown context: {0}")]
    UnknownContext(String),

    /// An encoder met a symbol outside its learned alphabet.
    #[error("unknown input symbol: {0}")]
    UnknownSymbol(String),

    /// Options or seed vocabularies are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Vocab size does not fit below the empty-token sentinel of the token type.
    #[error("vocab size ({size}) exceeds token type capacity")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the capacity.
        size: usize,
    },
}

/// Result type for contok operations.
pub type CTResult<T> = core::result::Result<T, ContokError>;
