//! # Tokenizer Trait

use crate::errors::CTResult;
use crate::types::{TokenType, VocabSet};

/// The learn / encode / decode contract shared by every tokenizer stage.
///
/// Learning takes `&mut self`; encoding and decoding against the learned
/// tables take `&self`, so a trained tokenizer can be shared across threads.
pub trait Tokenizer<T: TokenType>: Send + Sync {
    /// Build or update the internal tables from a sample.
    ///
    /// ## Arguments
    /// * `symbols` - The training sample.
    /// * `input_vocab` - The declared input alphabet; when `None`, the
    ///   alphabet is taken from the sample.
    ///
    /// ## Returns
    /// The encoding of the sample produced while learning; it always
    /// decodes back to `symbols` under the learned tables.
    fn learn(
        &mut self,
        symbols: &[T],
        input_vocab: Option<&VocabSet<T>>,
    ) -> CTResult<Vec<T>>;

    /// Encode symbols with the learned tables.
    ///
    /// ## Arguments
    /// * `symbols` - The symbols to encode.
    ///
    /// ## Returns
    /// A `Result` containing the encoded tokens or an error.
    fn try_encode(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>>;

    /// Decode tokens back to symbols.
    ///
    /// ## Arguments
    /// * `tokens` - The tokens to decode.
    ///
    /// ## Returns
    /// A `Result` containing the decoded symbols or an error.
    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CTResult<Vec<T>>;

    /// The input alphabet this tokenizer accepts.
    fn input_vocab(&self) -> VocabSet<T>;

    /// The set of tokens this tokenizer can emit.
    fn output_vocab(&self) -> VocabSet<T>;

    /// Encode a batch of sequences.
    ///
    /// ## Arguments
    /// * `batch` - The sequences to encode.
    ///
    /// ## Returns
    /// A `Result` containing one token vector per sequence, or the first error.
    fn try_encode_batch(
        &self,
        batch: &[Vec<T>],
    ) -> CTResult<Vec<Vec<T>>> {
        batch.iter().map(|symbols| self.try_encode(symbols)).collect()
    }

    /// Decode a batch of sequences.
    ///
    /// ## Arguments
    /// * `batch` - The token sequences to decode.
    ///
    /// ## Returns
    /// A `Result` containing one symbol vector per sequence, or the first error.
    fn try_decode_batch(
        &self,
        batch: &[Vec<T>],
    ) -> CTResult<Vec<Vec<T>>> {
        batch.iter().map(|tokens| self.try_decode(tokens)).collect()
    }
}

impl<T: TokenType, Z: Tokenizer<T> + ?Sized> Tokenizer<T> for Box<Z> {
    fn learn(
        &mut self,
        symbols: &[T],
        input_vocab: Option<&VocabSet<T>>,
    ) -> CTResult<Vec<T>> {
        (**self).learn(symbols, input_vocab)
    }

    fn try_encode(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>> {
        (**self).try_encode(symbols)
    }

    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CTResult<Vec<T>> {
        (**self).try_decode(tokens)
    }

    fn input_vocab(&self) -> VocabSet<T> {
        (**self).input_vocab()
    }

    fn output_vocab(&self) -> VocabSet<T> {
        (**self).output_vocab()
    }
}
