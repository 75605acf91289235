//! # Defrag Encoder

use std::collections::BTreeMap;

use crate::errors::{CTResult, ContokError};
use crate::tokenizers::Tokenizer;
use crate::types::{TokenType, VocabSet, alphabet_of};
use crate::utility::validators::try_vocab_size;

/// Maps a sparse alphabet onto the dense ids `1..=n`, in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefragEncoder<T: TokenType> {
    forward: BTreeMap<T, T>,
    inverse: BTreeMap<T, T>,
}

impl<T: TokenType> DefragEncoder<T> {
    /// Create an untrained encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder for a known alphabet.
    pub fn from_vocab(input_vocab: &VocabSet<T>) -> CTResult<Self> {
        let mut encoder = Self::new();
        encoder.learn(&[], Some(input_vocab))?;
        Ok(encoder)
    }

    /// The number of mapped symbols.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Is the mapping empty?
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl<T: TokenType> Tokenizer<T> for DefragEncoder<T> {
    fn learn(
        &mut self,
        symbols: &[T],
        input_vocab: Option<&VocabSet<T>>,
    ) -> CTResult<Vec<T>> {
        let alphabet = input_vocab
            .cloned()
            .unwrap_or_else(|| alphabet_of(symbols));
        let size = try_vocab_size::<T>(alphabet.len().saturating_add(1))?;

        self.forward.clear();
        self.inverse.clear();
        for (idx, symbol) in alphabet.into_iter().enumerate() {
            let id = T::from_usize(idx + 1).ok_or(ContokError::VocabSizeOverflow { size })?;
            self.forward.insert(symbol, id);
            self.inverse.insert(id, symbol);
        }

        self.try_encode(symbols)
    }

    fn try_encode(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>> {
        symbols
            .iter()
            .map(|symbol| {
                self.forward
                    .get(symbol)
                    .copied()
                    .ok_or_else(|| ContokError::UnknownSymbol(symbol.to_string()))
            })
            .collect()
    }

    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CTResult<Vec<T>> {
        tokens
            .iter()
            .map(|token| {
                self.inverse
                    .get(token)
                    .copied()
                    .ok_or_else(|| ContokError::UnknownId(token.to_string()))
            })
            .collect()
    }

    fn input_vocab(&self) -> VocabSet<T> {
        self.forward.keys().copied().collect()
    }

    fn output_vocab(&self) -> VocabSet<T> {
        self.inverse.keys().copied().collect()
    }
}
