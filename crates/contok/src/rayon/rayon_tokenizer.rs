//! # Parallel Tokenizer

use crate::errors::CTResult;
use crate::tokenizers::Tokenizer;
use crate::types::{TokenType, VocabSet};

/// Batch-Level Parallel Tokenizer Wrapper.
///
/// Runs ``rayon`` batch encoding and decoding against the frozen tables of
/// the wrapped tokenizer; learning is delegated unchanged.
#[derive(Debug, Clone)]
pub struct ParallelRayonTokenizer<T: TokenType, Z: Tokenizer<T>> {
    /// Wrapped tokenizer.
    pub inner: Z,

    _marker: std::marker::PhantomData<T>,
}

impl<T, Z> ParallelRayonTokenizer<T, Z>
where
    T: TokenType,
    Z: Tokenizer<T>,
{
    /// Create a new parallel tokenizer.
    ///
    /// ## Arguments
    /// * `inner` - The tokenizer to wrap.
    pub fn new(inner: Z) -> Self {
        Self {
            inner,
            _marker: std::marker::PhantomData,
        }
    }

    /// Unwrap the inner tokenizer.
    pub fn into_inner(self) -> Z {
        self.inner
    }
}

impl<T, Z> Tokenizer<T> for ParallelRayonTokenizer<T, Z>
where
    T: TokenType,
    Z: Tokenizer<T>,
{
    fn learn(
        &mut self,
        symbols: &[T],
        input_vocab: Option<&VocabSet<T>>,
    ) -> CTResult<Vec<T>> {
        self.inner.learn(symbols, input_vocab)
    }

    fn try_encode(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>> {
        self.inner.try_encode(symbols)
    }

    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CTResult<Vec<T>> {
        self.inner.try_decode(tokens)
    }

    fn input_vocab(&self) -> VocabSet<T> {
        self.inner.input_vocab()
    }

    fn output_vocab(&self) -> VocabSet<T> {
        self.inner.output_vocab()
    }

    fn try_encode_batch(
        &self,
        batch: &[Vec<T>],
    ) -> CTResult<Vec<Vec<T>>> {
        use rayon::prelude::*;

        batch
            .par_iter()
            .map(|symbols| self.inner.try_encode(symbols))
            .collect()
    }

    fn try_decode_batch(
        &self,
        batch: &[Vec<T>],
    ) -> CTResult<Vec<Vec<T>>> {
        use rayon::prelude::*;

        batch
            .par_iter()
            .map(|tokens| self.inner.try_decode(tokens))
            .collect()
    }
}
