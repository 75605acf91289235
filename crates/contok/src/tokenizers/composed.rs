//! # Composed Tokenizer

use crate::errors::CTResult;
use crate::tokenizers::Tokenizer;
use crate::types::{TokenType, VocabSet};

/// An ordered pipeline of tokenizer stages.
///
/// Each stage encodes the previous stage's output; decoding runs the stages
/// in reverse. An empty pipeline is the identity.
pub struct ComposedTokenizer<T: TokenType> {
    stages: Vec<Box<dyn Tokenizer<T>>>,
}

impl<T: TokenType> Default for ComposedTokenizer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TokenType> core::fmt::Debug for ComposedTokenizer<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("ComposedTokenizer")
            .field("num_stages", &self.stages.len())
            .finish()
    }
}

impl<T: TokenType> ComposedTokenizer<T> {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage.
    pub fn with_stage<Z>(
        mut self,
        stage: Z,
    ) -> Self
    where
        Z: Tokenizer<T> + 'static,
    {
        self.push(Box::new(stage));
        self
    }

    /// Append a boxed stage.
    pub fn push(
        &mut self,
        stage: Box<dyn Tokenizer<T>>,
    ) {
        self.stages.push(stage);
    }

    /// The stages, first to last.
    pub fn stages(&self) -> &[Box<dyn Tokenizer<T>>] {
        &self.stages
    }

    /// The number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Is the pipeline empty?
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<T: TokenType> Tokenizer<T> for ComposedTokenizer<T> {
    /// Train each stage on the previous stage's encoding of `symbols`.
    ///
    /// Each stage after the first is told that its input alphabet is the
    /// previous stage's output vocab.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, symbols, input_vocab)))]
    fn learn(
        &mut self,
        symbols: &[T],
        input_vocab: Option<&VocabSet<T>>,
    ) -> CTResult<Vec<T>> {
        let mut sample = symbols.to_vec();
        let mut vocab = input_vocab.cloned();
        for (idx, stage) in self.stages.iter_mut().enumerate() {
            sample = stage.learn(&sample, vocab.as_ref())?;
            let output_vocab = stage.output_vocab();
            log::debug!(
                "stage {idx}: {} tokens, output vocab of {}",
                sample.len(),
                output_vocab.len()
            );
            vocab = Some(output_vocab);
        }
        Ok(sample)
    }

    fn try_encode(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>> {
        let mut tokens = symbols.to_vec();
        for stage in &self.stages {
            tokens = stage.try_encode(&tokens)?;
        }
        Ok(tokens)
    }

    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CTResult<Vec<T>> {
        let mut symbols = tokens.to_vec();
        for stage in self.stages.iter().rev() {
            symbols = stage.try_decode(&symbols)?;
        }
        Ok(symbols)
    }

    fn input_vocab(&self) -> VocabSet<T> {
        self.stages
            .first()
            .map(|stage| stage.input_vocab())
            .unwrap_or_default()
    }

    fn output_vocab(&self) -> VocabSet<T> {
        self.stages
            .last()
            .map(|stage| stage.output_vocab())
            .unwrap_or_default()
    }
}
