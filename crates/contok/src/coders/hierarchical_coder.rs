//! # Hierarchical LZ Coder
//!
//! One [`LZCoder`] per context, where the context of each step is the id
//! emitted by the step before it.
//!
//! When a context's coder mints a codeword, the other contexts vote on its
//! id: each one proposes a token for the same remaining input, and registered
//! proposals count as votes. The most-voted id that is still free in the
//! current context wins, so equivalent continuations tend to share ids.

use std::collections::BTreeMap;

use crate::coders::lz_coder::{LZCoder, no_match_error};
use crate::errors::{CTResult, ContokError};
use crate::tokenizers::Tokenizer;
use crate::types::{TokenType, VocabSet, empty_token, token_repr};

/// Options for [`HierarchicalLZCoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchicalLZCoderOptions<T: TokenType> {
    /// The id space bound shared by every context; `None` is unbounded.
    pub vocab_size: Option<usize>,

    /// The seed alphabet of the empty context.
    pub input_vocab: VocabSet<T>,
}

impl<T: TokenType> Default for HierarchicalLZCoderOptions<T> {
    fn default() -> Self {
        Self {
            vocab_size: None,
            input_vocab: VocabSet::new(),
        }
    }
}

impl<T: TokenType> HierarchicalLZCoderOptions<T> {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `vocab_size` - The id space bound; `None` is unbounded.
    pub fn new(vocab_size: Option<usize>) -> Self {
        Self {
            vocab_size,
            ..Default::default()
        }
    }

    /// Sets the vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: Option<usize>,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Sets the seed alphabet.
    pub fn with_input_vocab<I: IntoIterator<Item = T>>(
        self,
        input_vocab: I,
    ) -> Self {
        Self {
            input_vocab: input_vocab.into_iter().collect(),
            ..self
        }
    }

    /// Initializes a [`HierarchicalLZCoder`] from these options.
    pub fn init(self) -> CTResult<HierarchicalLZCoder<T>> {
        HierarchicalLZCoder::new(self.vocab_size, self.input_vocab)
    }
}

/// Context-conditioned adaptive dictionary coder.
///
/// The same numeric id may denote different codewords in different contexts.
/// [`empty_token`] is both the initial context and an escape: a step that
/// cannot match anything in its context emits it and continues in the empty
/// context, which holds the full alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HierarchicalLZCoder<T: TokenType> {
    vocab_size: Option<usize>,
    coders: BTreeMap<T, LZCoder<T>>,
}

impl<T: TokenType> HierarchicalLZCoder<T> {
    /// Create a coder whose empty context is seeded with `input_vocab`.
    ///
    /// ## Arguments
    /// * `vocab_size` - The id space bound shared by every context.
    /// * `input_vocab` - The seed alphabet.
    pub fn new(
        vocab_size: Option<usize>,
        input_vocab: VocabSet<T>,
    ) -> CTResult<Self> {
        let root = LZCoder::new(vocab_size, input_vocab)?;
        Ok(Self {
            vocab_size,
            coders: BTreeMap::from([(empty_token(), root)]),
        })
    }

    /// The id space bound shared by every context.
    pub fn vocab_size(&self) -> Option<usize> {
        self.vocab_size
    }

    /// The `{ context -> coder }` map.
    pub fn coders(&self) -> &BTreeMap<T, LZCoder<T>> {
        &self.coders
    }

    /// The coder for a context, if it exists.
    pub fn coder(
        &self,
        context: T,
    ) -> Option<&LZCoder<T>> {
        self.coders.get(&context)
    }

    /// The number of contexts, including the empty context.
    pub fn num_contexts(&self) -> usize {
        self.coders.len()
    }

    /// Extend the empty context's alphabet.
    ///
    /// ## Returns
    /// [`ContokError::CapacityExhausted`] if the empty context runs out of ids.
    pub fn update_vocab(
        &mut self,
        symbols: &[T],
    ) -> CTResult<()> {
        match self.coders.get_mut(&empty_token()) {
            Some(root) => root.update_vocab(symbols),
            None => Err(ContokError::UnknownContext(token_repr(empty_token::<T>()))),
        }
    }

    /// Resolve the next token in `context` without registering it.
    ///
    /// ## Returns
    /// `(len, id)` for the codeword `remaining[..len]`; a fresh codeword's id
    /// is chosen by [`arbitrate`](Self::arbitrate).
    fn resolve(
        &self,
        remaining: &[T],
        context: T,
        learn: bool,
    ) -> CTResult<(usize, T)> {
        let coder = self
            .coders
            .get(&context)
            .ok_or_else(|| ContokError::UnknownContext(token_repr(context)))?;

        let (len, id) = coder.propose_next_token(remaining, learn);
        if coder.is_registered(id) {
            return Ok((len, id));
        }

        if !learn {
            return Err(no_match_error(learn));
        }
        let fallback = coder.unused_ids().smallest().ok_or_else(|| {
            ContokError::CapacityExhausted(format!(
                "context {} has no unused ids",
                token_repr(context)
            ))
        })?;

        Ok((len, self.arbitrate(remaining, context, coder, fallback)))
    }

    /// Pick the id for a codeword that `context` is about to mint.
    ///
    /// Each other context, in ascending order, proposes a token for
    /// `remaining`; a proposal it has already registered is a vote. Only ids
    /// unused in `context` are eligible. A single eligible id with the most
    /// votes wins; a tie for the most votes, or no eligible vote at all,
    /// resolves to `fallback`.
    fn arbitrate(
        &self,
        remaining: &[T],
        context: T,
        current: &LZCoder<T>,
        fallback: T,
    ) -> T {
        let mut votes: BTreeMap<T, usize> = BTreeMap::new();
        for (&other_context, other) in &self.coders {
            if other_context == context {
                continue;
            }
            let (_, id) = other.propose_next_token(remaining, true);
            if other.is_registered(id) && current.unused_ids().contains(id) {
                *votes.entry(id).or_default() += 1;
            }
        }

        let Some(&best) = votes.values().max() else {
            return fallback;
        };
        let mut leaders = votes
            .into_iter()
            .filter(|&(_, count)| count == best)
            .map(|(id, _)| id);
        match (leaders.next(), leaders.next()) {
            (Some(id), None) => id,
            _ => fallback,
        }
    }

    /// Encode a single codeword from the front of `remaining` in `context`.
    ///
    /// ## Arguments
    /// * `remaining` - The unconsumed input.
    /// * `context` - The previously emitted id, or [`empty_token`].
    /// * `learn` - Whether new contexts and codewords may be created.
    ///
    /// ## Returns
    /// `(codeword, id)`; `([], empty_token())` for empty input, or when the
    /// context cannot match anything and escapes.
    pub fn encode_one_token(
        &mut self,
        remaining: &[T],
        context: T,
        learn: bool,
    ) -> CTResult<(Vec<T>, T)> {
        let (len, id) = self.step(remaining, context, learn)?;
        Ok((remaining[..len].to_vec(), id))
    }

    fn step(
        &mut self,
        remaining: &[T],
        context: T,
        learn: bool,
    ) -> CTResult<(usize, T)> {
        if remaining.is_empty() {
            return Ok((0, empty_token()));
        }

        if learn && !self.coders.contains_key(&context) {
            log::debug!("creating context {}", token_repr(context));
            let coder = LZCoder::new(self.vocab_size, VocabSet::new())?;
            self.coders.insert(context, coder);
        }

        let (len, id) = self.resolve(remaining, context, learn)?;
        if let Some(coder) = self.coders.get_mut(&context)
            && !coder.is_registered(id)
        {
            coder.register(&remaining[..len], id);
        }
        Ok((len, id))
    }

    /// Encode `symbols`, optionally learning new contexts and codewords.
    ///
    /// ## Returns
    /// The emitted ids; [`empty_token`] marks an escape to the empty context.
    /// Fails with [`ContokError::NoMatch`] when even the empty context
    /// cannot match the remaining input.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, symbols)))]
    pub fn encode(
        &mut self,
        symbols: &[T],
        learn: bool,
    ) -> CTResult<Vec<T>> {
        if !learn {
            return self.encode_known(symbols);
        }

        let mut encoded = Vec::with_capacity(symbols.len() / 2 + 1);
        let mut context = empty_token();
        let mut remaining = symbols;
        while !remaining.is_empty() {
            let (len, id) = self.step(remaining, context, true)?;
            if len == 0 && context == empty_token() {
                return Err(no_match_error(true));
            }
            encoded.push(id);
            context = id;
            remaining = &remaining[len..];
        }
        Ok(encoded)
    }

    /// Encode `symbols` with the current dictionaries, without learning.
    pub fn encode_known(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>> {
        let mut encoded = Vec::with_capacity(symbols.len() / 2 + 1);
        let mut context = empty_token();
        let mut remaining = symbols;
        while !remaining.is_empty() {
            let (len, id) = self.resolve(remaining, context, false)?;
            if len == 0 && context == empty_token() {
                return Err(no_match_error(false));
            }
            encoded.push(id);
            context = id;
            remaining = &remaining[len..];
        }
        Ok(encoded)
    }

    /// Decode ids, tracking the context the same way encoding did.
    pub fn decode(
        &self,
        ids: &[T],
    ) -> CTResult<Vec<T>> {
        let mut decoded = Vec::with_capacity(ids.len() * 2);
        let mut context = empty_token();
        for &id in ids {
            let coder = self
                .coders
                .get(&context)
                .ok_or_else(|| ContokError::UnknownContext(token_repr(context)))?;
            decoded.extend_from_slice(coder.decode_one_token(id)?);
            context = id;
        }
        Ok(decoded)
    }
}

impl<T: TokenType> Tokenizer<T> for HierarchicalLZCoder<T> {
    fn learn(
        &mut self,
        symbols: &[T],
        input_vocab: Option<&VocabSet<T>>,
    ) -> CTResult<Vec<T>> {
        if let Some(input_vocab) = input_vocab {
            self.update_vocab(&input_vocab.iter().copied().collect::<Vec<_>>())?;
        }
        self.encode(symbols, true)
    }

    fn try_encode(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>> {
        self.encode_known(symbols)
    }

    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CTResult<Vec<T>> {
        self.decode(tokens)
    }

    fn input_vocab(&self) -> VocabSet<T> {
        self.coders
            .get(&empty_token())
            .map(|root| root.input_vocab().clone())
            .unwrap_or_default()
    }

    fn output_vocab(&self) -> VocabSet<T> {
        let mut output_vocab: VocabSet<T> = self
            .coders
            .values()
            .flat_map(|coder| coder.codewords().keys().copied())
            .collect();
        output_vocab.insert(empty_token());
        output_vocab
    }
}
