//! # LZ Coder
//!
//! An online, order-0, LZ78-family dictionary coder with a hard cap
//! on the number of distinct output ids.

use std::collections::BTreeMap;

use crate::coders::id_pool::IdPool;
use crate::errors::{CTResult, ContokError};
use crate::tokenizers::Tokenizer;
use crate::trie::PrefixTrie;
use crate::types::{TokenType, VocabSet, empty_token, token_repr};
use crate::utility::validators::try_seed_alphabet;

/// Options for [`LZCoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LZCoderOptions<T: TokenType> {
    /// The maximum number of ids the coder may assign; `None` is unbounded.
    pub vocab_size: Option<usize>,

    /// The seed alphabet, registered as single-symbol codewords.
    pub input_vocab: VocabSet<T>,
}

impl<T: TokenType> Default for LZCoderOptions<T> {
    fn default() -> Self {
        Self {
            vocab_size: None,
            input_vocab: VocabSet::new(),
        }
    }
}

impl<T: TokenType> LZCoderOptions<T> {
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
        Self {
            vocab_size,
            ..self
        }
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

    /// Initializes an [`LZCoder`] from these options.
    ///
    /// ## Returns
    /// The seeded coder, or an error if the seed alphabet does not fit.
    pub fn init(self) -> CTResult<LZCoder<T>> {
        LZCoder::new(self.vocab_size, self.input_vocab)
    }
}

/// Adaptive dictionary coder.
///
/// Each encode step greedily matches the longest known codeword; while
/// learning, it also mints `match + next symbol` under the smallest unused id.
///
/// Invariant: `codewords` and `trie` hold the same `(codeword, id)` pairs,
/// including `[] -> empty_token()`, and no id in `codewords` is in `unused_ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LZCoder<T: TokenType> {
    vocab_size: Option<usize>,
    input_vocab: VocabSet<T>,
    unused_ids: IdPool<T>,
    codewords: BTreeMap<T, Vec<T>>,
    trie: PrefixTrie<T>,
}

impl<T: TokenType> LZCoder<T> {
    /// Create a coder seeded with `input_vocab`.
    ///
    /// Seed symbols take ids in ascending order, smallest id first.
    ///
    /// ## Arguments
    /// * `vocab_size` - The id space bound; `None` is unbounded.
    /// * `input_vocab` - The seed alphabet.
    ///
    /// ## Returns
    /// The coder, or [`ContokError::InvalidConfiguration`] if the alphabet
    /// is larger than `vocab_size`.
    pub fn new(
        vocab_size: Option<usize>,
        input_vocab: VocabSet<T>,
    ) -> CTResult<Self> {
        try_seed_alphabet(input_vocab.len(), vocab_size)?;
        let unused_ids = match vocab_size {
            Some(size) => IdPool::bounded(size)?,
            None => IdPool::unbounded(),
        };

        let mut coder = Self {
            vocab_size,
            input_vocab: VocabSet::new(),
            unused_ids,
            codewords: BTreeMap::from([(empty_token(), Vec::new())]),
            trie: PrefixTrie::new(),
        };
        coder.update_vocab(&input_vocab.into_iter().collect::<Vec<_>>())?;
        Ok(coder)
    }

    /// The id space bound; `None` is unbounded.
    pub fn vocab_size(&self) -> Option<usize> {
        self.vocab_size
    }

    /// The registered alphabet.
    pub fn input_vocab(&self) -> &VocabSet<T> {
        &self.input_vocab
    }

    /// The ids not yet assigned.
    pub fn unused_ids(&self) -> &IdPool<T> {
        &self.unused_ids
    }

    /// The `{ id -> codeword }` table, including the empty codeword.
    pub fn codewords(&self) -> &BTreeMap<T, Vec<T>> {
        &self.codewords
    }

    /// The `{ codeword -> id }` index.
    pub fn trie(&self) -> &PrefixTrie<T> {
        &self.trie
    }

    /// The number of assigned ids, not counting the empty codeword.
    pub fn num_assigned(&self) -> usize {
        self.codewords.len() - 1
    }

    /// Is `id` bound to a codeword?
    pub fn is_registered(
        &self,
        id: T,
    ) -> bool {
        self.codewords.contains_key(&id)
    }

    /// Extend the alphabet with any new symbols in `symbols`.
    ///
    /// A symbol whose single-symbol codeword was already learned joins the
    /// alphabet under its existing id.
    ///
    /// ## Returns
    /// [`ContokError::CapacityExhausted`] if a new symbol needs an id and
    /// none remain; symbols registered before the failure stay registered.
    pub fn update_vocab(
        &mut self,
        symbols: &[T],
    ) -> CTResult<()> {
        for &symbol in symbols {
            if self.input_vocab.contains(&symbol) {
                continue;
            }
            if !self.trie.contains(&[symbol]) {
                let id = self.unused_ids.smallest().ok_or_else(|| {
                    ContokError::CapacityExhausted(format!(
                        "no unused ids left for input symbol {symbol}"
                    ))
                })?;
                self.register(&[symbol], id);
            }
            self.input_vocab.insert(symbol);
        }
        Ok(())
    }

    /// Bind `codeword` to `id` and take `id` out of the unused pool.
    pub(crate) fn register(
        &mut self,
        codeword: &[T],
        id: T,
    ) {
        log::trace!("binding id {} to codeword {:?}", token_repr(id), codeword);
        self.codewords.insert(id, codeword.to_vec());
        self.trie.insert(codeword, id);
        self.unused_ids.take(id);
        debug_assert_eq!(self.trie.size(), self.codewords.len());
    }

    /// Propose the next codeword without registering anything.
    ///
    /// ## Arguments
    /// * `remaining` - The unconsumed input.
    /// * `learn` - Whether the match may be extended by one symbol.
    ///
    /// ## Returns
    /// `(len, id)`: the codeword is `remaining[..len]`. When the match was
    /// extended, `id` is the smallest unused id and is not yet registered.
    pub fn propose_next_token(
        &self,
        remaining: &[T],
        learn: bool,
    ) -> (usize, T) {
        let (len, id) = self.trie.longest_prefix_len(remaining);
        if learn
            && len < remaining.len()
            && let Some(fresh) = self.unused_ids.smallest()
        {
            return (len + 1, fresh);
        }
        (len, id)
    }

    /// Run one encode step, registering a proposed codeword if it is new.
    fn step(
        &mut self,
        remaining: &[T],
        learn: bool,
    ) -> (usize, T) {
        let (len, id) = self.propose_next_token(remaining, learn);
        if !self.is_registered(id) {
            self.register(&remaining[..len], id);
        }
        (len, id)
    }

    /// Encode a single codeword from the front of `remaining`.
    ///
    /// ## Returns
    /// `(codeword, id)`; the codeword is empty when nothing matched.
    pub fn encode_one_token(
        &mut self,
        remaining: &[T],
        learn: bool,
    ) -> (Vec<T>, T) {
        let (len, id) = self.step(remaining, learn);
        (remaining[..len].to_vec(), id)
    }

    /// Encode `symbols`, optionally learning new codewords.
    ///
    /// ## Arguments
    /// * `symbols` - The input sequence.
    /// * `learn` - Whether to mint new codewords along the way.
    ///
    /// ## Returns
    /// The emitted ids, or [`ContokError::NoMatch`] if some remainder has no
    /// matching codeword. Ids minted before a failure stay registered.
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
        let mut remaining = symbols;
        while !remaining.is_empty() {
            let (len, id) = self.step(remaining, true);
            if len == 0 {
                return Err(no_match_error(true));
            }
            encoded.push(id);
            remaining = &remaining[len..];
        }
        Ok(encoded)
    }

    /// Encode `symbols` with the current dictionary, without learning.
    ///
    /// ## Returns
    /// The emitted ids, or [`ContokError::NoMatch`].
    pub fn encode_known(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>> {
        let mut encoded = Vec::with_capacity(symbols.len() / 2 + 1);
        let mut remaining = symbols;
        while !remaining.is_empty() {
            let (len, id) = self.propose_next_token(remaining, false);
            if len == 0 {
                return Err(no_match_error(false));
            }
            encoded.push(id);
            remaining = &remaining[len..];
        }
        Ok(encoded)
    }

    /// Look up the codeword for a single id.
    pub fn decode_one_token(
        &self,
        id: T,
    ) -> CTResult<&[T]> {
        self.codewords
            .get(&id)
            .map(Vec::as_slice)
            .ok_or_else(|| ContokError::UnknownId(token_repr(id)))
    }

    /// Decode ids back to symbols.
    ///
    /// ## Returns
    /// The concatenated codewords, or [`ContokError::UnknownId`].
    pub fn decode(
        &self,
        ids: &[T],
    ) -> CTResult<Vec<T>> {
        let mut decoded = Vec::with_capacity(ids.len() * 2);
        for &id in ids {
            decoded.extend_from_slice(self.decode_one_token(id)?);
        }
        Ok(decoded)
    }
}

pub(crate) fn no_match_error(learn: bool) -> ContokError {
    ContokError::NoMatch(
        if learn {
            "the output dictionary is full"
        } else {
            "did you mean to enable learning?"
        }
        .to_string(),
    )
}

impl<T: TokenType> Tokenizer<T> for LZCoder<T> {
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
        self.input_vocab.clone()
    }

    fn output_vocab(&self) -> VocabSet<T> {
        self.codewords
            .keys()
            .copied()
            .filter(|&id| id != empty_token())
            .collect()
    }
}
