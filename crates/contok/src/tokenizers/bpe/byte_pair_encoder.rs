//! # Byte Pair Encoder

use core::cmp::Ordering;
use std::collections::BTreeMap;

use dary_heap::OctonaryHeap;

use crate::errors::{CTResult, ContokError};
use crate::tokenizers::Tokenizer;
use crate::tokenizers::bpe::merge_span::MergeSpan;
use crate::tokenizers::bpe::pair_index::{PairIndex, PairSpanMap};
use crate::types::{CommonHashMap, CommonHashSet, Pair, TokenType, VocabSet, alphabet_of};
use crate::utility::validators::try_vocab_size;

/// Options for [`BytePairEncoder`].
///
/// At least one of the two limits must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BytePairEncoderOptions {
    /// The largest output id, counting alphabet ids and merges.
    pub max_output_vocab: Option<usize>,

    /// The largest number of merges to learn.
    pub max_merges: Option<usize>,
}

impl BytePairEncoderOptions {
    /// Sets the output vocab limit.
    pub fn with_max_output_vocab(
        self,
        max_output_vocab: usize,
    ) -> Self {
        Self {
            max_output_vocab: Some(max_output_vocab),
            ..self
        }
    }

    /// Sets the merge limit.
    pub fn with_max_merges(
        self,
        max_merges: usize,
    ) -> Self {
        Self {
            max_merges: Some(max_merges),
            ..self
        }
    }

    /// Initializes an untrained [`BytePairEncoder`] from these options.
    ///
    /// ## Returns
    /// The encoder, or [`ContokError::InvalidConfiguration`] when neither
    /// limit is set.
    pub fn init<T: TokenType>(self) -> CTResult<BytePairEncoder<T>> {
        BytePairEncoder::new(self)
    }

    /// The number of merges allowed on top of an `alphabet_size` alphabet.
    fn merge_budget(
        &self,
        alphabet_size: usize,
    ) -> usize {
        let by_vocab = self
            .max_output_vocab
            .map_or(usize::MAX, |max| max.saturating_sub(alphabet_size));
        by_vocab.min(self.max_merges.unwrap_or(usize::MAX))
    }
}

/// Info about a [`Pair`] that could be merged.
#[derive(Debug, Eq)]
struct MergeJob<T: TokenType> {
    count: usize,
    pair: Pair<T>,
    span_indices: CommonHashSet<usize>,
}

impl<T: TokenType> MergeJob<T> {
    /// Max-heap by count; ties go to the larger pair.
    fn heap_key(&self) -> (usize, Pair<T>) {
        (self.count, self.pair)
    }
}

impl<T: TokenType> PartialEq for MergeJob<T> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.heap_key() == other.heap_key()
    }
}

impl<T: TokenType> PartialOrd for MergeJob<T> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TokenType> Ord for MergeJob<T> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.heap_key().cmp(&other.heap_key())
    }
}

/// Greedy pair-merging tokenizer.
///
/// Alphabet symbols map to ids `1..=n` in ascending symbol order, and each
/// learned merge takes the next id. Id `0` is the empty string.
///
/// With the `serde` feature, the pair lookup table is not serialized; it is
/// rebuilt from the merge list on load.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "BytePairTables<T>"))]
pub struct BytePairEncoder<T: TokenType> {
    options: BytePairEncoderOptions,
    symbol_ids: BTreeMap<T, T>,
    merges: Vec<(Pair<T>, T)>,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    merge_ids: CommonHashMap<Pair<T>, T>,
    token_values: Vec<Vec<T>>,
}

/// The serialized form of a [`BytePairEncoder`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct BytePairTables<T: TokenType> {
    options: BytePairEncoderOptions,
    symbol_ids: BTreeMap<T, T>,
    merges: Vec<(Pair<T>, T)>,
    token_values: Vec<Vec<T>>,
}

#[cfg(feature = "serde")]
impl<T: TokenType> From<BytePairTables<T>> for BytePairEncoder<T> {
    fn from(tables: BytePairTables<T>) -> Self {
        let merge_ids = tables.merges.iter().copied().collect();
        Self {
            options: tables.options,
            symbol_ids: tables.symbol_ids,
            merges: tables.merges,
            merge_ids,
            token_values: tables.token_values,
        }
    }
}

impl<T: TokenType> BytePairEncoder<T> {
    /// Create an untrained encoder.
    pub fn new(options: BytePairEncoderOptions) -> CTResult<Self> {
        match options.max_output_vocab {
            None if options.max_merges.is_none() => {
                return Err(ContokError::InvalidConfiguration(
                    "one of max_output_vocab or max_merges is required".to_string(),
                ));
            }
            Some(max) => {
                try_vocab_size::<T>(max.saturating_add(1))?;
            }
            None => (),
        }

        Ok(Self {
            options,
            symbol_ids: BTreeMap::new(),
            merges: Vec::new(),
            merge_ids: CommonHashMap::default(),
            token_values: vec![Vec::new()],
        })
    }

    /// The training limits.
    pub fn options(&self) -> &BytePairEncoderOptions {
        &self.options
    }

    /// The learned merges, in learning order, as `(pair, merged id)`.
    pub fn merges(&self) -> &[(Pair<T>, T)] {
        &self.merges
    }

    /// The number of alphabet ids.
    pub fn alphabet_size(&self) -> usize {
        self.symbol_ids.len()
    }

    /// The largest assigned id, or `0` when untrained.
    pub fn max_token(&self) -> usize {
        self.token_values.len() - 1
    }

    fn to_token(id: usize) -> CTResult<T> {
        let size = try_vocab_size::<T>(id.saturating_add(1))?;
        T::from_usize(size - 1).ok_or(ContokError::VocabSizeOverflow { size })
    }

    /// Learn merges from a batch of samples.
    ///
    /// Previously learned tables are discarded. Merges never cross sample
    /// boundaries.
    ///
    /// ## Arguments
    /// * `samples` - The training samples.
    /// * `input_vocab` - The declared alphabet; when `None`, the symbols of
    ///   the samples.
    ///
    /// ## Returns
    /// The samples' encodings under the learned merges.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, samples, input_vocab)))]
    pub fn learn_from_samples<S: AsRef<[T]>>(
        &mut self,
        samples: &[S],
        input_vocab: Option<&VocabSet<T>>,
    ) -> CTResult<Vec<Vec<T>>> {
        let alphabet = match input_vocab {
            Some(input_vocab) => input_vocab.clone(),
            None => samples
                .iter()
                .flat_map(|sample| alphabet_of(sample.as_ref()))
                .collect(),
        };

        self.symbol_ids.clear();
        self.merges.clear();
        self.merge_ids.clear();
        self.token_values = vec![Vec::new()];
        for (idx, &symbol) in alphabet.iter().enumerate() {
            self.symbol_ids.insert(symbol, Self::to_token(idx + 1)?);
            self.token_values.push(vec![symbol]);
        }

        let mut spans = samples
            .iter()
            .map(|sample| self.map_symbols(sample.as_ref()).map(MergeSpan::from))
            .collect::<CTResult<Vec<_>>>()?;

        let num_merges = self.options.merge_budget(alphabet.len());
        log::info!(
            "Starting BPE training: alphabet of {}, up to {} merges",
            alphabet.len(),
            num_merges
        );

        let mut index = PairIndex::from_spans(&spans);
        let pair_spans = core::mem::take(&mut index.pair_spans);

        let mut heap = OctonaryHeap::with_capacity(pair_spans.len());
        for (pair, span_indices) in pair_spans {
            let count = index.count(&pair);
            if count > 0 {
                heap.push(MergeJob {
                    count,
                    pair,
                    span_indices,
                });
            }
        }

        let mut merges_done = 0;
        let mut last_log_percent = 0;
        while merges_done < num_merges {
            let Some(mut job) = heap.pop() else {
                break;
            };

            // Lazy refresh.
            let current = index.count(&job.pair);
            if job.count != current {
                job.count = current;
                if job.count > 0 {
                    heap.push(job);
                }
                continue;
            }

            // A pair seen once is not worth a merge.
            if job.count < 2 {
                break;
            }

            let new_token = Self::to_token(self.token_values.len())?;
            let (a, b) = job.pair;
            let mut value = self.token_values[a.to_usize().unwrap_or_default()].clone();
            value.extend_from_slice(&self.token_values[b.to_usize().unwrap_or_default()]);
            self.token_values.push(value);
            self.merges.push((job.pair, new_token));
            self.merge_ids.insert(job.pair, new_token);

            let mut new_pair_spans: PairSpanMap<T> = PairSpanMap::default();
            for &span_idx in &job.span_indices {
                spans[span_idx].merge_pair_cb(job.pair, new_token, &mut |pair, delta| {
                    index.apply_delta(pair, delta);
                    if delta > 0 {
                        new_pair_spans.entry(pair).or_default().insert(span_idx);
                    }
                });
            }

            // Every added pair contains `new_token`, so none is in the heap yet.
            for (pair, span_indices) in new_pair_spans {
                let count = index.count(&pair);
                if count > 0 {
                    heap.push(MergeJob {
                        count,
                        pair,
                        span_indices,
                    });
                }
            }

            merges_done += 1;

            let current_percent = (merges_done * 100) / num_merges;
            if current_percent > last_log_percent {
                log::info!(
                    "Progress: {}% ({}/{} merges) - Last merge: {:?} -> {} (frequency: {})",
                    current_percent,
                    merges_done,
                    num_merges,
                    job.pair,
                    new_token,
                    job.count
                );
                last_log_percent = current_percent;
            }
        }

        log::info!("Finished training: {} merges completed", merges_done);
        Ok(spans
            .into_iter()
            .map(|span| span.tokens().to_vec())
            .collect())
    }

    /// Map alphabet symbols to their ids.
    fn map_symbols(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>> {
        symbols
            .iter()
            .map(|symbol| {
                self.symbol_ids
                    .get(symbol)
                    .copied()
                    .ok_or_else(|| ContokError::UnknownSymbol(symbol.to_string()))
            })
            .collect()
    }

    /// Apply the learned merges, lowest id first, until none applies.
    fn merge_scan(
        &self,
        tokens: &mut Vec<T>,
    ) {
        while tokens.len() >= 2 {
            let Some((token, idx)) = tokens
                .windows(2)
                .enumerate()
                .filter_map(|(idx, w)| self.merge_ids.get(&(w[0], w[1])).map(|&t| (t, idx)))
                .min()
            else {
                break;
            };

            // tokens[idx..=idx+1] (a, b) -> tokens[idx] t
            tokens[idx] = token;
            tokens.remove(idx + 1);
        }
    }
}

impl<T: TokenType> Tokenizer<T> for BytePairEncoder<T> {
    fn learn(
        &mut self,
        symbols: &[T],
        input_vocab: Option<&VocabSet<T>>,
    ) -> CTResult<Vec<T>> {
        let mut encoded = self.learn_from_samples(&[symbols], input_vocab)?;
        Ok(encoded.pop().unwrap_or_default())
    }

    fn try_encode(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>> {
        let mut tokens = self.map_symbols(symbols)?;
        self.merge_scan(&mut tokens);
        Ok(tokens)
    }

    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CTResult<Vec<T>> {
        let mut decoded = Vec::with_capacity(tokens.len() * 2);
        for &token in tokens {
            let value = token
                .to_usize()
                .and_then(|idx| self.token_values.get(idx))
                .ok_or_else(|| ContokError::UnknownId(token.to_string()))?;
            decoded.extend_from_slice(value);
        }
        Ok(decoded)
    }

    fn input_vocab(&self) -> VocabSet<T> {
        self.symbol_ids.keys().copied().collect()
    }

    fn output_vocab(&self) -> VocabSet<T> {
        self.symbol_ids
            .values()
            .copied()
            .chain(self.merges.iter().map(|&(_, id)| id))
            .collect()
    }
}
