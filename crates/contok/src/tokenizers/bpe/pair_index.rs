//! # Pair Index

use crate::tokenizers::bpe::merge_span::MergeSpan;
use crate::types::{CommonHashMap, CommonHashSet, Pair, TokenType};

/// A map from [`Pair`] to its occurrence count.
pub type PairCountMap<T> = CommonHashMap<Pair<T>, usize>;

/// A map from [`Pair`] to the indices of the spans containing it.
pub type PairSpanMap<T> = CommonHashMap<Pair<T>, CommonHashSet<usize>>;

/// Adjacent-pair statistics over a ``&[MergeSpan<T>]``.
#[derive(Debug, Clone, Default)]
pub struct PairIndex<T: TokenType> {
    /// Occurrences of each pair, summed over all spans.
    pub pair_counts: PairCountMap<T>,

    /// The spans each pair occurs in.
    pub pair_spans: PairSpanMap<T>,
}

impl<T: TokenType> PairIndex<T> {
    /// Index every adjacent pair of every span.
    pub fn from_spans(spans: &[MergeSpan<T>]) -> Self {
        let mut index = Self {
            pair_counts: PairCountMap::default(),
            pair_spans: PairSpanMap::default(),
        };
        for (span_idx, span) in spans.iter().enumerate() {
            for pair in span.pairs() {
                *index.pair_counts.entry(pair).or_default() += 1;
                index.pair_spans.entry(pair).or_default().insert(span_idx);
            }
        }
        index
    }

    /// The current count of `pair`.
    pub fn count(
        &self,
        pair: &Pair<T>,
    ) -> usize {
        self.pair_counts.get(pair).copied().unwrap_or_default()
    }

    /// Apply a merge delta reported by [`MergeSpan::merge_pair_cb`].
    pub fn apply_delta(
        &mut self,
        pair: Pair<T>,
        delta: i32,
    ) {
        let count = self.pair_counts.entry(pair).or_default();
        if delta < 0 {
            *count = count.saturating_sub(1);
        } else if delta > 0 {
            *count += 1;
        }
    }
}
