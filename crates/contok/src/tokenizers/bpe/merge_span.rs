//! # Merge Span

use crate::types::{Pair, TokenType};

/// A training sample, rewritten in place as pair merges are learned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSpan<T: TokenType> {
    tokens: Vec<T>,
}

impl<T: TokenType> From<Vec<T>> for MergeSpan<T> {
    fn from(tokens: Vec<T>) -> Self {
        Self { tokens }
    }
}

impl<T: TokenType> MergeSpan<T> {
    const REMOVED: i32 = -1;
    const ADDED: i32 = 1;

    /// The current tokens.
    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    /// The number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Is this span empty?
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over the adjacent pairs, overlapping ones included.
    pub fn pairs(&self) -> impl Iterator<Item = Pair<T>> + '_ {
        self.tokens.windows(2).map(|w| (w[0], w[1]))
    }

    /// Replace every non-overlapping `pair`, left to right, with `replacement`.
    ///
    /// ## Arguments
    /// * `pair` - The pair to merge.
    /// * `replacement` - The merged token.
    /// * `on_delta` - Called with `(pair, -1)` for every adjacent pair that
    ///   disappears and `(pair, +1)` for every one that appears.
    pub fn merge_pair_cb<F>(
        &mut self,
        pair: Pair<T>,
        replacement: T,
        on_delta: &mut F,
    ) where
        F: FnMut(Pair<T>, i32),
    {
        let (a, b) = pair;
        let n = self.tokens.len();

        // Compacts in place: `write <= read` always holds.
        let mut write = 0;
        let mut read = 0;
        while read < n {
            if read + 1 < n && self.tokens[read] == a && self.tokens[read + 1] == b {
                if write > 0 {
                    let prev = self.tokens[write - 1];
                    on_delta((prev, a), Self::REMOVED);
                    on_delta((prev, replacement), Self::ADDED);
                }
                on_delta(pair, Self::REMOVED);
                if read + 2 < n {
                    let next = self.tokens[read + 2];
                    on_delta((b, next), Self::REMOVED);
                    on_delta((replacement, next), Self::ADDED);
                }
                self.tokens[write] = replacement;
                read += 2;
            } else {
                self.tokens[write] = self.tokens[read];
                read += 1;
            }
            write += 1;
        }
        self.tokens.truncate(write);
    }

    /// Like [`merge_pair_cb`](Self::merge_pair_cb), collecting the deltas.
    pub fn merge_pair(
        &mut self,
        pair: Pair<T>,
        replacement: T,
    ) -> Vec<(Pair<T>, i32)> {
        let mut deltas = Vec::new();
        self.merge_pair_cb(pair, replacement, &mut |p, d| deltas.push((p, d)));
        deltas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs() {
        let span: MergeSpan<u32> = vec![1, 1, 1].into();
        assert_eq!(span.pairs().collect::<Vec<_>>(), vec![(1, 1), (1, 1)]);
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_merge_pair() {
        let mut span: MergeSpan<u32> = vec![1, 2, 3, 1, 2, 2, 1].into();

        let deltas = span.merge_pair((1, 2), 9);
        assert_eq!(span.tokens(), &[9, 3, 9, 2, 1]);
        assert_eq!(
            deltas,
            vec![
                ((1, 2), -1),
                ((2, 3), -1),
                ((9, 3), 1),
                ((3, 1), -1),
                ((3, 9), 1),
                ((1, 2), -1),
                ((2, 2), -1),
                ((9, 2), 1),
            ]
        );
    }

    #[test]
    fn test_merge_overlapping_run() {
        let mut span: MergeSpan<u32> = vec![5, 5, 5, 5, 5].into();

        let mut net: std::collections::BTreeMap<Pair<u32>, i32> = Default::default();
        span.merge_pair_cb((5, 5), 7, &mut |p, d| *net.entry(p).or_default() += d);

        assert_eq!(span.tokens(), &[7, 7, 5]);
        // Before: four (5, 5). After: (7, 7) and (7, 5).
        assert_eq!(net[&(5, 5)], -4);
        assert_eq!(net[&(7, 7)], 1);
        assert_eq!(net[&(7, 5)], 1);
    }

    #[test]
    fn test_merge_short_spans() {
        let mut span: MergeSpan<u32> = vec![1].into();
        assert!(span.merge_pair((1, 2), 3).is_empty());
        assert_eq!(span.tokens(), &[1]);

        let mut span: MergeSpan<u32> = Vec::new().into();
        assert!(span.merge_pair((1, 2), 3).is_empty());
        assert!(span.is_empty());
    }
}
