//! # Contextual Encoder
//!
//! A context-histogram encoder: each token's meaning depends on the token
//! emitted before it.
//!
//! For a context symbol `X` and an end symbol `Y`, the table entry
//! ``table[X][Y]`` is the most frequent training substring that starts just
//! after an occurrence of `X` (with no `X` inside) and ends with `Y`.
//! Emitting `Y` in context `X` spells that substring, and `Y` becomes the
//! next context.
//!
//! The escape token [`unknown_symbol`] spells the empty string and switches
//! to the escape context, whose entries are the single alphabet symbols.

use std::collections::BTreeMap;

use crate::errors::{CTResult, ContokError};
use crate::tokenizers::Tokenizer;
use crate::trie::PrefixTrie;
use crate::types::{CommonHashMap, Pair, TokenType, VocabSet, alphabet_of, unknown_symbol};

/// Context-conditioned substring encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextualEncoder<T: TokenType> {
    input_vocab: VocabSet<T>,
    tables: BTreeMap<T, BTreeMap<T, Vec<T>>>,
    tries: BTreeMap<T, PrefixTrie<T>>,
}

impl<T: TokenType> ContextualEncoder<T> {
    /// Create an untrained encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The `{ context -> { token -> substring } }` tables.
    pub fn tables(&self) -> &BTreeMap<T, BTreeMap<T, Vec<T>>> {
        &self.tables
    }

    /// The substring `token` spells in `context`.
    pub fn entry(
        &self,
        context: T,
        token: T,
    ) -> Option<&[T]> {
        self.tables
            .get(&context)
            .and_then(|table| table.get(&token))
            .map(Vec::as_slice)
    }

    /// Count every `(context, end) -> substring` occurrence in `symbols`.
    fn context_stats(symbols: &[T]) -> CommonHashMap<Pair<T>, CommonHashMap<Vec<T>, usize>> {
        let mut stats: CommonHashMap<Pair<T>, CommonHashMap<Vec<T>, usize>> =
            CommonHashMap::default();
        let mut last_seen: BTreeMap<T, usize> = BTreeMap::new();

        for (idx, &token) in symbols.iter().enumerate() {
            for (&context, &start) in &last_seen {
                *stats
                    .entry((context, token))
                    .or_default()
                    .entry(symbols[start + 1..=idx].to_vec())
                    .or_default() += 1;
            }
            last_seen.insert(token, idx);
        }
        stats
    }
}

impl<T: TokenType> Tokenizer<T> for ContextualEncoder<T> {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, symbols, input_vocab)))]
    fn learn(
        &mut self,
        symbols: &[T],
        input_vocab: Option<&VocabSet<T>>,
    ) -> CTResult<Vec<T>> {
        let escape = unknown_symbol::<T>();
        let alphabet = input_vocab
            .cloned()
            .unwrap_or_else(|| alphabet_of(symbols));
        if alphabet.contains(&escape) {
            return Err(ContokError::InvalidConfiguration(format!(
                "the escape token ({escape}) cannot be an input symbol"
            )));
        }
        if let Some(symbol) = symbols.iter().find(|&s| !alphabet.contains(s)) {
            return Err(ContokError::UnknownSymbol(symbol.to_string()));
        }

        let mut tables: BTreeMap<T, BTreeMap<T, Vec<T>>> = alphabet
            .iter()
            .map(|&context| (context, BTreeMap::from([(escape, Vec::new())])))
            .collect();

        for ((context, end), counts) in Self::context_stats(symbols) {
            // Most frequent; then longest; then lexicographically smallest.
            let best = counts.into_iter().max_by(|(a, a_count), (b, b_count)| {
                a_count
                    .cmp(b_count)
                    .then(a.len().cmp(&b.len()))
                    .then(b.cmp(a))
            });
            if let (Some((substring, _)), Some(table)) = (best, tables.get_mut(&context)) {
                table.insert(end, substring);
            }
        }
        tables.insert(escape, alphabet.iter().map(|&v| (v, vec![v])).collect());

        self.tries = tables
            .iter()
            .map(|(&context, table)| {
                let mut trie = PrefixTrie::new();
                for (&token, substring) in table {
                    if !substring.is_empty() {
                        trie.insert(substring, token);
                    }
                }
                (context, trie)
            })
            .collect();
        self.tables = tables;
        self.input_vocab = alphabet;

        log::debug!(
            "learned contextual tables: {} contexts, {} entries",
            self.tables.len(),
            self.tables.values().map(BTreeMap::len).sum::<usize>()
        );

        self.try_encode(symbols)
    }

    fn try_encode(
        &self,
        symbols: &[T],
    ) -> CTResult<Vec<T>> {
        let escape = unknown_symbol::<T>();
        let mut encoded = Vec::with_capacity(symbols.len());
        let mut context = escape;
        let mut remaining = symbols;
        while !remaining.is_empty() {
            let trie = self
                .tries
                .get(&context)
                .ok_or_else(|| ContokError::UnknownContext(context.to_string()))?;

            let (len, token) = trie.longest_prefix_len(remaining);
            if len == 0 {
                if context == escape {
                    return Err(ContokError::UnknownSymbol(remaining[0].to_string()));
                }
                encoded.push(escape);
                context = escape;
                continue;
            }

            encoded.push(token);
            context = token;
            remaining = &remaining[len..];
        }
        Ok(encoded)
    }

    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CTResult<Vec<T>> {
        let mut decoded = Vec::with_capacity(tokens.len() * 2);
        let mut context = unknown_symbol::<T>();
        for &token in tokens {
            let table = self
                .tables
                .get(&context)
                .ok_or_else(|| ContokError::UnknownContext(context.to_string()))?;
            let substring = table
                .get(&token)
                .ok_or_else(|| ContokError::UnknownId(token.to_string()))?;
            decoded.extend_from_slice(substring);
            context = token;
        }
        Ok(decoded)
    }

    fn input_vocab(&self) -> VocabSet<T> {
        self.input_vocab.clone()
    }

    fn output_vocab(&self) -> VocabSet<T> {
        let mut output_vocab = self.input_vocab.clone();
        output_vocab.insert(unknown_symbol());
        output_vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::symbols_from_str;
    use crate::utility::traits::static_is_send_sync_check;

    type T = u32;

    #[test]
    fn test_learn_tables() {
        let mut encoder = ContextualEncoder::<T>::new();
        static_is_send_sync_check(&encoder);

        let learned = encoder.learn(&[1, 2, 1, 2], None).unwrap();

        assert_eq!(encoder.entry(1, 2), Some(&[2][..]));
        assert_eq!(encoder.entry(1, 1), Some(&[2, 1][..]));
        assert_eq!(encoder.entry(2, 1), Some(&[1][..]));
        assert_eq!(encoder.entry(2, 2), Some(&[1, 2][..]));
        assert_eq!(encoder.entry(1, 0), Some(&[][..]));
        assert_eq!(encoder.entry(0, 1), Some(&[1][..]));
        assert_eq!(encoder.entry(0, 0), None);

        assert_eq!(learned, vec![1, 1, 2]);
        assert_eq!(encoder.try_decode(&learned).unwrap(), vec![1, 2, 1, 2]);

        assert_eq!(encoder.input_vocab(), VocabSet::from([1, 2]));
        assert_eq!(encoder.output_vocab(), VocabSet::from([0, 1, 2]));
    }

    #[test]
    fn test_ties_prefer_longer() {
        let mut encoder = ContextualEncoder::<T>::new();
        // (1, 2) sees "2" and "2 2" once each.
        assert_eq!(encoder.learn(&[1, 2, 2], None).unwrap(), vec![1, 2]);
        assert_eq!(encoder.entry(1, 2), Some(&[2, 2][..]));
        assert_eq!(encoder.entry(2, 2), Some(&[2][..]));
    }

    #[test]
    fn test_escape() {
        let mut encoder = ContextualEncoder::<T>::new();
        encoder.learn(&[1, 2, 1, 2], None).unwrap();

        // Nothing in context 1 starts with 1.
        let encoded = encoder.try_encode(&[1, 1]).unwrap();
        assert_eq!(encoded, vec![1, 0, 1]);
        assert_eq!(encoder.try_decode(&encoded).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_errors() {
        let mut encoder = ContextualEncoder::<T>::new();
        assert!(matches!(
            encoder.learn(&[0, 1], None),
            Err(ContokError::InvalidConfiguration(_))
        ));
        assert_eq!(
            encoder.learn(&[1, 3], Some(&VocabSet::from([1, 2]))),
            Err(ContokError::UnknownSymbol("3".to_string()))
        );

        encoder.learn(&[1, 2], None).unwrap();
        assert_eq!(
            encoder.try_encode(&[3]),
            Err(ContokError::UnknownSymbol("3".to_string()))
        );
        assert_eq!(
            encoder.try_decode(&[0]),
            Err(ContokError::UnknownId("0".to_string()))
        );
        assert_eq!(
            encoder.try_decode(&[7]),
            Err(ContokError::UnknownId("7".to_string()))
        );
    }

    #[test]
    fn test_round_trip_text() {
        let sample: Vec<T> = symbols_from_str("she sells sea shells by the sea shore");
        let mut encoder = ContextualEncoder::<T>::new();

        let learned = encoder.learn(&sample, None).unwrap();
        assert_eq!(encoder.try_decode(&learned).unwrap(), sample);

        let other: Vec<T> = symbols_from_str("the shells");
        let encoded = encoder.try_encode(&other).unwrap();
        assert_eq!(encoder.try_decode(&encoded).unwrap(), other);
    }
}
