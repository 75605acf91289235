//! # Prefix Trie ``{ Vec<T> -> T }``

use std::collections::BTreeMap;

use crate::types::{TokenType, empty_token};

/// A trie node.
///
/// `id` is `Some` exactly when the node terminates a codeword.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct TrieNode<T: TokenType> {
    id: Option<T>,
    children: BTreeMap<T, usize>,
}

impl<T: TokenType> TrieNode<T> {
    fn new() -> Self {
        Self {
            id: None,
            children: BTreeMap::new(),
        }
    }
}

/// An ordered map from codewords (symbol sequences) to ids.
///
/// Nodes live in an arena; edges are `BTreeMap<symbol, node index>`, so the
/// trie has plain value semantics and `clone()` is a deep copy.
///
/// The root always terminates the empty codeword, mapped to [`empty_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixTrie<T: TokenType> {
    nodes: Vec<TrieNode<T>>,
    size: usize,
}

impl<T: TokenType> Default for PrefixTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TokenType> PrefixTrie<T> {
    const ROOT: usize = 0;

    /// Create a trie holding only the empty codeword.
    pub fn new() -> Self {
        let mut root = TrieNode::new();
        root.id = Some(empty_token());
        Self {
            nodes: vec![root],
            size: 1,
        }
    }

    /// The number of codewords in the trie, including the empty codeword.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Register `id` for `codeword`.
    ///
    /// Missing intermediate nodes are created; an existing id is overwritten.
    ///
    /// ## Arguments
    /// * `codeword` - The symbol sequence.
    /// * `id` - The id to bind it to.
    pub fn insert(
        &mut self,
        codeword: &[T],
        id: T,
    ) {
        let mut current = Self::ROOT;
        for &symbol in codeword {
            current = match self.nodes[current].children.get(&symbol) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::new());
                    self.nodes[current].children.insert(symbol, child);
                    child
                }
            };
        }

        let node = &mut self.nodes[current];
        if node.id.is_none() {
            self.size += 1;
        }
        node.id = Some(id);
    }

    /// Walk the edges spelled by `codeword`.
    fn find_node(
        &self,
        codeword: &[T],
    ) -> Option<usize> {
        let mut current = Self::ROOT;
        for symbol in codeword {
            current = *self.nodes[current].children.get(symbol)?;
        }
        Some(current)
    }

    /// Exact lookup.
    ///
    /// ## Returns
    /// The id of `codeword`, or `None` if it was never inserted.
    pub fn get(
        &self,
        codeword: &[T],
    ) -> Option<T> {
        self.find_node(codeword).and_then(|node| self.nodes[node].id)
    }

    /// Is `codeword` registered?
    pub fn contains(
        &self,
        codeword: &[T],
    ) -> bool {
        self.get(codeword).is_some()
    }

    /// Find the longest registered codeword that prefixes `sequence`.
    ///
    /// ## Arguments
    /// * `sequence` - The query sequence.
    ///
    /// ## Returns
    /// `(len, id)` of the longest terminating match; `(0, empty_token())`
    /// when no non-empty codeword matches.
    pub fn longest_prefix_len(
        &self,
        sequence: &[T],
    ) -> (usize, T) {
        let mut best = (0, empty_token());
        let mut current = Self::ROOT;
        for (idx, symbol) in sequence.iter().enumerate() {
            match self.nodes[current].children.get(symbol) {
                Some(&child) => current = child,
                None => break,
            }
            if let Some(id) = self.nodes[current].id {
                best = (idx + 1, id);
            }
        }
        best
    }

    /// Find the longest registered codeword that prefixes `sequence`.
    ///
    /// ## Returns
    /// `(codeword, id)`; see [`longest_prefix_len`](Self::longest_prefix_len).
    pub fn longest_prefix(
        &self,
        sequence: &[T],
    ) -> (Vec<T>, T) {
        let (len, id) = self.longest_prefix_len(sequence);
        (sequence[..len].to_vec(), id)
    }

    /// Iterate over all `(codeword, id)` entries, in lexicographic codeword order.
    pub fn iter(&self) -> impl Iterator<Item = (Vec<T>, T)> + '_ {
        let mut stack: Vec<(usize, Vec<T>)> = vec![(Self::ROOT, Vec::new())];
        core::iter::from_fn(move || {
            while let Some((node, prefix)) = stack.pop() {
                for (&symbol, &child) in self.nodes[node].children.iter().rev() {
                    let mut next = prefix.clone();
                    next.push(symbol);
                    stack.push((child, next));
                }
                if let Some(id) = self.nodes[node].id {
                    return Some((prefix, id));
                }
            }
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utility::traits::static_is_send_sync_check;

    #[test]
    fn test_empty_trie() {
        let trie: PrefixTrie<u32> = PrefixTrie::new();
        static_is_send_sync_check(&trie);

        assert_eq!(trie.size(), 1);
        assert_eq!(trie.get(&[]), Some(u32::MAX));
        assert!(trie.contains(&[]));
        assert!(!trie.contains(&[1]));
        assert_eq!(trie.longest_prefix(&[1, 2, 3]), (vec![], u32::MAX));
        assert_eq!(trie.longest_prefix(&[]), (vec![], u32::MAX));
    }

    #[test]
    fn test_insert_get() {
        let mut trie: PrefixTrie<u16> = PrefixTrie::new();
        trie.insert(&[1, 2, 3], 7);

        assert_eq!(trie.size(), 2);
        assert_eq!(trie.get(&[1, 2, 3]), Some(7));

        // Intermediate nodes do not terminate codewords.
        assert_eq!(trie.get(&[1]), None);
        assert_eq!(trie.get(&[1, 2]), None);
        assert_eq!(trie.get(&[1, 2, 3, 4]), None);

        trie.insert(&[1], 4);
        assert_eq!(trie.size(), 3);
        assert_eq!(trie.get(&[1]), Some(4));

        // Overwrite.
        trie.insert(&[1, 2, 3], 9);
        assert_eq!(trie.size(), 3);
        assert_eq!(trie.get(&[1, 2, 3]), Some(9));
    }

    #[test]
    fn test_longest_prefix_uses_terminating_nodes() {
        let mut trie: PrefixTrie<u32> = PrefixTrie::new();
        trie.insert(&[1], 10);
        trie.insert(&[1, 2, 3, 4], 11);

        // The walk reaches [1, 2, 3], but only [1] terminates.
        assert_eq!(trie.longest_prefix(&[1, 2, 3, 9]), (vec![1], 10));
        assert_eq!(trie.longest_prefix_len(&[1, 2, 3, 9]), (1, 10));

        assert_eq!(trie.longest_prefix(&[1, 2, 3, 4, 5]), (vec![1, 2, 3, 4], 11));
        assert_eq!(trie.longest_prefix(&[2, 1]), (vec![], u32::MAX));
    }

    #[test]
    fn test_iter() {
        let mut trie: PrefixTrie<u32> = PrefixTrie::new();
        trie.insert(&[2], 0);
        trie.insert(&[1, 5], 1);
        trie.insert(&[1], 2);

        assert_eq!(
            trie.iter().collect::<Vec<_>>(),
            vec![
                (vec![], u32::MAX),
                (vec![1], 2),
                (vec![1, 5], 1),
                (vec![2], 0),
            ]
        );
    }

    #[test]
    fn test_clone_is_deep() {
        let mut trie: PrefixTrie<u32> = PrefixTrie::new();
        trie.insert(&[1, 2], 3);

        let mut copy = trie.clone();
        copy.insert(&[1, 2], 4);
        copy.insert(&[5], 6);

        assert_eq!(trie.get(&[1, 2]), Some(3));
        assert_eq!(trie.get(&[5]), None);
        assert_eq!(copy.get(&[1, 2]), Some(4));
    }
}
