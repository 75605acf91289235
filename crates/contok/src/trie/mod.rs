//! # Codeword Tries
//!
//! The prefix index behind the LZ coders.

mod prefix_trie;

#[doc(inline)]
pub use prefix_trie::PrefixTrie;
