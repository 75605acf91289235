//! # Common Types and Traits
use core::{
    fmt::{Debug, Display},
    hash::Hash,
};
use std::collections::BTreeSet;

use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};

/// A type that can be used as a symbol or token id in the coders.
///
/// These are constrained to be unsigned primitive integers.
/// `T::max_value()` is reserved as the [`empty_token`] sentinel,
/// so a bounded coder over `T` can assign at most `T::max_value()` ids.
pub trait TokenType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Unsigned
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
{
}

impl<T> TokenType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Unsigned
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
{
}

/// A pair of tokens.
pub type Pair<T> = (T, T);

/// An ordered set of symbols; an input alphabet or an output id space.
///
/// ## Style Hints
/// Instance names should prefer `input_vocab`, `output_vocab`, or `alphabet`.
pub type VocabSet<T> = BTreeSet<T>;

/// The id of the zero-length codeword.
///
/// This is the out-of-band marker `T::max_value()`; it is never
/// handed out by an id pool.
#[inline(always)]
pub fn empty_token<T: TokenType>() -> T {
    T::max_value()
}

/// The reserved "unknown symbol" id.
///
/// Not used by the LZ coders; the [`crate::tokenizers::ContextualEncoder`]
/// uses it as its escape token.
#[inline(always)]
pub fn unknown_symbol<T: TokenType>() -> T {
    T::zero()
}

/// Converts a byte slice into a symbol sequence.
///
/// ## Arguments
/// * `bytes` - The bytes to convert.
///
/// ## Returns
/// One symbol per byte.
pub fn symbols_from_bytes<T: TokenType, B: AsRef<[u8]>>(bytes: B) -> Vec<T> {
    bytes
        .as_ref()
        .iter()
        .map(|&b| T::from_u8(b).expect("every unsigned token type holds a byte"))
        .collect()
}

/// Converts a string into a symbol sequence of its UTF-8 bytes.
///
/// ## Arguments
/// * `text` - The text to convert.
///
/// ## Returns
/// One symbol per UTF-8 byte.
pub fn symbols_from_str<T: TokenType, S: AsRef<str>>(text: S) -> Vec<T> {
    symbols_from_bytes(text.as_ref().as_bytes())
}

/// Collects the set of distinct symbols in a sequence.
pub fn alphabet_of<T: TokenType>(symbols: &[T]) -> VocabSet<T> {
    symbols.iter().copied().collect()
}

/// Renders a token for error messages.
pub(crate) fn token_repr<T: TokenType>(token: T) -> String {
    if token == empty_token::<T>() {
        "<empty>".to_string()
    } else {
        token.to_string()
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type CommonHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Type Alias for hash sets in this crate.
        pub type CommonHashSet<V> = ahash::AHashSet<V>;

    } else if #[cfg(feature = "foldhash")] {
        /// Type Alias for hash maps in this crate.
        pub type CommonHashMap<K, V> = foldhash::HashMap<K, V>;

        /// Type Alias for hash sets in this crate.
        pub type CommonHashSet<V> = foldhash::HashSet<V>;

    } else {
        /// Type Alias for hash maps in this crate.
        pub type CommonHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Type Alias for hash sets in this crate.
        pub type CommonHashSet<V> = std::collections::HashSet<V>;
    }
}

#[cfg(test)]
mod tests {
    use core::marker::PhantomData;

    use super::*;

    #[test]
    fn test_common_token_types() {
        struct IsToken<T: TokenType>(PhantomData<T>);

        let _: IsToken<u16>;
        let _: IsToken<u32>;
        let _: IsToken<u64>;
        let _: IsToken<usize>;
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(empty_token::<u16>(), u16::MAX);
        assert_eq!(empty_token::<u32>(), u32::MAX);
        assert_eq!(unknown_symbol::<u32>(), 0);
    }

    #[test]
    fn test_symbol_conversions() {
        let from_str: Vec<u32> = symbols_from_str("test");
        assert_eq!(from_str, vec![116, 101, 115, 116]);

        let from_bytes: Vec<u16> = symbols_from_bytes(b"test");
        assert_eq!(from_bytes, vec![116, 101, 115, 116]);

        assert_eq!(
            alphabet_of(&from_str).into_iter().collect::<Vec<_>>(),
            vec![101, 115, 116]
        );
    }

    #[test]
    fn test_token_repr() {
        assert_eq!(token_repr(7u32), "7");
        assert_eq!(token_repr(u32::MAX), "<empty>");
    }
}
