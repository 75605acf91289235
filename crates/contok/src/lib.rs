//! # `contok` Adaptive Dictionary Tokenizers
//!
//! `contok` compresses sequences of small integer symbols (bytes, or the
//! tokens of an earlier stage) into sequences of larger integer codewords,
//! reversibly.
//!
//! See:
//! * [`coders`] for the online LZ-family coders; the
//!   [`coders::HierarchicalLZCoder`] keeps one dictionary per preceding token.
//! * [`tokenizers`] for the [`tokenizers::Tokenizer`] contract, the table
//!   encoders (byte pair, contextual, defrag) and pipelines of stages.
//! * [`trie`] for the codeword prefix index.
//!
//! Token ids are generic over [`types::TokenType`]; `T::max_value()` is
//! reserved for the empty codeword (see [`types::empty_token`]).
//!
//! ## Crate Features
//!
//! #### feature: ``default``
//!
//! * ``ahash``
//! * ``rayon``
//!
//! #### feature: ``ahash``
//!
//! This swaps all HashMap/HashSet implementations for ``ahash``; which is a performance
//! win on many/(most?) modern CPUs.
//!
//! This is done by the ``types::CommonHash{*}`` type alias machinery.
//! The hash tables are only scratch space while training; everything that
//! decides an output id is kept in ordered maps.
//!
//! #### feature: ``foldhash``
//!
//! The same, with ``foldhash``. If both are enabled, ``ahash`` wins.
//!
//! #### feature: ``rayon``
//!
//! This enables [`rayon::ParallelRayonTokenizer`], a batch parallelism
//! wrapper around any frozen tokenizer.
//!
//! #### feature: ``serde``
//!
//! This derives ``serde`` traits for the coders, the trie, and the table
//! encoders, so a learned dictionary reloads exactly and keeps learning
//! the same way.
//!
//! #### feature: ``tracing``
//!
//! This enables a number of ``tracing`` instrumentation points.
//! This is only useful for timing tracing of the library itself.
//!
//! ## Example
//!
//! ```rust
//! use contok::coders::LZCoderOptions;
//! use contok::types::symbols_from_str;
//!
//! let symbols: Vec<u32> = symbols_from_str("hello hello hello");
//! let mut coder = LZCoderOptions::new(Some(512))
//!     .with_input_vocab(0..256)
//!     .init()
//!     .unwrap();
//!
//! let ids = coder.encode(&symbols, true).unwrap();
//! assert!(ids.len() < symbols.len());
//! assert_eq!(coder.decode(&ids).unwrap(), symbols);
//! ```
#![warn(missing_docs, unused)]

#[cfg(feature = "rayon")]
pub mod rayon;

pub mod coders;
pub mod errors;
pub mod tokenizers;
pub mod trie;
pub mod types;
pub mod utility;

#[doc(inline)]
pub use errors::{CTResult, ContokError};
