//! # Tokenizers
//!
//! Every stage implements [`Tokenizer`]:
//!
//! * [`crate::coders::LZCoder`] and [`crate::coders::HierarchicalLZCoder`] - adaptive dictionaries.
//! * [`BytePairEncoder`] - greedy pair merging.
//! * [`ContextualEncoder`] - per-context substring tables.
//! * [`DefragEncoder`] - dense renumbering of a sparse alphabet.
//! * [`ComposedTokenizer`] - a pipeline of the above.
//!
//! ## Example
//!
//! ```rust
//! use contok::coders::HierarchicalLZCoderOptions;
//! use contok::tokenizers::{BytePairEncoderOptions, ComposedTokenizer, Tokenizer};
//! use contok::types::symbols_from_str;
//!
//! type T = u32;
//!
//! let sample: Vec<T> = symbols_from_str("the rain in spain stays mainly in the plain");
//!
//! let mut pipeline = ComposedTokenizer::<T>::new()
//!     .with_stage(BytePairEncoderOptions::default().with_max_merges(16).init::<T>().unwrap())
//!     .with_stage(HierarchicalLZCoderOptions::<T>::new(Some(1024)).init().unwrap());
//!
//! let tokens = pipeline.learn(&sample, None).unwrap();
//! assert_eq!(pipeline.try_decode(&tokens).unwrap(), sample);
//! ```

pub mod bpe;
pub mod composed;
pub mod contextual;
pub mod defrag;
pub mod tokenizer;

#[doc(inline)]
pub use bpe::{BytePairEncoder, BytePairEncoderOptions};
#[doc(inline)]
pub use composed::ComposedTokenizer;
#[doc(inline)]
pub use contextual::ContextualEncoder;
#[doc(inline)]
pub use defrag::DefragEncoder;
#[doc(inline)]
pub use tokenizer::Tokenizer;
