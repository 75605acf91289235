//! # Byte Pair Encoding
//!
//! A greedy pair-merging learner, trained with an incrementally refreshed
//! merge heap, and a merge-scan encoder over the learned merges.

pub mod byte_pair_encoder;
pub mod merge_span;
pub mod pair_index;

#[doc(inline)]
pub use byte_pair_encoder::{BytePairEncoder, BytePairEncoderOptions};
