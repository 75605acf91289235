//! # Rayon Utilities
//!
//! [`rayon`] powered wrappers for parallel batch encoding and decoding.

mod rayon_tokenizer;

pub use rayon_tokenizer::ParallelRayonTokenizer;
