//! # Adaptive LZ Coders
//!
//! * [`LZCoder`] - an online dictionary coder with a bounded id space.
//! * [`HierarchicalLZCoder`] - one `LZCoder` per preceding-token context,
//!   with cross-context id arbitration.
//!
//! ## Example
//!
//! ```rust
//! use contok::coders::HierarchicalLZCoderOptions;
//! use contok::types::{alphabet_of, symbols_from_str};
//!
//! let symbols: Vec<u32> = symbols_from_str("abracadabra");
//! let mut coder = HierarchicalLZCoderOptions::new(Some(64))
//!     .with_input_vocab(alphabet_of(&symbols))
//!     .init()
//!     .unwrap();
//!
//! let ids = coder.encode(&symbols, true).unwrap();
//! assert_eq!(coder.decode(&ids).unwrap(), symbols);
//! ```

pub mod hierarchical_coder;
pub mod id_pool;
pub mod lz_coder;

pub use hierarchical_coder::{HierarchicalLZCoder, HierarchicalLZCoderOptions};
pub use id_pool::IdPool;
pub use lz_coder::{LZCoder, LZCoderOptions};
