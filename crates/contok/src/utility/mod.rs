//! # Utilities

pub mod traits;
pub mod validators;
