//! Validators for coder configuration options.
use crate::errors::{CTResult, ContokError};
use crate::types::{TokenType, empty_token};

/// Validates a bounded vocabulary size for the token type `T`.
///
/// Ids are drawn from `[0, vocab_size)`, which must not reach the
/// [`empty_token`] sentinel `T::max_value()`.
///
/// ## Arguments
/// * `vocab_size` - The number of ids a coder may assign.
///
/// ## Returns
/// The validated `vocab_size`, or [`ContokError::VocabSizeOverflow`].
pub fn try_vocab_size<T: TokenType>(vocab_size: usize) -> CTResult<usize> {
    match T::from_usize(vocab_size) {
        Some(limit) if limit <= empty_token::<T>() => Ok(vocab_size),
        _ => Err(ContokError::VocabSizeOverflow { size: vocab_size }),
    }
}

/// Validates that a seed alphabet fits in a bounded vocabulary.
///
/// ## Arguments
/// * `alphabet_size` - The number of seed symbols.
/// * `vocab_size` - The number of ids available, or `None` when unbounded.
pub fn try_seed_alphabet(
    alphabet_size: usize,
    vocab_size: Option<usize>,
) -> CTResult<()> {
    match vocab_size {
        Some(vocab_size) if alphabet_size > vocab_size => {
            Err(ContokError::InvalidConfiguration(format!(
                "output vocab size ({vocab_size}) is smaller than input vocab size ({alphabet_size})"
            )))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocab_size() {
        assert_eq!(try_vocab_size::<u16>(256), Ok(256));
        assert_eq!(try_vocab_size::<u16>(0), Ok(0));
        assert_eq!(
            try_vocab_size::<u16>(u16::MAX as usize),
            Ok(u16::MAX as usize)
        );
        assert_eq!(
            try_vocab_size::<u16>(u16::MAX as usize + 1),
            Err(ContokError::VocabSizeOverflow {
                size: u16::MAX as usize + 1
            })
        );
        assert!(try_vocab_size::<u8>(255).is_ok());
        assert!(try_vocab_size::<u8>(256).is_err());
    }

    #[test]
    fn test_seed_alphabet() {
        assert!(try_seed_alphabet(3, Some(3)).is_ok());
        assert!(try_seed_alphabet(3, None).is_ok());
        assert!(matches!(
            try_seed_alphabet(3, Some(2)),
            Err(ContokError::InvalidConfiguration(_))
        ));
    }
}
