//! # Error Types
//!
//! Everything a string operation can reject. Reentrancy is not in here: it is
//! a contract violation and panics instead of returning.

use thiserror::Error;

/// Errors raised by [`SyncString`](crate::SyncString) operations and by the
/// text operations used inside guard sessions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStringError {
    /// A position lies past the end of the current content.
    #[error("position {position} is out of bounds for length {length}")]
    OutOfBounds {
        /// The offending byte position.
        position: usize,
        /// Length of the content at the time of the call.
        length: usize,
    },

    /// A position falls inside a multi-byte character.
    #[error("position {position} is not on a char boundary")]
    NotCharBoundary {
        /// The offending byte position.
        position: usize,
    },

    /// Growing the content would pass the maximum size, or the allocation
    /// failed. The content is left as it was.
    #[error("cannot grow length {length} by {additional} bytes")]
    LengthOverflow {
        /// Length of the content at the time of the call.
        length: usize,
        /// Bytes the operation needed to add.
        additional: usize,
    },

    /// A nul-terminated view was requested but the content has a nul byte.
    #[error("content has an interior nul byte at position {position}")]
    InteriorNul {
        /// Byte position of the first nul.
        position: usize,
    },
}

impl SyncStringError {
    /// Returns true for the errors caused by a bad position argument.
    #[must_use]
    pub const fn is_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::NotCharBoundary { .. })
    }
}

/// Result type for string operations.
pub type SyncStringResult<T> = Result<T, SyncStringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SyncStringError::OutOfBounds { position: 9, length: 3 };
        assert_eq!(err.to_string(), "position 9 is out of bounds for length 3");
        assert!(err.is_bounds());

        let err = SyncStringError::InteriorNul { position: 2 };
        assert!(!err.is_bounds());

        let err = SyncStringError::LengthOverflow { length: 3, additional: 8 };
        assert_eq!(err.to_string(), "cannot grow length 3 by 8 bytes");
        assert!(!err.is_bounds());
    }
}
