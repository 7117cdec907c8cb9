//! Status codes shared by every parser in the workspace.
//!
//! A recoverable deviation from a grammar is *not* a status: it is recorded
//! in a parse-error sink and parsing continues. A [`Status`] is what stops
//! the current parse.

use thiserror::Error;

/// Non-OK outcome of a parsing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Status {
    /// Storage for tokens, nodes or buffers could not be obtained.
    #[error("memory allocation failed")]
    MemoryAllocation,

    /// Generic failure, used for API misuse such as feeding input after
    /// the stream was closed.
    #[error("operation failed")]
    Failed,

    /// A consumer rejected the data it was given.
    #[error("unexpected data")]
    UnexpectedData,

    /// The input ended where the caller required more.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A consumer asked the driving loop to halt.
    #[error("parsing stopped")]
    Stopped,
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Status>;

impl Status {
    /// Fallible reservation of `additional` slots in `vec`.
    ///
    /// Maps allocator failure onto [`Status::MemoryAllocation`] so callers
    /// can propagate it with `?` instead of aborting.
    ///
    /// # Errors
    /// Returns [`Status::MemoryAllocation`] if the allocation fails.
    pub fn reserve<T>(vec: &mut Vec<T>, additional: usize) -> Result<()> {
        vec.try_reserve(additional)
            .map_err(|_| Self::MemoryAllocation)
    }

    /// Fallible reservation for strings, see [`Status::reserve`].
    ///
    /// # Errors
    /// Returns [`Status::MemoryAllocation`] if the allocation fails.
    pub fn reserve_str(s: &mut String, additional: usize) -> Result<()> {
        s.try_reserve(additional)
            .map_err(|_| Self::MemoryAllocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages_are_distinct() {
        assert_ne!(
            Status::MemoryAllocation.to_string(),
            Status::Failed.to_string()
        );
    }

    #[test]
    fn test_reserve_succeeds_for_small_requests() {
        let mut v: Vec<u8> = Vec::new();
        assert_eq!(Status::reserve(&mut v, 16), Ok(()));
        assert!(v.capacity() >= 16);
    }
}
