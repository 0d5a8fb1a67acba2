//! Error types for message logs.

use busprobe_types::Nanoseconds;
use thiserror::Error;

/// Errors that can occur when building a time index or appending to a log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    /// An entry was not strictly later than the one before it.
    #[error("Unordered time index at position {position}: {value} does not follow {previous}")]
    UnorderedIndex {
        /// Position of the offending entry.
        position: usize,
        /// The entry it had to follow.
        previous: Nanoseconds,
        /// The offending entry.
        value: Nanoseconds,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unordered_index_message() {
        let err = LogError::UnorderedIndex {
            position: 3,
            previous: Nanoseconds(20),
            value: Nanoseconds(10),
        };
        assert_eq!(
            err.to_string(),
            "Unordered time index at position 3: 10ns does not follow 20ns"
        );
    }
}
