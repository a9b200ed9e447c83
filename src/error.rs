use thiserror::Error;

/// Failures of the key sorter.
///
/// Ordinary input problems (malformed YAML, unreadable files) never reach the
/// sorter; anything here means the decoded tree broke a contract the sorter
/// relies on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SortError {
    /// A mapping key is not a string, so keys cannot be compared.
    #[error("invariant violation at {path}: mapping key of kind {kind}, expected a string")]
    InvariantViolation {
        /// Location of the mapping holding the offending key.
        path: String,
        /// Kind of the offending key.
        kind: String,
    },
}
