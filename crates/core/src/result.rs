//! Core result and error types

use crate::label::LabelId;
use thiserror::Error;

/// Core error type encompassing all scanning and editing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An operation was attempted on a cursor already holding the invalid marker.
    #[error("cursor is invalid")]
    InvalidCursor,

    /// A referenced label is attached to more than one instruction.
    #[error("label {0} is attached to {1} instructions")]
    LabelMultiplyAttached(LabelId, usize),

    /// A referenced label is not attached to any instruction.
    #[error("label {0} is not attached to any instruction")]
    LabelUnattached(LabelId),

    /// A removal would strip a label with no surviving instruction to receive it.
    #[error("removing {count} instructions at {at} would leave labels dangling")]
    LabelWouldDangle {
        /// Index of the first removed instruction.
        at: usize,
        /// Number of instructions in the removed range.
        count: usize,
    },

    /// No contiguous subsequence satisfied the pattern from the given start position.
    #[error("no match for {len}-slot pattern from index {from}")]
    PatternNotFound {
        /// Index the scan started from.
        from: usize,
        /// Length of the pattern that found nothing.
        len: usize,
    },
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
