//! Ordered, all-or-nothing application of patch steps to one method body.
//!
//! A patching run takes the instruction stream the host exposes for one
//! method, threads it through every registered [`PatchStep`] in order, and
//! ends in exactly one of two ways: a fully patched stream, or the untouched
//! original plus the name of the step that failed. A partially edited body is
//! never observable; an optional enhancement must not be allowed to break
//! the host's core behavior.

pub mod host;
pub mod pipeline;
pub mod step;

use thiserror::Error;

pub use host::MethodHook;
pub use pipeline::{Outcome, Pipeline, Report};
pub use step::{PatchStep, StepFn};

/// Patch error type encompassing step and commit failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Scanning or editing failed inside a step.
    #[error(transparent)]
    Edit(#[from] weft_core::Error),

    /// A step-specific precondition did not hold.
    #[error("{0}")]
    Precondition(&'static str),
}

/// Patch result type
pub type Result<T> = std::result::Result<T, Error>;
