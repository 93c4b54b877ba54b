//! All-or-nothing application of patch steps to one method body.

use crate::step::PatchStep;
use crate::Error;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use weft_core::validator::verify_label_integrity;
use weft_core::{Instruction, LabelAllocator};

/// Step name reported when the commit-time label check fails rather than a
/// registered step.
const COMMIT_STEP: &str = "commit";

/// Terminal result of one patching run.
///
/// The run is a straight-line state machine: pending, applying one step at
/// a time, then exactly one of these two terminal states. Callers receive
/// either the fully patched stream or the bit-for-bit original; nothing in
/// between.
#[derive(Debug)]
pub enum Outcome {
    /// Every step succeeded and the label invariant held over the result.
    Committed(Vec<Instruction>),
    /// A step (or the commit-time check) failed; no edit survives.
    RolledBack {
        /// The untouched original stream, still in force.
        original: Vec<Instruction>,
        /// Name of the failing step.
        step: &'static str,
        /// Why it failed.
        reason: Error,
    },
}

impl Outcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed(_))
    }

    /// The stream now in force: patched on commit, original on rollback.
    pub fn into_stream(self) -> Vec<Instruction> {
        match self {
            Outcome::Committed(stream) => stream,
            Outcome::RolledBack { original, .. } => original,
        }
    }

    /// Loggable summary of the run.
    pub fn report(&self) -> Report {
        match self {
            Outcome::Committed(stream) => Report {
                committed: true,
                instructions: stream.len(),
                failed_step: None,
                diagnostic: None,
            },
            Outcome::RolledBack {
                original,
                step,
                reason,
            } => Report {
                committed: false,
                instructions: original.len(),
                failed_step: Some((*step).to_string()),
                diagnostic: Some(reason.to_string()),
            },
        }
    }
}

/// Summary of one patching run, for logs and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Whether the patched stream was committed.
    pub committed: bool,
    /// Length of the stream now in force.
    pub instructions: usize,
    /// Name of the failing step, when rolled back.
    pub failed_step: Option<String>,
    /// Failure description, when rolled back.
    pub diagnostic: Option<String>,
}

/// Ordered list of patch steps applied to one method body.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn PatchStep>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step, builder style.
    pub fn with_step(mut self, step: impl PatchStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn push(&mut self, step: impl PatchStep + 'static) {
        self.steps.push(Box::new(step));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step in order over `stream`, feeding each step's output
    /// into the next.
    ///
    /// On any step failure the run rolls back: every edit made so far is
    /// discarded and the original stream is returned along with the failing
    /// step's name. After the last step the label invariant is verified over
    /// the final stream; a violation there is a commit-time failure and rolls
    /// back the same way.
    pub fn run(&self, stream: Vec<Instruction>, labels: &mut LabelAllocator) -> Outcome {
        let original = stream;
        let mut working = original.clone();

        for step in &self.steps {
            debug!(
                step = step.name(),
                instructions = working.len(),
                "applying patch step"
            );
            if let Err(reason) = step.apply(&mut working, labels) {
                warn!(step = step.name(), %reason, "patch step failed, rolling back");
                return Outcome::RolledBack {
                    original,
                    step: step.name(),
                    reason,
                };
            }
        }

        if let Err(reason) = verify_label_integrity(&working) {
            warn!(%reason, "label integrity violated at commit, rolling back");
            return Outcome::RolledBack {
                original,
                step: COMMIT_STEP,
                reason: reason.into(),
            };
        }

        info!(
            steps = self.steps.len(),
            instructions = working.len(),
            "patch pipeline committed"
        );
        Outcome::Committed(working)
    }
}
