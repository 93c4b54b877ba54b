//! Named match-then-edit units.

use crate::Result;
use weft_core::{Instruction, LabelAllocator};

/// One named unit of match-then-edit logic applied to a method body.
///
/// A step owns no state across invocations: everything it needs is the
/// stream handed in, the per-run label allocator, and whatever it captures
/// while matching. Returning an error rolls the whole run back, including the
/// edits of every step before it.
pub trait PatchStep {
    /// Step name used in rollback diagnostics and logs.
    fn name(&self) -> &'static str;

    /// Applies this step's edit to the stream.
    fn apply(&self, stream: &mut Vec<Instruction>, labels: &mut LabelAllocator) -> Result<()>;
}

/// Adapter turning a static name plus a closure into a [`PatchStep`].
///
/// Patch rules are supplied by feature collaborators as literal data (a
/// fixed pattern and a fixed edit action) rather than negotiated at
/// runtime; this adapter keeps those rules free of per-rule boilerplate.
pub struct StepFn<F> {
    name: &'static str,
    run: F,
}

impl<F> StepFn<F>
where
    F: Fn(&mut Vec<Instruction>, &mut LabelAllocator) -> Result<()>,
{
    pub fn new(name: &'static str, run: F) -> Self {
        Self { name, run }
    }
}

impl<F> PatchStep for StepFn<F>
where
    F: Fn(&mut Vec<Instruction>, &mut LabelAllocator) -> Result<()>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, stream: &mut Vec<Instruction>, labels: &mut LabelAllocator) -> Result<()> {
        (self.run)(stream, labels)
    }
}
