//! Boundary to the host's method-instrumentation facility.
//!
//! The engine assumes the host can expose one loaded method's instructions
//! and later install a replacement body. An environment without runtime
//! method rewriting supplies this hook at the same conceptual seam instead
//! (an interception layer or plugin interface) rather than reconstructing
//! in-place code rewriting.

use crate::pipeline::{Outcome, Pipeline};
use tracing::{info, warn};
use weft_core::{Instruction, LabelAllocator};

/// One method body as the host exposes it for rewriting.
pub trait MethodHook {
    /// The method's current instruction stream.
    fn instructions(&self) -> Vec<Instruction>;

    /// Label allocation the host will recognize when fresh labels are later
    /// used as branch targets.
    fn labels(&mut self) -> &mut LabelAllocator;

    /// Installs `body` as the method's new instruction stream.
    fn install(&mut self, body: Vec<Instruction>);
}

/// Runs `pipeline` against the hook's method body.
///
/// Installs the edited stream on commit. On rollback the original body stays
/// in force and the failed step is logged; the grafted behavior silently
/// does not appear. Returns whether the patched body was installed.
pub fn apply<H: MethodHook>(host: &mut H, pipeline: &Pipeline) -> bool {
    let stream = host.instructions();
    match pipeline.run(stream, host.labels()) {
        Outcome::Committed(body) => {
            info!(instructions = body.len(), "installing patched method body");
            host.install(body);
            true
        }
        Outcome::RolledBack { step, reason, .. } => {
            warn!(step, %reason, "patch pipeline rolled back, keeping original body");
            false
        }
    }
}
