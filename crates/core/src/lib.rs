//! Instruction-stream scanning and splicing primitives.
//!
//! The crate models one compiled method body as a flat, ordered sequence of
//! instructions and provides the pieces a patch step needs to edit it:
//! anchored contiguous pattern matching ([`pattern`]), a fail-soft scan/edit
//! cursor ([`cursor`]), per-run label allocation ([`label`]), and the
//! commit-time label-integrity check ([`validator`]).

pub mod cursor;
pub mod inst;
pub mod label;
pub mod pattern;
pub mod result;
pub mod validator;

pub use cursor::{Cursor, Span};
pub use inst::{Instruction, LocalSlot, MemberRef, Opcode, Operand};
pub use label::{LabelAllocator, LabelId};
pub use pattern::{match_forward, Anchor, OpcodeMatch, OperandMatch, PatternSlot};
pub use result::{Error, Result};

/// Returns true if the opcode transfers control to a label.
#[inline]
pub fn is_branch_opcode(op: &Opcode) -> bool {
    matches!(
        op,
        Opcode::Branch
            | Opcode::BranchIfTrue
            | Opcode::BranchIfFalse
            | Opcode::BranchEq
            | Opcode::BranchNotEq
    )
}

/// Returns true if the opcode branches only when its condition holds.
#[inline]
pub fn is_conditional_branch(op: &Opcode) -> bool {
    matches!(
        op,
        Opcode::BranchIfTrue | Opcode::BranchIfFalse | Opcode::BranchEq | Opcode::BranchNotEq
    )
}
