//! Instruction, opcode, and operand vocabulary.
//!
//! A method body reaches the engine as a flat, ordered sequence of
//! [`Instruction`]s handed over by the host's instrumentation facility. The
//! vocabulary is fixed and closed; bytes the host cannot classify arrive as
//! [`Opcode::Unknown`] and flow through edits untouched.

use crate::label::LabelId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Symbolic operation tag drawn from the host's fixed instruction vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opcode {
    Nop,
    /// Push a constant (integer or string operand).
    LoadConst,
    /// Push a null reference.
    LoadNull,
    /// Push the value of a local slot.
    LoadLocal,
    /// Push the address of a local slot.
    LoadLocalRef,
    /// Pop into a local slot.
    StoreLocal,
    /// Push an argument by slot.
    LoadArg,
    /// Push a field of the popped receiver.
    LoadField,
    /// Pop value and receiver, store into a field.
    StoreField,
    /// Static call to a member.
    Call,
    /// Virtual call through the popped receiver.
    CallVirtual,
    /// Unconditional branch to a label.
    Branch,
    /// Branch when the popped value is truthy.
    BranchIfTrue,
    /// Branch when the popped value is falsy.
    BranchIfFalse,
    /// Branch when the two popped values are equal.
    BranchEq,
    /// Branch when the two popped values differ.
    BranchNotEq,
    /// Discard the top of stack.
    Pop,
    /// Duplicate the top of stack.
    Dup,
    Return,
    /// Raw host byte outside the known vocabulary. Scans treat it as an
    /// ordinary instruction; exact predicates are never written against it.
    Unknown(u8),
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Nop => write!(f, "nop"),
            Opcode::LoadConst => write!(f, "ldc"),
            Opcode::LoadNull => write!(f, "ldnull"),
            Opcode::LoadLocal => write!(f, "ldloc"),
            Opcode::LoadLocalRef => write!(f, "ldloca"),
            Opcode::StoreLocal => write!(f, "stloc"),
            Opcode::LoadArg => write!(f, "ldarg"),
            Opcode::LoadField => write!(f, "ldfld"),
            Opcode::StoreField => write!(f, "stfld"),
            Opcode::Call => write!(f, "call"),
            Opcode::CallVirtual => write!(f, "callvirt"),
            Opcode::Branch => write!(f, "br"),
            Opcode::BranchIfTrue => write!(f, "brtrue"),
            Opcode::BranchIfFalse => write!(f, "brfalse"),
            Opcode::BranchEq => write!(f, "beq"),
            Opcode::BranchNotEq => write!(f, "bne"),
            Opcode::Pop => write!(f, "pop"),
            Opcode::Dup => write!(f, "dup"),
            Opcode::Return => write!(f, "ret"),
            Opcode::Unknown(byte) => write!(f, "unknown(0x{byte:02x})"),
        }
    }
}

/// Reference to a host member (method or field) by owning type and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub owner: String,
    pub name: String,
}

impl MemberRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)
    }
}

/// Local-variable slot reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSlot(pub u16);

impl fmt::Display for LocalSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loc{}", self.0)
    }
}

/// The value an instruction carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    None,
    Int(i64),
    Str(String),
    Member(MemberRef),
    Local(LocalSlot),
    /// Branch destination. Must resolve to exactly one attached label at
    /// commit time.
    Target(LabelId),
}

impl Operand {
    /// Returns the referenced branch target, if the operand is one.
    pub fn target(&self) -> Option<LabelId> {
        match self {
            Operand::Target(label) => Some(*label),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Int(value) => write!(f, "{value}"),
            Operand::Str(text) => write!(f, "{text:?}"),
            Operand::Member(member) => write!(f, "{member}"),
            Operand::Local(slot) => write!(f, "{slot}"),
            Operand::Target(label) => write!(f, "{label}"),
        }
    }
}

/// One elementary operation in a method body: an opcode, an optional operand,
/// and the set of branch labels that land on this instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub op: Opcode,
    pub operand: Operand,
    pub labels: BTreeSet<LabelId>,
}

impl Instruction {
    pub fn new(op: Opcode) -> Self {
        Self {
            op,
            operand: Operand::None,
            labels: BTreeSet::new(),
        }
    }

    pub fn with_operand(op: Opcode, operand: Operand) -> Self {
        Self {
            op,
            operand,
            labels: BTreeSet::new(),
        }
    }

    /// Attaches `labels` to this instruction, consuming and returning it.
    pub fn with_labels(mut self, labels: BTreeSet<LabelId>) -> Self {
        self.labels.extend(labels);
        self
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.labels {
            write!(f, "{label}: ")?;
        }
        if self.operand == Operand::None {
            write!(f, "{}", self.op)
        } else {
            write!(f, "{:<8} {}", self.op.to_string(), self.operand)
        }
    }
}
