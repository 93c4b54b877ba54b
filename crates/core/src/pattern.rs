//! Contiguous pattern matching over instruction streams.
//!
//! No symbolic names survive into a compiled method body, so the only way to
//! name "the place to edit" is the local shape of nearby instructions. A
//! pattern is an ordered list of per-position predicates matched contiguously:
//! a pattern of length `n` matches at index `i` iff every position `i..i+n`
//! satisfies its predicate. Wildcards keep a landmark robust against
//! irrelevant variation while still failing loudly when the shape is absent.

use crate::inst::{Instruction, Opcode, Operand};

/// Predicate over an instruction's opcode at one pattern position.
#[derive(Debug, Clone)]
pub enum OpcodeMatch {
    Exact(Opcode),
    OneOf(Vec<Opcode>),
    Any,
}

impl OpcodeMatch {
    fn matches(&self, op: &Opcode) -> bool {
        match self {
            OpcodeMatch::Exact(want) => want == op,
            OpcodeMatch::OneOf(want) => want.contains(op),
            OpcodeMatch::Any => true,
        }
    }
}

/// Predicate over an instruction's operand at one pattern position.
#[derive(Debug, Clone)]
pub enum OperandMatch {
    Exact(Operand),
    Any,
}

impl OperandMatch {
    fn matches(&self, operand: &Operand) -> bool {
        match self {
            OperandMatch::Exact(want) => want == operand,
            OperandMatch::Any => true,
        }
    }
}

/// Per-position predicate pair over opcode and operand.
#[derive(Debug, Clone)]
pub struct PatternSlot {
    pub op: OpcodeMatch,
    pub operand: OperandMatch,
}

impl PatternSlot {
    /// Matches the opcode exactly, any operand.
    pub fn op(op: Opcode) -> Self {
        Self {
            op: OpcodeMatch::Exact(op),
            operand: OperandMatch::Any,
        }
    }

    /// Matches the opcode and operand exactly.
    pub fn with_operand(op: Opcode, operand: Operand) -> Self {
        Self {
            op: OpcodeMatch::Exact(op),
            operand: OperandMatch::Exact(operand),
        }
    }

    /// Matches any opcode in `ops`, any operand.
    pub fn one_of(ops: impl IntoIterator<Item = Opcode>) -> Self {
        Self {
            op: OpcodeMatch::OneOf(ops.into_iter().collect()),
            operand: OperandMatch::Any,
        }
    }

    /// Matches any instruction at this position.
    pub fn any() -> Self {
        Self {
            op: OpcodeMatch::Any,
            operand: OperandMatch::Any,
        }
    }

    pub fn matches(&self, ins: &Instruction) -> bool {
        self.op.matches(&ins.op) && self.operand.matches(&ins.operand)
    }
}

/// Which index of a successful match is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Report the index of the first matched instruction.
    Start,
    /// Report the index of the last matched instruction.
    End,
}

/// Finds the earliest contiguous match of `pattern` at or after `start`.
///
/// Scans `i = start, start+1, ...` and returns the first `i` where the whole
/// pattern fits and every position satisfies its predicate, anchored per
/// `anchor`. Never mutates the stream. An empty pattern identifies nothing
/// and never matches.
pub fn match_forward(
    stream: &[Instruction],
    start: usize,
    pattern: &[PatternSlot],
    anchor: Anchor,
) -> Option<usize> {
    if pattern.is_empty() {
        return None;
    }
    let last = stream.len().checked_sub(pattern.len())?;
    for i in start..=last {
        let window = &stream[i..i + pattern.len()];
        if pattern.iter().zip(window).all(|(slot, ins)| slot.matches(ins)) {
            return Some(match anchor {
                Anchor::Start => i,
                Anchor::End => i + pattern.len() - 1,
            });
        }
    }
    None
}
