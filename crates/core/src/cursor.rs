//! Stateful scan-and-edit position over one instruction stream.
//!
//! A [`Cursor`] wraps the stream a patch step is editing and latches the
//! first failure it encounters: every later operation is a no-op, so a step
//! can be written as a flat chain of calls and check [`Cursor::status`] once
//! at the end instead of branching at every call site. Positions recorded by
//! the last match are meaningless after a splice, so captures must happen
//! before editing.

use crate::inst::{Instruction, Operand};
use crate::label::LabelId;
use crate::pattern::{match_forward, Anchor, PatternSlot};
use crate::result::{Error, Result};
use std::collections::BTreeSet;
use tracing::debug;

/// Start index and length of the most recent successful match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    /// Index of the last instruction in the span.
    pub fn end(&self) -> usize {
        self.start + self.len - 1
    }
}

/// Scan/edit position within one instruction stream, or a latched failure.
///
/// Created fresh per patch step over the stream the pipeline hands in,
/// mutated in place through the step's operations, and discarded at step
/// end. The stream itself survives the cursor; whether the step trusts it is
/// decided by checking [`Cursor::status`].
pub struct Cursor<'a> {
    stream: &'a mut Vec<Instruction>,
    pos: usize,
    last_match: Option<Span>,
    fault: Option<Error>,
}

impl<'a> Cursor<'a> {
    /// Opens a cursor at the start of `stream`.
    pub fn new(stream: &'a mut Vec<Instruction>) -> Self {
        Self {
            stream,
            pos: 0,
            last_match: None,
            fault: None,
        }
    }

    /// Rewinds to index 0, forgetting the last match and any latched failure.
    pub fn reset(&mut self) -> &mut Self {
        self.pos = 0;
        self.last_match = None;
        self.fault = None;
        self
    }

    /// True until the first failed operation.
    pub fn is_valid(&self) -> bool {
        self.fault.is_none()
    }

    /// The first failure latched by this cursor, if any. Steps call this once
    /// at the end of their chain before trusting captured values.
    pub fn status(&self) -> Result<()> {
        match &self.fault {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    /// Current position, or `None` once the cursor is invalid.
    pub fn position(&self) -> Option<usize> {
        self.fault.is_none().then_some(self.pos)
    }

    /// Span of the most recent successful match.
    pub fn last_match(&self) -> Option<Span> {
        if self.fault.is_none() {
            self.last_match
        } else {
            None
        }
    }

    fn fail(&mut self, error: Error) -> &mut Self {
        if self.fault.is_none() {
            debug!(%error, at = self.pos, "cursor fault");
            self.fault = Some(error);
        }
        self
    }

    /// Scans forward from the current position (inclusive) and parks on the
    /// first instruction of the earliest match.
    pub fn match_start_forward(&mut self, pattern: &[PatternSlot]) -> &mut Self {
        self.match_anchored(pattern, Anchor::Start)
    }

    /// Scans forward from the current position (inclusive) and parks on the
    /// last instruction of the earliest match.
    pub fn match_end_forward(&mut self, pattern: &[PatternSlot]) -> &mut Self {
        self.match_anchored(pattern, Anchor::End)
    }

    fn match_anchored(&mut self, pattern: &[PatternSlot], anchor: Anchor) -> &mut Self {
        if self.fault.is_some() {
            return self;
        }
        match match_forward(self.stream, self.pos, pattern, anchor) {
            Some(index) => {
                let start = match anchor {
                    Anchor::Start => index,
                    Anchor::End => index + 1 - pattern.len(),
                };
                self.last_match = Some(Span {
                    start,
                    len: pattern.len(),
                });
                self.pos = index;
                self
            }
            None => self.fail(Error::PatternNotFound {
                from: self.pos,
                len: pattern.len(),
            }),
        }
    }

    /// Moves the position by `n` instructions. One-past-end is a legal
    /// position so an insert can append at the end of the stream; anything
    /// outside that invalidates the cursor.
    pub fn advance(&mut self, n: isize) -> &mut Self {
        if self.fault.is_some() {
            return self;
        }
        let target = self.pos as isize + n;
        if target < 0 || target as usize > self.stream.len() {
            return self.fail(Error::InvalidCursor);
        }
        self.pos = target as usize;
        self
    }

    /// Instruction currently under the cursor. Pure read; `None` at
    /// one-past-end or on an invalid cursor.
    pub fn current(&self) -> Option<&Instruction> {
        if self.fault.is_some() {
            return None;
        }
        self.stream.get(self.pos)
    }

    /// Operand of the instruction currently under the cursor.
    pub fn operand(&self) -> Option<&Operand> {
        self.current().map(|ins| &ins.operand)
    }

    /// Operand at `offset` within the last match span. Pure read; capture
    /// never mutates the stream.
    pub fn operand_at(&self, offset: usize) -> Option<&Operand> {
        self.capture_index(offset)
            .and_then(|index| self.stream.get(index))
            .map(|ins| &ins.operand)
    }

    /// Clones the instruction at `offset` within the last match span, for
    /// re-emitting it inside a later edit.
    pub fn capture(&self, offset: usize) -> Option<Instruction> {
        self.capture_index(offset)
            .and_then(|index| self.stream.get(index))
            .cloned()
    }

    fn capture_index(&self, offset: usize) -> Option<usize> {
        if self.fault.is_some() {
            return None;
        }
        let span = self.last_match?;
        if offset >= span.len {
            return None;
        }
        Some(span.start + offset)
    }

    /// Replaces the operand of the instruction at the current position.
    pub fn set_operand(&mut self, operand: Operand) -> &mut Self {
        if self.fault.is_some() {
            return self;
        }
        if self.pos >= self.stream.len() {
            return self.fail(Error::InvalidCursor);
        }
        self.stream[self.pos].operand = operand;
        self
    }

    /// Attaches `label` to the instruction at the current position.
    pub fn attach_label(&mut self, label: LabelId) -> &mut Self {
        if self.fault.is_some() {
            return self;
        }
        if self.pos >= self.stream.len() {
            return self.fail(Error::InvalidCursor);
        }
        self.stream[self.pos].labels.insert(label);
        self
    }

    /// Detaches and returns the label set of the instruction at the current
    /// position, so an edit can transfer it onto an inserted instruction and
    /// redirect external branches into the inserted block.
    pub fn take_labels(&mut self) -> BTreeSet<LabelId> {
        if self.fault.is_some() {
            return BTreeSet::new();
        }
        if self.pos >= self.stream.len() {
            self.fail(Error::InvalidCursor);
            return BTreeSet::new();
        }
        std::mem::take(&mut self.stream[self.pos].labels)
    }

    /// Splices `block` into the stream immediately before the instruction at
    /// the current position.
    ///
    /// The displaced instruction keeps its own labels, so external branches
    /// that landed on it keep landing on the first unshifted instruction
    /// after the block, unless the caller moved them onto an inserted
    /// instruction beforehand via [`Cursor::take_labels`]. Afterwards the
    /// position is the first instruction of the shifted tail, immediately
    /// after the inserted block.
    ///
    /// Refuses a block carrying a label that is already attached elsewhere
    /// in the stream; a label has at most one attachment point.
    pub fn insert_before(&mut self, block: Vec<Instruction>) -> &mut Self {
        if self.fault.is_some() || block.is_empty() {
            return self;
        }
        for ins in &block {
            for label in &ins.labels {
                if self.stream.iter().any(|existing| existing.labels.contains(label)) {
                    return self.fail(Error::LabelMultiplyAttached(*label, 2));
                }
            }
        }
        let inserted = block.len();
        self.stream.splice(self.pos..self.pos, block);
        self.pos += inserted;
        self.last_match = None;
        self
    }

    /// Deletes `count` instructions starting at the current position.
    ///
    /// Labels attached to a removed instruction are reassigned to the first
    /// surviving instruction after the range, never dropped, since some
    /// untouched branch may still reference them. If the range carries labels
    /// and reaches the end of the stream, nothing survives to receive them
    /// and the removal fails with [`Error::LabelWouldDangle`], leaving the
    /// stream unchanged.
    pub fn remove_range(&mut self, count: usize) -> &mut Self {
        if self.fault.is_some() || count == 0 {
            return self;
        }
        let end = match self.pos.checked_add(count) {
            Some(end) if end <= self.stream.len() => end,
            _ => return self.fail(Error::InvalidCursor),
        };
        let carried: BTreeSet<LabelId> = self.stream[self.pos..end]
            .iter()
            .flat_map(|ins| ins.labels.iter().copied())
            .collect();
        if !carried.is_empty() && end == self.stream.len() {
            return self.fail(Error::LabelWouldDangle {
                at: self.pos,
                count,
            });
        }
        self.stream.drain(self.pos..end);
        if !carried.is_empty() {
            self.stream[self.pos].labels.extend(carried);
        }
        self.last_match = None;
        self
    }
}
