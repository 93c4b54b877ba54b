//! Validate that every branch in a stream still has somewhere to land.
//!
//! The cursor enforces label conservation edit by edit; this is the
//! commit-time check over the whole stream. It only inspects labels that some
//! operand actually references; a label that is attached but never branched
//! to is legal and ignored.

use std::collections::HashMap;

use crate::inst::{Instruction, Operand};
use crate::label::LabelId;
use crate::result::{Error, Result};

/// Verifies that every label referenced by some instruction's operand is
/// attached to exactly one instruction in the stream: never zero, never
/// more than one.
pub fn verify_label_integrity(stream: &[Instruction]) -> Result<()> {
    let mut attachments: HashMap<LabelId, usize> = HashMap::new();
    for ins in stream {
        for label in &ins.labels {
            *attachments.entry(*label).or_default() += 1;
        }
    }

    for ins in stream {
        if let Operand::Target(label) = &ins.operand {
            match attachments.get(label).copied().unwrap_or(0) {
                0 => return Err(Error::LabelUnattached(*label)),
                1 => {}
                n => return Err(Error::LabelMultiplyAttached(*label, n)),
            }
        }
    }
    Ok(())
}
