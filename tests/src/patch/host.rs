use weft_core::cursor::Cursor;
use weft_core::pattern::PatternSlot;
use weft_core::{Instruction, LabelAllocator, Opcode};
use weft_patch::host::{self, MethodHook};
use weft_patch::{PatchStep, Pipeline, StepFn};

/// Stand-in for the host's instrumentation facility: one method body plus
/// the label allocator the host would recognize.
struct FakeMethod {
    body: Vec<Instruction>,
    labels: LabelAllocator,
    installs: usize,
}

impl FakeMethod {
    fn new(body: Vec<Instruction>) -> Self {
        Self {
            body,
            labels: LabelAllocator::new(),
            installs: 0,
        }
    }
}

impl MethodHook for FakeMethod {
    fn instructions(&self) -> Vec<Instruction> {
        self.body.clone()
    }

    fn labels(&mut self) -> &mut LabelAllocator {
        &mut self.labels
    }

    fn install(&mut self, body: Vec<Instruction>) {
        self.body = body;
        self.installs += 1;
    }
}

fn body() -> Vec<Instruction> {
    vec![
        Instruction::new(Opcode::LoadArg),
        Instruction::new(Opcode::Call),
        Instruction::new(Opcode::Return),
    ]
}

fn append_nop_after_call() -> impl PatchStep {
    StepFn::new("append-nop", |stream: &mut Vec<Instruction>, _labels: &mut LabelAllocator| {
        let mut cursor = Cursor::new(stream);
        cursor
            .match_end_forward(&[PatternSlot::op(Opcode::Call)])
            .advance(1)
            .insert_before(vec![Instruction::new(Opcode::Nop)]);
        cursor.status()?;
        Ok(())
    })
}

#[test]
fn a_committed_run_installs_the_patched_body() {
    let mut method = FakeMethod::new(body());
    let pipeline = Pipeline::new().with_step(append_nop_after_call());

    assert!(host::apply(&mut method, &pipeline));
    assert_eq!(method.installs, 1);
    assert_eq!(method.body.len(), 4);
    assert_eq!(method.body[2].op, Opcode::Nop);
}

#[test]
fn a_rolled_back_run_keeps_the_original_body_in_force() {
    let mut method = FakeMethod::new(body());
    let original = method.body.clone();

    let wrong_landmark = StepFn::new("find-dup", |stream: &mut Vec<Instruction>, _: &mut LabelAllocator| {
        let mut cursor = Cursor::new(stream);
        cursor.match_start_forward(&[PatternSlot::op(Opcode::Dup)]);
        cursor.status()?;
        Ok(())
    });
    let pipeline = Pipeline::new()
        .with_step(append_nop_after_call())
        .with_step(wrong_landmark);

    assert!(!host::apply(&mut method, &pipeline));
    assert_eq!(method.installs, 0, "nothing installed on rollback");
    assert_eq!(method.body, original);
}
