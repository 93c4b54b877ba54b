use weft_core::pattern::{match_forward, Anchor, PatternSlot};
use weft_core::{is_branch_opcode, Instruction, MemberRef, Opcode, Operand};

fn equality_check() -> Vec<Instruction> {
    vec![
        Instruction::with_operand(Opcode::LoadLocal, Operand::Local(weft_core::LocalSlot(0))),
        Instruction::with_operand(Opcode::LoadConst, Operand::Str("Craft".into())),
        Instruction::with_operand(
            Opcode::Call,
            Operand::Member(MemberRef::new("String", "equals")),
        ),
        Instruction::new(Opcode::BranchIfFalse),
    ]
}

/// The shape the original compiled body repeats twice: a string comparison
/// followed by a conditional branch, separated by unrelated instructions.
fn body_with_two_landmarks() -> Vec<Instruction> {
    let mut body = equality_check();
    body.push(Instruction::new(Opcode::Pop));
    body.push(Instruction::new(Opcode::Dup));
    body.extend(equality_check());
    body.push(Instruction::new(Opcode::Return));
    body
}

#[test]
fn match_forward_reports_the_earliest_match() {
    let body = body_with_two_landmarks();
    let landmark = [
        PatternSlot::op(Opcode::LoadConst),
        PatternSlot::op(Opcode::Call),
        PatternSlot::op(Opcode::BranchIfFalse),
    ];

    let found = match_forward(&body, 0, &landmark, Anchor::Start).expect("landmark exists");
    assert_eq!(found, 1);

    // No index before the reported one satisfies the pattern.
    for earlier in 0..found {
        let window = &body[earlier..earlier + landmark.len()];
        assert!(
            !landmark
                .iter()
                .zip(window)
                .all(|(slot, ins)| slot.matches(ins)),
            "index {earlier} should not match"
        );
    }
}

#[test]
fn scanning_from_a_later_start_finds_the_second_occurrence() {
    let body = body_with_two_landmarks();
    let landmark = [
        PatternSlot::op(Opcode::LoadConst),
        PatternSlot::op(Opcode::Call),
        PatternSlot::op(Opcode::BranchIfFalse),
    ];
    assert_eq!(match_forward(&body, 2, &landmark, Anchor::Start), Some(7));
}

#[test]
fn start_and_end_anchors_are_pattern_length_minus_one_apart() {
    let body = body_with_two_landmarks();
    let landmark = [
        PatternSlot::op(Opcode::LoadLocal),
        PatternSlot::op(Opcode::LoadConst),
        PatternSlot::op(Opcode::Call),
        PatternSlot::op(Opcode::BranchIfFalse),
    ];
    let start = match_forward(&body, 0, &landmark, Anchor::Start).expect("start anchor");
    let end = match_forward(&body, 0, &landmark, Anchor::End).expect("end anchor");
    assert_eq!(end - start, landmark.len() - 1);
}

#[test]
fn operand_predicates_distinguish_identical_opcodes() {
    let body = body_with_two_landmarks();
    let exact = [PatternSlot::with_operand(
        Opcode::Call,
        Operand::Member(MemberRef::new("String", "equals")),
    )];
    let other = [PatternSlot::with_operand(
        Opcode::Call,
        Operand::Member(MemberRef::new("String", "concat")),
    )];
    assert_eq!(match_forward(&body, 0, &exact, Anchor::Start), Some(2));
    assert_eq!(match_forward(&body, 0, &other, Anchor::Start), None);
}

#[test]
fn set_membership_matches_every_branch_kind() {
    let branches = [
        Opcode::Branch,
        Opcode::BranchIfTrue,
        Opcode::BranchIfFalse,
        Opcode::BranchEq,
        Opcode::BranchNotEq,
    ];
    assert!(branches.iter().all(is_branch_opcode));

    let slot = PatternSlot::one_of(branches);
    for op in branches {
        assert!(slot.matches(&Instruction::new(op)));
    }
    assert!(!slot.matches(&Instruction::new(Opcode::Call)));
}

#[test]
fn wildcards_bridge_irrelevant_instructions() {
    let body = body_with_two_landmarks();
    // "a conditional branch, then anything twice, then another load", robust
    // against whatever the compiler put in between.
    let landmark = [
        PatternSlot::op(Opcode::BranchIfFalse),
        PatternSlot::any(),
        PatternSlot::any(),
        PatternSlot::op(Opcode::LoadLocal),
    ];
    assert_eq!(match_forward(&body, 0, &landmark, Anchor::Start), Some(3));
}

#[test]
fn out_of_vocabulary_bytes_scan_as_ordinary_instructions() {
    let body = vec![
        Instruction::new(Opcode::Unknown(0xaa)),
        Instruction::new(Opcode::Call),
    ];
    // An exact predicate over the known vocabulary skips the unknown byte...
    assert_eq!(
        match_forward(&body, 0, &[PatternSlot::op(Opcode::Call)], Anchor::Start),
        Some(1)
    );
    // ...while a wildcard still counts it as a position.
    assert_eq!(
        match_forward(
            &body,
            0,
            &[PatternSlot::any(), PatternSlot::op(Opcode::Call)],
            Anchor::Start
        ),
        Some(0)
    );
}

#[test]
fn matching_never_mutates_the_stream() {
    let body = body_with_two_landmarks();
    let before = body.clone();
    let _ = match_forward(&body, 0, &[PatternSlot::op(Opcode::Call)], Anchor::End);
    assert_eq!(body, before);
}
