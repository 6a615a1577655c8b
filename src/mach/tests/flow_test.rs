use super::*;
use crate::lang::{MapOp, Opcode, SharedOp};
use proptest::prelude::*;

const CODES: [i32; 8] = [
    10110, // ShowMessage
    12010, // ConditionalBranch
    22010, // ElseBranch
    22011, // EndBranch
    12210, // Loop
    12220, // BreakLoop
    22210, // EndLoop
    12110, // Label
];

fn arb_list() -> impl Strategy<Value = Vec<Command>> {
    prop::collection::vec((0..4i32, 0..CODES.len(), 0..3i32), 0..40).prop_map(|raw| {
        raw.into_iter()
            .map(|(indent, code, param)| com(CODES[code], indent, &[param]))
            .collect()
    })
}

proptest! {
    #[test]
    fn test_skip_to_respects_indent(list in arb_list(), from in 0usize..40, min in 0..3i32, span in 0..2i32) {
        let max = min + span;
        let target: Opcode = MapOp::ElseBranch.into();
        let alt: Opcode = MapOp::EndBranch.into();
        match skip_to(&list, from, target, alt, min, max) {
            Some(index) => {
                prop_assert!(index >= from);
                let found = &list[index];
                prop_assert!(found.code == target.code() || found.code == alt.code());
                prop_assert!(found.indent >= min && found.indent <= max);
                for cmd in &list[from..index] {
                    prop_assert!(cmd.indent >= min);
                    let hit = cmd.code == target.code() || cmd.code == alt.code();
                    prop_assert!(!(hit && cmd.indent <= max));
                }
            }
            None => {
                for cmd in list.iter().skip(from) {
                    if cmd.indent < min {
                        break;
                    }
                    let hit = cmd.code == target.code() || cmd.code == alt.code();
                    prop_assert!(!(hit && cmd.indent <= max));
                }
            }
        }
    }

    #[test]
    fn test_jump_table_agrees_with_scans(list in arb_list()) {
        let table = JumpTable::build(&list);
        for index in 0..list.len() {
            prop_assert_eq!(table.exit(index), block_exit(&list, index));
        }
    }

    #[test]
    fn test_loop_start_precedes_end(list in arb_list(), from in 0usize..40, indent in 0..4i32) {
        if let Some(start) = find_loop_start(&list, from, indent) {
            prop_assert!(start < from);
            prop_assert_eq!(list[start].code, SharedOp::Loop.code());
            prop_assert_eq!(list[start].indent, indent);
        }
    }
}

#[test]
fn test_branch_exits() {
    let list = vec![
        com(12010, 0, &[0, 1, 0]),
        com(10110, 1, &[]),
        com(12010, 1, &[0, 2, 0]),
        com(22010, 1, &[]),
        com(22011, 1, &[]),
        com(22010, 0, &[]),
        com(10110, 1, &[]),
        com(22011, 0, &[]),
    ];
    assert_eq!(block_exit(&list, 0), Some(5));
    assert_eq!(block_exit(&list, 2), Some(3));
    assert_eq!(block_exit(&list, 3), Some(4));
    assert_eq!(block_exit(&list, 5), Some(7));
    assert_eq!(block_exit(&list, 1), None);
}

#[test]
fn test_unclosed_branch_has_no_exit() {
    let list = vec![com(12010, 1, &[]), com(10110, 2, &[]), com(10110, 0, &[])];
    assert_eq!(block_exit(&list, 0), None);
    assert!(JumpTable::build(&list).is_empty());
}

#[test]
fn test_break_leaves_innermost_loop() {
    let list = vec![
        com(12210, 0, &[]),
        com(12210, 1, &[]),
        com(12220, 2, &[]),
        com(22210, 1, &[]),
        com(22210, 0, &[]),
    ];
    assert_eq!(block_exit(&list, 2), Some(3));
    assert_eq!(block_exit(&list, 3), Some(1));
    assert_eq!(block_exit(&list, 4), Some(0));
}

#[test]
fn test_labels_resolve_to_first() {
    let list = vec![
        com(12110, 0, &[3]),
        com(12010, 0, &[]),
        com(12110, 1, &[7]),
        com(22011, 0, &[]),
        com(12110, 0, &[7]),
    ];
    let table = JumpTable::build(&list);
    assert_eq!(table.label(7), Some(2));
    assert_eq!(table.label(3), Some(0));
    assert_eq!(table.label(9), None);
    assert_eq!(find_label(&list, 7), Some(2));
}

#[test]
fn test_choice_texts_stop_at_end() {
    let list = vec![
        com(10140, 0, &[2]),
        com(20140, 0, &[0]).with_text("Yes"),
        com(10110, 1, &[]).with_text("nested"),
        com(20140, 0, &[1]).with_text("No"),
        com(20140, 0, &[4]).with_text("cancel"),
        com(20141, 0, &[]),
        com(20140, 0, &[0]).with_text("later"),
    ];
    assert_eq!(choices(&list, 1, 0), vec!["Yes".to_string(), "No".to_string()]);
}

#[test]
fn test_message_continuation_lines() {
    let list = vec![
        com(10110, 0, &[]).with_text("one"),
        com(20110, 0, &[]).with_text("two"),
        com(20110, 0, &[]).with_text("three"),
        com(10110, 0, &[]).with_text("next"),
    ];
    assert_eq!(message_lines(&list, 1), vec!["two".to_string(), "three".to_string()]);
    assert!(message_lines(&list, 3).is_empty());
}
