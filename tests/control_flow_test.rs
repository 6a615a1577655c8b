mod common;
use common::*;
use rpgevent::lang::Command;

fn set_var(indent: i32, id: i32, value: i32) -> Command {
    com(10220, indent, &[0, id, id, 0, 0, value, 0])
}

fn add_var(indent: i32, id: i32, value: i32) -> Command {
    com(10220, indent, &[0, id, id, 1, 0, value, 0])
}

fn branch_test(switch_on: bool) -> Harness {
    let mut h = Harness::run(
        "{}",
        vec![
            com(12010, 0, &[0, 1, 0]),
            set_var(1, 1, 1),
            com(22010, 0, &[]),
            set_var(1, 1, 2),
            com(22011, 0, &[]),
            set_var(0, 2, 7),
        ],
    );
    h.game.switches.set(1, switch_on);
    h.tick();
    h
}

#[test]
fn test_branch_then() {
    let h = branch_test(true);
    assert_eq!(h.var(1), 1);
    assert_eq!(h.var(2), 7);
}

#[test]
fn test_branch_else() {
    let h = branch_test(false);
    assert_eq!(h.var(1), 2);
    assert_eq!(h.var(2), 7);
}

#[test]
fn test_branch_without_else() {
    let mut h = Harness::run(
        "{}",
        vec![
            com(12010, 0, &[1, 3, 0, 10, 1]),
            set_var(1, 1, 1),
            com(22011, 0, &[]),
            set_var(0, 2, 1),
        ],
    );
    h.tick();
    assert_eq!(h.var(1), 0);
    assert_eq!(h.var(2), 1);
}

#[test]
fn test_loop_breaks_out() {
    let mut h = Harness::run(
        "{}",
        vec![
            com(12210, 0, &[]),
            add_var(1, 1, 1),
            com(12010, 1, &[1, 1, 0, 5, 1]),
            com(12220, 2, &[]),
            com(22011, 1, &[]),
            com(22210, 0, &[]),
            set_var(0, 2, 1),
        ],
    );
    h.tick();
    assert_eq!(h.var(1), 5);
    assert_eq!(h.var(2), 1);
    assert!(!h.interpreter.is_running());
}

#[test]
fn test_endless_loop_yields_every_tick() {
    let mut h = Harness::run("{}", vec![com(12210, 0, &[]), add_var(1, 1, 1), com(22210, 0, &[])]);
    h.tick();
    let first = h.var(1);
    assert!(first > 0 && first <= 100);
    h.tick();
    assert_eq!(h.var(1), first * 2);
}

#[test]
fn test_break_without_loop_ends_event() {
    let mut h = Harness::run("{}", vec![com(12220, 0, &[]), set_var(0, 1, 1)]);
    h.tick();
    assert_eq!(h.var(1), 0);
    assert!(!h.interpreter.is_running());
}

#[test]
fn test_jump_out_of_a_block() {
    let mut h = Harness::run(
        "{}",
        vec![
            com(12010, 0, &[0, 1, 1]),
            com(12120, 1, &[1]),
            set_var(1, 1, 99),
            com(22011, 0, &[]),
            set_var(0, 2, 99),
            com(12110, 0, &[1]),
            set_var(0, 3, 1),
        ],
    );
    h.tick();
    assert_eq!((h.var(1), h.var(2), h.var(3)), (0, 0, 1));
}

#[test]
fn test_jump_into_a_block_that_never_opened() {
    let mut h = Harness::run(
        "{}",
        vec![
            com(12120, 0, &[2]),
            set_var(0, 1, 99),
            com(12010, 0, &[0, 5, 0]),
            com(12110, 1, &[2]),
            set_var(1, 2, 1),
            com(22010, 0, &[]),
            set_var(1, 3, 1),
            com(22011, 0, &[]),
        ],
    );
    h.tick();
    assert_eq!((h.var(1), h.var(2), h.var(3)), (0, 1, 0));
}

#[test]
fn test_missing_label_falls_through() {
    let mut h = Harness::run("{}", vec![com(12120, 0, &[8]), set_var(0, 1, 1)]);
    h.tick();
    assert_eq!(h.var(1), 1);
}

fn choice_list(cancel_type: i32) -> Vec<Command> {
    vec![
        com(10140, 0, &[cancel_type]),
        com(20140, 0, &[0]).with_text("Red"),
        set_var(1, 1, 1),
        com(20140, 0, &[1]).with_text("Blue"),
        set_var(1, 1, 2),
        com(20140, 0, &[4]).with_text("Cancel"),
        set_var(1, 1, 3),
        com(20141, 0, &[]),
        set_var(0, 2, 1),
    ]
}

#[test]
fn test_choice_routes_to_option() {
    let mut h = Harness::run("{}", choice_list(0));
    h.tick();
    assert!(h.game.message.waiting);
    assert_eq!(h.game.message.choices(), &["Red".to_string(), "Blue".to_string()]);
    h.answer(1);
    h.tick();
    assert_eq!(h.var(1), 2);
    assert_eq!(h.var(2), 1);
}

#[test]
fn test_choice_cancel_branch() {
    let mut h = Harness::run("{}", choice_list(5));
    h.tick();
    assert_eq!(h.game.message.choice_cancel_type, 5);
    h.answer(4);
    h.tick();
    assert_eq!(h.var(1), 3);
    assert_eq!(h.var(2), 1);
}

#[test]
fn test_message_carries_following_choice() {
    let mut commands = vec![say(10110, 0, "Pick one"), say(20110, 0, "quickly")];
    commands.extend(choice_list(0));
    let mut h = Harness::run("{}", commands);
    h.tick();
    let message = &h.game.message;
    assert_eq!(message.texts.len(), 4);
    assert_eq!(message.choice_start, Some(2));
    h.answer(0);
    h.tick();
    assert_eq!(h.var(1), 1);
}

#[test]
fn test_variables_clamp() {
    let mut h = Harness::run(
        "{}",
        vec![
            set_var(0, 1, 9_999_990),
            add_var(0, 1, 100),
            set_var(0, 2, -9_999_999),
            com(10220, 0, &[0, 2, 2, 2, 0, 5, 0]),
            set_var(0, 3, 9_999_999),
            com(10220, 0, &[0, 3, 3, 3, 1, 3, 0]),
            com(10220, 0, &[1, 4, 6, 0, 0, 7, 0]),
        ],
    );
    h.tick();
    assert_eq!(h.var(1), 9_999_999);
    assert_eq!(h.var(2), -9_999_999);
    assert_eq!(h.var(3), 9_999_999);
    assert_eq!((h.var(4), h.var(5), h.var(6)), (7, 7, 7));
}

#[test]
fn test_random_operand_stays_in_range() {
    let mut h = Harness::run("{}", vec![com(10220, 0, &[1, 1, 20, 0, 3, 5, -5])]);
    h.tick();
    for id in 1..=20 {
        assert!((-5..=5).contains(&h.var(id)));
    }
}

fn recurse(levels: i32) -> (Harness, String) {
    let json = format!(
        r#"{{"common_events": [{{"id": 1, "trigger": "call", "commands": [
            {{"code": 10220, "params": [0, 1, 1, 1, 0, 1, 0]}},
            {{"code": 12010, "params": [1, 1, 0, {}, 4]}},
            {{"code": 12330, "indent": 1, "params": [0, 1]}},
            {{"code": 22011}}
        ]}}]}}"#,
        levels
    );
    let mut h = Harness::run(&json, vec![com(12330, 0, &[0, 1])]);
    let logs = capture_warnings(|| h.tick());
    (h, logs)
}

#[test]
fn test_call_depth_warns_once() {
    let (h, logs) = recurse(101);
    assert_eq!(h.var(1), 101);
    assert_eq!(logs.matches("event call depth exceeds ceiling").count(), 1);
    assert!(logs.contains("depth=101"));
    assert!(!h.interpreter.is_running());
}

#[test]
fn test_call_depth_warns_only_at_the_crossing() {
    let (h, logs) = recurse(103);
    assert_eq!(h.var(1), 103);
    assert_eq!(logs.matches("event call depth exceeds ceiling").count(), 1);
    assert!(logs.contains("depth=101"));
    assert!(!logs.contains("depth=102"));
}
