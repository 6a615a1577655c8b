use super::*;

fn set_var(id: i32, value: i32) -> Command {
    com(10220, 0, &[0, id, id, 0, 0, value, 0])
}

#[test]
fn test_suspension_is_idempotent() {
    let mut m = Machine::new(vec![com(10110, 0, &[]).with_text("hi"), set_var(1, 5)]);
    m.update();
    assert!(m.game.message.waiting);
    assert_eq!(m.interpreter.program_counter(), 1);
    for _ in 0..5 {
        m.update();
    }
    assert_eq!(m.interpreter.program_counter(), 1);
    assert_eq!(m.game.variables.get(1), 0);
    m.game.message.close();
    m.update();
    assert_eq!(m.game.variables.get(1), 5);
}

#[test]
fn test_iteration_cap_keeps_position() {
    let mut commands = vec![com(12410, 0, &[]); 250];
    commands.push(set_var(1, 9));
    let mut m = Machine::new(commands);
    m.update();
    assert_eq!(m.interpreter.program_counter(), 100);
    m.update();
    assert_eq!(m.interpreter.program_counter(), 200);
    assert_eq!(m.game.variables.get(1), 0);
    m.update();
    assert_eq!(m.game.variables.get(1), 9);
    assert!(!m.interpreter.is_running());
}

#[test]
fn test_default_continuation_steps_past() {
    let mut m = Machine::new(vec![com(12420, 0, &[]), set_var(1, 3)]);
    m.update();
    assert!(m.game.scene.game_over);
    assert_eq!(m.interpreter.continuation(), Some(Continuation::Default));
    assert_eq!(m.interpreter.program_counter(), 0);
    m.update();
    assert_eq!(m.game.variables.get(1), 0);
    m.game.scene.game_over = false;
    m.update();
    assert_eq!(m.game.variables.get(1), 3);
}

#[test]
fn test_foreign_and_unknown_opcodes_skip() {
    let mut m = Machine::new(vec![
        com(99999, 0, &[]),
        com(13110, 0, &[0, 0, 0, 10]),
        set_var(2, 4),
    ]);
    m.update();
    assert_eq!(m.game.variables.get(2), 4);
    assert!(!m.interpreter.is_running());
}

#[test]
fn test_end_event_processing_leaves_list() {
    let mut m = Machine::new(vec![com(12310, 0, &[]), set_var(1, 1)]);
    m.update();
    assert_eq!(m.game.variables.get(1), 0);
    assert!(!m.interpreter.is_running());
}

#[test]
fn test_wait_suspends_for_ticks() {
    // 60 ticks a second, one tenth is 6 ticks
    let mut m = Machine::new(vec![com(11410, 0, &[1]), set_var(1, 1)]);
    m.update();
    assert_eq!(m.interpreter.wait_ticks(), 5);
    for _ in 0..5 {
        m.update();
        assert_eq!(m.game.variables.get(1), 0);
    }
    m.update();
    assert_eq!(m.game.variables.get(1), 1);
}

#[test]
fn test_child_runs_before_parent() {
    let data = Database::from_json(
        r#"{"common_events": [{"id": 4, "trigger": "call", "commands": [
            {"code": 10220, "params": [0, 1, 1, 1, 0, 10, 0]},
            {"code": 10110, "text": "inside"}
        ]}]}"#,
    )
    .unwrap();
    let mut m = Machine::new(vec![com(12330, 0, &[0, 4]), set_var(1, 1)]);
    m.data = data;
    m.update();
    assert_eq!(m.game.variables.get(1), 10);
    assert_eq!(m.interpreter.child().map(|c| c.depth()), Some(1));
    assert_eq!(m.interpreter.program_counter(), 1);
    m.game.message.close();
    m.update();
    assert!(m.interpreter.child().is_none());
    assert_eq!(m.game.variables.get(1), 1);
}
