use super::*;
use crate::lang::BattleOp;

const COMMON: &str = r#"{"common_events": [{"id": 4, "trigger": "call", "commands": [
    {"code": 10220, "params": [0, 2, 2, 1, 0, 10, 0]},
    {"code": 10110, "text": "inside"}
]}]}"#;

#[test]
fn test_call_common_event_holds_while_child_runs() {
    let call = com(1005, 0, &[4]);
    let mut m = Machine::with_context(COMMON, Context::Battle, vec![call.clone()]);
    m.update();
    assert_eq!(m.game.variables.get(2), 10);
    let child = m.interpreter.child().unwrap();
    assert_eq!((child.context(), child.depth()), (Context::Battle, 1));
    assert_eq!(m.interpreter.program_counter(), 1);

    let mut env = Env::new(&m.data, &mut m.game, &mut m.host);
    assert!(!m.interpreter.execute_battle(&mut env, &call, BattleOp::CallCommonEvent));
    assert_eq!(m.game.variables.get(2), 10);
    assert_eq!(m.interpreter.child().map(|c| c.depth()), Some(1));
}

#[test]
fn test_battle_child_finishes_before_parent() {
    let mut m = Machine::with_context(
        COMMON,
        Context::Battle,
        vec![com(1005, 0, &[4]), com(10220, 0, &[0, 1, 1, 0, 0, 1, 0])],
    );
    m.update();
    assert_eq!(m.game.variables.get(1), 0);
    m.game.message.close();
    m.update();
    assert!(m.interpreter.child().is_none());
    assert_eq!(m.game.variables.get(1), 1);
    assert!(!m.interpreter.is_running());
}
