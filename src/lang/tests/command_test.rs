use super::*;

#[test]
fn test_missing_parameters_read_as_zero() {
    let c = Command::new(10220, 0, &[0, 5, 5]);
    assert_eq!(c.param(2), 5);
    assert_eq!(c.param(3), 0);
    assert_eq!(c.param(99), 0);
    assert!(!c.flag(7));
}

#[test]
fn test_deserialize_with_defaults() {
    let json = r#"[
        {"code": 10110, "text": "Hello"},
        {"code": 12010, "indent": 0, "params": [0, 1, 0]},
        {"code": 10}
    ]"#;
    let list: CommandList = serde_json::from_str(json).unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].text, "Hello");
    assert_eq!(list[0].indent, 0);
    assert!(list[0].parameters.is_empty());
    assert_eq!(list[1].parameters, vec![0, 1, 0]);
    assert_eq!(list[2].opcode(), Opcode::Shared(SharedOp::End));
}

#[test]
fn test_clones_share_commands() {
    let list = CommandList::new(vec![Command::new(12110, 0, &[1])]);
    let copy = list.clone();
    assert_eq!(list, copy);
    assert!(std::ptr::eq(list.as_slice(), copy.as_slice()));
}

#[test]
fn test_display_indents_and_names() {
    let c = Command::new(10110, 2, &[]).with_text("Hi");
    assert_eq!(c.to_string(), "    ShowMessage \"Hi\"");
    let c = Command::new(11410, 0, &[10]);
    assert_eq!(c.to_string(), "Wait [10]");
}
