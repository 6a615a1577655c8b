mod common;
use common::*;
use rpgevent::game::{Enemy, Troop};
use rpgevent::lang::Command;
use rpgevent::mach::Context;

const TROOP: &str = r#"{
    "troops": [{"id": 3, "enemies": [
        {"name": "Slime", "hp": 40},
        {"name": "Bat", "hp": 20, "hidden": true}
    ]}],
    "common_events": [{"id": 4, "trigger": "call", "commands": [
        {"code": 10220, "params": [0, 2, 2, 1, 0, 10, 0]}
    ]}]
}"#;

fn set_var(indent: i32, id: i32, value: i32) -> Command {
    com(10220, indent, &[0, id, id, 0, 0, value, 0])
}

fn battle(commands: Vec<Command>) -> Harness {
    let mut h = Harness::with_context(TROOP, Context::Battle);
    let troop = Troop::new(h.data.troop(3).unwrap());
    h.game.troop = Some(troop);
    h.bind(commands);
    h
}

fn enemy(h: &Harness, index: usize) -> &Enemy {
    &h.game.troop.as_ref().unwrap().enemies[index]
}

fn bat_branch(show_bat: bool) -> Harness {
    let mut commands = vec![];
    if show_bat {
        commands.push(com(13310, 0, &[1]));
    }
    commands.extend(vec![
        com(13610, 0, &[3, 1]),
        set_var(1, 1, 1),
        com(23310, 0, &[]),
        set_var(1, 1, 2),
        com(23311, 0, &[]),
        set_var(0, 2, 1),
    ]);
    let mut h = battle(commands);
    h.tick();
    h
}

#[test]
fn test_battle_branch_false_takes_else() {
    let h = bat_branch(false);
    assert_eq!((h.var(1), h.var(2)), (2, 1));
}

#[test]
fn test_battle_branch_true_skips_else() {
    let h = bat_branch(true);
    assert_eq!((h.var(1), h.var(2)), (1, 1));
}

#[test]
fn test_battle_branch_false_without_else() {
    let mut h = battle(vec![
        com(13610, 0, &[3, 1]),
        set_var(1, 1, 1),
        com(23311, 0, &[]),
        set_var(0, 2, 1),
    ]);
    h.tick();
    assert_eq!((h.var(1), h.var(2)), (0, 1));
    assert!(!h.interpreter.is_running());
}

#[test]
fn test_monster_hp_literal_and_percent() {
    let mut h = battle(vec![
        com(13110, 0, &[0, 1, 0, 10, 0]),
        com(13110, 0, &[0, 1, 2, 50, 0]),
        com(13110, 0, &[1, 0, 0, 100, 0]),
    ]);
    h.tick();
    assert_eq!(enemy(&h, 0).hp, 15);
    assert_eq!(enemy(&h, 1).hp, 20);
}

#[test]
fn test_monster_hp_without_lethal_leaves_one() {
    let mut h = battle(vec![set_var(0, 5, 100), com(13110, 0, &[0, 1, 1, 5, 0])]);
    h.tick();
    let slime = enemy(&h, 0);
    assert_eq!(slime.hp, 1);
    assert!(!slime.is_dead());
    assert!(slime.can_act());
}

#[test]
fn test_lethal_monster_hp_kills() {
    let mut h = battle(vec![
        set_var(0, 5, 100),
        com(13110, 0, &[0, 1, 1, 5, 1]),
        com(13110, 0, &[0, 0, 0, 10, 0]),
    ]);
    h.tick();
    let slime = enemy(&h, 0);
    assert_eq!(slime.hp, 0);
    assert!(slime.is_dead());
}

#[test]
fn test_map_command_skipped_in_battle() {
    let mut h = battle(vec![com(10720, 0, &[0, 0, 0, 0, 5]), set_var(0, 1, 1)]);
    let logs = capture_warnings(|| h.tick());
    assert!(!h.game.scene.shop_calling);
    assert_eq!(h.var(1), 1);
    assert!(logs.contains("skipped outside its context"));
}

#[test]
fn test_common_event_runs_as_battle_child() {
    let mut h = battle(vec![com(1005, 0, &[4]), com(1005, 0, &[4]), set_var(0, 1, 1)]);
    h.tick();
    assert_eq!(h.var(2), 20);
    assert_eq!(h.var(1), 1);
    assert!(h.interpreter.child().is_none());
}
