mod common;
use common::*;
use rpgevent::game::BattleResult;
use rpgevent::host::Effect;
use rpgevent::lang::Command;
use rpgevent::mach::Continuation;

const PARTY: &str = r#"{
    "actors": [{"id": 1, "name": "Alex", "max_hp": 50, "max_sp": 10}],
    "start": {"party": [1], "gold": 100}
}"#;

fn set_var(indent: i32, id: i32, value: i32) -> Command {
    com(10220, indent, &[0, id, id, 0, 0, value, 0])
}

fn shop(handlers: bool) -> Harness {
    Harness::run(
        "{}",
        vec![
            com(10720, 0, &[0, 0, handlers as i32, 0, 5, 6]),
            com(20720, 0, &[]),
            set_var(1, 1, 1),
            com(20721, 0, &[]),
            set_var(1, 1, 2),
            com(20722, 0, &[]),
            set_var(0, 2, 1),
        ],
    )
}

#[test]
fn test_shop_reenters_at_the_same_command() {
    let mut h = shop(true);
    h.tick();
    assert!(h.game.scene.shop_calling);
    assert_eq!(h.game.scene.shop.goods, vec![5, 6]);
    assert_eq!(h.interpreter.continuation(), Some(Continuation::OpenShop));
    h.ticks(5);
    assert_eq!(h.pc(), 0);
    assert_eq!(h.interpreter.continuation(), Some(Continuation::OpenShop));

    h.game.scene.shop_transaction = true;
    h.game.scene.shop_calling = false;
    h.tick();
    assert_eq!(h.var(1), 1);
    assert_eq!(h.var(2), 1);
}

#[test]
fn test_shop_without_purchase() {
    let mut h = shop(true);
    h.tick();
    h.game.scene.shop_calling = false;
    h.tick();
    assert_eq!(h.var(1), 2);
    assert_eq!(h.var(2), 1);
}

#[test]
fn test_shop_without_handlers_skips_sections() {
    let mut h = shop(false);
    h.tick();
    h.game.scene.shop_transaction = true;
    h.game.scene.shop_calling = false;
    h.tick();
    assert_eq!(h.var(1), 0);
    assert_eq!(h.var(2), 1);
}

fn inn(price: i32) -> Harness {
    let mut h = Harness::run(
        PARTY,
        vec![
            com(10730, 0, &[0, price, 1]),
            com(20730, 0, &[]),
            set_var(1, 1, 1),
            com(20731, 0, &[]),
            set_var(1, 1, 2),
            com(20732, 0, &[]),
            set_var(0, 2, 1),
        ],
    );
    h.game.actors.get_mut(1).unwrap().hp = 5;
    h
}

#[test]
fn test_inn_stay() {
    let mut h = inn(30);
    h.tick();
    let message = &h.game.message;
    assert!(message.waiting);
    assert_eq!(message.texts[0], "A night's stay is 30 G.");
    assert_eq!(message.choices(), &["Stay".to_string(), "Leave".to_string()]);
    assert_eq!(message.choice_disabled, vec![false, false]);
    assert!(h.game.scene.inn_calling);

    h.answer(0);
    h.ticks(5);
    assert_eq!(h.game.party.gold, 70);
    assert_eq!(h.game.actors.get(1).unwrap().hp, 50);
    assert!(!h.game.scene.inn_calling);
    assert_eq!(h.var(1), 1);
    assert_eq!(h.var(2), 1);
    let effects = &h.host.effects;
    assert!(effects.contains(&Effect::Transition { erase: true, kind: 0 }));
    assert!(effects.contains(&Effect::Transition { erase: false, kind: 0 }));
}

#[test]
fn test_inn_stay_waits_for_the_screen() {
    let mut h = inn(30);
    h.tick();
    h.answer(0);
    h.host.transition = true;
    h.ticks(4);
    assert_eq!(h.interpreter.continuation(), Some(Continuation::ShowInnContinue));
    h.host.transition = false;
    h.tick();
    assert_eq!(h.interpreter.continuation(), Some(Continuation::ShowInnFinish));
    h.host.bgm_looped = false;
    h.game.system.system_bgm.insert(2, rpgevent::data::Music::named("Inn"));
    h.ticks(3);
    assert_eq!(h.var(2), 0);
    h.host.bgm_looped = true;
    h.ticks(2);
    assert_eq!(h.var(2), 1);
}

#[test]
fn test_inn_no_stay() {
    let mut h = inn(30);
    h.tick();
    h.answer(1);
    h.ticks(2);
    assert_eq!(h.game.party.gold, 100);
    assert_eq!(h.game.actors.get(1).unwrap().hp, 5);
    assert_eq!(h.var(1), 2);
    assert_eq!(h.var(2), 1);
}

#[test]
fn test_inn_too_expensive() {
    let mut h = inn(500);
    h.tick();
    assert_eq!(h.game.message.choice_disabled, vec![true, false]);
}

#[test]
fn test_free_inn_skips_the_question() {
    let mut h = inn(0);
    h.tick();
    assert!(!h.game.message.waiting);
    h.ticks(4);
    assert_eq!(h.game.actors.get(1).unwrap().hp, 50);
    assert_eq!(h.var(1), 1);
}

fn encounter(escape_mode: i32, defeat_mode: i32) -> Harness {
    let mut h = Harness::run(
        PARTY,
        vec![
            com(10710, 0, &[0, 3, 0, escape_mode, defeat_mode, 0]),
            com(20710, 0, &[]),
            set_var(1, 1, 1),
            com(20711, 0, &[]),
            set_var(1, 1, 2),
            com(20712, 0, &[]),
            set_var(1, 1, 3),
            com(20713, 0, &[]),
            set_var(0, 2, 1),
        ],
    );
    h.tick();
    assert!(h.game.scene.battle_calling);
    assert_eq!(h.game.scene.battle.troop_id, 3);
    h
}

fn finish(h: &mut Harness, result: BattleResult) {
    h.game.scene.battle_result = result;
    h.game.scene.battle_calling = false;
    h.tick();
}

#[test]
fn test_encounter_victory_handler() {
    let mut h = encounter(2, 1);
    finish(&mut h, BattleResult::Victory);
    assert_eq!((h.var(1), h.var(2)), (1, 1));
}

#[test]
fn test_encounter_escape_handler() {
    let mut h = encounter(2, 1);
    finish(&mut h, BattleResult::Escape);
    assert_eq!((h.var(1), h.var(2)), (2, 1));
}

#[test]
fn test_encounter_defeat_handler() {
    let mut h = encounter(2, 1);
    finish(&mut h, BattleResult::Defeat);
    assert_eq!((h.var(1), h.var(2)), (3, 1));
    assert!(!h.game.scene.game_over);
}

#[test]
fn test_encounter_escape_ends_event() {
    let mut h = encounter(1, 1);
    finish(&mut h, BattleResult::Escape);
    assert_eq!((h.var(1), h.var(2)), (0, 0));
    assert!(!h.interpreter.is_running());
}

#[test]
fn test_encounter_defeat_is_game_over() {
    let mut h = encounter(0, 0);
    finish(&mut h, BattleResult::Defeat);
    assert!(h.game.scene.game_over);
    assert_eq!(h.var(2), 0);
}

#[test]
fn test_encounter_abort_skips_every_section() {
    let mut h = encounter(2, 1);
    finish(&mut h, BattleResult::Abort);
    assert_eq!((h.var(1), h.var(2)), (0, 1));
}

#[test]
fn test_encounter_troop_from_variable() {
    let mut h = Harness::run(PARTY, vec![com(10710, 0, &[1, 9, 1, 0, 0, 1])]);
    h.game.variables.set(9, 12);
    h.tick();
    let request = &h.game.scene.battle;
    assert_eq!(request.troop_id, 12);
    assert_eq!(request.background_mode, 1);
    assert!(request.first_strike);
}
