use super::map::compare;
use super::operand::value_or_variable;
use super::{Env, Interpreter};
use crate::data::TroopCondition;
use crate::game::{BattleResult, Game, Troop};
use crate::host::Effect;
use crate::lang::{BattleOp, Command};

impl Interpreter {
    /// Commands only a troop page understands.
    pub(super) fn execute_battle(&mut self, env: &mut Env, com: &Command, op: BattleOp) -> bool {
        use BattleOp::*;
        match op {
            EndBranch_B => true,
            ElseBranch_B => self.skip_block(),
            ConditionalBranch_B => self.command_battle_branch(env, com),
            CallCommonEvent => {
                if self.child.is_some() {
                    return false;
                }
                match env.data.common_event(com.param(0)) {
                    Some(event) => {
                        let list = event.commands.clone();
                        self.spawn_child(env, list, 0);
                    }
                    None => tracing::warn!(id = com.param(0), "common event not found"),
                }
                true
            }
            EnableCombo => {
                let id = com.param(0);
                if !env.game.party.contains(id) {
                    return true;
                }
                if let Some(actor) = env.game.actors.get_mut(id) {
                    actor.combo = Some((com.param(1), com.param(2)));
                }
                true
            }
            ShowBattleAnimation_B => self.command_battle_animation(env, com),
            _ => {
                let game = &mut *env.game;
                let troop = match game.troop.as_mut() {
                    Some(troop) => troop,
                    None => {
                        tracing::warn!("{} outside of a battle", op);
                        return true;
                    }
                };
                match op {
                    ForceFlee => force_flee(troop, com),
                    ChangeMonsterHP => {
                        let mode = com.param(2);
                        let value = com.param(3);
                        let variable = game.variables.get(value);
                        if let Some(enemy) = enemy_mut(troop, com.param(0)) {
                            if !enemy.is_dead() {
                                let mut change = match mode {
                                    0 => value,
                                    1 => variable,
                                    _ => value * enemy.hp / 100,
                                };
                                if com.flag(1) {
                                    change = -change;
                                }
                                enemy.change_hp(change, com.flag(4));
                            }
                        }
                    }
                    ChangeMonsterMP => {
                        let mut change = match com.param(2) {
                            0 => com.param(3),
                            _ => game.variables.get(com.param(3)),
                        };
                        if com.flag(1) {
                            change = -change;
                        }
                        if let Some(enemy) = enemy_mut(troop, com.param(0)) {
                            enemy.change_sp(change);
                        }
                    }
                    ChangeMonsterCondition => {
                        if let Some(enemy) = enemy_mut(troop, com.param(0)) {
                            if com.flag(1) {
                                enemy.remove_state(com.param(2));
                            } else {
                                enemy.add_state(com.param(2));
                            }
                        }
                    }
                    ShowHiddenMonster => {
                        if let Some(enemy) = enemy_mut(troop, com.param(0)) {
                            enemy.hidden = false;
                        }
                    }
                    ChangeBattleBG => troop.background = com.text.clone(),
                    TerminateBattle => {
                        troop.terminated = true;
                        game.scene.battle_result = BattleResult::Abort;
                        self.advance();
                        return false;
                    }
                    _ => {}
                }
                true
            }
        }
    }

    fn command_battle_branch(&mut self, env: &mut Env, com: &Command) -> bool {
        let game = &*env.game;
        let troop = game.troop.as_ref();
        let result = match com.param(0) {
            0 => game.switches.get(com.param(1)) == (com.param(2) == 0),
            1 => {
                let left = game.variables.get(com.param(1));
                let right = value_or_variable(game, com.param(2), com.param(3));
                compare(left, right, com.param(4))
            }
            2 => match game.actors.get(com.param(1)) {
                Some(actor) => actor.can_act(),
                None => {
                    tracing::warn!(id = com.param(1), "branch on unknown actor");
                    false
                }
            },
            3 => match troop.and_then(|t| t.enemy(com.param(1))) {
                Some(enemy) => enemy.can_act(),
                None => {
                    tracing::warn!(id = com.param(1), "branch on unknown enemy");
                    false
                }
            },
            4 => troop.and_then(|t| t.target) == Some(com.param(1) as usize),
            5 => troop.and_then(|t| t.last_command) == Some((com.param(1), com.param(2))),
            kind => {
                tracing::warn!(kind, "unsupported battle branch condition");
                false
            }
        };
        if result {
            return true;
        }
        self.skip_block()
    }

    fn command_battle_animation(&mut self, env: &mut Env, com: &Command) -> bool {
        if self.animation_waiting {
            if env.host.animation_pending() {
                return false;
            }
            self.animation_waiting = false;
            return true;
        }
        let id = com.param(0);
        let target = com.param(1);
        if let Some(troop) = env.game.troop.as_mut() {
            let index = if target < 0 { None } else { Some(target as usize) };
            troop.animations.push((id, index));
        }
        env.host.effect(Effect::BattleAnimation {
            id,
            target,
            global: target < 0,
        });
        if com.flag(2) {
            self.animation_waiting = true;
            return false;
        }
        true
    }
}

fn enemy_mut(troop: &mut Troop, index: i32) -> Option<&mut crate::game::Enemy> {
    let enemy = troop.enemy_mut(index);
    if enemy.is_none() {
        tracing::warn!(index, "invalid enemy index");
    }
    enemy
}

/// `p0` 0 the party runs, 1 every enemy runs, 2 enemy `p1` runs.
fn force_flee(troop: &mut Troop, com: &Command) {
    match com.param(0) {
        0 => troop.party_fled = true,
        1 => {
            for enemy in troop.enemies.iter_mut().filter(|e| e.can_act()) {
                enemy.hidden = true;
                enemy.fled = true;
            }
        }
        2 => {
            if let Some(enemy) = enemy_mut(troop, com.param(1)) {
                enemy.hidden = true;
                enemy.fled = true;
            }
        }
        mode => tracing::warn!(mode, "unknown flee mode"),
    }
}

/// Whether a troop page may start. Pages naming no condition never do.
pub fn troop_page_ready(game: &Game, condition: &TroopCondition) -> bool {
    if *condition == TroopCondition::default() {
        return false;
    }
    let troop = match game.troop.as_ref() {
        Some(troop) => troop,
        None => return false,
    };
    if let Some(id) = condition.switch_a {
        if !game.switches.get(id) {
            return false;
        }
    }
    if let Some(id) = condition.switch_b {
        if !game.switches.get(id) {
            return false;
        }
    }
    if let Some((id, min)) = condition.variable {
        if game.variables.get(id) < min {
            return false;
        }
    }
    if let Some((start, every)) = condition.turn {
        let hit = if every > 0 {
            troop.turn >= start && (troop.turn - start) % every == 0
        } else {
            troop.turn == start
        };
        if !hit {
            return false;
        }
    }
    if let Some((index, min, max)) = condition.enemy_hp {
        match troop.enemies.get(index) {
            Some(enemy) => {
                let percent = enemy.hp_percent();
                if percent < min || percent > max {
                    return false;
                }
            }
            None => {
                tracing::warn!(index, "troop page names an invalid enemy");
                return false;
            }
        }
    }
    if let Some((id, min, max)) = condition.actor_hp {
        match game.actors.get(id) {
            Some(actor) if actor.max_hp > 0 => {
                let percent = actor.hp * 100 / actor.max_hp;
                if percent < min || percent > max {
                    return false;
                }
            }
            _ => {
                tracing::warn!(id, "troop page names an invalid actor");
                return false;
            }
        }
    }
    true
}
