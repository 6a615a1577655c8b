use super::operand::{actor_ids, operate_value, value_or_variable};
use super::{flow, Continuation, Env, Interpreter};
use crate::data::{Music, Sound};
use crate::game::{Flash, Picture, Shake, Tone, VarOp, MAX_LINES};
use crate::host::Effect;
use crate::lang::{Command, Opcode, SharedOp};

impl Interpreter {
    /// Commands that mean the same on the map and in battle.
    pub(super) fn execute_shared(&mut self, env: &mut Env, com: &Command, op: SharedOp) -> bool {
        use SharedOp::*;
        match op {
            End | Label | Loop | ShowChoiceEnd | Comment | Comment_2 | ShowMessage_2 => true,
            ShowMessage => self.command_show_message(env, com),
            MessageOptions => self.command_message_options(env, com),
            ChangeFaceGraphic => self.command_change_face_graphic(env, com),
            ShowChoice => self.command_show_choice(env, com),
            ShowChoiceOption => self.skip_block(),
            InputNumber => self.command_input_number(env, com),
            ControlSwitches => self.command_control_switches(env, com),
            ControlVars => self.command_control_vars(env, com),
            TimerOperation => self.command_timer_operation(env, com),
            ChangeGold => self.command_change_gold(env, com),
            ChangeItems => self.command_change_items(env, com),
            ChangePartyMembers => self.command_change_party_members(env, com),
            ChangeExp => self.command_change_exp(env, com),
            ChangeLevel => self.command_change_level(env, com),
            ChangeParameters => self.command_change_parameters(env, com),
            ChangeSkills => self.command_change_skills(env, com),
            ChangeEquipment => self.command_change_equipment(env, com),
            ChangeHP => self.command_change_hp(env, com),
            ChangeSP => self.command_change_sp(env, com),
            ChangeCondition => self.command_change_condition(env, com),
            FullHeal => self.command_full_heal(env, com),
            ChangeClass => self.command_change_class(env, com),
            ChangeBattleCommands => self.command_change_battle_commands(env, com),
            ChangeHeroName | ChangeHeroTitle | ChangeSpriteAssociation | ChangeActorFace => {
                self.command_change_actor_look(env, com, op)
            }
            ChangeVehicleGraphic => self.command_change_vehicle_graphic(env, com),
            ChangeSystemBGM => {
                let music = music_from(com, 1);
                env.game.system.system_bgm.insert(com.param(0), music);
                true
            }
            ChangeSystemSFX => {
                let sound = sound_from(com, 1);
                env.game.system.system_se.insert(com.param(0), sound);
                true
            }
            ChangeSystemGraphics => {
                let graphic = &mut env.game.system.graphic;
                graphic.name = com.text.clone();
                graphic.stretch = com.param(0) == 0;
                graphic.font = com.param(1);
                true
            }
            ChangeScreenTransitions => {
                match env.game.system.transitions.get_mut(com.param(0) as usize) {
                    Some(slot) => *slot = com.param(1),
                    None => tracing::warn!(slot = com.param(0), "unknown transition slot"),
                }
                true
            }
            TintScreen => self.command_tint_screen(env, com),
            FlashScreen => self.command_flash_screen(env, com),
            ShakeScreen => self.command_shake_screen(env, com),
            WeatherEffects => {
                env.game.screen.weather = com.param(0);
                env.game.screen.weather_strength = com.param(1);
                env.host.effect(Effect::Weather {
                    kind: com.param(0),
                    strength: com.param(1),
                });
                true
            }
            ShowPicture => self.command_show_picture(env, com),
            MovePicture => self.command_move_picture(env, com),
            ErasePicture => {
                env.game.screen.pictures.remove(&com.param(0));
                env.host.effect(Effect::ErasePicture { id: com.param(0) });
                true
            }
            Wait => {
                self.wait_ticks = env.data.config.tenths_to_ticks(com.param(0)).max(1);
                true
            }
            PlayBGM => {
                let music = music_from(com, 0);
                env.game.system.current_bgm = music.clone();
                env.host.effect(Effect::PlayBgm(music));
                true
            }
            FadeOutBGM => {
                env.game.system.current_bgm = Music::default();
                env.host.effect(Effect::FadeOutBgm {
                    millis: com.param(0) * 1000,
                });
                true
            }
            MemorizeBGM => {
                env.game.system.memorized_bgm = env.game.system.current_bgm.clone();
                true
            }
            PlayMemorizedBGM => {
                let music = env.game.system.memorized_bgm.clone();
                env.game.system.current_bgm = music.clone();
                env.host.effect(Effect::PlayBgm(music));
                true
            }
            PlaySound => {
                env.host.effect(Effect::PlaySe(sound_from(com, 0)));
                true
            }
            PlayMovie => {
                let game = &*env.game;
                let effect = Effect::PlayMovie {
                    name: com.text.clone(),
                    x: value_or_variable(game, com.param(0), com.param(1)),
                    y: value_or_variable(game, com.param(0), com.param(2)),
                    width: com.param(3),
                    height: com.param(4),
                };
                env.host.effect(effect);
                true
            }
            ChangeTeleportAccess => {
                env.game.system.teleport_allowed = com.flag(0);
                true
            }
            ChangeEscapeAccess => {
                env.game.system.escape_allowed = com.flag(0);
                true
            }
            ChangeSaveAccess => {
                env.game.system.save_allowed = com.flag(0);
                true
            }
            ChangeMainMenuAccess => {
                env.game.system.menu_allowed = com.flag(0);
                true
            }
            JumpToLabel => {
                match self.jumps.label(com.param(0)) {
                    Some(index) => self.pc = index,
                    None => tracing::debug!(label = com.param(0), "label not found"),
                }
                true
            }
            BreakLoop => {
                self.pc = self.jumps.exit(self.pc).unwrap_or_else(|| self.list.len());
                true
            }
            EndLoop => {
                if let Some(start) = self.jumps.exit(self.pc) {
                    self.pc = start;
                }
                true
            }
            EndEventProcessing => {
                self.pc = self.list.len();
                true
            }
            GameOver => {
                env.game.scene.game_over = true;
                self.continuation = Some(Continuation::Default);
                false
            }
        }
    }

    /// Moves to the terminator of the current block. Unmatched blocks
    /// fall through.
    pub(super) fn skip_block(&mut self) -> bool {
        if let Some(exit) = self.jumps.exit(self.pc) {
            self.pc = exit;
        }
        true
    }

    /// Raises game over when nobody in the party stands. Battles decide
    /// defeat on their own.
    pub(super) fn check_game_over(&self, env: &mut Env) {
        if env.game.troop.is_none() && env.game.party_defeated() {
            env.game.scene.game_over = true;
        }
    }

    fn command_show_message(&mut self, env: &mut Env, com: &Command) -> bool {
        if env.game.message.waiting {
            return false;
        }
        let list = self.list.clone();
        let message = &mut env.game.message;
        message.clear();
        message.push_line(com.text.clone());
        let lines = flow::message_lines(list.as_slice(), self.pc + 1);
        self.pc += lines.len();
        for line in lines {
            message.push_line(line);
        }
        message.waiting = true;
        message.visible = true;

        let next = match list.get(self.pc + 1) {
            Some(next) => next,
            None => return true,
        };
        match next.opcode() {
            Opcode::Shared(SharedOp::ShowChoice) => {
                let choices = flow::choices(list.as_slice(), self.pc + 2, next.indent);
                if choices.len() + message.texts.len() <= MAX_LINES {
                    self.pc += 1;
                    message.set_choices(&choices, next.param(0));
                    self.continuation = Some(Continuation::Choices);
                    return false;
                }
            }
            Opcode::Shared(SharedOp::InputNumber) => {
                if message.texts.len() < MAX_LINES {
                    self.pc += 1;
                    message.set_number_input(next.param(1), next.param(0));
                }
            }
            _ => {}
        }
        true
    }

    fn command_message_options(&mut self, env: &mut Env, com: &Command) -> bool {
        let options = &mut env.game.message.options;
        options.transparent = com.flag(0);
        options.position = com.param(1);
        options.fixed_position = !com.flag(2);
        options.continue_events = com.flag(3);
        true
    }

    fn command_change_face_graphic(&mut self, env: &mut Env, com: &Command) -> bool {
        if env.game.message.waiting {
            return false;
        }
        let face = &mut env.game.message.face;
        face.name = com.text.clone();
        face.index = com.param(0);
        face.right = com.flag(1);
        face.flipped = com.flag(2);
        true
    }

    fn command_show_choice(&mut self, env: &mut Env, com: &Command) -> bool {
        if env.game.message.waiting {
            return false;
        }
        let choices = flow::choices(self.list.as_slice(), self.pc + 1, com.indent);
        let message = &mut env.game.message;
        message.clear();
        message.set_choices(&choices, com.param(0));
        message.waiting = true;
        message.visible = true;
        self.continuation = Some(Continuation::Choices);
        false
    }

    fn command_input_number(&mut self, env: &mut Env, com: &Command) -> bool {
        if env.game.message.waiting {
            return false;
        }
        let message = &mut env.game.message;
        message.clear();
        message.set_number_input(com.param(1), com.param(0));
        message.waiting = true;
        message.visible = true;
        true
    }

    /// Switch and variable targets: 0 one id, 1 a range, 2 the id held
    /// in a variable.
    fn target_range(env: &Env, com: &Command) -> Option<(i32, i32)> {
        match com.param(0) {
            0 => Some((com.param(1), com.param(1))),
            1 => Some((com.param(1), com.param(2))),
            2 => {
                let id = env.game.variables.get(com.param(1));
                Some((id, id))
            }
            mode => {
                tracing::warn!(mode, "unsupported target mode");
                None
            }
        }
    }

    fn command_control_switches(&mut self, env: &mut Env, com: &Command) -> bool {
        let (first, last) = match Interpreter::target_range(env, com) {
            Some(range) => range,
            None => return true,
        };
        match com.param(3) {
            0 | 1 => env.game.switches.set_range(first, last, com.param(3) == 0),
            _ => env.game.switches.flip_range(first, last),
        }
        env.game.map.need_refresh = true;
        true
    }

    fn command_control_vars(&mut self, env: &mut Env, com: &Command) -> bool {
        let (first, last) = match Interpreter::target_range(env, com) {
            Some(range) => range,
            None => return true,
        };
        let op = match VarOp::from_param(com.param(3)) {
            Some(op) => op,
            None => {
                tracing::warn!(op = com.param(3), "unsupported variable operation");
                return true;
            }
        };
        let game = &mut *env.game;
        let (a, b) = (com.param(5), com.param(6));
        if com.param(4) == 3 {
            for id in first..=last {
                let value = game.random_range(a, b);
                game.variables.operate(id, op, value);
            }
        } else {
            let value = match com.param(4) {
                0 => a,
                1 => game.variables.get(a),
                2 => game.variables.get_indirect(a),
                4 => match b {
                    0 => game.party.item_count(a),
                    _ => game.equipped_count(a),
                },
                5 => game.actor_attribute(a, b),
                6 => game.character_attribute(a, self.owner_id, b),
                7 => game.other_value(env.data.config.fps, a),
                8 => match game.troop.as_ref().and_then(|t| t.enemy(a)) {
                    Some(enemy) => match b {
                        0 => enemy.hp,
                        1 => enemy.sp,
                        2 => enemy.max_hp,
                        3 => enemy.max_sp,
                        _ => 0,
                    },
                    None => 0,
                },
                operand => {
                    tracing::warn!(operand, "unsupported variable operand");
                    return true;
                }
            };
            game.variables.operate_range(first, last, op, value);
        }
        game.map.need_refresh = true;
        true
    }

    fn command_timer_operation(&mut self, env: &mut Env, com: &Command) -> bool {
        let id = if com.len() > 5 { com.param(5) as usize } else { 0 };
        let fps = env.data.config.fps as i32;
        let seconds = value_or_variable(env.game, com.param(1), com.param(2));
        let timer = match env.game.party.timer_mut(id) {
            Some(timer) => timer,
            None => {
                tracing::warn!(id, "unknown timer");
                return true;
            }
        };
        match com.param(0) {
            0 => timer.frames = seconds.max(0) * fps,
            1 => {
                timer.running = true;
                timer.visible = com.flag(3);
                timer.battle = com.flag(4);
            }
            2 => timer.running = false,
            _ => return false,
        }
        true
    }

    fn command_change_gold(&mut self, env: &mut Env, com: &Command) -> bool {
        let value = operate_value(env.game, com.param(0), com.param(1), com.param(2));
        env.game.party.gain_gold(value);
        true
    }

    /// Adding never removes and removing never adds.
    fn command_change_items(&mut self, env: &mut Env, com: &Command) -> bool {
        let value = operate_value(env.game, com.param(0), com.param(3), com.param(4));
        if (com.param(0) == 1 && value > 0) || (com.param(0) != 1 && value < 0) {
            return true;
        }
        let item = value_or_variable(env.game, com.param(1), com.param(2));
        env.game.party.add_item(item, value);
        env.game.map.need_refresh = true;
        true
    }

    fn command_change_party_members(&mut self, env: &mut Env, com: &Command) -> bool {
        let id = value_or_variable(env.game, com.param(1), com.param(2));
        if env.game.actors.get(id).is_none() {
            tracing::warn!(id, "invalid actor id");
            return true;
        }
        if com.param(0) == 0 {
            env.game.party.add_actor(id);
        } else {
            env.game.party.remove_actor(id);
        }
        self.check_game_over(env);
        env.game.map.need_refresh = true;
        true
    }

    fn command_change_exp(&mut self, env: &mut Env, com: &Command) -> bool {
        let value = operate_value(env.game, com.param(2), com.param(3), com.param(4));
        let max = env.data.config.exp_max;
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            if let Some(actor) = env.game.actors.get_mut(id) {
                actor.exp = (actor.exp + value).max(0).min(max);
            }
        }
        self.check_game_over(env);
        true
    }

    fn command_change_level(&mut self, env: &mut Env, com: &Command) -> bool {
        let value = operate_value(env.game, com.param(2), com.param(3), com.param(4));
        let max = env.data.config.level_max;
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            if let Some(actor) = env.game.actors.get_mut(id) {
                actor.level = (actor.level + value).max(1).min(max);
            }
        }
        self.check_game_over(env);
        true
    }

    fn command_change_parameters(&mut self, env: &mut Env, com: &Command) -> bool {
        let value = operate_value(env.game, com.param(2), com.param(4), com.param(5));
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            let actor = match env.game.actors.get_mut(id) {
                Some(actor) => actor,
                None => continue,
            };
            match com.param(3) {
                0 => {
                    actor.max_hp = (actor.max_hp + value).max(1);
                    actor.hp = actor.hp.min(actor.max_hp);
                }
                1 => {
                    actor.max_sp = (actor.max_sp + value).max(0);
                    actor.sp = actor.sp.min(actor.max_sp);
                }
                2 => actor.attack = (actor.attack + value).max(1),
                3 => actor.defense = (actor.defense + value).max(1),
                4 => actor.spirit = (actor.spirit + value).max(1),
                5 => actor.agility = (actor.agility + value).max(1),
                param => tracing::warn!(param, "unknown parameter"),
            }
        }
        self.check_game_over(env);
        true
    }

    fn command_change_skills(&mut self, env: &mut Env, com: &Command) -> bool {
        let skill = value_or_variable(env.game, com.param(3), com.param(4));
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            if let Some(actor) = env.game.actors.get_mut(id) {
                if com.flag(2) {
                    actor.skills.remove(&skill);
                } else {
                    actor.skills.insert(skill);
                }
            }
        }
        true
    }

    /// Equipping takes the item out of the inventory and returns whatever
    /// the slot held. Slot 5 in unequip mode clears every slot.
    fn command_change_equipment(&mut self, env: &mut Env, com: &Command) -> bool {
        let (item_id, slots) = match com.param(2) {
            0 => {
                let item_id = value_or_variable(env.game, com.param(3), com.param(4));
                match env.data.item(item_id).and_then(|i| i.kind.slot()) {
                    Some(slot) => (item_id, slot..slot + 1),
                    None => {
                        tracing::warn!(item_id, "item cannot be equipped");
                        return true;
                    }
                }
            }
            1 => match com.param(3) {
                slot @ 0..=4 => (0, slot as usize..slot as usize + 1),
                _ => (0, 0..5),
            },
            _ => return false,
        };
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            for slot in slots.clone() {
                if item_id > 0 && env.game.party.item_count(item_id) == 0 {
                    break;
                }
                let old = match env.game.actors.get_mut(id) {
                    Some(actor) => actor.set_equipment(slot, item_id),
                    None => break,
                };
                if item_id > 0 {
                    env.game.party.add_item(item_id, -1);
                }
                if old > 0 {
                    env.game.party.add_item(old, 1);
                }
            }
        }
        true
    }

    fn command_change_hp(&mut self, env: &mut Env, com: &Command) -> bool {
        let mut amount = value_or_variable(env.game, com.param(3), com.param(4));
        if com.flag(2) {
            amount = -amount;
        }
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            if let Some(actor) = env.game.actors.get_mut(id) {
                actor.change_hp(amount, com.flag(5));
            }
        }
        self.check_game_over(env);
        true
    }

    fn command_change_sp(&mut self, env: &mut Env, com: &Command) -> bool {
        let mut amount = value_or_variable(env.game, com.param(3), com.param(4));
        if com.flag(2) {
            amount = -amount;
        }
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            if let Some(actor) = env.game.actors.get_mut(id) {
                actor.change_sp(amount);
            }
        }
        true
    }

    fn command_change_condition(&mut self, env: &mut Env, com: &Command) -> bool {
        let state = com.param(3);
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            if let Some(actor) = env.game.actors.get_mut(id) {
                if com.flag(2) {
                    actor.remove_state(state);
                } else {
                    actor.add_state(state);
                }
            }
        }
        self.check_game_over(env);
        true
    }

    fn command_full_heal(&mut self, env: &mut Env, com: &Command) -> bool {
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            if let Some(actor) = env.game.actors.get_mut(id) {
                actor.full_heal();
            }
        }
        true
    }

    fn command_change_class(&mut self, env: &mut Env, com: &Command) -> bool {
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            if let Some(actor) = env.game.actors.get_mut(id) {
                actor.class_id = com.param(2);
                if com.flag(3) {
                    actor.level = 1;
                    actor.exp = 0;
                }
            }
        }
        true
    }

    fn command_change_battle_commands(&mut self, env: &mut Env, com: &Command) -> bool {
        let command = com.param(2);
        let add = com.flag(3);
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            if let Some(actor) = env.game.actors.get_mut(id) {
                actor.battle_commands.retain(|&c| c != command);
                if add {
                    actor.battle_commands.push(command);
                } else if command == 0 {
                    actor.battle_commands.clear();
                }
            }
        }
        true
    }

    fn command_change_actor_look(&mut self, env: &mut Env, com: &Command, op: SharedOp) -> bool {
        let actor = match env.game.actors.get_mut(com.param(0)) {
            Some(actor) => actor,
            None => {
                tracing::warn!(id = com.param(0), "invalid actor id");
                return true;
            }
        };
        match op {
            SharedOp::ChangeHeroName => actor.name = com.text.clone(),
            SharedOp::ChangeHeroTitle => actor.title = com.text.clone(),
            SharedOp::ChangeSpriteAssociation => {
                actor.sprite = com.text.clone();
                actor.sprite_index = com.param(1);
                actor.transparent = com.flag(2);
            }
            _ => {
                actor.face = com.text.clone();
                actor.face_index = com.param(1);
            }
        }
        true
    }

    fn command_change_vehicle_graphic(&mut self, env: &mut Env, com: &Command) -> bool {
        let kind = com.param(0);
        if let Some(slot) = env.game.system.vehicle_sprites.get_mut(kind as usize) {
            *slot = (com.text.clone(), com.param(1));
        }
        match env.game.map.vehicle_mut(kind) {
            Some(vehicle) => {
                vehicle.character.sprite = com.text.clone();
                vehicle.character.sprite_index = com.param(1);
            }
            None => tracing::warn!(kind, "unknown vehicle"),
        }
        true
    }

    fn command_tint_screen(&mut self, env: &mut Env, com: &Command) -> bool {
        let ticks = env.data.config.tenths_to_ticks(com.param(4));
        let tone = Tone {
            red: com.param(0),
            green: com.param(1),
            blue: com.param(2),
            saturation: com.param(3),
        };
        env.game.screen.tone = tone;
        env.host.effect(Effect::Tint {
            red: tone.red,
            green: tone.green,
            blue: tone.blue,
            saturation: tone.saturation,
            ticks,
        });
        if com.flag(5) {
            self.wait_ticks = ticks;
        }
        true
    }

    fn command_flash_screen(&mut self, env: &mut Env, com: &Command) -> bool {
        let ticks = env.data.config.tenths_to_ticks(com.param(4));
        if com.param(6) == 2 {
            env.game.screen.flash = None;
            return true;
        }
        let flash = Flash {
            red: com.param(0),
            green: com.param(1),
            blue: com.param(2),
            strength: com.param(3),
            ticks,
        };
        env.game.screen.flash = Some(flash);
        env.host.effect(Effect::Flash {
            red: flash.red,
            green: flash.green,
            blue: flash.blue,
            strength: flash.strength,
            ticks,
        });
        if com.flag(5) {
            self.wait_ticks = ticks;
        }
        true
    }

    fn command_shake_screen(&mut self, env: &mut Env, com: &Command) -> bool {
        let ticks = env.data.config.tenths_to_ticks(com.param(2));
        if com.param(4) == 2 {
            env.game.screen.shake = Shake::default();
            return true;
        }
        env.game.screen.shake = Shake {
            power: com.param(0),
            speed: com.param(1),
            ticks,
            continuous: com.param(4) == 1,
        };
        env.host.effect(Effect::Shake {
            power: com.param(0),
            speed: com.param(1),
            ticks,
        });
        if com.flag(3) {
            self.wait_ticks = ticks;
        }
        true
    }

    fn command_show_picture(&mut self, env: &mut Env, com: &Command) -> bool {
        let id = com.param(0);
        let picture = Picture {
            name: com.text.clone(),
            x: value_or_variable(env.game, com.param(1), com.param(2)),
            y: value_or_variable(env.game, com.param(1), com.param(3)),
            fixed_to_map: com.flag(4),
            magnify: com.param(5),
            transparency: com.param(6),
            tone: Tone {
                red: com.param(8),
                green: com.param(9),
                blue: com.param(10),
                saturation: com.param(11),
            },
        };
        env.game.screen.pictures.insert(id, picture);
        env.host.effect(Effect::ShowPicture {
            id,
            name: com.text.clone(),
        });
        true
    }

    fn command_move_picture(&mut self, env: &mut Env, com: &Command) -> bool {
        let id = com.param(0);
        let ticks = env.data.config.tenths_to_ticks(com.param(14));
        let x = value_or_variable(env.game, com.param(1), com.param(2));
        let y = value_or_variable(env.game, com.param(1), com.param(3));
        match env.game.screen.pictures.get_mut(&id) {
            Some(picture) => {
                picture.x = x;
                picture.y = y;
                picture.magnify = com.param(5);
                picture.transparency = com.param(6);
                picture.tone = Tone {
                    red: com.param(8),
                    green: com.param(9),
                    blue: com.param(10),
                    saturation: com.param(11),
                };
            }
            None => {
                tracing::warn!(id, "move of a picture that is not shown");
                return true;
            }
        }
        env.host.effect(Effect::MovePicture { id, x, y, ticks });
        if com.flag(15) {
            self.wait_ticks = ticks;
        }
        true
    }
}

/// Music stored as text plus fade, volume, tempo and balance starting
/// at parameter `first`.
fn music_from(com: &Command, first: usize) -> Music {
    Music {
        name: com.text.clone(),
        fadein: com.param(first),
        volume: com.param(first + 1),
        tempo: com.param(first + 2),
        balance: com.param(first + 3),
    }
}

fn sound_from(com: &Command, first: usize) -> Sound {
    Sound {
        name: com.text.clone(),
        volume: com.param(first),
        tempo: com.param(first + 1),
        balance: com.param(first + 2),
    }
}
