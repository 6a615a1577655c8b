use super::operand::{actor_ids, value_or_variable};
use super::{flow, Continuation, Env, Interpreter, KeyInput};
use crate::game::{
    BattleRequest, BattleResult, Flash, MoveRoute, NameRequest, Panorama, ShopRequest, Target,
    BGM_INN, BOAT, DOWN, LEFT, PLAYER, RIGHT, THIS_EVENT, UP,
};
use crate::host::{Effect, Key};
use crate::lang::{Command, MapOp, Opcode};

impl Interpreter {
    /// Commands only the field map understands.
    pub(super) fn execute_map(&mut self, env: &mut Env, com: &Command, op: MapOp) -> bool {
        use MapOp::*;
        match op {
            EndBranch | EndShop | EndInn | EndBattle => true,
            ConditionalBranch => self.command_conditional_branch(env, com),
            ElseBranch | Transaction | NoTransaction | Stay | NoStay | VictoryHandler
            | EscapeHandler | DefeatHandler => self.skip_block(),
            OpenShop => self.command_open_shop(env, com),
            ShowInn => self.command_show_inn(env, com),
            EnemyEncounter => self.command_enemy_encounter(env, com),
            EnterHeroName => {
                env.game.scene.name = NameRequest {
                    actor_id: com.param(0),
                    charset: com.param(1),
                    use_default: com.flag(2),
                };
                env.game.scene.name_calling = true;
                true
            }
            OpenSaveMenu => {
                env.game.scene.save_calling = true;
                self.continuation = Some(Continuation::Default);
                false
            }
            OpenMainMenu => {
                env.game.scene.menu_calling = true;
                self.continuation = Some(Continuation::Default);
                false
            }
            ReturnToTitle => {
                env.game.scene.to_title = true;
                self.continuation = Some(Continuation::Default);
                false
            }
            Teleport => {
                let direction = if com.len() > 3 { com.param(3) - 1 } else { -1 };
                self.reserve_teleport(env, com.param(0), com.param(1), com.param(2), direction)
            }
            MemorizeLocation => {
                let (map_id, x, y) = (env.game.map.id, env.game.map.player.x, env.game.map.player.y);
                env.game.variables.set(com.param(0), map_id);
                env.game.variables.set(com.param(1), x);
                env.game.variables.set(com.param(2), y);
                env.game.map.need_refresh = true;
                true
            }
            RecallToLocation => {
                let variables = &env.game.variables;
                let (map_id, x, y) = (
                    variables.get(com.param(0)),
                    variables.get(com.param(1)),
                    variables.get(com.param(2)),
                );
                if map_id == env.game.map.id {
                    env.game.map.player.x = x;
                    env.game.map.player.y = y;
                    return true;
                }
                self.reserve_teleport(env, map_id, x, y, -1)
            }
            EraseScreen | ShowScreen => self.command_transition(env, com, op == EraseScreen),
            EnterExitVehicle => self.command_enter_exit_vehicle(env),
            SetVehicleLocation => {
                let mode = com.param(1);
                let map_id = value_or_variable(env.game, mode, com.param(2));
                let x = value_or_variable(env.game, mode, com.param(3));
                let y = value_or_variable(env.game, mode, com.param(4));
                match env.game.map.vehicle_mut(com.param(0)) {
                    Some(vehicle) => {
                        vehicle.map_id = map_id;
                        vehicle.character.x = x;
                        vehicle.character.y = y;
                    }
                    None => tracing::warn!(kind = com.param(0), "unknown vehicle"),
                }
                true
            }
            ChangeEventLocation => {
                let x = value_or_variable(env.game, com.param(1), com.param(2));
                let y = value_or_variable(env.game, com.param(1), com.param(3));
                match env.game.map.character_mut(com.param(0), self.owner_id) {
                    Some(character) => {
                        character.x = x;
                        character.y = y;
                        if com.param(4) > 0 {
                            character.set_direction(com.param(4) - 1);
                        }
                    }
                    None => tracing::warn!(id = com.param(0), "character not on this map"),
                }
                true
            }
            TradeEventLocations => self.command_trade_event_locations(env, com),
            StoreTerrainID => {
                let x = value_or_variable(env.game, com.param(0), com.param(1));
                let y = value_or_variable(env.game, com.param(0), com.param(2));
                let terrain = env.data.map(env.game.map.id).map_or(0, |m| m.terrain_at(x, y));
                env.game.variables.set(com.param(3), terrain);
                env.game.map.need_refresh = true;
                true
            }
            StoreEventID => {
                let x = value_or_variable(env.game, com.param(0), com.param(1));
                let y = value_or_variable(env.game, com.param(0), com.param(2));
                let id = env.game.map.event_at(x, y);
                env.game.variables.set(com.param(3), id);
                env.game.map.need_refresh = true;
                true
            }
            PanScreen => self.command_pan_screen(env, com),
            ShowBattleAnimation => self.command_show_battle_animation(env, com),
            PlayerVisibility => {
                env.game.map.player.transparent = !com.flag(0);
                true
            }
            FlashSprite => self.command_flash_sprite(env, com),
            MoveEvent => self.command_move_event(env, com),
            ProceedWithMovement => {
                self.move_route_waiting = true;
                true
            }
            HaltAllMovement => {
                env.game.map.halt_all_movement();
                true
            }
            KeyInputProc => self.command_key_input(env, com),
            ChangeMapTileset => {
                env.game.map.chipset_id = com.param(0);
                true
            }
            ChangePBG => {
                env.game.map.panorama = Some(Panorama {
                    name: com.text.clone(),
                    horizontal_scroll: com.flag(0),
                    vertical_scroll: com.flag(1),
                    horizontal_speed: if com.flag(2) { com.param(3) } else { 0 },
                    vertical_speed: if com.flag(4) { com.param(5) } else { 0 },
                });
                true
            }
            ChangeEncounterRate => {
                env.game.map.encounter_rate = com.param(0);
                true
            }
            TileSubstitution => {
                env.game.map.tile_substitutions.push((com.flag(0), com.param(1), com.param(2)));
                true
            }
            TeleportTargets => {
                let map_id = com.param(1);
                if com.flag(0) {
                    env.game.targets.teleport.remove(&map_id);
                } else {
                    let target = Target {
                        map_id,
                        x: com.param(2),
                        y: com.param(3),
                        switch_id: if com.flag(4) { Some(com.param(5)) } else { None },
                    };
                    env.game.targets.teleport.insert(map_id, target);
                }
                true
            }
            EscapeTarget => {
                env.game.targets.escape = Some(Target {
                    map_id: com.param(0),
                    x: com.param(1),
                    y: com.param(2),
                    switch_id: if com.flag(3) { Some(com.param(4)) } else { None },
                });
                true
            }
            EraseEvent => {
                if self.owner_id > 0 {
                    if let Some(event) = env.game.map.events.get_mut(&self.owner_id) {
                        event.active = false;
                    }
                }
                true
            }
            CallEvent => self.command_call_event(env, com),
            SimulatedAttack => self.command_simulated_attack(env, com),
        }
    }

    /// Hands the move to the runtime. The root interpreter yields past the
    /// command so the map can change under it. Parallel ones keep going.
    fn reserve_teleport(&mut self, env: &mut Env, map_id: i32, x: i32, y: i32, direction: i32) -> bool {
        if env.game.map.teleport.is_some() || env.game.message.visible || env.host.transition_pending() {
            return false;
        }
        env.game.map.teleport = Some(crate::game::Teleport {
            map_id,
            x,
            y,
            direction,
        });
        if !self.is_root {
            return true;
        }
        self.advance();
        false
    }

    fn command_transition(&mut self, env: &mut Env, com: &Command, erase: bool) -> bool {
        if env.host.transition_pending() || env.game.message.visible {
            return false;
        }
        let kind = match com.param(0) {
            -1 => env.game.system.transitions[if erase { 0 } else { 1 }],
            kind => kind,
        };
        env.game.screen.erased = erase;
        env.host.effect(Effect::Transition { erase, kind });
        self.advance();
        false
    }

    fn command_conditional_branch(&mut self, env: &mut Env, com: &Command) -> bool {
        let game = &*env.game;
        let fps = env.data.config.fps as i32;
        let result = match com.param(0) {
            0 => game.switches.get(com.param(1)) == (com.param(2) == 0),
            1 => {
                let left = game.variables.get(com.param(1));
                let right = value_or_variable(game, com.param(2), com.param(3));
                compare(left, right, com.param(4))
            }
            2 | 10 => {
                let timer = game.party.timer(if com.param(0) == 2 { 0 } else { 1 });
                let limit = com.param(1) * fps;
                if com.param(2) == 0 {
                    timer.frames >= limit
                } else {
                    timer.frames <= limit
                }
            }
            3 => {
                if com.param(2) == 0 {
                    game.party.gold >= com.param(1)
                } else {
                    game.party.gold <= com.param(1)
                }
            }
            4 => {
                let item = com.param(1);
                let held = game.party.item_count(item) + game.equipped_count(item) > 0;
                held == (com.param(2) == 0)
            }
            5 => {
                let id = com.param(1);
                match game.actors.get(id) {
                    Some(actor) => match com.param(2) {
                        0 => game.party.contains(id),
                        1 => actor.name == com.text,
                        2 => actor.level >= com.param(3),
                        3 => actor.hp >= com.param(3),
                        4 => actor.skills.contains(&com.param(3)),
                        5 => actor.is_equipped(com.param(3)),
                        6 => actor.states.contains(&com.param(3)),
                        _ => false,
                    },
                    None => {
                        tracing::warn!(id, "branch on unknown actor");
                        false
                    }
                }
            }
            6 => game
                .map
                .character(com.param(1), self.owner_id)
                .map_or(false, |c| c.direction == com.param(2)),
            7 => game.map.vehicle_in_use() == Some(com.param(1)),
            8 => self.started_by_decision,
            9 => env.host.bgm_played_once(),
            kind => {
                tracing::warn!(kind, "unsupported branch condition");
                false
            }
        };
        if result {
            return true;
        }
        self.skip_block()
    }

    fn command_open_shop(&mut self, env: &mut Env, com: &Command) -> bool {
        let (buys, sells) = match com.param(0) {
            0 => (true, true),
            1 => (true, false),
            2 => (false, true),
            _ => return false,
        };
        let scene = &mut env.game.scene;
        scene.shop = ShopRequest {
            buys,
            sells,
            kind: com.param(1),
            goods: com.parameters.get(4..).unwrap_or(&[]).to_vec(),
        };
        scene.shop_transaction = false;
        scene.shop_calling = true;
        self.continuation = Some(Continuation::OpenShop);
        false
    }

    /// Back from the shop: land after the section matching what happened.
    pub(super) fn continue_open_shop(&mut self, env: &mut Env) -> bool {
        let target = if env.game.scene.shop_transaction {
            MapOp::Transaction
        } else {
            MapOp::NoTransaction
        };
        self.skip_to_handler(target.into(), MapOp::EndShop.into());
        self.advance();
        true
    }

    /// With section handlers on (`p2`), moves to the `target` section of
    /// the block opened at the program counter.
    fn skip_to_handler(&mut self, target: Opcode, end: Opcode) {
        let com = match self.list.get(self.pc) {
            Some(com) if com.flag(2) => com,
            _ => return,
        };
        let indent = com.indent;
        if let Some(index) = flow::skip_to(self.list.as_slice(), self.pc + 1, target, end, indent, indent) {
            self.pc = index;
        }
    }

    fn command_show_inn(&mut self, env: &mut Env, com: &Command) -> bool {
        let price = com.param(1);
        if price == 0 {
            env.game.message.choice_result = 0;
            self.continuation = Some(Continuation::ShowInnStart);
            return false;
        }
        if env.game.message.waiting {
            return false;
        }
        let terms = &env.data.terms;
        let (greeting, question, accept, cancel) = match com.param(0) {
            0 => (
                format!("{} {} {}{}", terms.inn_a_greeting_1, price, terms.gold, terms.inn_a_greeting_2),
                &terms.inn_a_greeting_3,
                &terms.inn_a_accept,
                &terms.inn_a_cancel,
            ),
            1 => (
                format!("{} {} {}{}", terms.inn_b_greeting_1, price, terms.gold, terms.inn_b_greeting_2),
                &terms.inn_b_greeting_3,
                &terms.inn_b_accept,
                &terms.inn_b_cancel,
            ),
            kind => {
                tracing::warn!(kind, "unknown inn type");
                return true;
            }
        };
        let gold = env.game.party.gold;
        let message = &mut env.game.message;
        message.clear();
        message.push_line(greeting);
        message.push_line(question.clone());
        message.set_choices(&[accept.clone(), cancel.clone()], 2);
        message.choice_disabled[0] = gold < price;
        message.choice_result = 4;
        message.waiting = true;
        message.visible = true;
        env.game.scene.inn_calling = true;
        self.continuation = Some(Continuation::ShowInnStart);
        false
    }

    /// Choice made. Staying pays, heals the party and fades out.
    pub(super) fn continue_inn_start(&mut self, env: &mut Env) -> bool {
        if env.game.message.visible {
            self.continuation = Some(Continuation::ShowInnStart);
            return false;
        }
        let price = self.list.get(self.pc).map_or(0, |c| c.param(1));
        let stay = env.game.message.choice_result == 0;
        env.game.scene.inn_calling = false;
        if !stay {
            self.skip_to_handler(MapOp::NoStay.into(), MapOp::EndInn.into());
            self.advance();
            return true;
        }
        env.game.party.gain_gold(-price);
        let members = env.game.party.members.clone();
        for id in members {
            if let Some(actor) = env.game.actors.get_mut(id) {
                actor.full_heal();
            }
        }
        env.host.effect(Effect::Transition { erase: true, kind: 0 });
        env.host.effect(Effect::FadeOutBgm { millis: 800 });
        self.continuation = Some(Continuation::ShowInnContinue);
        false
    }

    /// Screen is dark: play the inn tune.
    pub(super) fn continue_inn_continue(&mut self, env: &mut Env) -> bool {
        if env.host.transition_pending() {
            self.continuation = Some(Continuation::ShowInnContinue);
            return false;
        }
        let system = &mut env.game.system;
        system.before_battle_bgm = system.current_bgm.clone();
        let music = system.bgm(BGM_INN);
        system.current_bgm = music.clone();
        env.host.effect(Effect::PlayBgm(music));
        self.continuation = Some(Continuation::ShowInnFinish);
        false
    }

    /// Tune done: restore the music, fade back in, enter the stay section.
    pub(super) fn continue_inn_finish(&mut self, env: &mut Env) -> bool {
        if env.host.transition_pending() {
            self.continuation = Some(Continuation::ShowInnFinish);
            return false;
        }
        let system = &mut env.game.system;
        if !system.bgm(BGM_INN).is_silent() && !env.host.bgm_played_once() {
            self.continuation = Some(Continuation::ShowInnFinish);
            return false;
        }
        let music = system.before_battle_bgm.clone();
        system.current_bgm = music.clone();
        env.host.effect(Effect::Transition { erase: false, kind: 0 });
        env.host.effect(Effect::PlayBgm(music));
        self.skip_to_handler(MapOp::Stay.into(), MapOp::EndInn.into());
        self.advance();
        false
    }

    fn command_enemy_encounter(&mut self, env: &mut Env, com: &Command) -> bool {
        let troop_id = value_or_variable(env.game, com.param(0), com.param(1));
        let player = &env.game.map.player;
        let mut request = BattleRequest {
            troop_id,
            background_mode: com.param(2),
            terrain_id: env.data.map(env.game.map.id).map_or(0, |m| m.terrain_at(player.x, player.y)),
            escape_mode: com.param(3),
            defeat_mode: com.param(4),
            first_strike: com.flag(5),
            ..BattleRequest::default()
        };
        match com.param(2) {
            0 => {}
            1 => request.background = com.text.clone(),
            2 => request.terrain_id = com.param(8),
            mode => tracing::warn!(mode, "unknown battle background mode"),
        }
        let scene = &mut env.game.scene;
        scene.battle = request;
        scene.battle_result = BattleResult::Victory;
        scene.battle_calling = true;
        self.continuation = Some(Continuation::EnemyEncounter);
        false
    }

    /// Routes to the handler section for the battle's outcome.
    pub(super) fn continue_enemy_encounter(&mut self, env: &mut Env) -> bool {
        let request = env.game.scene.battle.clone();
        let target = match env.game.scene.battle_result {
            BattleResult::Victory => {
                if request.defeat_mode == 0 && request.escape_mode != 2 {
                    self.advance();
                    return false;
                }
                MapOp::VictoryHandler
            }
            BattleResult::Escape => match request.escape_mode {
                1 => {
                    self.pc = self.list.len();
                    return true;
                }
                2 => MapOp::EscapeHandler,
                _ => {
                    self.advance();
                    return true;
                }
            },
            BattleResult::Defeat => {
                if request.defeat_mode == 0 {
                    env.game.scene.game_over = true;
                    self.continuation = Some(Continuation::Default);
                    return false;
                }
                MapOp::DefeatHandler
            }
            BattleResult::Abort => MapOp::EndBattle,
        };
        let indent = self.list.get(self.pc).map_or(0, |c| c.indent);
        let found = flow::skip_to(
            self.list.as_slice(),
            self.pc + 1,
            target.into(),
            MapOp::EndBattle.into(),
            indent,
            indent,
        );
        match found {
            Some(index) => self.pc = index,
            None => tracing::debug!(pc = self.pc, "battle handler section not found"),
        }
        self.advance();
        true
    }

    fn command_enter_exit_vehicle(&mut self, env: &mut Env) -> bool {
        let map = &mut env.game.map;
        if let Some(kind) = map.vehicle_in_use() {
            let (x, y) = (map.player.x, map.player.y);
            if let Some(vehicle) = map.vehicle_mut(kind) {
                vehicle.in_use = false;
                vehicle.character.x = x;
                vehicle.character.y = y;
            }
            map.player.transparent = false;
            return true;
        }
        let (x, y) = (map.player.x, map.player.y);
        let mut ahead = map.player.clone();
        ahead.step(ahead.direction);
        let map_id = map.id;
        let found = map.vehicles.iter().position(|v| {
            v.map_id == map_id
                && ((v.character.x == x && v.character.y == y)
                    || (v.character.x == ahead.x && v.character.y == ahead.y))
        });
        if let Some(index) = found {
            let vehicle = &mut map.vehicles[index];
            vehicle.in_use = true;
            map.player.x = vehicle.character.x;
            map.player.y = vehicle.character.y;
            map.player.transparent = true;
        }
        true
    }

    fn command_trade_event_locations(&mut self, env: &mut Env, com: &Command) -> bool {
        let map = &mut env.game.map;
        let first = map.character(com.param(0), self.owner_id).map(|c| (c.x, c.y));
        let second = map.character(com.param(1), self.owner_id).map(|c| (c.x, c.y));
        if let (Some((x1, y1)), Some((x2, y2))) = (first, second) {
            if let Some(c) = map.character_mut(com.param(0), self.owner_id) {
                c.x = x2;
                c.y = y2;
            }
            if let Some(c) = map.character_mut(com.param(1), self.owner_id) {
                c.x = x1;
                c.y = y1;
            }
        }
        true
    }

    fn command_pan_screen(&mut self, env: &mut Env, com: &Command) -> bool {
        let pan = &mut env.game.map.pan;
        let speed = com.param(3).max(1).min(6);
        let distance = match com.param(0) {
            0 => {
                pan.locked = true;
                return true;
            }
            1 => {
                pan.locked = false;
                return true;
            }
            2 => {
                let distance = com.param(2).max(0);
                match com.param(1) {
                    UP => pan.y -= distance,
                    RIGHT => pan.x += distance,
                    DOWN => pan.y += distance,
                    LEFT => pan.x -= distance,
                    direction => tracing::warn!(direction, "unknown pan direction"),
                }
                distance
            }
            3 => {
                let distance = pan.x.abs().max(pan.y.abs());
                pan.x = 0;
                pan.y = 0;
                distance
            }
            mode => {
                tracing::warn!(mode, "unknown pan mode");
                return true;
            }
        };
        pan.speed = speed;
        let (x, y) = (pan.x, pan.y);
        env.host.effect(Effect::PanScreen { x, y, speed });
        if com.flag(4) {
            // 16 pixels a tile, 2^speed / 2 pixels a tick
            let step = (1u32 << speed) / 2;
            self.wait_ticks = (distance as u32 * 16 + step - 1) / step;
        }
        true
    }

    /// Waiting animations re-enter this command until the host is done.
    fn command_show_battle_animation(&mut self, env: &mut Env, com: &Command) -> bool {
        if self.animation_waiting {
            if env.host.animation_pending() {
                return false;
            }
            self.animation_waiting = false;
            return true;
        }
        let target = match com.param(1) {
            THIS_EVENT => self.owner_id,
            id => id,
        };
        env.host.effect(Effect::BattleAnimation {
            id: com.param(0),
            target,
            global: com.flag(3),
        });
        if com.flag(2) {
            self.animation_waiting = true;
            return false;
        }
        true
    }

    fn command_flash_sprite(&mut self, env: &mut Env, com: &Command) -> bool {
        let ticks = env.data.config.tenths_to_ticks(com.param(5));
        let id = com.param(0);
        match env.game.map.character_mut(id, self.owner_id) {
            Some(character) => {
                character.flash = Some(Flash {
                    red: com.param(1),
                    green: com.param(2),
                    blue: com.param(3),
                    strength: com.param(4),
                    ticks,
                });
            }
            None => {
                tracing::warn!(id, "character not on this map");
                return true;
            }
        }
        env.host.effect(Effect::FlashCharacter { id, ticks });
        if com.flag(6) {
            self.wait_ticks = ticks;
        }
        true
    }

    /// Routes for a vehicle the player rides go to the player.
    fn command_move_event(&mut self, env: &mut Env, com: &Command) -> bool {
        let mut id = com.param(0);
        if (BOAT..THIS_EVENT).contains(&id) && env.game.map.vehicle_in_use() == Some(id - BOAT) {
            id = PLAYER;
        }
        let route = MoveRoute::decode(
            com.parameters.get(4..).unwrap_or(&[]),
            com.flag(2),
            com.flag(3),
        );
        match env.game.map.character_mut(id, self.owner_id) {
            Some(character) => character.force_move_route(route, com.param(1)),
            None => tracing::warn!(id, "character not on this map"),
        }
        true
    }

    /// Parameter layout depends on which editor saved the command.
    fn command_key_input(&mut self, env: &mut Env, com: &Command) -> bool {
        let variable = com.param(0);
        let wait = com.flag(1);
        let size = com.len();
        let mut directions = [false; 4];
        let (mut shift, mut numbers, mut arithmetic) = (false, false, false);
        let mut time_variable = None;
        if size < 6 {
            directions = [com.flag(2); 4];
        } else if size < 11 {
            shift = com.flag(5);
            for (i, d) in directions.iter_mut().enumerate() {
                *d = com.flag(6 + i);
            }
        } else {
            numbers = com.flag(5);
            arithmetic = com.flag(6);
            if com.flag(8) {
                time_variable = Some(com.param(7));
            }
            shift = com.flag(9);
            for (i, d) in directions.iter_mut().enumerate() {
                *d = com.flag(10 + i);
            }
        }

        // Highest result wins when several keys are down.
        let mut keys = vec![];
        if arithmetic {
            keys.extend_from_slice(&[Key::Period, Key::Divide, Key::Multiply, Key::Minus, Key::Plus]);
        }
        if numbers {
            keys.extend((0..10).rev().map(Key::Number));
        }
        if shift {
            keys.push(Key::Shift);
        }
        if com.flag(4) {
            keys.push(Key::Cancel);
        }
        if com.flag(3) {
            keys.push(Key::Decision);
        }
        let arrows = [Key::Up, Key::Right, Key::Left, Key::Down];
        for (i, key) in arrows.iter().enumerate() {
            if directions[3 - i] {
                keys.push(*key);
            }
        }

        if !wait {
            let host = &*env.host;
            let result = keys.iter().find(|&&k| host.is_pressed(k)).map_or(0, |k| k.code());
            env.game.variables.set(variable, result);
            env.game.map.need_refresh = true;
            return true;
        }
        env.game.variables.set(variable, 0);
        self.key_input = Some(KeyInput {
            variable,
            time_variable,
            keys,
            ticks: 0,
        });
        true
    }

    fn command_call_event(&mut self, env: &mut Env, com: &Command) -> bool {
        if self.child.is_some() {
            return false;
        }
        let map_id = env.game.map.id;
        let (list, owner) = match com.param(0) {
            0 => match env.data.common_event(com.param(1)) {
                Some(event) => (event.commands.clone(), 0),
                None => {
                    tracing::warn!(id = com.param(1), "common event not found");
                    return true;
                }
            },
            mode @ 1 | mode @ 2 => {
                let (mut id, page) = if mode == 1 {
                    (com.param(1), com.param(2))
                } else {
                    let variables = &env.game.variables;
                    (variables.get(com.param(1)), variables.get(com.param(2)))
                };
                if id == THIS_EVENT {
                    id = self.owner_id;
                }
                match env.data.event_page(map_id, id, page) {
                    Some(list) => (list.clone(), id),
                    None => {
                        tracing::warn!(id, page, "event page not found");
                        return true;
                    }
                }
            }
            mode => {
                tracing::warn!(mode, "unknown call mode");
                return true;
            }
        };
        self.spawn_child(env, list, owner);
        true
    }

    fn command_simulated_attack(&mut self, env: &mut Env, com: &Command) -> bool {
        let (attack, defense, spirit, variance) = (com.param(2), com.param(3), com.param(4), com.param(5));
        for id in actor_ids(env.game, com.param(0), com.param(1)) {
            let (def, spi) = match env.game.actors.get(id) {
                Some(actor) => (actor.defense, actor.spirit),
                None => continue,
            };
            let mut damage = attack - def * defense / 400 - spi * spirit / 800;
            if variance != 0 {
                let percent = variance * 5;
                let roll = env.game.random_range(-percent, percent - 1);
                damage += damage * roll / 100;
            }
            let damage = damage.max(0);
            if let Some(actor) = env.game.actors.get_mut(id) {
                actor.change_hp(-damage, true);
            }
            env.host.effect(Effect::SimulatedAttack { actor_id: id, damage });
            self.check_game_over(env);
            if com.flag(6) {
                env.game.variables.set(com.param(7), damage);
                env.game.map.need_refresh = true;
            }
        }
        true
    }
}

/// Variable comparison: equal, at least, at most, greater, less, differs.
pub(super) fn compare(left: i32, right: i32, op: i32) -> bool {
    match op {
        0 => left == right,
        1 => left >= right,
        2 => left <= right,
        3 => left > right,
        4 => left < right,
        5 => left != right,
        _ => false,
    }
}
