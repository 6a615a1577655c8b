use super::{troop_page_ready, Context, Env, Interpreter};
use crate::data::{Database, Trigger};
use crate::game::{BattleResult, Game, Troop};
use crate::host::{Host, Recorder};
use std::collections::BTreeMap;

/// What the runtime needs from its owner before it can go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The tick budget ran out with work still in progress.
    Running,
    /// Nothing is running and nothing is about to start.
    Idle,
    /// The message window waits to be read, answered or given a number.
    Message,
    Shop,
    /// A battle was requested and has not begun.
    Battle,
    /// Every troop page due this turn has run.
    BattleTurn,
    EnterName,
    Menu,
    Save,
    Title,
    GameOver,
}

/// ## Event runtime
///
/// Owns the database, the game state, the host and every interpreter
/// that runs against them. Each tick updates the root map interpreter,
/// then parallel common events in id order, then parallel map events
/// in id order, then advances the world by one tick.
///
/// During a battle only the troop interpreter runs. Scene requests and
/// the message window are reported as an `Event`; the owner completes
/// them through the matching method and calls `execute` again.

pub struct Runtime<H: Host = Recorder> {
    data: Database,
    game: Game,
    host: H,
    root: Interpreter,
    common: BTreeMap<i32, Interpreter>,
    parallel: BTreeMap<i32, (i32, Interpreter)>,
    battle: Interpreter,
    pages_run: Vec<bool>,
}

impl Runtime<Recorder> {
    pub fn new(data: Database) -> Runtime<Recorder> {
        let game = Game::new(&data);
        Runtime::with_game(data, game, Recorder::new())
    }
}

impl<H: Host> Runtime<H> {
    pub fn with_game(data: Database, game: Game, host: H) -> Runtime<H> {
        Runtime {
            data,
            game,
            host,
            root: Interpreter::new(Context::Map, 0, true),
            common: BTreeMap::new(),
            parallel: BTreeMap::new(),
            battle: Interpreter::new(Context::Battle, 0, false),
            pages_run: vec![],
        }
    }

    pub fn data(&self) -> &Database {
        &self.data
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn root(&self) -> &Interpreter {
        &self.root
    }

    pub fn battle(&self) -> &Interpreter {
        &self.battle
    }

    /// Runs up to `ticks` ticks and reports why it stopped.
    pub fn execute(&mut self, ticks: usize) -> Event {
        for _ in 0..ticks {
            if self.game.message.waiting {
                return Event::Message;
            }
            if self.game.troop.is_some() {
                if !self.tick_battle() {
                    return Event::BattleTurn;
                }
                continue;
            }
            if let Some(event) = self.scene_event() {
                return event;
            }
            self.tick();
            if self.is_idle() {
                return Event::Idle;
            }
        }
        if self.game.message.waiting {
            return Event::Message;
        }
        Event::Running
    }

    /// One tick of the field map.
    pub fn tick(&mut self) {
        let mut env = Env::new(&self.data, &mut self.game, &mut self.host);
        self.root.update(&mut env);

        let switches = &env.game.switches;
        let mut enabled: Vec<_> = env
            .data
            .common_events
            .iter()
            .filter(|c| c.trigger == Trigger::Parallel && c.is_enabled(switches))
            .map(|c| c.id)
            .collect();
        enabled.sort_unstable();
        self.common.retain(|id, _| enabled.contains(id));
        for id in enabled {
            let interpreter = self
                .common
                .entry(id)
                .or_insert_with(|| Interpreter::new(Context::Map, 0, false));
            if !interpreter.is_running() {
                if let Some(event) = env.data.common_event(id) {
                    interpreter.bind(event.commands.clone(), 0, env.game.map.id);
                }
            }
            interpreter.update(&mut env);
        }

        let map_id = env.game.map.id;
        let running = env.game.map.parallel_events();
        self.parallel.retain(|id, _| running.contains(id));
        for id in running {
            let page = env.game.map.events.get(&id).map_or(0, |e| e.page);
            let (bound_page, interpreter) = self
                .parallel
                .entry(id)
                .or_insert_with(|| (0, Interpreter::new(Context::Map, 0, false)));
            if *bound_page != page || !interpreter.is_running() {
                match env.data.event_page(map_id, id, page) {
                    Some(commands) => interpreter.bind(commands.clone(), id, map_id),
                    None => continue,
                }
                *bound_page = page;
            }
            interpreter.update(&mut env);
        }

        self.game.tick(&self.data, &mut self.host);
        self.perform_teleport();
    }

    fn perform_teleport(&mut self) {
        let teleport = match self.game.map.teleport.take() {
            Some(teleport) => teleport,
            None => return,
        };
        tracing::debug!(?teleport, "teleport");
        if teleport.map_id != self.game.map.id {
            self.game.setup_map(&self.data, teleport.map_id);
            self.parallel.clear();
        }
        let player = &mut self.game.map.player;
        player.x = teleport.x;
        player.y = teleport.y;
        if teleport.direction >= 0 {
            player.set_direction(teleport.direction);
        }
    }

    fn is_idle(&self) -> bool {
        !self.root.is_running()
            && !self.game.message.waiting
            && !self.game.scene.is_pending()
            && self.game.scene.common_event_id.is_none()
            && self.game.map.starting_event().is_none()
            && !self.game.map.any_move_pending()
    }

    fn scene_event(&self) -> Option<Event> {
        let scene = &self.game.scene;
        if scene.game_over {
            Some(Event::GameOver)
        } else if scene.to_title {
            Some(Event::Title)
        } else if scene.battle_calling {
            Some(Event::Battle)
        } else if scene.shop_calling {
            Some(Event::Shop)
        } else if scene.name_calling {
            Some(Event::EnterName)
        } else if scene.menu_calling {
            Some(Event::Menu)
        } else if scene.save_calling {
            Some(Event::Save)
        } else {
            None
        }
    }

    /// The player checks the event on a tile, or the one with `id`.
    pub fn interact(&mut self, id: i32) -> bool {
        self.game.map.start_event(id)
    }

    /// Drops whatever the root interpreter was running.
    pub fn interrupt(&mut self) {
        tracing::warn!(owner = self.root.owner_id(), "event interrupted");
        let owner = self.root.owner_id();
        self.root = Interpreter::new(Context::Map, 0, true);
        self.game.message.close();
        if owner > 0 {
            self.game.map.unlock(owner);
        }
    }

    /// Closes the message window. `choice` answers its choices, if any.
    pub fn close_message(&mut self, choice: Option<i32>) {
        if let Some(choice) = choice {
            self.game.message.choice_result = choice;
        }
        self.game.message.close();
    }

    /// Answers a number input and closes the window.
    pub fn submit_number(&mut self, value: i32) {
        let variable = self.game.message.num_input_variable;
        self.game.variables.set(variable, value);
        self.game.map.need_refresh = true;
        self.game.message.close();
    }

    /// Buys `(item, count)` pairs at database prices. Purchases the
    /// party cannot afford are skipped.
    pub fn finish_shop(&mut self, purchases: &[(i32, i32)]) {
        let mut bought = false;
        for &(item_id, count) in purchases {
            let price = match self.data.item(item_id) {
                Some(item) => item.price * count,
                None => {
                    tracing::warn!(item_id, "shop item not found");
                    continue;
                }
            };
            if count <= 0 || price > self.game.party.gold {
                continue;
            }
            self.game.party.gain_gold(-price);
            self.game.party.add_item(item_id, count);
            bought = true;
        }
        let scene = &mut self.game.scene;
        scene.shop_transaction = bought;
        scene.shop_calling = false;
    }

    pub fn finish_name(&mut self, name: &str) {
        let actor_id = self.game.scene.name.actor_id;
        match self.game.actors.get_mut(actor_id) {
            Some(actor) => actor.name = name.to_string(),
            None => tracing::warn!(actor_id, "name entry for unknown actor"),
        }
        self.game.scene.name_calling = false;
    }

    /// Menu and save scenes return to the map. A save bumps the counter.
    pub fn close_scene(&mut self) {
        let scene = &mut self.game.scene;
        if scene.save_calling {
            self.game.party.save_count += 1;
        }
        scene.menu_calling = false;
        scene.save_calling = false;
    }

    /// Builds the requested troop and takes the battle scene over from
    /// `battle_calling`. The next `execute` runs its turn 0 pages.
    pub fn begin_battle(&mut self) {
        let troop_id = self.game.scene.battle.troop_id;
        let troop = match self.data.troop(troop_id) {
            Some(data) => {
                self.pages_run = vec![false; data.pages.len()];
                Troop::new(data)
            }
            None => {
                tracing::warn!(troop_id, "troop not found");
                self.pages_run = vec![];
                Troop::default()
            }
        };
        self.game.party.battle_count += 1;
        self.game.scene.battle_calling = false;
        self.game.troop = Some(troop);
        self.battle = Interpreter::new(Context::Battle, 0, false);
    }

    /// Starts the next turn. Pages run again once per turn.
    pub fn next_turn(&mut self) {
        if let Some(troop) = self.game.troop.as_mut() {
            troop.turn += 1;
            tracing::debug!(turn = troop.turn, "battle turn");
        }
        for run in self.pages_run.iter_mut() {
            *run = false;
        }
    }

    /// Leaves the battle and hands `result` to `EnemyEncounter`.
    pub fn end_battle(&mut self, result: BattleResult) {
        let party = &mut self.game.party;
        match result {
            BattleResult::Victory => party.victory_count += 1,
            BattleResult::Defeat => party.defeat_count += 1,
            BattleResult::Escape => party.escape_count += 1,
            BattleResult::Abort => {}
        }
        tracing::debug!(?result, "battle over");
        self.game.troop = None;
        self.game.scene.battle_result = result;
        self.game.scene.battle_calling = false;
        self.battle = Interpreter::new(Context::Battle, 0, false);
        self.pages_run.clear();
    }

    /// `false` when the turn's pages are done and the owner must act.
    fn tick_battle(&mut self) -> bool {
        if !self.battle.is_running() && !self.schedule_troop_page() {
            if let Some(result) = self.battle_outcome() {
                self.end_battle(result);
                return true;
            }
            return false;
        }
        let mut env = Env::new(&self.data, &mut self.game, &mut self.host);
        self.battle.update(&mut env);
        self.game.tick(&self.data, &mut self.host);
        true
    }

    fn schedule_troop_page(&mut self) -> bool {
        let troop_id = match self.game.troop.as_ref() {
            Some(troop) => troop.id,
            None => return false,
        };
        let pages = match self.data.troop(troop_id) {
            Some(data) => &data.pages,
            None => return false,
        };
        for (index, page) in pages.iter().enumerate() {
            if self.pages_run.get(index).copied().unwrap_or(true) {
                continue;
            }
            if !troop_page_ready(&self.game, &page.condition) {
                continue;
            }
            self.pages_run[index] = true;
            if page.commands.is_empty() {
                continue;
            }
            tracing::debug!(troop_id, page = index, "troop page");
            self.battle.bind(page.commands.clone(), 0, self.game.map.id);
            return true;
        }
        false
    }

    fn battle_outcome(&self) -> Option<BattleResult> {
        let troop = self.game.troop.as_ref()?;
        if troop.terminated {
            Some(BattleResult::Abort)
        } else if troop.party_fled {
            Some(BattleResult::Escape)
        } else if self.game.party_defeated() {
            Some(BattleResult::Defeat)
        } else if !troop.enemies.is_empty() && troop.all_defeated() {
            Some(BattleResult::Victory)
        } else {
            None
        }
    }
}
