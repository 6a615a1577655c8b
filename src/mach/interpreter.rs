use super::{Continuation, JumpTable};
use crate::data::{Database, Trigger};
use crate::game::Game;
use crate::host::{Host, Key};
use crate::lang::{Command, CommandList, Opcode};

/// Which opcode set an interpreter understands besides the shared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Map,
    Battle,
}

/// Everything a command may touch, borrowed for one `update`.
pub struct Env<'a> {
    pub data: &'a Database,
    pub game: &'a mut Game,
    pub host: &'a mut dyn Host,
}

impl<'a> Env<'a> {
    pub fn new(data: &'a Database, game: &'a mut Game, host: &'a mut dyn Host) -> Env<'a> {
        Env { data, game, host }
    }
}

/// A `KeyInputProc` waiting for a key.
#[derive(Debug, Clone)]
pub(super) struct KeyInput {
    pub variable: i32,
    pub time_variable: Option<i32>,
    pub keys: Vec<Key>,
    pub ticks: u32,
}

/// ## Event interpreter
///
/// Runs one command list against the game state, a few commands per
/// tick. Anything that has to wait (a message, a scene, a wait command,
/// a called event) suspends the interpreter without losing its place.
///
/// An interpreter owns at most one child. While the child runs, the
/// parent is parked on the calling command. The root interpreter of the
/// map also picks the next event to start whenever it runs dry.

pub struct Interpreter {
    pub(super) context: Context,
    pub(super) depth: u32,
    pub(super) is_root: bool,
    pub(super) list: CommandList,
    pub(super) jumps: JumpTable,
    pub(super) pc: usize,
    pub(super) owner_id: i32,
    pub(super) map_id: i32,
    pub(super) child: Option<Box<Interpreter>>,
    pub(super) continuation: Option<Continuation>,
    pub(super) wait_ticks: u32,
    pub(super) key_input: Option<KeyInput>,
    pub(super) move_route_waiting: bool,
    pub(super) animation_waiting: bool,
    pub(super) started_by_decision: bool,
}

impl Interpreter {
    pub fn new(context: Context, depth: u32, is_root: bool) -> Interpreter {
        Interpreter {
            context,
            depth,
            is_root,
            list: CommandList::default(),
            jumps: JumpTable::default(),
            pc: 0,
            owner_id: 0,
            map_id: 0,
            child: None,
            continuation: None,
            wait_ticks: 0,
            key_input: None,
            move_route_waiting: false,
            animation_waiting: false,
            started_by_decision: false,
        }
    }

    /// Starts over on a new list. Any child and pending work is dropped.
    pub fn bind(&mut self, list: CommandList, owner_id: i32, map_id: i32) {
        self.jumps = JumpTable::build(list.as_slice());
        self.list = list;
        self.pc = 0;
        self.owner_id = owner_id;
        self.map_id = map_id;
        self.child = None;
        self.continuation = None;
        self.wait_ticks = 0;
        self.key_input = None;
        self.move_route_waiting = false;
        self.animation_waiting = false;
        self.started_by_decision = false;
    }

    pub fn is_running(&self) -> bool {
        !self.list.is_empty()
    }

    pub fn program_counter(&self) -> usize {
        self.pc
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn owner_id(&self) -> i32 {
        self.owner_id
    }

    pub fn context(&self) -> Context {
        self.context
    }

    pub fn child(&self) -> Option<&Interpreter> {
        self.child.as_deref()
    }

    pub fn continuation(&self) -> Option<Continuation> {
        self.continuation
    }

    pub fn wait_ticks(&self) -> u32 {
        self.wait_ticks
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.key_input.is_some()
    }

    /// Runs commands until something suspends or the iteration budget
    /// for this tick is spent.
    pub fn update(&mut self, env: &mut Env) {
        for _ in 0..env.data.config.max_iterations {
            if self.map_id != env.game.map.id {
                self.owner_id = 0;
            }

            if let Some(child) = self.child.as_mut() {
                child.update(env);
                if child.is_running() {
                    return;
                }
                self.child = None;
            }

            if env.game.message.waiting {
                tracing::trace!(owner = self.owner_id, "suspended on message");
                return;
            }

            if self.move_route_waiting {
                if env.game.map.any_move_pending() {
                    return;
                }
                self.move_route_waiting = false;
            }

            if let Some(mut input) = self.key_input.take() {
                if !self.poll_key_input(env, &mut input) {
                    self.key_input = Some(input);
                    return;
                }
            }

            if self.wait_ticks > 0 {
                self.wait_ticks -= 1;
                return;
            }

            let in_battle = self.context == Context::Map && env.game.troop.is_some();
            if env.game.scene.is_pending() || in_battle {
                tracing::trace!(owner = self.owner_id, "suspended on scene");
                return;
            }

            if let Some(continuation) = self.continuation.take() {
                if !self.resume(env, continuation) {
                    return;
                }
                continue;
            }

            if self.list.is_empty() {
                if !self.is_root || !self.setup_starting_event(env) {
                    return;
                }
                continue;
            }

            if self.pc >= self.list.len() {
                self.command_end(env);
                continue;
            }

            let list = self.list.clone();
            let com = &list[self.pc];
            tracing::debug!(depth = self.depth, pc = self.pc, "{}", com);
            if !self.execute_command(env, com) {
                return;
            }
            self.advance();
        }
        tracing::trace!(owner = self.owner_id, pc = self.pc, "iteration budget spent");
    }

    pub(super) fn advance(&mut self) {
        self.pc = (self.pc + 1).min(self.list.len());
    }

    fn execute_command(&mut self, env: &mut Env, com: &Command) -> bool {
        match (self.context, com.opcode()) {
            (_, Opcode::Shared(op)) => self.execute_shared(env, com, op),
            (Context::Map, Opcode::Map(op)) => self.execute_map(env, com, op),
            (Context::Battle, Opcode::Battle(op)) => self.execute_battle(env, com, op),
            (context, Opcode::Map(_)) | (context, Opcode::Battle(_)) => {
                tracing::warn!(?context, "{} skipped outside its context", com.opcode());
                true
            }
            (_, Opcode::Unknown(code)) => {
                tracing::debug!(code, "unknown command skipped");
                true
            }
        }
    }

    /// Leaves the list. The root interpreter also closes the message
    /// window and releases the event it ran for.
    pub(super) fn command_end(&mut self, env: &mut Env) {
        if self.is_root && self.depth == 0 {
            env.game.message.close();
            if self.owner_id > 0 {
                env.game.map.unlock(self.owner_id);
            }
        }
        self.list = CommandList::default();
        self.jumps = JumpTable::default();
        self.pc = 0;
    }

    /// Picks the next thing the root interpreter should run: a queued
    /// common event, a map event flagged as starting, or an auto-start
    /// common event whose switch is on.
    fn setup_starting_event(&mut self, env: &mut Env) -> bool {
        if env.game.map.need_refresh {
            env.game.refresh_map(env.data);
        }
        let map_id = env.game.map.id;

        if let Some(id) = env.game.scene.common_event_id.take() {
            match env.data.common_event(id) {
                Some(event) => {
                    self.bind(event.commands.clone(), 0, map_id);
                    return true;
                }
                None => tracing::warn!(id, "queued common event not found"),
            }
        }

        if let Some(id) = env.game.map.starting_event() {
            if let Some(event) = env.game.map.events.get_mut(&id) {
                event.starting = false;
                let by_decision = event.trigger == Trigger::Action;
                if let Some(commands) = env.data.event_page(map_id, id, event.page) {
                    if !commands.is_empty() {
                        event.locked = true;
                        self.bind(commands.clone(), id, map_id);
                        self.started_by_decision = by_decision;
                        return true;
                    }
                }
            }
        }

        let switches = &env.game.switches;
        let auto = env
            .data
            .common_events
            .iter()
            .find(|c| c.trigger == Trigger::AutoStart && c.is_enabled(switches) && !c.commands.is_empty());
        if let Some(event) = auto {
            self.bind(event.commands.clone(), 0, map_id);
            return true;
        }
        false
    }

    /// Starts `list` in a new child one level deeper. Depth is only
    /// reported once, at the level that crosses the ceiling.
    pub(super) fn spawn_child(&mut self, env: &Env, list: CommandList, owner_id: i32) {
        let depth = self.depth + 1;
        if depth == env.data.config.depth_warning + 1 {
            tracing::warn!(
                depth,
                ceiling = env.data.config.depth_warning,
                "event call depth exceeds ceiling"
            );
        }
        let mut child = Interpreter::new(self.context, depth, false);
        child.bind(list, owner_id, env.game.map.id);
        self.child = Some(Box::new(child));
    }

    /// One poll of a waiting `KeyInputProc`. The tick the command ran on
    /// never counts as a press.
    fn poll_key_input(&mut self, env: &mut Env, input: &mut KeyInput) -> bool {
        if env.game.message.waiting {
            return false;
        }
        input.ticks += 1;
        if input.ticks == 1 {
            return false;
        }
        let host = &*env.host;
        let key = match input.keys.iter().find(|&&k| host.is_triggered(k)) {
            Some(key) => *key,
            None => return false,
        };
        env.game.variables.set(input.variable, key.code());
        if let Some(time_variable) = input.time_variable {
            let fps = env.data.config.fps.max(1);
            let tenths = (input.ticks - 1) * 10 / fps;
            env.game.variables.set(time_variable, tenths as i32);
        }
        env.game.map.need_refresh = true;
        true
    }
}
