/*!
## Game state

The mutable world every interpreter reads and writes: switches,
variables, the party and its actors, the current map and its
characters, the message window, scene requests, system settings, the
screen and, during a battle, the enemy troop.

One `Game` is shared by all interpreters of a runtime. It is handed
to them by `&mut` for the length of one `update` call.

*/

mod battle;
mod map;
mod message;
mod party;
mod scene;
mod system;
mod variables;

pub use battle::{Enemy, Troop};
pub use map::{
    Character, Flash, Map, MoveCommand, MoveRoute, Pan, Panorama, Teleport, Vehicle, AIRSHIP,
    BOAT, DOWN, LEFT, PLAYER, RIGHT, SHIP, THIS_EVENT, UP,
};
pub use message::{Face, Message, MessageOptions, MAX_LINES};
pub use party::{Actor, Actors, Party, Timer, DEATH_STATE};
pub use scene::{BattleRequest, BattleResult, NameRequest, Scene, ShopRequest};
pub use system::{
    Picture, Screen, Shake, System, SystemGraphic, Target, Targets, Tone, BGM_BATTLE,
    BGM_GAME_OVER, BGM_INN, BGM_VICTORY,
};
pub use variables::{Switches, VarOp, Variables};

use crate::data::{Database, PageCondition, Sound};
use crate::host::{Effect, Host};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct Game {
    pub switches: Switches,
    pub variables: Variables,
    pub party: Party,
    pub actors: Actors,
    pub map: Map,
    pub message: Message,
    pub scene: Scene,
    pub system: System,
    pub screen: Screen,
    pub targets: Targets,
    pub troop: Option<Troop>,
    /// Ticks since the game started.
    pub frames: u64,
    rng: StdRng,
}

impl Game {
    pub fn new(data: &Database) -> Game {
        Game::with_rng(data, StdRng::from_entropy())
    }

    pub fn with_seed(data: &Database, seed: u64) -> Game {
        Game::with_rng(data, StdRng::seed_from_u64(seed))
    }

    fn with_rng(data: &Database, rng: StdRng) -> Game {
        let config = &data.config;
        let mut game = Game {
            switches: Switches::new(),
            variables: Variables::new(config.variable_min, config.variable_max),
            party: Party::new(config.gold_max, config.item_max, config.party_max),
            actors: Actors::new(&data.actors),
            map: Map::default(),
            message: Message::default(),
            scene: Scene::default(),
            system: System::default(),
            screen: Screen::default(),
            targets: Targets::default(),
            troop: None,
            frames: 0,
            rng,
        };
        for (slot, music) in data.system.bgm.iter().enumerate() {
            game.system.system_bgm.insert(slot as i32, music.clone());
        }
        for (slot, sound) in data.system.se.iter().enumerate() {
            game.system.system_se.insert(slot as i32, sound.clone());
        }
        for id in &data.start.party {
            game.party.add_actor(*id);
        }
        game.party.gain_gold(data.start.gold);
        game.map.player = Character::new(PLAYER, data.start.x, data.start.y);
        game.setup_map(data, data.start.map_id);
        game
    }

    /// Loads map events. An unknown map leaves an empty map with that id.
    pub fn setup_map(&mut self, data: &Database, map_id: i32) {
        match data.map(map_id) {
            Some(map) => self.map.setup(map),
            None => {
                tracing::warn!(map_id, "map not in database");
                self.map = Map {
                    player: self.map.player.clone(),
                    vehicles: self.map.vehicles.clone(),
                    ..Map::default()
                };
                self.map.id = map_id;
            }
        }
        self.refresh_map(data);
    }

    /// Inclusive on both ends, bounds in either order.
    pub fn random_range(&mut self, a: i32, b: i32) -> i32 {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.rng.gen_range(low..=high)
    }

    /// Re-evaluates which page each map event shows.
    pub fn refresh_map(&mut self, data: &Database) {
        self.map.need_refresh = false;
        let map_data = match data.map(self.map.id) {
            Some(map) => map,
            None => return,
        };
        for event_data in &map_data.events {
            let page = event_data
                .pages
                .iter()
                .rposition(|p| self.page_condition_met(&p.condition))
                .map(|i| i as i32 + 1)
                .unwrap_or(0);
            let event = match self.map.events.get_mut(&event_data.id) {
                Some(event) => event,
                None => continue,
            };
            if event.page == page {
                continue;
            }
            event.page = page;
            event.starting = false;
            let page_data = if page > 0 {
                event_data.pages.get(page as usize - 1)
            } else {
                None
            };
            match page_data {
                Some(p) => {
                    event.trigger = p.trigger;
                    event.sprite = p.sprite.clone();
                    event.set_direction(p.direction);
                }
                None => event.trigger = Default::default(),
            }
            tracing::debug!(event = event_data.id, page, "event page changed");
        }
    }

    fn page_condition_met(&self, condition: &PageCondition) -> bool {
        if let Some(id) = condition.switch_a {
            if !self.switches.get(id) {
                return false;
            }
        }
        if let Some(id) = condition.switch_b {
            if !self.switches.get(id) {
                return false;
            }
        }
        if let Some((id, min)) = condition.variable {
            if self.variables.get(id) < min {
                return false;
            }
        }
        true
    }

    /// Advances everything that moves on its own by one tick.
    pub fn tick(&mut self, data: &Database, host: &mut dyn Host) {
        self.frames += 1;
        self.step_routes(host);
        self.party.tick_timers();
        self.screen.tick();
        if self.map.need_refresh {
            self.refresh_map(data);
        }
        self.map.mark_auto_start();
    }

    fn step_routes(&mut self, host: &mut dyn Host) {
        let mut ids = vec![PLAYER, BOAT, SHIP, AIRSHIP];
        ids.extend(self.map.events.keys().copied());
        for id in ids {
            let player = (self.map.player.x, self.map.player.y);
            let random = self.rng.gen_range(0..4);
            let cmd = match self.map.character_mut(id, 0).and_then(|c| c.next_move()) {
                Some(cmd) => cmd,
                None => continue,
            };
            match cmd.code {
                32 | 33 => {
                    self.switches.set(cmd.a, cmd.code == 32);
                    self.map.need_refresh = true;
                }
                35 => host.effect(Effect::PlaySe(Sound {
                    name: cmd.text.clone(),
                    volume: cmd.a,
                    tempo: cmd.b,
                    balance: cmd.c,
                })),
                _ => {
                    if let Some(c) = self.map.character_mut(id, 0) {
                        c.apply_move(&cmd, player, random);
                    }
                }
            }
        }
    }

    pub fn party_actors(&self) -> impl Iterator<Item = &Actor> {
        let actors = &self.actors;
        self.party.members.iter().filter_map(move |id| actors.get(*id))
    }

    /// True when the party is non-empty and nobody in it stands.
    pub fn party_defeated(&self) -> bool {
        !self.party.members.is_empty() && self.party_actors().all(|a| a.is_dead())
    }

    /// Actor attribute readable by `ControlVars`.
    pub fn actor_attribute(&self, actor_id: i32, attribute: i32) -> i32 {
        let actor = match self.actors.get(actor_id) {
            Some(actor) => actor,
            None => {
                tracing::warn!(actor_id, "bad actor id");
                return 0;
            }
        };
        match attribute {
            0 => actor.level,
            1 => actor.exp,
            2 => actor.hp,
            3 => actor.sp,
            4 => actor.max_hp,
            5 => actor.max_sp,
            6 => actor.attack,
            7 => actor.defense,
            8 => actor.spirit,
            9 => actor.agility,
            10..=14 => actor.equipment[(attribute - 10) as usize],
            _ => {
                tracing::warn!(attribute, "unknown actor attribute");
                0
            }
        }
    }

    /// Character attribute readable by `ControlVars`. Orientation uses
    /// keypad numbering: 8 up, 6 right, 2 down, 4 left.
    pub fn character_attribute(&self, id: i32, this_event: i32, attribute: i32) -> i32 {
        let c = match self.map.character(id, this_event) {
            Some(c) => c,
            None => {
                tracing::warn!(id, "bad character id");
                return 0;
            }
        };
        match attribute {
            0 => match id {
                PLAYER => self.map.id,
                BOAT..=AIRSHIP => self.map.vehicles[(id - BOAT) as usize].map_id,
                _ => 0,
            },
            1 => c.x,
            2 => c.y,
            3 => match c.direction {
                UP => 8,
                RIGHT => 6,
                DOWN => 2,
                _ => 4,
            },
            4 => c.x * 16 + 8,
            5 => c.y * 16 + 16,
            _ => {
                tracing::warn!(attribute, "unknown character attribute");
                0
            }
        }
    }

    /// Party and system counters readable by `ControlVars`.
    pub fn other_value(&self, fps: u32, which: i32) -> i32 {
        match which {
            0 => self.party.gold,
            1 => self.party.timer(0).seconds(fps),
            2 => self.party.members.len() as i32,
            3 => self.party.save_count,
            4 => self.party.battle_count,
            5 => self.party.victory_count,
            6 => self.party.defeat_count,
            7 => self.party.escape_count,
            8 => 0,
            9 => self.party.timer(1).seconds(fps),
            _ => {
                tracing::warn!(which, "unknown counter");
                0
            }
        }
    }

    pub fn equipped_count(&self, item_id: i32) -> i32 {
        self.party_actors().map(|a| a.equipped_count(item_id)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::from_json(
            r#"{
                "actors": [{"id": 1, "name": "Alex", "max_hp": 50}],
                "start": {"map_id": 1, "x": 2, "y": 3, "party": [1], "gold": 100},
                "maps": [{"id": 1, "width": 10, "height": 10, "events": [
                    {"id": 1, "x": 4, "y": 4, "pages": [
                        {"trigger": "action"},
                        {"condition": {"switch_a": 5}, "trigger": "auto_start"}
                    ]}
                ]}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_new_game_from_start() {
        let game = Game::with_seed(&db(), 7);
        assert_eq!(game.party.gold, 100);
        assert_eq!(game.party.members, vec![1]);
        assert_eq!((game.map.player.x, game.map.player.y), (2, 3));
        assert_eq!(game.map.events[&1].page, 1);
        assert_eq!(game.actor_attribute(1, 4), 50);
    }

    #[test]
    fn test_refresh_picks_last_matching_page() {
        let data = db();
        let mut game = Game::with_seed(&data, 7);
        game.switches.set(5, true);
        game.refresh_map(&data);
        let event = &game.map.events[&1];
        assert_eq!(event.page, 2);
        assert_eq!(event.trigger, crate::data::Trigger::AutoStart);
    }

    #[test]
    fn test_random_range_either_order() {
        let mut game = Game::with_seed(&db(), 7);
        for _ in 0..50 {
            let v = game.random_range(5, 2);
            assert!((2..=5).contains(&v));
        }
        assert_eq!(game.random_range(3, 3), 3);
    }

    #[test]
    fn test_route_switch_command() {
        let data = db();
        let mut game = Game::with_seed(&data, 7);
        let mut host = crate::host::Recorder::new();
        game.map
            .player
            .force_move_route(MoveRoute::decode(&[32, 5], false, false), 3);
        game.tick(&data, &mut host);
        assert!(game.switches.get(5));
        assert!(!game.map.any_move_pending());
        assert!(game.map.events[&1].starting);
    }
}
