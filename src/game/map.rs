use crate::data::{MapData, Trigger};
use std::collections::BTreeMap;

pub const PLAYER: i32 = 10001;
pub const BOAT: i32 = 10002;
pub const SHIP: i32 = 10003;
pub const AIRSHIP: i32 = 10004;
pub const THIS_EVENT: i32 = 10005;

pub const UP: i32 = 0;
pub const RIGHT: i32 = 1;
pub const DOWN: i32 = 2;
pub const LEFT: i32 = 3;

/// ## One step of a forced move route
///
/// Codes follow the editor numbering. `0..=3` move up, right, down and
/// left; `12..=15` face those directions; `23` waits; `32`/`33` turn a
/// switch on or off; `34` changes the sprite; `35` plays a sound.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveCommand {
    pub code: i32,
    pub text: String,
    pub a: i32,
    pub b: i32,
    pub c: i32,
}

impl MoveCommand {
    pub fn new(code: i32) -> MoveCommand {
        MoveCommand {
            code,
            ..MoveCommand::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveRoute {
    pub commands: Vec<MoveCommand>,
    pub repeat: bool,
    pub skippable: bool,
}

impl MoveRoute {
    /// Unpacks a route stored inline in command parameters.
    /// Integer operands are big-endian 7-bit groups with the high bit as
    /// continuation. Strings are a length followed by one char per slot.
    pub fn decode(params: &[i32], repeat: bool, skippable: bool) -> MoveRoute {
        let mut it = params.iter().copied();
        let mut commands = vec![];
        while let Some(code) = it.next() {
            let mut cmd = MoveCommand::new(code);
            match code {
                32 | 33 => cmd.a = decode_int(&mut it),
                34 => {
                    cmd.text = decode_string(&mut it);
                    cmd.a = decode_int(&mut it);
                }
                35 => {
                    cmd.text = decode_string(&mut it);
                    cmd.a = decode_int(&mut it);
                    cmd.b = decode_int(&mut it);
                    cmd.c = decode_int(&mut it);
                }
                _ => {}
            }
            commands.push(cmd);
        }
        MoveRoute {
            commands,
            repeat,
            skippable,
        }
    }
}

fn decode_int<I: Iterator<Item = i32>>(it: &mut I) -> i32 {
    let mut value = 0i32;
    for x in it {
        value = value.wrapping_shl(7) | (x & 0x7F);
        if x & 0x80 == 0 {
            break;
        }
    }
    value
}

fn decode_string<I: Iterator<Item = i32>>(it: &mut I) -> String {
    let len = decode_int(it).max(0) as usize;
    it.take(len)
        .filter_map(|c| std::char::from_u32(c as u32))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flash {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub strength: i32,
    pub ticks: u32,
}

/// ## Anything that stands on the map
///
/// The player, the three vehicles and every map event share this state.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Character {
    pub id: i32,
    pub x: i32,
    pub y: i32,
    pub direction: i32,
    pub direction_fixed: bool,
    pub transparent: bool,
    pub through: bool,
    /// Cleared by `EraseEvent` until the next map setup.
    pub active: bool,
    pub locked: bool,
    pub starting: bool,
    /// 1-based event page, 0 when no page condition holds.
    pub page: i32,
    pub trigger: Trigger,
    pub sprite: String,
    pub sprite_index: i32,
    pub speed: i32,
    pub frequency: i32,
    pub flash: Option<Flash>,
    pub move_route: Option<MoveRoute>,
    route_index: usize,
    route_wait: u32,
}

impl Character {
    pub fn new(id: i32, x: i32, y: i32) -> Character {
        Character {
            id,
            x,
            y,
            direction: DOWN,
            active: true,
            speed: 4,
            frequency: 3,
            ..Character::default()
        }
    }

    pub fn force_move_route(&mut self, route: MoveRoute, frequency: i32) {
        self.frequency = frequency;
        self.route_index = 0;
        self.route_wait = 0;
        self.move_route = if route.commands.is_empty() {
            None
        } else {
            Some(route)
        };
    }

    pub fn cancel_move_route(&mut self) {
        self.move_route = None;
        self.route_index = 0;
        self.route_wait = 0;
    }

    /// Repeating routes never finish, so nothing waits on them.
    pub fn is_move_route_pending(&self) -> bool {
        match &self.move_route {
            Some(route) => !route.repeat,
            None => false,
        }
    }

    /// Takes the next command of the forced route, if one is due this tick.
    pub fn next_move(&mut self) -> Option<MoveCommand> {
        if self.route_wait > 0 {
            self.route_wait -= 1;
            return None;
        }
        let route = self.move_route.as_ref()?;
        let cmd = route.commands.get(self.route_index).cloned();
        self.route_index += 1;
        if self.route_index >= route.commands.len() {
            if route.repeat {
                self.route_index = 0;
            } else {
                self.move_route = None;
                self.route_index = 0;
            }
        }
        cmd
    }

    pub fn set_direction(&mut self, direction: i32) {
        if !self.direction_fixed && (UP..=LEFT).contains(&direction) {
            self.direction = direction;
        }
    }

    pub fn step(&mut self, direction: i32) {
        let (dx, dy) = delta(direction);
        self.set_direction(direction);
        self.x += dx;
        self.y += dy;
    }

    pub fn toward(&self, x: i32, y: i32) -> i32 {
        let (dx, dy) = (x - self.x, y - self.y);
        if dx.abs() > dy.abs() {
            if dx > 0 {
                RIGHT
            } else {
                LEFT
            }
        } else if dy > 0 {
            DOWN
        } else {
            UP
        }
    }

    /// Movement and facing commands. Switch, sprite and sound commands
    /// need more than the character and are handled by the caller.
    /// `random` picks a direction in `0..4`.
    pub fn apply_move(&mut self, cmd: &MoveCommand, player: (i32, i32), random: i32) {
        match cmd.code {
            0..=3 => self.step(cmd.code),
            4..=7 => {
                let (h, v) = match cmd.code {
                    4 => (RIGHT, UP),
                    5 => (RIGHT, DOWN),
                    6 => (LEFT, DOWN),
                    _ => (LEFT, UP),
                };
                let (dx, _) = delta(h);
                let (_, dy) = delta(v);
                self.x += dx;
                self.y += dy;
                self.set_direction(h);
            }
            8 => self.step(random),
            9 => self.step(self.toward(player.0, player.1)),
            10 => self.step(reverse(self.toward(player.0, player.1))),
            11 => self.step(self.direction),
            12..=15 => self.set_direction(cmd.code - 12),
            16 => self.set_direction((self.direction + 1) % 4),
            17 => self.set_direction((self.direction + 3) % 4),
            18 => self.set_direction(reverse(self.direction)),
            19 => self.set_direction((self.direction + if random % 2 == 0 { 1 } else { 3 }) % 4),
            20 => self.set_direction(random),
            21 => self.set_direction(self.toward(player.0, player.1)),
            22 => self.set_direction(reverse(self.toward(player.0, player.1))),
            23 => self.route_wait = 20,
            26 => self.direction_fixed = true,
            27 => self.direction_fixed = false,
            28 => self.speed = (self.speed + 1).min(6),
            29 => self.speed = (self.speed - 1).max(1),
            30 => self.frequency = (self.frequency + 1).min(8),
            31 => self.frequency = (self.frequency - 1).max(1),
            34 => {
                self.sprite = cmd.text.clone();
                self.sprite_index = cmd.a;
            }
            36 => self.through = true,
            37 => self.through = false,
            40 | 41 => self.transparent = cmd.code == 40,
            _ => {}
        }
    }
}

fn delta(direction: i32) -> (i32, i32) {
    match direction {
        UP => (0, -1),
        RIGHT => (1, 0),
        DOWN => (0, 1),
        LEFT => (-1, 0),
        _ => (0, 0),
    }
}

fn reverse(direction: i32) -> i32 {
    (direction + 2) % 4
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vehicle {
    pub map_id: i32,
    pub character: Character,
    pub in_use: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Teleport {
    pub map_id: i32,
    pub x: i32,
    pub y: i32,
    /// -1 keeps the current facing.
    pub direction: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pan {
    pub x: i32,
    pub y: i32,
    pub locked: bool,
    pub speed: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panorama {
    pub name: String,
    pub horizontal_scroll: bool,
    pub vertical_scroll: bool,
    pub horizontal_speed: i32,
    pub vertical_speed: i32,
}

/// ## Live state of the current map

#[derive(Debug, Clone, Default)]
pub struct Map {
    pub id: i32,
    pub width: i32,
    pub height: i32,
    pub player: Character,
    pub events: BTreeMap<i32, Character>,
    pub vehicles: [Vehicle; 3],
    pub chipset_id: i32,
    pub encounter_rate: i32,
    pub panorama: Option<Panorama>,
    /// Lower layer, old tile, new tile.
    pub tile_substitutions: Vec<(bool, i32, i32)>,
    pub pan: Pan,
    pub need_refresh: bool,
    pub teleport: Option<Teleport>,
}

impl Map {
    /// Rebuilds event characters from map data. The player and vehicles
    /// carry over.
    pub fn setup(&mut self, data: &MapData) {
        self.id = data.id;
        self.width = data.width;
        self.height = data.height;
        self.events = data
            .events
            .iter()
            .map(|e| (e.id, Character::new(e.id, e.x, e.y)))
            .collect();
        self.tile_substitutions.clear();
        self.panorama = None;
        self.pan = Pan::default();
        self.need_refresh = true;
    }

    /// `this_event` resolves id 10005.
    pub fn character(&self, id: i32, this_event: i32) -> Option<&Character> {
        match id {
            PLAYER => Some(&self.player),
            BOAT..=AIRSHIP => Some(&self.vehicles[(id - BOAT) as usize].character),
            THIS_EVENT => self.events.get(&this_event),
            _ => self.events.get(&id),
        }
    }

    pub fn character_mut(&mut self, id: i32, this_event: i32) -> Option<&mut Character> {
        match id {
            PLAYER => Some(&mut self.player),
            BOAT..=AIRSHIP => Some(&mut self.vehicles[(id - BOAT) as usize].character),
            THIS_EVENT => self.events.get_mut(&this_event),
            _ => self.events.get_mut(&id),
        }
    }

    pub fn vehicle(&self, kind: i32) -> Option<&Vehicle> {
        self.vehicles.get(kind as usize)
    }

    pub fn vehicle_mut(&mut self, kind: i32) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(kind as usize)
    }

    /// Vehicle index the player rides, if any.
    pub fn vehicle_in_use(&self) -> Option<i32> {
        self.vehicles.iter().position(|v| v.in_use).map(|i| i as i32)
    }

    pub fn any_move_pending(&self) -> bool {
        self.player.is_move_route_pending()
            || self.vehicles.iter().any(|v| v.character.is_move_route_pending())
            || self.events.values().any(|e| e.is_move_route_pending())
    }

    pub fn halt_all_movement(&mut self) {
        self.player.cancel_move_route();
        for vehicle in self.vehicles.iter_mut() {
            vehicle.character.cancel_move_route();
        }
        for event in self.events.values_mut() {
            event.cancel_move_route();
        }
    }

    /// Lowest event id standing on the tile, 0 if none.
    pub fn event_at(&self, x: i32, y: i32) -> i32 {
        self.events
            .values()
            .find(|e| e.active && e.x == x && e.y == y)
            .map(|e| e.id)
            .unwrap_or(0)
    }

    /// Action-triggered events start when the player interacts with them.
    pub fn start_event(&mut self, id: i32) -> bool {
        match self.events.get_mut(&id) {
            Some(event) if event.active && event.page > 0 && !event.locked => {
                event.starting = true;
                true
            }
            _ => false,
        }
    }

    /// The first event flagged as starting, in id order.
    pub fn starting_event(&self) -> Option<i32> {
        self.events
            .values()
            .find(|e| e.starting && e.active)
            .map(|e| e.id)
    }

    pub fn parallel_events(&self) -> Vec<i32> {
        self.events
            .values()
            .filter(|e| e.active && e.page > 0 && e.trigger == Trigger::Parallel)
            .map(|e| e.id)
            .collect()
    }

    pub fn mark_auto_start(&mut self) {
        for event in self.events.values_mut() {
            if event.active && event.page > 0 && !event.locked && event.trigger == Trigger::AutoStart {
                event.starting = true;
            }
        }
    }

    pub fn unlock(&mut self, id: i32) {
        if let Some(event) = self.events.get_mut(&id) {
            event.locked = false;
        }
    }
}
