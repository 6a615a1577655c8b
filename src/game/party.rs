use crate::data::ActorData;
use std::collections::{BTreeMap, BTreeSet};

/// State id that marks an actor or enemy as knocked out.
pub const DEATH_STATE: i32 = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Actor {
    pub id: i32,
    pub name: String,
    pub title: String,
    pub class_id: i32,
    pub level: i32,
    pub exp: i32,
    pub hp: i32,
    pub sp: i32,
    pub max_hp: i32,
    pub max_sp: i32,
    pub attack: i32,
    pub defense: i32,
    pub spirit: i32,
    pub agility: i32,
    pub skills: BTreeSet<i32>,
    pub states: BTreeSet<i32>,
    pub equipment: [i32; 5],
    pub sprite: String,
    pub sprite_index: i32,
    pub transparent: bool,
    pub face: String,
    pub face_index: i32,
    pub battle_commands: Vec<i32>,
    pub combo: Option<(i32, i32)>,
    pub last_battle_action: i32,
}

impl From<&ActorData> for Actor {
    fn from(data: &ActorData) -> Actor {
        Actor {
            id: data.id,
            name: data.name.clone(),
            title: data.title.clone(),
            class_id: data.class_id,
            level: data.level.max(1),
            exp: 0,
            hp: data.max_hp,
            sp: data.max_sp,
            max_hp: data.max_hp,
            max_sp: data.max_sp,
            attack: data.attack,
            defense: data.defense,
            spirit: data.spirit,
            agility: data.agility,
            skills: data.skills.iter().copied().collect(),
            states: BTreeSet::new(),
            equipment: data.equipment,
            sprite: data.sprite.clone(),
            sprite_index: data.sprite_index,
            transparent: false,
            face: data.face.clone(),
            face_index: data.face_index,
            battle_commands: data.battle_commands.clone(),
            combo: None,
            last_battle_action: 0,
        }
    }
}

impl Actor {
    pub fn is_dead(&self) -> bool {
        self.states.contains(&DEATH_STATE)
    }

    pub fn can_act(&self) -> bool {
        !self.is_dead()
    }

    /// Lethal changes may knock out, others stop at 1 HP.
    pub fn change_hp(&mut self, delta: i32, lethal: bool) {
        if self.is_dead() {
            return;
        }
        let floor = if lethal { 0 } else { 1.min(self.hp) };
        self.hp = (self.hp + delta).max(floor).min(self.max_hp);
        if self.hp == 0 {
            self.states.clear();
            self.states.insert(DEATH_STATE);
        }
    }

    pub fn change_sp(&mut self, delta: i32) {
        self.sp = (self.sp + delta).max(0).min(self.max_sp);
    }

    pub fn add_state(&mut self, id: i32) {
        if id == DEATH_STATE {
            self.hp = 0;
            self.states.clear();
        }
        self.states.insert(id);
    }

    pub fn remove_state(&mut self, id: i32) {
        if self.states.remove(&id) && id == DEATH_STATE && self.hp == 0 {
            self.hp = 1;
        }
    }

    pub fn full_heal(&mut self) {
        self.states.clear();
        self.hp = self.max_hp;
        self.sp = self.max_sp;
    }

    pub fn is_equipped(&self, item_id: i32) -> bool {
        item_id > 0 && self.equipment.contains(&item_id)
    }

    pub fn equipped_count(&self, item_id: i32) -> i32 {
        self.equipment.iter().filter(|&&e| e == item_id).count() as i32
    }

    /// Slot 0 weapon, 1 shield, 2 armor, 3 helmet, 4 accessory.
    pub fn set_equipment(&mut self, slot: usize, item_id: i32) -> i32 {
        match self.equipment.get_mut(slot) {
            Some(current) => std::mem::replace(current, item_id),
            None => 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Actors {
    actors: BTreeMap<i32, Actor>,
}

impl Actors {
    pub fn new<'a, I: IntoIterator<Item = &'a ActorData>>(data: I) -> Actors {
        Actors {
            actors: data.into_iter().map(|a| (a.id, Actor::from(a))).collect(),
        }
    }

    pub fn get(&self, id: i32) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: i32) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn insert(&mut self, actor: Actor) {
        self.actors.insert(actor.id, actor);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    pub frames: i32,
    pub running: bool,
    pub visible: bool,
    pub battle: bool,
}

impl Timer {
    pub fn seconds(&self, fps: u32) -> i32 {
        self.frames / fps.max(1) as i32
    }
}

/// ## Party inventory and membership

#[derive(Debug, Clone, Default)]
pub struct Party {
    pub members: Vec<i32>,
    pub gold: i32,
    pub items: BTreeMap<i32, i32>,
    pub timers: [Timer; 2],
    pub steps: i32,
    pub save_count: i32,
    pub battle_count: i32,
    pub victory_count: i32,
    pub defeat_count: i32,
    pub escape_count: i32,
    gold_max: i32,
    item_max: i32,
    party_max: usize,
}

impl Party {
    pub fn new(gold_max: i32, item_max: i32, party_max: usize) -> Party {
        Party {
            gold_max,
            item_max,
            party_max,
            ..Party::default()
        }
    }

    pub fn gain_gold(&mut self, amount: i32) {
        self.gold = (self.gold as i64 + amount as i64)
            .max(0)
            .min(self.gold_max as i64) as i32;
    }

    pub fn item_count(&self, id: i32) -> i32 {
        self.items.get(&id).copied().unwrap_or(0)
    }

    pub fn add_item(&mut self, id: i32, amount: i32) {
        if id <= 0 {
            tracing::warn!(id, "invalid item id");
            return;
        }
        let count = (self.item_count(id) + amount).max(0).min(self.item_max);
        if count == 0 {
            self.items.remove(&id);
        } else {
            self.items.insert(id, count);
        }
    }

    pub fn contains(&self, actor_id: i32) -> bool {
        self.members.contains(&actor_id)
    }

    pub fn add_actor(&mut self, actor_id: i32) {
        if self.contains(actor_id) || self.members.len() >= self.party_max {
            return;
        }
        self.members.push(actor_id);
    }

    pub fn remove_actor(&mut self, actor_id: i32) {
        self.members.retain(|&id| id != actor_id);
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.party_max
    }

    pub fn timer(&self, id: usize) -> Timer {
        self.timers.get(id).copied().unwrap_or_default()
    }

    pub fn timer_mut(&mut self, id: usize) -> Option<&mut Timer> {
        self.timers.get_mut(id)
    }

    pub fn tick_timers(&mut self) {
        for timer in self.timers.iter_mut() {
            if timer.running && timer.frames > 0 {
                timer.frames -= 1;
            }
        }
    }
}
