use super::party::DEATH_STATE;
use crate::data::TroopData;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enemy {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub sp: i32,
    pub max_sp: i32,
    pub states: BTreeSet<i32>,
    pub hidden: bool,
    pub fled: bool,
}

impl Enemy {
    pub fn is_dead(&self) -> bool {
        self.states.contains(&DEATH_STATE)
    }

    /// Present, visible and alive.
    pub fn can_act(&self) -> bool {
        !self.hidden && !self.fled && !self.is_dead()
    }

    pub fn hp_percent(&self) -> i32 {
        if self.max_hp <= 0 {
            return 0;
        }
        self.hp * 100 / self.max_hp
    }

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
}

/// ## Enemies on the battlefield
///
/// Battle-side state the troop pages read and write. The battle scene
/// itself updates `turn`, `target` and `last_command`.

#[derive(Debug, Clone, Default)]
pub struct Troop {
    pub id: i32,
    pub enemies: Vec<Enemy>,
    pub turn: i32,
    /// Enemy index currently targeted by the party.
    pub target: Option<usize>,
    /// Actor id and battle command id of the last party action.
    pub last_command: Option<(i32, i32)>,
    pub background: String,
    pub party_fled: bool,
    pub terminated: bool,
    pub animations: Vec<(i32, Option<usize>)>,
}

impl Troop {
    pub fn new(data: &TroopData) -> Troop {
        Troop {
            id: data.id,
            enemies: data
                .enemies
                .iter()
                .map(|e| Enemy {
                    name: e.name.clone(),
                    hp: e.hp,
                    max_hp: e.hp,
                    sp: e.sp,
                    max_sp: e.sp,
                    states: BTreeSet::new(),
                    hidden: e.hidden,
                    fled: false,
                })
                .collect(),
            ..Troop::default()
        }
    }

    pub fn enemy(&self, index: i32) -> Option<&Enemy> {
        if index < 0 {
            return None;
        }
        self.enemies.get(index as usize)
    }

    pub fn enemy_mut(&mut self, index: i32) -> Option<&mut Enemy> {
        if index < 0 {
            return None;
        }
        self.enemies.get_mut(index as usize)
    }

    pub fn all_defeated(&self) -> bool {
        self.enemies.iter().all(|e| !e.can_act())
    }
}
