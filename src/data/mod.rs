/*!
## Event database

Static records the interpreter reads but never writes: common events,
maps with their event pages, troops with their battle pages, actor
templates, vocabulary and the start position. A database is loaded
from JSON once and shared by every interpreter.

*/

use crate::error;
use crate::lang::{CommandList, Error};
use crate::mach::Config;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub config: Config,
    pub terms: Terms,
    pub system: SystemData,
    pub actors: Vec<ActorData>,
    pub items: Vec<ItemData>,
    pub common_events: Vec<CommonEvent>,
    pub troops: Vec<TroopData>,
    pub maps: Vec<MapData>,
    pub start: Start,
}

impl Database {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Database> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Database::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Database> {
        let database: Database = serde_json::from_str(text)?;
        database.validate()?;
        Ok(database)
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        unique("actor", self.actors.iter().map(|a| a.id))?;
        unique("item", self.items.iter().map(|i| i.id))?;
        unique("common event", self.common_events.iter().map(|c| c.id))?;
        unique("troop", self.troops.iter().map(|t| t.id))?;
        unique("map", self.maps.iter().map(|m| m.id))?;
        for map in &self.maps {
            let what = format!("map event on map {}", map.id);
            unique(&what, map.events.iter().map(|e| e.id))?;
        }
        if !self.maps.is_empty() && self.map(self.start.map_id).is_none() {
            return Err(error!(UndefinedMap; format!("start map {}", self.start.map_id)));
        }
        for id in &self.start.party {
            if self.actor(*id).is_none() {
                return Err(error!(UndefinedEvent; format!("party actor {}", id)));
            }
        }
        Ok(())
    }

    pub fn common_event(&self, id: i32) -> Option<&CommonEvent> {
        self.common_events.iter().find(|c| c.id == id)
    }

    pub fn map(&self, id: i32) -> Option<&MapData> {
        self.maps.iter().find(|m| m.id == id)
    }

    pub fn troop(&self, id: i32) -> Option<&TroopData> {
        self.troops.iter().find(|t| t.id == id)
    }

    pub fn actor(&self, id: i32) -> Option<&ActorData> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn item(&self, id: i32) -> Option<&ItemData> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Commands of a map event page; pages are 1-based.
    pub fn event_page(&self, map_id: i32, event_id: i32, page: i32) -> Option<&CommandList> {
        let event = self.map(map_id)?.event(event_id)?;
        if page < 1 {
            return None;
        }
        event.pages.get(page as usize - 1).map(|p| &p.commands)
    }
}

fn unique<I: Iterator<Item = i32>>(what: &str, ids: I) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(error!(DuplicateId, id; what.to_string()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Action,
    Touch,
    Collision,
    AutoStart,
    Parallel,
    Call,
}

impl Default for Trigger {
    fn default() -> Trigger {
        Trigger::Action
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonEvent {
    pub id: i32,
    pub name: String,
    pub trigger: Trigger,
    pub switch_id: i32,
    pub commands: CommandList,
}

impl CommonEvent {
    /// Auto-start and parallel common events need their switch on.
    pub fn is_enabled(&self, switches: &crate::game::Switches) -> bool {
        match self.trigger {
            Trigger::AutoStart | Trigger::Parallel => switches.get(self.switch_id),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapData {
    pub id: i32,
    pub name: String,
    pub width: i32,
    pub height: i32,
    /// Row-major terrain ids; tiles outside the list read as terrain 1.
    pub terrain: Vec<i32>,
    pub events: Vec<EventData>,
}

impl MapData {
    pub fn event(&self, id: i32) -> Option<&EventData> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn terrain_at(&self, x: i32, y: i32) -> i32 {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return 0;
        }
        self.terrain
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventData {
    pub id: i32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub pages: Vec<PageData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageData {
    pub condition: PageCondition,
    pub trigger: Trigger,
    pub sprite: String,
    pub direction: i32,
    pub commands: CommandList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageCondition {
    pub switch_a: Option<i32>,
    pub switch_b: Option<i32>,
    /// Variable id and the minimum value it must hold.
    pub variable: Option<(i32, i32)>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TroopData {
    pub id: i32,
    pub name: String,
    pub enemies: Vec<EnemyData>,
    pub pages: Vec<TroopPage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyData {
    pub name: String,
    pub hp: i32,
    pub sp: i32,
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TroopPage {
    pub condition: TroopCondition,
    pub commands: CommandList,
}

/// A page runs once when every condition it names holds.
/// A page that names no condition never runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TroopCondition {
    pub switch_a: Option<i32>,
    pub switch_b: Option<i32>,
    pub variable: Option<(i32, i32)>,
    /// Turn `a + b * n` for some `n >= 0`.
    pub turn: Option<(i32, i32)>,
    /// Enemy index and HP percent range.
    pub enemy_hp: Option<(usize, i32, i32)>,
    /// Actor id and HP percent range.
    pub actor_hp: Option<(i32, i32, i32)>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorData {
    pub id: i32,
    pub name: String,
    pub title: String,
    pub class_id: i32,
    pub level: i32,
    pub max_hp: i32,
    pub max_sp: i32,
    pub attack: i32,
    pub defense: i32,
    pub spirit: i32,
    pub agility: i32,
    pub skills: Vec<i32>,
    /// Weapon, shield, armor, helmet, accessory.
    pub equipment: [i32; 5],
    pub sprite: String,
    pub sprite_index: i32,
    pub face: String,
    pub face_index: i32,
    pub battle_commands: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Common,
    Weapon,
    Shield,
    Armor,
    Helmet,
    Accessory,
}

impl Default for ItemKind {
    fn default() -> ItemKind {
        ItemKind::Common
    }
}

impl ItemKind {
    /// Equipment slot, if the item can be equipped.
    pub fn slot(self) -> Option<usize> {
        match self {
            ItemKind::Common => None,
            ItemKind::Weapon => Some(0),
            ItemKind::Shield => Some(1),
            ItemKind::Armor => Some(2),
            ItemKind::Helmet => Some(3),
            ItemKind::Accessory => Some(4),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemData {
    pub id: i32,
    pub name: String,
    pub kind: ItemKind,
    pub price: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Music {
    pub name: String,
    pub fadein: i32,
    pub volume: i32,
    pub tempo: i32,
    pub balance: i32,
}

impl Music {
    pub fn named<S: Into<String>>(name: S) -> Music {
        Music {
            name: name.into(),
            volume: 100,
            tempo: 100,
            balance: 50,
            ..Music::default()
        }
    }

    /// Editors store a silent slot as an empty name or `(OFF)`.
    pub fn is_silent(&self) -> bool {
        self.name.is_empty() || self.name == "(OFF)"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sound {
    pub name: String,
    pub volume: i32,
    pub tempo: i32,
    pub balance: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemData {
    pub title: String,
    /// Battle, victory, inn, boat, ship, airship, game over.
    pub bgm: Vec<Music>,
    pub se: Vec<Sound>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Terms {
    pub gold: String,
    pub inn_a_greeting_1: String,
    pub inn_a_greeting_2: String,
    pub inn_a_greeting_3: String,
    pub inn_a_accept: String,
    pub inn_a_cancel: String,
    pub inn_b_greeting_1: String,
    pub inn_b_greeting_2: String,
    pub inn_b_greeting_3: String,
    pub inn_b_accept: String,
    pub inn_b_cancel: String,
}

impl Default for Terms {
    fn default() -> Terms {
        Terms {
            gold: "G".into(),
            inn_a_greeting_1: "A night's stay is".into(),
            inn_a_greeting_2: ".".into(),
            inn_a_greeting_3: "Would you like to rest?".into(),
            inn_a_accept: "Stay".into(),
            inn_a_cancel: "Leave".into(),
            inn_b_greeting_1: "Welcome! It's".into(),
            inn_b_greeting_2: " per night.".into(),
            inn_b_greeting_3: "Will you stay?".into(),
            inn_b_accept: "Yes".into(),
            inn_b_cancel: "No".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Start {
    pub map_id: i32,
    pub x: i32,
    pub y: i32,
    pub party: Vec<i32>,
    pub gold: i32,
}

impl Default for Start {
    fn default() -> Start {
        Start {
            map_id: 1,
            x: 0,
            y: 0,
            party: vec![],
            gold: 0,
        }
    }
}
