use crate::data::{Music, Sound};
use std::collections::BTreeMap;

/// Indexes into the system BGM table.
pub const BGM_BATTLE: i32 = 0;
pub const BGM_VICTORY: i32 = 1;
pub const BGM_INN: i32 = 2;
pub const BGM_GAME_OVER: i32 = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemGraphic {
    pub name: String,
    pub stretch: bool,
    pub font: i32,
}

/// ## Persistent system settings
///
/// Music slots, access flags and screen transitions that survive across
/// maps.

#[derive(Debug, Clone)]
pub struct System {
    pub current_bgm: Music,
    pub memorized_bgm: Music,
    pub before_battle_bgm: Music,
    pub system_bgm: BTreeMap<i32, Music>,
    pub system_se: BTreeMap<i32, Sound>,
    pub graphic: SystemGraphic,
    /// Transition type per slot: teleport out/in, battle start out/in,
    /// battle end out/in.
    pub transitions: [i32; 6],
    pub teleport_allowed: bool,
    pub escape_allowed: bool,
    pub save_allowed: bool,
    pub menu_allowed: bool,
    pub battle_background: String,
    pub vehicle_sprites: [(String, i32); 3],
}

impl Default for System {
    fn default() -> System {
        System {
            current_bgm: Music::default(),
            memorized_bgm: Music::default(),
            before_battle_bgm: Music::default(),
            system_bgm: BTreeMap::new(),
            system_se: BTreeMap::new(),
            graphic: SystemGraphic::default(),
            transitions: [0; 6],
            teleport_allowed: true,
            escape_allowed: true,
            save_allowed: true,
            menu_allowed: true,
            battle_background: String::new(),
            vehicle_sprites: Default::default(),
        }
    }
}

impl System {
    pub fn bgm(&self, slot: i32) -> Music {
        self.system_bgm.get(&slot).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tone {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub saturation: i32,
}

impl Tone {
    pub fn neutral() -> Tone {
        Tone {
            red: 100,
            green: 100,
            blue: 100,
            saturation: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shake {
    pub power: i32,
    pub speed: i32,
    pub ticks: u32,
    pub continuous: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Picture {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub magnify: i32,
    pub transparency: i32,
    pub fixed_to_map: bool,
    pub tone: Tone,
}

/// ## What the screen is doing

#[derive(Debug, Clone)]
pub struct Screen {
    pub tone: Tone,
    pub flash: Option<super::map::Flash>,
    pub shake: Shake,
    pub weather: i32,
    pub weather_strength: i32,
    pub pictures: BTreeMap<i32, Picture>,
    pub erased: bool,
}

impl Default for Screen {
    fn default() -> Screen {
        Screen {
            tone: Tone::neutral(),
            flash: None,
            shake: Shake::default(),
            weather: 0,
            weather_strength: 0,
            pictures: BTreeMap::new(),
            erased: false,
        }
    }
}

impl Screen {
    pub fn tick(&mut self) {
        if let Some(flash) = self.flash.as_mut() {
            if flash.ticks <= 1 {
                self.flash = None;
            } else {
                flash.ticks -= 1;
            }
        }
        if !self.shake.continuous && self.shake.ticks > 0 {
            self.shake.ticks -= 1;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Target {
    pub map_id: i32,
    pub x: i32,
    pub y: i32,
    /// Switch turned on on arrival, if any.
    pub switch_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct Targets {
    pub teleport: BTreeMap<i32, Target>,
    pub escape: Option<Target>,
}
