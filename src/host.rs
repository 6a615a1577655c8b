/*!
## Host interface

Everything the interpreter cannot do itself goes through a `Host`:
audio, movies, animations and screen transitions are handed off as
fire-and-forget `Effect`s, and input and transition progress are
queried. The interpreter never waits on a host call. Multi-tick work
is polled through `transition_pending`, `animation_pending` and
`bgm_played_once`.

*/

use crate::data::{Music, Sound};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    // Audio
    PlayBgm(Music),
    FadeOutBgm {
        millis: i32,
    },
    PlaySe(Sound),
    PlayMovie {
        name: String,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    // Screen
    /// Fade the screen out (`erase`) or back in with a transition type.
    Transition {
        erase: bool,
        kind: i32,
    },
    Tint {
        red: i32,
        green: i32,
        blue: i32,
        saturation: i32,
        ticks: u32,
    },
    Flash {
        red: i32,
        green: i32,
        blue: i32,
        strength: i32,
        ticks: u32,
    },
    Shake {
        power: i32,
        speed: i32,
        ticks: u32,
    },
    Weather {
        kind: i32,
        strength: i32,
    },
    ShowPicture {
        id: i32,
        name: String,
    },
    MovePicture {
        id: i32,
        x: i32,
        y: i32,
        ticks: u32,
    },
    ErasePicture {
        id: i32,
    },
    PanScreen {
        x: i32,
        y: i32,
        speed: i32,
    },

    // Characters
    BattleAnimation {
        id: i32,
        target: i32,
        global: bool,
    },
    FlashCharacter {
        id: i32,
        ticks: u32,
    },
    /// A simulated attack's computed damage for an actor.
    SimulatedAttack {
        actor_id: i32,
        damage: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Down,
    Left,
    Right,
    Up,
    Decision,
    Cancel,
    Shift,
    /// Digit keys `0..=9`.
    Number(u8),
    Plus,
    Minus,
    Multiply,
    Divide,
    Period,
}

impl Key {
    /// The value `KeyInputProc` stores for this key.
    pub fn code(self) -> i32 {
        match self {
            Key::Down => 1,
            Key::Left => 2,
            Key::Right => 3,
            Key::Up => 4,
            Key::Decision => 5,
            Key::Cancel => 6,
            Key::Shift => 7,
            Key::Number(n) => 10 + n.min(9) as i32,
            Key::Plus => 20,
            Key::Minus => 21,
            Key::Multiply => 22,
            Key::Divide => 23,
            Key::Period => 24,
        }
    }
}

pub trait Host {
    fn effect(&mut self, effect: Effect);

    fn is_pressed(&self, _key: Key) -> bool {
        false
    }

    fn is_triggered(&self, _key: Key) -> bool {
        false
    }

    fn transition_pending(&self) -> bool {
        false
    }

    fn animation_pending(&self) -> bool {
        false
    }

    fn bgm_played_once(&self) -> bool {
        true
    }
}

/// ## Recording host
///
/// Collects every effect and answers queries from public fields. Used by
/// tests and by the terminal player, which replays the effects as text.

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub effects: Vec<Effect>,
    pub pressed: Vec<Key>,
    pub triggered: Vec<Key>,
    pub transition: bool,
    pub animation: bool,
    pub bgm_looped: bool,
}

impl Recorder {
    pub fn new() -> Recorder {
        Recorder {
            bgm_looped: true,
            ..Recorder::default()
        }
    }

    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

impl Host for Recorder {
    fn effect(&mut self, effect: Effect) {
        tracing::trace!(?effect, "host effect");
        self.effects.push(effect);
    }

    fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn is_triggered(&self, key: Key) -> bool {
        self.triggered.contains(&key)
    }

    fn transition_pending(&self) -> bool {
        self.transition
    }

    fn animation_pending(&self) -> bool {
        self.animation
    }

    fn bgm_played_once(&self) -> bool {
        self.bgm_looped
    }
}
