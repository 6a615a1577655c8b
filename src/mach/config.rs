use crate::error;
use crate::lang::Error;
use serde::{Deserialize, Serialize};

/// ## Interpreter limits
///
/// Every field has a default, so a database may carry a partial
/// `config` section or none at all.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Commands one `update` may run before yielding to the frame loop.
    pub max_iterations: usize,
    /// Call depth past which a warning is logged. Execution continues.
    pub depth_warning: u32,
    pub variable_min: i32,
    pub variable_max: i32,
    pub gold_max: i32,
    pub item_max: i32,
    pub level_max: i32,
    pub exp_max: i32,
    pub party_max: usize,
    /// Ticks per second.
    pub fps: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_iterations: 100,
            depth_warning: 100,
            variable_min: -9_999_999,
            variable_max: 9_999_999,
            gold_max: 999_999,
            item_max: 99,
            level_max: 99,
            exp_max: 999_999,
            party_max: 4,
            fps: 60,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_iterations == 0 {
            return Err(error!(InvalidConfig; "max_iterations must be positive"));
        }
        if self.variable_min > self.variable_max {
            return Err(error!(InvalidConfig; "variable_min exceeds variable_max"));
        }
        if self.fps == 0 {
            return Err(error!(InvalidConfig; "fps must be positive"));
        }
        if self.party_max == 0 {
            return Err(error!(InvalidConfig; "party_max must be positive"));
        }
        Ok(())
    }

    /// Tenths of a second to ticks.
    pub fn tenths_to_ticks(&self, tenths: i32) -> u32 {
        (tenths.max(0) as u32) * self.fps / 10
    }
}
