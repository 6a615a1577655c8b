/// Outcome the battle scene reports back to `EnemyEncounter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleResult {
    Victory,
    Escape,
    Defeat,
    Abort,
}

impl Default for BattleResult {
    fn default() -> BattleResult {
        BattleResult::Victory
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleRequest {
    pub troop_id: i32,
    /// 0 map terrain, 1 named background, 2 terrain id.
    pub background_mode: i32,
    pub background: String,
    pub terrain_id: i32,
    /// 0 disallowed, 1 ends the event, 2 runs the escape handler.
    pub escape_mode: i32,
    /// 0 game over, 1 runs the defeat handler.
    pub defeat_mode: i32,
    pub first_strike: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopRequest {
    pub buys: bool,
    pub sells: bool,
    pub kind: i32,
    pub goods: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRequest {
    pub actor_id: i32,
    pub charset: i32,
    pub use_default: bool,
}

/// ## Pending scene changes
///
/// Handlers raise these flags. The runtime's owner runs the scene and
/// lowers the flag when it completes, writing back any result.

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub battle_calling: bool,
    pub shop_calling: bool,
    pub inn_calling: bool,
    pub name_calling: bool,
    pub menu_calling: bool,
    pub save_calling: bool,
    pub to_title: bool,
    pub game_over: bool,
    pub battle: BattleRequest,
    pub shop: ShopRequest,
    pub name: NameRequest,
    pub battle_result: BattleResult,
    pub shop_transaction: bool,
    /// Common event queued to run on the root interpreter.
    pub common_event_id: Option<i32>,
}

impl Scene {
    /// Flags that hold every interpreter. An inn is driven from its own
    /// continuation instead.
    pub fn is_pending(&self) -> bool {
        self.battle_calling
            || self.shop_calling
            || self.name_calling
            || self.menu_calling
            || self.save_calling
            || self.to_title
            || self.game_over
    }
}
