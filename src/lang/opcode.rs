/// ## Event instruction set
///
/// Every stored command code decodes into exactly one of three closed
/// sets. `SharedOp` opcodes behave the same in every context. `MapOp` and
/// `BattleOp` opcodes only have meaning inside their own interpreter.
/// Codes nobody recognizes survive as `Unknown` so that content from
/// newer editors still loads.

macro_rules! opcodes {
    ($(#[$meta:meta])* $name:ident { $($op:ident = $code:literal,)* }) => {
        $(#[$meta])*
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($op,)*
        }

        impl $name {
            pub fn from_code(code: i32) -> Option<$name> {
                match code {
                    $($code => Some($name::$op),)*
                    _ => None,
                }
            }

            pub fn code(self) -> i32 {
                match self {
                    $($name::$op => $code,)*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$op => stringify!($op),)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

opcodes! {
    /// Handled by the base dispatch of both contexts.
    SharedOp {
        End = 10,
        ChangeClass = 1008,
        ChangeBattleCommands = 1009,
        ShowMessage = 10110,
        MessageOptions = 10120,
        ChangeFaceGraphic = 10130,
        ShowChoice = 10140,
        InputNumber = 10150,
        ControlSwitches = 10210,
        ControlVars = 10220,
        TimerOperation = 10230,
        ChangeGold = 10310,
        ChangeItems = 10320,
        ChangePartyMembers = 10330,
        ChangeExp = 10410,
        ChangeLevel = 10420,
        ChangeParameters = 10430,
        ChangeSkills = 10440,
        ChangeEquipment = 10450,
        ChangeHP = 10460,
        ChangeSP = 10470,
        ChangeCondition = 10480,
        FullHeal = 10490,
        ChangeHeroName = 10610,
        ChangeHeroTitle = 10620,
        ChangeSpriteAssociation = 10630,
        ChangeActorFace = 10640,
        ChangeVehicleGraphic = 10650,
        ChangeSystemBGM = 10660,
        ChangeSystemSFX = 10670,
        ChangeSystemGraphics = 10680,
        ChangeScreenTransitions = 10690,
        TintScreen = 11030,
        FlashScreen = 11040,
        ShakeScreen = 11050,
        WeatherEffects = 11070,
        ShowPicture = 11110,
        MovePicture = 11120,
        ErasePicture = 11130,
        Wait = 11410,
        PlayBGM = 11510,
        FadeOutBGM = 11520,
        MemorizeBGM = 11530,
        PlayMemorizedBGM = 11540,
        PlaySound = 11550,
        PlayMovie = 11560,
        ChangeTeleportAccess = 11820,
        ChangeEscapeAccess = 11840,
        ChangeSaveAccess = 11930,
        ChangeMainMenuAccess = 11960,
        Label = 12110,
        JumpToLabel = 12120,
        Loop = 12210,
        BreakLoop = 12220,
        EndEventProcessing = 12310,
        Comment = 12410,
        GameOver = 12420,
        ShowMessage_2 = 20110,
        ShowChoiceOption = 20140,
        ShowChoiceEnd = 20141,
        EndLoop = 22210,
        Comment_2 = 22410,
    }
}

opcodes! {
    /// Only meaningful to an interpreter running on the field map.
    MapOp {
        SimulatedAttack = 10500,
        EnemyEncounter = 10710,
        OpenShop = 10720,
        ShowInn = 10730,
        EnterHeroName = 10740,
        Teleport = 10810,
        MemorizeLocation = 10820,
        RecallToLocation = 10830,
        EnterExitVehicle = 10840,
        SetVehicleLocation = 10850,
        ChangeEventLocation = 10860,
        TradeEventLocations = 10870,
        StoreTerrainID = 10910,
        StoreEventID = 10920,
        EraseScreen = 11010,
        ShowScreen = 11020,
        PanScreen = 11060,
        ShowBattleAnimation = 11210,
        PlayerVisibility = 11310,
        FlashSprite = 11320,
        MoveEvent = 11330,
        ProceedWithMovement = 11340,
        HaltAllMovement = 11350,
        KeyInputProc = 11610,
        ChangeMapTileset = 11710,
        ChangePBG = 11720,
        ChangeEncounterRate = 11740,
        TileSubstitution = 11750,
        TeleportTargets = 11810,
        EscapeTarget = 11830,
        OpenSaveMenu = 11910,
        OpenMainMenu = 11950,
        ConditionalBranch = 12010,
        EraseEvent = 12320,
        CallEvent = 12330,
        ReturnToTitle = 12510,
        VictoryHandler = 20710,
        EscapeHandler = 20711,
        DefeatHandler = 20712,
        EndBattle = 20713,
        Transaction = 20720,
        NoTransaction = 20721,
        EndShop = 20722,
        Stay = 20730,
        NoStay = 20731,
        EndInn = 20732,
        ElseBranch = 22010,
        EndBranch = 22011,
    }
}

opcodes! {
    /// Only meaningful to an interpreter running a troop page.
    BattleOp {
        CallCommonEvent = 1005,
        ForceFlee = 1006,
        EnableCombo = 1007,
        ChangeMonsterHP = 13110,
        ChangeMonsterMP = 13120,
        ChangeMonsterCondition = 13210,
        ShowHiddenMonster = 13310,
        ChangeBattleBG = 13410,
        ShowBattleAnimation_B = 13510,
        ConditionalBranch_B = 13610,
        TerminateBattle = 13710,
        ElseBranch_B = 23310,
        EndBranch_B = 23311,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Shared(SharedOp),
    Map(MapOp),
    Battle(BattleOp),
    Unknown(i32),
}

impl Opcode {
    pub fn code(self) -> i32 {
        match self {
            Opcode::Shared(op) => op.code(),
            Opcode::Map(op) => op.code(),
            Opcode::Battle(op) => op.code(),
            Opcode::Unknown(code) => code,
        }
    }
}

impl From<i32> for Opcode {
    fn from(code: i32) -> Opcode {
        if let Some(op) = SharedOp::from_code(code) {
            Opcode::Shared(op)
        } else if let Some(op) = MapOp::from_code(code) {
            Opcode::Map(op)
        } else if let Some(op) = BattleOp::from_code(code) {
            Opcode::Battle(op)
        } else {
            Opcode::Unknown(code)
        }
    }
}

impl From<SharedOp> for Opcode {
    fn from(op: SharedOp) -> Opcode {
        Opcode::Shared(op)
    }
}

impl From<MapOp> for Opcode {
    fn from(op: MapOp) -> Opcode {
        Opcode::Map(op)
    }
}

impl From<BattleOp> for Opcode {
    fn from(op: BattleOp) -> Opcode {
        Opcode::Battle(op)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Opcode::Shared(op) => write!(f, "{}", op),
            Opcode::Map(op) => write!(f, "{}", op),
            Opcode::Battle(op) => write!(f, "{}", op),
            Opcode::Unknown(code) => write!(f, "Unknown({})", code),
        }
    }
}
