use crate::lang::{BattleOp, Command, MapOp, Opcode, SharedOp};
use std::collections::HashMap;

/// Forward scan for `target` or `alt` starting at `from`.
///
/// Commands indented deeper than `max` belong to nested blocks and are
/// stepped over. A command indented shallower than `min` closes the block
/// and ends the search with `None`.
pub fn skip_to(
    list: &[Command],
    from: usize,
    target: Opcode,
    alt: Opcode,
    min: i32,
    max: i32,
) -> Option<usize> {
    for (index, cmd) in list.iter().enumerate().skip(from) {
        if cmd.indent < min {
            return None;
        }
        if cmd.indent > max {
            continue;
        }
        if cmd.code == target.code() || cmd.code == alt.code() {
            return Some(index);
        }
    }
    None
}

/// Backward scan from `from` for the `Loop` an `EndLoop` at `indent`
/// closes. Fails once the indent drops below the loop's.
pub fn find_loop_start(list: &[Command], from: usize, indent: i32) -> Option<usize> {
    let end = from.min(list.len());
    for index in (0..end).rev() {
        let cmd = &list[index];
        if cmd.indent < indent {
            return None;
        }
        if cmd.indent == indent && cmd.code == SharedOp::Loop.code() {
            return Some(index);
        }
    }
    None
}

/// First `Label` with the id anywhere in the list, regardless of nesting.
pub fn find_label(list: &[Command], id: i32) -> Option<usize> {
    list.iter()
        .position(|cmd| cmd.code == SharedOp::Label.code() && cmd.param(0) == id)
}

/// Texts of the `ShowChoiceOption` lines that belong to the choice block
/// opened just before `from`.
pub fn choices(list: &[Command], from: usize, indent: i32) -> Vec<String> {
    let mut texts = vec![];
    for cmd in list.iter().skip(from) {
        if cmd.indent < indent {
            break;
        }
        if cmd.indent != indent {
            continue;
        }
        if cmd.code == SharedOp::ShowChoiceOption.code() && cmd.param(0) < 4 {
            texts.push(cmd.text.clone());
        } else if cmd.code == SharedOp::ShowChoiceEnd.code() {
            break;
        }
    }
    texts
}

/// Text of the `ShowMessage_2` lines directly following `from`.
pub fn message_lines(list: &[Command], from: usize) -> Vec<String> {
    list.iter()
        .skip(from)
        .take_while(|cmd| cmd.code == SharedOp::ShowMessage_2.code())
        .map(|cmd| cmd.text.clone())
        .collect()
}

/// ## Block exits resolved at bind time
///
/// For every command whose effect is "jump past the end of my block" the
/// landing index is computed once with the same scans the handlers would
/// run, so the table and a live scan always agree. Labels map to their
/// first occurrence.

#[derive(Debug, Clone, Default)]
pub struct JumpTable {
    exits: HashMap<usize, usize>,
    labels: HashMap<i32, usize>,
}

impl JumpTable {
    pub fn build(list: &[Command]) -> JumpTable {
        let mut table = JumpTable::default();
        for (index, cmd) in list.iter().enumerate() {
            if cmd.code == SharedOp::Label.code() {
                table.labels.entry(cmd.param(0)).or_insert(index);
            }
            if let Some(exit) = block_exit(list, index) {
                table.exits.insert(index, exit);
            }
        }
        table
    }

    /// Index of the terminator that closes the block at `index`.
    pub fn exit(&self, index: usize) -> Option<usize> {
        self.exits.get(&index).copied()
    }

    pub fn label(&self, id: i32) -> Option<usize> {
        self.labels.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.exits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exits.is_empty()
    }
}

/// The live scan each block-opening command uses.
pub fn block_exit(list: &[Command], index: usize) -> Option<usize> {
    let cmd = list.get(index)?;
    let indent = cmd.indent;
    let same = |target: Opcode, alt: Opcode| skip_to(list, index + 1, target, alt, indent, indent);
    match cmd.opcode() {
        Opcode::Map(MapOp::ConditionalBranch) => {
            same(MapOp::ElseBranch.into(), MapOp::EndBranch.into())
        }
        Opcode::Map(MapOp::ElseBranch) => same(MapOp::EndBranch.into(), MapOp::EndBranch.into()),
        Opcode::Battle(BattleOp::ConditionalBranch_B) => {
            same(BattleOp::ElseBranch_B.into(), BattleOp::EndBranch_B.into())
        }
        Opcode::Battle(BattleOp::ElseBranch_B) => {
            same(BattleOp::EndBranch_B.into(), BattleOp::EndBranch_B.into())
        }
        Opcode::Shared(SharedOp::ShowChoiceOption) => same(
            SharedOp::ShowChoiceEnd.into(),
            SharedOp::ShowChoiceEnd.into(),
        ),
        Opcode::Shared(SharedOp::BreakLoop) => skip_to(
            list,
            index + 1,
            SharedOp::EndLoop.into(),
            SharedOp::EndLoop.into(),
            0,
            indent - 1,
        ),
        Opcode::Shared(SharedOp::EndLoop) => find_loop_start(list, index, indent),
        Opcode::Map(MapOp::Transaction) | Opcode::Map(MapOp::NoTransaction) => {
            same(MapOp::EndShop.into(), MapOp::EndShop.into())
        }
        Opcode::Map(MapOp::Stay) | Opcode::Map(MapOp::NoStay) => {
            same(MapOp::EndInn.into(), MapOp::EndInn.into())
        }
        Opcode::Map(MapOp::VictoryHandler)
        | Opcode::Map(MapOp::EscapeHandler)
        | Opcode::Map(MapOp::DefeatHandler) => {
            same(MapOp::EndBattle.into(), MapOp::EndBattle.into())
        }
        _ => None,
    }
}
