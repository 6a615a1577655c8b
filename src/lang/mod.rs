/*!
# Rust Language Module

This Rust module holds the static side of an event program:
commands, the lists that own them, and the opcode set.

*/

#[macro_use]
mod error;
mod command;
mod opcode;

pub use command::Command;
pub use command::CommandList;
pub use error::Error;
pub use error::ErrorCode;
pub use opcode::BattleOp;
pub use opcode::MapOp;
pub use opcode::Opcode;
pub use opcode::SharedOp;

#[cfg(test)]
mod tests;
