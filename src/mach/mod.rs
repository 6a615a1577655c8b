/*!
## Rust Machine Module

This Rust module runs event programs. An `Interpreter` executes one
command list cooperatively against the game state, suspending on
messages, scenes, waits and movement. A `Runtime` owns the root,
parallel and battle interpreters and drives them one tick at a time.

*/

mod base;
mod battle;
mod config;
mod continuation;
mod flow;
mod interpreter;
mod map;
mod operand;
mod runtime;

use interpreter::KeyInput;

pub use battle::troop_page_ready;
pub use config::Config;
pub use continuation::Continuation;
pub use flow::{block_exit, choices, find_label, find_loop_start, message_lines, skip_to, JumpTable};
pub use interpreter::{Context, Env, Interpreter};
pub use runtime::{Event, Runtime};

#[cfg(test)]
mod tests;
