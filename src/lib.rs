//! # RPG Event
//!
//! An interpreter for the event scripts of tile-based role playing games.
//!
//! An event is a flat list of numbered commands whose nesting is carried
//! by an indent level. The interpreter runs a list a few commands per
//! tick, suspends whenever it has to wait on a message window, a scene,
//! a wait command or moving characters, and picks up exactly where it
//! left off on a later tick.
//!
//! Event databases are JSON. A minimal database looks like this:
//! ```
//! let db = rpgevent::data::Database::from_json(r#"{
//!     "maps": [{"id": 1, "events": [{"id": 1, "pages": [{
//!         "trigger": "auto_start",
//!         "commands": [{"code": 10110, "text": "Hello"}]
//!     }]}]}]
//! }"#).unwrap();
//! let mut runtime = rpgevent::mach::Runtime::new(db);
//! assert_eq!(runtime.execute(10), rpgevent::mach::Event::Message);
//! assert_eq!(runtime.game().message.texts, vec!["Hello".to_string()]);
//! ```
//!
//! The `rpgevent` binary plays a database in a terminal.

pub mod data;
pub mod game;
pub mod host;
#[macro_use]
pub mod lang;
pub mod mach;
