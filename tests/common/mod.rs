#![allow(dead_code)]

use rpgevent::data::Database;
use rpgevent::game::Game;
use rpgevent::host::Recorder;
use rpgevent::lang::{Command, CommandList};
use rpgevent::mach::{Context, Env, Interpreter};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub fn com(code: i32, indent: i32, params: &[i32]) -> Command {
    Command::new(code, indent, params)
}

pub fn say(code: i32, indent: i32, text: &str) -> Command {
    Command::new(code, indent, &[]).with_text(text)
}

pub fn list(commands: Vec<Command>) -> CommandList {
    CommandList::new(commands)
}

/// One interpreter with its own game, host and database.
pub struct Harness {
    pub data: Database,
    pub game: Game,
    pub host: Recorder,
    pub interpreter: Interpreter,
}

impl Harness {
    pub fn new(json: &str) -> Harness {
        Harness::with_context(json, Context::Map)
    }

    pub fn with_context(json: &str, context: Context) -> Harness {
        let data = Database::from_json(json).unwrap();
        let game = Game::with_seed(&data, 7);
        Harness {
            data,
            game,
            host: Recorder::new(),
            interpreter: Interpreter::new(context, 0, context == Context::Map),
        }
    }

    pub fn run(json: &str, commands: Vec<Command>) -> Harness {
        let mut h = Harness::new(json);
        h.bind(commands);
        h
    }

    pub fn bind(&mut self, commands: Vec<Command>) {
        let map_id = self.game.map.id;
        self.interpreter.bind(list(commands), 0, map_id);
    }

    /// One `update` followed by one tick of the world.
    pub fn tick(&mut self) {
        let mut env = Env::new(&self.data, &mut self.game, &mut self.host);
        self.interpreter.update(&mut env);
        self.game.tick(&self.data, &mut self.host);
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Answers the open message window.
    pub fn answer(&mut self, choice: i32) {
        self.game.message.choice_result = choice;
        self.game.message.close();
    }

    pub fn var(&self, id: i32) -> i32 {
        self.game.variables.get(id)
    }

    pub fn pc(&self) -> usize {
        self.interpreter.program_counter()
    }
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Warnings and errors logged while `f` runs.
pub fn capture_warnings<F: FnOnce()>(f: F) -> String {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}
