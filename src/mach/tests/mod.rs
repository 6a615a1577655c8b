use super::*;
use crate::data::Database;
use crate::game::Game;
use crate::host::Recorder;
use crate::lang::{Command, CommandList};

mod battle_test;
mod flow_test;
mod interpreter_test;

fn com(code: i32, indent: i32, params: &[i32]) -> Command {
    Command::new(code, indent, params)
}

struct Machine {
    data: Database,
    game: Game,
    host: Recorder,
    interpreter: Interpreter,
}

impl Machine {
    fn new(commands: Vec<Command>) -> Machine {
        Machine::with_context("{}", Context::Map, commands)
    }

    fn with_context(json: &str, context: Context, commands: Vec<Command>) -> Machine {
        let data = Database::from_json(json).unwrap();
        let game = Game::with_seed(&data, 1);
        let mut interpreter = Interpreter::new(context, 0, context == Context::Map);
        interpreter.bind(CommandList::new(commands), 0, game.map.id);
        Machine {
            data,
            game,
            host: Recorder::new(),
            interpreter,
        }
    }

    fn update(&mut self) {
        let mut env = Env::new(&self.data, &mut self.game, &mut self.host);
        self.interpreter.update(&mut env);
    }
}
