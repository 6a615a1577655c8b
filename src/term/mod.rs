use crate::Cli;
use ansi_term::Style;
use linefeed::{DefaultTerminal, Interface, ReadResult};
use rpgevent::data::Database;
use rpgevent::error;
use rpgevent::game::BattleResult;
use rpgevent::lang::Error;
use rpgevent::mach::{Event, Runtime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Result<T> = std::result::Result<T, Error>;

pub fn main(cli: Cli) {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!(%error, "no Ctrl-C handler");
    }
    let data = match load(&cli) {
        Ok(data) => data,
        Err(error) => {
            eprintln!("{}", Style::new().bold().paint(error.to_string()));
            return;
        }
    };
    if let Err(error) = main_loop(Runtime::new(data), cli.ticks, interrupted) {
        eprintln!("{}", Style::new().bold().paint(Error::from(error).to_string()));
    }
}

fn load(cli: &Cli) -> Result<Database> {
    let mut data = Database::load(&cli.database)?;
    if let Some(fps) = cli.fps {
        if fps == 0 {
            return Err(error!(InvalidConfig; "--fps must be positive"));
        }
        data.config.fps = fps;
    }
    Ok(data)
}

/// Yes-or-no and numbered answers all go through one prompt.
struct Terminal {
    interface: Interface<DefaultTerminal>,
}

impl Terminal {
    fn new() -> std::io::Result<Terminal> {
        Ok(Terminal {
            interface: Interface::new("rpgevent")?,
        })
    }

    fn say(&self, text: &str) -> std::io::Result<()> {
        self.interface.write_fmt(format_args!("{}\n", text))
    }

    fn bold(&self, text: &str) -> std::io::Result<()> {
        self.say(&Style::new().bold().paint(text).to_string())
    }

    fn dim(&self, text: &str) -> std::io::Result<()> {
        self.say(&Style::new().dimmed().paint(text).to_string())
    }

    /// `None` on end of input.
    fn ask(&self, prompt: &str) -> std::io::Result<Option<String>> {
        self.interface.set_prompt(prompt)?;
        match self.interface.read_line()? {
            ReadResult::Input(line) => {
                if !line.trim().is_empty() {
                    self.interface.add_history_unique(line.clone());
                }
                Ok(Some(line.trim().to_string()))
            }
            ReadResult::Signal(_) | ReadResult::Eof => Ok(None),
        }
    }

    fn ask_number(&self, prompt: &str) -> std::io::Result<Option<i32>> {
        loop {
            let line = match self.ask(prompt)? {
                Some(line) => line,
                None => return Ok(None),
            };
            match line.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.dim("a number, please")?,
            }
        }
    }
}

fn main_loop(mut runtime: Runtime, ticks: usize, interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let term = Terminal::new()?;
    let title = &runtime.data().system.title;
    if !title.is_empty() {
        term.bold(title)?;
    }

    loop {
        if interrupted.load(Ordering::SeqCst) {
            runtime.interrupt();
            interrupted.store(false, Ordering::SeqCst);
            term.bold("INTERRUPTED")?;
        }
        let event = runtime.execute(ticks);
        for effect in runtime.host_mut().drain() {
            term.dim(&format!("~ {:?}", effect))?;
        }
        let done = match event {
            Event::Running => false,
            Event::Idle => idle(&term, &mut runtime)?,
            Event::Message => message(&term, &mut runtime)?,
            Event::Shop => shop(&term, &mut runtime)?,
            Event::Battle => {
                runtime.begin_battle();
                if let Some(troop) = runtime.game().troop.as_ref() {
                    let names: Vec<_> = troop.enemies.iter().map(|e| e.name.as_str()).collect();
                    term.bold(&format!("BATTLE: {}", names.join(", ")))?;
                }
                false
            }
            Event::BattleTurn => battle_turn(&term, &mut runtime)?,
            Event::EnterName => {
                let actor_id = runtime.game().scene.name.actor_id;
                let current = runtime
                    .game()
                    .actors
                    .get(actor_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_default();
                match term.ask(&format!("Name [{}]: ", current))? {
                    Some(name) if !name.is_empty() => {
                        runtime.finish_name(&name);
                        false
                    }
                    Some(_) => {
                        runtime.finish_name(&current);
                        false
                    }
                    None => true,
                }
            }
            Event::Menu => {
                term.dim("(menu)")?;
                runtime.close_scene();
                false
            }
            Event::Save => {
                term.dim("(saved)")?;
                runtime.close_scene();
                false
            }
            Event::Title => {
                term.bold("RETURN TO TITLE")?;
                true
            }
            Event::GameOver => {
                term.bold("GAME OVER")?;
                true
            }
        };
        if done {
            break;
        }
    }
    Ok(())
}

/// Nothing is running: let the player poke an event or quit.
fn idle(term: &Terminal, runtime: &mut Runtime) -> std::io::Result<bool> {
    loop {
        let line = match term.ask("> ")? {
            Some(line) => line,
            None => return Ok(true),
        };
        let mut words = line.split_whitespace();
        match (words.next(), words.next().and_then(|w| w.parse::<i32>().ok())) {
            (Some("talk"), Some(id)) => {
                if !runtime.interact(id) {
                    term.dim("nobody answers")?;
                    continue;
                }
                return Ok(false);
            }
            (Some("wait"), _) | (None, _) => return Ok(false),
            (Some("events"), _) => {
                for event in runtime.game().map.events.values() {
                    term.say(&format!("{:>4} ({},{}) page {}", event.id, event.x, event.y, event.page))?;
                }
            }
            (Some("party"), _) => {
                let game = runtime.game();
                for actor in game.party_actors() {
                    term.say(&format!("{} Lv{} HP {}/{}", actor.name, actor.level, actor.hp, actor.max_hp))?;
                }
                term.say(&format!("{} {}", game.party.gold, runtime.data().terms.gold))?;
            }
            (Some("var"), Some(id)) => term.say(&runtime.game().variables.get(id).to_string())?,
            (Some("switch"), Some(id)) => term.say(&runtime.game().switches.get(id).to_string())?,
            (Some("quit"), _) => return Ok(true),
            _ => term.dim("talk N | wait | events | party | var N | switch N | quit")?,
        }
    }
}

fn message(term: &Terminal, runtime: &mut Runtime) -> std::io::Result<bool> {
    let message = runtime.game().message.clone();
    let body_end = message.choice_start.or(message.num_input_start).unwrap_or(message.texts.len());
    for line in message.texts.iter().take(body_end) {
        term.say(line)?;
    }
    if message.has_choices() {
        for (index, choice) in message.choices().iter().enumerate() {
            let disabled = message.choice_disabled.get(index).copied().unwrap_or(false);
            let text = format!("  {}) {}", index + 1, choice);
            if disabled {
                term.dim(&text)?;
            } else {
                term.say(&text)?;
            }
        }
        loop {
            let answer = match term.ask_number("? ")? {
                Some(answer) => answer,
                None => return Ok(true),
            };
            if answer == 0 && message.choice_cancel_type > 0 {
                let cancel = match message.choice_cancel_type {
                    5 => 4,
                    index => index - 1,
                };
                runtime.close_message(Some(cancel));
                return Ok(false);
            }
            let index = answer - 1;
            let usable = index >= 0
                && (index as usize) < message.choice_max
                && !message.choice_disabled.get(index as usize).copied().unwrap_or(false);
            if usable {
                runtime.close_message(Some(index));
                return Ok(false);
            }
            term.dim("not a choice")?;
        }
    }
    if message.num_input_start.is_some() {
        let digits = message.num_input_digits.max(1) as u32;
        let max = 10i32.saturating_pow(digits) - 1;
        return match term.ask_number(&format!("({} digits) ", digits))? {
            Some(value) => {
                runtime.submit_number(value.max(0).min(max));
                Ok(false)
            }
            None => Ok(true),
        };
    }
    if term.ask("")?.is_none() {
        return Ok(true);
    }
    runtime.close_message(None);
    Ok(false)
}

fn shop(term: &Terminal, runtime: &mut Runtime) -> std::io::Result<bool> {
    let request = runtime.game().scene.shop.clone();
    let gold = &runtime.data().terms.gold;
    term.bold("SHOP")?;
    for id in &request.goods {
        match runtime.data().item(*id) {
            Some(item) => term.say(&format!("  {:>4} {} {} {}", id, item.name, item.price, gold))?,
            None => term.dim(&format!("  {:>4} ?", id))?,
        }
    }
    let mut purchases = vec![];
    if request.buys {
        loop {
            let line = match term.ask("buy ITEM COUNT (empty to leave): ")? {
                Some(line) => line,
                None => return Ok(true),
            };
            if line.is_empty() {
                break;
            }
            let numbers: Vec<i32> = line.split_whitespace().filter_map(|w| w.parse().ok()).collect();
            match numbers.as_slice() {
                [item] if request.goods.contains(item) => purchases.push((*item, 1)),
                [item, count] if request.goods.contains(item) => purchases.push((*item, *count)),
                _ => term.dim("not for sale")?,
            }
        }
    }
    runtime.finish_shop(&purchases);
    Ok(false)
}

fn battle_turn(term: &Terminal, runtime: &mut Runtime) -> std::io::Result<bool> {
    if let Some(troop) = runtime.game().troop.as_ref() {
        for (index, enemy) in troop.enemies.iter().enumerate().filter(|(_, e)| !e.hidden) {
            term.say(&format!("  {}: {} HP {}/{}", index, enemy.name, enemy.hp, enemy.max_hp))?;
        }
    }
    loop {
        let line = match term.ask("[n]ext turn, [w]in, [e]scape, [l]ose: ")? {
            Some(line) => line,
            None => return Ok(true),
        };
        match line.as_str() {
            "n" => runtime.next_turn(),
            "w" => runtime.end_battle(BattleResult::Victory),
            "e" => runtime.end_battle(BattleResult::Escape),
            "l" => runtime.end_battle(BattleResult::Defeat),
            _ => continue,
        }
        return Ok(false);
    }
}
