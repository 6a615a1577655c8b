use super::{flow, Env, Interpreter};
use crate::lang::SharedOp;

/// ## Work a command left unfinished
///
/// A handler that has to wait on a scene or the message window stores
/// one of these and suspends. The next productive `update` resumes the
/// command here instead of dispatching it again. Nothing is captured:
/// each variant reads back what it needs from game state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    OpenShop,
    ShowInnStart,
    ShowInnContinue,
    ShowInnFinish,
    EnemyEncounter,
    Choices,
    /// Title, save, menu and game over: step past the command.
    Default,
}

impl Interpreter {
    /// `true` continues this tick, `false` suspends. Resumers that need
    /// another tick store a continuation again before returning `false`.
    pub(super) fn resume(&mut self, env: &mut Env, continuation: Continuation) -> bool {
        tracing::trace!(?continuation, pc = self.pc, "resume");
        match continuation {
            Continuation::OpenShop => self.continue_open_shop(env),
            Continuation::ShowInnStart => self.continue_inn_start(env),
            Continuation::ShowInnContinue => self.continue_inn_continue(env),
            Continuation::ShowInnFinish => self.continue_inn_finish(env),
            Continuation::EnemyEncounter => self.continue_enemy_encounter(env),
            Continuation::Choices => self.continue_choices(env),
            Continuation::Default => {
                self.advance();
                true
            }
        }
    }

    /// Lands after the `ShowChoiceOption` whose index matches the result,
    /// or after `ShowChoiceEnd` when none does.
    fn continue_choices(&mut self, env: &mut Env) -> bool {
        let list = self.list.clone();
        let indent = match list.get(self.pc) {
            Some(cmd) => cmd.indent,
            None => return true,
        };
        let result = env.game.message.choice_result;
        let mut from = self.pc + 1;
        loop {
            let found = flow::skip_to(
                list.as_slice(),
                from,
                SharedOp::ShowChoiceOption.into(),
                SharedOp::ShowChoiceEnd.into(),
                indent,
                indent,
            );
            match found {
                Some(index) => {
                    let cmd = &list[index];
                    if cmd.code == SharedOp::ShowChoiceEnd.code() || cmd.param(0) == result {
                        self.pc = index;
                        break;
                    }
                    from = index + 1;
                }
                None => break,
            }
        }
        self.advance();
        true
    }
}
