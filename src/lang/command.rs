use super::Opcode;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// ## A single event instruction
///
/// Nesting is positional. A conditional branch at indent 0 owns every
/// following command at indent 1 up to its `ElseBranch`/`EndBranch`
/// at indent 0.

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub code: i32,
    #[serde(default)]
    pub indent: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, rename = "params")]
    pub parameters: Vec<i32>,
}

impl Command {
    pub fn new(code: i32, indent: i32, parameters: &[i32]) -> Command {
        Command {
            code,
            indent,
            text: String::new(),
            parameters: parameters.to_vec(),
        }
    }

    pub fn with_text<S: Into<String>>(mut self, text: S) -> Command {
        self.text = text.into();
        self
    }

    pub fn opcode(&self) -> Opcode {
        Opcode::from(self.code)
    }

    /// Missing parameters read as zero.
    pub fn param(&self, index: usize) -> i32 {
        self.parameters.get(index).copied().unwrap_or(0)
    }

    pub fn flag(&self, index: usize) -> bool {
        self.param(index) != 0
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for _ in 0..self.indent {
            write!(f, "  ")?;
        }
        write!(f, "{}", self.opcode())?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
            write!(f, " [{}]", params.join(","))?;
        }
        if !self.text.is_empty() {
            write!(f, " {:?}", self.text)?;
        }
        Ok(())
    }
}

/// ## Shared immutable program
///
/// Cloning a `CommandList` is cheap. Interpreters and their children
/// hold their own handle to the same commands.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandList {
    commands: Rc<[Command]>,
}

impl Default for CommandList {
    fn default() -> CommandList {
        CommandList::new(vec![])
    }
}

impl CommandList {
    pub fn new(commands: Vec<Command>) -> CommandList {
        CommandList {
            commands: commands.into(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }
}

impl std::ops::Index<usize> for CommandList {
    type Output = Command;
    fn index(&self, index: usize) -> &Command {
        &self.commands[index]
    }
}

impl From<Vec<Command>> for CommandList {
    fn from(commands: Vec<Command>) -> CommandList {
        CommandList::new(commands)
    }
}

impl<'a> IntoIterator for &'a CommandList {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;
    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl Serialize for CommandList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.commands.iter())
    }
}

impl<'de> Deserialize<'de> for CommandList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Command>::deserialize(deserializer).map(CommandList::new)
    }
}
