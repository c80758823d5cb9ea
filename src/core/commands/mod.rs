// src/core/commands/mod.rs

//! Parsed client commands. A `Command` is the immutable `(name, arguments)`
//! pair produced from one protocol line; `CommandKind` carries the static
//! metadata used to validate and route it.

pub mod command_spec;

pub use command_spec::{Arity, CommandKind};

use crate::core::protocol::tokenize;

/// One parsed line of client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Tokenizes a line; the first token is the command name. A blank line
    /// yields a command with an empty name, which no handler accepts.
    pub fn from_line(line: &str) -> Self {
        let mut tokens = tokenize(line).into_iter();
        let name = tokens.next().unwrap_or_default();
        Self {
            name,
            args: tokens.collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The recognised command, if the name matches one.
    pub fn kind(&self) -> Option<CommandKind> {
        CommandKind::from_name(&self.name)
    }
}
