// src/gcode/mod.rs
pub mod command;
pub mod dispatcher;
pub mod tool;

pub use command::{CommandError, GCodeHandler};
pub use dispatcher::Dispatcher;

use std::collections::HashMap;

/// A parsed G-code command as handed over by the external parser: the
/// command code plus its letter-keyed parameters. Handlers that take no
/// operands simply ignore the parameter map.
#[derive(Debug, Clone)]
pub struct GCodeCommand {
    pub command: String,
    pub parameters: HashMap<String, String>,
}

impl GCodeCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            parameters: HashMap::new(),
        }
    }

    pub fn with_parameter(mut self, letter: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(letter.into(), value.into());
        self
    }
}
