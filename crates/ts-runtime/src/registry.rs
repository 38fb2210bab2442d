use std::collections::BTreeMap;
use std::fmt;

use ts_core::{CommandFactoryTable, Literal, TickScriptError};

use crate::command::Command;

pub type CommandFactory = Box<dyn Fn(&Args<'_>) -> Result<Box<dyn Command>, TickScriptError>>;

/// Typed name to factory table handed to the parser.
#[derive(Default)]
pub struct CommandRegistry {
    factories: BTreeMap<String, CommandFactory>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Args<'_>) -> Result<Box<dyn Command>, TickScriptError> + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Args<'_>) -> Result<Box<dyn Command>, TickScriptError> + 'static,
    {
        self.register(name, factory);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

impl CommandFactoryTable for CommandRegistry {
    type Command = Box<dyn Command>;

    fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    fn create(&self, name: &str, args: &[Literal]) -> Result<Self::Command, TickScriptError> {
        let factory = self.factories.get(name).ok_or_else(|| {
            TickScriptError::new(
                "PARSE_UNSUPPORTED_COMMAND",
                format!("unsupported command \"{}\"", name),
            )
        })?;
        factory(&Args::new(name, args))
    }
}

/// Arguments of one call, with arity and type checks for factories.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    command: &'a str,
    values: &'a [Literal],
}

impl<'a> Args<'a> {
    pub fn new(command: &'a str, values: &'a [Literal]) -> Self {
        Self { command, values }
    }

    pub fn command(&self) -> &'a str {
        self.command
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &'a [Literal] {
        self.values
    }

    pub fn expect_len(&self, expected: usize) -> Result<(), TickScriptError> {
        self.expect_range(expected, expected)
    }

    pub fn expect_range(&self, min: usize, max: usize) -> Result<(), TickScriptError> {
        let count = self.values.len();
        if (min..=max).contains(&count) {
            return Ok(());
        }
        let expected = if min == max {
            format!("{} argument{}", min, if min == 1 { "" } else { "s" })
        } else {
            format!("{} to {} arguments", min, max)
        };
        Err(TickScriptError::new(
            "COMMAND_ARG_COUNT",
            format!("{} expects {}, got {}.", self.command, expected, count),
        ))
    }

    pub fn literal(&self, index: usize) -> Result<&'a Literal, TickScriptError> {
        self.values.get(index).ok_or_else(|| {
            TickScriptError::new(
                "COMMAND_ARG_COUNT",
                format!(
                    "{} is missing argument {}.",
                    self.command,
                    index + 1
                ),
            )
        })
    }

    pub fn string(&self, index: usize) -> Result<&'a str, TickScriptError> {
        let literal = self.literal(index)?;
        literal
            .as_str()
            .ok_or_else(|| self.type_error(index, "string", literal))
    }

    pub fn number(&self, index: usize) -> Result<f64, TickScriptError> {
        let literal = self.literal(index)?;
        literal
            .as_number()
            .ok_or_else(|| self.type_error(index, "number", literal))
    }

    pub fn optional_string(&self, index: usize) -> Result<Option<&'a str>, TickScriptError> {
        if index >= self.values.len() {
            return Ok(None);
        }
        self.string(index).map(Some)
    }

    pub fn optional_number(&self, index: usize) -> Result<Option<f64>, TickScriptError> {
        if index >= self.values.len() {
            return Ok(None);
        }
        self.number(index).map(Some)
    }

    fn type_error(&self, index: usize, expected: &str, actual: &Literal) -> TickScriptError {
        TickScriptError::new(
            "COMMAND_ARG_TYPE",
            format!(
                "Argument {} of {} must be a {}, got {}.",
                index + 1,
                self.command,
                expected,
                actual.type_name()
            ),
        )
    }
}
