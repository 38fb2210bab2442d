use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TickScriptError;

/// Separator between the script part and the label part of a qualified label name.
pub const LABEL_SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A literal argument as written in script text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    String(String),
    Number(f64),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::String(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub script_name: String,
    pub label_name: String,
    pub index: usize,
}

impl Label {
    pub fn full_name(&self) -> String {
        qualify_label(&self.script_name, &self.label_name)
    }
}

/// Qualifies `name` against `script_name` unless it already carries a separator.
pub fn qualify_label(script_name: &str, name: &str) -> String {
    if name.contains(LABEL_SEPARATOR) {
        name.to_string()
    } else {
        format!("{}{}{}", script_name, LABEL_SEPARATOR, name)
    }
}

/// Name to factory lookup used while parsing.
///
/// The parser only needs to know whether a name exists and how to turn the
/// collected literals into whatever the host calls a command.
pub trait CommandFactoryTable {
    type Command;

    fn contains(&self, name: &str) -> bool;

    fn create(&self, name: &str, args: &[Literal]) -> Result<Self::Command, TickScriptError>;
}
