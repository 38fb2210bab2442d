use std::collections::BTreeMap;

use ts_core::{qualify_label, Label, TickScriptError, Value};

use crate::command::{Command, CommandKind, SharedCommand};
use crate::player::Player;
use crate::sequence::Sequence;

mod callstack;
mod step;

pub const DEFAULT_SCRIPT_NAME: &str = "main";
pub const DEFAULT_TICK_GUARD: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Script name used by `register` when none is given.
    pub default_script: String,
    /// Maximum number of commands started within a single tick.
    pub tick_guard: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_script: DEFAULT_SCRIPT_NAME.to_string(),
            tick_guard: DEFAULT_TICK_GUARD,
        }
    }
}

/// Owns every sequence, the label index, the value store, the active player
/// and the players suspended by `gosub`.
#[derive(Debug, Default)]
pub struct Engine {
    options: EngineOptions,
    sequences: BTreeMap<String, Sequence>,
    labels: BTreeMap<String, Label>,
    values: BTreeMap<String, Value>,
    player: Option<Player>,
    call_stack: Vec<Player>,
    ticking: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Appends `commands` to the named sequence, creating it on first use.
    ///
    /// Labels of the whole sequence are re-indexed and `on_registered` fires
    /// again on every command of the sequence, including earlier ones.
    pub fn register(&mut self, commands: Vec<Box<dyn Command>>, script_name: Option<&str>) {
        let script_name = script_name
            .unwrap_or(self.options.default_script.as_str())
            .to_string();
        let sequence = self
            .sequences
            .entry(script_name.clone())
            .or_insert_with(|| Sequence::new(script_name.clone()));
        let appended = sequence.append(commands);
        let registered = sequence.iter().cloned().collect::<Vec<_>>();

        if self.player.is_none() {
            self.player = Some(Player::new(script_name.clone(), 0));
        }

        let indexed = self.index_labels(&script_name, &registered);
        tracing::debug!(
            script = %script_name,
            appended,
            total = registered.len(),
            labels = indexed,
            "registered commands"
        );

        for command in &registered {
            match command.try_borrow_mut() {
                Ok(mut command) => command.on_registered(self),
                Err(_) => tracing::warn!(
                    script = %script_name,
                    "skipping on_registered for a command that is currently executing"
                ),
            }
        }
    }

    fn index_labels(&mut self, script_name: &str, commands: &[SharedCommand]) -> usize {
        let mut indexed = 0;
        for (index, command) in commands.iter().enumerate() {
            let Ok(command) = command.try_borrow() else {
                continue;
            };
            if let CommandKind::Label(label_name) = command.kind() {
                let label = Label {
                    script_name: script_name.to_string(),
                    label_name: label_name.to_string(),
                    index,
                };
                self.labels.insert(label.full_name(), label);
                indexed += 1;
            }
        }
        indexed
    }

    pub fn sequence(&self, script_name: &str) -> Option<&Sequence> {
        self.sequences.get(script_name)
    }

    pub fn script_names(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }

    /// Looks a label up, qualifying bare names against the active script.
    pub fn get_label(&self, name: &str) -> Option<Label> {
        let full_name = qualify_label(self.current_script(), name);
        self.labels.get(&full_name).cloned()
    }

    /// The `(script, index)` pair a jump to `name` should use.
    pub fn resolve_label(&self, name: &str) -> Option<(String, usize)> {
        self.get_label(name)
            .map(|label| (label.script_name, label.index))
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.values()
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_value_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    pub fn remove_value(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// True once the active player reached its halt sentinel, and before any
    /// script has been registered.
    pub fn is_halted(&self) -> bool {
        self.player.as_ref().map_or(true, Player::is_halted)
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn active_script(&self) -> Option<&str> {
        self.player.as_ref().map(Player::script_name)
    }

    pub fn program_counter(&self) -> Option<usize> {
        self.player.as_ref().and_then(Player::program_counter)
    }

    fn current_script(&self) -> &str {
        self.active_script()
            .unwrap_or(self.options.default_script.as_str())
    }

    fn active_player(&self) -> Result<&Player, TickScriptError> {
        self.player
            .as_ref()
            .ok_or_else(|| TickScriptError::new("ENGINE_NO_PLAYER", "No script registered yet."))
    }

    fn active_player_mut(&mut self) -> Result<&mut Player, TickScriptError> {
        self.player
            .as_mut()
            .ok_or_else(|| TickScriptError::new("ENGINE_NO_PLAYER", "No script registered yet."))
    }
}
