use std::fmt;
use std::rc::Rc;

use crate::command::{share, CommandKind, Halt, Ready, SharedCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Ready,
    Running(usize),
    Halted,
}

/// Cursor over one sequence, referenced by script name.
///
/// `program_counter` is the index of the last started command, or `None`
/// before the first one.
pub struct Player {
    script_name: String,
    program_counter: Option<usize>,
    state: PlayerState,
    current: SharedCommand,
    finish_pending: bool,
}

impl Player {
    /// A player whose next tick starts the command at `index`.
    pub fn new(script_name: impl Into<String>, index: usize) -> Self {
        Self {
            script_name: script_name.into(),
            program_counter: index.checked_sub(1),
            state: PlayerState::Ready,
            current: share(Box::new(Ready)),
            finish_pending: false,
        }
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    pub fn program_counter(&self) -> Option<usize> {
        self.program_counter
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == PlayerState::Halted
    }

    pub fn current(&self) -> SharedCommand {
        Rc::clone(&self.current)
    }

    pub(crate) fn next_index(&self) -> usize {
        self.program_counter.map_or(0, |counter| counter + 1)
    }

    pub(crate) fn activate(&mut self, index: usize, command: SharedCommand) {
        let halts = command
            .try_borrow()
            .map(|command| command.kind() == CommandKind::Halt)
            .unwrap_or(false);
        self.program_counter = Some(index);
        self.state = if halts {
            PlayerState::Halted
        } else {
            PlayerState::Running(index)
        };
        self.current = command;
        self.finish_pending = true;
    }

    pub(crate) fn halt(&mut self) {
        self.state = PlayerState::Halted;
        self.current = share(Box::new(Halt));
        self.finish_pending = false;
    }

    pub(crate) fn holds(&self, command: &SharedCommand) -> bool {
        Rc::ptr_eq(&self.current, command)
    }

    /// Whether `finish` is still owed to the current command; clears the flag.
    pub(crate) fn take_pending_finish(&mut self) -> bool {
        std::mem::take(&mut self.finish_pending)
    }

    pub(crate) fn reset(&mut self, script_name: impl Into<String>, index: usize) {
        *self = Self::new(script_name, index);
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = match self.current.try_borrow() {
            Ok(command) => command.name().to_string(),
            Err(_) => "<running>".to_string(),
        };
        f.debug_struct("Player")
            .field("script_name", &self.script_name)
            .field("program_counter", &self.program_counter)
            .field("state", &self.state)
            .field("current", &current)
            .finish()
    }
}
