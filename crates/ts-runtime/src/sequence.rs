use std::fmt;

use crate::command::{share, Command, SharedCommand};

/// Append-only list of commands registered under one script name.
pub struct Sequence {
    name: String,
    commands: Vec<SharedCommand>,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SharedCommand> {
        self.commands.get(index).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedCommand> {
        self.commands.iter()
    }

    /// Appends `commands` after the existing ones and returns how many were added.
    pub fn append(&mut self, commands: Vec<Box<dyn Command>>) -> usize {
        let count = commands.len();
        self.commands.extend(commands.into_iter().map(share));
        count
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .commands
            .iter()
            .map(|command| match command.try_borrow() {
                Ok(command) => command.name().to_string(),
                Err(_) => "<running>".to_string(),
            })
            .collect::<Vec<_>>();
        f.debug_struct("Sequence")
            .field("name", &self.name)
            .field("commands", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::LabelMarker;
    use std::rc::Rc;

    #[test]
    fn append_keeps_existing_positions() {
        let mut sequence = Sequence::new("main");
        assert!(sequence.is_empty());
        assert_eq!(sequence.append(vec![Box::new(LabelMarker::new("a"))]), 1);
        let first = sequence.get(0).expect("first command");

        assert_eq!(
            sequence.append(vec![
                Box::new(LabelMarker::new("b")),
                Box::new(LabelMarker::new("c")),
            ]),
            2
        );
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.name(), "main");
        assert!(Rc::ptr_eq(&first, &sequence.get(0).expect("still first")));
        assert!(sequence.get(3).is_none());
    }

    #[test]
    fn debug_lists_command_names() {
        let mut sequence = Sequence::new("main");
        sequence.append(vec![Box::new(LabelMarker::new("a"))]);
        assert_eq!(
            format!("{:?}", sequence),
            r#"Sequence { name: "main", commands: ["label"] }"#
        );
    }
}
