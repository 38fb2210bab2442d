use crate::player::Player;

use super::Engine;

impl Engine {
    /// Moves the active player to `index` of `script_name` (default: its own
    /// script). The previous position is dropped.
    pub fn goto(&mut self, index: usize, script_name: Option<&str>) {
        let script_name = self.jump_target(script_name);
        tracing::debug!(script = %script_name, index, "goto");
        match self.player.as_mut() {
            Some(player) => player.reset(script_name, index),
            None => self.player = Some(Player::new(script_name, index)),
        }
    }

    /// Suspends the active player and starts a new one at `index` of
    /// `script_name` (default: the caller's script).
    pub fn gosub(&mut self, index: usize, script_name: Option<&str>) {
        let script_name = self.jump_target(script_name);
        tracing::debug!(
            script = %script_name,
            index,
            depth = self.call_stack.len() + 1,
            "gosub"
        );
        let callee = Player::new(script_name, index);
        if let Some(caller) = self.player.replace(callee) {
            self.call_stack.push(caller);
        }
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    pub(super) fn return_from_subroutine(&mut self) {
        let Some(caller) = self.call_stack.pop() else {
            return;
        };
        tracing::debug!(
            script = %caller.script_name(),
            counter = ?caller.program_counter(),
            depth = self.call_stack.len(),
            "return from subroutine"
        );
        self.player = Some(caller);
    }

    fn jump_target(&self, script_name: Option<&str>) -> String {
        script_name
            .unwrap_or_else(|| self.current_script())
            .to_string()
    }
}
