use std::rc::Rc;

use ts_core::TickScriptError;

use crate::command::SharedCommand;

use super::Engine;

impl Engine {
    /// Advances the active player by one tick.
    ///
    /// When that tick halts a player started by `gosub`, the caller is
    /// restored and continues on the next tick.
    pub fn run(&mut self) -> Result<(), TickScriptError> {
        if self.player.is_none() {
            return Ok(());
        }
        if self.ticking {
            return Err(TickScriptError::new(
                "ENGINE_REENTRANT_RUN",
                "run() was called from inside a running command.",
            ));
        }

        self.ticking = true;
        let result = self.tick();
        self.ticking = false;
        result?;

        if self.is_halted() {
            self.return_from_subroutine();
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<(), TickScriptError> {
        let mut started = 0usize;

        loop {
            let current = self.active_player()?.current();
            if !current.borrow().is_finished() {
                break;
            }
            // Stopped from outside a tick, e.g. through a StopHandle.
            if self.active_player_mut()?.take_pending_finish() {
                self.finish_command(&current);
            }

            let (script_name, index) = {
                let player = self.active_player()?;
                (player.script_name().to_string(), player.next_index())
            };
            let sequence = self.sequences.get(&script_name).ok_or_else(|| {
                TickScriptError::new(
                    "ENGINE_SCRIPT_NOT_FOUND",
                    format!("Script \"{}\" not found.", script_name),
                )
            })?;

            let Some(command) = sequence.get(index) else {
                self.active_player_mut()?.halt();
                tracing::debug!(script = %script_name, index, "player halted");
                return Ok(());
            };

            started += 1;
            if started > self.options.tick_guard {
                return Err(TickScriptError::new(
                    "ENGINE_TICK_GUARD",
                    format!(
                        "More than {} commands started in one tick.",
                        self.options.tick_guard
                    ),
                ));
            }

            self.active_player_mut()?
                .activate(index, Rc::clone(&command));
            let (finished, is_break) = {
                let mut active = command.borrow_mut();
                tracing::trace!(script = %script_name, index, command = active.name(), "start");
                active.init();
                active.start(self);
                (active.is_finished(), active.is_break())
            };
            if finished {
                self.finish_command(&command);
            }
            if is_break {
                break;
            }
        }

        let current = self.active_player()?.current();
        let updated = {
            let Ok(mut active) = current.try_borrow_mut() else {
                return Ok(());
            };
            if active.is_finished() {
                return Ok(());
            }
            active.update(self);
            active.is_finished()
        };
        if updated {
            self.finish_command(&current);
        }
        Ok(())
    }

    /// Calls `finish` and settles the flag of whichever player holds `command`,
    /// which is no longer the active one after a `gosub` from inside it.
    fn finish_command(&mut self, command: &SharedCommand) {
        if let Some(holder) = self
            .player
            .iter_mut()
            .chain(self.call_stack.iter_mut().rev())
            .find(|player| player.holds(command))
        {
            holder.take_pending_finish();
        }

        let Ok(mut active) = command.try_borrow_mut() else {
            return;
        };
        tracing::trace!(command = active.name(), "finish");
        active.finish(self);
    }
}
