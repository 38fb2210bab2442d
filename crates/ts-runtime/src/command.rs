use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::engine::Engine;

/// A command as stored in a sequence and referenced by players.
pub type SharedCommand = Rc<RefCell<Box<dyn Command>>>;

/// What a command is to the engine itself.
///
/// `Ready`, `Halt` and `Label` are reserved for the engine's sentinels; host
/// commands keep the default `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind<'a> {
    Action,
    Ready,
    Halt,
    Label(&'a str),
}

/// One executable step of a script.
///
/// `start` fires once per activation, `update` while unfinished, and `finish`
/// in the tick that `is_finished` first turns true.
pub trait Command {
    fn is_finished(&self) -> bool;

    /// Stops the player from advancing past this command in the tick it started.
    fn is_break(&self) -> bool {
        false
    }

    fn kind(&self) -> CommandKind<'_> {
        CommandKind::Action
    }

    fn name(&self) -> &str {
        "command"
    }

    fn init(&mut self) {}

    fn on_registered(&mut self, _engine: &mut Engine) {}

    fn start(&mut self, engine: &mut Engine);

    fn update(&mut self, _engine: &mut Engine) {}

    fn finish(&mut self, _engine: &mut Engine) {}
}

pub(crate) fn share(command: Box<dyn Command>) -> SharedCommand {
    Rc::new(RefCell::new(command))
}

/// Instantaneous command: all of its effect happens in `start`.
pub struct OneShot {
    name: String,
    effect: Box<dyn FnMut(&mut Engine)>,
}

impl OneShot {
    pub fn new(name: impl Into<String>, effect: impl FnMut(&mut Engine) + 'static) -> Self {
        Self {
            name: name.into(),
            effect: Box::new(effect),
        }
    }
}

impl fmt::Debug for OneShot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneShot").field("name", &self.name).finish()
    }
}

impl Command for OneShot {
    fn is_finished(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, engine: &mut Engine) {
        (self.effect)(engine);
    }
}

/// Shared stop flag of a [`Continuous`] command.
///
/// Clones observe the same flag, so a host callback running between ticks can
/// finish the command.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }

    fn reset(&self) {
        self.0.set(false);
    }
}

pub trait ContinuousBehavior {
    fn start(&mut self, _engine: &mut Engine, _stop: &StopHandle) {}

    fn update(&mut self, engine: &mut Engine, stop: &StopHandle);

    fn finish(&mut self, _engine: &mut Engine) {}
}

/// Command that keeps running until its stop handle is signalled.
pub struct Continuous<B> {
    name: String,
    stop: StopHandle,
    behavior: B,
}

impl<B: ContinuousBehavior> Continuous<B> {
    pub fn new(name: impl Into<String>, behavior: B) -> Self {
        Self {
            name: name.into(),
            stop: StopHandle::default(),
            behavior,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }
}

impl<B: ContinuousBehavior> Command for Continuous<B> {
    fn is_finished(&self) -> bool {
        self.stop.is_stopped()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) {
        self.stop.reset();
    }

    fn start(&mut self, engine: &mut Engine) {
        self.behavior.start(engine, &self.stop);
    }

    fn update(&mut self, engine: &mut Engine) {
        self.behavior.update(engine, &self.stop);
    }

    fn finish(&mut self, engine: &mut Engine) {
        self.behavior.finish(engine);
    }
}

/// Placeholder a fresh player starts on, so the first tick has something
/// already finished to advance past.
#[derive(Debug, Default)]
pub struct Ready;

impl Command for Ready {
    fn is_finished(&self) -> bool {
        true
    }

    fn kind(&self) -> CommandKind<'_> {
        CommandKind::Ready
    }

    fn name(&self) -> &str {
        "ready"
    }

    fn start(&mut self, _engine: &mut Engine) {}
}

/// Terminal sentinel: never finishes and does nothing.
#[derive(Debug, Default)]
pub struct Halt;

impl Command for Halt {
    fn is_finished(&self) -> bool {
        false
    }

    fn kind(&self) -> CommandKind<'_> {
        CommandKind::Halt
    }

    fn name(&self) -> &str {
        "halt"
    }

    fn start(&mut self, _engine: &mut Engine) {}
}

/// Jump target. Indexed by the engine on registration, otherwise inert.
#[derive(Debug, Clone)]
pub struct LabelMarker {
    name: String,
}

impl LabelMarker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn label_name(&self) -> &str {
        &self.name
    }
}

impl Command for LabelMarker {
    fn is_finished(&self) -> bool {
        true
    }

    fn kind(&self) -> CommandKind<'_> {
        CommandKind::Label(&self.name)
    }

    fn name(&self) -> &str {
        "label"
    }

    fn start(&mut self, _engine: &mut Engine) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        remaining: usize,
    }

    impl ContinuousBehavior for Countdown {
        fn update(&mut self, _engine: &mut Engine, stop: &StopHandle) {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                stop.stop();
            }
        }
    }

    #[test]
    fn one_shot_runs_its_effect_on_start() {
        let mut engine = Engine::new();
        let mut command = OneShot::new("set", |engine: &mut Engine| engine.set_value("hit", true));
        assert!(command.is_finished());
        command.start(&mut engine);
        assert_eq!(engine.get_value("hit").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(command.name(), "set");
    }

    #[test]
    fn continuous_finishes_only_after_stop_and_init_clears_it() {
        let mut engine = Engine::new();
        let mut command = Continuous::new("countdown", Countdown { remaining: 2 });
        command.init();
        command.start(&mut engine);
        assert!(!command.is_finished());
        command.update(&mut engine);
        assert!(!command.is_finished());
        command.update(&mut engine);
        assert!(command.is_finished());

        command.init();
        assert!(!command.is_finished());
    }

    #[test]
    fn stop_handle_is_shared_with_clones() {
        let command = Continuous::new("countdown", Countdown { remaining: 5 });
        let handle = command.stop_handle();
        assert!(!command.is_finished());
        handle.stop();
        assert!(command.is_finished());
    }

    #[test]
    fn sentinels_report_their_kind() {
        assert!(Ready.is_finished());
        assert_eq!(Ready.kind(), CommandKind::Ready);
        assert!(!Halt.is_finished());
        assert_eq!(Halt.kind(), CommandKind::Halt);
        let label = LabelMarker::new("loop");
        assert!(label.is_finished());
        assert_eq!(label.kind(), CommandKind::Label("loop"));
        assert!(!label.is_break());
    }
}
