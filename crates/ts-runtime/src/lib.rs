mod command;
mod engine;
mod player;
mod registry;
mod sequence;

pub use command::{
    Command, CommandKind, Continuous, ContinuousBehavior, Halt, LabelMarker, OneShot, Ready,
    SharedCommand, StopHandle,
};
pub use engine::{Engine, EngineOptions, DEFAULT_SCRIPT_NAME, DEFAULT_TICK_GUARD};
pub use player::{Player, PlayerState};
pub use registry::{Args, CommandFactory, CommandRegistry};
pub use sequence::Sequence;
