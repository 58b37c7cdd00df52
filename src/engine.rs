//! Audio engine seam.
//!
//! The session never produces sound itself. It drives an [`AudioEngine`]:
//! parameters are applied, then the engine is started on pointer press and
//! stopped on release. `stop` must be safe to call at any time.

use serde::Serialize;

use crate::playback::SynthesisParams;

pub trait AudioEngine {
    /// Push new synthesis parameters. Called before `start` and on every
    /// frame while running.
    fn apply(&mut self, params: &SynthesisParams);

    fn start(&mut self);

    /// Stop playback. Idempotent, valid even if never started.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// A command for an engine living on the other side of a boundary
/// (e.g. a Web Audio graph driven from JavaScript).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EngineCommand {
    Apply { params: SynthesisParams },
    Start,
    Stop,
}

/// Records engine commands for a host to replay.
///
/// Consecutive `apply` commands collapse into the latest one, so a host
/// that drains once per frame only sees the final parameters.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<EngineCommand>,
    running: bool,
}

impl CommandQueue {
    pub fn new() -> Self {
        CommandQueue::default()
    }

    /// Take all pending commands in order.
    pub fn drain(&mut self) -> Vec<EngineCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn pending(&self) -> &[EngineCommand] {
        &self.commands
    }
}

impl AudioEngine for CommandQueue {
    fn apply(&mut self, params: &SynthesisParams) {
        if let Some(EngineCommand::Apply { params: last }) = self.commands.last_mut() {
            *last = *params;
        } else {
            self.commands.push(EngineCommand::Apply { params: *params });
        }
    }

    fn start(&mut self) {
        self.running = true;
        self.commands.push(EngineCommand::Start);
    }

    fn stop(&mut self) {
        self.running = false;
        self.commands.push(EngineCommand::Stop);
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
