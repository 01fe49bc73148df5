//! Command vocabulary
//!
//! Gestures, keyboard and pointer all resolve to the same [`Command`]s, so
//! the session behaves identically regardless of where input came from.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::gesture::GestureEvent;
use crate::session::SessionState;
use crate::sim::Difficulty;

/// A discrete request to the session controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Jump,
    StartOrRestart,
    OpenPause,
    ClosePause,
    SetDifficulty(Difficulty),
}

/// Binds a gesture area to a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaBinding {
    pub area: String,
    pub command: Command,
}

impl AreaBinding {
    pub fn new(area: impl Into<String>, command: Command) -> Self {
        Self {
            area: area.into(),
            command,
        }
    }
}

/// Fixed gesture → command table, enumerated at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandBindings {
    pub areas: Vec<AreaBinding>,
    pub fist: Option<Command>,
    pub raise: Option<Command>,
    pub nod: Option<Command>,
}

impl Default for CommandBindings {
    fn default() -> Self {
        Self {
            areas: vec![
                AreaBinding::new("pause", Command::OpenPause),
                AreaBinding::new("resume", Command::ClosePause),
                AreaBinding::new("easy", Command::SetDifficulty(Difficulty::Easy)),
                AreaBinding::new("hard", Command::SetDifficulty(Difficulty::Hard)),
            ],
            fist: Some(Command::StartOrRestart),
            raise: Some(Command::Jump),
            nod: Some(Command::Jump),
        }
    }
}

impl CommandBindings {
    /// Command bound to a gesture event, if any
    pub fn resolve(&self, event: &GestureEvent) -> Option<Command> {
        match event {
            GestureEvent::AreaCovered(id) => {
                self.areas.iter().find(|b| &b.area == id).map(|b| b.command)
            }
            GestureEvent::FistClosed => self.fist,
            GestureEvent::HandRaised => self.raise,
            GestureEvent::Nod => self.nod,
        }
    }

    /// Resolve a frame's events, dropping unbound ones and duplicates
    pub fn resolve_all(&self, events: &[GestureEvent]) -> Vec<Command> {
        let mut seen = HashSet::new();
        events
            .iter()
            .filter_map(|e| self.resolve(e))
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

/// Keyboard fallback, keyed by `KeyboardEvent.code` style names
pub fn command_for_key(code: &str) -> Option<Command> {
    match code {
        "Space" | "ArrowUp" => Some(Command::Jump),
        "Enter" => Some(Command::StartOrRestart),
        "Escape" | "KeyP" => Some(Command::OpenPause),
        "KeyR" => Some(Command::ClosePause),
        "Digit1" => Some(Command::SetDifficulty(Difficulty::Easy)),
        "Digit2" => Some(Command::SetDifficulty(Difficulty::Hard)),
        _ => None,
    }
}

/// Pointer fallback: start when idle, otherwise jump
pub fn command_for_pointer(state: SessionState) -> Command {
    match state {
        SessionState::Ready | SessionState::GameOver => Command::StartOrRestart,
        SessionState::Paused => Command::ClosePause,
        SessionState::Running => Command::Jump,
    }
}
