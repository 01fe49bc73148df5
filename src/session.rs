//! Session state machine
//!
//! The single owner of the [`World`] and the only consumer of commands.
//! Everything that changes a run (starting, pausing, difficulty, game
//! over) goes through [`SessionController::apply`] or
//! [`SessionController::tick`].

use serde::{Deserialize, Serialize};

use crate::highscores::HighScoreStore;
use crate::input::Command;
use crate::sim::{Difficulty, Rect, SpawnScheduler, StepOutcome, World, advance, try_jump};

/// Top-level run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for the first start
    #[default]
    Ready,
    Running,
    Paused,
    GameOver,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Ready => "ready",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::GameOver => "game-over",
        }
    }
}

/// Read-only view handed to the renderer every refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub actor: Rect,
    pub obstacles: Vec<Rect>,
    pub score: u64,
    pub high_score: u64,
    pub state: SessionState,
    pub difficulty: Difficulty,
    /// Leg animation phase
    pub leg_phase: bool,
    /// Rising (draw the jump pose)
    pub rising: bool,
    pub tick: u64,
}

/// Output sink, called once per refresh regardless of state
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot);
}

pub struct SessionController {
    state: SessionState,
    world: World,
    spawner: SpawnScheduler,
    difficulty: Difficulty,
    pause_entry_difficulty: Difficulty,
    difficulty_changed_during_pause: bool,
    score: u64,
    high_score: u64,
    store: Box<dyn HighScoreStore>,
}

impl SessionController {
    /// Create a controller in `Ready`, reading the stored high score once
    pub fn new(
        store: Box<dyn HighScoreStore>,
        spawner: SpawnScheduler,
        difficulty: Difficulty,
    ) -> Self {
        let high_score = store.get_high_score();
        Self {
            state: SessionState::Ready,
            world: World::new(),
            spawner,
            difficulty,
            pause_entry_difficulty: difficulty,
            difficulty_changed_during_pause: false,
            score: 0,
            high_score,
            store,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Difficulty in effect when the current (or last) pause began
    pub fn pause_entry_difficulty(&self) -> Difficulty {
        self.pause_entry_difficulty
    }

    pub fn difficulty_changed_during_pause(&self) -> bool {
        self.difficulty_changed_during_pause
    }

    /// Apply a command. Returns false when the current state does not
    /// accept it; that is normal flow, not an error.
    pub fn apply(&mut self, command: Command) -> bool {
        let accepted = match (command, self.state) {
            (Command::Jump, SessionState::Running) => try_jump(&mut self.world.actor),
            (Command::StartOrRestart, SessionState::Ready | SessionState::GameOver) => {
                self.soft_reset();
                self.state = SessionState::Running;
                log::info!("Run started ({})", self.difficulty.as_str());
                true
            }
            (Command::OpenPause, SessionState::Running) => {
                self.pause_entry_difficulty = self.difficulty;
                self.difficulty_changed_during_pause = false;
                self.state = SessionState::Paused;
                log::info!("Paused at score {}", self.score);
                true
            }
            (Command::ClosePause, SessionState::Paused) => {
                if self.difficulty_changed_during_pause {
                    log::info!(
                        "Difficulty changed {} -> {}, restarting run",
                        self.pause_entry_difficulty.as_str(),
                        self.difficulty.as_str()
                    );
                    self.soft_reset();
                }
                self.difficulty_changed_during_pause = false;
                self.state = SessionState::Running;
                true
            }
            (Command::SetDifficulty(difficulty), SessionState::Paused) => {
                self.difficulty = difficulty;
                self.difficulty_changed_during_pause = true;
                true
            }
            _ => false,
        };

        if !accepted {
            log::trace!("Ignored {:?} while {}", command, self.state.as_str());
        }
        accepted
    }

    /// Advance one step if a run is live
    pub fn tick(&mut self) -> Option<StepOutcome> {
        if self.state != SessionState::Running {
            return None;
        }

        let outcome = advance(
            &mut self.world,
            self.difficulty.speed_multiplier(),
            &mut self.spawner,
        );

        if outcome.collided() {
            self.game_over();
        } else {
            self.score += 1;
        }
        Some(outcome)
    }

    pub fn snapshot(&self) -> Snapshot {
        let actor = &self.world.actor;
        Snapshot {
            actor: actor.rect(),
            obstacles: self.world.obstacles.iter().map(|o| o.rect()).collect(),
            score: self.score,
            high_score: self.high_score,
            state: self.state,
            difficulty: self.difficulty,
            leg_phase: actor.leg_phase,
            rising: actor.vy < 0.0,
            tick: self.world.tick,
        }
    }

    /// Reset world and score without touching the session state
    fn soft_reset(&mut self) {
        self.world.reset();
        self.score = 0;
    }

    fn game_over(&mut self) {
        self.state = SessionState::GameOver;
        log::info!("Game over at score {}", self.score);

        if self.score > self.high_score {
            self.high_score = self.score;
            if let Err(e) = self.store.set_high_score(self.score) {
                log::warn!("Failed to persist high score: {}", e);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
