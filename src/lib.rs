//! Dino Gesture - an endless runner steered by hand tracking
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning)
//! - `session`: Run state machine, scoring and render snapshots
//! - `gesture`: Landmark classification and debounced gesture events
//! - `perception`: Inference backend plumbing (in-flight guard, teardown)
//! - `input`: Command vocabulary shared by gestures, keyboard and pointer
//! - `game`: Per-refresh driver wiring everything together

pub mod game;
pub mod gesture;
pub mod highscores;
pub mod input;
pub mod perception;
pub mod session;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::{HighScoreStore, JsonFileStore, MemoryStore};
pub use input::Command;
pub use session::{RenderSink, SessionController, SessionState, Snapshot};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (world units)
    pub const WORLD_WIDTH: f32 = 900.0;
    pub const WORLD_HEIGHT: f32 = 220.0;
    /// Top of the ground line; actor and obstacles rest on it
    pub const GROUND_Y: f32 = WORLD_HEIGHT - 30.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.7;
    /// Vertical velocity applied on jump (negative is up)
    pub const JUMP_VELOCITY: f32 = -12.5;

    /// Scroll speed at the start of a run
    pub const SPEED_START: f32 = 6.0;
    /// Scroll speed gained every tick (no cap)
    pub const SPEED_INC: f32 = 0.00095;

    /// Actor defaults
    pub const ACTOR_X: f32 = 60.0;
    pub const ACTOR_SIZE: f32 = 44.0;
    /// Hitbox inset on every side of the actor sprite
    pub const HITBOX_INSET: f32 = 4.0;
    /// Ticks between leg animation flips
    pub const LEG_PHASE_TICKS: u64 = 14;

    /// Spawn countdown bounds (ticks, inclusive)
    pub const SPAWN_MIN_TICKS: i32 = 40;
    pub const SPAWN_MAX_TICKS: i32 = 90;
    /// Obstacles enter this far past the right edge
    pub const SPAWN_MARGIN: f32 = 10.0;
    /// Obstacle size bounds (inclusive)
    pub const OBSTACLE_MIN_W: u32 = 10;
    pub const OBSTACLE_MAX_W: u32 = 23;
    pub const OBSTACLE_MIN_H: u32 = 20;
    pub const OBSTACLE_MAX_H: u32 = 53;
}
