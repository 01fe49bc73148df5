//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - One fixed step per call
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering, timing or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{collide, first_collision};
pub use spawn::SpawnScheduler;
pub use state::{Actor, Difficulty, Obstacle, Rect, World};
pub use tick::{StepOutcome, advance, try_jump};
