//! World state and core simulation types
//!
//! Everything a tick mutates lives in [`World`]. The session controller owns
//! the only instance.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Shrink by `margin` on all four sides
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            w: (self.w - 2.0 * margin).max(0.0),
            h: (self.h - 2.0 * margin).max(0.0),
        }
    }
}

/// Run difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    /// Multiplier applied to obstacle scroll distance
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Hard => "hard",
        }
    }
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Vertical velocity (negative is up)
    pub vy: f32,
    pub grounded: bool,
    /// Which leg is drawn forward; flips while running on the ground
    pub leg_phase: bool,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            x: ACTOR_X,
            y: GROUND_Y - ACTOR_SIZE,
            w: ACTOR_SIZE,
            h: ACTOR_SIZE,
            vy: 0.0,
            grounded: true,
            leg_phase: true,
        }
    }
}

impl Actor {
    /// Visual rectangle
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Collision rectangle, smaller than the sprite for forgiving hits
    pub fn hitbox(&self) -> Rect {
        self.rect().inset(HITBOX_INSET)
    }
}

/// An obstacle scrolling toward the actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Obstacle {
    /// Obstacle of the given size resting on the ground at `x`
    pub fn grounded(x: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y: GROUND_Y - h,
            w,
            h,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// True once the obstacle has fully left the left edge
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.x + self.w <= 0.0
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub actor: Actor,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub scroll_speed: f32,
    /// Ticks simulated since the last reset
    pub tick: u64,
    /// Ticks until the next spawn; spawns when it reaches zero
    pub spawn_countdown: i32,
}

impl Default for World {
    fn default() -> Self {
        Self {
            actor: Actor::default(),
            obstacles: Vec::new(),
            scroll_speed: SPEED_START,
            tick: 0,
            spawn_countdown: 0,
        }
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore run defaults in place
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_actor_rests_on_ground() {
        let world = World::new();
        assert_eq!(world.actor.y + world.actor.h, GROUND_Y);
        assert!(world.actor.grounded);
        assert_eq!(world.actor.vy, 0.0);
    }

    #[test]
    fn test_hitbox_is_inset() {
        let actor = Actor::default();
        let hb = actor.hitbox();
        assert_eq!(hb.x, actor.x + HITBOX_INSET);
        assert_eq!(hb.y, actor.y + HITBOX_INSET);
        assert_eq!(hb.w, actor.w - 2.0 * HITBOX_INSET);
        assert_eq!(hb.h, actor.h - 2.0 * HITBOX_INSET);
    }

    #[test]
    fn test_inset_never_negative() {
        let r = Rect::new(0.0, 0.0, 4.0, 4.0).inset(10.0);
        assert_eq!(r.w, 0.0);
        assert_eq!(r.h, 0.0);
    }

    #[test]
    fn test_reset_clears_run() {
        let mut world = World::new();
        world.obstacles.push(Obstacle::grounded(100.0, 10.0, 20.0));
        world.scroll_speed = 42.0;
        world.tick = 99;
        world.reset();
        assert_eq!(world, World::default());
    }

    #[test]
    fn test_difficulty_multiplier() {
        assert_eq!(Difficulty::Easy.speed_multiplier(), 1.0);
        assert!(Difficulty::Hard.speed_multiplier() > 1.0);
    }
}
