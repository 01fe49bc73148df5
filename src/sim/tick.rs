//! Fixed step simulation tick
//!
//! Advances the world by exactly one step. Only called while a run is live;
//! the session controller decides when.

use super::collision::first_collision;
use super::spawn::SpawnScheduler;
use super::state::{Actor, World};
use crate::consts::*;

/// What happened during a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Index of the obstacle the actor hit, if any
    pub collision: Option<usize>,
    /// An obstacle was appended this step
    pub spawned: bool,
}

impl StepOutcome {
    pub fn collided(&self) -> bool {
        self.collision.is_some()
    }
}

/// Start a jump if the actor is standing on the ground.
///
/// Airborne requests are dropped: no queueing and no double jump.
pub fn try_jump(actor: &mut Actor) -> bool {
    if !actor.grounded {
        return false;
    }
    actor.vy = JUMP_VELOCITY;
    actor.grounded = false;
    true
}

/// Advance the world by one step
pub fn advance(world: &mut World, multiplier: f32, spawner: &mut SpawnScheduler) -> StepOutcome {
    world.tick += 1;
    world.scroll_speed += SPEED_INC;

    integrate_actor(&mut world.actor);

    if world.actor.grounded && world.tick % LEG_PHASE_TICKS == 0 {
        world.actor.leg_phase = !world.actor.leg_phase;
    }

    let dx = world.scroll_speed * multiplier;
    for obstacle in &mut world.obstacles {
        obstacle.x -= dx;
    }
    world.obstacles.retain(|o| !o.is_offscreen());

    let spawned = spawner.step(world);

    StepOutcome {
        collision: first_collision(&world.actor, &world.obstacles),
        spawned,
    }
}

fn integrate_actor(actor: &mut Actor) {
    actor.vy += GRAVITY;
    actor.y += actor.vy;

    if actor.y + actor.h >= GROUND_Y {
        actor.y = GROUND_Y - actor.h;
        actor.vy = 0.0;
        actor.grounded = true;
    } else {
        actor.grounded = false;
    }
}
