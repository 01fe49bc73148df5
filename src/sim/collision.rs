//! Collision detection between the actor and obstacles
//!
//! Rectangles are treated as half-open: `[x, x + w) × [y, y + h)`. Two
//! rectangles that only share an edge do not collide.

use super::state::{Actor, Obstacle, Rect};

/// Axis-aligned overlap test with strict inequalities
#[inline]
pub fn collide(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Index of the first obstacle overlapping the actor's hitbox
pub fn first_collision(actor: &Actor, obstacles: &[Obstacle]) -> Option<usize> {
    let hitbox = actor.hitbox();
    obstacles.iter().position(|o| collide(&hitbox, &o.rect()))
}
