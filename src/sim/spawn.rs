//! Procedural obstacle spawning
//!
//! The countdown itself lives in [`World::spawn_countdown`]; the scheduler
//! owns the seeded RNG that picks sizes and intervals.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Obstacle, World};
use crate::consts::*;

/// Seeded obstacle generator
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    rng: Pcg32,
    seed: u64,
    min_ticks: i32,
    max_ticks: i32,
    enabled: bool,
}

impl SpawnScheduler {
    /// Scheduler with the default interval bounds
    pub fn new(seed: u64) -> Self {
        Self::with_bounds(seed, SPAWN_MIN_TICKS, SPAWN_MAX_TICKS)
    }

    /// Scheduler with custom inclusive interval bounds (ticks)
    pub fn with_bounds(seed: u64, min_ticks: i32, max_ticks: i32) -> Self {
        let min_ticks = min_ticks.max(0);
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            min_ticks,
            max_ticks: max_ticks.max(min_ticks),
            enabled: true,
        }
    }

    /// Scheduler that never spawns (scripted runs and tests)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(0)
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Rewind the RNG so the next run replays the same obstacle sequence
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Advance the countdown by one tick, appending an obstacle when it expires.
    ///
    /// Returns true if an obstacle was spawned.
    pub fn step(&mut self, world: &mut World) -> bool {
        if !self.enabled {
            return false;
        }

        if world.spawn_countdown <= 0 {
            let obstacle = self.next_obstacle();
            world.obstacles.push(obstacle);
            world.spawn_countdown = self.rng.random_range(self.min_ticks..=self.max_ticks);
            true
        } else {
            world.spawn_countdown -= 1;
            false
        }
    }

    fn next_obstacle(&mut self) -> Obstacle {
        let w = self.rng.random_range(OBSTACLE_MIN_W..=OBSTACLE_MAX_W) as f32;
        let h = self.rng.random_range(OBSTACLE_MIN_H..=OBSTACLE_MAX_H) as f32;
        Obstacle::grounded(WORLD_WIDTH + SPAWN_MARGIN, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawns_immediately_on_fresh_world() {
        let mut world = World::new();
        let mut spawner = SpawnScheduler::new(7);
        assert!(spawner.step(&mut world));
        assert_eq!(world.obstacles.len(), 1);

        let o = world.obstacles[0];
        assert_eq!(o.x, WORLD_WIDTH + SPAWN_MARGIN);
        assert_eq!(o.y + o.h, GROUND_Y);
        assert!(o.w >= OBSTACLE_MIN_W as f32 && o.w <= OBSTACLE_MAX_W as f32);
        assert!(o.h >= OBSTACLE_MIN_H as f32 && o.h <= OBSTACLE_MAX_H as f32);
        let countdown = world.spawn_countdown;
        assert!((SPAWN_MIN_TICKS..=SPAWN_MAX_TICKS).contains(&countdown));
    }

    #[test]
    fn test_countdown_decrements_until_next_spawn() {
        let mut world = World::new();
        let mut spawner = SpawnScheduler::with_bounds(1, 3, 3);
        assert!(spawner.step(&mut world));
        assert_eq!(world.spawn_countdown, 3);
        for expected in [2, 1, 0] {
            assert!(!spawner.step(&mut world));
            assert_eq!(world.spawn_countdown, expected);
        }
        assert!(spawner.step(&mut world));
        assert_eq!(world.obstacles.len(), 2);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = World::new();
        let mut b = World::new();
        let mut sa = SpawnScheduler::new(1234);
        let mut sb = SpawnScheduler::new(1234);
        for _ in 0..500 {
            sa.step(&mut a);
            sb.step(&mut b);
        }
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.spawn_countdown, b.spawn_countdown);
    }

    #[test]
    fn test_reseed_replays_sequence() {
        let mut spawner = SpawnScheduler::new(99);
        let mut first = World::new();
        for _ in 0..200 {
            spawner.step(&mut first);
        }
        spawner.reseed(99);
        let mut second = World::new();
        for _ in 0..200 {
            spawner.step(&mut second);
        }
        assert_eq!(first.obstacles, second.obstacles);
    }

    #[test]
    fn test_disabled_never_spawns() {
        let mut world = World::new();
        let mut spawner = SpawnScheduler::disabled();
        for _ in 0..1000 {
            assert!(!spawner.step(&mut world));
        }
        assert!(world.obstacles.is_empty());
    }
}
