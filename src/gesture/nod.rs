//! Head-nod detection
//!
//! Tracks the normalized height of a pose `nose` keypoint. A nod is a fast
//! downward motion followed by a fast upward motion within a short window.
//! Velocities are in normalized units per millisecond.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::perception::Keypoint;

pub const NOSE: &str = "nose";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodConfig {
    /// Downward velocity that arms the detector
    pub down_velocity: f32,
    /// Upward velocity (negative) that completes a nod
    pub up_velocity: f32,
    /// Max time between the down and up phases
    pub window_ms: f64,
    pub cooldown_ms: f64,
    /// Nose keypoints with a lower score are ignored
    pub min_score: f32,
    /// Samples kept for velocity estimation
    pub history: usize,
}

impl Default for NodConfig {
    fn default() -> Self {
        Self {
            down_velocity: 0.015,
            up_velocity: -0.020,
            window_ms: 600.0,
            cooldown_ms: 700.0,
            min_score: 0.5,
            history: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NodPhase {
    Idle,
    Down { since: f64 },
}

#[derive(Debug, Clone)]
pub struct NodDetector {
    config: NodConfig,
    /// (time ms, normalized y), oldest first
    samples: VecDeque<(f64, f32)>,
    phase: NodPhase,
    last_nod: Option<f64>,
}

impl NodDetector {
    pub fn new(config: NodConfig) -> Self {
        Self {
            samples: VecDeque::with_capacity(config.history.max(2)),
            config,
            phase: NodPhase::Idle,
            last_nod: None,
        }
    }

    /// Feed one pose estimate. Returns true when a nod completes.
    pub fn observe(&mut self, keypoints: &[Keypoint], frame_height: f32, now_ms: f64) -> bool {
        if frame_height <= 0.0 {
            return false;
        }
        let Some(nose) = keypoints.iter().find(|k| k.name == NOSE) else {
            return false;
        };
        if nose.score.unwrap_or(0.0) <= self.config.min_score {
            return false;
        }
        self.push(nose.y / frame_height, now_ms)
    }

    fn push(&mut self, y: f32, now_ms: f64) -> bool {
        self.samples.push_back((now_ms, y));
        while self.samples.len() > self.config.history.max(2) {
            self.samples.pop_front();
        }

        let n = self.samples.len();
        if n < 2 {
            return false;
        }
        let (ta, ya) = self.samples[n - 2];
        let (tb, yb) = self.samples[n - 1];
        let dt = if tb - ta > 0.0 { tb - ta } else { 1.0 };
        let velocity = (yb - ya) / dt as f32;

        match self.phase {
            NodPhase::Idle if velocity > self.config.down_velocity => {
                self.phase = NodPhase::Down { since: now_ms };
                false
            }
            NodPhase::Down { since } => {
                let elapsed = now_ms - since;
                if velocity < self.config.up_velocity && elapsed <= self.config.window_ms {
                    self.phase = NodPhase::Idle;
                    let cooled = self
                        .last_nod
                        .is_none_or(|last| now_ms - last > self.config.cooldown_ms);
                    if cooled {
                        self.last_nod = Some(now_ms);
                        log::debug!("Nod detected");
                    }
                    cooled
                } else {
                    if elapsed > self.config.window_ms {
                        self.phase = NodPhase::Idle;
                    }
                    false
                }
            }
            NodPhase::Idle => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nose(y: f32) -> Vec<Keypoint> {
        vec![Keypoint::new(NOSE, 320.0, y).with_score(0.9)]
    }

    /// Feed a sequence of (ms, pixel y) samples; count nods
    fn run(detector: &mut NodDetector, samples: &[(f64, f32)]) -> usize {
        samples
            .iter()
            .filter(|(t, y)| detector.observe(&nose(*y), 100.0, *t))
            .count()
    }

    #[test]
    fn test_down_then_up_is_a_nod() {
        let mut d = NodDetector::new(NodConfig::default());
        // 100px frame: 30px in 10ms = 0.03/ms down, then 0.03/ms up
        let nods = run(&mut d, &[(0.0, 40.0), (10.0, 70.0), (20.0, 40.0)]);
        assert_eq!(nods, 1);
    }

    #[test]
    fn test_slow_motion_is_ignored() {
        let mut d = NodDetector::new(NodConfig::default());
        let nods = run(&mut d, &[(0.0, 40.0), (100.0, 50.0), (200.0, 40.0)]);
        assert_eq!(nods, 0);
    }

    #[test]
    fn test_up_after_window_is_ignored() {
        let mut d = NodDetector::new(NodConfig::default());
        let samples = [
            (0.0, 40.0),
            (10.0, 70.0),
            (400.0, 70.0),
            (700.0, 70.0),
            (710.0, 40.0),
        ];
        let nods = run(&mut d, &samples);
        assert_eq!(nods, 0);
    }

    #[test]
    fn test_cooldown_between_nods() {
        let mut d = NodDetector::new(NodConfig::default());
        let first = run(&mut d, &[(0.0, 40.0), (10.0, 70.0), (20.0, 40.0)]);
        let second = run(&mut d, &[(30.0, 70.0), (40.0, 40.0)]);
        let third = run(&mut d, &[(800.0, 40.0), (810.0, 70.0), (820.0, 40.0)]);
        assert_eq!((first, second, third), (1, 0, 1));
    }

    #[test]
    fn test_low_confidence_nose_ignored() {
        let mut d = NodDetector::new(NodConfig::default());
        let weak = |y| vec![Keypoint::new(NOSE, 0.0, y).with_score(0.2)];
        assert!(!d.observe(&weak(40.0), 100.0, 0.0));
        assert!(!d.observe(&weak(70.0), 100.0, 10.0));
        assert!(!d.observe(&weak(40.0), 100.0, 20.0));
    }

    #[test]
    fn test_missing_nose_ignored() {
        let mut d = NodDetector::new(NodConfig::default());
        assert!(!d.observe(&[], 100.0, 0.0));
    }
}
