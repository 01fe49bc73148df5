//! "Hand raised" trigger
//!
//! Fires when any index fingertip crosses above a horizontal line in
//! normalized frame space. Unlike area hits this is rising-edge: the hand
//! has to drop below the line again before it can fire a second time.

use serde::{Deserialize, Serialize};

use super::classifier::HandSignal;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaiseConfig {
    /// Normalized height of the raise line (0 = top of frame)
    pub threshold: f32,
    pub cooldown_ms: f64,
}

impl Default for RaiseConfig {
    fn default() -> Self {
        Self {
            threshold: 0.45,
            cooldown_ms: 600.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RaiseDetector {
    config: RaiseConfig,
    was_raised: bool,
    last_trigger: Option<f64>,
}

impl RaiseDetector {
    pub fn new(config: RaiseConfig) -> Self {
        Self {
            config,
            was_raised: false,
            last_trigger: None,
        }
    }

    /// Feed one frame; returns true on a fresh raise outside the cooldown
    pub fn update(&mut self, signals: &[HandSignal], now_ms: f64) -> bool {
        let raised = signals
            .iter()
            .filter_map(|s| s.pointer)
            .any(|p| p.y < self.config.threshold);

        let cooled = self
            .last_trigger
            .is_none_or(|last| now_ms - last >= self.config.cooldown_ms);
        let fire = raised && !self.was_raised && cooled;
        if fire {
            self.last_trigger = Some(now_ms);
        }
        self.was_raised = raised;
        fire
    }
}
