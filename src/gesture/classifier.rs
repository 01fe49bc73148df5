//! Per-frame landmark classification
//!
//! Pure functions of the current frame; no history. Keypoint names follow
//! the MediaPipe hand model (`wrist`, `index_finger_tip`, ...).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::perception::{Hand, Keypoint};

pub const WRIST: &str = "wrist";
pub const INDEX_TIP: &str = "index_finger_tip";
pub const MIDDLE_TIP: &str = "middle_finger_tip";
pub const RING_TIP: &str = "ring_finger_tip";
pub const PINKY_TIP: &str = "pinky_finger_tip";

/// Non-thumb fingertips used for fist closure
const FIST_TIPS: [&str; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Classification thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Mean wrist→fingertip distance (fraction of frame width) below which
    /// the hand counts as a fist
    pub fist_threshold: f32,
    /// Keypoints reporting a lower score are treated as missing
    pub min_keypoint_score: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fist_threshold: 0.13,
            min_keypoint_score: 0.0,
        }
    }
}

/// Signals extracted from one hand
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandSignal {
    /// Index fingertip in normalized [0, 1] frame space
    pub pointer: Option<Vec2>,
    pub fist_closed: bool,
}

/// Classify every detected hand independently.
///
/// Returns nothing when no hand is present or the frame has no size.
pub fn classify(hands: &[Hand], frame: (f32, f32), config: &ClassifierConfig) -> Vec<HandSignal> {
    let (width, height) = frame;
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    hands
        .iter()
        .map(|hand| classify_hand(hand, width, height, config))
        .collect()
}

fn classify_hand(hand: &Hand, width: f32, height: f32, config: &ClassifierConfig) -> HandSignal {
    let find = |name: &str| usable(hand.keypoint(name), config.min_keypoint_score);

    let size = Vec2::new(width, height);
    let pointer = find(INDEX_TIP).map(|tip| position(tip) / size);

    let fist_closed = find(WRIST)
        .map(position)
        .and_then(|wrist| {
            let tips = FIST_TIPS
                .iter()
                .map(|&n| find(n).map(position))
                .collect::<Option<Vec<Vec2>>>()?;
            let reach = tips.iter().map(|t| t.distance(wrist)).sum::<f32>() / tips.len() as f32;
            Some(reach / width < config.fist_threshold)
        })
        .unwrap_or(false);

    HandSignal {
        pointer,
        fist_closed,
    }
}

fn usable(keypoint: Option<&Keypoint>, min_score: f32) -> Option<&Keypoint> {
    keypoint.filter(|k| k.score.is_none_or(|s| s >= min_score))
}

#[inline]
fn position(k: &Keypoint) -> Vec2 {
    Vec2::new(k.x, k.y)
}
