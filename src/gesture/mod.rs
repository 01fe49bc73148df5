//! Gesture recognition
//!
//! Turns per-frame landmark estimates into discrete, rate-limited events:
//! - `classifier`: stateless landmark → signal conversion
//! - `mapper`: area hits and fist closure with per-channel cooldowns
//! - `raise`: rising-edge "hand raised" trigger
//! - `nod`: head-nod detection from a pose nose keypoint

pub mod classifier;
pub mod mapper;
pub mod nod;
pub mod raise;

use serde::{Deserialize, Serialize};

pub use classifier::{ClassifierConfig, HandSignal, classify};
pub use mapper::{GestureEventMapper, MapperConfig};
pub use nod::{NodConfig, NodDetector};
pub use raise::{RaiseConfig, RaiseDetector};

/// Discrete gesture event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureEvent {
    /// A pointer entered (or stayed in) the named area
    AreaCovered(String),
    /// Some hand closed into a fist
    FistClosed,
    /// Index fingertip moved above the raise line
    HandRaised,
    /// Head nodded down and back up
    Nod,
}

/// A named rectangle in normalized video space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureArea {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl GestureArea {
    pub fn new(id: impl Into<String>, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
        }
    }

    /// Half-open containment: `[x, x + w) × [y, y + h)`.
    ///
    /// Edge-to-edge tiles never both contain a point, and an area with zero
    /// width or height contains nothing.
    #[inline]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// Default layout, kept below the hand-raise line
pub fn default_areas() -> Vec<GestureArea> {
    vec![
        GestureArea::new("pause", 0.0, 0.75, 0.2, 0.25),
        GestureArea::new("resume", 0.8, 0.75, 0.2, 0.25),
        GestureArea::new("easy", 0.0, 0.5, 0.2, 0.2),
        GestureArea::new("hard", 0.8, 0.5, 0.2, 0.2),
    ]
}
