//! Perception plumbing
//!
//! The landmark model and camera are external. This module defines the
//! capability they are injected through ([`PerceptionBackend`]) and the
//! [`InputSubsystem`] that drives it once per display refresh with a
//! single-slot in-flight guard.

pub mod input;
pub mod scripted;
pub mod threaded;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use input::{InputSubsystem, PerceptionConfig, PerceptionStatus};
pub use scripted::ScriptedModel;
pub use threaded::{CameraHandle, HandModel, ThreadedEstimator};

/// A named 2D landmark in frame pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Model confidence, when the backend reports one
    #[serde(default)]
    pub score: Option<f32>,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            score: None,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// One detected hand (or pose skeleton) as a set of labeled keypoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub keypoints: Vec<Keypoint>,
}

impl Hand {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// Find a keypoint by name
    pub fn keypoint(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|k| k.name == name)
    }
}

/// Identifies one inference request so late answers can be told apart
pub type RequestId = u64;

/// Perception failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PerceptionError {
    /// Camera or inference engine could not be initialized
    #[error("perception unavailable: {0}")]
    Unavailable(String),
    /// A single inference call failed
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    /// The backend went away while a request was pending
    #[error("perception backend disconnected")]
    Disconnected,
}

/// Camera + landmark model capability.
///
/// `submit` starts an inference on the current camera frame and must not
/// block; the answer is collected later through `poll`.
pub trait PerceptionBackend {
    /// Acquire the camera and load the model
    fn start(&mut self) -> Result<(), PerceptionError>;

    /// Current frame size in pixels (width, height)
    fn frame_dimensions(&self) -> (f32, f32);

    /// Begin estimating hands on the current frame
    fn submit(&mut self, request: RequestId) -> Result<(), PerceptionError>;

    /// Collect a finished estimate, if any
    fn poll(&mut self) -> Option<(RequestId, Result<Vec<Hand>, PerceptionError>)>;

    /// Stop the camera stream
    fn release_camera(&mut self);

    /// Free model resources
    fn dispose(&mut self);
}
