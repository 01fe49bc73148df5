//! Canned hand model for demos and headless runs
//!
//! Replays a fixed sequence of frames, optionally sleeping to mimic model
//! latency. Pair it with [`super::ThreadedEstimator`].

use std::time::Duration;

use super::threaded::{CameraHandle, HandModel};
use super::{Hand, Keypoint, PerceptionError};
use crate::gesture::classifier::{INDEX_TIP, MIDDLE_TIP, PINKY_TIP, RING_TIP, WRIST};

pub struct ScriptedModel {
    frames: Vec<Vec<Hand>>,
    cursor: usize,
    latency: Duration,
    camera: CameraHandle,
}

impl ScriptedModel {
    /// Model that replays `frames` in a loop
    pub fn new(frames: Vec<Vec<Hand>>) -> Self {
        Self {
            frames,
            cursor: 0,
            latency: Duration::ZERO,
            camera: CameraHandle::new(|| log::debug!("Scripted camera stopped")),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Hand pointing its index finger at pixel (x, y), fingers spread
    pub fn pointing(x: f32, y: f32) -> Hand {
        Hand::new(vec![
            Keypoint::new(WRIST, x, y + 160.0).with_score(0.9),
            Keypoint::new(INDEX_TIP, x, y).with_score(0.9),
            Keypoint::new(MIDDLE_TIP, x + 30.0, y + 10.0).with_score(0.9),
            Keypoint::new(RING_TIP, x + 55.0, y + 25.0).with_score(0.9),
            Keypoint::new(PINKY_TIP, x + 75.0, y + 45.0).with_score(0.9),
        ])
    }

    /// Closed fist with the wrist at pixel (x, y)
    pub fn fist(x: f32, y: f32) -> Hand {
        Hand::new(vec![
            Keypoint::new(WRIST, x, y).with_score(0.9),
            Keypoint::new(INDEX_TIP, x - 10.0, y - 30.0).with_score(0.9),
            Keypoint::new(MIDDLE_TIP, x, y - 32.0).with_score(0.9),
            Keypoint::new(RING_TIP, x + 10.0, y - 30.0).with_score(0.9),
            Keypoint::new(PINKY_TIP, x + 18.0, y - 25.0).with_score(0.9),
        ])
    }
}

impl HandModel for ScriptedModel {
    fn estimate(&mut self) -> Result<Vec<Hand>, PerceptionError> {
        if self.camera.is_released() {
            return Err(PerceptionError::Unavailable("camera released".into()));
        }
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        if self.frames.is_empty() {
            return Ok(Vec::new());
        }
        let frame = self.frames[self.cursor % self.frames.len()].clone();
        self.cursor += 1;
        Ok(frame)
    }

    fn camera(&self) -> CameraHandle {
        self.camera.clone()
    }
}
