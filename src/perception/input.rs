//! Per-refresh perception driver
//!
//! At most one inference request is outstanding at a time. A new one is
//! issued only after the previous answer arrived (or was abandoned on
//! timeout), so a slow model throttles the loop instead of queueing frames.
//! After teardown nothing is issued and late answers are discarded.

use serde::{Deserialize, Serialize};

use super::{Hand, PerceptionBackend, PerceptionError, RequestId};
use crate::gesture::nod::NOSE;
use crate::gesture::{
    ClassifierConfig, GestureEvent, GestureEventMapper, MapperConfig, NodConfig, NodDetector,
    RaiseConfig, RaiseDetector, classify,
};

/// Gesture pipeline and request policy; fixed per subsystem instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    pub classifier: ClassifierConfig,
    pub mapper: MapperConfig,
    /// Hand-raise trigger, `None` to disable
    pub raise: Option<RaiseConfig>,
    /// Head-nod trigger, `None` to disable (needs a pose model)
    pub nod: Option<NodConfig>,
    /// Abandon a request after this long, `None` to wait forever
    pub inference_timeout_ms: Option<f64>,
    /// Consecutive timeouts before perception is given up
    pub max_timeouts: u32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            mapper: MapperConfig::default(),
            raise: Some(RaiseConfig::default()),
            nod: None,
            inference_timeout_ms: Some(2000.0),
            max_timeouts: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct InFlight {
    id: RequestId,
    issued_at: f64,
}

/// Lifecycle of the subsystem
#[derive(Debug, Clone, PartialEq)]
pub enum PerceptionStatus {
    Active,
    /// Failed to start or gave up; fallback input keeps working
    Inert(PerceptionError),
    TornDown,
}

pub struct InputSubsystem {
    backend: Option<Box<dyn PerceptionBackend>>,
    status: PerceptionStatus,
    in_flight: Option<InFlight>,
    next_request: RequestId,
    timeouts: u32,
    classifier: ClassifierConfig,
    mapper: GestureEventMapper,
    raise: Option<RaiseDetector>,
    nod: Option<NodDetector>,
    inference_timeout_ms: Option<f64>,
    max_timeouts: u32,
}

impl InputSubsystem {
    /// Start the backend. On failure the subsystem is built inert and the
    /// error is reported once here.
    pub fn start(mut backend: Box<dyn PerceptionBackend>, config: PerceptionConfig) -> Self {
        let status = match backend.start() {
            Ok(()) => {
                let (w, h) = backend.frame_dimensions();
                log::info!("Perception ready ({}x{})", w, h);
                PerceptionStatus::Active
            }
            Err(e) => {
                log::warn!("{}; gesture input disabled", e);
                backend.release_camera();
                backend.dispose();
                PerceptionStatus::Inert(e)
            }
        };
        let backend = (status == PerceptionStatus::Active).then_some(backend);

        Self {
            backend,
            status,
            in_flight: None,
            next_request: 1,
            timeouts: 0,
            classifier: config.classifier,
            mapper: GestureEventMapper::new(config.mapper),
            raise: config.raise.map(RaiseDetector::new),
            nod: config.nod.map(NodDetector::new),
            inference_timeout_ms: config.inference_timeout_ms,
            max_timeouts: config.max_timeouts.max(1),
        }
    }

    pub fn status(&self) -> &PerceptionStatus {
        &self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == PerceptionStatus::Active
    }

    /// True while a request is outstanding
    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Run once per display refresh: collect a finished estimate (if any),
    /// turn it into gesture events, and keep one request in flight.
    pub fn pump(&mut self, now_ms: f64) -> Vec<GestureEvent> {
        if self.backend.is_none() {
            return Vec::new();
        }

        let mut events = Vec::new();
        match self.take_result() {
            Some(Ok(hands)) => {
                self.timeouts = 0;
                events = self.evaluate(&hands, now_ms);
            }
            Some(Err(PerceptionError::InferenceFailed(reason))) => {
                log::warn!("Inference failed: {}", reason);
            }
            Some(Err(e)) => {
                self.give_up(e);
                return events;
            }
            None => {}
        }

        if let (Some(flight), Some(timeout)) = (self.in_flight, self.inference_timeout_ms) {
            if now_ms - flight.issued_at >= timeout {
                self.timeouts += 1;
                log::warn!(
                    "Inference request {} timed out after {:.0}ms ({}/{})",
                    flight.id,
                    now_ms - flight.issued_at,
                    self.timeouts,
                    self.max_timeouts
                );
                self.in_flight = None;
                if self.timeouts >= self.max_timeouts {
                    self.give_up(PerceptionError::Unavailable("inference stalled".into()));
                    return events;
                }
            }
        }

        if self.in_flight.is_none() {
            self.submit(now_ms);
        }
        events
    }

    /// Stop issuing requests, release the camera and dispose the model.
    /// Safe to call with a request in flight and more than once.
    pub fn teardown(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            backend.release_camera();
            backend.dispose();
            log::info!("Perception torn down");
        }
        self.in_flight = None;
        if self.status == PerceptionStatus::Active {
            self.status = PerceptionStatus::TornDown;
        }
    }

    /// Next answer matching the outstanding request; older answers are dropped
    fn take_result(&mut self) -> Option<Result<Vec<Hand>, PerceptionError>> {
        let backend = self.backend.as_mut()?;
        while let Some((id, result)) = backend.poll() {
            match self.in_flight {
                Some(flight) if flight.id == id => {
                    self.in_flight = None;
                    return Some(result);
                }
                _ => log::debug!("Discarding stale estimate for request {}", id),
            }
        }
        None
    }

    fn submit(&mut self, now_ms: f64) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let id = self.next_request;
        self.next_request += 1;
        match backend.submit(id) {
            Ok(()) => {
                self.in_flight = Some(InFlight {
                    id,
                    issued_at: now_ms,
                });
            }
            Err(PerceptionError::InferenceFailed(reason)) => {
                log::warn!("Could not submit inference request: {}", reason);
            }
            Err(e) => self.give_up(e),
        }
    }

    fn evaluate(&mut self, hands: &[Hand], now_ms: f64) -> Vec<GestureEvent> {
        let Some(backend) = self.backend.as_ref() else {
            return Vec::new();
        };
        let frame = backend.frame_dimensions();

        let signals = classify(hands, frame, &self.classifier);
        let mut events = self.mapper.process(&signals, now_ms);

        if let Some(raise) = self.raise.as_mut() {
            if raise.update(&signals, now_ms) {
                events.push(GestureEvent::HandRaised);
            }
        }

        if let Some(nod) = self.nod.as_mut() {
            let nodded = hands
                .iter()
                .find(|h| h.keypoint(NOSE).is_some())
                .is_some_and(|pose| nod.observe(&pose.keypoints, frame.1, now_ms));
            if nodded {
                events.push(GestureEvent::Nod);
            }
        }

        events
    }

    fn give_up(&mut self, error: PerceptionError) {
        log::warn!("{}; gesture input disabled", error);
        self.teardown();
        self.status = PerceptionStatus::Inert(error);
    }
}

impl Drop for InputSubsystem {
    fn drop(&mut self) {
        self.teardown();
    }
}
