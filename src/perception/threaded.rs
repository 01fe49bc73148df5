//! Background-thread adapter for blocking landmark models
//!
//! The model runs on a worker thread; requests and answers cross a pair of
//! channels and are polled once per refresh, so the game loop never blocks.
//! World and session state never leave the caller's thread.
//!
//! The camera is the one resource that must stop even while an estimate is
//! still running, so models hand out a [`CameraHandle`] that the caller's
//! thread can trip directly.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

use super::{Hand, PerceptionBackend, PerceptionError, RequestId};

struct CameraInner {
    released: AtomicBool,
    stop: Box<dyn Fn() + Send + Sync>,
}

/// Thread-safe switch that stops a camera stream.
///
/// Clones share one switch; the stop action runs once, on whichever thread
/// releases first.
#[derive(Clone)]
pub struct CameraHandle {
    inner: Arc<CameraInner>,
}

impl CameraHandle {
    pub fn new(stop: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(CameraInner {
                released: AtomicBool::new(false),
                stop: Box::new(stop),
            }),
        }
    }

    /// Stop the stream
    pub fn release(&self) {
        if !self.inner.released.swap(true, Ordering::AcqRel) {
            (self.inner.stop)();
        }
    }

    pub fn is_released(&self) -> bool {
        self.inner.released.load(Ordering::Acquire)
    }
}

impl fmt::Debug for CameraHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraHandle")
            .field("released", &self.is_released())
            .finish()
    }
}

/// A blocking camera + landmark model
pub trait HandModel: Send + 'static {
    /// Grab the current frame and estimate hands on it
    fn estimate(&mut self) -> Result<Vec<Hand>, PerceptionError>;

    /// Switch for the camera feeding this model
    fn camera(&self) -> CameraHandle;

    /// Free model resources; called on the worker thread
    fn close(&mut self) {}
}

type Answer = (RequestId, Result<Vec<Hand>, PerceptionError>);

pub struct ThreadedEstimator<M: HandModel> {
    frame: (f32, f32),
    model: Option<M>,
    camera: CameraHandle,
    jobs: Option<Sender<RequestId>>,
    answers: Option<Receiver<Answer>>,
    /// Last submitted request still waiting for an answer
    pending: Option<RequestId>,
    stopped: Arc<AtomicBool>,
}

impl<M: HandModel> ThreadedEstimator<M> {
    pub fn new(model: M, frame: (f32, f32)) -> Self {
        Self {
            frame,
            camera: model.camera(),
            model: Some(model),
            jobs: None,
            answers: None,
            pending: None,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<M: HandModel> PerceptionBackend for ThreadedEstimator<M> {
    fn start(&mut self) -> Result<(), PerceptionError> {
        let mut model = self
            .model
            .take()
            .ok_or_else(|| PerceptionError::Unavailable("estimator already started".into()))?;

        let (job_tx, job_rx) = channel::<RequestId>();
        let (answer_tx, answer_rx) = channel::<Answer>();
        let stopped = Arc::clone(&self.stopped);

        // Detached: a hung model must not block teardown
        thread::Builder::new()
            .name("hand-estimator".into())
            .spawn(move || {
                for id in job_rx {
                    if stopped.load(Ordering::Acquire) {
                        break;
                    }
                    let result = model.estimate();
                    if stopped.load(Ordering::Acquire) || answer_tx.send((id, result)).is_err() {
                        break;
                    }
                }
                model.close();
            })
            .map_err(|e| PerceptionError::Unavailable(format!("estimator thread: {e}")))?;

        self.jobs = Some(job_tx);
        self.answers = Some(answer_rx);
        Ok(())
    }

    fn frame_dimensions(&self) -> (f32, f32) {
        self.frame
    }

    fn submit(&mut self, request: RequestId) -> Result<(), PerceptionError> {
        let jobs = self.jobs.as_ref().ok_or(PerceptionError::Disconnected)?;
        if jobs.send(request).is_err() {
            return Err(PerceptionError::Disconnected);
        }
        self.pending = Some(request);
        Ok(())
    }

    fn poll(&mut self) -> Option<Answer> {
        let answers = self.answers.as_ref()?;
        match answers.try_recv() {
            Ok(answer) => {
                if self.pending == Some(answer.0) {
                    self.pending = None;
                }
                Some(answer)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                // Worker exited (model panicked or closed); fail the open request
                log::warn!("Hand estimator thread exited");
                self.answers = None;
                self.jobs = None;
                let id = self.pending.take()?;
                Some((id, Err(PerceptionError::Disconnected)))
            }
        }
    }

    fn release_camera(&mut self) {
        self.camera.release();
    }

    fn dispose(&mut self) {
        self.stopped.store(true, Ordering::Release);
        self.camera.release();
        // Closing the job channel ends the worker loop once the current
        // estimate (if any) returns
        self.jobs = None;
        self.answers = None;
        self.pending = None;
    }
}

impl<M: HandModel> Drop for ThreadedEstimator<M> {
    fn drop(&mut self) {
        self.dispose();
    }
}
