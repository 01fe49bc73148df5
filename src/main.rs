//! Dino Gesture headless runner
//!
//! Drives the game from a scripted hand model on a background thread and
//! logs what a renderer would draw. Usage:
//!
//! ```text
//! dino-gesture [settings.json] [frames]
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) to see the run.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use dino_gesture::perception::{Hand, ScriptedModel, ThreadedEstimator};
use dino_gesture::session::{RenderSink, SessionState, Snapshot};
use dino_gesture::{Game, Settings};

const DEFAULT_FRAMES: u64 = 1800;
const FRAME_TIME: Duration = Duration::from_micros(16_667);
const CAMERA: (f32, f32) = (640.0, 480.0);

/// Logs state changes and a periodic status line
#[derive(Default)]
struct LogSink {
    last_state: Option<SessionState>,
    frames: u64,
}

impl RenderSink for LogSink {
    fn render(&mut self, s: &Snapshot) {
        self.frames += 1;
        if self.last_state != Some(s.state) {
            log::info!(
                "[{}] score {} (best {}), {}",
                s.state.as_str(),
                s.score,
                s.high_score,
                s.difficulty.as_str()
            );
            self.last_state = Some(s.state);
        }
        if s.state == SessionState::Running && self.frames % 60 == 0 {
            log::debug!(
                "tick {} score {} actor y {:.1}{} obstacles {}",
                s.tick,
                s.score,
                s.actor.y,
                if s.rising { " (rising)" } else { "" },
                s.obstacles.len()
            );
        }
    }
}

/// Fist to start, then raise a hand every so often to jump
fn demo_script() -> Vec<Vec<Hand>> {
    let rest = vec![ScriptedModel::pointing(320.0, 300.0)];
    let raised = vec![ScriptedModel::pointing(320.0, 60.0)];
    let fist = vec![ScriptedModel::fist(320.0, 300.0)];

    let mut script = vec![fist];
    for _ in 0..4 {
        script.extend(std::iter::repeat_n(rest.clone(), 6));
        script.push(raised.clone());
    }
    script
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let frames = args
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let settings = Settings::load(settings_path.as_deref());
    log::info!("Dino Gesture (headless) starting, {} frames", frames);

    let mut game = Game::from_settings(&settings, Box::new(LogSink::default()));

    let model = ScriptedModel::new(demo_script()).with_latency(Duration::from_millis(30));
    if !game.attach_perception(Box::new(ThreadedEstimator::new(model, CAMERA))) {
        log::warn!("Running without gestures; starting from the keyboard path");
        game.key_down("Enter");
    }

    let start = Instant::now();
    for _ in 0..frames {
        let frame_start = Instant::now();
        game.frame(start.elapsed().as_secs_f64() * 1000.0);
        if let Some(rest) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    game.detach_perception();
    let session = game.session();
    log::info!(
        "Done: {} with score {}, best {}",
        session.state().as_str(),
        session.score(),
        session.high_score()
    );
}
