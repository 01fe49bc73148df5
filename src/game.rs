//! Per-refresh driver
//!
//! One call to [`Game::frame`] per display refresh: pump perception once,
//! apply whatever commands came out, advance the session one step and hand
//! a snapshot to the renderer. Keyboard and pointer input can arrive at any
//! point between frames and are applied immediately.

use crate::highscores::{HighScoreStore, JsonFileStore, MemoryStore};
use crate::input::{Command, CommandBindings, command_for_key, command_for_pointer};
use crate::perception::{InputSubsystem, PerceptionBackend, PerceptionConfig};
use crate::session::{RenderSink, SessionController};
use crate::settings::Settings;
use crate::sim::SpawnScheduler;

pub struct Game {
    session: SessionController,
    input: Option<InputSubsystem>,
    bindings: CommandBindings,
    perception: PerceptionConfig,
    sink: Box<dyn RenderSink>,
}

impl Game {
    pub fn new(
        settings: &Settings,
        store: Box<dyn HighScoreStore>,
        sink: Box<dyn RenderSink>,
    ) -> Self {
        let seed = settings.effective_seed();
        log::info!("Game initialized with seed: {}", seed);
        let spawner =
            SpawnScheduler::with_bounds(seed, settings.spawn_min_ticks, settings.spawn_max_ticks);
        Self::with_spawner(settings, store, sink, spawner)
    }

    /// Build from settings alone, picking the high score store they name
    pub fn from_settings(settings: &Settings, sink: Box<dyn RenderSink>) -> Self {
        let store: Box<dyn HighScoreStore> = match &settings.high_score_path {
            Some(path) => Box::new(JsonFileStore::open(path)),
            None => Box::new(MemoryStore::default()),
        };
        Self::new(settings, store, sink)
    }

    /// Build with an explicit spawner (scripted runs)
    pub fn with_spawner(
        settings: &Settings,
        store: Box<dyn HighScoreStore>,
        sink: Box<dyn RenderSink>,
        spawner: SpawnScheduler,
    ) -> Self {
        Self {
            session: SessionController::new(store, spawner, settings.difficulty),
            input: None,
            bindings: settings.bindings.clone(),
            perception: settings.perception.clone(),
            sink,
        }
    }

    /// Start gesture input on `backend`, replacing any previous subsystem.
    ///
    /// Returns false if the backend failed to start; the game keeps running
    /// on keyboard/pointer input.
    pub fn attach_perception(&mut self, backend: Box<dyn PerceptionBackend>) -> bool {
        self.detach_perception();
        let input = InputSubsystem::start(backend, self.perception.clone());
        let active = input.is_active();
        self.input = Some(input);
        active
    }

    /// Tear down gesture input (camera released, late results discarded)
    pub fn detach_perception(&mut self) {
        if let Some(mut input) = self.input.take() {
            input.teardown();
        }
    }

    pub fn input(&self) -> Option<&InputSubsystem> {
        self.input.as_ref()
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Run one display refresh at time `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        if let Some(input) = self.input.as_mut() {
            let events = input.pump(now_ms);
            for command in self.bindings.resolve_all(&events) {
                self.session.apply(command);
            }
        }

        self.session.tick();
        self.sink.render(&self.session.snapshot());
    }

    /// Apply a command from any direct input device
    pub fn command(&mut self, command: Command) -> bool {
        self.session.apply(command)
    }

    /// Keyboard fallback (`KeyboardEvent.code` names)
    pub fn key_down(&mut self, code: &str) -> bool {
        command_for_key(code).is_some_and(|c| self.session.apply(c))
    }

    /// Pointer/tap fallback
    pub fn pointer_down(&mut self) -> bool {
        let command = command_for_pointer(self.session.state());
        self.session.apply(command)
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.detach_perception();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::{Hand, PerceptionError, RequestId, ScriptedModel};
    use crate::session::{SessionState, Snapshot};
    use crate::sim::Difficulty;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Snapshot>>>);

    impl RenderSink for Recorder {
        fn render(&mut self, snapshot: &Snapshot) {
            self.0.borrow_mut().push(snapshot.clone());
        }
    }

    /// Answers every request on the next poll with the next scripted frame
    struct InstantBackend {
        frames: VecDeque<Vec<Hand>>,
        pending: Option<RequestId>,
        released: Rc<RefCell<bool>>,
    }

    impl PerceptionBackend for InstantBackend {
        fn start(&mut self) -> Result<(), PerceptionError> {
            Ok(())
        }

        fn frame_dimensions(&self) -> (f32, f32) {
            (640.0, 480.0)
        }

        fn submit(&mut self, request: RequestId) -> Result<(), PerceptionError> {
            self.pending = Some(request);
            Ok(())
        }

        fn poll(&mut self) -> Option<(RequestId, Result<Vec<Hand>, PerceptionError>)> {
            let id = self.pending.take()?;
            Some((id, Ok(self.frames.pop_front().unwrap_or_default())))
        }

        fn release_camera(&mut self) {
            *self.released.borrow_mut() = true;
        }

        fn dispose(&mut self) {}
    }

    struct Broken;

    impl PerceptionBackend for Broken {
        fn start(&mut self) -> Result<(), PerceptionError> {
            Err(PerceptionError::Unavailable("no camera".into()))
        }
        fn frame_dimensions(&self) -> (f32, f32) {
            (0.0, 0.0)
        }
        fn submit(&mut self, _: RequestId) -> Result<(), PerceptionError> {
            Err(PerceptionError::Disconnected)
        }
        fn poll(&mut self) -> Option<(RequestId, Result<Vec<Hand>, PerceptionError>)> {
            None
        }
        fn release_camera(&mut self) {}
        fn dispose(&mut self) {}
    }

    fn game() -> (Game, Recorder) {
        let recorder = Recorder::default();
        let game = Game::with_spawner(
            &Settings::default(),
            Box::new(MemoryStore::default()),
            Box::new(recorder.clone()),
            SpawnScheduler::disabled(),
        );
        (game, recorder)
    }

    fn backend(frames: Vec<Vec<Hand>>) -> (Box<InstantBackend>, Rc<RefCell<bool>>) {
        let released = Rc::new(RefCell::new(false));
        let b = InstantBackend {
            frames: frames.into(),
            pending: None,
            released: released.clone(),
        };
        (Box::new(b), released)
    }

    #[test]
    fn test_renders_every_frame_in_every_state() {
        let (mut g, rec) = game();
        g.frame(0.0);
        g.key_down("Enter");
        g.frame(16.0);
        g.key_down("Escape");
        g.frame(32.0);
        let states: Vec<_> = rec.0.borrow().iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![
                SessionState::Ready,
                SessionState::Running,
                SessionState::Paused,
            ]
        );
    }

    #[test]
    fn test_pointer_starts_then_jumps() {
        let (mut g, _) = game();
        assert!(g.pointer_down());
        assert_eq!(g.session().state(), SessionState::Running);
        assert!(g.pointer_down());
        assert!(g.session().world().actor.vy < 0.0);
    }

    #[test]
    fn test_fist_gesture_starts_run() {
        let (mut g, _) = game();
        let (b, _) = backend(vec![vec![ScriptedModel::fist(320.0, 300.0)]]);
        assert!(g.attach_perception(b));

        // Frame 1 issues the request, frame 2 collects it
        g.frame(0.0);
        assert_eq!(g.session().state(), SessionState::Ready);
        g.frame(16.0);
        assert_eq!(g.session().state(), SessionState::Running);
    }

    #[test]
    fn test_gesture_and_keyboard_reach_same_transitions() {
        // Pause → hard → resume, once through areas and once through keys
        let pause = ScriptedModel::pointing(30.0, 430.0);
        let hard = ScriptedModel::pointing(600.0, 280.0);
        let resume = ScriptedModel::pointing(600.0, 430.0);
        let frames = vec![vec![], vec![pause], vec![hard], vec![resume]];
        let (mut gestures, _) = game();
        let (b, _) = backend(frames);
        gestures.attach_perception(b);
        gestures.command(Command::StartOrRestart);
        for i in 0..6 {
            gestures.frame(i as f64 * 16.0);
        }

        let (mut keys, _) = game();
        keys.command(Command::StartOrRestart);
        keys.key_down("Escape");
        keys.key_down("Digit2");
        keys.key_down("KeyR");

        for g in [&gestures, &keys] {
            assert_eq!(g.session().state(), SessionState::Running);
            assert_eq!(g.session().difficulty(), Difficulty::Hard);
        }
    }

    #[test]
    fn test_broken_perception_leaves_fallback_working() {
        let (mut g, _) = game();
        assert!(!g.attach_perception(Box::new(Broken)));
        g.frame(0.0);
        assert!(g.key_down("Enter"));
        g.frame(16.0);
        assert_eq!(g.session().score(), 1);
    }

    #[test]
    fn test_detach_releases_camera() {
        let (mut g, _) = game();
        let (b, released) = backend(Vec::new());
        g.attach_perception(b);
        g.frame(0.0);
        g.detach_perception();
        assert!(*released.borrow());
        assert!(g.input().is_none());
    }

    #[test]
    fn test_from_settings_reads_stored_high_score() {
        let dir = std::env::temp_dir().join(format!("dino-gesture-game-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("best.json");
        std::fs::write(&path, r#"{"high_score":77}"#).unwrap();

        let settings = Settings {
            seed: Some(3),
            high_score_path: Some(path),
            ..Default::default()
        };
        let g = Game::from_settings(&settings, Box::new(Recorder::default()));
        assert_eq!(g.session().high_score(), 77);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let (mut g, _) = game();
        assert!(!g.key_down("KeyQ"));
        assert_eq!(g.session().state(), SessionState::Ready);
    }
}
