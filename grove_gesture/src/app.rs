//! Top-level application state machine.
//!
//! `AppState` owns the particle engine, the blend controller, the camera rig
//! and the ambient pad. It consumes [`InferenceEvent`]s and UI commands and is
//! ticked once per rendered frame; [`run`] wires it to the window and the
//! inference thread.

use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use grove_blend::{BlendController, CameraRig, GestureLabel, GestureState, HandPair, HandTrackingAdapter};
use grove_field::{FrameContext, ParticleEngine, RenderParticle, ThemeColor};

use crate::audio::AmbientPlayer;
use crate::config::{AppConfig, SourceKind};
use crate::error::Result;
use crate::inference::{spawn_inference_source, InferenceEvent, InferenceFrame, InferenceSource, SimInferenceSource, SimInput};
use crate::visualizer::{UiCommand, Visualizer};

/// Longest frame step fed to the camera; a stalled window should not make the
/// view jump.
pub const MAX_DT: f32 = 0.1;

/// General MIDI pads 1–8 ("New Age" … "Sweep"), cycled by the voice key.
pub const PAD_VOICES: [u8; 8] = [88, 89, 90, 91, 92, 93, 94, 95];

pub fn next_pad_voice(program: u8) -> u8 {
    match PAD_VOICES.iter().position(|&p| p == program) {
        Some(i) => PAD_VOICES[(i + 1) % PAD_VOICES.len()],
        None    => PAD_VOICES[0],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UiSnapshot
// ════════════════════════════════════════════════════════════════════════════

/// Everything the HUD shows for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct UiSnapshot {
    pub state:         GestureState,
    pub raining:       bool,
    pub stormy:        bool,
    pub last_label:    GestureLabel,
    pub hands_active:  usize,
    pub theme:         ThemeColor,
    pub audio_playing: bool,
    pub status:        String,
    /// The status reports a failure and stays until the app restarts.
    pub alert:         bool,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── simulation ───────────────────────────────────────────────────────
    engine:     ParticleEngine,
    controller: BlendController,
    camera:     CameraRig,
    raw_hands:  HandPair,
    time:       f32,

    // ── inference bookkeeping ────────────────────────────────────────────
    last_frame: Option<Duration>,

    // ── presentation ─────────────────────────────────────────────────────
    theme:      ThemeColor,
    audio:      AmbientPlayer,
    program:    u8,
    pub status: String,
    alert:      bool,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let started = Instant::now();
        let engine = ParticleEngine::generate(cfg.particle_count, cfg.tree_count, cfg.seed);
        log::info!("particle field ready in {:.0?}", started.elapsed());

        AppState {
            engine,
            controller: BlendController::new(),
            camera:     CameraRig::new(),
            raw_hands:  HandPair::default(),
            time:       0.0,
            last_frame: None,
            theme:      cfg.theme,
            audio:      AmbientPlayer::spawn(&cfg.audio),
            program:    cfg.audio.program,
            status:     "hold 1-5 for a gesture, left mouse for a hand".into(),
            alert:      false,
        }
    }

    // ── inference ────────────────────────────────────────────────────────

    pub fn apply_event(&mut self, event: &InferenceEvent) {
        match event {
            InferenceEvent::Frame(frame) => {
                self.apply_inference(frame);
            }
            InferenceEvent::Failed(msg) => {
                log::error!("hand tracking stopped: {}", msg);
                self.status = format!("hand tracking unavailable: {}", msg);
                self.alert = true;
                // nothing will refresh the hands again
                self.raw_hands = HandPair::default();
            }
        }
    }

    /// Feed one tracking frame. Returns the reported label, or `None` when
    /// the frame is not newer than the last one applied.
    pub fn apply_inference(&mut self, frame: &InferenceFrame) -> Option<GestureLabel> {
        if self.last_frame.is_some_and(|t| frame.timestamp <= t) {
            log::trace!("skipping stale frame at {:?}", frame.timestamp);
            return None;
        }
        self.last_frame = Some(frame.timestamp);

        let before = self.controller.mode();
        let label = self.controller.apply(frame.classification.as_ref());
        self.raw_hands = HandTrackingAdapter::adapt(&frame.landmarks);

        let after = self.controller.mode();
        if after != before {
            log::info!(
                "{} -> state {}, rain {}, storm {}",
                label.as_str(), after.state.name(), after.raining, after.stormy,
            );
            self.notice(format!("{}: {}", label.as_str(), after.state.name()));
        }
        Some(label)
    }

    // ── UI commands ──────────────────────────────────────────────────────

    pub fn handle_command(&mut self, cmd: UiCommand) {
        match cmd {
            UiCommand::CycleTheme => {
                self.theme = self.theme.next();
                self.notice(format!("theme {}", self.theme.name()));
            }
            UiCommand::ToggleAudio => {
                let on = self.audio.toggle();
                self.notice(if on { "ambient pad on".to_string() } else { "ambient pad off".to_string() });
            }
            UiCommand::NextPadVoice => {
                self.program = next_pad_voice(self.program);
                self.audio.set_program(self.program);
                self.notice(format!("pad voice {}", self.program));
            }
            UiCommand::SetState(state) => self.controller.set_state(state),
            UiCommand::LatchRain       => self.controller.latch_rain(),
            UiCommand::LatchStorm      => self.controller.latch_storm(),
            UiCommand::Reset           => self.controller.reset(),
        }
    }

    /// Drag-orbit; hands own the camera while any is tracked.
    pub fn orbit(&mut self, d_azimuth: f32, d_polar: f32) {
        if !self.raw_hands.any_active() {
            self.camera.orbit_by(d_azimuth, d_polar);
        }
    }

    // ── per-frame ────────────────────────────────────────────────────────

    /// Advance one rendered frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_DT);
        self.time += dt;

        self.controller.tick();
        let hands = self.engine.smooth_hands(&self.raw_hands);
        let ctx = FrameContext::new(self.time, self.controller.ratios(), self.theme.rgb(), self.camera.eye())
            .with_hands(&hands);
        self.engine.step(&ctx);

        self.camera.update(&self.raw_hands, self.controller.state(), dt);
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn particles(&self)  -> &[RenderParticle]  { self.engine.particles() }
    pub fn camera(&self)     -> &CameraRig         { &self.camera }
    pub fn controller(&self) -> &BlendController   { &self.controller }
    pub fn hands(&self)      -> &HandPair          { &self.raw_hands }
    pub fn theme(&self)      -> ThemeColor         { self.theme }

    pub fn snapshot(&self) -> UiSnapshot {
        let mode = self.controller.mode();
        UiSnapshot {
            state:         mode.state,
            raining:       mode.raining,
            stormy:        mode.stormy,
            last_label:    self.controller.last_label(),
            hands_active:  self.raw_hands.active_count(),
            theme:         self.theme,
            audio_playing: self.audio.is_playing(),
            status:        self.status.clone(),
            alert:         self.alert,
        }
    }

    /// Replace the status line unless a failure is being shown.
    pub fn notice(&mut self, msg: String) {
        if !self.alert {
            self.status = msg;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Inference source selection
// ════════════════════════════════════════════════════════════════════════════

/// Build the configured hand source. Also returns a status note when the
/// requested source had to be substituted.
fn make_source(kind: SourceKind, sim_rx: Receiver<SimInput>, fps: f32) -> (Box<dyn InferenceSource>, Option<String>) {
    match kind {
        SourceKind::Sim => (Box::new(SimInferenceSource::new(sim_rx, fps)), None),
        #[cfg(feature = "leap")]
        SourceKind::Leap => {
            drop(sim_rx);
            (Box::new(crate::inference::LeapInferenceSource), None)
        }
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => {
            log::warn!("built without the `leap` feature; using keyboard + mouse simulation");
            (
                Box::new(SimInferenceSource::new(sim_rx, fps)),
                Some("leap support not built in, simulating hands".into()),
            )
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run — main event loop
// ════════════════════════════════════════════════════════════════════════════

pub fn run(cfg: AppConfig) -> Result<()> {
    // ── Inference thread (sim reads the window's input) ──────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let (source, note) = make_source(cfg.source, sim_rx, cfg.video_fps);
    let mut inference = spawn_inference_source(source);

    // ── Visualizer ───────────────────────────────────────────────────────
    let mut vis = Visualizer::new(&cfg.window, sim_tx)?;

    // ── App state ────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg);
    if let Some(note) = note {
        app.notice(note);
    }

    // ── Main loop ────────────────────────────────────────────────────────
    let mut last = Instant::now();
    while vis.is_open() {
        // 1. Window input
        let input = vis.poll_input();
        if input.quit { break; }
        for cmd in input.commands {
            app.handle_command(cmd);
        }
        if let Some((da, dp)) = input.orbit {
            app.orbit(da, dp);
        }

        // 2. Newest tracking result, if any
        if let Some(event) = inference.poll() {
            app.apply_event(&event);
        }

        // 3. Simulate
        let now = Instant::now();
        app.tick((now - last).as_secs_f32());
        last = now;

        // 4. Present
        vis.render(app.particles(), app.camera(), &app.snapshot());
    }

    inference.shutdown();
    log::info!("window closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
