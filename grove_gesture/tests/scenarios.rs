//! End-to-end scenarios for the gesture grove.
//!
//! Each test drives the application state the way the render loop does:
//! tracking frames in, one `tick` per rendered frame, snapshot out.
//!
//! Run with: cargo test -p grove_gesture --test scenarios -- --nocapture

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use grove_blend::{Classification, GestureLabel, GestureState, Handedness, LandmarkSet, RatioValues};
use grove_field::archetype::GROUND_Y;
use grove_field::stages::roots::{PULSE_AMPLITUDE, ROOT_BAND_HIGH, ROOT_BAND_LOW};
use grove_field::stages::structure;
use grove_field::{FrameContext, ParticleRef, TreeArchetype};
use grove_gesture::app::AppState;
use grove_gesture::config::{AppConfig, AudioConfig};
use grove_gesture::inference::{spawn_inference_source, InferenceEvent, SimInferenceSource, SimInput, SimPointer};

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

const DT: f32 = 1.0 / 60.0;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn quiet_app() -> AppState {
    AppState::new(&AppConfig {
        particle_count: 3_000,
        tree_count:     5,
        audio:          AudioConfig { enabled: false, ..AudioConfig::default() },
        ..AppConfig::default()
    })
}

struct Feed {
    clock: u64,
}

impl Feed {
    fn new() -> Self { Feed { clock: 0 } }

    /// Next tracking frame, 33 ms after the previous one.
    fn frame(&mut self, label: Option<(&str, f32)>, hands: Vec<LandmarkSet>) -> grove_gesture::inference::InferenceFrame {
        self.clock += 33;
        grove_gesture::inference::InferenceFrame {
            timestamp:      Duration::from_millis(self.clock),
            classification: label.map(|(l, c)| Classification::new(l, c)),
            landmarks:      hands,
        }
    }
}

// =============================================================================
// SCENARIO 1: fist grows the forest
// =============================================================================

#[test]
fn closed_fist_forms_trees() {
    let mut app = quiet_app();
    let mut feed = Feed::new();

    app.apply_inference(&feed.frame(Some(("Closed_Fist", 0.9)), vec![]));
    app.tick(DT);
    assert_eq!(app.snapshot().state, GestureState::Trees);
    assert_eq!(app.controller().targets().form, 1.0);

    for _ in 1..75 {
        app.tick(DT);
    }
    let form = app.controller().ratios().form;
    assert!(form > 0.95, "form after 75 ticks: {}", form);
    assert!(form < 1.0);
}

// =============================================================================
// SCENARIO 2: trunks spread into roots
// =============================================================================

/// Sweep spread 0 → 1 at full form for one trunk particle of a tree standing
/// at the origin, checking the roots reach further out and hug the ground.
fn assert_trunk_spreads(target: Vec3) {
    let tree = TreeArchetype { center: Vec2::ZERO, height: 16.0, scale: 1.0 };
    let p = ParticleRef {
        chaos:   Vec3::new(20.0, 15.0, -8.0),
        target,
        jitter:  Vec3::splat(0.3),
        is_leaf: false,
        tree:    &tree,
    };

    let mut last_radial = f32::NEG_INFINITY;
    let mut last_horizontal = f32::NEG_INFINITY;
    for i in 0..=20 {
        let spread = i as f32 / 20.0;
        let ctx = FrameContext::new(2.0, RatioValues::new(1.0, spread, 0.0, 0.0), Vec3::ONE, Vec3::new(0.0, 0.0, 65.0));
        let s = structure(&p, &ctx);
        let horizontal = Vec2::new(s.position.x, s.position.z).length();
        assert!(s.position.is_finite(), "non-finite position at spread {}", spread);

        if i > 0 {
            assert!(s.root_radial > last_radial, "radial not increasing at spread {}", spread);
            assert!(horizontal > last_horizontal, "distance not increasing at spread {}", spread);
        }
        if spread >= 0.35 {
            let low  = GROUND_Y + ROOT_BAND_LOW - PULSE_AMPLITUDE;
            let high = GROUND_Y + ROOT_BAND_HIGH + PULSE_AMPLITUDE;
            assert!(
                (low..=high).contains(&s.position.y),
                "y {} outside ground band at spread {}", s.position.y, spread,
            );
        }
        last_radial = s.root_radial;
        last_horizontal = horizontal;
    }
}

#[test]
fn trunk_spreads_along_the_ground() {
    assert_trunk_spreads(Vec3::new(0.6, -3.0, 0.2));
}

#[test]
fn trunk_on_the_tree_axis_spreads_too() {
    // zero offset from the axis: the root still picks a direction and grows
    assert_trunk_spreads(Vec3::new(0.0, -3.0, 0.0));
}

// =============================================================================
// SCENARIO 3: symmetric hands center the camera
// =============================================================================

#[test]
fn symmetric_hands_face_the_front() {
    let mut app = quiet_app();
    let mut feed = Feed::new();

    // x = 0.8333 → world -10, x = 0.1667 → world +10
    let hands = vec![
        LandmarkSet::single(Some(Handedness::Left), 0.8333, 0.5),
        LandmarkSet::single(Some(Handedness::Right), 1.0 - 0.8333, 0.5),
    ];
    app.apply_inference(&feed.frame(None, hands));
    assert_eq!(app.snapshot().hands_active, 2);
    assert!((app.hands().left.x + 10.0).abs() < 0.01);
    assert!((app.hands().right.x - 10.0).abs() < 0.01);

    app.orbit(0.5, 0.0); // ignored while hands are tracked
    app.tick(DT);
    assert!(app.camera().target().azimuth.abs() < 1e-4);
    assert!(app.camera().spherical().azimuth.abs() < 1e-4);
}

// =============================================================================
// SCENARIO 4: latch and reset
// =============================================================================

#[test]
fn victory_thumb_then_pointing_resets_everything() {
    let mut app = quiet_app();
    let mut feed = Feed::new();

    app.apply_inference(&feed.frame(Some(("Victory", 0.9)), vec![]));
    assert!(app.snapshot().raining);

    app.apply_inference(&feed.frame(Some(("Thumb_Up", 0.9)), vec![]));
    let ui = app.snapshot();
    assert!(ui.raining && ui.stormy);

    // other gestures never clear the latch
    app.apply_inference(&feed.frame(Some(("Open_Palm", 0.9)), vec![]));
    app.apply_inference(&feed.frame(None, vec![]));
    assert!(app.snapshot().raining);

    app.apply_inference(&feed.frame(Some(("Pointing_Up", 0.9)), vec![]));
    let ui = app.snapshot();
    assert_eq!(ui.state, GestureState::Idle);
    assert!(!ui.raining);
    assert!(!ui.stormy);
    assert_eq!(ui.last_label, GestureLabel::PointingUp);
}

// =============================================================================
// SCENARIO 5: confidence gate
// =============================================================================

#[test]
fn half_confidence_is_ignored() {
    let mut app = quiet_app();
    let mut feed = Feed::new();

    let label = app.apply_inference(&feed.frame(Some(("Closed_Fist", 0.5)), vec![]));
    assert_eq!(label, Some(GestureLabel::None));
    assert_eq!(app.snapshot().state, GestureState::Idle);

    let label = app.apply_inference(&feed.frame(Some(("Closed_Fist", 0.51)), vec![]));
    assert_eq!(label, Some(GestureLabel::ClosedFist));
    assert_eq!(app.snapshot().state, GestureState::Trees);
}

// =============================================================================
// SCENARIO 6: simulated camera thread end to end
// =============================================================================

#[test]
fn simulated_source_drives_the_app() {
    let mut app = quiet_app();
    let (tx, rx) = mpsc::channel();
    let mut inference = spawn_inference_source(Box::new(SimInferenceSource::new(rx, 120.0)));

    tx.send(SimInput {
        gesture: Some(GestureLabel::ClosedFist),
        pointer: Some(SimPointer { x: 0.25, y: 0.5, mirrored: true }),
    }).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline && app.snapshot().hands_active < 2 {
        if let Some(event) = inference.poll() {
            app.apply_event(&event);
        }
        app.tick(DT);
        thread::sleep(Duration::from_millis(2));
    }

    let ui = app.snapshot();
    assert_eq!(ui.state, GestureState::Trees);
    assert_eq!(ui.hands_active, 2);
    assert!(!ui.alert);
    assert!(app.particles().iter().all(|p| p.position.is_finite()));

    inference.shutdown();
    assert!(!inference.is_running());
}

#[test]
fn failed_source_keeps_the_field_running() {
    let mut app = quiet_app();
    let mut feed = Feed::new();
    app.apply_inference(&feed.frame(Some(("Open_Palm", 0.9)), vec![]));

    app.apply_event(&InferenceEvent::Failed("inference: camera unplugged".into()));
    for _ in 0..120 {
        app.tick(DT);
    }
    let ui = app.snapshot();
    assert!(ui.alert);
    assert!(ui.status.contains("camera unplugged"));
    assert_eq!(ui.state, GestureState::Spread);
    assert!(app.controller().ratios().spread > 0.99);
}
