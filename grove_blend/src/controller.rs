//! State-blend controller.
//!
//! Owns the [`FieldMode`] and the [`RatioState`]. Each tracking frame may
//! deliver one classification; each rendered frame calls [`BlendController::tick`]
//! which re-derives targets from the mode and advances the lag.

use crate::gesture::{Classification, FieldMode, GestureLabel, GestureState};
use crate::ratio::{RatioState, RatioTargets, RatioValues, SMOOTHING_FACTOR};

/// Classifications at or below this confidence are ignored.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct BlendController {
    mode:       FieldMode,
    ratios:     RatioState,
    last_label: GestureLabel,
    smoothing:  f32,
}

impl Default for BlendController {
    fn default() -> Self {
        BlendController::new()
    }
}

impl BlendController {
    pub fn new() -> Self {
        BlendController {
            mode:       FieldMode::default(),
            ratios:     RatioState::default(),
            last_label: GestureLabel::None,
            smoothing:  SMOOTHING_FACTOR,
        }
    }

    /// Process one tracking frame's classification (possibly absent).
    ///
    /// Returns the label that is reported to the UI: the recognised label, or
    /// [`GestureLabel::None`] when absent, unknown or not confident enough.
    pub fn apply(&mut self, classification: Option<&Classification>) -> GestureLabel {
        let label = match classification {
            Some(c) if c.confidence > CONFIDENCE_THRESHOLD => GestureLabel::parse(&c.label),
            _ => GestureLabel::None,
        };
        if self.mode.apply(label) {
            log::debug!("gesture {} -> {:?}", label.as_str(), self.mode);
        }
        self.last_label = label;
        label
    }

    /// Advance one rendered frame.
    pub fn tick(&mut self) {
        self.ratios.set_targets(RatioTargets::from_mode(&self.mode));
        self.ratios.step(self.smoothing);
    }

    // ── setters shared with the UI ──────────────────────────────────────────

    pub fn set_state(&mut self, state: GestureState) {
        self.mode.state = state;
    }

    pub fn latch_rain(&mut self) {
        self.mode.raining = true;
    }

    pub fn latch_storm(&mut self) {
        self.mode.stormy = true;
    }

    pub fn reset(&mut self) {
        self.mode.reset();
    }

    // ── accessors ───────────────────────────────────────────────────────────

    pub fn mode(&self)       -> FieldMode    { self.mode }
    pub fn state(&self)      -> GestureState { self.mode.state }
    pub fn last_label(&self) -> GestureLabel { self.last_label }
    pub fn targets(&self)    -> RatioTargets { RatioTargets::from_mode(&self.mode) }
    pub fn ratios(&self)     -> RatioValues  { self.ratios.values() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
