//! The four blend ratios and their per-frame exponential lag.
//!
//! Ratios are never assigned directly. A target is set and the current value
//! approaches it by a fixed fraction each rendered frame. The step is not
//! scaled by elapsed time, so convergence speed follows the frame rate.

use serde::{Deserialize, Serialize};

use crate::gesture::{FieldMode, GestureState};

/// Fraction of the remaining distance covered per frame.
pub const SMOOTHING_FACTOR: f32 = 0.04;

/// A ratio this close to its target is snapped onto it, so a lag toward 0
/// reaches exactly 0 instead of stalling at a subnormal value.
pub const SETTLE_EPSILON: f32 = 1e-4;

// ════════════════════════════════════════════════════════════════════════════
// Ratio
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ratio {
    current: f32,
    target:  f32,
}

impl Ratio {
    pub fn current(&self) -> f32 { self.current }
    pub fn target(&self)  -> f32 { self.target }

    pub fn set_target(&mut self, target: f32) {
        self.target = clamp_unit(target);
    }

    /// One first-order lag step. `k` is clamped into (0, 1].
    pub fn step(&mut self, k: f32) {
        let k = k.clamp(f32::EPSILON, 1.0);
        self.current += (self.target - self.current) * k;
        if (self.target - self.current).abs() < SETTLE_EPSILON {
            self.current = self.target;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RatioTargets / RatioValues
// ════════════════════════════════════════════════════════════════════════════

/// Target values derived from the discrete state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RatioTargets {
    pub form:   f32,
    pub spread: f32,
    pub rain:   f32,
    pub wave:   f32,
}

impl RatioTargets {
    pub fn from_mode(mode: &FieldMode) -> Self {
        let on = |b: bool| if b { 1.0 } else { 0.0 };
        let form = if mode.state == GestureState::Trees || mode.stormy {
            1.0
        } else if mode.state == GestureState::Spread {
            1.0
        } else {
            0.0
        };
        RatioTargets {
            form,
            spread: on(mode.state == GestureState::Spread),
            rain:   on(mode.raining),
            wave:   on(mode.stormy),
        }
    }
}

/// A read-only snapshot of the four ratios, each clamped to [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioValues {
    pub form:   f32,
    pub spread: f32,
    pub rain:   f32,
    pub wave:   f32,
}

impl RatioValues {
    pub fn new(form: f32, spread: f32, rain: f32, wave: f32) -> Self {
        RatioValues { form, spread, rain, wave }.clamped()
    }

    pub fn clamped(self) -> Self {
        RatioValues {
            form:   clamp_unit(self.form),
            spread: clamp_unit(self.spread),
            rain:   clamp_unit(self.rain),
            wave:   clamp_unit(self.wave),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RatioState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct RatioState {
    pub form:   Ratio,
    pub spread: Ratio,
    pub rain:   Ratio,
    pub wave:   Ratio,
}

impl RatioState {
    pub fn set_targets(&mut self, t: RatioTargets) {
        self.form.set_target(t.form);
        self.spread.set_target(t.spread);
        self.rain.set_target(t.rain);
        self.wave.set_target(t.wave);
    }

    pub fn step(&mut self, k: f32) {
        self.form.step(k);
        self.spread.step(k);
        self.rain.step(k);
        self.wave.step(k);
    }

    pub fn targets(&self) -> RatioTargets {
        RatioTargets {
            form:   self.form.target(),
            spread: self.spread.target(),
            rain:   self.rain.target(),
            wave:   self.wave.target(),
        }
    }

    pub fn values(&self) -> RatioValues {
        RatioValues::new(
            self.form.current(),
            self.spread.current(),
            self.rain.current(),
            self.wave.current(),
        )
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
