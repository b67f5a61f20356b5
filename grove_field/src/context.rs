//! Per-frame simulation context.
//!
//! Everything a transform stage may read besides the particle's own static
//! attributes is packed into one [`FrameContext`] value, built once per frame
//! by the caller and shared immutably by every particle.

use glam::Vec3;
use grove_blend::{HandPair, HandState, RatioValues};

/// Fraction of the gap to the latest reading closed per frame.
pub const HAND_SMOOTHING: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandInfluence {
    pub position: Vec3,
    /// +1 for the left hand, -1 for the right: opposite swirl directions.
    pub swirl_sign: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    /// Seconds since the field started.
    pub time:   f32,
    pub ratios: RatioValues,
    pub hands:  [Option<HandInfluence>; 2],
    /// Scattered-state base color (linear RGB, 0–1).
    pub theme:  Vec3,
    /// Camera position, used for perspective point size.
    pub eye:    Vec3,
}

impl FrameContext {
    pub fn new(time: f32, ratios: RatioValues, theme: Vec3, eye: Vec3) -> Self {
        FrameContext { time, ratios: ratios.clamped(), hands: [None, None], theme, eye }
    }

    pub fn with_hands(mut self, hands: &HandPair) -> Self {
        self.hands = [influence(&hands.left, 1.0), influence(&hands.right, -1.0)];
        self
    }

    pub fn any_hand(&self) -> bool {
        self.hands.iter().any(Option::is_some)
    }
}

fn influence(hand: &HandState, swirl_sign: f32) -> Option<HandInfluence> {
    hand.active.then(|| HandInfluence {
        position: Vec3::new(hand.x, hand.y, 0.0),
        swirl_sign,
    })
}

// ════════════════════════════════════════════════════════════════════════════
// HandSmoother
// ════════════════════════════════════════════════════════════════════════════

/// The engine's own smoothed copy of the hand pair.
///
/// A hand that was inactive snaps to its first reading instead of sliding in
/// from a stale position.
#[derive(Clone, Copy, Debug, Default)]
pub struct HandSmoother {
    hands: HandPair,
}

impl HandSmoother {
    pub fn update(&mut self, raw: &HandPair) -> HandPair {
        smooth_one(&mut self.hands.left, &raw.left);
        smooth_one(&mut self.hands.right, &raw.right);
        self.hands
    }

    pub fn current(&self) -> HandPair { self.hands }
}

fn smooth_one(current: &mut HandState, raw: &HandState) {
    if !raw.active {
        current.active = false;
        return;
    }
    if !current.active {
        *current = *raw;
        return;
    }
    let p = current.position().lerp(raw.position(), HAND_SMOOTHING);
    *current = HandState::at(p.x, p.y);
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
