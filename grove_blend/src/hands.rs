//! Hand-tracking adapter.
//!
//! Landmark sets arrive in normalized image coordinates (`x, y ∈ [0, 1]`,
//! origin top-left, mirrored camera). One reference point per hand is mapped
//! onto a bounded plane in world units:
//!
//! ```text
//! worldX = (0.5 - x) * 30      ∈ [-15, 15]
//! worldY = (0.5 - y) * 20      ∈ [-10, 10]
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub const WORLD_WIDTH:  f32 = 30.0;
pub const WORLD_HEIGHT: f32 = 20.0;

/// Wrist landmark index.
pub const WRIST: usize = 0;
/// Middle-finger MCP; closest landmark to the palm center.
pub const PALM_CENTER: usize = 9;

// ════════════════════════════════════════════════════════════════════════════
// Landmarks
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Left"  => Some(Handedness::Left),
            "Right" => Some(Handedness::Right),
            _       => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Handedness::Left  => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }
}

/// One detected hand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub handedness: Option<Handedness>,
    pub landmarks:  Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(handedness: Option<Handedness>, landmarks: Vec<Landmark>) -> Self {
        LandmarkSet { handedness, landmarks }
    }

    /// A set carrying only a single reference point.
    pub fn single(handedness: Option<Handedness>, x: f32, y: f32) -> Self {
        LandmarkSet { handedness, landmarks: vec![Landmark::new(x, y)] }
    }

    /// Palm center when the full skeleton is present, wrist otherwise.
    pub fn reference_point(&self) -> Option<Landmark> {
        self.landmarks.get(PALM_CENTER)
            .or_else(|| self.landmarks.get(WRIST))
            .copied()
            .filter(|l| l.x.is_finite() && l.y.is_finite())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandState / HandPair
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandState {
    pub x:      f32,
    pub y:      f32,
    pub active: bool,
}

impl HandState {
    pub fn at(x: f32, y: f32) -> Self {
        HandState { x, y, active: true }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandPair {
    pub left:  HandState,
    pub right: HandState,
}

impl HandPair {
    pub fn get(&self, side: Handedness) -> &HandState {
        match side {
            Handedness::Left  => &self.left,
            Handedness::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Handedness) -> &mut HandState {
        match side {
            Handedness::Left  => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }

    pub fn active_count(&self) -> usize {
        self.left.active as usize + self.right.active as usize
    }

    pub fn any_active(&self) -> bool {
        self.active_count() > 0
    }

    /// Mean position of the active hands, or `None` when no hand is active.
    pub fn active_average(&self) -> Option<Vec2> {
        let n = self.active_count();
        if n == 0 { return None; }
        let sum = [self.left, self.right].iter()
            .filter(|h| h.active)
            .fold(Vec2::ZERO, |acc, h| acc + h.position());
        Some(sum / n as f32)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandTrackingAdapter
// ════════════════════════════════════════════════════════════════════════════

/// Stateless converter from landmark sets to [`HandPair`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HandTrackingAdapter;

impl HandTrackingAdapter {
    /// Map a normalized image point to world units, clamping to the frame.
    pub fn to_world(x: f32, y: f32) -> Vec2 {
        let x = x.clamp(0.0, 1.0);
        let y = y.clamp(0.0, 1.0);
        Vec2::new((0.5 - x) * WORLD_WIDTH, (0.5 - y) * WORLD_HEIGHT)
    }

    /// Build a fresh hand pair from this frame's detections.
    ///
    /// Sets without handedness fall back to detection order (first ⇒ left,
    /// second ⇒ right). A side reported twice spills into the free side.
    /// Sets without a usable reference point are dropped.
    pub fn adapt(sets: &[LandmarkSet]) -> HandPair {
        let mut pair = HandPair::default();
        for (index, set) in sets.iter().take(2).enumerate() {
            let Some(point) = set.reference_point() else {
                log::debug!("hand {} has no usable landmark, skipped", index);
                continue;
            };
            let fallback = if index == 0 { Handedness::Left } else { Handedness::Right };
            let mut side = set.handedness.unwrap_or(fallback);
            if pair.get(side).active {
                side = side.other();
            }
            let world = Self::to_world(point.x, point.y);
            *pair.get_mut(side) = HandState::at(world.x, world.y);
        }
        pair
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
