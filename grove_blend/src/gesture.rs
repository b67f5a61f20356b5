//! Gesture labels and the small discrete state they drive.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Classification — one result from the gesture model
// ════════════════════════════════════════════════════════════════════════════

/// A labeled classification as delivered by the inference collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label:      String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Classification { label: label.into(), confidence }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureLabel — the labels the field reacts to
// ════════════════════════════════════════════════════════════════════════════

/// Recognised gesture labels. Anything else maps to [`GestureLabel::None`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    ClosedFist,
    OpenPalm,
    Victory,
    ThumbUp,
    PointingUp,
    None,
}

impl GestureLabel {
    /// Every label that changes state, in the order the simulator binds keys.
    pub const ACTIVE: [GestureLabel; 5] = [
        GestureLabel::ClosedFist,
        GestureLabel::OpenPalm,
        GestureLabel::Victory,
        GestureLabel::ThumbUp,
        GestureLabel::PointingUp,
    ];

    pub fn parse(label: &str) -> Self {
        match label {
            "Closed_Fist" => GestureLabel::ClosedFist,
            "Open_Palm"   => GestureLabel::OpenPalm,
            "Victory"     => GestureLabel::Victory,
            "Thumb_Up"    => GestureLabel::ThumbUp,
            "Pointing_Up" => GestureLabel::PointingUp,
            _             => GestureLabel::None,
        }
    }

    /// The wire name, as the classifier spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::ClosedFist => "Closed_Fist",
            GestureLabel::OpenPalm   => "Open_Palm",
            GestureLabel::Victory    => "Victory",
            GestureLabel::ThumbUp    => "Thumb_Up",
            GestureLabel::PointingUp => "Pointing_Up",
            GestureLabel::None       => "None",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureState + FieldMode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureState {
    #[default]
    Idle,
    Trees,
    Spread,
}

impl GestureState {
    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle   => "IDLE",
            GestureState::Trees  => "TREES",
            GestureState::Spread => "SPREAD",
        }
    }
}

/// Discrete state plus the two latched weather flags.
///
/// `raining` and `stormy` are latches: they can be set individually but only
/// cleared together by [`FieldMode::reset`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMode {
    pub state:   GestureState,
    pub raining: bool,
    pub stormy:  bool,
}

impl FieldMode {
    /// Apply a recognised label. Returns false for [`GestureLabel::None`].
    pub fn apply(&mut self, label: GestureLabel) -> bool {
        match label {
            GestureLabel::ClosedFist => self.state = GestureState::Trees,
            GestureLabel::OpenPalm   => self.state = GestureState::Spread,
            GestureLabel::Victory    => self.raining = true,
            GestureLabel::ThumbUp    => self.stormy = true,
            GestureLabel::PointingUp => self.reset(),
            GestureLabel::None       => return false,
        }
        true
    }

    pub fn reset(&mut self) {
        *self = FieldMode::default();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_labels() {
        for label in GestureLabel::ACTIVE {
            assert_eq!(GestureLabel::parse(label.as_str()), label);
        }
    }

    #[test]
    fn unknown_labels_are_none() {
        assert_eq!(GestureLabel::parse("ILoveYou"), GestureLabel::None);
        assert_eq!(GestureLabel::parse(""), GestureLabel::None);
        assert_eq!(GestureLabel::parse("closed_fist"), GestureLabel::None);
    }

    #[test]
    fn weather_flags_are_independent() {
        let mut mode = FieldMode::default();
        mode.apply(GestureLabel::Victory);
        assert!(mode.raining);
        assert!(!mode.stormy);
        mode.apply(GestureLabel::ClosedFist);
        assert!(mode.raining);
        assert_eq!(mode.state, GestureState::Trees);
    }

    #[test]
    fn pointing_up_resets_everything() {
        let mut mode = FieldMode { state: GestureState::Spread, raining: true, stormy: true };
        mode.apply(GestureLabel::PointingUp);
        assert_eq!(mode, FieldMode::default());
    }
}
