//! # grove_blend
//!
//! Everything between the hand-tracking collaborator and the particle field:
//!
//! * [`controller::BlendController`] turns classified gesture labels into the
//!   discrete [`gesture::FieldMode`] and four smoothed ratios.
//! * [`hands::HandTrackingAdapter`] turns normalized landmarks into bounded
//!   world positions for up to two hands.
//! * [`camera::CameraRig`] orbits the viewpoint from the averaged hand position.
//!
//! ## Gesture → Effect mapping
//!
//! | Label | Effect |
//! |---|---|
//! | `Closed_Fist` | state → Trees |
//! | `Open_Palm` | state → Spread |
//! | `Victory` | raining latched on |
//! | `Thumb_Up` | stormy latched on |
//! | `Pointing_Up` | full reset: Idle, rain and storm off |
//!
//! A label only registers when its confidence is strictly above 0.5.

pub mod gesture;
pub mod ratio;
pub mod controller;
pub mod hands;
pub mod camera;

pub use camera::CameraRig;
pub use controller::BlendController;
pub use gesture::{Classification, FieldMode, GestureLabel, GestureState};
pub use hands::{HandPair, HandState, HandTrackingAdapter, Handedness, Landmark, LandmarkSet};
pub use ratio::{Ratio, RatioState, RatioTargets, RatioValues};
