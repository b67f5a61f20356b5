//! # grove_gesture
//!
//! Hand-gesture controller for the grove particle field: a hand-tracking
//! thread, a background ambient pad and a software-rendered visualizer.
//!
//! ## Gesture → Effect mapping
//!
//! | Gesture | Effect |
//! |---|---|
//! | Closed fist | trees grow out of the cloud |
//! | Open palm | trees sink into a spreading root network |
//! | Victory | rain starts (stays on) |
//! | Thumb up | storm sea rolls in (stays on) |
//! | Pointing up | back to the idle cloud, rain and storm off |
//!
//! Tracked hands attract and swirl nearby particles (left and right hands
//! swirl in opposite directions) and steer the camera orbit.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard and mouse stand in for the camera.
//! * `leap` — **Hardware mode**: palm tracking from a LeapMotion controller.
//!
//! ### Simulation controls
//!
//! | Input | Action |
//! |---|---|
//! | hold `1`–`5` | fist, palm, victory, thumb up, pointing up |
//! | left mouse | left hand at the cursor |
//! | `Shift` + left mouse | both hands, mirrored |
//! | right drag | orbit the camera (no hands tracked) |
//! | `T` / `P` | trees / spread |
//! | `R` / `W` / `X` | rain / storm / reset |
//! | `C` | next theme color |
//! | `M` / `V` | ambient pad on/off / next pad voice |
//! | `Q` / `Escape` | quit |

pub mod error;
pub mod config;
pub mod slot;
pub mod inference;
pub mod audio;
pub mod visualizer;
pub mod app;

pub use error::{Error, Result};
