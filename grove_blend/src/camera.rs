//! Hand-driven orbit camera.
//!
//! The camera lives on a sphere around the origin and always looks at it.
//! While at least one hand is active the rig owns the camera; otherwise it
//! leaves the spherical state alone and the window's drag-orbit moves it.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Mat4, Vec3};

use crate::gesture::GestureState;
use crate::hands::{HandPair, WORLD_HEIGHT, WORLD_WIDTH};

pub const DEFAULT_RADIUS:      f32 = 65.0;
pub const ESTABLISHING_RADIUS: f32 = 95.0;
/// Polar angle looking steeply down on the root network.
pub const OVERHEAD_POLAR:      f32 = 0.55;
/// Max azimuth swing either side of the front view (rad).
pub const AZIMUTH_RANGE:       f32 = 0.8;
/// Max polar tilt either side of the horizon (rad).
pub const POLAR_RANGE:         f32 = 0.35;
pub const DEFAULT_RATE:        f32 = 2.5;
pub const ESTABLISHING_RATE:   f32 = 0.8;

const POLAR_MIN: f32 = 0.1;
const POLAR_MAX: f32 = PI - 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius:  f32,
    pub azimuth: f32,
    pub polar:   f32,
}

impl Spherical {
    /// Y-up convention: polar measured from +Y, azimuth from +Z toward +X.
    pub fn to_cartesian(&self) -> Vec3 {
        let s = self.polar.sin();
        Vec3::new(
            self.radius * s * self.azimuth.sin(),
            self.radius * self.polar.cos(),
            self.radius * s * self.azimuth.cos(),
        )
    }
}

impl Default for Spherical {
    fn default() -> Self {
        Spherical { radius: DEFAULT_RADIUS, azimuth: 0.0, polar: FRAC_PI_2 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CameraRig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct CameraRig {
    current:  Spherical,
    target:   Spherical,
    pub fovy: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        CameraRig::new()
    }
}

impl CameraRig {
    pub fn new() -> Self {
        CameraRig {
            current: Spherical::default(),
            target:  Spherical::default(),
            fovy:    60.0_f32.to_radians(),
        }
    }

    /// Target orientation for an averaged hand position and discrete state.
    pub fn target_for(avg_x: f32, avg_y: f32, state: GestureState) -> (Spherical, f32) {
        let nx = (avg_x / (WORLD_WIDTH * 0.5)).clamp(-1.0, 1.0);
        let ny = (avg_y / (WORLD_HEIGHT * 0.5)).clamp(-1.0, 1.0);
        let azimuth = nx * AZIMUTH_RANGE;
        if state == GestureState::Spread {
            let target = Spherical { radius: ESTABLISHING_RADIUS, azimuth, polar: OVERHEAD_POLAR };
            (target, ESTABLISHING_RATE)
        } else {
            let target = Spherical {
                radius: DEFAULT_RADIUS,
                azimuth,
                polar: FRAC_PI_2 - ny * POLAR_RANGE,
            };
            (target, DEFAULT_RATE)
        }
    }

    /// Advance by `dt` seconds. Returns false (and does nothing) when no hand
    /// is active.
    pub fn update(&mut self, hands: &HandPair, state: GestureState, dt: f32) -> bool {
        let Some(avg) = hands.active_average() else { return false; };
        let (target, rate) = Self::target_for(avg.x, avg.y, state);
        self.target = target;

        let alpha = 1.0 - (-rate * dt.max(0.0)).exp();
        self.current.radius  += (target.radius  - self.current.radius)  * alpha;
        self.current.azimuth = wrap_angle(
            self.current.azimuth + wrap_angle(target.azimuth - self.current.azimuth) * alpha,
        );
        self.current.polar   += (target.polar   - self.current.polar)   * alpha;
        true
    }

    /// Drag-orbit collaborator: rotate by deltas in radians.
    pub fn orbit_by(&mut self, d_azimuth: f32, d_polar: f32) {
        self.current.azimuth = wrap_angle(self.current.azimuth + d_azimuth);
        self.current.polar = (self.current.polar + d_polar).clamp(POLAR_MIN, POLAR_MAX);
    }

    pub fn spherical(&self) -> Spherical { self.current }
    pub fn target(&self)    -> Spherical { self.target }
    pub fn eye(&self)       -> Vec3      { self.current.to_cartesian() }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy, aspect, 0.1, 500.0) * self.view()
    }
}

/// Angle folded into [-π, π).
fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hands::HandState;

    #[test]
    fn default_eye_is_in_front() {
        let eye = CameraRig::new().eye();
        assert!(eye.x.abs() < 1e-4);
        assert!(eye.y.abs() < 1e-3);
        assert!((eye.z - DEFAULT_RADIUS).abs() < 1e-3);
    }

    #[test]
    fn no_hands_no_update() {
        let mut rig = CameraRig::new();
        rig.orbit_by(0.4, 0.0);
        let before = rig.spherical();
        assert!(!rig.update(&HandPair::default(), GestureState::Trees, 1.0));
        assert_eq!(rig.spherical(), before);
    }

    #[test]
    fn symmetric_hands_target_front() {
        let mut rig = CameraRig::new();
        let hands = HandPair { left: HandState::at(-10.0, 0.0), right: HandState::at(10.0, 0.0) };
        assert!(rig.update(&hands, GestureState::Idle, 0.016));
        assert_eq!(rig.target().azimuth, 0.0);
    }

    #[test]
    fn hand_right_swings_azimuth() {
        let (t, _) = CameraRig::target_for(15.0, 0.0, GestureState::Idle);
        assert!((t.azimuth - AZIMUTH_RANGE).abs() < 1e-6);
        let (t, _) = CameraRig::target_for(0.0, 10.0, GestureState::Idle);
        assert!(t.polar < FRAC_PI_2);
    }

    #[test]
    fn spread_pulls_back_and_looks_down() {
        let (t, rate) = CameraRig::target_for(0.0, 0.0, GestureState::Spread);
        assert_eq!(t.radius, ESTABLISHING_RADIUS);
        assert_eq!(t.polar, OVERHEAD_POLAR);
        assert!(rate < DEFAULT_RATE);

        let mut rig = CameraRig::new();
        let hands = HandPair { left: HandState::at(0.0, 0.0), ..Default::default() };
        for _ in 0..600 { rig.update(&hands, GestureState::Spread, 1.0 / 60.0); }
        assert!((rig.spherical().radius - ESTABLISHING_RADIUS).abs() < 0.5);
        assert!(rig.eye().y > 0.0);
    }

    #[test]
    fn smoothing_is_time_scaled() {
        let hands = HandPair { left: HandState::at(15.0, 0.0), ..Default::default() };
        let mut fine = CameraRig::new();
        for _ in 0..10 { fine.update(&hands, GestureState::Idle, 0.01); }
        let mut coarse = CameraRig::new();
        coarse.update(&hands, GestureState::Idle, 0.1);
        assert!((fine.spherical().azimuth - coarse.spherical().azimuth).abs() < 1e-4);
    }

    #[test]
    fn orbit_clamps_polar() {
        let mut rig = CameraRig::new();
        rig.orbit_by(0.0, 10.0);
        assert_eq!(rig.spherical().polar, POLAR_MAX);
        rig.orbit_by(0.0, -10.0);
        assert_eq!(rig.spherical().polar, POLAR_MIN);
    }

    /// Total azimuth travelled while tracking `hands` for `frames` frames.
    fn swept(rig: &mut CameraRig, hands: &HandPair, frames: usize) -> f32 {
        let mut total = 0.0;
        for _ in 0..frames {
            let before = rig.spherical().azimuth;
            rig.update(hands, GestureState::Idle, 1.0 / 60.0);
            total += wrap_angle(rig.spherical().azimuth - before).abs();
        }
        total
    }

    #[test]
    fn orbit_wraps_azimuth() {
        let mut rig = CameraRig::new();
        for _ in 0..300 { rig.orbit_by(0.0628, 0.0); }
        let az = rig.spherical().azimuth;
        assert!((-PI..PI).contains(&az), "azimuth {}", az);
    }

    #[test]
    fn hands_take_over_without_unwinding_drag_turns() {
        let mut rig = CameraRig::new();
        for _ in 0..300 { rig.orbit_by(0.0628, 0.0); }
        let start = rig.spherical().azimuth;

        let hands = HandPair { left: HandState::at(0.0, 0.0), ..Default::default() };
        let total = swept(&mut rig, &hands, 600);
        assert!(rig.spherical().azimuth.abs() < 1e-3);
        assert!(total <= start.abs() + 1e-3, "swept {} from {}", total, start);
    }

    #[test]
    fn hands_take_over_along_shortest_arc() {
        let mut rig = CameraRig::new();
        rig.orbit_by(3.0, 0.0);
        // target -0.8: the short way round crosses ±π (≈2.48 rad), not 3.8 rad
        let hands = HandPair { left: HandState::at(-15.0, 0.0), ..Default::default() };
        let total = swept(&mut rig, &hands, 900);
        assert!((rig.spherical().azimuth + AZIMUTH_RANGE).abs() < 1e-3);
        assert!(total < PI, "swept {}", total);
    }
}
