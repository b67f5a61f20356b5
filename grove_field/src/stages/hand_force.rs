//! Attraction and swirl around active hands.

use glam::Vec3;

use super::smoothstep;
use crate::context::FrameContext;

pub const INTERACTION_RADIUS: f32 = 8.0;
pub const ATTRACTION:         f32 = 0.3;
pub const SWIRL:              f32 = 3.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandForce {
    pub offset: Vec3,
    pub glow:   f32,
}

/// 1 at the hand, easing to 0 at the interaction radius.
pub fn falloff(distance: f32) -> f32 {
    1.0 - smoothstep(0.0, INTERACTION_RADIUS, distance)
}

pub fn hand_force(p: Vec3, ctx: &FrameContext) -> HandForce {
    let mut out = HandForce::default();
    for hand in ctx.hands.iter().flatten() {
        let away = p - hand.position;
        let d = away.length();
        if d >= INTERACTION_RADIUS {
            continue;
        }
        let f = falloff(d);
        let attract = -away * ATTRACTION * f;
        let swirl = Vec3::Y.cross(away.normalize_or_zero()) * SWIRL * hand.swirl_sign * f;
        out.offset += attract + swirl;
        out.glow += f;
    }
    out
}
