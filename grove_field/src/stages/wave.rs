//! Storm wave overlay.
//!
//! With trees standing the whole forest bobs on the swell; with the field
//! unformed the particles collapse into a rolling sea surface instead.

use glam::Vec3;

use super::{mix, smoothstep};
use crate::context::FrameContext;

pub const WAVE_AMPLITUDE: f32 = 2.5;
pub const SEA_LEVEL:      f32 = -6.0;

pub fn wave_height(p: Vec3, time: f32) -> f32 {
    WAVE_AMPLITUDE * (p.x * 0.25 + time * 1.5).sin() * (p.z * 0.25 + time * 1.1).cos()
}

pub fn apply_wave(p: Vec3, ctx: &FrameContext) -> Vec3 {
    let wave = ctx.ratios.wave;
    if wave <= 0.0 {
        return p;
    }
    let w = wave_height(p, ctx.time);
    let floating = p.y + w;
    let sea = SEA_LEVEL + w;
    let y = mix(sea, floating, smoothstep(0.4, 0.6, ctx.ratios.form));
    Vec3::new(p.x, mix(p.y, y, wave), p.z)
}
