//! Falling rain override.

use glam::Vec3;

use crate::archetype::ParticleRef;
use crate::context::FrameContext;

/// Particles whose `jitter.x` exceeds this become raindrops.
pub const RAIN_SHARE_THRESHOLD: f32 = 0.95;
pub const RAIN_TOP:  f32 = 25.0;
pub const RAIN_SPAN: f32 = 50.0;
/// Horizontal scatter around the target column, ± half of this.
pub const RAIN_SCATTER: f32 = 4.0;

pub fn is_rain_particle(jitter: Vec3) -> bool {
    jitter.x > RAIN_SHARE_THRESHOLD
}

pub fn fall_speed(jitter: Vec3) -> f32 {
    8.0 + 10.0 * jitter.y
}

/// Looping fall from `RAIN_TOP` down through `RAIN_SPAN`.
pub fn rain_position(p: &ParticleRef<'_>, time: f32) -> Vec3 {
    let fall = (time * fall_speed(p.jitter) + p.jitter.z * RAIN_SPAN).rem_euclid(RAIN_SPAN);
    let dx = ((p.jitter.z * 13.0).fract() - 0.5) * RAIN_SCATTER;
    let dz = ((p.jitter.y * 7.0).fract() - 0.5) * RAIN_SCATTER;
    Vec3::new(p.target.x + dx, RAIN_TOP - fall, p.target.z + dz)
}

/// `Some` when the particle is a raindrop and rain is on at all.
pub fn rain_override(p: &ParticleRef<'_>, ctx: &FrameContext) -> Option<Vec3> {
    (ctx.ratios.rain > 0.0 && is_rain_particle(p.jitter)).then(|| rain_position(p, ctx.time))
}
