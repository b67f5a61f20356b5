//! Wind sway of the formed trees.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::archetype::{ParticleRef, GROUND_Y};
use crate::context::FrameContext;

/// Horizontal displacement per world unit of height at full form.
pub const TRUNK_SWAY: f32 = 0.012;
pub const LEAF_SWAY:  f32 = 0.035;

/// The particle's resting position, swayed. Amplitude grows with height above
/// ground and with `form`, so an unformed field does not sway at all.
pub fn sway(p: &ParticleRef<'_>, ctx: &FrameContext) -> Vec3 {
    let form = ctx.ratios.form;
    if form <= 0.0 {
        return p.target;
    }
    let lift = (p.target.y - GROUND_Y).max(0.0);
    let per_unit = if p.is_leaf { LEAF_SWAY } else { TRUNK_SWAY };
    let amp = per_unit * lift * form;
    let phase = p.jitter.x * TAU;
    p.target + Vec3::new(
        (ctx.time * 0.9 + phase).sin() * amp,
        0.0,
        (ctx.time * 0.7 + phase * 1.3).cos() * amp * 0.6,
    )
}
