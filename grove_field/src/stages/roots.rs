//! Root morph: trunk particles spreading into a ground-level vein network.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::{mix, smoothstep};
use crate::archetype::{ParticleRef, CROWN_HEIGHT, GROUND_Y};
use crate::context::FrameContext;

/// Extra radial reach at full spread, per unit of `0.2 + height_norm`.
pub const ROOT_REACH:       f32 = 18.0;
/// Near-ground band the roots flatten into, relative to `GROUND_Y`.
pub const ROOT_BAND_LOW:    f32 = 0.3;
pub const ROOT_BAND_HIGH:   f32 = 1.1;
/// Spread above which the traveling pulse fades in.
pub const PULSE_THRESHOLD:  f32 = 0.8;
pub const PULSE_AMPLITUDE:  f32 = 0.6;
/// Outward/upward drift of leaves at full spread.
pub const LEAF_LIFT:        f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootSample {
    pub position: Vec3,
    /// Horizontal distance from the tree axis after the morph.
    pub radial: f32,
}

/// Angular vein density: 1 on a vein, 0.35 between veins.
pub fn vein_factor(angle: f32, jitter_y: f32) -> f32 {
    let wave = (angle * 12.0).sin() + 0.5 * (angle * 23.0 + jitter_y * TAU).sin();
    mix(0.35, 1.0, smoothstep(-0.2, 0.8, wave))
}

/// `swayed` is the particle's resting position after sway. Angle and height
/// are taken from the unswayed target so the vein pattern does not flicker
/// with the wind.
pub fn root_morph(swayed: Vec3, p: &ParticleRef<'_>, ctx: &FrameContext) -> RootSample {
    let spread = ctx.ratios.spread;
    let local = Vec2::new(p.target.x, p.target.z) - p.tree.center;
    let base_radial = local.length();

    if spread <= 0.0 {
        return RootSample { position: swayed, radial: base_radial };
    }

    if p.is_leaf {
        let dir = local.normalize_or_zero();
        let lift = Vec3::new(dir.x * 0.8, 0.6, dir.y * 0.8) * LEAF_LIFT * spread;
        return RootSample { position: swayed + lift, radial: base_radial };
    }

    let angle = local.y.atan2(local.x);
    let h = p.tree.height_norm(p.target);
    let extra = spread * ROOT_REACH * (0.2 + h) * vein_factor(angle, p.jitter.y);
    let radial = base_radial + extra;

    let band = (h / CROWN_HEIGHT).clamp(0.0, 1.0);
    let ground = GROUND_Y + mix(ROOT_BAND_LOW, ROOT_BAND_HIGH, band);
    let mut y = mix(swayed.y, ground, smoothstep(0.0, 0.35, spread));
    if spread > PULSE_THRESHOLD {
        let ramp = (spread - PULSE_THRESHOLD) / (1.0 - PULSE_THRESHOLD);
        y += (radial * 0.6 - ctx.time * 3.0).sin() * PULSE_AMPLITUDE * ramp;
    }

    let dir = Vec2::new(angle.cos(), angle.sin());
    RootSample {
        position: Vec3::new(swayed.x + dir.x * extra, y, swayed.z + dir.y * extra),
        radial,
    }
}
