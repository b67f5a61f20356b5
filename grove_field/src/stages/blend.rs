//! Chaos → structure blend.

use glam::Vec3;
use grove_blend::RatioValues;

use super::smoothstep;

/// Either forming trees or spreading roots pulls particles out of the cloud.
pub fn blend_weight(ratios: &RatioValues) -> f32 {
    smoothstep(0.0, 1.0, ratios.form.max(ratios.spread))
}

pub fn blend(chaos: Vec3, structure: Vec3, weight: f32) -> Vec3 {
    chaos.lerp(structure, weight)
}
