//! Named transform stages of the per-particle morph.
//!
//! Each stage is a pure function of one particle's static attributes and the
//! frame context, so it can be checked on literal inputs. [`structure`] chains
//! them in order:
//!
//! ```text
//! rain override ──(eligible & raining)──────────────────────────────▶ done
//!      │
//!      ▼
//! sway ─▶ root morph ─▶ chaos→target blend ─▶ wave overlay ─▶ hand force
//! ```

pub mod sway;
pub mod roots;
pub mod blend;
pub mod wave;
pub mod rain;
pub mod hand_force;

use glam::Vec3;

use crate::archetype::ParticleRef;
use crate::context::FrameContext;

/// Structural result of the stage chain for one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Structure {
    pub position: Vec3,
    /// Accumulated hand-interaction strength (0 when untouched).
    pub glow: f32,
    /// True when the rain override replaced every other layer.
    pub rain: bool,
    /// Distance from the tree axis after the root morph.
    pub root_radial: f32,
    /// Resting height above ground over tree height.
    pub height_norm: f32,
}

pub fn structure(p: &ParticleRef<'_>, ctx: &FrameContext) -> Structure {
    let height_norm = p.tree.height_norm(p.target);

    if let Some(position) = rain::rain_override(p, ctx) {
        return Structure { position, glow: 0.0, rain: true, root_radial: 0.0, height_norm };
    }

    let swayed  = sway::sway(p, ctx);
    let root    = roots::root_morph(swayed, p, ctx);
    let blended = blend::blend(p.chaos, root.position, blend::blend_weight(&ctx.ratios));
    let waved   = wave::apply_wave(blended, ctx);
    let force   = hand_force::hand_force(waved, ctx);

    Structure {
        position: waved + force.offset,
        glow: force.glow,
        rain: false,
        root_radial: root.radial,
        height_norm,
    }
}

/// Hermite ease between two edges, clamped to [0, 1].
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ParticleArchetypes;
    use grove_blend::RatioValues;
    use proptest::prelude::*;

    fn ctx(form: f32, spread: f32, rain: f32, wave: f32, time: f32) -> FrameContext {
        FrameContext::new(time, RatioValues::new(form, spread, rain, wave), Vec3::ONE, Vec3::new(0.0, 0.0, 65.0))
    }

    #[test]
    fn smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    }

    #[test]
    fn idle_field_is_chaos() {
        let a = ParticleArchetypes::generate(200, 20, 1);
        for i in 0..a.len() {
            let p = a.particle(i);
            let s = structure(&p, &ctx(0.0, 0.0, 0.0, 0.0, 3.0));
            assert_eq!(s.position, p.chaos);
        }
    }

    #[test]
    fn formed_field_is_near_targets() {
        let a = ParticleArchetypes::generate(200, 20, 2);
        for i in 0..a.len() {
            let p = a.particle(i);
            let s = structure(&p, &ctx(1.0, 0.0, 0.0, 0.0, 0.0));
            // only sway separates the particle from its resting place
            assert!(s.position.distance(p.target) < 1.0);
        }
    }

    proptest! {
        #[test]
        fn structure_is_continuous_in_form_and_spread(
            index in 0usize..400,
            form in 0.0f32..0.999,
            spread in 0.0f32..0.999,
            wave in 0.0f32..1.0,
            time in 0.0f32..30.0,
        ) {
            let a = ParticleArchetypes::generate(400, 20, 21);
            let p = a.particle(index);
            let d = 1e-4;
            let base = structure(&p, &ctx(form, spread, 0.0, wave, time)).position;
            let df = structure(&p, &ctx(form + d, spread, 0.0, wave, time)).position;
            let ds = structure(&p, &ctx(form, spread + d, 0.0, wave, time)).position;
            prop_assert!(base.distance(df) < 0.1, "form jump {}", base.distance(df));
            prop_assert!(base.distance(ds) < 0.1, "spread jump {}", base.distance(ds));
        }
    }
}
