//! Point size, color and opacity of a particle after the stage chain.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::archetype::ParticleRef;
use crate::context::FrameContext;
use crate::palette;
use crate::stages::{smoothstep, Structure};

/// Perspective numerator for point sizes; a size-1 particle at this depth
/// covers one unit.
pub const POINT_SCALE: f32 = 120.0;

pub const ROOT_SIZE:      f32 = 0.55;
pub const LEAF_SIZE:      f32 = 1.35;
pub const TRUNK_SIZE:     f32 = 1.1;
pub const SCATTERED_SIZE: f32 = 0.9;

pub fn base_size(form: f32, spread: f32, is_leaf: bool) -> f32 {
    if !is_leaf && spread > 0.5 {
        ROOT_SIZE
    } else if form > 0.5 {
        if is_leaf { LEAF_SIZE } else { TRUNK_SIZE }
    } else {
        SCATTERED_SIZE
    }
}

pub fn point_size(p: &ParticleRef<'_>, position: Vec3, ctx: &FrameContext) -> f32 {
    let depth = position.distance(ctx.eye).max(1.0);
    base_size(ctx.ratios.form, ctx.ratios.spread, p.is_leaf) * (0.5 + p.jitter.z) * POINT_SCALE / depth
}

pub fn color(p: &ParticleRef<'_>, s: &Structure, ctx: &FrameContext) -> Vec3 {
    if s.rain {
        return palette::RAIN;
    }
    let r = &ctx.ratios;

    let scattered = ctx.theme + (p.jitter - Vec3::splat(0.5)) * 0.15;
    let tree = if p.is_leaf {
        let grade = ((s.height_norm - 0.6) / 0.5).clamp(0.0, 1.0);
        palette::LEAF_LOW.lerp(palette::LEAF_HIGH, grade) + Vec3::splat((p.jitter.y - 0.5) * 0.08)
    } else {
        palette::BARK_DARK.lerp(palette::BARK_LIGHT, p.jitter.y)
    };
    let mut c = scattered.lerp(tree, smoothstep(0.0, 1.0, r.form));

    if p.is_leaf {
        c += palette::WARM_TINT * r.spread;
    } else if r.spread > 0.0 {
        let pulse = 0.5 + 0.5 * (s.root_radial * 0.5 - ctx.time * 2.0).sin();
        let root = palette::ROOT_DEEP.lerp(palette::ROOT_GOLD, pulse);
        c = c.lerp(root, r.spread);
    }

    if s.glow > 0.0 {
        c = c.lerp(Vec3::ONE, (s.glow * 0.6).min(1.0));
    }
    c.clamp(Vec3::ZERO, Vec3::ONE)
}

pub fn opacity(p: &ParticleRef<'_>, s: &Structure, ctx: &FrameContext) -> f32 {
    let base = 0.55 + 0.25 * (ctx.time * 2.0 + p.jitter.x * TAU).sin();
    let a = if s.rain {
        (base + 0.3) * ctx.ratios.rain
    } else {
        base + 0.3 * smoothstep(0.6, 1.0, ctx.ratios.form) + 0.5 * s.glow
    };
    a.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::TreeArchetype;
    use crate::palette::ThemeColor;
    use glam::Vec2;
    use grove_blend::RatioValues;

    fn tree() -> TreeArchetype {
        TreeArchetype { center: Vec2::ZERO, height: 15.0, scale: 1.0 }
    }

    fn particle(tree: &TreeArchetype, is_leaf: bool) -> ParticleRef<'_> {
        ParticleRef {
            chaos:  Vec3::ZERO,
            target: Vec3::new(0.0, 2.0, 0.0),
            jitter: Vec3::new(0.3, 0.6, 0.5),
            is_leaf,
            tree,
        }
    }

    fn structure(glow: f32, rain: bool) -> Structure {
        Structure { position: Vec3::ZERO, glow, rain, root_radial: 3.0, height_norm: 0.8 }
    }

    fn ctx(form: f32, spread: f32, rain: f32) -> FrameContext {
        FrameContext::new(0.4, RatioValues::new(form, spread, rain, 0.0), ThemeColor::Ember.rgb(), Vec3::new(0.0, 0.0, 65.0))
    }

    #[test]
    fn size_table() {
        assert_eq!(base_size(0.0, 0.0, true), SCATTERED_SIZE);
        assert_eq!(base_size(1.0, 0.0, true), LEAF_SIZE);
        assert_eq!(base_size(1.0, 0.0, false), TRUNK_SIZE);
        assert_eq!(base_size(1.0, 0.9, false), ROOT_SIZE);
        assert_eq!(base_size(1.0, 0.9, true), LEAF_SIZE);
    }

    #[test]
    fn nearer_is_bigger() {
        let t = tree();
        let p = particle(&t, true);
        let c = ctx(1.0, 0.0, 0.0);
        assert!(point_size(&p, Vec3::new(0.0, 0.0, 40.0), &c) > point_size(&p, Vec3::ZERO, &c));
        // depth floor
        assert_eq!(point_size(&p, c.eye, &c), point_size(&p, c.eye - Vec3::new(0.0, 0.0, 0.5), &c));
    }

    #[test]
    fn scattered_color_is_theme_tinted() {
        let t = tree();
        let p = particle(&t, false);
        let c = color(&p, &structure(0.0, false), &ctx(0.0, 0.0, 0.0));
        assert!(c.distance(ThemeColor::Ember.rgb()) < 0.15);
    }

    #[test]
    fn rain_is_pale_blue_and_fades_with_ratio() {
        let t = tree();
        let p = particle(&t, true);
        let s = structure(0.0, true);
        assert_eq!(color(&p, &s, &ctx(0.0, 0.0, 1.0)), palette::RAIN);
        assert_eq!(opacity(&p, &s, &ctx(0.0, 0.0, 0.0)), 0.0);
        assert!(opacity(&p, &s, &ctx(0.0, 0.0, 1.0)) > 0.5);
    }

    #[test]
    fn glow_brightens() {
        let t = tree();
        let p = particle(&t, true);
        let c = ctx(1.0, 0.0, 0.0);
        let dim = color(&p, &structure(0.0, false), &c);
        let lit = color(&p, &structure(1.0, false), &c);
        assert!(lit.element_sum() > dim.element_sum());
        assert!(opacity(&p, &structure(1.0, false), &c) >= opacity(&p, &structure(0.0, false), &c));
    }

    #[test]
    fn spread_turns_trunks_golden() {
        let t = tree();
        let p = particle(&t, false);
        let c = color(&p, &structure(0.0, false), &ctx(1.0, 1.0, 0.0));
        // root palette is red-dominant with low blue
        assert!(c.x > c.z);
    }

    #[test]
    fn opacity_is_clamped() {
        let t = tree();
        let p = particle(&t, true);
        for glow in [0.0, 1.0, 2.0, 5.0] {
            let a = opacity(&p, &structure(glow, false), &ctx(1.0, 0.0, 0.0));
            assert!((0.0..=1.0).contains(&a));
        }
    }
}
