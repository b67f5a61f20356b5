//! The per-frame particle evaluation.
//!
//! [`ParticleEngine`] owns the static archetype buffers and one output buffer
//! of [`RenderParticle`]s that is rewritten in place every frame. The
//! evaluation itself ([`evaluate`]) is a pure function, so the parallel loop is
//! just a `rayon` map over indices.

use glam::Vec3;
use grove_blend::HandPair;
use rayon::prelude::*;

use crate::archetype::{ParticleArchetypes, ParticleRef};
use crate::context::{FrameContext, HandSmoother};
use crate::shading;
use crate::stages;

/// What the renderer needs for one particle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderParticle {
    pub position: Vec3,
    /// Perspective-scaled point size.
    pub size:     f32,
    /// Linear RGB, 0–1.
    pub color:    Vec3,
    pub opacity:  f32,
}

pub fn evaluate(p: &ParticleRef<'_>, ctx: &FrameContext) -> RenderParticle {
    let s = stages::structure(p, ctx);
    RenderParticle {
        position: s.position,
        size:     shading::point_size(p, s.position, ctx),
        color:    shading::color(p, &s, ctx),
        opacity:  shading::opacity(p, &s, ctx),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleEngine
// ════════════════════════════════════════════════════════════════════════════

pub struct ParticleEngine {
    archetypes: ParticleArchetypes,
    hands:      HandSmoother,
    output:     Vec<RenderParticle>,
}

impl ParticleEngine {
    pub fn new(archetypes: ParticleArchetypes) -> Self {
        let output = vec![RenderParticle::default(); archetypes.len()];
        ParticleEngine { archetypes, hands: HandSmoother::default(), output }
    }

    pub fn generate(count: usize, tree_count: usize, seed: u64) -> Self {
        Self::new(ParticleArchetypes::generate(count, tree_count, seed))
    }

    /// Fold the latest raw hand readings into the engine's smoothed copy and
    /// return it, ready for [`FrameContext::with_hands`].
    pub fn smooth_hands(&mut self, raw: &HandPair) -> HandPair {
        self.hands.update(raw)
    }

    pub fn smoothed_hands(&self) -> HandPair {
        self.hands.current()
    }

    /// Recompute every particle for this frame.
    pub fn step(&mut self, ctx: &FrameContext) -> &[RenderParticle] {
        let archetypes = &self.archetypes;
        self.output
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, out)| *out = evaluate(&archetypes.particle(i), ctx));
        &self.output
    }

    pub fn particles(&self) -> &[RenderParticle] { &self.output }
    pub fn archetypes(&self) -> &ParticleArchetypes { &self.archetypes }
    pub fn len(&self) -> usize { self.output.len() }
    pub fn is_empty(&self) -> bool { self.output.is_empty() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
