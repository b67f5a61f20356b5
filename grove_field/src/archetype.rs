//! Static per-particle attributes, generated once at startup.
//!
//! Every particle owns a scattered "chaos" position, a resting "tree" position
//! inside one of the procedurally placed tree archetypes, three jitter values
//! and a leaf/trunk flag. Generation is driven by a single seeded RNG, so the
//! same `(count, trees, seed)` always yields the same buffers.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_PARTICLE_COUNT: usize = 200_000;
pub const DEFAULT_TREE_COUNT:     usize = 20;

pub const CHAOS_RADIUS:  f32 = 45.0;
pub const FOREST_RADIUS: f32 = 25.0;
/// World height of the ground plane the trees stand on.
pub const GROUND_Y:      f32 = -10.0;
pub const LEAF_FRACTION: f32 = 0.8;
pub const LEAF_CLUSTERS: usize = 7;
/// Crown cluster height as a fraction of tree height.
pub const CROWN_HEIGHT:  f32 = 0.85;

const TRUNK_BASE_RADIUS: f32 = 1.4;
const TRUNK_TOP_RADIUS:  f32 = 0.35;
const CLUSTER_OFFSET:    f32 = 2.8;
const CLUSTER_RADIUS:    f32 = 3.6;

// ════════════════════════════════════════════════════════════════════════════
// TreeArchetype
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeArchetype {
    /// Trunk axis position on the ground plane (x, z).
    pub center: Vec2,
    pub height: f32,
    pub scale:  f32,
}

impl TreeArchetype {
    fn random(rng: &mut StdRng) -> Self {
        let angle  = rng.random::<f32>() * TAU;
        let radius = FOREST_RADIUS * rng.random::<f32>().sqrt();
        TreeArchetype {
            center: Vec2::new(angle.cos() * radius, angle.sin() * radius),
            height: rng.random_range(12.0..20.0),
            scale:  rng.random_range(0.7..1.3),
        }
    }

    /// World position of the trunk foot.
    pub fn base(&self) -> Vec3 {
        Vec3::new(self.center.x, GROUND_Y, self.center.y)
    }

    /// Height of `p` above the ground, normalized by tree height.
    pub fn height_norm(&self, p: Vec3) -> f32 {
        ((p.y - GROUND_Y) / self.height).max(0.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleArchetypes — structure-of-arrays storage
// ════════════════════════════════════════════════════════════════════════════

pub struct ParticleArchetypes {
    pub trees:   Vec<TreeArchetype>,
    pub chaos:   Vec<Vec3>,
    pub target:  Vec<Vec3>,
    pub jitter:  Vec<Vec3>,
    pub is_leaf: Vec<bool>,
    pub tree:    Vec<u32>,
}

/// Borrowed view of one particle's static attributes.
#[derive(Clone, Copy, Debug)]
pub struct ParticleRef<'a> {
    pub chaos:   Vec3,
    pub target:  Vec3,
    pub jitter:  Vec3,
    pub is_leaf: bool,
    pub tree:    &'a TreeArchetype,
}

impl ParticleArchetypes {
    pub fn generate(count: usize, tree_count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let tree_count = tree_count.max(1);
        let trees: Vec<TreeArchetype> = (0..tree_count)
            .map(|_| TreeArchetype::random(&mut rng))
            .collect();

        let mut out = ParticleArchetypes {
            trees:   Vec::new(),
            chaos:   Vec::with_capacity(count),
            target:  Vec::with_capacity(count),
            jitter:  Vec::with_capacity(count),
            is_leaf: Vec::with_capacity(count),
            tree:    Vec::with_capacity(count),
        };

        for i in 0..count {
            let tree_index = i % tree_count;
            let tree = &trees[tree_index];

            let chaos = sample_ball(&mut rng, CHAOS_RADIUS);
            let is_leaf = rng.random::<f32>() < LEAF_FRACTION;
            let target = if is_leaf {
                sample_leaf(&mut rng, tree)
            } else {
                sample_trunk(&mut rng, tree)
            };
            let jitter = Vec3::new(rng.random(), rng.random(), rng.random());

            out.chaos.push(chaos);
            out.target.push(target);
            out.jitter.push(jitter);
            out.is_leaf.push(is_leaf);
            out.tree.push(tree_index as u32);
        }
        out.trees = trees;

        log::info!(
            "generated {} particles across {} trees (seed {})",
            count, tree_count, seed
        );
        out
    }

    pub fn len(&self) -> usize { self.chaos.len() }
    pub fn is_empty(&self) -> bool { self.chaos.is_empty() }

    pub fn particle(&self, i: usize) -> ParticleRef<'_> {
        ParticleRef {
            chaos:   self.chaos[i],
            target:  self.target[i],
            jitter:  self.jitter[i],
            is_leaf: self.is_leaf[i],
            tree:    &self.trees[self.tree[i] as usize],
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sampling helpers
// ════════════════════════════════════════════════════════════════════════════

fn unit_direction(rng: &mut StdRng) -> Vec3 {
    let theta = rng.random::<f32>() * TAU;
    let cos_phi = 2.0 * rng.random::<f32>() - 1.0;
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
    Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin())
}

/// Uniform volume sample; cube-root radius avoids clumping at the center.
fn sample_ball(rng: &mut StdRng, radius: f32) -> Vec3 {
    unit_direction(rng) * radius * rng.random::<f32>().cbrt()
}

/// Tapered cylinder; sqrt radial sample pushes density toward the bark.
fn sample_trunk(rng: &mut StdRng, tree: &TreeArchetype) -> Vec3 {
    let t = rng.random::<f32>();
    let radius = lerp(TRUNK_BASE_RADIUS, TRUNK_TOP_RADIUS, t) * tree.scale;
    let r = radius * rng.random::<f32>().sqrt();
    let angle = rng.random::<f32>() * TAU;
    tree.base() + Vec3::new(angle.cos() * r, t * CROWN_HEIGHT * tree.height, angle.sin() * r)
}

fn sample_leaf(rng: &mut StdRng, tree: &TreeArchetype) -> Vec3 {
    let cluster = ((rng.random::<f32>() * LEAF_CLUSTERS as f32) as usize).min(LEAF_CLUSTERS - 1);
    let angle = cluster as f32 / LEAF_CLUSTERS as f32 * TAU;
    let wobble = (cluster as f32 * 1.7).sin();
    let cluster_center = tree.base() + Vec3::new(
        angle.cos() * CLUSTER_OFFSET * tree.scale,
        tree.height * CROWN_HEIGHT + wobble,
        angle.sin() * CLUSTER_OFFSET * tree.scale,
    );
    cluster_center + sample_ball(rng, CLUSTER_RADIUS * tree.scale)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_buffers() {
        let a = ParticleArchetypes::generate(2_000, 20, 7);
        let b = ParticleArchetypes::generate(2_000, 20, 7);
        assert_eq!(a.chaos, b.chaos);
        assert_eq!(a.target, b.target);
        assert_eq!(a.jitter, b.jitter);
        assert_eq!(a.is_leaf, b.is_leaf);
        assert_eq!(a.trees, b.trees);
    }

    #[test]
    fn different_seed_differs() {
        let a = ParticleArchetypes::generate(100, 20, 1);
        let b = ParticleArchetypes::generate(100, 20, 2);
        assert_ne!(a.chaos, b.chaos);
    }

    #[test]
    fn tree_parameters_in_range() {
        let a = ParticleArchetypes::generate(0, 20, 3);
        assert_eq!(a.trees.len(), 20);
        for t in &a.trees {
            assert!(t.center.length() <= FOREST_RADIUS + 1e-4);
            assert!((12.0..20.0).contains(&t.height));
            assert!((0.7..1.3).contains(&t.scale));
        }
    }

    #[test]
    fn chaos_inside_sphere_and_jitter_unit() {
        let a = ParticleArchetypes::generate(5_000, 20, 11);
        for (c, j) in a.chaos.iter().zip(&a.jitter) {
            assert!(c.length() <= CHAOS_RADIUS + 1e-3);
            for v in j.to_array() {
                assert!((0.0..1.0).contains(&v));
            }
        }
    }

    #[test]
    fn round_robin_assignment() {
        let a = ParticleArchetypes::generate(45, 20, 5);
        for (i, t) in a.tree.iter().enumerate() {
            assert_eq!(*t as usize, i % 20);
        }
    }

    #[test]
    fn leaf_share_near_eighty_percent() {
        let a = ParticleArchetypes::generate(20_000, 20, 9);
        let leaves = a.is_leaf.iter().filter(|l| **l).count() as f32 / a.len() as f32;
        assert!((leaves - LEAF_FRACTION).abs() < 0.02, "leaf share {}", leaves);
    }

    #[test]
    fn trunks_stay_inside_tapered_cylinder() {
        let a = ParticleArchetypes::generate(5_000, 20, 13);
        for i in (0..a.len()).filter(|&i| !a.is_leaf[i]) {
            let p = a.particle(i);
            let h = p.tree.height_norm(p.target);
            assert!(h <= CROWN_HEIGHT + 1e-4);
            let axis = Vec2::new(p.target.x, p.target.z) - p.tree.center;
            assert!(axis.length() <= TRUNK_BASE_RADIUS * p.tree.scale + 1e-3);
        }
    }

    #[test]
    fn leaves_sit_in_the_crown() {
        let a = ParticleArchetypes::generate(5_000, 20, 17);
        for i in (0..a.len()).filter(|&i| a.is_leaf[i]) {
            let p = a.particle(i);
            let crown = GROUND_Y + p.tree.height * CROWN_HEIGHT;
            let reach = CLUSTER_RADIUS * p.tree.scale + 1.0 + 1e-3;
            assert!((p.target.y - crown).abs() <= reach);
        }
    }
}
