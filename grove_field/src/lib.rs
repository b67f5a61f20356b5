//! # grove_field
//!
//! The particle field itself: static per-particle archetypes generated once at
//! startup and a per-frame engine that morphs every particle between a diffuse
//! cloud, a forest of trees, a spreading root network, falling rain and a
//! rolling storm sea.
//!
//! ```text
//! ParticleArchetypes ──┐
//!                      ├─▶ ParticleEngine::step ─▶ [RenderParticle]
//! FrameContext ────────┘      (rayon, one pure evaluate() per particle)
//! ```
//!
//! All continuous inputs arrive through [`FrameContext`]; the engine keeps no
//! other per-frame state besides its smoothed copy of the hands.

pub mod archetype;
pub mod context;
pub mod palette;
pub mod stages;
pub mod shading;
pub mod engine;

pub use archetype::{ParticleArchetypes, ParticleRef, TreeArchetype};
pub use context::{FrameContext, HandInfluence, HandSmoother};
pub use engine::{evaluate, ParticleEngine, RenderParticle};
pub use palette::ThemeColor;
