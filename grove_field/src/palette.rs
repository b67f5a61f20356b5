//! Fixed color palette: the selectable theme colors plus the structural
//! colors the shader blends toward.

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    #[default]
    Ember,
    Aurora,
    Lagoon,
    Orchid,
    Frost,
}

impl ThemeColor {
    pub const ALL: [ThemeColor; 5] = [
        ThemeColor::Ember,
        ThemeColor::Aurora,
        ThemeColor::Lagoon,
        ThemeColor::Orchid,
        ThemeColor::Frost,
    ];

    pub fn rgb(self) -> Vec3 {
        match self {
            ThemeColor::Ember  => Vec3::new(1.00, 0.45, 0.20),
            ThemeColor::Aurora => Vec3::new(0.35, 1.00, 0.60),
            ThemeColor::Lagoon => Vec3::new(0.20, 0.65, 1.00),
            ThemeColor::Orchid => Vec3::new(0.85, 0.40, 1.00),
            ThemeColor::Frost  => Vec3::new(0.80, 0.92, 1.00),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ThemeColor::Ember  => "ember",
            ThemeColor::Aurora => "aurora",
            ThemeColor::Lagoon => "lagoon",
            ThemeColor::Orchid => "orchid",
            ThemeColor::Frost  => "frost",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name().eq_ignore_ascii_case(s.trim()))
    }

    /// Next palette entry, wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

pub const BARK_DARK:  Vec3 = Vec3::new(0.25, 0.15, 0.08);
pub const BARK_LIGHT: Vec3 = Vec3::new(0.45, 0.30, 0.16);
pub const LEAF_LOW:   Vec3 = Vec3::new(0.10, 0.45, 0.15);
pub const LEAF_HIGH:  Vec3 = Vec3::new(0.55, 0.90, 0.35);
pub const ROOT_DEEP:  Vec3 = Vec3::new(0.55, 0.30, 0.05);
pub const ROOT_GOLD:  Vec3 = Vec3::new(1.00, 0.80, 0.30);
pub const WARM_TINT:  Vec3 = Vec3::new(0.25, 0.12, 0.00);
pub const RAIN:       Vec3 = Vec3::new(0.70, 0.85, 1.00);
