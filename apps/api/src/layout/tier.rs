//! Sizing tiers: three discrete bundles of type sizes and spacing picked from content density.

use serde::{Deserialize, Serialize};

use super::geometry::MM_PER_PT;
use super::metrics::ContentMetrics;

pub const DENSE_TOTAL: usize = 3000;
pub const COMPACT_TOTAL: usize = 2000;
pub const DENSE_ENTRIES: usize = 6;
pub const COMPACT_ENTRIES: usize = 4;

/// Ordered from roomiest to densest, so `a < b` reads "a is less dense than b".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierLevel {
    Base,
    Compact,
    Dense,
}

impl TierLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            TierLevel::Base => "base",
            TierLevel::Compact => "compact",
            TierLevel::Dense => "dense",
        }
    }
}

/// Point size plus line-height multiplier for one text role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypeScale {
    pub size: f32,
    pub line_height: f32,
}

impl TypeScale {
    /// Advance per line in page units (mm).
    pub fn line_height_mm(&self) -> f32 {
        self.size * self.line_height * MM_PER_PT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spacing {
    pub section: f32,
    pub item: f32,
    pub paragraph: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizingTier {
    pub level: TierLevel,
    pub heading: TypeScale,
    pub subheading: TypeScale,
    pub body: TypeScale,
    pub caption: TypeScale,
    pub spacing: Spacing,
}

const fn scale(size: f32, line_height: f32) -> TypeScale {
    TypeScale { size, line_height }
}

pub const BASE: SizingTier = SizingTier {
    level: TierLevel::Base,
    heading: scale(14.0, 1.5),
    subheading: scale(12.0, 1.4),
    body: scale(10.0, 1.3),
    caption: scale(9.0, 1.2),
    spacing: Spacing { section: 12.0, item: 8.0, paragraph: 5.0 },
};

pub const COMPACT: SizingTier = SizingTier {
    level: TierLevel::Compact,
    heading: scale(13.0, 1.4),
    subheading: scale(11.0, 1.3),
    body: scale(9.0, 1.2),
    caption: scale(8.0, 1.1),
    spacing: Spacing { section: 10.0, item: 7.0, paragraph: 4.0 },
};

pub const DENSE: SizingTier = SizingTier {
    level: TierLevel::Dense,
    heading: scale(12.0, 1.3),
    subheading: scale(10.0, 1.2),
    body: scale(8.0, 1.1),
    caption: scale(7.0, 1.0),
    spacing: Spacing { section: 8.0, item: 6.0, paragraph: 3.0 },
};

impl SizingTier {
    pub fn for_level(level: TierLevel) -> &'static SizingTier {
        match level {
            TierLevel::Base => &BASE,
            TierLevel::Compact => &COMPACT,
            TierLevel::Dense => &DENSE,
        }
    }
}

/// First matching rule wins: density by entry count is checked alongside the raw total.
pub fn select_tier(metrics: &ContentMetrics) -> SizingTier {
    let entries = metrics.entry_count();
    let level = if metrics.total > DENSE_TOTAL || entries > DENSE_ENTRIES {
        TierLevel::Dense
    } else if metrics.total > COMPACT_TOTAL || entries > COMPACT_ENTRIES {
        TierLevel::Compact
    } else {
        TierLevel::Base
    };
    *SizingTier::for_level(level)
}
