use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthZoneKind {
    Surface,
    MidColumn,
    Bottom,
}

/// One horizontal band of the water column. Zones partition
/// `[0, max_depth]`: `min_depth` is inclusive, `max_depth` exclusive except
/// for the deepest zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthZone {
    pub kind: DepthZoneKind,
    pub min_depth: f64,
    pub max_depth: f64,
    pub speed_multiplier: f64,
    pub aggressiveness_bonus: f64,
    /// Minimum interest score needed to turn idle into interested.
    pub interest_threshold: f64,
}

impl DepthZone {
    #[must_use]
    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.min_depth && depth < self.max_depth
    }
}
