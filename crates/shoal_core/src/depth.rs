//! Depth-zone lookup.

use shoal_data::{DepthZone, DepthZoneKind};

/// Deepest point of the default water column, in feet.
pub const MAX_DEPTH: f64 = 120.0;

#[must_use]
pub fn default_zones() -> Vec<DepthZone> {
    vec![
        DepthZone {
            kind: DepthZoneKind::Surface,
            min_depth: 0.0,
            max_depth: 25.0,
            speed_multiplier: 1.1,
            aggressiveness_bonus: -0.1,
            interest_threshold: 0.6,
        },
        DepthZone {
            kind: DepthZoneKind::MidColumn,
            min_depth: 25.0,
            max_depth: 70.0,
            speed_multiplier: 1.0,
            aggressiveness_bonus: 0.1,
            interest_threshold: 0.45,
        },
        DepthZone {
            kind: DepthZoneKind::Bottom,
            min_depth: 70.0,
            max_depth: MAX_DEPTH,
            speed_multiplier: 0.85,
            aggressiveness_bonus: 0.2,
            interest_threshold: 0.35,
        },
    ]
}

/// Ordered, contiguous zone table.
#[derive(Debug, Clone)]
pub struct DepthZoneTable {
    zones: Vec<DepthZone>,
}

impl DepthZoneTable {
    /// Builds the table after checking the partition law.
    pub fn new(zones: Vec<DepthZone>, max_depth: f64) -> anyhow::Result<Self> {
        validate_zones(&zones, max_depth)?;
        Ok(Self { zones })
    }

    #[must_use]
    pub fn zones(&self) -> &[DepthZone] {
        &self.zones
    }

    /// Zone containing `depth`. Depths above the surface map to the first
    /// zone and depths past the floor to the last one.
    #[must_use]
    pub fn zone_for(&self, depth: f64) -> DepthZone {
        let first = self.zones[0];
        if depth < first.min_depth {
            return first;
        }
        self.zones
            .iter()
            .find(|z| z.contains(depth))
            .copied()
            .unwrap_or(self.zones[self.zones.len() - 1])
    }
}

/// Zones must start at 0, touch end-to-start, and end at `max_depth`.
pub fn validate_zones(zones: &[DepthZone], max_depth: f64) -> anyhow::Result<()> {
    anyhow::ensure!(!zones.is_empty(), "At least one depth zone is required");
    anyhow::ensure!(
        zones[0].min_depth == 0.0,
        "First depth zone must start at 0 (starts at {})",
        zones[0].min_depth
    );
    for pair in zones.windows(2) {
        anyhow::ensure!(
            pair[1].min_depth == pair[0].max_depth,
            "Depth zone {:?} must start where {:?} ends ({} != {})",
            pair[1].kind,
            pair[0].kind,
            pair[1].min_depth,
            pair[0].max_depth
        );
    }
    for z in zones {
        anyhow::ensure!(
            z.max_depth > z.min_depth,
            "Depth zone {:?} is empty",
            z.kind
        );
        anyhow::ensure!(
            z.speed_multiplier > 0.0,
            "Depth zone {:?} speed multiplier must be positive",
            z.kind
        );
    }
    let last = zones[zones.len() - 1];
    anyhow::ensure!(
        last.max_depth == max_depth,
        "Last depth zone must end at max depth {} (ends at {})",
        max_depth,
        last.max_depth
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zones_are_contiguous_and_exhaustive() {
        let zones = default_zones();
        assert_eq!(zones[0].min_depth, 0.0);
        for i in 1..zones.len() {
            assert_eq!(zones[i].min_depth, zones[i - 1].max_depth);
        }
        assert_eq!(zones.last().unwrap().max_depth, MAX_DEPTH);
        assert!(validate_zones(&zones, MAX_DEPTH).is_ok());
    }

    #[test]
    fn test_zone_lookup() {
        let table = DepthZoneTable::new(default_zones(), MAX_DEPTH).unwrap();
        assert_eq!(table.zone_for(0.0).kind, DepthZoneKind::Surface);
        assert_eq!(table.zone_for(24.9).kind, DepthZoneKind::Surface);
        assert_eq!(table.zone_for(25.0).kind, DepthZoneKind::MidColumn);
        assert_eq!(table.zone_for(70.0).kind, DepthZoneKind::Bottom);
        assert_eq!(table.zone_for(MAX_DEPTH).kind, DepthZoneKind::Bottom);
        assert_eq!(table.zone_for(500.0).kind, DepthZoneKind::Bottom);
        assert_eq!(table.zone_for(-3.0).kind, DepthZoneKind::Surface);
    }

    #[test]
    fn test_gap_is_rejected() {
        let mut zones = default_zones();
        zones[1].min_depth = 30.0;
        assert!(validate_zones(&zones, MAX_DEPTH).is_err());
    }

    #[test]
    fn test_short_table_is_rejected() {
        let mut zones = default_zones();
        zones.pop();
        assert!(DepthZoneTable::new(zones, MAX_DEPTH).is_err());
    }
}
