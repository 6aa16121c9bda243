use super::entity::{Position, SpeciesId, Velocity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Slot assignment pushed in by the school manager.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlockMembership {
    pub school_id: u64,
    pub center: Position,
    /// Fixed offset from the center, assigned at formation.
    pub offset: Position,
}

impl FlockMembership {
    #[must_use]
    pub fn slot(&self) -> Position {
        Position::new(self.center.x + self.offset.x, self.center.y + self.offset.y)
    }
}

/// Flocking component of a schooling organism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flocking {
    pub velocity: Velocity,
    pub separation_radius: f64,
    pub alignment_radius: f64,
    pub cohesion_radius: f64,
    pub spread_multiplier: f64,
    pub scared_level: f64,
    pub panicking: bool,
    pub panic_timer: u32,
    pub fleeing: bool,
    pub membership: Option<FlockMembership>,
    pub stuck_anchor: Position,
    pub frozen_ticks: u32,
    pub nudges: u32,
}

impl Flocking {
    #[must_use]
    pub fn new(
        position: Position,
        separation_radius: f64,
        alignment_radius: f64,
        cohesion_radius: f64,
    ) -> Self {
        Self {
            velocity: Velocity::default(),
            separation_radius,
            alignment_radius,
            cohesion_radius,
            spread_multiplier: 1.5,
            scared_level: 0.0,
            panicking: false,
            panic_timer: 0,
            fleeing: false,
            membership: None,
            stuck_anchor: position,
            frozen_ticks: 0,
            nudges: 0,
        }
    }
}

/// An emergent cluster of same-species schooling organisms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: u64,
    pub species: SpeciesId,
    pub members: Vec<Uuid>,
    pub centroid: Position,
}

/// Read-only view of a school handed to hunting predators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreyCluster {
    pub school_id: u64,
    pub species: SpeciesId,
    pub center: Position,
    pub member_count: usize,
}

/// Fixed escape reaction of AI-less prey such as crayfish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstEscape {
    pub threat_radius: f64,
    /// Burst length in ticks.
    pub duration: u32,
    pub speed: f64,
    /// Remaining burst ticks, 0 when calm.
    pub timer: u32,
    /// Unit heading of the current burst.
    pub heading: Velocity,
}

impl BurstEscape {
    #[must_use]
    pub fn is_escaping(&self) -> bool {
        self.timer > 0
    }
}
