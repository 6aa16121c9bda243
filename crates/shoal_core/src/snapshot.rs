use serde::{Deserialize, Serialize};
use shoal_data::{BehaviorState, Organism, Position, SizeCategory, SpeciesId, Velocity};
use uuid::Uuid;

/// Read-only view of one organism. Captured at the start of every tick so
/// all decisions see the same positions, and handed to the render layer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrganismSnapshot {
    pub id: Uuid,
    pub species: SpeciesId,
    pub position: Position,
    pub velocity: Velocity,
    pub depth: f64,
    pub size: SizeCategory,
    pub state: Option<BehaviorState>,
    pub interest_flash: f64,
    pub schooling: bool,
}

impl OrganismSnapshot {
    #[must_use]
    pub fn capture(o: &Organism) -> Self {
        Self {
            id: o.id,
            species: o.species,
            position: o.position,
            velocity: o.flocking.as_ref().map(|f| f.velocity).unwrap_or_default(),
            depth: o.depth,
            size: o.size,
            state: o.decision.as_ref().map(|d| d.state),
            interest_flash: o.biology.interest_flash,
            schooling: o.flocking.is_some(),
        }
    }

    #[must_use]
    pub fn is_excited(&self) -> bool {
        self.state.is_some_and(|s| s.is_excited())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SchoolSummary {
    pub id: u64,
    pub species: SpeciesId,
    pub member_count: usize,
    pub centroid: Position,
}

/// Whole-population view for renderers and debug overlays.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PopulationSnapshot {
    pub tick: u64,
    pub organisms: Vec<OrganismSnapshot>,
    pub schools: Vec<SchoolSummary>,
}

/// Captures every live organism.
#[must_use]
pub fn capture_all(organisms: &[Organism]) -> Vec<OrganismSnapshot> {
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        organisms
            .par_iter()
            .filter(|o| o.is_live())
            .map(OrganismSnapshot::capture)
            .collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        organisms
            .iter()
            .filter(|o| o.is_live())
            .map(OrganismSnapshot::capture)
            .collect()
    }
}
