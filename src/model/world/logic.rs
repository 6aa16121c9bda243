use crate::model::snapshot::{capture_all, PopulationSnapshot, SchoolSummary};
use crate::model::world::World;
use shoal_data::{Organism, SpeciesId};
use uuid::Uuid;

impl World {
    #[must_use]
    pub fn organisms(&self) -> &[Organism] {
        &self.organisms
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Organism> {
        self.organisms.iter().find(|o| o.id == id)
    }

    #[must_use]
    pub fn population_count(&self) -> usize {
        self.organisms.len()
    }

    #[must_use]
    pub fn count_of(&self, species: SpeciesId) -> usize {
        self.organisms.iter().filter(|o| o.species == species).count()
    }

    #[must_use]
    pub fn school_count(&self) -> usize {
        self.schools.school_count()
    }

    #[must_use]
    pub fn school_summaries(&self) -> Vec<SchoolSummary> {
        self.schools.summaries()
    }

    /// Render-facing view of the whole lake.
    #[must_use]
    pub fn snapshot(&self) -> PopulationSnapshot {
        PopulationSnapshot {
            tick: self.tick,
            organisms: capture_all(&self.organisms),
            schools: self.school_summaries(),
        }
    }
}
