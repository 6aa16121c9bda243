pub mod macros;

use shoal_lib::model::config::SimConfig;
use shoal_lib::model::environment::FlatLakeBed;
use shoal_lib::model::state::{Position, SpeciesId};
use shoal_lib::model::world::World;
use uuid::Uuid;

#[allow(dead_code)]
pub struct WorldBuilder {
    config: SimConfig,
    organisms: Vec<(SpeciesId, Position)>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = SimConfig::default();
        config.world.seed = Some(42);
        Self {
            config,
            organisms: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Places an organism at world coordinates.
    pub fn with_organism(mut self, species: SpeciesId, x: f64, y: f64) -> Self {
        self.organisms.push((species, Position::new(x, y)));
        self
    }

    /// Places an organism at a depth in feet.
    pub fn with_organism_at_depth(self, species: SpeciesId, x: f64, depth: f64) -> Self {
        let y = depth / self.config.world.depth_scale;
        self.with_organism(species, x, y)
    }

    pub fn build(self) -> World {
        self.build_with_ids().0
    }

    /// Builds the world and returns organism ids in insertion order.
    pub fn build_with_ids(self) -> (World, Vec<Uuid>) {
        let mut world = World::new(self.config).expect("Failed to create world");
        let ids = self
            .organisms
            .into_iter()
            .map(|(species, position)| world.spawn(species, position).expect("Failed to spawn"))
            .collect();
        (world, ids)
    }
}

#[allow(dead_code)]
pub fn lake_bed(world: &World) -> FlatLakeBed {
    FlatLakeBed::from_config(&world.config.world)
}

/// Runs `ticks` updates spaced `step_ms` apart starting at `start_ms`.
#[allow(dead_code)]
pub fn run_ticks(
    world: &mut World,
    start_ms: u64,
    step_ms: u64,
    ticks: u64,
    lure: Option<&shoal_lib::model::state::Lure>,
) {
    let bed = lake_bed(world);
    for t in 0..ticks {
        world
            .update(start_ms + t * step_ms, lure, &bed)
            .expect("Tick failed");
    }
}
