use crate::model::config::SimConfig;
use crate::model::depth::DepthZoneTable;
use crate::model::metrics::Metrics;
use crate::model::species::SpeciesTable;
use crate::model::systems::food_chain::FoodChain;
use crate::model::systems::school::SchoolManager;
use rand_chacha::ChaCha8Rng;
use shoal_data::Organism;

pub mod init;
pub mod logic;
pub mod update;

/// The lake: owns the population and every piece of cross-organism state.
///
/// Systems never reach for globals; [`World::update`] lends them the
/// collections they need for one tick.
pub struct World {
    pub tick: u64,
    pub config: SimConfig,
    pub organisms: Vec<Organism>,
    pub species: SpeciesTable,
    pub zones: DepthZoneTable,
    pub schools: SchoolManager,
    pub food_chain: FoodChain,
    pub rng: ChaCha8Rng,
    pub metrics: Metrics,
}
