use crate::model::config::SimConfig;
use crate::model::depth::{DepthZoneTable, MAX_DEPTH};
use crate::model::lifecycle;
use crate::model::metrics::Metrics;
use crate::model::species::SpeciesTable;
use crate::model::systems::food_chain::FoodChain;
use crate::model::systems::school::SchoolManager;
use crate::model::world::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shoal_data::{Position, SpeciesId};
use uuid::Uuid;

/// Demo stocking: species, head count, preferred depth band in feet for a
/// lake of `MAX_DEPTH`. Bands scale with the configured depth.
const LAKE_STOCKING: [(SpeciesId, usize, (f64, f64)); 8] = [
    (SpeciesId::LakeTrout, 3, (70.0, 110.0)),
    (SpeciesId::NorthernPike, 2, (25.0, 60.0)),
    (SpeciesId::SmallmouthBass, 2, (30.0, 70.0)),
    (SpeciesId::YellowPerch, 4, (25.0, 60.0)),
    (SpeciesId::Cisco, 12, (40.0, 80.0)),
    (SpeciesId::RainbowSmelt, 12, (10.0, 40.0)),
    (SpeciesId::Sculpin, 4, (112.0, 118.0)),
    (SpeciesId::Crayfish, 4, (114.0, 118.0)),
];

/// Schooling species are stocked in a loose ball this wide around a center.
const SCHOOL_SPREAD: f64 = 30.0;

/// Uniform sample in `[lo, hi)`, or `lo` when the range is empty.
fn sample_in<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

impl World {
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let zones = DepthZoneTable::new(config.depth_zones.clone(), config.world.max_depth)?;
        let species = SpeciesTable::new(&config.species);
        let rng = if let Some(seed) = config.world.seed {
            ChaCha8Rng::seed_from_u64(seed)
        } else {
            ChaCha8Rng::from_entropy()
        };

        tracing::info!(
            fingerprint = %config.fingerprint(),
            seed = ?config.world.seed,
            width = config.world.width,
            "World created"
        );

        Ok(Self {
            tick: 0,
            organisms: Vec::new(),
            schools: SchoolManager::new(&config.schools),
            food_chain: FoodChain::new(&config.species, &config.food_chain),
            species,
            zones,
            rng,
            metrics: Metrics::new(),
            config,
        })
    }

    /// Adds one fully initialized organism at `position` and returns its id.
    pub fn spawn(&mut self, species: SpeciesId, position: Position) -> anyhow::Result<Uuid> {
        let traits = self.species.get(species)?;
        let organism = lifecycle::spawn_organism_with_rng(
            traits,
            position,
            &self.config,
            &self.zones,
            &mut self.rng,
        );
        let id = organism.id;
        self.organisms.push(organism);
        Ok(id)
    }

    /// Stocks the lake with the demo mix. Schooling species start bunched
    /// so the school manager picks them up on its first pass.
    pub fn populate_lake(&mut self) -> anyhow::Result<usize> {
        let world = &self.config.world;
        let width = world.width;
        let scale = world.depth_scale;
        let depth_factor = world.max_depth / MAX_DEPTH;
        let surface = world.surface_margin * scale;
        let floor = ((world.column_height() - world.bottom_margin) * scale).max(surface);
        let spread = SCHOOL_SPREAD.min(width / 2.0);
        let before = self.organisms.len();

        for (species, count, (shallow, deep)) in LAKE_STOCKING {
            let deep = (deep * depth_factor).clamp(surface, floor);
            let shallow = (shallow * depth_factor).clamp(surface, deep);
            let schooling = self.species.get(species)?.schooling.is_some();
            let center_x = sample_in(&mut self.rng, spread, width - spread);
            let center_depth = sample_in(&mut self.rng, shallow, deep);
            for _ in 0..count {
                let (x, depth) = if schooling {
                    (
                        (center_x + sample_in(&mut self.rng, -spread, spread)).clamp(0.0, width),
                        (center_depth + self.rng.gen_range(-3.0..3.0)).clamp(shallow, deep),
                    )
                } else {
                    (
                        sample_in(&mut self.rng, 0.0, width),
                        sample_in(&mut self.rng, shallow, deep),
                    )
                };
                self.spawn(species, Position::new(x, depth / scale))?;
            }
        }

        let stocked = self.organisms.len() - before;
        tracing::info!(organisms = stocked, "Lake stocked");
        Ok(stocked)
    }
}
