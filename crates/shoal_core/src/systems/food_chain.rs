//! Opportunistic predation across species tiers.
//!
//! The resolver only feeds organisms that are not running an active hunt of
//! their own; the decision machine owns those. Each prey is consumed at most
//! once and each predator eats at most once per tick.

use crate::config::{FoodChainConfig, WorldConfig};
use crate::environment::PlayArea;
use crate::spatial_hash::SpatialHash;
use crate::species::{SpeciesTable, SpeciesTraits};
use serde::{Deserialize, Serialize};
use shoal_data::{Organism, Position, SpeciesId, Velocity};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionEvent {
    pub predator: Uuid,
    pub prey: Uuid,
    pub prey_species: SpeciesId,
    pub prey_weight: f64,
}

pub struct FoodChain {
    /// `preferences[predator][prey]`, 0 when the edge is absent.
    preferences: Vec<Vec<f64>>,
    detection_radius: f64,
    spatial: SpatialHash,
}

fn actively_hunting(o: &Organism) -> bool {
    o.decision
        .as_ref()
        .is_some_and(|d| d.state.is_actively_hunting())
}

impl FoodChain {
    #[must_use]
    pub fn new(species: &[SpeciesTraits], cfg: &FoodChainConfig) -> Self {
        let n = SpeciesId::ALL.len();
        let mut preferences = vec![vec![0.0; n]; n];
        for s in species {
            for entry in &s.diet {
                preferences[s.id as usize][entry.prey as usize] = entry.weight;
            }
        }
        Self {
            preferences,
            detection_radius: cfg.detection_radius,
            spatial: SpatialHash::new(cfg.detection_radius.max(1.0)),
        }
    }

    /// Preference weight of the `predator → prey` edge.
    #[must_use]
    pub fn preference(&self, predator: SpeciesId, prey: SpeciesId) -> Option<f64> {
        let w = self.preferences[predator as usize][prey as usize];
        (w > 0.0).then_some(w)
    }

    #[must_use]
    pub fn can_eat(&self, predator: SpeciesId, prey: SpeciesId) -> bool {
        self.preference(predator, prey).is_some()
    }

    fn has_diet(&self, species: SpeciesId) -> bool {
        self.preferences[species as usize].iter().any(|&w| w > 0.0)
    }

    /// Matches idle predators to the best prey in reach and marks that prey
    /// consumed. The caller feeds the predators named in the events.
    pub fn resolve(&mut self, organisms: &mut [Organism]) -> Vec<ConsumptionEvent> {
        let positions: Vec<Position> = organisms.iter().map(|o| o.position).collect();
        self.spatial.build(&positions);

        let mut events = Vec::new();
        let mut nearby = Vec::new();
        for i in 0..organisms.len() {
            let predator = &organisms[i];
            if !predator.is_live() || actively_hunting(predator) || !self.has_diet(predator.species) {
                continue;
            }
            self.spatial.query_into(
                predator.position.x,
                predator.position.y,
                self.detection_radius,
                &mut nearby,
            );

            let mut best: Option<(usize, f64)> = None;
            for &j in &nearby {
                if j == i {
                    continue;
                }
                let prey = &organisms[j];
                if !prey.is_live() || actively_hunting(prey) {
                    continue;
                }
                let Some(weight) = self.preference(predator.species, prey.species) else {
                    continue;
                };
                let score = prey.position.distance(&predator.position) / weight;
                if best.is_none_or(|(_, s)| score < s) {
                    best = Some((j, score));
                }
            }

            if let Some((j, _)) = best {
                let predator_id = organisms[i].id;
                let prey = &mut organisms[j];
                prey.consumed = true;
                prey.visible = false;
                events.push(ConsumptionEvent {
                    predator: predator_id,
                    prey: prey.id,
                    prey_species: prey.species,
                    prey_weight: prey.weight,
                });
            }
        }
        events
    }

    /// Moves AI-less prey: a straight burst away from the nearest predator
    /// inside the threat radius, otherwise a slow crawl. Returns the number
    /// of bursts started.
    pub fn burst_escapes(
        &mut self,
        organisms: &mut [Organism],
        species: &SpeciesTable,
        world: &WorldConfig,
        area: &dyn PlayArea,
    ) -> usize {
        let threats: Vec<(SpeciesId, Position)> = organisms
            .iter()
            .filter(|o| o.is_live())
            .map(|o| (o.species, o.position))
            .collect();

        let mut started = 0;
        for o in organisms.iter_mut().filter(|o| o.is_live()) {
            let Some(escape) = o.escape.as_mut() else {
                continue;
            };

            if escape.timer == 0 {
                let nearest = threats
                    .iter()
                    .filter(|(s, _)| self.can_eat(*s, o.species))
                    .map(|(_, p)| (*p, p.distance(&o.position)))
                    .filter(|(_, d)| *d <= escape.threat_radius)
                    .min_by(|a, b| a.1.total_cmp(&b.1));
                if let Some((threat, d)) = nearest {
                    let (dx, dy) = if d > f64::EPSILON {
                        ((o.position.x - threat.x) / d, (o.position.y - threat.y) / d)
                    } else {
                        (1.0, 0.0)
                    };
                    escape.heading = Velocity::new(dx, dy);
                    escape.timer = escape.duration;
                    started += 1;
                }
            }

            let (vx, vy) = if escape.timer > 0 {
                escape.timer -= 1;
                (escape.heading.vx * escape.speed, escape.heading.vy * escape.speed)
            } else {
                let crawl = species.get(o.species).map_or(0.0, |t| t.cruise_speed);
                let dir = if escape.heading.vx < 0.0 { -1.0 } else { 1.0 };
                (dir * crawl, 0.0)
            };

            let x = o.position.x + vx;
            let floor = (area.bottom_at(x) - world.bottom_margin).max(world.surface_margin);
            let y = (o.position.y + vy).clamp(world.surface_margin, floor);
            o.move_to(Position::new(x, y), world.depth_scale);
        }
        started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::depth::{default_zones, DepthZoneTable, MAX_DEPTH};
    use crate::environment::FlatLakeBed;
    use crate::lifecycle::spawn_organism_with_rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use shoal_data::BehaviorState;

    struct Lake {
        config: SimConfig,
        table: SpeciesTable,
        zones: DepthZoneTable,
        rng: ChaCha8Rng,
    }

    impl Lake {
        fn new() -> Self {
            let config = SimConfig::default();
            Self {
                table: SpeciesTable::new(&config.species),
                zones: DepthZoneTable::new(default_zones(), MAX_DEPTH).unwrap(),
                config,
                rng: ChaCha8Rng::seed_from_u64(4),
            }
        }

        fn spawn(&mut self, species: SpeciesId, x: f64, y: f64) -> Organism {
            let traits = self.table.get(species).unwrap();
            spawn_organism_with_rng(traits, Position::new(x, y), &self.config, &self.zones, &mut self.rng)
        }

        fn chain(&self) -> FoodChain {
            FoodChain::new(&self.config.species, &self.config.food_chain)
        }
    }

    #[test]
    fn test_eligibility_follows_diet_table() {
        let lake = Lake::new();
        let chain = lake.chain();
        assert!(chain.can_eat(SpeciesId::LakeTrout, SpeciesId::Cisco));
        assert!(chain.can_eat(SpeciesId::SmallmouthBass, SpeciesId::Crayfish));
        assert!(!chain.can_eat(SpeciesId::Cisco, SpeciesId::LakeTrout));
        assert!(!chain.can_eat(SpeciesId::LakeTrout, SpeciesId::LakeTrout));
        assert_eq!(chain.preference(SpeciesId::NorthernPike, SpeciesId::YellowPerch), Some(1.0));
    }

    #[test]
    fn test_idle_predator_eats_nearby_prey() {
        let mut lake = Lake::new();
        let mut fish = vec![
            lake.spawn(SpeciesId::LakeTrout, 100.0, 200.0),
            lake.spawn(SpeciesId::Cisco, 110.0, 200.0),
        ];
        let events = lake.chain().resolve(&mut fish);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].predator, fish[0].id);
        assert_eq!(events[0].prey, fish[1].id);
        assert!(fish[1].consumed);
        assert!(!fish[1].visible);
    }

    #[test]
    fn test_hunting_predator_is_left_to_its_decisions() {
        let mut lake = Lake::new();
        let mut fish = vec![
            lake.spawn(SpeciesId::LakeTrout, 100.0, 200.0),
            lake.spawn(SpeciesId::Cisco, 110.0, 200.0),
        ];
        fish[0].decision.as_mut().unwrap().state = BehaviorState::Chasing;
        assert!(lake.chain().resolve(&mut fish).is_empty());
        assert!(!fish[1].consumed);
    }

    #[test]
    fn test_no_double_handling() {
        let mut lake = Lake::new();
        let mut fish = vec![
            lake.spawn(SpeciesId::LakeTrout, 100.0, 200.0),
            lake.spawn(SpeciesId::LakeTrout, 120.0, 200.0),
            lake.spawn(SpeciesId::Cisco, 110.0, 200.0),
            lake.spawn(SpeciesId::Cisco, 112.0, 200.0),
            lake.spawn(SpeciesId::Cisco, 108.0, 200.0),
        ];
        let events = lake.chain().resolve(&mut fish);
        assert_eq!(events.len(), 2);
        assert_ne!(events[0].prey, events[1].prey);
        assert_ne!(events[0].predator, events[1].predator);
        assert_eq!(fish.iter().filter(|f| f.consumed).count(), 2);
    }

    #[test]
    fn test_preference_beats_small_distance_gap() {
        let mut lake = Lake::new();
        let mut fish = vec![
            lake.spawn(SpeciesId::LakeTrout, 100.0, 200.0),
            // Sculpin weight 0.5 at 10 scores 20; cisco weight 1.0 at 15 scores 15.
            lake.spawn(SpeciesId::Sculpin, 110.0, 200.0),
            lake.spawn(SpeciesId::Cisco, 115.0, 200.0),
        ];
        let events = lake.chain().resolve(&mut fish);
        assert_eq!(events[0].prey_species, SpeciesId::Cisco);
    }

    #[test]
    fn test_out_of_range_prey_is_safe() {
        let mut lake = Lake::new();
        let mut fish = vec![
            lake.spawn(SpeciesId::LakeTrout, 100.0, 200.0),
            lake.spawn(SpeciesId::Cisco, 200.0, 200.0),
        ];
        assert!(lake.chain().resolve(&mut fish).is_empty());
    }

    #[test]
    fn test_crayfish_bursts_away_then_crawls() {
        let mut lake = Lake::new();
        let mut fish = vec![
            lake.spawn(SpeciesId::SmallmouthBass, 100.0, 460.0),
            lake.spawn(SpeciesId::Crayfish, 140.0, 460.0),
        ];
        let bed = FlatLakeBed::from_config(&lake.config.world);
        let mut chain = lake.chain();
        assert_eq!(chain.burst_escapes(&mut fish, &lake.table, &lake.config.world, &bed), 1);
        assert!((fish[1].position.x - 143.5).abs() < 1e-9);

        for _ in 0..19 {
            chain.burst_escapes(&mut fish, &lake.table, &lake.config.world, &bed);
        }
        let after_burst = fish[1].position.x;
        assert!((after_burst - 210.0).abs() < 1e-9);
        assert!(!fish[1].escape.unwrap().is_escaping());

        assert_eq!(chain.burst_escapes(&mut fish, &lake.table, &lake.config.world, &bed), 0);
        assert!((fish[1].position.x - (after_burst + 0.3)).abs() < 1e-9);
    }
}
