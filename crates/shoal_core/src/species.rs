//! Species configuration table.
//!
//! Loaded once with the rest of [`SimConfig`](crate::config::SimConfig) and
//! read-only during simulation.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use shoal_data::SpeciesId;

/// Strike distance used by every species that does not override it.
pub const DEFAULT_STRIKE_DISTANCE: f64 = 25.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum HuntingTraits {
    Pursuit,
    Ambush {
        radius: f64,
        strike_range: f64,
        burst_multiplier: f64,
    },
    Circling {
        radius: f64,
        angular_speed: f64,
        max_duration_ms: u64,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SchoolingTraits {
    pub separation_radius: f64,
    pub alignment_radius: f64,
    pub cohesion_radius: f64,
    pub max_speed: f64,
    pub panic_speed: f64,
    pub max_school_size: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BurstEscapeTraits {
    pub threat_radius: f64,
    pub duration: u32,
    pub speed: f64,
}

/// One food-chain edge: the owning species may eat `prey`, preferring higher
/// weights.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DietEntry {
    pub prey: SpeciesId,
    pub weight: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpeciesTraits {
    pub id: SpeciesId,
    /// Carries a decision state machine.
    pub predator: bool,
    pub strike_distance: f64,
    pub detection_range: f64,
    pub cruise_speed: f64,
    pub lifespan_ticks: u64,
    pub metabolism: f64,
    pub weight_range: (f64, f64),
    pub hunting: HuntingTraits,
    pub schooling: Option<SchoolingTraits>,
    pub diet: Vec<DietEntry>,
    pub burst_escape: Option<BurstEscapeTraits>,
}

impl SpeciesTraits {
    #[must_use]
    pub fn is_ambush_predator(&self) -> bool {
        matches!(self.hunting, HuntingTraits::Ambush { .. })
    }

    #[must_use]
    pub fn circles_before_strike(&self) -> bool {
        matches!(self.hunting, HuntingTraits::Circling { .. })
    }

    #[must_use]
    pub fn eats(&self, prey: SpeciesId) -> bool {
        self.diet.iter().any(|d| d.prey == prey && d.weight > 0.0)
    }

    fn prey_fish(id: SpeciesId, weight_range: (f64, f64), schooling: Option<SchoolingTraits>) -> Self {
        Self {
            id,
            predator: false,
            strike_distance: DEFAULT_STRIKE_DISTANCE,
            detection_range: 120.0,
            cruise_speed: 1.0,
            lifespan_ticks: 90_000,
            metabolism: 1.4,
            weight_range,
            hunting: HuntingTraits::Pursuit,
            schooling,
            diet: Vec::new(),
            burst_escape: None,
        }
    }
}

fn baitfish_schooling(max_school_size: usize) -> SchoolingTraits {
    SchoolingTraits {
        separation_radius: 12.0,
        alignment_radius: 30.0,
        cohesion_radius: 45.0,
        max_speed: 2.0,
        panic_speed: 4.0,
        max_school_size,
    }
}

/// The default lake: four predators, two schooling baitfish, a bottom
/// sculpin and crayfish.
#[must_use]
pub fn default_species() -> Vec<SpeciesTraits> {
    let diet = |entries: &[(SpeciesId, f64)]| {
        entries
            .iter()
            .map(|&(prey, weight)| DietEntry { prey, weight })
            .collect::<Vec<_>>()
    };

    vec![
        SpeciesTraits {
            id: SpeciesId::LakeTrout,
            predator: true,
            strike_distance: DEFAULT_STRIKE_DISTANCE,
            detection_range: 180.0,
            cruise_speed: 1.6,
            lifespan_ticks: 400_000,
            metabolism: 1.0,
            weight_range: (2.0, 20.0),
            hunting: HuntingTraits::Pursuit,
            schooling: None,
            diet: diet(&[
                (SpeciesId::Cisco, 1.0),
                (SpeciesId::RainbowSmelt, 0.8),
                (SpeciesId::Sculpin, 0.5),
            ]),
            burst_escape: None,
        },
        SpeciesTraits {
            id: SpeciesId::NorthernPike,
            predator: true,
            strike_distance: 40.0,
            detection_range: 150.0,
            cruise_speed: 1.2,
            lifespan_ticks: 350_000,
            metabolism: 1.1,
            weight_range: (2.0, 25.0),
            hunting: HuntingTraits::Ambush {
                radius: 50.0,
                strike_range: 60.0,
                burst_multiplier: 2.5,
            },
            schooling: None,
            diet: diet(&[
                (SpeciesId::YellowPerch, 1.0),
                (SpeciesId::Cisco, 0.7),
                (SpeciesId::RainbowSmelt, 0.5),
            ]),
            burst_escape: None,
        },
        SpeciesTraits {
            id: SpeciesId::SmallmouthBass,
            predator: true,
            strike_distance: DEFAULT_STRIKE_DISTANCE,
            detection_range: 140.0,
            cruise_speed: 1.5,
            lifespan_ticks: 250_000,
            metabolism: 1.2,
            weight_range: (0.8, 7.0),
            hunting: HuntingTraits::Circling {
                radius: 35.0,
                angular_speed: 0.25,
                max_duration_ms: 2_500,
            },
            schooling: None,
            diet: diet(&[
                (SpeciesId::Crayfish, 1.0),
                (SpeciesId::Sculpin, 0.8),
                (SpeciesId::YellowPerch, 0.4),
            ]),
            burst_escape: None,
        },
        SpeciesTraits {
            id: SpeciesId::YellowPerch,
            predator: true,
            strike_distance: DEFAULT_STRIKE_DISTANCE,
            detection_range: 110.0,
            cruise_speed: 1.3,
            lifespan_ticks: 180_000,
            metabolism: 1.3,
            weight_range: (0.2, 2.0),
            hunting: HuntingTraits::Pursuit,
            schooling: None,
            diet: diet(&[(SpeciesId::RainbowSmelt, 0.6), (SpeciesId::Crayfish, 0.5)]),
            burst_escape: None,
        },
        SpeciesTraits::prey_fish(SpeciesId::Cisco, (0.3, 1.5), Some(baitfish_schooling(24))),
        SpeciesTraits::prey_fish(
            SpeciesId::RainbowSmelt,
            (0.05, 0.4),
            Some(baitfish_schooling(40)),
        ),
        SpeciesTraits::prey_fish(SpeciesId::Sculpin, (0.05, 0.3), None),
        SpeciesTraits {
            cruise_speed: 0.3,
            burst_escape: Some(BurstEscapeTraits {
                threat_radius: 60.0,
                duration: 20,
                speed: 3.5,
            }),
            ..SpeciesTraits::prey_fish(SpeciesId::Crayfish, (0.05, 0.25), None)
        },
    ]
}

/// Indexed, read-only view over the configured species.
#[derive(Debug, Clone)]
pub struct SpeciesTable {
    traits: Vec<Option<SpeciesTraits>>,
}

impl SpeciesTable {
    #[must_use]
    pub fn new(species: &[SpeciesTraits]) -> Self {
        let mut traits = vec![None; SpeciesId::ALL.len()];
        for s in species {
            traits[s.id as usize] = Some(s.clone());
        }
        Self { traits }
    }

    pub fn get(&self, id: SpeciesId) -> Result<&SpeciesTraits> {
        self.traits[id as usize]
            .as_ref()
            .ok_or(SimError::UnknownSpecies(id))
    }

    /// Species whose diet contains `prey`.
    pub fn predators_of(&self, prey: SpeciesId) -> impl Iterator<Item = SpeciesId> + '_ {
        self.traits
            .iter()
            .flatten()
            .filter(move |t| t.eats(prey))
            .map(|t| t.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_species_has_traits() {
        let table = SpeciesTable::new(&default_species());
        for id in SpeciesId::ALL {
            assert!(table.get(id).is_ok(), "{id:?} missing");
        }
    }

    #[test]
    fn test_ambush_species_overrides_strike_distance() {
        let table = SpeciesTable::new(&default_species());
        let pike = table.get(SpeciesId::NorthernPike).unwrap();
        assert!(pike.is_ambush_predator());
        assert!(!pike.circles_before_strike());
        assert!((pike.strike_distance - DEFAULT_STRIKE_DISTANCE).abs() > f64::EPSILON);
    }

    #[test]
    fn test_circling_species_flag() {
        let table = SpeciesTable::new(&default_species());
        let bass = table.get(SpeciesId::SmallmouthBass).unwrap();
        assert!(bass.circles_before_strike());
        assert!(!bass.is_ambush_predator());
    }

    #[test]
    fn test_unrelated_species_report_defaults() {
        let table = SpeciesTable::new(&default_species());
        for id in [SpeciesId::LakeTrout, SpeciesId::YellowPerch] {
            let t = table.get(id).unwrap();
            assert!(!t.is_ambush_predator());
            assert!(!t.circles_before_strike());
            assert_eq!(t.strike_distance, DEFAULT_STRIKE_DISTANCE);
        }
    }

    #[test]
    fn test_unknown_species_is_an_error() {
        let table = SpeciesTable::new(&[]);
        assert_eq!(
            table.get(SpeciesId::Cisco).unwrap_err(),
            SimError::UnknownSpecies(SpeciesId::Cisco)
        );
    }

    #[test]
    fn test_predators_of_cisco() {
        let table = SpeciesTable::new(&default_species());
        let preds: Vec<_> = table.predators_of(SpeciesId::Cisco).collect();
        assert!(preds.contains(&SpeciesId::LakeTrout));
        assert!(preds.contains(&SpeciesId::NorthernPike));
        assert!(!preds.contains(&SpeciesId::SmallmouthBass));
    }
}
