//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! a `shoal.toml` file. Every tunable constant of the behavior engine lives
//! here rather than at its call site.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `shoal.toml` file (overrides defaults, missing sections fall back)
//!
//! ## Example `shoal.toml`
//!
//! ```toml
//! [world]
//! width = 800.0
//! max_depth = 120.0
//! depth_scale = 0.25
//! seed = 42
//!
//! [frenzy]
//! entry_chance = 0.75
//!
//! [schools]
//! clustering_radius = 80.0
//! ```

use crate::depth::{default_zones, validate_zones, MAX_DEPTH};
use crate::species::{default_species, SpeciesTraits};
use serde::{Deserialize, Serialize};
use shoal_data::{DepthZone, SpeciesId};

/// World-level simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the default active window in world units.
    pub width: f64,
    /// Depth of the water column in feet.
    pub max_depth: f64,
    /// Feet of depth per world unit of `y`.
    pub depth_scale: f64,
    pub seed: Option<u64>,
    /// Distance outside the active window before an organism is culled.
    pub cull_margin: f64,
    pub surface_margin: f64,
    pub bottom_margin: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            max_depth: MAX_DEPTH,
            depth_scale: 0.25,
            seed: None,
            cull_margin: 200.0,
            surface_margin: 2.0,
            bottom_margin: 4.0,
        }
    }
}

impl WorldConfig {
    /// Water column height in world units.
    #[must_use]
    pub fn column_height(&self) -> f64 {
        self.max_depth / self.depth_scale
    }
}

/// Decision state machine timing and thresholds.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DecisionConfig {
    pub decision_cooldown_ms: u64,
    pub interest_sustain_ms: u64,
    pub flee_duration_ms: u64,
    pub feeding_duration_ms: u64,
    pub strike_success_chance: f64,
    pub hunt_hunger_threshold: f64,
    /// Interested fish give up beyond `detection_range * lost_interest_multiplier`.
    pub lost_interest_multiplier: f64,
    /// Chasing fish give up beyond `detection_range * chase_abandon_multiplier`.
    pub chase_abandon_multiplier: f64,
    /// Circling starts within `strike_distance * circling_trigger_multiplier`.
    pub circling_trigger_multiplier: f64,
    pub wander_distance: f64,
    pub alertness_range: (f64, f64),
    pub aggressiveness_range: (f64, f64),
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            decision_cooldown_ms: 100,
            interest_sustain_ms: 1_500,
            flee_duration_ms: 3_000,
            feeding_duration_ms: 2_000,
            strike_success_chance: 0.55,
            hunt_hunger_threshold: 50.0,
            lost_interest_multiplier: 1.5,
            chase_abandon_multiplier: 2.0,
            circling_trigger_multiplier: 2.5,
            wander_distance: 30.0,
            alertness_range: (0.5, 1.0),
            aggressiveness_range: (0.5, 1.0),
        }
    }
}

/// Feeding-frenzy contagion and the vertical-strike shortcut.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FrenzyConfig {
    pub entry_chance: f64,
    /// Excited neighbors count within `detection_range * detection_multiplier`.
    pub detection_multiplier: f64,
    pub base_timer: u32,
    pub timer_per_neighbor: u32,
    pub neighbor_cap: usize,
    pub base_intensity: f64,
    pub intensity_per_neighbor: f64,
    pub flash_intensity: f64,
    pub vertical_strike_chance: f64,
    pub vertical_gap: f64,
    pub vertical_horizontal_range: f64,
    pub vertical_intensity: f64,
}

impl Default for FrenzyConfig {
    fn default() -> Self {
        Self {
            entry_chance: 0.75,
            detection_multiplier: 3.0,
            base_timer: 120,
            timer_per_neighbor: 60,
            neighbor_cap: 5,
            base_intensity: 0.5,
            intensity_per_neighbor: 0.15,
            flash_intensity: 0.8,
            vertical_strike_chance: 0.3,
            vertical_gap: 20.0,
            vertical_horizontal_range: 60.0,
            vertical_intensity: 0.8,
        }
    }
}

/// Hunger, health and highlight drift.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BiologyConfig {
    pub hunger_rate: f64,
    pub low_hunger: f64,
    pub high_hunger: f64,
    pub health_recovery_rate: f64,
    pub health_decay_rate: f64,
    pub flash_decay: f64,
    /// Hunger removed per pound of prey eaten.
    pub hunger_per_prey_weight: f64,
    pub min_meal_value: f64,
}

impl Default for BiologyConfig {
    fn default() -> Self {
        Self {
            hunger_rate: 0.02,
            low_hunger: 30.0,
            high_hunger: 70.0,
            health_recovery_rate: 0.05,
            health_decay_rate: 0.05,
            flash_decay: 0.02,
            hunger_per_prey_weight: 40.0,
            min_meal_value: 10.0,
        }
    }
}

/// Force weights and limits for schooling organisms.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FlockingConfig {
    pub separation_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
    pub flee_weight: f64,
    pub school_weight: f64,
    pub boundary_weight: f64,
    pub ai_target_weight: f64,
    /// Scales the summed steering into a per-tick velocity change.
    pub steer_strength: f64,
    pub flee_radius: f64,
    pub threat_radius: f64,
    pub scared_rise: f64,
    pub scared_decay: f64,
    pub panic_duration: u32,
    pub flee_boost: f64,
    pub fleeing_cohesion: f64,
    pub damping: f64,
    pub edge_margin: f64,
    pub stuck_ticks: u32,
    pub stuck_distance: f64,
    pub nudge_speed: f64,
}

impl Default for FlockingConfig {
    fn default() -> Self {
        Self {
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            flee_weight: 2.5,
            school_weight: 0.8,
            boundary_weight: 1.0,
            ai_target_weight: 0.6,
            steer_strength: 0.1,
            flee_radius: 100.0,
            threat_radius: 150.0,
            scared_rise: 0.2,
            scared_decay: 0.01,
            panic_duration: 45,
            flee_boost: 1.4,
            fleeing_cohesion: 0.3,
            damping: 0.98,
            edge_margin: 40.0,
            stuck_ticks: 60,
            stuck_distance: 1.0,
            nudge_speed: 1.5,
        }
    }
}

/// School detection and maintenance cadence.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SchoolConfig {
    pub detection_interval: u64,
    pub center_interval: u64,
    pub clustering_radius: f64,
    pub min_school_size: usize,
    pub max_member_distance: f64,
    pub disband_fraction: f64,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            detection_interval: 60,
            center_interval: 10,
            clustering_radius: 80.0,
            min_school_size: 3,
            max_member_distance: 200.0,
            disband_fraction: 0.3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FoodChainConfig {
    pub detection_radius: f64,
}

impl Default for FoodChainConfig {
    fn default() -> Self {
        Self {
            detection_radius: 30.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub decision: DecisionConfig,
    pub frenzy: FrenzyConfig,
    pub biology: BiologyConfig,
    pub flocking: FlockingConfig,
    pub schools: SchoolConfig,
    pub food_chain: FoodChainConfig,
    pub depth_zones: Vec<DepthZone>,
    pub species: Vec<SpeciesTraits>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            decision: DecisionConfig::default(),
            frenzy: FrenzyConfig::default(),
            biology: BiologyConfig::default(),
            flocking: FlockingConfig::default(),
            schools: SchoolConfig::default(),
            food_chain: FoodChainConfig::default(),
            depth_zones: default_zones(),
            species: default_species(),
        }
    }
}

fn is_unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(self.world.width > 0.0, "World width must be positive");
        anyhow::ensure!(self.world.max_depth > 0.0, "Max depth must be positive");
        anyhow::ensure!(self.world.depth_scale > 0.0, "Depth scale must be positive");
        anyhow::ensure!(self.world.cull_margin >= 0.0, "Cull margin must be non-negative");

        validate_zones(&self.depth_zones, self.world.max_depth)?;

        // Decision validation
        anyhow::ensure!(
            is_unit(self.decision.strike_success_chance),
            "Strike success chance must be in [0.0, 1.0]"
        );
        for (name, (lo, hi)) in [
            ("Alertness", self.decision.alertness_range),
            ("Aggressiveness", self.decision.aggressiveness_range),
        ] {
            anyhow::ensure!(
                lo <= hi && is_unit(lo) && is_unit(hi),
                "{name} range must be an ordered sub-range of [0.0, 1.0]"
            );
        }

        // Frenzy validation
        anyhow::ensure!(
            is_unit(self.frenzy.entry_chance),
            "Frenzy entry chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            is_unit(self.frenzy.vertical_strike_chance),
            "Vertical strike chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            is_unit(self.frenzy.flash_intensity) && is_unit(self.frenzy.vertical_intensity),
            "Frenzy flash intensities must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.frenzy.base_timer > 0,
            "Frenzy base timer must be positive"
        );

        // Biology validation
        anyhow::ensure!(
            self.biology.low_hunger <= self.biology.high_hunger,
            "Low hunger threshold must not exceed high hunger threshold"
        );
        anyhow::ensure!(self.biology.hunger_rate >= 0.0, "Hunger rate must be non-negative");
        anyhow::ensure!(self.biology.flash_decay >= 0.0, "Flash decay must be non-negative");

        // Flocking validation
        anyhow::ensure!(
            self.flocking.damping > 0.0 && self.flocking.damping <= 1.0,
            "Flocking damping must be in (0.0, 1.0]"
        );
        anyhow::ensure!(
            is_unit(self.flocking.scared_rise) && is_unit(self.flocking.scared_decay),
            "Scared rise/decay must be in [0.0, 1.0]"
        );
        anyhow::ensure!(self.flocking.stuck_ticks > 0, "Stuck ticks must be positive");

        // School validation
        anyhow::ensure!(
            self.schools.detection_interval > 0 && self.schools.center_interval > 0,
            "School cadences must be positive"
        );
        anyhow::ensure!(
            self.schools.min_school_size >= 2,
            "Minimum school size must be at least 2"
        );
        anyhow::ensure!(
            is_unit(self.schools.disband_fraction),
            "Disband fraction must be in [0.0, 1.0]"
        );

        // Species validation
        for id in SpeciesId::ALL {
            anyhow::ensure!(
                self.species.iter().any(|s| s.id == id),
                "Species {id:?} is missing from the species table"
            );
        }
        for s in &self.species {
            anyhow::ensure!(
                s.strike_distance > 0.0 && s.detection_range > 0.0,
                "Species {:?} needs positive strike distance and detection range",
                s.id
            );
            anyhow::ensure!(
                s.weight_range.0 > 0.0 && s.weight_range.0 <= s.weight_range.1,
                "Species {:?} weight range is invalid",
                s.id
            );
            anyhow::ensure!(
                s.diet.iter().all(|d| d.weight > 0.0),
                "Species {:?} diet weights must be positive",
                s.id
            );
            if let Some(sch) = &s.schooling {
                anyhow::ensure!(
                    sch.max_school_size >= self.schools.min_school_size,
                    "Species {:?} max school size is below the minimum school size",
                    s.id
                );
            }
        }

        Ok(())
    }

    /// Loads and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.decision).as_bytes());
        hasher.update(format!("{:?}", self.frenzy).as_bytes());
        hasher.update(format!("{:?}", self.biology).as_bytes());
        hasher.update(format!("{:?}", self.flocking).as_bytes());
        hasher.update(format!("{:?}", self.schools).as_bytes());
        hasher.update(format!("{:?}", self.food_chain).as_bytes());
        hasher.update(format!("{:?}", self.depth_zones).as_bytes());
        hasher.update(format!("{:?}", self.species).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_world_width() {
        let config = SimConfig {
            world: WorldConfig {
                width: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_frenzy_chance() {
        let config = SimConfig {
            frenzy: FrenzyConfig {
                entry_chance: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zone_gap_rejected() {
        let mut config = SimConfig::default();
        config.depth_zones[2].min_depth = 75.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_species_rejected() {
        let mut config = SimConfig::default();
        config.species.retain(|s| s.id != SpeciesId::Crayfish);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = SimConfig::from_toml(
            r#"
            [world]
            seed = 7

            [schools]
            clustering_radius = 64.0
            "#,
        )
        .unwrap();
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.schools.clustering_radius, 64.0);
        assert_eq!(config.schools.detection_interval, 60);
        assert_eq!(config.frenzy.entry_chance, 0.75);
        assert_eq!(config.species.len(), SpeciesId::ALL.len());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(SimConfig::from_toml("[frenzy]\nentry_chance = 3.0\n").is_err());
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = SimConfig::default();
        let config2 = SimConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());

        let mut config3 = SimConfig::default();
        config3.frenzy.entry_chance = 0.5;
        assert_ne!(config1.fingerprint(), config3.fingerprint());
    }
}
