use crate::config::SimConfig;
use crate::depth::DepthZoneTable;
use crate::species::{HuntingTraits, SpeciesTraits};
use rand::Rng;
use shoal_data::{
    AmbushState, Biology, BurstEscape, CirclingState, DecisionState, Flocking, HuntingStyle,
    Organism, Position, SizeCategory, Velocity,
};
use uuid::Uuid;

/// Fresh hunting sub-state for `traits`. Ambushers anchor where they spawn.
#[must_use]
pub fn hunting_style(traits: &SpeciesTraits, anchor: Position) -> HuntingStyle {
    match traits.hunting {
        HuntingTraits::Pursuit => HuntingStyle::Pursuit,
        HuntingTraits::Ambush {
            radius,
            strike_range,
            burst_multiplier,
        } => HuntingStyle::Ambush(AmbushState {
            anchor,
            radius,
            strike_range,
            burst_multiplier,
        }),
        HuntingTraits::Circling {
            radius,
            angular_speed,
            max_duration_ms,
        } => HuntingStyle::Circling(CirclingState {
            angle: 0.0,
            radius,
            angular_speed,
            direction: 1.0,
            started_at_ms: None,
            max_duration_ms,
            completed: false,
        }),
    }
}

fn sample<R: Rng>(range: (f64, f64), rng: &mut R) -> f64 {
    if range.1 > range.0 {
        rng.gen_range(range.0..=range.1)
    } else {
        range.0
    }
}

/// Builds a fully initialized organism of `traits.id` at `position`.
///
/// Predators get a decision state with randomized traits and their depth
/// zone already assigned; schooling species get a flocking component and
/// burst-escape species their escape reaction.
pub fn spawn_organism_with_rng<R: Rng>(
    traits: &SpeciesTraits,
    position: Position,
    config: &SimConfig,
    zones: &DepthZoneTable,
    rng: &mut R,
) -> Organism {
    let id = Uuid::from_u128(rng.gen::<u128>());
    let depth = position.y * config.world.depth_scale;
    let weight = sample(traits.weight_range, rng);

    let decision = traits.predator.then(|| {
        let alertness = sample(config.decision.alertness_range, rng);
        let aggressiveness = sample(config.decision.aggressiveness_range, rng);
        let wander = if rng.gen_bool(0.5) { 1 } else { -1 };
        let mut state = DecisionState::new(
            alertness,
            aggressiveness,
            wander,
            config.decision.decision_cooldown_ms,
            hunting_style(traits, position),
        );
        state.depth_zone = Some(zones.zone_for(depth));
        state
    });

    let flocking = traits.schooling.map(|s| {
        Flocking::new(
            position,
            s.separation_radius,
            s.alignment_radius,
            s.cohesion_radius,
        )
    });

    let escape = traits.burst_escape.map(|b| BurstEscape {
        threat_radius: b.threat_radius,
        duration: b.duration,
        speed: b.speed,
        timer: 0,
        heading: Velocity::default(),
    });

    Organism {
        id,
        species: traits.id,
        position,
        depth,
        size: SizeCategory::from_weight(weight),
        weight,
        visible: true,
        consumed: false,
        hooked: false,
        age: 0,
        biology: Biology {
            metabolism: traits.metabolism,
            ..Biology::default()
        },
        decision,
        flocking,
        escape,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::{default_zones, MAX_DEPTH};
    use crate::species::SpeciesTable;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use shoal_data::{DepthZoneKind, SpeciesId};

    fn spawn(id: SpeciesId, position: Position, seed: u64) -> Organism {
        let config = SimConfig::default();
        let table = SpeciesTable::new(&config.species);
        let zones = DepthZoneTable::new(default_zones(), MAX_DEPTH).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        spawn_organism_with_rng(table.get(id).unwrap(), position, &config, &zones, &mut rng)
    }

    #[test]
    fn test_predator_spawns_with_traits_in_range() {
        for seed in 0..20 {
            let o = spawn(SpeciesId::LakeTrout, Position::new(50.0, 300.0), seed);
            let d = o.decision.expect("trout is a predator");
            assert!((0.5..=1.0).contains(&d.alertness));
            assert!((0.5..=1.0).contains(&d.base_aggressiveness));
            assert!(d.wander_direction == 1 || d.wander_direction == -1);
            assert_eq!(d.depth_zone.map(|z| z.kind), Some(DepthZoneKind::Bottom));
            assert_eq!(o.depth, 75.0);
        }
    }

    #[test]
    fn test_pike_anchors_at_spawn_point() {
        let o = spawn(SpeciesId::NorthernPike, Position::new(100.0, 50.0), 1);
        match o.decision.unwrap().style {
            HuntingStyle::Ambush(a) => {
                assert_eq!(a.anchor, Position::new(100.0, 50.0));
                assert_eq!(a.radius, 50.0);
                assert_eq!(a.strike_range, 60.0);
            }
            other => panic!("expected ambush style, got {other:?}"),
        }
    }

    #[test]
    fn test_components_follow_species() {
        let cisco = spawn(SpeciesId::Cisco, Position::new(0.0, 100.0), 2);
        assert!(cisco.decision.is_none());
        assert!(cisco.flocking.is_some());

        let crayfish = spawn(SpeciesId::Crayfish, Position::new(0.0, 470.0), 3);
        assert!(crayfish.escape.is_some());
        assert!(crayfish.flocking.is_none());
    }

    #[test]
    fn test_spawn_is_reproducible_for_a_seed() {
        let a = spawn(SpeciesId::SmallmouthBass, Position::new(10.0, 10.0), 77);
        let b = spawn(SpeciesId::SmallmouthBass, Position::new(10.0, 10.0), 77);
        assert_eq!(a.id, b.id);
        assert_eq!(a.weight, b.weight);
    }
}
