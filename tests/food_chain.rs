mod common;
use common::{lake_bed, run_ticks, WorldBuilder};
use shoal_lib::model::metrics::PREY_CONSUMED;
use shoal_lib::model::state::SpeciesId;

#[test]
fn test_idle_trout_eats_sculpin() {
    let (mut world, ids) = WorldBuilder::new()
        .with_organism(SpeciesId::LakeTrout, 300.0, 200.0)
        .with_organism(SpeciesId::Sculpin, 310.0, 200.0)
        .build_with_ids();
    world.organisms[0].biology.hunger = 70.0;

    let bed = lake_bed(&world);
    let report = world.update(0, None, &bed).unwrap();
    assert_eq!(report.consumed.len(), 1);
    assert_eq!(report.consumed[0].predator, ids[0]);
    assert_eq!(report.consumed[0].prey_species, SpeciesId::Sculpin);

    assert_population!(world, 1);
    assert_organism_gone!(world, ids[1]);
    assert!(world.get(ids[0]).unwrap().biology.hunger < 70.0);
    assert_eq!(world.metrics.counter(PREY_CONSUMED), 1);
}

#[test]
fn test_each_prey_eaten_once_each_predator_eats_once() {
    let mut world = WorldBuilder::new()
        .with_organism(SpeciesId::LakeTrout, 300.0, 200.0)
        .with_organism(SpeciesId::LakeTrout, 320.0, 200.0)
        .with_organism(SpeciesId::Cisco, 308.0, 200.0)
        .with_organism(SpeciesId::Cisco, 310.0, 204.0)
        .with_organism(SpeciesId::Cisco, 312.0, 196.0)
        .build();
    let bed = lake_bed(&world);
    let report = world.update(0, None, &bed).unwrap();

    assert_eq!(report.consumed.len(), 2);
    assert_ne!(report.consumed[0].prey, report.consumed[1].prey);
    assert_ne!(report.consumed[0].predator, report.consumed[1].predator);
    assert_population!(world, 3);
}

#[test]
fn test_prey_never_eats_predator() {
    let mut world = WorldBuilder::new()
        .with_organism(SpeciesId::YellowPerch, 300.0, 200.0)
        .with_organism(SpeciesId::NorthernPike, 305.0, 200.0)
        .build();
    let bed = lake_bed(&world);
    let report = world.update(0, None, &bed).unwrap();
    // Pike eats perch; perch has no pike edge.
    assert!(report
        .consumed
        .iter()
        .all(|e| e.prey_species == SpeciesId::YellowPerch));
}

#[test]
fn test_crayfish_bolts_from_bass() {
    let (mut world, ids) = WorldBuilder::new()
        .with_organism(SpeciesId::SmallmouthBass, 300.0, 460.0)
        .with_organism(SpeciesId::Crayfish, 345.0, 460.0)
        .build_with_ids();
    let bed = lake_bed(&world);
    let report = world.update(0, None, &bed).unwrap();
    assert_eq!(report.escapes_started, 1);
    assert!(report.consumed.is_empty());

    let crayfish = world.get(ids[1]).unwrap();
    assert!(crayfish.escape.unwrap().is_escaping());
    assert!((crayfish.position.x - 348.5).abs() < 1e-9);

    run_ticks(&mut world, 100, 100, 25, None);
    let crayfish = world.get(ids[1]).unwrap();
    assert!(crayfish.position.x > 400.0);
}
