/// Asserts that the total population count matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!(
            $world.population_count(),
            $count,
            "Population count mismatch"
        );
    };
}

/// Asserts the behavior state of a predator with the given ID.
#[macro_export]
macro_rules! assert_state {
    ($world:expr, $id:expr, $state:expr) => {
        let organism = $world.get($id).expect("Organism not found in world");
        let decision = organism
            .decision
            .as_ref()
            .expect("Organism has no decision state");
        assert_eq!(
            decision.state, $state,
            "Organism {} is {:?}, expected {:?}",
            $id, decision.state, $state
        );
    };
}

/// Asserts that an organism with the given ID was removed from the lake.
#[macro_export]
macro_rules! assert_organism_gone {
    ($world:expr, $id:expr) => {
        assert!(
            $world.get($id).is_none(),
            "Organism {} should be gone but is still in the lake",
            $id
        );
    };
}

/// Asserts the number of active schools.
#[macro_export]
macro_rules! assert_school_count {
    ($world:expr, $count:expr) => {
        assert_eq!($world.school_count(), $count, "School count mismatch");
    };
}
