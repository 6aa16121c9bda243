use proptest::prelude::*;
use shoal_lib::model::config::SimConfig;
use shoal_lib::model::depth::{default_zones, validate_zones, DepthZoneTable, MAX_DEPTH};
use shoal_lib::model::state::{DecisionState, HuntingStyle};
use shoal_lib::model::DecisionLogic;

prop_compose! {
    fn arb_depth()(depth in 0.0f64..MAX_DEPTH) -> f64 {
        depth
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_effective_aggressiveness_is_clamped(
        base in -3.0f64..3.0,
        depth in arb_depth()
    ) {
        let zones = DepthZoneTable::new(default_zones(), MAX_DEPTH).unwrap();
        let mut state = DecisionState::new(0.8, base, 1, 100, HuntingStyle::Pursuit);
        state.depth_zone = Some(zones.zone_for(depth));
        let aggression = state.effective_aggressiveness().unwrap();
        prop_assert!((0.1..=1.0).contains(&aggression));
    }

    #[test]
    fn test_every_depth_has_exactly_one_zone(depth in arb_depth()) {
        let zones = default_zones();
        let containing = zones.iter().filter(|z| z.contains(depth)).count();
        prop_assert_eq!(containing, 1);

        let table = DepthZoneTable::new(zones, MAX_DEPTH).unwrap();
        prop_assert!(table.zone_for(depth).contains(depth));
    }

    #[test]
    fn test_gapped_zones_are_rejected(split in 5.0f64..100.0, gap in 0.5f64..10.0) {
        let mut zones = default_zones();
        zones.truncate(2);
        zones[0].max_depth = split;
        zones[1].min_depth = split + gap;
        zones[1].max_depth = MAX_DEPTH;
        prop_assert!(validate_zones(&zones, MAX_DEPTH).is_err());

        zones[1].min_depth = split;
        prop_assert!(validate_zones(&zones, MAX_DEPTH).is_ok());
    }

    #[test]
    fn test_config_fingerprint_tracks_tuning(strike_chance in 0.0f64..1.0) {
        let base = SimConfig::default();
        let mut tuned = base.clone();
        tuned.decision.strike_success_chance = strike_chance;
        if strike_chance != base.decision.strike_success_chance {
            prop_assert_ne!(base.fingerprint(), tuned.fingerprint());
        }
    }
}
