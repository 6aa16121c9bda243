//! Feeding-frenzy contagion and the vertical-strike shortcut.

use super::{nearest_cluster, DecisionContext, DecisionLogic, DecisionSubject};
use crate::config::FrenzyConfig;
use crate::systems::biology::BiologyLogic;
use rand::Rng;
use shoal_data::{BehaviorState, DecisionState, DepthZoneKind, HuntTarget, Position};

/// Enters the frenzy scaled by the number of excited neighbors. Timer and
/// intensity never decrease as `neighbors` grows.
pub fn enter_frenzy(decision: &mut DecisionState, neighbors: usize, cfg: &FrenzyConfig) {
    let counted = neighbors.min(cfg.neighbor_cap) as u32;
    decision.frenzy.in_frenzy = true;
    decision.frenzy.timer = cfg.base_timer + cfg.timer_per_neighbor * counted;
    decision.frenzy.intensity =
        (cfg.base_intensity + cfg.intensity_per_neighbor * neighbors as f64).min(1.0);
    decision.max_strike_attempts = if neighbors >= 3 { 3 } else { 2 };
}

/// Frenzy forced by a vertical strike; never lowers an existing frenzy.
pub fn force_frenzy(decision: &mut DecisionState, cfg: &FrenzyConfig) {
    decision.frenzy.in_frenzy = true;
    decision.frenzy.timer = decision.frenzy.timer.max(cfg.base_timer);
    decision.frenzy.intensity = decision.frenzy.intensity.max(cfg.vertical_intensity);
    decision.max_strike_attempts = decision.max_strike_attempts.max(2);
}

/// One biology tick of frenzy decay. Returns true when the frenzy ended.
pub fn decay_frenzy(decision: &mut DecisionState) -> bool {
    if !decision.frenzy.in_frenzy {
        return false;
    }
    decision.frenzy.timer = decision.frenzy.timer.saturating_sub(1);
    if decision.frenzy.timer == 0 {
        decision.frenzy.in_frenzy = false;
        decision.frenzy.intensity = 0.0;
        decision.max_strike_attempts = 1;
        return true;
    }
    false
}

/// Excited organisms other than `subject` within the frenzy radius of `focus`.
pub fn count_excited_neighbors(
    subject: &DecisionSubject,
    ctx: &DecisionContext,
    focus: Position,
) -> usize {
    let radius = subject.traits.detection_range * ctx.config.frenzy.detection_multiplier;
    let r2 = radius * radius;
    ctx.others
        .iter()
        .filter(|o| o.id != subject.id && o.is_excited())
        .filter(|o| o.position.distance_sq(&focus) <= r2)
        .count()
}

fn vertical_strike_eligible(subject: &DecisionSubject, lure: Position, cfg: &FrenzyConfig) -> bool {
    let Some(zone) = subject.decision.depth_zone else {
        return false;
    };
    // Only idle or interested fish snap upward; committed ones keep their plan.
    zone.kind != DepthZoneKind::Surface
        && matches!(
            subject.decision.state,
            BehaviorState::Idle | BehaviorState::Interested
        )
        && subject.position.y - lure.y >= cfg.vertical_gap
        && (subject.position.x - lure.x).abs() <= cfg.vertical_horizontal_range
}

/// Frenzy detection step. Returns true when it forced a state change, in
/// which case the rest of the evaluation is skipped.
pub fn detect_frenzy<R: Rng>(
    subject: &mut DecisionSubject,
    ctx: &DecisionContext,
    rng: &mut R,
) -> bool {
    let cfg = &ctx.config.frenzy;
    let focus = ctx
        .lure
        .map(|l| l.position)
        .or(subject.decision.target);

    if let Some(focus) = focus {
        let neighbors = count_excited_neighbors(subject, ctx, focus);
        if neighbors >= 1 && !subject.decision.frenzy.in_frenzy && rng.gen::<f64>() < cfg.entry_chance
        {
            enter_frenzy(subject.decision, neighbors, cfg);
            subject.decision.transition(BehaviorState::Interested, ctx.now_ms);
            let hunt = if ctx.lure.is_some() {
                Some(HuntTarget::Lure)
            } else {
                nearest_cluster(
                    subject,
                    ctx.prey_clusters,
                    subject.traits.detection_range * cfg.detection_multiplier,
                )
                .map(|c| HuntTarget::Cluster(c.school_id))
            };
            subject.decision.hunt_target = hunt;
            subject.decision.target = subject.decision.focus(ctx).or(Some(focus));
            subject.biology.trigger_interest_flash(cfg.flash_intensity);
            tracing::debug!(
                id = %subject.id,
                neighbors,
                intensity = subject.decision.frenzy.intensity,
                "Frenzy entered"
            );
            return true;
        }
    }

    if let Some(lure) = ctx.lure {
        if vertical_strike_eligible(subject, lure.position, cfg)
            && rng.gen::<f64>() < cfg.vertical_strike_chance
        {
            subject.decision.transition(BehaviorState::Chasing, ctx.now_ms);
            subject.decision.hunt_target = Some(HuntTarget::Lure);
            subject.decision.target = Some(lure.position);
            force_frenzy(subject.decision, cfg);
            subject.biology.trigger_interest_flash(cfg.vertical_intensity);
            tracing::debug!(id = %subject.id, "Vertical strike");
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::SimConfig;
    use crate::snapshot::OrganismSnapshot;
    use crate::species::SpeciesTraits;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use shoal_data::{Biology, Lure, SpeciesId};
    use uuid::Uuid;

    struct Trial {
        traits: SpeciesTraits,
        decision: DecisionState,
        biology: Biology,
        id: Uuid,
        position: Position,
    }

    impl Trial {
        fn new(depth: f64, position: Position) -> Self {
            let traits = traits(SpeciesId::LakeTrout);
            let decision = state_at_depth(&traits, depth, 0.8);
            Self {
                traits,
                decision,
                biology: Biology::default(),
                id: Uuid::from_u128(1),
                position,
            }
        }

        fn run<R: Rng>(&mut self, lure: Option<&Lure>, others: &[OrganismSnapshot], rng: &mut R) -> bool {
            let config = SimConfig::default();
            let ctx = DecisionContext {
                now_ms: 0,
                lure,
                others,
                prey_clusters: &[],
                config: &config,
            };
            let mut subject = DecisionSubject {
                id: self.id,
                position: self.position,
                traits: &self.traits,
                decision: &mut self.decision,
                biology: &mut self.biology,
            };
            detect_frenzy(&mut subject, &ctx, rng)
        }
    }

    // Lure level with the fish so the vertical path stays out of the way.
    fn level_lure() -> Lure {
        Lure::at(100.0, 200.0)
    }

    #[test]
    fn test_frenzy_eventually_entered_with_excited_neighbor() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let others = vec![excited(Uuid::from_u128(2), Position::new(120.0, 200.0))];
        let lure = level_lure();
        let mut entered = 0;
        for _ in 0..60 {
            let mut t = Trial::new(50.0, Position::new(100.0, 200.0));
            if t.run(Some(&lure), &others, &mut rng) {
                assert!(t.decision.frenzy.in_frenzy);
                assert_eq!(t.decision.state, BehaviorState::Interested);
                entered += 1;
            }
        }
        assert!(entered >= 1);
        assert!(entered < 60, "entry should not be guaranteed every trial");
    }

    #[test]
    fn test_self_is_never_its_own_neighbor() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let lure = level_lure();
        for _ in 0..100 {
            let mut t = Trial::new(10.0, Position::new(100.0, 200.0));
            let me = excited(t.id, t.position);
            assert!(!t.run(Some(&lure), &[me], &mut rng));
            assert!(!t.decision.frenzy.in_frenzy);
        }
    }

    #[test]
    fn test_forced_entry_side_effects() {
        let mut t = Trial::new(50.0, Position::new(100.0, 200.0));
        let others = vec![excited(Uuid::from_u128(2), Position::new(110.0, 200.0))];
        let lure = level_lure();
        assert!(t.run(Some(&lure), &others, &mut StepRng::new(0, 0)));
        assert_eq!(t.decision.max_strike_attempts, 2);
        assert_eq!(t.biology.interest_flash, 0.8);
        assert_eq!(t.decision.target, Some(lure.position));
    }

    #[test]
    fn test_failed_roll_leaves_state_alone() {
        let mut t = Trial::new(10.0, Position::new(100.0, 200.0));
        let others = vec![excited(Uuid::from_u128(2), Position::new(110.0, 200.0))];
        assert!(!t.run(Some(&level_lure()), &others, &mut StepRng::new(u64::MAX, 0)));
        assert_eq!(t.decision.state, BehaviorState::Idle);
    }

    #[test]
    fn test_frenzy_scales_with_neighbor_count() {
        let cfg = FrenzyConfig::default();
        let t = traits(SpeciesId::LakeTrout);
        let mut one = state_at_depth(&t, 50.0, 0.8);
        let mut three = state_at_depth(&t, 50.0, 0.8);
        enter_frenzy(&mut one, 1, &cfg);
        enter_frenzy(&mut three, 3, &cfg);
        assert!(three.frenzy.timer >= one.frenzy.timer);
        assert!(three.frenzy.intensity >= one.frenzy.intensity);
        assert_eq!(one.max_strike_attempts, 2);
        assert_eq!(three.max_strike_attempts, 3);

        let mut many = state_at_depth(&t, 50.0, 0.8);
        enter_frenzy(&mut many, 40, &cfg);
        assert!(many.frenzy.intensity <= 1.0);
        assert!(many.frenzy.timer >= three.frenzy.timer);
    }

    #[test]
    fn test_vertical_strike_never_for_surface_fish() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        // 40 units deep is 10 ft: surface zone.
        let lure = Lure::at(100.0, 5.0);
        for _ in 0..100 {
            let mut t = Trial::new(10.0, Position::new(100.0, 40.0));
            assert!(!t.run(Some(&lure), &[], &mut rng));
        }
    }

    #[test]
    fn test_vertical_strike_triggers_for_deeper_fish() {
        for depth in [50.0, 100.0] {
            let mut rng = ChaCha8Rng::seed_from_u64(21);
            let lure = Lure::at(110.0, 40.0);
            let mut hits = 0;
            for _ in 0..100 {
                let mut t = Trial::new(depth, Position::new(100.0, depth / 0.25));
                if t.run(Some(&lure), &[], &mut rng) {
                    assert_eq!(t.decision.state, BehaviorState::Chasing);
                    assert_eq!(t.decision.target, Some(lure.position));
                    assert!(t.decision.frenzy.in_frenzy);
                    assert!(t.decision.frenzy.intensity >= 0.8);
                    hits += 1;
                }
            }
            assert!(hits > 0, "no vertical strike at depth {depth}");
        }
    }

    #[test]
    fn test_vertical_strike_needs_lure_above() {
        let mut t = Trial::new(50.0, Position::new(100.0, 200.0));
        let below = Lure::at(100.0, 260.0);
        assert!(!t.run(Some(&below), &[], &mut StepRng::new(0, 0)));
        let far = Lure::at(400.0, 40.0);
        assert!(!t.run(Some(&far), &[], &mut StepRng::new(0, 0)));
    }

    #[test]
    fn test_vertical_strike_skips_committed_fish() {
        let lure = Lure::at(110.0, 40.0);
        for state in [
            BehaviorState::Chasing,
            BehaviorState::Striking,
            BehaviorState::Feeding,
            BehaviorState::Fleeing,
            BehaviorState::HuntingBaitfish,
        ] {
            let mut t = Trial::new(100.0, Position::new(100.0, 400.0));
            t.decision.state = state;
            assert!(!t.run(Some(&lure), &[], &mut StepRng::new(0, 0)));
            assert_eq!(t.decision.state, state);
            assert!(!t.decision.frenzy.in_frenzy);
        }

        let mut t = Trial::new(100.0, Position::new(100.0, 400.0));
        t.decision.state = BehaviorState::Interested;
        assert!(t.run(Some(&lure), &[], &mut StepRng::new(0, 0)));
        assert_eq!(t.decision.state, BehaviorState::Chasing);
    }

    #[test]
    fn test_decay_ends_frenzy_at_zero() {
        let cfg = FrenzyConfig::default();
        let t = traits(SpeciesId::LakeTrout);
        let mut d = state_at_depth(&t, 50.0, 0.8);
        enter_frenzy(&mut d, 1, &cfg);
        let ticks = d.frenzy.timer;
        for _ in 0..ticks - 1 {
            assert!(!decay_frenzy(&mut d));
        }
        assert!(decay_frenzy(&mut d));
        assert!(!d.frenzy.in_frenzy);
        assert_eq!(d.frenzy.intensity, 0.0);
        assert_eq!(d.max_strike_attempts, 1);
        assert!(!decay_frenzy(&mut d));
    }
}
