//! Default transition chain shared by every predator.

use super::{nearest_cluster, DecisionContext, DecisionLogic, DecisionOutcome, DecisionSubject};
use crate::systems::biology::BiologyLogic;
use rand::Rng;
use shoal_data::{BehaviorState, HuntTarget, HuntingStyle, Position};

/// Advances the chain by one evaluation.
pub fn step<R: Rng>(
    subject: &mut DecisionSubject,
    ctx: &DecisionContext,
    aggression: f64,
    rng: &mut R,
) -> DecisionOutcome {
    match subject.decision.state {
        BehaviorState::Idle => idle(subject, ctx, aggression),
        BehaviorState::Interested => interested(subject, ctx),
        BehaviorState::Chasing | BehaviorState::HuntingBaitfish => pursue(subject, ctx),
        BehaviorState::Striking => strike(subject, ctx, aggression, rng),
        BehaviorState::Feeding => {
            let elapsed = ctx.now_ms.saturating_sub(subject.decision.state_since_ms);
            if elapsed >= ctx.config.decision.feeding_duration_ms {
                go_idle(subject, ctx);
            }
            DecisionOutcome::Updated
        }
        BehaviorState::Fleeing => {
            if ctx.now_ms >= subject.decision.flee_until_ms {
                go_idle(subject, ctx);
            } else {
                let threat = subject.decision.focus(ctx);
                subject.decision.target = Some(flee_point(subject, threat, ctx));
            }
            DecisionOutcome::Updated
        }
    }
}

fn wander_point(subject: &DecisionSubject, ctx: &DecisionContext) -> Position {
    let dx = f64::from(subject.decision.wander_direction) * ctx.config.decision.wander_distance;
    Position::new(subject.position.x + dx, subject.position.y)
}

fn flee_point(subject: &DecisionSubject, threat: Option<Position>, ctx: &DecisionContext) -> Position {
    let reach = ctx.config.decision.wander_distance * 2.0;
    let Some(threat) = threat else {
        let dx = f64::from(subject.decision.wander_direction) * reach;
        return Position::new(subject.position.x + dx, subject.position.y);
    };
    let (dx, dy) = (subject.position.x - threat.x, subject.position.y - threat.y);
    let len = (dx * dx + dy * dy).sqrt();
    if len < f64::EPSILON {
        let dx = f64::from(subject.decision.wander_direction) * reach;
        return Position::new(subject.position.x + dx, subject.position.y);
    }
    Position::new(
        subject.position.x + dx / len * reach,
        subject.position.y + dy / len * reach,
    )
}

fn go_idle(subject: &mut DecisionSubject, ctx: &DecisionContext) {
    subject.decision.transition(BehaviorState::Idle, ctx.now_ms);
    subject.decision.target = Some(wander_point(subject, ctx));
}

fn interest_threshold(subject: &DecisionSubject) -> f64 {
    let base = subject
        .decision
        .depth_zone
        .map_or(1.0, |z| z.interest_threshold);
    if subject.decision.frenzy.in_frenzy {
        base * 0.5
    } else {
        base
    }
}

fn idle(subject: &mut DecisionSubject, ctx: &DecisionContext, aggression: f64) -> DecisionOutcome {
    let range = subject.traits.detection_range;

    if let Some(lure) = ctx.lure {
        let d = subject.position.distance(&lure.position);
        if d <= range * subject.decision.alertness {
            let score = aggression * subject.decision.alertness * (1.0 - d / range);
            if score > interest_threshold(subject) {
                subject.decision.transition(BehaviorState::Interested, ctx.now_ms);
                subject.decision.hunt_target = Some(HuntTarget::Lure);
                subject.decision.target = Some(lure.position);
                subject.biology.trigger_interest_flash(score.min(1.0));
                return DecisionOutcome::Updated;
            }
        }
    }

    if subject.biology.hunger >= ctx.config.decision.hunt_hunger_threshold {
        if let Some(cluster) = nearest_cluster(subject, ctx.prey_clusters, range) {
            subject.decision.transition(BehaviorState::HuntingBaitfish, ctx.now_ms);
            subject.decision.hunt_target = Some(HuntTarget::Cluster(cluster.school_id));
            subject.decision.target = Some(cluster.center);
            return DecisionOutcome::Updated;
        }
    }

    subject.decision.target = Some(wander_point(subject, ctx));
    DecisionOutcome::Updated
}

fn interested(subject: &mut DecisionSubject, ctx: &DecisionContext) -> DecisionOutcome {
    let cfg = &ctx.config.decision;
    let Some(focus) = subject.decision.focus(ctx) else {
        go_idle(subject, ctx);
        return DecisionOutcome::Updated;
    };
    let limit = subject.traits.detection_range * cfg.lost_interest_multiplier;
    if subject.position.distance(&focus) > limit {
        go_idle(subject, ctx);
        return DecisionOutcome::Updated;
    }

    subject.decision.target = Some(focus);
    let mut sustain = cfg.interest_sustain_ms;
    if subject.decision.frenzy.in_frenzy {
        sustain /= 2;
    }
    if ctx.now_ms.saturating_sub(subject.decision.state_since_ms) >= sustain {
        let next = match subject.decision.hunt_target {
            Some(HuntTarget::Cluster(_)) => BehaviorState::HuntingBaitfish,
            _ => BehaviorState::Chasing,
        };
        subject.decision.transition(next, ctx.now_ms);
    }
    DecisionOutcome::Updated
}

fn strike_allowed(subject: &DecisionSubject) -> bool {
    match &subject.decision.style {
        HuntingStyle::Circling(c) => c.completed,
        _ => true,
    }
}

fn pursue(subject: &mut DecisionSubject, ctx: &DecisionContext) -> DecisionOutcome {
    let Some(focus) = subject.decision.focus(ctx) else {
        go_idle(subject, ctx);
        return DecisionOutcome::Updated;
    };
    let d = subject.position.distance(&focus);
    if d > subject.traits.detection_range * ctx.config.decision.chase_abandon_multiplier {
        go_idle(subject, ctx);
        return DecisionOutcome::Updated;
    }

    subject.decision.target = Some(focus);
    if d <= subject.traits.strike_distance && strike_allowed(subject) {
        subject.decision.begin_strike(ctx.now_ms);
    }
    DecisionOutcome::Updated
}

/// Contact probability for one strike.
pub fn contact_chance(base: f64, aggression: f64, frenzy_intensity: f64) -> f64 {
    (base * (0.5 + 0.5 * aggression) + 0.2 * frenzy_intensity).min(0.95)
}

fn strike<R: Rng>(
    subject: &mut DecisionSubject,
    ctx: &DecisionContext,
    aggression: f64,
    rng: &mut R,
) -> DecisionOutcome {
    let hunt = subject.decision.hunt_target;
    let focus = subject.decision.focus(ctx);

    if let (Some(hunt), Some(focus)) = (hunt, focus) {
        let chance = contact_chance(
            ctx.config.decision.strike_success_chance,
            aggression,
            subject.decision.frenzy.intensity,
        );
        let in_reach = subject.position.distance(&focus) <= subject.traits.strike_distance;
        if in_reach && rng.gen::<f64>() < chance {
            return match hunt {
                HuntTarget::Lure => {
                    tracing::debug!(id = %subject.id, attempts = subject.decision.strike_attempts, "Fish hooked");
                    DecisionOutcome::Hooked
                }
                HuntTarget::Cluster(school_id) => {
                    subject.decision.transition(BehaviorState::Feeding, ctx.now_ms);
                    subject.decision.target = None;
                    DecisionOutcome::StruckCluster(school_id)
                }
            };
        }
    }

    if focus.is_some() && subject.decision.strike_attempts < subject.decision.max_strike_attempts {
        let next = match hunt {
            Some(HuntTarget::Cluster(_)) => BehaviorState::HuntingBaitfish,
            _ => BehaviorState::Chasing,
        };
        subject.decision.transition(next, ctx.now_ms);
        subject.decision.target = focus;
        return DecisionOutcome::Updated;
    }

    subject.decision.transition(BehaviorState::Fleeing, ctx.now_ms);
    subject.decision.flee_until_ms = ctx.now_ms + ctx.config.decision.flee_duration_ms;
    subject.decision.strike_attempts = 0;
    subject.decision.target = Some(flee_point(subject, focus, ctx));
    DecisionOutcome::Updated
}
