//! Ambush hunting: hold an anchor, burst at anything inside strike range.

use super::{nearest_cluster, DecisionContext, DecisionLogic, DecisionSubject};
use rand::Rng;
use shoal_data::{AmbushState, BehaviorState, HuntTarget, HuntingStyle, Position};

/// What an idle ambusher is watching: the lure, else the nearest edible
/// prey cluster inside detection range.
fn watched(subject: &DecisionSubject, ctx: &DecisionContext) -> Option<(Position, HuntTarget)> {
    if let Some(lure) = ctx.lure {
        return Some((lure.position, HuntTarget::Lure));
    }
    nearest_cluster(subject, ctx.prey_clusters, subject.traits.detection_range)
        .map(|c| (c.center, HuntTarget::Cluster(c.school_id)))
}

fn hold_anchor<R: Rng>(subject: &mut DecisionSubject, ambush: &AmbushState, rng: &mut R) {
    let target = if subject.position.distance(&ambush.anchor) > ambush.radius {
        ambush.anchor
    } else {
        let drift = ambush.radius * 0.5;
        Position::new(
            ambush.anchor.x + rng.gen_range(-drift..=drift),
            ambush.anchor.y + rng.gen_range(-drift..=drift),
        )
    };
    subject.decision.target = Some(target);
}

/// Returns true when the ambush logic handled this evaluation.
pub fn check<R: Rng>(subject: &mut DecisionSubject, ctx: &DecisionContext, rng: &mut R) -> bool {
    let HuntingStyle::Ambush(ambush) = subject.decision.style else {
        return false;
    };
    if subject.decision.state != BehaviorState::Idle {
        return false;
    }

    if let Some((point, hunt)) = watched(subject, ctx) {
        if point.distance(&ambush.anchor) <= ambush.strike_range {
            subject.decision.begin_strike(ctx.now_ms);
            subject.decision.target = Some(point);
            subject.decision.hunt_target = Some(hunt);
            subject.decision.burst = ambush.burst_multiplier;
            tracing::debug!(id = %subject.id, "Ambush strike");
            return true;
        }
    }

    hold_anchor(subject, &ambush, rng);
    true
}
