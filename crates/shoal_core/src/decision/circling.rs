//! Circling hunters orbit their target for a capped time before committing.

use super::{DecisionContext, DecisionLogic, DecisionSubject};
use rand::Rng;
use shoal_data::{BehaviorState, HuntingStyle, Position};

/// Returns true while the orbit owns the movement target. Once the orbit
/// times out it is marked completed and the default chain may strike.
pub fn check<R: Rng>(subject: &mut DecisionSubject, ctx: &DecisionContext, rng: &mut R) -> bool {
    if !matches!(
        subject.decision.state,
        BehaviorState::Interested | BehaviorState::Chasing
    ) {
        return false;
    }
    let Some(focus) = subject.decision.focus(ctx) else {
        return false;
    };
    let trigger = subject.traits.strike_distance * ctx.config.decision.circling_trigger_multiplier;
    let position = subject.position;
    let id = subject.id;

    let HuntingStyle::Circling(circling) = &mut subject.decision.style else {
        return false;
    };
    if circling.completed {
        return false;
    }

    match circling.started_at_ms {
        None => {
            if position.distance(&focus) > trigger {
                return false;
            }
            circling.started_at_ms = Some(ctx.now_ms);
            circling.direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            circling.angle = (position.y - focus.y).atan2(position.x - focus.x);
            tracing::debug!(%id, "Circling started");
        }
        Some(started) => {
            if ctx.now_ms.saturating_sub(started) >= circling.max_duration_ms {
                circling.completed = true;
                return false;
            }
            circling.angle += circling.angular_speed * circling.direction;
        }
    }

    let orbit = Position::new(
        focus.x + circling.radius * circling.angle.cos(),
        focus.y + circling.radius * circling.angle.sin(),
    );
    subject.decision.target = Some(orbit);
    true
}
