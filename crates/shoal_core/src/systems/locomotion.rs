use crate::config::WorldConfig;
use crate::depth::DepthZoneTable;
use crate::environment::PlayArea;
use crate::species::SpeciesTraits;
use shoal_data::{BehaviorState, Organism, Position};

/// Cruise-speed multiplier for each behavioral state.
#[must_use]
pub fn state_speed(state: BehaviorState) -> f64 {
    match state {
        BehaviorState::Idle => 0.5,
        BehaviorState::Interested => 0.7,
        BehaviorState::Chasing => 1.4,
        BehaviorState::HuntingBaitfish => 1.3,
        BehaviorState::Striking => 2.0,
        BehaviorState::Fleeing => 1.8,
        BehaviorState::Feeding => 0.0,
    }
}

pub struct LocomotionContext<'a> {
    pub world: &'a WorldConfig,
    pub zones: &'a DepthZoneTable,
    pub area: &'a dyn PlayArea,
}

/// Moves a predator one tick toward its decision target, then refreshes
/// depth and, when one is assigned, its depth zone.
pub fn move_predator(organism: &mut Organism, traits: &SpeciesTraits, ctx: &LocomotionContext) {
    let Some(decision) = organism.decision.as_ref() else {
        return;
    };
    let Some(target) = decision.target else {
        return;
    };

    let zone_speed = decision.depth_zone.map_or(1.0, |z| z.speed_multiplier);
    let mut speed = traits.cruise_speed * zone_speed * state_speed(decision.state);
    if decision.state == BehaviorState::Striking {
        speed *= decision.burst;
    }
    speed *= 1.0 + 0.3 * decision.frenzy.intensity;

    let dx = target.x - organism.position.x;
    let dy = target.y - organism.position.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < f64::EPSILON || speed <= 0.0 {
        return;
    }
    let step = speed.min(dist);
    let mut next = Position::new(
        organism.position.x + dx / dist * step,
        organism.position.y + dy / dist * step,
    );
    let floor = ctx.area.bottom_at(next.x) - ctx.world.bottom_margin;
    next.y = next.y.clamp(ctx.world.surface_margin, floor.max(ctx.world.surface_margin));

    organism.move_to(next, ctx.world.depth_scale);
    let depth = organism.depth;
    if let Some(decision) = organism.decision.as_mut() {
        if decision.depth_zone.is_some() {
            decision.depth_zone = Some(ctx.zones.zone_for(depth));
        }
    }
}
