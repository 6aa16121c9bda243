//! Boids-style steering for schooling organisms.
//!
//! Forces are summed with the configured weights, scaled by the steer
//! strength and added to the velocity. The three neighbor radii breathe with
//! the scared level: calm schools spread out, frightened ones pack tight.

use crate::config::{FlockingConfig, WorldConfig};
use crate::environment::PlayArea;
use crate::snapshot::OrganismSnapshot;
use crate::species::SchoolingTraits;
use rand::Rng;
use shoal_data::{Flocking, Organism, Position, Velocity};

pub struct FlockingContext<'a> {
    pub config: &'a FlockingConfig,
    pub world: &'a WorldConfig,
    pub area: &'a dyn PlayArea,
}

/// Per-organism inputs gathered by the tick driver.
pub struct FlockInput<'a> {
    /// Same-species snapshots; the subject may be among them.
    pub neighbors: &'a [OrganismSnapshot],
    /// Positions of organisms that eat this species.
    pub predators: &'a [Position],
    /// Target set by an outside AI, blended in as a seek force.
    pub ai_target: Option<Position>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Vec2 {
    x: f64,
    y: f64,
}

impl Vec2 {
    fn between(from: Position, to: Position) -> Self {
        Self {
            x: to.x - from.x,
            y: to.y - from.y,
        }
    }

    fn len(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    fn scaled(self, k: f64) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
        }
    }

    /// Shrinks to unit length when longer than 1.
    fn capped(self) -> Self {
        let len = self.len();
        if len > 1.0 {
            self.scaled(1.0 / len)
        } else {
            self
        }
    }

    fn add(&mut self, other: Self, weight: f64) {
        self.x += other.x * weight;
        self.y += other.y * weight;
    }
}

fn update_scared(flocking: &mut Flocking, position: Position, predators: &[Position], cfg: &FlockingConfig) {
    let threatened = predators
        .iter()
        .any(|p| p.distance(&position) <= cfg.threat_radius);
    if threatened {
        flocking.scared_level += (1.0 - flocking.scared_level) * cfg.scared_rise;
    } else {
        flocking.scared_level -= cfg.scared_decay * flocking.scared_level;
    }
    flocking.scared_level = flocking.scared_level.clamp(0.0, 1.0);
    flocking.spread_multiplier = 1.5 - flocking.scared_level;
}

/// Separation, alignment and cohesion from same-species neighbors.
fn neighbor_forces(
    flocking: &Flocking,
    id: uuid::Uuid,
    position: Position,
    neighbors: &[OrganismSnapshot],
) -> (Vec2, Vec2, Vec2) {
    let sep_r = flocking.separation_radius * flocking.spread_multiplier;
    let align_r = flocking.alignment_radius * flocking.spread_multiplier;
    let coh_r = flocking.cohesion_radius * flocking.spread_multiplier;

    let mut separation = Vec2::default();
    let (mut avg_vx, mut avg_vy, mut aligned) = (0.0, 0.0, 0usize);
    let (mut cx, mut cy, mut cohesive) = (0.0, 0.0, 0usize);

    for other in neighbors.iter().filter(|n| n.id != id) {
        let d = other.position.distance(&position);
        if d > 0.0 && d < sep_r {
            let away = Vec2::between(other.position, position);
            separation.add(away.scaled(1.0 / d), sep_r / d);
        }
        if d < align_r {
            avg_vx += other.velocity.vx;
            avg_vy += other.velocity.vy;
            aligned += 1;
        }
        if d < coh_r {
            cx += other.position.x;
            cy += other.position.y;
            cohesive += 1;
        }
    }

    let alignment = if aligned > 0 {
        Vec2 {
            x: avg_vx / aligned as f64 - flocking.velocity.vx,
            y: avg_vy / aligned as f64 - flocking.velocity.vy,
        }
    } else {
        Vec2::default()
    };
    let cohesion = if cohesive > 0 {
        let centroid = Position::new(cx / cohesive as f64, cy / cohesive as f64);
        Vec2::between(position, centroid).scaled(1.0 / coh_r.max(1.0))
    } else {
        Vec2::default()
    };
    (separation, alignment, cohesion)
}

fn flee_force(flocking: &mut Flocking, position: Position, predators: &[Position], cfg: &FlockingConfig) -> Vec2 {
    let mut force = Vec2::default();
    let mut threatened = false;
    for p in predators {
        let d = p.distance(&position);
        if d < cfg.flee_radius {
            threatened = true;
            if d > 0.0 {
                let away = Vec2::between(*p, position);
                force.add(away.scaled(1.0 / d), cfg.flee_radius / d);
            }
        }
    }
    if threatened {
        flocking.panicking = true;
        flocking.panic_timer = cfg.panic_duration;
    } else if flocking.panic_timer > 0 {
        flocking.panic_timer -= 1;
        if flocking.panic_timer == 0 {
            flocking.panicking = false;
        }
    }
    flocking.fleeing = threatened;
    force
}

fn boundary_force(position: Position, ctx: &FlockingContext) -> Vec2 {
    let margin = ctx.config.edge_margin;
    let screen = ctx.area.world_to_screen(position);
    let width = ctx.area.screen_width();
    let mut force = Vec2::default();
    if screen.x < margin {
        force.x = (margin - screen.x) / margin;
    } else if screen.x > width - margin {
        force.x = -(screen.x - (width - margin)) / margin;
    }
    force
}

fn clamp_speed(velocity: &mut Velocity, limit: f64) {
    let speed = velocity.magnitude();
    if speed > limit && speed > 0.0 {
        velocity.vx *= limit / speed;
        velocity.vy *= limit / speed;
    }
}

/// One flocking step for `organism`. Returns true when the stuck watchdog
/// nudged it this tick.
pub fn flock_step<R: Rng>(
    organism: &mut Organism,
    schooling: &SchoolingTraits,
    input: &FlockInput,
    ctx: &FlockingContext,
    rng: &mut R,
) -> bool {
    let cfg = ctx.config;
    let id = organism.id;
    let position = organism.position;
    let Some(flocking) = organism.flocking.as_mut() else {
        return false;
    };

    update_scared(flocking, position, input.predators, cfg);
    let (separation, alignment, mut cohesion) =
        neighbor_forces(flocking, id, position, input.neighbors);
    let flee = flee_force(flocking, position, input.predators, cfg);
    if flocking.fleeing {
        cohesion = cohesion.scaled(cfg.fleeing_cohesion);
    }

    let mut steer = Vec2::default();
    steer.add(separation, cfg.separation_weight);
    steer.add(alignment, cfg.alignment_weight);
    steer.add(cohesion, cfg.cohesion_weight);
    steer.add(flee, cfg.flee_weight);
    if let Some(member) = flocking.membership {
        let pull = Vec2::between(position, member.slot()).scaled(1.0 / 50.0).capped();
        steer.add(pull, cfg.school_weight * (1.0 + flocking.scared_level));
    }
    steer.add(boundary_force(position, ctx), cfg.boundary_weight);
    if let Some(target) = input.ai_target {
        let seek = Vec2::between(position, target).scaled(1.0 / 50.0).capped();
        steer.add(seek, cfg.ai_target_weight);
    }

    flocking.velocity.vx += steer.x * cfg.steer_strength;
    flocking.velocity.vy += steer.y * cfg.steer_strength;

    let urgent = flocking.panicking || flocking.fleeing || flocking.scared_level > 0.5;
    let limit = if urgent {
        schooling.panic_speed
    } else {
        schooling.max_speed
    };
    let speed = flocking.velocity.magnitude();
    if flocking.fleeing && speed > 0.0 && speed < limit * 0.5 {
        flocking.velocity.vx *= cfg.flee_boost;
        flocking.velocity.vy *= cfg.flee_boost;
    }
    clamp_speed(&mut flocking.velocity, limit);

    let mut next = Position::new(
        position.x + flocking.velocity.vx,
        position.y + flocking.velocity.vy,
    );
    let top = ctx.world.surface_margin;
    let floor = (ctx.area.bottom_at(next.x) - ctx.world.bottom_margin).max(top);
    if next.y < top || next.y > floor {
        next.y = next.y.clamp(top, floor);
        flocking.velocity.vy *= -0.5;
    }
    flocking.velocity.vx *= cfg.damping;
    flocking.velocity.vy *= cfg.damping;

    let mut nudged = false;
    if next.distance(&flocking.stuck_anchor) < cfg.stuck_distance {
        flocking.frozen_ticks += 1;
        if flocking.frozen_ticks >= cfg.stuck_ticks {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            flocking.velocity = Velocity::new(angle.cos() * cfg.nudge_speed, angle.sin() * cfg.nudge_speed);
            flocking.frozen_ticks = 0;
            flocking.nudges += 1;
            flocking.stuck_anchor = next;
            nudged = true;
        }
    } else {
        flocking.stuck_anchor = next;
        flocking.frozen_ticks = 0;
    }

    organism.move_to(next, ctx.world.depth_scale);
    if nudged {
        tracing::debug!(%id, "Stuck schooling fish nudged");
    }
    nudged
}
