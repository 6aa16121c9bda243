//! Per-predator decision state machine.
//!
//! One evaluation runs in fixed priority order:
//! 1. frenzy detection, which may force a state and end the evaluation
//! 2. the ambush check for ambush species
//! 3. the circling check for circling species
//! 4. the default chain (idle → interested → chasing → striking → feeding or
//!    fleeing → idle)
//!
//! Evaluations are rate limited by the per-fish decision cooldown. Frenzy
//! decay and physiological drift are not part of an evaluation; they run in
//! the biology phase every tick.

pub mod ambush;
pub mod chain;
pub mod circling;
pub mod frenzy;

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::snapshot::OrganismSnapshot;
use crate::species::SpeciesTraits;
use rand::Rng;
use shoal_data::{
    BehaviorState, Biology, DecisionState, HuntTarget, HuntingStyle, Lure, Position, PreyCluster,
};
use uuid::Uuid;

/// Read-only inputs shared by every evaluation in one tick.
pub struct DecisionContext<'a> {
    pub now_ms: u64,
    pub lure: Option<&'a Lure>,
    /// Start-of-tick view of the whole population, the subject included.
    pub others: &'a [OrganismSnapshot],
    pub prey_clusters: &'a [PreyCluster],
    pub config: &'a SimConfig,
}

/// The mutable slice of one organism a decision may touch.
pub struct DecisionSubject<'a> {
    pub id: Uuid,
    pub position: Position,
    pub traits: &'a SpeciesTraits,
    pub decision: &'a mut DecisionState,
    pub biology: &'a mut Biology,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// Cooldown still running; nothing was read or written.
    Skipped,
    Updated,
    /// Contact on the lure. The fight mini-game takes the fish from here.
    Hooked,
    /// Contact on a bait school; the caller removes one member.
    StruckCluster(u64),
}

/// Operations shared by every hunting style.
pub trait DecisionLogic {
    /// Base aggressiveness plus the zone bonus, clamped to `[0.1, 1.0]`.
    ///
    /// Fails when no depth zone was assigned at spawn.
    fn effective_aggressiveness(&self) -> Result<f64>;
    fn cooldown_elapsed(&self, now_ms: u64) -> bool;
    fn transition(&mut self, state: BehaviorState, now_ms: u64);
    fn begin_strike(&mut self, now_ms: u64);
    /// Point the current hunt is aimed at, if it still exists.
    fn focus(&self, ctx: &DecisionContext) -> Option<Position>;
}

impl DecisionLogic for DecisionState {
    fn effective_aggressiveness(&self) -> Result<f64> {
        let zone = self.depth_zone.ok_or(SimError::MissingDepthZone)?;
        Ok((self.base_aggressiveness + zone.aggressiveness_bonus).clamp(0.1, 1.0))
    }

    fn cooldown_elapsed(&self, now_ms: u64) -> bool {
        match self.last_decision_time_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.decision_cooldown_ms,
            None => true,
        }
    }

    fn transition(&mut self, state: BehaviorState, now_ms: u64) {
        if state != BehaviorState::Striking {
            self.burst = 1.0;
        }
        if state == BehaviorState::Idle {
            self.hunt_target = None;
            self.strike_attempts = 0;
        }
        if matches!(
            state,
            BehaviorState::Idle | BehaviorState::Fleeing | BehaviorState::Feeding
        ) {
            if let HuntingStyle::Circling(c) = &mut self.style {
                c.reset();
            }
        }
        self.state = state;
        self.state_since_ms = now_ms;
    }

    fn begin_strike(&mut self, now_ms: u64) {
        self.transition(BehaviorState::Striking, now_ms);
        self.strike_attempts += 1;
    }

    fn focus(&self, ctx: &DecisionContext) -> Option<Position> {
        match self.hunt_target? {
            HuntTarget::Lure => ctx.lure.map(|l| l.position),
            HuntTarget::Cluster(id) => ctx
                .prey_clusters
                .iter()
                .find(|c| c.school_id == id)
                .map(|c| c.center),
        }
    }
}

/// Nearest prey cluster the subject's species eats, within `range`.
pub(crate) fn nearest_cluster(
    subject: &DecisionSubject,
    clusters: &[PreyCluster],
    range: f64,
) -> Option<PreyCluster> {
    clusters
        .iter()
        .filter(|c| c.member_count > 0 && subject.traits.eats(c.species))
        .map(|c| (c, c.center.distance(&subject.position)))
        .filter(|(_, d)| *d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| *c)
}

/// Runs one decision evaluation for `subject`.
pub fn evaluate<R: Rng>(
    subject: &mut DecisionSubject,
    ctx: &DecisionContext,
    rng: &mut R,
) -> Result<DecisionOutcome> {
    if !subject.decision.cooldown_elapsed(ctx.now_ms) {
        return Ok(DecisionOutcome::Skipped);
    }
    subject.decision.last_decision_time_ms = Some(ctx.now_ms);
    let aggression = subject.decision.effective_aggressiveness()?;

    if frenzy::detect_frenzy(subject, ctx, rng) {
        return Ok(DecisionOutcome::Updated);
    }
    if ambush::check(subject, ctx, rng) {
        return Ok(DecisionOutcome::Updated);
    }
    if circling::check(subject, ctx, rng) {
        return Ok(DecisionOutcome::Updated);
    }
    Ok(chain::step(subject, ctx, aggression, rng))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::depth::{DepthZoneTable, MAX_DEPTH};
    use crate::species::SpeciesTable;
    use shoal_data::SpeciesId;

    pub fn traits(id: SpeciesId) -> SpeciesTraits {
        SpeciesTable::new(&SimConfig::default().species)
            .get(id)
            .unwrap()
            .clone()
    }

    /// Decision state for `species` with its zone set for `depth`.
    pub fn state_at_depth(traits: &SpeciesTraits, depth: f64, aggressiveness: f64) -> DecisionState {
        let style = crate::lifecycle::hunting_style(traits, Position::new(0.0, 0.0));
        let mut d = DecisionState::new(1.0, aggressiveness, 1, 100, style);
        let zones = DepthZoneTable::new(crate::depth::default_zones(), MAX_DEPTH).unwrap();
        d.depth_zone = Some(zones.zone_for(depth));
        d
    }

    pub fn excited(id: Uuid, position: Position) -> OrganismSnapshot {
        OrganismSnapshot {
            id,
            species: SpeciesId::LakeTrout,
            position,
            velocity: Default::default(),
            depth: 0.0,
            size: shoal_data::SizeCategory::Medium,
            state: Some(BehaviorState::Chasing),
            interest_flash: 0.0,
            schooling: false,
        }
    }
}
