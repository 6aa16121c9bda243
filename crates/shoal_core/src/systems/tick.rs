//! The tick driver.
//!
//! Phase order is part of the contract: snapshots, decisions with predator
//! movement, the food chain, biology, flocking, schools, then the cull.

use super::biology::{biology_tick, BiologyLogic};
use super::flocking::{flock_step, FlockInput, FlockingContext};
use super::food_chain::{ConsumptionEvent, FoodChain};
use super::locomotion::{move_predator, LocomotionContext};
use super::school::SchoolManager;
use crate::config::SimConfig;
use crate::decision::{evaluate, DecisionContext, DecisionOutcome, DecisionSubject};
use crate::depth::DepthZoneTable;
use crate::environment::PlayArea;
use crate::snapshot::{capture_all, OrganismSnapshot};
use crate::species::SpeciesTable;
use anyhow::Context;
use rand::Rng;
use serde::Serialize;
use shoal_data::{Lure, Organism, Position, SpeciesId};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

pub struct TickContext<'a> {
    pub now_ms: u64,
    pub lure: Option<&'a Lure>,
    pub config: &'a SimConfig,
    pub species: &'a SpeciesTable,
    pub zones: &'a DepthZoneTable,
    pub area: &'a dyn PlayArea,
}

/// Everything observable that happened during one tick.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TickReport {
    pub hooked: Vec<Uuid>,
    /// Food-chain meals and successful strikes on bait schools.
    pub consumed: Vec<ConsumptionEvent>,
    pub frenzies_entered: usize,
    pub escapes_started: usize,
    pub nudges: usize,
    pub schools_formed: usize,
    pub schools_disbanded: usize,
    pub culled: usize,
}

fn index_of(organisms: &[Organism]) -> HashMap<Uuid, usize> {
    organisms
        .iter()
        .enumerate()
        .map(|(i, o)| (o.id, i))
        .collect()
}

/// Removes the school member nearest to the striking predator. Returns the
/// meal, if any member was still there to eat.
fn take_from_school(
    organisms: &mut [Organism],
    index: &HashMap<Uuid, usize>,
    schools: &SchoolManager,
    school_id: u64,
    predator: usize,
) -> Option<ConsumptionEvent> {
    let school = schools.get(school_id)?;
    let from = organisms[predator].position;
    let prey = school
        .members
        .iter()
        .filter_map(|id| index.get(id).copied())
        .filter(|&j| organisms[j].is_live())
        .min_by(|&a, &b| {
            organisms[a]
                .position
                .distance_sq(&from)
                .total_cmp(&organisms[b].position.distance_sq(&from))
        })?;

    let meal = &mut organisms[prey];
    meal.consumed = true;
    meal.visible = false;
    Some(ConsumptionEvent {
        predator: organisms[predator].id,
        prey: organisms[prey].id,
        prey_species: organisms[prey].species,
        prey_weight: organisms[prey].weight,
    })
}

fn decision_phase<R: Rng>(
    ctx: &TickContext,
    organisms: &mut [Organism],
    snapshots: &[OrganismSnapshot],
    schools: &SchoolManager,
    rng: &mut R,
    report: &mut TickReport,
) -> anyhow::Result<()> {
    let clusters = schools.prey_clusters(organisms);
    let index = index_of(organisms);
    let decision_ctx = DecisionContext {
        now_ms: ctx.now_ms,
        lure: ctx.lure,
        others: snapshots,
        prey_clusters: &clusters,
        config: ctx.config,
    };
    let locomotion = LocomotionContext {
        world: &ctx.config.world,
        zones: ctx.zones,
        area: ctx.area,
    };

    for i in 0..organisms.len() {
        let o = &mut organisms[i];
        if !o.is_live() {
            continue;
        }
        let id = o.id;
        let traits = ctx.species.get(o.species)?;
        let Some(decision) = o.decision.as_mut() else {
            continue;
        };
        let was_frenzied = decision.frenzy.in_frenzy;
        let mut subject = DecisionSubject {
            id,
            position: o.position,
            traits,
            decision,
            biology: &mut o.biology,
        };
        let outcome = evaluate(&mut subject, &decision_ctx, rng)
            .with_context(|| format!("Decision failed for organism {id}"))?;
        if !was_frenzied && subject.decision.frenzy.in_frenzy {
            report.frenzies_entered += 1;
        }

        match outcome {
            DecisionOutcome::Hooked => {
                o.hooked = true;
                report.hooked.push(id);
                continue;
            }
            DecisionOutcome::StruckCluster(school_id) => {
                if let Some(meal) = take_from_school(organisms, &index, schools, school_id, i) {
                    organisms[i].biology.feed(meal.prey_weight, &ctx.config.biology);
                    report.consumed.push(meal);
                }
            }
            DecisionOutcome::Skipped | DecisionOutcome::Updated => {}
        }
        move_predator(&mut organisms[i], traits, &locomotion);
    }
    Ok(())
}

fn flocking_phase<R: Rng>(
    ctx: &TickContext,
    organisms: &mut [Organism],
    snapshots: &[OrganismSnapshot],
    rng: &mut R,
) -> usize {
    let mut by_species: BTreeMap<SpeciesId, Vec<OrganismSnapshot>> = BTreeMap::new();
    for s in snapshots.iter().filter(|s| s.schooling) {
        by_species.entry(s.species).or_default().push(s.clone());
    }
    let predators: BTreeMap<SpeciesId, Vec<Position>> = by_species
        .keys()
        .map(|&prey| {
            let eaters: Vec<SpeciesId> = ctx.species.predators_of(prey).collect();
            let hunters = snapshots
                .iter()
                .filter(|s| eaters.contains(&s.species))
                .map(|s| s.position)
                .collect();
            (prey, hunters)
        })
        .collect();

    let flock_ctx = FlockingContext {
        config: &ctx.config.flocking,
        world: &ctx.config.world,
        area: ctx.area,
    };
    let mut nudges = 0;
    for o in organisms.iter_mut().filter(|o| o.is_live() && o.flocking.is_some()) {
        let Some(schooling) = ctx.species.get(o.species).ok().and_then(|t| t.schooling) else {
            continue;
        };
        let input = FlockInput {
            neighbors: by_species.get(&o.species).map(Vec::as_slice).unwrap_or(&[]),
            predators: predators.get(&o.species).map(Vec::as_slice).unwrap_or(&[]),
            ai_target: o.decision.as_ref().and_then(|d| d.target),
        };
        if flock_step(o, &schooling, &input, &flock_ctx, rng) {
            nudges += 1;
        }
    }
    nudges
}

fn cull(ctx: &TickContext, organisms: &mut Vec<Organism>) -> usize {
    let (left, right) = ctx.area.active_window();
    let margin = ctx.config.world.cull_margin;
    let before = organisms.len();
    organisms.retain(|o| {
        o.is_live() && o.position.x >= left - margin && o.position.x <= right + margin
    });
    before - organisms.len()
}

/// Runs one full tick over the population.
pub fn run_tick<R: Rng>(
    ctx: &TickContext,
    organisms: &mut Vec<Organism>,
    schools: &mut SchoolManager,
    food_chain: &mut FoodChain,
    rng: &mut R,
) -> anyhow::Result<TickReport> {
    let mut report = TickReport::default();
    let snapshots = capture_all(organisms);

    decision_phase(ctx, organisms, &snapshots, schools, rng, &mut report)?;

    let meals = food_chain.resolve(organisms);
    if !meals.is_empty() {
        let index = index_of(organisms);
        for meal in &meals {
            if let Some(&i) = index.get(&meal.predator) {
                organisms[i].biology.feed(meal.prey_weight, &ctx.config.biology);
            }
        }
    }
    report.consumed.extend(meals);
    report.escapes_started =
        food_chain.burst_escapes(organisms, ctx.species, &ctx.config.world, ctx.area);

    for o in organisms.iter_mut().filter(|o| o.is_live()) {
        let lifespan = ctx.species.get(o.species)?.lifespan_ticks;
        biology_tick(o, lifespan, &ctx.config.biology);
    }

    report.nudges = flocking_phase(ctx, organisms, &snapshots, rng);

    let events = schools.update(organisms, ctx.species, &ctx.config.schools);
    report.schools_formed = events.formed;
    report.schools_disbanded = events.disbanded;

    report.culled = cull(ctx, organisms);
    Ok(report)
}
