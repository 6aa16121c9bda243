//! Emergent school formation and maintenance.
//!
//! Nothing assigns a fish to a school up front. Every detection pass the
//! manager clusters unaffiliated schooling fish of one species by proximity
//! and turns large enough clusters into schools; the center pass keeps each
//! school's centroid current and disbands schools that have scattered.

use crate::config::SchoolConfig;
use crate::snapshot::SchoolSummary;
use crate::spatial_hash::SpatialHash;
use crate::species::SpeciesTable;
use shoal_data::{FlockMembership, Organism, Position, PreyCluster, School, SpeciesId};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use uuid::Uuid;

/// What one manager update changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SchoolEvents {
    pub formed: usize,
    pub disbanded: usize,
}

pub struct SchoolManager {
    ticks: u64,
    next_id: u64,
    schools: Vec<School>,
    spatial: SpatialHash,
}

impl SchoolManager {
    #[must_use]
    pub fn new(cfg: &SchoolConfig) -> Self {
        Self {
            ticks: 0,
            next_id: 1,
            schools: Vec::new(),
            spatial: SpatialHash::new(cfg.clustering_radius.max(1.0)),
        }
    }

    #[must_use]
    pub fn school_count(&self) -> usize {
        self.schools.len()
    }

    #[must_use]
    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    #[must_use]
    pub fn get(&self, school_id: u64) -> Option<&School> {
        self.schools.iter().find(|s| s.id == school_id)
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<SchoolSummary> {
        self.schools
            .iter()
            .map(|s| SchoolSummary {
                id: s.id,
                species: s.species,
                member_count: s.members.len(),
                centroid: s.centroid,
            })
            .collect()
    }

    /// Schools as seen by hunting predators. Members eaten since the last
    /// center pass are not counted.
    #[must_use]
    pub fn prey_clusters(&self, organisms: &[Organism]) -> Vec<PreyCluster> {
        let live: HashSet<Uuid> = organisms.iter().filter(|o| o.is_live()).map(|o| o.id).collect();
        self.schools
            .iter()
            .map(|s| PreyCluster {
                school_id: s.id,
                species: s.species,
                center: s.centroid,
                member_count: s.members.iter().filter(|id| live.contains(id)).count(),
            })
            .collect()
    }

    /// Advances the manager's own tick counter and runs whichever passes are
    /// due. Call after movement.
    pub fn update(
        &mut self,
        organisms: &mut [Organism],
        species: &SpeciesTable,
        cfg: &SchoolConfig,
    ) -> SchoolEvents {
        self.ticks += 1;
        let mut events = SchoolEvents::default();
        if self.ticks.is_multiple_of(cfg.center_interval) {
            events.disbanded = self.update_centers(organisms, cfg);
        }
        if self.ticks.is_multiple_of(cfg.detection_interval) {
            events.formed = self.detect(organisms, species, cfg);
        }
        events
    }

    /// Recomputes centroids, prunes vanished members and disbands scattered
    /// schools. Returns the number disbanded.
    pub fn update_centers(&mut self, organisms: &mut [Organism], cfg: &SchoolConfig) -> usize {
        let index: HashMap<Uuid, usize> = organisms
            .iter()
            .enumerate()
            .map(|(i, o)| (o.id, i))
            .collect();

        let mut disbanded = 0;
        let mut kept = Vec::with_capacity(self.schools.len());
        for mut school in std::mem::take(&mut self.schools) {
            school.members.retain(|id| {
                index.get(id).is_some_and(|&i| {
                    let o = &organisms[i];
                    o.is_live()
                        && o.flocking
                            .as_ref()
                            .and_then(|f| f.membership)
                            .is_some_and(|m| m.school_id == school.id)
                })
            });

            let positions: Vec<Position> = school
                .members
                .iter()
                .map(|id| organisms[index[id]].position)
                .collect();
            let centroid = centroid(&positions);
            let far = positions
                .iter()
                .filter(|p| p.distance(&centroid) > cfg.max_member_distance)
                .count();

            let scattered = far as f64 > cfg.disband_fraction * positions.len() as f64;
            if school.members.len() < cfg.min_school_size || scattered {
                for id in &school.members {
                    if let Some(f) = organisms[index[id]].flocking.as_mut() {
                        f.membership = None;
                    }
                }
                tracing::debug!(
                    school = school.id,
                    species = school.species.as_str(),
                    members = school.members.len(),
                    scattered,
                    "School disbanded"
                );
                disbanded += 1;
                continue;
            }

            school.centroid = centroid;
            for id in &school.members {
                if let Some(m) = organisms[index[id]]
                    .flocking
                    .as_mut()
                    .and_then(|f| f.membership.as_mut())
                {
                    m.center = centroid;
                }
            }
            kept.push(school);
        }
        self.schools = kept;
        disbanded
    }

    /// Clusters unaffiliated schooling fish into new schools. Returns the
    /// number formed.
    pub fn detect(
        &mut self,
        organisms: &mut [Organism],
        species: &SpeciesTable,
        cfg: &SchoolConfig,
    ) -> usize {
        let mut by_species: BTreeMap<SpeciesId, Vec<usize>> = BTreeMap::new();
        for (i, o) in organisms.iter().enumerate() {
            let free = o.flocking.as_ref().is_some_and(|f| f.membership.is_none());
            if o.is_live() && free {
                by_species.entry(o.species).or_default().push(i);
            }
        }

        let mut formed = 0;
        for (species_id, candidates) in by_species {
            let Some(max_size) = species
                .get(species_id)
                .ok()
                .and_then(|t| t.schooling)
                .map(|s| s.max_school_size)
            else {
                continue;
            };

            let positions: Vec<Position> =
                candidates.iter().map(|&i| organisms[i].position).collect();
            for component in self.components(&positions, cfg.clustering_radius) {
                if component.len() < cfg.min_school_size {
                    continue;
                }
                let members: Vec<usize> = component
                    .into_iter()
                    .take(max_size)
                    .map(|c| candidates[c])
                    .collect();
                self.form(organisms, species_id, &members);
                formed += 1;
            }
        }
        formed
    }

    /// Connected components of `positions` under the clustering radius, in
    /// breadth-first order from the lowest index.
    fn components(&mut self, positions: &[Position], radius: f64) -> Vec<Vec<usize>> {
        self.spatial.build(positions);
        let mut visited = vec![false; positions.len()];
        let mut out = Vec::new();
        let mut nearby = Vec::new();

        for start in 0..positions.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(i) = queue.pop_front() {
                let p = positions[i];
                self.spatial.query_into(p.x, p.y, radius, &mut nearby);
                nearby.sort_unstable();
                for &j in &nearby {
                    if !visited[j] {
                        visited[j] = true;
                        component.push(j);
                        queue.push_back(j);
                    }
                }
            }
            out.push(component);
        }
        out
    }

    fn form(&mut self, organisms: &mut [Organism], species: SpeciesId, members: &[usize]) {
        let positions: Vec<Position> = members.iter().map(|&i| organisms[i].position).collect();
        let center = centroid(&positions);
        let id = self.next_id;
        self.next_id += 1;

        for &i in members {
            let o = &mut organisms[i];
            let offset = Position::new(o.position.x - center.x, o.position.y - center.y);
            if let Some(f) = o.flocking.as_mut() {
                f.membership = Some(FlockMembership {
                    school_id: id,
                    center,
                    offset,
                });
            }
        }
        tracing::debug!(
            school = id,
            species = species.as_str(),
            members = members.len(),
            "School formed"
        );
        self.schools.push(School {
            id,
            species,
            members: members.iter().map(|&i| organisms[i].id).collect(),
            centroid: center,
        });
    }
}

fn centroid(positions: &[Position]) -> Position {
    if positions.is_empty() {
        return Position::default();
    }
    let n = positions.len() as f64;
    let (sx, sy) = positions
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Position::new(sx / n, sy / n)
}
