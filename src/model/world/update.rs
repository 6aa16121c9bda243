use crate::model::environment::PlayArea;
use crate::model::systems::tick::{run_tick, TickContext, TickReport};
use crate::model::world::World;
use shoal_data::Lure;
use std::time::Instant;

impl World {
    /// Advances the lake by one tick.
    ///
    /// `now_ms` is the caller's clock and drives every cooldown and timed
    /// sub-state; `lure` is `None` while the line is out of the water.
    pub fn update(
        &mut self,
        now_ms: u64,
        lure: Option<&Lure>,
        area: &dyn PlayArea,
    ) -> anyhow::Result<TickReport> {
        let start = Instant::now();
        let ctx = TickContext {
            now_ms,
            lure,
            config: &self.config,
            species: &self.species,
            zones: &self.zones,
            area,
        };
        let report = run_tick(
            &ctx,
            &mut self.organisms,
            &mut self.schools,
            &mut self.food_chain,
            &mut self.rng,
        )?;
        self.tick += 1;

        self.metrics.record_tick(
            start.elapsed(),
            self.organisms.len(),
            self.schools.school_count(),
            &report,
        );
        Ok(report)
    }
}
