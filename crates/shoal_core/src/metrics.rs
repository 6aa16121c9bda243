//! Counters and structured logging for a running lake.

use crate::systems::tick::TickReport;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const FRENZY_ENTERED: &str = "frenzy_entered";
pub const FISH_HOOKED: &str = "fish_hooked";
pub const PREY_CONSUMED: &str = "prey_consumed";
pub const SCHOOL_FORMED: &str = "school_formed";
pub const SCHOOL_DISBANDED: &str = "school_disbanded";
pub const STUCK_NUDGES: &str = "stuck_nudges";

pub struct Metrics {
    tick_count: AtomicU64,
    organism_count: AtomicU64,
    school_count: AtomicU64,
    counters: Mutex<HashMap<String, u64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            organism_count: AtomicU64::new(0),
            school_count: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick and folds its report into the counters.
    pub fn record_tick(&self, duration: Duration, organisms: usize, schools: usize, report: &TickReport) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.organism_count.store(organisms as u64, Ordering::Relaxed);
        self.school_count.store(schools as u64, Ordering::Relaxed);

        self.add_to_counter(FRENZY_ENTERED, report.frenzies_entered as u64);
        self.add_to_counter(FISH_HOOKED, report.hooked.len() as u64);
        self.add_to_counter(PREY_CONSUMED, report.consumed.len() as u64);
        self.add_to_counter(SCHOOL_FORMED, report.schools_formed as u64);
        self.add_to_counter(SCHOOL_DISBANDED, report.schools_disbanded as u64);
        self.add_to_counter(STUCK_NUDGES, report.nudges as u64);

        // Summary every 1000 ticks
        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick.is_multiple_of(1000) {
            tracing::info!(
                tick = tick,
                organisms = organisms,
                schools = schools,
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn add_to_counter(&self, name: &str, amount: u64) {
        if amount == 0 {
            return;
        }
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *counters.entry(name.to_string()).or_insert(0) += amount;
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn organism_count(&self) -> u64 {
        self.organism_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn school_count(&self) -> u64 {
        self.school_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`. Does nothing if a subscriber is already set.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}
