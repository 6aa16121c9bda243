//! # Shoal Core
//!
//! The behavior simulation engine for a freshwater lake: predator fish,
//! schooling baitfish and bottom prey that react to each other and to the
//! angler's lure every tick.
//!
//! This crate contains:
//! - A per-predator decision state machine with contagious feeding frenzies
//! - Boids-style flocking for schooling species
//! - Emergent school detection and maintenance
//! - A food-chain resolver matching predators to prey across species tiers
//! - Spatial indexing, metrics and structured logging
//!
//! ## Architecture
//!
//! Plain data lives in `shoal_data`; behavior lives here as `*Logic` traits
//! and system functions. Systems borrow the population for one phase at a
//! time and take randomness as an injected `R: Rng`.
//!
//! ## Example
//!
//! ```
//! use shoal_core::decision::DecisionLogic;
//! use shoal_core::depth::{default_zones, DepthZoneTable, MAX_DEPTH};
//! use shoal_data::{DecisionState, HuntingStyle};
//!
//! let zones = DepthZoneTable::new(default_zones(), MAX_DEPTH).unwrap();
//! let mut state = DecisionState::new(0.8, 0.95, 1, 100, HuntingStyle::Pursuit);
//! state.depth_zone = Some(zones.zone_for(90.0));
//!
//! // Bottom-zone bonus pushes it past 1.0, so it clamps.
//! assert_eq!(state.effective_aggressiveness().unwrap(), 1.0);
//! ```

/// Simulation parameters loaded from TOML
pub mod config;
/// Per-predator decision state machine (frenzy, ambush, circling, default chain)
pub mod decision;
/// Depth-zone table and lookup
pub mod depth;
/// Seams to the play mode (lake bed, camera projection)
pub mod environment;
/// Error types for simulation contract violations
pub mod error;
/// Organism construction with randomized traits
pub mod lifecycle;
/// Tick counters and logging setup
pub mod metrics;
/// Read-only organism views for renderers and decisions
pub mod snapshot;
/// Spatial hashing for proximity queries
pub mod spatial_hash;
/// Species configuration table
pub mod species;
/// Per-tick systems (biology, locomotion, flocking, schools, food chain, tick driver)
pub mod systems;

pub use decision::{DecisionLogic, DecisionOutcome};
pub use error::{Result, SimError};
pub use metrics::{init_logging, Metrics};
pub use systems::biology::BiologyLogic;
