//! Shoal: predator and prey behavior for a freshwater lake.
//!
//! The engine itself lives in `shoal_core`; this crate wraps it in a
//! [`model::world::World`] that owns the population and drives ticks.

pub mod model;
