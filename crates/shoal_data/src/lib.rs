//! Core data structures for the Shoal simulation.
//!
//! Everything in this crate is plain data. Behavior lives in `shoal_core`,
//! which implements `*Logic` traits on these types.

pub mod data;

pub use data::behavior::{
    AmbushState, BehaviorState, CirclingState, DecisionState, FrenzyState, HuntTarget,
    HuntingStyle,
};
pub use data::entity::{Biology, Lure, Organism, Position, SizeCategory, SpeciesId, Velocity};
pub use data::environment::{DepthZone, DepthZoneKind};
pub use data::school::{BurstEscape, FlockMembership, Flocking, PreyCluster, School};
