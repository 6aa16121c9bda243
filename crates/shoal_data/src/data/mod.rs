//! Core data structures for the Shoal simulation.

pub mod behavior;
pub mod entity;
pub mod environment;
pub mod school;
