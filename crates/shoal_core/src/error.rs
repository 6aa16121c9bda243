//! Error types for shoal_core.
//!
//! Only caller-contract violations surface as errors. Absent optional inputs
//! (no lure, no neighbors, no prey clusters) are normal and never reach here.

use shoal_data::SpeciesId;
use thiserror::Error;

/// Main error type for simulation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A predator was evaluated before the spawner assigned its depth zone.
    #[error("no depth zone assigned")]
    MissingDepthZone,

    /// The species table has no entry for a species present in the population.
    #[error("species {0:?} is missing from the species table")]
    UnknownSpecies(SpeciesId),
}

/// Result type alias for shoal_core operations.
pub type Result<T> = std::result::Result<T, SimError>;
