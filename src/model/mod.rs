pub use shoal_core::{BiologyLogic, DecisionLogic};
pub mod config {
    pub use shoal_core::config::*;
}
pub mod decision {
    pub use shoal_core::decision::*;
}
pub mod depth {
    pub use shoal_core::depth::*;
}
pub mod environment {
    pub use shoal_core::environment::*;
}
pub mod lifecycle {
    pub use shoal_core::lifecycle::*;
}
pub mod metrics {
    pub use shoal_core::metrics::*;
}
pub mod snapshot {
    pub use shoal_core::snapshot::*;
}
pub mod spatial_hash {
    pub use shoal_core::spatial_hash::*;
}
pub mod species {
    pub use shoal_core::species::*;
}
pub mod systems {
    pub use shoal_core::systems::*;
}

pub mod state {
    pub use shoal_data::*;
}

pub mod world;
