//! Seams to the play-mode manager that owns the camera and lake bed.

use crate::config::WorldConfig;
use shoal_data::Position;

/// Queries the simulation needs from the active play mode. The simulation
/// never owns the camera or the bathymetry.
pub trait PlayArea {
    /// Bottom of the water column at world `x`, in world units of `y`.
    fn bottom_at(&self, x: f64) -> f64;

    /// Projects a world position to screen space.
    fn world_to_screen(&self, position: Position) -> Position;

    fn screen_width(&self) -> f64;

    /// Horizontal world range currently simulated, `(left, right)`.
    fn active_window(&self) -> (f64, f64);
}

/// Flat-bottomed lake with a fixed camera; used headless and in tests.
#[derive(Debug, Clone, Copy)]
pub struct FlatLakeBed {
    pub width: f64,
    pub bottom: f64,
    /// World x at the left screen edge.
    pub camera_x: f64,
}

impl FlatLakeBed {
    #[must_use]
    pub fn from_config(world: &WorldConfig) -> Self {
        Self {
            width: world.width,
            bottom: world.column_height(),
            camera_x: 0.0,
        }
    }
}

impl PlayArea for FlatLakeBed {
    fn bottom_at(&self, _x: f64) -> f64 {
        self.bottom
    }

    fn world_to_screen(&self, position: Position) -> Position {
        Position::new(position.x - self.camera_x, position.y)
    }

    fn screen_width(&self) -> f64 {
        self.width
    }

    fn active_window(&self) -> (f64, f64) {
        (self.camera_x, self.camera_x + self.width)
    }
}
