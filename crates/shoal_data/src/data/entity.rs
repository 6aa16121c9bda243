use super::behavior::DecisionState;
use super::school::{BurstEscape, Flocking};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// World position of an organism. `y` grows downward into the water column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(&self, other: &Position) -> f64 {
        self.distance_sq(other).sqrt()
    }

    #[must_use]
    pub fn distance_sq(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Velocity of an organism in world units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    #[must_use]
    pub const fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    #[must_use]
    pub fn magnitude(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpeciesId {
    LakeTrout,
    NorthernPike,
    SmallmouthBass,
    YellowPerch,
    Cisco,
    RainbowSmelt,
    Sculpin,
    Crayfish,
}

impl SpeciesId {
    pub const ALL: [SpeciesId; 8] = [
        SpeciesId::LakeTrout,
        SpeciesId::NorthernPike,
        SpeciesId::SmallmouthBass,
        SpeciesId::YellowPerch,
        SpeciesId::Cisco,
        SpeciesId::RainbowSmelt,
        SpeciesId::Sculpin,
        SpeciesId::Crayfish,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LakeTrout => "lake_trout",
            Self::NorthernPike => "northern_pike",
            Self::SmallmouthBass => "smallmouth_bass",
            Self::YellowPerch => "yellow_perch",
            Self::Cisco => "cisco",
            Self::RainbowSmelt => "rainbow_smelt",
            Self::Sculpin => "sculpin",
            Self::Crayfish => "crayfish",
        }
    }
}

/// Size class used by the render layer and the scoring collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    Trophy,
}

impl SizeCategory {
    /// Classifies a weight in pounds.
    #[must_use]
    pub fn from_weight(weight: f64) -> Self {
        if weight < 1.0 {
            Self::Small
        } else if weight < 4.0 {
            Self::Medium
        } else if weight < 12.0 {
            Self::Large
        } else {
            Self::Trophy
        }
    }
}

/// Physiological state drifted by the biology hook every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biology {
    /// 0 = sated, 100 = starving.
    pub hunger: f64,
    /// 0 = dying, 100 = healthy.
    pub health: f64,
    pub metabolism: f64,
    /// Render-facing highlight, 0..=1.
    pub interest_flash: f64,
}

impl Default for Biology {
    fn default() -> Self {
        Self {
            hunger: 30.0,
            health: 100.0,
            metabolism: 1.0,
            interest_flash: 0.0,
        }
    }
}

/// The angler's lure, the focus of every predator's attention when present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lure {
    pub position: Position,
}

impl Lure {
    #[must_use]
    pub const fn at(x: f64, y: f64) -> Self {
        Self {
            position: Position::new(x, y),
        }
    }
}

/// A complete organism record. Owned by the population collection; every
/// simulation system borrows it for the duration of one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organism {
    pub id: Uuid,
    pub species: SpeciesId,
    pub position: Position,
    /// Derived from `position.y` through the world depth scale.
    pub depth: f64,
    pub size: SizeCategory,
    pub weight: f64,
    pub visible: bool,
    pub consumed: bool,
    pub hooked: bool,
    pub age: u64,
    pub biology: Biology,
    pub decision: Option<DecisionState>,
    pub flocking: Option<Flocking>,
    pub escape: Option<BurstEscape>,
}

impl Organism {
    /// Moves the organism and refreshes its derived depth.
    pub fn move_to(&mut self, position: Position, depth_scale: f64) {
        self.position = position;
        self.depth = position.y * depth_scale;
    }

    /// Still participates in the simulation.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.visible && !self.consumed && !self.hooked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_category_thresholds() {
        assert_eq!(SizeCategory::from_weight(0.4), SizeCategory::Small);
        assert_eq!(SizeCategory::from_weight(1.0), SizeCategory::Medium);
        assert_eq!(SizeCategory::from_weight(8.0), SizeCategory::Large);
        assert_eq!(SizeCategory::from_weight(20.0), SizeCategory::Trophy);
    }

    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
        assert!((a.distance_sq(&b) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_species_serializes_as_variant_name() {
        let json = serde_json::to_string(&SpeciesId::NorthernPike).unwrap();
        assert_eq!(json, "\"NorthernPike\"");
    }
}
