use super::entity::Position;
use super::environment::DepthZone;
use serde::{Deserialize, Serialize};

/// Behavioral state of a predator, also used by the render layer for
/// animation selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    #[default]
    Idle,
    Interested,
    Chasing,
    Striking,
    Fleeing,
    HuntingBaitfish,
    Feeding,
}

impl BehaviorState {
    /// States that count toward a neighbor's feeding frenzy.
    #[must_use]
    pub fn is_excited(&self) -> bool {
        matches!(
            self,
            Self::Interested
                | Self::Chasing
                | Self::Striking
                | Self::HuntingBaitfish
                | Self::Feeding
        )
    }

    /// States in which the decision machine owns feeding; the food-chain
    /// resolver leaves such organisms alone.
    #[must_use]
    pub fn is_actively_hunting(&self) -> bool {
        self.is_excited()
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Interested => "interested",
            Self::Chasing => "chasing",
            Self::Striking => "striking",
            Self::Fleeing => "fleeing",
            Self::HuntingBaitfish => "hunting_baitfish",
            Self::Feeding => "feeding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrenzyState {
    pub in_frenzy: bool,
    /// Remaining ticks.
    pub timer: u32,
    pub intensity: f64,
}

/// Ambush predators hold a fixed anchor and burst out at anything that
/// comes inside their strike range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbushState {
    pub anchor: Position,
    pub radius: f64,
    pub strike_range: f64,
    pub burst_multiplier: f64,
}

/// Circling predators orbit a target for a while before they commit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclingState {
    /// Current orbit angle in radians.
    pub angle: f64,
    pub radius: f64,
    /// Radians per evaluation.
    pub angular_speed: f64,
    /// +1.0 or -1.0.
    pub direction: f64,
    pub started_at_ms: Option<u64>,
    pub max_duration_ms: u64,
    pub completed: bool,
}

impl CirclingState {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.started_at_ms.is_some() && !self.completed
    }

    pub fn reset(&mut self) {
        self.started_at_ms = None;
        self.completed = false;
    }
}

/// Species-specific hunting sub-state. Each variant carries only the fields
/// its strategy needs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum HuntingStyle {
    #[default]
    Pursuit,
    Ambush(AmbushState),
    Circling(CirclingState),
}

/// What a hunt is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HuntTarget {
    Lure,
    Cluster(u64),
}

/// Per-predator decision state. Traits are fixed at creation, session fields
/// mutate every decision and biology tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionState {
    pub state: BehaviorState,
    pub target: Option<Position>,
    pub hunt_target: Option<HuntTarget>,

    pub alertness: f64,
    pub base_aggressiveness: f64,
    pub wander_direction: i8,

    pub strike_attempts: u32,
    pub max_strike_attempts: u32,
    pub decision_cooldown_ms: u64,
    pub last_decision_time_ms: Option<u64>,
    pub state_since_ms: u64,
    pub flee_until_ms: u64,

    pub frenzy: FrenzyState,
    pub depth_zone: Option<DepthZone>,
    pub style: HuntingStyle,
    /// Speed multiplier applied by locomotion while striking.
    pub burst: f64,
}

impl DecisionState {
    /// Creates an idle decision state. The depth zone is left unassigned; the
    /// spawner is responsible for setting it before the first decision.
    #[must_use]
    pub fn new(
        alertness: f64,
        base_aggressiveness: f64,
        wander_direction: i8,
        decision_cooldown_ms: u64,
        style: HuntingStyle,
    ) -> Self {
        Self {
            state: BehaviorState::Idle,
            target: None,
            hunt_target: None,
            alertness,
            base_aggressiveness,
            wander_direction: if wander_direction < 0 { -1 } else { 1 },
            strike_attempts: 0,
            max_strike_attempts: 1,
            decision_cooldown_ms,
            last_decision_time_ms: None,
            state_since_ms: 0,
            flee_until_ms: 0,
            frenzy: FrenzyState::default(),
            depth_zone: None,
            style,
            burst: 1.0,
        }
    }

    #[must_use]
    pub fn is_ambush_predator(&self) -> bool {
        matches!(self.style, HuntingStyle::Ambush(_))
    }

    #[must_use]
    pub fn circles_before_strike(&self) -> bool {
        matches!(self.style, HuntingStyle::Circling(_))
    }
}
