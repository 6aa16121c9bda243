use crate::config::BiologyConfig;
use crate::decision::frenzy::decay_frenzy;
use shoal_data::{Biology, Organism};

/// Physiological drift shared by every organism.
pub trait BiologyLogic {
    /// Advances hunger, health and flash decay by `frames` ticks.
    fn drift(&mut self, frames: f64, cfg: &BiologyConfig);
    /// Raises the render highlight; never lowers it.
    fn trigger_interest_flash(&mut self, intensity: f64);
    /// Reduces hunger after eating prey of `prey_weight`.
    fn feed(&mut self, prey_weight: f64, cfg: &BiologyConfig);
}

impl BiologyLogic for Biology {
    fn drift(&mut self, frames: f64, cfg: &BiologyConfig) {
        self.hunger = (self.hunger + frames * cfg.hunger_rate * self.metabolism).clamp(0.0, 100.0);

        if self.hunger < cfg.low_hunger {
            self.health += cfg.health_recovery_rate * frames;
        } else if self.hunger > cfg.high_hunger {
            self.health -= cfg.health_decay_rate * frames;
        }
        self.health = self.health.clamp(0.0, 100.0);

        self.interest_flash = (self.interest_flash - cfg.flash_decay * frames).max(0.0);
    }

    fn trigger_interest_flash(&mut self, intensity: f64) {
        self.interest_flash = self.interest_flash.max(intensity.clamp(0.0, 1.0));
    }

    fn feed(&mut self, prey_weight: f64, cfg: &BiologyConfig) {
        let value = (prey_weight * cfg.hunger_per_prey_weight).max(cfg.min_meal_value);
        self.hunger = (self.hunger - value).max(0.0);
    }
}

/// What one biology tick changed for an organism.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BiologyEvents {
    pub frenzy_ended: bool,
    pub expired: bool,
}

/// Biology phase for one organism: frenzy decay, drift, aging.
///
/// Runs every tick regardless of the decision cooldown.
pub fn biology_tick(organism: &mut Organism, lifespan_ticks: u64, cfg: &BiologyConfig) -> BiologyEvents {
    let mut events = BiologyEvents::default();
    if let Some(decision) = organism.decision.as_mut() {
        events.frenzy_ended = decay_frenzy(decision);
    }
    organism.biology.drift(1.0, cfg);

    organism.age += 1;
    if organism.age > lifespan_ticks && organism.visible {
        organism.visible = false;
        events.expired = true;
    }
    events
}
