use crate::effect::Effect;
use crate::simulation::Swarm;

/// Outcome of one user trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Canvas shown with this effect freshly entered
    Shown(Effect),
    /// Canvas hidden; particles untouched
    Hidden,
}

/// Click-driven state machine over the effect cycle.
///
/// Odd trigger counts show the canvas and advance to the effect after
/// the last one shown; even counts hide it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeController {
    toggles: u64,
    last_effect: Effect,
    active: Option<Effect>,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeController {
    pub fn new() -> Self {
        Self::starting_at(Effect::Drift)
    }

    /// Controller whose first visible advance lands on `effect`
    pub fn starting_at(effect: Effect) -> Self {
        Self {
            toggles: 0,
            last_effect: effect.prev(),
            active: None,
        }
    }

    pub fn toggles(&self) -> u64 {
        self.toggles
    }

    pub fn last_effect(&self) -> Effect {
        self.last_effect
    }

    /// Effect currently driving the swarm, if the canvas is visible
    pub fn active(&self) -> Option<Effect> {
        self.active
    }

    pub fn is_visible(&self) -> bool {
        self.toggles % 2 == 1
    }

    /// Handle one trigger (canvas click or the secondary control)
    pub fn advance(&mut self, swarm: &mut Swarm) -> Transition {
        self.toggles += 1;

        if self.is_visible() {
            let next = Effect::from_index(self.last_effect.index() + 1);
            self.last_effect = next;
            self.active = Some(next);
            swarm.enter_effect(next);
            log::info!("Showing swarm with {} effect", next.name());
            Transition::Shown(next)
        } else {
            self.active = None;
            log::info!("Hiding swarm");
            Transition::Hidden
        }
    }
}
