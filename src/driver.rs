use crate::effect::Effect;
use crate::simulation::Swarm;
use crate::sprite::Sprite;
use crate::surface::Surface;

/// Orbit physics runs on every Nth running frame
pub const ORBIT_UPDATE_STRIDE: u64 = 2;
/// Orbit draw order is re-sorted every Nth running frame
pub const ORBIT_SORT_INTERVAL: u64 = 12;

/// What the driver did on one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Hidden,
    Running,
}

/// Per-frame callback: ambient, update, clear, draw
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    invocations: u64,
    frames_rendered: u64,
    /// Indices into the swarm, in the order they are drawn
    draw_order: Vec<usize>,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Run one display frame.
    ///
    /// While hidden nothing is touched; the host keeps calling so the loop stays armed.
    pub fn run_frame<S: Surface + ?Sized>(
        &mut self,
        swarm: &mut Swarm,
        active: Option<Effect>,
        visible: bool,
        timestamp_ms: f64,
        surface: &mut S,
        sprite: &Sprite,
    ) -> DriverState {
        self.invocations += 1;
        let effect = match active {
            Some(effect) if visible => effect,
            _ => return DriverState::Hidden,
        };

        debug_assert_eq!(swarm.mismatched(effect), 0, "swarm has not entered {}", effect.name());

        // Throttles count running frames only
        let frame = self.frames_rendered;

        swarm.advance_ambient(timestamp_ms, effect);

        let orbiting = effect == Effect::Orbit;
        if !orbiting || frame % ORBIT_UPDATE_STRIDE == 0 {
            swarm.update_all();
        }

        let (w, h) = surface.size();
        surface.clear_rect(0.0, 0.0, w, h);

        let count_changed = self.draw_order.len() != swarm.len();
        if orbiting {
            if count_changed || frame % ORBIT_SORT_INTERVAL == 0 {
                self.sort_by_depth(swarm);
            }
        } else if count_changed || !self.is_identity() {
            self.draw_order = (0..swarm.len()).collect();
        }

        for &index in &self.draw_order {
            if let Some(banana) = swarm.bananas.get(index) {
                banana.draw(surface, sprite);
            }
        }

        self.frames_rendered += 1;
        DriverState::Running
    }

    /// Ascending (depth, id); equal depths keep a stable order
    fn sort_by_depth(&mut self, swarm: &Swarm) {
        if swarm.is_empty() {
            self.draw_order.clear();
            return;
        }
        let mut order: Vec<usize> = (0..swarm.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&swarm.bananas[a], &swarm.bananas[b]);
            a.depth().total_cmp(&b.depth()).then(a.id.cmp(&b.id))
        });
        log::debug!("Re-sorted {} orbiting bananas by depth", order.len());
        self.draw_order = order;
    }

    fn is_identity(&self) -> bool {
        self.draw_order.iter().enumerate().all(|(i, &index)| i == index)
    }
}
