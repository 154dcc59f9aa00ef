use crate::ambient::{Ambient, FrameContext};
use crate::banana::Banana;
use crate::effect::Effect;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Smallest canvas edge the swarm will work with (world pixels)
const MIN_EXTENT: f32 = 1.0;

/// The banana swarm: every particle plus the ambient state they share
pub struct Swarm {
    pub bananas: Vec<Banana>,
    pub width: f32,
    pub height: f32,
    pub ambient: Ambient,
    rng: StdRng,
}

impl Swarm {
    pub fn new(count: usize, width: f32, height: f32, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let width = width.max(MIN_EXTENT);
        let height = height.max(MIN_EXTENT);
        let bananas = (0..count).map(|id| Banana::spawn(id, width, height, &mut rng)).collect();

        Self {
            bananas,
            width,
            height,
            ambient: Ambient::new(),
            rng,
        }
    }

    /// Snapshot handed to every banana this frame
    pub fn context(&self) -> FrameContext {
        FrameContext {
            clock_ms: self.ambient.clock_ms,
            wave_time: self.ambient.wave_time,
            wind_strength: self.ambient.wind_strength,
            width: self.width,
            height: self.height,
        }
    }

    /// Reinitialise every banana for `effect`
    pub fn enter_effect(&mut self, effect: Effect) {
        // Time spent hidden must not count toward pop delays
        self.ambient.pause();
        let ctx = self.context();
        for banana in &mut self.bananas {
            banana.enter(effect, &ctx, &mut self.rng);
        }
    }

    /// Advance the shared clock and wind from a host timestamp
    pub fn advance_ambient(&mut self, timestamp_ms: f64, active: Effect) {
        self.ambient
            .advance(timestamp_ms, active == Effect::Breeze, &mut self.rng);
    }

    /// Update every banana against one consistent snapshot
    pub fn update_all(&mut self) {
        let ctx = self.context();
        for banana in &mut self.bananas {
            banana.update(&ctx, &mut self.rng);
        }
    }

    /// Follow a canvas resize, keeping every anchor at the same relative spot
    pub fn resize(&mut self, width: f32, height: f32) {
        let width = width.max(MIN_EXTENT);
        let height = height.max(MIN_EXTENT);
        if width == self.width && height == self.height {
            return;
        }
        let from = (self.width, self.height);
        for banana in &mut self.bananas {
            banana.rescale(from, (width, height));
        }
        log::debug!("Swarm resized to {:.0}x{:.0}", width, height);
        self.width = width;
        self.height = height;
    }

    pub fn len(&self) -> usize {
        self.bananas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bananas.is_empty()
    }

    /// Number of bananas whose motion does not match `effect`
    pub fn mismatched(&self, effect: Effect) -> usize {
        self.bananas.iter().filter(|b| b.effect() != effect).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banana::Motion;

    #[test]
    fn test_seeded_swarms_match() {
        let a = Swarm::new(20, 800.0, 600.0, Some(42));
        let b = Swarm::new(20, 800.0, 600.0, Some(42));
        assert_eq!(a.bananas, b.bananas);
        assert_eq!(a.len(), 20);
        assert!(a.bananas.iter().enumerate().all(|(i, banana)| banana.id == i));
    }

    #[test]
    fn test_enter_effect_switches_everyone() {
        let mut swarm = Swarm::new(30, 800.0, 600.0, Some(1));
        for effect in Effect::ALL {
            swarm.enter_effect(effect);
            assert_eq!(swarm.mismatched(effect), 0);
        }
    }

    #[test]
    fn test_empty_swarm_is_harmless() {
        let mut swarm = Swarm::new(0, 800.0, 600.0, Some(2));
        assert!(swarm.is_empty());
        assert_eq!(swarm.mismatched(Effect::Drift), 0);
        swarm.enter_effect(Effect::Orbit);
        swarm.advance_ambient(16.0, Effect::Orbit);
        swarm.update_all();
        swarm.resize(100.0, 100.0);
    }

    #[test]
    fn test_zero_size_canvas_is_floored() {
        let mut swarm = Swarm::new(5, 0.0, 0.0, Some(3));
        assert_eq!((swarm.width, swarm.height), (1.0, 1.0));
        swarm.enter_effect(Effect::Popcorn);
        for frame in 0..100 {
            swarm.advance_ambient(frame as f64 * 16.0, Effect::Popcorn);
            swarm.update_all();
        }
        assert!(swarm.bananas.iter().all(|b| b.pose.x.is_finite() && b.pose.y.is_finite()));
    }

    #[test]
    fn test_resize_rescales_home_points() {
        let mut swarm = Swarm::new(10, 800.0, 600.0, Some(4));
        let before: Vec<(f32, f32)> = swarm
            .bananas
            .iter()
            .map(|b| (b.traits.base_x, b.traits.base_y))
            .collect();
        swarm.resize(400.0, 1200.0);
        for (banana, (bx, by)) in swarm.bananas.iter().zip(before) {
            assert!((banana.traits.base_x - bx * 0.5).abs() < 1e-3);
            assert!((banana.traits.base_y - by * 2.0).abs() < 1e-3);
        }
        assert_eq!((swarm.width, swarm.height), (400.0, 1200.0));
    }

    #[test]
    fn test_enter_effect_discards_hidden_time() {
        let mut swarm = Swarm::new(3, 800.0, 600.0, Some(5));
        swarm.advance_ambient(0.0, Effect::Drift);
        swarm.advance_ambient(50.0, Effect::Drift);
        swarm.enter_effect(Effect::Spin);
        swarm.advance_ambient(90_000.0, Effect::Spin);
        assert_eq!(swarm.ambient.clock_ms, 50.0);
    }

    fn orbit_radii(swarm: &Swarm) -> Vec<f32> {
        swarm
            .bananas
            .iter()
            .map(|b| match &b.motion {
                Motion::Orbit(state) => state.radius,
                _ => panic!("expected orbit"),
            })
            .collect()
    }

    #[test]
    fn test_orbit_radii_survive_resize_round_trips() {
        let mut swarm = Swarm::new(5, 800.0, 600.0, Some(1));
        swarm.enter_effect(Effect::Orbit);
        let before = orbit_radii(&swarm);

        swarm.resize(400.0, 600.0);
        swarm.resize(800.0, 600.0);
        for (after, before) in orbit_radii(&swarm).iter().zip(&before) {
            assert!((after - before).abs() < 1e-2, "{} vs {}", after, before);
        }

        swarm.resize(0.0, 0.0);
        swarm.resize(800.0, 600.0);
        for (after, before) in orbit_radii(&swarm).iter().zip(&before) {
            assert!((after - before).abs() < 1e-2, "{} vs {}", after, before);
        }
    }
}
