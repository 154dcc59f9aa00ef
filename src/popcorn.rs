use crate::ambient::FrameContext;
use crate::banana::Pose;
use rand::Rng;

/// Distance of the floor line above the bottom edge
pub const FLOOR_INSET: f32 = 10.0;

/// Vertical speed beyond which the sprite is squashed or stretched
const SQUASH_VELOCITY: f32 = 5.0;

/// Bounce simulation state, rebuilt every time popcorn starts
#[derive(Debug, Clone, PartialEq)]
pub struct PopcornState {
    pub vx: f32,
    pub vy: f32,
    pub gravity: f32,
    pub bounce_energy: f32,
    pub max_bounce_energy: f32,
    pub max_vx: f32,
    pub pop_delay_ms: f64,
    pub drop_start_ms: f64,
    pub popped: bool,
    /// Remaining frames of a fast-spin trick
    pub trick_frames: Option<f32>,
    pub hero_cooldown_ms: f64,
    pub last_hero_jump_ms: f64,
}

impl PopcornState {
    /// Sit the banana on the floor and arm a randomized pop delay
    pub fn enter<R: Rng + ?Sized>(pose: &mut Pose, size: f32, hero: bool, ctx: &FrameContext, rng: &mut R) -> Self {
        pose.x = rng.gen::<f32>() * ctx.width;
        pose.y = ctx.height - size / 2.0;
        pose.scale_x = 1.0;
        pose.scale_y = 1.0;

        Self {
            vx: 0.0,
            vy: 0.0,
            gravity: 0.5 + rng.gen::<f32>() * 0.05,
            bounce_energy: 0.0,
            max_bounce_energy: 15.0 + rng.gen::<f32>() * 10.0,
            max_vx: if hero {
                12.0 + rng.gen::<f32>() * 4.0
            } else {
                6.0 + rng.gen::<f32>() * 3.0
            },
            pop_delay_ms: rng.gen::<f64>() * 5000.0,
            drop_start_ms: ctx.clock_ms,
            popped: false,
            trick_frames: None,
            hero_cooldown_ms: 2000.0 + rng.gen::<f64>() * 3000.0,
            last_hero_jump_ms: ctx.clock_ms,
        }
    }

    pub fn floor_y(height: f32) -> f32 {
        height - FLOOR_INSET
    }

    /// First launch off the floor
    fn pop<R: Rng + ?Sized>(&mut self, hero: bool, rng: &mut R) {
        self.popped = true;
        if hero {
            self.bounce_energy = 18.0 + rng.gen::<f32>() * 10.0;
            self.vx = (rng.gen::<f32>() - 0.5) * 18.0;
            self.max_vx = 12.0 + rng.gen::<f32>() * 4.0;
        } else {
            self.bounce_energy = 5.0 + rng.gen::<f32>() * 10.0;
            self.vx = (rng.gen::<f32>() - 0.5) * 8.0;
            self.max_vx = 6.0 + rng.gen::<f32>() * 3.0;
        }
        self.vy = -self.bounce_energy * (0.9 + rng.gen::<f32>() * 0.2);
    }

    pub fn step<R: Rng + ?Sized>(
        &mut self,
        pose: &mut Pose,
        size: f32,
        hero: bool,
        ctx: &FrameContext,
        rng: &mut R,
    ) {
        if !self.popped && ctx.clock_ms - self.drop_start_ms > self.pop_delay_ms {
            self.pop(hero, rng);
        }
        if !self.popped {
            return;
        }

        self.vy += self.gravity;
        pose.x += self.vx;
        pose.y += self.vy;

        // Reflect only while heading further out, so a banana past a wall cannot flip-flop
        let half = size / 2.0;
        let past_left = pose.x - half < 0.0 && self.vx < 0.0;
        let past_right = pose.x + half > ctx.width && self.vx > 0.0;
        if past_left || past_right {
            self.vx *= if hero { -0.9 } else { -0.5 };
        }

        let floor_y = Self::floor_y(ctx.height);
        if pose.y + half >= floor_y {
            self.resolve_floor(pose, size, floor_y, hero, ctx.clock_ms, rng);
        }

        match self.trick_frames {
            Some(frames) => {
                pose.angle += if hero { 6.0 } else { 4.0 };
                let left = frames - 1.0;
                self.trick_frames = (left > 0.0).then_some(left);
            }
            None => pose.angle += if hero { 1.2 } else { 0.5 },
        }
        pose.angle = pose.angle.rem_euclid(360.0);
    }

    /// Floor contact: clamp, bounce, gain energy, maybe start a trick or a hero jump
    pub fn resolve_floor<R: Rng + ?Sized>(
        &mut self,
        pose: &mut Pose,
        size: f32,
        floor_y: f32,
        hero: bool,
        now_ms: f64,
        rng: &mut R,
    ) {
        pose.y = floor_y - size / 2.0;
        self.vy = -self.bounce_energy;
        self.vx += (rng.gen::<f32>() - 0.5) * if hero { 1.2 } else { 2.0 };
        if self.vx.abs() > self.max_vx {
            self.vx = self.max_vx.copysign(self.vx);
        }

        self.bounce_energy += if hero {
            1.2 + rng.gen::<f32>() * 0.5
        } else {
            0.3 + rng.gen::<f32>() * 0.3
        };
        self.bounce_energy = self.bounce_energy.min(self.max_bounce_energy);

        if hero && rng.gen::<f32>() < 0.7 {
            self.trick_frames = Some(30.0 + rng.gen::<f32>() * 30.0);
        } else if rng.gen::<f32>() < 0.3 {
            self.trick_frames = Some(20.0 + rng.gen::<f32>() * 20.0);
        }

        // Heroes only recharge while touching the floor
        if hero && now_ms - self.last_hero_jump_ms > self.hero_cooldown_ms && rng.gen::<f32>() < 0.03 {
            let super_arc = rng.gen::<f32>() < 0.2;
            self.bounce_energy = if super_arc {
                18.0 + rng.gen::<f32>() * 4.0
            } else {
                12.0 + rng.gen::<f32>() * 3.0
            };
            self.vx = (rng.gen::<f32>() - 0.5) * if super_arc { 24.0 } else { 14.0 };
            self.vy = -self.bounce_energy * (0.85 + rng.gen::<f32>() * 0.15);
            self.max_bounce_energy = self.max_bounce_energy.max(self.bounce_energy + 3.0);
            self.last_hero_jump_ms = now_ms;
            self.hero_cooldown_ms = 2500.0 + rng.gen::<f64>() * 4000.0;
            self.trick_frames = Some(40.0 + rng.gen::<f32>() * 30.0);
        }
    }

    /// Draw scale: squashed while falling fast, stretched while rising fast
    pub fn squash(&self) -> (f32, f32) {
        if self.vy.abs() > SQUASH_VELOCITY {
            if self.vy > 0.0 {
                (1.2, 0.8)
            } else {
                (0.8, 1.2)
            }
        } else {
            (1.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx(clock_ms: f64) -> FrameContext {
        FrameContext {
            clock_ms,
            wave_time: clock_ms / 1000.0,
            wind_strength: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }

    fn landed_state(bounce_energy: f32, max_bounce_energy: f32) -> PopcornState {
        PopcornState {
            vx: 1.0,
            vy: -9.5,
            gravity: 0.5,
            bounce_energy,
            max_bounce_energy,
            max_vx: 6.0,
            pop_delay_ms: 0.0,
            drop_start_ms: 0.0,
            popped: true,
            trick_frames: None,
            hero_cooldown_ms: 2000.0,
            last_hero_jump_ms: 0.0,
        }
    }

    #[test]
    fn test_floor_contact_bounces_with_pre_increment_energy() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut state = landed_state(10.0, 20.0);
            let mut pose = Pose::at(400.0, 700.0);
            state.resolve_floor(&mut pose, 100.0, 590.0, false, 0.0, &mut rng);

            assert_eq!(state.vy, -10.0);
            let gained = state.bounce_energy - 10.0;
            assert!((0.3 - 1e-4..=0.6 + 1e-4).contains(&gained), "gained {}", gained);
            assert_eq!(pose.y, 540.0);
        }
    }

    #[test]
    fn test_floor_contact_caps_energy() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut state = landed_state(10.0, 10.2);
        let mut pose = Pose::at(400.0, 600.0);
        state.resolve_floor(&mut pose, 100.0, 590.0, false, 0.0, &mut rng);
        assert_eq!(state.vy, -10.0);
        assert_eq!(state.bounce_energy, 10.2);
    }

    #[test]
    fn test_horizontal_speed_is_capped_on_landing() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = landed_state(10.0, 20.0);
        state.vx = -50.0;
        let mut pose = Pose::at(400.0, 600.0);
        state.resolve_floor(&mut pose, 100.0, 590.0, false, 0.0, &mut rng);
        assert_eq!(state.vx, -6.0);
    }

    #[test]
    fn test_waits_for_pop_delay() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut pose = Pose::at(0.0, 0.0);
        let mut state = PopcornState::enter(&mut pose, 100.0, false, &ctx(0.0), &mut rng);
        state.pop_delay_ms = 1000.0;
        let resting = pose;

        state.step(&mut pose, 100.0, false, &ctx(500.0), &mut rng);
        assert!(!state.popped);
        assert_eq!(pose, resting);

        state.step(&mut pose, 100.0, false, &ctx(1001.0), &mut rng);
        assert!(state.popped);
        assert!(pose.y < resting.y);
    }

    #[test]
    fn test_never_sinks_below_floor() {
        let mut rng = StdRng::seed_from_u64(11);
        for hero in [false, true] {
            let mut pose = Pose::at(0.0, 0.0);
            let size = 120.0;
            let mut state = PopcornState::enter(&mut pose, size, hero, &ctx(0.0), &mut rng);
            let floor_y = PopcornState::floor_y(600.0);
            for frame in 0..5000 {
                let c = ctx(frame as f64 * 16.0);
                state.step(&mut pose, size, hero, &c, &mut rng);
                // Before popping the banana rests below the floor line
                if state.popped {
                    assert!(pose.y + size / 2.0 <= floor_y + 1e-3);
                }
            }
            assert!(state.popped);
        }
    }

    #[test]
    fn test_trick_runs_out() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut state = landed_state(10.0, 20.0);
        state.vy = -30.0;
        state.gravity = 0.0;
        state.trick_frames = Some(2.0);
        let mut pose = Pose::at(400.0, 300.0);
        state.step(&mut pose, 10.0, false, &ctx(0.0), &mut rng);
        assert_eq!(state.trick_frames, Some(1.0));
        state.step(&mut pose, 10.0, false, &ctx(16.0), &mut rng);
        assert_eq!(state.trick_frames, None);
        assert_eq!(pose.angle, 8.0);
    }

    #[test]
    fn test_squash() {
        let mut state = landed_state(10.0, 20.0);
        state.vy = 8.0;
        assert_eq!(state.squash(), (1.2, 0.8));
        state.vy = -8.0;
        assert_eq!(state.squash(), (0.8, 1.2));
        state.vy = 2.0;
        assert_eq!(state.squash(), (1.0, 1.0));
    }

    #[test]
    fn test_hero_landing_after_cooldown() {
        let mut rng = StdRng::seed_from_u64(21);
        let now_ms = 10_000.0;
        let mut super_jumps = 0;
        let mut tricks = 0;
        for _ in 0..2000 {
            let mut state = landed_state(10.0, 40.0);
            let mut pose = Pose::at(400.0, 700.0);
            state.resolve_floor(&mut pose, 100.0, 590.0, true, now_ms, &mut rng);
            assert_eq!(pose.y, 540.0);

            if state.last_hero_jump_ms == now_ms {
                super_jumps += 1;
                let energy = state.bounce_energy;
                assert!(
                    (12.0..15.0).contains(&energy) || (18.0..22.0).contains(&energy),
                    "energy {}",
                    energy
                );
                assert!(state.vy <= -energy * 0.85 + 1e-4 && state.vy >= -energy - 1e-4);
                assert!(state.max_bounce_energy >= energy + 3.0);
                assert!((2500.0..6500.0).contains(&state.hero_cooldown_ms));
                assert!(state.trick_frames.is_some_and(|f| (40.0..70.0).contains(&f)));
            } else {
                assert_eq!(state.vy, -10.0);
                let gained = state.bounce_energy - 10.0;
                assert!((1.2 - 1e-4..=1.7 + 1e-4).contains(&gained), "gained {}", gained);
                assert_eq!(state.hero_cooldown_ms, 2000.0);
                if state.trick_frames.is_some() {
                    tricks += 1;
                }
            }
        }
        // 3 % super jump chance, at least 70 % trick chance otherwise
        assert!((20..120).contains(&super_jumps), "super jumps {}", super_jumps);
        let landings = 2000 - super_jumps;
        assert!(tricks * 10 > landings * 7, "tricks {} of {}", tricks, landings);
    }

    #[test]
    fn test_hero_super_jump_waits_for_cooldown() {
        let mut rng = StdRng::seed_from_u64(22);
        for _ in 0..2000 {
            let mut state = landed_state(10.0, 40.0);
            let mut pose = Pose::at(400.0, 700.0);
            state.resolve_floor(&mut pose, 100.0, 590.0, true, 1500.0, &mut rng);
            assert_eq!(state.last_hero_jump_ms, 0.0);
            assert_eq!(state.vy, -10.0);
            assert_eq!(state.max_bounce_energy, 40.0);
            assert_eq!(state.hero_cooldown_ms, 2000.0);
        }
    }
}
