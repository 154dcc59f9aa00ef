use crate::ambient::FrameContext;
use crate::banana::Pose;
use rand::Rng;
use std::f32::consts::TAU;

/// Orbits never shrink below this radius (world pixels)
pub const MIN_ORBIT_RADIUS: f32 = 8.0;

/// Fraction of the gap to the breathing target closed per update
const RADIUS_EASE: f32 = 0.08;

/// Depth follows the radius far more slowly than the radius follows its target,
/// so draw order settles instead of reshuffling every frame
const DEPTH_SMOOTHING: f32 = 0.02;

/// Circular motion around the canvas centre
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitState {
    /// Angular position (radians)
    pub theta: f32,
    /// Radians advanced per update before the speed wobble
    pub base_speed: f32,
    pub wobble_amp: f32,
    pub wobble_rate: f32,
    pub wobble_phase: f32,
    pub base_radius: f32,
    /// Share of the shorter canvas edge the base radius was drawn as
    pub radius_share: f32,
    pub breath_amp: f32,
    pub breath_rate: f32,
    pub breath_phase: f32,
    /// Live radius, eased toward the breathing target
    pub radius: f32,
    pub bob_amp: f32,
    pub bob_rate: f32,
    pub bob_phase: f32,
    /// Heavily smoothed radius used only for draw ordering
    pub depth: f32,
}

impl OrbitState {
    pub fn enter<R: Rng + ?Sized>(pose: &mut Pose, ctx: &FrameContext, rng: &mut R) -> Self {
        let radius_share = 0.12 + rng.gen::<f32>() * 0.33;
        let base_radius = share_of(ctx.width.min(ctx.height), radius_share);

        let state = Self {
            theta: rng.gen::<f32>() * TAU,
            base_speed: 0.01 + rng.gen::<f32>() * 0.02,
            wobble_amp: 0.15 + rng.gen::<f32>() * 0.3,
            wobble_rate: 0.2 + rng.gen::<f32>() * 0.5,
            wobble_phase: rng.gen::<f32>() * TAU,
            base_radius,
            radius_share,
            breath_amp: 0.04 + rng.gen::<f32>() * 0.10,
            breath_rate: 0.3 + rng.gen::<f32>() * 0.6,
            breath_phase: rng.gen::<f32>() * TAU,
            radius: base_radius,
            bob_amp: 2.0 + rng.gen::<f32>() * 8.0,
            bob_rate: 0.8 + rng.gen::<f32>() * 1.6,
            bob_phase: rng.gen::<f32>() * TAU,
            depth: base_radius,
        };

        pose.scale_x = 1.0;
        pose.scale_y = 1.0;
        state.place(pose, ctx);
        state
    }

    pub fn step(&mut self, pose: &mut Pose, ctx: &FrameContext) {
        let speed = self.base_speed * (1.0 + self.wobble_amp * ctx.wave(self.wobble_rate, self.wobble_phase).sin());
        self.theta = (self.theta + speed).rem_euclid(TAU);

        let target = self.base_radius * (1.0 + self.breath_amp * ctx.wave(self.breath_rate, self.breath_phase).sin());
        self.radius += (target - self.radius) * RADIUS_EASE;
        self.radius = self.radius.max(MIN_ORBIT_RADIUS);

        self.depth += (self.radius - self.depth) * DEPTH_SMOOTHING;

        self.place(pose, ctx);
    }

    fn bob(&self, ctx: &FrameContext) -> f32 {
        self.bob_amp * ctx.wave(self.bob_rate, self.bob_phase).sin()
    }

    /// Position on the circle plus the vertical bob, facing along the orbit
    fn place(&self, pose: &mut Pose, ctx: &FrameContext) {
        let (cx, cy) = ctx.center();
        pose.x = cx + self.theta.cos() * self.radius;
        pose.y = cy + self.theta.sin() * self.radius + self.bob(ctx);
        pose.angle = self.theta.to_degrees() + 90.0;
    }

    /// Re-derive the baseline from the new shorter edge; the live radius and
    /// depth keep their proportion to it
    pub fn rescale(&mut self, min_dim: f32) {
        let base_radius = share_of(min_dim, self.radius_share);
        let k = base_radius / self.base_radius;
        self.base_radius = base_radius;
        self.radius = (self.radius * k).max(MIN_ORBIT_RADIUS);
        self.depth *= k;
    }
}

fn share_of(min_dim: f32, share: f32) -> f32 {
    (min_dim * share).max(MIN_ORBIT_RADIUS)
}
