use crate::ambient::FrameContext;
use crate::banana::Pose;
use rand::Rng;
use std::f32::consts::TAU;

const REST_ANGLE_LIMIT: f32 = 18.0;
const NOISE_SMOOTHING: f32 = 0.92;
const IMPULSE_PROBABILITY: f32 = 0.002;
/// Velocity kept when the angle hits its limit
const LIMIT_RESTITUTION: f32 = 0.7;

/// Pendulum-on-a-stem state for the breeze effect
#[derive(Debug, Clone, PartialEq)]
pub struct BreezeState {
    pub stem_x: f32,
    pub stem_y: f32,
    /// Pendulum arm length
    pub length: f32,
    pub angular_vel: f32,
    /// How strongly the global wind bends this banana
    pub sensitivity: f32,
    /// Angle limit in degrees
    pub max_angle: f32,
    pub rest_angle: f32,
    pub rest_drift: f32,
    pub noise1: f32,
    pub noise2: f32,
    pub noise_rate1: f32,
    pub noise_rate2: f32,
    pub noise_phase1: f32,
    pub noise_phase2: f32,
    /// Turbulence bend in degrees
    pub airiness: f32,
    pub flutter: f32,
    /// Low-pass coefficient for the target angle
    pub response: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub target_filtered: Option<f32>,
}

impl BreezeState {
    /// Hang the banana from a stem in the top 30% of the canvas
    pub fn enter<R: Rng + ?Sized>(pose: &mut Pose, size: f32, rest_bias: f32, ctx: &FrameContext, rng: &mut R) -> Self {
        let stem_x = rng.gen::<f32>() * ctx.width;
        let stem_y = 10.0 + rng.gen::<f32>() * (ctx.height * 0.30);
        let length = size * (0.55 + rng.gen::<f32>() * 0.15);

        pose.x = stem_x;
        pose.y = stem_y + length;
        pose.angle = (rng.gen::<f32>() - 0.5) * 10.0;
        pose.scale_x = 1.0;
        pose.scale_y = 1.0;

        Self {
            stem_x,
            stem_y,
            length,
            angular_vel: 0.0,
            sensitivity: 0.7 + rng.gen::<f32>() * 0.9,
            max_angle: 28.0 + rng.gen::<f32>() * 12.0,
            rest_angle: rest_bias,
            rest_drift: 0.0,
            noise1: 0.0,
            noise2: 0.0,
            noise_rate1: 0.25 + rng.gen::<f32>() * 0.45,
            noise_rate2: 0.60 + rng.gen::<f32>() * 0.90,
            noise_phase1: rng.gen::<f32>() * TAU,
            noise_phase2: rng.gen::<f32>() * TAU,
            airiness: 6.0 + rng.gen::<f32>() * 10.0,
            flutter: 0.12 + rng.gen::<f32>() * 1.2,
            response: 0.02 + rng.gen::<f32>() * 0.03,
            stiffness: 0.016 + rng.gen::<f32>() * 0.02,
            damping: 0.08 + rng.gen::<f32>() * 0.10,
            target_filtered: None,
        }
    }

    /// Raw lean target: wind, personal bias, turbulence and flutter
    fn raw_target<R: Rng + ?Sized>(&mut self, ctx: &FrameContext, rng: &mut R) -> f32 {
        let base_lean = ctx.wind_strength * 8.0 * self.sensitivity;

        // Slow personal drift so no two bananas settle on the same angle
        self.rest_drift = self.rest_drift * 0.985 + (rng.gen::<f32>() - 0.5) * 0.012;
        self.rest_angle = (self.rest_angle + self.rest_drift).clamp(-REST_ANGLE_LIMIT, REST_ANGLE_LIMIT);

        let s1 = ctx.wave(self.noise_rate1 * TAU, self.noise_phase1).sin();
        let s2 = ctx.wave(self.noise_rate2 * TAU, self.noise_phase2).sin();
        self.noise1 = self.noise1 * NOISE_SMOOTHING + s1 * (1.0 - NOISE_SMOOTHING);
        self.noise2 = self.noise2 * NOISE_SMOOTHING + s2 * (1.0 - NOISE_SMOOTHING);
        let turbulence = (self.noise1 + 0.7 * self.noise2) * self.airiness;

        let flutter = ctx.wave(6.0, self.stem_x * 0.01).sin() * self.flutter * 0.3;

        base_lean + self.rest_angle + turbulence + flutter
    }

    pub fn step<R: Rng + ?Sized>(&mut self, pose: &mut Pose, ctx: &FrameContext, rng: &mut R) {
        let raw = self.raw_target(ctx, rng);

        let filtered = self.target_filtered.unwrap_or(raw);
        let filtered = filtered + self.response * (raw - filtered);
        self.target_filtered = Some(filtered);

        // Spring-damper toward the filtered target
        let diff = filtered - pose.angle;
        self.angular_vel += self.stiffness * diff - self.damping * self.angular_vel;

        if rng.gen::<f32>() < IMPULSE_PROBABILITY {
            self.angular_vel += (rng.gen::<f32>() - 0.5) * 0.12 * (1.0 + ctx.wind_strength.abs());
        }
        self.angular_vel += (rng.gen::<f32>() - 0.5) * 0.0012;

        pose.angle += self.angular_vel;
        pose.angle += (rng.gen::<f32>() - 0.5) * 0.04;

        if pose.angle > self.max_angle {
            pose.angle = self.max_angle;
            self.angular_vel *= LIMIT_RESTITUTION;
        }
        if pose.angle < -self.max_angle {
            pose.angle = -self.max_angle;
            self.angular_vel *= LIMIT_RESTITUTION;
        }

        let a = pose.angle.to_radians();
        let shimmer_x = ctx.wave(2.3, self.stem_x * 0.01).sin() * 0.4;
        let shimmer_y = ctx.wave(2.7, self.stem_x * 0.013).cos() * 0.3;
        pose.x = self.stem_x + a.sin() * self.length + shimmer_x;
        pose.y = self.stem_y + a.cos() * self.length + shimmer_y;
    }

    pub fn rescale(&mut self, sx: f32, sy: f32) {
        self.stem_x *= sx;
        self.stem_y *= sy;
    }
}
