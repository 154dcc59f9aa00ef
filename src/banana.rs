use crate::ambient::{wrap_phase, FrameContext};
use crate::breeze::BreezeState;
use crate::effect::Effect;
use crate::orbit::OrbitState;
use crate::popcorn::PopcornState;
use crate::sprite::Sprite;
use crate::surface::Surface;
use rand::Rng;
use std::f32::consts::TAU;

const CONSTANT_SPIN_CHANCE: f32 = 0.2;
const HERO_CHANCE: f32 = 0.08;
const BOOST_PROBABILITY: f32 = 0.005;
const BOOST_DECAY: f32 = 0.96;
const WOBBLE_NOISE: f32 = 10.0;
const STRETCH_AMPLITUDE: f32 = 0.8;

/// Visible placement of a banana: centre, rotation in degrees, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Pose {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinStyle {
    /// Fixed degrees per frame
    Constant,
    /// Pulsing rate with occasional decaying boosts
    Dynamic,
}

/// Personality rolled once at spawn and kept across effect changes
#[derive(Debug, Clone, PartialEq)]
pub struct Traits {
    /// Home point for drift and the simple effects
    pub base_x: f32,
    pub base_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub drift_x: f32,
    pub drift_y: f32,
    pub rotation_speed: f32,
    pub rotation_amplitude: f32,
    pub phase: f32,
    pub spin_style: SpinStyle,
    /// Degrees per frame for constant spinners
    pub spin_rate: f32,
    pub hero_jump: bool,
    /// Preferred lean in the breeze (degrees)
    pub rest_bias: f32,
}

/// Effect-specific state; a new variant is built on every effect change
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    Drift,
    Spin { boost: f32 },
    Wobble,
    Stretch,
    Popcorn(PopcornState),
    Breeze(BreezeState),
    Orbit(OrbitState),
}

impl Motion {
    pub fn effect(&self) -> Effect {
        match self {
            Motion::Drift => Effect::Drift,
            Motion::Spin { .. } => Effect::Spin,
            Motion::Wobble => Effect::Wobble,
            Motion::Stretch => Effect::Stretch,
            Motion::Popcorn(_) => Effect::Popcorn,
            Motion::Breeze(_) => Effect::Breeze,
            Motion::Orbit(_) => Effect::Orbit,
        }
    }
}

/// One animated sprite
#[derive(Debug, Clone, PartialEq)]
pub struct Banana {
    pub id: usize,
    /// Drawn width and height in world pixels
    pub size: f32,
    pub pose: Pose,
    pub traits: Traits,
    pub motion: Motion,
}

impl Banana {
    /// Roll a new banana somewhere on a `width` x `height` canvas
    pub fn spawn<R: Rng + ?Sized>(id: usize, width: f32, height: f32, rng: &mut R) -> Self {
        let base_x = rng.gen::<f32>() * width;
        let base_y = rng.gen::<f32>() * height;
        let size = rng.gen::<f32>() * 150.0 + 60.0;

        let traits = Traits {
            base_x,
            base_y,
            offset_x: rng.gen::<f32>() * TAU,
            offset_y: rng.gen::<f32>() * TAU,
            drift_x: rng.gen::<f32>() * 40.0 + 10.0,
            drift_y: rng.gen::<f32>() * 40.0 + 10.0,
            rotation_speed: rng.gen::<f32>() * 0.03 + 0.005,
            rotation_amplitude: rng.gen::<f32>() * 45.0 + 5.0,
            phase: rng.gen::<f32>() * TAU,
            spin_style: if rng.gen::<f32>() < CONSTANT_SPIN_CHANCE {
                SpinStyle::Constant
            } else {
                SpinStyle::Dynamic
            },
            spin_rate: rng.gen::<f32>() * 10.0 + 5.0,
            hero_jump: rng.gen::<f32>() < HERO_CHANCE,
            rest_bias: (rng.gen::<f32>() - 0.5) * 6.0,
        };

        let mut pose = Pose::at(base_x, base_y);
        pose.angle = rng.gen::<f32>() * 360.0;

        Self {
            id,
            size,
            pose,
            traits,
            motion: Motion::Drift,
        }
    }

    pub fn effect(&self) -> Effect {
        self.motion.effect()
    }

    /// Replace the motion state with a fresh one for `effect`
    pub fn enter<R: Rng + ?Sized>(&mut self, effect: Effect, ctx: &FrameContext, rng: &mut R) {
        self.motion = match effect {
            Effect::Popcorn => Motion::Popcorn(PopcornState::enter(
                &mut self.pose,
                self.size,
                self.traits.hero_jump,
                ctx,
                rng,
            )),
            Effect::Breeze => Motion::Breeze(BreezeState::enter(
                &mut self.pose,
                self.size,
                self.traits.rest_bias,
                ctx,
                rng,
            )),
            Effect::Orbit => Motion::Orbit(OrbitState::enter(&mut self.pose, ctx, rng)),
            simple => {
                self.pose = Pose::at(self.traits.base_x, self.traits.base_y);
                self.pose.angle = rng.gen::<f32>() * 360.0;
                match simple {
                    Effect::Spin => Motion::Spin { boost: 0.0 },
                    Effect::Wobble => Motion::Wobble,
                    Effect::Stretch => Motion::Stretch,
                    _ => Motion::Drift,
                }
            }
        };
    }

    /// Advance one frame under the current motion
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &FrameContext, rng: &mut R) {
        let traits = &self.traits;
        let pose = &mut self.pose;
        let clock = ctx.clock_ms;
        let phase = traits.phase as f64;

        match &mut self.motion {
            Motion::Drift => {
                let time = clock * 0.003 + phase;
                let slow = wrap_phase(time / 3.0);
                pose.x = traits.base_x + wrap_phase(time + traits.offset_x as f64).sin() * traits.drift_x + slow.cos() * 5.0;
                pose.y = traits.base_y + wrap_phase(time + traits.offset_y as f64).sin() * traits.drift_y + slow.sin() * 5.0;
                pose.angle = wrap_phase(time * traits.rotation_speed as f64).sin() * (traits.rotation_amplitude * 0.2);
            }
            Motion::Spin { boost } => {
                match traits.spin_style {
                    SpinStyle::Constant => pose.angle += traits.spin_rate,
                    SpinStyle::Dynamic => {
                        if rng.gen::<f32>() < BOOST_PROBABILITY && *boost < 1000.0 {
                            *boost = 1000.0 + rng.gen::<f32>() * 1000.0;
                        }
                        *boost *= BOOST_DECAY;
                        let base_spin = 360.0 * (1.0 + 0.5 * wrap_phase(clock / 300.0 + phase).sin());
                        pose.angle += traits.rotation_speed * (base_spin + *boost);
                    }
                }
                pose.angle = pose.angle.rem_euclid(360.0);
            }
            Motion::Wobble => {
                let t = wrap_phase(clock / 300.0 * traits.rotation_speed as f64 * 10.0 + phase);
                let noise = (rng.gen::<f32>() - 0.5) * WOBBLE_NOISE;
                pose.angle = t.sin() * (traits.rotation_amplitude * 0.5) + noise;
            }
            Motion::Stretch => {
                let t = wrap_phase(clock / 600.0 + phase);
                pose.scale_x = 1.0 + STRETCH_AMPLITUDE * t.sin();
                pose.scale_y = 1.0 + STRETCH_AMPLITUDE * t.cos();
            }
            Motion::Popcorn(state) => state.step(pose, self.size, traits.hero_jump, ctx, rng),
            Motion::Breeze(state) => state.step(pose, ctx, rng),
            Motion::Orbit(state) => state.step(pose, ctx),
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, sprite: &Sprite) {
        let size = self.size;
        surface.save();

        if let Motion::Breeze(state) = &self.motion {
            // Pivot at the stem, hanging from the top centre of the sprite
            surface.translate(state.stem_x, state.stem_y);
            surface.rotate(self.pose.angle.to_radians());
            surface.draw_image(sprite, -size / 2.0, 0.0, size, size);
            surface.restore();
            return;
        }

        surface.translate(self.pose.x, self.pose.y);
        surface.rotate(self.pose.angle.to_radians());
        let (sx, sy) = match &self.motion {
            Motion::Stretch => (self.pose.scale_x, self.pose.scale_y),
            Motion::Popcorn(state) => state.squash(),
            _ => (1.0, 1.0),
        };
        surface.scale(sx, sy);
        surface.draw_image(sprite, -size / 2.0, -size / 2.0, size, size);
        surface.restore();
    }

    /// Follow a canvas resize from `from` to `to` (width, height) by stretching every anchor point
    pub fn rescale(&mut self, from: (f32, f32), to: (f32, f32)) {
        let sx = to.0 / from.0;
        let sy = to.1 / from.1;
        self.traits.base_x *= sx;
        self.traits.base_y *= sy;
        self.pose.x *= sx;
        self.pose.y *= sy;
        match &mut self.motion {
            Motion::Breeze(state) => state.rescale(sx, sy),
            Motion::Orbit(state) => state.rescale(to.0.min(to.1)),
            _ => {}
        }
    }

    /// Draw-order key; only orbiting bananas have depth
    pub fn depth(&self) -> f32 {
        match &self.motion {
            Motion::Orbit(state) => state.depth,
            _ => 0.0,
        }
    }
}
