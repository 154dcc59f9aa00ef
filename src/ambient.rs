use rand::Rng;
use std::f64::consts::TAU;

/// Largest gap between two host timestamps fed into the clock (ms).
/// Longer pauses (hidden canvas, suspended terminal) resume smoothly.
const MAX_FRAME_GAP_MS: f64 = 100.0;

const GUST_PROBABILITY: f32 = 0.002;
const GUST_DECAY: f32 = 0.96;
const WIND_SMOOTHING: f32 = 0.96;
const WIND_LIMIT: f32 = 1.2;

/// Process-wide scalars shared by every banana, advanced once per frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ambient {
    /// Accumulated animation time in milliseconds
    pub clock_ms: f64,
    /// Animation time in seconds (breeze and orbit clock)
    pub wave_time: f64,
    /// Signed wind, roughly -1..1
    pub wind_strength: f32,
    /// Decaying gust spike
    pub wind_gust: f32,
    last_timestamp: Option<f64>,
}

impl Ambient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance clock and wind from a host timestamp
    pub fn advance<R: Rng + ?Sized>(&mut self, timestamp_ms: f64, breeze_active: bool, rng: &mut R) {
        let dt = match self.last_timestamp {
            Some(last) => (timestamp_ms - last).clamp(0.0, MAX_FRAME_GAP_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.clock_ms += dt;
        self.wave_time = self.clock_ms * 0.001;

        let tt = self.wave_time;
        let base = 0.18 * wrap_phase(tt * 0.18).sin() + 0.07 * wrap_phase(tt * 0.47 + 1.3).sin();
        let slow_noise = 0.03 * wrap_phase(tt * 0.05 + 2.1).sin();

        if breeze_active && rng.gen::<f32>() < GUST_PROBABILITY {
            self.wind_gust = 0.6 + rng.gen::<f32>() * 0.7;
        }
        self.wind_gust *= GUST_DECAY;

        let target_wind = base + slow_noise + self.wind_gust;
        self.wind_strength = self.wind_strength * WIND_SMOOTHING + target_wind * (1.0 - WIND_SMOOTHING);
        self.wind_strength = self.wind_strength.clamp(-WIND_LIMIT, WIND_LIMIT);
    }

    /// Forget the last timestamp so the next frame does not count the gap
    pub fn pause(&mut self) {
        self.last_timestamp = None;
    }
}

/// Read-only snapshot handed to every particle update within one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub clock_ms: f64,
    pub wave_time: f64,
    pub wind_strength: f32,
    pub width: f32,
    pub height: f32,
}

impl FrameContext {
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// `wave_time * rate + offset` as a trig argument
    pub fn wave(&self, rate: f32, offset: f32) -> f32 {
        wrap_phase(self.wave_time * rate as f64 + offset as f64)
    }
}

/// Reduce a long-running phase into [0, 2π) before it loses f32 precision
pub fn wrap_phase(phase: f64) -> f32 {
    phase.rem_euclid(TAU) as f32
}
