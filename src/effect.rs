use serde::{Deserialize, Serialize};

/// Motion effect applied to every banana
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Effect {
    /// Gentle drift around each banana's home point (the "no effect" mode)
    #[default]
    Drift,
    /// Continuous or boosted rotation
    Spin,
    /// Stateless rotational jitter
    Wobble,
    /// Out-of-phase squash and stretch
    Stretch,
    /// Bouncing off the floor like popcorn
    Popcorn,
    /// Hanging from stems, swaying in the wind
    Breeze,
    /// Circling a shared centre
    Orbit,
}

impl Effect {
    /// Cycle order used by the mode controller
    pub const ALL: [Effect; 7] = [
        Effect::Drift,
        Effect::Spin,
        Effect::Wobble,
        Effect::Stretch,
        Effect::Popcorn,
        Effect::Breeze,
        Effect::Orbit,
    ];

    pub fn name(&self) -> &str {
        match self {
            Effect::Drift => "Drift",
            Effect::Spin => "Spin",
            Effect::Wobble => "Wobble",
            Effect::Stretch => "Stretch",
            Effect::Popcorn => "Popcorn",
            Effect::Breeze => "Breeze",
            Effect::Orbit => "Orbit",
        }
    }

    /// Position in the cycle order
    pub fn index(&self) -> usize {
        match self {
            Effect::Drift => 0,
            Effect::Spin => 1,
            Effect::Wobble => 2,
            Effect::Stretch => 3,
            Effect::Popcorn => 4,
            Effect::Breeze => 5,
            Effect::Orbit => 6,
        }
    }

    /// Effect at `index`, wrapping around the cycle
    pub fn from_index(index: usize) -> Effect {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn next(&self) -> Effect {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Effect {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }

    pub fn from_name(s: &str) -> Option<Effect> {
        match s.to_lowercase().as_str() {
            "drift" | "none" => Some(Effect::Drift),
            "spin" => Some(Effect::Spin),
            "wobble" => Some(Effect::Wobble),
            "stretch" => Some(Effect::Stretch),
            "popcorn" => Some(Effect::Popcorn),
            "breeze" => Some(Effect::Breeze),
            "orbit" => Some(Effect::Orbit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Effect::Orbit.next(), Effect::Drift);
        assert_eq!(Effect::Drift.prev(), Effect::Orbit);
        assert_eq!(Effect::from_index(7), Effect::Drift);
        assert_eq!(Effect::from_index(13), Effect::Orbit);
    }

    #[test]
    fn test_index_matches_cycle_order() {
        for (i, effect) in Effect::ALL.iter().enumerate() {
            assert_eq!(effect.index(), i);
            assert_eq!(Effect::from_index(i), *effect);
        }
    }

    #[test]
    fn test_next_prev_inverse() {
        for effect in Effect::ALL {
            assert_eq!(effect.next().prev(), effect);
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Effect::from_name("none"), Some(Effect::Drift));
        assert_eq!(Effect::from_name("POPCORN"), Some(Effect::Popcorn));
        assert_eq!(Effect::from_name("orbit"), Some(Effect::Orbit));
        assert_eq!(Effect::from_name("sideways"), None);
        assert_eq!(Effect::from_name("wind"), None);
        assert_eq!(Effect::from_name("bounce"), None);
    }
}
