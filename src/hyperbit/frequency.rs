//! Vibration frequency model.
//!
//! Every emotion has a target frequency.  The next frequency is an
//! exponentially smoothed step from the previous one toward that target,
//! plus a small uniform jitter, clamped into the audible band.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::classifier::Emotion;
use super::uniform;

/// Resting frequency, also used for emotions without a table entry.
pub const BASE_FREQUENCY: f64 = 432.0;
pub const MIN_FREQUENCY: f64 = 100.0;
pub const MAX_FREQUENCY: f64 = 800.0;

/// Target frequency for an emotion, `None` for labels outside the table.
pub fn emotion_target(emotion: Emotion) -> Option<f64> {
    match emotion {
        Emotion::Love => Some(528.0),
        Emotion::Joy => Some(480.0),
        Emotion::Code => Some(396.0),
        Emotion::Anxiety => Some(360.0),
        Emotion::Sadness => Some(300.0),
        Emotion::Chaos => Some(200.0),
        Emotion::Calm => Some(432.0),
        Emotion::Silence => Some(432.0),
        Emotion::Mutation => None,
    }
}

/// Smoothing and jitter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyModel {
    /// Weight kept from the previous frequency.
    pub inertia: f64,
    /// Weight given to the emotion's target.
    pub pull: f64,
    /// Half-width of the uniform jitter.
    pub jitter: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for FrequencyModel {
    fn default() -> Self {
        Self {
            inertia: 0.7,
            pull: 0.3,
            jitter: 20.0,
            min: MIN_FREQUENCY,
            max: MAX_FREQUENCY,
        }
    }
}

impl FrequencyModel {
    pub fn target(&self, emotion: Emotion) -> f64 {
        emotion_target(emotion).unwrap_or(BASE_FREQUENCY)
    }

    /// Blend `previous` toward the emotion's target.
    pub fn next_frequency<R: Rng + ?Sized>(
        &self,
        previous: f64,
        emotion: Emotion,
        rng: &mut R,
    ) -> f64 {
        let blended = previous * self.inertia + self.target(emotion) * self.pull;
        self.clamp(blended + uniform(rng, -self.jitter, self.jitter))
    }

    pub fn clamp(&self, frequency: f64) -> f64 {
        if frequency.is_nan() {
            return BASE_FREQUENCY.clamp(self.min, self.max);
        }
        frequency.clamp(self.min, self.max)
    }
}
