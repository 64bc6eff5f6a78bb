//! Personality presets and trait vectors.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::hyperbit::color::clamp_unit;

/// Preset personality archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityType {
    #[default]
    Creative,
    Analytical,
    Empathic,
    Chaotic,
}

impl PersonalityType {
    /// Resolve a preset by name.  Unknown names fall back to `Creative`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "analytical" => Self::Analytical,
            "empathic" => Self::Empathic,
            "chaotic" => Self::Chaotic,
            _ => Self::Creative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creative => "creative",
            Self::Analytical => "analytical",
            Self::Empathic => "empathic",
            Self::Chaotic => "chaotic",
        }
    }

    /// Starting trait vector for this preset.
    pub fn traits(&self) -> Traits {
        let (creativity, empathy, logic, spontaneity, patience) = match self {
            Self::Creative => (0.9, 0.7, 0.5, 0.8, 0.4),
            Self::Analytical => (0.4, 0.5, 0.95, 0.3, 0.8),
            Self::Empathic => (0.6, 0.95, 0.6, 0.5, 0.9),
            Self::Chaotic => (0.85, 0.6, 0.4, 0.95, 0.2),
        };
        Traits {
            creativity,
            empathy,
            logic,
            spontaneity,
            patience,
        }
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five personality traits, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub creativity: f64,
    pub empathy: f64,
    pub logic: f64,
    pub spontaneity: f64,
    pub patience: f64,
}

impl Traits {
    /// `(label, value)` pairs in display order.
    pub fn labeled(&self) -> [(&'static str, f64); 5] {
        [
            ("креативность", self.creativity),
            ("эмпатия", self.empathy),
            ("логика", self.logic),
            ("спонтанность", self.spontaneity),
            ("терпение", self.patience),
        ]
    }

    /// Nudge every trait by `U(-spread, spread)`, clamped to `[0, 1]`.
    pub fn drift<R: Rng + ?Sized>(&mut self, spread: f64, rng: &mut R) {
        for t in [
            &mut self.creativity,
            &mut self.empathy,
            &mut self.logic,
            &mut self.spontaneity,
            &mut self.patience,
        ] {
            *t = clamp_unit(*t + crate::hyperbit::uniform(rng, -spread, spread));
        }
    }
}

impl Default for Traits {
    fn default() -> Self {
        PersonalityType::default().traits()
    }
}
