//! Result of [`HyperBitState::analyze`](super::HyperBitState::analyze).

use std::fmt;

use serde::Serialize;

use super::classifier::Emotion;
use super::color::{ColorName, Rgb};

/// Structured analysis bundle.  The numeric fields are the contract; the
/// `Display` rendering is one possible presentation of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub name: String,
    pub text: String,
    pub base: f64,
    /// Raw energy scaled by the analysis intensity.
    pub energy: f64,
    pub emotion: Emotion,
    pub intensity: f64,
    pub rgb: Rgb,
    pub color_name: ColorName,
    pub frequency: f64,
    pub age_seconds: f64,
}

impl Report {
    /// Frequency rounded to one decimal place.
    pub fn frequency_rounded(&self) -> f64 {
        (self.frequency * 10.0).round() / 10.0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🌀 Гипербит [{}] почувствовал:", self.name)?;
        writeln!(f, "   '{}'", self.text)?;
        writeln!(f)?;
        writeln!(f, "→ BASE: {:.3}", self.base)?;
        writeln!(f, "→ ENERGY: {:.2} ({})", self.energy, self.emotion)?;
        writeln!(f, "→ COLOR: {} ({})", self.rgb, self.color_name)?;
        writeln!(f, "→ FREQUENCY: {:.1} Гц", self.frequency)?;
        writeln!(f, "→ Возраст: {:.2}с", self.age_seconds)?;
        writeln!(f)?;
        write!(f, "✨ Состояние: вибрирую на частоте квантового сознания")
    }
}
