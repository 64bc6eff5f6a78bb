//! The HyperBit state record and its evolution operations.
//!
//! A `HyperBitState` is a continuous-valued automaton: every operation is a
//! transition over `(energy, color, frequency, history)` driven by a mix of
//! deterministic arithmetic and bounded randomness from an injected
//! generator.  Construction never fails; out-of-range inputs are clamped.

use std::path::Path;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use super::classifier::{Emotion, EmotionClassifier};
use super::color::{clamp_unit, wrap_hue, ColorName, Hsv, Rgb};
use super::frequency::{FrequencyModel, BASE_FREQUENCY};
use super::history::{HistoryLog, HYPERBIT_HISTORY_CAPACITY};
use super::report::Report;
use super::uniform;
use crate::utilities::errors::MuzaError;
use crate::utilities::file_handler;

/// Floor applied to energy at construction.
pub const MIN_ENERGY: f64 = 0.01;
/// Energy band enforced by mutation.
pub const MUTATION_ENERGY_MIN: f64 = 0.1;
pub const MAX_ENERGY: f64 = 5.0;
pub const DEFAULT_MUTATION_STRENGTH: f64 = 0.3;
/// Energy bonus applied when two bits merge.
pub const MERGE_ENERGY_BONUS: f64 = 1.1;
/// Snapshot text longer than this many characters is cut and marked.
pub const SNAPSHOT_TEXT_LIMIT: usize = 50;
pub const MUTATION_MARKER: &str = "MUTATION";

// ============================================================================
// Snapshot
// ============================================================================

/// Immutable point-in-time record appended to a bit's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub emotion: Emotion,
    pub intensity: f64,
    pub energy: f64,
    pub frequency: f64,
    pub color: ColorName,
}

/// Keep the first `limit` characters, appending `...` when something was cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Construction parameters
// ============================================================================

/// Optional overrides for a new bit.  Unset fields take the defaults
/// (base 0.5, energy 1.0, soft indigo, 432 Hz, random `HB-NNNN` name).
#[derive(Debug, Clone, Default)]
pub struct HyperBitParams {
    pub name: Option<String>,
    pub base: Option<f64>,
    pub energy: Option<f64>,
    pub color: Option<Hsv>,
    pub frequency: Option<f64>,
}

impl HyperBitParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn base(mut self, base: f64) -> Self {
        self.base = Some(base);
        self
    }

    pub fn energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn color(mut self, color: impl Into<Hsv>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn frequency(mut self, frequency: f64) -> Self {
        self.frequency = Some(frequency);
        self
    }
}

// ============================================================================
// Stats and export
// ============================================================================

/// Summary of a bit's current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperBitStats {
    pub name: String,
    pub age_seconds: f64,
    pub total_analyses: usize,
    pub current_energy: f64,
    pub current_frequency: f64,
    pub current_color: ColorName,
    pub birth_time: DateTime<Utc>,
}

/// One-way dump of stats plus full history.  There is no load path.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryExport<'a> {
    pub hyperbit: HyperBitStats,
    pub history: &'a HistoryLog<Snapshot>,
}

// ============================================================================
// HyperBitState
// ============================================================================

/// A single emotional-state quantum.
///
/// Invariants: `base ∈ [0,1]`, `energy ≥ 0.01`, each HSV channel in `[0,1]`,
/// `frequency ∈ [100,800]`, `history.len() ≤ 100`.
#[derive(Debug, Clone)]
pub struct HyperBitState {
    name: String,
    birth_time: DateTime<Utc>,
    base: f64,
    energy: f64,
    color: Hsv,
    frequency: f64,
    history: HistoryLog<Snapshot>,
    classifier: EmotionClassifier,
    frequency_model: FrequencyModel,
}

impl Default for HyperBitState {
    fn default() -> Self {
        Self::new(HyperBitParams::default())
    }
}

impl HyperBitState {
    /// Build a bit from `params`, clamping anything out of range.
    pub fn new(params: HyperBitParams) -> Self {
        let frequency_model = FrequencyModel::default();
        let name = params
            .name
            .unwrap_or_else(|| format!("HB-{}", rand::thread_rng().gen_range(1000..=9999)));
        let energy = params.energy.unwrap_or(1.0);
        Self {
            name,
            birth_time: Utc::now(),
            base: clamp_unit(params.base.unwrap_or(0.5)),
            energy: if energy.is_nan() { MIN_ENERGY } else { energy.max(MIN_ENERGY) },
            color: params
                .color
                .map(|c| Hsv::new(c.hue, c.saturation, c.value))
                .unwrap_or_default(),
            frequency: frequency_model.clamp(params.frequency.unwrap_or(BASE_FREQUENCY)),
            history: HistoryLog::with_capacity(HYPERBIT_HISTORY_CAPACITY),
            classifier: EmotionClassifier::default(),
            frequency_model,
        }
    }

    /// Default bit with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(HyperBitParams::new().name(name))
    }

    /// Replace the emotion classifier (for example with a YAML-loaded table).
    pub fn with_classifier(mut self, classifier: EmotionClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_frequency_model(mut self, model: FrequencyModel) -> Self {
        self.frequency_model = model;
        self
    }

    // ---- accessors ----

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_time(&self) -> DateTime<Utc> {
        self.birth_time
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn color(&self) -> Hsv {
        self.color
    }

    pub fn rgb(&self) -> Rgb {
        self.color.to_rgb()
    }

    pub fn color_name(&self) -> ColorName {
        self.color.name()
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn history(&self) -> &HistoryLog<Snapshot> {
        &self.history
    }

    pub fn classifier(&self) -> &EmotionClassifier {
        &self.classifier
    }

    /// Seconds since construction.
    pub fn age(&self) -> f64 {
        (Utc::now() - self.birth_time).num_microseconds().unwrap_or(i64::MAX) as f64 / 1e6
    }

    // ---- operations ----

    /// Feel a piece of text.
    ///
    /// Updates frequency and history; base and raw energy are untouched.
    /// `intensity` is `chars/100 ± 0.1` and is deliberately not clamped, so
    /// very short text can yield a negative displayed energy.
    pub fn analyze<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> Report {
        let intensity = text.chars().count() as f64 / 100.0 + uniform(rng, -0.1, 0.1);
        let emotion = self.classifier.classify(text);
        self.frequency = self
            .frequency_model
            .next_frequency(self.frequency, emotion, rng);
        self.record(text, emotion, intensity);

        log::debug!(
            "{} analyzed {} chars: emotion={} frequency={:.1}",
            self.name,
            text.chars().count(),
            emotion,
            self.frequency
        );

        Report {
            name: self.name.clone(),
            text: text.to_string(),
            base: self.base,
            energy: self.energy * intensity,
            emotion,
            intensity,
            rgb: self.rgb(),
            color_name: self.color_name(),
            frequency: self.frequency,
            age_seconds: self.age(),
        }
    }

    /// Randomly drift color and energy.
    ///
    /// Hue moves by up to `strength` and wraps around the wheel; saturation
    /// stays in `[0.2, 1]`, value in `[0.4, 1]`, energy in `[0.1, 5]`.
    /// Strength is taken by magnitude and capped at one full turn; NaN
    /// falls back to the default.
    pub fn mutate<R: Rng + ?Sized>(&mut self, strength: f64, rng: &mut R) {
        let strength = if strength.is_nan() {
            DEFAULT_MUTATION_STRENGTH
        } else {
            strength.abs().min(1.0)
        };
        let Hsv { hue, saturation, value } = self.color;
        self.color = Hsv {
            hue: wrap_hue(hue + uniform(rng, -strength, strength)),
            saturation: (saturation + uniform(rng, -0.15, 0.15)).clamp(0.2, 1.0),
            value: (value + uniform(rng, -0.2, 0.2)).clamp(0.4, 1.0),
        };
        self.energy =
            (self.energy * uniform(rng, 0.85, 1.15)).clamp(MUTATION_ENERGY_MIN, MAX_ENERGY);

        self.record(MUTATION_MARKER, Emotion::Mutation, 1.0);

        log::debug!(
            "[mutation {}] color: {}, energy: {:.2}",
            self.name,
            self.color_name(),
            self.energy
        );
    }

    /// Similarity score in `[0, 1]`.
    ///
    /// The hue term uses plain `|h1 - h2|`, not distance around the wheel:
    /// hues 0.02 and 0.98 count as nearly opposite even though they are
    /// visually adjacent.
    pub fn resonate(&self, other: &HyperBitState) -> f64 {
        let freq_resonance = 1.0 - ((self.frequency - other.frequency).abs() / 500.0).min(1.0);
        let color_resonance = 1.0 - ((self.color.hue - other.color.hue).abs() * 2.0).min(1.0);
        let energy_ratio = self.energy.min(other.energy) / self.energy.max(other.energy);
        freq_resonance * 0.4 + color_resonance * 0.4 + energy_ratio * 0.2
    }

    /// Average two bits into a brand-new one with a 10% energy bonus.
    ///
    /// Neither operand changes and the child starts with empty history.
    /// The bonus is not capped here.
    pub fn merge(&self, other: &HyperBitState) -> HyperBitState {
        let merged = HyperBitState::new(
            HyperBitParams::new()
                .name(format!("{}×{}", self.name, other.name))
                .base((self.base + other.base) / 2.0)
                .energy((self.energy + other.energy) / 2.0 * MERGE_ENERGY_BONUS)
                .color(Hsv {
                    hue: (self.color.hue + other.color.hue) / 2.0,
                    saturation: (self.color.saturation + other.color.saturation) / 2.0,
                    value: (self.color.value + other.color.value) / 2.0,
                })
                .frequency((self.frequency + other.frequency) / 2.0),
        )
        .with_classifier(self.classifier.clone())
        .with_frequency_model(self.frequency_model);

        log::info!(
            "merge: {} + {} -> {} (resonance {:.0}%)",
            self.name,
            other.name,
            merged.name,
            self.resonate(other) * 100.0
        );
        merged
    }

    /// Take on the color fingerprint of `text`.
    ///
    /// The color becomes the HSV form of the first three SHA-256 digest
    /// bytes; energy and frequency receive a length-based boost.
    pub fn imprint(&mut self, text: &str) {
        let boost = (text.chars().count() as f64 / 50.0 + 0.5).min(1.0);
        self.color = Hsv::from_text_digest(text);
        self.energy = (self.energy + boost).min(MAX_ENERGY);
        self.frequency = self.frequency_model.clamp(self.frequency + boost * 10.0);
    }

    /// Scale energy by `factor`, capped at the mutation ceiling.
    pub fn restore_energy(&mut self, factor: f64) {
        self.energy = (self.energy * factor).min(MAX_ENERGY).max(MIN_ENERGY);
    }

    pub fn stats(&self) -> HyperBitStats {
        HyperBitStats {
            name: self.name.clone(),
            age_seconds: self.age(),
            total_analyses: self.history.len(),
            current_energy: self.energy,
            current_frequency: self.frequency,
            current_color: self.color_name(),
            birth_time: self.birth_time,
        }
    }

    pub fn export(&self) -> HistoryExport<'_> {
        HistoryExport {
            hyperbit: self.stats(),
            history: &self.history,
        }
    }

    /// Write [`export`](Self::export) as pretty JSON to `path`.
    pub fn export_history(&self, path: impl AsRef<Path>) -> Result<(), MuzaError> {
        let path = path.as_ref();
        file_handler::write_json(path, &self.export())?;
        log::info!("history of {} exported to {}", self.name, path.display());
        Ok(())
    }

    fn record(&mut self, text: &str, emotion: Emotion, intensity: f64) {
        self.history.push(Snapshot {
            timestamp: Utc::now(),
            text: truncate_chars(text, SNAPSHOT_TEXT_LIMIT),
            emotion,
            intensity,
            energy: self.energy,
            frequency: self.frequency,
            color: self.color_name(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperbit::frequency::{MAX_FREQUENCY, MIN_FREQUENCY};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2027)
    }

    fn assert_invariants(bit: &HyperBitState) {
        assert!((0.0..=1.0).contains(&bit.base()));
        assert!(bit.energy() >= MIN_ENERGY);
        let c = bit.color();
        for channel in [c.hue, c.saturation, c.value] {
            assert!((0.0..=1.0).contains(&channel));
        }
        assert!((MIN_FREQUENCY..=MAX_FREQUENCY).contains(&bit.frequency()));
        assert!(bit.history().len() <= HYPERBIT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_defaults() {
        let bit = HyperBitState::default();
        assert_eq!(bit.base(), 0.5);
        assert_eq!(bit.energy(), 1.0);
        assert_eq!(bit.color(), Hsv::new(0.5, 0.8, 0.9));
        assert_eq!(bit.frequency(), 432.0);
        assert!(bit.history().is_empty());
        assert!(bit.name().starts_with("HB-"));
        let n: u32 = bit.name()[3..].parse().unwrap();
        assert!((1000..=9999).contains(&n));
    }

    #[test]
    fn test_construction_clamps() {
        let bit = HyperBitState::new(
            HyperBitParams::new()
                .name("edge")
                .base(1.7)
                .energy(-3.0)
                .color((1.5, -0.2, 0.5))
                .frequency(5000.0),
        );
        assert_eq!(bit.base(), 1.0);
        assert_eq!(bit.energy(), MIN_ENERGY);
        assert_eq!(bit.color(), Hsv::new(1.0, 0.0, 0.5));
        assert_eq!(bit.frequency(), MAX_FREQUENCY);
        assert_invariants(&bit);

        let low = HyperBitState::new(HyperBitParams::new().base(-0.2).energy(0.0).frequency(1.0));
        assert_eq!(low.base(), 0.0);
        assert_eq!(low.energy(), MIN_ENERGY);
        assert_eq!(low.frequency(), MIN_FREQUENCY);
    }

    #[test]
    fn test_analyze_hello_world() {
        let mut bit = HyperBitState::new(
            HyperBitParams::new()
                .name("Кира")
                .base(0.5)
                .energy(1.0)
                .color((0.5, 0.8, 0.9))
                .frequency(432.0),
        );
        let report = bit.analyze("hello world", &mut rng());
        assert_eq!(report.emotion, Emotion::Silence);
        assert!((MIN_FREQUENCY..=MAX_FREQUENCY).contains(&report.frequency));
        // 432 blended toward 432 moves only by jitter
        assert!((report.frequency - 432.0).abs() <= 20.0 + 1e-9);
        assert_eq!(bit.history().len(), 1);
        assert!(report
            .to_string()
            .contains(&format!("FREQUENCY: {:.1} Гц", report.frequency)));
        assert_eq!(report.frequency_rounded(), (report.frequency * 10.0).round() / 10.0);
        assert_eq!(report.rgb, Rgb { r: 45, g: 229, b: 229 });
        assert_eq!(report.color_name, ColorName::Turquoise);
    }

    #[test]
    fn test_analyze_leaves_base_and_energy() {
        let mut bit = HyperBitState::named("b");
        let mut rng = rng();
        for text in ["", "любовь", "очень длинный текст про хаос и безумие"] {
            let report = bit.analyze(text, &mut rng);
            assert_eq!(bit.base(), 0.5);
            assert_eq!(bit.energy(), 1.0);
            assert_eq!(report.energy, 1.0 * report.intensity);
            assert_invariants(&bit);
        }
    }

    #[test]
    fn test_analyze_empty_text() {
        let mut bit = HyperBitState::named("empty");
        let report = bit.analyze("", &mut rng());
        assert_eq!(report.emotion, Emotion::Silence);
        assert!(report.intensity.abs() <= 0.1);
        assert_eq!(bit.history().latest().unwrap().text, "");
    }

    #[test]
    fn test_intensity_tracks_length() {
        let mut bit = HyperBitState::named("len");
        let text = "x".repeat(250);
        let report = bit.analyze(&text, &mut rng());
        assert!((report.intensity - 2.5).abs() <= 0.1);
        let snap = bit.history().latest().unwrap();
        assert_eq!(snap.text.chars().count(), SNAPSHOT_TEXT_LIMIT + 3);
        assert!(snap.text.ends_with("..."));
    }

    #[test]
    fn test_history_fifo_after_101_analyses() {
        let mut bit = HyperBitState::named("fifo");
        let mut rng = rng();
        for i in 1..=101 {
            bit.analyze(&format!("call {}", i), &mut rng);
            assert_eq!(bit.history().len(), i.min(100));
        }
        assert_eq!(bit.history().oldest().unwrap().text, "call 2");
        assert_eq!(bit.history().latest().unwrap().text, "call 101");
        assert!(!bit.history().iter().any(|s| s.text == "call 1"));
    }

    #[test]
    fn test_mutate_bounds_over_1000_steps() {
        let mut bit = HyperBitState::new(HyperBitParams::new().energy(4.9).color((0.98, 0.9, 0.95)));
        let mut rng = rng();
        for _ in 0..1000 {
            bit.mutate(DEFAULT_MUTATION_STRENGTH, &mut rng);
            let c = bit.color();
            assert!((0.0..1.0).contains(&c.hue), "hue {}", c.hue);
            assert!((0.2..=1.0).contains(&c.saturation));
            assert!((0.4..=1.0).contains(&c.value));
            assert!((MUTATION_ENERGY_MIN..=MAX_ENERGY).contains(&bit.energy()));
        }
        assert_eq!(bit.history().len(), HYPERBIT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_mutate_records_marker() {
        let mut bit = HyperBitState::named("m");
        bit.mutate(0.42, &mut rng());
        let snap = bit.history().latest().unwrap();
        assert_eq!(snap.text, MUTATION_MARKER);
        assert_eq!(snap.emotion, Emotion::Mutation);
        assert_eq!(snap.intensity, 1.0);
        assert_eq!(snap.energy, bit.energy());
    }

    #[test]
    fn test_mutate_zero_strength_keeps_hue() {
        let mut bit = HyperBitState::named("still");
        bit.mutate(0.0, &mut rng());
        assert_eq!(bit.color().hue, 0.5);
    }

    #[test]
    fn test_mutate_extreme_strengths_stay_in_bounds() {
        let mut bit = HyperBitState::named("wild");
        let mut rng = rng();
        for strength in [1e308, f64::MAX, f64::INFINITY, -f64::MAX, f64::NAN] {
            bit.mutate(strength, &mut rng);
            assert_invariants(&bit);
        }
        assert_eq!(bit.history().len(), 5);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = HyperBitState::named("a");
        let mut b = HyperBitState::named("a");
        let (mut ra, mut rb) = (rng(), rng());
        for text in ["тревога", "мир", "git push"] {
            assert_eq!(a.analyze(text, &mut ra).frequency, b.analyze(text, &mut rb).frequency);
            a.mutate(0.3, &mut ra);
            b.mutate(0.3, &mut rb);
            assert_eq!(a.color(), b.color());
            assert_eq!(a.energy(), b.energy());
        }
    }

    #[test]
    fn test_resonate_formula() {
        let a = HyperBitState::new(
            HyperBitParams::new().name("a").energy(2.7).color((0.75, 0.9, 0.95)).frequency(500.0),
        );
        let b = HyperBitState::new(
            HyperBitParams::new().name("b").energy(1.5).color((0.3, 0.7, 0.8)).frequency(300.0),
        );
        let expected = 0.4 * (1.0 - (200.0f64 / 500.0).min(1.0))
            + 0.4 * (1.0 - ((0.75f64 - 0.3).abs() * 2.0).min(1.0))
            + 0.2 * (1.5 / 2.7);
        assert!((a.resonate(&b) - expected).abs() < 1e-12);
        assert!((b.resonate(&a) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_resonate_identical_defaults_is_one() {
        let a = HyperBitState::default();
        let b = HyperBitState::default();
        assert!((a.resonate(&b) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_resonate_hue_is_not_circular() {
        let a = HyperBitState::new(HyperBitParams::new().color((0.02, 0.8, 0.9)));
        let b = HyperBitState::new(HyperBitParams::new().color((0.98, 0.8, 0.9)));
        // colour term bottoms out: only frequency and energy contribute
        assert!((a.resonate(&b) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_merge_is_pure_average_with_bonus() {
        let mut rng = rng();
        let mut a = HyperBitState::new(
            HyperBitParams::new().name("Кира").base(0.0001).energy(2.7).color((0.75, 0.9, 0.95)),
        );
        let b = HyperBitState::new(
            HyperBitParams::new().name("Муза").base(0.8).energy(1.5).color((0.3, 0.7, 0.8)),
        );
        a.analyze("любовь", &mut rng);
        let before = (a.base(), a.energy(), a.color(), a.frequency(), a.history().len());

        let m = a.merge(&b);
        assert_eq!(m.name(), "Кира×Муза");
        assert_eq!(m.base(), (0.0001 + 0.8) / 2.0);
        assert_eq!(m.energy(), ((2.7 + 1.5) / 2.0) * 1.1);
        assert_eq!(m.frequency(), (a.frequency() + b.frequency()) / 2.0);
        assert!((m.color().hue - 0.525).abs() < 1e-12);
        assert!((m.color().saturation - 0.8).abs() < 1e-12);
        assert!(m.history().is_empty());

        assert_eq!(
            before,
            (a.base(), a.energy(), a.color(), a.frequency(), a.history().len())
        );
        assert_eq!(b.energy(), 1.5);
    }

    #[test]
    fn test_merge_energy_is_uncapped() {
        let a = HyperBitState::new(HyperBitParams::new().energy(5.0));
        let b = HyperBitState::new(HyperBitParams::new().energy(5.0));
        assert_eq!(a.merge(&b).energy(), 5.0 * 1.1);
    }

    #[test]
    fn test_imprint_is_deterministic() {
        let mut a = HyperBitState::named("a");
        let mut b = HyperBitState::named("b");
        a.imprint("привет");
        b.imprint("привет");
        assert_eq!(a.color(), b.color());
        // 6 chars: 6/50 + 0.5 = 0.62
        assert!((a.energy() - 1.62).abs() < 1e-12);
        assert!((a.frequency() - 438.2).abs() < 1e-9);
        assert!(a.history().is_empty());
    }

    #[test]
    fn test_imprint_respects_ceilings() {
        let mut bit = HyperBitState::new(HyperBitParams::new().energy(4.8).frequency(795.0));
        bit.imprint(&"long text ".repeat(20));
        assert_eq!(bit.energy(), MAX_ENERGY);
        assert_eq!(bit.frequency(), MAX_FREQUENCY);
    }

    #[test]
    fn test_restore_energy_caps() {
        let mut bit = HyperBitState::new(HyperBitParams::new().energy(4.5));
        bit.restore_energy(1.2);
        assert_eq!(bit.energy(), MAX_ENERGY);
        let mut small = HyperBitState::new(HyperBitParams::new().energy(2.0));
        small.restore_energy(1.2);
        assert!((small.energy() - 2.4).abs() < 1e-12);
    }

    #[test]
    fn test_stats_and_export() {
        let mut bit = HyperBitState::named("Искра");
        let mut rng = rng();
        bit.analyze("Мир полон любви и кода", &mut rng);
        bit.mutate(0.3, &mut rng);

        let stats = bit.stats();
        assert_eq!(stats.name, "Искра");
        assert_eq!(stats.total_analyses, 2);
        assert_eq!(stats.current_energy, bit.energy());

        let json = serde_json::to_value(bit.export()).unwrap();
        assert_eq!(json["hyperbit"]["name"], "Искра");
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        // "кода" hits the code row before "мир" reaches the calm row
        assert_eq!(history[0]["emotion"], "код");
        assert_eq!(history[1]["text"], "MUTATION");
        assert_eq!(history[1]["emotion"], "мутация");
        for key in ["timestamp", "intensity", "energy", "frequency", "color"] {
            assert!(history[0].get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_export_history_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");
        let mut bit = HyperBitState::named("file");
        bit.analyze("тишина", &mut rng());
        bit.export_history(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("тишина"));
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["hyperbit"]["total_analyses"], 1);
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        let text = "я".repeat(60);
        let cut = truncate_chars(&text, 50);
        assert_eq!(cut.chars().count(), 53);
        assert_eq!(truncate_chars("short", 50), "short");
        assert_eq!(truncate_chars(&"я".repeat(50), 50), "я".repeat(50));
    }
}
