//! Keyword-table emotion classification.
//!
//! Classification is a plain ordered substring scan over the lowercased
//! text.  The table is data: callers can pass their own [`EmotionTable`]
//! (built in code or loaded from YAML) and the first matching row wins.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::utilities::errors::MuzaError;

/// Word count above which unmatched text is read as chaos rather than silence.
pub const CHAOS_WORD_THRESHOLD: usize = 20;

/// Discrete emotion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    #[serde(rename = "любовь")]
    Love,
    #[serde(rename = "радость")]
    Joy,
    #[serde(rename = "код")]
    Code,
    #[serde(rename = "тревога")]
    Anxiety,
    #[serde(rename = "грусть")]
    Sadness,
    #[serde(rename = "хаос")]
    Chaos,
    #[serde(rename = "спокойствие")]
    Calm,
    #[serde(rename = "тишина")]
    Silence,
    /// Marker label for mutation snapshots; never produced by classification.
    #[serde(rename = "мутация")]
    Mutation,
}

impl Emotion {
    pub const ALL: [Emotion; 9] = [
        Emotion::Love,
        Emotion::Joy,
        Emotion::Code,
        Emotion::Anxiety,
        Emotion::Sadness,
        Emotion::Chaos,
        Emotion::Calm,
        Emotion::Silence,
        Emotion::Mutation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Love => "любовь",
            Self::Joy => "радость",
            Self::Code => "код",
            Self::Anxiety => "тревога",
            Self::Sadness => "грусть",
            Self::Chaos => "хаос",
            Self::Calm => "спокойствие",
            Self::Silence => "тишина",
            Self::Mutation => "мутация",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = MuzaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| MuzaError::UnknownEmotion(s.to_string()))
    }
}

// ============================================================================
// Emotion table
// ============================================================================

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionRule {
    pub emotion: Emotion,
    pub keywords: Vec<String>,
}

/// Ordered `(emotion, keywords)` rows.  Earlier rows take priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionTable {
    rules: Vec<EmotionRule>,
}

impl EmotionTable {
    pub fn new(rules: Vec<EmotionRule>) -> Self {
        // Keywords are matched against lowercased text.
        let rules = rules
            .into_iter()
            .map(|r| EmotionRule {
                emotion: r.emotion,
                keywords: r.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Parse a table from YAML:
    ///
    /// ```yaml
    /// - emotion: любовь
    ///   keywords: [любов, сердц]
    /// - emotion: код
    ///   keywords: [rust, cargo]
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, MuzaError> {
        let rules: Vec<EmotionRule> = serde_yaml::from_str(yaml)?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[EmotionRule] {
        &self.rules
    }
}

/// Built-in table, shared by every default classifier.
static DEFAULT_TABLE: Lazy<EmotionTable> = Lazy::new(|| {
    let row = |emotion, keywords: &[&str]| EmotionRule {
        emotion,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    };
    EmotionTable::new(vec![
        row(Emotion::Love, &["любов", "обожа", "страст", "сердц"]),
        row(Emotion::Joy, &["радост", "счаст", "весел", "класс", "супер"]),
        row(Emotion::Code, &["код", "git", "python", "функци", "класс"]),
        row(Emotion::Anxiety, &["тревог", "страх", "бои", "волнуюсь"]),
        row(Emotion::Sadness, &["грус", "печал", "слез", "тоск"]),
        row(Emotion::Chaos, &["хаос", "беспор", "безум", "дик"]),
        row(Emotion::Calm, &["спокой", "тиш", "мир", "гармон"]),
    ])
});

impl Default for EmotionTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Maps free text to one [`Emotion`].
#[derive(Debug, Clone, Default)]
pub struct EmotionClassifier {
    table: EmotionTable,
}

impl EmotionClassifier {
    pub fn new(table: EmotionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &EmotionTable {
        &self.table
    }

    /// Classify `text`.  Never fails; empty text is silence.
    pub fn classify(&self, text: &str) -> Emotion {
        let lowered = text.to_lowercase();
        self.table
            .rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|rule| rule.emotion)
            .unwrap_or_else(|| {
                if text.split_whitespace().count() > CHAOS_WORD_THRESHOLD {
                    Emotion::Chaos
                } else {
                    Emotion::Silence
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Emotion {
        EmotionClassifier::default().classify(text)
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert_eq!(classify("ЛЮБОВЬ побеждает"), Emotion::Love);
        assert_eq!(classify("Пишу на Python"), Emotion::Code);
    }

    #[test]
    fn test_earlier_row_wins_on_ambiguous_text() {
        // "класс" is a keyword of both joy and code; joy is listed first
        assert_eq!(classify("это класс"), Emotion::Joy);
        assert_eq!(classify("любовь и код"), Emotion::Love);
        // "любви" does not contain the stem "любов"
        assert_eq!(classify("Кира хочет любви и кода одновременно"), Emotion::Code);
    }

    #[test]
    fn test_fallback_by_word_count() {
        assert_eq!(classify(""), Emotion::Silence);
        assert_eq!(classify("hello world"), Emotion::Silence);
        let twenty = vec!["word"; 20].join(" ");
        assert_eq!(classify(&twenty), Emotion::Silence);
        let twenty_one = vec!["word"; 21].join(" ");
        assert_eq!(classify(&twenty_one), Emotion::Chaos);
    }

    #[test]
    fn test_custom_table_from_yaml() {
        let yaml = r#"
- emotion: код
  keywords: [Rust, cargo]
- emotion: радость
  keywords: [yay]
"#;
        let classifier = EmotionClassifier::new(EmotionTable::from_yaml(yaml).unwrap());
        assert_eq!(classifier.classify("I love rust"), Emotion::Code);
        assert_eq!(classifier.classify("yay"), Emotion::Joy);
        assert_eq!(classifier.classify("любовь"), Emotion::Silence);
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        assert!(EmotionTable::from_yaml("- emotion: скука\n  keywords: []").is_err());
    }

    #[test]
    fn test_emotion_from_str() {
        assert_eq!("тишина".parse::<Emotion>().unwrap(), Emotion::Silence);
        assert!("joy".parse::<Emotion>().is_err());
    }
}
