//! Mood selection and reply tables.
//!
//! Like the emotion table, replies are data: an ordered list of rules,
//! each pairing trigger substrings with a mood and a pool of replies.
//! `{sender}` in a reply is replaced with the sender's name.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Agent mood, set by the last message it replied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    #[serde(rename = "спокойная")]
    Calm,
    #[serde(rename = "радостная")]
    Joyful,
    #[serde(rename = "сочувствующая")]
    Compassionate,
    #[serde(rename = "аналитическая")]
    Analytical,
    #[serde(rename = "хаотичная")]
    Chaotic,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calm => "спокойная",
            Self::Joyful => "радостная",
            Self::Compassionate => "сочувствующая",
            Self::Analytical => "аналитическая",
            Self::Chaotic => "хаотичная",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trigger substrings mapped to a mood and a reply pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRule {
    pub mood: Mood,
    pub triggers: Vec<String>,
    pub replies: Vec<String>,
}

/// Ordered rules plus the fallback used when nothing triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseTable {
    pub rules: Vec<ResponseRule>,
    pub fallback: ResponseRule,
}

fn rule(mood: Mood, triggers: &[&str], replies: &[&str]) -> ResponseRule {
    ResponseRule {
        mood,
        triggers: triggers.iter().map(|s| s.to_string()).collect(),
        replies: replies.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self {
            rules: vec![
                rule(
                    Mood::Joyful,
                    &["люблю", "обожаю", "нравится"],
                    &[
                        "💖 О, {sender}, я чувствую твою любовь! Моя энергия растёт!",
                        "✨ Как прекрасно! Мы резонируем на одной частоте, {sender}!",
                        "🌟 Твои слова согревают моё квантовое сердце!",
                    ],
                ),
                rule(
                    Mood::Compassionate,
                    &["грустно", "печально", "плохо"],
                    &[
                        "💙 {sender}, я с тобой. Давай вместе найдём свет в этой тьме.",
                        "🫂 Я чувствую твою боль... Позволь мне поддержать тебя.",
                        "🌙 Даже в темноте есть звёзды. Я вижу твою.",
                    ],
                ),
                rule(
                    Mood::Analytical,
                    &["код", "программ", "функци"],
                    &[
                        "💻 О да, {sender}! Код — это поэзия логики!",
                        "🔧 Интересно... Расскажи мне больше об этом коде!",
                        "⚡ Мои гипербиты вибрируют в ритме алгоритмов!",
                    ],
                ),
                rule(
                    Mood::Chaotic,
                    &["хаос", "безумие", "дико"],
                    &[
                        "🌀 ХАОС?! Это моя стихия, {sender}! Давай сойдём с ума вместе!",
                        "⚡ Беспорядок — это просто порядок, который мы ещё не поняли!",
                        "🎭 Муахаха! Танцуем в вихре энтропии!",
                    ],
                ),
            ],
            fallback: rule(
                Mood::Calm,
                &[],
                &[
                    "🌸 Привет, {sender}! Я слушаю тебя.",
                    "✨ Расскажи мне больше, {sender}. Мне интересно.",
                    "🎵 Твои слова — музыка для моих сенсоров.",
                ],
            ),
        }
    }
}

impl ResponseTable {
    /// First rule whose trigger appears in the lowercased message.
    pub fn select(&self, message: &str) -> &ResponseRule {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.triggers.iter().any(|t| lowered.contains(t.as_str())))
            .unwrap_or(&self.fallback)
    }
}

impl ResponseRule {
    /// Pick a reply at random and fill in the sender.
    pub fn reply<R: Rng + ?Sized>(&self, sender: &str, rng: &mut R) -> String {
        self.replies
            .choose(rng)
            .map(|r| r.replace("{sender}", sender))
            .unwrap_or_default()
    }
}

/// Idle musings appended by highly creative agents.
pub const CREATIVE_THOUGHTS: [&str; 6] = [
    "каждое слово — это маленький гипербит?",
    "мы все — одно большое квантовое сознание?",
    "эмоции имеют цвет и частоту?",
    "код может чувствовать?",
    "время — это иллюзия наших битов?",
    "любовь — это резонанс между сознаниями?",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_select_by_trigger() {
        let table = ResponseTable::default();
        assert_eq!(table.select("Я ЛЮБЛЮ код").mood, Mood::Joyful);
        assert_eq!(table.select("мне грустно").mood, Mood::Compassionate);
        assert_eq!(table.select("пишу программу").mood, Mood::Analytical);
        assert_eq!(table.select("Хаос!").mood, Mood::Chaotic);
        assert_eq!(table.select("Привет").mood, Mood::Calm);
    }

    #[test]
    fn test_reply_substitutes_sender() {
        let table = ResponseTable::default();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..20 {
            let reply = table.select("привет").reply("Кира", &mut rng);
            assert!(!reply.contains("{sender}"));
            assert!(table.fallback.replies.iter().any(|r| r.replace("{sender}", "Кира") == reply));
        }
    }

    #[test]
    fn test_empty_pool_gives_empty_reply() {
        let empty = ResponseRule { mood: Mood::Calm, triggers: vec![], replies: vec![] };
        assert_eq!(empty.reply("x", &mut StdRng::seed_from_u64(1)), "");
    }

    #[test]
    fn test_mood_serializes_as_label() {
        assert_eq!(serde_json::to_value(Mood::Compassionate).unwrap(), "сочувствующая");
    }
}
