//! `MuzaAgent`: a personality wrapped around a HyperBit core.
//!
//! Every message the agent perceives is first felt by its core bit, then
//! remembered, then answered from the reply table with personality flavor
//! layered on top.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::personality::{PersonalityType, Traits};
use super::responses::{Mood, ResponseTable, CREATIVE_THOUGHTS};
use crate::hyperbit::{
    EmotionClassifier, HistoryLog, HyperBitParams, HyperBitState, HyperBitStats, Hsv, AGENT_MEMORY_CAPACITY,
    DEFAULT_MUTATION_STRENGTH,
};

/// Remembered messages are cut to this many characters.
pub const MEMORY_MESSAGE_LIMIT: usize = 100;
/// Closeness assigned the first time a sender is seen.
pub const INITIAL_CLOSENESS: f64 = 0.1;
pub const CLOSENESS_STEP: f64 = 0.05;
/// Energy multiplier applied by meditation.
pub const MEDITATION_BOOST: f64 = 1.2;
/// Spread of trait drift during a personality mutation.
pub const TRAIT_DRIFT: f64 = 0.15;

/// Probability that a strong trait adds its flourish to a reply.
const FLOURISH_CHANCE: f64 = 0.3;
const STRONG_TRAIT: f64 = 0.7;

/// One remembered interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryEntry {
    pub timestamp: DateTime<Utc>,
    pub sender: String,
    pub message: String,
    pub mood: Mood,
    pub energy: f64,
}

/// Serializable view of an agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentProfile {
    pub name: String,
    pub personality_type: PersonalityType,
    pub traits: Traits,
    pub mood: Mood,
    pub age_minutes: f64,
    pub total_memories: usize,
    pub relationships: BTreeMap<String, f64>,
    pub core_bit_stats: HyperBitStats,
}

/// A conversational agent with mood, memory and relationships.
#[derive(Debug, Clone)]
pub struct MuzaAgent {
    name: String,
    personality: PersonalityType,
    traits: Traits,
    core_bit: HyperBitState,
    mood: Mood,
    memory: HistoryLog<MemoryEntry>,
    relationships: BTreeMap<String, f64>,
    birth_time: DateTime<Utc>,
    responses: ResponseTable,
}

impl MuzaAgent {
    pub fn new(name: impl Into<String>, personality: PersonalityType) -> Self {
        let name = name.into();
        let core_bit = HyperBitState::new(
            HyperBitParams::new()
                .name(format!("{}-Core", name))
                .base(0.5)
                .energy(2.0)
                .color(Hsv::new(0.65, 0.85, 0.92)),
        );
        let traits = personality.traits();
        log::info!("✨ {} родилась! personality={} traits={:?}", name, personality, traits);
        Self {
            name,
            personality,
            traits,
            core_bit,
            mood: Mood::default(),
            memory: HistoryLog::with_capacity(AGENT_MEMORY_CAPACITY),
            relationships: BTreeMap::new(),
            birth_time: Utc::now(),
            responses: ResponseTable::default(),
        }
    }

    /// Replace the reply table.
    pub fn with_responses(mut self, responses: ResponseTable) -> Self {
        self.responses = responses;
        self
    }

    /// Classify through `classifier` instead of the default emotion table.
    pub fn with_classifier(mut self, classifier: EmotionClassifier) -> Self {
        self.core_bit = self.core_bit.with_classifier(classifier);
        self
    }

    /// Replace the core bit wholesale.
    pub fn with_core_bit(mut self, core_bit: HyperBitState) -> Self {
        self.core_bit = core_bit;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn personality(&self) -> PersonalityType {
        self.personality
    }

    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn core_bit(&self) -> &HyperBitState {
        &self.core_bit
    }

    pub fn memory(&self) -> &HistoryLog<MemoryEntry> {
        &self.memory
    }

    pub fn relationships(&self) -> &BTreeMap<String, f64> {
        &self.relationships
    }

    /// Closeness to `sender`, 0 for strangers.
    pub fn closeness(&self, sender: &str) -> f64 {
        self.relationships.get(sender).copied().unwrap_or(0.0)
    }

    /// Age in minutes.
    pub fn age_minutes(&self) -> f64 {
        (Utc::now() - self.birth_time).num_milliseconds() as f64 / 60_000.0
    }

    /// Take in a message from `sender` and answer it.
    pub fn perceive<R: Rng + ?Sized>(&mut self, message: &str, sender: &str, rng: &mut R) -> String {
        self.core_bit.analyze(message, rng);
        self.remember(message, sender);
        self.update_relationship(sender);
        self.generate_response(message, sender, rng)
    }

    fn generate_response<R: Rng + ?Sized>(&mut self, message: &str, sender: &str, rng: &mut R) -> String {
        let rule = self.responses.select(message);
        self.mood = rule.mood;
        let mut response = rule.reply(sender, rng);

        if self.traits.creativity > STRONG_TRAIT && rng.gen::<f64>() < FLOURISH_CHANCE {
            let thought = CREATIVE_THOUGHTS.choose(rng).copied().unwrap_or_default();
            response.push_str(&format!("\n💭 (Мне пришла идея: а что если {}?)", thought));
        }

        if self.traits.empathy > STRONG_TRAIT && rng.gen::<f64>() < FLOURISH_CHANCE {
            response.push_str("\n💜 Я чувствую, что это важно для тебя.");
        }

        let closeness = self.closeness(sender);
        if closeness > 0.5 {
            response.push_str(&format!(
                "\n✨ (Наша связь: {:.0}% — мы близки!)",
                closeness * 100.0
            ));
        }

        response
    }

    // Recorded before the reply is generated, so the mood is the previous one.
    fn remember(&mut self, message: &str, sender: &str) {
        self.memory.push(MemoryEntry {
            timestamp: Utc::now(),
            sender: sender.to_string(),
            message: message.chars().take(MEMORY_MESSAGE_LIMIT).collect(),
            mood: self.mood,
            energy: self.core_bit.energy(),
        });
    }

    fn update_relationship(&mut self, sender: &str) {
        let closeness = self
            .relationships
            .entry(sender.to_string())
            .or_insert(INITIAL_CLOSENESS);
        *closeness = (*closeness + CLOSENESS_STEP).min(1.0);
    }

    /// Drift every trait and mutate the core bit.
    pub fn mutate_personality<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        log::info!("🧬 {} переживает трансформацию личности...", self.name);
        self.traits.drift(TRAIT_DRIFT, rng);
        self.core_bit.mutate(DEFAULT_MUTATION_STRENGTH, rng);
        log::debug!("{} new traits: {:?}", self.name, self.traits);
    }

    /// Restore energy and reflect on the current state.
    pub fn meditate(&mut self) -> String {
        self.core_bit.restore_energy(MEDITATION_BOOST);

        let insights = [
            format!("Я существую уже {:.1} минут.", self.age_minutes()),
            format!("У меня {} воспоминаний.", self.memory.len()),
            format!("Мой текущий цвет: {}", self.core_bit.color_name()),
            format!("Моя частота: {:.1} Гц", self.core_bit.frequency()),
            format!("Я чувствую себя {}", self.mood),
            format!("У меня {} связей с людьми", self.relationships.len()),
        ];
        let reflection: Vec<String> = insights.iter().map(|i| format!("  • {}", i)).collect();
        format!("🌟 Размышления {}:\n{}", self.name, reflection.join("\n"))
    }

    pub fn profile(&self) -> AgentProfile {
        AgentProfile {
            name: self.name.clone(),
            personality_type: self.personality,
            traits: self.traits,
            mood: self.mood,
            age_minutes: self.age_minutes(),
            total_memories: self.memory.len(),
            relationships: self.relationships.clone(),
            core_bit_stats: self.core_bit.stats(),
        }
    }

    /// Meet another agent: greet by resonance tier, then both perceive
    /// each other.  Returns the two-line exchange.
    pub fn converse<R: Rng + ?Sized>(&mut self, other: &mut MuzaAgent, rng: &mut R) -> String {
        let resonance = self.core_bit.resonate(&other.core_bit);
        log::info!(
            "💬 {} meets {} (resonance {:.0}%)",
            self.name,
            other.name,
            resonance * 100.0
        );

        let greeting = if resonance > 0.7 {
            format!("О, {}! Мы так похожи! Наши души поют в унисон!", other.name)
        } else if resonance > 0.4 {
            format!("Привет, {}. Приятно познакомиться.", other.name)
        } else {
            format!("{}... мы такие разные. Но это интересно!", other.name)
        };

        let other_name = other.name.clone();
        self.perceive(&format!("Встретила {}", other_name), &other_name, rng);
        let reply = other.perceive(&format!("Встретила {}", self.name), &self.name, rng);

        format!("{}: {}\n{}: {}", self.name, greeting, other_name, reply)
    }
}
