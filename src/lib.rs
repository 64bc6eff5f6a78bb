//! # Muza
//!
//! HyperBit emotional-state simulator. A [`HyperBitState`] reads text,
//! classifies it into an [`Emotion`], drifts its frequency and color, and
//! keeps a bounded history of snapshots. Bits can mutate, resonate and
//! merge. On top sits [`MuzaAgent`], a personality with moods, memory and
//! relationships, plus a console visualizer, a CLI and an HTTP server.

pub mod agent;
pub mod cli;
pub mod config;
pub mod hyperbit;
pub mod server;
pub mod ui;
pub mod utilities;

pub use agent::{AgentProfile, Mood, MuzaAgent, PersonalityType, Traits};
pub use config::ServerConfig;
pub use hyperbit::{
    Emotion, EmotionClassifier, EmotionTable, FrequencyModel, HistoryLog, Hsv, HyperBitParams,
    HyperBitState, HyperBitStats, Report, Snapshot,
};
pub use ui::ConsoleVisualizer;
pub use utilities::errors::MuzaError;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
