//! HyperBit: the emotional-state core.
//!
//! # Architecture
//!
//! ```text
//! text ──► EmotionClassifier ──► FrequencyModel ──► HyperBitState
//!                                                       │
//!                                 Snapshot ◄────────────┤
//!                                    │                  ▼
//!                               HistoryLog           Report
//! ```
//!
//! Everything here is synchronous and owns its data.  Randomness is always
//! injected as a `rand::Rng`, so a seeded `StdRng` gives reproducible runs.
//! Nothing in this module locks: callers that share a bit across threads
//! must serialize access themselves (the HTTP server gives every session
//! its own bit instead).

pub mod classifier;
pub mod color;
pub mod frequency;
pub mod history;
pub mod report;
pub mod state;

use rand::Rng;

pub use classifier::{Emotion, EmotionClassifier, EmotionRule, EmotionTable};
pub use color::{ColorName, Hsv, Rgb};
pub use frequency::FrequencyModel;
pub use history::{HistoryLog, AGENT_MEMORY_CAPACITY, HYPERBIT_HISTORY_CAPACITY};
pub use report::Report;
pub use state::{
    HistoryExport, HyperBitParams, HyperBitState, HyperBitStats, Snapshot,
    DEFAULT_MUTATION_STRENGTH,
};

/// Uniform sample from `[lo, hi]`; a degenerate range yields `lo`.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}
