//! The Muza personality agent.
//!
//! ```text
//! message ─► core HyperBit (analyze) ─► memory ─► relationships ─► reply table
//!                                                                    │
//!                                          personality flourishes ◄──┘
//! ```
//!
//! Reply selection is a keyword table like emotion classification; the
//! personality traits only decide which optional flourishes get appended.

pub mod muza;
pub mod personality;
pub mod responses;

pub use muza::{AgentProfile, MemoryEntry, MuzaAgent};
pub use personality::{PersonalityType, Traits};
pub use responses::{Mood, ResponseRule, ResponseTable};
