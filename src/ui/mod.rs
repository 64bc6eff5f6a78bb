//! Terminal presentation of bits and agents.

pub mod visualizer;

pub use visualizer::{ConsoleVisualizer, HYPERBIT_WIDTH, PANEL_WIDTH};
