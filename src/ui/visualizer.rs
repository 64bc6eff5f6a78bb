//! Console rendering of HyperBits, resonance and agent profiles.
//!
//! All renderers return the finished text (ANSI escapes included) so the
//! caller decides where it goes; nothing here prints.

use std::f64::consts::PI;

use crate::agent::MuzaAgent;
use crate::hyperbit::frequency::{MAX_FREQUENCY, MIN_FREQUENCY};
use crate::hyperbit::HyperBitState;
use crate::utilities::printer::{truecolor, PrinterColor, RESET};

pub const HYPERBIT_WIDTH: usize = 60;
pub const PANEL_WIDTH: usize = 70;

const WAVE_CHARS: [char; 4] = ['~', '∼', '≈', '∿'];

// ============================================================================
// Frame builder
// ============================================================================

/// A run of text with an optional color escape.
struct Segment {
    text: String,
    color: Option<String>,
}

fn plain(text: impl Into<String>) -> Segment {
    Segment { text: text.into(), color: None }
}

fn painted(text: impl Into<String>, color: impl Into<String>) -> Segment {
    Segment { text: text.into(), color: Some(color.into()) }
}

impl Segment {
    fn render(&self) -> String {
        match &self.color {
            Some(color) => format!("{}{}{}", color, self.text, RESET),
            None => self.text.clone(),
        }
    }
}

/// Double-line box whose rows are padded to a fixed visible width.
///
/// Padding counts chars, so rows inside the border must stay single-width.
/// Emoji go in the title line above the box or the caption below it.
struct Frame {
    width: usize,
    lines: Vec<String>,
}

impl Frame {
    fn titled(width: usize, title: Segment) -> Self {
        let mut frame = Self { width, lines: Vec::new() };
        let heading = frame.loose(title);
        frame.lines.push(heading);
        frame.border('╔', '╗');
        frame.blank();
        frame
    }

    fn inner(&self) -> usize {
        self.width.saturating_sub(2)
    }

    fn border(&mut self, left: char, right: char) {
        let bar = "═".repeat(self.inner());
        self.lines
            .push(PrinterColor::Bold.paint(&format!("{}{}{}", left, bar, right)));
    }

    fn blank(&mut self) {
        self.row(Vec::new());
    }

    /// Left-aligned row.
    fn row(&mut self, segments: Vec<Segment>) {
        let edge = PrinterColor::Bold.paint("║");
        let visible: usize = segments.iter().map(|s| s.text.chars().count()).sum();
        let mut line = edge.clone();
        for seg in &segments {
            line.push_str(&seg.render());
        }
        line.push_str(&" ".repeat(self.inner().saturating_sub(visible)));
        line.push_str(&edge);
        self.lines.push(line);
    }

    /// Row centered within the frame.
    fn centered(&mut self, segment: Segment) {
        let pad = self.inner().saturating_sub(segment.text.chars().count()) / 2;
        self.row(vec![plain(" ".repeat(pad)), segment]);
    }

    /// Unbordered line centered over the box, with no right padding.
    fn loose(&self, segment: Segment) -> String {
        let pad = self.width.saturating_sub(segment.text.chars().count()) / 2;
        format!("{}{}", " ".repeat(pad), segment.render())
    }

    fn close(&mut self) {
        self.blank();
        self.border('╚', '╝');
    }

    fn finish(mut self) -> String {
        self.close();
        self.lines.join("\n")
    }

    fn finish_with_caption(mut self, caption: Segment) -> String {
        self.close();
        let footer = self.loose(caption);
        self.lines.push(footer);
        self.lines.join("\n")
    }
}

// ============================================================================
// Renderers
// ============================================================================

/// Renders bits and agents as boxed ANSI panels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleVisualizer;

impl ConsoleVisualizer {
    /// Panel with name, energy and base bars, a frequency wave and stats.
    pub fn render_hyperbit(bit: &HyperBitState, width: usize) -> String {
        Self::render_hyperbit_with_energy(bit, bit.energy(), width)
    }

    /// One frame of the pulse animation `elapsed` seconds in.
    ///
    /// The bit itself is not touched; only the drawn energy pulses.
    pub fn render_pulse_frame(bit: &HyperBitState, elapsed: f64, width: usize) -> String {
        let pulse = 0.5 + 0.5 * (elapsed * 4.0).sin();
        Self::render_hyperbit_with_energy(bit, bit.energy() * (0.7 + 0.3 * pulse), width)
    }

    fn render_hyperbit_with_energy(bit: &HyperBitState, energy: f64, width: usize) -> String {
        let color = truecolor(bit.rgb());
        let bar_room = width.saturating_sub(20) as f64;
        let mut frame = Frame::titled(width, painted(format!("🌀 {}", bit.name()), color.clone()));

        let energy_bar = "█".repeat((bar_room * (energy / 3.0).min(1.0)).max(0.0) as usize);
        frame.row(vec![plain("  Energy: "), painted(energy_bar, color.clone())]);
        let base_bar = "▓".repeat((bar_room * bit.base()) as usize);
        frame.row(vec![plain("  Base:   "), painted(base_bar, PrinterColor::Cyan.ansi_code())]);
        frame.blank();

        let normalized =
            (bit.frequency() - MIN_FREQUENCY) / (MAX_FREQUENCY - MIN_FREQUENCY);
        frame.row(vec![
            plain("  "),
            painted(Self::wave(normalized, width.saturating_sub(6)), color),
        ]);
        frame.blank();

        frame.row(vec![plain(format!("  Frequency: {:.1} Hz", bit.frequency()))]);
        frame.row(vec![plain(format!("  Color: {}", bit.color_name()))]);
        frame.row(vec![plain(format!("  Age: {:.1}s", bit.age()))]);
        frame.finish()
    }

    /// ASCII sine wave; higher normalized frequency packs more periods.
    pub fn wave(normalized_frequency: f64, width: usize) -> String {
        (0..width)
            .map(|i| {
                let phase = (i as f64 / width as f64) * 2.0 * PI * (1.0 + normalized_frequency * 3.0);
                match phase.sin() {
                    a if a > 0.5 => WAVE_CHARS[0],
                    a if a > 0.0 => WAVE_CHARS[1],
                    a if a > -0.5 => WAVE_CHARS[2],
                    _ => WAVE_CHARS[3],
                }
            })
            .collect()
    }

    /// Resonance panel: bar glyph, color and verdict follow the score tier.
    pub fn render_resonance(a: &HyperBitState, b: &HyperBitState) -> String {
        let width = PANEL_WIDTH;
        let resonance = a.resonate(b);
        let mut frame = Frame::titled(width, plain("🎵 RESONANCE 🎵"));

        frame.centered(plain(format!("{} ⟷ {}", a.name(), b.name())));
        frame.blank();

        let (glyph, bar_color, verdict, verdict_color) = if resonance > 0.7 {
            ("♥", PrinterColor::Red, "✨ PERFECT HARMONY ✨", PrinterColor::Green)
        } else if resonance > 0.4 {
            ("♦", PrinterColor::Yellow, "~ Gentle Resonance ~", PrinterColor::Yellow)
        } else {
            ("·", PrinterColor::Blue, "· Distant Vibrations ·", PrinterColor::Blue)
        };
        let bar_len = (width.saturating_sub(20) as f64 * resonance).max(0.0) as usize;
        frame.row(vec![
            plain(format!("  {:.0}% ", resonance * 100.0)),
            painted(glyph.repeat(bar_len), bar_color.ansi_code()),
        ]);
        frame.finish_with_caption(painted(verdict, verdict_color.ansi_code()))
    }

    /// Agent card: mood, age, memories, trait bars and relationships.
    pub fn render_agent_profile(agent: &MuzaAgent, width: usize) -> String {
        let profile = agent.profile();
        let mut frame = Frame::titled(
            width,
            painted(
                format!("👤 {} [{}]", profile.name, profile.personality_type),
                PrinterColor::Magenta.ansi_code(),
            ),
        );

        frame.row(vec![plain(format!("  Mood: {}", profile.mood))]);
        frame.row(vec![plain(format!("  Age: {:.1} minutes", profile.age_minutes))]);
        frame.row(vec![plain(format!("  Memories: {}", profile.total_memories))]);
        frame.blank();

        frame.row(vec![plain("  "), painted("Personality Traits:", PrinterColor::Yellow.ansi_code())]);
        let bar_room = width.saturating_sub(30) as f64;
        for (label, value) in profile.traits.labeled() {
            let label = format!("    {}: ", label);
            let pad = 20usize.saturating_sub(label.chars().count());
            frame.row(vec![
                plain(format!("{}{}", label, " ".repeat(pad))),
                painted("█".repeat((bar_room * value) as usize), PrinterColor::Cyan.ansi_code()),
            ]);
        }

        if !profile.relationships.is_empty() {
            frame.blank();
            frame.row(vec![plain("  "), painted("Relationships:", PrinterColor::Yellow.ansi_code())]);
            for (person, closeness) in &profile.relationships {
                let hearts = "♥".repeat((closeness * 5.0) as usize);
                frame.row(vec![plain(format!(
                    "    {}: {} ({:.0}%)",
                    person,
                    hearts,
                    closeness * 100.0
                ))]);
            }
        }
        frame.finish()
    }
}
