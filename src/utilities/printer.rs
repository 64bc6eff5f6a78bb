//! ANSI color helpers for console output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::hyperbit::Rgb;

/// Available colors for printed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterColor {
    Bold,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BoldMagenta,
}

impl PrinterColor {
    /// ANSI escape code for this color.
    pub fn ansi_code(&self) -> &'static str {
        match self {
            Self::Bold => "\x1b[1m",
            Self::Red => "\x1b[91m",
            Self::Green => "\x1b[92m",
            Self::Yellow => "\x1b[93m",
            Self::Blue => "\x1b[94m",
            Self::Magenta => "\x1b[95m",
            Self::Cyan => "\x1b[96m",
            Self::White => "\x1b[97m",
            Self::BoldMagenta => "\x1b[1;95m",
        }
    }

    /// Wrap `text` in this color and a trailing reset.
    pub fn paint(&self, text: &str) -> String {
        format!("{}{}{}", self.ansi_code(), text, RESET)
    }
}

/// ANSI reset code.
pub const RESET: &str = "\x1b[0m";

/// 24-bit foreground escape for an RGB color.
pub fn truecolor(rgb: Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m", rgb.r, rgb.g, rgb.b)
}

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").unwrap());

/// Remove ANSI escape sequences, leaving only the visible text.
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_wraps_with_reset() {
        assert_eq!(PrinterColor::Red.paint("x"), "\x1b[91mx\x1b[0m");
    }

    #[test]
    fn test_strip_ansi() {
        let painted = format!("{}{}", truecolor(Rgb { r: 9, g: 9, b: 9 }), PrinterColor::Bold.paint("║ hi"));
        assert_eq!(strip_ansi(&painted), "║ hi");
        // screen clear and cursor home used by the pulse animation
        assert_eq!(strip_ansi("\x1b[2J\x1b[Hframe"), "frame");
        assert_eq!(strip_ansi("no escapes ⟷ 🌀"), "no escapes ⟷ 🌀");
    }

    #[test]
    fn test_truecolor_escape() {
        assert_eq!(truecolor(Rgb { r: 1, g: 22, b: 255 }), "\x1b[38;2;1;22;255m");
    }
}
