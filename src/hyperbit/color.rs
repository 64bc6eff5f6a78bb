//! HSV mood color, RGB conversion and hue naming.
//!
//! The mood is stored as HSV because mutation walks the hue wheel; RGB is
//! derived only for display.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hue/saturation/value triple, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl Hsv {
    /// Build a color, clamping every channel into `[0, 1]`.
    pub fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue: clamp_unit(hue),
            saturation: clamp_unit(saturation),
            value: clamp_unit(value),
        }
    }

    /// Convert to 8-bit RGB.  Channels are truncated, not rounded.
    pub fn to_rgb(&self) -> Rgb {
        let (r, g, b) = hsv_to_rgb(self.hue, self.saturation, self.value);
        Rgb {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
        }
    }

    /// Convert an 8-bit RGB color to HSV.
    pub fn from_rgb(rgb: Rgb) -> Self {
        let (h, s, v) = rgb_to_hsv(
            rgb.r as f64 / 255.0,
            rgb.g as f64 / 255.0,
            rgb.b as f64 / 255.0,
        );
        Self::new(h, s, v)
    }

    /// Deterministic color derived from the SHA-256 digest of `text`.
    ///
    /// The first three digest bytes are read as red, green and blue.
    pub fn from_text_digest(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        Self::from_rgb(Rgb {
            r: digest[0],
            g: digest[1],
            b: digest[2],
        })
    }

    pub fn name(&self) -> ColorName {
        ColorName::from_hue(self.hue)
    }
}

impl Default for Hsv {
    /// Soft indigo.
    fn default() -> Self {
        Self {
            hue: 0.5,
            saturation: 0.8,
            value: 0.9,
        }
    }
}

impl From<(f64, f64, f64)> for Hsv {
    fn from((h, s, v): (f64, f64, f64)) -> Self {
        Self::new(h, s, v)
    }
}

/// 8-bit RGB triple used by the presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// `#rrggbb` form.
    pub fn hex(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Named hue bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorName {
    #[serde(rename = "алый")]
    Scarlet,
    #[serde(rename = "оранжевый")]
    Orange,
    #[serde(rename = "жёлтый")]
    Yellow,
    #[serde(rename = "зелёный")]
    Green,
    #[serde(rename = "бирюзовый")]
    Turquoise,
    #[serde(rename = "синий")]
    Blue,
    #[serde(rename = "фиолетовый")]
    Violet,
    #[serde(rename = "пурпурный")]
    Purple,
}

impl ColorName {
    /// Bucket a hue.  Anything past 0.92 (or outside the wheel) is purple.
    pub fn from_hue(hue: f64) -> Self {
        match hue {
            h if (0.0..0.08).contains(&h) => Self::Scarlet,
            h if (0.08..0.17).contains(&h) => Self::Orange,
            h if (0.17..0.33).contains(&h) => Self::Yellow,
            h if (0.33..0.50).contains(&h) => Self::Green,
            h if (0.50..0.58).contains(&h) => Self::Turquoise,
            h if (0.58..0.75).contains(&h) => Self::Blue,
            h if (0.75..0.92).contains(&h) => Self::Violet,
            _ => Self::Purple,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scarlet => "алый",
            Self::Orange => "оранжевый",
            Self::Yellow => "жёлтый",
            Self::Green => "зелёный",
            Self::Turquoise => "бирюзовый",
            Self::Blue => "синий",
            Self::Violet => "фиолетовый",
            Self::Purple => "пурпурный",
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Wrap a hue onto `[0, 1)`.
pub(crate) fn wrap_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(1.0);
    // rem_euclid of a tiny negative rounds up to exactly 1.0
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).clamp(0.0, 255.0) as u8
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let v = maxc;
    if maxc == minc {
        return (0.0, 0.0, v);
    }
    let range = maxc - minc;
    let s = range / maxc;
    let rc = (maxc - r) / range;
    let gc = (maxc - g) / range;
    let bc = (maxc - b) / range;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    (wrap_hue(h / 6.0), s, v)
}
