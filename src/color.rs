//! sRGB color values and HSL-space adjustments.
//!
//! Every adjustment re-derives HSL from the current stored color rather than
//! carrying HSL state between calls, so the visible hex value stays the single
//! source of truth and repeated adjustments do not drift beyond the inherent
//! 8-bit quantization.

use crate::error::ColorError;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An opaque 24-bit sRGB color, canonically rendered as lower-case `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL coordinates derived from a [`Color`].
///
/// `h` is degrees in `[0, 360)`; `s` and `l` are fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Color {
    /// Build a color from exact 8-bit channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from fractional channel values in `[0, 255]`.
    ///
    /// Each channel is rounded with `floor(x + 0.5)` and clamped, so any
    /// out-of-range or fractional input is made safe.
    pub fn from_rgb_f32(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: quantize(r),
            g: quantize(g),
            b: quantize(b),
        }
    }

    /// Parse user-supplied hex text into a color.
    ///
    /// Accepts surrounding whitespace and an optional leading `#`; requires
    /// exactly six hex digits, case-insensitive. This is the validation gate
    /// for clipboard pastes and prompt input as well as file loading.
    pub fn parse(text: &str) -> Result<Self, ColorError> {
        let trimmed = text.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(text.trim().to_string()));
        }
        let parse_pair = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorError::InvalidHex(text.trim().to_string()))
        };
        Ok(Self {
            r: parse_pair(0..2)?,
            g: parse_pair(2..4)?,
            b: parse_pair(4..6)?,
        })
    }

    /// Convert to HSL. Achromatic colors yield `h = 0, s = 0` exactly.
    pub fn to_hsl(self) -> Hsl {
        let r = f32::from(self.r) / 255.0;
        let g = f32::from(self.g) / 255.0;
        let b = f32::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let delta = max - min;
        let s = if l > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };
        let h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Hsl { h: h * 60.0, s, l }
    }

    /// Shift the hue by `delta` degrees, wrapping into `[0, 360)`.
    ///
    /// Saturation and lightness are preserved exactly because they are
    /// re-derived from this color, never accumulated across calls.
    pub fn adjust_hue(self, delta: f32) -> Self {
        let hsl = self.to_hsl();
        Hsl {
            h: wrap_hue(hsl.h + delta),
            ..hsl
        }
        .to_color()
    }

    /// Shift lightness by `delta`, clamped to `[0, 1]`.
    pub fn adjust_lightness(self, delta: f32) -> Self {
        let hsl = self.to_hsl();
        Hsl {
            l: (hsl.l + delta).clamp(0.0, 1.0),
            ..hsl
        }
        .to_color()
    }

    /// Shift saturation by `delta`, clamped to `[0, 1]`.
    pub fn adjust_saturation(self, delta: f32) -> Self {
        let hsl = self.to_hsl();
        Hsl {
            s: (hsl.s + delta).clamp(0.0, 1.0),
            ..hsl
        }
        .to_color()
    }
}

impl Hsl {
    /// Convert back to an 8-bit color. `s == 0` short-circuits to pure gray,
    /// avoiding the division in the hue helper.
    pub fn to_color(self) -> Color {
        if self.s == 0.0 {
            let v = self.l * 255.0;
            return Color::from_rgb_f32(v, v, v);
        }

        let q = if self.l < 0.5 {
            self.l * (1.0 + self.s)
        } else {
            self.l + self.s - self.l * self.s
        };
        let p = 2.0 * self.l - q;
        let h = self.h / 360.0;

        Color::from_rgb_f32(
            hue_component(p, q, h + 1.0 / 3.0) * 255.0,
            hue_component(p, q, h) * 255.0,
            hue_component(p, q, h - 1.0 / 3.0) * 255.0,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// Round a fractional channel with `floor(x + 0.5)` and clamp to `[0, 255]`.
fn quantize(value: f32) -> u8 {
    (value + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Wrap a hue angle into `[0, 360)`, correcting negative results.
fn wrap_hue(h: f32) -> f32 {
    ((h % 360.0) + 360.0) % 360.0
}

/// Single-channel helper for HSL → RGB (the standard piecewise ramp).
fn hue_component(p: f32, q: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
