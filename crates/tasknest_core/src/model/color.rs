//! Category color values and their hex encoding.
//!
//! # Invariants
//! - Stored encodings are six uppercase hex digits without a leading `#`.
//! - `Color::from_hex(x)?.to_hex() == x` for every stored encoding.

use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static COLOR_HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9A-Fa-f]{6})$").expect("valid color regex"));

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Decodes `RRGGBB` (optionally prefixed with `#`, any letter case).
    pub fn from_hex(value: &str) -> Result<Self, ValidationError> {
        let digits = COLOR_HEX_RE
            .captures(value.trim())
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| ValidationError::InvalidColorEncoding(value.to_string()))?
            .as_str();

        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| ValidationError::InvalidColorEncoding(value.to_string()))?;
        Ok(Self::rgb(
            ((packed >> 16) & 0xFF) as u8,
            ((packed >> 8) & 0xFF) as u8,
            (packed & 0xFF) as u8,
        ))
    }

    /// Encodes as six uppercase hex digits, no marker.
    ///
    /// Lowercase or `#`-prefixed input to `from_hex` comes back normalized, so
    /// `to_hex(from_hex(x)) == x` holds exactly for canonical encodings.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// Built-in category palette. The first two entries seed default categories.
pub const DEFAULT_PALETTE: &[Color] = &[
    Color::rgb(0xFC, 0x5C, 0x65),
    Color::rgb(0x45, 0xAA, 0xF2),
    Color::rgb(0xFD, 0x96, 0x44),
    Color::rgb(0xFE, 0xD3, 0x30),
    Color::rgb(0x26, 0xDE, 0x81),
    Color::rgb(0x2B, 0xCB, 0xBA),
    Color::rgb(0x4B, 0x7B, 0xEC),
    Color::rgb(0xA5, 0x5E, 0xEA),
    Color::rgb(0x77, 0x8C, 0xA3),
    Color::rgb(0x4B, 0x65, 0x84),
];

/// Fallback color for categories without an encoding.
pub fn default_color() -> Color {
    DEFAULT_PALETTE[0]
}

/// Hex encodings of the built-in palette, in palette order.
pub fn default_palette_encodings() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|color| color.to_hex()).collect()
}

/// Validates and canonicalizes one stored color encoding.
pub fn normalize_color_encoding(value: &str) -> Result<String, ValidationError> {
    Color::from_hex(value).map(Color::to_hex)
}
