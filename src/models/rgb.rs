//! RGB color handling with hex parsing and serialization.

// Allow small types passed by reference for API consistency
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::cast_possible_truncation)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color value with hex string representation.
///
/// Serialized as a `#RRGGBB` string so colors can be written by hand in
/// the TOML config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses an `RgbColor` from a hex string.
    ///
    /// Supports formats: "#RRGGBB", "RRGGBB", "#rrggbb", "rrggbb"
    ///
    /// # Examples
    ///
    /// ```
    /// use keymapviz::models::RgbColor;
    ///
    /// let color = RgbColor::from_hex("#ffcccc").unwrap();
    /// assert_eq!(color, RgbColor::new(255, 204, 204));
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.len() != 6 || !hex.is_ascii() {
            anyhow::bail!("Invalid hex color format '{hex}'. Expected 6 hex digits (RRGGBB)");
        }

        let r = u8::from_str_radix(&hex[0..2], 16)
            .context(format!("Invalid red channel in hex color '{hex}'"))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .context(format!("Invalid green channel in hex color '{hex}'"))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .context(format!("Invalid blue channel in hex color '{hex}'"))?;

        Ok(Self::new(r, g, b))
    }

    /// Converts the color to a lowercase "#rrggbb" string, the form used in
    /// SVG and CSS output.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Returns a dimmed version of the color at the given percentage.
    ///
    /// Used for key outlines, which are drawn a shade darker than the fill.
    #[must_use]
    pub const fn dim(&self, percent: u8) -> Self {
        let percent = if percent > 100 { 100 } else { percent };
        Self {
            r: (self.r as u16 * percent as u16 / 100) as u8,
            g: (self.g as u16 * percent as u16 / 100) as u8,
            b: (self.b as u16 * percent as u16 / 100) as u8,
        }
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for RgbColor {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_valid() {
        assert_eq!(
            RgbColor::from_hex("#e6ffcc").unwrap(),
            RgbColor::new(230, 255, 204)
        );
        assert_eq!(
            RgbColor::from_hex("F2F2F2").unwrap(),
            RgbColor::new(242, 242, 242)
        );
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(RgbColor::from_hex("#FFF").is_err());
        assert!(RgbColor::from_hex("#GGGGGG").is_err());
        assert!(RgbColor::from_hex("").is_err());
    }

    #[test]
    fn test_to_hex_lowercase() {
        assert_eq!(RgbColor::new(255, 204, 204).to_hex(), "#ffcccc");
        assert_eq!(RgbColor::new(0, 128, 255).to_string(), "#0080ff");
    }

    #[test]
    fn test_dim() {
        assert_eq!(RgbColor::new(200, 100, 50).dim(50), RgbColor::new(100, 50, 25));
        assert_eq!(RgbColor::new(10, 10, 10).dim(200), RgbColor::new(10, 10, 10));
    }

    #[test]
    fn test_serde_as_hex_string() {
        #[derive(Deserialize, Serialize)]
        struct Wrapper {
            color: RgbColor,
        }

        let parsed: Wrapper = toml::from_str("color = \"#cce5ff\"").unwrap();
        assert_eq!(parsed.color, RgbColor::new(204, 229, 255));

        let out = toml::to_string(&parsed).unwrap();
        assert!(out.contains("\"#cce5ff\""));
    }
}
