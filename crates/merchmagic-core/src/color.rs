//! Colour values and the garment colour catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Non-premultiplied 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// CSS-style `rgba(r, g, b, alpha)` with a fractional alpha in `0..=1`.
    pub fn with_alpha_f(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(r, g, b, a)
    }

    pub fn alpha_f(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut it = digits.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::opaque(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Self::opaque(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Some(Self::new(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => None,
        }
    }

    /// Lower-case `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("Invalid hex colour: {}", s))
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_hex()
    }
}

/// A stock garment colour offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GarmentColor {
    pub name: &'static str,
    pub hex: &'static str,
}

/// Stock garment colours, in display order.
pub const GARMENT_COLORS: [GarmentColor; 4] = [
    GarmentColor {
        name: "White",
        hex: "#ffffff",
    },
    GarmentColor {
        name: "Black",
        hex: "#111827",
    },
    GarmentColor {
        name: "Red",
        hex: "#dc2626",
    },
    GarmentColor {
        name: "Blue",
        hex: "#2563eb",
    },
];

/// Display label for a garment colour, falling back to the hex string itself.
pub fn color_label(hex: &str) -> String {
    GARMENT_COLORS
        .iter()
        .find(|c| c.hex.eq_ignore_ascii_case(hex.trim()))
        .map(|c| c.name.to_string())
        .unwrap_or_else(|| hex.to_string())
}
