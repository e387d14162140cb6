use std::{fmt, str::FromStr};

use crate::foundation::error::{MemoriesError, MemoriesResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Width of the virtual page in page units.
pub const PAGE_WIDTH: f64 = 1000.0;
/// Height of the virtual page in page units.
pub const PAGE_HEIGHT: f64 = 1400.0;

/// Fixed virtual page size all frames and text layout are expressed in.
pub const PAGE_SIZE: Size = Size::new(PAGE_WIDTH, PAGE_HEIGHT);

/// Page bounds in virtual page space, anchored at the origin.
pub fn page_rect() -> Rect {
    Rect::from_origin_size(Point::ORIGIN, PAGE_SIZE)
}

/// Straight-alpha RGBA8 color.
///
/// Serialized as a `#rrggbbaa` hex string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> MemoriesResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        let channel = |i: usize| -> MemoriesResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| MemoriesError::validation(format!("invalid hex color '{s}'")))
        };
        if !hex.is_ascii() {
            return Err(MemoriesError::validation(format!("invalid hex color '{s}'")));
        }
        match hex.len() {
            3 => {
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                Self::from_hex(&expanded)
            }
            6 => Ok(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(MemoriesError::validation(format!("invalid hex color '{s}'"))),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba8 {
    type Err = MemoriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Vertical safe-area insets of a viewport, in screen units.
///
/// Only top and bottom insets reduce the space available to the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Insets {
    pub top: f64,
    pub bottom: f64,
}

impl Insets {
    pub const ZERO: Self = Self {
        top: 0.0,
        bottom: 0.0,
    };

    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
