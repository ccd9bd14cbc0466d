//! TrackColor type — the color representation used for track images.
//!
//! Stores straight (non-premultiplied) RGBA8, which is what the rasterizer
//! writes into pixel buffers.

/// RGBA color with 0–255 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackColor {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl TrackColor {
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    /// Two-thirds white, the default track background.
    pub const LIGHT_GRAY: Self = Self::from_rgb(170, 170, 170);
    pub const TRANSPARENT: Self = Self::from_rgba8(0, 0, 0, 0);

    /// Create from 0–255 RGB values with full opacity.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex string (with or without `#`, 3, 6, or 8 chars).
    ///
    /// 8-char hex is interpreted as RRGGBBAA.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let stripped = hex.trim_start_matches('#');
        if !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&stripped[i..i + 2], 16).ok();
        match stripped.len() {
            3 => {
                let mut nibbles = stripped
                    .chars()
                    .map(|c| c.to_digit(16).map(|d| d as u8 * 17));
                Some(Self::from_rgb(nibbles.next()??, nibbles.next()??, nibbles.next()??))
            }
            6 => Some(Self::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Format as uppercase hex (no `#` prefix). Alpha is only written when
    /// the color is not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Pixel bytes in RGBA8 order.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for TrackColor {
    fn default() -> Self {
        Self::BLACK
    }
}
